use std::{path::PathBuf, sync::Arc};
use tokio::{fs, sync::RwLock};

use crate::errors::ServiceError;

/// Generic JSON file-backed single-document store.
///
/// Persists one value of type `T` to a JSON file and hands out clones on
/// read. Mutations go through [`update`](Self::update), which keeps the
/// write lock held until the new document has been flushed to disk, so
/// concurrent writers are serialized and a read-modify-write can never
/// lose an update to a racing writer in this process.
#[derive(Clone)]
pub struct JsonDocStore<T> {
    inner: Arc<RwLock<T>>,
    file_path: PathBuf,
}

impl<T> JsonDocStore<T>
where
    T: serde::Serialize + serde::de::DeserializeOwned + Clone + Default,
{
    /// Initialize the store from a path. Creates the file with the default
    /// document if missing; unreadable content degrades to the default
    /// instead of poisoning every later request.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await.ok();
        }

        let doc: T = match fs::read(&file_path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_default(),
            Err(_) => {
                let empty = T::default();
                fs::write(
                    &file_path,
                    serde_json::to_vec(&empty).map_err(|e| ServiceError::Storage(e.to_string()))?,
                )
                .await
                .map_err(|e| ServiceError::Storage(e.to_string()))?;
                empty
            }
        };

        Ok(Arc::new(Self { inner: Arc::new(RwLock::new(doc)), file_path }))
    }

    /// Snapshot of the current document.
    pub async fn read(&self) -> T {
        let doc = self.inner.read().await;
        doc.clone()
    }

    /// Apply a mutation to the document and persist it before releasing
    /// the write lock. The mutation runs on a scratch copy that only
    /// becomes the live document after the flush succeeds, so a failed
    /// mutation or write leaves both memory and disk untouched.
    pub async fn update<F, R>(&self, f: F) -> Result<R, ServiceError>
    where
        F: FnOnce(&mut T) -> Result<R, ServiceError>,
    {
        let mut doc = self.inner.write().await;
        let mut next = doc.clone();
        let out = f(&mut next)?;
        let data = serde_json::to_vec(&next).map_err(|e| ServiceError::Storage(e.to_string()))?;
        fs::write(&self.file_path, data)
            .await
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        *doc = next;
        Ok(out)
    }
}
