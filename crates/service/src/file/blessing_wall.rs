use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use crate::blessing::store::BlessingStore;
use crate::blessing::{BlessingInput, BlessingRecord, WallPolicy};
use crate::errors::ServiceError;
use crate::storage::json_doc_store::JsonDocStore;

/// File-backed blessing wall.
/// Keeps the whole collection as one JSON document, newest first, and
/// runs every submit as a single prepend-cap-persist step under the
/// document store's update lock.
#[derive(Clone)]
pub struct BlessingWall {
    store: Arc<JsonDocStore<Vec<BlessingRecord>>>,
    policy: WallPolicy,
}

impl BlessingWall {
    /// Initialize the wall from the given document path. Creates an empty
    /// document if the file is missing.
    pub async fn new<P: Into<std::path::PathBuf>>(
        path: P,
        policy: WallPolicy,
    ) -> Result<Arc<Self>, ServiceError> {
        let store = JsonDocStore::<Vec<BlessingRecord>>::new(path).await?;
        Ok(Arc::new(Self { store, policy }))
    }

    /// All retained blessings, newest first.
    pub async fn list(&self) -> Vec<BlessingRecord> {
        self.store.read().await
    }

    /// Validate a submission, stamp it, prepend it and persist.
    pub async fn submit(&self, input: BlessingInput) -> Result<BlessingRecord, ServiceError> {
        let (name, blessing) = input.validate(&self.policy)?;
        let now = Utc::now().timestamp_millis();
        let policy = self.policy;

        self.store
            .update(move |wall| {
                // Same-millisecond submissions would collide on the sort
                // key; bump past the current head so timestamps stay
                // strictly decreasing from index 0.
                let timestamp = match wall.first() {
                    Some(head) if head.timestamp >= now => head.timestamp + 1,
                    _ => now,
                };
                let record = BlessingRecord { name, blessing, timestamp };
                wall.insert(0, record.clone());
                if policy.max_records > 0 && wall.len() > policy.max_records {
                    let evicted = wall.len() - policy.max_records;
                    wall.truncate(policy.max_records);
                    debug!(evicted, cap = policy.max_records, "retention cap evicted oldest blessings");
                }
                Ok(record)
            })
            .await
    }
}

#[async_trait]
impl BlessingStore for BlessingWall {
    async fn list(&self) -> Result<Vec<BlessingRecord>, ServiceError> {
        Ok(self.list().await)
    }

    async fn submit(&self, input: BlessingInput) -> Result<BlessingRecord, ServiceError> {
        self.submit(input).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn tmp_path(tag: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("blessing_wall_{}_{}.json", tag, Uuid::new_v4()))
    }

    fn input(name: &str, blessing: &str) -> BlessingInput {
        BlessingInput { name: Some(name.into()), blessing: Some(blessing.into()) }
    }

    #[tokio::test]
    async fn submit_prepends_newest_first() -> Result<(), anyhow::Error> {
        let tmp = tmp_path("order");
        let wall = BlessingWall::new(&tmp, WallPolicy::default()).await?;

        assert!(wall.list().await.is_empty());

        wall.submit(input("Ann", "HBD!")).await?;
        wall.submit(input("Bob", "many happy returns")).await?;

        let all = wall.list().await;
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "Bob");
        assert_eq!(all[1].name, "Ann");
        assert!(all[0].timestamp > all[1].timestamp);

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn rejected_submission_leaves_wall_unchanged() -> Result<(), anyhow::Error> {
        let tmp = tmp_path("reject");
        let wall = BlessingWall::new(&tmp, WallPolicy::default()).await?;
        wall.submit(input("Ann", "HBD!")).await?;

        let res = wall.submit(input("", "x")).await;
        assert!(matches!(res, Err(ServiceError::Validation(_))));
        assert_eq!(wall.list().await.len(), 1);

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn retention_cap_keeps_most_recent() -> Result<(), anyhow::Error> {
        let tmp = tmp_path("cap");
        let policy = WallPolicy { max_records: 3, ..WallPolicy::default() };
        let wall = BlessingWall::new(&tmp, policy).await?;

        for i in 0..5 {
            wall.submit(input(&format!("guest{}", i), "cheers")).await?;
        }

        let all = wall.list().await;
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].name, "guest4");
        assert_eq!(all[2].name, "guest2");
        // still strictly newest first
        assert!(all.windows(2).all(|w| w[0].timestamp > w[1].timestamp));

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn zero_cap_means_unbounded() -> Result<(), anyhow::Error> {
        let tmp = tmp_path("nocap");
        let policy = WallPolicy { max_records: 0, ..WallPolicy::default() };
        let wall = BlessingWall::new(&tmp, policy).await?;

        for i in 0..10 {
            wall.submit(input(&format!("guest{}", i), "cheers")).await?;
        }
        assert_eq!(wall.list().await.len(), 10);

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn wall_survives_reload_from_disk() -> Result<(), anyhow::Error> {
        let tmp = tmp_path("reload");
        {
            let wall = BlessingWall::new(&tmp, WallPolicy::default()).await?;
            wall.submit(input("Ann", "HBD!")).await?;
        }

        let wall = BlessingWall::new(&tmp, WallPolicy::default()).await?;
        let all = wall.list().await;
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "Ann");
        assert_eq!(all[0].blessing, "HBD!");

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn concurrent_submissions_all_survive() -> Result<(), anyhow::Error> {
        let tmp = tmp_path("race");
        let wall = BlessingWall::new(&tmp, WallPolicy::default()).await?;

        let mut handles = Vec::new();
        for i in 0..20 {
            let wall = Arc::clone(&wall);
            handles.push(tokio::spawn(async move {
                wall.submit(input(&format!("guest{}", i), "cheers")).await
            }));
        }
        for h in handles {
            h.await??;
        }

        let all = wall.list().await;
        assert_eq!(all.len(), 20, "no submission may be lost to a racing writer");
        // identifiers stay unique and strictly ordered
        assert!(all.windows(2).all(|w| w[0].timestamp > w[1].timestamp));

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }
}
