//! Startup environment checks.

use tracing::warn;

/// Make sure the directories the service relies on are in place.
/// The static asset dir is optional (requests 404 without it); the data
/// dir must exist before the blessing document can be persisted.
pub async fn ensure_dirs(frontend_dir: &str, data_dir: &str) -> anyhow::Result<()> {
    if tokio::fs::metadata(frontend_dir).await.is_err() {
        warn!(%frontend_dir, "static asset directory missing; non-API requests will 404");
    }
    tokio::fs::create_dir_all(data_dir)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create data dir {data_dir}: {e}"))?;
    Ok(())
}
