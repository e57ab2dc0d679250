//! Runtime environment helpers
//!
//! Thin wrapper around `common::env` to keep binary crates importing
//! `service::runtime::ensure_env` without depending directly on `common`.

/// Ensure the static asset and data directories are usable.
pub async fn ensure_env(frontend_dir: &str, data_dir: &str) -> anyhow::Result<()> {
    common::env::ensure_dirs(frontend_dir, data_dir).await
}
