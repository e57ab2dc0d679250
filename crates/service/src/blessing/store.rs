use async_trait::async_trait;

use crate::blessing::{BlessingInput, BlessingRecord};
use crate::errors::ServiceError;

/// Trait abstraction for blessing persistence.
/// Implementations can be file-backed or remote KV.
#[async_trait]
pub trait BlessingStore: Send + Sync {
    /// All retained blessings, newest first.
    async fn list(&self) -> Result<Vec<BlessingRecord>, ServiceError>;
    /// Validate and persist a submission; returns the stored record.
    async fn submit(&self, input: BlessingInput) -> Result<BlessingRecord, ServiceError>;
}
