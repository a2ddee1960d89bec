use std::path::PathBuf;

use async_trait::async_trait;

use crate::domain::{DomainError, RadicalDocument};

/// Source of the per-radical description documents.
#[async_trait]
pub trait RadicalRepository: Send + Sync {
    /// Documents in stable source order, or `None` when no snapshot exists.
    async fn load_documents(&self) -> Result<Option<Vec<RadicalDocument>>, DomainError>;

    /// The snapshot file that would be read, if any.
    fn snapshot_path(&self) -> Option<PathBuf>;
}
