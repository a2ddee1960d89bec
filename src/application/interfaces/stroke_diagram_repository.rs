use async_trait::async_trait;

use crate::domain::DomainError;

/// Raw stroke-order SVG documents, addressed by file name.
#[async_trait]
pub trait StrokeDiagramRepository: Send + Sync {
    /// `Ok(None)` when the diagram does not exist or cannot be read as text.
    async fn load_svg(&self, file_name: &str) -> Result<Option<String>, DomainError>;
}
