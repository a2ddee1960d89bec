use async_trait::async_trait;

use crate::domain::{DomainError, Embedding, EmbeddingConfig, RadicalDocument};

/// Generates vector embeddings for radical documents and retrieval queries.
///
/// Documents and queries must be encoded by the same model so their vectors
/// are comparable.
#[async_trait]
pub trait EmbeddingService: Send + Sync {
    /// One embedding per document, in input order, tagged with its position.
    async fn embed_documents(
        &self,
        documents: &[RadicalDocument],
    ) -> Result<Vec<Embedding>, DomainError>;

    async fn embed_query(&self, query: &str) -> Result<Vec<f32>, DomainError>;

    fn config(&self) -> &EmbeddingConfig;
}
