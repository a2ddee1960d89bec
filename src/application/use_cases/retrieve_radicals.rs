use std::sync::Arc;

use tracing::debug;

use crate::application::EmbeddingService;
use crate::application::use_cases::RadicalIndex;
use crate::domain::DomainError;

/// Default number of radical documents fed into the prompt.
pub const DEFAULT_TOP_K: usize = 3;

pub struct RetrieveRadicalsUseCase {
    index: Arc<RadicalIndex>,
    embedding_service: Option<Arc<dyn EmbeddingService>>,
}

impl RetrieveRadicalsUseCase {
    pub fn new(index: Arc<RadicalIndex>, embedding_service: Arc<dyn EmbeddingService>) -> Self {
        Self {
            index,
            embedding_service: Some(embedding_service),
        }
    }

    /// A retriever over nothing. Always returns an empty context.
    pub fn disabled() -> Self {
        Self {
            index: Arc::new(RadicalIndex::empty()),
            embedding_service: None,
        }
    }

    /// Up to `top_k` radical documents closest to the joined radical names,
    /// nearest first.
    pub async fn retrieve(
        &self,
        radical_names: &[String],
        top_k: usize,
    ) -> Result<Vec<String>, DomainError> {
        let query = radical_names.join(" ");
        if query.trim().is_empty() || top_k == 0 {
            return Ok(Vec::new());
        }

        let (Some(index), Some(embedder)) = (self.index.index(), &self.embedding_service) else {
            return Ok(Vec::new());
        };
        if index.is_empty() {
            return Ok(Vec::new());
        }

        let query_vector = embedder.embed_query(&query).await?;
        let neighbors = index.search(&query_vector, top_k)?;

        let documents: Vec<String> = neighbors
            .iter()
            .filter_map(|n| self.index.document(n.position()))
            .map(|doc| doc.text().to_string())
            .collect();

        debug!(
            "Retrieved {} radical documents for '{}': {}",
            documents.len(),
            query,
            neighbors
                .iter()
                .map(|n| n.display_line())
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(documents)
    }
}
