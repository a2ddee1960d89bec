use async_trait::async_trait;
use rand::Rng;
use rand::SeedableRng;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use tracing::debug;

use crate::application::EmbeddingService;
use crate::domain::{DomainError, Embedding, EmbeddingConfig, RadicalDocument};

/// Deterministic embeddings derived from a hash of the text.
///
/// Equal texts map to equal unit vectors, unrelated texts to effectively
/// random ones. Good enough to exercise retrieval without a model download.
pub struct MockEmbedding {
    config: EmbeddingConfig,
}

impl MockEmbedding {
    pub fn new() -> Self {
        Self {
            config: EmbeddingConfig::default(),
        }
    }

    pub fn with_dimensions(dimensions: usize) -> Self {
        let defaults = EmbeddingConfig::default();
        Self {
            config: EmbeddingConfig::new(
                defaults.model_name().to_string(),
                dimensions,
                defaults.max_sequence_length(),
            ),
        }
    }

    fn generate_embedding(&self, text: &str) -> Vec<f32> {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        let mut rng = rand::rngs::StdRng::seed_from_u64(hasher.finish());

        let mut vector: Vec<f32> = (0..self.config.dimensions())
            .map(|_| rng.gen_range(-1.0..1.0))
            .collect();

        let magnitude: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            vector.iter_mut().for_each(|x| *x /= magnitude);
        }
        vector
    }
}

impl Default for MockEmbedding {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingService for MockEmbedding {
    async fn embed_documents(
        &self,
        documents: &[RadicalDocument],
    ) -> Result<Vec<Embedding>, DomainError> {
        let embeddings: Vec<Embedding> = documents
            .iter()
            .enumerate()
            .map(|(position, doc)| {
                Embedding::new(position, self.generate_embedding(doc.text()))
            })
            .collect();

        debug!("Generated {} mock embeddings", embeddings.len());
        Ok(embeddings)
    }

    async fn embed_query(&self, query: &str) -> Result<Vec<f32>, DomainError> {
        Ok(self.generate_embedding(query))
    }

    fn config(&self) -> &EmbeddingConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn same_text_same_vector() {
        let service = MockEmbedding::new();

        let first = service.embed_query("Net Shell").await.unwrap();
        let second = service.embed_query("Net Shell").await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn respects_dimensions() {
        let service = MockEmbedding::with_dimensions(16);
        let embedding = service.embed_query("test").await.unwrap();
        assert_eq!(embedding.len(), 16);
    }

    #[tokio::test]
    async fn documents_keep_positions() {
        let service = MockEmbedding::with_dimensions(8);
        let docs = vec![
            RadicalDocument::new("Net", "net"),
            RadicalDocument::new("Shell", "shell"),
        ];

        let embeddings = service.embed_documents(&docs).await.unwrap();

        assert_eq!(embeddings.len(), 2);
        assert_eq!(embeddings[1].position(), 1);
        assert_eq!(
            embeddings[1].vector(),
            service.embed_query(docs[1].text()).await.unwrap().as_slice()
        );
    }
}
