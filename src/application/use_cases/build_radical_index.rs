use std::sync::Arc;
use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::application::{EmbeddingService, RadicalRepository, VectorIndex};
use crate::domain::{DomainError, RadicalDocument};

const EMBED_BATCH_SIZE: usize = 64;

/// Radical documents paired with the index built from their embeddings.
///
/// Row `i` of the index is the embedding of `documents[i]`. An index without
/// documents (no snapshot on disk, or no usable embedder) is a valid state in
/// which retrieval returns nothing.
pub struct RadicalIndex {
    documents: Vec<RadicalDocument>,
    index: Option<Arc<dyn VectorIndex>>,
}

impl RadicalIndex {
    pub fn new(
        documents: Vec<RadicalDocument>,
        index: Arc<dyn VectorIndex>,
    ) -> Result<Self, DomainError> {
        if documents.len() != index.len() {
            return Err(DomainError::internal(format!(
                "Radical index has {} rows for {} documents",
                index.len(),
                documents.len()
            )));
        }
        Ok(Self {
            documents,
            index: Some(index),
        })
    }

    pub fn empty() -> Self {
        Self {
            documents: Vec::new(),
            index: None,
        }
    }

    pub fn documents(&self) -> &[RadicalDocument] {
        &self.documents
    }

    pub fn index(&self) -> Option<&Arc<dyn VectorIndex>> {
        self.index.as_ref()
    }

    pub fn document(&self, position: usize) -> Option<&RadicalDocument> {
        self.documents.get(position)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.as_ref().map_or(true, |index| index.is_empty())
    }
}

pub struct BuildRadicalIndexUseCase {
    radical_repo: Arc<dyn RadicalRepository>,
    embedding_service: Arc<dyn EmbeddingService>,
}

impl BuildRadicalIndexUseCase {
    pub fn new(
        radical_repo: Arc<dyn RadicalRepository>,
        embedding_service: Arc<dyn EmbeddingService>,
    ) -> Self {
        Self {
            radical_repo,
            embedding_service,
        }
    }

    /// Load the radical snapshot, embed every document and hand the vectors
    /// to `build_index`.
    ///
    /// `build_index` receives the embedding dimension and the vectors in
    /// document order.
    pub async fn execute<F>(&self, build_index: F) -> Result<RadicalIndex, DomainError>
    where
        F: FnOnce(usize, Vec<Vec<f32>>) -> Result<Arc<dyn VectorIndex>, DomainError>,
    {
        let Some(documents) = self.radical_repo.load_documents().await? else {
            warn!("No radical snapshot found; retrieval context will be empty");
            return Ok(RadicalIndex::empty());
        };

        if documents.is_empty() {
            warn!("Radical snapshot has no rows; retrieval context will be empty");
            return Ok(RadicalIndex::empty());
        }

        let start_time = Instant::now();
        let progress_bar = ProgressBar::new(documents.len() as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} radicals")
        {
            progress_bar.set_style(style.progress_chars("#>-"));
        }

        let mut vectors: Vec<Vec<f32>> = Vec::with_capacity(documents.len());
        for batch in documents.chunks(EMBED_BATCH_SIZE) {
            let embeddings = self.embedding_service.embed_documents(batch).await?;
            if embeddings.len() != batch.len() {
                progress_bar.abandon();
                return Err(DomainError::embedding(format!(
                    "Expected {} embeddings, got {}",
                    batch.len(),
                    embeddings.len()
                )));
            }
            vectors.extend(embeddings.into_iter().map(|e| e.into_vector()));
            progress_bar.inc(batch.len() as u64);
        }
        progress_bar.finish_and_clear();

        let dimensions = self.embedding_service.config().dimensions();
        let index = build_index(dimensions, vectors)?;

        info!(
            "Indexed {} radical documents with {} in {:?}",
            documents.len(),
            self.embedding_service.config().model_name(),
            start_time.elapsed()
        );

        RadicalIndex::new(documents, index)
    }
}
