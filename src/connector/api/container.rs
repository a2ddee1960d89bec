use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::application::{
    BuildRadicalIndexUseCase, EmbeddingService, GenerateMnemonicUseCase, GenerationParams,
    KanjiRepository, LookupKanjiUseCase, MnemonicArchive, RadicalIndex, RadicalRepository,
    RetrieveRadicalsUseCase, StrokeDiagramRepository, TextGenerator, VectorIndex, DEFAULT_TOP_K,
};
use crate::connector::adapter::{
    CsvRadicalRepository, FlatL2Index, JsonKanjiRepository, JsonlMnemonicArchive, MockEmbedding,
    MockGenerator, OllamaGenerator, OrtEmbedding, SvgStrokeStore,
};
use crate::domain::DomainError;

#[derive(Debug, Clone)]
pub struct ContainerConfig {
    /// Directory holding the kanji JSON, radical snapshots, stroke diagrams
    /// and the mnemonic archive.
    pub data_dir: PathBuf,
    pub mock_embeddings: bool,
    /// Answer every prompt with an empty completion instead of calling Ollama.
    pub mock_generator: bool,
    pub top_k: usize,
    pub generation: GenerationParams,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            mock_embeddings: false,
            mock_generator: false,
            top_k: DEFAULT_TOP_K,
            generation: GenerationParams::default(),
        }
    }
}

/// Process-wide dependencies.
///
/// Expensive resources (embedding model, radical index, generator client) are
/// created on first use, at most once, and shared afterwards. An embedder or
/// generator that cannot start is remembered as absent so later requests
/// degrade without retrying.
pub struct Container {
    config: ContainerConfig,
    kanji_repo: Arc<JsonKanjiRepository>,
    archive: Arc<JsonlMnemonicArchive>,
    radical_repo: Arc<CsvRadicalRepository>,
    strokes: Arc<SvgStrokeStore>,
    embedding_service: OnceCell<Option<Arc<dyn EmbeddingService>>>,
    radical_index: OnceCell<Arc<RadicalIndex>>,
    generator: OnceCell<Option<Arc<dyn TextGenerator>>>,
}

impl Container {
    pub fn new(config: ContainerConfig) -> Self {
        let data_dir = config.data_dir.as_path();
        Self {
            kanji_repo: Arc::new(JsonKanjiRepository::in_data_dir(data_dir)),
            archive: Arc::new(JsonlMnemonicArchive::in_data_dir(data_dir)),
            radical_repo: Arc::new(CsvRadicalRepository::new(data_dir)),
            strokes: Arc::new(SvgStrokeStore::in_data_dir(data_dir)),
            embedding_service: OnceCell::new(),
            radical_index: OnceCell::new(),
            generator: OnceCell::new(),
            config,
        }
    }

    /// Use `embedding_service` instead of building one from the config.
    pub fn with_embedding_service(mut self, embedding_service: Arc<dyn EmbeddingService>) -> Self {
        self.embedding_service = OnceCell::new_with(Some(Some(embedding_service)));
        self
    }

    /// Use `generator` instead of building one from the config.
    pub fn with_generator(mut self, generator: Arc<dyn TextGenerator>) -> Self {
        self.generator = OnceCell::new_with(Some(Some(generator)));
        self
    }

    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    pub fn data_dir(&self) -> &Path {
        &self.config.data_dir
    }

    pub fn kanji_repository(&self) -> Arc<dyn KanjiRepository> {
        self.kanji_repo.clone()
    }

    pub fn mnemonic_archive(&self) -> Arc<dyn MnemonicArchive> {
        self.archive.clone()
    }

    pub fn radical_repository(&self) -> Arc<dyn RadicalRepository> {
        self.radical_repo.clone()
    }

    pub fn stroke_store(&self) -> Arc<dyn StrokeDiagramRepository> {
        self.strokes.clone()
    }

    pub async fn embedding_service(&self) -> Option<Arc<dyn EmbeddingService>> {
        self.embedding_service
            .get_or_init(|| async {
                if self.config.mock_embeddings {
                    debug!("Using mock embedding service");
                    return Some(Arc::new(MockEmbedding::new()) as Arc<dyn EmbeddingService>);
                }

                debug!("Initializing ONNX embedding service...");
                let loaded = tokio::task::spawn_blocking(|| OrtEmbedding::new(None))
                    .await
                    .map_err(|e| DomainError::internal(format!("Embedder task failed: {}", e)))
                    .and_then(|result| result);
                match loaded {
                    Ok(service) => Some(Arc::new(service) as Arc<dyn EmbeddingService>),
                    Err(e) => {
                        warn!(
                            "Failed to initialize embedding service: {}. Continuing without retrieval.",
                            e
                        );
                        None
                    }
                }
            })
            .await
            .clone()
    }

    /// The radical index, built on first call. Never fails: any problem
    /// leaves the index empty.
    pub async fn radical_index(&self) -> Arc<RadicalIndex> {
        self.radical_index
            .get_or_init(|| async { Arc::new(self.build_radical_index().await) })
            .await
            .clone()
    }

    async fn build_radical_index(&self) -> RadicalIndex {
        if self.radical_repo.snapshot_path().is_none() {
            debug!("No radical snapshot in {:?}", self.config.data_dir);
            return RadicalIndex::empty();
        }

        let Some(embedding_service) = self.embedding_service().await else {
            return RadicalIndex::empty();
        };

        let use_case = BuildRadicalIndexUseCase::new(self.radical_repo.clone(), embedding_service);
        let built = use_case
            .execute(|dimensions, vectors| {
                let index = FlatL2Index::build(dimensions, vectors)?;
                Ok(Arc::new(index) as Arc<dyn VectorIndex>)
            })
            .await;

        match built {
            Ok(index) => index,
            Err(e) => {
                warn!("Failed to build radical index: {}. Retrieval disabled.", e);
                RadicalIndex::empty()
            }
        }
    }

    pub async fn generator(&self) -> Option<Arc<dyn TextGenerator>> {
        self.generator
            .get_or_init(|| async {
                if self.config.mock_generator {
                    debug!("Using mock generator");
                    return Some(Arc::new(MockGenerator::responding("")) as Arc<dyn TextGenerator>);
                }

                match OllamaGenerator::from_env() {
                    Ok(generator) => {
                        debug!(
                            "Using Ollama model {} at {}",
                            generator.model_name(),
                            generator.base_url()
                        );
                        Some(Arc::new(generator.with_params(self.config.generation))
                            as Arc<dyn TextGenerator>)
                    }
                    Err(e) => {
                        warn!("Failed to initialize generator: {}", e);
                        None
                    }
                }
            })
            .await
            .clone()
    }

    pub async fn retrieve_radicals_use_case(&self) -> RetrieveRadicalsUseCase {
        let index = self.radical_index().await;
        if index.is_empty() {
            return RetrieveRadicalsUseCase::disabled();
        }
        match self.embedding_service().await {
            Some(embedding_service) => RetrieveRadicalsUseCase::new(index, embedding_service),
            None => RetrieveRadicalsUseCase::disabled(),
        }
    }

    pub async fn generate_mnemonic_use_case(&self) -> GenerateMnemonicUseCase {
        let retriever = Arc::new(self.retrieve_radicals_use_case().await);
        GenerateMnemonicUseCase::new(self.kanji_repository(), retriever, self.generator().await)
            .with_top_k(self.config.top_k)
    }

    pub fn lookup_kanji_use_case(&self) -> LookupKanjiUseCase {
        LookupKanjiUseCase::new(self.kanji_repository())
            .with_archive(self.mnemonic_archive())
            .with_strokes(self.stroke_store())
    }
}
