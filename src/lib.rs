pub mod application;
pub mod connector;
pub mod domain;

pub use application::{
    BuildRadicalIndexUseCase, EmbeddingService, GenerateMnemonicUseCase, GenerationParams,
    KanjiDetails, KanjiRepository, LookupKanjiUseCase, MnemonicArchive, RadicalIndex,
    RadicalRepository, RetrieveRadicalsUseCase, StrokeDiagramRepository, TextGenerator,
    VectorIndex,
};

pub use connector::{
    Container, ContainerConfig, CsvRadicalRepository, FlatL2Index, JsonKanjiRepository,
    JsonlMnemonicArchive, MockEmbedding, MockGenerator, OllamaGenerator, OrtEmbedding,
    SvgStrokeStore,
};

pub use domain::{
    DegradeReason, DomainError, Embedding, EmbeddingConfig, JlptLevel, KanjiRecord,
    MnemonicLine, MnemonicOutcome, Neighbor, RadicalDocument, SavedMnemonic, StrokeStyle,
};
