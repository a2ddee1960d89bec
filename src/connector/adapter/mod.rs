mod csv_radical_repository;
mod flat_l2_index;
mod json_kanji_repository;
mod jsonl_mnemonic_archive;
mod mock_embedding;
mod mock_generator;
mod ollama_generator;
mod ort_embedding;
mod svg_stroke_store;

pub use csv_radical_repository::*;
pub use flat_l2_index::*;
pub use json_kanji_repository::*;
pub use jsonl_mnemonic_archive::*;
pub use mock_embedding::*;
pub use mock_generator::*;
pub use ollama_generator::*;
pub use ort_embedding::*;
pub use svg_stroke_store::*;
