mod embedding_service;
mod kanji_repository;
mod mnemonic_archive;
mod radical_repository;
mod stroke_diagram_repository;
mod text_generator;
mod vector_index;

pub use embedding_service::*;
pub use kanji_repository::*;
pub use mnemonic_archive::*;
pub use radical_repository::*;
pub use stroke_diagram_repository::*;
pub use text_generator::*;
pub use vector_index::*;
