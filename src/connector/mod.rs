//! # Connector Layer
//!
//! Adapters implementing the application interfaces:
//! - Embeddings (ONNX Runtime, deterministic mock)
//! - Exact L2 vector index
//! - Text generation (Ollama, scripted mock)
//! - File stores for kanji data, radical snapshots, stroke diagrams and saved
//!   mnemonics
//!
//! plus the lazy dependency container.

pub mod adapter;
pub mod api;

pub use adapter::*;
pub use api::*;
