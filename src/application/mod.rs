//! # Application Layer
//!
//! Trait seams for the outside world and the use cases that orchestrate
//! retrieval, prompting, generation and lookup.

pub mod interfaces;
pub mod use_cases;

pub use interfaces::*;
pub use use_cases::*;
