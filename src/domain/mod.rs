//! # Domain Layer
//!
//! Core models, the error type, and the pure text services (prompt building,
//! response normalization, stroke-order SVG clean-up).
//! This layer is independent of external frameworks and infrastructure.

mod error;
pub mod models;
pub mod services;

pub use error::*;
pub use models::*;
pub use services::*;
