//! Pure domain services: no I/O, no model calls.

pub mod mnemonic_normalizer;
pub mod prompt_builder;
pub mod stroke_order;

pub use mnemonic_normalizer::{
    fallback_line, normalize_line, normalize_response, PLACEHOLDER_LHS,
};
pub use prompt_builder::{build_prompt, join_context};
pub use stroke_order::{inject_stroke_style, sanitize_svg, StrokeStyle};
