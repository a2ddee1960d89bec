use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Sampling settings for a single completion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub max_new_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub do_sample: bool,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_new_tokens: 80,
            temperature: 0.4,
            top_p: 0.8,
            do_sample: true,
        }
    }
}

/// Text completion backed by a causal language model.
///
/// Implementations return only the newly generated continuation, never the
/// prompt. Any backend problem is an `Err`; an empty `Ok` means the model
/// really produced nothing.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, DomainError>;

    fn model_name(&self) -> &str;
}
