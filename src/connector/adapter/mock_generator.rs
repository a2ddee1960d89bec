use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::application::TextGenerator;
use crate::domain::DomainError;

enum Scripted {
    Respond(String),
    Fail(String),
    Unavailable(String),
}

/// Generator with a scripted answer, for tests and offline runs.
pub struct MockGenerator {
    script: Scripted,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
}

impl MockGenerator {
    pub fn responding(response: impl Into<String>) -> Self {
        Self::with_script(Scripted::Respond(response.into()))
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_script(Scripted::Fail(message.into()))
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::with_script(Scripted::Unavailable(message.into()))
    }

    fn with_script(script: Scripted) -> Self {
        Self {
            script,
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().ok().and_then(|p| p.clone())
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_prompt.lock() {
            *last = Some(prompt.to_string());
        }

        match &self.script {
            Scripted::Respond(response) => Ok(response.clone()),
            Scripted::Fail(message) => Err(DomainError::generation(message.clone())),
            Scripted::Unavailable(message) => Err(DomainError::unavailable(message.clone())),
        }
    }

    fn model_name(&self) -> &str {
        "mock-generator"
    }
}
