use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::application::{GenerationParams, TextGenerator};
use crate::domain::DomainError;

/// Default target: Ollama running locally on its standard port.
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";
/// Small instruction-tuned model that runs acceptably on CPU.
pub const DEFAULT_MODEL: &str = "qwen2.5:1.5b";
const GENERATE_PATH: &str = "/api/generate";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);
const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    num_predict: u32,
    temperature: f32,
    top_p: f32,
}

impl From<GenerationParams> for GenerateOptions {
    fn from(params: GenerationParams) -> Self {
        Self {
            num_predict: params.max_new_tokens,
            temperature: if params.do_sample {
                params.temperature
            } else {
                0.0
            },
            top_p: params.top_p,
        }
    }
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

/// Text generation through a local Ollama server.
///
/// Only the continuation is returned; Ollama never echoes the prompt in
/// `response`. Override the defaults through the environment:
///
/// ```text
/// OLLAMA_BASE_URL=http://gpu-box:11434
/// OLLAMA_MODEL=qwen2.5:3b
/// ```
///
/// Each call first sends a `HEAD /` probe with a 2-second timeout so an absent
/// server is reported immediately instead of after the long request timeout.
pub struct OllamaGenerator {
    client: reqwest::Client,
    probe_client: reqwest::Client,
    model: String,
    url: String,
    base_url: String,
    params: GenerationParams,
}

impl OllamaGenerator {
    pub fn new(model: impl Into<String>, base_url: impl Into<String>) -> Result<Self, DomainError> {
        let base: String = base_url.into();
        let trimmed = base.trim_end_matches('/');

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| DomainError::unavailable(format!("Failed to build HTTP client: {e}")))?;
        let probe_client = reqwest::Client::builder()
            .connect_timeout(PROBE_TIMEOUT)
            .timeout(PROBE_TIMEOUT)
            .build()
            .map_err(|e| DomainError::unavailable(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            probe_client,
            model: model.into(),
            url: format!("{trimmed}{GENERATE_PATH}"),
            base_url: format!("{trimmed}/"),
            params: GenerationParams::default(),
        })
    }

    /// | Variable          | Default                  |
    /// |-------------------|--------------------------|
    /// | `OLLAMA_BASE_URL` | `http://localhost:11434` |
    /// | `OLLAMA_MODEL`    | `qwen2.5:1.5b`           |
    pub fn from_env() -> Result<Self, DomainError> {
        let base =
            std::env::var("OLLAMA_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let model = std::env::var("OLLAMA_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Self::new(model, base)
    }

    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    async fn probe(&self) -> Result<(), DomainError> {
        // any HTTP status means the server is up
        match self.probe_client.head(&self.base_url).send().await {
            Err(e) if e.is_connect() || e.is_timeout() => Err(DomainError::unavailable(format!(
                "Ollama not reachable at {}: {e}",
                self.base_url()
            ))),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl TextGenerator for OllamaGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, DomainError> {
        self.probe().await?;

        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: self.params.into(),
        };

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| DomainError::generation(format!("Ollama request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("Ollama returned {status}: {body}");
            return Err(DomainError::generation(format!("Ollama returned {status}")));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| DomainError::generation(format!("Failed to parse Ollama response: {e}")))?;

        debug!("Ollama produced {} characters", body.response.chars().count());
        Ok(body.response)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_follow_generation_params() {
        let options = GenerateOptions::from(GenerationParams::default());
        assert_eq!(options.num_predict, 80);
        assert_eq!(options.temperature, 0.4);
        assert_eq!(options.top_p, 0.8);
    }

    #[test]
    fn greedy_decoding_forces_zero_temperature() {
        let params = GenerationParams {
            do_sample: false,
            ..GenerationParams::default()
        };
        assert_eq!(GenerateOptions::from(params).temperature, 0.0);
    }

    #[test]
    fn request_body_shape() {
        let request = GenerateRequest {
            model: "qwen2.5:1.5b",
            prompt: "hi",
            stream: false,
            options: GenerationParams::default().into(),
        };
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["stream"], false);
        assert_eq!(json["model"], "qwen2.5:1.5b");
        assert_eq!(json["options"]["num_predict"], 80);
    }

    #[test]
    fn trailing_slash_in_base_url_is_ignored() {
        let generator = OllamaGenerator::new("m", "http://localhost:11434/").unwrap();
        assert_eq!(generator.url, "http://localhost:11434/api/generate");
        assert_eq!(generator.base_url(), "http://localhost:11434");
    }

    #[tokio::test]
    async fn unreachable_server_reports_unavailable() {
        // port 9 (discard) is closed on test machines
        let generator = OllamaGenerator::new("m", "http://127.0.0.1:9").unwrap();
        let err = generator.generate("prompt").await.unwrap_err();
        assert!(err.is_unavailable());
    }
}
