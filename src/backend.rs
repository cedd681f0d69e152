use std::time::Instant;

use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use thiserror::Error;
use tracing::debug;

use crate::config::BackendConfig;
use crate::metrics::{BACKEND_FAILURES, BACKEND_LATENCY};
use crate::models::{GenerateRequest, GenerateResponse};

/// Failure of a single generate call, by stage.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("can not create POST request: {0}")]
    Request(#[source] reqwest::Error),
    #[error("request to ollama failed: {0}")]
    Network(#[source] reqwest::Error),
    #[error("ollama returned status {0}")]
    Status(u16),
    #[error("can not decode ollama response: {0}")]
    Decode(#[source] reqwest::Error),
}

// Thin client for the Ollama generate endpoint
#[derive(Clone)]
pub struct OllamaClient {
    client: reqwest::Client,
    config: BackendConfig,
}

impl OllamaClient {
    pub fn new(client: reqwest::Client, config: BackendConfig) -> Self {
        Self { client, config }
    }

    // One non-streaming generate call, transport default timeouts only
    pub async fn generate(&self, model: &str, prompt: &str) -> Result<GenerateResponse, BackendError> {
        let result = self.call(model, prompt).await;
        if result.is_err() {
            BACKEND_FAILURES.inc();
        }
        result
    }

    async fn call(&self, model: &str, prompt: &str) -> Result<GenerateResponse, BackendError> {
        let request = self
            .client
            .post(self.config.generate_url())
            .header(CONTENT_TYPE, "application/json")
            .json(&GenerateRequest::new(model, prompt))
            .build()
            .map_err(BackendError::Request)?;

        let start = Instant::now();
        let res = self
            .client
            .execute(request)
            .await
            .map_err(BackendError::Network)?;
        BACKEND_LATENCY.observe(start.elapsed().as_secs_f64());

        let status = res.status();
        debug!(
            model,
            status = status.as_u16(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "ollama generate returned"
        );
        if status != StatusCode::OK {
            return Err(BackendError::Status(status.as_u16()));
        }

        res.json::<GenerateResponse>()
            .await
            .map_err(BackendError::Decode)
    }
}
