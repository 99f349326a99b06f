//! Ollama HTTP client for embeddings and answer generation with retry logic

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;

use crate::config::LlmConfig;
use crate::error::{Error, Result};

/// Ollama API client with automatic retry
///
/// The request timeout doubles as the backend-unavailable signal: a timed-out
/// call fails like an unreachable backend instead of hanging the pipeline.
pub struct OllamaClient {
    /// HTTP client
    client: Client,
    /// Configuration
    config: LlmConfig,
    /// Maximum retries
    max_retries: u32,
}

#[derive(Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Serialize)]
struct EmbedRequest {
    model: String,
    prompt: String,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embedding: Vec<f32>,
}

impl OllamaClient {
    /// Create a new Ollama client with retry support
    pub fn new(config: &LlmConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(5)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            max_retries: config.max_retries,
            config: config.clone(),
        }
    }

    /// Retry a request with exponential backoff
    async fn retry_request<F, Fut, T>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    last_error = Some(e);
                    if attempt < self.max_retries {
                        let delay = Duration::from_secs(2u64.pow(attempt));
                        tracing::warn!(
                            "Request failed (attempt {}/{}), retrying in {:?}",
                            attempt + 1,
                            self.max_retries + 1,
                            delay
                        );
                        sleep(delay).await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| Error::Generation("Unknown error".to_string())))
    }

    /// Check if Ollama is available
    pub async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/api/tags", self.config.base_url);

        match self.client.get(&url).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    /// Generate an embedding with retry
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let url = format!("{}/api/embeddings", self.config.base_url);
        let text = text.to_string();
        let model = self.config.embed_model.clone();
        let client = self.client.clone();

        self.retry_request(|| {
            let url = url.clone();
            let text = text.clone();
            let model = model.clone();
            let client = client.clone();

            async move {
                let request = EmbedRequest {
                    model,
                    prompt: text,
                };

                let response = client
                    .post(&url)
                    .json(&request)
                    .send()
                    .await
                    .map_err(|e| Error::Embedding(format!("Embedding request failed: {}", e)))?;

                if !response.status().is_success() {
                    return Err(Error::Embedding(format!(
                        "Embedding failed: HTTP {}",
                        response.status()
                    )));
                }

                let embed_response: EmbedResponse = response.json().await.map_err(|e| {
                    Error::Embedding(format!("Failed to parse embedding response: {}", e))
                })?;

                Ok(embed_response.embedding)
            }
        })
        .await
    }

    /// Generate a completion for a prompt with retry
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/api/generate", self.config.base_url);
        let model = self.config.generate_model.clone();
        let temperature = self.config.temperature;
        let client = self.client.clone();
        let prompt = prompt.to_string();

        tracing::info!("Generating answer with model: {}", model);

        self.retry_request(|| {
            let url = url.clone();
            let prompt = prompt.clone();
            let model = model.clone();
            let client = client.clone();

            async move {
                let request = GenerateRequest {
                    model,
                    prompt,
                    stream: false,
                    options: GenerateOptions { temperature },
                };

                let response = client
                    .post(&url)
                    .json(&request)
                    .send()
                    .await
                    .map_err(|e| Error::Generation(format!("Generation request failed: {}", e)))?;

                if !response.status().is_success() {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    return Err(Error::Generation(format!(
                        "Generation failed: HTTP {} - {}",
                        status, body
                    )));
                }

                let generate_response: GenerateResponse = response.json().await.map_err(|e| {
                    Error::Generation(format!("Failed to parse generation response: {}", e))
                })?;

                Ok(generate_response.response)
            }
        })
        .await
    }
}
