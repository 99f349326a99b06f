//! Ollama-based providers for embeddings and answer generation
//!
//! Wraps the OllamaClient to implement the provider traits.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::LlmConfig;
use crate::error::Result;
use crate::generation::{OllamaClient, PromptBuilder};

use super::embedding::EmbeddingProvider;
use super::llm::LlmProvider;

/// Ollama embedding provider using nomic-embed-text or similar models
pub struct OllamaEmbedder {
    client: Arc<OllamaClient>,
    dimensions: usize,
    model: String,
}

impl OllamaEmbedder {
    /// Create a new Ollama embedder
    pub fn new(config: &LlmConfig, dimensions: usize) -> Self {
        Self {
            client: Arc::new(OllamaClient::new(config)),
            dimensions,
            model: config.embed_model.clone(),
        }
    }

    /// Create from an existing client
    pub fn from_client(client: Arc<OllamaClient>, dimensions: usize, model: String) -> Self {
        Self {
            client,
            dimensions,
            model,
        }
    }

    /// The embedding model name
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        // Ollama has no native batch endpoint, so we call sequentially.
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.client.embed(text).await?);
        }
        Ok(embeddings)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn health_check(&self) -> Result<bool> {
        self.client.health_check().await
    }

    fn name(&self) -> &str {
        "ollama"
    }
}

/// Ollama LLM provider for answer generation
pub struct OllamaLlm {
    client: Arc<OllamaClient>,
    model: String,
}

impl OllamaLlm {
    /// Create a new Ollama LLM provider
    pub fn new(config: &LlmConfig) -> Self {
        Self {
            client: Arc::new(OllamaClient::new(config)),
            model: config.generate_model.clone(),
        }
    }

    /// Create from an existing client
    pub fn from_client(client: Arc<OllamaClient>, model: String) -> Self {
        Self { client, model }
    }
}

#[async_trait]
impl LlmProvider for OllamaLlm {
    async fn generate_answer(&self, question: &str, context: &str) -> Result<String> {
        let prompt = PromptBuilder::build_rag_prompt(question, context);
        self.client.generate(&prompt).await
    }

    async fn health_check(&self) -> Result<bool> {
        self.client.health_check().await
    }

    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Combined Ollama provider that shares a single client for both concerns
pub struct OllamaProvider {
    embedder: Arc<OllamaEmbedder>,
    llm: Arc<OllamaLlm>,
}

impl OllamaProvider {
    /// Create a new combined Ollama provider
    pub fn new(config: &LlmConfig, dimensions: usize) -> Self {
        let client = Arc::new(OllamaClient::new(config));
        Self {
            embedder: Arc::new(OllamaEmbedder::from_client(
                Arc::clone(&client),
                dimensions,
                config.embed_model.clone(),
            )),
            llm: Arc::new(OllamaLlm::from_client(client, config.generate_model.clone())),
        }
    }

    /// Get the embedding provider
    pub fn embedder(&self) -> Arc<OllamaEmbedder> {
        Arc::clone(&self.embedder)
    }

    /// Get the LLM provider
    pub fn llm(&self) -> Arc<OllamaLlm> {
        Arc::clone(&self.llm)
    }
}
