//! Embedding provider trait for mapping text to vectors

use async_trait::async_trait;

use crate::error::{Error, Result};

/// Trait for generating text embeddings
///
/// Implementations may need a one-time, potentially slow initialization on
/// first use (model load); callers tolerate that latency rather than treat it
/// as a fault. Backend failure is `Error::Embedding`, never a silently
/// substituted zero vector.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate embeddings for multiple texts, one vector per input string,
    /// order-preserving.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Generate an embedding for a single text (a one-item batch)
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let texts = [text.to_string()];
        let mut vectors = self.embed_batch(&texts).await?;
        vectors
            .pop()
            .ok_or_else(|| Error::Embedding("Backend returned no vector".to_string()))
    }

    /// Embedding dimensionality, fixed per model identifier
    fn dimensions(&self) -> usize;

    /// Check if the provider is healthy and available
    async fn health_check(&self) -> Result<bool>;

    /// Provider name for logging
    fn name(&self) -> &str;
}
