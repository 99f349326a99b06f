//! LLM provider trait for answer generation

use async_trait::async_trait;

use crate::error::Result;

/// Trait for LLM-based answer generation
///
/// Backend failure is `Error::Generation`; the answer pipeline recovers from
/// it locally via the degraded fallback, so it never reaches the end user as
/// a hard failure.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate an answer given a question and assembled context
    async fn generate_answer(&self, question: &str, context: &str) -> Result<String>;

    /// Check if the provider is healthy and available
    async fn health_check(&self) -> Result<bool>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// The model being used
    fn model(&self) -> &str;
}
