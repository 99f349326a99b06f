//! Query request types

use serde::{Deserialize, Serialize};

/// Query request for the answer pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    /// The question to answer
    pub question: String,

    /// Number of chunks to retrieve; falls back to the configured default
    /// when absent, and is clamped to the configured maximum.
    #[serde(default)]
    pub top_k: Option<usize>,
}

impl QueryRequest {
    /// Create a new query
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            top_k: None,
        }
    }

    /// Set the number of chunks to retrieve
    pub fn with_top_k(mut self, k: usize) -> Self {
        self.top_k = Some(k);
        self
    }
}

/// A single document in an ingestion request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestRequest {
    /// Raw text content (already decoded)
    pub content: String,

    /// Arbitrary metadata to attach to the document
    #[serde(default)]
    pub metadata: crate::types::Metadata,
}
