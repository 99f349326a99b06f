//! Response types for queries, ingestion, and statistics

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::retrieval::{IndexInfo, ScoredChunk};
use crate::types::document::Metadata;

/// A source chunk that contributed to an answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceChunk {
    /// Chunk ID
    pub chunk_id: String,
    /// Chunk text
    pub text: String,
    /// Chunk metadata (parent document id, chunk index, caller metadata)
    pub metadata: Metadata,
    /// Similarity score (higher is more similar)
    pub score: f32,
}

impl SourceChunk {
    /// Create a source entry from a retrieval result
    pub fn from_scored(result: &ScoredChunk) -> Self {
        Self {
            chunk_id: result.chunk.id.clone(),
            text: result.chunk.content.clone(),
            metadata: result.chunk.metadata.clone(),
            score: result.score,
        }
    }
}

/// Response from a query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    /// Generated or fallback answer text
    pub answer: String,
    /// The question that was answered
    pub query: String,
    /// Chunks actually used to produce the answer, ordered by score
    pub sources: Vec<SourceChunk>,
    /// Whether a backend was unavailable and the answer was produced by
    /// the fallback formatter
    pub degraded: bool,
}

/// Response from ingesting a single document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestResponse {
    /// Document ID (absent for empty documents, which are a no-op)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_id: Option<Uuid>,
    /// IDs of the chunks created (or already present, if skipped)
    pub chunk_ids: Vec<String>,
    /// Number of chunks
    pub chunk_count: usize,
    /// True if the content matched an already-ingested document and was
    /// not re-embedded
    pub skipped: bool,
}

/// Per-item result of a batch ingestion; a failure on one item never
/// aborts the batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BatchItemResult {
    /// Item ingested (or skipped as a duplicate)
    Ok {
        #[serde(skip_serializing_if = "Option::is_none")]
        document_id: Option<Uuid>,
        chunk_ids: Vec<String>,
        chunk_count: usize,
        skipped: bool,
    },
    /// Item failed; the rest of the batch proceeded
    Error { error: String },
}

/// Response from `GET /api/stats`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    /// Number of ingested documents
    pub document_count: usize,
    /// Number of indexed chunks
    pub chunk_count: usize,
    /// Backing index metadata
    pub index: IndexInfo,
}

/// Response from clearing the knowledge base
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClearResponse {
    pub cleared: bool,
}
