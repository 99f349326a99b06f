//! Document and chunk types

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Arbitrary key-value metadata attached to a document and copied onto its
/// chunks (string keys, scalar/string values).
pub type Metadata = HashMap<String, serde_json::Value>;

/// A document that has been ingested
///
/// Immutable once ingested, except for deletion via `clear()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique document ID
    pub id: Uuid,
    /// Content hash for duplicate re-ingestion detection
    pub content_hash: String,
    /// Number of chunks created from this document
    pub total_chunks: u32,
    /// IDs of the chunks created from this document
    pub chunk_ids: Vec<String>,
    /// Ingestion timestamp
    pub ingested_at: chrono::DateTime<chrono::Utc>,
    /// Caller-supplied metadata
    pub metadata: Metadata,
}

impl Document {
    /// Create a new document record
    pub fn new(content_hash: String, metadata: Metadata) -> Self {
        Self {
            id: Uuid::new_v4(),
            content_hash,
            total_chunks: 0,
            chunk_ids: Vec::new(),
            ingested_at: chrono::Utc::now(),
            metadata,
        }
    }
}

/// A chunk of text derived from exactly one document
///
/// The id is deterministic (`"{document_id}:{chunk_index}"`) so that
/// re-chunking the same document yields the same id sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Chunk ID: parent document id plus sequential index
    pub id: String,
    /// Parent document ID
    pub document_id: Uuid,
    /// Text content (a substring of the parent document)
    pub content: String,
    /// Character offsets into the parent document
    pub char_start: usize,
    pub char_end: usize,
    /// Chunk index within the document
    pub chunk_index: u32,
    /// Parent metadata augmented with the parent id and chunk index
    pub metadata: Metadata,
}

impl Chunk {
    /// Create a new chunk, merging the parent's metadata with the chunk's
    /// own provenance fields.
    pub fn new(
        document_id: Uuid,
        content: String,
        char_start: usize,
        char_end: usize,
        chunk_index: u32,
        parent_metadata: &Metadata,
    ) -> Self {
        let mut metadata = parent_metadata.clone();
        metadata.insert(
            "document_id".to_string(),
            serde_json::json!(document_id.to_string()),
        );
        metadata.insert("chunk_index".to_string(), serde_json::json!(chunk_index));

        Self {
            id: format!("{}:{}", document_id, chunk_index),
            document_id,
            content,
            char_start,
            char_end,
            chunk_index,
            metadata,
        }
    }
}
