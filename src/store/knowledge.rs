//! Knowledge store: document ingestion and retrieval
//!
//! The only component that touches the chunker, the embedding provider, and
//! the vector index directly. Every stored chunk has a matching vector:
//! embedding happens in one batched call per document, and nothing is
//! upserted if that call fails.

use dashmap::DashMap;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::config::RagConfig;
use crate::error::{Error, Result};
use crate::ingestion::TextChunker;
use crate::providers::EmbeddingProvider;
use crate::retrieval::{IndexInfo, ScoredChunk, VectorIndex};
use crate::types::{Chunk, Document, Metadata};

/// Outcome of ingesting one document
#[derive(Debug, Clone)]
pub struct IngestOutcome {
    /// Document ID (None for empty documents, which are a no-op)
    pub document_id: Option<Uuid>,
    /// Chunk ids created, or the existing ids when skipped
    pub chunk_ids: Vec<String>,
    /// True when the content matched an already-ingested document
    pub skipped: bool,
}

impl IngestOutcome {
    fn empty() -> Self {
        Self {
            document_id: None,
            chunk_ids: Vec::new(),
            skipped: false,
        }
    }
}

/// Store statistics
#[derive(Debug, Clone)]
pub struct StoreStats {
    /// Number of ingested documents
    pub document_count: usize,
    /// Number of indexed chunks
    pub chunk_count: usize,
    /// Backing index metadata
    pub index: IndexInfo,
}

/// Knowledge store over a chunker, an embedding provider, and a vector index
pub struct KnowledgeStore {
    chunker: TextChunker,
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<VectorIndex>,
    /// Document registry, persisted next to the index
    documents: DashMap<Uuid, Document>,
    registry_path: PathBuf,
    /// Serializes ingestion and clear; reads proceed concurrently
    write_lock: Mutex<()>,
}

impl KnowledgeStore {
    /// Create a knowledge store from configuration and an embedding provider
    pub fn new(config: &RagConfig, embedder: Arc<dyn EmbeddingProvider>) -> Result<Self> {
        let chunker = TextChunker::new(config.chunking.chunk_size, config.chunking.chunk_overlap)?;
        let index = Arc::new(VectorIndex::open(&config.index, embedder.dimensions())?);

        let registry_path = config.index.storage_path.join("documents.json");
        let documents = Self::load_registry(&registry_path);
        tracing::info!(
            "Knowledge store ready: {} documents, {} chunks",
            documents.len(),
            index.count()
        );

        Ok(Self {
            chunker,
            embedder,
            index,
            documents,
            registry_path,
            write_lock: Mutex::new(()),
        })
    }

    /// Ingest one document: chunk, embed (one batched call), upsert.
    ///
    /// Atomic at the embed-batch granularity: if embedding fails, no chunks
    /// from this document reach the index. An empty document is a no-op and
    /// returns an empty outcome. Content identical to an already-ingested
    /// document is skipped and the existing chunk ids are returned.
    pub async fn add_document(&self, content: &str, metadata: Metadata) -> Result<IngestOutcome> {
        let _guard = self.write_lock.lock().await;
        self.add_document_locked(content, metadata).await
    }

    /// Ingest several documents independently; a failure on one document is
    /// reported in its slot and does not abort the rest.
    pub async fn add_documents_batch(
        &self,
        items: Vec<(String, Metadata)>,
    ) -> Vec<Result<IngestOutcome>> {
        let _guard = self.write_lock.lock().await;

        let mut results = Vec::with_capacity(items.len());
        for (content, metadata) in items {
            let result = self.add_document_locked(&content, metadata).await;
            if let Err(ref e) = result {
                tracing::warn!("Batch item failed: {}", e);
            }
            results.push(result);
        }
        results
    }

    async fn add_document_locked(&self, content: &str, metadata: Metadata) -> Result<IngestOutcome> {
        let spans = self.chunker.chunk(content);
        if spans.is_empty() {
            tracing::debug!("Empty document, nothing to ingest");
            return Ok(IngestOutcome::empty());
        }

        // Deterministic chunking makes the content hash a reliable
        // re-ingestion signal.
        let content_hash = hash_content(content);
        if let Some(existing) = self.find_by_hash(&content_hash) {
            tracing::info!(
                "Skipping duplicate content (hash {}...)",
                &content_hash[..12]
            );
            return Ok(IngestOutcome {
                document_id: Some(existing.id),
                chunk_ids: existing.chunk_ids.clone(),
                skipped: true,
            });
        }

        let mut doc = Document::new(content_hash, metadata.clone());
        let chunks: Vec<Chunk> = spans
            .into_iter()
            .map(|span| {
                Chunk::new(
                    doc.id,
                    span.text,
                    span.char_start,
                    span.char_end,
                    span.index,
                    &metadata,
                )
            })
            .collect();

        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let vectors = self.embedder.embed_batch(&texts).await?;

        // Index corruption guard: a count mismatch would leave chunks
        // without vectors (or vice versa).
        if vectors.len() != chunks.len() {
            return Err(Error::Internal(format!(
                "Embedding returned {} vectors for {} chunks",
                vectors.len(),
                chunks.len()
            )));
        }

        let chunk_ids: Vec<String> = chunks.iter().map(|c| c.id.clone()).collect();
        let batch: Vec<(String, Vec<f32>, Chunk)> = chunks
            .into_iter()
            .zip(vectors)
            .map(|(chunk, vector)| (chunk.id.clone(), vector, chunk))
            .collect();
        self.index.upsert_batch(batch)?;

        doc.total_chunks = chunk_ids.len() as u32;
        doc.chunk_ids = chunk_ids.clone();
        let document_id = doc.id;
        self.documents.insert(document_id, doc);
        self.save_registry();

        tracing::info!("Ingested document {} ({} chunks)", document_id, chunk_ids.len());

        Ok(IngestOutcome {
            document_id: Some(document_id),
            chunk_ids,
            skipped: false,
        })
    }

    /// Retrieve the `k` chunks most similar to the query text.
    /// An empty index yields an empty result, not an error.
    pub async fn retrieve(&self, query_text: &str, k: usize) -> Result<Vec<ScoredChunk>> {
        if self.index.count() == 0 {
            return Ok(Vec::new());
        }

        let query_vector = self.embedder.embed(query_text).await?;
        self.index.query(&query_vector, k)
    }

    /// Store statistics. Document count is tracked independently of chunk
    /// count since one document yields N >= 0 chunks.
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            document_count: self.documents.len(),
            chunk_count: self.index.count(),
            index: self.index.info(),
        }
    }

    /// Remove every document and chunk. Exclusive: waits for in-flight
    /// ingestion, and index readers drain before the index empties.
    pub async fn clear(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        self.index.delete_all()?;
        self.documents.clear();
        self.save_registry();

        tracing::info!("Knowledge store cleared");
        Ok(())
    }

    fn find_by_hash(&self, content_hash: &str) -> Option<Document> {
        self.documents
            .iter()
            .find(|entry| entry.value().content_hash == content_hash)
            .map(|entry| entry.value().clone())
    }

    /// Load the document registry from disk
    fn load_registry(path: &PathBuf) -> DashMap<Uuid, Document> {
        let documents = DashMap::new();

        if path.exists() {
            match fs::read_to_string(path) {
                Ok(content) => match serde_json::from_str::<Vec<Document>>(&content) {
                    Ok(docs) => {
                        for doc in docs {
                            documents.insert(doc.id, doc);
                        }
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse documents.json: {}", e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read documents.json: {}", e);
                }
            }
        }

        documents
    }

    /// Save the document registry to disk
    fn save_registry(&self) {
        let docs: Vec<Document> = self.documents.iter().map(|e| e.value().clone()).collect();

        match serde_json::to_string_pretty(&docs) {
            Ok(content) => {
                if let Err(e) = fs::write(&self.registry_path, content) {
                    tracing::error!("Failed to save documents.json: {}", e);
                }
            }
            Err(e) => {
                tracing::error!("Failed to serialize documents: {}", e);
            }
        }
    }
}

/// Content hash for duplicate re-ingestion detection
fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}
