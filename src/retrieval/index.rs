//! Persistent cosine-similarity vector index
//!
//! A flat index over chunk vectors, held in memory and snapshotted to a JSON
//! file so entries survive a clean shutdown/restart cycle at the same storage
//! location. Single-writer ownership per storage path is assumed; concurrent
//! readers are fine.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::config::IndexConfig;
use crate::error::{Error, Result};
use crate::types::Chunk;

/// A retrieval result: a chunk with its similarity score
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    /// The retrieved chunk
    pub chunk: Chunk,
    /// Cosine similarity (higher is more similar)
    pub score: f32,
}

/// Backing index metadata, surfaced through `stats()`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexInfo {
    /// Backend identifier
    pub backend: String,
    /// Storage directory
    pub storage_path: String,
    /// Collection name
    pub collection: String,
    /// Vector dimensionality
    pub dimensions: usize,
}

/// One stored entry: a chunk id, its vector, and the chunk itself.
/// The chunk is stored alongside the vector so retrieval can resolve ids
/// back to full chunks without a second store.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct IndexEntry {
    chunk_id: String,
    vector: Vec<f32>,
    chunk: Chunk,
}

/// Persistent flat cosine index
pub struct VectorIndex {
    /// Snapshot file (`<storage_path>/<collection>.json`)
    file_path: PathBuf,
    collection: String,
    /// Fixed for the lifetime of the index; mixing embedding models without
    /// reindexing is rejected at upsert time.
    dimensions: usize,
    /// Entries in insertion order. Re-upserting an id replaces the entry in
    /// place, so insertion order is stable and score ties resolve to the
    /// earlier-inserted entry.
    entries: RwLock<Vec<IndexEntry>>,
}

impl VectorIndex {
    /// Open (or create) the index at the configured storage location
    pub fn open(config: &IndexConfig, dimensions: usize) -> Result<Self> {
        fs::create_dir_all(&config.storage_path)?;
        let file_path = config
            .storage_path
            .join(format!("{}.json", config.collection));

        let entries = if file_path.exists() {
            let data = fs::read_to_string(&file_path)?;
            let loaded: Vec<IndexEntry> = serde_json::from_str(&data)
                .map_err(|e| Error::Index(format!("Corrupt index file: {}", e)))?;

            if let Some(bad) = loaded.iter().find(|e| e.vector.len() != dimensions) {
                return Err(Error::Index(format!(
                    "Index at {} holds {}-dimensional vectors (entry {}), expected {}; reindex required",
                    file_path.display(),
                    bad.vector.len(),
                    bad.chunk_id,
                    dimensions
                )));
            }

            tracing::info!("Loaded {} entries from {}", loaded.len(), file_path.display());
            loaded
        } else {
            Vec::new()
        };

        Ok(Self {
            file_path,
            collection: config.collection.clone(),
            dimensions,
            entries: RwLock::new(entries),
        })
    }

    /// Insert or replace the entry for `chunk_id`. Re-upserting the same id
    /// is idempotent: the entry count is unchanged and the entry keeps its
    /// original insertion position.
    pub fn upsert(&self, chunk_id: &str, vector: Vec<f32>, chunk: Chunk) -> Result<()> {
        self.upsert_batch(vec![(chunk_id.to_string(), vector, chunk)])
    }

    /// Upsert a batch of entries with a single snapshot write
    pub fn upsert_batch(&self, batch: Vec<(String, Vec<f32>, Chunk)>) -> Result<()> {
        if batch.is_empty() {
            return Ok(());
        }

        {
            let mut entries = self.entries.write();
            for (chunk_id, vector, chunk) in batch {
                if vector.len() != self.dimensions {
                    return Err(Error::Index(format!(
                        "Vector for {} has {} dimensions, index expects {}",
                        chunk_id,
                        vector.len(),
                        self.dimensions
                    )));
                }

                let entry = IndexEntry {
                    chunk_id: chunk_id.clone(),
                    vector,
                    chunk,
                };
                match entries.iter_mut().find(|e| e.chunk_id == chunk_id) {
                    Some(existing) => *existing = entry,
                    None => entries.push(entry),
                }
            }
        }

        self.persist()
    }

    /// Return the `k` most similar entries to `vector`, ordered by cosine
    /// similarity descending. Ties resolve to the earlier-inserted entry;
    /// `k` is clamped to the index size.
    pub fn query(&self, vector: &[f32], k: usize) -> Result<Vec<ScoredChunk>> {
        let entries = self.entries.read();
        if entries.is_empty() {
            return Ok(Vec::new());
        }

        if vector.len() != self.dimensions {
            return Err(Error::Index(format!(
                "Query vector has {} dimensions, index expects {}",
                vector.len(),
                self.dimensions
            )));
        }

        let mut scored: Vec<(usize, f32)> = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (i, cosine_similarity(vector, &e.vector)))
            .collect();

        // Stable sort: equal scores keep insertion order.
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);

        Ok(scored
            .into_iter()
            .map(|(i, score)| ScoredChunk {
                chunk: entries[i].chunk.clone(),
                score,
            })
            .collect())
    }

    /// Remove every entry
    pub fn delete_all(&self) -> Result<()> {
        self.entries.write().clear();
        self.persist()
    }

    /// Current number of entries
    pub fn count(&self) -> usize {
        self.entries.read().len()
    }

    /// Backing metadata for statistics reporting
    pub fn info(&self) -> IndexInfo {
        IndexInfo {
            backend: "flat-cosine".to_string(),
            storage_path: self
                .file_path
                .parent()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            collection: self.collection.clone(),
            dimensions: self.dimensions,
        }
    }

    /// Write the current entries to the snapshot file
    fn persist(&self) -> Result<()> {
        let entries = self.entries.read();
        let data = serde_json::to_string(&*entries)?;
        fs::write(&self.file_path, data)?;
        Ok(())
    }
}

/// Cosine similarity; zero-magnitude vectors score 0.0 against everything.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
