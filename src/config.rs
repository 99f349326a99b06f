//! Configuration for the RAG pipeline

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Main RAG system configuration
///
/// Passed explicitly into the knowledge store and answer service constructors
/// so that multiple independent instances can coexist (e.g. in tests).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RagConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Embedding configuration
    #[serde(default)]
    pub embeddings: EmbeddingConfig,
    /// Chunking configuration
    #[serde(default)]
    pub chunking: ChunkingConfig,
    /// Ollama/LLM configuration
    #[serde(default)]
    pub llm: LlmConfig,
    /// Vector index configuration
    #[serde(default)]
    pub index: IndexConfig,
    /// Query/retrieval configuration
    #[serde(default)]
    pub query: QueryConfig,
}

impl RagConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Invalid config file: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate parameter invariants. Called once at startup; violations are
    /// fatal, not recoverable per-call.
    pub fn validate(&self) -> Result<()> {
        if self.chunking.chunk_size == 0 || self.chunking.chunk_overlap == 0 {
            return Err(Error::Config(
                "chunk_size and chunk_overlap must be positive".to_string(),
            ));
        }
        if self.chunking.chunk_overlap >= self.chunking.chunk_size {
            return Err(Error::Config(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunking.chunk_overlap, self.chunking.chunk_size
            )));
        }
        if self.embeddings.dimensions == 0 {
            return Err(Error::Config("embedding dimensions must be positive".to_string()));
        }
        if self.query.max_top_k == 0 {
            return Err(Error::Config("max_top_k must be positive".to_string()));
        }
        if self.query.max_context_chars == 0 {
            return Err(Error::Config("max_context_chars must be positive".to_string()));
        }
        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            enable_cors: true,
        }
    }
}

/// Embedding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Embedding model name
    pub model: String,
    /// Embedding dimensions (768 for nomic-embed-text)
    pub dimensions: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: "nomic-embed-text".to_string(),
            dimensions: 768,
        }
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Chunk size in characters
    pub chunk_size: usize,
    /// Overlap between consecutive chunks in characters
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

/// LLM (Ollama) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Ollama base URL
    pub base_url: String,
    /// Embedding model name
    pub embed_model: String,
    /// Generation model name
    pub generate_model: String,
    /// Temperature for generation
    pub temperature: f32,
    /// Request timeout in seconds. A timed-out request is treated as
    /// backend-unavailable, never as a hang.
    pub timeout_secs: u64,
    /// Number of retries for failed requests
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            embed_model: "nomic-embed-text".to_string(),
            generate_model: "llama2".to_string(),
            temperature: 0.7,
            timeout_secs: 120,
            max_retries: 2,
        }
    }
}

/// Vector index configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Directory holding the persisted index and document registry.
    /// Single-writer ownership per storage path is assumed.
    pub storage_path: PathBuf,
    /// Collection name (index file is `<collection>.json`)
    pub collection: String,
}

impl Default for IndexConfig {
    fn default() -> Self {
        let storage_path = dirs::data_local_dir()
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
            .join("textrag");

        Self {
            storage_path,
            collection: "documents".to_string(),
        }
    }
}

/// Query/retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Default number of chunks to retrieve
    pub default_top_k: usize,
    /// Upper bound on top_k; larger requests are clamped
    pub max_top_k: usize,
    /// Maximum total characters of chunk text assembled into the
    /// generation context
    pub max_context_chars: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_top_k: 5,
            max_top_k: 20,
            max_context_chars: 6000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(RagConfig::default().validate().is_ok());
    }

    #[test]
    fn overlap_must_be_smaller_than_chunk_size() {
        let mut config = RagConfig::default();
        config.chunking.chunk_size = 100;
        config.chunking.chunk_overlap = 100;

        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn zero_chunk_size_is_rejected() {
        let mut config = RagConfig::default();
        config.chunking.chunk_size = 0;

        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }
}
