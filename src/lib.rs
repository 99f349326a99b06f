//! textrag: retrieval-augmented answer pipeline over free-text documents
//!
//! Documents are split into overlapping character windows, embedded, and
//! stored in a persistent cosine-similarity index. Queries retrieve the
//! top-k most similar chunks and feed them with the question into an LLM
//! generation call; when a backend is unavailable the pipeline degrades to
//! a deterministic answer built from the retrieved text instead of failing.

pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod service;
pub mod store;
pub mod types;

pub use config::RagConfig;
pub use error::{Error, Result};
pub use service::RagService;
pub use store::KnowledgeStore;
pub use types::{
    document::{Chunk, Document},
    query::QueryRequest,
    response::{QueryResponse, SourceChunk},
};
