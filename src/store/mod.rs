//! Knowledge store composing chunking, embedding, and the vector index

pub mod knowledge;

pub use knowledge::{IngestOutcome, KnowledgeStore, StoreStats};
