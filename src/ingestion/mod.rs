//! Document ingestion: text chunking

pub mod chunker;

pub use chunker::{ChunkSpan, TextChunker};
