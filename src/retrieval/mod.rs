//! Vector index for chunk storage and similarity search

pub mod index;

pub use index::{IndexInfo, ScoredChunk, VectorIndex};
