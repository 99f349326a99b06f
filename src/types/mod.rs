//! Core types for documents, chunks, queries, and responses

pub mod document;
pub mod query;
pub mod response;

pub use document::{Chunk, Document, Metadata};
pub use query::QueryRequest;
pub use response::{QueryResponse, SourceChunk};
