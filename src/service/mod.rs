//! Answer service orchestrating retrieval and generation

pub mod rag;

pub use rag::RagService;
