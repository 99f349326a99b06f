//! Prompt templates for answer generation

use crate::retrieval::ScoredChunk;

/// Prompt builder for RAG queries
pub struct PromptBuilder;

impl PromptBuilder {
    /// Build the context string from retrieved chunks, highest score first
    pub fn build_context(results: &[ScoredChunk]) -> String {
        if results.is_empty() {
            return "No relevant context found.".to_string();
        }

        results
            .iter()
            .enumerate()
            .map(|(i, result)| {
                format!(
                    "Document {} (relevance: {:.2}):\n{}",
                    i + 1,
                    result.score,
                    result.chunk.content
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Build the full RAG prompt from a question and assembled context
    pub fn build_rag_prompt(question: &str, context: &str) -> String {
        format!(
            r#"You are a helpful AI assistant. Use the following context to answer the user's question. If the context doesn't contain relevant information, say so clearly.

Context:
{context}

Question: {question}

Answer: Provide a comprehensive answer based on the context above. If the context is not sufficient to answer the question, explain what information is missing."#
        )
    }
}
