//! Deterministic fallback answers for degraded operation
//!
//! When the generation backend is unreachable the pipeline answers directly
//! from the retrieved text; when retrieval itself is unavailable, or nothing
//! relevant was found, the pipeline still answers instead of failing the
//! request.

use crate::retrieval::ScoredChunk;

/// Maximum characters of chunk text quoted in a fallback answer
const SNIPPET_CHARS: usize = 500;

/// Answer used when no relevant chunks were retrieved. The generation
/// backend is not consulted in this case.
pub fn no_results(question: &str) -> String {
    format!(
        "I found no relevant documents to answer your question: '{}'. \
         Please try rephrasing your question or add more documents to the knowledge base.",
        question
    )
}

/// Answer used when the retrieval path (embedding backend) is unavailable
pub fn retrieval_unavailable(question: &str) -> String {
    format!(
        "The knowledge base is temporarily unavailable, so I could not search \
         for documents relevant to your question: '{}'. Please try again shortly.",
        question
    )
}

/// Extractive answer built from the top retrieved chunk, used when the
/// generation backend is unavailable.
pub fn from_chunks(question: &str, results: &[ScoredChunk]) -> String {
    let best = match results.first() {
        Some(best) => best,
        None => return no_results(question),
    };

    let content = &best.chunk.content;
    let snippet: String = content.chars().take(SNIPPET_CHARS).collect();
    let ellipsis = if content.chars().count() > SNIPPET_CHARS {
        "..."
    } else {
        ""
    };

    format!(
        "Based on the most relevant document (similarity: {:.2}), here's what I found:\n\n\
         {}{}\n\n\
         Note: This is a simplified answer produced without the language model. \
         For better answers, please ensure the generation backend is available.",
        best.score, snippet, ellipsis
    )
}
