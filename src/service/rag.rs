//! Answer orchestration: validate, retrieve, assemble context, generate
//!
//! Backend failures on the query path degrade instead of propagating: an
//! unreachable embedding or generation backend yields a best-effort answer
//! built from whatever was retrieved, never a 5xx for the end user. Only
//! malformed input is an error.

use std::sync::Arc;

use crate::config::QueryConfig;
use crate::error::{Error, Result};
use crate::generation::{fallback, PromptBuilder};
use crate::providers::LlmProvider;
use crate::retrieval::ScoredChunk;
use crate::store::KnowledgeStore;
use crate::types::response::{QueryResponse, SourceChunk};

/// Answer service over a knowledge store and a generation provider
pub struct RagService {
    store: Arc<KnowledgeStore>,
    llm: Arc<dyn LlmProvider>,
    query: QueryConfig,
}

impl RagService {
    /// Create a new answer service
    pub fn new(store: Arc<KnowledgeStore>, llm: Arc<dyn LlmProvider>, query: QueryConfig) -> Self {
        Self { store, llm, query }
    }

    /// The underlying knowledge store
    pub fn store(&self) -> &Arc<KnowledgeStore> {
        &self.store
    }

    /// Answer a question from the knowledge base.
    ///
    /// `top_k` of zero or an empty question is `Error::InvalidQuery`; a
    /// `top_k` above the configured maximum is clamped to protect the
    /// generation context window.
    pub async fn answer(&self, question: &str, top_k: Option<usize>) -> Result<QueryResponse> {
        let question = question.trim();
        if question.is_empty() {
            return Err(Error::InvalidQuery("question text is empty".to_string()));
        }

        let k = top_k.unwrap_or(self.query.default_top_k);
        if k == 0 {
            return Err(Error::InvalidQuery("top_k must be at least 1".to_string()));
        }
        let k = k.min(self.query.max_top_k);

        // Retrieval unavailability degrades; it must never fail the request.
        let retrieved = match self.store.retrieve(question, k).await {
            Ok(results) => results,
            Err(e) => {
                tracing::warn!("Retrieval unavailable, answering degraded: {}", e);
                return Ok(QueryResponse {
                    answer: fallback::retrieval_unavailable(question),
                    query: question.to_string(),
                    sources: Vec::new(),
                    degraded: true,
                });
            }
        };

        if retrieved.is_empty() {
            // Nothing relevant: answer deterministically without consulting
            // the generation backend.
            return Ok(QueryResponse {
                answer: fallback::no_results(question),
                query: question.to_string(),
                sources: Vec::new(),
                degraded: false,
            });
        }

        let context_chunks = assemble_context(retrieved, self.query.max_context_chars);
        let context = PromptBuilder::build_context(&context_chunks);
        let sources: Vec<SourceChunk> = context_chunks.iter().map(SourceChunk::from_scored).collect();

        match self.llm.generate_answer(question, &context).await {
            Ok(answer) => Ok(QueryResponse {
                answer: answer.trim().to_string(),
                query: question.to_string(),
                sources,
                degraded: false,
            }),
            Err(e) => {
                tracing::warn!("Generation unavailable, answering from retrieved text: {}", e);
                Ok(QueryResponse {
                    answer: fallback::from_chunks(question, &context_chunks),
                    query: question.to_string(),
                    sources,
                    degraded: true,
                })
            }
        }
    }
}

/// Keep retrieved chunks, highest score first, until the character budget is
/// exhausted. Chunks are dropped whole, lowest-scored first; the top chunk is
/// always kept so a non-empty retrieval never produces an empty context.
fn assemble_context(retrieved: Vec<ScoredChunk>, max_chars: usize) -> Vec<ScoredChunk> {
    let mut kept = Vec::new();
    let mut total = 0usize;

    for result in retrieved {
        let len = result.chunk.content.chars().count();
        if !kept.is_empty() && total + len > max_chars {
            break;
        }
        total += len;
        kept.push(result);
    }

    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RagConfig;
    use crate::providers::EmbeddingProvider;
    use crate::types::{Chunk, Metadata};
    use async_trait::async_trait;
    use uuid::Uuid;

    /// Embedder that fails only for texts containing the marker, so a store
    /// can be seeded and then queried while the backend is "down".
    struct StubEmbedder {
        poison: Option<&'static str>,
    }

    #[async_trait]
    impl EmbeddingProvider for StubEmbedder {
        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            if let Some(marker) = self.poison {
                if texts.iter().any(|t| t.contains(marker)) {
                    return Err(Error::Embedding("backend unreachable".to_string()));
                }
            }
            Ok(texts
                .iter()
                .map(|text| {
                    let mut vector = vec![0.0f32; 32];
                    for (i, c) in text.chars().enumerate() {
                        vector[(c as usize + i) % 32] += 1.0;
                    }
                    vector
                })
                .collect())
        }

        fn dimensions(&self) -> usize {
            32
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    struct StubLlm {
        fail: bool,
    }

    #[async_trait]
    impl LlmProvider for StubLlm {
        async fn generate_answer(&self, question: &str, _context: &str) -> Result<String> {
            if self.fail {
                return Err(Error::Generation("backend unreachable".to_string()));
            }
            Ok(format!("Generated answer to: {}", question))
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(!self.fail)
        }

        fn name(&self) -> &str {
            "stub"
        }

        fn model(&self) -> &str {
            "stub-model"
        }
    }

    fn service_in(
        dir: &std::path::Path,
        embed_poison: Option<&'static str>,
        llm_fails: bool,
    ) -> RagService {
        let mut config = RagConfig::default();
        config.index.storage_path = dir.to_path_buf();
        config.chunking.chunk_size = 80;
        config.chunking.chunk_overlap = 10;

        let store = Arc::new(
            KnowledgeStore::new(&config, Arc::new(StubEmbedder { poison: embed_poison }))
                .unwrap(),
        );
        RagService::new(store, Arc::new(StubLlm { fail: llm_fails }), config.query)
    }

    async fn seed(service: &RagService) {
        service
            .store()
            .add_document(
                "The mitochondria is the powerhouse of the cell.",
                Metadata::new(),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn empty_question_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_in(dir.path(), None, false);

        let err = service.answer("   ", Some(3)).await.unwrap_err();
        assert!(matches!(err, Error::InvalidQuery(_)));
    }

    #[tokio::test]
    async fn zero_top_k_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_in(dir.path(), None, false);

        let err = service.answer("a question", Some(0)).await.unwrap_err();
        assert!(matches!(err, Error::InvalidQuery(_)));
    }

    #[tokio::test]
    async fn empty_store_answers_without_generation() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_in(dir.path(), None, true); // LLM down, must not matter

        let response = service.answer("what is out there?", Some(3)).await.unwrap();

        assert!(!response.degraded);
        assert!(response.sources.is_empty());
        assert!(response.answer.contains("no relevant documents"));
    }

    #[tokio::test]
    async fn healthy_backends_produce_generated_answer() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_in(dir.path(), None, false);
        seed(&service).await;

        let response = service
            .answer("what is the mitochondria?", Some(3))
            .await
            .unwrap();

        assert!(!response.degraded);
        assert!(response.answer.starts_with("Generated answer to:"));
        assert!(!response.sources.is_empty());
        assert!(response.sources[0].text.contains("mitochondria"));
    }

    #[tokio::test]
    async fn generation_failure_yields_degraded_answer_from_top_chunk() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_in(dir.path(), None, true);
        seed(&service).await;

        let response = service
            .answer("what is the mitochondria?", Some(3))
            .await
            .unwrap();

        assert!(response.degraded);
        assert!(response.answer.contains("mitochondria"));
        assert!(!response.sources.is_empty());
    }

    #[tokio::test]
    async fn retrieval_failure_yields_degraded_answer_not_error() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_in(dir.path(), Some("UNEMBEDDABLE"), false);
        seed(&service).await;

        let response = service
            .answer("UNEMBEDDABLE question text", Some(3))
            .await
            .unwrap();

        assert!(response.degraded);
        assert!(response.sources.is_empty());
        assert!(!response.answer.is_empty());
        assert!(response.answer.contains("temporarily unavailable"));
    }

    #[tokio::test]
    async fn unrelated_question_still_gets_an_answer() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_in(dir.path(), None, false);
        seed(&service).await;

        let response = service
            .answer("how do volcanoes form?", Some(3))
            .await
            .unwrap();

        assert!(!response.answer.is_empty());
        assert!(!response.sources.is_empty());
    }

    fn scored(content: &str, score: f32) -> ScoredChunk {
        ScoredChunk {
            chunk: Chunk::new(
                Uuid::new_v4(),
                content.to_string(),
                0,
                content.chars().count(),
                0,
                &Metadata::new(),
            ),
            score,
        }
    }

    #[test]
    fn context_budget_drops_lowest_scored_chunks_whole() {
        let retrieved = vec![scored("aaaaa", 0.9), scored("bbbbb", 0.8), scored("ccccc", 0.7)];

        let kept = assemble_context(retrieved, 11);

        // 5 + 5 fits, the third chunk would overflow and is dropped whole.
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].chunk.content, "aaaaa");
        assert_eq!(kept[1].chunk.content, "bbbbb");
    }

    #[test]
    fn oversized_top_chunk_is_still_included() {
        let retrieved = vec![scored("a very long top chunk", 0.9), scored("small", 0.1)];

        let kept = assemble_context(retrieved, 5);

        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].chunk.content, "a very long top chunk");
    }
}
