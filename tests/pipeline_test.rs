//! End-to-end pipeline tests with stub backends
//!
//! Exercises ingestion -> retrieval -> answer through the public API, with
//! deterministic stand-ins for the embedding and generation backends.

use async_trait::async_trait;
use std::sync::Arc;

use textrag::config::RagConfig;
use textrag::error::{Error, Result};
use textrag::providers::{EmbeddingProvider, LlmProvider};
use textrag::service::RagService;
use textrag::store::KnowledgeStore;
use textrag::types::document::Metadata;

const DIMS: usize = 64;

/// Deterministic embedder: folds character identities into a fixed-dim
/// vector so identical texts embed identically and unrelated texts diverge.
struct HashEmbedder;

#[async_trait]
impl EmbeddingProvider for HashEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .map(|text| {
                let mut vector = vec![0.0f32; DIMS];
                for (i, c) in text.chars().enumerate() {
                    vector[(c as usize + i) % DIMS] += 1.0;
                }
                vector
            })
            .collect())
    }

    fn dimensions(&self) -> usize {
        DIMS
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "hash-stub"
    }
}

/// Generation stub that echoes the question, or fails when told to.
struct EchoLlm {
    fail: bool,
}

#[async_trait]
impl LlmProvider for EchoLlm {
    async fn generate_answer(&self, question: &str, context: &str) -> Result<String> {
        if self.fail {
            return Err(Error::Generation("connection refused".to_string()));
        }
        Ok(format!(
            "Answering '{}' from {} chars of context.",
            question,
            context.len()
        ))
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(!self.fail)
    }

    fn name(&self) -> &str {
        "echo-stub"
    }

    fn model(&self) -> &str {
        "echo"
    }
}

fn pipeline(dir: &std::path::Path, llm_fails: bool) -> RagService {
    let mut config = RagConfig::default();
    config.index.storage_path = dir.to_path_buf();
    config.chunking.chunk_size = 120;
    config.chunking.chunk_overlap = 20;
    config.embeddings.dimensions = DIMS;

    let store = Arc::new(KnowledgeStore::new(&config, Arc::new(HashEmbedder)).unwrap());
    RagService::new(store, Arc::new(EchoLlm { fail: llm_fails }), config.query)
}

#[tokio::test]
async fn ingest_then_query_returns_answer_with_sources() {
    let dir = tempfile::tempdir().unwrap();
    let service = pipeline(dir.path(), false);

    let mut metadata = Metadata::new();
    metadata.insert("source".to_string(), serde_json::json!("handbook"));

    let outcome = service
        .store()
        .add_document(
            "Employees accrue fifteen vacation days per year, \
             increasing to twenty after five years of service.",
            metadata,
        )
        .await
        .unwrap();
    assert!(!outcome.chunk_ids.is_empty());

    let response = service
        .answer("How many vacation days do employees get?", Some(3))
        .await
        .unwrap();

    assert!(!response.degraded);
    assert!(response.answer.starts_with("Answering"));
    assert!(!response.sources.is_empty());
    assert_eq!(
        response.sources[0].metadata["source"],
        serde_json::json!("handbook")
    );
    assert!(response.sources[0].score > 0.0);
}

#[tokio::test]
async fn stats_track_chunker_output_exactly() {
    let dir = tempfile::tempdir().unwrap();
    let service = pipeline(dir.path(), false);

    let before = service.store().stats();
    let outcome = service
        .store()
        .add_document("hello world", Metadata::new())
        .await
        .unwrap();
    let after = service.store().stats();

    assert_eq!(
        after.chunk_count,
        before.chunk_count + outcome.chunk_ids.len()
    );
    assert_eq!(after.document_count, before.document_count + 1);
}

#[tokio::test]
async fn generation_outage_degrades_but_answers() {
    let dir = tempfile::tempdir().unwrap();
    let service = pipeline(dir.path(), true);

    service
        .store()
        .add_document(
            "The archive room is on the third floor, next to the stairwell.",
            Metadata::new(),
        )
        .await
        .unwrap();

    let response = service
        .answer("Where is the archive room?", Some(3))
        .await
        .unwrap();

    assert!(response.degraded);
    assert!(response.answer.contains("archive room"));
    assert!(!response.sources.is_empty());
}

#[tokio::test]
async fn batch_ingestion_is_independent_per_document() {
    let dir = tempfile::tempdir().unwrap();
    let service = pipeline(dir.path(), false);

    let results = service
        .store()
        .add_documents_batch(vec![
            ("first document text".to_string(), Metadata::new()),
            ("".to_string(), Metadata::new()),
            ("third document text".to_string(), Metadata::new()),
        ])
        .await;

    assert_eq!(results.len(), 3);
    assert!(results.iter().all(|r| r.is_ok()));
    // The empty document is a no-op, not an error.
    assert!(results[1].as_ref().unwrap().chunk_ids.is_empty());
    assert_eq!(service.store().stats().document_count, 2);
}

#[tokio::test]
async fn clear_then_stats_reports_zero() {
    let dir = tempfile::tempdir().unwrap();
    let service = pipeline(dir.path(), false);

    service
        .store()
        .add_document("soon to be forgotten", Metadata::new())
        .await
        .unwrap();
    service.store().clear().await.unwrap();

    let stats = service.store().stats();
    assert_eq!(stats.document_count, 0);
    assert_eq!(stats.chunk_count, 0);

    let response = service.answer("anything left?", Some(3)).await.unwrap();
    assert!(response.sources.is_empty());
    assert!(response.answer.contains("no relevant documents"));
}

#[tokio::test]
async fn index_and_registry_survive_restart() {
    let dir = tempfile::tempdir().unwrap();

    {
        let service = pipeline(dir.path(), false);
        service
            .store()
            .add_document("persistent knowledge about turbines", Metadata::new())
            .await
            .unwrap();
    }

    let service = pipeline(dir.path(), false);
    let stats = service.store().stats();
    assert_eq!(stats.document_count, 1);
    assert!(stats.chunk_count >= 1);

    let response = service
        .answer("persistent knowledge about turbines", Some(1))
        .await
        .unwrap();
    assert!(response.sources[0].text.contains("turbines"));
}
