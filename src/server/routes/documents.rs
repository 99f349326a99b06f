//! Document ingestion and clearing endpoints

use axum::{extract::State, Json};

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::query::IngestRequest;
use crate::types::response::{BatchItemResult, ClearResponse, IngestResponse};

/// POST /api/documents - Ingest a single document
///
/// An empty document is accepted and produces zero chunks; an unreachable
/// embedding backend surfaces as 503.
pub async fn add_document(
    State(state): State<AppState>,
    Json(request): Json<IngestRequest>,
) -> Result<Json<IngestResponse>> {
    let outcome = state
        .store()
        .add_document(&request.content, request.metadata)
        .await?;

    Ok(Json(IngestResponse {
        document_id: outcome.document_id,
        chunk_count: outcome.chunk_ids.len(),
        chunk_ids: outcome.chunk_ids,
        skipped: outcome.skipped,
    }))
}

/// POST /api/documents/batch - Ingest multiple documents
///
/// Never fails wholesale: each item's success or failure is reported in its
/// own slot.
pub async fn add_documents_batch(
    State(state): State<AppState>,
    Json(requests): Json<Vec<IngestRequest>>,
) -> Json<Vec<BatchItemResult>> {
    let items = requests
        .into_iter()
        .map(|r| (r.content, r.metadata))
        .collect();

    let results = state
        .store()
        .add_documents_batch(items)
        .await
        .into_iter()
        .map(|result| match result {
            Ok(outcome) => BatchItemResult::Ok {
                document_id: outcome.document_id,
                chunk_count: outcome.chunk_ids.len(),
                chunk_ids: outcome.chunk_ids,
                skipped: outcome.skipped,
            },
            Err(e) => BatchItemResult::Error {
                error: e.to_string(),
            },
        })
        .collect();

    Json(results)
}

/// DELETE /api/documents - Clear the knowledge base
pub async fn clear_documents(State(state): State<AppState>) -> Result<Json<ClearResponse>> {
    state.store().clear().await?;
    Ok(Json(ClearResponse { cleared: true }))
}
