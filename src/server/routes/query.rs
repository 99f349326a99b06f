//! Query and statistics endpoints

use axum::{extract::State, Json};

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::query::QueryRequest;
use crate::types::response::{QueryResponse, StatsResponse};

/// POST /api/query - Answer a question from the knowledge base
///
/// Malformed input is 400; backend unavailability never surfaces as an
/// error, the response carries `degraded: true` instead.
pub async fn query(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryResponse>> {
    tracing::info!("Query: \"{}\"", request.question);

    let response = state
        .service()
        .answer(&request.question, request.top_k)
        .await?;

    tracing::info!(
        "Query answered ({} sources, degraded: {})",
        response.sources.len(),
        response.degraded
    );

    Ok(Json(response))
}

/// GET /api/stats - Document/chunk counts and index backend info
pub async fn stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.store().stats();

    Json(StatsResponse {
        document_count: stats.document_count,
        chunk_count: stats.chunk_count,
        index: stats.index,
    })
}
