//! API routes for the RAG server

pub mod documents;
pub mod query;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Ingestion
        .route("/documents", post(documents::add_document))
        .route("/documents/batch", post(documents::add_documents_batch))
        // Clearing
        .route("/documents", delete(documents::clear_documents))
        // Query
        .route("/query", post(query::query))
        // Statistics
        .route("/stats", get(query::stats))
        // Info
        .route("/info", get(info))
}

/// API info endpoint
async fn info() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "name": "textrag",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Retrieval-augmented answer service over free-text documents",
        "endpoints": {
            "POST /api/documents": "Ingest a single document",
            "POST /api/documents/batch": "Ingest multiple documents (per-item results)",
            "POST /api/query": "Ask a question, get an answer with sources",
            "GET /api/stats": "Document/chunk counts and index info",
            "DELETE /api/documents": "Clear the knowledge base"
        }
    }))
}
