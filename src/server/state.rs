//! Application state for the RAG server

use parking_lot::RwLock;
use std::sync::Arc;

use crate::config::RagConfig;
use crate::error::Result;
use crate::providers::ollama::OllamaProvider;
use crate::service::RagService;
use crate::store::KnowledgeStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: RagConfig,
    /// Knowledge store (ingestion, retrieval, stats, clear)
    store: Arc<KnowledgeStore>,
    /// Answer service (query orchestration)
    service: RagService,
    /// Ready state
    ready: RwLock<bool>,
}

impl AppState {
    /// Create new application state. Configuration violations are fatal
    /// here, before the server binds.
    pub fn new(config: RagConfig) -> Result<Self> {
        config.validate()?;

        tracing::info!("Initializing RAG application state...");

        let provider = OllamaProvider::new(&config.llm, config.embeddings.dimensions);

        let store = Arc::new(KnowledgeStore::new(&config, provider.embedder())?);
        tracing::info!("Knowledge store initialized");

        let service = RagService::new(Arc::clone(&store), provider.llm(), config.query.clone());
        tracing::info!("Answer service initialized");

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                service,
                ready: RwLock::new(true),
            }),
        })
    }

    /// Get configuration
    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    /// Get the knowledge store
    pub fn store(&self) -> &Arc<KnowledgeStore> {
        &self.inner.store
    }

    /// Get the answer service
    pub fn service(&self) -> &RagService {
        &self.inner.service
    }

    /// Check if the server is ready
    pub fn is_ready(&self) -> bool {
        *self.inner.ready.read()
    }

    /// Set ready state
    pub fn set_ready(&self, ready: bool) {
        *self.inner.ready.write() = ready;
    }
}
