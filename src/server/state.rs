//! Application state for the query server

use std::sync::Arc;

use crate::config::RagConfig;
use crate::error::Result;
use crate::pipeline::Pipeline;
use crate::providers::OpenAiClient;
use crate::store::VectorStore;

/// Shared application state.
///
/// Everything inside is read-only after construction; cloning is cheap and
/// concurrent requests share the same store and clients.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: RagConfig,
    pipeline: Pipeline,
}

impl AppState {
    /// Initialize from configuration.
    ///
    /// Opens the vector store and builds the OpenAI-backed pipeline; missing
    /// index/metadata files or credentials fail here, before the server binds.
    pub fn new(config: RagConfig) -> Result<Self> {
        let store = Arc::new(VectorStore::open(
            &config.store.index_path,
            &config.store.metadata_path,
        )?);
        tracing::info!(
            "Vector store ready: {} vectors, {} dimensions",
            store.len(),
            store.dimensions()
        );

        let client = Arc::new(OpenAiClient::new(&config.openai, &config.retry)?);
        tracing::info!(
            "OpenAI client ready (embedding: {}, decompose: {}, answer: {})",
            config.openai.embedding_model,
            config.openai.decompose_model,
            config.openai.answer_model
        );

        let pipeline = Pipeline::new(
            store,
            client.clone(),
            client,
            config.openai.decompose_model.clone(),
            config.openai.answer_model.clone(),
            config.openai.temperature,
        );

        Ok(Self::with_pipeline(config, pipeline))
    }

    /// Build state around an existing pipeline (used by tests to inject
    /// mock providers)
    pub fn with_pipeline(config: RagConfig, pipeline: Pipeline) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, pipeline }),
        }
    }

    /// Get configuration
    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    /// Get the query pipeline
    pub fn pipeline(&self) -> &Pipeline {
        &self.inner.pipeline
    }
}
