//! Configuration for the drug-rag service
//!
//! Every knob comes from the environment with a sensible default, matching the
//! deployment model where the platform injects variables at boot. The only
//! hard requirement is `OPENAI_API_KEY`; everything else falls back.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Main service configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RagConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// OpenAI API configuration
    pub openai: OpenAiConfig,
    /// Retry policy for remote calls
    pub retry: RetryConfig,
    /// Vector index and metadata table locations
    pub store: StoreConfig,
}

impl RagConfig {
    /// Build configuration from environment variables.
    ///
    /// Fails fast when `OPENAI_API_KEY` is absent; file existence is checked
    /// later when the vector store is opened.
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("OPENAI_API_KEY").map_err(|_| {
            Error::Config(
                "OPENAI_API_KEY is not set. Add it to the environment before starting.".to_string(),
            )
        })?;
        if api_key.trim().is_empty() {
            return Err(Error::Config("OPENAI_API_KEY is set but empty".to_string()));
        }

        let mut config = Self::default();
        config.openai.api_key = api_key;

        if let Ok(url) = env::var("OPENAI_BASE_URL") {
            config.openai.base_url = url.trim_end_matches('/').to_string();
        }
        if let Ok(model) = env::var("EMBEDDING_MODEL") {
            config.openai.embedding_model = model;
        }
        if let Ok(model) = env::var("DECOMPOSE_MODEL") {
            config.openai.decompose_model = model;
        }
        if let Ok(model) = env::var("ANSWER_MODEL") {
            config.openai.answer_model = model;
        }
        if let Ok(path) = env::var("INDEX_FILE") {
            config.store.index_path = PathBuf::from(path);
        }
        if let Ok(path) = env::var("METADATA_FILE") {
            config.store.metadata_path = PathBuf::from(path);
        }
        if let Ok(host) = env::var("HOST") {
            config.server.host = host;
        }
        if let Ok(port) = env::var("PORT") {
            config.server.port = port
                .parse()
                .map_err(|_| Error::Config(format!("PORT is not a valid port number: {}", port)))?;
        }
        if let Ok(origins) = env::var("ALLOWED_ORIGINS") {
            let origins: Vec<String> = origins
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect();
            if !origins.is_empty() {
                config.server.allowed_origins = Some(origins);
            }
        }

        Ok(config)
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Allowed CORS origins; `None` means any origin
    pub allowed_origins: Option<Vec<String>>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            allowed_origins: None,
        }
    }
}

/// OpenAI API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// API key (required)
    #[serde(skip_serializing)]
    pub api_key: String,
    /// API base URL, without trailing slash
    pub base_url: String,
    /// Embedding model name
    pub embedding_model: String,
    /// Model used for query decomposition
    pub decompose_model: String,
    /// Model used for answer generation and fusion
    pub answer_model: String,
    /// Sampling temperature for all completions
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.openai.com/v1".to_string(),
            embedding_model: "text-embedding-3-large".to_string(),
            decompose_model: "gpt-4o-mini".to_string(),
            answer_model: "gpt-4o-mini".to_string(),
            temperature: 0.0,
            timeout_secs: 60,
        }
    }
}

/// Retry policy for remote calls
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Initial backoff delay in seconds
    pub initial_backoff_secs: u64,
    /// Backoff delay ceiling in seconds
    pub max_backoff_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_backoff_secs: 1,
            max_backoff_secs: 20,
        }
    }
}

/// Vector index and metadata table locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path to the flat vector index file
    pub index_path: PathBuf,
    /// Path to the row-aligned chunk metadata CSV
    pub metadata_path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            index_path: PathBuf::from("data/drug_embeddings.dvec"),
            metadata_path: PathBuf::from("data/drug_chunks_metadata.csv"),
        }
    }
}
