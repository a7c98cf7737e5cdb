//! OpenAI API client implementing the embedding and generation providers
//!
//! Talks to `/embeddings` and `/chat/completions` directly over `reqwest`,
//! wrapping every call in the shared retry policy. Rate limits (429),
//! server errors (5xx), timeouts, and connection failures are retried;
//! anything else surfaces immediately.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::{OpenAiConfig, RetryConfig};
use crate::error::{Error, Result};

use super::embedding::EmbeddingProvider;
use super::generation::GenerationProvider;
use super::retry::RetryPolicy;

/// OpenAI API client with automatic retry
pub struct OpenAiClient {
    client: Client,
    config: OpenAiConfig,
    retry: RetryPolicy,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl OpenAiClient {
    /// Create a new client from configuration
    pub fn new(config: &OpenAiConfig, retry: &RetryConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(Error::Config("OpenAI API key must not be empty".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(5)
            .build()?;

        Ok(Self {
            client,
            config: config.clone(),
            retry: RetryPolicy::new(retry),
        })
    }

    /// Turn a non-success response into a status error with the API's own
    /// message when the body carries one.
    async fn status_error(response: reqwest::Response) -> Error {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorResponse>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);
        Error::RemoteStatus { status, message }
    }

    async fn embed_once(&self, text: &str) -> Result<Vec<f32>> {
        let url = format!("{}/embeddings", self.config.base_url);
        let request = EmbeddingRequest {
            model: &self.config.embedding_model,
            input: text,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }

        let embedding_response: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| Error::embedding(format!("failed to parse embedding response: {}", e)))?;

        embedding_response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| Error::embedding("API returned no embedding data"))
    }

    async fn complete_once(&self, prompt: &str, model: &str, temperature: f32) -> Result<String> {
        let url = format!("{}/chat/completions", self.config.base_url);
        let request = ChatRequest {
            model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::generation(format!("failed to parse chat response: {}", e)))?;

        chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|content| content.trim().to_string())
            .ok_or_else(|| Error::generation("API returned no completion choices"))
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        tracing::debug!(model = %self.config.embedding_model, text_len = text.len(), "embedding text");
        self.retry.run(|| self.embed_once(text)).await
    }

    fn name(&self) -> &str {
        "openai"
    }
}

#[async_trait]
impl GenerationProvider for OpenAiClient {
    async fn complete(&self, prompt: &str, model: &str, temperature: f32) -> Result<String> {
        tracing::debug!(model, prompt_len = prompt.len(), "requesting completion");
        self.retry
            .run(|| self.complete_once(prompt, model, temperature))
            .await
    }

    fn name(&self) -> &str {
        "openai"
    }
}
