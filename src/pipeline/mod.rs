//! The four-stage query pipeline
//!
//! decompose -> (retrieve -> answer) per sub-question -> combine, strictly in
//! that order. Every stage has a degraded fallback, so `run` never fails once
//! the process is up: decomposition falls back to the original query,
//! retrieval degrades to an empty context, and generation failures yield
//! sentinel answers instead of aborting the request.

pub mod prompt;

use std::sync::Arc;

use crate::providers::{EmbeddingProvider, GenerationProvider};
use crate::store::VectorStore;
use crate::types::chunk::RetrievedChunk;
use crate::types::response::{PipelineResult, SubQueryAnswer};

pub use prompt::PromptBuilder;

/// Answer used when retrieval produced no context for a sub-question
pub const NO_INFORMATION_SENTINEL: &str = "No relevant information found.";

/// Answer used when per-subquery generation failed
pub const ANSWER_ERROR_SENTINEL: &str = "Error generating answer.";

/// Final answer used when fusion failed
pub const COMBINE_ERROR_SENTINEL: &str = "Error generating final answer.";

/// The query pipeline with its injected dependencies.
///
/// Holds only shared read-only state; one instance serves concurrent
/// requests, each running its own sequential pass.
pub struct Pipeline {
    store: Arc<VectorStore>,
    embedder: Arc<dyn EmbeddingProvider>,
    generator: Arc<dyn GenerationProvider>,
    decompose_model: String,
    answer_model: String,
    temperature: f32,
}

impl Pipeline {
    /// Create a pipeline over the given store and providers
    pub fn new(
        store: Arc<VectorStore>,
        embedder: Arc<dyn EmbeddingProvider>,
        generator: Arc<dyn GenerationProvider>,
        decompose_model: impl Into<String>,
        answer_model: impl Into<String>,
        temperature: f32,
    ) -> Self {
        Self {
            store,
            embedder,
            generator,
            decompose_model: decompose_model.into(),
            answer_model: answer_model.into(),
            temperature,
        }
    }

    /// Split a user query into up to `max_subqueries` independent
    /// sub-questions.
    ///
    /// Never fails: a generation error or an all-blank response falls back to
    /// the original query as the sole sub-question.
    pub async fn decompose(&self, query: &str, max_subqueries: usize) -> Vec<String> {
        let prompt = PromptBuilder::build_decompose_prompt(query, max_subqueries);

        match self
            .generator
            .complete(&prompt, &self.decompose_model, self.temperature)
            .await
        {
            Ok(text) => {
                let sub_queries: Vec<String> = text
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .take(max_subqueries)
                    .map(str::to_string)
                    .collect();

                if sub_queries.is_empty() {
                    tracing::warn!("Decomposition returned no usable lines; using original query");
                    vec![query.to_string()]
                } else {
                    sub_queries
                }
            }
            Err(e) => {
                tracing::warn!("Decomposition failed; using original query: {}", e);
                vec![query.to_string()]
            }
        }
    }

    /// Retrieve the `top_k` nearest chunks for a sub-question.
    ///
    /// Embedding or search failure degrades to an empty result; retrieval
    /// never aborts the request.
    pub async fn retrieve(&self, sub_query: &str, top_k: usize) -> Vec<RetrievedChunk> {
        let embedding = match self.embedder.embed(sub_query).await {
            Ok(embedding) => embedding,
            Err(e) => {
                tracing::warn!("Embedding failed for \"{}\": {}", sub_query, e);
                return Vec::new();
            }
        };

        let hits = match self.store.search(&embedding, top_k) {
            Ok(hits) => hits,
            Err(e) => {
                tracing::warn!("Vector search failed for \"{}\": {}", sub_query, e);
                return Vec::new();
            }
        };

        hits.into_iter()
            .filter_map(|(row, distance)| {
                self.store
                    .chunk(row)
                    .map(|record| RetrievedChunk::from_record(record, distance))
            })
            .collect()
    }

    /// Generate a grounded answer for one sub-question.
    ///
    /// With no chunks the no-information sentinel is returned without calling
    /// the generator; a generation failure yields the error sentinel.
    pub async fn answer(&self, sub_query: &str, chunks: &[RetrievedChunk]) -> String {
        if chunks.is_empty() {
            return NO_INFORMATION_SENTINEL.to_string();
        }

        let prompt = PromptBuilder::build_answer_prompt(sub_query, chunks);

        match self
            .generator
            .complete(&prompt, &self.answer_model, self.temperature)
            .await
        {
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!("Answer generation failed for \"{}\": {}", sub_query, e);
                ANSWER_ERROR_SENTINEL.to_string()
            }
        }
    }

    /// Fuse all sub-answers into one final answer, in decomposition order
    pub async fn combine(&self, user_query: &str, answers: &[SubQueryAnswer]) -> String {
        let prompt = PromptBuilder::build_combine_prompt(user_query, answers);

        match self
            .generator
            .complete(&prompt, &self.answer_model, self.temperature)
            .await
        {
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!("Final answer combination failed: {}", e);
                COMBINE_ERROR_SENTINEL.to_string()
            }
        }
    }

    /// Run the full pipeline for one query.
    ///
    /// Strictly sequential; sub-questions are processed one after another and
    /// each independently degrades to a sentinel answer on failure.
    pub async fn run(&self, query: &str, top_k: usize, max_subqueries: usize) -> PipelineResult {
        let sub_queries = self.decompose(query, max_subqueries).await;
        tracing::info!("Decomposed query into {} sub-question(s)", sub_queries.len());

        let mut trace = Vec::with_capacity(sub_queries.len());
        for sub_query in sub_queries {
            let chunks = self.retrieve(&sub_query, top_k).await;
            let answer = self.answer(&sub_query, &chunks).await;
            trace.push(SubQueryAnswer {
                sub_query,
                answer,
                chunks,
            });
        }

        let final_answer = self.combine(query, &trace).await;

        PipelineResult {
            final_answer,
            trace,
        }
    }
}
