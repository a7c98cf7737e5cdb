//! Query endpoint

use axum::{extract::State, Json};
use std::time::Instant;

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::{query::QueryRequest, response::QueryResponse};

/// POST /query - run the RAG pipeline for one question
pub async fn query(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryResponse>> {
    // Bad requests are rejected before the pipeline is invoked
    request.validate()?;

    let start = Instant::now();
    tracing::info!("Received query: \"{:.200}\"", request.query);

    let result = state
        .pipeline()
        .run(&request.query, request.top_k, request.max_subqueries)
        .await;

    tracing::info!(
        "Query completed in {}ms across {} sub-question(s)",
        start.elapsed().as_millis(),
        result.trace.len()
    );

    Ok(Json(QueryResponse {
        query: request.query,
        final_answer: result.final_answer,
    }))
}
