//! API routes for the query server

pub mod query;

use axum::{routing::post, Router};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes() -> Router<AppState> {
    Router::new().route("/query", post(query::query))
}
