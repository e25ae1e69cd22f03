//! Example model catalogue.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/examples", get(list_examples))
}

/// GET /api/examples
async fn list_examples(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let examples = &state.config.examples;
    Json(serde_json::json!({
        "examples": examples,
        "total": examples.len(),
    }))
}
