//! Graph routes: build from an upload or an example, expand, download.

use std::sync::Arc;

use axum::extract::{Multipart, Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use ifcdot_graph::{parse_interest, InterestSet};
use serde::Deserialize;
use tracing::info;

use super::error::ApiError;
use crate::examples::fetch_example;
use crate::pipeline::{build_artifacts, build_from_bytes};
use crate::state::{AppState, GraphArtifacts, GraphSummary};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/graphs", post(upload_graph))
        .route("/graphs/example", post(example_graph))
        .route("/graphs/{id}", get(get_graph))
        .route("/graphs/{id}/expand", post(expand_graph))
        .route("/graphs/{id}/dot", get(download_dot))
        .route("/graphs/{id}/png", get(download_png))
        .route("/graphs/{id}/svg", get(preview_svg))
}

/// POST /api/graphs: multipart `file` plus optional `interest`.
async fn upload_graph(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<GraphSummary>, ApiError> {
    let mut upload: Option<(String, Vec<u8>)> = None;
    let mut interest = InterestSet::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or("model.ifc").to_string();
                let bytes = field.bytes().await?;
                upload = Some((filename, bytes.to_vec()));
            }
            "interest" => {
                let text = field.text().await?;
                interest = parse_interest(&text)?;
            }
            _ => continue,
        }
    }

    let Some((filename, bytes)) = upload else {
        return Err(ApiError::BadRequest("No model file provided".to_string()));
    };

    info!("Building graph for upload {} ({} bytes)", filename, bytes.len());
    let summary = build_and_store(&state, filename, bytes, interest).await?;
    Ok(Json(summary))
}

#[derive(Debug, Deserialize)]
struct ExampleRequest {
    name: String,
    #[serde(default)]
    interest: Option<String>,
}

/// POST /api/graphs/example: build from a configured example model.
async fn example_graph(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ExampleRequest>,
) -> Result<Json<GraphSummary>, ApiError> {
    let interest = match req.interest.as_deref() {
        Some(text) => parse_interest(text)?,
        None => InterestSet::new(),
    };

    let example = state
        .config
        .example(&req.name)
        .cloned()
        .ok_or_else(|| ApiError::NotFound(format!("Unknown example: {}", req.name)))?;

    let bytes = fetch_example(
        &state.http,
        &state.config.data_paths.example_cache,
        &example,
        state.config.max_upload_bytes,
    )
    .await?;
    let summary = build_and_store(&state, example.name, bytes, interest).await?;
    Ok(Json(summary))
}

/// GET /api/graphs/{id}
async fn get_graph(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<GraphSummary>, ApiError> {
    Ok(Json(stored(&state, &id)?.summary()))
}

/// POST /api/graphs/{id}/expand: rebuild one hop wider.
async fn expand_graph(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<GraphSummary>, ApiError> {
    let previous = stored(&state, &id)?;
    if !previous.is_filtered() {
        return Err(ApiError::BadRequest(
            "The graph is not filtered; there is nothing to expand".to_string(),
        ));
    }

    let renderer = state.renderer.clone();
    let model = previous.model.clone();
    let filename = previous.filename.clone();
    let interest = previous.output.expanded_interest.clone();

    let artifacts = tokio::task::spawn_blocking(move || {
        build_artifacts(renderer.as_ref(), model, filename, interest)
    })
    .await?;

    Ok(Json(state.insert_graph(artifacts).summary()))
}

/// GET /api/graphs/{id}/dot
async fn download_dot(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let graph = stored(&state, &id)?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"output_graph.dot\"",
            ),
        ],
        graph.output.dot.clone(),
    )
        .into_response())
}

/// GET /api/graphs/{id}/png
async fn download_png(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let graph = stored(&state, &id)?;
    let png = graph
        .png
        .clone()
        .ok_or_else(|| ApiError::NotFound("The graph image is not available".to_string()))?;
    Ok((
        [
            (header::CONTENT_TYPE, "image/png"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"output_graph.png\"",
            ),
        ],
        png,
    )
        .into_response())
}

/// GET /api/graphs/{id}/svg: inline preview.
async fn preview_svg(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let graph = stored(&state, &id)?;
    let svg = graph
        .svg
        .clone()
        .ok_or_else(|| ApiError::NotFound("The graph preview is not available".to_string()))?;
    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg).into_response())
}

fn stored(state: &AppState, id: &str) -> Result<Arc<GraphArtifacts>, ApiError> {
    state
        .graph(id)
        .ok_or_else(|| ApiError::NotFound(format!("Graph not found: {}", id)))
}

/// Parse and build on the blocking pool, then keep the result.
async fn build_and_store(
    state: &Arc<AppState>,
    filename: String,
    bytes: Vec<u8>,
    interest: InterestSet,
) -> Result<GraphSummary, ApiError> {
    let renderer = state.renderer.clone();
    let artifacts = tokio::task::spawn_blocking(move || {
        build_from_bytes(renderer.as_ref(), filename, &bytes, interest)
    })
    .await??;

    info!(
        "Graph {} built: {} nodes, {} edges",
        artifacts.id, artifacts.output.stats.nodes, artifacts.output.stats.edges
    );
    Ok(state.insert_graph(artifacts).summary())
}
