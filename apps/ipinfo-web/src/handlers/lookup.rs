use crate::error::PipelineError;
use crate::AppState;
use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse, Response},
};

/// Upstream JSON, byte for byte.
pub async fn json_handler(State(state): State<AppState>) -> Result<Response, PipelineError> {
    let body = state.pipeline.raw().await?;
    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}

/// Rendered report, also mounted at `/`.
pub async fn html_handler(State(state): State<AppState>) -> Result<Html<String>, PipelineError> {
    Ok(Html(state.pipeline.html().await?))
}
