use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use ipinfo_shared::Schema;
use thiserror::Error;
use tracing::error;

/// Failure of one pipeline stage. Every variant becomes a 500 for the client.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("lookup request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("lookup response does not match the {schema} schema: {source}")]
    Parse {
        schema: Schema,
        source: serde_json::Error,
    },

    #[error("rendering failed: {0}")]
    Render(#[from] askama::Error),

    #[error("encoding the data island failed: {0}")]
    Encode(#[source] serde_json::Error),
}

impl PipelineError {
    pub fn client_message(&self) -> &'static str {
        match self {
            PipelineError::Transport(_) => "Error fetching IP information",
            PipelineError::Parse { .. } => "Error parsing data",
            PipelineError::Render(_) | PipelineError::Encode(_) => {
                "Error populating template with data"
            }
        }
    }
}

impl IntoResponse for PipelineError {
    fn into_response(self) -> Response {
        error!("{}", self);
        (StatusCode::INTERNAL_SERVER_ERROR, self.client_message()).into_response()
    }
}
