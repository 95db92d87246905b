use crate::AppState;
use axum::{extract::State, Json};
use serde_json::{json, Value};

pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "schema": state.pipeline.schema(),
        "upstream": state.config.upstream.base_url(),
        "html_mode": state.pipeline.html_mode(),
        "snapshot": state.pipeline.is_snapshot(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}
