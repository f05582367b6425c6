use crate::startup::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

/// Liveness probe. Reports whether a model credential is configured.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "hint-service",
        "version": env!("CARGO_PKG_VERSION"),
        "model_configured": state.text_provider.is_some()
    }))
}
