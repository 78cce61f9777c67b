use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::AppState;

#[axum::debug_handler]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let (status, database) = match state.store.ping().await {
        Ok(()) => ("healthy", "connected"),
        Err(e) => {
            tracing::warn!(error = ?e, "Health check could not reach the store");
            ("degraded", "unreachable")
        }
    };
    let body = json!({
        "status": status,
        "database": database,
    });
    (StatusCode::OK, Json(body))
}
