//! Health check endpoint

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;
use tracing::warn;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// GET /health
///
/// `ok` while the database answers, `unavailable` with 503 otherwise.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (status, label) = match state.core.health_check().await {
        Ok(()) => (StatusCode::OK, "ok"),
        Err(e) => {
            warn!(error = %e, "Health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
        }
    };

    (
        status,
        Json(HealthResponse {
            status: label,
            version: env!("CARGO_PKG_VERSION"),
        }),
    )
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
