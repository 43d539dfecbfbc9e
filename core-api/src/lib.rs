//! # HTTP API
//!
//! axum surface over [`CoreService`]: sync triggers, sync history, content
//! reads, settings save and a health probe.

use axum::{
    routing::{get, post},
    Router,
};
use core_service::CoreService;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod api;
pub mod error;

pub use error::ApiError;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub core: CoreService,
}

impl AppState {
    pub fn new(core: CoreService) -> Self {
        Self { core }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/api/sync/google-drive", post(api::sync_google_drive))
        .route(
            "/api/sync/google-drive/scheduled",
            post(api::sync_google_drive_scheduled),
        )
        .route("/api/sync/youtube", post(api::sync_youtube))
        .route(
            "/api/sync/youtube/scheduled",
            post(api::sync_youtube_scheduled),
        )
        .route("/api/sync/runs", get(api::list_sync_runs))
        .route("/api/content", get(api::get_content))
        .route("/api/settings", post(api::save_settings));

    Router::new()
        .merge(api)
        .merge(api::health_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
