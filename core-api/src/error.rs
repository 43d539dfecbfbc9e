//! API error envelope
//!
//! Every failure renders as `{"error": {"code", "message"}}`. The status is
//! derived from the error class: caller input is 400, a failing provider is
//! 502, anything else is 500.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use core_service::CoreError;
use serde_json::json;
use tracing::{error, warn};

pub const GOOGLE_DRIVE_SYNC_FAILED: &str = "GOOGLE_DRIVE_SYNC_FAILED";
pub const YOUTUBE_SYNC_FAILED: &str = "YOUTUBE_SYNC_FAILED";
pub const GOOGLE_DRIVE_CRON_SYNC_FAILED: &str = "GOOGLE_DRIVE_CRON_SYNC_FAILED";
pub const YOUTUBE_CRON_SYNC_FAILED: &str = "YOUTUBE_CRON_SYNC_FAILED";
pub const GET_SYNC_RUNS_FAILED: &str = "GET_SYNC_RUNS_FAILED";
pub const GET_CONTENT_FAILED: &str = "GET_CONTENT_FAILED";
pub const SAVE_SETTINGS_FAILED: &str = "SAVE_SETTINGS_FAILED";

#[derive(Debug, thiserror::Error)]
#[error("{code}: {message}")]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

impl ApiError {
    /// Rejected request, e.g. a malformed body or query.
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        let message = message.into();
        warn!(code, message = %message, "Rejected request");
        Self {
            status: StatusCode::BAD_REQUEST,
            code,
            message,
        }
    }

    /// Classify a service failure under the endpoint's `code`.
    pub fn from_core(code: &'static str, err: CoreError) -> Self {
        let status = if err.is_input_error() {
            StatusCode::BAD_REQUEST
        } else if err.is_provider_error() {
            StatusCode::BAD_GATEWAY
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        if status == StatusCode::BAD_REQUEST {
            warn!(code, error = %err, "Rejected request");
        } else {
            error!(code, status = status.as_u16(), error = %err, "Request failed");
        }

        Self {
            status,
            code,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": {
                "code": self.code,
                "message": self.message,
            }
        }));

        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_sync::SyncError;

    #[test]
    fn test_status_mapping() {
        let err = ApiError::from_core(
            YOUTUBE_SYNC_FAILED,
            SyncError::invalid_input("apiKey", "YouTube API key is required").into(),
        );
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.message.contains("YouTube API key is required"));

        let err = ApiError::from_core(
            YOUTUBE_SYNC_FAILED,
            SyncError::Provider("status 403".to_string()).into(),
        );
        assert_eq!(err.status, StatusCode::BAD_GATEWAY);

        let err = ApiError::from_core(
            YOUTUBE_CRON_SYNC_FAILED,
            SyncError::Configuration("YouTube API key not configured".to_string()).into(),
        );
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code, "YOUTUBE_CRON_SYNC_FAILED");
    }
}
