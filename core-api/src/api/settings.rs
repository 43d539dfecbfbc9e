//! Settings save endpoint

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use core_service::SettingsPayload;
use serde::Serialize;

use super::DataResponse;
use crate::error::{ApiError, SAVE_SETTINGS_FAILED};
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsResponse {
    pub message: &'static str,
    pub settings_count: usize,
}

/// POST /api/settings
pub async fn save_settings(
    State(state): State<AppState>,
    body: Result<Json<SettingsPayload>, JsonRejection>,
) -> Result<Json<DataResponse<SettingsResponse>>, ApiError> {
    let Json(payload) =
        body.map_err(|e| ApiError::bad_request(SAVE_SETTINGS_FAILED, e.body_text()))?;

    let saved = state
        .core
        .save_settings(&payload)
        .await
        .map_err(|e| ApiError::from_core(SAVE_SETTINGS_FAILED, e))?;

    Ok(Json(DataResponse::new(SettingsResponse {
        message: "Settings saved successfully",
        settings_count: saved.settings_count,
    })))
}
