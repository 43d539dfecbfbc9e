//! Sync trigger and history endpoints

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    Json,
};
use core_sync::{ProviderKind, SyncRequest, SyncRun, SyncSummary};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::DataResponse;
use crate::error::{
    ApiError, GET_SYNC_RUNS_FAILED, GOOGLE_DRIVE_CRON_SYNC_FAILED, GOOGLE_DRIVE_SYNC_FAILED,
    YOUTUBE_CRON_SYNC_FAILED, YOUTUBE_SYNC_FAILED,
};
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleDriveSyncBody {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub folder_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YouTubeSyncBody {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub channel_id: Option<String>,
    #[serde(default)]
    pub playlist_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResponse {
    pub message: String,
    pub items_synced: u64,
    pub total_fetched: u64,
}

impl SyncResponse {
    fn new(message: impl Into<String>, summary: SyncSummary) -> Self {
        Self {
            message: message.into(),
            items_synced: summary.items_synced,
            total_fetched: summary.total_fetched,
        }
    }
}

type SyncResult = Result<Json<DataResponse<SyncResponse>>, ApiError>;

/// POST /api/sync/google-drive
pub async fn sync_google_drive(
    State(state): State<AppState>,
    body: Result<Json<GoogleDriveSyncBody>, JsonRejection>,
) -> SyncResult {
    let Json(body) = body.map_err(|e| ApiError::bad_request(GOOGLE_DRIVE_SYNC_FAILED, e.body_text()))?;

    let summary = state
        .core
        .sync(SyncRequest::google_drive(body.api_key, body.folder_id))
        .await
        .map_err(|e| ApiError::from_core(GOOGLE_DRIVE_SYNC_FAILED, e))?;

    Ok(Json(DataResponse::new(SyncResponse::new(
        "Google Drive sync completed successfully",
        summary,
    ))))
}

/// POST /api/sync/youtube
pub async fn sync_youtube(
    State(state): State<AppState>,
    body: Result<Json<YouTubeSyncBody>, JsonRejection>,
) -> SyncResult {
    let Json(body) = body.map_err(|e| ApiError::bad_request(YOUTUBE_SYNC_FAILED, e.body_text()))?;

    let summary = state
        .core
        .sync(SyncRequest::youtube(
            body.api_key,
            body.channel_id,
            body.playlist_id,
        ))
        .await
        .map_err(|e| ApiError::from_core(YOUTUBE_SYNC_FAILED, e))?;

    Ok(Json(DataResponse::new(SyncResponse::new(
        "YouTube sync completed successfully",
        summary,
    ))))
}

/// POST /api/sync/google-drive/scheduled
pub async fn sync_google_drive_scheduled(State(state): State<AppState>) -> SyncResult {
    scheduled(
        &state,
        ProviderKind::GoogleDrive,
        GOOGLE_DRIVE_CRON_SYNC_FAILED,
    )
    .await
}

/// POST /api/sync/youtube/scheduled
pub async fn sync_youtube_scheduled(State(state): State<AppState>) -> SyncResult {
    scheduled(&state, ProviderKind::YouTube, YOUTUBE_CRON_SYNC_FAILED).await
}

async fn scheduled(state: &AppState, kind: ProviderKind, code: &'static str) -> SyncResult {
    info!(kind = %kind, "Scheduled sync requested over HTTP");

    let summary = state
        .core
        .sync_scheduled(kind)
        .await
        .map_err(|e| ApiError::from_core(code, e))?;

    Ok(Json(DataResponse::new(SyncResponse::new(
        format!("Scheduled {} sync completed successfully", kind.display_name()),
        summary,
    ))))
}

#[derive(Debug, Default, Deserialize)]
pub struct SyncRunsParams {
    pub kind: Option<String>,
    pub limit: Option<u32>,
}

/// GET /api/sync/runs?kind=&limit=
pub async fn list_sync_runs(
    State(state): State<AppState>,
    params: Result<Query<SyncRunsParams>, QueryRejection>,
) -> Result<Json<DataResponse<Vec<SyncRun>>>, ApiError> {
    let Query(params) =
        params.map_err(|e| ApiError::bad_request(GET_SYNC_RUNS_FAILED, e.body_text()))?;

    let kind = params
        .kind
        .as_deref()
        .filter(|k| !k.is_empty())
        .map(str::parse::<ProviderKind>)
        .transpose()
        .map_err(|e| ApiError::from_core(GET_SYNC_RUNS_FAILED, e.into()))?;

    let runs = state
        .core
        .sync_history(kind, params.limit)
        .await
        .map_err(|e| ApiError::from_core(GET_SYNC_RUNS_FAILED, e))?;

    Ok(Json(DataResponse::new(runs)))
}
