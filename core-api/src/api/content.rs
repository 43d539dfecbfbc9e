//! Content read endpoint

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use core_library::{ContentFilter, ContentSnapshot};
use serde::Deserialize;

use super::DataResponse;
use crate::error::{ApiError, GET_CONTENT_FAILED};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ContentParams {
    /// `photography`, `videography` or `all`
    #[serde(rename = "type")]
    pub content_type: Option<String>,
    pub featured: Option<bool>,
    pub limit: Option<u32>,
}

/// GET /api/content?type=&featured=&limit=
pub async fn get_content(
    State(state): State<AppState>,
    params: Result<Query<ContentParams>, QueryRejection>,
) -> Result<Json<DataResponse<ContentSnapshot>>, ApiError> {
    let Query(params) =
        params.map_err(|e| ApiError::bad_request(GET_CONTENT_FAILED, e.body_text()))?;

    let filter = match params.content_type.as_deref().filter(|t| !t.is_empty()) {
        Some(value) => value
            .parse::<ContentFilter>()
            .map_err(|e| ApiError::from_core(GET_CONTENT_FAILED, e.into()))?,
        None => ContentFilter::All,
    };

    let snapshot = state
        .core
        .get_content(filter, params.featured.unwrap_or(false), params.limit)
        .await
        .map_err(|e| ApiError::from_core(GET_CONTENT_FAILED, e))?;

    Ok(Json(DataResponse::new(snapshot)))
}
