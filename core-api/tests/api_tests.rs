//! Router tests
//!
//! Requests go through the full axum stack with the real SQLite repositories
//! and a scripted HTTP client standing in for the providers.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use bridge_desktop::{CredentialCipher, SqliteCredentialStore};
use bridge_traits::error::Result as BridgeResult;
use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
use bridge_traits::FixedClock;
use core_api::{build_router, AppState};
use core_library::db::create_test_pool;
use core_runtime::AppConfig;
use core_service::{CoreDependencies, CoreService};
use mockall::mock;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tower::util::ServiceExt;

mock! {
    Http {}

    #[async_trait]
    impl HttpClient for Http {
        async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse>;
    }
}

const DRIVE_LISTING: &str = r#"{
    "files": [
        {"id": "p1", "name": "one.jpg", "mimeType": "image/jpeg", "createdTime": "2024-02-01T00:00:00Z"},
        {"id": "p2", "name": "two.jpg", "mimeType": "image/jpeg", "createdTime": "2024-03-01T00:00:00Z"},
        {"id": "d1", "name": "notes.pdf", "mimeType": "application/pdf"}
    ]
}"#;

fn respond(status: u16, body: &str) -> BridgeResult<HttpResponse> {
    Ok(HttpResponse {
        status,
        headers: HashMap::new(),
        body: body.to_string().into_bytes().into(),
    })
}

async fn app(http: MockHttp) -> Router {
    let pool = create_test_pool().await.unwrap();
    let store = Arc::new(SqliteCredentialStore::new(
        pool.clone(),
        CredentialCipher::generate(),
    ));
    let deps = CoreDependencies::new(
        pool,
        Arc::new(http),
        store,
        Arc::new(FixedClock::at_timestamp(1_710_000_000)),
    );
    let config = AppConfig::builder()
        .database_path(":memory:")
        .credential_key_hex(CredentialCipher::generate().to_hex())
        .build()
        .unwrap();

    build_router(AppState::new(CoreService::new(deps, config)))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_empty(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = app(MockHttp::new()).await;

    let (status, body) = send(&app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_content_on_empty_database() {
    let app = app(MockHttp::new()).await;

    let (status, body) = send(&app, get("/api/content")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["photography"], json!([]));
    assert_eq!(body["data"]["videography"], json!([]));
    assert_eq!(body["data"]["counts"]["total"], 0);
}

#[tokio::test]
async fn test_content_rejects_unknown_type() {
    let app = app(MockHttp::new()).await;

    let (status, body) = send(&app, get("/api/content?type=audio")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "GET_CONTENT_FAILED");
}

#[tokio::test]
async fn test_drive_sync_requires_folder() {
    let mut http = MockHttp::new();
    http.expect_execute().times(0);
    let app = app(http).await;

    let (status, body) = send(
        &app,
        post_json("/api/sync/google-drive", json!({ "apiKey": "key" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "GOOGLE_DRIVE_SYNC_FAILED");
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let app = app(MockHttp::new()).await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/sync/youtube")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "YOUTUBE_SYNC_FAILED");
}

#[tokio::test]
async fn test_drive_sync_then_read_content() {
    let mut http = MockHttp::new();
    http.expect_execute()
        .times(1)
        .returning(|_| respond(200, DRIVE_LISTING));
    let app = app(http).await;

    let (status, body) = send(
        &app,
        post_json(
            "/api/sync/google-drive",
            json!({ "apiKey": "key", "folderId": "folder" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"]["message"],
        "Google Drive sync completed successfully"
    );
    assert_eq!(body["data"]["itemsSynced"], 2);
    assert_eq!(body["data"]["totalFetched"], 2);

    let (status, body) = send(&app, get("/api/content?type=photography&limit=1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["photography"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["photography"][0]["external_id"], "p2");
    assert_eq!(body["data"]["counts"]["photography"], 1);

    let (status, body) = send(&app, get("/api/sync/runs?kind=google_drive")).await;
    assert_eq!(status, StatusCode::OK);
    let runs = body["data"].as_array().unwrap();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0]["status"], "completed");
    assert_eq!(runs[0]["items_synced"], 2);
}

#[tokio::test]
async fn test_provider_rejection_is_bad_gateway() {
    let mut http = MockHttp::new();
    http.expect_execute()
        .times(1)
        .returning(|_| respond(403, r#"{"error":{"message":"API key not valid"}}"#));
    let app = app(http).await;

    let (status, body) = send(
        &app,
        post_json("/api/sync/youtube", json!({ "apiKey": "bad", "playlistId": "PL1" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["code"], "YOUTUBE_SYNC_FAILED");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("API key not valid"));

    let (_, body) = send(&app, get("/api/sync/runs")).await;
    assert_eq!(body["data"][0]["status"], "failed");
}

#[tokio::test]
async fn test_settings_save_counts_fields() {
    let app = app(MockHttp::new()).await;

    let (status, body) = send(&app, post_json("/api/settings", json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "SAVE_SETTINGS_FAILED");

    let (status, body) = send(
        &app,
        post_json(
            "/api/settings",
            json!({
                "youtubeApiKey": "yt-key",
                "youtubePlaylistId": "PL1",
                "googleDriveFolderId": ""
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["message"], "Settings saved successfully");
    assert_eq!(body["data"]["settingsCount"], 2);
}

#[tokio::test]
async fn test_scheduled_sync_without_credentials() {
    let mut http = MockHttp::new();
    http.expect_execute().times(0);
    let app = app(http).await;

    let (status, body) = send(&app, post_empty("/api/sync/youtube/scheduled")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "YOUTUBE_CRON_SYNC_FAILED");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("YouTube API key not configured"));
}

#[tokio::test]
async fn test_sync_runs_rejects_unknown_kind() {
    let app = app(MockHttp::new()).await;

    let (status, body) = send(&app, get("/api/sync/runs?kind=vimeo")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "GET_SYNC_RUNS_FAILED");
}
