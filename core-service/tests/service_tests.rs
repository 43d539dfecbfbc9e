//! End-to-end tests for the service façade
//!
//! These tests wire the real SQLite repositories and the encrypted credential
//! store to a scripted HTTP client.

#![cfg(feature = "desktop-shims")]

use async_trait::async_trait;
use bridge_desktop::{CredentialCipher, SqliteCredentialStore};
use bridge_traits::error::Result as BridgeResult;
use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
use bridge_traits::storage::{CredentialKey, CredentialStore};
use bridge_traits::FixedClock;
use core_library::{db::create_test_pool, ContentFilter, MediaKind};
use core_runtime::AppConfig;
use core_service::{CoreDependencies, CoreService, SettingsPayload};
use core_sync::{ProviderKind, SyncRequest, SyncRunStatus, SyncTrigger};
use mockall::mock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

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
        {"id": "p2", "name": "two.jpg", "mimeType": "image/jpeg", "createdTime": "2024-03-01T00:00:00Z"}
    ]
}"#;

fn ok(body: &str) -> BridgeResult<HttpResponse> {
    Ok(HttpResponse {
        status: 200,
        headers: HashMap::new(),
        body: body.to_string().into_bytes().into(),
    })
}

fn config() -> AppConfig {
    AppConfig::builder()
        .database_path(":memory:")
        .credential_key_hex(CredentialCipher::generate().to_hex())
        .photo_sync_interval(Some(Duration::from_secs(3600)))
        .build()
        .unwrap()
}

async fn service(http: MockHttp) -> (CoreService, Arc<SqliteCredentialStore>) {
    let pool = create_test_pool().await.unwrap();
    let store = Arc::new(SqliteCredentialStore::new(
        pool.clone(),
        CredentialCipher::generate(),
    ));
    let deps = CoreDependencies::new(
        pool,
        Arc::new(http),
        store.clone(),
        Arc::new(FixedClock::at_timestamp(1_710_000_000)),
    );
    (CoreService::new(deps, config()), store)
}

#[tokio::test]
async fn test_manual_sync_then_read_content() {
    let mut http = MockHttp::new();
    http.expect_execute().times(1).returning(|_| ok(DRIVE_LISTING));

    let (core, _) = service(http).await;

    let summary = core
        .sync(SyncRequest::google_drive("key", "folder"))
        .await
        .unwrap();
    assert_eq!(summary.items_synced, 2);

    let content = core
        .get_content(ContentFilter::Only(MediaKind::Photo), false, None)
        .await
        .unwrap();

    assert_eq!(content.counts.photography, 2);
    assert_eq!(content.counts.videography, 0);
    assert!(content.videography.is_empty());
    assert_eq!(content.photography[0].external_id, "p2");
}

#[tokio::test]
async fn test_saved_settings_drive_scheduled_sync() {
    let mut http = MockHttp::new();
    http.expect_execute().times(1).returning(|req| {
        assert!(req.url.contains("key=stored-key"));
        ok(DRIVE_LISTING)
    });

    let (core, store) = service(http).await;

    let saved = core
        .save_settings(&SettingsPayload {
            google_drive_api_key: Some("stored-key".to_string()),
            google_drive_folder_id: Some("stored-folder".to_string()),
            youtube_channel_id: Some("   ".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(saved.settings_count, 2);
    assert_eq!(store.list_keys().await.unwrap().len(), 2);
    assert_ne!(
        store
            .stored_value(CredentialKey::GoogleDriveApiKey)
            .await
            .unwrap()
            .as_deref(),
        Some("stored-key")
    );

    core.sync_scheduled(ProviderKind::GoogleDrive).await.unwrap();

    let runs = core.sync_history(None, None).await.unwrap();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].trigger, SyncTrigger::Scheduled);
    assert_eq!(runs[0].status, SyncRunStatus::Completed);
}

#[tokio::test]
async fn test_invalid_request_is_input_error() {
    let mut http = MockHttp::new();
    http.expect_execute().times(0);

    let (core, _) = service(http).await;

    let err = core
        .sync(SyncRequest::youtube("key", None, None))
        .await
        .unwrap_err();
    assert!(err.is_input_error());

    let err = core
        .save_settings(&SettingsPayload::default())
        .await
        .unwrap_err();
    assert!(err.is_input_error());
}

#[tokio::test]
async fn test_provider_failure_is_provider_error() {
    let mut http = MockHttp::new();
    http.expect_execute().times(1).returning(|_| {
        Ok(HttpResponse {
            status: 403,
            headers: HashMap::new(),
            body: b"{\"error\":\"forbidden\"}".to_vec().into(),
        })
    });

    let (core, _) = service(http).await;

    let err = core
        .sync(SyncRequest::google_drive("key", "folder"))
        .await
        .unwrap_err();
    assert!(err.is_provider_error());
    assert!(err.to_string().contains("forbidden"));

    let runs = core
        .sync_history(Some(ProviderKind::GoogleDrive), Some(5))
        .await
        .unwrap();
    assert_eq!(runs[0].status, SyncRunStatus::Failed);
}

#[tokio::test]
async fn test_scheduler_follows_config() {
    let (core, _) = service(MockHttp::new()).await;

    let scheduler = core.scheduler();
    assert!(!scheduler.is_empty());

    core.health_check().await.unwrap();
}
