//! Core service façade and bootstrap helpers.
//!
//! This crate wires host-provided bridge implementations (HTTP, credential
//! storage, clock) and the SQLite pool into the sync pipeline and the content
//! read path. Native hosts typically enable the `desktop-shims` feature (which
//! depends on `bridge-desktop`) and call [`bootstrap`] with an [`AppConfig`].

pub mod error;
pub mod scheduler;
pub mod settings;

pub use error::{CoreError, Result};
pub use scheduler::{ScheduledSync, SchedulerHandle, SyncScheduler};
pub use settings::{SettingsPayload, SettingsSaved, SettingsService};

use std::sync::Arc;

use bridge_traits::{http::HttpClient, storage::CredentialStore, time::Clock};
use core_library::{
    ContentFilter, ContentQuery, ContentReader, ContentSnapshot, MediaRepository,
    SqliteMediaRepository,
};
use core_runtime::AppConfig;
use core_sync::{
    ProviderKind, SqliteSyncRunRepository, SyncCoordinator, SyncRequest, SyncRun,
    SyncRunRepository, SyncSummary, SyncTrigger,
};
use provider_google_drive::GoogleDriveConnector;
use provider_youtube::YouTubeConnector;
use sqlx::SqlitePool;

/// Default number of runs returned by a history read
pub const DEFAULT_HISTORY_LIMIT: u32 = 20;
/// Upper bound on runs returned by a history read
pub const MAX_HISTORY_LIMIT: u32 = 100;

/// Aggregated handle to all bridge dependencies the core requires.
pub struct CoreDependencies {
    pub pool: SqlitePool,
    pub http_client: Arc<dyn HttpClient>,
    pub credential_store: Arc<dyn CredentialStore>,
    pub clock: Arc<dyn Clock>,
}

impl CoreDependencies {
    /// Construct a dependency bundle from explicit bridge handles.
    pub fn new(
        pool: SqlitePool,
        http_client: Arc<dyn HttpClient>,
        credential_store: Arc<dyn CredentialStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            pool,
            http_client,
            credential_store,
            clock,
        }
    }
}

/// Primary façade exposed to hosts.
#[derive(Clone)]
pub struct CoreService {
    config: Arc<AppConfig>,
    pool: SqlitePool,
    coordinator: Arc<SyncCoordinator>,
    content: Arc<ContentReader>,
    settings: Arc<SettingsService>,
}

impl CoreService {
    /// Create a new service from the provided dependencies.
    pub fn new(deps: CoreDependencies, config: AppConfig) -> Self {
        let media: Arc<dyn MediaRepository> =
            Arc::new(SqliteMediaRepository::new(deps.pool.clone()));
        let runs: Arc<dyn SyncRunRepository> =
            Arc::new(SqliteSyncRunRepository::new(deps.pool.clone()));

        let images = Arc::new(
            GoogleDriveConnector::new(deps.http_client.clone())
                .with_timeout(config.provider_timeout),
        );
        let videos = Arc::new(
            YouTubeConnector::new(deps.http_client.clone()).with_timeout(config.provider_timeout),
        );

        let coordinator = SyncCoordinator::new(
            images,
            videos,
            deps.credential_store.clone(),
            media.clone(),
            runs,
            deps.clock,
        );

        Self {
            config: Arc::new(config),
            pool: deps.pool,
            coordinator: Arc::new(coordinator),
            content: Arc::new(ContentReader::new(media)),
            settings: Arc::new(SettingsService::new(deps.credential_store)),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Run a manual sync with credentials from the request.
    pub async fn sync(&self, request: SyncRequest) -> Result<SyncSummary> {
        Ok(self.coordinator.sync(request, SyncTrigger::Manual).await?)
    }

    /// Run a sync with stored credentials.
    pub async fn sync_scheduled(&self, kind: ProviderKind) -> Result<SyncSummary> {
        Ok(self.coordinator.sync_scheduled(kind).await?)
    }

    /// Most recent runs, newest first.
    pub async fn sync_history(
        &self,
        kind: Option<ProviderKind>,
        limit: Option<u32>,
    ) -> Result<Vec<SyncRun>> {
        let limit = limit
            .filter(|&l| l > 0)
            .unwrap_or(DEFAULT_HISTORY_LIMIT)
            .min(MAX_HISTORY_LIMIT);
        Ok(self.coordinator.history(kind, limit).await?)
    }

    /// Newest-first content, with the limit clamped by configuration.
    pub async fn get_content(
        &self,
        filter: ContentFilter,
        featured_only: bool,
        limit: Option<u32>,
    ) -> Result<ContentSnapshot> {
        let query = ContentQuery::default()
            .with_filter(filter)
            .featured_only(featured_only)
            .with_limit(self.config.effective_content_limit(limit));
        Ok(self.content.get_content(&query).await?)
    }

    pub async fn save_settings(&self, payload: &SettingsPayload) -> Result<SettingsSaved> {
        self.settings.save(payload).await
    }

    /// Scheduler for the intervals in the configuration.
    pub fn scheduler(&self) -> SyncScheduler {
        SyncScheduler::new(self.coordinator.clone())
            .every(ProviderKind::GoogleDrive, self.config.photo_sync_interval)
            .every(ProviderKind::YouTube, self.config.video_sync_interval)
    }

    /// Verify the database answers.
    pub async fn health_check(&self) -> Result<()> {
        Ok(core_library::db::health_check(&self.pool).await?)
    }
}

/// Build a [`CoreService`] from configuration with the native bridges.
///
/// Opens (and migrates) the database, sets up the encrypted credential
/// store and the `reqwest` client.
///
/// ```ignore
/// let config = AppConfig::builder()
///     .database_path("folio.db")
///     .credential_key_hex(key_hex)
///     .build()?;
/// let core = core_service::bootstrap(config).await?;
/// ```
#[cfg(feature = "desktop-shims")]
pub async fn bootstrap(config: AppConfig) -> Result<CoreService> {
    use bridge_desktop::{CredentialCipher, ReqwestHttpClient, SqliteCredentialStore};
    use bridge_traits::time::SystemClock;
    use core_library::db::{create_pool, DatabaseConfig};
    use tracing::info;

    config.validate()?;

    let pool = create_pool(DatabaseConfig::new(&config.database_path)).await?;

    let cipher = CredentialCipher::from_hex(&config.credential_key_hex)
        .map_err(|e| CoreError::InitializationFailed(e.to_string()))?;
    let http_client = ReqwestHttpClient::with_timeout(config.provider_timeout)
        .map_err(|e| CoreError::InitializationFailed(e.to_string()))?;

    let deps = CoreDependencies::new(
        pool.clone(),
        Arc::new(http_client),
        Arc::new(SqliteCredentialStore::new(pool, cipher)),
        Arc::new(SystemClock),
    );

    info!(database = %config.database_path.display(), "Core service initialized");
    Ok(CoreService::new(deps, config))
}
