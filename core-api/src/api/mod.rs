//! HTTP handlers, grouped by resource

pub mod content;
pub mod health;
pub mod settings;
pub mod sync;

pub use content::get_content;
pub use health::health_routes;
pub use settings::save_settings;
pub use sync::{
    list_sync_runs, sync_google_drive, sync_google_drive_scheduled, sync_youtube,
    sync_youtube_scheduled,
};

use serde::Serialize;

/// Success envelope: `{"data": ...}`
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}
