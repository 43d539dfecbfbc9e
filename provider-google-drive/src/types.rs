//! Google Drive API response types
//!
//! Data structures for deserializing Google Drive API v3 responses.

use bridge_traits::RawFile;
use serde::Deserialize;

/// Google Drive API file resource, restricted to the requested fields
///
/// See: https://developers.google.com/drive/api/v3/reference/files#resource
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    pub id: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub mime_type: Option<String>,

    /// Short-lived thumbnail URL
    #[serde(default)]
    pub thumbnail_link: Option<String>,

    /// Link for opening the file in a browser
    #[serde(default)]
    pub web_view_link: Option<String>,

    /// Creation time (RFC 3339)
    #[serde(default)]
    pub created_time: Option<String>,

    /// File size in bytes, as a decimal string
    #[serde(default)]
    pub size: Option<String>,
}

impl DriveFile {
    pub fn is_image(&self) -> bool {
        self.mime_type
            .as_deref()
            .is_some_and(|m| m.starts_with("image/"))
    }
}

impl From<DriveFile> for RawFile {
    fn from(file: DriveFile) -> Self {
        RawFile {
            id: file.id,
            name: file.name,
            mime_type: file.mime_type,
            thumbnail_link: file.thumbnail_link,
            web_view_link: file.web_view_link,
            created_time: file.created_time,
            size: file.size,
        }
    }
}

/// Google Drive API files.list response
///
/// See: https://developers.google.com/drive/api/v3/reference/files/list
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilesListResponse {
    #[serde(default)]
    pub files: Vec<DriveFile>,

    /// Token for next page
    #[serde(default)]
    pub next_page_token: Option<String>,
}
