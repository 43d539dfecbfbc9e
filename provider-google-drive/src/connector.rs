//! Google Drive API connector implementation
//!
//! Implements [`ImageSource`] for Google Drive API v3 using an API key.

use async_trait::async_trait;
use bridge_traits::error::Result;
use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse, RetryPolicy};
use bridge_traits::{ImageSource, RawFile};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::error::GoogleDriveError;
use crate::types::FilesListResponse;

/// Google Drive API base URL
const DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";

/// Results per page
const PAGE_SIZE: u32 = 100;

/// Upper bound on followed pages
const MAX_PAGES: usize = 50;

/// Fields to request for file resources
const FILE_FIELDS: &str =
    "nextPageToken,files(id,name,thumbnailLink,webViewLink,createdTime,mimeType,size)";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Google Drive API connector
///
/// Lists the image files directly inside a folder. The folder must be
/// readable with a plain API key (shared "anyone with the link").
///
/// # Example
///
/// ```ignore
/// use provider_google_drive::GoogleDriveConnector;
/// use bridge_traits::ImageSource;
///
/// let connector = GoogleDriveConnector::new(http_client);
/// let files = connector.list_images(&api_key, &folder_id).await?;
/// ```
pub struct GoogleDriveConnector {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    timeout: Duration,
}

impl GoogleDriveConnector {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            base_url: DRIVE_API_BASE.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Point the connector at another API root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Drive search expression for non-trashed images in `folder_id`
    fn folder_query(folder_id: &str) -> String {
        let escaped = folder_id.replace('\\', "\\\\").replace('\'', "\\'");
        format!(
            "'{}' in parents and mimeType contains 'image/' and trashed = false",
            escaped
        )
    }

    fn list_url(&self, api_key: &str, folder_id: &str, page_token: Option<&str>) -> String {
        let mut url = format!(
            "{}/files?q={}&key={}&fields={}&pageSize={}",
            self.base_url,
            urlencoding::encode(&Self::folder_query(folder_id)),
            urlencoding::encode(api_key),
            urlencoding::encode(FILE_FIELDS),
            PAGE_SIZE
        );

        if let Some(token) = page_token {
            url.push_str(&format!("&pageToken={}", urlencoding::encode(token)));
        }

        url
    }

    /// Execute a GET, turning non-success statuses into `ApiError`.
    async fn get(&self, url: String) -> std::result::Result<HttpResponse, GoogleDriveError> {
        let request = HttpRequest::get(url)
            .header("Accept", "application/json")
            .timeout(self.timeout);

        let response = self
            .http_client
            .execute_with_retry(request, RetryPolicy::default())
            .await?;

        if !response.is_success() {
            warn!(status = response.status, "Google Drive API request failed");
            return Err(GoogleDriveError::ApiError {
                status_code: response.status,
                message: response.text_lossy(),
            });
        }

        debug!(status = response.status, "Google Drive API request succeeded");
        Ok(response)
    }

    async fn list_folder(
        &self,
        api_key: &str,
        folder_id: &str,
    ) -> std::result::Result<Vec<RawFile>, GoogleDriveError> {
        if api_key.trim().is_empty() {
            return Err(GoogleDriveError::InvalidInput(
                "Google Drive API key is required".to_string(),
            ));
        }
        if folder_id.trim().is_empty() {
            return Err(GoogleDriveError::InvalidInput(
                "Google Drive folder ID is required".to_string(),
            ));
        }

        let mut files = Vec::new();
        let mut page_token: Option<String> = None;

        for page in 1..=MAX_PAGES {
            let url = self.list_url(api_key.trim(), folder_id.trim(), page_token.as_deref());
            let response = self.get(url).await?;

            let list: FilesListResponse = response.json().map_err(|e| {
                GoogleDriveError::ParseError(format!("Failed to parse files list response: {}", e))
            })?;

            let listed = list.files.len();
            files.extend(
                list.files
                    .into_iter()
                    .filter(|f| f.is_image())
                    .map(RawFile::from),
            );
            debug!(page, listed, "Fetched Google Drive page");

            match list.next_page_token {
                Some(token) if !token.is_empty() => {
                    if page == MAX_PAGES {
                        warn!(max_pages = MAX_PAGES, "Google Drive listing truncated at page limit");
                    }
                    page_token = Some(token);
                }
                _ => break,
            }
        }

        Ok(files)
    }
}

#[async_trait]
impl ImageSource for GoogleDriveConnector {
    #[instrument(skip_all, fields(folder_id = %folder_id))]
    async fn list_images(&self, api_key: &str, folder_id: &str) -> Result<Vec<RawFile>> {
        info!("Listing images from Google Drive");

        let files = self.list_folder(api_key, folder_id).await?;

        info!(count = files.len(), "Listed images from Google Drive");
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::error::BridgeError;
    use bytes::Bytes;
    use mockall::mock;
    use std::collections::HashMap;

    mock! {
        HttpClient {}

        #[async_trait]
        impl HttpClient for HttpClient {
            async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;
        }
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: HashMap::new(),
            body: Bytes::from(body.to_string()),
        }
    }

    #[test]
    fn test_list_url_encodes_query() {
        let connector = GoogleDriveConnector::new(Arc::new(MockHttpClient::new()));
        let url = connector.list_url("my key", "folder'1", Some("tok en"));

        assert!(url.starts_with("https://www.googleapis.com/drive/v3/files?q="));
        assert!(url.contains("key=my%20key"));
        assert!(url.contains("pageSize=100"));
        assert!(url.contains("pageToken=tok%20en"));
        assert!(url.contains(&*urlencoding::encode("'folder\\'1' in parents")));
        assert!(url.contains(&*urlencoding::encode("trashed = false")));
    }

    #[tokio::test]
    async fn test_list_images_success() {
        let mut mock_http = MockHttpClient::new();

        mock_http.expect_execute().times(1).returning(|req| {
            assert!(req.url.contains("fields="));
            assert!(!req.headers.contains_key("Authorization"));
            Ok(response(
                200,
                r#"{
                    "files": [
                        {
                            "id": "img1",
                            "name": "beach.jpg",
                            "mimeType": "image/jpeg",
                            "thumbnailLink": "https://thumb/img1",
                            "webViewLink": "https://view/img1",
                            "createdTime": "2024-01-01T00:00:00.000Z",
                            "size": "1024"
                        },
                        {
                            "id": "doc1",
                            "name": "notes.txt",
                            "mimeType": "text/plain"
                        }
                    ]
                }"#,
            ))
        });

        let connector = GoogleDriveConnector::new(Arc::new(mock_http));
        let files = connector.list_images("key", "folder").await.unwrap();

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].id, "img1");
        assert_eq!(files[0].thumbnail_link.as_deref(), Some("https://thumb/img1"));
    }

    #[tokio::test]
    async fn test_list_images_follows_pages() {
        let mut mock_http = MockHttpClient::new();
        let mut seq = mockall::Sequence::new();

        mock_http
            .expect_execute()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|req| {
                assert!(!req.url.contains("pageToken"));
                Ok(response(
                    200,
                    r#"{"files": [{"id": "a", "mimeType": "image/png"}], "nextPageToken": "p2"}"#,
                ))
            });
        mock_http
            .expect_execute()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|req| {
                assert!(req.url.contains("pageToken=p2"));
                Ok(response(200, r#"{"files": [{"id": "b", "mimeType": "image/png"}]}"#))
            });

        let connector = GoogleDriveConnector::new(Arc::new(mock_http));
        let files = connector.list_images("key", "folder").await.unwrap();

        let ids: Vec<_> = files.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_page_limit_stops_listing() {
        let mut mock_http = MockHttpClient::new();

        mock_http.expect_execute().times(MAX_PAGES).returning(|_| {
            Ok(response(
                200,
                r#"{"files": [{"id": "x", "mimeType": "image/png"}], "nextPageToken": "more"}"#,
            ))
        });

        let connector = GoogleDriveConnector::new(Arc::new(mock_http));
        let files = connector.list_images("key", "folder").await.unwrap();

        assert_eq!(files.len(), MAX_PAGES);
    }

    #[tokio::test]
    async fn test_empty_folder() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .times(1)
            .returning(|_| Ok(response(200, r#"{"files": []}"#)));

        let connector = GoogleDriveConnector::new(Arc::new(mock_http));
        assert!(connector.list_images("key", "folder").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_api_error_surfaces_body() {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().times(1).returning(|_| {
            Ok(response(
                400,
                r#"{"error": {"code": 400, "message": "API key not valid"}}"#,
            ))
        });

        let connector = GoogleDriveConnector::new(Arc::new(mock_http));
        let err = connector.list_images("bad", "folder").await.unwrap_err();

        match err {
            BridgeError::ProviderStatus { status, body, .. } => {
                assert_eq!(status, 400);
                assert!(body.contains("API key not valid"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_blank_arguments_make_no_calls() {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().times(0);

        let connector = GoogleDriveConnector::new(Arc::new(mock_http));

        assert!(connector.list_images("", "folder").await.unwrap_err().is_input_error());
        assert!(connector.list_images("key", "  ").await.unwrap_err().is_input_error());
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .times(1)
            .returning(|_| Ok(response(200, "<html>")));

        let connector = GoogleDriveConnector::new(Arc::new(mock_http));
        let err = connector.list_images("key", "folder").await.unwrap_err();
        assert!(matches!(err, BridgeError::OperationFailed(_)));
    }
}
