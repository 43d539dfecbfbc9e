//! YouTube Data API connector implementation
//!
//! Implements [`VideoSource`] for YouTube Data API v3 using an API key.
//!
//! ## Workflow
//!
//! 1. Resolve the scope to a playlist (`channels.list` for a channel's
//!    uploads playlist)
//! 2. Page through `playlistItems.list` collecting video IDs
//! 3. Join each ID with `videos.list` details, 50 IDs per call
//!
//! Videos without a details entry (private or deleted) are dropped.

use async_trait::async_trait;
use bridge_traits::error::Result;
use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse, RetryPolicy};
use bridge_traits::{RawVideo, VideoScope, VideoSource};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::error::YouTubeError;
use crate::types::{ChannelListResponse, PlaylistItemListResponse, Video, VideoListResponse};

/// YouTube Data API base URL
const YOUTUBE_API_BASE: &str = "https://www.googleapis.com/youtube/v3";

/// Maximum results per page, and IDs per `videos.list` call
const PAGE_SIZE: usize = 50;

/// Upper bound on followed playlist pages
const MAX_PAGES: usize = 20;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// YouTube Data API connector
///
/// # Example
///
/// ```ignore
/// use provider_youtube::YouTubeConnector;
/// use bridge_traits::{VideoScope, VideoSource};
///
/// let connector = YouTubeConnector::new(http_client);
/// let videos = connector
///     .list_videos(&api_key, &VideoScope::Channel(channel_id))
///     .await?;
/// ```
pub struct YouTubeConnector {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    timeout: Duration,
}

impl YouTubeConnector {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            base_url: YOUTUBE_API_BASE.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn url(&self, resource: &str, params: &[(&str, &str)], api_key: &str) -> String {
        let mut url = format!("{}/{}?", self.base_url, resource);
        for (name, value) in params {
            url.push_str(&format!("{}={}&", name, urlencoding::encode(value)));
        }
        url.push_str(&format!("key={}", urlencoding::encode(api_key)));
        url
    }

    /// GET `url` and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, url: String) -> std::result::Result<T, YouTubeError> {
        let request = HttpRequest::get(url)
            .header("Accept", "application/json")
            .timeout(self.timeout);

        let response: HttpResponse = self
            .http_client
            .execute_with_retry(request, RetryPolicy::default())
            .await?;

        if !response.is_success() {
            warn!(status = response.status, "YouTube API request failed");
            return Err(YouTubeError::ApiError {
                status_code: response.status,
                message: response.text_lossy(),
            });
        }

        response
            .json()
            .map_err(|e| YouTubeError::ParseError(e.to_string()))
    }

    /// Uploads playlist of `channel_id`
    async fn uploads_playlist(
        &self,
        api_key: &str,
        channel_id: &str,
    ) -> std::result::Result<String, YouTubeError> {
        let url = self.url(
            "channels",
            &[("part", "contentDetails"), ("id", channel_id)],
            api_key,
        );
        let channels: ChannelListResponse = self.get_json(url).await?;

        channels
            .uploads_playlist()
            .map(str::to_string)
            .ok_or_else(|| YouTubeError::UploadsPlaylistNotFound {
                channel_id: channel_id.to_string(),
            })
    }

    /// Video IDs of `playlist_id`, in playlist order
    async fn playlist_video_ids(
        &self,
        api_key: &str,
        playlist_id: &str,
    ) -> std::result::Result<Vec<String>, YouTubeError> {
        let max_results = PAGE_SIZE.to_string();
        let mut ids = Vec::new();
        let mut page_token: Option<String> = None;

        for page in 1..=MAX_PAGES {
            let mut params = vec![
                ("part", "snippet,contentDetails"),
                ("playlistId", playlist_id),
                ("maxResults", max_results.as_str()),
            ];
            if let Some(token) = page_token.as_deref() {
                params.push(("pageToken", token));
            }

            let url = self.url("playlistItems", &params, api_key);
            let items: PlaylistItemListResponse = self.get_json(url).await?;

            ids.extend(
                items
                    .items
                    .iter()
                    .filter_map(|item| item.video_id())
                    .map(str::to_string),
            );
            debug!(page, collected = ids.len(), "Fetched playlist page");

            match items.next_page_token {
                Some(token) if !token.is_empty() => {
                    if page == MAX_PAGES {
                        warn!(max_pages = MAX_PAGES, "Playlist listing truncated at page limit");
                    }
                    page_token = Some(token);
                }
                _ => break,
            }
        }

        Ok(ids)
    }

    /// Details for `ids`, keyed by video ID
    async fn video_details(
        &self,
        api_key: &str,
        ids: &[String],
    ) -> std::result::Result<HashMap<String, Video>, YouTubeError> {
        let mut details = HashMap::with_capacity(ids.len());

        for chunk in ids.chunks(PAGE_SIZE) {
            let joined = chunk.join(",");
            let url = self.url(
                "videos",
                &[("part", "snippet,contentDetails,statistics"), ("id", joined.as_str())],
                api_key,
            );
            let videos: VideoListResponse = self.get_json(url).await?;
            details.extend(videos.items.into_iter().map(|v| (v.id.clone(), v)));
        }

        Ok(details)
    }

    async fn fetch(
        &self,
        api_key: &str,
        scope: &VideoScope,
    ) -> std::result::Result<Vec<RawVideo>, YouTubeError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(YouTubeError::InvalidInput(
                "YouTube API key is required".to_string(),
            ));
        }
        if scope.id().trim().is_empty() {
            return Err(YouTubeError::InvalidInput(
                "Either channel ID or playlist ID is required".to_string(),
            ));
        }

        let playlist_id = match scope {
            VideoScope::Playlist(id) => id.trim().to_string(),
            VideoScope::Channel(id) => self.uploads_playlist(api_key, id.trim()).await?,
        };

        let ids = self.playlist_video_ids(api_key, &playlist_id).await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut details = self.video_details(api_key, &ids).await?;

        let mut videos = Vec::with_capacity(ids.len());
        for id in &ids {
            match details.remove(id) {
                Some(video) => videos.push(RawVideo::from(video)),
                None => debug!(video_id = %id, "Skipping video without details"),
            }
        }

        Ok(videos)
    }
}

#[async_trait]
impl VideoSource for YouTubeConnector {
    #[instrument(skip_all, fields(scope = ?scope))]
    async fn list_videos(&self, api_key: &str, scope: &VideoScope) -> Result<Vec<RawVideo>> {
        info!("Listing videos from YouTube");

        let videos = self.fetch(api_key, scope).await?;

        info!(count = videos.len(), "Listed videos from YouTube");
        Ok(videos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::error::BridgeError;
    use bytes::Bytes;
    use mockall::mock;

    mock! {
        HttpClient {}

        #[async_trait]
        impl HttpClient for HttpClient {
            async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;
        }
    }

    fn ok(body: impl Into<String>) -> Result<HttpResponse> {
        Ok(HttpResponse {
            status: 200,
            headers: HashMap::new(),
            body: Bytes::from(body.into()),
        })
    }

    fn playlist_page(ids: &[&str], next: Option<&str>) -> String {
        let items: Vec<_> = ids
            .iter()
            .map(|id| serde_json::json!({ "contentDetails": { "videoId": id } }))
            .collect();
        let mut body = serde_json::json!({ "items": items });
        if let Some(next) = next {
            body["nextPageToken"] = serde_json::json!(next);
        }
        body.to_string()
    }

    fn details(ids: &[&str]) -> String {
        let items: Vec<_> = ids
            .iter()
            .map(|id| {
                serde_json::json!({
                    "id": id,
                    "snippet": {
                        "title": format!("Video {id}"),
                        "publishedAt": "2024-01-01T00:00:00Z",
                        "thumbnails": { "high": { "url": format!("https://i.ytimg.com/{id}.jpg") } }
                    },
                    "contentDetails": { "duration": "PT1M" },
                    "statistics": { "viewCount": "10" }
                })
            })
            .collect();
        serde_json::json!({ "items": items }).to_string()
    }

    #[tokio::test]
    async fn test_playlist_scope_skips_channel_lookup() {
        let mut mock_http = MockHttpClient::new();

        mock_http.expect_execute().times(2).returning(|req| {
            assert!(!req.url.contains("/channels?"));
            if req.url.contains("/playlistItems?") {
                assert!(req.url.contains("playlistId=PL1"));
                assert!(req.url.contains("maxResults=50"));
                ok(playlist_page(&["v2", "v1"], None))
            } else {
                assert!(req.url.contains("/videos?"));
                assert!(req.url.contains("id=v2%2Cv1"));
                ok(details(&["v1", "v2"]))
            }
        });

        let connector = YouTubeConnector::new(Arc::new(mock_http));
        let videos = connector
            .list_videos("key", &VideoScope::Playlist("PL1".to_string()))
            .await
            .unwrap();

        let ids: Vec<_> = videos.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["v2", "v1"]);
        assert_eq!(videos[0].thumbnail_url.as_deref(), Some("https://i.ytimg.com/v2.jpg"));
        assert_eq!(videos[0].view_count, 10);
    }

    #[tokio::test]
    async fn test_channel_scope_resolves_uploads() {
        let mut mock_http = MockHttpClient::new();

        mock_http.expect_execute().times(3).returning(|req| {
            if req.url.contains("/channels?") {
                assert!(req.url.contains("id=UC1"));
                ok(r#"{"items": [{"contentDetails": {"relatedPlaylists": {"uploads": "UU1"}}}]}"#)
            } else if req.url.contains("/playlistItems?") {
                assert!(req.url.contains("playlistId=UU1"));
                ok(playlist_page(&["a"], None))
            } else {
                ok(details(&["a"]))
            }
        });

        let connector = YouTubeConnector::new(Arc::new(mock_http));
        let videos = connector
            .list_videos("key", &VideoScope::Channel("UC1".to_string()))
            .await
            .unwrap();

        assert_eq!(videos.len(), 1);
    }

    #[tokio::test]
    async fn test_channel_without_uploads_is_error() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .times(1)
            .returning(|_| ok(r#"{"items": []}"#));

        let connector = YouTubeConnector::new(Arc::new(mock_http));
        let err = connector
            .list_videos("key", &VideoScope::Channel("UCnone".to_string()))
            .await
            .unwrap_err();

        assert!(err
            .to_string()
            .contains("Could not find uploads playlist for channel"));
    }

    #[tokio::test]
    async fn test_empty_playlist_makes_no_details_call() {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().times(1).returning(|req| {
            assert!(req.url.contains("/playlistItems?"));
            ok(playlist_page(&[], None))
        });

        let connector = YouTubeConnector::new(Arc::new(mock_http));
        let videos = connector
            .list_videos("key", &VideoScope::Playlist("PLempty".to_string()))
            .await
            .unwrap();

        assert!(videos.is_empty());
    }

    #[tokio::test]
    async fn test_playlist_paging_and_detail_chunks() {
        let first: Vec<String> = (0..50).map(|i| format!("p1-{i}")).collect();
        let second: Vec<String> = (0..5).map(|i| format!("p2-{i}")).collect();

        let mut mock_http = MockHttpClient::new();
        let mut seq = mockall::Sequence::new();

        let page_one = {
            let ids: Vec<&str> = first.iter().map(String::as_str).collect();
            playlist_page(&ids, Some("next"))
        };
        let page_two = {
            let ids: Vec<&str> = second.iter().map(String::as_str).collect();
            playlist_page(&ids, None)
        };
        let details_one = {
            let ids: Vec<&str> = first.iter().map(String::as_str).collect();
            details(&ids)
        };
        let details_two = {
            let ids: Vec<&str> = second.iter().map(String::as_str).collect();
            details(&ids)
        };

        mock_http
            .expect_execute()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_| ok(page_one.clone()));
        mock_http
            .expect_execute()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |req| {
                assert!(req.url.contains("pageToken=next"));
                ok(page_two.clone())
            });
        mock_http
            .expect_execute()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_| ok(details_one.clone()));
        mock_http
            .expect_execute()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_| ok(details_two.clone()));

        let connector = YouTubeConnector::new(Arc::new(mock_http));
        let videos = connector
            .list_videos("key", &VideoScope::Playlist("PL".to_string()))
            .await
            .unwrap();

        assert_eq!(videos.len(), 55);
        assert_eq!(videos[50].id, "p2-0");
    }

    #[tokio::test]
    async fn test_videos_without_details_are_skipped() {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().times(2).returning(|req| {
            if req.url.contains("/playlistItems?") {
                ok(playlist_page(&["public", "private"], None))
            } else {
                ok(details(&["public"]))
            }
        });

        let connector = YouTubeConnector::new(Arc::new(mock_http));
        let videos = connector
            .list_videos("key", &VideoScope::Playlist("PL".to_string()))
            .await
            .unwrap();

        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].id, "public");
    }

    #[tokio::test]
    async fn test_api_error_surfaces_body() {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().times(1).returning(|_| {
            Ok(HttpResponse {
                status: 403,
                headers: HashMap::new(),
                body: Bytes::from_static(b"{\"error\":{\"message\":\"quotaExceeded\"}}"),
            })
        });

        let connector = YouTubeConnector::new(Arc::new(mock_http));
        let err = connector
            .list_videos("key", &VideoScope::Playlist("PL".to_string()))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            BridgeError::ProviderStatus { status: 403, ref body, .. } if body.contains("quotaExceeded")
        ));
    }

    #[tokio::test]
    async fn test_blank_arguments_make_no_calls() {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().times(0);

        let connector = YouTubeConnector::new(Arc::new(mock_http));

        let err = connector
            .list_videos("", &VideoScope::Playlist("PL".to_string()))
            .await
            .unwrap_err();
        assert!(err.is_input_error());

        let err = connector
            .list_videos("key", &VideoScope::Channel("   ".to_string()))
            .await
            .unwrap_err();
        assert!(err.is_input_error());
    }
}
