//! YouTube Data API video search.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

#[derive(Debug, Error)]
pub enum VideoSearchError {
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Summary of one video, as returned to the browser.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct VideoInfo {
    pub title: String,
    pub thumbnail_url: String,
    pub video_id: String,
    pub channel_title: String,
}

#[async_trait]
pub trait VideoSearch: Send + Sync {
    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<VideoInfo>, VideoSearchError>;
}

// ---- YouTube API Structures ----

#[derive(Deserialize, Debug, Default)]
pub struct SearchResponse {
    #[serde(default)]
    pub items: Vec<SearchItem>,
}

#[derive(Deserialize, Debug)]
pub struct SearchItem {
    pub id: ItemId,
    #[serde(default)]
    pub snippet: Snippet,
}

#[derive(Deserialize, Debug)]
pub struct ItemId {
    #[serde(default, rename = "videoId")]
    pub video_id: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct Snippet {
    #[serde(default)]
    pub title: String,
    #[serde(default, rename = "channelTitle")]
    pub channel_title: String,
    #[serde(default)]
    pub thumbnails: Thumbnails,
}

#[derive(Deserialize, Debug, Default)]
pub struct Thumbnails {
    pub high: Option<Thumbnail>,
    pub medium: Option<Thumbnail>,
    pub default: Option<Thumbnail>,
}

#[derive(Deserialize, Debug)]
pub struct Thumbnail {
    pub url: String,
}

impl SearchResponse {
    /// Flatten the API items, skipping anything that isn't a video.
    pub fn into_videos(self) -> Vec<VideoInfo> {
        self.items
            .into_iter()
            .filter_map(|item| {
                let video_id = item.id.video_id?;
                let thumbnails = item.snippet.thumbnails;
                let thumbnail_url = thumbnails
                    .high
                    .or(thumbnails.medium)
                    .or(thumbnails.default)
                    .map(|t| t.url)
                    .unwrap_or_default();
                Some(VideoInfo {
                    title: item.snippet.title,
                    thumbnail_url,
                    video_id,
                    channel_title: item.snippet.channel_title,
                })
            })
            .collect()
    }
}

// ---- Implementation ----

pub struct YouTubeClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl YouTubeClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        YouTubeClient {
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }
}

#[async_trait]
impl VideoSearch for YouTubeClient {
    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<VideoInfo>, VideoSearchError> {
        debug!(%query, max_results, "search: called");
        let max_results = max_results.to_string();

        let response = self
            .http
            .get(format!("{}/search", self.base_url))
            .header("x-goog-api-key", self.api_key.as_str())
            .query(&[
                ("part", "snippet"),
                ("type", "video"),
                ("maxResults", max_results.as_str()),
                ("q", query),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            debug!(status, "search: API error");
            return Err(VideoSearchError::Api { status, message });
        }

        let raw = response.text().await?;
        let body: SearchResponse = serde_json::from_str(&raw)
            .map_err(|e| VideoSearchError::InvalidResponse(format!("malformed search response: {}", e)))?;
        let videos = body.into_videos();
        debug!(count = videos.len(), "search: success");
        Ok(videos)
    }
}
