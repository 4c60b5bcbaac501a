//! Application state for the HTTP server.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::config::Config;
use crate::gemini::{GeminiClient, TextGenerator};
use crate::youtube::{VideoSearch, YouTubeClient};

/// Shared application state passed to all handlers.
///
/// A missing API key leaves its client unset; the matching endpoints then
/// fail per request rather than at startup.
#[derive(Clone)]
pub struct AppState {
    pub generator: Option<Arc<dyn TextGenerator>>,
    pub video_search: Option<Arc<dyn VideoSearch>>,
    pub index_path: PathBuf,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(
        generator: Option<Arc<dyn TextGenerator>>,
        video_search: Option<Arc<dyn VideoSearch>>,
        index_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            generator,
            video_search,
            index_path: index_path.into(),
            started_at: Utc::now(),
        }
    }

    /// Build the real upstream clients from configuration.
    pub fn from_config(config: &Config) -> Self {
        let generator = config.gemini_api_key.as_ref().map(|key| {
            Arc::new(GeminiClient::new(
                key.clone(),
                config.gemini_model.clone(),
                config.gemini_base_url.clone(),
            )) as Arc<dyn TextGenerator>
        });
        let video_search = config.youtube_api_key.as_ref().map(|key| {
            Arc::new(YouTubeClient::new(key.clone(), config.youtube_base_url.clone())) as Arc<dyn VideoSearch>
        });
        Self::new(generator, video_search, config.index_path.clone())
    }
}
