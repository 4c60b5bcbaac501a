//! Request and response bodies for the HTTP API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use crate::models::ScheduleRequest;
pub use crate::youtube::VideoInfo;

/// Query string for the video endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoQuery {
    pub topic: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub started_at: DateTime<Utc>,
    pub uptime_seconds: i64,
    pub generator_configured: bool,
    pub video_search_configured: bool,
}
