//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::gemini::GeneratorError;
use crate::youtube::VideoSearchError;

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Resource not found
    NotFound(String),
    /// Invalid request
    BadRequest(String),
    /// A required API key is not configured
    MissingConfig(&'static str),
    /// The generator replied with something that isn't JSON
    MalformedResponse,
    /// Upstream generator failure
    Generator(GeneratorError),
    /// Upstream video search failure
    VideoSearch(VideoSearchError),
    /// Internal server error
    Internal(String),
}

impl AppError {
    fn status_and_detail(self) -> (StatusCode, String) {
        match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::MissingConfig(key) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("{} is not configured on the server.", key),
            ),
            AppError::MalformedResponse => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "The AI response was not in a valid JSON format. Please try again.".to_string(),
            ),
            AppError::Generator(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("An internal error occurred: {}", e),
            ),
            AppError::VideoSearch(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to fetch videos: {}", e),
            ),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail) = self.status_and_detail();
        if status.is_server_error() {
            error!(%status, %detail, "request failed");
        }
        (status, Json(ErrorBody { detail })).into_response()
    }
}

impl From<GeneratorError> for AppError {
    fn from(err: GeneratorError) -> Self {
        AppError::Generator(err)
    }
}

impl From<VideoSearchError> for AppError {
    fn from(err: VideoSearchError) -> Self {
        AppError::VideoSearch(err)
    }
}
