//! HTTP handlers for the API.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Query, State},
    http::header,
    response::{Html, IntoResponse, Response},
    Json,
};
use chrono::Utc;
use futures::{Stream, StreamExt};
use tracing::{debug, error, info, info_span, Instrument, Span};
use uuid::Uuid;

use super::dto::{HealthResponse, ScheduleRequest, VideoInfo, VideoQuery};
use super::error::AppError;
use super::state::AppState;
use crate::gemini::TextGenerator;
use crate::models::ScheduleRecord;
use crate::prompt::{build_prompt, clean_json_response, OutputFormat};
use crate::reassembler::{error_record, reassemble};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

pub const NDJSON_CONTENT_TYPE: &str = "application/x-ndjson";

/// Most videos returned by the video endpoint.
pub const MAX_VIDEOS: u32 = 5;

// =============================================================================
// Homepage
// =============================================================================

/// GET /
pub async fn serve_homepage(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    match tokio::fs::read_to_string(&state.index_path).await {
        Ok(page) => Ok(Html(page)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(AppError::NotFound(format!(
            "{} not found. Make sure the file is in the same directory.",
            state.index_path.display()
        ))),
        Err(e) => Err(AppError::Internal(format!(
            "An error occurred while reading the HTML file: {}",
            e
        ))),
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        started_at: state.started_at,
        uptime_seconds: (Utc::now() - state.started_at).num_seconds(),
        generator_configured: state.generator.is_some(),
        video_search_configured: state.video_search.is_some(),
    }))
}

// =============================================================================
// Schedule Generation
// =============================================================================

fn generator(state: &AppState) -> Result<Arc<dyn TextGenerator>, AppError> {
    state.generator.clone().ok_or(AppError::MissingConfig("GEMINI_API_KEY"))
}

/// Span for one schedule request. Everything logged while serving it,
/// including the client and reassembler, is recorded inside this span.
fn schedule_span(topic: &str) -> Span {
    let request_id = Uuid::new_v4();
    info_span!("schedule", %request_id, %topic)
}

/// POST /generate-schedule
///
/// Generate the whole schedule in one upstream call and return it as parsed JSON.
pub async fn generate_schedule(
    State(state): State<AppState>,
    Json(request): Json<ScheduleRequest>,
) -> HandlerResult<serde_json::Value> {
    let generator = generator(&state)?;
    let span = schedule_span(&request.topic);

    async move {
        info!(duration = %request.total_duration, "generate_schedule: called");

        let prompt = build_prompt(&request, OutputFormat::JsonArray);
        let text = generator.generate(&prompt).await?;

        let cleaned = clean_json_response(&text);
        let schedule: serde_json::Value = serde_json::from_str(&cleaned).map_err(|e| {
            let preview: String = text.chars().take(500).collect();
            error!(error = %e, raw = %preview, "generate_schedule: reply was not JSON");
            AppError::MalformedResponse
        })?;

        debug!("generate_schedule: success");
        Ok::<_, AppError>(Json(schedule))
    }
    .instrument(span)
    .await
}

/// POST /generate-schedule-stream
///
/// Stream the schedule as ND-JSON, one record per line, as the generator
/// produces it. Upstream failures after this point arrive as a final
/// `{"error": ...}` record, not as an HTTP error status.
pub async fn generate_schedule_stream(
    State(state): State<AppState>,
    Json(request): Json<ScheduleRequest>,
) -> Result<Response, AppError> {
    let generator = generator(&state)?;
    let span = schedule_span(&request.topic);
    span.in_scope(|| info!(duration = %request.total_duration, "generate_schedule_stream: called"));

    let prompt = build_prompt(&request, OutputFormat::Ndjson);
    let body = Body::from_stream(ndjson_body(generator, prompt, span));

    Ok(([(header::CONTENT_TYPE, NDJSON_CONTENT_TYPE)], body).into_response())
}

/// Newline-terminated records for the response body.
///
/// The body is polled long after the handler returns, so every upstream
/// poll is instrumented with the request span.
fn ndjson_body(
    generator: Arc<dyn TextGenerator>,
    prompt: String,
    span: Span,
) -> impl Stream<Item = Result<String, Infallible>> + Send + 'static {
    async_stream::stream! {
        let opened = generator.generate_stream(&prompt).instrument(span.clone()).await;
        let fragments = match opened {
            Ok(fragments) => fragments,
            Err(e) => {
                span.in_scope(|| error!(error = %e, "generate_schedule_stream: upstream call failed"));
                yield Ok(format!("{}\n", error_record(&e)));
                return;
            }
        };

        let records = reassemble(fragments);
        futures::pin_mut!(records);
        let mut count = 0usize;
        while let Some(record) = records.next().instrument(span.clone()).await {
            if !ScheduleRecord::conforms(&record) {
                span.in_scope(|| debug!(line = %record, "generate_schedule_stream: forwarding non-conforming line"));
            }
            count += 1;
            yield Ok(format!("{}\n", record));
        }
        span.in_scope(|| info!(records = count, "generate_schedule_stream: finished"));
    }
}

// =============================================================================
// Videos
// =============================================================================

/// GET /youtube-videos?topic=...
pub async fn youtube_videos(
    State(state): State<AppState>,
    Query(query): Query<VideoQuery>,
) -> HandlerResult<Vec<VideoInfo>> {
    let topic = query.topic.trim();
    if topic.is_empty() {
        return Err(AppError::BadRequest("topic must not be empty".to_string()));
    }
    let search = state
        .video_search
        .clone()
        .ok_or(AppError::MissingConfig("YOUTUBE_API_KEY"))?;

    let mut videos = search.search(&format!("{} tutorial", topic), MAX_VIDEOS).await?;
    videos.truncate(MAX_VIDEOS as usize);
    debug!(%topic, count = videos.len(), "youtube_videos: success");
    Ok(Json(videos))
}
