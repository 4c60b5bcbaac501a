//! Gemini generative-language client.
//!
//! Supports one-shot generation (`generateContent`) and streamed generation
//! (`streamGenerateContent?alt=sse`). The streamed variant yields the text of
//! each server-sent event as one fragment; callers reassemble lines themselves.

use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::reassembler::LineBuffer;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Errors that can occur while talking to the generator.
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Text fragments of a streamed generation.
pub type FragmentStream = BoxStream<'static, Result<String, GeneratorError>>;

/// Something that turns a prompt into text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate the complete reply in one call.
    async fn generate(&self, prompt: &str) -> Result<String, GeneratorError>;

    /// Start a streamed generation. Errors after the stream is open arrive as
    /// items of the stream.
    async fn generate_stream(&self, prompt: &str) -> Result<FragmentStream, GeneratorError>;
}

// ---- Gemini API Structures ----

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Part {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Serialize, Debug)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

#[derive(Deserialize, Debug)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default, rename = "finishReason")]
    pub finish_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub message: String,
}

#[derive(Deserialize, Debug)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub error: Option<ApiErrorBody>,
}

impl GenerateContentRequest {
    pub fn from_prompt(prompt: &str) -> Self {
        GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
        }
    }
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate.
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }

    fn into_result(self) -> Result<Self, GeneratorError> {
        match self.error {
            Some(err) => Err(GeneratorError::Api {
                status: err.code.unwrap_or(500),
                message: err.message,
            }),
            None => Ok(self),
        }
    }
}

// ---- Stream decoding ----

/// Decodes byte chunks as UTF-8, holding back a multi-byte character that is
/// split across chunk boundaries until the rest of it arrives.
#[derive(Debug, Default)]
struct Utf8Decoder {
    pending: Vec<u8>,
}

impl Utf8Decoder {
    fn push(&mut self, chunk: &[u8]) -> String {
        self.pending.extend_from_slice(chunk);

        let mut text = String::new();
        let mut start = 0;
        loop {
            match std::str::from_utf8(&self.pending[start..]) {
                Ok(valid) => {
                    text.push_str(valid);
                    start = self.pending.len();
                    break;
                }
                Err(e) => {
                    let valid_end = start + e.valid_up_to();
                    text.push_str(&String::from_utf8_lossy(&self.pending[start..valid_end]));
                    match e.error_len() {
                        Some(len) => {
                            text.push(char::REPLACEMENT_CHARACTER);
                            start = valid_end + len;
                        }
                        // An incomplete trailing sequence; keep it for the next chunk.
                        None => {
                            start = valid_end;
                            break;
                        }
                    }
                }
            }
        }
        self.pending.drain(..start);
        text
    }

    fn finish(self) -> String {
        String::from_utf8_lossy(&self.pending).into_owned()
    }
}

/// Extract the generated text from one SSE line. Non-data lines yield `None`.
fn decode_sse_line(line: &str) -> Result<Option<String>, GeneratorError> {
    let Some(data) = line.strip_prefix("data:") else {
        return Ok(None);
    };
    let data = data.trim();
    if data.is_empty() || data == "[DONE]" {
        return Ok(None);
    }

    let payload: GenerateContentResponse = serde_json::from_str(data).map_err(|e| {
        let preview: String = data.chars().take(200).collect();
        warn!(error = %e, data_preview = %preview, "decode_sse_line: invalid JSON payload");
        GeneratorError::InvalidResponse(format!("malformed stream payload: {}", e))
    })?;

    let text = payload.into_result()?.text();
    Ok((!text.is_empty()).then_some(text))
}

/// Decode a server-sent-event byte stream into generated text fragments.
///
/// The first transport or payload error is yielded and ends the stream.
fn sse_fragments<S, B, E>(bytes: S) -> impl futures::Stream<Item = Result<String, GeneratorError>>
where
    S: futures::Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: Into<GeneratorError>,
{
    async_stream::stream! {
        futures::pin_mut!(bytes);
        let mut decoder = Utf8Decoder::default();
        let mut events = LineBuffer::new();

        while let Some(chunk) = bytes.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    yield Err(e.into());
                    return;
                }
            };
            for line in events.ingest(&decoder.push(chunk.as_ref())) {
                match decode_sse_line(&line) {
                    Ok(Some(text)) => {
                        yield Ok(text);
                    }
                    Ok(None) => {}
                    Err(e) => {
                        yield Err(e);
                        return;
                    }
                }
            }
        }

        let mut tail = events.ingest(&decoder.finish());
        tail.extend(events.finish());
        for line in tail {
            match decode_sse_line(&line) {
                Ok(Some(text)) => {
                    yield Ok(text);
                }
                Ok(None) => {}
                Err(e) => {
                    yield Err(e);
                    return;
                }
            }
        }
        debug!("sse_fragments: upstream finished");
    }
}

// ---- Implementation ----

/// Gemini API client
pub struct GeminiClient {
    model: String,
    api_key: String,
    base_url: String,
    http: Client,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, base_url: impl Into<String>) -> Self {
        GeminiClient {
            model: model.into(),
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/models/{}:{}", self.base_url, self.model, method)
    }

    async fn post(&self, url: &str, query: &[(&str, &str)], prompt: &str) -> Result<reqwest::Response, GeneratorError> {
        let response = self
            .http
            .post(url)
            .query(query)
            .header("x-goog-api-key", self.api_key.as_str())
            .json(&GenerateContentRequest::from_prompt(prompt))
            .send()
            .await?;

        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            debug!(status, "post: API error");
            Err(GeneratorError::Api { status, message })
        }
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, GeneratorError> {
        debug!(model = %self.model, prompt_len = prompt.len(), "generate: called");
        let url = self.endpoint("generateContent");
        let response = self.post(&url, &[], prompt).await?;

        let raw = response.text().await?;
        let body: GenerateContentResponse = serde_json::from_str(&raw)
            .map_err(|e| GeneratorError::InvalidResponse(format!("malformed response body: {}", e)))?;
        let body = body.into_result()?;
        let finish_reason = body.candidates.first().and_then(|c| c.finish_reason.clone());
        let text = body.text();
        debug!(text_len = text.len(), ?finish_reason, "generate: success");
        Ok(text)
    }

    async fn generate_stream(&self, prompt: &str) -> Result<FragmentStream, GeneratorError> {
        debug!(model = %self.model, prompt_len = prompt.len(), "generate_stream: called");
        let url = self.endpoint("streamGenerateContent");
        let response = self.post(&url, &[("alt", "sse")], prompt).await?;

        Ok(Box::pin(sse_fragments(response.bytes_stream())))
    }
}
