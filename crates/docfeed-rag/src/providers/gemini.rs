//! Gemini client for the Google Generative Language API
//!
//! Covers both the blocking `generateContent` call used by
//! normalization/chunking and the `streamGenerateContent?alt=sse` call
//! used by the answering path. Streaming is parsed incrementally: SSE
//! `data:` lines are drained from a byte buffer as they arrive, so the
//! first fragment is yielded before the response body completes.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::stream::BoxStream;
use futures_util::StreamExt;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::config::GenerationConfig;
use crate::error::{Error, GenerationErrorKind, Result};
use crate::generation::Prompt;
use crate::providers::generative::{FragmentStream, GenerativeProvider};

/// Google Generative Language API client
pub struct GeminiClient {
    client: Client,
    config: GenerationConfig,
}

#[derive(Serialize)]
struct GenerateRequest {
    #[serde(rename = "systemInstruction")]
    system_instruction: Content,
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenConfig,
}

#[derive(Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct GenConfig {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl GeminiClient {
    /// Create a new client with a bounded request timeout
    pub fn new(config: &GenerationConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    fn endpoint(&self, method: &str) -> String {
        format!(
            "{}/v1beta/models/{}:{}",
            self.config.base_url, self.config.model, method
        )
    }

    fn request_body(&self, prompt: &Prompt) -> GenerateRequest {
        GenerateRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: prompt.system.clone(),
                }],
            },
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: prompt.user.clone(),
                }],
            }],
            generation_config: GenConfig {
                temperature: self.config.temperature,
            },
        }
    }

    /// Map a non-success provider status to a tagged generation error
    async fn status_error(response: reqwest::Response) -> Error {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        let kind = match status {
            StatusCode::TOO_MANY_REQUESTS | StatusCode::FORBIDDEN => GenerationErrorKind::Quota,
            StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
                GenerationErrorKind::Timeout
            }
            _ => GenerationErrorKind::InvalidResponse,
        };

        Error::generation(kind, format!("HTTP {}: {}", status, body))
    }

    fn collect_text(response: GenerateResponse) -> Result<String> {
        let text: String = response
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .filter_map(|p| p.text)
            .collect();

        if text.is_empty() {
            return Err(Error::generation(
                GenerationErrorKind::InvalidResponse,
                "Response contained no text candidates",
            ));
        }

        Ok(text)
    }
}

#[async_trait]
impl GenerativeProvider for GeminiClient {
    async fn invoke(&self, prompt: &Prompt) -> Result<String> {
        let url = self.endpoint("generateContent");
        tracing::debug!(model = %self.config.model, "Invoking generative model");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&self.request_body(prompt))
            .send()
            .await
            .map_err(Error::from_generation_transport)?;

        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }

        let body: GenerateResponse = response.json().await.map_err(|e| {
            Error::generation(
                GenerationErrorKind::InvalidResponse,
                format!("Failed to parse generation response: {}", e),
            )
        })?;

        Self::collect_text(body)
    }

    async fn stream(&self, prompt: &Prompt) -> Result<FragmentStream> {
        let url = self.endpoint("streamGenerateContent");
        tracing::debug!(model = %self.config.model, "Starting streaming generation");

        let response = self
            .client
            .post(&url)
            .query(&[("alt", "sse")])
            .header("x-goog-api-key", &self.config.api_key)
            .json(&self.request_body(prompt))
            .send()
            .await
            .map_err(Error::from_generation_transport)?;

        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }

        Ok(sse_fragment_stream(response.bytes_stream().boxed()))
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

struct SseState {
    bytes: BoxStream<'static, reqwest::Result<bytes::Bytes>>,
    buffer: String,
    pending: VecDeque<String>,
    done: bool,
}

/// Turn a raw SSE byte stream into a stream of text fragments.
///
/// Dropping the returned stream drops the underlying response body, so
/// a disconnected client stops the upstream pull.
fn sse_fragment_stream(bytes: BoxStream<'static, reqwest::Result<bytes::Bytes>>) -> FragmentStream {
    let state = SseState {
        bytes,
        buffer: String::new(),
        pending: VecDeque::new(),
        done: false,
    };

    futures_util::stream::unfold(state, |mut state| async move {
        loop {
            if let Some(fragment) = state.pending.pop_front() {
                return Some((Ok(fragment), state));
            }
            if state.done {
                return None;
            }

            match state.bytes.next().await {
                Some(Ok(chunk)) => {
                    state.buffer.push_str(&String::from_utf8_lossy(&chunk));
                    for data in drain_data_lines(&mut state.buffer) {
                        if let Some(fragment) = fragment_from_event(&data) {
                            if !fragment.is_empty() {
                                state.pending.push_back(fragment);
                            }
                        }
                    }
                }
                Some(Err(e)) => {
                    state.done = true;
                    return Some((Err(Error::from_generation_transport(e)), state));
                }
                None => {
                    state.done = true;
                    // A truncating proxy can end the stream without a
                    // final newline; flush the leftover data line.
                    let residual = std::mem::take(&mut state.buffer);
                    if let Some(data) = data_payload(&residual) {
                        if let Some(fragment) = fragment_from_event(data) {
                            if !fragment.is_empty() {
                                state.pending.push_back(fragment);
                            }
                        }
                    }
                }
            }
        }
    })
    .boxed()
}

/// Remove complete lines from the buffer and return their `data:` payloads
fn drain_data_lines(buffer: &mut String) -> Vec<String> {
    let mut payloads = Vec::new();

    while let Some(pos) = buffer.find('\n') {
        let line: String = buffer.drain(..=pos).collect();
        if let Some(data) = data_payload(&line) {
            payloads.push(data.to_string());
        }
    }

    payloads
}

/// Extract the payload of one `data:` line, if it carries one
fn data_payload(line: &str) -> Option<&str> {
    let data = line
        .trim_end_matches(['\n', '\r'])
        .strip_prefix("data:")?
        .trim_start();
    if data.is_empty() || data == "[DONE]" {
        return None;
    }
    Some(data)
}

/// Extract the text fragment from one SSE event payload
fn fragment_from_event(data: &str) -> Option<String> {
    let event: GenerateResponse = serde_json::from_str(data).ok()?;
    let text: String = event
        .candidates
        .into_iter()
        .filter_map(|c| c.content)
        .flat_map(|c| c.parts)
        .filter_map(|p| p.text)
        .collect();
    Some(text)
}
