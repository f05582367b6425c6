//! Gemini AI provider implementation.
//!
//! Talks to the Gemini REST API (`v1beta`). Supports both streaming (SSE) and
//! non-streaming responses, inline image parts, Google Search grounding and
//! the thinking budget.

use super::{
    FinishReason, GenerationRequest, ProviderError, ProviderResponse, ProviderStream,
    RequestPart, StreamChunk, TextProvider,
};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use futures::StreamExt;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini provider configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
    /// Whole-request timeout; `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

/// Gemini text provider.
pub struct GeminiTextProvider {
    config: GeminiConfig,
    client: Client,
}

impl GeminiTextProvider {
    pub fn new(config: GeminiConfig) -> Result<Self, ProviderError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self { config, client })
    }

    /// Build the API URL for the given model and method.
    fn api_url(&self, method: &str) -> String {
        format!(
            "{}/models/{}:{}",
            self.config.api_base.trim_end_matches('/'),
            self.config.model,
            method
        )
    }

    async fn post(
        &self,
        url: &str,
        request: &GenerateContentRequest,
    ) -> Result<Response, ProviderError> {
        let response = self
            .client
            .post(url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            if status.as_u16() == 429 {
                return Err(ProviderError::RateLimited);
            }

            return Err(ProviderError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl TextProvider for GeminiTextProvider {
    fn model(&self) -> &str {
        &self.config.model
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<ProviderResponse, ProviderError> {
        let body = GenerateContentRequest::from_request(request);
        let url = self.api_url("generateContent");

        tracing::debug!(
            model = %self.config.model,
            part_count = request.parts.len(),
            "Sending request to Gemini API"
        );

        let api_response: GenerateContentResponse = self
            .post(&url, &body)
            .await?
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        if api_response.is_blocked() {
            return Err(ProviderError::ContentFiltered);
        }

        let finish_reason = api_response
            .finish_reason()
            .unwrap_or(FinishReason::Complete);
        let usage = api_response.usage_metadata.clone().unwrap_or_default();

        Ok(ProviderResponse {
            text: api_response.text(),
            input_tokens: usage.prompt_token_count.unwrap_or(0),
            output_tokens: usage.candidates_token_count.unwrap_or(0),
            finish_reason,
        })
    }

    async fn generate_stream(
        &self,
        request: &GenerationRequest,
    ) -> Result<ProviderStream, ProviderError> {
        let body = GenerateContentRequest::from_request(request);
        let url = format!("{}?alt=sse", self.api_url("streamGenerateContent"));

        tracing::debug!(
            model = %self.config.model,
            part_count = request.parts.len(),
            google_search = request.google_search,
            "Starting streaming request to Gemini API"
        );

        let response = self.post(&url, &body).await?;

        let (tx, rx) = mpsc::channel(32);

        // Decode the SSE body off the request task; a dropped receiver ends it.
        tokio::spawn(async move {
            let mut stream = response.bytes_stream();
            let mut decoder = SseDecoder::default();
            let mut input_tokens = 0i32;
            let mut output_tokens = 0i32;
            let mut finish_reason = FinishReason::Complete;

            loop {
                let (events, done) = match stream.next().await {
                    Some(Ok(bytes)) => (decoder.push(&bytes), false),
                    Some(Err(e)) => {
                        let _ = tx.send(Err(ProviderError::Network(e))).await;
                        return;
                    }
                    None => (decoder.finish().into_iter().collect(), true),
                };

                for data in events {
                    let response = match serde_json::from_str::<GenerateContentResponse>(&data) {
                        Ok(response) => response,
                        Err(e) => {
                            tracing::debug!(error = %e, "Skipping malformed SSE event");
                            continue;
                        }
                    };

                    if let Some(usage) = &response.usage_metadata {
                        input_tokens = usage.prompt_token_count.unwrap_or(input_tokens);
                        output_tokens = usage.candidates_token_count.unwrap_or(output_tokens);
                    }
                    if let Some(reason) = response.finish_reason() {
                        finish_reason = reason;
                    }

                    let text = response.text();
                    if !text.is_empty() && tx.send(Ok(StreamChunk::Text(text))).await.is_err() {
                        return;
                    }
                }

                if done {
                    break;
                }
            }

            let _ = tx
                .send(Ok(StreamChunk::Complete {
                    input_tokens,
                    output_tokens,
                    finish_reason,
                }))
                .await;
        });

        Ok(Box::pin(ReceiverStream::new(rx)) as ProviderStream)
    }
}

/// Incremental decoder for `text/event-stream` bodies.
///
/// Buffers raw bytes so multi-byte characters split across network chunks are
/// reassembled before decoding. Yields the `data` payload of each complete
/// event.
#[derive(Debug, Default)]
pub(crate) struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    pub(crate) fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        // CR never occurs inside a UTF-8 multi-byte sequence.
        self.buffer.extend(chunk.iter().copied().filter(|b| *b != b'\r'));

        let mut events = Vec::new();
        while let Some(end) = self.buffer.windows(2).position(|w| w == b"\n\n") {
            let raw: Vec<u8> = self.buffer.drain(..end + 2).collect();
            if let Some(data) = Self::event_data(&raw[..end]) {
                events.push(data);
            }
        }
        events
    }

    /// Flush a trailing event that was not followed by a blank line.
    pub(crate) fn finish(&mut self) -> Option<String> {
        let raw = std::mem::take(&mut self.buffer);
        Self::event_data(&raw)
    }

    fn event_data(raw: &[u8]) -> Option<String> {
        let event = String::from_utf8_lossy(raw);
        let data: Vec<&str> = event
            .lines()
            .filter_map(|line| line.strip_prefix("data:"))
            .map(|value| value.strip_prefix(' ').unwrap_or(value))
            .collect();

        if data.is_empty() {
            None
        } else {
            Some(data.join("\n"))
        }
    }
}

// ============================================================================
// Gemini API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Tool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    fn from_request(request: &GenerationRequest) -> Self {
        let parts = request
            .parts
            .iter()
            .map(|part| match part {
                RequestPart::Text(text) => Part::Text { text: text.clone() },
                RequestPart::Image { data, mime_type } => Part::InlineData {
                    inline_data: InlineData {
                        mime_type: mime_type.clone(),
                        data: BASE64.encode(data),
                    },
                },
            })
            .collect();

        let tools = if request.google_search {
            vec![Tool {
                google_search: GoogleSearch {},
            }]
        } else {
            Vec::new()
        };

        let generation_config = request.thinking_budget.map(|budget| GenerationConfig {
            thinking_config: ThinkingConfig {
                thinking_budget: budget,
            },
        });

        Self {
            contents: vec![Content {
                role: "user".to_string(),
                parts,
            }],
            tools,
            generation_config,
        }
    }
}

#[derive(Debug, Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Tool {
    google_search: GoogleSearch,
}

#[derive(Debug, Serialize)]
struct GoogleSearch {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    thinking_config: ThinkingConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
    thinking_budget: i32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

impl GenerateContentResponse {
    /// Visible text of the first candidate; thought summaries are skipped.
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter(|p| !p.thought.unwrap_or(false))
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }

    fn finish_reason(&self) -> Option<FinishReason> {
        self.candidates
            .first()
            .and_then(|c| c.finish_reason.as_deref())
            .map(FinishReason::from_api)
    }

    fn is_blocked(&self) -> bool {
        self.prompt_feedback
            .as_ref()
            .is_some_and(|f| f.block_reason.is_some())
            || self.finish_reason() == Some(FinishReason::ContentFilter)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<ResponseContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    thought: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    prompt_token_count: Option<i32>,
    candidates_token_count: Option<i32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}
