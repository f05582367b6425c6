//! Generative model provider abstractions and implementations.
//!
//! Handlers talk to a [`TextProvider`] so the Gemini backend can be swapped
//! for the scripted mock in tests.

pub mod gemini;
pub mod mock;

use async_trait::async_trait;
use std::pin::Pin;
use thiserror::Error;
use tokio_stream::Stream;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Gemini API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Failed to parse model response: {0}")]
    InvalidResponse(String),

    #[error("Rate limited by model API")]
    RateLimited,

    #[error("Response blocked by content filter")]
    ContentFiltered,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// One part of the single user turn sent to the model.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestPart {
    Text(String),
    Image { data: Vec<u8>, mime_type: String },
}

/// A single-turn generation request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationRequest {
    pub parts: Vec<RequestPart>,

    /// Enable Google Search grounding.
    pub google_search: bool,

    /// Thinking budget in tokens; `-1` lets the model decide.
    pub thinking_budget: Option<i32>,
}

impl GenerationRequest {
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            parts: vec![RequestPart::Text(prompt.into())],
            ..Default::default()
        }
    }
}

/// Result of a non-streaming call.
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    /// All text parts of the first candidate, joined in order.
    pub text: String,
    pub input_tokens: i32,
    pub output_tokens: i32,
    pub finish_reason: FinishReason,
}

/// Reason why generation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    Complete,
    Length,
    ContentFilter,
    Other,
}

impl FinishReason {
    pub fn from_api(reason: &str) -> Self {
        match reason {
            "STOP" => FinishReason::Complete,
            "MAX_TOKENS" => FinishReason::Length,
            "SAFETY" | "PROHIBITED_CONTENT" | "BLOCKLIST" => FinishReason::ContentFilter,
            _ => FinishReason::Other,
        }
    }
}

/// Stream chunk for streaming responses.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamChunk {
    Text(String),

    /// Final event with usage stats.
    Complete {
        input_tokens: i32,
        output_tokens: i32,
        finish_reason: FinishReason,
    },
}

/// Lazy, finite, non-restartable sequence of chunks.
pub type ProviderStream = Pin<Box<dyn Stream<Item = Result<StreamChunk, ProviderError>> + Send>>;

#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Model identifier used for logging.
    fn model(&self) -> &str;

    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<ProviderResponse, ProviderError>;

    async fn generate_stream(
        &self,
        request: &GenerationRequest,
    ) -> Result<ProviderStream, ProviderError>;
}
