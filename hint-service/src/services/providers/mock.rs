//! Mock provider implementation for testing.

use super::{
    FinishReason, GenerationRequest, ProviderError, ProviderResponse, ProviderStream,
    StreamChunk, TextProvider,
};
use async_trait::async_trait;
use std::sync::Mutex;

/// Scripted text provider. Replays the configured fragments and records every
/// request it receives.
pub struct MockTextProvider {
    chunks: Vec<String>,
    fail_with: Option<String>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl MockTextProvider {
    pub fn new<I, S>(chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            chunks: chunks.into_iter().map(Into::into).collect(),
            fail_with: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A provider whose stream yields a single error after no text.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            chunks: Vec::new(),
            fail_with: Some(message.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    fn record(&self, request: &GenerationRequest) {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    fn model(&self) -> &str {
        "mock"
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<ProviderResponse, ProviderError> {
        self.record(request);

        if let Some(message) = &self.fail_with {
            return Err(ProviderError::Api {
                status: 500,
                body: message.clone(),
            });
        }

        Ok(ProviderResponse {
            text: self.chunks.concat(),
            input_tokens: 0,
            output_tokens: self.chunks.len() as i32,
            finish_reason: FinishReason::Complete,
        })
    }

    async fn generate_stream(
        &self,
        request: &GenerationRequest,
    ) -> Result<ProviderStream, ProviderError> {
        self.record(request);

        let mut items: Vec<Result<StreamChunk, ProviderError>> = self
            .chunks
            .iter()
            .cloned()
            .map(|text| Ok(StreamChunk::Text(text)))
            .collect();

        match &self.fail_with {
            Some(message) => items.push(Err(ProviderError::Api {
                status: 500,
                body: message.clone(),
            })),
            None => items.push(Ok(StreamChunk::Complete {
                input_tokens: 0,
                output_tokens: self.chunks.len() as i32,
                finish_reason: FinishReason::Complete,
            })),
        }

        Ok(Box::pin(tokio_stream::iter(items)))
    }
}
