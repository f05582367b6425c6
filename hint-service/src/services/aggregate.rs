use super::providers::{ProviderError, ProviderStream, StreamChunk};
use futures::StreamExt;

/// Returned when the model produced no usable text.
pub const EMPTY_HINTS_FALLBACK: &str = "분석 결과를 생성하지 못했습니다. 입력을 다시 확인해 주세요.";

/// Drain the stream, joining text fragments in arrival order.
///
/// The first error aborts collection; there is no partial result.
pub async fn collect_text(mut stream: ProviderStream) -> Result<String, ProviderError> {
    let mut text = String::new();
    let mut fragments = 0usize;

    while let Some(chunk) = stream.next().await {
        match chunk? {
            StreamChunk::Text(fragment) if !fragment.is_empty() => {
                text.push_str(&fragment);
                fragments += 1;
            }
            StreamChunk::Text(_) => {}
            StreamChunk::Complete {
                input_tokens,
                output_tokens,
                finish_reason,
            } => {
                tracing::debug!(
                    input_tokens,
                    output_tokens,
                    ?finish_reason,
                    fragments,
                    "Model stream completed"
                );
            }
        }
    }

    Ok(text)
}

/// Trimmed hint text, or the fallback message when nothing came back.
pub fn finalize_hints(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        EMPTY_HINTS_FALLBACK.to_string()
    } else {
        trimmed.to_string()
    }
}
