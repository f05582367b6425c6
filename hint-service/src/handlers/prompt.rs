use axum::{body::Bytes, extract::State, Json};
use serde::{Deserialize, Serialize};
use service_core::error::AppError;

use super::{loose_string, parse_payload, report};
use crate::error::HintError;
use crate::services::prompts::{build_refine_instruction, clean_generated_prompt};
use crate::services::providers::GenerationRequest;
use crate::startup::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptRequest {
    #[serde(default, deserialize_with = "loose_string")]
    pub refined_text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PromptResponse {
    pub prompt: String,
}

/// Condense a refined observation into a one-sentence image prompt.
#[tracing::instrument(skip(state, body), fields(body_len = body.len()))]
pub async fn generate_prompt(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<PromptResponse>, AppError> {
    let prompt = refine(&state, &body)
        .await
        .map_err(|e| report("generate_prompt", e, state.config.debug.expose_trace))?;

    Ok(Json(PromptResponse { prompt }))
}

async fn refine(state: &AppState, body: &[u8]) -> Result<String, HintError> {
    let request: PromptRequest = parse_payload(body)?;

    let refined_text = request
        .refined_text
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or(HintError::MissingField("refinedText"))?;
    let provider = state
        .text_provider
        .as_ref()
        .ok_or(HintError::MissingApiKey)?;

    let instruction = build_refine_instruction(&refined_text);
    let response = provider
        .generate(&GenerationRequest::text(instruction))
        .await?;

    Ok(clean_generated_prompt(&response.text))
}
