use axum::{body::Bytes, extract::State, Json};
use serde::{Deserialize, Serialize};
use service_core::error::AppError;

use super::{loose_string, parse_payload, report};
use crate::error::HintError;
use crate::services::prompts::build_hint_prompt;
use crate::services::providers::{GenerationRequest, RequestPart};
use crate::services::{collect_text, finalize_hints, ArtworkMeta};
use crate::startup::AppState;

/// Images are always labelled JPEG, whatever the host serves.
const IMAGE_MIME_TYPE: &str = "image/jpeg";

/// Let the model decide how long to think.
const DYNAMIC_THINKING_BUDGET: i32 = -1;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HintRequest {
    #[serde(default, deserialize_with = "loose_string")]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub free_text: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub artist: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub year: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HintResponse {
    pub hints: String,
}

#[tracing::instrument(skip(state, body), fields(body_len = body.len()))]
pub async fn ai_hints(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<HintResponse>, AppError> {
    let hints = generate_hints(&state, &body)
        .await
        .map_err(|e| report("ai_hints", e, state.config.debug.expose_trace))?;

    tracing::info!(hints_len = hints.len(), "Generated observation hints");

    Ok(Json(HintResponse { hints }))
}

async fn generate_hints(state: &AppState, body: &[u8]) -> Result<String, HintError> {
    let request: HintRequest = parse_payload(body)?;

    let image_url = request
        .image_url
        .ok_or(HintError::MissingField("imageUrl"))?;
    let provider = state
        .text_provider
        .as_ref()
        .ok_or(HintError::MissingApiKey)?;

    let image = state.image_fetcher.fetch(&image_url).await?;

    let meta = ArtworkMeta {
        title: request.title,
        artist: request.artist,
        year: request.year,
    };
    let prompt = build_hint_prompt(request.free_text.as_deref().unwrap_or(""), &meta);

    let generation = GenerationRequest {
        parts: vec![
            RequestPart::Text(prompt),
            RequestPart::Image {
                data: image,
                mime_type: IMAGE_MIME_TYPE.to_string(),
            },
        ],
        google_search: true,
        thinking_budget: Some(DYNAMIC_THINKING_BUDGET),
    };

    tracing::debug!(model = provider.model(), image_url = %image_url, "Requesting hints");

    let stream = provider.generate_stream(&generation).await?;
    let text = collect_text(stream).await?;

    Ok(finalize_hints(&text))
}
