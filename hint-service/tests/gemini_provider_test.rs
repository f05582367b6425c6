//! Exercises `GeminiTextProvider` against a local stand-in for the Gemini API.

mod common;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use common::spawn_server;
use hint_service::services::collect_text;
use hint_service::services::providers::gemini::{GeminiConfig, GeminiTextProvider};
use hint_service::services::providers::{
    GenerationRequest, ProviderError, RequestPart, TextProvider,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct FakeGemini {
    last_body: Arc<Mutex<Option<Value>>>,
    last_key: Arc<Mutex<Option<String>>>,
}

fn sse_event(text: &str) -> String {
    let payload = json!({
        "candidates": [{ "content": { "role": "model", "parts": [{ "text": text }] } }]
    });
    format!("data: {}\r\n\r\n", payload)
}

async fn models(
    State(fake): State<FakeGemini>,
    Path(action): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    *fake.last_body.lock().unwrap() = Some(body);
    *fake.last_key.lock().unwrap() = headers
        .get("x-goog-api-key")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    match action.split_once(':') {
        Some(("rate-limited", _)) => (StatusCode::TOO_MANY_REQUESTS, "slow down").into_response(),
        Some(("broken", _)) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "model unavailable").into_response()
        }
        Some((_, "streamGenerateContent")) => {
            assert_eq!(query.get("alt").map(String::as_str), Some("sse"));
            let mut body = String::new();
            body.push_str(&sse_event("- 색채 대비를"));
            body.push_str("data: {not json}\r\n\r\n");
            body.push_str(&format!(
                "data: {}\r\n\r\n",
                json!({
                    "candidates": [{
                        "content": { "parts": [{ "text": "숨은 생각", "thought": true }] }
                    }]
                })
            ));
            body.push_str(&sse_event(" 더 구체적으로 설명해보세요."));
            body.push_str(&format!(
                "data: {}",
                json!({
                    "candidates": [{ "finishReason": "STOP" }],
                    "usageMetadata": { "promptTokenCount": 42, "candidatesTokenCount": 7 }
                })
            ));
            ([(header::CONTENT_TYPE, "text/event-stream")], body).into_response()
        }
        Some((_, "generateContent")) => Json(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "노란 별" }, { "text": "과 파란 하늘" }] },
                "finishReason": "STOP"
            }],
            "usageMetadata": { "promptTokenCount": 10, "candidatesTokenCount": 3 }
        }))
        .into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn spawn_fake() -> (FakeGemini, String) {
    let fake = FakeGemini::default();
    let router = Router::new()
        .route("/v1beta/models/:action", post(models))
        .with_state(fake.clone());
    let addr = spawn_server(router).await;
    (fake, format!("http://{}/v1beta", addr))
}

fn provider(api_base: &str, model: &str) -> GeminiTextProvider {
    GeminiTextProvider::new(GeminiConfig {
        api_key: "secret-key".to_string(),
        model: model.to_string(),
        api_base: api_base.to_string(),
        timeout: Some(std::time::Duration::from_secs(5)),
    })
    .unwrap()
}

fn hint_request() -> GenerationRequest {
    GenerationRequest {
        parts: vec![
            RequestPart::Text("힌트를 주세요".to_string()),
            RequestPart::Image {
                data: vec![0xff, 0xd8, 0xff],
                mime_type: "image/jpeg".to_string(),
            },
        ],
        google_search: true,
        thinking_budget: Some(-1),
    }
}

#[tokio::test]
async fn streaming_call_yields_ordered_text() {
    let (fake, base) = spawn_fake().await;
    let gemini = provider(&base, "gemini-2.5-flash");

    let stream = gemini.generate_stream(&hint_request()).await.unwrap();
    let text = collect_text(stream).await.unwrap();

    assert_eq!(text, "- 색채 대비를 더 구체적으로 설명해보세요.");
    assert_eq!(fake.last_key.lock().unwrap().as_deref(), Some("secret-key"));

    let body = fake.last_body.lock().unwrap().clone().unwrap();
    assert_eq!(body["contents"][0]["role"], "user");
    assert_eq!(
        body["contents"][0]["parts"][1]["inlineData"],
        json!({ "mimeType": "image/jpeg", "data": "/9j/" })
    );
    assert_eq!(body["tools"], json!([{ "googleSearch": {} }]));
    assert_eq!(
        body["generationConfig"]["thinkingConfig"]["thinkingBudget"],
        -1
    );
}

#[tokio::test]
async fn unary_call_joins_parts_and_reports_usage() {
    let (_fake, base) = spawn_fake().await;
    let gemini = provider(&base, "gemini-2.5-flash");

    let response = gemini
        .generate(&GenerationRequest::text("정리해 주세요"))
        .await
        .unwrap();

    assert_eq!(response.text, "노란 별과 파란 하늘");
    assert_eq!(response.input_tokens, 10);
    assert_eq!(response.output_tokens, 3);
    assert_eq!(gemini.model(), "gemini-2.5-flash");
}

#[tokio::test]
async fn http_429_maps_to_rate_limited() {
    let (_fake, base) = spawn_fake().await;
    let gemini = provider(&base, "rate-limited");

    let err = gemini.generate_stream(&hint_request()).await.err().unwrap();
    assert!(matches!(err, ProviderError::RateLimited));
}

#[tokio::test]
async fn http_error_keeps_status_and_body() {
    let (_fake, base) = spawn_fake().await;
    let gemini = provider(&base, "broken");

    let err = gemini
        .generate(&GenerationRequest::text("x"))
        .await
        .unwrap_err();

    match err {
        ProviderError::Api { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "model unavailable");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}
