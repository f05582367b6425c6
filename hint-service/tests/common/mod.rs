#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Request, Response},
    Router,
};
use hint_service::config::HintConfig;
use hint_service::services::providers::mock::MockTextProvider;
use hint_service::services::providers::TextProvider;
use hint_service::services::{ImageFetcher, StaticImageFetcher};
use hint_service::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

pub const IMAGE_URL: &str = "https://x/img.jpg";
pub const JPEG_BYTES: &[u8] = &[0xff, 0xd8, 0xff, 0xe0];

pub fn test_config() -> HintConfig {
    let mut config = HintConfig::default();
    config.common.port = 0;
    config.gemini.api_key = Some("test-api-key".to_string());
    config
}

pub fn images() -> Arc<StaticImageFetcher> {
    Arc::new(StaticImageFetcher::new().with_image(IMAGE_URL, JPEG_BYTES.to_vec()))
}

/// State with the given scripted provider and a fetcher that knows `IMAGE_URL`.
pub fn state_with(config: HintConfig, provider: Option<Arc<MockTextProvider>>) -> AppState {
    let provider = provider.map(|p| p as Arc<dyn TextProvider>);
    let fetcher: Arc<dyn ImageFetcher> = images();
    AppState::new(config, provider, fetcher)
}

pub fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}

/// Serve `router` on a random local port.
pub async fn spawn_server(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    addr
}
