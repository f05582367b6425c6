//! Artwork image retrieval.

use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImageFetchError {
    #[error("Failed to fetch image: HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Failed to fetch image from {url}: {}", describe(.source))]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// reqwest's own message omits the cause (timeout, refused, DNS).
fn describe(err: &reqwest::Error) -> String {
    let mut text = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}

/// Source of raw image bytes for a URL.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, ImageFetchError>;
}

/// Plain HTTP GET with a fixed timeout; any non-2xx status is an error.
#[derive(Clone)]
pub struct HttpImageFetcher {
    client: Client,
}

impl HttpImageFetcher {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, ImageFetchError> {
        let transport = |source: reqwest::Error| ImageFetchError::Transport {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImageFetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let bytes = response.bytes().await.map_err(transport)?;

        tracing::debug!(url = %url, size = bytes.len(), "Fetched artwork image");

        Ok(bytes.to_vec())
    }
}

/// In-memory fetcher keyed by URL. Unknown URLs answer 404.
#[derive(Clone, Default)]
pub struct StaticImageFetcher {
    images: HashMap<String, Vec<u8>>,
}

impl StaticImageFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image(mut self, url: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.images.insert(url.into(), bytes.into());
        self
    }
}

#[async_trait]
impl ImageFetcher for StaticImageFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, ImageFetchError> {
        self.images
            .get(url)
            .cloned()
            .ok_or_else(|| ImageFetchError::Status {
                status: 404,
                url: url.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_fetcher_serves_known_urls() {
        let fetcher = StaticImageFetcher::new().with_image("https://x/img.jpg", vec![1u8, 2, 3]);

        assert_eq!(fetcher.fetch("https://x/img.jpg").await.unwrap(), vec![1, 2, 3]);

        let err = fetcher.fetch("https://x/other.jpg").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to fetch image: HTTP 404 for https://x/other.jpg"
        );
    }

    #[tokio::test]
    async fn transport_failure_names_its_cause() {
        let fetcher = HttpImageFetcher::new(Duration::from_secs(5)).unwrap();

        let err = fetcher.fetch("http://127.0.0.1:1/img.jpg").await.unwrap_err();
        let text = err.to_string();

        assert!(matches!(err, ImageFetchError::Transport { .. }));
        assert!(
            text.starts_with("Failed to fetch image from http://127.0.0.1:1/img.jpg: error sending request"),
            "{text}"
        );
        assert!(text.to_lowercase().contains("connect"), "{text}");
    }
}
