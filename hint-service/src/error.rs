use crate::services::image_fetcher::ImageFetchError;
use crate::services::providers::ProviderError;
use service_core::error::AppError;
use thiserror::Error;

/// Everything that can stop a hint or prompt request.
#[derive(Debug, Error)]
pub enum HintError {
    #[error("invalid JSON body: {0}")]
    InvalidPayload(String),

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Missing GEMINI_API_KEY")]
    MissingApiKey,

    #[error(transparent)]
    ImageFetch(#[from] ImageFetchError),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl HintError {
    pub fn is_client_error(&self) -> bool {
        matches!(self, HintError::InvalidPayload(_) | HintError::MissingField(_))
    }

    /// Map to the HTTP error. Upstream failures carry the error chain as
    /// `trace` only when `expose_trace` is set.
    pub fn into_app_error(self, expose_trace: bool) -> AppError {
        match self {
            HintError::InvalidPayload(_) | HintError::MissingField(_) => {
                AppError::BadRequest(anyhow::anyhow!(self.to_string()))
            }
            HintError::MissingApiKey => AppError::ConfigError(anyhow::anyhow!(self.to_string())),
            HintError::ImageFetch(_) | HintError::Provider(_) => {
                let trace = expose_trace.then(|| error_chain(&self));
                AppError::upstream(self.to_string(), trace)
            }
        }
    }
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut lines = vec![err.to_string()];
    let mut source = err.source();
    while let Some(cause) = source {
        lines.push(format!("caused by: {}", cause));
        source = cause.source();
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn not_found() -> HintError {
        HintError::ImageFetch(ImageFetchError::Status {
            status: 404,
            url: "https://x/img.jpg".to_string(),
        })
    }

    #[test]
    fn client_errors_map_to_400() {
        let err = HintError::MissingField("imageUrl");
        assert_eq!(err.to_string(), "imageUrl is required");
        assert!(err.is_client_error());
        assert_eq!(
            err.into_app_error(true).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn missing_key_is_config_error() {
        match HintError::MissingApiKey.into_app_error(false) {
            AppError::ConfigError(e) => assert_eq!(e.to_string(), "Missing GEMINI_API_KEY"),
            other => panic!("unexpected mapping: {:?}", other),
        }
    }

    #[test]
    fn upstream_trace_is_gated() {
        match not_found().into_app_error(false) {
            AppError::Upstream { message, trace } => {
                assert_eq!(message, "Failed to fetch image: HTTP 404 for https://x/img.jpg");
                assert!(trace.is_none());
            }
            other => panic!("unexpected mapping: {:?}", other),
        }

        match not_found().into_app_error(true) {
            AppError::Upstream { trace, .. } => {
                assert!(trace.unwrap().starts_with("Failed to fetch image: HTTP 404"));
            }
            other => panic!("unexpected mapping: {:?}", other),
        }
    }

    #[test]
    fn provider_errors_are_upstream() {
        let err = HintError::from(ProviderError::Api {
            status: 503,
            body: "overloaded".to_string(),
        });
        assert!(!err.is_client_error());
        assert_eq!(
            err.into_app_error(false).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
