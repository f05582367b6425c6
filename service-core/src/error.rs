use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(anyhow::Error),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),

    /// A call to a dependency (remote host, model API) failed. `trace` is only
    /// populated when the service is configured to expose error chains.
    #[error("Upstream error: {message}")]
    Upstream {
        message: String,
        trace: Option<String>,
    },

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),
}

impl AppError {
    pub fn upstream(message: impl Into<String>, trace: Option<String>) -> Self {
        AppError::Upstream {
            message: message.into(),
            trace,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::ConfigError(_) | AppError::Upstream { .. } | AppError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let (error_message, trace) = match self {
            AppError::BadRequest(err) => (err.to_string(), None),
            AppError::ConfigError(err) => (err.to_string(), None),
            AppError::Upstream { message, trace } => (message, trace),
            AppError::InternalError(_) => ("Internal server error".to_string(), None),
        };

        (
            status,
            Json(ErrorResponse {
                error: error_message,
                trace,
            }),
        )
            .into_response()
    }
}
