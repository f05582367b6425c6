//! Application startup and lifecycle management.
//!
//! Builds the shared state from configuration, the HTTP router with its
//! middleware stack, and the server that runs it.

use crate::config::HintConfig;
use crate::handlers;
use crate::services::providers::gemini::{GeminiConfig, GeminiTextProvider};
use crate::services::providers::TextProvider;
use crate::services::{HttpImageFetcher, ImageFetcher};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{request_id_middleware, security_headers_middleware};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{services::ServeDir, trace::TraceLayer};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: HintConfig,
    /// `None` when no API key is configured.
    pub text_provider: Option<Arc<dyn TextProvider>>,
    pub image_fetcher: Arc<dyn ImageFetcher>,
}

impl AppState {
    pub fn new(
        config: HintConfig,
        text_provider: Option<Arc<dyn TextProvider>>,
        image_fetcher: Arc<dyn ImageFetcher>,
    ) -> Self {
        Self {
            config,
            text_provider,
            image_fetcher,
        }
    }

    /// Wire the real Gemini provider and HTTP image fetcher.
    pub fn from_config(config: HintConfig) -> Result<Self, AppError> {
        let text_provider: Option<Arc<dyn TextProvider>> = match &config.gemini.api_key {
            Some(api_key) => {
                let provider = GeminiTextProvider::new(GeminiConfig {
                    api_key: api_key.clone(),
                    model: config.gemini.model.clone(),
                    api_base: config.gemini.api_base.clone(),
                    timeout: config.gemini.timeout(),
                })
                .map_err(|e| AppError::ConfigError(anyhow::Error::new(e)))?;

                tracing::info!(
                    model = %config.gemini.model,
                    timeout_secs = ?config.gemini.timeout_secs,
                    "Initialized Gemini text provider"
                );
                Some(Arc::new(provider))
            }
            None => {
                tracing::warn!("GEMINI_API_KEY not set; generation requests will fail with 500");
                None
            }
        };

        let image_fetcher = HttpImageFetcher::new(config.image_fetch.timeout())
            .map_err(|e| AppError::ConfigError(anyhow::Error::new(e)))?;

        Ok(Self::new(config, text_provider, Arc::new(image_fetcher)))
    }
}

/// Build the HTTP router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let router = Router::new()
        .route(
            "/api/ai_hints",
            post(handlers::ai_hints).fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/generate_prompt",
            post(handlers::generate_prompt).fallback(handlers::method_not_allowed),
        )
        .route("/health", get(handlers::health_check));

    let router = match &state.config.static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };

    router
        .with_state(state)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: HintConfig) -> Result<Self, AppError> {
        let state = AppState::from_config(config)?;
        Self::with_state(state).await
    }

    /// Build around pre-wired state (custom providers or fetchers).
    pub async fn with_state(state: AppState) -> Result<Self, AppError> {
        // Port 0 = random port for testing
        let addr = SocketAddr::from(([0, 0, 0, 0], state.config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Hint service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            router: build_router(state),
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router).await
    }

    /// Run until `shutdown` resolves, letting in-flight requests finish.
    pub async fn run_with_shutdown<F>(self, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await
    }
}
