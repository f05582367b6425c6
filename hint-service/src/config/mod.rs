use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default Gemini REST endpoint.
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model for both hint generation and prompt refinement.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Default upper bound on the artwork image download.
const DEFAULT_IMAGE_FETCH_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct HintConfig {
    pub common: core_config::Config,
    pub gemini: GeminiSettings,
    pub image_fetch: ImageFetchConfig,
    pub debug: DebugConfig,
    /// Directory served for unmatched routes (the observation web page).
    pub static_dir: Option<PathBuf>,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GeminiSettings {
    /// Absent key is not a startup failure: requests answer 500 instead.
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
    /// No timeout when unset; a hung stream blocks the request.
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct ImageFetchConfig {
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Default)]
pub struct DebugConfig {
    /// Include the error chain as `trace` in upstream failure responses.
    pub expose_trace: bool,
}

impl GeminiSettings {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl ImageFetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            api_base: DEFAULT_GEMINI_API_BASE.to_string(),
            timeout_secs: None,
        }
    }
}

impl Default for ImageFetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_IMAGE_FETCH_TIMEOUT_SECS,
        }
    }
}

impl Default for HintConfig {
    fn default() -> Self {
        Self {
            common: core_config::Config::default(),
            gemini: GeminiSettings::default(),
            image_fetch: ImageFetchConfig::default(),
            debug: DebugConfig::default(),
            static_dir: None,
            log_level: "info".to_string(),
            otlp_endpoint: None,
        }
    }
}

impl HintConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        Ok(HintConfig {
            common: common_config,
            gemini: GeminiSettings {
                api_key: get_optional_env("GEMINI_API_KEY"),
                model: get_env("GEMINI_MODEL", Some(DEFAULT_GEMINI_MODEL), is_prod)?,
                api_base: get_env("GEMINI_API_BASE", Some(DEFAULT_GEMINI_API_BASE), is_prod)?,
                timeout_secs: parse_optional("GEMINI_TIMEOUT_SECS")?,
            },
            image_fetch: ImageFetchConfig {
                timeout_secs: parse_secs(
                    "IMAGE_FETCH_TIMEOUT_SECS",
                    &get_env(
                        "IMAGE_FETCH_TIMEOUT_SECS",
                        Some(&DEFAULT_IMAGE_FETCH_TIMEOUT_SECS.to_string()),
                        is_prod,
                    )?,
                )?,
            },
            debug: DebugConfig {
                expose_trace: get_optional_env("HINTS_EXPOSE_TRACE")
                    .map(|v| parse_flag(&v))
                    .unwrap_or(false),
            },
            static_dir: get_optional_env("STATIC_DIR").map(PathBuf::from),
            log_level: get_optional_env("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            otlp_endpoint: get_optional_env("OTLP_ENDPOINT"),
        })
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

/// Empty values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_optional(key: &str) -> Result<Option<u64>, AppError> {
    get_optional_env(key)
        .map(|v| parse_secs(key, &v))
        .transpose()
}

/// A timeout in whole seconds; zero would fail every request.
fn parse_secs(key: &str, value: &str) -> Result<u64, AppError> {
    let secs: u64 = value.trim().parse().map_err(|e| {
        AppError::ConfigError(anyhow::anyhow!("{} must be a number of seconds: {}", key, e))
    })?;
    if secs == 0 {
        return Err(AppError::ConfigError(anyhow::anyhow!(
            "{} must be greater than zero",
            key
        )));
    }
    Ok(secs)
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
