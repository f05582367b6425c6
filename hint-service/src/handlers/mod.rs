pub mod health;
pub mod hints;
pub mod prompt;

pub use health::health_check;
pub use hints::ai_hints;
pub use prompt::generate_prompt;

use crate::error::HintError;
use axum::{
    http::{header, StatusCode},
    response::IntoResponse,
};
use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::Value;
use service_core::error::AppError;

/// Answer for any method other than POST on the API routes.
pub async fn method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::CONTENT_TYPE, "text/plain")],
        "Method Not Allowed",
    )
}

/// Parse the raw body as a JSON object whatever the declared content type.
///
/// An empty body or `null` yields the default (all fields absent).
pub(crate) fn parse_payload<T>(body: &[u8]) -> Result<T, HintError>
where
    T: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }

    let value: Value =
        serde_json::from_slice(body).map_err(|e| HintError::InvalidPayload(e.to_string()))?;

    match value {
        Value::Null => Ok(T::default()),
        Value::Object(_) => {
            serde_json::from_value(value).map_err(|e| HintError::InvalidPayload(e.to_string()))
        }
        _ => Err(HintError::InvalidPayload(
            "expected a JSON object".to_string(),
        )),
    }
}

/// Accept strings, numbers and booleans; treat `null` and `""` as absent.
pub(crate) fn loose_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a string, found {}",
            other
        ))),
    }
}

/// Log the failure at a level matching who is at fault and map it for the wire.
pub(crate) fn report(route: &'static str, err: HintError, expose_trace: bool) -> AppError {
    if err.is_client_error() {
        tracing::warn!(route, error = %err, "Rejected request");
    } else {
        tracing::error!(route, error = ?err, "Request failed");
    }
    err.into_app_error(expose_trace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    #[serde(rename_all = "camelCase")]
    struct Probe {
        #[serde(default, deserialize_with = "loose_string")]
        image_url: Option<String>,
        #[serde(default, deserialize_with = "loose_string")]
        year: Option<String>,
    }

    #[test]
    fn empty_and_null_bodies_are_empty_mappings() {
        assert_eq!(parse_payload::<Probe>(b"").unwrap(), Probe::default());
        assert_eq!(parse_payload::<Probe>(b"  \n").unwrap(), Probe::default());
        assert_eq!(parse_payload::<Probe>(b"null").unwrap(), Probe::default());
    }

    #[test]
    fn loose_strings_normalize_values() {
        let probe: Probe = parse_payload(br#"{"imageUrl": "", "year": 1889}"#).unwrap();
        assert_eq!(probe.image_url, None);
        assert_eq!(probe.year.as_deref(), Some("1889"));
    }

    #[test]
    fn malformed_or_non_object_bodies_are_rejected() {
        let err = parse_payload::<Probe>(b"{not json").unwrap_err();
        assert!(err.to_string().starts_with("invalid JSON body:"));

        let err = parse_payload::<Probe>(b"[1, 2]").unwrap_err();
        assert_eq!(err.to_string(), "invalid JSON body: expected a JSON object");

        assert!(parse_payload::<Probe>(br#"{"year": [1889]}"#).is_err());
    }
}
