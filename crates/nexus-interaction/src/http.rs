//! HTTP plumbing shared by the backend adapters.

use std::time::Duration;

use nexus_core::provider::{Backend, GatewayError};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Builds the shared client. One client is reused across adapters.
pub fn build_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder().timeout(timeout).build()
}

/// Sends `request` once and decodes a 2xx JSON body into `T`.
///
/// - connect/timeout/body-read failures map to `Transport`
/// - non-2xx, or a 2xx body carrying an `error` object, map to `Provider`
/// - a 2xx body that does not fit `T` maps to `MalformedResponse`
pub(crate) async fn send_json<T: DeserializeOwned>(
    backend: Backend,
    request: RequestBuilder,
) -> Result<T, GatewayError> {
    let response = request
        .send()
        .await
        .map_err(|err| GatewayError::transport(backend, err.to_string()))?;

    let status = response.status();
    let body = response.text().await.map_err(|err| {
        GatewayError::transport(backend, format!("failed to read response body: {err}"))
    })?;

    if !status.is_success() {
        return Err(map_http_error(backend, status, &body));
    }

    let value: serde_json::Value = serde_json::from_str(&body)
        .map_err(|err| GatewayError::malformed(backend, err.to_string()))?;

    if let Some(message) = error_message(&value) {
        return Err(GatewayError::provider(
            backend,
            Some(status.as_u16()),
            message,
        ));
    }

    serde_json::from_value(value).map_err(|err| GatewayError::malformed(backend, err.to_string()))
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn error_message(value: &serde_json::Value) -> Option<String> {
    let error = value.get("error")?;
    if error.is_null() {
        return None;
    }
    Some(
        error
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string()),
    )
}

/// Extracts `error.message` verbatim, falling back to the raw body.
pub(crate) fn map_http_error(backend: Backend, status: StatusCode, body: &str) -> GatewayError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or_else(|_| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("request rejected")
                    .to_string()
            } else {
                trimmed.to_string()
            }
        });
    GatewayError::provider(backend, Some(status.as_u16()), message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_http_error_uses_error_message() {
        let err = map_http_error(
            Backend::OpenAI,
            StatusCode::UNAUTHORIZED,
            r#"{"error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}}"#,
        );
        assert_eq!(
            err,
            GatewayError::provider(Backend::OpenAI, Some(401), "Incorrect API key provided")
        );
    }

    #[test]
    fn test_map_http_error_falls_back_to_raw_body() {
        let err = map_http_error(Backend::Perplexity, StatusCode::BAD_GATEWAY, "upstream down\n");
        assert_eq!(err.to_string(), "upstream down");
    }

    #[test]
    fn test_map_http_error_empty_body_uses_reason() {
        let err = map_http_error(Backend::Gemini, StatusCode::SERVICE_UNAVAILABLE, "");
        assert_eq!(err.to_string(), "Service Unavailable");
    }

    #[test]
    fn test_error_message_in_success_body() {
        let value: serde_json::Value =
            serde_json::from_str(r#"{"error": {"message": "quota exceeded"}}"#).unwrap();
        assert_eq!(error_message(&value).as_deref(), Some("quota exceeded"));

        let ok: serde_json::Value = serde_json::from_str(r#"{"error": null, "x": 1}"#).unwrap();
        assert!(error_message(&ok).is_none());
    }
}
