//! HTTP utilities for the Practicum API
//!
//! Shared request/response handling for the status endpoint.

use crate::config::get_practicum_http_timeout_secs;
use crate::error::HomeworkError;
use reqwest::header::AUTHORIZATION;
use reqwest::Client as HttpClient;
use serde_json::Value;
use std::time::Duration;
use tracing::error;

/// Creates an HTTP client configured with the Practicum timeout.
///
/// Uses `PRACTICUM_HTTP_TIMEOUT_SECS` environment variable or 30s default.
#[must_use]
pub fn create_http_client() -> HttpClient {
    let timeout = Duration::from_secs(get_practicum_http_timeout_secs());
    HttpClient::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| HttpClient::new())
}

/// Sends an authorized GET request and returns the parsed JSON body.
///
/// # Errors
///
/// Every failure maps to `HomeworkError::RemoteUnavailable`: connectivity
/// issues, non-success status codes and bodies that are not JSON.
pub async fn get_json(
    client: &HttpClient,
    url: &str,
    query: &[(&str, String)],
    auth_header: &str,
) -> Result<Value, HomeworkError> {
    let unavailable = |reason: String| HomeworkError::RemoteUnavailable {
        endpoint: url.to_string(),
        reason,
    };

    let response = client
        .get(url)
        .query(query)
        .header(AUTHORIZATION, auth_header)
        .send()
        .await
        .map_err(|e| unavailable(e.without_url().to_string()))?;

    let status = response.status();
    if !status.is_success() {
        error!(endpoint = url, %status, "Endpoint is unavailable");
        return Err(unavailable(format!("HTTP {status}")));
    }

    response
        .json::<Value>()
        .await
        .map_err(|e| unavailable(format!("некорректный JSON в ответе: {}", e.without_url())))
}
