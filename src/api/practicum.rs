use super::http_utils::{create_http_client, get_json};
use super::{resolve_from_date, HomeworkSource};
use crate::config::ENDPOINT;
use crate::error::HomeworkError;
use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde_json::Value;
use tracing::debug;

/// Client for the Practicum homework status endpoint
pub struct PracticumClient {
    http_client: HttpClient,
    endpoint: String,
    token: String,
}

impl PracticumClient {
    /// Creates a client for the production endpoint.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_endpoint(token, ENDPOINT)
    }

    /// Creates a client for a custom endpoint.
    #[must_use]
    pub fn with_endpoint(token: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            http_client: create_http_client(),
            endpoint: endpoint.into(),
            token: token.into(),
        }
    }

    /// Endpoint this client polls.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl HomeworkSource for PracticumClient {
    async fn get_api_answer(&self, from_date: i64) -> Result<Value, HomeworkError> {
        let timestamp = resolve_from_date(from_date);
        debug!(endpoint = %self.endpoint, from_date = timestamp, "Requesting homework statuses");

        get_json(
            &self.http_client,
            &self.endpoint,
            &[("from_date", timestamp.to_string())],
            &format!("OAuth {}", self.token),
        )
        .await
    }
}
