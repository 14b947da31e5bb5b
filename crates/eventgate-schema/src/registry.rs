//! HTTP client for the schema registry.
//!
//! One client is constructed at startup and injected into the
//! [`SchemaCache`](crate::SchemaCache); per-request client construction (and
//! its repeated connection setup) is deliberately avoided.

use std::time::Duration;

use serde::Deserialize;

use crate::error::SchemaFetchError;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Response body for a `GET /subjects/{subject}/versions/latest` lookup.
#[derive(Debug, Deserialize)]
struct LatestVersionResponse {
    id: u32,
    schema: String,
}

/// HTTP client for latest-version schema lookups.
pub struct RegistryClient {
    base_url: String,
    http: reqwest::Client,
}

impl RegistryClient {
    /// Create a client for the given base URL (e.g. `http://localhost:8081`).
    /// A trailing slash is tolerated.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Create a client with an explicit per-request timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to build HTTP client");

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the latest version of a subject.
    ///
    /// Returns the registry-assigned schema ID and the raw schema text.
    pub async fn fetch_latest(&self, subject: &str) -> Result<(u32, String), SchemaFetchError> {
        let url = format!("{}/subjects/{}/versions/latest", self.base_url, subject);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| SchemaFetchError::Unreachable(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(SchemaFetchError::SubjectNotFound(subject.to_string()));
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SchemaFetchError::InvalidResponse {
                subject: subject.to_string(),
                reason: format!("status {}: {}", status, body),
            });
        }

        let body: LatestVersionResponse =
            response
                .json()
                .await
                .map_err(|e| SchemaFetchError::InvalidResponse {
                    subject: subject.to_string(),
                    reason: format!("malformed response body: {}", e),
                })?;

        tracing::debug!(
            subject = subject,
            registry_id = body.id,
            "fetched latest schema version"
        );

        Ok((body.id, body.schema))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed_from_base_url() {
        let client = RegistryClient::new("http://localhost:8081/");
        assert_eq!(client.base_url(), "http://localhost:8081");
    }

    #[test]
    fn base_url_without_slash_is_kept_as_is() {
        let client = RegistryClient::new("https://registry.internal:8081");
        assert_eq!(client.base_url(), "https://registry.internal:8081");
    }
}
