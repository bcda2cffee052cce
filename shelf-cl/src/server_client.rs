//! HTTP client for a running shelf-sv instance

use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use shelf_common::BookRecord;

const USER_AGENT: &str = concat!("shelf-cl/", env!("CARGO_PKG_VERSION"));

/// Lookup server client errors
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Server error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Client for the shelf-sv record API
pub struct ServerClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl ServerClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ServerError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ServerError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Cache-or-fetch lookup against the server.
    ///
    /// `Ok(None)` means neither the server's cache nor its external sources
    /// know the ISBN.
    pub async fn lookup(&self, isbn: &str) -> Result<Option<BookRecord>, ServerError> {
        let url = format!("{}/api/lookup/{}", self.base_url, isbn);
        debug!(url = %url, "Querying lookup server");

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| ServerError::Network(e.to_string()))?;

        let status = response.status();
        if status == 404 {
            return Ok(None);
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ServerError::Api(status.as_u16(), error_text));
        }

        // The lookup response is a record plus a `cached` flag; unknown
        // fields are ignored on deserialization.
        let record: BookRecord = response
            .json()
            .await
            .map_err(|e| ServerError::Parse(e.to_string()))?;
        Ok(Some(record))
    }
}
