//! HTTP acquisition from the exoplanet archive.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, StatusCode};
use thiserror::Error;

/// The archive rejects anonymous clients, so every request identifies itself.
const USER_AGENT: &str = "Mozilla/5.0 (compatible; ExoplanetExplorer/1.0)";
const ACCEPT_TABULAR: &str = "text/plain, text/csv, */*";

/// Reasons the remote archive could not supply a dataset.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Archive responded with {0}")]
    Status(StatusCode),

    #[error("Archive returned a markup error page instead of CSV")]
    Disguised,
}

/// Client for the archive's tabular endpoint.
#[derive(Debug, Clone)]
pub struct RemoteSource {
    url: String,
    client: Client,
}

impl RemoteSource {
    /// Create a source for `url`. `timeout` bounds the whole request,
    /// including reading the body.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, RemoteError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_TABULAR));

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }

    /// Fetch the raw CSV body.
    ///
    /// Non-2xx statuses and bodies that look like an HTML/XML error page are
    /// both failures, even when the archive claims success.
    pub async fn fetch(&self) -> Result<String, RemoteError> {
        tracing::debug!("Requesting {}", self.url);

        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status(status));
        }

        let body = response.text().await?;
        if looks_like_markup(&body) {
            return Err(RemoteError::Disguised);
        }

        Ok(body)
    }
}

/// Textual heuristic for an error page served with a success status.
///
/// Any `<` trips it, so a legitimate CSV with a literal `<` in a field would
/// also be rejected and the snapshot used instead.
pub fn looks_like_markup(body: &str) -> bool {
    body.contains('<')
}
