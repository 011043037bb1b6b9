//! License-metadata API client
//!
//! This module fetches license listings and full license texts from the
//! GitHub licenses API. Requests carry a short timeout so a slow network
//! never hangs an interactive launcher query.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use thiserror::Error;

use super::{License, LicenseSummary};

/// Base URL for the GitHub licenses API
const LICENSES_BASE_URL: &str = "https://api.github.com/licenses";

/// Upper bound on any single request, so launcher queries stay interactive
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// User agent required by the API
const USER_AGENT: &str = concat!("licenser/", env!("CARGO_PKG_VERSION"));

/// Errors that can occur when fetching license data
#[derive(Debug, Error)]
pub enum LicenseError {
    /// HTTP request failed (network unreachable, timeout, body read)
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The requested license key does not exist upstream
    #[error("Unknown license: '{0}'")]
    NotFound(String),

    /// API returned a non-success status
    #[error("API returned status {0}")]
    Status(StatusCode),

    /// Failed to parse the JSON response body
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),
}

impl LicenseError {
    /// Whether this error means the key does not exist, as opposed to a
    /// transport problem worth retrying later
    pub fn is_not_found(&self) -> bool {
        matches!(self, LicenseError::NotFound(_))
    }
}

/// Client for the license-metadata API
#[derive(Debug, Clone)]
pub struct LicenseClient {
    client: Client,
    base_url: String,
}

impl LicenseClient {
    /// Creates a new LicenseClient with the default endpoint and timeout
    pub fn new() -> Result<Self, LicenseError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            base_url: LICENSES_BASE_URL.to_string(),
        })
    }

    /// Overrides the endpoint base URL, for tests against a local server
    #[allow(dead_code)]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetches the full list of known licenses
    pub async fn fetch_all(&self) -> Result<Vec<LicenseSummary>, LicenseError> {
        let response = self
            .client
            .get(&self.base_url)
            .header("Accept", "application/vnd.github+json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(LicenseError::Status(response.status()));
        }

        let text = response.text().await?;
        let summaries: Vec<LicenseSummary> = serde_json::from_str(&text)?;
        Ok(summaries)
    }

    /// Fetches full metadata and body text for one license
    ///
    /// # Arguments
    /// * `key` - Stable lowercase license identifier (e.g., "mit")
    ///
    /// # Returns
    /// * `Ok(License)` - The license record
    /// * `Err(LicenseError::NotFound)` - If the key is unknown upstream
    /// * `Err(LicenseError)` - On transport or parse failure
    pub async fn fetch_license(&self, key: &str) -> Result<License, LicenseError> {
        let url = format!("{}/{}", self.base_url, key);
        let response = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github+json")
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(LicenseError::NotFound(key.to_string()));
        }
        if !response.status().is_success() {
            return Err(LicenseError::Status(response.status()));
        }

        let text = response.text().await?;
        let license: License = serde_json::from_str(&text)?;
        Ok(license)
    }
}
