//! Workflow operations: search, view, copy, personalize
//!
//! Wires the API client to the two cache layers and maps their results into
//! launcher output. The license list changes rarely and is cached for a day;
//! individual license bodies change even more rarely and are cached for a
//! year.

use thiserror::Error;

use crate::alfred::{Item, ScriptFilter};
use crate::cache::ExpiringCache;
use crate::cli::Config;
use crate::data::{License, LicenseClient, LicenseError, LicenseSummary};
use crate::personalize;

/// Store file for the searchable license list
const LIST_STORE: &str = "licenses.json";

/// Store file for full per-license records
const LICENSE_STORE: &str = "license_bodies.json";

/// List cache TTL: one day
const LIST_TTL_SECS: u64 = 86_400;

/// Per-license cache TTL: one year
const LICENSE_TTL_SECS: u64 = 365 * 86_400;

/// Errors surfaced to the user at the process boundary
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// The requested key exists neither in the cache nor upstream
    #[error("License '{0}' not found")]
    UnknownLicense(String),

    /// Fetch failed and no cached copy was available
    #[error("Could not fetch license data. Check your network connection.")]
    Unavailable(#[source] LicenseError),
}

impl WorkflowError {
    fn from_fetch(key: Option<&str>, err: LicenseError) -> Self {
        match (key, err) {
            (Some(key), e) if e.is_not_found() => Self::UnknownLicense(key.to_string()),
            (_, e) => Self::Unavailable(e),
        }
    }
}

/// One-shot workflow state for a single launcher invocation
#[derive(Debug)]
pub struct Workflow {
    client: LicenseClient,
    list_cache: ExpiringCache<Vec<LicenseSummary>>,
    license_cache: ExpiringCache<License>,
}

impl Workflow {
    /// Creates a workflow with caches rooted at the configured directory
    pub fn new(config: &Config) -> Result<Self, WorkflowError> {
        let client = LicenseClient::new().map_err(|e| WorkflowError::from_fetch(None, e))?;
        Ok(Self {
            client,
            list_cache: ExpiringCache::new(&config.cache_dir, LIST_STORE, LIST_TTL_SECS),
            license_cache: ExpiringCache::new(&config.cache_dir, LICENSE_STORE, LICENSE_TTL_SECS),
        })
    }

    /// Replaces the API client, for tests against a local endpoint
    #[allow(dead_code)]
    pub fn with_client(mut self, client: LicenseClient) -> Self {
        self.client = client;
        self
    }

    /// Searches the license list and returns a script-filter document
    ///
    /// An empty query matches everything. Failures become a user-visible
    /// error item via the caller; an empty result set is reported as a
    /// non-actionable "no matches" item rather than an empty document.
    pub async fn search(&self, query: &str) -> Result<ScriptFilter, WorkflowError> {
        let summaries = self
            .list_cache
            .get_all(|| self.client.fetch_all())
            .await
            .map_err(|e| WorkflowError::from_fetch(None, e))?;

        let matches = filter_summaries(&summaries, query);
        if matches.is_empty() {
            return Ok(ScriptFilter::new(vec![Item::message(
                "No matching licenses",
                format!("Nothing matched '{}'", query),
            )]));
        }

        let items = matches
            .into_iter()
            .map(|summary| {
                Item::new(
                    summary.name.clone(),
                    summary.spdx_id.clone().unwrap_or_else(|| summary.key.clone()),
                    summary.key.clone(),
                )
            })
            .collect();
        Ok(ScriptFilter::new(items))
    }

    /// Returns a Markdown document describing the license, for a text viewer
    pub async fn view(&self, key: &str) -> Result<String, WorkflowError> {
        let license = self.lookup(key).await?;
        Ok(render_markdown(&license))
    }

    /// Returns the raw license body text, for copy actions
    pub async fn body(&self, key: &str) -> Result<String, WorkflowError> {
        let license = self.lookup(key).await?;
        Ok(license.body)
    }

    /// Returns the license body with author/year placeholders filled in
    pub async fn personalize(
        &self,
        key: &str,
        author: &str,
        year: &str,
    ) -> Result<String, WorkflowError> {
        let license = self.lookup(key).await?;
        Ok(personalize::substitute(key, &license.body, author, year))
    }

    async fn lookup(&self, key: &str) -> Result<License, WorkflowError> {
        self.license_cache
            .get(key, || self.client.fetch_license(key))
            .await
            .map_err(|e| WorkflowError::from_fetch(Some(key), e))
    }
}

/// Case-insensitive substring match over key, name, and SPDX id
fn filter_summaries<'a>(summaries: &'a [LicenseSummary], query: &str) -> Vec<&'a LicenseSummary> {
    let query = query.trim().to_lowercase();
    summaries
        .iter()
        .filter(|s| {
            query.is_empty()
                || s.key.to_lowercase().contains(&query)
                || s.name.to_lowercase().contains(&query)
                || s.spdx_id
                    .as_deref()
                    .is_some_and(|id| id.to_lowercase().contains(&query))
        })
        .collect()
}

/// Formats license metadata and body as a Markdown document
fn render_markdown(license: &License) -> String {
    let mut doc = format!("# {} ({})\n", license.name, license.display_id());

    if let Some(description) = &license.description {
        doc.push_str(&format!("\n{}\n", description));
    }

    for (label, values) in [
        ("Permissions", &license.permissions),
        ("Conditions", &license.conditions),
        ("Limitations", &license.limitations),
    ] {
        if !values.is_empty() {
            doc.push_str(&format!("\n**{}:** {}\n", label, values.join(", ")));
        }
    }

    doc.push_str(&format!("\n---\n\n{}\n", license.body));
    doc
}
