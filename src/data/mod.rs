//! Core data models for the license workflow
//!
//! This module contains the types used throughout the application for
//! representing licenses as returned by the license-metadata API.

pub mod licenses;

pub use licenses::{LicenseClient, LicenseError};

use serde::{Deserialize, Serialize};

/// A license as listed by the bulk endpoint
///
/// The list endpoint returns only identifying fields; the full body and
/// rule lists require a per-license fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LicenseSummary {
    /// Stable lowercase identifier used for lookups (e.g., "mit")
    pub key: String,
    /// Human-readable name (e.g., "MIT License")
    pub name: String,
    /// SPDX identifier (e.g., "MIT"), when one exists
    pub spdx_id: Option<String>,
}

/// Full license metadata and body text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct License {
    /// Stable lowercase identifier used for lookups
    pub key: String,
    /// Human-readable name
    pub name: String,
    /// SPDX identifier, when one exists
    pub spdx_id: Option<String>,
    /// Short description of the license
    #[serde(default)]
    pub description: Option<String>,
    /// Web page for the license
    #[serde(default)]
    pub html_url: Option<String>,
    /// What the license permits (e.g., "commercial-use")
    #[serde(default)]
    pub permissions: Vec<String>,
    /// What the license requires (e.g., "include-copyright")
    #[serde(default)]
    pub conditions: Vec<String>,
    /// What the license forbids (e.g., "liability")
    #[serde(default)]
    pub limitations: Vec<String>,
    /// The full license text, including any placeholder tokens
    pub body: String,
}

impl License {
    /// Returns the SPDX identifier, falling back to the key
    pub fn display_id(&self) -> &str {
        self.spdx_id.as_deref().unwrap_or(&self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_license_summary_deserializes_from_api_shape() {
        let json = r#"{
            "key": "mit",
            "name": "MIT License",
            "spdx_id": "MIT",
            "url": "https://api.github.com/licenses/mit",
            "node_id": "MDc6TGljZW5zZTEz"
        }"#;

        let summary: LicenseSummary = serde_json::from_str(json).expect("Should parse summary");
        assert_eq!(summary.key, "mit");
        assert_eq!(summary.name, "MIT License");
        assert_eq!(summary.spdx_id.as_deref(), Some("MIT"));
    }

    #[test]
    fn test_license_defaults_for_missing_optional_fields() {
        let json = r#"{
            "key": "other",
            "name": "Other",
            "spdx_id": null,
            "body": "text"
        }"#;

        let license: License = serde_json::from_str(json).expect("Should parse license");
        assert!(license.description.is_none());
        assert!(license.permissions.is_empty());
        assert!(license.conditions.is_empty());
        assert!(license.limitations.is_empty());
        assert_eq!(license.display_id(), "other");
    }

    #[test]
    fn test_display_id_prefers_spdx() {
        let license = License {
            key: "apache-2.0".to_string(),
            name: "Apache License 2.0".to_string(),
            spdx_id: Some("Apache-2.0".to_string()),
            description: None,
            html_url: None,
            permissions: vec![],
            conditions: vec![],
            limitations: vec![],
            body: String::new(),
        };
        assert_eq!(license.display_id(), "Apache-2.0");
    }
}
