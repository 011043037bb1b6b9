//! Script-filter output for the launcher
//!
//! The launcher expects a JSON document with an `items` array on stdout and
//! renders each item as a selectable row. Only the fields this workflow uses
//! are modeled; optional fields are omitted from the output when unset.

use serde::Serialize;

/// A selectable row in the launcher's result list
#[derive(Debug, Clone, Serialize)]
pub struct Item {
    /// Primary display text
    pub title: String,
    /// Secondary display text (category, description)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Value passed back to the workflow when the item is actioned
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arg: Option<String>,
    /// Whether the item can be actioned
    pub valid: bool,
    /// Filled into the query field on autocomplete
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autocomplete: Option<String>,
}

impl Item {
    /// Creates an actionable item whose selection passes `arg` back
    pub fn new(title: impl Into<String>, subtitle: impl Into<String>, arg: impl Into<String>) -> Self {
        let arg = arg.into();
        Self {
            title: title.into(),
            subtitle: Some(subtitle.into()),
            arg: Some(arg.clone()),
            valid: true,
            autocomplete: Some(arg),
        }
    }

    /// Creates a non-actionable informational item
    pub fn message(title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: Some(subtitle.into()),
            arg: None,
            valid: false,
            autocomplete: None,
        }
    }
}

/// The complete script-filter document
#[derive(Debug, Clone, Serialize)]
pub struct ScriptFilter {
    pub items: Vec<Item>,
}

impl ScriptFilter {
    pub fn new(items: Vec<Item>) -> Self {
        Self { items }
    }

    /// A single-item document surfacing a user-visible error
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            items: vec![Item::message(message, "Press Esc to dismiss")],
        }
    }

    /// Serializes the document for stdout
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_serializes_expected_fields() {
        let filter = ScriptFilter::new(vec![Item::new("MIT License", "MIT", "mit")]);
        let json = filter.to_json().expect("Should serialize");

        assert!(json.contains(r#""items":["#));
        assert!(json.contains(r#""title":"MIT License""#));
        assert!(json.contains(r#""subtitle":"MIT""#));
        assert!(json.contains(r#""arg":"mit""#));
        assert!(json.contains(r#""valid":true"#));
    }

    #[test]
    fn test_message_item_omits_arg() {
        let item = Item::message("No matches", "Try a different query");
        let json = serde_json::to_string(&item).expect("Should serialize");

        assert!(!json.contains("\"arg\""), "Unset arg should be omitted: {}", json);
        assert!(json.contains(r#""valid":false"#));
    }

    #[test]
    fn test_error_document_has_single_invalid_item() {
        let filter = ScriptFilter::error("Could not fetch licenses");
        assert_eq!(filter.items.len(), 1);
        assert!(!filter.items[0].valid);
        assert_eq!(filter.items[0].title, "Could not fetch licenses");
    }
}
