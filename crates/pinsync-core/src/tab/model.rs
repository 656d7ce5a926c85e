//! Tab snapshot model.

use serde::{Deserialize, Serialize};

/// An open browser tab at the moment it was enumerated.
///
/// This is not a live handle: closing or navigating the tab afterwards does
/// not change the value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    /// Browser-assigned tab identifier
    pub id: i64,
    /// URL loaded in the tab
    pub url: String,
    /// Page title, used as the bookmark description
    #[serde(default)]
    pub title: String,
    /// Whether this is the focused tab of its window
    #[serde(default)]
    pub active: bool,
}

impl Tab {
    pub fn new(id: i64, url: impl Into<String>, title: impl Into<String>, active: bool) -> Self {
        Self {
            id,
            url: url.into(),
            title: title.into(),
            active,
        }
    }

    /// Returns the first tab flagged active, if any.
    pub fn find_active(tabs: &[Tab]) -> Option<&Tab> {
        tabs.iter().find(|tab| tab.active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_active() {
        let tabs = vec![
            Tab::new(1, "https://a.example", "A", false),
            Tab::new(2, "https://b.example", "B", true),
        ];
        assert_eq!(Tab::find_active(&tabs).map(|t| t.id), Some(2));
        assert!(Tab::find_active(&tabs[..1]).is_none());
    }

    #[test]
    fn test_deserialize_defaults() {
        let tab: Tab = serde_json::from_str(r#"{"id": 7, "url": "https://c.example"}"#).unwrap();
        assert_eq!(tab.title, "");
        assert!(!tab.active);
    }
}
