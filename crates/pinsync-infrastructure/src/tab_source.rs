//! Tab snapshot read from a JSON file.
//!
//! Stands in for the browser's tab API outside the extension: the file holds
//! the array the browser would have returned.

use std::path::PathBuf;

use async_trait::async_trait;
use pinsync_core::error::Result;
use pinsync_core::tab::{Tab, TabSource};
use serde::Deserialize;

/// One window of tabs in the snapshot file.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Snapshot {
    /// `[{"id": .., "url": .., "title": .., "active": ..}, ...]`
    Tabs(Vec<Tab>),
    /// `{"windows": [{"focused": true, "tabs": [...]}, ...]}`
    Windows { windows: Vec<Window> },
}

#[derive(Debug, Deserialize)]
struct Window {
    #[serde(default)]
    focused: bool,
    tabs: Vec<Tab>,
}

/// [`TabSource`] backed by a JSON file, re-read on every query.
#[derive(Debug, Clone)]
pub struct JsonFileTabSource {
    path: PathBuf,
}

impl JsonFileTabSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl TabSource for JsonFileTabSource {
    async fn query_tabs(&self, current_window: bool) -> Result<Vec<Tab>> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        let snapshot: Snapshot = serde_json::from_str(&content)?;

        let tabs = match snapshot {
            Snapshot::Tabs(tabs) => tabs,
            Snapshot::Windows { windows } if current_window => windows
                .into_iter()
                .find(|window| window.focused)
                .map(|window| window.tabs)
                .unwrap_or_default(),
            Snapshot::Windows { windows } => {
                windows.into_iter().flat_map(|window| window.tabs).collect()
            }
        };

        tracing::debug!(
            "[JsonFileTabSource] {} tab(s) from {}",
            tabs.len(),
            self.path.display()
        );
        Ok(tabs)
    }
}
