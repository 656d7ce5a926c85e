//! Tab enumeration trait.

use async_trait::async_trait;

use crate::error::Result;
use crate::tab::model::Tab;

/// Source of open-tab snapshots (the browser, or a stand-in for it).
#[async_trait]
pub trait TabSource: Send + Sync {
    /// Lists open tabs. With `current_window` set, only tabs of the focused
    /// window are returned.
    async fn query_tabs(&self, current_window: bool) -> Result<Vec<Tab>>;
}
