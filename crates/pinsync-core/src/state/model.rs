//! Session state model.
//!
//! Contains the in-memory snapshot of everything the UI renders. It has no
//! persisted form: it is rebuilt on every start, seeded only by the stored
//! token.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::bookmark::{Post, SuggestedTags};
use crate::tab::Tab;

/// Loading key used while a token is being validated.
pub const LOGIN_LOADING: &str = "loginLoading";

/// Loading key used while URL status is fetched or bookmarks are written.
pub const URL_LOADING: &str = "urlLoading";

/// Immutable session snapshot held by the [`Store`](crate::store::Store).
///
/// A new value is produced by [`reduce`](crate::state::reduce) for every
/// committed change; existing snapshots are never modified.
///
/// # Fields
///
/// * `token` - Pinboard API token. `None` means logged out.
/// * `tabs` - Tabs of the current window, `None` until first loaded.
/// * `active_tab` - The tab flagged active within `tabs`.
/// * `saved_posts` - Per-URL cache of remote bookmarks. A missing key means
///   "unknown", not "unsaved".
/// * `tags` - Tag-editor buffer for the active tab, space-separated.
/// * `suggested_tags` - Suggestions for the active tab.
/// * `saved_all` - Set once a save-all batch completed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub token: Option<String>,

    /// In-flight operation depth per loading key.
    pub(crate) loading: BTreeMap<String, u32>,

    pub tabs: Option<Vec<Tab>>,

    pub active_tab: Option<Tab>,

    pub saved_posts: HashMap<String, Post>,

    pub tags: Option<String>,

    pub suggested_tags: Option<SuggestedTags>,

    pub saved_all: bool,
}

impl SessionState {
    /// Creates the zero state.
    pub fn init() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Whether at least one operation tagged with `key` is still running.
    pub fn is_loading(&self, key: &str) -> bool {
        self.loading.get(key).is_some_and(|depth| *depth > 0)
    }

    /// Every loading key seen so far with its current flag.
    pub fn loading_flags(&self) -> BTreeMap<String, bool> {
        self.loading
            .iter()
            .map(|(key, depth)| (key.clone(), *depth > 0))
            .collect()
    }

    /// Cached bookmark for `url`, if known.
    pub fn saved_post(&self, url: &str) -> Option<&Post> {
        self.saved_posts.get(url)
    }

    pub fn is_active_url(&self, url: &str) -> bool {
        self.active_tab.as_ref().is_some_and(|tab| tab.url == url)
    }
}
