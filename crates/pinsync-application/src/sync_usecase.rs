//! Sync use case implementation.
//!
//! This module provides the `SyncUseCase`, which drives every exchange between
//! the session [`Store`] and the outside world: authenticating, reading tabs,
//! checking which URLs are already bookmarked, fetching tag suggestions and
//! saving tabs to Pinboard.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use pinsync_core::bookmark::{AddPost, PinboardApi, Post, SuggestedTags};
use pinsync_core::credential::CredentialStore;
use pinsync_core::error::{Result, SyncError};
use pinsync_core::state::{LOGIN_LOADING, URL_LOADING};
use pinsync_core::tab::{Tab, TabSource};
use pinsync_core::{Action, Store};

use crate::loading::with_loading;

/// Use case for syncing browser tabs with Pinboard.
///
/// Every operation reads the store, talks to its collaborators and reports
/// back through [`Store::dispatch`]. The store is the only shared mutable
/// state; the collaborators are read-only handles.
#[derive(Clone)]
pub struct SyncUseCase {
    store: Store,
    /// Remote bookmark service
    api: Arc<dyn PinboardApi>,
    /// Source of the open tabs
    tab_source: Arc<dyn TabSource>,
    /// Persistence for the API token
    credential_store: Arc<dyn CredentialStore>,
}

impl SyncUseCase {
    pub fn new(
        store: Store,
        api: Arc<dyn PinboardApi>,
        tab_source: Arc<dyn TabSource>,
        credential_store: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            store,
            api,
            tab_source,
            credential_store,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Restores the session: stored token, current tabs, then the active
    /// tab's status and suggestions when authenticated.
    pub async fn bootstrap(&self) -> Result<()> {
        if let Some(token) = self.credential_store.get().await? {
            tracing::debug!("[SyncUseCase] Found stored token, validating");
            self.login(&token).await?;
        }

        self.load_tab_state().await?;

        if self.store.state().is_authenticated() {
            self.fetch_active_tab_status().await?;
            self.fetch_active_tab_suggestions().await?;
        }
        Ok(())
    }

    /// Validates `token` against Pinboard and, if accepted, logs in and
    /// persists it.
    ///
    /// Returns whether the token was accepted. A rejected token leaves the
    /// store untouched.
    pub async fn login(&self, token: &str) -> Result<bool> {
        let valid = with_loading(&self.store, LOGIN_LOADING, self.api.auth_token_valid(token))
            .await?
            .unwrap_or(false);

        if !valid {
            tracing::info!("[SyncUseCase] Token rejected");
            return Ok(false);
        }

        self.store.dispatch(Action::Login(token.to_string()));
        self.credential_store.set(token).await?;
        tracing::info!("[SyncUseCase] Logged in");
        Ok(true)
    }

    /// Drops the token from the session and from the credential store.
    pub async fn logout(&self) -> Result<()> {
        self.store.dispatch(Action::Logout);
        self.credential_store.clear().await?;
        tracing::info!("[SyncUseCase] Logged out");
        Ok(())
    }

    /// Reads the tabs of the current window into the store.
    pub async fn load_tab_state(&self) -> Result<()> {
        let tabs = self.tab_source.query_tabs(true).await?;
        tracing::debug!("[SyncUseCase] Loaded {} tab(s)", tabs.len());
        self.store.dispatch(Action::LoadTabState(tabs));
        Ok(())
    }

    /// Returns the saved post for `url`, asking Pinboard only on a cache miss.
    ///
    /// A URL Pinboard does not know yields `Ok(None)` and is not cached, so
    /// the next call asks again. A rejected token also yields `Ok(None)`
    /// after logging out.
    pub async fn fetch_url_saved_status(&self, url: &str) -> Result<Option<Post>> {
        if let Some(post) = self.store.state().saved_post(url) {
            tracing::trace!("[SyncUseCase] Cache hit for {}", url);
            return Ok(Some(post.clone()));
        }

        let token = self.token()?;
        let Some(posts) =
            with_loading(&self.store, URL_LOADING, self.api.posts_get(&token, url)).await?
        else {
            return Ok(None);
        };

        if posts.len() > 1 {
            tracing::debug!(
                "[SyncUseCase] {} posts returned for {}, keeping the first",
                posts.len(),
                url
            );
        }
        let saved = posts.into_iter().next();

        self.store.dispatch(Action::UpdatePostsCache {
            url: url.to_string(),
            saved: saved.clone(),
        });
        Ok(saved)
    }

    /// Checks the active tab's saved status. No-op without an active tab.
    pub async fn fetch_active_tab_status(&self) -> Result<Option<Post>> {
        match self.active_url() {
            Some(url) => self.fetch_url_saved_status(&url).await,
            None => Ok(None),
        }
    }

    /// Asks Pinboard for tag suggestions for `url`.
    ///
    /// The scrubbed result is always returned. It is also published to the
    /// store when `dispatch_for_active_tab` is set and `url` belongs to the
    /// active tab. A malformed response is a [`SyncError::Shape`].
    pub async fn posts_suggest(
        &self,
        url: &str,
        dispatch_for_active_tab: bool,
    ) -> Result<SuggestedTags> {
        let token = self.token()?;
        let body = self.api.posts_suggest(&token, url).await?;
        let suggested = SuggestedTags::from_response(&body)?;

        if dispatch_for_active_tab && self.store.state().is_active_url(url) {
            self.store.dispatch(Action::SuggestedTags(suggested.clone()));
        }
        Ok(suggested)
    }

    /// Fetches and publishes suggestions for the active tab.
    pub async fn fetch_active_tab_suggestions(&self) -> Result<Option<SuggestedTags>> {
        let Some(url) = self.active_url() else {
            return Ok(None);
        };
        with_loading(&self.store, URL_LOADING, self.posts_suggest(&url, true)).await
    }

    /// Replaces the tag buffer being edited for the active tab.
    pub fn update_tags(&self, text: impl Into<String>) {
        self.store.dispatch(Action::UpdateTags(text.into()));
    }

    /// Saves `tab` to Pinboard, replacing any existing bookmark for its URL.
    ///
    /// Without explicit `tags` the scrubbed suggestions are used. That is
    /// only allowed for tabs other than the active one, whose tags come from
    /// the edit buffer.
    pub async fn save_tab(&self, tab: &Tab, tags: Option<String>) -> Result<Option<Post>> {
        if tags.is_none() && self.store.state().is_active_url(&tab.url) {
            return Err(SyncError::invariant(format!(
                "active tab {} must be saved with explicit tags",
                tab.url
            )));
        }

        let token = self.token()?;
        let saved = with_loading(&self.store, URL_LOADING, async {
            let tags = match tags {
                Some(tags) => tags,
                None => self.posts_suggest(&tab.url, false).await?.scrubbed_text(),
            };
            let post = AddPost {
                url: tab.url.clone(),
                description: tab.title.clone(),
                tags,
                replace: true,
            };
            self.api.posts_add(&token, &post).await?;
            Ok::<_, SyncError>(Post::from_added(&post, Utc::now()))
        })
        .await?;

        if let Some(post) = &saved {
            self.store.dispatch(Action::UpdatePostsCache {
                url: tab.url.clone(),
                saved: Some(post.clone()),
            });
        }
        Ok(saved)
    }

    /// Saves the active tab with the current tag buffer.
    pub async fn save_active_tab(&self) -> Result<Option<Post>> {
        let state = self.store.state();
        let tab = state
            .active_tab
            .clone()
            .ok_or_else(|| SyncError::invariant("no active tab to save"))?;
        let tags = state.tags.clone().unwrap_or_default();
        self.save_tab(&tab, Some(tags)).await
    }

    /// Saves every open tab that is not already bookmarked.
    ///
    /// Tabs are handled concurrently under a single `urlLoading` scope and
    /// deduplicated by URL, the active tab winning. The active tab is saved
    /// again when its tag buffer differs from the cached bookmark. Every
    /// branch runs to completion; their errors are reported together and
    /// suppress `SavedAll`. Tabs must have been loaded first.
    pub async fn save_all(&self) -> Result<()> {
        self.token()?;
        let state = self.store.state();
        let tabs = state
            .tabs
            .as_deref()
            .ok_or_else(|| SyncError::invariant("tabs not loaded"))?;
        let tabs = unique_by_url(tabs);
        tracing::info!("[SyncUseCase] Saving {} tab(s)", tabs.len());

        let finished = with_loading(&self.store, URL_LOADING, async {
            let results = join_all(tabs.iter().map(|tab| self.save_all_branch(tab))).await;
            let errors = results.into_iter().filter_map(|result| result.err()).collect();
            match SyncError::collect(errors) {
                Some(e) => Err(e),
                None => Ok(()),
            }
        })
        .await?;

        if finished.is_some() && self.store.state().is_authenticated() {
            self.store.dispatch(Action::SavedAll);
            tracing::info!("[SyncUseCase] All tabs saved");
        }
        Ok(())
    }

    async fn save_all_branch(&self, tab: &Tab) -> Result<()> {
        let saved = self.fetch_url_saved_status(&tab.url).await?;

        let state = self.store.state();
        if !state.is_authenticated() {
            return Ok(());
        }

        if state.is_active_url(&tab.url) {
            let live = state.tags.as_deref().unwrap_or_default();
            if saved.is_some_and(|post| same_tags(&post.tags, live)) {
                tracing::debug!("[SyncUseCase] Active tab unchanged: {}", tab.url);
                return Ok(());
            }
            self.save_active_tab().await?;
        } else {
            if saved.is_some() {
                tracing::debug!("[SyncUseCase] Already saved: {}", tab.url);
                return Ok(());
            }
            self.save_tab(tab, None).await?;
        }
        Ok(())
    }

    fn token(&self) -> Result<String> {
        self.store.state().token.clone().ok_or(SyncError::NotAuthenticated)
    }

    fn active_url(&self) -> Option<String> {
        self.store.state().active_tab.as_ref().map(|tab| tab.url.clone())
    }
}

/// Keeps one tab per URL, preferring the active one.
fn unique_by_url(tabs: &[Tab]) -> Vec<Tab> {
    let mut seen = HashSet::new();
    let active = tabs.iter().filter(|tab| tab.active);
    let rest = tabs.iter().filter(|tab| !tab.active);
    active
        .chain(rest)
        .filter(|tab| seen.insert(tab.url.as_str()))
        .cloned()
        .collect()
}

fn same_tags(a: &str, b: &str) -> bool {
    a.split_whitespace().eq(b.split_whitespace())
}
