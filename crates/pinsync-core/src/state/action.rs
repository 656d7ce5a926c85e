//! State-mutating actions.

use crate::bookmark::{Post, SuggestedTags};
use crate::tab::Tab;

/// A plain action consumed by [`reduce`](crate::state::reduce).
///
/// The set is closed: adding a variant forces the reducer to handle it.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Stores a validated token.
    Login(String),
    /// Drops the token, forcing re-authentication.
    Logout,
    /// An operation tagged with this key started.
    Loading(String),
    /// An operation tagged with this key settled.
    NotLoading(String),
    /// Result of a status fetch or a save. `None` means "nothing known" and
    /// never overwrites a cached post.
    UpdatePostsCache { url: String, saved: Option<Post> },
    /// The user edited the tag buffer.
    UpdateTags(String),
    /// Suggestions for the active tab arrived.
    SuggestedTags(SuggestedTags),
    /// A fresh tab snapshot.
    LoadTabState(Vec<Tab>),
    /// A save-all batch completed.
    SavedAll,
}

impl Action {
    pub fn loading(key: impl Into<String>) -> Self {
        Self::Loading(key.into())
    }

    pub fn not_loading(key: impl Into<String>) -> Self {
        Self::NotLoading(key.into())
    }

    /// Stable upper-case name of the variant, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Login(_) => "LOGIN",
            Self::Logout => "LOGOUT",
            Self::Loading(_) => "LOADING",
            Self::NotLoading(_) => "NOT_LOADING",
            Self::UpdatePostsCache { .. } => "UPDATE_POSTS_CACHE",
            Self::UpdateTags(_) => "UPDATE_TAGS",
            Self::SuggestedTags(_) => "SUGGESTED_TAGS",
            Self::LoadTabState(_) => "LOAD_TAB_STATE",
            Self::SavedAll => "SAVED_ALL",
        }
    }
}
