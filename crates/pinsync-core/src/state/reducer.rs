//! The session reducer.

use std::sync::Arc;

use crate::state::action::Action;
use crate::state::model::SessionState;
use crate::tab::Tab;

/// Applies `action` to `state` and returns the next snapshot.
///
/// `state` is never modified. When the action changes nothing the same `Arc`
/// is handed back, which the store uses to skip notifying subscribers.
pub fn reduce(state: &Arc<SessionState>, action: &Action) -> Arc<SessionState> {
    match action {
        Action::Login(token) => next(state, |s| s.token = Some(token.clone())),

        Action::Logout => next(state, |s| s.token = None),

        Action::Loading(key) => next(state, |s| {
            *s.loading.entry(key.clone()).or_insert(0) += 1;
        }),

        Action::NotLoading(key) => next(state, |s| {
            let depth = s.loading.entry(key.clone()).or_insert(0);
            *depth = depth.saturating_sub(1);
        }),

        Action::UpdatePostsCache { url, saved } => {
            // Monotonic: "not known" never replaces a cached post.
            let Some(post) = saved else {
                return Arc::clone(state);
            };
            next(state, |s| {
                if s.is_active_url(url) {
                    s.tags = Some(post.tags.clone());
                }
                s.saved_posts.insert(url.clone(), post.clone());
            })
        }

        Action::UpdateTags(text) => next(state, |s| s.tags = Some(text.clone())),

        Action::SuggestedTags(suggested) => next(state, |s| {
            // Only seed the editor; never clobber what the user typed.
            if s.tags.is_none() {
                s.tags = Some(suggested.scrubbed_text());
            }
            s.suggested_tags = Some(suggested.clone());
        }),

        Action::LoadTabState(tabs) => next(state, |s| {
            s.active_tab = Tab::find_active(tabs).cloned();
            s.tabs = Some(tabs.clone());
        }),

        Action::SavedAll => next(state, |s| s.saved_all = true),
    }
}

fn next(state: &SessionState, update: impl FnOnce(&mut SessionState)) -> Arc<SessionState> {
    let mut next = state.clone();
    update(&mut next);
    Arc::new(next)
}
