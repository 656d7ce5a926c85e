//! Terminal view of the session store.
//!
//! Prints a one-line summary of the snapshot to stderr whenever it changes.

use std::sync::{Mutex, PoisonError};

use pinsync_core::{SessionState, Store, Subscription};

/// Subscribes a renderer to `store`.
pub fn watch(store: &Store) -> Subscription {
    let reader = store.clone();
    let last_line = Mutex::new(String::new());

    store.subscribe(move || {
        let line = summary(&reader.state());
        let mut last = last_line.lock().unwrap_or_else(PoisonError::into_inner);
        if *last != line {
            eprintln!("{}", line);
            *last = line;
        }
    })
}

fn summary(state: &SessionState) -> String {
    let auth = if state.is_authenticated() {
        "logged in"
    } else {
        "logged out"
    };
    let tabs = state.tabs.as_ref().map_or(0, Vec::len);
    let busy: Vec<String> = state
        .loading_flags()
        .into_iter()
        .filter(|(_, loading)| *loading)
        .map(|(key, _)| key)
        .collect();

    let mut line = format!(
        "· {} | {} tab(s) | {} saved",
        auth,
        tabs,
        state.saved_posts.len()
    );
    if !busy.is_empty() {
        line.push_str(&format!(" | loading: {}", busy.join(", ")));
    }
    if state.saved_all {
        line.push_str(" | all saved");
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use pinsync_core::Action;
    use pinsync_core::state::URL_LOADING;
    use pinsync_core::tab::Tab;

    #[test]
    fn test_summary_lists_busy_keys() {
        let store = Store::default();
        store.dispatch(Action::Login("user:token".to_string()));
        store.dispatch(Action::LoadTabState(vec![Tab::new(1, "https://a.example", "A", true)]));
        store.dispatch(Action::loading(URL_LOADING));

        let line = summary(&store.state());

        assert_eq!(line, "· logged in | 1 tab(s) | 0 saved | loading: urlLoading");
    }

    #[test]
    fn test_summary_when_idle() {
        let line = summary(&SessionState::init());
        assert_eq!(line, "· logged out | 0 tab(s) | 0 saved");
    }
}
