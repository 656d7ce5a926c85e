//! Loading-state bookkeeping around asynchronous operations.

use std::future::Future;

use pinsync_core::error::Result;
use pinsync_core::{Action, Store};

/// Dispatches `Loading(key)` on creation and `NotLoading(key)` on drop.
///
/// Dropping covers success, errors, panics and a cancelled future alike.
struct LoadingGuard<'a> {
    store: &'a Store,
    key: &'a str,
}

impl<'a> LoadingGuard<'a> {
    fn start(store: &'a Store, key: &'a str) -> Self {
        store.dispatch(Action::loading(key));
        Self { store, key }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.store.dispatch(Action::not_loading(self.key));
    }
}

/// Runs `operation` with the `key` loading flag raised.
///
/// An authentication failure is recovered here: the store is logged out and
/// `Ok(None)` is returned. Every other error is handed back to the caller
/// once the flag is lowered.
pub async fn with_loading<T, F>(store: &Store, key: &str, operation: F) -> Result<Option<T>>
where
    F: Future<Output = Result<T>>,
{
    let _guard = LoadingGuard::start(store, key);

    match operation.await {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_auth() => {
            tracing::warn!("[Loading] {} rejected by Pinboard, logging out: {}", key, e);
            store.dispatch(Action::Logout);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
