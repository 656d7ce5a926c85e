//! Application layer for pinsync.
//!
//! Coordinates the session store with the Pinboard API, the tab source and
//! the credential store.

pub mod loading;
pub mod sync_usecase;

pub use loading::with_loading;
pub use sync_usecase::SyncUseCase;
