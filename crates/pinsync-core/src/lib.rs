//! Domain layer for pinsync.
//!
//! Holds the session state, the store that owns it, the tag scrubber, and the
//! traits the outer layers implement (Pinboard API, tab enumeration,
//! credential persistence).

pub mod bookmark;
pub mod config;
pub mod credential;
pub mod error;
pub mod scrub;
pub mod state;
pub mod store;
pub mod tab;

// Re-export common types
pub use error::{Result, SyncError};
pub use state::{Action, SessionState};
pub use store::{Store, Subscription};
