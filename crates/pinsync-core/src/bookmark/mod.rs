//! Remote bookmark domain.
//!
//! Models the records exchanged with Pinboard and the API surface the
//! orchestration layer talks to.

pub mod api;
pub mod model;

pub use api::PinboardApi;
pub use model::{AddPost, Post, SuggestedTags};
