//! Session state domain.
//!
//! The snapshot type, the closed set of actions that change it, and the pure
//! reducer that maps one to the other.

pub mod action;
pub mod model;
pub mod reducer;

pub use action::Action;
pub use model::{LOGIN_LOADING, SessionState, URL_LOADING};
pub use reducer::reduce;
