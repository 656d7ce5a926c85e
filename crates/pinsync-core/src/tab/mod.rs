//! Browser tab domain.
//!
//! Tabs are point-in-time snapshots delivered by a [`TabSource`].

pub mod model;
pub mod source;

pub use model::Tab;
pub use source::TabSource;
