//! Infrastructure layer for pinsync.
//!
//! Concrete implementations of the core traits: the Pinboard gateway, the
//! file-backed credential store, the JSON tab snapshot, plus configuration
//! loading and path resolution.

pub mod config_service;
pub mod credential_store;
pub mod gateway;
pub mod paths;
pub mod tab_source;

pub use crate::config_service::ConfigService;
pub use crate::credential_store::FileCredentialStore;
pub use crate::gateway::{HttpResponse, HttpTransport, PinboardGateway, ReqwestTransport};
pub use crate::paths::PinsyncPaths;
pub use crate::tab_source::JsonFileTabSource;
