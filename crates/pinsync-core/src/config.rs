//! Sync engine configuration model.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SyncError};

pub const DEFAULT_API_BASE_URL: &str = "https://api.pinboard.in/v1";

/// Pinboard rejects clients that keep more requests than this in flight.
pub const DEFAULT_MAX_CONCURRENT_REQUESTS: usize = 2;

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Root configuration (`config.toml`).
///
/// Every field is optional in the file; missing ones take their defaults.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct SyncConfig {
    /// Base URL of the v1 API, without a trailing slash
    pub api_base_url: String,
    /// Ceiling on in-flight API requests
    pub max_concurrent_requests: usize,
    /// Per-request timeout; requests are never retried
    pub request_timeout_secs: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            max_concurrent_requests: DEFAULT_MAX_CONCURRENT_REQUESTS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl SyncConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Rejects values the gateway cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.api_base_url.trim().is_empty() {
            return Err(SyncError::config("api_base_url must not be empty"));
        }
        if self.max_concurrent_requests == 0 {
            return Err(SyncError::config("max_concurrent_requests must be at least 1"));
        }
        if self.request_timeout_secs == 0 {
            return Err(SyncError::config("request_timeout_secs must be positive"));
        }
        Ok(())
    }
}
