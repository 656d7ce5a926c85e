//! Configuration service implementation.
//!
//! Loads [`SyncConfig`] from `config.toml` and caches it.

use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

use pinsync_core::config::SyncConfig;
use pinsync_core::error::{Result, SyncError};

use crate::paths::PinsyncPaths;

/// Overrides `api_base_url` when set.
pub const API_BASE_URL_ENV: &str = "PINSYNC_API_BASE_URL";

/// Configuration service that loads and caches the root configuration.
///
/// A missing file yields the defaults; a present but malformed file is an
/// error.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<SyncConfig>>>,
}

impl ConfigService {
    /// Creates a service reading `config.toml` from the default location.
    pub fn new() -> Result<Self> {
        let path = PinsyncPaths::new()
            .config_file()
            .map_err(|e| SyncError::config(e.to_string()))?;
        Ok(Self::with_path(path))
    }

    /// Creates a service reading the given file (for `--config` and tests).
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Gets the configuration, loading from file if not cached.
    pub fn get_config(&self) -> Result<SyncConfig> {
        // Check if already cached
        {
            let read_lock = self.config.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let mut loaded = self.load_config()?;
        if let Ok(base_url) = std::env::var(API_BASE_URL_ENV) {
            tracing::debug!("[ConfigService] api_base_url overridden by {}", API_BASE_URL_ENV);
            loaded.api_base_url = base_url;
        }
        loaded.validate()?;

        // Cache it
        {
            let mut write_lock = self.config.write().unwrap_or_else(PoisonError::into_inner);
            *write_lock = Some(loaded.clone());
        }

        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut write_lock = self.config.write().unwrap_or_else(PoisonError::into_inner);
        *write_lock = None;
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn load_config(&self) -> Result<SyncConfig> {
        if !self.path.exists() {
            tracing::debug!(
                "[ConfigService] {} not found, using defaults",
                self.path.display()
            );
            return Ok(SyncConfig::default());
        }

        let content = std::fs::read_to_string(&self.path)?;
        let config: SyncConfig = toml::from_str(&content)?;
        tracing::debug!("[ConfigService] Loaded {}", self.path.display());
        Ok(config)
    }
}
