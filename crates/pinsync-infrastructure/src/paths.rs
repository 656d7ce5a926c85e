//! Unified path management for pinsync files.
//!
//! ```text
//! ~/.config/pinsync/           # Config directory
//! ├── config.toml              # Gateway configuration
//! └── credentials.json         # Stored API token (0600)
//! ```

use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

const APP_DIR: &str = "pinsync";

/// Resolves pinsync file locations, optionally below a custom base directory.
#[derive(Debug, Clone, Default)]
pub struct PinsyncPaths {
    base: Option<PathBuf>,
}

impl PinsyncPaths {
    /// Uses the platform config directory (`dirs::config_dir()`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `base` instead of the platform config directory (for testing).
    pub fn with_base(base: impl Into<PathBuf>) -> Self {
        Self {
            base: Some(base.into()),
        }
    }

    /// Returns the pinsync configuration directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: e.g. `~/.config/pinsync/`
    /// - `Err(PathError::ConfigDirNotFound)`: Could not determine directory
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or(PathError::ConfigDirNotFound),
        }
    }

    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    /// Returns the path to the stored token.
    ///
    /// # Security Note
    ///
    /// The file is written with 600 permissions on Unix.
    pub fn credentials_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("credentials.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_dir() {
        // Some CI sandboxes have no config dir at all
        if let Ok(config_dir) = PinsyncPaths::new().config_dir() {
            assert!(config_dir.ends_with("pinsync"));
        }
    }

    #[test]
    fn test_files_live_under_base() {
        let paths = PinsyncPaths::with_base("/tmp/pinsync-test");
        let config_file = paths.config_file().unwrap();
        let credentials_file = paths.credentials_file().unwrap();

        assert!(config_file.ends_with("config.toml"));
        assert!(credentials_file.ends_with("credentials.json"));
        assert!(config_file.starts_with("/tmp/pinsync-test"));
        assert!(credentials_file.starts_with("/tmp/pinsync-test"));
    }
}
