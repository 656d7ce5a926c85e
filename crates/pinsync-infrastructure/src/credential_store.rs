//! File-backed credential store.
//!
//! Keeps the Pinboard token in `credentials.json` next to the configuration.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use pinsync_core::credential::CredentialStore;
use pinsync_core::error::{Result, SyncError};
use serde::{Deserialize, Serialize};

use crate::paths::PinsyncPaths;

#[derive(Debug, Default, Serialize, Deserialize)]
struct CredentialFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
}

/// [`CredentialStore`] writing a small JSON document.
///
/// # Security Note
///
/// The file is written with 600 permissions on Unix. The token is kept in
/// plaintext.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Uses `credentials.json` in the default config directory.
    pub fn new() -> Result<Self> {
        let path = PinsyncPaths::new()
            .credentials_file()
            .map_err(|e| SyncError::config(e.to_string()))?;
        Ok(Self::with_path(path))
    }

    /// Uses the given file (for testing).
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn write_restricted(&self, content: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, content).await?;

        // Set file permissions to 600 (user read/write only) on Unix
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            tokio::fs::set_permissions(&self.path, permissions).await?;
        }

        Ok(())
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn get(&self) -> Result<Option<String>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let file: CredentialFile = serde_json::from_str(&content)?;
        Ok(file.token.filter(|token| !token.is_empty()))
    }

    async fn set(&self, token: &str) -> Result<()> {
        let file = CredentialFile {
            token: Some(token.to_string()),
        };
        let content = serde_json::to_string_pretty(&file)?;
        self.write_restricted(&content).await?;
        tracing::debug!("[FileCredentialStore] Token stored at {}", self.path.display());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                tracing::debug!("[FileCredentialStore] Removed {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
