//! Error types for pinsync.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the whole sync engine.
///
/// The first four variants form the taxonomy the gateway normalizes remote
/// failures into. The rest cover orchestration preconditions and the ambient
/// configuration and file layers.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SyncError {
    /// The remote answered 401: the credential is invalid or expired.
    #[error("Authentication failed for {path}")]
    Auth { path: String },

    /// The remote answered with an application-level failure code, or with an
    /// HTTP status the endpoint does not expect.
    #[error("Pinboard request to {path} failed with {code}")]
    Remote { path: String, code: String },

    /// A structural contract with the remote did not hold.
    #[error("Unexpected response shape: {0}")]
    Shape(String),

    /// Network failure or timeout.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// An operation that needs a token ran while logged out.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// A caller broke an orchestration precondition.
    #[error("Invariant violated: {0}")]
    InvariantViolation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Multiple errors
    #[error("Multiple errors occurred ({} total)", .0.len())]
    Multiple(Vec<SyncError>),
}

impl SyncError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    pub fn auth(path: impl Into<String>) -> Self {
        Self::Auth { path: path.into() }
    }

    pub fn remote(path: impl Into<String>, code: impl Into<String>) -> Self {
        Self::Remote {
            path: path.into(),
            code: code.into(),
        }
    }

    pub fn shape(message: impl Into<String>) -> Self {
        Self::Shape(message.into())
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    pub fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantViolation(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Folds a batch of errors into one: `None` when empty, the error itself
    /// when alone, `Multiple` otherwise.
    pub fn collect(mut errors: Vec<SyncError>) -> Option<Self> {
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            _ => Some(Self::Multiple(errors)),
        }
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is an authentication error
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth { .. })
    }

    /// Check if this is a response shape error
    pub fn is_shape(&self) -> bool {
        matches!(self, Self::Shape(_))
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote { .. })
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for SyncError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for SyncError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, SyncError>`.
pub type Result<T> = std::result::Result<T, SyncError>;
