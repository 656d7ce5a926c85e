//! Credential store trait.
//!
//! Defines where the Pinboard token survives between runs.

use async_trait::async_trait;

use crate::error::Result;

/// Persistent storage for the API token.
///
/// The stored value is read once at startup, written on login and cleared on
/// logout.
///
/// # Security Note
///
/// Implementations should ensure that:
/// - The backing file (if any) is readable by the owner only
/// - The token is never logged or exposed in error messages
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Returns the stored token, if any.
    async fn get(&self) -> Result<Option<String>>;

    /// Stores `token`, replacing whatever was stored before.
    async fn set(&self, token: &str) -> Result<()>;

    /// Forgets the stored token. Clearing an empty store is not an error.
    async fn clear(&self) -> Result<()>;
}
