//! Pinboard API trait.

use async_trait::async_trait;
use serde_json::Value;

use crate::bookmark::model::{AddPost, Post};
use crate::error::Result;

/// The subset of the Pinboard v1 API the sync engine uses.
///
/// Implementations are expected to bound their own request concurrency and
/// to normalize failures into [`SyncError`](crate::error::SyncError): a 401
/// must surface as `SyncError::Auth`.
#[async_trait]
pub trait PinboardApi: Send + Sync {
    /// Checks a token against `/user/auth_token`. `true` iff the service
    /// answered with a success status.
    async fn auth_token_valid(&self, token: &str) -> Result<bool>;

    /// Fetches the posts stored for `url` (`/posts/get`).
    async fn posts_get(&self, token: &str, url: &str) -> Result<Vec<Post>>;

    /// Fetches raw tag suggestions for `url` (`/posts/suggest`).
    ///
    /// The JSON body is returned unchecked, whatever its shape; see [`SuggestedTags::from_response`](crate::bookmark::SuggestedTags::from_response).
    async fn posts_suggest(&self, token: &str, url: &str) -> Result<Value>;

    /// Stores a bookmark (`/posts/add`).
    async fn posts_add(&self, token: &str, post: &AddPost) -> Result<()>;
}
