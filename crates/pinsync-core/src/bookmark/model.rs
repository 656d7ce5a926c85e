//! Bookmark domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, SyncError};
use crate::scrub::scrub;

/// A bookmark record as stored by Pinboard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Post {
    /// Bookmarked URL (`href` on the wire)
    #[serde(rename = "href")]
    pub url: String,
    /// Bookmark title
    #[serde(default)]
    pub description: String,
    /// Space-separated tags
    #[serde(default)]
    pub tags: String,
    /// Creation time reported by the service
    pub time: DateTime<Utc>,
}

impl Post {
    /// Builds the record the service will hold after a successful add.
    pub fn from_added(post: &AddPost, time: DateTime<Utc>) -> Self {
        Self {
            url: post.url.clone(),
            description: post.description.clone(),
            tags: post.tags.clone(),
            time,
        }
    }
}

/// Parameters of a `/posts/add` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddPost {
    pub url: String,
    pub description: String,
    /// Space-separated tags
    pub tags: String,
    /// Overwrite an existing bookmark for the same URL
    pub replace: bool,
}

/// Tag suggestions for one URL.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SuggestedTags {
    pub popular: Vec<String>,
    pub recommended: Vec<String>,
    /// `recommended` after [`scrub`]
    pub scrubbed: Vec<String>,
}

impl SuggestedTags {
    /// Validates a raw `/posts/suggest` body and scrubs the recommendations.
    ///
    /// The service answers `[{"popular": [...]}, {"recommended": [...]}]`.
    /// Anything else means the integration contract is broken and yields
    /// [`SyncError::Shape`].
    pub fn from_response(body: &Value) -> Result<Self> {
        let body = body
            .as_array()
            .ok_or_else(|| SyncError::shape("suggest response is not an array"))?;
        if body.len() != 2 {
            return Err(SyncError::shape(format!(
                "suggest response should have 2 entries, got {}",
                body.len()
            )));
        }
        let popular = string_list(&body[0], "popular")?;
        let recommended = string_list(&body[1], "recommended")?;
        let scrubbed = scrub(&recommended);

        Ok(Self {
            popular,
            recommended,
            scrubbed,
        })
    }

    /// The scrubbed tags as a tag-editor buffer.
    pub fn scrubbed_text(&self) -> String {
        self.scrubbed.join(" ")
    }
}

fn string_list(entry: &Value, key: &str) -> Result<Vec<String>> {
    let list = entry
        .get(key)
        .and_then(Value::as_array)
        .ok_or_else(|| SyncError::shape(format!("suggest entry is missing `{}`", key)))?;

    list.iter()
        .map(|tag| {
            tag.as_str()
                .map(str::to_string)
                .ok_or_else(|| SyncError::shape(format!("`{}` contains a non-string tag", key)))
        })
        .collect()
}
