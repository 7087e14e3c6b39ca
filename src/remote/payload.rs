use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::foundation::error::MemeError;

/// Service root used when no configuration overrides it.
pub const DEFAULT_API_BASE: &str = "https://meme-backend-qgxz.onrender.com/api";
/// Theme recorded for memes composed from a user's own image.
pub const DEFAULT_THEME: &str = "custom";
/// Creator recorded when the user leaves the field blank.
pub const DEFAULT_CREATOR: &str = "Anonymous";

/// `POST /meme/text` body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateTextRequest {
    /// Free-form theme such as "office humor".
    pub theme: String,
}

/// `POST /meme/text` reply.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateTextResponse {
    /// Whether generation succeeded.
    pub success: bool,
    /// Generated caption.
    #[serde(default)]
    pub meme_text: Option<String>,
    /// Failure detail.
    #[serde(default)]
    pub message: Option<String>,
}

/// `POST /meme/image` body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateImageRequest {
    /// Image prompt, usually the generated caption.
    pub prompt: String,
}

/// `POST /meme/image` reply.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateImageResponse {
    /// Whether generation succeeded.
    pub success: bool,
    /// Where the generated image can be fetched.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Failure detail.
    #[serde(default)]
    pub message: Option<String>,
}

/// `POST /meme/share` body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishRequest {
    /// Encoded composite as a `data:` URI.
    pub image_data: String,
    /// Caption drawn on the image.
    pub text: String,
    /// Theme tag.
    pub theme: String,
    /// Display name of the author.
    pub creator: String,
}

impl PublishRequest {
    /// Build a request, substituting defaults for blank theme or creator.
    pub fn new(
        image_data: impl Into<String>,
        text: impl Into<String>,
        theme: Option<&str>,
        creator: Option<&str>,
    ) -> Self {
        fn or_default(v: Option<&str>, default: &str) -> String {
            match v.map(str::trim) {
                Some(s) if !s.is_empty() => s.to_owned(),
                _ => default.to_owned(),
            }
        }
        Self {
            image_data: image_data.into(),
            text: text.into(),
            theme: or_default(theme, DEFAULT_THEME),
            creator: or_default(creator, DEFAULT_CREATOR),
        }
    }
}

/// `POST /meme/share` reply.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishResponse {
    /// Whether the meme was stored.
    pub success: bool,
    /// Optional detail.
    #[serde(default)]
    pub message: Option<String>,
}

/// One meme in the community feed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedMeme {
    /// Server-side identifier.
    #[serde(rename = "_id")]
    pub id: String,
    /// Hosted image location.
    pub image_url: String,
    /// Caption.
    #[serde(default)]
    pub text: String,
    /// Theme tag.
    #[serde(default)]
    pub theme: String,
    /// Author, if recorded.
    #[serde(default)]
    pub creator: Option<String>,
    /// Like count.
    #[serde(default)]
    pub likes: u64,
    /// Dislike count.
    #[serde(default)]
    pub dislikes: u64,
    /// Creation timestamp as sent by the server.
    #[serde(default)]
    pub created_at: Option<String>,
}

impl SharedMeme {
    /// Author name, falling back to [`DEFAULT_CREATOR`].
    pub fn creator_or_default(&self) -> &str {
        self.creator
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or(DEFAULT_CREATOR)
    }
}

/// `GET /meme` reply.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedResponse {
    /// Whether listing succeeded. Older servers omit it.
    #[serde(default = "default_true")]
    pub success: bool,
    /// Memes in server order.
    #[serde(default)]
    pub memes: Vec<SharedMeme>,
}

fn default_true() -> bool {
    true
}

/// Vote direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteType {
    /// Thumbs up.
    Like,
    /// Thumbs down.
    Dislike,
}

impl fmt::Display for VoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Like => "like",
            Self::Dislike => "dislike",
        })
    }
}

impl FromStr for VoteType {
    type Err = MemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "like" | "up" => Ok(Self::Like),
            "dislike" | "down" => Ok(Self::Dislike),
            other => Err(MemeError::validation(format!(
                "unknown vote '{other}' (expected like or dislike)"
            ))),
        }
    }
}

/// `POST /meme/{id}/vote` body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    /// Direction of the vote.
    pub vote_type: VoteType,
}

/// `POST /meme/{id}/vote` reply.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteResponse {
    /// Whether the vote was counted.
    pub success: bool,
    /// Failure detail.
    #[serde(default)]
    pub message: Option<String>,
    /// Updated like count.
    #[serde(default)]
    pub likes: Option<u64>,
    /// Updated dislike count.
    #[serde(default)]
    pub dislikes: Option<u64>,
}

#[cfg(test)]
#[path = "../../tests/unit/remote/payload.rs"]
mod tests;
