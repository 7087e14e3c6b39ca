use crate::foundation::error::{MemeError, MemeResult};
use crate::remote::payload::{PublishRequest, PublishResponse, SharedMeme, VoteResponse, VoteType};

/// Remote meme service.
///
/// Implementations report transport and `success: false` replies as [`MemeError::Remote`].
pub trait MemeBackend {
    /// Generate a caption for `theme`.
    fn generate_text(&self, theme: &str) -> MemeResult<String>;

    /// Generate an image for `prompt` and return its URL.
    fn generate_image(&self, prompt: &str) -> MemeResult<String>;

    /// Publish a composed meme to the community feed.
    fn publish(&self, request: &PublishRequest) -> MemeResult<PublishResponse>;

    /// Every meme in the community feed, in server order.
    fn list_memes(&self) -> MemeResult<Vec<SharedMeme>>;

    /// Like or dislike a shared meme.
    fn vote(&self, meme_id: &str, vote: VoteType) -> MemeResult<VoteResponse>;

    /// The feed, optionally narrowed to one theme.
    fn feed(&self, theme: Option<&str>) -> MemeResult<Vec<SharedMeme>> {
        let memes = self.list_memes()?;
        Ok(match theme {
            Some(t) => filter_by_theme(memes, t),
            None => memes,
        })
    }

    /// Generate a caption and a matching image in one go.
    fn generate_meme(&self, theme: &str) -> MemeResult<(String, String)> {
        let text = self.generate_text(theme)?;
        if text.trim().is_empty() {
            return Err(MemeError::remote("generated caption is empty"));
        }
        let url = self.generate_image(&text)?;
        Ok((text, url))
    }
}

/// Keep memes whose theme matches `theme` ignoring case. `"all"` and blank keep everything.
pub fn filter_by_theme(memes: Vec<SharedMeme>, theme: &str) -> Vec<SharedMeme> {
    let wanted = theme.trim().to_lowercase();
    if wanted.is_empty() || wanted == "all" {
        return memes;
    }
    memes
        .into_iter()
        .filter(|m| m.theme.trim().to_lowercase() == wanted)
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/remote/backend.rs"]
mod tests;
