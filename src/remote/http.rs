use std::time::Duration;

use anyhow::Context as _;
use reqwest::blocking::{Client, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::foundation::error::{MemeError, MemeResult};
use crate::remote::backend::MemeBackend;
use crate::remote::payload::{
    FeedResponse, GenerateImageRequest, GenerateImageResponse, GenerateTextRequest,
    GenerateTextResponse, PublishRequest, PublishResponse, SharedMeme, VoteRequest, VoteResponse,
    VoteType,
};
use crate::source::loader::ImageFetcher;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Blocking JSON client for the meme service.
#[derive(Debug, Clone)]
pub struct HttpMemeBackend {
    http: Client,
    base: Url,
}

impl HttpMemeBackend {
    /// Client rooted at `api_base`, e.g. `https://host/api`.
    pub fn new(api_base: &str) -> MemeResult<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| MemeError::remote(format!("failed to build http client: {e}")))?;
        Self::with_client(http, api_base)
    }

    /// Use a preconfigured `reqwest` client.
    pub fn with_client(http: Client, api_base: &str) -> MemeResult<Self> {
        let base = Url::parse(api_base.trim())
            .map_err(|e| MemeError::validation(format!("invalid api base '{api_base}': {e}")))?;
        if base.cannot_be_a_base() {
            return Err(MemeError::validation(format!(
                "api base '{api_base}' cannot carry a path"
            )));
        }
        Ok(Self { http, base })
    }

    /// Service root.
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// `base` with `segments` appended, each percent-encoded.
    pub fn endpoint(&self, segments: &[&str]) -> MemeResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| MemeError::validation("api base cannot carry a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> MemeResult<T> {
        let url = self.endpoint(segments)?;
        tracing::debug!(%url, "POST");
        let resp = self
            .http
            .post(url.clone())
            .json(body)
            .send()
            .with_context(|| format!("POST {url}"))
            .map_err(remote_err)?;
        read_json(resp, &url)
    }

    fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> MemeResult<T> {
        let url = self.endpoint(segments)?;
        tracing::debug!(%url, "GET");
        let resp = self
            .http
            .get(url.clone())
            .send()
            .with_context(|| format!("GET {url}"))
            .map_err(remote_err)?;
        read_json(resp, &url)
    }
}

fn remote_err(e: anyhow::Error) -> MemeError {
    MemeError::remote(format!("{e:#}"))
}

fn read_json<T: DeserializeOwned>(resp: Response, url: &Url) -> MemeResult<T> {
    resp.error_for_status()
        .with_context(|| format!("{url} returned an error status"))
        .map_err(remote_err)?
        .json()
        .with_context(|| format!("failed to decode response from {url}"))
        .map_err(remote_err)
}

impl MemeBackend for HttpMemeBackend {
    #[tracing::instrument(skip(self))]
    fn generate_text(&self, theme: &str) -> MemeResult<String> {
        let resp: GenerateTextResponse = self.post_json(
            &["meme", "text"],
            &GenerateTextRequest {
                theme: theme.to_owned(),
            },
        )?;
        ensure_success(resp.success, resp.message.as_deref(), "text generation")?;
        resp.meme_text
            .ok_or_else(|| MemeError::remote("text generation returned no memeText"))
    }

    #[tracing::instrument(skip(self))]
    fn generate_image(&self, prompt: &str) -> MemeResult<String> {
        let resp: GenerateImageResponse = self.post_json(
            &["meme", "image"],
            &GenerateImageRequest {
                prompt: prompt.to_owned(),
            },
        )?;
        ensure_success(resp.success, resp.message.as_deref(), "image generation")?;
        resp.image_url
            .ok_or_else(|| MemeError::remote("image generation returned no imageUrl"))
    }

    #[tracing::instrument(skip_all, fields(theme = %request.theme))]
    fn publish(&self, request: &PublishRequest) -> MemeResult<PublishResponse> {
        let resp: PublishResponse = self.post_json(&["meme", "share"], request)?;
        ensure_success(resp.success, resp.message.as_deref(), "publish")?;
        Ok(resp)
    }

    fn list_memes(&self) -> MemeResult<Vec<SharedMeme>> {
        let resp: FeedResponse = self.get_json(&["meme"])?;
        ensure_success(resp.success, None, "feed listing")?;
        Ok(resp.memes)
    }

    #[tracing::instrument(skip(self))]
    fn vote(&self, meme_id: &str, vote: VoteType) -> MemeResult<VoteResponse> {
        let resp: VoteResponse =
            self.post_json(&["meme", meme_id, "vote"], &VoteRequest { vote_type: vote })?;
        ensure_success(resp.success, resp.message.as_deref(), "vote")?;
        Ok(resp)
    }
}

impl ImageFetcher for HttpMemeBackend {
    fn fetch_image_bytes(&self, url: &str) -> MemeResult<Vec<u8>> {
        let bytes = self
            .http
            .get(url)
            .send()
            .and_then(Response::error_for_status)
            .and_then(Response::bytes)
            .map_err(|e| MemeError::decode(format!("failed to fetch image '{url}': {e}")))?;
        Ok(bytes.to_vec())
    }
}

/// Turn a `{ success: false, message }` reply into a [`MemeError::Remote`].
fn ensure_success(success: bool, message: Option<&str>, what: &str) -> MemeResult<()> {
    if success {
        return Ok(());
    }
    Err(MemeError::remote(match message {
        Some(m) if !m.trim().is_empty() => format!("{what} failed: {m}"),
        _ => format!("{what} failed"),
    }))
}

#[cfg(test)]
#[path = "../../tests/unit/remote/http.rs"]
mod tests;
