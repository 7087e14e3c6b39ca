//! Remote collaborators: meme text/image generation, publishing and the community feed.
//!
//! The wire types and [`MemeBackend`] contract are always available. The blocking HTTP client
//! needs the `remote` cargo feature.

/// Service trait and feed filtering.
pub mod backend;
/// Blocking `reqwest` client.
#[cfg(feature = "remote")]
pub mod http;
/// JSON wire types.
pub mod payload;

pub use backend::{MemeBackend, filter_by_theme};
#[cfg(feature = "remote")]
pub use http::HttpMemeBackend;
pub use payload::{
    DEFAULT_API_BASE, DEFAULT_CREATOR, DEFAULT_THEME, FeedResponse, GenerateImageRequest,
    GenerateImageResponse, GenerateTextRequest, GenerateTextResponse, PublishRequest,
    PublishResponse, SharedMeme, VoteRequest, VoteResponse, VoteType,
};
