use std::fmt;
use std::path::PathBuf;

use crate::foundation::error::{MemeError, MemeResult};
use crate::source::image::{SourceImage, decode_data_uri, decode_image, decode_image_file};

/// Fetches remote image bytes, e.g. the URL returned by an image-generation call.
pub trait ImageFetcher {
    /// Download the bytes behind `url`. Network or access failures are decode errors.
    fn fetch_image_bytes(&self, url: &str) -> MemeResult<Vec<u8>>;
}

/// Where a source image comes from.
#[derive(Clone, PartialEq, Eq)]
pub enum SourceOrigin {
    /// Raw encoded bytes already in memory (an upload).
    Bytes(Vec<u8>),
    /// A local file.
    File(PathBuf),
    /// A `data:` URI.
    DataUri(String),
    /// A remote `http(s)` URL.
    Url(String),
}

impl fmt::Debug for SourceOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bytes(b) => write!(f, "Bytes({} bytes)", b.len()),
            Self::File(p) => write!(f, "File({})", p.display()),
            Self::DataUri(s) => write!(f, "DataUri({} chars)", s.len()),
            Self::Url(u) => write!(f, "Url({u})"),
        }
    }
}

impl SourceOrigin {
    /// Classify a user-supplied location string.
    pub fn parse(location: &str) -> Self {
        let trimmed = location.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("data:") {
            Self::DataUri(trimmed.to_owned())
        } else if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::Url(trimmed.to_owned())
        } else {
            Self::File(PathBuf::from(trimmed))
        }
    }

    /// Load and decode the image. URLs need a fetcher.
    pub fn decode(&self, fetcher: Option<&dyn ImageFetcher>) -> MemeResult<SourceImage> {
        match self {
            Self::Bytes(bytes) => decode_image(bytes),
            Self::File(path) => decode_image_file(path),
            Self::DataUri(uri) => decode_data_uri(uri),
            Self::Url(url) => {
                let fetcher = fetcher.ok_or_else(|| {
                    MemeError::decode(format!("no fetcher configured for remote image '{url}'"))
                })?;
                decode_image(&fetcher.fetch_image_bytes(url)?)
            }
        }
    }
}

/// Identifies one decode request. Later requests carry strictly larger tickets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DecodeTicket(u64);

impl DecodeTicket {
    /// Sequence number of this request.
    pub fn seq(self) -> u64 {
        self.0
    }
}

/// Issues decode tickets and decides which completions still matter.
///
/// Only the most recently issued ticket is current; completions for any older ticket are
/// dropped without running the decoder.
#[derive(Debug, Default)]
pub struct SourceLoader {
    issued: u64,
    current: Option<u64>,
}

impl SourceLoader {
    /// Create a loader with no outstanding request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, superseding every earlier one.
    pub fn issue(&mut self) -> DecodeTicket {
        self.issued += 1;
        self.current = Some(self.issued);
        DecodeTicket(self.issued)
    }

    /// Supersede outstanding requests without starting a new one.
    pub fn invalidate(&mut self) {
        self.current = None;
    }

    /// Return `true` when `ticket` is the latest outstanding request.
    pub fn is_current(&self, ticket: DecodeTicket) -> bool {
        self.current == Some(ticket.0)
    }

    /// Run `decode` for `ticket` if it is still current.
    ///
    /// Returns `Ok(None)` for a stale ticket. A current ticket is consumed whether decoding
    /// succeeds or fails.
    pub fn complete<F>(&mut self, ticket: DecodeTicket, decode: F) -> MemeResult<Option<SourceImage>>
    where
        F: FnOnce() -> MemeResult<SourceImage>,
    {
        if !self.is_current(ticket) {
            tracing::debug!(
                ticket = ticket.0,
                latest = self.issued,
                "discarding stale decode"
            );
            return Ok(None);
        }
        self.current = None;
        decode().map(Some)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/source/loader.rs"]
mod tests;
