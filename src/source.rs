//! Source image provider: decoding uploads, files, data URIs and fetched URLs, plus the
//! ticketing that drops decodes for images the user has already replaced.

/// Decoded rasters and decoders.
pub mod image;
/// Source origins and stale-decode tickets.
pub mod loader;

pub use self::image::{SourceImage, decode_data_uri, decode_image, decode_image_file};
pub use self::loader::{DecodeTicket, ImageFetcher, SourceLoader, SourceOrigin};
