//! Export adapter: encode a composited surface to PNG/JPEG bytes, data URIs or files.

/// PNG/JPEG encoding and data URIs.
pub mod encode;

pub use encode::{
    DEFAULT_EXPORT_FILE_NAME, ExportFormat, encode, save, to_data_uri, to_straight_rgba8,
};
