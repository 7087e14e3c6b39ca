use std::path::Path;
use std::sync::Arc;

use anyhow::Context as _;
use base64::Engine as _;

use crate::foundation::core::{Canvas, premultiply_rgba8_in_place};
use crate::foundation::error::{MemeError, MemeResult};

/// Decoded source raster in premultiplied RGBA8 form.
///
/// Immutable once decoded; clones share the pixel buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceImage {
    width: u32,
    height: u32,
    rgba8_premul: Arc<Vec<u8>>,
}

impl SourceImage {
    /// Wrap premultiplied RGBA8 pixels. Fails on a size mismatch or an unusable canvas size.
    pub fn from_premul_rgba8(width: u32, height: u32, rgba8_premul: Vec<u8>) -> MemeResult<Self> {
        let canvas = Canvas::new(width, height).map_err(|e| MemeError::decode(e.to_string()))?;
        if rgba8_premul.len() != canvas.rgba_len() {
            return Err(MemeError::decode(format!(
                "pixel buffer holds {} bytes, expected {} for {width}x{height}",
                rgba8_premul.len(),
                canvas.rgba_len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        })
    }

    /// Build from straight-alpha RGBA8 pixels.
    pub fn from_straight_rgba8(width: u32, height: u32, mut rgba8: Vec<u8>) -> MemeResult<Self> {
        premultiply_rgba8_in_place(&mut rgba8);
        Self::from_premul_rgba8(width, height, rgba8)
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Native resolution as a canvas.
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Row-major premultiplied RGBA8 bytes.
    pub fn rgba8_premul(&self) -> &[u8] {
        &self.rgba8_premul
    }
}

/// Decode any format the `image` crate recognizes.
#[tracing::instrument(skip(bytes), fields(len = bytes.len()))]
pub fn decode_image(bytes: &[u8]) -> MemeResult<SourceImage> {
    if bytes.is_empty() {
        return Err(MemeError::decode("image data is empty"));
    }
    let dyn_img = image::load_from_memory(bytes)
        .context("decode image from memory")
        .map_err(|e| MemeError::decode(format!("{e:#}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    SourceImage::from_straight_rgba8(width, height, rgba.into_raw())
}

/// Read and decode an image file.
pub fn decode_image_file(path: &Path) -> MemeResult<SourceImage> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("read image '{}'", path.display()))
        .map_err(|e| MemeError::decode(format!("{e:#}")))?;
    decode_image(&bytes)
}

/// Decode a `data:image/...;base64,` URI, the form browsers hand out for local uploads.
pub fn decode_data_uri(uri: &str) -> MemeResult<SourceImage> {
    let bytes = data_uri_bytes(uri)?;
    decode_image(&bytes)
}

/// Extract the payload of a base64 data URI.
pub(crate) fn data_uri_bytes(uri: &str) -> MemeResult<Vec<u8>> {
    let rest = uri
        .trim()
        .strip_prefix("data:")
        .ok_or_else(|| MemeError::decode("data URI must start with \"data:\""))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| MemeError::decode("data URI is missing the ',' separator"))?;
    if !meta.split(';').any(|p| p.eq_ignore_ascii_case("base64")) {
        return Err(MemeError::decode("only base64 data URIs are supported"));
    }
    base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| MemeError::decode(format!("data URI payload: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/source/image.rs"]
mod tests;
