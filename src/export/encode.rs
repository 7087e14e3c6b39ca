use std::io::Cursor;
use std::path::Path;
use std::str::FromStr;

use anyhow::Context as _;
use base64::Engine as _;

use crate::foundation::core::unpremultiply_rgba8;
use crate::foundation::error::{MemeError, MemeResult};
use crate::render::backend::CompositedOutput;

/// File name offered for downloads when the caller does not pick one.
pub const DEFAULT_EXPORT_FILE_NAME: &str = "meme.png";

const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Encoded image format for exports.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    /// Lossless PNG with alpha.
    #[default]
    Png,
    /// Baseline JPEG, alpha dropped.
    Jpeg {
        /// Encoder quality, 1..=100.
        quality: u8,
    },
}

impl ExportFormat {
    /// JPEG at the default quality.
    pub fn jpeg() -> Self {
        Self::Jpeg {
            quality: DEFAULT_JPEG_QUALITY,
        }
    }

    /// MIME type used in data URIs.
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg { .. } => "image/jpeg",
        }
    }

    /// Pick a format from a file extension; anything unrecognised is PNG.
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(|e| e.parse().ok())
            .unwrap_or_default()
    }
}

impl FromStr for ExportFormat {
    type Err = MemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::jpeg()),
            other => Err(MemeError::validation(format!(
                "unknown export format '{other}' (expected png or jpeg)"
            ))),
        }
    }
}

/// Straight-alpha RGBA8 copy of the composited pixels.
pub fn to_straight_rgba8(output: &CompositedOutput) -> MemeResult<Vec<u8>> {
    if output.data.len() != output.canvas().rgba_len() {
        return Err(MemeError::export(format!(
            "surface holds {} bytes, expected {} for {}x{}",
            output.data.len(),
            output.canvas().rgba_len(),
            output.width,
            output.height
        )));
    }
    Ok(unpremultiply_rgba8(&output.data))
}

/// Encode `output` as `format`.
#[tracing::instrument(skip(output), fields(w = output.width, h = output.height))]
pub fn encode(output: &CompositedOutput, format: ExportFormat) -> MemeResult<Vec<u8>> {
    let rgba = image::RgbaImage::from_raw(output.width, output.height, to_straight_rgba8(output)?)
        .ok_or_else(|| MemeError::export("surface buffer does not match its dimensions"))?;

    let mut buf = Vec::new();
    match format {
        ExportFormat::Png => {
            rgba.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
                .map_err(|e| MemeError::export(format!("png encode failed: {e}")))?;
        }
        ExportFormat::Jpeg { quality } => {
            let rgb = image::DynamicImage::ImageRgba8(rgba).to_rgb8();
            let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(
                &mut buf,
                quality.clamp(1, 100),
            );
            rgb.write_with_encoder(encoder)
                .map_err(|e| MemeError::export(format!("jpeg encode failed: {e}")))?;
        }
    }
    tracing::debug!(bytes = buf.len(), "encoded export");
    Ok(buf)
}

/// `data:<mime>;base64,...` URI of the encoded surface, as sent to the publish endpoint.
pub fn to_data_uri(output: &CompositedOutput, format: ExportFormat) -> MemeResult<String> {
    let bytes = encode(output, format)?;
    Ok(format!(
        "data:{};base64,{}",
        format.mime_type(),
        base64::engine::general_purpose::STANDARD.encode(bytes)
    ))
}

/// Encode and write to `path`, choosing the format from its extension.
pub fn save(output: &CompositedOutput, path: &Path) -> MemeResult<ExportFormat> {
    let format = ExportFormat::from_path(path);
    let bytes = encode(output, format)?;
    std::fs::write(path, bytes)
        .with_context(|| format!("write export '{}'", path.display()))
        .map_err(|e| MemeError::export(format!("{e:#}")))?;
    Ok(format)
}

#[cfg(test)]
#[path = "../../tests/unit/export/encode.rs"]
mod tests;
