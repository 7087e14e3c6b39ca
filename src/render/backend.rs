use serde::Serialize;

use crate::foundation::core::{Canvas, Point, Rgb8};
use crate::foundation::error::{MemeError, MemeResult};
use crate::source::image::SourceImage;
use crate::text::params::{FontFamily, TextAlign, TextLayerParams};

/// A freshly rendered surface, sized to the source image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompositedOutput {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major premultiplied RGBA8 pixels.
    pub data: Vec<u8>,
}

impl CompositedOutput {
    /// Surface size.
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Premultiplied RGBA8 at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        self.data
            .get(idx..idx + 4)
            .and_then(|px| px.try_into().ok())
    }
}

/// Drawing state applied to the whole text layer.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    /// Font family.
    pub family: FontFamily,
    /// Font size in pixels.
    pub size_px: f32,
    /// Fill color.
    pub fill: Rgb8,
    /// Outline color.
    pub stroke: Rgb8,
    /// Outline width in pixels.
    pub stroke_width_px: f32,
    /// Alignment relative to each line's origin `x`.
    pub align: TextAlign,
}

impl TextStyle {
    /// Style snapshot for a parameter set.
    pub fn from_params(params: &TextLayerParams) -> Self {
        Self {
            family: params.font_family(),
            size_px: params.font_size_px() as f32,
            fill: params.fill_color(),
            stroke: params.stroke_color(),
            stroke_width_px: params.stroke_width_px() as f32,
            align: params.text_align(),
        }
    }
}

/// Canvas-2D-like drawing surface the compositor renders through.
///
/// Call order per render: `begin`, `draw_image`, `set_text_style`, then `stroke_text` /
/// `fill_text` per line, then `finish`.
pub trait TextCanvas {
    /// Allocate a transparent surface of the given size, dropping any previous content.
    fn begin(&mut self, canvas: Canvas) -> MemeResult<()>;
    /// Draw `image` at the origin, unscaled.
    fn draw_image(&mut self, image: &SourceImage) -> MemeResult<()>;
    /// Configure fill, stroke, font and alignment for subsequent text calls.
    fn set_text_style(&mut self, style: &TextStyle) -> MemeResult<()>;
    /// Outline `text` with its baseline at `origin.y`, aligned around `origin.x`.
    fn stroke_text(&mut self, text: &str, origin: Point) -> MemeResult<()>;
    /// Fill `text` with its baseline at `origin.y`, aligned around `origin.x`.
    fn fill_text(&mut self, text: &str, origin: Point) -> MemeResult<()>;
    /// Rasterize everything drawn since `begin`.
    fn finish(&mut self) -> MemeResult<CompositedOutput>;
}

/// One call recorded by [`RecordingCanvas`].
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum DrawCall {
    /// Surface allocation.
    Begin {
        /// Requested size.
        canvas: Canvas,
    },
    /// Source image blit.
    Image {
        /// Image width.
        width: u32,
        /// Image height.
        height: u32,
    },
    /// Style change.
    Style {
        /// The new style.
        style: TextStyle,
    },
    /// Outline pass for one line.
    StrokeText {
        /// Line content.
        text: String,
        /// Anchor `x` and baseline `y`.
        origin: Point,
    },
    /// Fill pass for one line.
    FillText {
        /// Line content.
        text: String,
        /// Anchor `x` and baseline `y`.
        origin: Point,
    },
}

impl DrawCall {
    /// Return `true` for calls that put pixels on the surface.
    pub fn is_draw(&self) -> bool {
        matches!(
            self,
            Self::Image { .. } | Self::StrokeText { .. } | Self::FillText { .. }
        )
    }
}

/// Canvas that records calls instead of rasterizing text.
///
/// `finish` returns the last drawn image's pixels, which makes it usable as a text-free
/// preview and as a test double.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    calls: Vec<DrawCall>,
    surface: Option<CompositedOutput>,
}

impl RecordingCanvas {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls recorded since the last `begin`.
    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// Number of calls that draw pixels.
    pub fn draw_call_count(&self) -> usize {
        self.calls.iter().filter(|c| c.is_draw()).count()
    }

    /// Forget recorded calls.
    pub fn clear(&mut self) {
        self.calls.clear();
        self.surface = None;
    }

    fn surface_mut(&mut self) -> MemeResult<&mut CompositedOutput> {
        self.surface
            .as_mut()
            .ok_or_else(|| MemeError::validation("draw call before begin"))
    }
}

impl TextCanvas for RecordingCanvas {
    fn begin(&mut self, canvas: Canvas) -> MemeResult<()> {
        self.calls.clear();
        self.calls.push(DrawCall::Begin { canvas });
        self.surface = Some(CompositedOutput {
            width: canvas.width,
            height: canvas.height,
            data: vec![0; canvas.rgba_len()],
        });
        Ok(())
    }

    fn draw_image(&mut self, image: &SourceImage) -> MemeResult<()> {
        let surface = self.surface_mut()?;
        if surface.canvas() == image.canvas() {
            surface.data.copy_from_slice(image.rgba8_premul());
        }
        self.calls.push(DrawCall::Image {
            width: image.width(),
            height: image.height(),
        });
        Ok(())
    }

    fn set_text_style(&mut self, style: &TextStyle) -> MemeResult<()> {
        self.calls.push(DrawCall::Style {
            style: style.clone(),
        });
        Ok(())
    }

    fn stroke_text(&mut self, text: &str, origin: Point) -> MemeResult<()> {
        self.surface_mut()?;
        self.calls.push(DrawCall::StrokeText {
            text: text.to_owned(),
            origin,
        });
        Ok(())
    }

    fn fill_text(&mut self, text: &str, origin: Point) -> MemeResult<()> {
        self.surface_mut()?;
        self.calls.push(DrawCall::FillText {
            text: text.to_owned(),
            origin,
        });
        Ok(())
    }

    fn finish(&mut self) -> MemeResult<CompositedOutput> {
        self.surface
            .take()
            .ok_or_else(|| MemeError::validation("finish called before begin"))
    }
}
