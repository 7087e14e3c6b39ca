use crate::foundation::error::MemeResult;
use crate::layout::anchor::{TextBlockLayout, layout_text_block};
use crate::render::backend::{CompositedOutput, TextCanvas, TextStyle};
use crate::render::cpu::CpuCanvas;
use crate::render::fonts::FontBook;
use crate::source::image::{SourceImage, decode_image};
use crate::source::loader::{ImageFetcher, SourceOrigin};
use crate::text::params::TextLayerParams;

/// Draw `params` over `source` through `canvas`.
///
/// Always starts from the untouched source on a fresh surface, so identical inputs produce
/// identical output no matter how many renders came before.
#[tracing::instrument(skip_all, fields(w = source.width(), h = source.height()))]
pub fn compose<C: TextCanvas + ?Sized>(
    canvas: &mut C,
    source: &SourceImage,
    params: &TextLayerParams,
) -> MemeResult<CompositedOutput> {
    let layout = layout_text_block(source.canvas(), params);
    tracing::debug!(
        lines = layout.line_count(),
        zone = ?layout.zone,
        first_baseline = layout.first_baseline(),
        "laid out text block"
    );
    draw_layout(canvas, source, params, &layout)
}

/// Decode `bytes` and compose. A decode failure returns before any canvas call.
pub fn compose_encoded<C: TextCanvas + ?Sized>(
    canvas: &mut C,
    bytes: &[u8],
    params: &TextLayerParams,
) -> MemeResult<CompositedOutput> {
    let source = decode_image(bytes)?;
    compose(canvas, &source, params)
}

/// Load `origin` and compose. A load or decode failure returns before any canvas call.
pub fn compose_origin<C: TextCanvas + ?Sized>(
    canvas: &mut C,
    origin: &SourceOrigin,
    fetcher: Option<&dyn ImageFetcher>,
    params: &TextLayerParams,
) -> MemeResult<CompositedOutput> {
    let source = origin.decode(fetcher)?;
    compose(canvas, &source, params)
}

fn draw_layout<C: TextCanvas + ?Sized>(
    canvas: &mut C,
    source: &SourceImage,
    params: &TextLayerParams,
    layout: &TextBlockLayout,
) -> MemeResult<CompositedOutput> {
    canvas.begin(source.canvas())?;
    canvas.draw_image(source)?;
    canvas.set_text_style(&TextStyle::from_params(params))?;
    for line in &layout.lines {
        // Outline first so the fill sits on top of it.
        canvas.stroke_text(&line.text, line.origin)?;
        canvas.fill_text(&line.text, line.origin)?;
    }
    canvas.finish()
}

/// Owns a canvas and renders text layers with it.
pub struct Compositor<C: TextCanvas = CpuCanvas> {
    canvas: C,
}

impl Compositor<CpuCanvas> {
    /// CPU compositor drawing with faces from `fonts`.
    pub fn cpu(fonts: FontBook) -> Self {
        Self::new(CpuCanvas::new(fonts))
    }
}

impl<C: TextCanvas> Compositor<C> {
    /// Wrap an existing canvas.
    pub fn new(canvas: C) -> Self {
        Self { canvas }
    }

    /// Render `params` over `source`.
    pub fn render(
        &mut self,
        source: &SourceImage,
        params: &TextLayerParams,
    ) -> MemeResult<CompositedOutput> {
        compose(&mut self.canvas, source, params)
    }

    /// Borrow the canvas.
    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    /// Mutably borrow the canvas.
    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    /// Return the canvas.
    pub fn into_canvas(self) -> C {
        self.canvas
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
