use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

use crate::foundation::core::{Canvas, Point, Rgb8};
use crate::foundation::error::{MemeError, MemeResult};
use crate::render::backend::{CompositedOutput, TextCanvas, TextStyle};
use crate::render::fonts::FontBook;
use crate::source::image::SourceImage;
use crate::text::params::{FontFamily, TextAlign};

/// Canvas miter limit default.
const MITER_LIMIT: f64 = 10.0;

#[derive(Clone)]
struct LoadedFont {
    family_name: String,
    font: vello_cpu::peniko::FontData,
}

struct Surface {
    width: u16,
    height: u16,
    ctx: vello_cpu::RenderContext,
}

struct ActiveStyle {
    style: TextStyle,
    font: LoadedFont,
}

#[derive(Clone, Debug, PartialEq)]
struct ShapeKey {
    text: String,
    family: FontFamily,
    size_bits: u32,
}

/// Glyphs of one line, relative to a left-aligned origin on the baseline.
struct ShapedLine {
    advance: f32,
    glyphs: Vec<vello_cpu::Glyph>,
}

/// CPU text canvas backed by `vello_cpu` for rasterization and `parley` for shaping.
pub struct CpuCanvas {
    fonts: FontBook,
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    loaded: HashMap<FontFamily, LoadedFont>,
    surface: Option<Surface>,
    style: Option<ActiveStyle>,
    last_shaped: Option<(ShapeKey, Arc<ShapedLine>)>,
}

impl CpuCanvas {
    /// Create a canvas that draws text with faces from `fonts`.
    pub fn new(fonts: FontBook) -> Self {
        Self {
            fonts,
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            loaded: HashMap::new(),
            surface: None,
            style: None,
            last_shaped: None,
        }
    }

    /// Fonts this canvas resolves families against.
    pub fn fonts(&self) -> &FontBook {
        &self.fonts
    }

    /// Shaped advance width of `text` in the current style, in pixels.
    pub fn measure_text(&mut self, text: &str) -> MemeResult<f32> {
        Ok(self.shape(text)?.advance)
    }

    /// Name parley registered for `family`'s face.
    pub fn family_name(&mut self, family: FontFamily) -> MemeResult<String> {
        Ok(self.load_font(family)?.family_name)
    }

    fn load_font(&mut self, family: FontFamily) -> MemeResult<LoadedFont> {
        if let Some(f) = self.loaded.get(&family) {
            return Ok(f.clone());
        }

        let face = self.fonts.resolve(family)?;
        if face.is_fallback {
            tracing::warn!(family = %family, "no face registered for family, using fallback");
        }

        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(face.bytes.to_vec()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            MemeError::validation(format!("no font families registered from {family} bytes"))
        })?;
        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| MemeError::validation("registered font family has no name"))?
            .to_string();

        let font = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(face.bytes.to_vec()),
            0,
        );
        let loaded = LoadedFont { family_name, font };
        self.loaded.insert(family, loaded.clone());
        Ok(loaded)
    }

    fn shape(&mut self, text: &str) -> MemeResult<Arc<ShapedLine>> {
        let collapsed = collapse_whitespace(text);
        let text = collapsed.as_ref();
        let active = self
            .style
            .as_ref()
            .ok_or_else(|| MemeError::validation("text drawn before set_text_style"))?;
        let key = ShapeKey {
            text: text.to_owned(),
            family: active.style.family,
            size_bits: active.style.size_px.to_bits(),
        };
        if let Some((k, shaped)) = &self.last_shaped
            && *k == key
        {
            return Ok(Arc::clone(shaped));
        }

        let family_name = active.font.family_name.clone();
        let size_px = active.style.size_px;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);
        layout.align(
            None,
            parley::Alignment::Start,
            parley::AlignmentOptions::default(),
        );

        // Glyph y is relative to the first line's baseline so callers can place it directly.
        let mut glyphs = Vec::new();
        let mut first_baseline = None::<f32>;
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let baseline = *first_baseline.get_or_insert(run.baseline());
                let mut x = run.offset();
                let y = run.baseline() - baseline;
                for g in run.glyphs() {
                    glyphs.push(vello_cpu::Glyph {
                        id: g.id,
                        x: x + g.x,
                        y: y - g.y,
                    });
                    x += g.advance;
                }
            }
        }

        let shaped = Arc::new(ShapedLine {
            // Trailing spaces count towards alignment.
            advance: layout.full_width(),
            glyphs,
        });
        self.last_shaped = Some((key, Arc::clone(&shaped)));
        Ok(shaped)
    }

    fn draw_text(&mut self, text: &str, origin: Point, outline: bool) -> MemeResult<()> {
        if self.surface.is_none() {
            return Err(MemeError::validation("text drawn before begin"));
        }
        if text.is_empty() {
            return Ok(());
        }

        let shaped = self.shape(text)?;
        let (style, font) = match &self.style {
            Some(a) => (a.style.clone(), a.font.font.clone()),
            None => return Err(MemeError::validation("text drawn before set_text_style")),
        };
        let Some(surface) = self.surface.as_mut() else {
            return Err(MemeError::validation("text drawn before begin"));
        };

        let start_x = origin.x as f32
            - match style.align {
                TextAlign::Left => 0.0,
                TextAlign::Center => shaped.advance / 2.0,
                TextAlign::Right => shaped.advance,
            };
        let baseline = origin.y as f32;
        let glyphs = shaped.glyphs.iter().map(|g| vello_cpu::Glyph {
            id: g.id,
            x: start_x + g.x,
            y: baseline + g.y,
        });

        let ctx = &mut surface.ctx;
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        if outline {
            ctx.set_paint(color_to_cpu(style.stroke));
            ctx.glyph_run(&font)
                .font_size(style.size_px)
                .stroke_glyphs(glyphs);
        } else {
            ctx.set_paint(color_to_cpu(style.fill));
            ctx.glyph_run(&font)
                .font_size(style.size_px)
                .fill_glyphs(glyphs);
        }
        Ok(())
    }
}

impl TextCanvas for CpuCanvas {
    fn begin(&mut self, canvas: Canvas) -> MemeResult<()> {
        let width: u16 = canvas
            .width
            .try_into()
            .map_err(|_| MemeError::validation("surface width exceeds u16"))?;
        let height: u16 = canvas
            .height
            .try_into()
            .map_err(|_| MemeError::validation("surface height exceeds u16"))?;
        if width == 0 || height == 0 {
            return Err(MemeError::validation("surface dimensions must be > 0"));
        }
        self.surface = Some(Surface {
            width,
            height,
            ctx: vello_cpu::RenderContext::new(width, height),
        });
        Ok(())
    }

    fn draw_image(&mut self, image: &SourceImage) -> MemeResult<()> {
        let surface = self
            .surface
            .as_mut()
            .ok_or_else(|| MemeError::validation("image drawn before begin"))?;
        let pixmap = image_premul_bytes_to_pixmap(image)?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };

        let ctx = &mut surface.ctx;
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(paint);
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(image.width()),
            f64::from(image.height()),
        ));
        Ok(())
    }

    fn set_text_style(&mut self, style: &TextStyle) -> MemeResult<()> {
        let font = self.load_font(style.family)?;
        let surface = self
            .surface
            .as_mut()
            .ok_or_else(|| MemeError::validation("style set before begin"))?;
        surface.ctx.set_stroke(
            vello_cpu::kurbo::Stroke::new(f64::from(style.stroke_width_px))
                .with_join(vello_cpu::kurbo::Join::Miter)
                .with_miter_limit(MITER_LIMIT),
        );
        self.style = Some(ActiveStyle {
            style: style.clone(),
            font,
        });
        Ok(())
    }

    fn stroke_text(&mut self, text: &str, origin: Point) -> MemeResult<()> {
        self.draw_text(text, origin, true)
    }

    fn fill_text(&mut self, text: &str, origin: Point) -> MemeResult<()> {
        self.draw_text(text, origin, false)
    }

    fn finish(&mut self) -> MemeResult<CompositedOutput> {
        let mut surface = self
            .surface
            .take()
            .ok_or_else(|| MemeError::validation("finish called before begin"))?;
        self.style = None;

        surface.ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(surface.width, surface.height);
        surface.ctx.render_to_pixmap(&mut pixmap);

        Ok(CompositedOutput {
            width: u32::from(surface.width),
            height: u32::from(surface.height),
            data: pixmap.data_as_u8_slice().to_vec(),
        })
    }
}

/// Replace whitespace that the shaper would treat as a break or draw as a glyph with a plain
/// space, so one call always draws exactly one line.
fn collapse_whitespace(text: &str) -> Cow<'_, str> {
    let is_special = |c: char| {
        matches!(
            c,
            '\t' | '\r' | '\n' | '\u{0B}' | '\u{0C}' | '\u{85}' | '\u{2028}' | '\u{2029}'
        )
    };
    if !text.contains(is_special) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(
        text.chars()
            .map(|c| if is_special(c) { ' ' } else { c })
            .collect(),
    )
}

fn color_to_cpu(c: Rgb8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, 255)
}

fn image_premul_bytes_to_pixmap(image: &SourceImage) -> MemeResult<vello_cpu::Pixmap> {
    let w: u16 = image
        .width()
        .try_into()
        .map_err(|_| MemeError::validation("image width exceeds u16"))?;
    let h: u16 = image
        .height()
        .try_into()
        .map_err(|_| MemeError::validation("image height exceeds u16"))?;

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(usize::from(w) * usize::from(h));
    for px in image.rgba8_premul().chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }
    if pixels.len() != usize::from(w) * usize::from(h) {
        return Err(MemeError::decode("source pixel buffer length mismatch"));
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
