use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::foundation::core::Rgb8;
use crate::foundation::error::MemeError;

/// Smallest font size the editor accepts, in pixels.
pub const FONT_SIZE_MIN: u32 = 10;
/// Largest font size the editor accepts, in pixels.
pub const FONT_SIZE_MAX: u32 = 100;
/// Thinnest outline, in pixels.
pub const STROKE_WIDTH_MIN: u32 = 1;
/// Thickest outline, in pixels.
pub const STROKE_WIDTH_MAX: u32 = 10;
/// Upper bound for the percentage position sliders (lower bound is 0).
pub const POS_MAX: f64 = 100.0;

/// Font families offered by the editor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FontFamily {
    /// Classic meme face.
    #[default]
    Impact,
    /// Arial.
    Arial,
    /// Comic Sans MS.
    ComicSansMs,
    /// Georgia.
    Georgia,
    /// Courier New.
    CourierNew,
    /// Verdana.
    Verdana,
}

impl FontFamily {
    /// Every supported family, in menu order.
    pub const ALL: [Self; 6] = [
        Self::Impact,
        Self::Arial,
        Self::ComicSansMs,
        Self::Georgia,
        Self::CourierNew,
        Self::Verdana,
    ];

    /// CSS-style family name.
    pub fn css_name(self) -> &'static str {
        match self {
            Self::Impact => "Impact",
            Self::Arial => "Arial",
            Self::ComicSansMs => "Comic Sans MS",
            Self::Georgia => "Georgia",
            Self::CourierNew => "Courier New",
            Self::Verdana => "Verdana",
        }
    }

    /// Conventional font file names for this family, lowercase.
    pub(crate) fn file_stems(self) -> &'static [&'static str] {
        match self {
            Self::Impact => &["impact"],
            Self::Arial => &["arial", "arialmt"],
            Self::ComicSansMs => &["comic", "comicsans", "comic_sans_ms", "comicsansms"],
            Self::Georgia => &["georgia"],
            Self::CourierNew => &["cour", "couriernew", "courier_new"],
            Self::Verdana => &["verdana"],
        }
    }
}

impl fmt::Display for FontFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.css_name())
    }
}

impl FromStr for FontFamily {
    type Err = MemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();
        match key.as_str() {
            "impact" => Ok(Self::Impact),
            "arial" => Ok(Self::Arial),
            "comicsansms" | "comicsans" | "comic" => Ok(Self::ComicSansMs),
            "georgia" => Ok(Self::Georgia),
            "couriernew" | "courier" => Ok(Self::CourierNew),
            "verdana" => Ok(Self::Verdana),
            _ => Err(MemeError::validation(format!("unknown font family \"{s}\""))),
        }
    }
}

impl Serialize for FontFamily {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.css_name())
    }
}

impl<'de> Deserialize<'de> for FontFamily {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Horizontal alignment of each line relative to the anchor `x`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// Line starts at `x`.
    Left,
    /// Line is centered on `x`.
    #[default]
    Center,
    /// Line ends at `x`.
    Right,
}

impl FromStr for TextAlign {
    type Err = MemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" | "start" => Ok(Self::Left),
            "center" | "centre" | "middle" => Ok(Self::Center),
            "right" | "end" => Ok(Self::Right),
            _ => Err(MemeError::validation(format!("unknown text alignment \"{s}\""))),
        }
    }
}

/// Typography parameters for the text layer.
///
/// Values are immutable from the outside: every `with_*` call returns a new, clamped value, so a
/// render holding a previous snapshot never observes a later edit.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextLayerParams {
    content: String,
    font_size_px: u32,
    font_family: FontFamily,
    fill_color: Rgb8,
    stroke_color: Rgb8,
    stroke_width_px: u32,
    horizontal_pos: f64,
    vertical_pos: f64,
    text_align: TextAlign,
}

impl Default for TextLayerParams {
    fn default() -> Self {
        Self {
            content: "Your meme text".to_owned(),
            font_size_px: 32,
            font_family: FontFamily::Impact,
            fill_color: Rgb8::WHITE,
            stroke_color: Rgb8::BLACK,
            stroke_width_px: 4,
            horizontal_pos: 50.0,
            vertical_pos: 8.0,
            text_align: TextAlign::Center,
        }
    }
}

fn clamp_pos(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, POS_MAX) }
}

impl TextLayerParams {
    /// Default parameters with the given text content.
    pub fn with_text(content: impl Into<String>) -> Self {
        Self::default().with_content(content)
    }

    /// Text content; may contain `\n` line breaks.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Font size in pixels, within `[10, 100]`.
    pub fn font_size_px(&self) -> u32 {
        self.font_size_px
    }

    /// Font family.
    pub fn font_family(&self) -> FontFamily {
        self.font_family
    }

    /// Fill color.
    pub fn fill_color(&self) -> Rgb8 {
        self.fill_color
    }

    /// Outline color.
    pub fn stroke_color(&self) -> Rgb8 {
        self.stroke_color
    }

    /// Outline width in pixels, within `[1, 10]`.
    pub fn stroke_width_px(&self) -> u32 {
        self.stroke_width_px
    }

    /// Horizontal anchor as a percentage of canvas width, within `[0, 100]`.
    pub fn horizontal_pos(&self) -> f64 {
        self.horizontal_pos
    }

    /// Vertical anchor as a percentage of canvas height, within `[0, 100]`.
    pub fn vertical_pos(&self) -> f64 {
        self.vertical_pos
    }

    /// Line alignment.
    pub fn text_align(&self) -> TextAlign {
        self.text_align
    }

    /// Replace the text content.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Set the font size, clamped to `[10, 100]`.
    pub fn with_font_size_px(mut self, size: u32) -> Self {
        self.font_size_px = size.clamp(FONT_SIZE_MIN, FONT_SIZE_MAX);
        self
    }

    /// Set the font family.
    pub fn with_font_family(mut self, family: FontFamily) -> Self {
        self.font_family = family;
        self
    }

    /// Set the fill color.
    pub fn with_fill_color(mut self, color: Rgb8) -> Self {
        self.fill_color = color;
        self
    }

    /// Set the outline color.
    pub fn with_stroke_color(mut self, color: Rgb8) -> Self {
        self.stroke_color = color;
        self
    }

    /// Set the outline width, clamped to `[1, 10]`.
    pub fn with_stroke_width_px(mut self, width: u32) -> Self {
        self.stroke_width_px = width.clamp(STROKE_WIDTH_MIN, STROKE_WIDTH_MAX);
        self
    }

    /// Set the horizontal position, clamped to `[0, 100]`. NaN maps to 0.
    pub fn with_horizontal_pos(mut self, pos: f64) -> Self {
        self.horizontal_pos = clamp_pos(pos);
        self
    }

    /// Set the vertical position, clamped to `[0, 100]`. NaN maps to 0.
    pub fn with_vertical_pos(mut self, pos: f64) -> Self {
        self.vertical_pos = clamp_pos(pos);
        self
    }

    /// Set the line alignment.
    pub fn with_text_align(mut self, align: TextAlign) -> Self {
        self.text_align = align;
        self
    }

    /// Line height used by layout: `1.5 × font size`.
    pub fn line_height_px(&self) -> f64 {
        f64::from(self.font_size_px) * 1.5
    }
}

/// Wire form; every numeric field is clamped on the way in.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct TextLayerParamsRepr {
    content: String,
    font_size_px: i64,
    font_family: FontFamily,
    fill_color: Rgb8,
    stroke_color: Rgb8,
    stroke_width_px: i64,
    horizontal_pos: f64,
    vertical_pos: f64,
    text_align: TextAlign,
}

impl Default for TextLayerParamsRepr {
    fn default() -> Self {
        let d = TextLayerParams::default();
        Self {
            content: d.content,
            font_size_px: i64::from(d.font_size_px),
            font_family: d.font_family,
            fill_color: d.fill_color,
            stroke_color: d.stroke_color,
            stroke_width_px: i64::from(d.stroke_width_px),
            horizontal_pos: d.horizontal_pos,
            vertical_pos: d.vertical_pos,
            text_align: d.text_align,
        }
    }
}

fn clamp_i64_to_u32(v: i64, lo: u32, hi: u32) -> u32 {
    v.clamp(i64::from(lo), i64::from(hi)) as u32
}

impl<'de> Deserialize<'de> for TextLayerParams {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let r = TextLayerParamsRepr::deserialize(deserializer)?;
        Ok(Self {
            content: r.content,
            font_size_px: clamp_i64_to_u32(r.font_size_px, FONT_SIZE_MIN, FONT_SIZE_MAX),
            font_family: r.font_family,
            fill_color: r.fill_color,
            stroke_color: r.stroke_color,
            stroke_width_px: clamp_i64_to_u32(r.stroke_width_px, STROKE_WIDTH_MIN, STROKE_WIDTH_MAX),
            horizontal_pos: clamp_pos(r.horizontal_pos),
            vertical_pos: clamp_pos(r.vertical_pos),
            text_align: r.text_align,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/params.rs"]
mod tests;
