use serde::Serialize;

use crate::foundation::core::{Canvas, Point};
use crate::text::params::{TextAlign, TextLayerParams};

/// Below this vertical percentage the anchor marks the top of the text block.
pub const TOP_ZONE_END: f64 = 20.0;
/// Above this vertical percentage the anchor marks the bottom of the text block.
pub const BOTTOM_ZONE_START: f64 = 80.0;

/// How the nominal anchor `y` relates to the text block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorZone {
    /// `vertical_pos < 20`: block hangs below the anchor.
    Top,
    /// `20 <= vertical_pos <= 80`: block is centered on the anchor.
    Middle,
    /// `vertical_pos > 80`: block sits above the anchor.
    Bottom,
}

impl AnchorZone {
    /// Classify a vertical percentage.
    pub fn for_vertical_pos(vertical_pos: f64) -> Self {
        if vertical_pos < TOP_ZONE_END {
            Self::Top
        } else if vertical_pos > BOTTOM_ZONE_START {
            Self::Bottom
        } else {
            Self::Middle
        }
    }

    /// Baseline of the first line given the anchor `y`, the block height and the line height.
    pub fn first_baseline(self, anchor_y: f64, block_height: f64, line_height: f64) -> f64 {
        match self {
            Self::Top => anchor_y + block_height / 2.0,
            Self::Bottom => anchor_y - block_height / 2.0,
            Self::Middle => anchor_y - block_height / 2.0 + line_height / 2.0,
        }
    }
}

/// One line of text and the point its baseline is drawn at.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PositionedLine {
    /// Line content without the break character.
    pub text: String,
    /// Anchor `x` (alignment is applied by the canvas) and baseline `y`.
    pub origin: Point,
}

/// Absolute draw coordinates for every line of a text layer.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBlockLayout {
    /// Canvas the layout was computed for.
    pub canvas: Canvas,
    /// Distance between consecutive baselines.
    pub line_height: f64,
    /// `line_count * line_height`.
    pub block_height: f64,
    /// Nominal anchor derived from the percentage position.
    pub anchor: Point,
    /// Zone used to interpret `anchor.y`.
    pub zone: AnchorZone,
    /// Shared alignment for every line.
    pub align: TextAlign,
    /// Lines in draw order; never empty.
    pub lines: Vec<PositionedLine>,
}

impl TextBlockLayout {
    /// Number of lines; always at least one.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Baseline of the first line.
    pub fn first_baseline(&self) -> f64 {
        self.lines.first().map_or(self.anchor.y, |l| l.origin.y)
    }
}

/// Split text on explicit line breaks, keeping empty lines.
///
/// A `\r` directly before a `\n` is dropped. The result always holds at least one element.
pub fn split_lines(content: &str) -> Vec<&str> {
    content
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect()
}

/// Compute per-line draw origins for `params` on a surface of size `canvas`.
///
/// Lines are not measured: every line shares the anchor `x` and the alignment, so long lines
/// can run past the frame edge.
pub fn layout_text_block(canvas: Canvas, params: &TextLayerParams) -> TextBlockLayout {
    let lines = split_lines(params.content());
    let line_height = params.line_height_px();
    let block_height = lines.len() as f64 * line_height;

    let anchor = Point::new(
        params.horizontal_pos() / 100.0 * f64::from(canvas.width),
        params.vertical_pos() / 100.0 * f64::from(canvas.height),
    );
    let zone = AnchorZone::for_vertical_pos(params.vertical_pos());
    let first = zone.first_baseline(anchor.y, block_height, line_height);

    let lines = lines
        .into_iter()
        .enumerate()
        .map(|(i, text)| PositionedLine {
            text: text.to_owned(),
            origin: Point::new(anchor.x, first + i as f64 * line_height),
        })
        .collect();

    TextBlockLayout {
        canvas,
        line_height,
        block_height,
        anchor,
        zone,
        align: params.text_align(),
        lines,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/anchor.rs"]
mod tests;
