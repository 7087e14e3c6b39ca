//! Layout and anchoring: percentage position + lines -> absolute baselines.

/// Zone selection and baseline placement.
pub mod anchor;

pub use anchor::{AnchorZone, PositionedLine, TextBlockLayout, layout_text_block, split_lines};
