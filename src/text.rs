//! Text layer model: the typography parameters the compositor draws with.

/// Clamped typography parameters.
pub mod params;

pub use params::{FontFamily, TextAlign, TextLayerParams};
