//! Raster compositor: a text-drawing canvas abstraction, its CPU implementation and the
//! compose pipeline that draws a text layer over a source image.

/// Canvas trait, draw-call recorder and composite output.
pub mod backend;
/// Compose pipeline over any [`TextCanvas`].
pub mod compositor;
/// `vello_cpu` + `parley` canvas.
pub mod cpu;
/// Font faces per family.
pub mod fonts;

pub use backend::{CompositedOutput, DrawCall, RecordingCanvas, TextCanvas, TextStyle};
pub use compositor::{Compositor, compose, compose_encoded, compose_origin};
pub use cpu::CpuCanvas;
pub use fonts::{FontBook, ResolvedFace};
