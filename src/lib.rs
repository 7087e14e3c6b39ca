//! memeframe composites caption text over images the way meme editors do.
//!
//! The core is a deterministic compositor: a [`SourceImage`] plus [`TextLayerParams`] render
//! to a [`CompositedOutput`] at the source's native resolution, with every line stroked then
//! filled at a baseline derived from percentage positions. Around it sit:
//!
//! - source loading with stale-decode tickets ([`SourceLoader`])
//! - an [`EditorSession`] that re-renders on every change
//! - PNG/JPEG export and data URIs ([`export`])
//! - the remote meme service contract ([`remote`]); the HTTP client needs the `remote` feature
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Application configuration.
pub mod config;
/// Encoding composites for download or publishing.
pub mod export;
/// Percentage anchoring and per-line baselines.
pub mod layout;
/// Remote generation, publishing and community feed.
pub mod remote;
/// Canvas abstraction, CPU rasterizer and compositor.
pub mod render;
/// Stateful editing session.
pub mod session;
/// Source image decoding and load ticketing.
pub mod source;
/// Text layer parameters.
pub mod text;

pub use crate::foundation::core::{Canvas, MAX_SURFACE_DIM, Point, Rgb8};
pub use crate::foundation::error::{MemeError, MemeResult};

pub use crate::config::{AppConfig, FontConfig};
pub use crate::export::encode::{ExportFormat, encode, save, to_data_uri};
pub use crate::layout::anchor::{AnchorZone, TextBlockLayout, layout_text_block};
pub use crate::remote::backend::MemeBackend;
pub use crate::remote::payload::PublishRequest;
pub use crate::render::backend::{CompositedOutput, TextCanvas};
pub use crate::render::compositor::{Compositor, compose};
pub use crate::render::cpu::CpuCanvas;
pub use crate::render::fonts::FontBook;
pub use crate::session::editor::EditorSession;
pub use crate::source::image::{SourceImage, decode_image};
pub use crate::source::loader::{DecodeTicket, SourceLoader, SourceOrigin};
pub use crate::text::params::{FontFamily, TextAlign, TextLayerParams};
