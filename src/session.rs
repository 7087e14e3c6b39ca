//! Editing session: owns the current source, parameters and latest composite, re-rendering
//! on every transition.

/// [`EditorSession`] state machine.
pub mod editor;

pub use editor::{EditorSession, RenderObserver};
