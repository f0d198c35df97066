//! Canvas rendering module
//!
//! Uses the 2D canvas context; all drawing is immediate mode.

pub mod canvas;

pub use canvas::CanvasRenderer;
