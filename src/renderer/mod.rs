//! Canvas2D rendering module
//!
//! Targets are projected spheres drawn as shaded discs, back to front.

pub mod canvas;

pub use canvas::CanvasRenderer;
