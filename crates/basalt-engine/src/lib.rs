//! Basalt engine crate.
//!
//! A handle-based graphics abstraction over OpenGL, a glyph-atlas text
//! renderer built on it, and the window/input pieces that feed both.

pub mod gfx;
pub mod input;
pub mod logging;
pub mod text;
pub mod window;
