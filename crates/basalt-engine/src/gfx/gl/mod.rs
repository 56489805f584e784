//! OpenGL backend.
//!
//! [`GlContext`] implements [`RenderContext`](crate::gfx::RenderContext) over
//! any [`GlDriver`]; [`GlowDriver`] is the driver used outside of tests.

mod backend;
pub mod convert;
mod driver;
mod glow_driver;
mod init;

#[cfg(test)]
pub(crate) mod recording;

pub use backend::GlContext;
pub use driver::{GlDriver, NativeName};
pub use glow_driver::GlowDriver;
pub use init::{GlInit, GlLimits};
