//! Handle-based graphics abstraction.
//!
//! Client code talks to [`RenderContext`] with opaque [`Handle`]s and the
//! portable values from [`caps`]; a backend (currently [`gl`]) owns every
//! native object and the table that maps handles onto them.

pub mod caps;
mod context;
mod error;
pub mod gl;
mod handle;

pub use context::RenderContext;
pub use error::{GfxError, Result};
pub use handle::{Handle, HandleError, HandleTable, ResourceKind};
