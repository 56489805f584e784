//! Glyph-texture text rendering on top of [`RenderContext`](crate::gfx::RenderContext).
//!
//! [`FontFace`] rasterizes glyphs with fontdue; [`TextRenderer`] uploads one
//! texture per glyph and draws strings as textured quads.

mod font;
mod renderer;

pub use font::{FontError, FontFace, GlyphError, GlyphSource, RasterGlyph};
pub use renderer::{Glyph, TextError, TextRenderer};
