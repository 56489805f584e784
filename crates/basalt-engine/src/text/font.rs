use std::fmt;
use std::path::{Path, PathBuf};

use glam::IVec2;

/// Error returned by [`FontFace::open`] / [`FontFace::from_bytes`].
#[derive(Debug)]
pub enum FontError {
    /// The file could not be read.
    Unreadable { path: PathBuf, source: std::io::Error },
    /// The bytes are not a font the rasterizer understands.
    UnsupportedFormat { reason: String },
    /// Anything else, e.g. an unusable pixel size.
    Unknown { reason: String },
}

impl fmt::Display for FontError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontError::Unreadable { path, source } => {
                write!(f, "font load error: cannot read {}: {source}", path.display())
            }
            FontError::UnsupportedFormat { reason } => write!(f, "font load error: unsupported format: {reason}"),
            FontError::Unknown { reason } => write!(f, "font load error: {reason}"),
        }
    }
}

impl std::error::Error for FontError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FontError::Unreadable { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Per-glyph rasterization failure. Logged and skipped during a load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GlyphError {
    /// The face has no glyph for this character.
    Missing(char),
    Failed { ch: char, reason: String },
}

impl fmt::Display for GlyphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GlyphError::Missing(ch) => write!(f, "no glyph for {ch:?}"),
            GlyphError::Failed { ch, reason } => write!(f, "failed to rasterize {ch:?}: {reason}"),
        }
    }
}

impl std::error::Error for GlyphError {}

/// One rendered glyph: a single-channel coverage bitmap and its metrics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterGlyph {
    pub width: u32,
    pub height: u32,
    /// Row-major, one byte per pixel, rows tightly packed.
    pub bitmap: Vec<u8>,
    /// Offset from the pen position to the bitmap's left edge (x) and from
    /// the baseline up to its top edge (y).
    pub bearing: IVec2,
    /// Horizontal pen advance in 1/64 pixel.
    pub advance: i32,
}

/// Produces glyph bitmaps at a fixed pixel size.
pub trait GlyphSource {
    fn rasterize(&mut self, ch: char) -> Result<RasterGlyph, GlyphError>;
}

/// A font face opened at one pixel size.
pub struct FontFace {
    font: fontdue::Font,
    pixel_size: f32,
}

impl FontFace {
    /// Reads and parses a TrueType/OpenType file.
    pub fn open(path: impl AsRef<Path>, pixel_size: u32) -> Result<Self, FontError> {
        let path = path.as_ref();
        check_pixel_size(pixel_size)?;
        let bytes = std::fs::read(path).map_err(|source| FontError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(bytes, pixel_size)
    }

    /// Parses an in-memory font.
    pub fn from_bytes(bytes: impl AsRef<[u8]>, pixel_size: u32) -> Result<Self, FontError> {
        check_pixel_size(pixel_size)?;
        let pixel_size = pixel_size as f32;
        let settings = fontdue::FontSettings {
            scale: pixel_size,
            ..fontdue::FontSettings::default()
        };
        let font = fontdue::Font::from_bytes(bytes.as_ref(), settings).map_err(|reason| {
            FontError::UnsupportedFormat {
                reason: reason.to_string(),
            }
        })?;
        Ok(Self { font, pixel_size })
    }

    pub fn pixel_size(&self) -> f32 {
        self.pixel_size
    }
}

fn check_pixel_size(pixel_size: u32) -> Result<(), FontError> {
    if pixel_size == 0 {
        return Err(FontError::Unknown {
            reason: "pixel size must be at least 1".into(),
        });
    }
    Ok(())
}

impl GlyphSource for FontFace {
    fn rasterize(&mut self, ch: char) -> Result<RasterGlyph, GlyphError> {
        let index = glyph_index(ch, self.font.lookup_glyph_index(ch))?;
        let (metrics, bitmap) = self.font.rasterize_indexed(index, self.pixel_size);
        raster_glyph(ch, &metrics, bitmap)
    }
}

/// Index 0 is the face's .notdef glyph, i.e. no glyph for `ch`.
fn glyph_index(ch: char, index: u16) -> Result<u16, GlyphError> {
    if index == 0 {
        return Err(GlyphError::Missing(ch));
    }
    Ok(index)
}

/// Converts fontdue metrics (y up from the baseline, advance in pixels) into
/// a top-left bearing and a 1/64 pixel advance.
fn raster_glyph(ch: char, metrics: &fontdue::Metrics, bitmap: Vec<u8>) -> Result<RasterGlyph, GlyphError> {
    let width = u32::try_from(metrics.width).map_err(|_| GlyphError::Failed {
        ch,
        reason: format!("bitmap width {} out of range", metrics.width),
    })?;
    let height = u32::try_from(metrics.height).map_err(|_| GlyphError::Failed {
        ch,
        reason: format!("bitmap height {} out of range", metrics.height),
    })?;

    Ok(RasterGlyph {
        width,
        height,
        bitmap,
        bearing: IVec2::new(metrics.xmin, metrics.ymin + height as i32),
        advance: (metrics.advance_width * 64.0).round() as i32,
    })
}
