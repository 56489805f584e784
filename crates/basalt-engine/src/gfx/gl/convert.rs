//! Portable capability values ↔ OpenGL enums.
//!
//! Every mapping is total in the portable → native direction. The reverse
//! direction rejects native values outside the portable set.

use crate::gfx::caps::{
    AttributeType, ClearMask, DrawMode, Filter, FramebufferAttachment, FramebufferTarget, PixelFormat,
    PixelType, ShaderStage, WrapMode,
};

/// Lossless translation between a capability enum and a GL enum value.
pub trait GlEnum: Sized + Copy {
    fn to_gl(self) -> u32;

    fn from_gl(raw: u32) -> Option<Self>;
}

macro_rules! gl_enum {
    ($ty:ty { $($variant:ident => $gl:expr),+ $(,)? }) => {
        impl GlEnum for $ty {
            fn to_gl(self) -> u32 {
                match self {
                    $(<$ty>::$variant => $gl,)+
                }
            }

            fn from_gl(raw: u32) -> Option<Self> {
                $(if raw == $gl { return Some(<$ty>::$variant); })+
                None
            }
        }
    };
}

gl_enum!(ShaderStage {
    Vertex => glow::VERTEX_SHADER,
    Fragment => glow::FRAGMENT_SHADER,
});

gl_enum!(AttributeType {
    Int => glow::INT,
    Float => glow::FLOAT,
});

gl_enum!(DrawMode {
    Points => glow::POINTS,
    Lines => glow::LINES,
    LineStrip => glow::LINE_STRIP,
    LineLoop => glow::LINE_LOOP,
    Triangles => glow::TRIANGLES,
    TriangleStrip => glow::TRIANGLE_STRIP,
    TriangleFan => glow::TRIANGLE_FAN,
});

// Data layout of uploaded pixels. Storage layout is `internal_format_gl`.
gl_enum!(PixelFormat {
    R => glow::RED,
    Rg => glow::RG,
    Rgb => glow::RGB,
    Bgr => glow::BGR,
    Rgba => glow::RGBA,
    Bgra => glow::BGRA,
    DepthComponent => glow::DEPTH_COMPONENT,
});

gl_enum!(PixelType {
    UByte => glow::UNSIGNED_BYTE,
    Byte => glow::BYTE,
    UShort => glow::UNSIGNED_SHORT,
    Short => glow::SHORT,
    UInt => glow::UNSIGNED_INT,
    Int => glow::INT,
    Float => glow::FLOAT,
});

gl_enum!(Filter {
    Nearest => glow::NEAREST,
    Linear => glow::LINEAR,
    NearestMipmapNearest => glow::NEAREST_MIPMAP_NEAREST,
    LinearMipmapNearest => glow::LINEAR_MIPMAP_NEAREST,
    NearestMipmapLinear => glow::NEAREST_MIPMAP_LINEAR,
    LinearMipmapLinear => glow::LINEAR_MIPMAP_LINEAR,
});

gl_enum!(WrapMode {
    ClampToEdge => glow::CLAMP_TO_EDGE,
    MirroredRepeat => glow::MIRRORED_REPEAT,
    Repeat => glow::REPEAT,
});

gl_enum!(FramebufferAttachment {
    Color0 => glow::COLOR_ATTACHMENT0,
    Color1 => glow::COLOR_ATTACHMENT1,
    Color2 => glow::COLOR_ATTACHMENT2,
    Color3 => glow::COLOR_ATTACHMENT3,
    Color4 => glow::COLOR_ATTACHMENT4,
    Color5 => glow::COLOR_ATTACHMENT5,
    Color6 => glow::COLOR_ATTACHMENT6,
    Color7 => glow::COLOR_ATTACHMENT7,
    Depth => glow::DEPTH_ATTACHMENT,
    Stencil => glow::STENCIL_ATTACHMENT,
    DepthStencil => glow::DEPTH_STENCIL_ATTACHMENT,
});

gl_enum!(FramebufferTarget {
    Draw => glow::DRAW_FRAMEBUFFER,
    Read => glow::READ_FRAMEBUFFER,
    Both => glow::FRAMEBUFFER,
});

/// Storage layout passed as `internalformat` to `glTexImage2D`.
///
/// Channel order is a property of the uploaded data, not of the storage, so
/// the BGR variants are stored as their RGB counterparts. This lets every
/// `(internal_format, format)` pair be accepted by the driver.
pub fn internal_format_gl(format: PixelFormat) -> i32 {
    let raw = match format {
        PixelFormat::R => glow::RED,
        PixelFormat::Rg => glow::RG,
        PixelFormat::Rgb | PixelFormat::Bgr => glow::RGB,
        PixelFormat::Rgba | PixelFormat::Bgra => glow::RGBA,
        PixelFormat::DepthComponent => glow::DEPTH_COMPONENT,
    };
    raw as i32
}

impl GlEnum for ClearMask {
    fn to_gl(self) -> u32 {
        let mut bits = 0;
        if self.contains(ClearMask::COLOR) {
            bits |= glow::COLOR_BUFFER_BIT;
        }
        if self.contains(ClearMask::DEPTH) {
            bits |= glow::DEPTH_BUFFER_BIT;
        }
        if self.contains(ClearMask::STENCIL) {
            bits |= glow::STENCIL_BUFFER_BIT;
        }
        bits
    }

    fn from_gl(raw: u32) -> Option<Self> {
        let known = glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT | glow::STENCIL_BUFFER_BIT;
        if raw & !known != 0 {
            return None;
        }
        let mut mask = ClearMask::empty();
        if raw & glow::COLOR_BUFFER_BIT != 0 {
            mask |= ClearMask::COLOR;
        }
        if raw & glow::DEPTH_BUFFER_BIT != 0 {
            mask |= ClearMask::DEPTH;
        }
        if raw & glow::STENCIL_BUFFER_BIT != 0 {
            mask |= ClearMask::STENCIL;
        }
        Some(mask)
    }
}
