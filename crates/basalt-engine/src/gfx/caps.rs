//! Portable capability values accepted by [`RenderContext`](super::RenderContext).
//!
//! These are backend-agnostic; each backend owns the translation to its native
//! constants (see `gl::convert` for the OpenGL one).

use std::fmt;

use glam::{IVec2, IVec3, IVec4, Mat3, Mat4, Vec2, Vec3, Vec4};

use super::handle::Handle;

/// Programmable pipeline stage a shader is compiled for.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub const ALL: [ShaderStage; 2] = [ShaderStage::Vertex, ShaderStage::Fragment];
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Component type of a vertex attribute.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum AttributeType {
    /// 32-bit signed integers, delivered to the shader unconverted.
    Int,
    /// 32-bit floats.
    Float,
}

impl AttributeType {
    pub const ALL: [AttributeType; 2] = [AttributeType::Int, AttributeType::Float];

    /// Size of one component in bytes.
    pub fn size(self) -> usize {
        4
    }
}

/// Primitive topology used by a draw.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum DrawMode {
    Points,
    Lines,
    LineStrip,
    LineLoop,
    Triangles,
    TriangleStrip,
    TriangleFan,
}

impl DrawMode {
    pub const ALL: [DrawMode; 7] = [
        DrawMode::Points,
        DrawMode::Lines,
        DrawMode::LineStrip,
        DrawMode::LineLoop,
        DrawMode::Triangles,
        DrawMode::TriangleStrip,
        DrawMode::TriangleFan,
    ];
}

/// Channel layout of pixel data, used both for texture storage and for the
/// layout of uploaded bytes.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PixelFormat {
    R,
    Rg,
    Rgb,
    Bgr,
    Rgba,
    Bgra,
    DepthComponent,
}

impl PixelFormat {
    pub const ALL: [PixelFormat; 7] = [
        PixelFormat::R,
        PixelFormat::Rg,
        PixelFormat::Rgb,
        PixelFormat::Bgr,
        PixelFormat::Rgba,
        PixelFormat::Bgra,
        PixelFormat::DepthComponent,
    ];

    /// Number of components per pixel.
    pub fn components(self) -> usize {
        match self {
            PixelFormat::R | PixelFormat::DepthComponent => 1,
            PixelFormat::Rg => 2,
            PixelFormat::Rgb | PixelFormat::Bgr => 3,
            PixelFormat::Rgba | PixelFormat::Bgra => 4,
        }
    }
}

/// Component type of uploaded pixel data.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PixelType {
    UByte,
    Byte,
    UShort,
    Short,
    UInt,
    Int,
    Float,
}

impl PixelType {
    pub const ALL: [PixelType; 7] = [
        PixelType::UByte,
        PixelType::Byte,
        PixelType::UShort,
        PixelType::Short,
        PixelType::UInt,
        PixelType::Int,
        PixelType::Float,
    ];

    /// Size of one component in bytes.
    pub fn size(self) -> usize {
        match self {
            PixelType::UByte | PixelType::Byte => 1,
            PixelType::UShort | PixelType::Short => 2,
            PixelType::UInt | PixelType::Int | PixelType::Float => 4,
        }
    }
}

/// Texture sampling / blit filter.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Filter {
    Nearest,
    Linear,
    NearestMipmapNearest,
    LinearMipmapNearest,
    NearestMipmapLinear,
    LinearMipmapLinear,
}

impl Filter {
    pub const ALL: [Filter; 6] = [
        Filter::Nearest,
        Filter::Linear,
        Filter::NearestMipmapNearest,
        Filter::LinearMipmapNearest,
        Filter::NearestMipmapLinear,
        Filter::LinearMipmapLinear,
    ];

    /// True for the filters that sample a mipmap chain.
    pub fn uses_mipmaps(self) -> bool {
        !matches!(self, Filter::Nearest | Filter::Linear)
    }
}

/// Texture coordinate wrap mode.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum WrapMode {
    ClampToEdge,
    MirroredRepeat,
    Repeat,
}

impl WrapMode {
    pub const ALL: [WrapMode; 3] = [WrapMode::ClampToEdge, WrapMode::MirroredRepeat, WrapMode::Repeat];
}

/// Attachment point on a framebuffer.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum FramebufferAttachment {
    Color0,
    Color1,
    Color2,
    Color3,
    Color4,
    Color5,
    Color6,
    Color7,
    Depth,
    Stencil,
    DepthStencil,
}

impl FramebufferAttachment {
    /// Number of color attachment points representable by this enum.
    pub const MAX_COLOR: usize = 8;

    pub const ALL: [FramebufferAttachment; 11] = [
        FramebufferAttachment::Color0,
        FramebufferAttachment::Color1,
        FramebufferAttachment::Color2,
        FramebufferAttachment::Color3,
        FramebufferAttachment::Color4,
        FramebufferAttachment::Color5,
        FramebufferAttachment::Color6,
        FramebufferAttachment::Color7,
        FramebufferAttachment::Depth,
        FramebufferAttachment::Stencil,
        FramebufferAttachment::DepthStencil,
    ];

    /// Color slot index, or `None` for depth/stencil points.
    pub fn color_index(self) -> Option<u32> {
        match self {
            FramebufferAttachment::Color0 => Some(0),
            FramebufferAttachment::Color1 => Some(1),
            FramebufferAttachment::Color2 => Some(2),
            FramebufferAttachment::Color3 => Some(3),
            FramebufferAttachment::Color4 => Some(4),
            FramebufferAttachment::Color5 => Some(5),
            FramebufferAttachment::Color6 => Some(6),
            FramebufferAttachment::Color7 => Some(7),
            FramebufferAttachment::Depth
            | FramebufferAttachment::Stencil
            | FramebufferAttachment::DepthStencil => None,
        }
    }
}

/// Which framebuffer binding point(s) an operation addresses.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum FramebufferTarget {
    Draw,
    Read,
    Both,
}

impl FramebufferTarget {
    pub const ALL: [FramebufferTarget; 3] =
        [FramebufferTarget::Draw, FramebufferTarget::Read, FramebufferTarget::Both];

    pub fn includes_draw(self) -> bool {
        matches!(self, FramebufferTarget::Draw | FramebufferTarget::Both)
    }

    pub fn includes_read(self) -> bool {
        matches!(self, FramebufferTarget::Read | FramebufferTarget::Both)
    }
}

bitflags::bitflags! {
    /// Set of buffer planes, used by `clear` and `blit_framebuffer`.
    #[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
    pub struct ClearMask: u8 {
        const COLOR = 0x01;
        const DEPTH = 0x02;
        const STENCIL = 0x04;
    }
}

/// Rectangle given by two corners, as used by framebuffer blits.
///
/// `x1`/`y1` are exclusive. Swapping corners mirrors the copy.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct Region {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl Region {
    pub const fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Region anchored at the origin.
    pub const fn sized(width: i32, height: i32) -> Self {
        Self::new(0, 0, width, height)
    }

    pub fn width(&self) -> i32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> i32 {
        self.y1 - self.y0
    }
}

/// How raw buffer bytes are read for one vertex attribute slot.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct VertexAttribute {
    /// Attribute location in the vertex shader.
    pub index: u32,
    /// Components per vertex (1..=4).
    pub components: u32,
    pub ty: AttributeType,
    /// Map integer data to [0, 1] / [-1, 1]. Must be `false` for `Int`.
    pub normalized: bool,
    /// Byte distance between consecutive vertices; 0 means tightly packed.
    pub stride: usize,
    /// Byte offset of the first component inside the buffer.
    pub offset: usize,
}

impl VertexAttribute {
    /// Tightly packed float attribute starting at offset 0.
    pub fn floats(index: u32, components: u32) -> Self {
        Self {
            index,
            components,
            ty: AttributeType::Float,
            normalized: false,
            stride: 0,
            offset: 0,
        }
    }

    /// Tightly packed integer attribute starting at offset 0.
    pub fn ints(index: u32, components: u32) -> Self {
        Self {
            ty: AttributeType::Int,
            ..Self::floats(index, components)
        }
    }

    pub fn with_stride(mut self, stride: usize) -> Self {
        self.stride = stride;
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn normalized(mut self, normalized: bool) -> Self {
        self.normalized = normalized;
        self
    }
}

/// Recorded binding of a vertex attribute slot on a vertex array.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct AttributeBinding {
    pub buffer: Handle,
    pub layout: VertexAttribute,
}

/// Value uploaded to a uniform location of the active program.
///
/// Every scalar, vector and matrix shape exists both as a single value and
/// as an array (`*Array` variants upload `len()` consecutive elements).
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Uniform<'a> {
    Int(i32),
    Float(f32),
    IVec2(IVec2),
    Vec2(Vec2),
    IVec3(IVec3),
    Vec3(Vec3),
    IVec4(IVec4),
    Vec4(Vec4),
    Mat3(Mat3),
    Mat4(Mat4),

    IntArray(&'a [i32]),
    FloatArray(&'a [f32]),
    IVec2Array(&'a [IVec2]),
    Vec2Array(&'a [Vec2]),
    IVec3Array(&'a [IVec3]),
    Vec3Array(&'a [Vec3]),
    IVec4Array(&'a [IVec4]),
    Vec4Array(&'a [Vec4]),
    Mat3Array(&'a [Mat3]),
    Mat4Array(&'a [Mat4]),
}

impl Uniform<'_> {
    /// Number of elements uploaded (1 for singular values).
    pub fn len(&self) -> usize {
        match self {
            Uniform::IntArray(v) => v.len(),
            Uniform::FloatArray(v) => v.len(),
            Uniform::IVec2Array(v) => v.len(),
            Uniform::Vec2Array(v) => v.len(),
            Uniform::IVec3Array(v) => v.len(),
            Uniform::Vec3Array(v) => v.len(),
            Uniform::IVec4Array(v) => v.len(),
            Uniform::Vec4Array(v) => v.len(),
            Uniform::Mat3Array(v) => v.len(),
            Uniform::Mat4Array(v) => v.len(),
            _ => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
