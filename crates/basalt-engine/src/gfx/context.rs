use glam::Vec4;

use super::caps::{
    ClearMask, DrawMode, Filter, FramebufferAttachment, FramebufferTarget, PixelFormat, PixelType,
    Region, ShaderStage, Uniform, VertexAttribute, WrapMode,
};
use super::error::Result;
use super::handle::Handle;

/// Backend-agnostic rendering contract.
///
/// Callers only ever see [`Handle`]s; the implementation owns the native
/// objects behind them. Every call that takes a handle resolves it first and
/// fails with `UnknownHandle`/`WrongKind` instead of touching driver state.
///
/// The model is single-threaded and immediate: each call runs to completion
/// before returning, and [`draw_vertex_array`](Self::draw_vertex_array) is the
/// only call that submits GPU work.
///
/// Resource lifetime is manual. Whatever is not destroyed before the context
/// is dropped leaks on the driver side.
pub trait RenderContext {
    // ── shaders & programs ────────────────────────────────────────────────

    /// Compiles `source` for `stage`.
    ///
    /// On failure the driver log is returned in `GfxError::Compilation` and no
    /// handle is created.
    fn create_shader(&mut self, stage: ShaderStage, source: &str) -> Result<Handle>;

    fn destroy_shader(&mut self, shader: Handle) -> Result<()>;

    /// Creates an empty program with nothing attached.
    fn create_program(&mut self) -> Result<Handle>;

    /// Destroys a program. Fails while the program is active.
    fn destroy_program(&mut self, program: Handle) -> Result<()>;

    fn attach_shader(&mut self, program: Handle, shader: Handle) -> Result<()>;

    fn detach_shader(&mut self, program: Handle, shader: Handle) -> Result<()>;

    /// Links the attached shaders. A failed link returns the driver log in
    /// `GfxError::Link` and leaves the program unusable until relinked.
    ///
    /// Shaders stay attached after a successful link; detaching or destroying
    /// them afterwards is allowed.
    fn link_program(&mut self, program: Handle) -> Result<()>;

    /// Makes a linked program current.
    fn activate_program(&mut self, program: Handle) -> Result<()>;

    /// Clears the current program. `program` must be the active one.
    fn deactivate_program(&mut self, program: Handle) -> Result<()>;

    fn active_program(&self) -> Option<Handle>;

    /// Uploads a uniform value to `location` of the active program.
    fn set_uniform(&mut self, location: u32, value: Uniform<'_>) -> Result<()>;

    // ── geometry ─────────────────────────────────────────────────────────

    fn create_vertex_array(&mut self) -> Result<Handle>;

    fn destroy_vertex_array(&mut self, vao: Handle) -> Result<()>;

    /// Creates an immutable buffer holding `data`.
    fn create_static_vertex_buffer(&mut self, vao: Handle, data: &[u8]) -> Result<Handle>;

    /// Creates a buffer of `size` bytes meant for frequent rewrites.
    ///
    /// `data`, when given, must be exactly `size` bytes long; otherwise the
    /// storage is left uninitialized.
    fn create_dynamic_vertex_buffer(
        &mut self,
        vao: Handle,
        size: usize,
        data: Option<&[u8]>,
    ) -> Result<Handle>;

    /// Replaces the contents of a dynamic buffer. Growing past the current
    /// size reallocates the storage.
    fn set_dynamic_vertex_buffer_data(&mut self, vao: Handle, vbo: Handle, data: &[u8]) -> Result<()>;

    fn destroy_vertex_buffer(&mut self, vbo: Handle) -> Result<()>;

    /// Describes how `vbo` feeds one attribute slot of `vao` and enables it.
    fn set_vertex_attribute_pointer(
        &mut self,
        vao: Handle,
        vbo: Handle,
        attribute: VertexAttribute,
    ) -> Result<()>;

    /// Draws `count` vertices starting at `first`.
    ///
    /// The range is not checked against buffer sizes; reads past the end are
    /// governed by the driver.
    fn draw_vertex_array(&mut self, vao: Handle, mode: DrawMode, first: u32, count: usize) -> Result<()>;

    // ── target state ─────────────────────────────────────────────────────

    fn set_viewport(&mut self, x: i32, y: i32, width: u32, height: u32) -> Result<()>;

    fn set_clear_color(&mut self, color: Vec4) -> Result<()>;

    /// Clears the planes in `mask` of the current draw framebuffer.
    fn clear(&mut self, mask: ClearMask) -> Result<()>;

    // ── framebuffers ─────────────────────────────────────────────────────

    /// Creates a framebuffer with no attachments.
    fn create_framebuffer(&mut self) -> Result<Handle>;

    fn destroy_framebuffer(&mut self, framebuffer: Handle) -> Result<()>;

    /// Binds `framebuffer` to `target`. `None` selects the default framebuffer.
    fn bind_framebuffer(&mut self, target: FramebufferTarget, framebuffer: Option<Handle>) -> Result<()>;

    /// Attaches mip `level` of `texture` to the framebuffer bound on `target`.
    fn framebuffer_texture_2d(
        &mut self,
        target: FramebufferTarget,
        attachment: FramebufferAttachment,
        texture: Handle,
        level: u32,
    ) -> Result<()>;

    /// Selects the color attachments that receive fragment outputs.
    ///
    /// Entry `i` receives fragment output `i`. More entries than the device
    /// supports is an `InvalidArgument` and reaches no driver.
    fn set_draw_buffers(&mut self, attachments: &[FramebufferAttachment]) -> Result<()>;

    /// Copies `src` of the read framebuffer into `dst` of the draw framebuffer,
    /// scaling when the rectangles differ in size.
    fn blit_framebuffer(&mut self, src: Region, dst: Region, mask: ClearMask, filter: Filter) -> Result<()>;

    // ── textures ─────────────────────────────────────────────────────────

    /// Creates an empty 2D texture.
    fn create_texture_2d(&mut self) -> Result<Handle>;

    fn destroy_texture_2d(&mut self, texture: Handle) -> Result<()>;

    /// Binds `texture` to unit `slot` and makes that unit active.
    fn activate_texture_2d(&mut self, texture: Handle, slot: u32) -> Result<()>;

    /// Unbinds `texture` from `slot`. Fails if another texture is bound there.
    fn deactivate_texture_2d(&mut self, texture: Handle, slot: u32) -> Result<()>;

    /// Specifies one mip level of the texture bound on the active unit.
    ///
    /// `internal_format` is the storage layout, `format`/`ty` describe `data`.
    /// `None` allocates storage without uploading.
    #[allow(clippy::too_many_arguments)]
    fn texture_data_2d(
        &mut self,
        level: u32,
        internal_format: PixelFormat,
        width: u32,
        height: u32,
        format: PixelFormat,
        ty: PixelType,
        data: Option<&[u8]>,
    ) -> Result<()>;

    // Sampler state applies to the texture bound on the active unit.

    fn set_texture_min_filter(&mut self, filter: Filter) -> Result<()>;

    fn set_texture_mag_filter(&mut self, filter: Filter) -> Result<()>;

    fn set_texture_wrap_s(&mut self, mode: WrapMode) -> Result<()>;

    fn set_texture_wrap_t(&mut self, mode: WrapMode) -> Result<()>;

    /// Row alignment of uploaded pixel data (1, 2, 4 or 8 bytes).
    fn set_unpack_alignment(&mut self, alignment: u32) -> Result<()>;

    fn unpack_alignment(&self) -> u32;
}
