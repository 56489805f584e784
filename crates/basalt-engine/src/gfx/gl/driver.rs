use std::num::NonZeroU32;

use crate::gfx::caps::Uniform;

/// GL object name. Zero is never a valid object, so it is excluded by type.
pub type NativeName = NonZeroU32;

/// Raw OpenGL entry points used by [`GlContext`](super::GlContext).
///
/// Arguments are native GL enums and object names; all validation happens in
/// the backend before a call reaches this trait. [`GlowDriver`](super::GlowDriver)
/// is the production implementation. Tests substitute a driver that records
/// calls instead of issuing them.
pub trait GlDriver {
    /// Reported core version as `(major, minor)`.
    fn version(&self) -> (u32, u32);

    fn get_integer(&self, pname: u32) -> i32;

    fn create_shader(&mut self, kind: u32) -> Result<NativeName, String>;
    /// Uploads the source, compiles, and returns the compile status.
    fn compile_shader(&mut self, shader: NativeName, source: &str) -> bool;
    fn shader_info_log(&self, shader: NativeName) -> String;
    fn delete_shader(&mut self, shader: NativeName);

    fn create_program(&mut self) -> Result<NativeName, String>;
    fn attach_shader(&mut self, program: NativeName, shader: NativeName);
    fn detach_shader(&mut self, program: NativeName, shader: NativeName);
    /// Links and returns the link status.
    fn link_program(&mut self, program: NativeName) -> bool;
    fn program_info_log(&self, program: NativeName) -> String;
    fn delete_program(&mut self, program: NativeName);
    fn use_program(&mut self, program: Option<NativeName>);
    fn uniform(&mut self, location: u32, value: &Uniform<'_>);

    fn create_buffer(&mut self) -> Result<NativeName, String>;
    fn bind_array_buffer(&mut self, buffer: Option<NativeName>);
    fn buffer_data(&mut self, data: &[u8], usage: u32);
    fn buffer_storage_size(&mut self, size: i32, usage: u32);
    fn buffer_sub_data(&mut self, offset: i32, data: &[u8]);
    fn delete_buffer(&mut self, buffer: NativeName);

    fn create_vertex_array(&mut self) -> Result<NativeName, String>;
    fn bind_vertex_array(&mut self, vao: Option<NativeName>);
    fn delete_vertex_array(&mut self, vao: NativeName);
    #[allow(clippy::too_many_arguments)]
    fn vertex_attrib_pointer_f32(
        &mut self,
        index: u32,
        size: i32,
        ty: u32,
        normalized: bool,
        stride: i32,
        offset: i32,
    );
    fn vertex_attrib_pointer_i32(&mut self, index: u32, size: i32, ty: u32, stride: i32, offset: i32);
    fn enable_vertex_attrib_array(&mut self, index: u32);
    fn draw_arrays(&mut self, mode: u32, first: i32, count: i32);

    fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32);
    fn clear_color(&mut self, r: f32, g: f32, b: f32, a: f32);
    fn clear(&mut self, mask: u32);

    fn create_framebuffer(&mut self) -> Result<NativeName, String>;
    fn bind_framebuffer(&mut self, target: u32, framebuffer: Option<NativeName>);
    fn framebuffer_texture_2d(&mut self, target: u32, attachment: u32, texture: Option<NativeName>, level: i32);
    fn draw_buffers(&mut self, buffers: &[u32]);
    fn blit_framebuffer(&mut self, src: [i32; 4], dst: [i32; 4], mask: u32, filter: u32);
    fn delete_framebuffer(&mut self, framebuffer: NativeName);

    fn create_texture(&mut self) -> Result<NativeName, String>;
    fn active_texture(&mut self, unit: u32);
    fn bind_texture_2d(&mut self, texture: Option<NativeName>);
    #[allow(clippy::too_many_arguments)]
    fn tex_image_2d(
        &mut self,
        level: i32,
        internal_format: i32,
        width: i32,
        height: i32,
        format: u32,
        ty: u32,
        pixels: Option<&[u8]>,
    );
    fn tex_parameter_2d(&mut self, pname: u32, value: i32);
    fn pixel_store_unpack_alignment(&mut self, alignment: i32);
    fn delete_texture(&mut self, texture: NativeName);
}
