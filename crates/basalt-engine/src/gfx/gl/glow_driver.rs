//! Production [`GlDriver`] on top of `glow`.
//!
//! Every method forwards to one `glow::HasContext` call. The calls are
//! `unsafe` because they require the GL context that produced the function
//! pointers to be current on this thread; `GlowDriver::new` is the point where
//! the caller takes on that obligation.

use std::ffi::c_void;

use glow::HasContext;

use super::driver::{GlDriver, NativeName};
use crate::gfx::caps::Uniform;

pub struct GlowDriver {
    gl: glow::Context,
}

impl GlowDriver {
    /// Wraps an already-loaded `glow` context.
    ///
    /// # Safety
    ///
    /// The GL context behind `gl` must stay current on the calling thread for
    /// as long as the driver is used.
    pub unsafe fn new(gl: glow::Context) -> Self {
        Self { gl }
    }

    /// Loads GL entry points through `loader`.
    ///
    /// # Safety
    ///
    /// Same contract as [`GlowDriver::new`]; `loader` must return valid
    /// function pointers (or null) for the current context.
    pub unsafe fn from_loader<F>(loader: F) -> Self
    where
        F: FnMut(&str) -> *const c_void,
    {
        let gl = unsafe { glow::Context::from_loader_function(loader) };
        Self { gl }
    }
}

fn location(index: u32) -> glow::NativeUniformLocation {
    glow::NativeUniformLocation(index)
}

impl GlDriver for GlowDriver {
    fn version(&self) -> (u32, u32) {
        let v = self.gl.version();
        (v.major, v.minor)
    }

    fn get_integer(&self, pname: u32) -> i32 {
        unsafe { self.gl.get_parameter_i32(pname) }
    }

    fn create_shader(&mut self, kind: u32) -> Result<NativeName, String> {
        unsafe { self.gl.create_shader(kind) }.map(|s| s.0)
    }

    fn compile_shader(&mut self, shader: NativeName, source: &str) -> bool {
        let shader = glow::NativeShader(shader);
        unsafe {
            self.gl.shader_source(shader, source);
            self.gl.compile_shader(shader);
            self.gl.get_shader_compile_status(shader)
        }
    }

    fn shader_info_log(&self, shader: NativeName) -> String {
        unsafe { self.gl.get_shader_info_log(glow::NativeShader(shader)) }
    }

    fn delete_shader(&mut self, shader: NativeName) {
        unsafe { self.gl.delete_shader(glow::NativeShader(shader)) }
    }

    fn create_program(&mut self) -> Result<NativeName, String> {
        unsafe { self.gl.create_program() }.map(|p| p.0)
    }

    fn attach_shader(&mut self, program: NativeName, shader: NativeName) {
        unsafe {
            self.gl
                .attach_shader(glow::NativeProgram(program), glow::NativeShader(shader))
        }
    }

    fn detach_shader(&mut self, program: NativeName, shader: NativeName) {
        unsafe {
            self.gl
                .detach_shader(glow::NativeProgram(program), glow::NativeShader(shader))
        }
    }

    fn link_program(&mut self, program: NativeName) -> bool {
        let program = glow::NativeProgram(program);
        unsafe {
            self.gl.link_program(program);
            self.gl.get_program_link_status(program)
        }
    }

    fn program_info_log(&self, program: NativeName) -> String {
        unsafe { self.gl.get_program_info_log(glow::NativeProgram(program)) }
    }

    fn delete_program(&mut self, program: NativeName) {
        unsafe { self.gl.delete_program(glow::NativeProgram(program)) }
    }

    fn use_program(&mut self, program: Option<NativeName>) {
        unsafe { self.gl.use_program(program.map(glow::NativeProgram)) }
    }

    fn uniform(&mut self, index: u32, value: &Uniform<'_>) {
        let loc = location(index);
        let loc = Some(&loc);
        let gl = &self.gl;
        unsafe {
            match *value {
                Uniform::Int(v) => gl.uniform_1_i32(loc, v),
                Uniform::Float(v) => gl.uniform_1_f32(loc, v),
                Uniform::IVec2(v) => gl.uniform_2_i32(loc, v.x, v.y),
                Uniform::Vec2(v) => gl.uniform_2_f32(loc, v.x, v.y),
                Uniform::IVec3(v) => gl.uniform_3_i32(loc, v.x, v.y, v.z),
                Uniform::Vec3(v) => gl.uniform_3_f32(loc, v.x, v.y, v.z),
                Uniform::IVec4(v) => gl.uniform_4_i32(loc, v.x, v.y, v.z, v.w),
                Uniform::Vec4(v) => gl.uniform_4_f32(loc, v.x, v.y, v.z, v.w),
                Uniform::Mat3(m) => gl.uniform_matrix_3_f32_slice(loc, false, &m.to_cols_array()),
                Uniform::Mat4(m) => gl.uniform_matrix_4_f32_slice(loc, false, &m.to_cols_array()),

                Uniform::IntArray(v) => gl.uniform_1_i32_slice(loc, v),
                Uniform::FloatArray(v) => gl.uniform_1_f32_slice(loc, v),
                Uniform::IVec2Array(v) => gl.uniform_2_i32_slice(loc, bytemuck::cast_slice(v)),
                Uniform::Vec2Array(v) => gl.uniform_2_f32_slice(loc, bytemuck::cast_slice(v)),
                Uniform::IVec3Array(v) => gl.uniform_3_i32_slice(loc, bytemuck::cast_slice(v)),
                Uniform::Vec3Array(v) => gl.uniform_3_f32_slice(loc, bytemuck::cast_slice(v)),
                Uniform::IVec4Array(v) => gl.uniform_4_i32_slice(loc, bytemuck::cast_slice(v)),
                Uniform::Vec4Array(v) => gl.uniform_4_f32_slice(loc, bytemuck::cast_slice(v)),
                Uniform::Mat3Array(v) => {
                    gl.uniform_matrix_3_f32_slice(loc, false, bytemuck::cast_slice(v))
                }
                Uniform::Mat4Array(v) => {
                    gl.uniform_matrix_4_f32_slice(loc, false, bytemuck::cast_slice(v))
                }
            }
        }
    }

    fn create_buffer(&mut self) -> Result<NativeName, String> {
        unsafe { self.gl.create_buffer() }.map(|b| b.0)
    }

    fn bind_array_buffer(&mut self, buffer: Option<NativeName>) {
        unsafe {
            self.gl
                .bind_buffer(glow::ARRAY_BUFFER, buffer.map(glow::NativeBuffer))
        }
    }

    fn buffer_data(&mut self, data: &[u8], usage: u32) {
        unsafe { self.gl.buffer_data_u8_slice(glow::ARRAY_BUFFER, data, usage) }
    }

    fn buffer_storage_size(&mut self, size: i32, usage: u32) {
        unsafe { self.gl.buffer_data_size(glow::ARRAY_BUFFER, size, usage) }
    }

    fn buffer_sub_data(&mut self, offset: i32, data: &[u8]) {
        unsafe { self.gl.buffer_sub_data_u8_slice(glow::ARRAY_BUFFER, offset, data) }
    }

    fn delete_buffer(&mut self, buffer: NativeName) {
        unsafe { self.gl.delete_buffer(glow::NativeBuffer(buffer)) }
    }

    fn create_vertex_array(&mut self) -> Result<NativeName, String> {
        unsafe { self.gl.create_vertex_array() }.map(|v| v.0)
    }

    fn bind_vertex_array(&mut self, vao: Option<NativeName>) {
        unsafe { self.gl.bind_vertex_array(vao.map(glow::NativeVertexArray)) }
    }

    fn delete_vertex_array(&mut self, vao: NativeName) {
        unsafe { self.gl.delete_vertex_array(glow::NativeVertexArray(vao)) }
    }

    fn vertex_attrib_pointer_f32(
        &mut self,
        index: u32,
        size: i32,
        ty: u32,
        normalized: bool,
        stride: i32,
        offset: i32,
    ) {
        unsafe {
            self.gl
                .vertex_attrib_pointer_f32(index, size, ty, normalized, stride, offset)
        }
    }

    fn vertex_attrib_pointer_i32(&mut self, index: u32, size: i32, ty: u32, stride: i32, offset: i32) {
        unsafe { self.gl.vertex_attrib_pointer_i32(index, size, ty, stride, offset) }
    }

    fn enable_vertex_attrib_array(&mut self, index: u32) {
        unsafe { self.gl.enable_vertex_attrib_array(index) }
    }

    fn draw_arrays(&mut self, mode: u32, first: i32, count: i32) {
        unsafe { self.gl.draw_arrays(mode, first, count) }
    }

    fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { self.gl.viewport(x, y, width, height) }
    }

    fn clear_color(&mut self, r: f32, g: f32, b: f32, a: f32) {
        unsafe { self.gl.clear_color(r, g, b, a) }
    }

    fn clear(&mut self, mask: u32) {
        unsafe { self.gl.clear(mask) }
    }

    fn create_framebuffer(&mut self) -> Result<NativeName, String> {
        unsafe { self.gl.create_framebuffer() }.map(|f| f.0)
    }

    fn bind_framebuffer(&mut self, target: u32, framebuffer: Option<NativeName>) {
        unsafe {
            self.gl
                .bind_framebuffer(target, framebuffer.map(glow::NativeFramebuffer))
        }
    }

    fn framebuffer_texture_2d(&mut self, target: u32, attachment: u32, texture: Option<NativeName>, level: i32) {
        unsafe {
            self.gl.framebuffer_texture_2d(
                target,
                attachment,
                glow::TEXTURE_2D,
                texture.map(glow::NativeTexture),
                level,
            )
        }
    }

    fn draw_buffers(&mut self, buffers: &[u32]) {
        unsafe { self.gl.draw_buffers(buffers) }
    }

    fn blit_framebuffer(&mut self, src: [i32; 4], dst: [i32; 4], mask: u32, filter: u32) {
        unsafe {
            self.gl.blit_framebuffer(
                src[0], src[1], src[2], src[3], dst[0], dst[1], dst[2], dst[3], mask, filter,
            )
        }
    }

    fn delete_framebuffer(&mut self, framebuffer: NativeName) {
        unsafe { self.gl.delete_framebuffer(glow::NativeFramebuffer(framebuffer)) }
    }

    fn create_texture(&mut self) -> Result<NativeName, String> {
        unsafe { self.gl.create_texture() }.map(|t| t.0)
    }

    fn active_texture(&mut self, unit: u32) {
        unsafe { self.gl.active_texture(glow::TEXTURE0 + unit) }
    }

    fn bind_texture_2d(&mut self, texture: Option<NativeName>) {
        unsafe {
            self.gl
                .bind_texture(glow::TEXTURE_2D, texture.map(glow::NativeTexture))
        }
    }

    fn tex_image_2d(
        &mut self,
        level: i32,
        internal_format: i32,
        width: i32,
        height: i32,
        format: u32,
        ty: u32,
        pixels: Option<&[u8]>,
    ) {
        unsafe {
            self.gl.tex_image_2d(
                glow::TEXTURE_2D,
                level,
                internal_format,
                width,
                height,
                0,
                format,
                ty,
                glow::PixelUnpackData::Slice(pixels),
            )
        }
    }

    fn tex_parameter_2d(&mut self, pname: u32, value: i32) {
        unsafe { self.gl.tex_parameter_i32(glow::TEXTURE_2D, pname, value) }
    }

    fn pixel_store_unpack_alignment(&mut self, alignment: i32) {
        unsafe { self.gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, alignment) }
    }

    fn delete_texture(&mut self, texture: NativeName) {
        unsafe { self.gl.delete_texture(glow::NativeTexture(texture)) }
    }
}
