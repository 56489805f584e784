//! Test driver that records every native call instead of issuing it.

use std::collections::HashMap;
use std::num::NonZeroU32;

use super::backend::GlContext;
use super::driver::{GlDriver, NativeName};
use super::init::GlInit;
use crate::gfx::caps::Uniform;

/// Uniform payload flattened to its scalar components.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedUniform {
    Ints(Vec<i32>),
    Floats(Vec<f32>),
}

impl RecordedUniform {
    fn of(value: &Uniform<'_>) -> Self {
        use RecordedUniform::{Floats, Ints};
        match *value {
            Uniform::Int(v) => Ints(vec![v]),
            Uniform::Float(v) => Floats(vec![v]),
            Uniform::IVec2(v) => Ints(v.to_array().to_vec()),
            Uniform::Vec2(v) => Floats(v.to_array().to_vec()),
            Uniform::IVec3(v) => Ints(v.to_array().to_vec()),
            Uniform::Vec3(v) => Floats(v.to_array().to_vec()),
            Uniform::IVec4(v) => Ints(v.to_array().to_vec()),
            Uniform::Vec4(v) => Floats(v.to_array().to_vec()),
            Uniform::Mat3(m) => Floats(m.to_cols_array().to_vec()),
            Uniform::Mat4(m) => Floats(m.to_cols_array().to_vec()),
            Uniform::IntArray(v) => Ints(v.to_vec()),
            Uniform::FloatArray(v) => Floats(v.to_vec()),
            Uniform::IVec2Array(v) => Ints(v.iter().flat_map(|x| x.to_array()).collect()),
            Uniform::Vec2Array(v) => Floats(v.iter().flat_map(|x| x.to_array()).collect()),
            Uniform::IVec3Array(v) => Ints(v.iter().flat_map(|x| x.to_array()).collect()),
            Uniform::Vec3Array(v) => Floats(v.iter().flat_map(|x| x.to_array()).collect()),
            Uniform::IVec4Array(v) => Ints(v.iter().flat_map(|x| x.to_array()).collect()),
            Uniform::Vec4Array(v) => Floats(v.iter().flat_map(|x| x.to_array()).collect()),
            Uniform::Mat3Array(v) => Floats(v.iter().flat_map(|m| m.to_cols_array()).collect()),
            Uniform::Mat4Array(v) => Floats(v.iter().flat_map(|m| m.to_cols_array()).collect()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateShader { kind: u32, name: NativeName },
    CompileShader(NativeName),
    DeleteShader(NativeName),
    CreateProgram(NativeName),
    AttachShader(NativeName, NativeName),
    DetachShader(NativeName, NativeName),
    LinkProgram(NativeName),
    DeleteProgram(NativeName),
    UseProgram(Option<NativeName>),
    Uniform { location: u32, value: RecordedUniform },

    CreateBuffer(NativeName),
    BindArrayBuffer(Option<NativeName>),
    BufferData { data: Vec<u8>, usage: u32 },
    BufferStorage { size: i32, usage: u32 },
    BufferSubData { offset: i32, data: Vec<u8> },
    DeleteBuffer(NativeName),

    CreateVertexArray(NativeName),
    BindVertexArray(Option<NativeName>),
    DeleteVertexArray(NativeName),
    VertexAttribPointerF32 {
        index: u32,
        size: i32,
        ty: u32,
        normalized: bool,
        stride: i32,
        offset: i32,
    },
    VertexAttribPointerI32 {
        index: u32,
        size: i32,
        ty: u32,
        stride: i32,
        offset: i32,
    },
    EnableVertexAttribArray(u32),
    DrawArrays { mode: u32, first: i32, count: i32 },

    Viewport([i32; 4]),
    ClearColor([f32; 4]),
    Clear(u32),

    CreateFramebuffer(NativeName),
    BindFramebuffer { target: u32, framebuffer: Option<NativeName> },
    FramebufferTexture2d {
        target: u32,
        attachment: u32,
        texture: Option<NativeName>,
        level: i32,
    },
    DrawBuffers(Vec<u32>),
    BlitFramebuffer {
        src: [i32; 4],
        dst: [i32; 4],
        mask: u32,
        filter: u32,
    },
    DeleteFramebuffer(NativeName),

    CreateTexture(NativeName),
    ActiveTexture(u32),
    BindTexture2d(Option<NativeName>),
    TexImage2d {
        level: i32,
        internal_format: i32,
        width: i32,
        height: i32,
        format: u32,
        ty: u32,
        len: Option<usize>,
    },
    TexParameter2d { pname: u32, value: i32 },
    PixelStoreUnpackAlignment(i32),
    DeleteTexture(NativeName),
}

/// Records calls and hands out sequential native names.
///
/// `compile_error`/`link_error`, when set, make every compile or link fail
/// with that log.
#[derive(Debug)]
pub struct RecordingDriver {
    pub calls: Vec<Call>,
    pub version: (u32, u32),
    pub integers: HashMap<u32, i32>,
    pub compile_error: Option<String>,
    pub link_error: Option<String>,
    next_name: u32,
}

impl RecordingDriver {
    pub fn new() -> Self {
        let integers = HashMap::from([
            (glow::MAX_DRAW_BUFFERS, 8),
            (glow::MAX_COLOR_ATTACHMENTS, 8),
            (glow::MAX_VERTEX_ATTRIBS, 16),
            (glow::MAX_COMBINED_TEXTURE_IMAGE_UNITS, 16),
        ]);
        Self {
            calls: Vec::new(),
            version: (4, 3),
            integers,
            compile_error: None,
            link_error: None,
            next_name: 0,
        }
    }

    /// Calls recorded since the last drain.
    pub fn take_calls(&mut self) -> Vec<Call> {
        std::mem::take(&mut self.calls)
    }

    fn name(&mut self) -> NativeName {
        self.next_name += 1;
        NonZeroU32::new(self.next_name).expect("native names start at 1")
    }
}

/// Context over a fresh [`RecordingDriver`] with default limits.
pub fn recording_context() -> GlContext<RecordingDriver> {
    GlContext::with_driver(RecordingDriver::new(), GlInit::default()).expect("recording driver meets every requirement")
}

impl GlDriver for RecordingDriver {
    fn version(&self) -> (u32, u32) {
        self.version
    }

    fn get_integer(&self, pname: u32) -> i32 {
        self.integers.get(&pname).copied().unwrap_or(0)
    }

    fn create_shader(&mut self, kind: u32) -> Result<NativeName, String> {
        let name = self.name();
        self.calls.push(Call::CreateShader { kind, name });
        Ok(name)
    }

    fn compile_shader(&mut self, shader: NativeName, _source: &str) -> bool {
        self.calls.push(Call::CompileShader(shader));
        self.compile_error.is_none()
    }

    fn shader_info_log(&self, _shader: NativeName) -> String {
        self.compile_error.clone().unwrap_or_default()
    }

    fn delete_shader(&mut self, shader: NativeName) {
        self.calls.push(Call::DeleteShader(shader));
    }

    fn create_program(&mut self) -> Result<NativeName, String> {
        let name = self.name();
        self.calls.push(Call::CreateProgram(name));
        Ok(name)
    }

    fn attach_shader(&mut self, program: NativeName, shader: NativeName) {
        self.calls.push(Call::AttachShader(program, shader));
    }

    fn detach_shader(&mut self, program: NativeName, shader: NativeName) {
        self.calls.push(Call::DetachShader(program, shader));
    }

    fn link_program(&mut self, program: NativeName) -> bool {
        self.calls.push(Call::LinkProgram(program));
        self.link_error.is_none()
    }

    fn program_info_log(&self, _program: NativeName) -> String {
        self.link_error.clone().unwrap_or_default()
    }

    fn delete_program(&mut self, program: NativeName) {
        self.calls.push(Call::DeleteProgram(program));
    }

    fn use_program(&mut self, program: Option<NativeName>) {
        self.calls.push(Call::UseProgram(program));
    }

    fn uniform(&mut self, location: u32, value: &Uniform<'_>) {
        self.calls.push(Call::Uniform {
            location,
            value: RecordedUniform::of(value),
        });
    }

    fn create_buffer(&mut self) -> Result<NativeName, String> {
        let name = self.name();
        self.calls.push(Call::CreateBuffer(name));
        Ok(name)
    }

    fn bind_array_buffer(&mut self, buffer: Option<NativeName>) {
        self.calls.push(Call::BindArrayBuffer(buffer));
    }

    fn buffer_data(&mut self, data: &[u8], usage: u32) {
        self.calls.push(Call::BufferData {
            data: data.to_vec(),
            usage,
        });
    }

    fn buffer_storage_size(&mut self, size: i32, usage: u32) {
        self.calls.push(Call::BufferStorage { size, usage });
    }

    fn buffer_sub_data(&mut self, offset: i32, data: &[u8]) {
        self.calls.push(Call::BufferSubData {
            offset,
            data: data.to_vec(),
        });
    }

    fn delete_buffer(&mut self, buffer: NativeName) {
        self.calls.push(Call::DeleteBuffer(buffer));
    }

    fn create_vertex_array(&mut self) -> Result<NativeName, String> {
        let name = self.name();
        self.calls.push(Call::CreateVertexArray(name));
        Ok(name)
    }

    fn bind_vertex_array(&mut self, vao: Option<NativeName>) {
        self.calls.push(Call::BindVertexArray(vao));
    }

    fn delete_vertex_array(&mut self, vao: NativeName) {
        self.calls.push(Call::DeleteVertexArray(vao));
    }

    fn vertex_attrib_pointer_f32(&mut self, index: u32, size: i32, ty: u32, normalized: bool, stride: i32, offset: i32) {
        self.calls.push(Call::VertexAttribPointerF32 {
            index,
            size,
            ty,
            normalized,
            stride,
            offset,
        });
    }

    fn vertex_attrib_pointer_i32(&mut self, index: u32, size: i32, ty: u32, stride: i32, offset: i32) {
        self.calls.push(Call::VertexAttribPointerI32 {
            index,
            size,
            ty,
            stride,
            offset,
        });
    }

    fn enable_vertex_attrib_array(&mut self, index: u32) {
        self.calls.push(Call::EnableVertexAttribArray(index));
    }

    fn draw_arrays(&mut self, mode: u32, first: i32, count: i32) {
        self.calls.push(Call::DrawArrays { mode, first, count });
    }

    fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.calls.push(Call::Viewport([x, y, width, height]));
    }

    fn clear_color(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.calls.push(Call::ClearColor([r, g, b, a]));
    }

    fn clear(&mut self, mask: u32) {
        self.calls.push(Call::Clear(mask));
    }

    fn create_framebuffer(&mut self) -> Result<NativeName, String> {
        let name = self.name();
        self.calls.push(Call::CreateFramebuffer(name));
        Ok(name)
    }

    fn bind_framebuffer(&mut self, target: u32, framebuffer: Option<NativeName>) {
        self.calls.push(Call::BindFramebuffer { target, framebuffer });
    }

    fn framebuffer_texture_2d(&mut self, target: u32, attachment: u32, texture: Option<NativeName>, level: i32) {
        self.calls.push(Call::FramebufferTexture2d {
            target,
            attachment,
            texture,
            level,
        });
    }

    fn draw_buffers(&mut self, buffers: &[u32]) {
        self.calls.push(Call::DrawBuffers(buffers.to_vec()));
    }

    fn blit_framebuffer(&mut self, src: [i32; 4], dst: [i32; 4], mask: u32, filter: u32) {
        self.calls.push(Call::BlitFramebuffer { src, dst, mask, filter });
    }

    fn delete_framebuffer(&mut self, framebuffer: NativeName) {
        self.calls.push(Call::DeleteFramebuffer(framebuffer));
    }

    fn create_texture(&mut self) -> Result<NativeName, String> {
        let name = self.name();
        self.calls.push(Call::CreateTexture(name));
        Ok(name)
    }

    fn active_texture(&mut self, unit: u32) {
        self.calls.push(Call::ActiveTexture(unit));
    }

    fn bind_texture_2d(&mut self, texture: Option<NativeName>) {
        self.calls.push(Call::BindTexture2d(texture));
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
        self.calls.push(Call::TexImage2d {
            level,
            internal_format,
            width,
            height,
            format,
            ty,
            len: pixels.map(<[u8]>::len),
        });
    }

    fn tex_parameter_2d(&mut self, pname: u32, value: i32) {
        self.calls.push(Call::TexParameter2d { pname, value });
    }

    fn pixel_store_unpack_alignment(&mut self, alignment: i32) {
        self.calls.push(Call::PixelStoreUnpackAlignment(alignment));
    }

    fn delete_texture(&mut self, texture: NativeName) {
        self.calls.push(Call::DeleteTexture(texture));
    }
}
