use std::collections::{BTreeMap, HashMap};
use std::ffi::c_void;

use glam::Vec4;
use log::{debug, info, warn};

use super::convert::{GlEnum, internal_format_gl};
use super::driver::{GlDriver, NativeName};
use super::glow_driver::GlowDriver;
use super::init::{GlInit, GlLimits};
use crate::gfx::caps::{
    AttributeBinding, AttributeType, ClearMask, DrawMode, Filter, FramebufferAttachment, FramebufferTarget,
    PixelFormat, PixelType, Region, ShaderStage, Uniform, VertexAttribute, WrapMode,
};
use crate::gfx::context::RenderContext;
use crate::gfx::error::{GfxError, Result};
use crate::gfx::handle::{Handle, HandleTable, ResourceKind};

/// Entry points that must resolve before a context is handed out.
const REQUIRED_ENTRY_POINTS: [&str; 6] = [
    "glCreateShader",
    "glCreateProgram",
    "glGenVertexArrays",
    "glGenFramebuffers",
    "glBlitFramebuffer",
    "glDrawBuffers",
];

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum BufferUsage {
    Static,
    Dynamic,
}

impl BufferUsage {
    fn to_gl(self) -> u32 {
        match self {
            BufferUsage::Static => glow::STATIC_DRAW,
            BufferUsage::Dynamic => glow::DYNAMIC_DRAW,
        }
    }
}

#[derive(Debug, Default)]
struct ProgramState {
    attached: Vec<Handle>,
    linked: bool,
}

#[derive(Debug)]
struct BufferState {
    usage: BufferUsage,
    /// Bytes of storage currently specified on the driver side.
    capacity: usize,
}

/// OpenGL implementation of [`RenderContext`].
///
/// Owns the handle table and every native object named in it, and mirrors
/// the binding state the validation rules depend on (current program, bound
/// framebuffers, per-unit textures). All driver access goes through `D`.
pub struct GlContext<D: GlDriver> {
    driver: D,
    handles: HandleTable<NativeName>,
    limits: GlLimits,

    shaders: HashMap<Handle, ShaderStage>,
    programs: HashMap<Handle, ProgramState>,
    buffers: HashMap<Handle, BufferState>,
    vertex_arrays: HashMap<Handle, BTreeMap<u32, AttributeBinding>>,
    framebuffers: HashMap<Handle, BTreeMap<FramebufferAttachment, Handle>>,

    active_program: Option<Handle>,
    draw_framebuffer: Option<Handle>,
    read_framebuffer: Option<Handle>,
    texture_units: HashMap<u32, Handle>,
    active_unit: u32,
    unpack_alignment: u32,
}

impl GlContext<GlowDriver> {
    /// Loads OpenGL through `loader` and builds a context on top of it.
    ///
    /// # Safety
    ///
    /// The GL context `loader` resolves against must be current on this
    /// thread for the whole lifetime of the returned value.
    pub unsafe fn from_loader<F>(mut loader: F, init: GlInit) -> Result<Self>
    where
        F: FnMut(&str) -> *const c_void,
    {
        let missing: Vec<&str> = REQUIRED_ENTRY_POINTS
            .iter()
            .copied()
            .filter(|symbol| loader(symbol).is_null())
            .collect();
        if !missing.is_empty() {
            return Err(GfxError::Init {
                reason: format!("unresolved entry points: {}", missing.join(", ")),
            });
        }

        let driver = unsafe { GlowDriver::from_loader(loader) };
        Self::with_driver(driver, init)
    }
}

impl<D: GlDriver> GlContext<D> {
    /// Validates the driver version, queries device limits and applies `init`.
    pub fn with_driver(mut driver: D, init: GlInit) -> Result<Self> {
        let version = driver.version();
        if version < init.min_version {
            return Err(GfxError::Init {
                reason: format!(
                    "OpenGL {}.{} reported, {}.{} required",
                    version.0, version.1, init.min_version.0, init.min_version.1
                ),
            });
        }

        let query = |pname: u32| u32::try_from(driver.get_integer(pname)).unwrap_or(0);
        let max_color_attachments = (query(glow::MAX_COLOR_ATTACHMENTS) as usize).min(FramebufferAttachment::MAX_COLOR);
        let limits = GlLimits {
            max_draw_buffers: (query(glow::MAX_DRAW_BUFFERS) as usize).min(max_color_attachments),
            max_color_attachments,
            max_vertex_attributes: query(glow::MAX_VERTEX_ATTRIBS),
            max_texture_units: query(glow::MAX_COMBINED_TEXTURE_IMAGE_UNITS),
        };
        if limits.max_vertex_attributes == 0 || limits.max_texture_units == 0 {
            return Err(GfxError::Init {
                reason: format!("driver reports unusable limits: {limits:?}"),
            });
        }

        info!(
            "OpenGL {}.{}: {} draw buffers, {} color attachments, {} vertex attributes, {} texture units",
            version.0,
            version.1,
            limits.max_draw_buffers,
            limits.max_color_attachments,
            limits.max_vertex_attributes,
            limits.max_texture_units,
        );

        let c = init.clear_color;
        driver.clear_color(c.x, c.y, c.z, c.w);

        Ok(Self {
            driver,
            handles: HandleTable::new(),
            limits,
            shaders: HashMap::new(),
            programs: HashMap::new(),
            buffers: HashMap::new(),
            vertex_arrays: HashMap::new(),
            framebuffers: HashMap::new(),
            active_program: None,
            draw_framebuffer: None,
            read_framebuffer: None,
            texture_units: HashMap::new(),
            active_unit: 0,
            // GL default.
            unpack_alignment: 4,
        })
    }

    pub fn limits(&self) -> GlLimits {
        self.limits
    }

    /// Live handles and the native names behind them.
    pub fn handles(&self) -> &HandleTable<NativeName> {
        &self.handles
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Attachments recorded on `framebuffer`, ordered by attachment point.
    pub fn attachments(&self, framebuffer: Handle) -> Result<Vec<(FramebufferAttachment, Handle)>> {
        self.native("attachments", framebuffer, ResourceKind::Framebuffer)?;
        Ok(self
            .framebuffers
            .get(&framebuffer)
            .map(|points| points.iter().map(|(a, t)| (*a, *t)).collect())
            .unwrap_or_default())
    }

    /// Attribute slots configured on `vao`, ordered by index.
    pub fn attributes(&self, vao: Handle) -> Result<Vec<AttributeBinding>> {
        self.native("attributes", vao, ResourceKind::VertexArray)?;
        Ok(self
            .vertex_arrays
            .get(&vao)
            .map(|slots| slots.values().copied().collect())
            .unwrap_or_default())
    }

    /// Framebuffer bound on `target`; `None` is the default framebuffer.
    ///
    /// For `Both` the draw binding is reported.
    pub fn bound_framebuffer(&self, target: FramebufferTarget) -> Option<Handle> {
        match target {
            FramebufferTarget::Read => self.read_framebuffer,
            FramebufferTarget::Draw | FramebufferTarget::Both => self.draw_framebuffer,
        }
    }

    /// Texture bound on unit `slot`, if any.
    pub fn texture_in_slot(&self, slot: u32) -> Option<Handle> {
        self.texture_units.get(&slot).copied()
    }

    // ── helpers ──────────────────────────────────────────────────────────

    fn native(&self, call: &'static str, handle: Handle, kind: ResourceKind) -> Result<NativeName> {
        self.handles
            .resolve_kind(handle, kind)
            .map_err(|e| GfxError::from_handle(call, e))
    }

    fn release(&mut self, call: &'static str, handle: Handle, kind: ResourceKind) -> Result<NativeName> {
        self.handles
            .release_kind(handle, kind)
            .map_err(|e| GfxError::from_handle(call, e))
    }

    /// Registers a freshly created native object. If no handle can be issued
    /// the object is deleted again so nothing leaks.
    fn register(&mut self, call: &'static str, kind: ResourceKind, native: NativeName) -> Result<Handle> {
        match self.handles.allocate(kind, native) {
            Ok(handle) => {
                debug!("{call}: {kind} {handle} -> native {native}");
                Ok(handle)
            }
            Err(err) => {
                self.delete_native(kind, native);
                Err(GfxError::from_handle(call, err))
            }
        }
    }

    fn delete_native(&mut self, kind: ResourceKind, native: NativeName) {
        match kind {
            ResourceKind::Shader => self.driver.delete_shader(native),
            ResourceKind::Program => self.driver.delete_program(native),
            ResourceKind::Buffer => self.driver.delete_buffer(native),
            ResourceKind::VertexArray => self.driver.delete_vertex_array(native),
            ResourceKind::Texture => self.driver.delete_texture(native),
            ResourceKind::Framebuffer => self.driver.delete_framebuffer(native),
        }
    }

    fn texture_on_active_unit(&self, call: &'static str) -> Result<Handle> {
        self.texture_units
            .get(&self.active_unit)
            .copied()
            .ok_or_else(|| GfxError::state(call, format!("no texture bound on unit {}", self.active_unit)))
    }

    fn check_unit(&self, call: &'static str, slot: u32) -> Result<()> {
        if slot >= self.limits.max_texture_units {
            return Err(GfxError::invalid(
                call,
                "slot",
                format!("unit {slot} exceeds the {} units supported", self.limits.max_texture_units),
            ));
        }
        Ok(())
    }

    fn create_buffer(
        &mut self,
        call: &'static str,
        vao: Handle,
        usage: BufferUsage,
        size: usize,
        data: Option<&[u8]>,
    ) -> Result<Handle> {
        let vao_native = self.native(call, vao, ResourceKind::VertexArray)?;
        let size_native = native_int(call, "size", size)?;

        let buffer = self
            .driver
            .create_buffer()
            .map_err(|message| GfxError::Driver { call, message })?;
        self.driver.bind_vertex_array(Some(vao_native));
        self.driver.bind_array_buffer(Some(buffer));
        match data {
            Some(bytes) => self.driver.buffer_data(bytes, usage.to_gl()),
            None => self.driver.buffer_storage_size(size_native, usage.to_gl()),
        }
        self.driver.bind_array_buffer(None);
        self.driver.bind_vertex_array(None);

        let handle = self.register(call, ResourceKind::Buffer, buffer)?;
        self.buffers.insert(handle, BufferState { usage, capacity: size });
        Ok(handle)
    }
}

impl<D: GlDriver> Drop for GlContext<D> {
    fn drop(&mut self) {
        if !self.handles.is_empty() {
            warn!("graphics context dropped with {} live resources", self.handles.len());
        }
    }
}

fn native_int(call: &'static str, argument: &'static str, value: usize) -> Result<i32> {
    i32::try_from(value).map_err(|_| GfxError::invalid(call, argument, format!("{value} exceeds the native integer range")))
}

fn native_uint(call: &'static str, argument: &'static str, value: u32) -> Result<i32> {
    i32::try_from(value).map_err(|_| GfxError::invalid(call, argument, format!("{value} exceeds the native integer range")))
}

/// Bytes `glTexImage2D` reads for an image of the given shape.
///
/// Every row but the last is padded to `alignment`.
fn upload_size(width: u32, height: u32, format: PixelFormat, ty: PixelType, alignment: u32) -> usize {
    if width == 0 || height == 0 {
        return 0;
    }
    let row = width as usize * format.components() * ty.size();
    let alignment = alignment as usize;
    let padded = row.div_ceil(alignment) * alignment;
    padded * (height as usize - 1) + row
}

impl<D: GlDriver> RenderContext for GlContext<D> {
    // ── shaders & programs ────────────────────────────────────────────────

    fn create_shader(&mut self, stage: ShaderStage, source: &str) -> Result<Handle> {
        const CALL: &str = "create_shader";
        let shader = self
            .driver
            .create_shader(stage.to_gl())
            .map_err(|message| GfxError::Driver { call: CALL, message })?;

        if !self.driver.compile_shader(shader, source) {
            let log = self.driver.shader_info_log(shader);
            self.driver.delete_shader(shader);
            debug!("{CALL}: {stage} shader rejected");
            return Err(GfxError::Compilation { stage, log });
        }

        let handle = self.register(CALL, ResourceKind::Shader, shader)?;
        self.shaders.insert(handle, stage);
        Ok(handle)
    }

    fn destroy_shader(&mut self, shader: Handle) -> Result<()> {
        let native = self.release("destroy_shader", shader, ResourceKind::Shader)?;
        self.driver.delete_shader(native);
        self.shaders.remove(&shader);
        // The driver keeps the object alive while attached; the handle is gone either way.
        for program in self.programs.values_mut() {
            program.attached.retain(|&s| s != shader);
        }
        debug!("destroy_shader: {shader}");
        Ok(())
    }

    fn create_program(&mut self) -> Result<Handle> {
        const CALL: &str = "create_program";
        let program = self
            .driver
            .create_program()
            .map_err(|message| GfxError::Driver { call: CALL, message })?;
        let handle = self.register(CALL, ResourceKind::Program, program)?;
        self.programs.insert(handle, ProgramState::default());
        Ok(handle)
    }

    fn destroy_program(&mut self, program: Handle) -> Result<()> {
        const CALL: &str = "destroy_program";
        self.native(CALL, program, ResourceKind::Program)?;
        if self.active_program == Some(program) {
            return Err(GfxError::state(CALL, format!("program {program} is active")));
        }
        let native = self.release(CALL, program, ResourceKind::Program)?;
        self.driver.delete_program(native);
        self.programs.remove(&program);
        debug!("{CALL}: {program}");
        Ok(())
    }

    fn attach_shader(&mut self, program: Handle, shader: Handle) -> Result<()> {
        const CALL: &str = "attach_shader";
        let program_native = self.native(CALL, program, ResourceKind::Program)?;
        let shader_native = self.native(CALL, shader, ResourceKind::Shader)?;
        let state = self.programs.entry(program).or_default();
        if state.attached.contains(&shader) {
            return Err(GfxError::state(CALL, format!("shader {shader} is already attached to {program}")));
        }
        self.driver.attach_shader(program_native, shader_native);
        state.attached.push(shader);
        Ok(())
    }

    fn detach_shader(&mut self, program: Handle, shader: Handle) -> Result<()> {
        const CALL: &str = "detach_shader";
        let program_native = self.native(CALL, program, ResourceKind::Program)?;
        let shader_native = self.native(CALL, shader, ResourceKind::Shader)?;
        let state = self.programs.entry(program).or_default();
        if !state.attached.contains(&shader) {
            return Err(GfxError::state(CALL, format!("shader {shader} is not attached to {program}")));
        }
        self.driver.detach_shader(program_native, shader_native);
        state.attached.retain(|&s| s != shader);
        Ok(())
    }

    fn link_program(&mut self, program: Handle) -> Result<()> {
        const CALL: &str = "link_program";
        let native = self.native(CALL, program, ResourceKind::Program)?;
        let linked = self.driver.link_program(native);
        let state = self.programs.entry(program).or_default();
        state.linked = linked;
        if !linked {
            let log = self.driver.program_info_log(native);
            return Err(GfxError::Link { program, log });
        }
        debug!("{CALL}: {program} with {} shaders", state.attached.len());
        Ok(())
    }

    fn activate_program(&mut self, program: Handle) -> Result<()> {
        const CALL: &str = "activate_program";
        let native = self.native(CALL, program, ResourceKind::Program)?;
        let linked = self.programs.get(&program).is_some_and(|p| p.linked);
        if !linked {
            return Err(GfxError::state(CALL, format!("program {program} is not linked")));
        }
        self.driver.use_program(Some(native));
        self.active_program = Some(program);
        Ok(())
    }

    fn deactivate_program(&mut self, program: Handle) -> Result<()> {
        const CALL: &str = "deactivate_program";
        self.native(CALL, program, ResourceKind::Program)?;
        if self.active_program != Some(program) {
            let reason = match self.active_program {
                Some(active) => format!("program {program} is not active ({active} is)"),
                None => format!("program {program} is not active (none is)"),
            };
            return Err(GfxError::state(CALL, reason));
        }
        self.driver.use_program(None);
        self.active_program = None;
        Ok(())
    }

    fn active_program(&self) -> Option<Handle> {
        self.active_program
    }

    fn set_uniform(&mut self, location: u32, value: Uniform<'_>) -> Result<()> {
        const CALL: &str = "set_uniform";
        if self.active_program.is_none() {
            return Err(GfxError::state(CALL, "no program is active"));
        }
        native_uint(CALL, "location", location)?;
        if value.is_empty() {
            return Err(GfxError::invalid(CALL, "value", "array uniform with no elements"));
        }
        self.driver.uniform(location, &value);
        Ok(())
    }

    // ── geometry ─────────────────────────────────────────────────────────

    fn create_vertex_array(&mut self) -> Result<Handle> {
        const CALL: &str = "create_vertex_array";
        let vao = self
            .driver
            .create_vertex_array()
            .map_err(|message| GfxError::Driver { call: CALL, message })?;
        let handle = self.register(CALL, ResourceKind::VertexArray, vao)?;
        self.vertex_arrays.insert(handle, BTreeMap::new());
        Ok(handle)
    }

    fn destroy_vertex_array(&mut self, vao: Handle) -> Result<()> {
        let native = self.release("destroy_vertex_array", vao, ResourceKind::VertexArray)?;
        self.driver.delete_vertex_array(native);
        self.vertex_arrays.remove(&vao);
        debug!("destroy_vertex_array: {vao}");
        Ok(())
    }

    fn create_static_vertex_buffer(&mut self, vao: Handle, data: &[u8]) -> Result<Handle> {
        self.create_buffer("create_static_vertex_buffer", vao, BufferUsage::Static, data.len(), Some(data))
    }

    fn create_dynamic_vertex_buffer(&mut self, vao: Handle, size: usize, data: Option<&[u8]>) -> Result<Handle> {
        const CALL: &str = "create_dynamic_vertex_buffer";
        if let Some(bytes) = data {
            if bytes.len() != size {
                return Err(GfxError::invalid(
                    CALL,
                    "data",
                    format!("{} bytes supplied for a {size}-byte buffer", bytes.len()),
                ));
            }
        }
        self.create_buffer(CALL, vao, BufferUsage::Dynamic, size, data)
    }

    fn set_dynamic_vertex_buffer_data(&mut self, vao: Handle, vbo: Handle, data: &[u8]) -> Result<()> {
        const CALL: &str = "set_dynamic_vertex_buffer_data";
        let vao_native = self.native(CALL, vao, ResourceKind::VertexArray)?;
        let vbo_native = self.native(CALL, vbo, ResourceKind::Buffer)?;
        let size = native_int(CALL, "data", data.len())?;

        let Some(state) = self.buffers.get_mut(&vbo) else {
            return Err(GfxError::UnknownHandle { call: CALL, handle: vbo });
        };
        if state.usage == BufferUsage::Static {
            return Err(GfxError::state(CALL, format!("buffer {vbo} is static")));
        }

        self.driver.bind_vertex_array(Some(vao_native));
        self.driver.bind_array_buffer(Some(vbo_native));
        if data.len() <= state.capacity {
            self.driver.buffer_sub_data(0, data);
        } else {
            debug!("{CALL}: growing {vbo} from {} to {size} bytes", state.capacity);
            self.driver.buffer_data(data, BufferUsage::Dynamic.to_gl());
            state.capacity = data.len();
        }
        self.driver.bind_array_buffer(None);
        self.driver.bind_vertex_array(None);
        Ok(())
    }

    fn destroy_vertex_buffer(&mut self, vbo: Handle) -> Result<()> {
        let native = self.release("destroy_vertex_buffer", vbo, ResourceKind::Buffer)?;
        self.driver.delete_buffer(native);
        self.buffers.remove(&vbo);
        for slots in self.vertex_arrays.values_mut() {
            slots.retain(|_, binding| binding.buffer != vbo);
        }
        debug!("destroy_vertex_buffer: {vbo}");
        Ok(())
    }

    fn set_vertex_attribute_pointer(&mut self, vao: Handle, vbo: Handle, attribute: VertexAttribute) -> Result<()> {
        const CALL: &str = "set_vertex_attribute_pointer";
        let vao_native = self.native(CALL, vao, ResourceKind::VertexArray)?;
        let vbo_native = self.native(CALL, vbo, ResourceKind::Buffer)?;

        let VertexAttribute {
            index,
            components,
            ty,
            normalized,
            stride,
            offset,
        } = attribute;
        if index >= self.limits.max_vertex_attributes {
            return Err(GfxError::invalid(
                CALL,
                "index",
                format!("{index} exceeds the {} attributes supported", self.limits.max_vertex_attributes),
            ));
        }
        if !(1..=4).contains(&components) {
            return Err(GfxError::invalid(CALL, "components", format!("{components} is outside 1..=4")));
        }
        if ty == AttributeType::Int && normalized {
            return Err(GfxError::invalid(CALL, "normalized", "integer attributes are never normalized"));
        }
        let stride = native_int(CALL, "stride", stride)?;
        let offset = native_int(CALL, "offset", offset)?;
        let size = components as i32;

        self.driver.bind_vertex_array(Some(vao_native));
        self.driver.bind_array_buffer(Some(vbo_native));
        match ty {
            AttributeType::Float => {
                self.driver
                    .vertex_attrib_pointer_f32(index, size, ty.to_gl(), normalized, stride, offset)
            }
            AttributeType::Int => self.driver.vertex_attrib_pointer_i32(index, size, ty.to_gl(), stride, offset),
        }
        self.driver.enable_vertex_attrib_array(index);
        self.driver.bind_array_buffer(None);
        self.driver.bind_vertex_array(None);

        self.vertex_arrays.entry(vao).or_default().insert(
            index,
            AttributeBinding {
                buffer: vbo,
                layout: attribute,
            },
        );
        Ok(())
    }

    fn draw_vertex_array(&mut self, vao: Handle, mode: DrawMode, first: u32, count: usize) -> Result<()> {
        const CALL: &str = "draw_vertex_array";
        let native = self.native(CALL, vao, ResourceKind::VertexArray)?;
        let first = native_uint(CALL, "first", first)?;
        let count = native_int(CALL, "count", count)?;

        self.driver.bind_vertex_array(Some(native));
        self.driver.draw_arrays(mode.to_gl(), first, count);
        self.driver.bind_vertex_array(None);
        Ok(())
    }

    // ── target state ─────────────────────────────────────────────────────

    fn set_viewport(&mut self, x: i32, y: i32, width: u32, height: u32) -> Result<()> {
        const CALL: &str = "set_viewport";
        let width = native_uint(CALL, "width", width)?;
        let height = native_uint(CALL, "height", height)?;
        self.driver.viewport(x, y, width, height);
        Ok(())
    }

    fn set_clear_color(&mut self, color: Vec4) -> Result<()> {
        self.driver.clear_color(color.x, color.y, color.z, color.w);
        Ok(())
    }

    fn clear(&mut self, mask: ClearMask) -> Result<()> {
        if !mask.is_empty() {
            self.driver.clear(mask.to_gl());
        }
        Ok(())
    }

    // ── framebuffers ─────────────────────────────────────────────────────

    fn create_framebuffer(&mut self) -> Result<Handle> {
        const CALL: &str = "create_framebuffer";
        let framebuffer = self
            .driver
            .create_framebuffer()
            .map_err(|message| GfxError::Driver { call: CALL, message })?;
        let handle = self.register(CALL, ResourceKind::Framebuffer, framebuffer)?;
        self.framebuffers.insert(handle, BTreeMap::new());
        Ok(handle)
    }

    fn destroy_framebuffer(&mut self, framebuffer: Handle) -> Result<()> {
        const CALL: &str = "destroy_framebuffer";
        let native = self.release(CALL, framebuffer, ResourceKind::Framebuffer)?;
        self.driver.delete_framebuffer(native);
        self.framebuffers.remove(&framebuffer);

        // Deleting a bound framebuffer reverts that binding to the default.
        if self.draw_framebuffer == Some(framebuffer) {
            self.draw_framebuffer = None;
        }
        if self.read_framebuffer == Some(framebuffer) {
            self.read_framebuffer = None;
        }
        debug!("{CALL}: {framebuffer}");
        Ok(())
    }

    fn bind_framebuffer(&mut self, target: FramebufferTarget, framebuffer: Option<Handle>) -> Result<()> {
        const CALL: &str = "bind_framebuffer";
        let native = framebuffer
            .map(|fb| self.native(CALL, fb, ResourceKind::Framebuffer))
            .transpose()?;
        self.driver.bind_framebuffer(target.to_gl(), native);
        if target.includes_draw() {
            self.draw_framebuffer = framebuffer;
        }
        if target.includes_read() {
            self.read_framebuffer = framebuffer;
        }
        Ok(())
    }

    fn framebuffer_texture_2d(
        &mut self,
        target: FramebufferTarget,
        attachment: FramebufferAttachment,
        texture: Handle,
        level: u32,
    ) -> Result<()> {
        const CALL: &str = "framebuffer_texture_2d";
        let texture_native = self.native(CALL, texture, ResourceKind::Texture)?;
        let level_native = native_uint(CALL, "level", level)?;
        if let Some(index) = attachment.color_index() {
            if index as usize >= self.limits.max_color_attachments {
                return Err(GfxError::invalid(
                    CALL,
                    "attachment",
                    format!("{attachment:?} exceeds the {} color attachments supported", self.limits.max_color_attachments),
                ));
            }
        }
        let Some(framebuffer) = self.bound_framebuffer(target) else {
            return Err(GfxError::state(CALL, "the default framebuffer has no attachable images"));
        };

        self.driver
            .framebuffer_texture_2d(target.to_gl(), attachment.to_gl(), Some(texture_native), level_native);
        self.framebuffers.entry(framebuffer).or_default().insert(attachment, texture);
        Ok(())
    }

    fn set_draw_buffers(&mut self, attachments: &[FramebufferAttachment]) -> Result<()> {
        const CALL: &str = "set_draw_buffers";
        if attachments.len() > self.limits.max_draw_buffers {
            return Err(GfxError::invalid(
                CALL,
                "attachments",
                format!(
                    "{} entries exceed the {} draw buffers supported",
                    attachments.len(),
                    self.limits.max_draw_buffers
                ),
            ));
        }
        if self.draw_framebuffer.is_none() {
            return Err(GfxError::state(CALL, "the default framebuffer is bound for drawing"));
        }

        let mut seen = [false; FramebufferAttachment::MAX_COLOR];
        let mut natives = Vec::with_capacity(attachments.len());
        for &attachment in attachments {
            let index = attachment
                .color_index()
                .ok_or_else(|| GfxError::invalid(CALL, "attachments", format!("{attachment:?} is not a color attachment")))?
                as usize;
            if index >= self.limits.max_color_attachments {
                return Err(GfxError::invalid(
                    CALL,
                    "attachments",
                    format!("{attachment:?} exceeds the {} color attachments supported", self.limits.max_color_attachments),
                ));
            }
            if std::mem::replace(&mut seen[index], true) {
                return Err(GfxError::invalid(CALL, "attachments", format!("{attachment:?} listed twice")));
            }
            natives.push(attachment.to_gl());
        }

        self.driver.draw_buffers(&natives);
        Ok(())
    }

    fn blit_framebuffer(&mut self, src: Region, dst: Region, mask: ClearMask, filter: Filter) -> Result<()> {
        const CALL: &str = "blit_framebuffer";
        if filter.uses_mipmaps() {
            return Err(GfxError::invalid(CALL, "filter", format!("{filter:?} cannot be used for blits")));
        }
        if filter != Filter::Nearest && (mask.contains(ClearMask::DEPTH) || mask.contains(ClearMask::STENCIL)) {
            return Err(GfxError::invalid(CALL, "filter", "depth and stencil blits require nearest filtering"));
        }
        if mask.is_empty() {
            return Ok(());
        }
        self.driver.blit_framebuffer(
            [src.x0, src.y0, src.x1, src.y1],
            [dst.x0, dst.y0, dst.x1, dst.y1],
            mask.to_gl(),
            filter.to_gl(),
        );
        Ok(())
    }

    // ── textures ─────────────────────────────────────────────────────────

    fn create_texture_2d(&mut self) -> Result<Handle> {
        const CALL: &str = "create_texture_2d";
        let texture = self
            .driver
            .create_texture()
            .map_err(|message| GfxError::Driver { call: CALL, message })?;
        self.register(CALL, ResourceKind::Texture, texture)
    }

    fn destroy_texture_2d(&mut self, texture: Handle) -> Result<()> {
        let native = self.release("destroy_texture_2d", texture, ResourceKind::Texture)?;
        self.driver.delete_texture(native);
        self.texture_units.retain(|_, bound| *bound != texture);
        for points in self.framebuffers.values_mut() {
            points.retain(|_, attached| *attached != texture);
        }
        debug!("destroy_texture_2d: {texture}");
        Ok(())
    }

    fn activate_texture_2d(&mut self, texture: Handle, slot: u32) -> Result<()> {
        const CALL: &str = "activate_texture_2d";
        let native = self.native(CALL, texture, ResourceKind::Texture)?;
        self.check_unit(CALL, slot)?;
        self.driver.active_texture(slot);
        self.driver.bind_texture_2d(Some(native));
        self.active_unit = slot;
        self.texture_units.insert(slot, texture);
        Ok(())
    }

    fn deactivate_texture_2d(&mut self, texture: Handle, slot: u32) -> Result<()> {
        const CALL: &str = "deactivate_texture_2d";
        self.native(CALL, texture, ResourceKind::Texture)?;
        self.check_unit(CALL, slot)?;
        if self.texture_units.get(&slot) != Some(&texture) {
            return Err(GfxError::state(CALL, format!("texture {texture} is not bound on unit {slot}")));
        }
        self.driver.active_texture(slot);
        self.driver.bind_texture_2d(None);
        self.active_unit = slot;
        self.texture_units.remove(&slot);
        Ok(())
    }

    fn texture_data_2d(
        &mut self,
        level: u32,
        internal_format: PixelFormat,
        width: u32,
        height: u32,
        format: PixelFormat,
        ty: PixelType,
        data: Option<&[u8]>,
    ) -> Result<()> {
        const CALL: &str = "texture_data_2d";
        self.texture_on_active_unit(CALL)?;
        let level = native_uint(CALL, "level", level)?;
        let width_native = native_uint(CALL, "width", width)?;
        let height_native = native_uint(CALL, "height", height)?;

        let depth_storage = internal_format == PixelFormat::DepthComponent;
        if depth_storage != (format == PixelFormat::DepthComponent) {
            return Err(GfxError::invalid(
                CALL,
                "format",
                format!("{format:?} data cannot fill {internal_format:?} storage"),
            ));
        }

        if let Some(bytes) = data {
            let required = upload_size(width, height, format, ty, self.unpack_alignment);
            if bytes.len() < required {
                return Err(GfxError::invalid(
                    CALL,
                    "data",
                    format!(
                        "{} bytes supplied, {required} needed for {width}x{height} {format:?}/{ty:?} at alignment {}",
                        bytes.len(),
                        self.unpack_alignment
                    ),
                ));
            }
        }

        self.driver.tex_image_2d(
            level,
            internal_format_gl(internal_format),
            width_native,
            height_native,
            format.to_gl(),
            ty.to_gl(),
            data,
        );
        Ok(())
    }

    fn set_texture_min_filter(&mut self, filter: Filter) -> Result<()> {
        self.texture_on_active_unit("set_texture_min_filter")?;
        self.driver
            .tex_parameter_2d(glow::TEXTURE_MIN_FILTER, filter.to_gl() as i32);
        Ok(())
    }

    fn set_texture_mag_filter(&mut self, filter: Filter) -> Result<()> {
        const CALL: &str = "set_texture_mag_filter";
        if filter.uses_mipmaps() {
            return Err(GfxError::invalid(CALL, "filter", format!("{filter:?} is not a magnification filter")));
        }
        self.texture_on_active_unit(CALL)?;
        self.driver
            .tex_parameter_2d(glow::TEXTURE_MAG_FILTER, filter.to_gl() as i32);
        Ok(())
    }

    fn set_texture_wrap_s(&mut self, mode: WrapMode) -> Result<()> {
        self.texture_on_active_unit("set_texture_wrap_s")?;
        self.driver.tex_parameter_2d(glow::TEXTURE_WRAP_S, mode.to_gl() as i32);
        Ok(())
    }

    fn set_texture_wrap_t(&mut self, mode: WrapMode) -> Result<()> {
        self.texture_on_active_unit("set_texture_wrap_t")?;
        self.driver.tex_parameter_2d(glow::TEXTURE_WRAP_T, mode.to_gl() as i32);
        Ok(())
    }

    fn set_unpack_alignment(&mut self, alignment: u32) -> Result<()> {
        if !matches!(alignment, 1 | 2 | 4 | 8) {
            return Err(GfxError::invalid(
                "set_unpack_alignment",
                "alignment",
                format!("{alignment} is not one of 1, 2, 4, 8"),
            ));
        }
        self.driver.pixel_store_unpack_alignment(alignment as i32);
        self.unpack_alignment = alignment;
        Ok(())
    }

    fn unpack_alignment(&self) -> u32 {
        self.unpack_alignment
    }
}
