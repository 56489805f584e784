use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use bytemuck::{Pod, Zeroable};
use glam::{IVec2, Mat4, Vec3};
use log::{debug, info, warn};

use super::font::{FontError, FontFace, GlyphSource, RasterGlyph};
use crate::gfx::caps::{DrawMode, Filter, PixelFormat, PixelType, ShaderStage, Uniform, VertexAttribute, WrapMode};
use crate::gfx::{GfxError, Handle, RenderContext};

// ── constants ─────────────────────────────────────────────────────────────

/// Codepoints rasterized by a load: `0..GLYPH_RANGE`.
const GLYPH_RANGE: u8 = 128;
/// Substituted for characters outside the range or without a glyph.
const FALLBACK: char = '?';
/// Texture unit glyph textures are bound to while drawing.
const GLYPH_SLOT: u32 = 0;

const TRANSFORM_LOCATION: u32 = 0;
const SAMPLER_LOCATION: u32 = 1;
const COLOR_LOCATION: u32 = 2;

const QUAD_VERTICES: usize = 6;
const QUAD_BYTES: usize = QUAD_VERTICES * std::mem::size_of::<GlyphVertex>();

const VERTEX_SOURCE: &str = include_str!("shaders/text.vert");
const FRAGMENT_SOURCE: &str = include_str!("shaders/text.frag");

// ── errors ────────────────────────────────────────────────────────────────

/// Error returned by [`TextRenderer`] operations.
#[derive(Debug)]
pub enum TextError {
    Font(FontError),
    Gfx(GfxError),
}

impl fmt::Display for TextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextError::Font(e) => write!(f, "text renderer: {e}"),
            TextError::Gfx(e) => write!(f, "text renderer: {e}"),
        }
    }
}

impl std::error::Error for TextError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TextError::Font(e) => Some(e),
            TextError::Gfx(e) => Some(e),
        }
    }
}

impl From<FontError> for TextError {
    fn from(e: FontError) -> Self {
        TextError::Font(e)
    }
}

impl From<GfxError> for TextError {
    fn from(e: GfxError) -> Self {
        TextError::Gfx(e)
    }
}

// ── vertices ──────────────────────────────────────────────────────────────

/// One corner of a glyph quad, matching the `vec4 vertex` shader input.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct GlyphVertex {
    position: [f32; 2],
    uv: [f32; 2],
}

impl GlyphVertex {
    /// Components per vertex as seen by the attribute pointer.
    const COMPONENTS: u32 = 4;

    const fn new(x: f32, y: f32, u: f32, v: f32) -> Self {
        Self {
            position: [x, y],
            uv: [u, v],
        }
    }
}

// ── glyph record ──────────────────────────────────────────────────────────

/// Texture and metrics of one loaded character.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Glyph {
    pub texture: Handle,
    /// Bitmap size in pixels.
    pub size: IVec2,
    /// Offset from the pen position to the bitmap's left/top edge.
    pub bearing: IVec2,
    /// Pen advance in 1/64 pixel.
    pub advance: i32,
}

impl Glyph {
    /// Two triangles covering the bitmap with the pen at `(x, y)`.
    fn quad(&self, x: f32, y: f32) -> [GlyphVertex; QUAD_VERTICES] {
        let w = self.size.x as f32;
        let h = self.size.y as f32;
        let xpos = x + self.bearing.x as f32;
        let ypos = y - (h - self.bearing.y as f32);

        [
            GlyphVertex::new(xpos, ypos + h, 0.0, 0.0),
            GlyphVertex::new(xpos, ypos, 0.0, 1.0),
            GlyphVertex::new(xpos + w, ypos, 1.0, 1.0),
            GlyphVertex::new(xpos, ypos + h, 0.0, 0.0),
            GlyphVertex::new(xpos + w, ypos, 1.0, 1.0),
            GlyphVertex::new(xpos + w, ypos + h, 1.0, 0.0),
        ]
    }
}

// ── renderer ──────────────────────────────────────────────────────────────

enum ShaderProgram {
    /// Compiled by the renderer; released with it.
    Owned {
        program: Handle,
        vertex: Handle,
        fragment: Handle,
    },
    /// Supplied by the caller, who keeps ownership.
    Shared(Handle),
}

impl ShaderProgram {
    fn handle(&self) -> Handle {
        match *self {
            ShaderProgram::Owned { program, .. } => program,
            ShaderProgram::Shared(program) => program,
        }
    }
}

/// Draws single-font text with one texture per glyph.
///
/// A renderer covers one font at one pixel size; use another renderer for
/// another font. Glyph quads are streamed one at a time through a single
/// dynamic buffer, so draws within a [`render`](Self::render) call are
/// strictly sequential.
///
/// The renderer does not hold the context. Every operation takes it, and
/// [`destroy`](Self::destroy) must be called with the same context to release
/// GPU resources.
pub struct TextRenderer {
    program: ShaderProgram,
    vao: Handle,
    vbo: Handle,
    glyphs: HashMap<char, Glyph>,
}

impl TextRenderer {
    /// Builds a renderer with its own copy of the default text program.
    pub fn new(ctx: &mut dyn RenderContext) -> Result<Self, TextError> {
        let (program, vertex, fragment) = build_default_program(ctx)?;
        let owned = ShaderProgram::Owned {
            program,
            vertex,
            fragment,
        };
        match create_quad_stream(ctx) {
            Ok((vao, vbo)) => Ok(Self::with_parts(owned, vao, vbo)),
            Err(err) => {
                release_program(ctx, &owned);
                Err(err.into())
            }
        }
    }

    /// Builds a renderer that draws with `program`, which stays owned by the
    /// caller.
    ///
    /// The program must read the same vertex layout and uniform locations as
    /// the default one.
    pub fn with_shared_program(ctx: &mut dyn RenderContext, program: Handle) -> Result<Self, TextError> {
        let (vao, vbo) = create_quad_stream(ctx)?;
        Ok(Self::with_parts(ShaderProgram::Shared(program), vao, vbo))
    }

    fn with_parts(program: ShaderProgram, vao: Handle, vbo: Handle) -> Self {
        Self {
            program,
            vao,
            vbo,
            glyphs: HashMap::new(),
        }
    }

    /// Switches to a caller-owned program, releasing the owned one if any.
    pub fn set_shader_program(&mut self, ctx: &mut dyn RenderContext, program: Handle) -> Result<(), TextError> {
        if let ShaderProgram::Owned {
            program: owned,
            vertex,
            fragment,
        } = self.program
        {
            // Fails while the owned program is active, before anything is released.
            ctx.destroy_program(owned)?;
            ctx.destroy_shader(vertex)?;
            ctx.destroy_shader(fragment)?;
        }
        self.program = ShaderProgram::Shared(program);
        Ok(())
    }

    pub fn shader_program(&self) -> Handle {
        self.program.handle()
    }

    /// Metrics of a loaded character, without fallback.
    pub fn glyph(&self, ch: char) -> Option<&Glyph> {
        self.glyphs.get(&ch)
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_loaded(&self) -> bool {
        !self.glyphs.is_empty()
    }

    /// Opens the font at `path` and replaces the loaded glyph set.
    ///
    /// The font is opened before anything is torn down, so a failed open
    /// leaves the current glyphs in place.
    pub fn load(&mut self, ctx: &mut dyn RenderContext, path: impl AsRef<Path>, pixel_size: u32) -> Result<(), TextError> {
        let path = path.as_ref();
        let mut face = FontFace::open(path, pixel_size)?;
        info!("loading font {} at {}px", path.display(), face.pixel_size());
        self.load_from(ctx, &mut face)
    }

    /// Replaces the loaded glyph set with glyphs from `source`.
    ///
    /// Characters the source cannot rasterize are logged and skipped. The
    /// context's unpack alignment is restored afterwards.
    pub fn load_from(&mut self, ctx: &mut dyn RenderContext, source: &mut dyn GlyphSource) -> Result<(), TextError> {
        self.release_glyphs(ctx)?;

        let previous_alignment = ctx.unpack_alignment();
        // Glyph rows are tightly packed single bytes.
        ctx.set_unpack_alignment(1)?;
        let uploaded = self.upload_glyphs(ctx, source);
        let restored = ctx.set_unpack_alignment(previous_alignment);
        uploaded?;
        restored?;

        info!("loaded {} of {GLYPH_RANGE} glyphs", self.glyphs.len());
        Ok(())
    }

    fn upload_glyphs(&mut self, ctx: &mut dyn RenderContext, source: &mut dyn GlyphSource) -> Result<(), GfxError> {
        for code in 0..GLYPH_RANGE {
            let ch = char::from(code);
            match source.rasterize(ch) {
                Ok(raster) => {
                    let glyph = upload_glyph(ctx, &raster)?;
                    self.glyphs.insert(ch, glyph);
                }
                // Fonts rarely map control codes; not worth a warning.
                Err(err) if ch.is_control() => debug!("skipping glyph: {err}"),
                Err(err) => warn!("skipping glyph: {err}"),
            }
        }
        Ok(())
    }

    fn release_glyphs(&mut self, ctx: &mut dyn RenderContext) -> Result<(), GfxError> {
        let mut first_error = None;
        for (_, glyph) in self.glyphs.drain() {
            if let Err(err) = ctx.destroy_texture_2d(glyph.texture) {
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Glyph used to draw `ch`: its own if loaded, else the fallback.
    fn resolve(&self, ch: char) -> Option<Glyph> {
        let own = if u32::from(ch) < u32::from(GLYPH_RANGE) {
            self.glyphs.get(&ch)
        } else {
            None
        };
        own.or_else(|| self.glyphs.get(&FALLBACK)).copied()
    }

    /// Draws `text` on one line starting at the local origin.
    ///
    /// `transform` maps glyph space (pixels, y up) to clip space and `color`
    /// is the solid text color. The program is deactivated again even if a
    /// draw fails midway.
    pub fn render(&self, ctx: &mut dyn RenderContext, text: &str, transform: Mat4, color: Vec3) -> Result<(), TextError> {
        let program = self.shader_program();
        ctx.activate_program(program)?;
        let drawn = self.draw_glyphs(ctx, text, transform, color);
        let deactivated = ctx.deactivate_program(program);
        drawn?;
        deactivated?;
        Ok(())
    }

    fn draw_glyphs(&self, ctx: &mut dyn RenderContext, text: &str, transform: Mat4, color: Vec3) -> Result<(), GfxError> {
        ctx.set_uniform(TRANSFORM_LOCATION, Uniform::Mat4(transform))?;
        ctx.set_uniform(SAMPLER_LOCATION, Uniform::Int(GLYPH_SLOT as i32))?;
        ctx.set_uniform(COLOR_LOCATION, Uniform::Vec3(color))?;

        let mut x = 0.0_f32;
        let y = 0.0_f32;
        for ch in text.chars() {
            let Some(glyph) = self.resolve(ch) else {
                debug!("no glyph for {ch:?} and no {FALLBACK:?} fallback; nothing drawn");
                continue;
            };

            let vertices = glyph.quad(x, y);
            ctx.set_dynamic_vertex_buffer_data(self.vao, self.vbo, bytemuck::cast_slice(&vertices[..]))?;
            ctx.activate_texture_2d(glyph.texture, GLYPH_SLOT)?;
            ctx.draw_vertex_array(self.vao, DrawMode::Triangles, 0, QUAD_VERTICES)?;
            ctx.deactivate_texture_2d(glyph.texture, GLYPH_SLOT)?;

            x += (glyph.advance >> 6) as f32;
        }
        Ok(())
    }

    /// Releases every glyph texture, the quad stream and, if owned, the
    /// program and its shaders.
    ///
    /// Everything is attempted; the first failure is returned.
    pub fn destroy(mut self, ctx: &mut dyn RenderContext) -> Result<(), TextError> {
        let mut results = vec![
            self.release_glyphs(ctx),
            ctx.destroy_vertex_buffer(self.vbo),
            ctx.destroy_vertex_array(self.vao),
        ];
        if let ShaderProgram::Owned {
            program,
            vertex,
            fragment,
        } = self.program
        {
            results.push(ctx.destroy_program(program));
            results.push(ctx.destroy_shader(vertex));
            results.push(ctx.destroy_shader(fragment));
        }
        debug!("text renderer destroyed");
        results.into_iter().collect::<Result<(), GfxError>>()?;
        Ok(())
    }
}

// ── construction helpers ──────────────────────────────────────────────────

fn build_default_program(ctx: &mut dyn RenderContext) -> Result<(Handle, Handle, Handle), GfxError> {
    let vertex = ctx.create_shader(ShaderStage::Vertex, VERTEX_SOURCE)?;
    let fragment = match ctx.create_shader(ShaderStage::Fragment, FRAGMENT_SOURCE) {
        Ok(fragment) => fragment,
        Err(err) => {
            let _ = ctx.destroy_shader(vertex);
            return Err(err);
        }
    };

    match link_program(ctx, vertex, fragment) {
        Ok(program) => Ok((program, vertex, fragment)),
        Err(err) => {
            let _ = ctx.destroy_shader(vertex);
            let _ = ctx.destroy_shader(fragment);
            Err(err)
        }
    }
}

fn link_program(ctx: &mut dyn RenderContext, vertex: Handle, fragment: Handle) -> Result<Handle, GfxError> {
    let program = ctx.create_program()?;
    let linked = ctx
        .attach_shader(program, vertex)
        .and_then(|_| ctx.attach_shader(program, fragment))
        .and_then(|_| ctx.link_program(program));
    if let Err(err) = linked {
        let _ = ctx.destroy_program(program);
        return Err(err);
    }
    Ok(program)
}

/// Best-effort release used when construction fails halfway.
fn release_program(ctx: &mut dyn RenderContext, program: &ShaderProgram) {
    if let ShaderProgram::Owned {
        program,
        vertex,
        fragment,
    } = *program
    {
        let _ = ctx.destroy_program(program);
        let _ = ctx.destroy_shader(vertex);
        let _ = ctx.destroy_shader(fragment);
    }
}

/// Vertex array plus the dynamic buffer every glyph quad is streamed through.
fn create_quad_stream(ctx: &mut dyn RenderContext) -> Result<(Handle, Handle), GfxError> {
    let vao = ctx.create_vertex_array()?;
    let vbo = match ctx.create_dynamic_vertex_buffer(vao, QUAD_BYTES, None) {
        Ok(vbo) => vbo,
        Err(err) => {
            let _ = ctx.destroy_vertex_array(vao);
            return Err(err);
        }
    };
    let layout = VertexAttribute::floats(0, GlyphVertex::COMPONENTS);
    if let Err(err) = ctx.set_vertex_attribute_pointer(vao, vbo, layout) {
        let _ = ctx.destroy_vertex_buffer(vbo);
        let _ = ctx.destroy_vertex_array(vao);
        return Err(err);
    }
    Ok((vao, vbo))
}

fn upload_glyph(ctx: &mut dyn RenderContext, raster: &RasterGlyph) -> Result<Glyph, GfxError> {
    let texture = ctx.create_texture_2d()?;
    if let Err(err) = fill_glyph_texture(ctx, texture, raster) {
        let _ = ctx.destroy_texture_2d(texture);
        return Err(err);
    }
    Ok(Glyph {
        texture,
        size: IVec2::new(raster.width as i32, raster.height as i32),
        bearing: raster.bearing,
        advance: raster.advance,
    })
}

fn fill_glyph_texture(ctx: &mut dyn RenderContext, texture: Handle, raster: &RasterGlyph) -> Result<(), GfxError> {
    // Blank glyphs (space) get storage but no upload.
    let pixels = (!raster.bitmap.is_empty()).then_some(raster.bitmap.as_slice());

    ctx.activate_texture_2d(texture, GLYPH_SLOT)?;
    ctx.texture_data_2d(
        0,
        PixelFormat::R,
        raster.width,
        raster.height,
        PixelFormat::R,
        PixelType::UByte,
        pixels,
    )?;
    ctx.set_texture_wrap_s(WrapMode::ClampToEdge)?;
    ctx.set_texture_wrap_t(WrapMode::ClampToEdge)?;
    ctx.set_texture_min_filter(Filter::Linear)?;
    ctx.set_texture_mag_filter(Filter::Linear)?;
    ctx.deactivate_texture_2d(texture, GLYPH_SLOT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::ResourceKind;
    use crate::gfx::gl::{GlContext, GlInit};
    use crate::gfx::gl::recording::{Call, RecordedUniform, RecordingDriver, recording_context};
    use crate::text::GlyphError;

    /// In-memory glyph source: solid bitmaps for a fixed character set.
    struct FakeGlyphs {
        glyphs: HashMap<char, RasterGlyph>,
    }

    impl FakeGlyphs {
        fn new(chars: &[(char, u32, u32)]) -> Self {
            let glyphs = chars
                .iter()
                .map(|&(ch, w, h)| {
                    let raster = RasterGlyph {
                        width: w,
                        height: h,
                        bitmap: vec![0xFF; (w * h) as usize],
                        bearing: IVec2::new(1, h as i32 - 3),
                        advance: 8 << 6,
                    };
                    (ch, raster)
                })
                .collect();
            Self { glyphs }
        }
    }

    impl GlyphSource for FakeGlyphs {
        fn rasterize(&mut self, ch: char) -> Result<RasterGlyph, GlyphError> {
            self.glyphs.get(&ch).cloned().ok_or(GlyphError::Missing(ch))
        }
    }

    fn loaded(chars: &[(char, u32, u32)]) -> (GlContext<RecordingDriver>, TextRenderer) {
        let mut ctx = recording_context();
        let mut text = TextRenderer::new(&mut ctx).unwrap();
        text.load_from(&mut ctx, &mut FakeGlyphs::new(chars)).unwrap();
        ctx.driver_mut().take_calls();
        (ctx, text)
    }

    fn draws(ctx: &GlContext<RecordingDriver>) -> usize {
        ctx.driver()
            .calls
            .iter()
            .filter(|c| matches!(c, Call::DrawArrays { .. }))
            .count()
    }

    /// Quads uploaded through the stream buffer, as floats.
    fn uploaded_quads(ctx: &GlContext<RecordingDriver>) -> Vec<Vec<f32>> {
        ctx.driver()
            .calls
            .iter()
            .filter_map(|c| match c {
                Call::BufferSubData { data, .. } => Some(
                    data.chunks_exact(4)
                        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
                        .collect(),
                ),
                _ => None,
            })
            .collect()
    }

    // ── construction ─────────────────────────────────────────────────────

    #[test]
    fn new_builds_program_and_quad_stream() {
        let mut ctx = recording_context();
        let text = TextRenderer::new(&mut ctx).unwrap();
        let handles = ctx.handles();
        assert_eq!(handles.count(ResourceKind::Shader), 2);
        assert_eq!(handles.count(ResourceKind::Program), 1);
        assert_eq!(handles.count(ResourceKind::VertexArray), 1);
        assert_eq!(handles.count(ResourceKind::Buffer), 1);
        assert!(ctx.driver().calls.contains(&Call::BufferStorage {
            size: QUAD_BYTES as i32,
            usage: glow::DYNAMIC_DRAW
        }));
        assert!(!text.is_loaded());
        assert_eq!(ctx.active_program(), None);
    }

    #[test]
    fn default_minimum_version_runs_the_builtin_shaders() {
        let init = GlInit::default();
        let (major, minor) = init.min_version;
        let header = format!("#version {major}{minor}0 core");
        assert!(VERTEX_SOURCE.starts_with(&header));
        assert!(FRAGMENT_SOURCE.starts_with(&header));

        let mut driver = RecordingDriver::new();
        driver.version = init.min_version;
        let mut ctx = GlContext::with_driver(driver, init).unwrap();
        let text = TextRenderer::new(&mut ctx).unwrap();
        text.destroy(&mut ctx).unwrap();
        assert!(ctx.handles().is_empty());
    }

    #[test]
    fn failed_compile_leaves_nothing_behind() {
        let mut ctx = recording_context();
        ctx.driver_mut().compile_error = Some("bad".into());
        let err = TextRenderer::new(&mut ctx).err().unwrap();
        assert!(matches!(err, TextError::Gfx(GfxError::Compilation { .. })));
        assert!(ctx.handles().is_empty());
    }

    #[test]
    fn destroy_releases_everything_owned() {
        let (mut ctx, text) = loaded(&[('A', 4, 4), ('?', 4, 4)]);
        text.destroy(&mut ctx).unwrap();
        assert!(ctx.handles().is_empty());
    }

    #[test]
    fn shared_program_survives_destroy() {
        let mut ctx = recording_context();
        let owner = TextRenderer::new(&mut ctx).unwrap();
        let shared = owner.shader_program();

        let text = TextRenderer::with_shared_program(&mut ctx, shared).unwrap();
        assert_eq!(text.shader_program(), shared);
        text.destroy(&mut ctx).unwrap();
        assert!(ctx.handles().contains(shared));
        owner.destroy(&mut ctx).unwrap();
    }

    #[test]
    fn switching_to_a_shared_program_releases_the_owned_one() {
        let mut ctx = recording_context();
        let owner = TextRenderer::new(&mut ctx).unwrap();
        let mut text = TextRenderer::new(&mut ctx).unwrap();
        let own = text.shader_program();

        text.set_shader_program(&mut ctx, owner.shader_program()).unwrap();
        assert!(!ctx.handles().contains(own));
        assert_eq!(ctx.handles().count(ResourceKind::Program), 1);
        assert_eq!(ctx.handles().count(ResourceKind::Shader), 2);
    }

    // ── loading ──────────────────────────────────────────────────────────

    #[test]
    fn load_uploads_tightly_packed_glyphs_and_restores_alignment() {
        let mut ctx = recording_context();
        let mut text = TextRenderer::new(&mut ctx).unwrap();
        assert_eq!(ctx.unpack_alignment(), 4);

        // 3-pixel rows only fit with alignment 1.
        text.load_from(&mut ctx, &mut FakeGlyphs::new(&[('A', 3, 5), ('?', 2, 2)]))
            .unwrap();

        assert_eq!(text.glyph_count(), 2);
        assert_eq!(ctx.handles().count(ResourceKind::Texture), 2);
        assert_eq!(ctx.unpack_alignment(), 4);
        assert_eq!(
            ctx.driver().calls.last(),
            Some(&Call::PixelStoreUnpackAlignment(4))
        );

        let a = text.glyph('A').unwrap();
        assert_eq!(a.size, IVec2::new(3, 5));
        assert_eq!(a.bearing, IVec2::new(1, 2));
        assert_eq!(a.advance, 512);
        assert!(text.glyph('B').is_none());
    }

    #[test]
    fn reload_frees_previous_textures() {
        let (mut ctx, mut text) = loaded(&[('A', 2, 2), ('?', 2, 2)]);
        let old = text.glyph('A').unwrap().texture;

        text.load_from(&mut ctx, &mut FakeGlyphs::new(&[('B', 2, 2), ('?', 2, 2)]))
            .unwrap();

        assert!(!ctx.handles().contains(old));
        assert_eq!(ctx.handles().count(ResourceKind::Texture), 2);
        let deleted = ctx
            .driver()
            .calls
            .iter()
            .filter(|c| matches!(c, Call::DeleteTexture(_)))
            .count();
        assert_eq!(deleted, 2);
        assert!(text.glyph('A').is_none());
    }

    #[test]
    fn failed_open_keeps_current_glyphs() {
        let (mut ctx, mut text) = loaded(&[('A', 2, 2)]);
        let err = text.load(&mut ctx, "/nonexistent/basalt/font.ttf", 16).unwrap_err();
        assert!(matches!(err, TextError::Font(FontError::Unreadable { .. })));
        assert_eq!(text.glyph_count(), 1);
    }

    #[test]
    fn blank_glyphs_allocate_without_upload() {
        let (_, text) = loaded(&[(' ', 0, 0)]);
        assert_eq!(text.glyph(' ').unwrap().size, IVec2::ZERO);
    }

    // ── rendering ────────────────────────────────────────────────────────

    #[test]
    fn empty_string_draws_nothing_and_leaves_program_inactive() {
        let (mut ctx, text) = loaded(&[('A', 2, 2), ('?', 2, 2)]);
        text.render(&mut ctx, "", Mat4::IDENTITY, Vec3::ONE).unwrap();
        assert_eq!(draws(&ctx), 0);
        assert_eq!(ctx.active_program(), None);
    }

    #[test]
    fn render_uploads_uniforms_then_one_draw_per_glyph() {
        let (mut ctx, text) = loaded(&[('A', 10, 12), ('?', 2, 2)]);
        let color = Vec3::new(1.0, 0.5, 0.25);
        text.render(&mut ctx, "AA", Mat4::IDENTITY, color).unwrap();

        let calls = &ctx.driver().calls;
        assert!(calls.contains(&Call::Uniform {
            location: SAMPLER_LOCATION,
            value: RecordedUniform::Ints(vec![0]),
        }));
        assert!(calls.contains(&Call::Uniform {
            location: COLOR_LOCATION,
            value: RecordedUniform::Floats(vec![1.0, 0.5, 0.25]),
        }));
        assert_eq!(draws(&ctx), 2);
        assert!(calls.contains(&Call::DrawArrays {
            mode: glow::TRIANGLES,
            first: 0,
            count: 6
        }));
        assert_eq!(ctx.active_program(), None);
    }

    #[test]
    fn cursor_advances_by_whole_pixels() {
        // 10x12 bitmap, bearing (1, 9), advance 8px.
        let (mut ctx, text) = loaded(&[('A', 10, 12)]);
        text.render(&mut ctx, "AA", Mat4::IDENTITY, Vec3::ONE).unwrap();

        let quads = uploaded_quads(&ctx);
        assert_eq!(quads.len(), 2);
        // First vertex: (xpos, ypos + h) with ypos = -(12 - 9).
        assert_eq!(&quads[0][..4], &[1.0, 9.0, 0.0, 0.0]);
        assert_eq!(&quads[1][..4], &[9.0, 9.0, 0.0, 0.0]);
        // Third vertex: (xpos + w, ypos).
        assert_eq!(&quads[1][8..12], &[19.0, -3.0, 1.0, 1.0]);
    }

    #[test]
    fn characters_outside_the_range_use_the_fallback() {
        let (mut ctx, text) = loaded(&[('A', 10, 12), ('?', 4, 6)]);
        text.render(&mut ctx, "é", Mat4::IDENTITY, Vec3::ONE).unwrap();

        let quads = uploaded_quads(&ctx);
        assert_eq!(quads.len(), 1);
        // Width of the '?' bitmap, not 'A'.
        assert_eq!(quads[0][8] - quads[0][4], 4.0);
    }

    #[test]
    fn fallback_binds_its_texture_and_advances_by_its_metrics() {
        let mut ctx = recording_context();
        let mut text = TextRenderer::new(&mut ctx).unwrap();
        let mut source = FakeGlyphs::new(&[('A', 10, 12), ('?', 4, 6)]);
        if let Some(question) = source.glyphs.get_mut(&'?') {
            question.advance = 5 << 6;
        }
        text.load_from(&mut ctx, &mut source).unwrap();
        ctx.driver_mut().take_calls();

        text.render(&mut ctx, "éA", Mat4::IDENTITY, Vec3::ONE).unwrap();

        let native = |ch| ctx.handles().resolve(text.glyph(ch).unwrap().texture).unwrap();
        let bound: Vec<_> = ctx
            .driver()
            .calls
            .iter()
            .filter_map(|c| match c {
                Call::BindTexture2d(Some(name)) => Some(*name),
                _ => None,
            })
            .collect();
        assert_eq!(bound, vec![native('?'), native('A')]);

        let quads = uploaded_quads(&ctx);
        assert_eq!(quads.len(), 2);
        // 'A' starts at the '?' advance (5px) plus its own bearing (1px).
        assert_eq!(quads[1][0], 6.0);
    }

    #[test]
    fn glyph_vertices_are_packed_floats() {
        assert_eq!(
            std::mem::size_of::<GlyphVertex>(),
            GlyphVertex::COMPONENTS as usize * std::mem::size_of::<f32>()
        );
        let vertices = [GlyphVertex::new(1.0, 2.0, 0.0, 1.0)];
        let floats: &[f32] = bytemuck::cast_slice(&vertices[..]);
        assert_eq!(floats, &[1.0, 2.0, 0.0, 1.0]);
    }

    #[test]
    fn unmapped_characters_use_the_fallback() {
        let (mut ctx, text) = loaded(&[('?', 4, 6)]);
        text.render(&mut ctx, "Z", Mat4::IDENTITY, Vec3::ONE).unwrap();
        assert_eq!(draws(&ctx), 1);
    }

    #[test]
    fn missing_fallback_draws_nothing() {
        let (mut ctx, text) = loaded(&[('A', 2, 2)]);
        text.render(&mut ctx, "éA", Mat4::IDENTITY, Vec3::ONE).unwrap();
        assert_eq!(draws(&ctx), 1);
        // The skipped character does not advance the cursor.
        assert_eq!(uploaded_quads(&ctx)[0][0], 1.0);
    }

    #[test]
    fn failed_draw_still_deactivates_program() {
        let (mut ctx, text) = loaded(&[('A', 2, 2)]);
        let texture = text.glyph('A').unwrap().texture;
        ctx.destroy_texture_2d(texture).unwrap();

        let err = text.render(&mut ctx, "A", Mat4::IDENTITY, Vec3::ONE).unwrap_err();
        assert!(matches!(err, TextError::Gfx(GfxError::UnknownHandle { .. })));
        assert_eq!(ctx.active_program(), None);
    }
}
