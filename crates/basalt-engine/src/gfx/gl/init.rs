use glam::Vec4;

/// Initialization parameters for the OpenGL backend.
///
/// Keep this structure minimal. Add flags only when a concrete driver or
/// platform requirement exists.
#[derive(Debug, Clone)]
pub struct GlInit {
    /// Lowest core version accepted, as `(major, minor)`.
    ///
    /// The default is 4.3, the first core version with explicit uniform
    /// locations. The built-in text shaders rely on them. The backend calls
    /// alone would run on 3.3.
    pub min_version: (u32, u32),

    /// Initial clear color, applied once during construction.
    pub clear_color: Vec4,
}

impl Default for GlInit {
    fn default() -> Self {
        Self {
            min_version: (4, 3),
            clear_color: Vec4::new(0.0, 0.0, 0.0, 1.0),
        }
    }
}

/// Device limits queried once at construction.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct GlLimits {
    /// Entries accepted by `set_draw_buffers`.
    pub max_draw_buffers: usize,
    pub max_color_attachments: usize,
    pub max_vertex_attributes: u32,
    /// Texture units addressable by `activate_texture_2d`.
    pub max_texture_units: u32,
}
