use winit::dpi::LogicalSize;
use winit::window::{Fullscreen, Window, WindowAttributes};

/// How the window occupies the screen.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum WindowMode {
    #[default]
    Windowed,
    /// Borderless fullscreen on the current monitor.
    Fullscreen,
}

/// Window construction parameters.
#[derive(Debug, Clone)]
pub struct WindowConfig {
    /// Inner width in logical pixels.
    pub width: u32,
    /// Inner height in logical pixels.
    pub height: u32,
    pub title: String,
    pub mode: WindowMode,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            title: "basalt".to_string(),
            mode: WindowMode::Windowed,
        }
    }
}

impl WindowConfig {
    pub fn new(width: u32, height: u32, title: impl Into<String>) -> Self {
        Self {
            width,
            height,
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_mode(mut self, mode: WindowMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn inner_size(&self) -> LogicalSize<f64> {
        LogicalSize::new(f64::from(self.width), f64::from(self.height))
    }

    /// Builds the winit attributes for `ActiveEventLoop::create_window`.
    pub fn attributes(&self) -> WindowAttributes {
        let fullscreen = match self.mode {
            WindowMode::Windowed => None,
            WindowMode::Fullscreen => Some(Fullscreen::Borderless(None)),
        };

        Window::default_attributes()
            .with_title(self.title.clone())
            .with_inner_size(self.inner_size())
            .with_fullscreen(fullscreen)
    }
}
