use std::fmt;

/// Keyboard key identifier.
///
/// Platform layers map their key codes into these variants. Keys without a
/// variant arrive as `Key::Unknown(code)`; code 0 means the platform could
/// not identify the key at all.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Tab,
    Backspace,
    Space,
    CapsLock,

    Insert,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,

    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    LeftShift,
    RightShift,
    LeftControl,
    RightControl,
    Alt,
    /// Right alt.
    AltGr,
    LeftMeta,
    RightMeta,

    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,

    Num0, Num1, Num2, Num3, Num4,
    Num5, Num6, Num7, Num8, Num9,

    F1, F2, F3, F4, F5, F6,
    F7, F8, F9, F10, F11, F12,

    Unknown(u32),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Unknown(code) => write!(f, "Unknown({code:#x})"),
            other => write!(f, "{other:?}"),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum KeyState {
    Pressed,
    Released,
}

/// Mouse button identifier.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
    Other(u16),
}

/// Modifier keys held while an event happened.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Modifiers {
    pub shift: bool,
    pub control: bool,
    pub alt: bool,
    /// Windows / Command key.
    pub meta: bool,
}

impl Modifiers {
    pub fn any(&self) -> bool {
        self.shift || self.control || self.alt || self.meta
    }
}

/// Window and input events in platform-independent form.
///
/// Pointer coordinates are logical pixels relative to the window's top-left
/// corner.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum InputEvent {
    /// The user asked to close the window.
    CloseRequested,

    Key {
        key: Key,
        state: KeyState,
        modifiers: Modifiers,
    },

    PointerEntered,
    PointerLeft,
    PointerMoved { x: f32, y: f32 },

    MouseButton { button: MouseButton, state: KeyState },

    /// Vertical wheel motion in lines; positive scrolls up.
    Scrolled { lines: f32 },

    Focused(bool),
    ModifiersChanged(Modifiers),
}
