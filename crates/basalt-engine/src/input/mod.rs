//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! `platform::winit` translates window events into `InputEvent`s; [`dispatch`]
//! folds them into an [`InputState`] and forwards them to a [`WindowListener`].

mod listener;
pub mod platform;
mod state;
mod types;

pub use listener::{dispatch, WindowListener};
pub use state::InputState;
pub use types::{InputEvent, Key, KeyState, Modifiers, MouseButton};
