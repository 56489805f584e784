use std::collections::HashSet;

use super::types::{InputEvent, Key, KeyState, Modifiers, MouseButton};

/// Current input state for a single window.
///
/// Holds "is down" information and the last known pointer position.
#[derive(Debug, Default)]
pub struct InputState {
    pub modifiers: Modifiers,

    pub focused: bool,

    /// Pointer position in logical pixels; `None` while outside the window.
    pub pointer: Option<(f32, f32)>,

    pub keys_down: HashSet<Key>,

    pub buttons_down: HashSet<MouseButton>,
}

impl InputState {
    /// Folds one event into the state.
    ///
    /// Returns `false` when the event changes nothing a listener would care
    /// about: a press of a key that is already down, or a release of one that
    /// is not.
    pub fn apply(&mut self, event: &InputEvent) -> bool {
        match *event {
            InputEvent::ModifiersChanged(m) => {
                self.modifiers = m;
                true
            }

            InputEvent::Focused(focused) => {
                self.focused = focused;
                if !focused {
                    // Releases are not delivered to unfocused windows.
                    self.keys_down.clear();
                    self.buttons_down.clear();
                }
                true
            }

            InputEvent::PointerEntered | InputEvent::CloseRequested | InputEvent::Scrolled { .. } => true,

            InputEvent::PointerLeft => {
                self.pointer = None;
                true
            }

            InputEvent::PointerMoved { x, y } => {
                self.pointer = Some((x, y));
                true
            }

            InputEvent::Key {
                key,
                state,
                modifiers,
            } => {
                self.modifiers = modifiers;
                match state {
                    KeyState::Pressed => self.keys_down.insert(key),
                    KeyState::Released => self.keys_down.remove(&key),
                }
            }

            InputEvent::MouseButton { button, state } => match state {
                KeyState::Pressed => self.buttons_down.insert(button),
                KeyState::Released => self.buttons_down.remove(&button),
            },
        }
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn button_down(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(key: Key, state: KeyState) -> InputEvent {
        InputEvent::Key {
            key,
            state,
            modifiers: Modifiers::default(),
        }
    }

    #[test]
    fn repeated_presses_are_not_new() {
        let mut state = InputState::default();
        assert!(state.apply(&key(Key::A, KeyState::Pressed)));
        assert!(!state.apply(&key(Key::A, KeyState::Pressed)));
        assert!(state.key_down(Key::A));
        assert!(state.apply(&key(Key::A, KeyState::Released)));
        assert!(!state.apply(&key(Key::A, KeyState::Released)));
    }

    #[test]
    fn focus_loss_releases_everything() {
        let mut state = InputState::default();
        state.apply(&key(Key::LeftShift, KeyState::Pressed));
        state.apply(&InputEvent::MouseButton {
            button: MouseButton::Left,
            state: KeyState::Pressed,
        });
        state.apply(&InputEvent::Focused(false));
        assert!(state.keys_down.is_empty());
        assert!(!state.button_down(MouseButton::Left));
    }

    #[test]
    fn pointer_tracks_move_and_leave() {
        let mut state = InputState::default();
        state.apply(&InputEvent::PointerMoved { x: 3.0, y: 4.5 });
        assert_eq!(state.pointer, Some((3.0, 4.5)));
        state.apply(&InputEvent::PointerLeft);
        assert_eq!(state.pointer, None);
    }

    #[test]
    fn key_events_carry_modifiers() {
        let mut state = InputState::default();
        let ctrl = Modifiers {
            control: true,
            ..Modifiers::default()
        };
        state.apply(&InputEvent::Key {
            key: Key::C,
            state: KeyState::Pressed,
            modifiers: ctrl,
        });
        assert_eq!(state.modifiers, ctrl);
        assert!(state.modifiers.any());
    }
}
