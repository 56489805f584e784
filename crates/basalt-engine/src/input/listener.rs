use super::state::InputState;
use super::types::{InputEvent, Key, KeyState, Modifiers, MouseButton};

/// Receives window and input callbacks.
///
/// Every callback defaults to doing nothing, so implementors only override
/// what they handle.
#[allow(unused_variables)]
pub trait WindowListener {
    fn on_close(&mut self) {}

    fn on_mouse_enter(&mut self) {}

    fn on_mouse_leave(&mut self) {}

    fn on_mouse_move(&mut self, x: f32, y: f32) {}

    fn on_mouse_scroll(&mut self, lines: f32) {}

    fn on_key_down(&mut self, key: Key, modifiers: Modifiers) {}

    fn on_key_up(&mut self, key: Key, modifiers: Modifiers) {}

    fn on_mouse_down(&mut self, button: MouseButton) {}

    fn on_mouse_up(&mut self, button: MouseButton) {}

    fn on_focus(&mut self, focused: bool) {}
}

/// Applies `event` to `state` and forwards it to `listener`.
///
/// Presses of keys or buttons that are already down (and the matching
/// releases) are absorbed by the state and not forwarded. Modifier changes
/// only update the state; they reach listeners with the next key event.
pub fn dispatch(listener: &mut dyn WindowListener, state: &mut InputState, event: &InputEvent) {
    if !state.apply(event) {
        return;
    }

    match *event {
        InputEvent::CloseRequested => listener.on_close(),
        InputEvent::PointerEntered => listener.on_mouse_enter(),
        InputEvent::PointerLeft => listener.on_mouse_leave(),
        InputEvent::PointerMoved { x, y } => listener.on_mouse_move(x, y),
        InputEvent::Scrolled { lines } => listener.on_mouse_scroll(lines),
        InputEvent::Key {
            key,
            state: KeyState::Pressed,
            modifiers,
        } => listener.on_key_down(key, modifiers),
        InputEvent::Key {
            key,
            state: KeyState::Released,
            modifiers,
        } => listener.on_key_up(key, modifiers),
        InputEvent::MouseButton {
            button,
            state: KeyState::Pressed,
        } => listener.on_mouse_down(button),
        InputEvent::MouseButton {
            button,
            state: KeyState::Released,
        } => listener.on_mouse_up(button),
        InputEvent::Focused(focused) => listener.on_focus(focused),
        InputEvent::ModifiersChanged(_) => {}
    }
}
