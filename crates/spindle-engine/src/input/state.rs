use std::collections::HashSet;

use crate::transform::DirectionalInput;

use super::types::{
    InputEvent,
    Key,
    KeyState,
    MouseButton,
    MouseButtonState,
    PointerButtonEvent,
};

/// Button that turns pointer motion into camera rotation.
pub const ROTATION_MODIFIER: MouseButton = MouseButton::Right;

/// Current input state for the window.
///
/// Holds "is down" information for keys and buttons. Pointer motion goes
/// straight to the engine.
#[derive(Debug, Default)]
pub struct InputState {
    pub keys_down: HashSet<Key>,

    pub buttons_down: HashSet<MouseButton>,
}

impl InputState {
    /// Applies a platform-agnostic input event to the current state.
    pub fn apply_event(&mut self, ev: &InputEvent) {
        match ev {
            InputEvent::Focused(false) => {
                // Released keys are not reported after focus loss.
                self.keys_down.clear();
                self.buttons_down.clear();
            }

            InputEvent::Focused(true) | InputEvent::PointerMoved(_) => {}

            InputEvent::Key { key, state } => match state {
                KeyState::Pressed => {
                    self.keys_down.insert(*key);
                }
                KeyState::Released => {
                    self.keys_down.remove(key);
                }
            },

            InputEvent::PointerButton(PointerButtonEvent { button, state }) => match state {
                MouseButtonState::Pressed => {
                    self.buttons_down.insert(*button);
                }
                MouseButtonState::Released => {
                    self.buttons_down.remove(button);
                }
            },
        }
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn button_down(&self, btn: MouseButton) -> bool {
        self.buttons_down.contains(&btn)
    }

    pub fn rotation_modifier_held(&self) -> bool {
        self.button_down(ROTATION_MODIFIER)
    }

    /// Samples the four movement directions (WASD, arrows as aliases).
    pub fn directional(&self) -> DirectionalInput {
        DirectionalInput {
            forward: self.key_down(Key::W) || self.key_down(Key::ArrowUp),
            back: self.key_down(Key::S) || self.key_down(Key::ArrowDown),
            left: self.key_down(Key::A) || self.key_down(Key::ArrowLeft),
            right: self.key_down(Key::D) || self.key_down(Key::ArrowRight),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(key: Key) -> InputEvent {
        InputEvent::Key { key, state: KeyState::Pressed }
    }

    fn release(key: Key) -> InputEvent {
        InputEvent::Key { key, state: KeyState::Released }
    }

    #[test]
    fn wasd_maps_to_directions() {
        let mut s = InputState::default();
        s.apply_event(&press(Key::W));
        s.apply_event(&press(Key::D));
        assert_eq!(
            s.directional(),
            DirectionalInput { forward: true, right: true, ..Default::default() }
        );
        s.apply_event(&release(Key::W));
        assert!(!s.directional().forward);
    }

    #[test]
    fn arrows_alias_wasd() {
        let mut s = InputState::default();
        s.apply_event(&press(Key::ArrowLeft));
        assert!(s.directional().left);
    }

    #[test]
    fn focus_loss_clears_held_state() {
        let mut s = InputState::default();
        s.apply_event(&press(Key::S));
        s.apply_event(&InputEvent::PointerButton(PointerButtonEvent {
            button: MouseButton::Right,
            state: MouseButtonState::Pressed,
        }));
        assert!(s.rotation_modifier_held());
        s.apply_event(&InputEvent::Focused(false));
        assert!(!s.rotation_modifier_held());
        assert_eq!(s.directional(), DirectionalInput::default());
    }
}
