
//! Keyboard and mouse state tracking

use glam::Vec2;
use glutin::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};

pub use glutin::event::VirtualKeyCode as Key;

const MOUSE_KEYS: usize = 5;
const KEYBOARD_KEYS: usize = 256;

// One scroll tick of a mouse wheel, in pixels. Used to convert pixel deltas
// from touchpads into the same unit as wheel line deltas.
const PIXELS_PER_LINE: f32 = 38.0;

/// The state of the mouse and keyboard at some point in time. The window loop
/// updates this from window events and hands it to
/// [`Game::update`](trait.Game.html#tymethod.update) each frame.
pub struct Input {
    mouse_pos: Vec2,
    mouse_delta: Vec2,
    mouse_scroll: f32,
    mouse_keys: [KeyState; MOUSE_KEYS],
    keys: [KeyState; KEYBOARD_KEYS],
}

impl Input {
    pub(crate) fn new() -> Input {
        Input {
            mouse_pos: Vec2::ZERO,
            mouse_delta: Vec2::ZERO,
            mouse_scroll: 0.0,
            mouse_keys: [KeyState::Up; MOUSE_KEYS],
            keys: [KeyState::Up; KEYBOARD_KEYS],
        }
    }

    /// Advances pressed/released edges to their steady states. Called by the
    /// window loop after each update, before new events are polled.
    pub(crate) fn refresh(&mut self) {
        for state in self.mouse_keys.iter_mut().chain(self.keys.iter_mut()) {
            *state = match *state {
                KeyState::Released => KeyState::Up,
                KeyState::Pressed | KeyState::PressedRepeat => KeyState::Down,
                other => other,
            };
        }

        self.mouse_delta = Vec2::ZERO;
        self.mouse_scroll = 0.0;
    }

    pub(crate) fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                let new_pos = Vec2::new(position.x as f32, position.y as f32);
                self.mouse_delta += new_pos - self.mouse_pos;
                self.mouse_pos = new_pos;
            },

            WindowEvent::MouseInput { state, button, .. } => {
                let index = match button {
                    MouseButton::Left => 0,
                    MouseButton::Right => 1,
                    MouseButton::Middle => 2,
                    MouseButton::Other(n) => 3 + *n as usize,
                };
                if index < MOUSE_KEYS {
                    self.mouse_keys[index] = match state {
                        ElementState::Pressed => KeyState::Pressed,
                        ElementState::Released => KeyState::Released,
                    };
                }
            },

            WindowEvent::MouseWheel { delta, .. } => {
                self.mouse_scroll += match delta {
                    MouseScrollDelta::LineDelta(_x, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / PIXELS_PER_LINE,
                };
            },

            WindowEvent::KeyboardInput { input, .. } => {
                if let Some(key) = input.virtual_keycode {
                    let index = key as usize;
                    if index < KEYBOARD_KEYS {
                        self.keys[index] = match input.state {
                            ElementState::Pressed => {
                                if self.keys[index].down() {
                                    KeyState::PressedRepeat
                                } else {
                                    KeyState::Pressed
                                }
                            },
                            ElementState::Released => KeyState::Released,
                        };
                    }
                }
            },

            _ => {},
        }
    }

    /// The position of the mouse cursor, in pixels from the top left corner
    /// of the window.
    pub fn mouse_pos(&self) -> Vec2 {
        self.mouse_pos
    }

    /// How much the mouse moved since the last frame, in pixels.
    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }

    /// How much the scroll wheel turned since the last frame, in lines.
    pub fn mouse_scroll(&self) -> f32 {
        self.mouse_scroll
    }

    /// The state of the given mouse button. 0 is left, 1 is right and 2 is
    /// the middle button.
    pub fn mouse_key(&self, index: usize) -> KeyState {
        self.mouse_keys.get(index).copied().unwrap_or(KeyState::Up)
    }

    /// The state of the given keyboard key.
    pub fn key(&self, key: Key) -> KeyState {
        self.keys[key as usize]
    }
}

/// The state of a keyboard key or mouse button during a single frame. The
/// `Pressed`, `PressedRepeat` and `Released` states only last for the frame
/// in which the corresponding event arrived.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum KeyState {
    /// The key is not held down
    Up,
    /// The key is held down, and was pressed this frame
    Pressed,
    /// The key is held down and a key repeat arrived this frame
    PressedRepeat,
    /// The key is held down
    Down,
    /// The key was released this frame
    Released,
}

impl KeyState {
    /// Returns true if the key is held down.
    pub fn down(self) -> bool {
        match self {
            KeyState::Up | KeyState::Released => false,
            KeyState::Pressed | KeyState::PressedRepeat | KeyState::Down => true,
        }
    }

    /// Returns true if the key is not held down.
    pub fn up(self) -> bool {
        !self.down()
    }

    /// Returns true if the key was pressed this frame.
    pub fn pressed(self) -> bool {
        self == KeyState::Pressed
    }

    /// Returns true if the key was pressed this frame, or a key repeat
    /// arrived this frame.
    pub fn pressed_repeat(self) -> bool {
        self == KeyState::Pressed || self == KeyState::PressedRepeat
    }

    /// Returns true if the key was released this frame.
    pub fn released(self) -> bool {
        self == KeyState::Released
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_decays_edges() {
        let mut input = Input::new();
        input.keys[Key::A as usize] = KeyState::Pressed;
        input.keys[Key::B as usize] = KeyState::Released;
        input.mouse_keys[0] = KeyState::PressedRepeat;
        input.mouse_delta = Vec2::new(3.0, -2.0);
        input.mouse_scroll = 1.0;

        input.refresh();

        assert_eq!(KeyState::Down, input.key(Key::A));
        assert_eq!(KeyState::Up, input.key(Key::B));
        assert_eq!(KeyState::Down, input.mouse_key(0));
        assert_eq!(Vec2::ZERO, input.mouse_delta());
        assert_eq!(0.0, input.mouse_scroll());
    }

    #[test]
    fn key_state_predicates() {
        assert!(KeyState::Pressed.down());
        assert!(KeyState::Pressed.pressed());
        assert!(KeyState::PressedRepeat.pressed_repeat());
        assert!(!KeyState::PressedRepeat.pressed());
        assert!(KeyState::Released.up());
        assert!(KeyState::Released.released());
        assert!(KeyState::Down.down());
        assert!(!KeyState::Down.pressed());
    }
}
