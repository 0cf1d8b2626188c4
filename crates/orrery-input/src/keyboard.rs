//! Frame-coherent keyboard state tracker.
//!
//! [`KeyboardState`] accumulates winit key events during a frame and answers,
//! per physical key, whether it is held, was just pressed this frame, or was
//! just released this frame. Physical key codes are layout independent.

use std::collections::HashSet;
use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// The parts of a winit key event the tracker looks at. Tests build these
/// directly since `KeyEvent` cannot be constructed outside winit.
#[derive(Debug, Clone, Copy)]
pub struct RawKeyEvent {
    pub key: PhysicalKey,
    pub state: ElementState,
    /// OS auto-repeat.
    pub repeat: bool,
}

impl RawKeyEvent {
    /// Non-repeat event for a known key code.
    pub fn new(code: KeyCode, state: ElementState) -> Self {
        Self {
            key: PhysicalKey::Code(code),
            state,
            repeat: false,
        }
    }
}

/// Held keys plus the edges seen since the last
/// [`clear_transients`](Self::clear_transients). Feed it every window
/// [`KeyEvent`] and clear once per redraw.
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    pressed: HashSet<PhysicalKey>,
    just_pressed: HashSet<PhysicalKey>,
    just_released: HashSet<PhysicalKey>,
}

impl KeyboardState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a window key event; auto-repeats do nothing.
    pub fn process_event(&mut self, event: &KeyEvent) {
        self.process_raw(RawKeyEvent {
            key: event.physical_key,
            state: event.state,
            repeat: event.repeat,
        });
    }

    pub fn process_raw(&mut self, event: RawKeyEvent) {
        if event.repeat {
            return;
        }
        match event.state {
            ElementState::Pressed => {
                // A second down without an up is not a new press.
                if self.pressed.insert(event.key) {
                    self.just_pressed.insert(event.key);
                }
            }
            ElementState::Released => {
                self.pressed.remove(&event.key);
                self.just_released.insert(event.key);
            }
        }
    }

    #[must_use]
    pub fn is_pressed(&self, key: PhysicalKey) -> bool {
        self.pressed.contains(&key)
    }

    #[must_use]
    pub fn just_pressed(&self, key: PhysicalKey) -> bool {
        self.just_pressed.contains(&key)
    }

    #[must_use]
    pub fn just_released(&self, key: PhysicalKey) -> bool {
        self.just_released.contains(&key)
    }

    /// Drop this frame's press and release edges.
    pub fn clear_transients(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
    }

    /// Forget every held key, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.just_released.extend(self.pressed.drain());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pk(code: KeyCode) -> PhysicalKey {
        PhysicalKey::Code(code)
    }

    #[test]
    fn test_initial_state_no_keys_pressed() {
        let kb = KeyboardState::new();
        for code in [KeyCode::KeyP, KeyCode::Escape] {
            assert!(!kb.is_pressed(pk(code)));
            assert!(!kb.just_pressed(pk(code)));
            assert!(!kb.just_released(pk(code)));
        }
    }

    #[test]
    fn test_press_then_release() {
        let mut kb = KeyboardState::new();
        kb.process_raw(RawKeyEvent::new(KeyCode::KeyP, ElementState::Pressed));
        assert!(kb.is_pressed(pk(KeyCode::KeyP)));
        assert!(kb.just_pressed(pk(KeyCode::KeyP)));

        kb.process_raw(RawKeyEvent::new(KeyCode::KeyP, ElementState::Released));
        assert!(!kb.is_pressed(pk(KeyCode::KeyP)));
        assert!(kb.just_released(pk(KeyCode::KeyP)));
    }

    #[test]
    fn test_just_pressed_true_for_one_frame_only() {
        let mut kb = KeyboardState::new();
        kb.process_raw(RawKeyEvent::new(KeyCode::KeyP, ElementState::Pressed));
        kb.clear_transients();
        assert!(!kb.just_pressed(pk(KeyCode::KeyP)));
        assert!(kb.is_pressed(pk(KeyCode::KeyP)));
    }

    #[test]
    fn test_repeat_events_ignored() {
        let mut kb = KeyboardState::new();
        kb.process_raw(RawKeyEvent::new(KeyCode::KeyP, ElementState::Pressed));
        kb.clear_transients();
        kb.process_raw(RawKeyEvent {
            repeat: true,
            ..RawKeyEvent::new(KeyCode::KeyP, ElementState::Pressed)
        });
        assert!(!kb.just_pressed(pk(KeyCode::KeyP)));
    }

    #[test]
    fn test_duplicate_press_is_not_new() {
        let mut kb = KeyboardState::new();
        kb.process_raw(RawKeyEvent::new(KeyCode::Escape, ElementState::Pressed));
        kb.clear_transients();
        kb.process_raw(RawKeyEvent::new(KeyCode::Escape, ElementState::Pressed));
        assert!(!kb.just_pressed(pk(KeyCode::Escape)));
    }

    #[test]
    fn test_release_all() {
        let mut kb = KeyboardState::new();
        kb.process_raw(RawKeyEvent::new(KeyCode::KeyP, ElementState::Pressed));
        kb.release_all();
        assert!(!kb.is_pressed(pk(KeyCode::KeyP)));
        assert!(kb.just_released(pk(KeyCode::KeyP)));
    }
}
