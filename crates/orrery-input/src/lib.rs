//! Keyboard input: frame-coherent key state and the demo's key-to-action map.

pub mod actions;
pub mod keyboard;

pub use actions::{Action, ActionMap, key_from_name};
pub use keyboard::{KeyboardState, RawKeyEvent};
