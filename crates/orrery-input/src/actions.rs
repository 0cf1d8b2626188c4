//! Maps the demo's actions to physical keys.

use std::collections::HashMap;

use tracing::warn;
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::keyboard::KeyboardState;

/// Things a key can trigger.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum Action {
    /// Dump the current framebuffer to a PPM file.
    Capture,
    /// Close the window and exit.
    Quit,
}

impl Action {
    pub const ALL: [Action; 2] = [Action::Capture, Action::Quit];

    /// Name used as the key in the config's `keybindings` map.
    pub const fn config_name(self) -> &'static str {
        match self {
            Action::Capture => "capture",
            Action::Quit => "quit",
        }
    }

    pub fn from_config_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|a| a.config_name().eq_ignore_ascii_case(name))
    }
}

/// Parse a key name as written in config files.
///
/// Accepts winit's `KeyCode` names (`"KeyP"`, `"Escape"`, `"F12"`) and the
/// short forms `"P"` and `"5"` for letters and digits. Case-insensitive.
pub fn key_from_name(name: &str) -> Option<KeyCode> {
    let name = name.trim();
    let upper = name.to_ascii_uppercase();

    if upper.len() == 1 {
        return letter_or_digit(upper.as_bytes()[0]);
    }
    if let Some(rest) = upper.strip_prefix("KEY")
        && let [c] = rest.as_bytes()
        && c.is_ascii_alphabetic()
    {
        return letter_or_digit(*c);
    }
    if let Some(rest) = upper.strip_prefix("DIGIT")
        && let [c] = rest.as_bytes()
        && c.is_ascii_digit()
    {
        return letter_or_digit(*c);
    }

    Some(match upper.as_str() {
        "ESCAPE" | "ESC" => KeyCode::Escape,
        "SPACE" => KeyCode::Space,
        "ENTER" | "RETURN" => KeyCode::Enter,
        "TAB" => KeyCode::Tab,
        "BACKSPACE" => KeyCode::Backspace,
        "PRINTSCREEN" => KeyCode::PrintScreen,
        "F1" => KeyCode::F1,
        "F2" => KeyCode::F2,
        "F3" => KeyCode::F3,
        "F4" => KeyCode::F4,
        "F5" => KeyCode::F5,
        "F6" => KeyCode::F6,
        "F7" => KeyCode::F7,
        "F8" => KeyCode::F8,
        "F9" => KeyCode::F9,
        "F10" => KeyCode::F10,
        "F11" => KeyCode::F11,
        "F12" => KeyCode::F12,
        _ => return None,
    })
}

fn letter_or_digit(c: u8) -> Option<KeyCode> {
    const LETTERS: [KeyCode; 26] = [
        KeyCode::KeyA,
        KeyCode::KeyB,
        KeyCode::KeyC,
        KeyCode::KeyD,
        KeyCode::KeyE,
        KeyCode::KeyF,
        KeyCode::KeyG,
        KeyCode::KeyH,
        KeyCode::KeyI,
        KeyCode::KeyJ,
        KeyCode::KeyK,
        KeyCode::KeyL,
        KeyCode::KeyM,
        KeyCode::KeyN,
        KeyCode::KeyO,
        KeyCode::KeyP,
        KeyCode::KeyQ,
        KeyCode::KeyR,
        KeyCode::KeyS,
        KeyCode::KeyT,
        KeyCode::KeyU,
        KeyCode::KeyV,
        KeyCode::KeyW,
        KeyCode::KeyX,
        KeyCode::KeyY,
        KeyCode::KeyZ,
    ];
    const DIGITS: [KeyCode; 10] = [
        KeyCode::Digit0,
        KeyCode::Digit1,
        KeyCode::Digit2,
        KeyCode::Digit3,
        KeyCode::Digit4,
        KeyCode::Digit5,
        KeyCode::Digit6,
        KeyCode::Digit7,
        KeyCode::Digit8,
        KeyCode::Digit9,
    ];
    match c {
        b'A'..=b'Z' => Some(LETTERS[(c - b'A') as usize]),
        b'0'..=b'9' => Some(DIGITS[(c - b'0') as usize]),
        _ => None,
    }
}

/// Which key triggers which action. One key per action.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionMap {
    bindings: HashMap<Action, KeyCode>,
}

impl ActionMap {
    /// `P` captures, `Escape` quits.
    pub fn defaults() -> Self {
        let bindings = HashMap::from([
            (Action::Capture, KeyCode::KeyP),
            (Action::Quit, KeyCode::Escape),
        ]);
        Self { bindings }
    }

    /// Defaults with entries from a config `keybindings` map applied.
    /// Unknown action or key names are logged and skipped.
    pub fn with_overrides(overrides: &HashMap<String, String>) -> Self {
        let mut map = Self::defaults();
        for (action_name, key_name) in overrides {
            let Some(action) = Action::from_config_name(action_name) else {
                warn!("Ignoring binding for unknown action '{action_name}'");
                continue;
            };
            let Some(key) = key_from_name(key_name) else {
                warn!("Ignoring unknown key '{key_name}' for action '{action_name}'");
                continue;
            };
            map.bind(action, key);
        }
        map
    }

    pub fn bind(&mut self, action: Action, key: KeyCode) {
        self.bindings.insert(action, key);
    }

    pub fn key_for(&self, action: Action) -> Option<KeyCode> {
        self.bindings.get(&action).copied()
    }

    /// True during the frame the action's key went down.
    pub fn triggered(&self, action: Action, keyboard: &KeyboardState) -> bool {
        self.key_for(action)
            .is_some_and(|code| keyboard.just_pressed(PhysicalKey::Code(code)))
    }
}

impl Default for ActionMap {
    fn default() -> Self {
        Self::defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::RawKeyEvent;
    use winit::event::ElementState;

    #[test]
    fn test_default_bindings() {
        let map = ActionMap::defaults();
        assert_eq!(map.key_for(Action::Capture), Some(KeyCode::KeyP));
        assert_eq!(map.key_for(Action::Quit), Some(KeyCode::Escape));
    }

    #[test]
    fn test_key_names() {
        assert_eq!(key_from_name("P"), Some(KeyCode::KeyP));
        assert_eq!(key_from_name("p"), Some(KeyCode::KeyP));
        assert_eq!(key_from_name("KeyP"), Some(KeyCode::KeyP));
        assert_eq!(key_from_name("Digit7"), Some(KeyCode::Digit7));
        assert_eq!(key_from_name("7"), Some(KeyCode::Digit7));
        assert_eq!(key_from_name("F12"), Some(KeyCode::F12));
        assert_eq!(key_from_name("Esc"), Some(KeyCode::Escape));
        assert_eq!(key_from_name("Key7"), None);
        assert_eq!(key_from_name("Hyper"), None);
    }

    #[test]
    fn test_overrides_applied() {
        let overrides = HashMap::from([("capture".to_string(), "F12".to_string())]);
        let map = ActionMap::with_overrides(&overrides);
        assert_eq!(map.key_for(Action::Capture), Some(KeyCode::F12));
        assert_eq!(map.key_for(Action::Quit), Some(KeyCode::Escape));
    }

    #[test]
    fn test_bad_overrides_skipped() {
        let overrides = HashMap::from([
            ("teleport".to_string(), "T".to_string()),
            ("quit".to_string(), "NotAKey".to_string()),
        ]);
        assert_eq!(ActionMap::with_overrides(&overrides), ActionMap::defaults());
    }

    #[test]
    fn test_triggered_on_press_frame_only() {
        let map = ActionMap::defaults();
        let mut kb = KeyboardState::new();
        assert!(!map.triggered(Action::Capture, &kb));

        kb.process_raw(RawKeyEvent::new(KeyCode::KeyP, ElementState::Pressed));
        assert!(map.triggered(Action::Capture, &kb));
        assert!(!map.triggered(Action::Quit, &kb));

        // Holding the key does not trigger again.
        kb.clear_transients();
        assert!(!map.triggered(Action::Capture, &kb));
    }
}
