//! Per-frame input snapshots handed from the input manager to the editor.

use std::collections::HashMap;
use winit::{event::MouseButton, keyboard::KeyCode};

/// Where a key or button is in its press cycle this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RawInputState {
    /// Up, and was up last frame
    #[default]
    NotPressed,
    /// Went down this frame
    Pressed,
    /// Down this frame and the last
    Held,
    /// Came up this frame
    Released,
}

impl RawInputState {
    /// Down right now
    pub fn is_active(&self) -> bool {
        matches!(self, RawInputState::Pressed | RawInputState::Held)
    }

    /// Derives the state from the previous and current frame's raw down flags
    pub fn from_raw_states(previous: bool, current: bool) -> Self {
        match (previous, current) {
            (false, true) => RawInputState::Pressed,
            (true, true) => RawInputState::Held,
            (true, false) => RawInputState::Released,
            (false, false) => RawInputState::NotPressed,
        }
    }
}

/// A snapshot of the processed input for one frame.
///
/// Key and button states are translated into [`RawInputState`] values; the
/// cursor and scroll wheel are reported as positions and accumulated deltas.
#[derive(Debug, Clone, Default)]
pub struct ProcessedInputState {
    /// Material and edit keys
    pub keyboard_states: HashMap<KeyCode, RawInputState>,

    /// Left, right and middle buttons
    pub mouse_button_states: HashMap<MouseButton, RawInputState>,

    /// Last known cursor position in physical pixels, origin top-left
    pub cursor_position: Option<(f64, f64)>,

    /// Cursor travel since the last frame (x, y)
    pub cursor_delta: Option<(f64, f64)>,

    /// Scroll distance since the last frame in lines, positive away from the user
    pub scroll_lines: f32,
}

impl ProcessedInputState {
    /// Untracked keys read as `NotPressed`
    pub fn get_key_state(&self, key: KeyCode) -> RawInputState {
        self.keyboard_states.get(&key).copied().unwrap_or_default()
    }

    /// Untracked buttons read as `NotPressed`
    pub fn get_mouse_button_state(&self, button: MouseButton) -> RawInputState {
        self.mouse_button_states.get(&button).copied().unwrap_or_default()
    }

    /// Gets the cursor movement since the last frame
    pub fn get_cursor_delta(&self) -> Option<(f64, f64)> {
        self.cursor_delta
    }
}

/// Tracks the state of mouse inputs including buttons, scroll, and cursor.
pub struct MouseInput {
    /// Button down flags as of last frame
    pub mouse_button_inputs_old: HashMap<MouseButton, bool>,
    /// Button down flags now
    pub mouse_button_inputs_new: HashMap<MouseButton, bool>,

    /// Accumulated scroll since the last frame, in lines
    pub scroll_lines: f32,

    /// Last reported cursor position
    pub cursor_position: Option<(f64, f64)>,

    /// Accumulated cursor travel since the last frame
    pub cursor_delta: Option<(f64, f64)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitions_cover_every_edge() {
        assert_eq!(RawInputState::from_raw_states(false, true), RawInputState::Pressed);
        assert_eq!(RawInputState::from_raw_states(true, true), RawInputState::Held);
        assert_eq!(RawInputState::from_raw_states(true, false), RawInputState::Released);
        assert_eq!(RawInputState::from_raw_states(false, false), RawInputState::NotPressed);
    }

    #[test]
    fn only_pressed_and_held_are_active() {
        assert!(RawInputState::Pressed.is_active());
        assert!(RawInputState::Held.is_active());
        assert!(!RawInputState::Released.is_active());
        assert!(!RawInputState::NotPressed.is_active());
    }

    #[test]
    fn untracked_inputs_read_as_not_pressed() {
        let input = ProcessedInputState::default();
        assert_eq!(input.get_key_state(KeyCode::KeyQ), RawInputState::NotPressed);
        assert_eq!(
            input.get_mouse_button_state(MouseButton::Middle),
            RawInputState::NotPressed
        );
        assert_eq!(input.get_cursor_delta(), None);
    }
}
