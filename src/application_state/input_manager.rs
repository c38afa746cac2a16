//! # Input Manager
//!
//! Collects winit input between frames: the material and edit keys, the mouse
//! buttons, cursor travel and wheel scroll.

use std::collections::HashMap;

use winit::{
    event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

use super::input_state::{MouseInput, ProcessedInputState, RawInputState};

const KEY_CODES: [KeyCode; 7] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
    KeyCode::KeyA,
    KeyCode::KeyD,
];

const MOUSE_BUTTONS: [MouseButton; 3] = [MouseButton::Left, MouseButton::Right, MouseButton::Middle];

/// Pixel scroll (touchpads) converted to wheel lines.
const PIXELS_PER_SCROLL_LINE: f64 = 40.0;

/// Pressed/released flags for the tracked keys and buttons, this frame and
/// last frame, plus the cursor and scroll accumulated since the last reset.
pub struct InputManager {
    /// Previous state of all tracked keyboard keys
    pub keyboard_inputs_old: HashMap<KeyCode, bool>,
    /// Current state of all tracked keyboard keys
    pub keyboard_inputs_new: HashMap<KeyCode, bool>,

    /// Current state of mouse inputs
    pub mouse_inputs: MouseInput,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    /// Creates a new InputManager with every tracked key and button released
    /// and no known cursor position.
    pub fn new() -> Self {
        let keyboard_inputs_old: HashMap<_, _> = KEY_CODES.iter().map(|key| (*key, false)).collect();
        let keyboard_inputs_new = keyboard_inputs_old.clone();

        let mouse_button_inputs_old: HashMap<_, _> =
            MOUSE_BUTTONS.iter().map(|button| (*button, false)).collect();
        let mouse_button_inputs_new = mouse_button_inputs_old.clone();

        let mouse_inputs = MouseInput {
            mouse_button_inputs_old,
            mouse_button_inputs_new,
            scroll_lines: 0.0,
            cursor_position: None,
            cursor_delta: None,
        };

        Self {
            keyboard_inputs_old,
            keyboard_inputs_new,
            mouse_inputs,
        }
    }

    /// Copies this frame's flags into last frame's.
    pub fn move_old_states(&mut self) {
        for (key, new_state) in self.keyboard_inputs_new.iter() {
            if let Some(old_state) = self.keyboard_inputs_old.get_mut(key) {
                *old_state = *new_state;
            }
        }

        for (button, new_state) in self.mouse_inputs.mouse_button_inputs_new.iter() {
            if let Some(old_state) = self.mouse_inputs.mouse_button_inputs_old.get_mut(button) {
                *old_state = *new_state;
            }
        }
    }

    /// Feeds one window event in; events unrelated to input are ignored.
    pub fn intake_input(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state,
                        physical_key: PhysicalKey::Code(key),
                        ..
                    },
                ..
            } => self.set_key(*key, *state == ElementState::Pressed),
            WindowEvent::MouseInput { button, state, .. } => {
                self.set_mouse_button(*button, *state == ElementState::Pressed)
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.intake_cursor_position(position.x, position.y)
            }
            WindowEvent::MouseWheel { delta, .. } => self.intake_scroll(*delta),
            _ => {}
        }
    }

    /// Records a key press or release; untracked keys are ignored.
    pub fn set_key(&mut self, key: KeyCode, pressed: bool) {
        if let Some(key_state) = self.keyboard_inputs_new.get_mut(&key) {
            *key_state = pressed;
        }
    }

    /// Records a mouse button press or release; untracked buttons are ignored.
    pub fn set_mouse_button(&mut self, button: MouseButton, pressed: bool) {
        if let Some(button_state) = self.mouse_inputs.mouse_button_inputs_new.get_mut(&button) {
            *button_state = pressed;
        }
    }

    /// Moves the cursor, accumulating travel from the previous position.
    ///
    /// The first reported position sets the origin without producing a delta.
    pub fn intake_cursor_position(&mut self, x: f64, y: f64) {
        if let Some((last_x, last_y)) = self.mouse_inputs.cursor_position {
            let (dx, dy) = self.mouse_inputs.cursor_delta.unwrap_or((0.0, 0.0));
            self.mouse_inputs.cursor_delta = Some((dx + x - last_x, dy + y - last_y));
        }
        self.mouse_inputs.cursor_position = Some((x, y));
    }

    /// Accumulates a wheel or touchpad scroll, in lines.
    pub fn intake_scroll(&mut self, delta: MouseScrollDelta) {
        let lines = match delta {
            MouseScrollDelta::LineDelta(_, y) => y,
            MouseScrollDelta::PixelDelta(position) => (position.y / PIXELS_PER_SCROLL_LINE) as f32,
        };
        self.mouse_inputs.scroll_lines += lines;
    }

    /// Snapshot of this frame's input, with each key and button classified by
    /// comparing its flag against last frame's.
    pub fn create_processed_input_state(&self) -> ProcessedInputState {
        let keyboard_states = self
            .keyboard_inputs_new
            .iter()
            .map(|(key, &new_state)| {
                let old_state = self.keyboard_inputs_old.get(key).copied().unwrap_or(false);
                (*key, RawInputState::from_raw_states(old_state, new_state))
            })
            .collect();

        let mouse_button_states = self
            .mouse_inputs
            .mouse_button_inputs_new
            .iter()
            .map(|(button, &new_state)| {
                let old_state = self
                    .mouse_inputs
                    .mouse_button_inputs_old
                    .get(button)
                    .copied()
                    .unwrap_or(false);
                (*button, RawInputState::from_raw_states(old_state, new_state))
            })
            .collect();

        ProcessedInputState {
            keyboard_states,
            mouse_button_states,
            cursor_position: self.mouse_inputs.cursor_position,
            cursor_delta: self.mouse_inputs.cursor_delta,
            scroll_lines: self.mouse_inputs.scroll_lines,
        }
    }

    /// Returns this frame's processed input and resets the per-frame deltas.
    pub fn get_and_reset_processed_input(&mut self) -> ProcessedInputState {
        let processed_input = self.create_processed_input_state();
        self.reset_inputs();
        processed_input
    }

    /// Starts a new frame: current states become the previous ones and the
    /// accumulated cursor travel and scroll are cleared.
    pub fn reset_inputs(&mut self) {
        self.move_old_states();

        self.mouse_inputs.scroll_lines = 0.0;
        self.mouse_inputs.cursor_delta = None;
    }

    /// Releases every key and button, for when the window loses focus.
    pub fn release_all(&mut self) {
        self.keyboard_inputs_new.values_mut().for_each(|state| *state = false);
        self.mouse_inputs
            .mouse_button_inputs_new
            .values_mut()
            .for_each(|state| *state = false);
        self.reset_inputs();
    }
}

#[cfg(test)]
mod tests {
    use winit::dpi::PhysicalPosition;

    use super::*;

    #[test]
    fn key_goes_pressed_then_held_then_released() {
        let mut input = InputManager::new();

        input.set_key(KeyCode::KeyA, true);
        let first = input.get_and_reset_processed_input();
        assert_eq!(first.get_key_state(KeyCode::KeyA), RawInputState::Pressed);

        let second = input.get_and_reset_processed_input();
        assert_eq!(second.get_key_state(KeyCode::KeyA), RawInputState::Held);

        input.set_key(KeyCode::KeyA, false);
        let third = input.get_and_reset_processed_input();
        assert_eq!(third.get_key_state(KeyCode::KeyA), RawInputState::Released);
    }

    #[test]
    fn untracked_keys_are_ignored() {
        let mut input = InputManager::new();
        input.set_key(KeyCode::KeyQ, true);

        let processed = input.get_and_reset_processed_input();
        assert!(!processed.keyboard_states.contains_key(&KeyCode::KeyQ));
    }

    #[test]
    fn cursor_travel_accumulates_within_a_frame() {
        let mut input = InputManager::new();

        input.intake_cursor_position(100.0, 100.0);
        input.intake_cursor_position(104.0, 98.0);
        input.intake_cursor_position(110.0, 99.0);

        let processed = input.get_and_reset_processed_input();
        assert_eq!(processed.cursor_position, Some((110.0, 99.0)));
        assert_eq!(processed.get_cursor_delta(), Some((10.0, -1.0)));

        let next = input.get_and_reset_processed_input();
        assert_eq!(next.get_cursor_delta(), None);
        assert_eq!(next.cursor_position, Some((110.0, 99.0)));
    }

    #[test]
    fn first_cursor_report_has_no_delta() {
        let mut input = InputManager::new();
        input.intake_cursor_position(50.0, 60.0);

        assert_eq!(input.get_and_reset_processed_input().get_cursor_delta(), None);
    }

    #[test]
    fn scroll_lines_and_pixels_accumulate() {
        let mut input = InputManager::new();

        input.intake_scroll(MouseScrollDelta::LineDelta(0.0, 1.0));
        input.intake_scroll(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, -20.0)));

        let processed = input.get_and_reset_processed_input();
        assert_eq!(processed.scroll_lines, 0.5);
        assert_eq!(input.get_and_reset_processed_input().scroll_lines, 0.0);
    }

    #[test]
    fn release_all_clears_held_inputs() {
        let mut input = InputManager::new();
        input.set_key(KeyCode::KeyD, true);
        input.set_mouse_button(MouseButton::Right, true);
        input.get_and_reset_processed_input();

        input.release_all();

        let processed = input.get_and_reset_processed_input();
        assert!(!processed.get_key_state(KeyCode::KeyD).is_active());
        assert!(!processed.get_mouse_button_state(MouseButton::Right).is_active());
    }
}
