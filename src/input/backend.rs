//! Real OS input injection via enigo
//!
//! Only compiled with the `os-input` feature; headless builds (CI,
//! tests, calibration-only use) never link the OS input libraries.

use enigo::{Enigo, KeyboardControllable, MouseControllable};

use super::{InputBackend, InputError, Key, MouseButton};

/// Input backend driving the real cursor and keyboard
pub struct EnigoBackend {
    enigo: Enigo,
}

impl EnigoBackend {
    /// Create a backend for the main display
    pub fn new() -> Self {
        Self {
            enigo: Enigo::new(),
        }
    }

    /// Size of the main display in pixels
    pub fn display_size(&self) -> (usize, usize) {
        self.enigo.main_display_size()
    }
}

impl Default for EnigoBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBackend for EnigoBackend {
    fn cursor_position(&mut self) -> Result<(i32, i32), InputError> {
        Ok(self.enigo.mouse_location())
    }

    fn move_to(&mut self, x: i32, y: i32) -> Result<(), InputError> {
        self.enigo.mouse_move_to(x, y);
        Ok(())
    }

    fn button_down(&mut self, button: MouseButton) -> Result<(), InputError> {
        self.enigo.mouse_down(to_enigo_button(button));
        Ok(())
    }

    fn button_up(&mut self, button: MouseButton) -> Result<(), InputError> {
        self.enigo.mouse_up(to_enigo_button(button));
        Ok(())
    }

    fn key_down(&mut self, key: Key) -> Result<(), InputError> {
        self.enigo.key_down(to_enigo_key(key));
        Ok(())
    }

    fn key_up(&mut self, key: Key) -> Result<(), InputError> {
        self.enigo.key_up(to_enigo_key(key));
        Ok(())
    }
}

fn to_enigo_button(button: MouseButton) -> enigo::MouseButton {
    match button {
        MouseButton::Left => enigo::MouseButton::Left,
        MouseButton::Right => enigo::MouseButton::Right,
        MouseButton::Middle => enigo::MouseButton::Middle,
    }
}

fn to_enigo_key(key: Key) -> enigo::Key {
    match key {
        Key::Up => enigo::Key::UpArrow,
        Key::Down => enigo::Key::DownArrow,
        Key::Left => enigo::Key::LeftArrow,
        Key::Right => enigo::Key::RightArrow,
        Key::Space => enigo::Key::Space,
        Key::Escape => enigo::Key::Escape,
        Key::Shift => enigo::Key::Shift,
        // enigo does not distinguish left/right control
        Key::LeftCtrl | Key::RightCtrl => enigo::Key::Control,
        Key::Char(c) => enigo::Key::Layout(c),
    }
}
