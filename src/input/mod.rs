//! OS input layer abstraction
//!
//! Defines the primitive cursor/button/key operations the motion engine
//! and actuation code are written against. The real backend (`enigo`)
//! lives behind the `os-input` feature; tests and dry runs use
//! [`RecordingBackend`].

#[cfg(feature = "os-input")]
pub mod backend;

#[cfg(feature = "os-input")]
pub use backend::EnigoBackend;

/// Input layer errors
///
/// Backends are assumed synchronous; any OS-level rejection propagates
/// through this type untouched. The core never retries.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("failed to inject input event: {0}")]
    Injection(String),
    #[error("cursor position unavailable")]
    CursorPosition,
}

/// Mouse buttons the core can press
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Keys the core can press
///
/// Covers the keys the bot scripts actually drive; anything printable
/// goes through `Char`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Space,
    Escape,
    Shift,
    LeftCtrl,
    RightCtrl,
    Char(char),
}

/// Primitive input operations supplied by the OS layer
///
/// All operations are synchronous and expected to succeed; a backend
/// that cannot inject an event returns an [`InputError`] which callers
/// treat as fatal.
pub trait InputBackend {
    /// Current cursor position in screen coordinates
    fn cursor_position(&mut self) -> Result<(i32, i32), InputError>;

    /// Move the cursor to an absolute screen position
    fn move_to(&mut self, x: i32, y: i32) -> Result<(), InputError>;

    /// Press a mouse button down
    fn button_down(&mut self, button: MouseButton) -> Result<(), InputError>;

    /// Release a mouse button
    fn button_up(&mut self, button: MouseButton) -> Result<(), InputError>;

    /// Press a key down
    fn key_down(&mut self, key: Key) -> Result<(), InputError>;

    /// Release a key
    fn key_up(&mut self, key: Key) -> Result<(), InputError>;
}

/// A single recorded input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    MoveTo(i32, i32),
    ButtonDown(MouseButton),
    ButtonUp(MouseButton),
    KeyDown(Key),
    KeyUp(Key),
}

/// Backend that records events instead of injecting them
///
/// Used for tests and dry runs: the cursor position tracks the last
/// recorded move so motion code behaves as it would against a real
/// screen.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    events: Vec<InputEvent>,
    cursor: (i32, i32),
}

impl RecordingBackend {
    /// Create a recorder with the cursor at the origin
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a recorder with the cursor at a given position
    pub fn at(x: i32, y: i32) -> Self {
        Self {
            events: Vec::new(),
            cursor: (x, y),
        }
    }

    /// All events recorded so far, in order
    pub fn events(&self) -> &[InputEvent] {
        &self.events
    }

    /// Positions of all recorded cursor moves, in order
    pub fn moves(&self) -> Vec<(i32, i32)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                InputEvent::MoveTo(x, y) => Some((*x, *y)),
                _ => None,
            })
            .collect()
    }

    /// Clear the recording, keeping the cursor position
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl InputBackend for RecordingBackend {
    fn cursor_position(&mut self) -> Result<(i32, i32), InputError> {
        Ok(self.cursor)
    }

    fn move_to(&mut self, x: i32, y: i32) -> Result<(), InputError> {
        self.events.push(InputEvent::MoveTo(x, y));
        self.cursor = (x, y);
        Ok(())
    }

    fn button_down(&mut self, button: MouseButton) -> Result<(), InputError> {
        self.events.push(InputEvent::ButtonDown(button));
        Ok(())
    }

    fn button_up(&mut self, button: MouseButton) -> Result<(), InputError> {
        self.events.push(InputEvent::ButtonUp(button));
        Ok(())
    }

    fn key_down(&mut self, key: Key) -> Result<(), InputError> {
        self.events.push(InputEvent::KeyDown(key));
        Ok(())
    }

    fn key_up(&mut self, key: Key) -> Result<(), InputError> {
        self.events.push(InputEvent::KeyUp(key));
        Ok(())
    }
}
