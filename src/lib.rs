//! Ghosthand - humanized mouse and keyboard automation core
//!
//! This library provides the core building blocks for game-automation
//! bots: Bezier-curve cursor movement with an ease-in/ease-out velocity
//! profile, randomized hold and sleep duration sampling, and a
//! screenshot-based inventory-slot grid detector.
//!
//! ## Humanization
//!
//! Every duration and trajectory is sampled rather than fixed: curved
//! paths with randomized control points, per-step jitter, occasional
//! micro-hesitations, context-dependent key holds and practiced-pair
//! inter-key delays. All samplers take an explicit RNG so fixed seeds
//! reproduce exact behavior in tests.
//!
//! ## Backends
//!
//! Input goes through the [`input::InputBackend`] trait. The real
//! backend (`enigo`) is gated behind the `os-input` feature so that
//! headless builds compile and test without OS input libraries.

pub mod config;
pub mod input;
pub mod motion;
pub mod timing;
pub mod vision;

use std::ops::RangeInclusive;
use std::thread;
use std::time::Duration;

use rand::rngs::ThreadRng;
use rand::Rng;

use crate::config::SlotGridConfig;
use crate::input::{InputBackend, InputError, Key, MouseButton};
use crate::timing::{HumanProfile, KeyContext, KeyKind, KeySequence, SleepBand};
use crate::vision::{Frame, GridDetection, SlotDetector};

/// Base inter-key gap in seconds, before pair adjustments
const KEY_GAP_BASE: f64 = 0.05;
/// Base mouse-button hold in seconds
const CLICK_HOLD_BASE: f64 = 0.01;
/// Click-variance radius for slot targeting, in pixels
const SLOT_CLICK_RADIUS: i32 = 10;

/// One hand on the mouse and keyboard
///
/// Owns the input backend, the RNG, the operator profile and the
/// key-sequence context, and exposes the humanized operations bot
/// scripts are written against.
pub struct Ghosthand<B, R = ThreadRng> {
    backend: B,
    rng: R,
    profile: HumanProfile,
    context: KeyContext,
    keys: KeySequence,
    detector: SlotDetector,
}

#[cfg(feature = "os-input")]
impl Ghosthand<input::EnigoBackend> {
    /// Create a hand driving the real cursor and keyboard
    pub fn new() -> Self {
        Self::with_backend(input::EnigoBackend::new())
    }
}

#[cfg(feature = "os-input")]
impl Default for Ghosthand<input::EnigoBackend> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: InputBackend> Ghosthand<B> {
    /// Create a hand over a custom backend
    pub fn with_backend(backend: B) -> Self {
        Self::with_rng(backend, rand::thread_rng())
    }
}

impl<B: InputBackend, R: Rng> Ghosthand<B, R> {
    /// Create a hand with an explicit RNG, for reproducible runs
    pub fn with_rng(backend: B, rng: R) -> Self {
        Self {
            backend,
            rng,
            profile: HumanProfile::default(),
            context: KeyContext::Neutral,
            keys: KeySequence::new(),
            detector: SlotDetector::default(),
        }
    }

    /// Replace the operator profile
    pub fn set_profile(&mut self, profile: HumanProfile) {
        self.profile = profile;
    }

    /// Set the context applied to subsequent key presses
    pub fn set_context(&mut self, context: KeyContext) {
        self.context = context;
    }

    /// Forget the inter-key sequence history
    pub fn reset_keys(&mut self) {
        self.keys.reset();
    }

    /// The underlying backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Consume the hand, returning the backend
    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Move the cursor to an absolute position along a humanized curve
    pub fn move_to(&mut self, x: i32, y: i32, base_duration: f64) -> Result<(), InputError> {
        motion::move_cursor(&mut self.backend, &mut self.rng, x, y, base_duration)
    }

    /// Move the cursor by a relative delta along a humanized curve
    pub fn move_rel(&mut self, dx: i32, dy: i32, base_duration: f64) -> Result<(), InputError> {
        motion::move_relative(&mut self.backend, &mut self.rng, dx, dy, base_duration)
    }

    /// Move to a random point inside a rectangle
    pub fn move_within(
        &mut self,
        x: RangeInclusive<i32>,
        y: RangeInclusive<i32>,
        base_duration: f64,
    ) -> Result<(), InputError> {
        motion::move_within(&mut self.backend, &mut self.rng, x, y, base_duration)
    }

    /// Move onto an inventory slot with click variance
    ///
    /// An out-of-range slot pauses instead of moving, keeping scripted
    /// sequences alive.
    pub fn move_to_slot(
        &mut self,
        grid: &SlotGridConfig,
        slot: usize,
        base_duration: f64,
    ) -> Result<(), InputError> {
        match grid.jittered_slot(slot, SLOT_CLICK_RADIUS, &mut self.rng) {
            Some((x, y)) => self.move_to(x, y, base_duration),
            None => {
                SleepBand::new(0.1, 0.9, 0.9).sleep(&mut self.rng);
                Ok(())
            }
        }
    }

    /// Run the idle-break wander sequence
    pub fn wander(&mut self) -> Result<(), InputError> {
        motion::wander(&mut self.backend, &mut self.rng)
    }

    /// Click a button with the default humanized hold
    pub fn click(&mut self, button: MouseButton) -> Result<(), InputError> {
        self.click_hold(button, CLICK_HOLD_BASE)
    }

    /// Click a button with a custom base hold duration
    pub fn click_hold(&mut self, button: MouseButton, hold: f64) -> Result<(), InputError> {
        self.backend.button_down(button)?;
        let hold = timing::press_hold(hold, &mut self.rng);
        thread::sleep(Duration::from_secs_f64(hold));
        self.backend.button_up(button)?;
        SleepBand::SETTLE.sleep(&mut self.rng);
        Ok(())
    }

    /// Move to a position and left-click it
    pub fn click_at(&mut self, x: i32, y: i32, base_duration: f64) -> Result<(), InputError> {
        self.move_to(x, y, base_duration)?;
        self.click(MouseButton::Left)
    }

    /// Press and release a key with humanized gap and hold
    ///
    /// The gap before the press comes from the key-sequence context;
    /// the hold comes from the kind, the active context and the
    /// operator profile.
    pub fn press_key(&mut self, key: Key, kind: KeyKind, hold: f64) -> Result<(), InputError> {
        let gap = self.keys.delay(key, KEY_GAP_BASE, &mut self.rng);
        thread::sleep(Duration::from_secs_f64(gap));

        self.backend.key_down(key)?;
        let hold =
            timing::hold_duration(kind, self.context, hold, &self.profile, true, &mut self.rng);
        thread::sleep(Duration::from_secs_f64(hold));
        self.backend.key_up(key)?;

        SleepBand::STANDARD.sleep(&mut self.rng);
        Ok(())
    }

    /// Block for a duration sampled from the band
    pub fn sleep(&mut self, band: SleepBand) {
        band.sleep(&mut self.rng);
    }

    /// Detect the slot grid in a captured frame
    pub fn calibrate(&self, frame: &Frame) -> GridDetection {
        self.detector.detect(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{InputEvent, RecordingBackend};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn hand() -> Ghosthand<RecordingBackend, StdRng> {
        Ghosthand::with_rng(RecordingBackend::at(500, 500), StdRng::seed_from_u64(70))
    }

    #[test]
    fn test_click_orders_press_release() {
        let mut hand = hand();
        hand.click(MouseButton::Left).unwrap();

        let events = hand.backend().events();
        assert_eq!(events[0], InputEvent::ButtonDown(MouseButton::Left));
        assert_eq!(events[1], InputEvent::ButtonUp(MouseButton::Left));
    }

    #[test]
    fn test_press_key_orders_down_up() {
        let mut hand = hand();
        hand.press_key(Key::Space, KeyKind::Action, 0.02).unwrap();

        let events = hand.backend().events();
        assert_eq!(events[0], InputEvent::KeyDown(Key::Space));
        assert_eq!(events[1], InputEvent::KeyUp(Key::Space));
    }

    #[test]
    fn test_click_at_moves_then_clicks() {
        let mut hand = hand();
        hand.click_at(800, 400, 0.05).unwrap();

        let events = hand.backend().events();
        let down = events
            .iter()
            .position(|e| matches!(e, InputEvent::ButtonDown(_)))
            .unwrap();
        // Last move before the press landed exactly on the target
        let last_move = events[..down]
            .iter()
            .rev()
            .find_map(|e| match e {
                InputEvent::MoveTo(x, y) => Some((*x, *y)),
                _ => None,
            })
            .unwrap();
        assert_eq!(last_move, (800, 400));
    }

    #[test]
    fn test_move_to_slot_lands_in_click_area() {
        let grid = SlotGridConfig::default();
        let mut hand = hand();
        hand.move_to_slot(&grid, 6, 0.05).unwrap();

        // Slot 6: column 1, row 1 of the default grid
        let (cx, cy) = grid.slot_center(6).unwrap();
        let (x, y) = hand.backend.cursor_position().unwrap();
        assert!((x - cx).abs() <= SLOT_CLICK_RADIUS);
        assert!((y - cy).abs() <= SLOT_CLICK_RADIUS);
    }

    #[test]
    fn test_move_to_invalid_slot_is_a_pause() {
        let grid = SlotGridConfig::default();
        let mut hand = hand();
        hand.move_to_slot(&grid, 29, 0.05).unwrap();
        assert!(hand.backend().events().is_empty());
    }

    #[test]
    fn test_calibrate_blank_frame_defaults() {
        let hand = hand();
        let frame = Frame::from_image(image::RgbImage::new(640, 480));
        let detection = hand.calibrate(&frame);
        assert!(!detection.is_detected());
        assert_eq!(detection.config, SlotGridConfig::default());
    }
}
