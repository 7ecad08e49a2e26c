//! Inter-key delay sequencing
//!
//! Consecutive key presses are not evenly spaced: practiced
//! combinations come out faster, awkward reaches slower. The sequence
//! context is an explicit object owned by the caller, so concurrent
//! simulated input streams each carry their own history.

use rand::Rng;

use crate::input::Key;

use super::MIN_DURATION;

/// Well-practiced combinations, pressed faster than the base delay
const FAST_PAIRS: &[(Key, Key)] = &[
    (Key::LeftCtrl, Key::Char('1')),
    (Key::LeftCtrl, Key::Char('2')),
    (Key::Shift, Key::Space),
];

/// Awkward reaches, pressed slower than the base delay
const AWKWARD_PAIRS: &[(Key, Key)] = &[
    (Key::Char('1'), Key::Char('9')),
    (Key::LeftCtrl, Key::Char('0')),
];

const FAST_MULTIPLIER: f64 = 0.7;
const AWKWARD_MULTIPLIER: f64 = 1.3;
/// Uniform jitter added to every delay, +/- 10ms
const JITTER: f64 = 0.01;

/// Tracks the previous key of a simulated press sequence
#[derive(Debug, Clone, Copy, Default)]
pub struct KeySequence {
    last: Option<Key>,
}

impl KeySequence {
    /// Start a fresh sequence with no history
    pub fn new() -> Self {
        Self::default()
    }

    /// The previously pressed key, if any
    pub fn last_key(&self) -> Option<Key> {
        self.last
    }

    /// Forget the sequence history
    pub fn reset(&mut self) {
        self.last = None;
    }

    /// Delay before pressing `next`, updating the sequence history
    ///
    /// Applies the fast/awkward pair multipliers against the previous
    /// key, adds jitter, and floors the result at [`MIN_DURATION`].
    pub fn delay(&mut self, next: Key, base: f64, rng: &mut impl Rng) -> f64 {
        let mut delay = base;

        if let Some(prev) = self.last {
            if FAST_PAIRS.contains(&(prev, next)) {
                delay *= FAST_MULTIPLIER;
            }
            if AWKWARD_PAIRS.contains(&(prev, next)) {
                delay *= AWKWARD_MULTIPLIER;
            }
        }

        delay += rng.gen::<f64>() * (2.0 * JITTER) - JITTER;
        self.last = Some(next);

        delay.max(MIN_DURATION)
    }
}
