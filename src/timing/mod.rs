//! Randomized duration sampling for simulated input
//!
//! Produces human-plausible hold times, inter-key delays and sleeps.
//! Every sampler is a pure function over a caller-supplied RNG so tests
//! can pin fixed seeds; the only sequencing state is the explicit
//! [`KeySequence`] context object.

pub mod hold;
pub mod sequence;
pub mod sleep;

pub use hold::{hold_duration, key_spec, press_hold, HoldPattern};
pub use sequence::KeySequence;
pub use sleep::SleepBand;

/// Floor applied to every sampled duration, in seconds
///
/// Keeps degenerate inputs (zero or negative bases) from producing
/// zero-length or negative sleeps.
pub const MIN_DURATION: f64 = 0.01;

/// What kind of key is being held
///
/// Selects the post-adjustment pattern table: action keys occasionally
/// linger, movement keys are commonly held, inventory keys are quick,
/// modifiers are steady.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Action,
    Movement,
    Inventory,
    Modifier,
}

/// The situation a key press happens in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyContext {
    /// Fast, reactive presses
    Combat,
    /// Steady travel keys
    Movement,
    /// Deliberate menu interaction
    Inventory,
    /// No particular context
    Neutral,
}

impl KeyContext {
    /// Base-duration multiplier for this context
    pub fn multiplier(self) -> f64 {
        match self {
            KeyContext::Combat => 0.8,
            KeyContext::Movement => 1.0,
            KeyContext::Inventory => 1.2,
            KeyContext::Neutral => 1.0,
        }
    }
}

/// Simulated operator skill, sizing the variance bands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillLevel {
    Beginner,
    Average,
    Expert,
}

impl SkillLevel {
    /// (main, micro) variance band widths in seconds
    pub fn variances(self) -> (f64, f64) {
        match self {
            SkillLevel::Beginner => (0.3, 0.15),
            SkillLevel::Average => (0.2, 0.1),
            SkillLevel::Expert => (0.1, 0.05),
        }
    }
}

/// Profile of the simulated human operator
#[derive(Debug, Clone, Copy)]
pub struct HumanProfile {
    /// Skill level selecting the variance bands
    pub skill: SkillLevel,
    /// Fatigue 0.0-1.0; raises both base time and main variance
    pub fatigue: f64,
}

impl Default for HumanProfile {
    fn default() -> Self {
        Self {
            skill: SkillLevel::Average,
            fatigue: 0.0,
        }
    }
}

/// Sampling parameters for one key press
///
/// Invariant: all fields are non-negative; durations sampled from a
/// spec are clamped to [`MIN_DURATION`].
#[derive(Debug, Clone, Copy)]
pub struct TimingSpec {
    /// Context- and fatigue-adjusted base duration
    pub base: f64,
    /// Main variance band width
    pub variance_main: f64,
    /// Micro variance band width
    pub variance_micro: f64,
    /// Key kind the spec was built for
    pub kind: KeyKind,
}
