//! Key and button hold-duration sampling
//!
//! A hold time is the context-adjusted base plus main and micro
//! variance samples, post-adjusted by a named pattern drawn from a
//! per-kind weighted table. Patterns replace inline probability
//! branches so the behavior is auditable under fixed seeds.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use super::sleep::SleepBand;
use super::{HumanProfile, KeyContext, KeyKind, TimingSpec, MIN_DURATION};

/// Named post-adjustment applied to a sampled hold time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldPattern {
    /// No adjustment
    Standard,
    /// Occasional longer hold on action keys (x1.5)
    Extended,
    /// Common extended hold on movement keys (x2.0)
    Doubled,
    /// Quick inventory tap (x0.8)
    Quick,
    /// Consistent modifier hold: base plus micro variance only
    Steady,
}

const ACTION_PATTERNS: &[(HoldPattern, u32)] =
    &[(HoldPattern::Standard, 80), (HoldPattern::Extended, 20)];
const MOVEMENT_PATTERNS: &[(HoldPattern, u32)] =
    &[(HoldPattern::Doubled, 70), (HoldPattern::Standard, 30)];
const INVENTORY_PATTERNS: &[(HoldPattern, u32)] = &[(HoldPattern::Quick, 1)];
const MODIFIER_PATTERNS: &[(HoldPattern, u32)] = &[(HoldPattern::Steady, 1)];

/// Extra pauses layered onto a button hold, each rolled independently
///
/// Mirrors the way a held click is rarely one clean interval: most
/// holds pick up a quick extension, a few pick up a long one.
const PRESS_EMBELLISHMENTS: &[(f64, SleepBand)] = &[
    (0.382, SleepBand::new(0.002, 0.002, 0.001)),
    (0.89, SleepBand::QUICK),
    (0.005, SleepBand::new(0.05, 0.1, 0.05)),
    (0.177, SleepBand::new(0.05, 0.1, 0.12)),
];

/// Build the sampling parameters for one key press
///
/// Applies the context multiplier and the profile's fatigue factor
/// (fatigue raises both the base time and the main variance). All
/// output fields are clamped non-negative.
pub fn key_spec(base: f64, kind: KeyKind, context: KeyContext, profile: &HumanProfile) -> TimingSpec {
    let (variance_main, variance_micro) = profile.skill.variances();
    let fatigue_multiplier = 1.0 + profile.fatigue.clamp(0.0, 1.0) * 0.5;

    TimingSpec {
        base: (base * context.multiplier() * fatigue_multiplier).max(0.0),
        variance_main: variance_main * fatigue_multiplier,
        variance_micro,
        kind,
    }
}

/// Pick the hold pattern for a key kind from its weighted table
pub fn pick_hold_pattern(kind: KeyKind, rng: &mut impl Rng) -> HoldPattern {
    let table = match kind {
        KeyKind::Action => ACTION_PATTERNS,
        KeyKind::Movement => MOVEMENT_PATTERNS,
        KeyKind::Inventory => INVENTORY_PATTERNS,
        KeyKind::Modifier => MODIFIER_PATTERNS,
    };
    let weights = WeightedIndex::new(table.iter().map(|(_, w)| *w))
        .expect("pattern tables are static and non-empty");
    table[weights.sample(rng)].0
}

/// Sample the total hold duration for a key press
///
/// Always returns at least [`MIN_DURATION`], including for zero or
/// negative base durations and when randomization is disabled.
pub fn hold_duration(
    kind: KeyKind,
    context: KeyContext,
    base: f64,
    profile: &HumanProfile,
    randomize: bool,
    rng: &mut impl Rng,
) -> f64 {
    if !randomize {
        return base.max(MIN_DURATION);
    }

    let spec = key_spec(base, kind, context, profile);

    // Centered main + micro variance samples
    let mut hold = spec.base + rng.gen::<f64>() * spec.variance_main - spec.variance_main / 2.0;
    hold += rng.gen::<f64>() * spec.variance_micro - spec.variance_micro / 2.0;

    hold = match pick_hold_pattern(kind, rng) {
        HoldPattern::Standard => hold,
        HoldPattern::Extended => hold * 1.5,
        HoldPattern::Doubled => hold * 2.0,
        HoldPattern::Quick => hold * 0.8,
        HoldPattern::Steady => spec.base + rng.gen::<f64>() * spec.variance_micro,
    };

    hold.max(MIN_DURATION)
}

/// Sample the hold duration for a mouse button press
///
/// The base band scales with the requested hold, then each
/// embellishment pause is rolled independently in order.
pub fn press_hold(base: f64, rng: &mut impl Rng) -> f64 {
    let base = base.max(0.0);
    let band = SleepBand::new(
        base,
        base / 2.0 * rng.gen::<f64>(),
        base / 3.0 * rng.gen::<f64>(),
    );
    let mut hold = band.sample(rng);

    for &(chance, pause) in PRESS_EMBELLISHMENTS {
        if rng.gen::<f64>() < chance {
            hold += pause.sample(rng);
        }
    }

    hold.max(MIN_DURATION)
}
