//! Randomized sleep bands
//!
//! A sleep duration is sampled as `floor + r1 * main + r2 * micro` with
//! two independent uniform draws, so repeated sleeps cluster near the
//! floor but occasionally stretch toward the band's full width.

use std::thread;
use std::time::Duration;

use rand::Rng;

/// A three-component randomized sleep duration, in seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SleepBand {
    /// Fixed minimum component
    pub floor: f64,
    /// Main uniform component width
    pub main: f64,
    /// Micro uniform component width
    pub micro: f64,
}

impl SleepBand {
    /// Quick actions, ~7-32ms
    pub const QUICK: SleepBand = SleepBand::new(0.007, 0.008, 0.017);
    /// Default medium pause, ~23-479ms
    pub const STANDARD: SleepBand = SleepBand::new(0.023, 0.128, 0.328);
    /// Long deliberate pause, ~0.8-1.8s
    pub const LONG: SleepBand = SleepBand::new(0.802, 0.421, 0.614);
    /// Post-click settle, ~10-70ms
    pub const SETTLE: SleepBand = SleepBand::new(0.01, 0.03, 0.03);

    /// Create a band; components must be non-negative
    pub const fn new(floor: f64, main: f64, micro: f64) -> Self {
        Self { floor, main, micro }
    }

    /// Sample a duration from this band
    pub fn sample(&self, rng: &mut impl Rng) -> f64 {
        self.floor + rng.gen::<f64>() * self.main + rng.gen::<f64>() * self.micro
    }

    /// Sample a duration and block the current thread for it
    pub fn sleep(&self, rng: &mut impl Rng) {
        thread::sleep(Duration::from_secs_f64(self.sample(rng)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_sample_stays_in_band() {
        let mut rng = StdRng::seed_from_u64(1);
        let band = SleepBand::new(0.05, 0.1, 0.2);

        for _ in 0..1000 {
            let d = band.sample(&mut rng);
            assert!(d >= 0.05);
            assert!(d <= 0.05 + 0.1 + 0.2);
        }
    }

    #[test]
    fn test_zero_band_is_floor() {
        let mut rng = StdRng::seed_from_u64(2);
        let band = SleepBand::new(0.5, 0.0, 0.0);

        for _ in 0..10 {
            assert_eq!(band.sample(&mut rng), 0.5);
        }
    }

    #[test]
    fn test_named_bands_ordered() {
        // The quick band's ceiling sits below the long band's floor.
        let quick_max = SleepBand::QUICK.floor + SleepBand::QUICK.main + SleepBand::QUICK.micro;
        assert!(quick_max < SleepBand::LONG.floor);
    }
}
