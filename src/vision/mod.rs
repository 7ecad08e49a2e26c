//! Vision and slot-grid detection
//!
//! Locates the highlighted inventory-slot grid in a captured frame and
//! derives its origin and spacing. Detection never fails hard: when the
//! image does not yield a confident grid, the result carries the
//! default configuration and a tagged reason.

pub mod detect;
pub mod frame;

pub use detect::{DetectorParams, HsvRange, SlotDetector};
pub use frame::Frame;

use crate::config::SlotGridConfig;

/// Vision errors
#[derive(Debug, thiserror::Error)]
pub enum VisionError {
    #[error("invalid frame data: expected {expected} bytes, got {actual}")]
    InvalidFrameData { expected: usize, actual: usize },
    #[error("frame dimensions are zero")]
    EmptyFrame,
}

/// Why detection fell back to the default configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FallbackReason {
    #[error("only {found} candidate slots found, need at least 8")]
    TooFewSlots { found: usize },
    #[error("could not measure spacing between detected slots")]
    NoSpacings,
    #[error("computed spacing {x}x{y}px is outside the plausible range")]
    ImplausibleSpacing { x: i32, y: i32 },
}

/// A candidate slot region produced during one detection pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotCandidate {
    /// Center of the region, in cropped-quadrant coordinates
    pub centroid: (i32, i32),
    /// Squareness confidence in [0, 1]
    pub confidence: f32,
}

/// Result of a slot-grid detection pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridDetection {
    /// Detected grid parameters, or the defaults when falling back
    pub config: SlotGridConfig,
    /// Number of candidate slots that survived filtering
    pub slots_found: usize,
    /// Present when the config is the default fallback
    pub fallback: Option<FallbackReason>,
}

impl GridDetection {
    /// Whether the grid was confidently detected (not defaulted)
    pub fn is_detected(&self) -> bool {
        self.fallback.is_none()
    }

    pub(crate) fn detected(config: SlotGridConfig, slots_found: usize) -> Self {
        Self {
            config,
            slots_found,
            fallback: None,
        }
    }

    pub(crate) fn defaulted(reason: FallbackReason, slots_found: usize) -> Self {
        Self {
            config: SlotGridConfig::default(),
            slots_found,
            fallback: Some(reason),
        }
    }
}
