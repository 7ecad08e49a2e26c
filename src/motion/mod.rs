//! Humanized cursor motion
//!
//! Generates a curved, jittered, speed-varying trajectory between two
//! screen points and executes it against the input backend. The stepped
//! loop blocks the calling thread for the full movement time; that
//! wall-clock cost is the point.

pub mod bezier;
pub mod engine;

pub use bezier::{BezierPath, Point};
pub use engine::{
    drift, move_cursor, move_relative, move_within, scaled_duration, tremor, wander,
};
