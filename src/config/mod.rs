//! Persisted calibration configuration
//!
//! The slot-grid parameters are the one artifact this crate persists;
//! bot scripts reload them between sessions.

pub mod grid;

pub use grid::{ConfigError, SlotGridConfig};
