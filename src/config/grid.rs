//! Slot grid configuration and persistence
//!
//! A flat record of the inventory grid's origin and spacing, stored as
//! JSON. Loading is forgiving (absent or unreadable files yield the
//! defaults); saving goes through a temp file and rename so the
//! overwrite is atomic from the caller's perspective.

use std::fs;
use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Configuration persistence errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to write config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Inventory slot grid parameters
///
/// Calibrated for 1920x1080; the defaults match the supported client
/// layout when detection cannot improve on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotGridConfig {
    /// X of the first (top-left) slot center
    pub base_x: i32,
    /// Y of the first slot center
    pub base_y: i32,
    /// Horizontal distance between slot centers
    pub x_spacing: i32,
    /// Vertical distance between slot centers
    pub y_spacing: i32,
}

impl Default for SlotGridConfig {
    fn default() -> Self {
        Self {
            base_x: 1625,
            base_y: 638,
            x_spacing: 61,
            y_spacing: 51,
        }
    }
}

impl SlotGridConfig {
    /// Inventory columns
    pub const COLUMNS: usize = 4;
    /// Inventory rows
    pub const ROWS: usize = 7;
    /// Total slots
    pub const SLOTS: usize = Self::COLUMNS * Self::ROWS;

    /// Center coordinates of a 1-based inventory slot
    pub fn slot_center(&self, slot: usize) -> Option<(i32, i32)> {
        if slot == 0 || slot > Self::SLOTS {
            return None;
        }
        let index = slot - 1;
        let column = (index % Self::COLUMNS) as i32;
        let row = (index / Self::COLUMNS) as i32;
        Some((
            self.base_x + self.x_spacing * column,
            self.base_y + self.y_spacing * row,
        ))
    }

    /// Slot center displaced by a uniform click-variance radius
    ///
    /// A radius of 10 spreads clicks over a 21x21px area inside the
    /// item bounds.
    pub fn jittered_slot(
        &self,
        slot: usize,
        radius: i32,
        rng: &mut impl Rng,
    ) -> Option<(i32, i32)> {
        let (x, y) = self.slot_center(slot)?;
        Some((
            rng.gen_range(x - radius..=x + radius),
            rng.gen_range(y - radius..=y + radius),
        ))
    }

    /// Load a config, falling back to defaults
    ///
    /// An absent file, unreadable content or missing keys all yield the
    /// default configuration with a logged warning.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => config,
                Err(e) => {
                    log::warn!(
                        "config file {} is invalid ({e}), using defaults",
                        path.display()
                    );
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!(
                    "config file {} not readable ({e}), using defaults",
                    path.display()
                );
                Self::default()
            }
        }
    }

    /// Save the config as pretty JSON
    ///
    /// Writes a sibling temp file first and renames it into place.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(self)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, path)?;

        log::info!("calibration saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("ghosthand-{}-{name}.json", std::process::id()))
    }

    #[test]
    fn test_slot_center_grid_math() {
        let config = SlotGridConfig::default();

        assert_eq!(config.slot_center(1), Some((1625, 638)));
        assert_eq!(config.slot_center(2), Some((1686, 638)));
        assert_eq!(config.slot_center(4), Some((1808, 638)));
        assert_eq!(config.slot_center(5), Some((1625, 689)));
        assert_eq!(config.slot_center(28), Some((1808, 944)));
    }

    #[test]
    fn test_slot_center_out_of_range() {
        let config = SlotGridConfig::default();
        assert_eq!(config.slot_center(0), None);
        assert_eq!(config.slot_center(29), None);
    }

    #[test]
    fn test_jittered_slot_stays_in_radius() {
        let config = SlotGridConfig::default();
        let mut rng = StdRng::seed_from_u64(60);

        for _ in 0..200 {
            let (x, y) = config.jittered_slot(1, 10, &mut rng).unwrap();
            assert!((1615..=1635).contains(&x));
            assert!((628..=648).contains(&y));
        }
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let path = temp_path("round-trip");
        let config = SlotGridConfig {
            base_x: 1600,
            base_y: 640,
            x_spacing: 60,
            y_spacing: 50,
        };

        config.save(&path).unwrap();
        assert_eq!(SlotGridConfig::load(&path), config);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_missing_file_defaults() {
        let path = temp_path("does-not-exist");
        let _ = std::fs::remove_file(&path);
        assert_eq!(SlotGridConfig::load(&path), SlotGridConfig::default());
    }

    #[test]
    fn test_load_corrupt_file_defaults() {
        let path = temp_path("corrupt");
        std::fs::write(&path, "{\"base_x\": 12").unwrap();
        assert_eq!(SlotGridConfig::load(&path), SlotGridConfig::default());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_missing_keys_defaults() {
        let path = temp_path("missing-keys");
        std::fs::write(&path, "{\"base_x\": 1625, \"base_y\": 638}").unwrap();
        assert_eq!(SlotGridConfig::load(&path), SlotGridConfig::default());
        let _ = std::fs::remove_file(&path);
    }
}
