//! Engine configuration.
//!
//! Everything the original app kept in ambient singletons is explicit
//! here: fixed base reward values, growth and watering constants, and the
//! fallback reward ids used when a daily claim would grant a duplicate
//! badge or plant. Loadable from TOML; the `Default` values match the
//! shipped catalog.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StorageError};

/// Tunable engine constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Reward value for base task/focus XP (formula string).
    #[serde(default = "default_base_xp")]
    pub base_xp_value: String,
    /// Reward value for base task/focus coins (formula string).
    #[serde(default = "default_base_coins")]
    pub base_coin_value: String,
    /// Growth points granted to the selected plant per completion.
    #[serde(default = "default_growth_points")]
    pub growth_points_per_completion: i64,
    /// Growth point bonus for a manual watering.
    #[serde(default = "default_watering_bonus")]
    pub watering_bonus_points: i64,
    /// Focus sessions shorter than this earn no rewards.
    #[serde(default = "default_min_focus")]
    pub min_focus_duration_secs: u32,
    /// Substitute reward when a daily claim would grant an owned badge.
    #[serde(default = "default_fallback_badge")]
    pub duplicate_badge_fallback_reward_id: i64,
    /// Substitute reward when a daily claim would grant an owned plant.
    #[serde(default = "default_fallback_plant")]
    pub duplicate_plant_fallback_reward_id: i64,
}

fn default_base_xp() -> String {
    "10".to_string()
}
fn default_base_coins() -> String {
    "2".to_string()
}
fn default_growth_points() -> i64 {
    2
}
fn default_watering_bonus() -> i64 {
    10
}
fn default_min_focus() -> u32 {
    10 * 60
}
fn default_fallback_badge() -> i64 {
    100
}
fn default_fallback_plant() -> i64 {
    101
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            base_xp_value: default_base_xp(),
            base_coin_value: default_base_coins(),
            growth_points_per_completion: default_growth_points(),
            watering_bonus_points: default_watering_bonus(),
            min_focus_duration_secs: default_min_focus(),
            duplicate_badge_fallback_reward_id: default_fallback_badge(),
            duplicate_plant_fallback_reward_id: default_fallback_plant(),
        }
    }
}

impl EngineConfig {
    /// Load from a TOML file, falling back to defaults when absent.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(EngineConfig::default());
        }
        let raw = std::fs::read_to_string(path)
            .map_err(|e| StorageError::OpenFailed(e.to_string()))?;
        let config = toml::from_str(&raw)
            .map_err(|e| StorageError::CorruptRow {
                table: "config",
                message: e.to_string(),
            })?;
        Ok(config)
    }

    /// Write the config as TOML.
    pub fn save(&self, path: &Path) -> Result<()> {
        let raw = toml::to_string_pretty(self)
            .map_err(|e| StorageError::QueryFailed(e.to_string()))?;
        std::fs::write(path, raw).map_err(|e| StorageError::QueryFailed(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_catalog_constants() {
        let config = EngineConfig::default();
        assert_eq!(config.base_xp_value, "10");
        assert_eq!(config.base_coin_value, "2");
        assert_eq!(config.duplicate_badge_fallback_reward_id, 100);
        assert_eq!(config.duplicate_plant_fallback_reward_id, 101);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: EngineConfig = toml::from_str(r#"watering_bonus_points = 25"#).unwrap();
        assert_eq!(config.watering_bonus_points, 25);
        assert_eq!(config.growth_points_per_completion, 2);
    }
}
