//! # Simulation configuration
//!
//! Every tuning constant of the game core lives here so a run can be
//! reproduced or re-balanced from a single JSON/YAML file.
//!
//! ```rust
//! use bb_core::engine::config::SimConfig;
//!
//! let config = SimConfig::default();
//! assert!(config.validate().is_ok());
//! ```

mod usage_config;

pub use usage_config::{BfRange, RelieverConfig, StarterConfig};

use crate::error::{Result, SimError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Env var consulted by front ends when no explicit config path is given.
pub const SIM_CONFIG_PATH_ENV: &str = "BB_SIM_CONFIG_PATH";

/// Plate-appearance blending
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Weight of the hitter row; the pitcher row gets the rest (default: 0.6)
    pub hitter_weight: f64,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self { hitter_weight: 0.6 }
    }
}

/// Game length
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Innings before the game may end (default: 9)
    pub regulation_innings: u32,
    /// First inning in which reserve arms may be used (default: 10)
    pub extra_innings_start: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self { regulation_innings: 9, extra_innings_start: 10 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    #[serde(default)]
    pub sampler: SamplerConfig,
    #[serde(default)]
    pub starter: StarterConfig,
    #[serde(default)]
    pub reliever: RelieverConfig,
    #[serde(default)]
    pub game: GameConfig,
}

impl SimConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load and validate a `.json`, `.yaml` or `.yml` file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&content)?,
            _ => Self::from_json(&content)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let unit = |name: &str, v: f64| -> Result<()> {
            if !(0.0..=1.0).contains(&v) {
                return Err(SimError::InvalidConfig(format!("{} must be in [0, 1], got {}", name, v)));
            }
            Ok(())
        };
        let range = |name: &str, r: BfRange| -> Result<()> {
            if r[0] > r[1] {
                return Err(SimError::InvalidConfig(format!("{} range is reversed: {:?}", name, r)));
            }
            Ok(())
        };

        unit("sampler.hitter_weight", self.sampler.hitter_weight)?;
        unit("starter.extension_chance", self.starter.extension_chance)?;
        unit("starter.fatigue_base", self.starter.fatigue_base)?;
        unit("starter.fatigue_step", self.starter.fatigue_step)?;
        range("starter.stamina_cap", self.starter.stamina_cap)?;
        range("starter.extension_cap", self.starter.extension_cap)?;
        range("reliever.default_cap", self.reliever.default_cap)?;
        range("reliever.entry_cap", self.reliever.entry_cap)?;

        if self.starter.hard_ceiling == 0 {
            return Err(SimError::InvalidConfig("starter.hard_ceiling must be positive".into()));
        }
        if self.reliever.lookahead == 0 {
            return Err(SimError::InvalidConfig("reliever.lookahead must be positive".into()));
        }
        if self.game.regulation_innings == 0 {
            return Err(SimError::InvalidConfig("game.regulation_innings must be positive".into()));
        }
        Ok(())
    }
}

// ========== Tests ==========
