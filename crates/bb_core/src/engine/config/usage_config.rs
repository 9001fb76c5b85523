//! Pitcher usage thresholds

use serde::{Deserialize, Serialize};

/// Inclusive batters-faced range `[lo, hi]` drawn uniformly.
pub type BfRange = [u32; 2];

/// Starter hooks, stamina and fatigue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarterConfig {
    // === Early hook ===
    /// Runs allowed that pull a starter who is getting shelled (default: 4)
    pub early_hook_runs: u32,
    /// ...only while batters faced is below this (default: 12)
    pub early_hook_max_bf: u32,

    // === Mid-game hook ===
    /// Batters faced after which `mid_hook_runs` pulls (default: 15)
    pub mid_hook_bf: u32,
    /// (default: 3)
    pub mid_hook_runs: u32,

    // === Stamina ===
    /// Stamina cap drawn once per stint (default: 18..=23)
    pub stamina_cap: BfRange,
    /// Runs allowed at or below which a cruising starter may go longer (default: 2)
    pub extension_max_runs: u32,
    /// Chance of extending at the cap (default: 0.15)
    pub extension_chance: f64,
    /// Replacement cap when extended (default: 24..=27)
    pub extension_cap: BfRange,
    /// Never face more than this (default: 27)
    pub hard_ceiling: u32,

    // === Fatigue ===
    /// Batters faced where random fatigue pulls start (default: 19)
    pub fatigue_start_bf: u32,
    /// Pull chance at `fatigue_start_bf` (default: 0.04)
    pub fatigue_base: f64,
    /// Extra chance per batter beyond it (default: 0.01)
    pub fatigue_step: f64,
}

impl Default for StarterConfig {
    fn default() -> Self {
        Self {
            early_hook_runs: 4,
            early_hook_max_bf: 12,

            mid_hook_bf: 15,
            mid_hook_runs: 3,

            stamina_cap: [18, 23],
            extension_max_runs: 2,
            extension_chance: 0.15,
            extension_cap: [24, 27],
            hard_ceiling: 27,

            fatigue_start_bf: 19,
            fatigue_base: 0.04,
            fatigue_step: 0.01,
        }
    }
}

/// Reliever hooks and caps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelieverConfig {
    /// Batters a reliever faces before he can be pulled outside emergencies (default: 3)
    pub min_batters: u32,
    /// Cap for a reliever that entered without one (default: 4..=9)
    pub default_cap: BfRange,
    /// Cap assigned by the selector on entry (default: 3..=5)
    pub entry_cap: BfRange,
    /// Runs allowed that pull (default: 2)
    pub runs_hook: u32,
    /// Runners on base that pull once `min_batters` is reached (default: 2)
    pub traffic_runners: u32,
    /// Upcoming batters used to project a candidate (default: 3)
    pub lookahead: usize,
}

impl Default for RelieverConfig {
    fn default() -> Self {
        Self {
            min_batters: 3,
            default_cap: [4, 9],
            entry_cap: [3, 5],
            runs_hook: 2,
            traffic_runners: 2,
            lookahead: 3,
        }
    }
}
