//! Simulation engine: sampling, base running, pitcher usage and game flow.

pub mod bases;
pub mod batch;
pub mod bullpen;
pub mod config;
pub mod game;
mod half_inning;
pub mod sampler;
pub mod usage;

pub use bases::{Advance, BaseState};
pub use batch::{run_simulations, BatchSummary, GameSummary};
pub use bullpen::{project, select_reliever, Replacement};
pub use config::{SimConfig, SIM_CONFIG_PATH_ENV};
pub use game::{simulate_game, GameEngine, HalfInningSummary};
pub use sampler::{blend, draw, MatchupSampler, PlateAppearanceModel, ScriptedModel};
pub use usage::{PullReason, Role, Stint, UsageDecision, UsagePolicy};
