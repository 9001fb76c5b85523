//! # bb_core - Deterministic Baseball Game Simulation Engine
//!
//! Plays full nine-inning (or longer) games one plate appearance at a time.
//! Every appearance is drawn from a blend of hitter and pitcher outcome
//! distributions looked up in matchup tables.
//!
//! ## Features
//! - Deterministic simulation (same seed = same result)
//! - Forced and hit-driven base running with earned/unearned run accounting
//! - Starter and reliever usage rules with lookahead bullpen selection
//! - Box score, line score and pitching-appearance log per game
//! - Parallel Monte Carlo batches

// Game engine APIs often require many parameters for state, config and RNG
#![allow(clippy::too_many_arguments)]

pub mod engine;
pub mod error;
pub mod models;

pub use engine::{
    run_simulations, simulate_game, BatchSummary, GameEngine, MatchupSampler, PlateAppearanceModel,
    ScriptedModel, SimConfig,
};
pub use error::{Result, SimError};
pub use models::{
    Batter, BoxScore, GameResult, Half, Hand, LineScore, MatchupRow, MatchupTable, Outcome,
    OutcomeProbs, Pitcher, Roster, Team, TeamSide,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
