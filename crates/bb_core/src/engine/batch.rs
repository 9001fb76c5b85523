//! Monte Carlo batches
//!
//! Games are independent: every game gets fresh `Team` state reset from the
//! shared rosters and its own RNG seeded from `seed + index`, so results do
//! not depend on how rayon schedules them.

use super::config::SimConfig;
use super::game::GameEngine;
use super::sampler::PlateAppearanceModel;
use crate::error::Result;
use crate::models::{Roster, Team, TeamSide};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Score line of one game in a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub index: u32,
    pub seed: u64,
    pub away_runs: u32,
    pub home_runs: u32,
    pub innings: u32,
    pub winner: TeamSide,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub away: String,
    pub home: String,
    pub games: Vec<GameSummary>,
    pub away_wins: u32,
    pub home_wins: u32,
    pub extra_inning_games: u32,
}

impl BatchSummary {
    fn from_games(away: String, home: String, games: Vec<GameSummary>, regulation: u32) -> Self {
        let home_wins = games.iter().filter(|g| g.winner == TeamSide::Home).count() as u32;
        let away_wins = games.len() as u32 - home_wins;
        let extra_inning_games = games.iter().filter(|g| g.innings > regulation).count() as u32;
        Self { away, home, games, away_wins, home_wins, extra_inning_games }
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    pub fn win_probability(&self, side: TeamSide) -> f64 {
        if self.games.is_empty() {
            return 0.0;
        }
        let wins = match side {
            TeamSide::Away => self.away_wins,
            TeamSide::Home => self.home_wins,
        };
        wins as f64 / self.games.len() as f64
    }

    pub fn mean_runs(&self, side: TeamSide) -> f64 {
        if self.games.is_empty() {
            return 0.0;
        }
        let total: u32 = self
            .games
            .iter()
            .map(|g| match side {
                TeamSide::Away => g.away_runs,
                TeamSide::Home => g.home_runs,
            })
            .sum();
        total as f64 / self.games.len() as f64
    }

    pub fn mean_innings(&self) -> f64 {
        if self.games.is_empty() {
            return 0.0;
        }
        self.games.iter().map(|g| g.innings as f64).sum::<f64>() / self.games.len() as f64
    }
}

/// Play `n` independent games in parallel.
pub fn run_simulations<M>(
    n: u32,
    away: &Roster,
    home: &Roster,
    model: &M,
    config: &SimConfig,
    seed: u64,
) -> Result<BatchSummary>
where
    M: PlateAppearanceModel + Sync + ?Sized,
{
    config.validate()?;
    let away = Arc::new(away.clone());
    let home = Arc::new(home.clone());

    let games = (0..n)
        .into_par_iter()
        .map(|index| {
            let game_seed = seed.wrapping_add(index as u64);
            let engine = GameEngine::new(
                Team::new(Arc::clone(&away)),
                Team::new(Arc::clone(&home)),
                model,
                config,
                game_seed,
            )?;
            let result = engine.play();
            Ok(GameSummary {
                index,
                seed: game_seed,
                away_runs: result.away_runs,
                home_runs: result.home_runs,
                innings: result.innings,
                winner: result.winner(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let summary = BatchSummary::from_games(
        away.name.clone(),
        home.name.clone(),
        games,
        config.game.regulation_innings,
    );
    log::info!(
        "Batch of {}: {} {:.3} / {} {:.3}",
        summary.len(),
        summary.away,
        summary.win_probability(TeamSide::Away),
        summary.home,
        summary.win_probability(TeamSide::Home)
    );
    Ok(summary)
}
