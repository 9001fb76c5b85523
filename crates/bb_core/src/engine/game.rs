//! Game orchestration
//!
//! Alternates half-innings from the top of the first until the game is
//! decided: no bottom half once the home team leads after a top half of the
//! last regulation inning or later, and the game ends after any bottom half
//! of that range that leaves the score untied.

use super::config::SimConfig;
use super::sampler::{MatchupSampler, PlateAppearanceModel};
use super::usage::Stint;
use crate::error::Result;
use crate::models::{
    AppearanceLog, BoxScore, GameResult, Half, LineScore, MatchupTable, PitcherId, Roster, Team,
    TeamLine, TeamSide,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Result of one half-inning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HalfInningSummary {
    pub half: Half,
    pub inning: u32,
    pub runs: u32,
    pub hits: u32,
    pub plate_appearances: u32,
    pub pitching_changes: u32,
}

/// One game in progress. Owns both teams' game state and the RNG.
pub struct GameEngine<'a, M: PlateAppearanceModel + ?Sized> {
    pub(crate) model: &'a M,
    pub(crate) config: &'a SimConfig,
    pub(crate) rng: ChaCha8Rng,
    pub(crate) seed: Option<u64>,
    /// Indexed by `TeamSide::index()`.
    pub(crate) teams: [Team; 2],
    pub(crate) stints: [Stint; 2],
    pub(crate) inning: u32,
    pub(crate) box_score: BoxScore,
    pub(crate) appearances: AppearanceLog,
    pub(crate) line_score: LineScore,
}

impl<'a, M: PlateAppearanceModel + ?Sized> GameEngine<'a, M> {
    /// Set up a game seeded with `seed`. Both teams are reset first.
    pub fn new(away: Team, home: Team, model: &'a M, config: &'a SimConfig, seed: u64) -> Result<Self> {
        let mut engine = Self::with_rng(away, home, model, config, ChaCha8Rng::seed_from_u64(seed))?;
        engine.seed = Some(seed);
        Ok(engine)
    }

    /// Set up a game driven by an existing RNG stream.
    pub fn with_rng(
        mut away: Team,
        mut home: Team,
        model: &'a M,
        config: &'a SimConfig,
        rng: ChaCha8Rng,
    ) -> Result<Self> {
        config.validate()?;
        away.reset();
        home.reset();

        let line_score = LineScore {
            away: TeamLine { name: away.name().to_string(), ..Default::default() },
            home: TeamLine { name: home.name().to_string(), ..Default::default() },
        };

        Ok(Self {
            model,
            config,
            rng,
            seed: None,
            teams: [away, home],
            stints: [Stint::starter(PitcherId::STARTER), Stint::starter(PitcherId::STARTER)],
            inning: 1,
            box_score: BoxScore::default(),
            appearances: AppearanceLog::default(),
            line_score,
        })
    }

    pub fn inning(&self) -> u32 {
        self.inning
    }

    pub fn team(&self, side: TeamSide) -> &Team {
        &self.teams[side.index()]
    }

    pub fn stint(&self, side: TeamSide) -> &Stint {
        &self.stints[side.index()]
    }

    pub fn runs(&self, side: TeamSide) -> u32 {
        self.line_score.side(side).runs
    }

    pub fn box_score(&self) -> &BoxScore {
        &self.box_score
    }

    pub fn appearances(&self) -> &AppearanceLog {
        &self.appearances
    }

    pub fn line_score(&self) -> &LineScore {
        &self.line_score
    }

    /// Play one half of the current inning and post it to the line score.
    /// The inning number advances after the bottom half.
    pub fn play_half(&mut self, half: Half) -> HalfInningSummary {
        let summary = self.simulate_half_inning(half);

        let batting = half.batting();
        let line = self.line_score.side_mut(batting);
        line.innings.push(summary.runs);
        line.runs += summary.runs;
        line.hits += summary.hits;

        log::debug!(
            "End of {} {}: {} {} - {} {}",
            half,
            self.inning,
            self.line_score.away.name,
            self.line_score.away.runs,
            self.line_score.home.name,
            self.line_score.home.runs
        );

        if half == Half::Bottom {
            self.inning += 1;
        }
        summary
    }

    /// Play to completion.
    pub fn play(mut self) -> GameResult {
        let regulation = self.config.game.regulation_innings;
        loop {
            let inning = self.inning;
            self.play_half(Half::Top);
            if inning >= regulation && self.runs(TeamSide::Home) > self.runs(TeamSide::Away) {
                break;
            }
            self.play_half(Half::Bottom);
            if inning >= regulation && self.runs(TeamSide::Home) != self.runs(TeamSide::Away) {
                break;
            }
        }
        self.into_result()
    }

    /// Snapshot the game as it stands.
    pub fn into_result(self) -> GameResult {
        let innings = self.line_score.away.innings.len() as u32;
        let result = GameResult {
            seed: self.seed,
            away: self.line_score.away.name.clone(),
            home: self.line_score.home.name.clone(),
            away_runs: self.line_score.away.runs,
            home_runs: self.line_score.home.runs,
            innings,
            box_score: self.box_score,
            appearances: self.appearances,
            line_score: self.line_score,
        };
        log::info!(
            "Final: {} {} - {} {} ({} innings)",
            result.away,
            result.away_runs,
            result.home,
            result.home_runs,
            result.innings
        );
        result
    }
}

/// Play one game between two rosters using table-driven matchups.
pub fn simulate_game(
    away: &Roster,
    home: &Roster,
    hitters: &MatchupTable,
    pitchers: &MatchupTable,
    config: &SimConfig,
    seed: u64,
) -> Result<GameResult> {
    let sampler = MatchupSampler::new(hitters.clone(), pitchers.clone(), &config.sampler);
    let engine = GameEngine::new(
        Team::new(away.clone()),
        Team::new(home.clone()),
        &sampler,
        config,
        seed,
    )?;
    Ok(engine.play())
}
