//! Roster Builder Library
//!
//! Projection CSVs → `bb_core` rosters and matchup tables.

pub mod player_csv;

use anyhow::Result;
use bb_core::models::{Batter, MatchupTable, Pitcher, Roster};
use thiserror::Error;

pub use player_csv::{
    load_hitters, load_matchup_table, load_pitchers, read_hitters, read_matchup_table,
    read_pitchers, HitterEntry, ParseStats, PitcherEntry,
};

/// Batting order length taken from the top of a team's hitter rows.
pub const LINEUP_SIZE: usize = 9;

/// Row or roster level validation failures.
#[derive(Debug, Error, PartialEq)]
pub enum LoadError {
    #[error("line {line}: unknown hand label '{label}' for {player}")]
    UnknownHand { line: u64, player: String, label: String },

    #[error("no hitters or pitchers listed for team '{team}'")]
    UnknownTeam { team: String },

    #[error("team '{team}' has {found} hitters, a lineup needs {needed}")]
    ShortLineup { team: String, found: usize, needed: usize },

    #[error("team '{team}' has no pitchers")]
    NoPitchers { team: String },
}

fn on_team(entry_team: &Option<String>, team: &str) -> bool {
    entry_team.as_deref().is_some_and(|t| t.eq_ignore_ascii_case(team))
}

/// Assemble a team from loaded rows.
///
/// The first nine hitters listed for `team` bat in file order; the first
/// pitcher listed starts and the rest form the bullpen.
pub fn build_roster(team: &str, hitters: &[HitterEntry], pitchers: &[PitcherEntry]) -> Result<Roster> {
    let all_hitters: Vec<Batter> = hitters
        .iter()
        .filter(|h| on_team(&h.team, team))
        .map(|h| h.batter.clone())
        .collect();
    let staff: Vec<Pitcher> = pitchers
        .iter()
        .filter(|p| on_team(&p.team, team))
        .map(|p| p.pitcher.clone())
        .collect();

    if all_hitters.is_empty() && staff.is_empty() {
        return Err(LoadError::UnknownTeam { team: team.to_string() }.into());
    }
    if all_hitters.len() < LINEUP_SIZE {
        return Err(LoadError::ShortLineup {
            team: team.to_string(),
            found: all_hitters.len(),
            needed: LINEUP_SIZE,
        }
        .into());
    }
    if staff.is_empty() {
        return Err(LoadError::NoPitchers { team: team.to_string() }.into());
    }
    if all_hitters.len() > LINEUP_SIZE {
        log::debug!("{}: {} hitters listed, using the first {}", team, all_hitters.len(), LINEUP_SIZE);
    }

    let lineup = all_hitters.into_iter().take(LINEUP_SIZE).collect();
    Ok(Roster::new(team, lineup, staff)?)
}

/// Hitter and pitcher tables built from the two rosters' own records.
pub fn tables_from_rosters(away: &Roster, home: &Roster) -> Result<(MatchupTable, MatchupTable)> {
    let batters: Vec<Batter> = away.lineup.iter().chain(home.lineup.iter()).cloned().collect();
    let pitchers: Vec<Pitcher> = away.staff().iter().chain(home.staff().iter()).cloned().collect();
    Ok((
        MatchupTable::from_batters("hitters", &batters)?,
        MatchupTable::from_pitchers("pitchers", &pitchers)?,
    ))
}
