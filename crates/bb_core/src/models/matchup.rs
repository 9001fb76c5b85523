//! Hand-segmented outcome tables.
//!
//! A table is a list of rows, each giving outcome probabilities for one
//! (batting side, pitcher hand) split, optionally tied to a named player.

use super::outcome::OutcomeProbs;
use super::player::{Batter, Hand, Pitcher};
use crate::error::{Result, SimError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchupRow {
    /// Player the row belongs to. `None` for league/hand-level rows.
    #[serde(default)]
    pub name: Option<String>,
    pub bats: Hand,
    pub pit_hand: Hand,
    pub probs: OutcomeProbs,
    /// DRA- of the named pitcher against `bats`, when the row carries one.
    #[serde(default)]
    pub rating: Option<f64>,
}

/// How a row was found. Anything but `Exact` means the data is incomplete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowMatch {
    Exact,
    BatterHandOnly,
    FirstRow,
    /// The player has no rows and the table has no generic rows either;
    /// another player's row stands in.
    NotListed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchupTable {
    pub label: String,
    rows: Vec<MatchupRow>,
}

impl MatchupTable {
    pub fn new(label: impl Into<String>, rows: Vec<MatchupRow>) -> Result<Self> {
        let label = label.into();
        if rows.is_empty() {
            return Err(SimError::EmptyMatchupTable { table: label });
        }
        for row in &rows {
            let owner = format!("{} row {:?} {}v{}", label, row.name, row.bats, row.pit_hand);
            row.probs.validate(&owner)?;
        }
        Ok(Self { label, rows })
    }

    /// One row per batter per pitcher hand, built from the batters' own tables.
    ///
    /// Switch hitters get their platoon side against each hand.
    pub fn from_batters(label: impl Into<String>, batters: &[Batter]) -> Result<Self> {
        let mut rows = Vec::with_capacity(batters.len() * 2);
        for batter in batters {
            for pit_hand in [Hand::Left, Hand::Right] {
                rows.push(MatchupRow {
                    name: Some(batter.name.clone()),
                    bats: batter.hand.batting_side(pit_hand),
                    pit_hand,
                    probs: batter.probs.clone(),
                    rating: None,
                });
            }
        }
        Self::new(label, rows)
    }

    /// One row per pitcher per batting side, carrying split ratings.
    pub fn from_pitchers(label: impl Into<String>, pitchers: &[Pitcher]) -> Result<Self> {
        let mut rows = Vec::with_capacity(pitchers.len() * 2);
        for pitcher in pitchers {
            for bats in [Hand::Left, Hand::Right] {
                rows.push(MatchupRow {
                    name: Some(pitcher.name.clone()),
                    bats,
                    pit_hand: pitcher.hand,
                    probs: pitcher.probs.clone(),
                    rating: Some(pitcher.rating_vs(bats)),
                });
            }
        }
        Self::new(label, rows)
    }

    pub fn rows(&self) -> &[MatchupRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row for `name` batting from `batter_hand` against `pitcher_hand`.
    ///
    /// Scope: the rows belonging to `name` when the table has any, otherwise
    /// the generic (unnamed) rows. Within the scope: exact (side, pitcher
    /// hand), then side only, then the first row. A table made only of other
    /// players' rows still answers, tagged `NotListed`.
    pub fn resolve(&self, name: &str, batter_hand: Hand, pitcher_hand: Hand) -> (&MatchupRow, RowMatch) {
        let side = batter_hand.batting_side(pitcher_hand);
        let owned = self.rows.iter().any(|r| r.name.as_deref() == Some(name));
        let generic = self.rows.iter().any(|r| r.name.is_none());
        let listed = owned || generic;
        let scope = |r: &&MatchupRow| {
            if owned {
                r.name.as_deref() == Some(name)
            } else if generic {
                r.name.is_none()
            } else {
                true
            }
        };
        let tag = |m: RowMatch| if listed { m } else { RowMatch::NotListed };

        if let Some(row) = self
            .rows
            .iter()
            .filter(scope)
            .find(|r| r.bats == side && r.pit_hand == pitcher_hand)
        {
            return (row, tag(RowMatch::Exact));
        }
        if let Some(row) = self.rows.iter().filter(scope).find(|r| r.bats == side) {
            return (row, tag(RowMatch::BatterHandOnly));
        }
        // new() guarantees at least one row and every scope above is non-empty
        let row = self.rows.iter().find(scope).unwrap_or(&self.rows[0]);
        (row, tag(RowMatch::FirstRow))
    }

    /// Rating of the named pitcher against a batting side, if the table has one.
    pub fn rating(&self, pitcher_name: &str, batting_side: Hand) -> Option<f64> {
        self.rows
            .iter()
            .filter(|r| r.name.as_deref() == Some(pitcher_name) && r.bats == batting_side)
            .find_map(|r| r.rating)
    }
}
