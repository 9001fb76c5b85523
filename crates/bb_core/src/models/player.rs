use super::outcome::OutcomeProbs;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default performance rating (DRA-, league average = 100, lower is better).
pub const DEFAULT_RATING: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hand {
    #[serde(rename = "L")]
    Left,
    #[serde(rename = "R")]
    Right,
    #[serde(rename = "S")]
    Switch,
}

impl Hand {
    /// Side a batter of this hand actually stands on against `pitcher_hand`.
    ///
    /// Switch hitters take the platoon advantage: left against a righty,
    /// right against anyone else.
    pub fn batting_side(self, pitcher_hand: Hand) -> Hand {
        match self {
            Hand::Switch => {
                if pitcher_hand == Hand::Right {
                    Hand::Left
                } else {
                    Hand::Right
                }
            }
            other => other,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Hand::Left => "L",
            Hand::Right => "R",
            Hand::Switch => "S",
        }
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Hand {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "L" | "LEFT" => Ok(Hand::Left),
            "R" | "RIGHT" => Ok(Hand::Right),
            "S" | "B" | "SWITCH" | "BOTH" => Ok(Hand::Switch),
            other => Err(format!("Unknown hand label: '{}'", other)),
        }
    }
}

/// A hitter. Immutable during a game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Batter {
    pub name: String,
    pub hand: Hand,
    pub probs: OutcomeProbs,
}

impl Batter {
    pub fn new(name: impl Into<String>, hand: Hand, probs: OutcomeProbs) -> Self {
        Self { name: name.into(), hand, probs }
    }

    pub fn validate(&self) -> Result<()> {
        self.probs.validate(&self.name)
    }
}

/// A pitcher record.
///
/// In-game counters (batters faced, runs, outs...) are not stored here; they
/// belong to the game's box score and the team's current stint, so the same
/// record can be shared across simulations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pitcher {
    pub name: String,
    pub hand: Hand,
    pub probs: OutcomeProbs,
    /// Overall DRA- (lower is better).
    #[serde(default = "default_rating")]
    pub rating: f64,
    #[serde(default)]
    pub rating_vs_left: Option<f64>,
    #[serde(default)]
    pub rating_vs_right: Option<f64>,
}

fn default_rating() -> f64 {
    DEFAULT_RATING
}

impl Pitcher {
    pub fn new(name: impl Into<String>, hand: Hand, probs: OutcomeProbs) -> Self {
        Self {
            name: name.into(),
            hand,
            probs,
            rating: DEFAULT_RATING,
            rating_vs_left: None,
            rating_vs_right: None,
        }
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = rating;
        self
    }

    pub fn with_split_ratings(mut self, vs_left: Option<f64>, vs_right: Option<f64>) -> Self {
        self.rating_vs_left = vs_left;
        self.rating_vs_right = vs_right;
        self
    }

    /// Own rating against a batting side, falling back to the overall rating.
    pub fn rating_vs(&self, batting_side: Hand) -> f64 {
        let split = match batting_side {
            Hand::Left => self.rating_vs_left,
            Hand::Right => self.rating_vs_right,
            Hand::Switch => None,
        };
        split.unwrap_or(self.rating)
    }

    pub fn validate(&self) -> Result<()> {
        self.probs.validate(&self.name)
    }
}
