use crate::error::{Result, SimError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Tolerance used when checking that a probability table sums to 1.
pub const PROB_SUM_TOLERANCE: f64 = 1e-6;

/// Terminal result of one plate appearance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Single,
    Double,
    Triple,
    HomeRun,
    Walk,
    HitByPitch,
    Strikeout,
    Out,
    ReachedOnError,
}

impl Outcome {
    /// Sampling order. Draws walk the cumulative distribution in this order.
    pub const ALL: [Outcome; 9] = [
        Outcome::Single,
        Outcome::Double,
        Outcome::Triple,
        Outcome::HomeRun,
        Outcome::Walk,
        Outcome::HitByPitch,
        Outcome::Strikeout,
        Outcome::Out,
        Outcome::ReachedOnError,
    ];

    /// Bases gained by the batter on a hit, `None` for non-hits.
    pub fn hit_bases(self) -> Option<usize> {
        match self {
            Outcome::Single => Some(1),
            Outcome::Double => Some(2),
            Outcome::Triple => Some(3),
            Outcome::HomeRun => Some(4),
            _ => None,
        }
    }

    pub fn is_hit(self) -> bool {
        self.hit_bases().is_some()
    }

    pub fn is_out(self) -> bool {
        matches!(self, Outcome::Out | Outcome::Strikeout)
    }

    /// Batter is awarded first base and runners move only when forced.
    pub fn is_forced_advance(self) -> bool {
        matches!(self, Outcome::Walk | Outcome::HitByPitch | Outcome::ReachedOnError)
    }

    /// Short label used in data files (`so`, `hr`, `roe`, ...).
    pub fn code(self) -> &'static str {
        match self {
            Outcome::Single => "single",
            Outcome::Double => "double",
            Outcome::Triple => "triple",
            Outcome::HomeRun => "hr",
            Outcome::Walk => "bb",
            Outcome::HitByPitch => "hbp",
            Outcome::Strikeout => "so",
            Outcome::Out => "out",
            Outcome::ReachedOnError => "roe",
        }
    }
}

/// Outcome-kind → probability mapping.
///
/// Kinds may be absent; the sampler only blends kinds present on both sides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutcomeProbs {
    probs: BTreeMap<Outcome, f64>,
}

impl OutcomeProbs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from raw (unnormalized) weights.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (Outcome, f64)>,
    {
        Self { probs: pairs.into_iter().collect() }
    }

    pub fn with(mut self, outcome: Outcome, p: f64) -> Self {
        self.probs.insert(outcome, p);
        self
    }

    pub fn get(&self, outcome: Outcome) -> Option<f64> {
        self.probs.get(&outcome).copied()
    }

    pub fn contains(&self, outcome: Outcome) -> bool {
        self.probs.contains_key(&outcome)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Outcome, f64)> + '_ {
        self.probs.iter().map(|(o, p)| (*o, *p))
    }

    pub fn len(&self) -> usize {
        self.probs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probs.is_empty()
    }

    pub fn sum(&self) -> f64 {
        self.probs.values().sum()
    }

    /// Scale to sum 1. Fails on empty, negative, non-finite or all-zero tables.
    pub fn normalized(&self, owner: &str) -> Result<Self> {
        let sum = self.sum();
        let bad_entry = self.probs.values().any(|p| !p.is_finite() || *p < 0.0);
        if self.probs.is_empty() || bad_entry || !sum.is_finite() || sum <= 0.0 {
            return Err(SimError::InvalidProbabilities { owner: owner.to_string(), sum });
        }
        Ok(Self {
            probs: self.probs.iter().map(|(o, p)| (*o, p / sum)).collect(),
        })
    }

    /// Check the table is already normalized.
    pub fn validate(&self, owner: &str) -> Result<()> {
        let sum = self.sum();
        let bad_entry = self.probs.values().any(|p| !p.is_finite() || *p < 0.0);
        if self.probs.is_empty() || bad_entry || (sum - 1.0).abs() > PROB_SUM_TOLERANCE {
            return Err(SimError::InvalidProbabilities { owner: owner.to_string(), sum });
        }
        Ok(())
    }
}
