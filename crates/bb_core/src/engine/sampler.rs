//! Plate-appearance outcome sampling
//!
//! The hitter and pitcher rows for the matchup are blended 60/40 (by default),
//! renormalized over the outcomes both rows define, and one outcome is drawn.

use super::config::SamplerConfig;
use crate::models::{Batter, Hand, MatchupTable, Outcome, OutcomeProbs, Pitcher, RowMatch};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use std::cell::Cell;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Source of plate-appearance outcomes and matchup ratings.
pub trait PlateAppearanceModel {
    /// Draw the outcome of `batter` against `pitcher`.
    fn sample(&self, batter: &Batter, pitcher: &Pitcher, rng: &mut ChaCha8Rng) -> Outcome;

    /// DRA- of `pitcher` against a batting side (lower is better).
    fn rating(&self, pitcher: &Pitcher, batting_side: Hand) -> f64 {
        pitcher.rating_vs(batting_side)
    }
}

/// Blend two rows and renormalize over the outcomes both define.
///
/// Returns an empty vector when nothing carries weight.
pub fn blend(hitter: &OutcomeProbs, pitcher: &OutcomeProbs, hitter_weight: f64) -> Vec<(Outcome, f64)> {
    let pitcher_weight = 1.0 - hitter_weight;
    let mut weights: Vec<(Outcome, f64)> = Outcome::ALL
        .iter()
        .filter_map(|&o| match (hitter.get(o), pitcher.get(o)) {
            (Some(h), Some(p)) => Some((o, hitter_weight * h + pitcher_weight * p)),
            _ => None,
        })
        .collect();

    let total: f64 = weights.iter().map(|(_, w)| w).sum();
    if !total.is_finite() || total <= 0.0 {
        return Vec::new();
    }
    for (_, w) in weights.iter_mut() {
        *w /= total;
    }
    weights
}

/// Inverse-CDF draw from normalized weights.
pub fn draw(weights: &[(Outcome, f64)], rng: &mut ChaCha8Rng) -> Option<Outcome> {
    let roll: f64 = rng.gen();
    let mut cumulative = 0.0;
    for &(outcome, w) in weights {
        cumulative += w;
        if roll < cumulative {
            return Some(outcome);
        }
    }
    // Rounding can leave the cumulative sum a hair under 1
    weights.iter().rev().find(|(_, w)| *w > 0.0).map(|(o, _)| *o)
}

/// (table, player, batter hand, pitcher hand, how the row was found)
type FallbackKey = (String, String, Hand, Hand, RowMatch);

/// Table-driven model: hitter table keyed by batter, pitcher table keyed by pitcher.
///
/// Fallback rows are warned about once per player and split; repeats go to
/// debug. Clones share the seen set.
#[derive(Debug, Clone)]
pub struct MatchupSampler {
    hitters: MatchupTable,
    pitchers: MatchupTable,
    hitter_weight: f64,
    fallbacks: Arc<Mutex<HashSet<FallbackKey>>>,
}

impl MatchupSampler {
    pub fn new(hitters: MatchupTable, pitchers: MatchupTable, config: &SamplerConfig) -> Self {
        Self {
            hitters,
            pitchers,
            hitter_weight: config.hitter_weight,
            fallbacks: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    pub fn hitters(&self) -> &MatchupTable {
        &self.hitters
    }

    pub fn pitchers(&self) -> &MatchupTable {
        &self.pitchers
    }

    /// Distinct (table, player, split) lookups that needed a fallback row.
    pub fn fallback_count(&self) -> usize {
        match self.fallbacks.lock() {
            Ok(seen) => seen.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    /// Record a fallback; true the first time this key is seen.
    fn first_fallback(&self, key: FallbackKey) -> bool {
        match self.fallbacks.lock() {
            Ok(mut seen) => seen.insert(key),
            Err(poisoned) => poisoned.into_inner().insert(key),
        }
    }

    fn report_fallback(&self, table: &str, player: &str, batter_hand: Hand, pitcher_hand: Hand, how: RowMatch) {
        let key = (table.to_string(), player.to_string(), batter_hand, pitcher_hand, how);
        if self.first_fallback(key) {
            log::warn!(
                "No exact {} row for {} ({} batter vs {} pitcher): using {:?}",
                table, player, batter_hand, pitcher_hand, how
            );
        } else {
            log::debug!("{} fallback {:?} for {}", table, how, player);
        }
    }

    /// Normalized blended distribution for this matchup.
    pub fn distribution(&self, batter: &Batter, pitcher: &Pitcher) -> Vec<(Outcome, f64)> {
        let (h_row, h_match) = self.hitters.resolve(&batter.name, batter.hand, pitcher.hand);
        let (p_row, p_match) = self.pitchers.resolve(&pitcher.name, batter.hand, pitcher.hand);

        if h_match != RowMatch::Exact {
            self.report_fallback(&self.hitters.label, &batter.name, batter.hand, pitcher.hand, h_match);
        }
        if p_match != RowMatch::Exact {
            self.report_fallback(&self.pitchers.label, &pitcher.name, batter.hand, pitcher.hand, p_match);
        }

        blend(&h_row.probs, &p_row.probs, self.hitter_weight)
    }
}

impl PlateAppearanceModel for MatchupSampler {
    fn sample(&self, batter: &Batter, pitcher: &Pitcher, rng: &mut ChaCha8Rng) -> Outcome {
        let weights = self.distribution(batter, pitcher);
        match draw(&weights, rng) {
            Some(outcome) => outcome,
            None => {
                log::warn!(
                    "Degenerate matchup {} vs {}: no shared outcome carries weight, recording an out",
                    batter.name, pitcher.name
                );
                Outcome::Out
            }
        }
    }

    fn rating(&self, pitcher: &Pitcher, batting_side: Hand) -> f64 {
        self.pitchers
            .rating(&pitcher.name, batting_side)
            .unwrap_or_else(|| pitcher.rating_vs(batting_side))
    }
}

/// Replays a fixed outcome sequence, cycling. Ignores the RNG.
#[derive(Debug, Clone)]
pub struct ScriptedModel {
    script: Vec<Outcome>,
    cursor: Cell<usize>,
}

impl ScriptedModel {
    pub fn new(script: Vec<Outcome>) -> Self {
        Self { script, cursor: Cell::new(0) }
    }

    /// Plate appearances served so far.
    pub fn served(&self) -> usize {
        self.cursor.get()
    }
}

impl PlateAppearanceModel for ScriptedModel {
    fn sample(&self, _batter: &Batter, _pitcher: &Pitcher, _rng: &mut ChaCha8Rng) -> Outcome {
        if self.script.is_empty() {
            return Outcome::Out;
        }
        let n = self.cursor.get();
        self.cursor.set(n + 1);
        self.script[n % self.script.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MatchupRow;
    use rand::SeedableRng;

    fn full_probs() -> OutcomeProbs {
        OutcomeProbs::from_pairs([
            (Outcome::Out, 0.45),
            (Outcome::Strikeout, 0.22),
            (Outcome::Walk, 0.08),
            (Outcome::HitByPitch, 0.01),
            (Outcome::ReachedOnError, 0.01),
            (Outcome::Single, 0.14),
            (Outcome::Double, 0.05),
            (Outcome::Triple, 0.01),
            (Outcome::HomeRun, 0.03),
        ])
    }

    fn table(label: &str, probs: OutcomeProbs) -> MatchupTable {
        let rows = [Hand::Left, Hand::Right]
            .iter()
            .flat_map(|&bats| {
                let probs = probs.clone();
                [Hand::Left, Hand::Right].into_iter().map(move |pit_hand| MatchupRow {
                    name: None,
                    bats,
                    pit_hand,
                    probs: probs.clone(),
                    rating: None,
                })
            })
            .collect();
        MatchupTable::new(label, rows).unwrap()
    }

    #[test]
    fn test_blend_weights() {
        let h = OutcomeProbs::new().with(Outcome::Out, 0.5).with(Outcome::Walk, 0.5);
        let p = OutcomeProbs::new().with(Outcome::Out, 1.0).with(Outcome::Walk, 0.0);
        let w = blend(&h, &p, 0.6);
        let out = w.iter().find(|(o, _)| *o == Outcome::Out).unwrap().1;
        assert!((out - 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_blend_only_shared_outcomes() {
        let h = OutcomeProbs::new().with(Outcome::Out, 0.5).with(Outcome::HitByPitch, 0.5);
        let p = OutcomeProbs::new().with(Outcome::Out, 0.5).with(Outcome::Single, 0.5);
        let w = blend(&h, &p, 0.6);
        assert_eq!(w, vec![(Outcome::Out, 1.0)]);
    }

    #[test]
    fn test_blend_degenerate_is_empty() {
        let h = OutcomeProbs::new().with(Outcome::Out, 1.0);
        let p = OutcomeProbs::new().with(Outcome::Walk, 1.0);
        assert!(blend(&h, &p, 0.6).is_empty());
    }

    #[test]
    fn test_sampling_is_reproducible() {
        let sampler = MatchupSampler::new(
            table("hitters", full_probs()),
            table("pitchers", full_probs()),
            &SamplerConfig::default(),
        );
        let batter = Batter::new("B", Hand::Switch, full_probs());
        let pitcher = Pitcher::new("P", Hand::Left, full_probs());

        let run = |seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            (0..50).map(|_| sampler.sample(&batter, &pitcher, &mut rng)).collect::<Vec<_>>()
        };
        assert_eq!(run(7), run(7));
    }

    #[test]
    fn test_sampling_frequencies_follow_blend() {
        let hitter = OutcomeProbs::new().with(Outcome::Out, 0.8).with(Outcome::Walk, 0.2);
        let pitcher = OutcomeProbs::new().with(Outcome::Out, 0.3).with(Outcome::Walk, 0.7);
        let sampler = MatchupSampler::new(
            table("hitters", hitter.clone()),
            table("pitchers", pitcher.clone()),
            &SamplerConfig::default(),
        );
        let batter = Batter::new("B", Hand::Right, hitter);
        let p = Pitcher::new("P", Hand::Right, pitcher);

        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let n = 20_000;
        let walks = (0..n)
            .filter(|_| sampler.sample(&batter, &p, &mut rng) == Outcome::Walk)
            .count();
        // 0.6 * 0.2 + 0.4 * 0.7 = 0.40
        let rate = walks as f64 / n as f64;
        assert!((rate - 0.40).abs() < 0.02, "walk rate {}", rate);
    }

    #[test]
    fn test_rating_prefers_table_entry() {
        let pitcher = Pitcher::new("Ace", Hand::Right, full_probs())
            .with_rating(95.0)
            .with_split_ratings(None, Some(88.0));
        let tables = MatchupTable::from_pitchers("pitchers", &[pitcher.clone().with_split_ratings(Some(70.0), None)])
            .unwrap();
        let sampler = MatchupSampler::new(table("hitters", full_probs()), tables, &SamplerConfig::default());

        assert_eq!(sampler.rating(&pitcher, Hand::Left), 70.0);
        let stranger = Pitcher::new("Nobody", Hand::Right, full_probs())
            .with_rating(120.0)
            .with_split_ratings(None, Some(110.0));
        assert_eq!(sampler.rating(&stranger, Hand::Right), 110.0);
        assert_eq!(sampler.rating(&stranger, Hand::Left), 120.0);
    }

    #[test]
    fn test_fallbacks_recorded_once_per_split() {
        let lefties_only = MatchupTable::new(
            "hitters",
            vec![MatchupRow {
                name: None,
                bats: Hand::Left,
                pit_hand: Hand::Left,
                probs: full_probs(),
                rating: None,
            }],
        )
        .unwrap();
        let sampler = MatchupSampler::new(lefties_only, table("pitchers", full_probs()), &SamplerConfig::default());
        let batter = Batter::new("Righty", Hand::Right, full_probs());
        let vs_right = Pitcher::new("P", Hand::Right, full_probs());
        let vs_left = Pitcher::new("Q", Hand::Left, full_probs());
        let mut rng = ChaCha8Rng::seed_from_u64(4);

        for _ in 0..500 {
            sampler.sample(&batter, &vs_right, &mut rng);
        }
        assert_eq!(sampler.fallback_count(), 1);

        sampler.sample(&batter, &vs_left, &mut rng);
        assert_eq!(sampler.fallback_count(), 2);
        // Clones share what has been reported
        assert_eq!(sampler.clone().fallback_count(), 2);
    }

    #[test]
    fn test_scripted_model_cycles() {
        let model = ScriptedModel::new(vec![Outcome::Walk, Outcome::Out]);
        let batter = Batter::new("B", Hand::Right, full_probs());
        let pitcher = Pitcher::new("P", Hand::Right, full_probs());
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let seq: Vec<Outcome> = (0..3).map(|_| model.sample(&batter, &pitcher, &mut rng)).collect();
        assert_eq!(seq, vec![Outcome::Walk, Outcome::Out, Outcome::Walk]);
        assert_eq!(model.served(), 3);
    }

    #[cfg(test)]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: the blended vector is a probability distribution
            #[test]
            fn prop_blend_sums_to_one(
                h in proptest::collection::vec(0.001f64..1.0, 9),
                p in proptest::collection::vec(0.001f64..1.0, 9),
                weight in 0.0f64..=1.0
            ) {
                let hitter = OutcomeProbs::from_pairs(Outcome::ALL.iter().copied().zip(h));
                let pitcher = OutcomeProbs::from_pairs(Outcome::ALL.iter().copied().zip(p));
                let w = blend(&hitter, &pitcher, weight);
                let total: f64 = w.iter().map(|(_, x)| x).sum();
                prop_assert!((total - 1.0).abs() < 1e-9);
                prop_assert!(w.iter().all(|(_, x)| *x >= 0.0));
            }
        }
    }
}
