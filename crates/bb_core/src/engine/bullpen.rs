//! Reliever selection
//!
//! Candidates are ranked by their mean rating against the next few scheduled
//! batters. The bullpen is used first; reserve arms only in extra innings or
//! once the team is already in emergency mode.

use super::config::SimConfig;
use super::sampler::PlateAppearanceModel;
use super::usage::{draw_bf, Stint};
use crate::models::{PitcherId, Team};
use rand_chacha::ChaCha8Rng;

/// A pitcher brought in from the bullpen or the reserve pool.
#[derive(Debug, Clone, PartialEq)]
pub struct Replacement {
    pub pitcher: PitcherId,
    /// Mean projected rating against the upcoming batters.
    pub projected: f64,
    pub from_reserve: bool,
    pub stint: Stint,
}

/// Mean rating of `candidate` against the next `lookahead` batters of `offense`.
pub fn project<M>(model: &M, defense: &Team, candidate: PitcherId, offense: &Team, lookahead: usize) -> f64
where
    M: PlateAppearanceModel + ?Sized,
{
    let pitcher = defense.pitcher(candidate);
    let upcoming = offense.upcoming(lookahead);
    if upcoming.is_empty() {
        return pitcher.rating;
    }
    let total: f64 = upcoming
        .iter()
        .map(|b| model.rating(pitcher, b.hand.batting_side(pitcher.hand)))
        .sum();
    total / upcoming.len() as f64
}

/// Best (lowest) projection; the earlier candidate wins ties.
fn best_candidate<M>(
    model: &M,
    defense: &Team,
    candidates: &[PitcherId],
    offense: &Team,
    lookahead: usize,
) -> Option<(PitcherId, f64)>
where
    M: PlateAppearanceModel + ?Sized,
{
    candidates
        .iter()
        .map(|&id| (id, project(model, defense, id, offense, lookahead)))
        .fold(None, |best, (id, score)| match best {
            Some((_, best_score)) if best_score <= score => best,
            _ => Some((id, score)),
        })
}

/// Replace the defense's active pitcher, or flag emergency when nobody is left.
///
/// On success the replacement is installed on `defense` and removed from its
/// pool. On exhaustion `defense` keeps its pitcher and becomes (stays) an
/// emergency team.
pub fn select_reliever<M>(
    model: &M,
    defense: &mut Team,
    offense: &Team,
    inning: u32,
    config: &SimConfig,
    rng: &mut ChaCha8Rng,
) -> Option<Replacement>
where
    M: PlateAppearanceModel + ?Sized,
{
    let current = defense.active_id();
    let lookahead = config.reliever.lookahead;

    let bullpen: Vec<PitcherId> = defense.bullpen().iter().copied().filter(|&p| p != current).collect();
    let (choice, from_reserve) = if !bullpen.is_empty() {
        (best_candidate(model, defense, &bullpen, offense, lookahead), false)
    } else if inning >= config.game.extra_innings_start || defense.is_emergency() {
        let reserves: Vec<PitcherId> =
            defense.reserves().iter().copied().filter(|&p| p != current).collect();
        (best_candidate(model, defense, &reserves, offense, lookahead), true)
    } else {
        (None, false)
    };

    let Some((pitcher, projected)) = choice else {
        if !defense.is_emergency() {
            log::warn!(
                "{}: no pitchers left, {} stays in (emergency mode)",
                defense.name(),
                defense.active_pitcher().name
            );
        }
        defense.set_emergency();
        return None;
    };

    defense.install(pitcher);
    if from_reserve {
        log::warn!("{}: emergency reserve activation: {}", defense.name(), defense.pitcher(pitcher).name);
    }
    let cap = draw_bf(config.reliever.entry_cap, rng);
    Some(Replacement {
        pitcher,
        projected,
        from_reserve,
        stint: Stint::reliever(pitcher, Some(cap)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Batter, Hand, Outcome, OutcomeProbs, Pitcher, Roster};
    use rand::SeedableRng;

    struct OwnRatings;
    impl PlateAppearanceModel for OwnRatings {
        fn sample(&self, _: &Batter, _: &Pitcher, _: &mut ChaCha8Rng) -> Outcome {
            Outcome::Out
        }
    }

    fn probs() -> OutcomeProbs {
        OutcomeProbs::new().with(Outcome::Out, 1.0)
    }

    fn offense(hands: &[Hand]) -> Team {
        let lineup = hands
            .iter()
            .enumerate()
            .map(|(i, &h)| Batter::new(format!("B{}", i), h, probs()))
            .collect();
        let pitchers = vec![Pitcher::new("O", Hand::Right, probs())];
        Team::new(Roster::new("Offense", lineup, pitchers).unwrap())
    }

    fn defense(pitchers: Vec<Pitcher>, reserves: Vec<Pitcher>) -> Team {
        let lineup = vec![Batter::new("D", Hand::Right, probs())];
        Team::new(Roster::with_reserves("Defense", lineup, pitchers, reserves).unwrap())
    }

    fn arm(name: &str, hand: Hand, rating: f64, vs_l: Option<f64>, vs_r: Option<f64>) -> Pitcher {
        Pitcher::new(name, hand, probs())
            .with_rating(rating)
            .with_split_ratings(vs_l, vs_r)
    }

    #[test]
    fn test_picks_best_projection_for_upcoming_batters() {
        // Next three (from index 0) are lefties
        let offense = offense(&[Hand::Left, Hand::Left, Hand::Left, Hand::Right]);
        let mut defense = defense(
            vec![
                arm("Starter", Hand::Right, 100.0, None, None),
                arm("Righty", Hand::Right, 80.0, Some(110.0), Some(70.0)),
                arm("Lefty", Hand::Left, 95.0, Some(75.0), Some(120.0)),
            ],
            vec![],
        );
        let cfg = SimConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let rep = select_reliever(&OwnRatings, &mut defense, &offense, 6, &cfg, &mut rng).unwrap();
        assert_eq!(defense.pitcher(rep.pitcher).name, "Lefty");
        assert!((rep.projected - 75.0).abs() < 1e-9);
        assert!(!rep.from_reserve);
        assert!((3..=5).contains(&rep.stint.relief_cap.unwrap()));
        assert_eq!(rep.stint.batters_faced, 0);
        assert_eq!(defense.active_id(), rep.pitcher);
        assert_eq!(defense.bullpen(), &[PitcherId(1)]);
    }

    #[test]
    fn test_tie_goes_to_earlier_bullpen_arm() {
        let offense = offense(&[Hand::Right]);
        let mut defense = defense(
            vec![
                arm("Starter", Hand::Right, 100.0, None, None),
                arm("First", Hand::Right, 90.0, None, None),
                arm("Second", Hand::Right, 90.0, None, None),
            ],
            vec![],
        );
        let cfg = SimConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let rep = select_reliever(&OwnRatings, &mut defense, &offense, 3, &cfg, &mut rng).unwrap();
        assert_eq!(defense.pitcher(rep.pitcher).name, "First");
    }

    #[test]
    fn test_reserves_only_in_extra_innings() {
        let offense = offense(&[Hand::Right]);
        let mut defense = defense(
            vec![arm("Starter", Hand::Right, 100.0, None, None)],
            vec![arm("Position Player", Hand::Right, 150.0, None, None)],
        );
        let cfg = SimConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        // Regulation: no bullpen, reserves locked -> emergency
        assert!(select_reliever(&OwnRatings, &mut defense, &offense, 9, &cfg, &mut rng).is_none());
        assert!(defense.is_emergency());
        assert_eq!(defense.active_id(), PitcherId::STARTER);

        // Emergency unlocks the reserve pool
        let rep = select_reliever(&OwnRatings, &mut defense, &offense, 9, &cfg, &mut rng).unwrap();
        assert!(rep.from_reserve);
        assert!(defense.reserves().is_empty());

        // Nothing left: stays put
        assert!(select_reliever(&OwnRatings, &mut defense, &offense, 12, &cfg, &mut rng).is_none());
        assert_eq!(defense.active_id(), rep.pitcher);
    }

    #[test]
    fn test_reserves_in_extra_innings_without_emergency() {
        let offense = offense(&[Hand::Right]);
        let mut defense = defense(
            vec![arm("Starter", Hand::Right, 100.0, None, None)],
            vec![arm("Utility", Hand::Left, 140.0, None, None)],
        );
        let cfg = SimConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let rep = select_reliever(&OwnRatings, &mut defense, &offense, 10, &cfg, &mut rng).unwrap();
        assert!(rep.from_reserve);
        assert!(!defense.is_emergency());
    }
}
