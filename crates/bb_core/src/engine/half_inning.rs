//! Half-inning loop
//!
//! sample → advance runners → book the lines → usage policy → maybe change
//! pitchers, until three outs.
//!
//! The appearance log holds one open entry per pitcher on the mound. A real
//! pitching change closes it and opens the reliever's; an emergency "change"
//! that finds nobody leaves it untouched.

use super::bases::BaseState;
use super::bullpen::select_reliever;
use super::game::{GameEngine, HalfInningSummary};
use super::sampler::PlateAppearanceModel;
use super::usage::{UsageDecision, UsagePolicy};
use crate::models::{Half, Outcome, Team, TeamSide};

const OUTS_PER_HALF: u32 = 3;

/// Defense mutably, offense shared.
fn split_teams(teams: &mut [Team; 2], fielding: TeamSide) -> (&mut Team, &Team) {
    let [away, home] = teams;
    match fielding {
        TeamSide::Away => (away, &*home),
        TeamSide::Home => (home, &*away),
    }
}

impl<M: PlateAppearanceModel + ?Sized> GameEngine<'_, M> {
    pub(crate) fn simulate_half_inning(&mut self, half: Half) -> HalfInningSummary {
        let batting = half.batting();
        let fielding = half.fielding();
        let mut bases = BaseState::empty();
        let mut summary = HalfInningSummary {
            half,
            inning: self.inning,
            runs: 0,
            hits: 0,
            plate_appearances: 0,
            pitching_changes: 0,
        };
        let mut outs = 0;

        self.open_appearance(fielding, half);

        while outs < OUTS_PER_HALF {
            let slot = self.teams[batting.index()].next_batter();
            let outcome = self.model.sample(
                self.teams[batting.index()].batter(slot),
                self.teams[fielding.index()].active_pitcher(),
                &mut self.rng,
            );

            summary.plate_appearances += 1;
            if outcome.is_hit() {
                summary.hits += 1;
            }
            if outcome.is_out() {
                outs += 1;
            }
            summary.runs += self.record_plate_appearance(half, slot, outcome, &mut bases);

            let policy = UsagePolicy::new(&self.config.starter, &self.config.reliever);
            let emergency = self.teams[fielding.index()].is_emergency();
            let decision = policy.evaluate(
                &mut self.stints[fielding.index()],
                bases.runners_on(),
                emergency,
                &mut self.rng,
            );
            if let UsageDecision::Pull(reason) = decision {
                log::debug!(
                    "{} {}: pull {} ({:?}) after {} batters",
                    half,
                    self.inning,
                    self.teams[fielding.index()].active_pitcher().name,
                    reason,
                    self.stints[fielding.index()].batters_faced
                );
                if self.change_pitcher(half, outs >= OUTS_PER_HALF) {
                    summary.pitching_changes += 1;
                }
            }
        }

        let pitcher = self.teams[fielding.index()].active_pitcher().name.clone();
        self.appearances.close(fielding, &pitcher, half, self.inning);
        summary
    }

    /// Open a log entry for the fielding side's pitcher and make sure he has a line.
    fn open_appearance(&mut self, fielding: TeamSide, half: Half) {
        let team = &self.teams[fielding.index()];
        let pitcher = &team.active_pitcher().name;
        self.box_score.pitching_mut(fielding, team.name(), pitcher);
        self.appearances.open(fielding, team.name(), pitcher, half, self.inning);
    }

    /// Book one plate appearance into batting, pitching and error tallies.
    /// Returns runs scored.
    fn record_plate_appearance(
        &mut self,
        half: Half,
        slot: usize,
        outcome: Outcome,
        bases: &mut BaseState,
    ) -> u32 {
        let batting = half.batting();
        let fielding = half.fielding();
        let offense = &self.teams[batting.index()];
        let defense = &self.teams[fielding.index()];
        let batter = &offense.batter(slot).name;
        let pitcher = &defense.active_pitcher().name;

        self.stints[fielding.index()].batters_faced += 1;

        let bat = self.box_score.batting_mut(batting, offense.name(), batter);
        bat.pa += 1;
        match outcome {
            Outcome::Out | Outcome::Strikeout => bat.ab += 1,
            Outcome::Walk => bat.bb += 1,
            Outcome::HitByPitch => bat.hbp += 1,
            Outcome::ReachedOnError => {}
            Outcome::Single | Outcome::Double | Outcome::Triple | Outcome::HomeRun => {
                bat.ab += 1;
                bat.h += 1;
                match outcome {
                    Outcome::Double => bat.doubles += 1,
                    Outcome::Triple => bat.triples += 1,
                    Outcome::HomeRun => bat.hr += 1,
                    _ => {}
                }
            }
        }

        let pit = self.box_score.pitching_mut(fielding, defense.name(), pitcher);
        pit.bf += 1;
        match outcome {
            Outcome::Out => pit.outs += 1,
            Outcome::Strikeout => {
                pit.outs += 1;
                pit.k += 1;
            }
            Outcome::Walk => pit.bb += 1,
            Outcome::HitByPitch => pit.hbp += 1,
            Outcome::HomeRun => {
                pit.h += 1;
                pit.hr += 1;
            }
            Outcome::Single | Outcome::Double | Outcome::Triple => pit.h += 1,
            Outcome::ReachedOnError => {}
        }

        if outcome == Outcome::ReachedOnError {
            // Charged to the fielding team's own row
            self.line_score.side_mut(fielding).errors += 1;
        }

        let advance = bases.advance(outcome, slot);
        for &scorer in &advance.scorers {
            let runner = &offense.batter(scorer).name;
            self.box_score.batting_mut(batting, offense.name(), runner).r += 1;
            if advance.batted_in {
                self.box_score.batting_mut(batting, offense.name(), batter).rbi += 1;
            }
            if advance.charged {
                let pit = self.box_score.pitching_mut(fielding, defense.name(), pitcher);
                pit.r += 1;
                pit.er += 1;
                self.stints[fielding.index()].runs_allowed += 1;
            }
        }
        advance.scorers.len() as u32
    }

    /// Bring in a reliever for the fielding side. Returns whether anyone came in.
    ///
    /// With the third out already recorded the new pitcher takes over from the
    /// next half-inning, where his log entry is opened. Reserve eligibility is
    /// judged by the inning he will actually pitch in.
    fn change_pitcher(&mut self, half: Half, inning_over: bool) -> bool {
        let fielding = half.fielding();
        let outgoing = self.teams[fielding.index()].active_pitcher().name.clone();
        let entry_inning = if inning_over && half == Half::Bottom {
            self.inning + 1
        } else {
            self.inning
        };

        let (defense, offense) = split_teams(&mut self.teams, fielding);
        let Some(replacement) =
            select_reliever(self.model, defense, offense, entry_inning, self.config, &mut self.rng)
        else {
            return false;
        };

        self.appearances.close(fielding, &outgoing, half, self.inning);
        log::debug!(
            "{} selects {} (avg DRA- {:.1}) to replace {}",
            defense.name(),
            defense.pitcher(replacement.pitcher).name,
            replacement.projected,
            outgoing
        );
        self.stints[fielding.index()] = replacement.stint;

        if !inning_over {
            self.open_appearance(fielding, half);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::config::SimConfig;
    use crate::engine::game::GameEngine;
    use crate::engine::sampler::ScriptedModel;
    use crate::models::{Batter, Half, Hand, Outcome, OutcomeProbs, Pitcher, Roster, Team, TeamSide};

    fn probs() -> OutcomeProbs {
        OutcomeProbs::new().with(Outcome::Out, 0.7).with(Outcome::Single, 0.3)
    }

    fn team(name: &str, arms: usize) -> Team {
        let lineup = (0..9)
            .map(|i| Batter::new(format!("{}{}", name, i), Hand::Right, probs()))
            .collect();
        let pitchers = (0..arms)
            .map(|i| Pitcher::new(format!("{}P{}", name, i), Hand::Right, probs()))
            .collect();
        Team::new(Roster::new(name, lineup, pitchers).unwrap())
    }

    /// Play the top of the first with a scripted outcome sequence.
    fn play_top<F>(script: Vec<Outcome>, check: F)
    where
        F: FnOnce(&GameEngine<'_, ScriptedModel>, u32),
    {
        let model = ScriptedModel::new(script);
        let cfg = SimConfig::default();
        let mut engine = GameEngine::new(team("A", 4), team("H", 4), &model, &cfg, 5).unwrap();
        let runs = engine.play_half(Half::Top).runs;
        check(&engine, runs);
    }

    #[test]
    fn test_three_outs_end_the_half() {
        play_top(vec![Outcome::Single, Outcome::Out, Outcome::Strikeout, Outcome::Out], |engine, runs| {
            assert_eq!(runs, 0);
            let line = engine.box_score().pitching_line(TeamSide::Home, "HP0").unwrap();
            assert_eq!(line.outs, 3);
            assert_eq!(line.bf, 4);
            assert_eq!(line.k, 1);
            assert_eq!(line.h, 1);
            assert_eq!(engine.team(TeamSide::Away).lineup_index(), 4);
            assert!(engine.appearances().is_all_closed());
        });
    }

    #[test]
    fn test_bases_loaded_walk_is_earned() {
        play_top(vec![
            Outcome::Walk,
            Outcome::Walk,
            Outcome::Walk,
            Outcome::Walk,
            Outcome::Out,
            Outcome::Out,
            Outcome::Out,
        ], |engine, runs| {
            assert_eq!(runs, 1);
            let pit = engine.box_score().pitching_line(TeamSide::Home, "HP0").unwrap();
            assert_eq!((pit.r, pit.er, pit.bb), (1, 1, 4));
            // Forced-in run is not an RBI
            let fourth = engine.box_score().batting_line(TeamSide::Away, "A3").unwrap();
            assert_eq!(fourth.rbi, 0);
            assert_eq!(fourth.ab, 0);
            let leadoff = engine.box_score().batting_line(TeamSide::Away, "A0").unwrap();
            assert_eq!(leadoff.r, 1);
        });
    }

    #[test]
    fn test_bases_loaded_error_is_unearned() {
        play_top(vec![
            Outcome::Walk,
            Outcome::Walk,
            Outcome::Walk,
            Outcome::ReachedOnError,
            Outcome::Out,
            Outcome::Out,
            Outcome::Out,
        ], |engine, runs| {
            assert_eq!(runs, 1);
            let pit = engine.box_score().pitching_line(TeamSide::Home, "HP0").unwrap();
            assert_eq!((pit.r, pit.er), (0, 0));
            assert_eq!(engine.line_score().home.errors, 1);
            assert_eq!(engine.line_score().away.errors, 0);
            let roe = engine.box_score().batting_line(TeamSide::Away, "A3").unwrap();
            assert_eq!((roe.pa, roe.ab, roe.h), (1, 0, 0));
        });
    }

    #[test]
    fn test_grand_slam_books_everything() {
        play_top(vec![
            Outcome::Single,
            Outcome::Walk,
            Outcome::HitByPitch,
            Outcome::HomeRun,
            Outcome::Out,
            Outcome::Out,
            Outcome::Out,
        ], |engine, runs| {
            assert_eq!(runs, 4);
            let slugger = engine.box_score().batting_line(TeamSide::Away, "A3").unwrap();
            assert_eq!((slugger.ab, slugger.h, slugger.hr, slugger.rbi, slugger.r), (1, 1, 1, 4, 1));
            assert_eq!(engine.line_score().away.hits, 2);
        });
    }

    #[test]
    fn test_pull_ending_ninth_can_use_reserve_for_tenth() {
        let probs = probs();
        let lineup: Vec<Batter> = (0..9)
            .map(|i| Batter::new(format!("A{}", i), Hand::Right, probs.clone()))
            .collect();
        let away = Roster::with_reserves(
            "A",
            lineup.clone(),
            vec![Pitcher::new("AP0", Hand::Right, probs.clone())],
            vec![Pitcher::new("AX0", Hand::Right, probs.clone())],
        )
        .unwrap();
        let home = Roster::new("H", lineup, vec![Pitcher::new("HP0", Hand::Right, probs)]).unwrap();

        let mut cfg = SimConfig::default();
        cfg.starter.stamina_cap = [3, 3];
        cfg.starter.extension_chance = 0.0;
        let model = ScriptedModel::new(vec![Outcome::Out]);
        let mut engine = GameEngine::new(Team::new(away), Team::new(home), &model, &cfg, 2).unwrap();
        engine.inning = 9;

        // Starter hits his cap on the third out of the bottom of the ninth
        engine.play_half(Half::Bottom);
        let away = engine.team(TeamSide::Away);
        assert_eq!(away.active_pitcher().name, "AX0");
        assert!(!away.is_emergency());
        assert_eq!(engine.inning(), 10);
        assert!(engine.appearances().is_all_closed());
    }

    #[test]
    fn test_early_hook_changes_pitcher_and_log() {
        // Four straight homers: starter gives up 4 runs to 4 batters
        let mut script = vec![Outcome::HomeRun; 4];
        script.extend([Outcome::Out, Outcome::Out, Outcome::Out]);
        play_top(script, |engine, runs| {
            assert_eq!(runs, 4);

            let used = engine.box_score().used_pitchers(TeamSide::Home);
            assert_eq!(used.len(), 2);
            assert_eq!(used[0], "HP0");
            let log = &engine.appearances().entries;
            assert_eq!(log.len(), 2);
            assert!(engine.appearances().is_all_closed());
            let reliever = engine.box_score().pitching_line(TeamSide::Home, used[1]).unwrap();
            assert_eq!(reliever.outs, 3);
            assert_eq!(reliever.r, 0);
        });
    }
}
