//! Baserunner advancement
//!
//! Bases hold lineup slots of the batting team, never the batter records.

use crate::models::Outcome;

/// Runners on first, second and third (lineup slots).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BaseState {
    slots: [Option<usize>; 3],
}

/// What one plate appearance did on the bases.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Advance {
    /// Lineup slots that crossed the plate, lead runner first.
    pub scorers: Vec<usize>,
    /// Runs are credited to the batter as RBI.
    pub batted_in: bool,
    /// Runs are charged (earned) to the pitcher.
    pub charged: bool,
}

impl BaseState {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from explicit occupants (first, second, third).
    pub fn with_runners(first: Option<usize>, second: Option<usize>, third: Option<usize>) -> Self {
        Self { slots: [first, second, third] }
    }

    pub fn loaded(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    pub fn runners_on(&self) -> u32 {
        self.slots.iter().filter(|s| s.is_some()).count() as u32
    }

    pub fn occupied(&self) -> [bool; 3] {
        [self.slots[0].is_some(), self.slots[1].is_some(), self.slots[2].is_some()]
    }

    pub fn runner(&self, base: usize) -> Option<usize> {
        self.slots[base]
    }

    /// Apply `outcome` for the batter in lineup slot `batter`.
    pub fn advance(&mut self, outcome: Outcome, batter: usize) -> Advance {
        match outcome {
            Outcome::Out | Outcome::Strikeout => Advance::default(),
            Outcome::Walk | Outcome::HitByPitch => Advance {
                scorers: self.force(batter),
                batted_in: false,
                charged: true,
            },
            // Unearned: the run would not have scored without the error
            Outcome::ReachedOnError => Advance {
                scorers: self.force(batter),
                batted_in: false,
                charged: false,
            },
            Outcome::Single | Outcome::Double | Outcome::Triple | Outcome::HomeRun => {
                let bases = outcome.hit_bases().unwrap_or(1);
                Advance {
                    scorers: self.hit(bases, batter),
                    batted_in: true,
                    charged: true,
                }
            }
        }
    }

    /// Batter to first; each runner moves up only if the base behind is filled.
    fn force(&mut self, batter: usize) -> Vec<usize> {
        let mut scorers = Vec::new();
        if let Some(first) = self.slots[0] {
            if let Some(second) = self.slots[1] {
                if let Some(third) = self.slots[2] {
                    scorers.push(third);
                }
                self.slots[2] = Some(second);
            }
            self.slots[1] = Some(first);
        }
        self.slots[0] = Some(batter);
        scorers
    }

    /// Every runner moves `bases`; the batter lands on base `bases` or scores.
    fn hit(&mut self, bases: usize, batter: usize) -> Vec<usize> {
        let mut scorers = Vec::new();
        for i in (0..3).rev() {
            if let Some(runner) = self.slots[i].take() {
                let target = i + bases;
                if target >= 3 {
                    scorers.push(runner);
                } else {
                    self.slots[target] = Some(runner);
                }
            }
        }
        if bases < 4 {
            self.slots[bases - 1] = Some(batter);
        } else {
            scorers.push(batter);
        }
        scorers
    }
}
