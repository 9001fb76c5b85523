//! Pitcher usage policy
//!
//! Evaluated after every plate appearance. A pitcher is either left in or
//! pulled; the caps that drive the decision are drawn once per stint and kept
//! on the [`Stint`], never on the pitcher record.

use super::config::{BfRange, RelieverConfig, StarterConfig};
use crate::models::PitcherId;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Starter,
    Reliever,
}

/// One pitcher's continuous time on the mound.
#[derive(Debug, Clone, PartialEq)]
pub struct Stint {
    pub pitcher: PitcherId,
    pub role: Role,
    pub batters_faced: u32,
    /// Runs charged to the pitcher during this stint.
    pub runs_allowed: u32,
    pub stamina_cap: Option<u32>,
    pub extended: bool,
    pub relief_cap: Option<u32>,
}

impl Stint {
    pub fn new(pitcher: PitcherId, role: Role) -> Self {
        Self {
            pitcher,
            role,
            batters_faced: 0,
            runs_allowed: 0,
            stamina_cap: None,
            extended: false,
            relief_cap: None,
        }
    }

    pub fn starter(pitcher: PitcherId) -> Self {
        Self::new(pitcher, Role::Starter)
    }

    pub fn reliever(pitcher: PitcherId, relief_cap: Option<u32>) -> Self {
        Self { relief_cap, ..Self::new(pitcher, Role::Reliever) }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullReason {
    EarlyHook,
    MidGameHook,
    HardCeiling,
    StaminaCap,
    Fatigue,
    RunsAllowed,
    Traffic,
    BattersFacedCap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageDecision {
    Stay,
    Pull(PullReason),
}

impl UsageDecision {
    pub fn is_pull(self) -> bool {
        matches!(self, UsageDecision::Pull(_))
    }
}

/// Uniform draw from an inclusive batters-faced range.
pub fn draw_bf(range: BfRange, rng: &mut ChaCha8Rng) -> u32 {
    rng.gen_range(range[0]..=range[1])
}

pub struct UsagePolicy<'a> {
    starter: &'a StarterConfig,
    reliever: &'a RelieverConfig,
}

impl<'a> UsagePolicy<'a> {
    pub fn new(starter: &'a StarterConfig, reliever: &'a RelieverConfig) -> Self {
        Self { starter, reliever }
    }

    /// Decide whether the pitcher of `stint` comes out.
    ///
    /// `runners_on` is the base occupancy after the plate appearance;
    /// `emergency` is the defending team's sticky emergency flag.
    pub fn evaluate(
        &self,
        stint: &mut Stint,
        runners_on: u32,
        emergency: bool,
        rng: &mut ChaCha8Rng,
    ) -> UsageDecision {
        match stint.role {
            Role::Starter => self.evaluate_starter(stint, rng),
            Role::Reliever => self.evaluate_reliever(stint, runners_on, emergency, rng),
        }
    }

    fn evaluate_starter(&self, stint: &mut Stint, rng: &mut ChaCha8Rng) -> UsageDecision {
        let cfg = self.starter;
        let bf = stint.batters_faced;
        let runs = stint.runs_allowed;

        if runs >= cfg.early_hook_runs && bf < cfg.early_hook_max_bf {
            return UsageDecision::Pull(PullReason::EarlyHook);
        }
        if bf >= cfg.mid_hook_bf && runs >= cfg.mid_hook_runs {
            return UsageDecision::Pull(PullReason::MidGameHook);
        }

        let mut cap = match stint.stamina_cap {
            Some(cap) => cap,
            None => {
                let cap = draw_bf(cfg.stamina_cap, rng);
                stint.stamina_cap = Some(cap);
                cap
            }
        };
        // A cruising starter sometimes gets to go deeper, once per stint
        if !stint.extended
            && runs <= cfg.extension_max_runs
            && bf >= cap
            && rng.gen::<f64>() < cfg.extension_chance
        {
            cap = draw_bf(cfg.extension_cap, rng);
            stint.stamina_cap = Some(cap);
            stint.extended = true;
        }

        if bf >= cfg.hard_ceiling {
            return UsageDecision::Pull(PullReason::HardCeiling);
        }
        if bf >= cap {
            return UsageDecision::Pull(PullReason::StaminaCap);
        }
        if bf >= cfg.fatigue_start_bf {
            let chance = cfg.fatigue_base + cfg.fatigue_step * (bf - cfg.fatigue_start_bf) as f64;
            if rng.gen::<f64>() < chance {
                return UsageDecision::Pull(PullReason::Fatigue);
            }
        }
        UsageDecision::Stay
    }

    fn evaluate_reliever(
        &self,
        stint: &mut Stint,
        runners_on: u32,
        emergency: bool,
        rng: &mut ChaCha8Rng,
    ) -> UsageDecision {
        let cfg = self.reliever;
        let bf = stint.batters_faced;

        if bf < cfg.min_batters && !emergency {
            return UsageDecision::Stay;
        }
        let cap = match stint.relief_cap {
            Some(cap) => cap,
            None => {
                let cap = draw_bf(cfg.default_cap, rng);
                stint.relief_cap = Some(cap);
                cap
            }
        };

        if stint.runs_allowed >= cfg.runs_hook {
            return UsageDecision::Pull(PullReason::RunsAllowed);
        }
        if runners_on >= cfg.traffic_runners && bf >= cfg.min_batters {
            return UsageDecision::Pull(PullReason::Traffic);
        }
        if bf >= cap {
            return UsageDecision::Pull(PullReason::BattersFacedCap);
        }
        UsageDecision::Stay
    }
}
