use super::player::{Batter, Pitcher};
use crate::error::{Result, SimError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Index into a roster's pitching staff (starter first, then bullpen, then reserves).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PitcherId(pub usize);

impl PitcherId {
    pub const STARTER: PitcherId = PitcherId(0);
}

/// Immutable team template: who bats, who pitches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roster {
    pub name: String,
    pub lineup: Vec<Batter>,
    /// `staff[0]` starts; the rest of the first `1 + bullpen_len` are relievers.
    staff: Vec<Pitcher>,
    bullpen_len: usize,
}

impl Roster {
    /// `pitchers[0]` is the starter, the remainder form the bullpen.
    pub fn new(name: impl Into<String>, lineup: Vec<Batter>, pitchers: Vec<Pitcher>) -> Result<Self> {
        Self::with_reserves(name, lineup, pitchers, Vec::new())
    }

    /// Same as [`Roster::new`] plus an emergency-only reserve pool.
    pub fn with_reserves(
        name: impl Into<String>,
        lineup: Vec<Batter>,
        pitchers: Vec<Pitcher>,
        reserves: Vec<Pitcher>,
    ) -> Result<Self> {
        let name = name.into();
        if lineup.is_empty() {
            return Err(SimError::EmptyLineup { team: name });
        }
        if pitchers.is_empty() {
            return Err(SimError::NoPitchers { team: name });
        }
        for batter in &lineup {
            batter.validate()?;
        }
        for pitcher in pitchers.iter().chain(reserves.iter()) {
            pitcher.validate()?;
        }

        let bullpen_len = pitchers.len() - 1;
        let mut staff = pitchers;
        staff.extend(reserves);
        Ok(Self { name, lineup, staff, bullpen_len })
    }

    pub fn starter(&self) -> &Pitcher {
        &self.staff[0]
    }

    pub fn pitcher(&self, id: PitcherId) -> &Pitcher {
        &self.staff[id.0]
    }

    pub fn staff(&self) -> &[Pitcher] {
        &self.staff
    }

    pub fn bullpen_ids(&self) -> impl Iterator<Item = PitcherId> {
        (1..=self.bullpen_len).map(PitcherId)
    }

    pub fn reserve_ids(&self) -> impl Iterator<Item = PitcherId> {
        (1 + self.bullpen_len..self.staff.len()).map(PitcherId)
    }
}

/// Game-time state of one side: lineup position, remaining arms, mound.
///
/// `reset` restores everything from the shared roster so a `Team` can be
/// reused across simulations.
#[derive(Debug, Clone)]
pub struct Team {
    roster: Arc<Roster>,
    lineup_index: usize,
    bullpen: Vec<PitcherId>,
    reserves: Vec<PitcherId>,
    active: PitcherId,
    emergency: bool,
}

impl Team {
    pub fn new(roster: impl Into<Arc<Roster>>) -> Self {
        let roster = roster.into();
        let mut team = Self {
            roster,
            lineup_index: 0,
            bullpen: Vec::new(),
            reserves: Vec::new(),
            active: PitcherId::STARTER,
            emergency: false,
        };
        team.reset();
        team
    }

    /// Back to first pitch: leadoff hitter up, starter on the mound, full pens.
    pub fn reset(&mut self) {
        self.lineup_index = 0;
        self.bullpen = self.roster.bullpen_ids().collect();
        self.reserves = self.roster.reserve_ids().collect();
        self.active = PitcherId::STARTER;
        self.emergency = false;
    }

    pub fn name(&self) -> &str {
        &self.roster.name
    }

    pub fn roster(&self) -> &Arc<Roster> {
        &self.roster
    }

    pub fn lineup_len(&self) -> usize {
        self.roster.lineup.len()
    }

    pub fn lineup_index(&self) -> usize {
        self.lineup_index
    }

    pub fn batter(&self, slot: usize) -> &Batter {
        &self.roster.lineup[slot]
    }

    /// Lineup slot of the batter due up, advancing (and wrapping) the order.
    pub fn next_batter(&mut self) -> usize {
        let slot = self.lineup_index;
        self.lineup_index = (self.lineup_index + 1) % self.roster.lineup.len();
        slot
    }

    /// The next `n` scheduled batters, without advancing.
    pub fn upcoming(&self, n: usize) -> Vec<&Batter> {
        let len = self.roster.lineup.len();
        (0..n)
            .map(|i| &self.roster.lineup[(self.lineup_index + i) % len])
            .collect()
    }

    pub fn active_id(&self) -> PitcherId {
        self.active
    }

    pub fn active_pitcher(&self) -> &Pitcher {
        self.roster.pitcher(self.active)
    }

    pub fn pitcher(&self, id: PitcherId) -> &Pitcher {
        self.roster.pitcher(id)
    }

    pub fn is_starter(&self, id: PitcherId) -> bool {
        id == PitcherId::STARTER
    }

    pub fn bullpen(&self) -> &[PitcherId] {
        &self.bullpen
    }

    pub fn reserves(&self) -> &[PitcherId] {
        &self.reserves
    }

    pub fn is_emergency(&self) -> bool {
        self.emergency
    }

    pub(crate) fn set_emergency(&mut self) {
        self.emergency = true;
    }

    /// Take `id` out of the bullpen or reserve pool and put them on the mound.
    pub(crate) fn install(&mut self, id: PitcherId) {
        self.bullpen.retain(|p| *p != id);
        self.reserves.retain(|p| *p != id);
        self.active = id;
    }
}
