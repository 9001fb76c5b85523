pub mod box_score;
pub mod matchup;
pub mod outcome;
pub mod player;
pub mod team;

pub use box_score::{
    Appearance, AppearanceLog, BattingEntry, BattingLine, BoxScore, GameResult, Half, LineScore,
    PitchingEntry, PitchingLine, TeamLine, TeamSide,
};
pub use matchup::{MatchupRow, MatchupTable, RowMatch};
pub use outcome::{Outcome, OutcomeProbs, PROB_SUM_TOLERANCE};
pub use player::{Batter, Hand, Pitcher, DEFAULT_RATING};
pub use team::{PitcherId, Roster, Team};
