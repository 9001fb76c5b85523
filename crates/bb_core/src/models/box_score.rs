//! Box score, line score and pitching-appearance log.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeamSide {
    Away,
    Home,
}

impl TeamSide {
    pub fn opponent(self) -> TeamSide {
        match self {
            TeamSide::Away => TeamSide::Home,
            TeamSide::Home => TeamSide::Away,
        }
    }

    pub fn index(self) -> usize {
        match self {
            TeamSide::Away => 0,
            TeamSide::Home => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Half {
    Top,
    Bottom,
}

impl Half {
    pub fn batting(self) -> TeamSide {
        match self {
            Half::Top => TeamSide::Away,
            Half::Bottom => TeamSide::Home,
        }
    }

    pub fn fielding(self) -> TeamSide {
        self.batting().opponent()
    }
}

impl fmt::Display for Half {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Half::Top => write!(f, "Top"),
            Half::Bottom => write!(f, "Bottom"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattingLine {
    pub pa: u32,
    pub ab: u32,
    pub h: u32,
    pub doubles: u32,
    pub triples: u32,
    pub hr: u32,
    pub bb: u32,
    pub hbp: u32,
    pub r: u32,
    pub rbi: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PitchingLine {
    /// Outs recorded; innings pitched is `outs / 3`.
    pub outs: u32,
    pub bf: u32,
    pub h: u32,
    pub r: u32,
    pub er: u32,
    pub k: u32,
    pub bb: u32,
    pub hbp: u32,
    pub hr: u32,
}

impl PitchingLine {
    pub fn innings_pitched(&self) -> f64 {
        self.outs as f64 / 3.0
    }

    /// Scorebook notation: 6.1 is six and a third.
    pub fn innings_display(&self) -> String {
        format!("{}.{}", self.outs / 3, self.outs % 3)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattingEntry {
    pub side: TeamSide,
    pub team: String,
    pub player: String,
    pub line: BattingLine,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitchingEntry {
    pub side: TeamSide,
    pub team: String,
    pub pitcher: String,
    pub line: PitchingLine,
}

/// Per-player lines in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoxScore {
    pub batting: Vec<BattingEntry>,
    pub pitching: Vec<PitchingEntry>,
}

impl BoxScore {
    pub fn batting_mut(&mut self, side: TeamSide, team: &str, player: &str) -> &mut BattingLine {
        let idx = match self
            .batting
            .iter()
            .position(|e| e.side == side && e.player == player)
        {
            Some(idx) => idx,
            None => {
                self.batting.push(BattingEntry {
                    side,
                    team: team.to_string(),
                    player: player.to_string(),
                    line: BattingLine::default(),
                });
                self.batting.len() - 1
            }
        };
        &mut self.batting[idx].line
    }

    pub fn pitching_mut(&mut self, side: TeamSide, team: &str, pitcher: &str) -> &mut PitchingLine {
        let idx = match self
            .pitching
            .iter()
            .position(|e| e.side == side && e.pitcher == pitcher)
        {
            Some(idx) => idx,
            None => {
                self.pitching.push(PitchingEntry {
                    side,
                    team: team.to_string(),
                    pitcher: pitcher.to_string(),
                    line: PitchingLine::default(),
                });
                self.pitching.len() - 1
            }
        };
        &mut self.pitching[idx].line
    }

    pub fn batting_line(&self, side: TeamSide, player: &str) -> Option<&BattingLine> {
        self.batting
            .iter()
            .find(|e| e.side == side && e.player == player)
            .map(|e| &e.line)
    }

    pub fn pitching_line(&self, side: TeamSide, pitcher: &str) -> Option<&PitchingLine> {
        self.pitching
            .iter()
            .find(|e| e.side == side && e.pitcher == pitcher)
            .map(|e| &e.line)
    }

    /// Pitchers used by `side`, in the order they first appeared.
    pub fn used_pitchers(&self, side: TeamSide) -> Vec<&str> {
        self.pitching
            .iter()
            .filter(|e| e.side == side)
            .map(|e| e.pitcher.as_str())
            .collect()
    }

    pub fn team_hits(&self, side: TeamSide) -> u32 {
        self.batting.iter().filter(|e| e.side == side).map(|e| e.line.h).sum()
    }
}

/// One pitching stint: entered in `inning_start`, left in `inning_end`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appearance {
    pub side: TeamSide,
    pub team: String,
    pub pitcher: String,
    pub half: Half,
    pub inning_start: u32,
    pub inning_end: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppearanceLog {
    pub entries: Vec<Appearance>,
}

impl AppearanceLog {
    pub fn open(&mut self, side: TeamSide, team: &str, pitcher: &str, half: Half, inning: u32) {
        self.entries.push(Appearance {
            side,
            team: team.to_string(),
            pitcher: pitcher.to_string(),
            half,
            inning_start: inning,
            inning_end: None,
        });
    }

    /// Close the most recent open entry for this pitcher in this half.
    pub fn close(&mut self, side: TeamSide, pitcher: &str, half: Half, inning: u32) {
        if let Some(entry) = self.entries.iter_mut().rev().find(|e| {
            e.side == side && e.pitcher == pitcher && e.half == half && e.inning_end.is_none()
        }) {
            entry.inning_end = Some(inning);
        }
    }

    pub fn is_all_closed(&self) -> bool {
        self.entries.iter().all(|e| e.inning_end.is_some())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamLine {
    pub name: String,
    pub innings: Vec<u32>,
    pub runs: u32,
    pub hits: u32,
    /// Errors committed by this team in the field.
    pub errors: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineScore {
    pub away: TeamLine,
    pub home: TeamLine,
}

impl LineScore {
    pub fn side(&self, side: TeamSide) -> &TeamLine {
        match side {
            TeamSide::Away => &self.away,
            TeamSide::Home => &self.home,
        }
    }

    pub fn side_mut(&mut self, side: TeamSide) -> &mut TeamLine {
        match side {
            TeamSide::Away => &mut self.away,
            TeamSide::Home => &mut self.home,
        }
    }
}

impl fmt::Display for LineScore {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let innings = self.away.innings.len().max(self.home.innings.len());
        let width = self.away.name.len().max(self.home.name.len()).max(4);

        write!(f, "{:<width$}", "", width = width)?;
        for i in 1..=innings {
            write!(f, " {:>2}", i)?;
        }
        writeln!(f, " | {:>2} {:>2} {:>2}", "R", "H", "E")?;

        for line in [&self.away, &self.home] {
            write!(f, "{:<width$}", line.name, width = width)?;
            for i in 0..innings {
                match line.innings.get(i) {
                    Some(runs) => write!(f, " {:>2}", runs)?,
                    None => write!(f, " {:>2}", "x")?,
                }
            }
            writeln!(f, " | {:>2} {:>2} {:>2}", line.runs, line.hits, line.errors)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameResult {
    pub seed: Option<u64>,
    pub away: String,
    pub home: String,
    pub away_runs: u32,
    pub home_runs: u32,
    /// Innings started (the last may have no bottom half).
    pub innings: u32,
    pub box_score: BoxScore,
    pub appearances: AppearanceLog,
    pub line_score: LineScore,
}

impl GameResult {
    pub fn winner(&self) -> TeamSide {
        if self.home_runs > self.away_runs {
            TeamSide::Home
        } else {
            TeamSide::Away
        }
    }

    pub fn winner_name(&self) -> &str {
        match self.winner() {
            TeamSide::Away => &self.away,
            TeamSide::Home => &self.home,
        }
    }

    pub fn runs(&self, side: TeamSide) -> u32 {
        match side {
            TeamSide::Away => self.away_runs,
            TeamSide::Home => self.home_runs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_innings_display() {
        let line = PitchingLine { outs: 19, ..Default::default() };
        assert_eq!(line.innings_display(), "6.1");
        assert!((line.innings_pitched() - 19.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_lines_created_once_in_order() {
        let mut box_score = BoxScore::default();
        box_score.pitching_mut(TeamSide::Home, "H", "Starter").k += 1;
        box_score.pitching_mut(TeamSide::Home, "H", "Closer").bb += 1;
        box_score.pitching_mut(TeamSide::Home, "H", "Starter").k += 1;
        assert_eq!(box_score.used_pitchers(TeamSide::Home), vec!["Starter", "Closer"]);
        assert_eq!(box_score.pitching_line(TeamSide::Home, "Starter").unwrap().k, 2);
        assert!(box_score.used_pitchers(TeamSide::Away).is_empty());
    }

    #[test]
    fn test_appearance_log_closes_latest_open() {
        let mut log = AppearanceLog::default();
        log.open(TeamSide::Away, "A", "Ace", Half::Bottom, 1);
        log.close(TeamSide::Away, "Ace", Half::Bottom, 1);
        log.open(TeamSide::Away, "A", "Ace", Half::Bottom, 2);
        assert!(!log.is_all_closed());
        log.close(TeamSide::Away, "Ace", Half::Bottom, 3);
        assert_eq!(log.entries[0].inning_end, Some(1));
        assert_eq!(log.entries[1].inning_end, Some(3));
    }

    #[test]
    fn test_line_score_display_marks_unplayed_half() {
        let score = LineScore {
            away: TeamLine { name: "Away".into(), innings: vec![0, 1], runs: 1, hits: 4, errors: 0 },
            home: TeamLine { name: "Home".into(), innings: vec![2], runs: 2, hits: 5, errors: 1 },
        };
        let text = score.to_string();
        assert!(text.contains(" x |"));
        assert!(text.lines().count() == 3);
    }
}
