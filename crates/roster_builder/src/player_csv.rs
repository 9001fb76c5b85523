//! Projection CSV parsing
//!
//! Hitter, pitcher and matchup-table files share the nine `*_rate_pred`
//! columns. Each row's rates are normalized to sum to 1 on load; projection
//! models rarely emit exactly normalized rows.
//!
//! - Hitters: `full_name`, `bats`, `team`, rates
//! - Pitchers: `full_name`, `pit_hand`, `team`, rates, optional `dra_minus`,
//!   `dra_minus_l`, `dra_minus_r`
//! - Matchup tables: optional `full_name`, `bats`, `pit_hand`, rates,
//!   optional `dra_minus`

use crate::LoadError;
use anyhow::{Context, Result};
use bb_core::models::{
    Batter, Hand, MatchupRow, MatchupTable, Outcome, OutcomeProbs, Pitcher, DEFAULT_RATING,
};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

/// Nine predicted rates, in file order.
#[derive(Debug, Clone, Copy)]
struct RateColumns {
    out_rate_pred: f64,
    so_rate_pred: f64,
    bb_rate_pred: f64,
    hbp_rate_pred: f64,
    roe_rate_pred: f64,
    single_rate_pred: f64,
    double_rate_pred: f64,
    triple_rate_pred: f64,
    hr_rate_pred: f64,
}

impl RateColumns {
    fn into_probs(self, owner: &str) -> Result<OutcomeProbs> {
        let raw = OutcomeProbs::from_pairs([
            (Outcome::Out, self.out_rate_pred),
            (Outcome::Strikeout, self.so_rate_pred),
            (Outcome::Walk, self.bb_rate_pred),
            (Outcome::HitByPitch, self.hbp_rate_pred),
            (Outcome::ReachedOnError, self.roe_rate_pred),
            (Outcome::Single, self.single_rate_pred),
            (Outcome::Double, self.double_rate_pred),
            (Outcome::Triple, self.triple_rate_pred),
            (Outcome::HomeRun, self.hr_rate_pred),
        ]);
        Ok(raw.normalized(owner)?)
    }
}

// csv cannot flatten numeric columns into a nested struct, so each record
// repeats the rate fields and `split_rates!` gathers them.
macro_rules! split_rates {
    ($rec:expr) => {
        RateColumns {
            out_rate_pred: $rec.out_rate_pred,
            so_rate_pred: $rec.so_rate_pred,
            bb_rate_pred: $rec.bb_rate_pred,
            hbp_rate_pred: $rec.hbp_rate_pred,
            roe_rate_pred: $rec.roe_rate_pred,
            single_rate_pred: $rec.single_rate_pred,
            double_rate_pred: $rec.double_rate_pred,
            triple_rate_pred: $rec.triple_rate_pred,
            hr_rate_pred: $rec.hr_rate_pred,
        }
    };
}

#[derive(Debug, Deserialize)]
struct HitterRecord {
    full_name: String,
    bats: String,
    #[serde(default)]
    team: Option<String>,
    out_rate_pred: f64,
    so_rate_pred: f64,
    bb_rate_pred: f64,
    hbp_rate_pred: f64,
    roe_rate_pred: f64,
    single_rate_pred: f64,
    double_rate_pred: f64,
    triple_rate_pred: f64,
    hr_rate_pred: f64,
}

#[derive(Debug, Deserialize)]
struct PitcherRecord {
    full_name: String,
    pit_hand: String,
    #[serde(default)]
    team: Option<String>,
    out_rate_pred: f64,
    so_rate_pred: f64,
    bb_rate_pred: f64,
    hbp_rate_pred: f64,
    roe_rate_pred: f64,
    single_rate_pred: f64,
    double_rate_pred: f64,
    triple_rate_pred: f64,
    hr_rate_pred: f64,
    #[serde(default)]
    dra_minus: Option<f64>,
    #[serde(default)]
    dra_minus_l: Option<f64>,
    #[serde(default)]
    dra_minus_r: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct MatchupRecord {
    #[serde(default, alias = "name")]
    full_name: Option<String>,
    bats: String,
    pit_hand: String,
    out_rate_pred: f64,
    so_rate_pred: f64,
    bb_rate_pred: f64,
    hbp_rate_pred: f64,
    roe_rate_pred: f64,
    single_rate_pred: f64,
    double_rate_pred: f64,
    triple_rate_pred: f64,
    hr_rate_pred: f64,
    #[serde(default)]
    dra_minus: Option<f64>,
}

/// A hitter plus the team code he was listed under.
#[derive(Debug, Clone, PartialEq)]
pub struct HitterEntry {
    pub team: Option<String>,
    pub batter: Batter,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PitcherEntry {
    pub team: Option<String>,
    pub pitcher: Pitcher,
}

/// CSV parsing statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseStats {
    pub total_rows: u32,
    pub parsed: u32,
}

fn parse_hand(label: &str, player: &str, line: u64) -> Result<Hand, LoadError> {
    label.parse::<Hand>().map_err(|_| LoadError::UnknownHand {
        line,
        player: player.to_string(),
        label: label.to_string(),
    })
}

fn clean_team(team: Option<String>) -> Option<String> {
    team.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}

fn reader_from_path(path: &Path) -> Result<csv::Reader<std::fs::File>> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open CSV file: {}", path.display()))
}

fn line_of(record: &csv::StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(0)
}

/// Parse hitter rows from any reader.
pub fn read_hitters<R: Read>(input: R) -> Result<(Vec<HitterEntry>, ParseStats)> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(input);
    parse_hitters(&mut reader)
}

fn parse_hitters<R: Read>(reader: &mut csv::Reader<R>) -> Result<(Vec<HitterEntry>, ParseStats)> {
    let headers = reader.headers().context("Failed to read hitter CSV header")?.clone();
    let mut stats = ParseStats::default();
    let mut hitters = Vec::new();

    for result in reader.records() {
        let record = result.context("Failed to read hitter row")?;
        stats.total_rows += 1;
        let line = line_of(&record);
        let rec: HitterRecord = record
            .deserialize(Some(&headers))
            .with_context(|| format!("Line {}: malformed hitter row", line))?;

        let hand = parse_hand(&rec.bats, &rec.full_name, line)?;
        let probs = split_rates!(rec).into_probs(&rec.full_name)?;
        hitters.push(HitterEntry {
            team: clean_team(rec.team),
            batter: Batter::new(rec.full_name, hand, probs),
        });
        stats.parsed += 1;
    }
    Ok((hitters, stats))
}

/// Parse pitcher rows from any reader.
///
/// `dra_minus` defaults to the neutral rating; the split columns fall back to
/// it when blank.
pub fn read_pitchers<R: Read>(input: R) -> Result<(Vec<PitcherEntry>, ParseStats)> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(input);
    parse_pitchers(&mut reader)
}

fn parse_pitchers<R: Read>(reader: &mut csv::Reader<R>) -> Result<(Vec<PitcherEntry>, ParseStats)> {
    let headers = reader.headers().context("Failed to read pitcher CSV header")?.clone();
    let mut stats = ParseStats::default();
    let mut pitchers = Vec::new();

    for result in reader.records() {
        let record = result.context("Failed to read pitcher row")?;
        stats.total_rows += 1;
        let line = line_of(&record);
        let rec: PitcherRecord = record
            .deserialize(Some(&headers))
            .with_context(|| format!("Line {}: malformed pitcher row", line))?;

        let hand = parse_hand(&rec.pit_hand, &rec.full_name, line)?;
        let probs = split_rates!(rec).into_probs(&rec.full_name)?;
        let pitcher = Pitcher::new(rec.full_name, hand, probs)
            .with_rating(rec.dra_minus.unwrap_or(DEFAULT_RATING))
            .with_split_ratings(rec.dra_minus_l, rec.dra_minus_r);
        pitchers.push(PitcherEntry { team: clean_team(rec.team), pitcher });
        stats.parsed += 1;
    }
    Ok((pitchers, stats))
}

/// Parse a hand-segmented matchup table.
pub fn read_matchup_table<R: Read>(label: &str, input: R) -> Result<MatchupTable> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(input);
    parse_matchup_table(label, &mut reader)
}

fn parse_matchup_table<R: Read>(label: &str, reader: &mut csv::Reader<R>) -> Result<MatchupTable> {
    let headers = reader.headers().context("Failed to read matchup CSV header")?.clone();
    let mut rows = Vec::new();

    for result in reader.records() {
        let record = result.context("Failed to read matchup row")?;
        let line = line_of(&record);
        let rec: MatchupRecord = record
            .deserialize(Some(&headers))
            .with_context(|| format!("Line {}: malformed matchup row", line))?;

        let name = rec.full_name.clone().filter(|n| !n.is_empty());
        let owner = name.clone().unwrap_or_else(|| format!("{} line {}", label, line));
        let bats = parse_hand(&rec.bats, &owner, line)?;
        let pit_hand = parse_hand(&rec.pit_hand, &owner, line)?;
        let probs = split_rates!(rec).into_probs(&owner)?;
        rows.push(MatchupRow { name, bats, pit_hand, probs, rating: rec.dra_minus });
    }
    Ok(MatchupTable::new(label, rows)?)
}

pub fn load_hitters(path: &Path) -> Result<(Vec<HitterEntry>, ParseStats)> {
    let mut reader = reader_from_path(path)?;
    parse_hitters(&mut reader).with_context(|| format!("Failed to load hitters from {}", path.display()))
}

pub fn load_pitchers(path: &Path) -> Result<(Vec<PitcherEntry>, ParseStats)> {
    let mut reader = reader_from_path(path)?;
    parse_pitchers(&mut reader).with_context(|| format!("Failed to load pitchers from {}", path.display()))
}

pub fn load_matchup_table(path: &Path) -> Result<MatchupTable> {
    let label = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "matchups".to_string());
    let mut reader = reader_from_path(path)?;
    parse_matchup_table(&label, &mut reader)
        .with_context(|| format!("Failed to load matchup table from {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bb_core::models::RowMatch;
    use std::io::Write;

    const RATES_HEADER: &str = "out_rate_pred,so_rate_pred,bb_rate_pred,hbp_rate_pred,roe_rate_pred,single_rate_pred,double_rate_pred,triple_rate_pred,hr_rate_pred";

    #[test]
    fn test_hitter_rates_are_normalized() {
        // Sums to 2.0 before normalization
        let csv = format!(
            "full_name,bats,team,{}\nMookie Betts,R,LAD,0.9,0.4,0.2,0.02,0.02,0.3,0.1,0.01,0.05\n",
            RATES_HEADER
        );
        let (hitters, stats) = read_hitters(csv.as_bytes()).unwrap();
        assert_eq!(stats, ParseStats { total_rows: 1, parsed: 1 });
        let h = &hitters[0];
        assert_eq!(h.team.as_deref(), Some("LAD"));
        assert_eq!(h.batter.hand, Hand::Right);
        assert!((h.batter.probs.sum() - 1.0).abs() < 1e-9);
        assert!((h.batter.probs.get(Outcome::Out).unwrap() - 0.45).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_hand_is_an_error() {
        let csv = format!("full_name,bats,team,{}\nNobody,X,TOR,1,0,0,0,0,0,0,0,0\n", RATES_HEADER);
        let err = read_hitters(csv.as_bytes()).unwrap_err();
        let load = err.downcast_ref::<LoadError>().unwrap();
        assert!(matches!(load, LoadError::UnknownHand { label, .. } if label == "X"));
    }

    #[test]
    fn test_pitcher_split_ratings_default_to_overall() {
        let csv = format!(
            "full_name,pit_hand,team,{},dra_minus,dra_minus_l,dra_minus_r\n\
             Ace,L,TOR,0.7,0.1,0.05,0,0,0.1,0.03,0,0.02,85,,92\n\
             Mop,R,TOR,0.7,0.1,0.05,0,0,0.1,0.03,0,0.02,,,\n",
            RATES_HEADER
        );
        let (pitchers, _) = read_pitchers(csv.as_bytes()).unwrap();
        let ace = &pitchers[0].pitcher;
        assert_eq!(ace.rating_vs(Hand::Left), 85.0);
        assert_eq!(ace.rating_vs(Hand::Right), 92.0);
        assert_eq!(pitchers[1].pitcher.rating, DEFAULT_RATING);
    }

    #[test]
    fn test_matchup_table_named_and_generic_rows() {
        let csv = format!(
            "full_name,bats,pit_hand,{}\n\
             ,L,R,0.6,0.1,0.1,0,0,0.1,0.05,0,0.05\n\
             ,R,R,0.7,0.1,0.05,0,0,0.1,0.03,0,0.02\n\
             Slugger,R,R,0.5,0.1,0.1,0,0,0.1,0.1,0,0.1\n",
            RATES_HEADER
        );
        let table = read_matchup_table("hitters", csv.as_bytes()).unwrap();
        assert_eq!(table.len(), 3);
        let (row, how) = table.resolve("Slugger", Hand::Right, Hand::Right);
        assert_eq!(how, RowMatch::Exact);
        assert_eq!(row.name.as_deref(), Some("Slugger"));
        let (row, _) = table.resolve("Someone Else", Hand::Left, Hand::Right);
        assert_eq!(row.bats, Hand::Left);
        assert!(row.name.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "full_name,bats,team,{}", RATES_HEADER).unwrap();
        writeln!(file, "A,S,NYY,0.7,0.1,0.05,0,0,0.1,0.03,0,0.02").unwrap();
        let (hitters, _) = load_hitters(file.path()).unwrap();
        assert_eq!(hitters[0].batter.hand, Hand::Switch);
    }

    #[test]
    fn test_missing_file_has_context() {
        let err = load_hitters(Path::new("/nonexistent/hitters.csv")).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to open CSV file"));
    }
}
