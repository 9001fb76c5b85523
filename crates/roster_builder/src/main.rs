//! Roster Builder CLI
//!
//! Loads projection CSVs, builds the two rosters and plays either a batch of
//! games (win table) or a single game (box score).

#[cfg(feature = "cli")]
use anyhow::{Context, Result};
#[cfg(feature = "cli")]
use bb_core::engine::{run_simulations, simulate_game, BatchSummary, MatchupSampler, SIM_CONFIG_PATH_ENV};
#[cfg(feature = "cli")]
use bb_core::models::{GameResult, TeamSide};
#[cfg(feature = "cli")]
use bb_core::SimConfig;
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "roster_builder")]
#[command(about = "Simulate baseball games from hitter/pitcher projection CSVs", long_about = None)]
struct Cli {
    /// Hitter projections CSV
    #[arg(long)]
    hitters: PathBuf,

    /// Pitcher projections CSV
    #[arg(long)]
    pitchers: PathBuf,

    /// Away team code (e.g. TOR)
    #[arg(long)]
    away: String,

    /// Home team code (e.g. LAD)
    #[arg(long)]
    home: String,

    /// Hitter matchup table CSV; built from the hitter rows when omitted
    #[arg(long)]
    hitter_table: Option<PathBuf>,

    /// Pitcher matchup table CSV; built from the pitcher rows when omitted
    #[arg(long)]
    pitcher_table: Option<PathBuf>,

    /// Number of games to simulate
    #[arg(long, default_value = "1000")]
    sims: u32,

    /// Base RNG seed (game i uses seed + i)
    #[arg(long, default_value = "42")]
    seed: u64,

    /// SimConfig JSON/YAML file (falls back to $BB_SIM_CONFIG_PATH)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Play one game and print its line score and box score
    #[arg(long = "box", default_value = "false")]
    box_score: bool,

    /// Print results as JSON
    #[arg(long, default_value = "false")]
    json: bool,

    /// Debug logging (pitching changes, half-inning results)
    #[arg(short, long, default_value = "false")]
    verbose: bool,
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = load_config(cli.config.clone())?;

    let (hitters, hit_stats) = roster_builder::load_hitters(&cli.hitters)?;
    let (pitchers, pit_stats) = roster_builder::load_pitchers(&cli.pitchers)?;
    log::info!(
        "Loaded {} hitters, {} pitchers",
        hit_stats.parsed,
        pit_stats.parsed
    );

    let away = roster_builder::build_roster(&cli.away, &hitters, &pitchers)?;
    let home = roster_builder::build_roster(&cli.home, &hitters, &pitchers)?;

    let (default_hit, default_pit) = roster_builder::tables_from_rosters(&away, &home)?;
    let hitter_table = match &cli.hitter_table {
        Some(path) => roster_builder::load_matchup_table(path)?,
        None => default_hit,
    };
    let pitcher_table = match &cli.pitcher_table {
        Some(path) => roster_builder::load_matchup_table(path)?,
        None => default_pit,
    };

    if cli.box_score {
        let result = simulate_game(&away, &home, &hitter_table, &pitcher_table, &config, cli.seed)?;
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            print_box_score(&result);
        }
        return Ok(());
    }

    let model = MatchupSampler::new(hitter_table, pitcher_table, &config.sampler);
    let summary = run_simulations(cli.sims, &away, &home, &model, &config, cli.seed)?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }
    Ok(())
}

#[cfg(feature = "cli")]
fn load_config(explicit: Option<PathBuf>) -> Result<SimConfig> {
    let path = explicit.or_else(|| std::env::var_os(SIM_CONFIG_PATH_ENV).map(PathBuf::from));
    match path {
        Some(path) => SimConfig::from_path(&path)
            .with_context(|| format!("Failed to load config: {}", path.display())),
        None => Ok(SimConfig::default()),
    }
}

#[cfg(feature = "cli")]
fn print_summary(summary: &BatchSummary) {
    println!("{} @ {} ({} games)", summary.away, summary.home, summary.len());
    println!(
        "   {:<12} wins {:>6}  win% {:>6.3}  R/G {:>5.2}",
        summary.away,
        summary.away_wins,
        summary.win_probability(TeamSide::Away),
        summary.mean_runs(TeamSide::Away)
    );
    println!(
        "   {:<12} wins {:>6}  win% {:>6.3}  R/G {:>5.2}",
        summary.home,
        summary.home_wins,
        summary.win_probability(TeamSide::Home),
        summary.mean_runs(TeamSide::Home)
    );
    println!(
        "   Innings/G {:.2}, extra-inning games {}",
        summary.mean_innings(),
        summary.extra_inning_games
    );
}

#[cfg(feature = "cli")]
fn print_box_score(result: &GameResult) {
    println!("{}", result.line_score);

    for side in [TeamSide::Away, TeamSide::Home] {
        println!("{:<24} {:>3} {:>3} {:>3} {:>3} {:>3} {:>3} {:>3}", "Batting", "PA", "AB", "H", "HR", "BB", "R", "RBI");
        for entry in result.box_score.batting.iter().filter(|e| e.side == side) {
            let l = &entry.line;
            println!(
                "{:<24} {:>3} {:>3} {:>3} {:>3} {:>3} {:>3} {:>3}",
                entry.player, l.pa, l.ab, l.h, l.hr, l.bb, l.r, l.rbi
            );
        }
        println!();
        println!("{:<24} {:>5} {:>3} {:>3} {:>3} {:>3} {:>3} {:>3}", "Pitching", "IP", "BF", "H", "R", "ER", "BB", "K");
        for entry in result.box_score.pitching.iter().filter(|e| e.side == side) {
            let l = &entry.line;
            println!(
                "{:<24} {:>5} {:>3} {:>3} {:>3} {:>3} {:>3} {:>3}",
                entry.pitcher,
                l.innings_display(),
                l.bf,
                l.h,
                l.r,
                l.er,
                l.bb,
                l.k
            );
        }
        println!();
    }

    println!("Winner: {} (seed {:?})", result.winner_name(), result.seed);
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("roster_builder CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
