use std::path::PathBuf;

use clap::Parser;

use blues_bench::config::{BenchmarkConfig, ResolvedOutputs};
use blues_bench::logging::init_logging;
use blues_bench::runner::GameRunner;

/// Headless harness pitting Blues bots against each other.
#[derive(Debug, Parser)]
#[command(
    name = "blues-bench",
    author,
    version,
    about = "Deterministic Blues bot-vs-bot harness"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "bench/blues.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the number of games to play.
    #[arg(long, value_name = "GAMES")]
    games: Option<usize>,

    /// Override the RNG seed for game generation.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Rotate the lineup one seat per game.
    #[arg(long)]
    rotate_seats: bool,

    /// Exit after validating the configuration (no games are played).
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = BenchmarkConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if let Some(games) = cli.games {
        config.games.count = games;
    }

    if let Some(seed) = cli.seed {
        config.games.seed = Some(seed);
    }

    if cli.rotate_seats {
        config.games.rotate_seats = true;
    }

    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let run_id = config.run_id.clone();
    let games = config.games.count;

    println!("Loaded configuration '{run_id}' ({games} game{})", if games == 1 { "" } else { "s" });

    let logging_guard = init_logging(&config.logging, &outputs, &run_id)?;
    let runner = GameRunner::new(config, outputs)?;

    if cli.validate_only {
        println!("Validation-only mode: no games played.");
        return Ok(());
    }

    let summary = runner.run()?;
    println!(
        "Run complete for '{run_id}': {} games → {} rows at {}",
        summary.games_played,
        summary.rows_written,
        summary.jsonl_path.display()
    );
    println!("Summary table: {}", summary.summary_path.display());
    for standing in &summary.standings {
        println!(
            "  {:<12} {:<22} wins {:>3}/{:<3} mean total {:>8.2}",
            standing.name,
            standing.strategy,
            standing.wins,
            standing.games,
            standing.mean_total()
        );
    }
    if let Some(guard) = logging_guard.as_ref() {
        println!("Telemetry log: {}", guard.telemetry_path.display());
    }

    Ok(())
}
