use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use blues_bot::BotPlayer;
use blues_core::model::player::SEAT_COUNT;
use blues_core::{EndKind, EventSink, GameEvent, Player, Seat, Table, TableConfig, TableError};
use rand::{RngCore, SeedableRng, rngs::StdRng};
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};

use crate::config::{BenchmarkConfig, ResolvedOutputs, SeatBlueprint, ValidationError};

/// Plays the configured number of bot-only games and records the results.
pub struct GameRunner {
    config: BenchmarkConfig,
    outputs: ResolvedOutputs,
    seats: Vec<SeatBlueprint>,
    logging_enabled: bool,
}

/// Summary details returned after a run.
#[derive(Debug)]
pub struct RunSummary {
    pub games_played: usize,
    pub rows_written: usize,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
    pub standings: Vec<Standing>,
}

/// Aggregate results for one configured bot across every game it played.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Standing {
    pub name: String,
    pub strategy: String,
    pub games: usize,
    pub wins: usize,
    pub rounds_won: usize,
    pub blues_wins: usize,
    pub total_points: i64,
}

impl Standing {
    fn new(seat: &SeatBlueprint) -> Self {
        Self {
            name: seat.name.clone(),
            strategy: seat.strategy.to_string(),
            games: 0,
            wins: 0,
            rounds_won: 0,
            blues_wins: 0,
            total_points: 0,
        }
    }

    pub fn mean_total(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.total_points as f64 / self.games as f64
        }
    }
}

impl GameRunner {
    /// Build a runner from a validated configuration.
    pub fn new(config: BenchmarkConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        let seats = config.seat_blueprints()?;
        if seats.len() != SEAT_COUNT {
            return Err(RunnerError::SeatCount { found: seats.len() });
        }

        Ok(Self {
            logging_enabled: config.logging.enable_structured,
            config,
            outputs,
            seats,
        })
    }

    /// Execute every game, streaming JSONL rows to disk.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.jsonl.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;

        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let mut rng = StdRng::seed_from_u64(self.config.games.seed.unwrap_or(0));
        let mut standings: Vec<Standing> = self.seats.iter().map(Standing::new).collect();
        let mut rows_written = 0usize;

        for game_index in 0..self.config.games.count {
            let game_seed = rng.next_u64();
            let outcome = self.play_game(game_index, game_seed)?;
            outcome.accumulate(&mut standings);
            rows_written += write_game_rows(
                &mut writer,
                &self.config,
                game_index,
                game_seed,
                &outcome,
            )?;
        }

        writer.flush()?;
        write_markdown(&self.outputs.summary_md, &self.config.run_id, &standings)?;

        Ok(RunSummary {
            games_played: self.config.games.count,
            rows_written,
            jsonl_path: self.outputs.jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
            standings,
        })
    }

    /// Which configured bot sits in each seat for this game.
    fn seating(&self, game_index: usize) -> [usize; SEAT_COUNT] {
        let offset = if self.config.games.rotate_seats {
            game_index % SEAT_COUNT
        } else {
            0
        };
        std::array::from_fn(|seat| (seat + offset) % SEAT_COUNT)
    }

    fn play_game(&self, game_index: usize, game_seed: u64) -> Result<GameOutcome, RunnerError> {
        let seating = self.seating(game_index);
        let players: [Box<dyn Player>; SEAT_COUNT] = std::array::from_fn(|seat| {
            let blueprint = &self.seats[seating[seat]];
            let player: Box<dyn Player> = Box::new(BotPlayer::from_strategy(
                blueprint.name.clone(),
                blueprint.strategy,
                game_seed.wrapping_add(seat as u64 + 1),
                blueprint.avoid_double_blue,
            ));
            player
        });

        let table_config = TableConfig {
            seed: Some(game_seed),
            ..self.config.table
        };
        let mut table = Table::new(players, table_config);
        if self.logging_enabled {
            table.subscribe(round_logger(self.config.run_id.clone(), game_index));
        }

        let winner = table.play_game()?;
        let ledger = table.ledger();

        let seat_results = Seat::LOOP
            .iter()
            .map(|&seat| {
                let won_rounds = ledger
                    .records()
                    .iter()
                    .filter(|record| record.end_state.winner() == seat);
                let (rounds_won, blues_wins) = won_rounds.fold((0, 0), |(rounds, blues), record| {
                    let blues_win = usize::from(record.end_state.kind() == EndKind::Blues);
                    (rounds + 1, blues + blues_win)
                });
                SeatResult {
                    seat,
                    blueprint: seating[seat.index()],
                    total: ledger.total(seat),
                    rounds_won,
                    blues_wins,
                }
            })
            .collect();

        Ok(GameOutcome {
            winner,
            rounds: ledger.rounds_played(),
            seat_results,
            seating: Seat::LOOP
                .iter()
                .map(|&seat| SeatSnapshot {
                    seat: seat.to_string(),
                    bot: self.seats[seating[seat.index()]].name.clone(),
                })
                .collect(),
        })
    }
}

fn round_logger(run_id: String, game_index: usize) -> Box<dyn EventSink> {
    Box::new(move |game_event: &GameEvent| match game_event {
        GameEvent::RoundOver { end_state } => {
            if tracing::enabled!(Level::INFO) {
                event!(
                    target: "blues_bench::round",
                    Level::INFO,
                    run_id = %run_id,
                    game_index = game_index as u32,
                    kind = ?end_state.kind(),
                    winner = %end_state.winner(),
                    end_state = %end_state,
                );
            }
        }
        GameEvent::GameOver { winner, totals } => {
            event!(
                target: "blues_bench::game",
                Level::INFO,
                run_id = %run_id,
                game_index = game_index as u32,
                winner = %winner,
                totals = ?totals,
            );
        }
        _ => {}
    })
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

fn write_game_rows(
    writer: &mut BufWriter<File>,
    config: &BenchmarkConfig,
    game_index: usize,
    game_seed: u64,
    outcome: &GameOutcome,
) -> Result<usize, RunnerError> {
    let game_id = format!("G{game_index:05}");

    let mut rows_written = 0usize;
    for result in &outcome.seat_results {
        let row = GameLogRow {
            run_id: config.run_id.clone(),
            game_id: game_id.clone(),
            game_index,
            game_seed,
            seat: result.seat.to_string(),
            bot: outcome.seating[result.seat.index()].bot.clone(),
            seating: outcome.seating.clone(),
            total: result.total,
            rounds: outcome.rounds,
            rounds_won: result.rounds_won,
            blues_wins: result.blues_wins,
            won: result.seat == outcome.winner,
        };

        serde_json::to_writer(&mut *writer, &row)?;
        writer.write_all(b"\n")?;
        rows_written += 1;
    }

    Ok(rows_written)
}

fn write_markdown(path: &Path, run_id: &str, standings: &[Standing]) -> Result<(), RunnerError> {
    let mut out = BufWriter::new(File::create(path)?);
    writeln!(out, "# Blues bench: {run_id}")?;
    writeln!(out)?;
    writeln!(
        out,
        "| bot | strategy | games | wins | rounds won | blues wins | mean total |"
    )?;
    writeln!(out, "|-----|----------|-------|------|------------|------------|------------|")?;
    for standing in standings {
        writeln!(
            out,
            "| {} | {} | {} | {} | {} | {} | {:.2} |",
            standing.name,
            standing.strategy,
            standing.games,
            standing.wins,
            standing.rounds_won,
            standing.blues_wins,
            standing.mean_total()
        )?;
    }
    out.flush()?;
    Ok(())
}

struct GameOutcome {
    winner: Seat,
    rounds: usize,
    seat_results: Vec<SeatResult>,
    seating: Vec<SeatSnapshot>,
}

impl GameOutcome {
    fn accumulate(&self, standings: &mut [Standing]) {
        for result in &self.seat_results {
            let standing = &mut standings[result.blueprint];
            standing.games += 1;
            standing.rounds_won += result.rounds_won;
            standing.blues_wins += result.blues_wins;
            standing.total_points += i64::from(result.total);
            if result.seat == self.winner {
                standing.wins += 1;
            }
        }
    }
}

struct SeatResult {
    seat: Seat,
    blueprint: usize,
    total: i32,
    rounds_won: usize,
    blues_wins: usize,
}

#[derive(Clone, Serialize)]
struct SeatSnapshot {
    seat: String,
    bot: String,
}

#[derive(Serialize)]
struct GameLogRow {
    run_id: String,
    game_id: String,
    game_index: usize,
    game_seed: u64,
    seat: String,
    bot: String,
    seating: Vec<SeatSnapshot>,
    total: i32,
    rounds: usize,
    rounds_won: usize,
    blues_wins: usize,
    won: bool,
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("{0}")]
    Config(#[from] ValidationError),
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize log row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
    #[error("game execution failed: {0}")]
    Table(#[from] TableError),
    #[error("configuration requires exactly 4 seats but found {found}")]
    SeatCount { found: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(rotate: bool) -> BenchmarkConfig {
        let yaml = format!(
            r#"
run_id: "unit"
games:
  seed: 9
  count: 4
  rotate_seats: {rotate}
seats:
  - name: "a"
    strategy: "winprob"
  - name: "b"
    strategy: "pursue"
  - name: "c"
    strategy: "approach:cheapest"
  - name: "d"
    strategy: "approach:strongest"
outputs:
  jsonl: "games.jsonl"
  summary_md: "summary.md"
"#
        );
        let mut cfg: BenchmarkConfig = serde_yaml::from_str(&yaml).expect("yaml");
        cfg.validate().expect("valid");
        cfg
    }

    fn runner(rotate: bool) -> GameRunner {
        let cfg = config(rotate);
        let outputs = cfg.resolved_outputs();
        GameRunner::new(cfg, outputs).expect("runner")
    }

    #[test]
    fn fixed_seating_keeps_lineup() {
        let runner = runner(false);
        assert_eq!(runner.seating(0), [0, 1, 2, 3]);
        assert_eq!(runner.seating(3), [0, 1, 2, 3]);
    }

    #[test]
    fn rotation_moves_every_bot_one_seat() {
        let runner = runner(true);
        assert_eq!(runner.seating(1), [1, 2, 3, 0]);
        assert_eq!(runner.seating(4), [0, 1, 2, 3]);
    }

    #[test]
    fn outcome_credits_the_configured_bot() {
        let runner = runner(true);
        let outcome = runner.play_game(1, 42).expect("game completes");
        let mut standings: Vec<Standing> = runner.seats.iter().map(Standing::new).collect();
        outcome.accumulate(&mut standings);
        assert!(standings.iter().all(|standing| standing.games == 1));
        assert_eq!(standings.iter().map(|standing| standing.wins).sum::<usize>(), 1);
        assert_eq!(outcome.seating[0].bot, "b");
    }
}
