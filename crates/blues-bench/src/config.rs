use blues_bot::{Recall, Strategy};
use blues_core::TableConfig;
use blues_core::model::player::SEAT_COUNT;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;

const RUN_ID_ALLOWED: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789._-";

/// Root benchmark configuration loaded from YAML.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BenchmarkConfig {
    pub run_id: String,
    pub games: GamesConfig,
    pub seats: Vec<SeatConfig>,
    pub outputs: OutputsConfig,
    #[serde(default)]
    pub table: TableConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BenchmarkConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let mut cfg: BenchmarkConfig =
            serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        validate_run_id(&self.run_id)?;
        self.games.validate()?;
        self.outputs.validate(&self.run_id)?;
        validate_table(&self.table)?;
        self.logging.normalize();
        validate_seats(&mut self.seats)?;
        Ok(())
    }

    /// Resolve output templates (e.g., `{run_id}` placeholders) into concrete paths.
    pub fn resolved_outputs(&self) -> ResolvedOutputs {
        ResolvedOutputs {
            jsonl: resolve_template(&self.run_id, &self.outputs.jsonl),
            summary_md: resolve_template(&self.run_id, &self.outputs.summary_md),
        }
    }

    /// Seat lineup with strategies parsed and parameters applied.
    pub fn seat_blueprints(&self) -> Result<Vec<SeatBlueprint>, ValidationError> {
        self.seats.iter().map(SeatBlueprint::from_config).collect()
    }
}

/// How many games to play and how to seed them.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GamesConfig {
    pub seed: Option<u64>,
    pub count: usize,
    /// Rotate the lineup one seat per game so every bot plays every seat.
    #[serde(default)]
    pub rotate_seats: bool,
}

impl GamesConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.count == 0 {
            return Err(ValidationError::InvalidField {
                field: "games.count".to_string(),
                message: "number of games must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

/// One seated bot.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SeatConfig {
    pub name: String,
    pub strategy: String,
    #[serde(default)]
    pub params: serde_yaml::Value,
}

/// A seat ready to be turned into a player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatBlueprint {
    pub name: String,
    pub strategy: Strategy,
    pub avoid_double_blue: bool,
}

impl SeatBlueprint {
    fn from_config(seat: &SeatConfig) -> Result<Self, ValidationError> {
        let invalid = |message: String| ValidationError::InvalidField {
            field: format!("seats[{}]", seat.name),
            message,
        };

        let mut strategy: Strategy = seat
            .strategy
            .parse()
            .map_err(|err| invalid(format!("{err}")))?;

        if let Some(raw) = seat.params.get("reliability") {
            let reliability = raw
                .as_u64()
                .and_then(|value| u8::try_from(value).ok())
                .filter(|value| *value <= Recall::MAX_RELIABILITY)
                .ok_or_else(|| invalid("reliability must be between 0 and 100".to_string()))?;
            if !matches!(strategy, Strategy::WinProbMem { .. }) {
                return Err(invalid(format!(
                    "reliability only applies to winprob-mem, not {strategy}"
                )));
            }
            strategy = strategy.with_reliability(reliability);
        }

        let avoid_double_blue = match seat.params.get("avoid_double_blue") {
            Some(raw) => raw
                .as_bool()
                .ok_or_else(|| invalid("avoid_double_blue must be a boolean".to_string()))?,
            None => false,
        };

        Ok(Self {
            name: seat.name.clone(),
            strategy,
            avoid_double_blue,
        })
    }
}

/// Output artifact configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OutputsConfig {
    pub jsonl: String,
    pub summary_md: String,
}

impl OutputsConfig {
    fn validate(&self, run_id: &str) -> Result<(), ValidationError> {
        for (label, value) in [
            ("outputs.jsonl", &self.jsonl),
            ("outputs.summary_md", &self.summary_md),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::InvalidField {
                    field: label.to_string(),
                    message: "path must not be empty".to_string(),
                });
            }

            let resolved = resolve_template(run_id, value);
            if resolved.components().count() == 0 {
                return Err(ValidationError::InvalidField {
                    field: label.to_string(),
                    message: "resolved path is invalid".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Logging configuration defaults to disabled structured logs.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
    }

    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_tracing_level() -> String {
    "info".to_string()
}

fn validate_run_id(run_id: &str) -> Result<(), ValidationError> {
    if run_id.trim().is_empty() {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id must not be empty".to_string(),
        });
    }

    if !run_id.chars().all(|c| RUN_ID_ALLOWED.contains(c)) {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id may only contain alphanumeric characters, '.', '_' or '-'".to_string(),
        });
    }

    Ok(())
}

fn validate_table(table: &TableConfig) -> Result<(), ValidationError> {
    if table.game_over_points_per_player <= 0 {
        return Err(ValidationError::InvalidField {
            field: "table.game_over_points_per_player".to_string(),
            message: "game-over threshold must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_seats(seats: &mut [SeatConfig]) -> Result<(), ValidationError> {
    if seats.len() != SEAT_COUNT {
        return Err(ValidationError::InvalidField {
            field: "seats".to_string(),
            message: format!("exactly {SEAT_COUNT} seats are required, found {}", seats.len()),
        });
    }

    let mut seen = HashSet::new();
    for seat in seats.iter_mut() {
        if seat.name.trim().is_empty() {
            return Err(ValidationError::InvalidField {
                field: "seats.name".to_string(),
                message: "seat name must not be empty".to_string(),
            });
        }

        if !seat.name.chars().all(|c| RUN_ID_ALLOWED.contains(c)) {
            return Err(ValidationError::InvalidField {
                field: format!("seats[{}].name", seat.name),
                message: "seat name contains invalid characters".to_string(),
            });
        }

        if !seen.insert(seat.name.clone()) {
            return Err(ValidationError::InvalidField {
                field: "seats".to_string(),
                message: format!("seat name '{}' defined more than once", seat.name),
            });
        }

        if seat.params.is_null() {
            seat.params = serde_yaml::Value::Mapping(Default::default());
        }

        SeatBlueprint::from_config(seat)?;
    }

    Ok(())
}

fn resolve_template(run_id: &str, template: &str) -> PathBuf {
    let replaced = template.replace("{run_id}", run_id);
    PathBuf::from(replaced)
}

/// Fully resolved output paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutputs {
    pub jsonl: PathBuf,
    pub summary_md: PathBuf,
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path.as_path(),
        }
    }
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}
