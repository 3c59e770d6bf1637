use serde::{Deserialize, Serialize};

const DEFAULT_GAME_OVER_POINTS: i32 = 100;
const DEFAULT_NO_BLUES_BONUS: i32 = -25;
const DEFAULT_NO_BLUES_PENALTY: i32 = 25;

/// Scoring and seeding knobs for a [`Table`](crate::game::table::Table).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    /// Seed for deck shuffles; a random seed is drawn when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    /// The game ends once the combined totals reach this many points per seat.
    #[serde(default = "default_game_over_points")]
    pub game_over_points_per_player: i32,
    /// Delta for a caller whose No Blues call was right.
    #[serde(default = "default_no_blues_bonus")]
    pub no_blues_bonus: i32,
    /// Delta for the accused of a correct call, or the caller of a wrong one.
    #[serde(default = "default_no_blues_penalty")]
    pub no_blues_penalty: i32,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            seed: None,
            game_over_points_per_player: DEFAULT_GAME_OVER_POINTS,
            no_blues_bonus: DEFAULT_NO_BLUES_BONUS,
            no_blues_penalty: DEFAULT_NO_BLUES_PENALTY,
        }
    }
}

impl TableConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }
}

fn default_game_over_points() -> i32 {
    DEFAULT_GAME_OVER_POINTS
}

fn default_no_blues_bonus() -> i32 {
    DEFAULT_NO_BLUES_BONUS
}

fn default_no_blues_penalty() -> i32 {
    DEFAULT_NO_BLUES_PENALTY
}
