use crate::policy::{Approach, ApproachPolicy, Counting, DecisionPolicy, PursuitPolicy, Recall};
use blues_core::{CallView, Card, ChooseView, DiscardView, GameEvent, Player, Seat};
use core::fmt;
use core::str::FromStr;

/// Ready-made policy configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Top pick of an ordering approach, no planning.
    Approach(Approach),
    /// Memoryless pursuit ordered by an approach.
    Pursue(Approach),
    /// Pursuit ranked by raw remaining arrangements.
    WinProb,
    /// Pursuit ranked by arrangements left after remembered gone cards.
    WinProbMem { reliability: u8 },
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::WinProb
    }
}

impl Strategy {
    /// Build the policy; `seed` drives every random choice it makes.
    pub fn build(self, seed: u64, avoid_double_blue: bool) -> Box<dyn DecisionPolicy> {
        match self {
            Strategy::Approach(approach) => Box::new(ApproachPolicy::new(approach, seed)),
            Strategy::Pursue(approach) => Box::new(
                PursuitPolicy::new(approach, Counting::Memoryless, seed)
                    .avoiding_double_blue(avoid_double_blue),
            ),
            Strategy::WinProb => Box::new(
                PursuitPolicy::new(Approach::Cheapest, Counting::Raw, seed)
                    .avoiding_double_blue(avoid_double_blue),
            ),
            Strategy::WinProbMem { reliability } => Box::new(
                PursuitPolicy::new(Approach::Cheapest, Counting::GivenGone, seed)
                    .avoiding_double_blue(avoid_double_blue)
                    .with_recall(Recall::new(reliability, seed.wrapping_add(1))),
            ),
        }
    }

    pub fn with_reliability(self, reliability: u8) -> Self {
        match self {
            Strategy::WinProbMem { .. } => Strategy::WinProbMem {
                reliability: reliability.min(Recall::MAX_RELIABILITY),
            },
            other => other,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Approach(approach) => write!(f, "approach:{}", approach.name()),
            Strategy::Pursue(approach) => write!(f, "pursue:{}", approach.name()),
            Strategy::WinProb => f.write_str("winprob"),
            Strategy::WinProbMem { reliability } => write!(f, "winprob-mem:{reliability}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStrategyError(String);

impl fmt::Display for ParseStrategyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown strategy '{}'", self.0)
    }
}

impl std::error::Error for ParseStrategyError {}

impl FromStr for Strategy {
    type Err = ParseStrategyError;

    /// Accepts `approach:<name>`, `pursue[:<name>]`, `winprob` and
    /// `winprob-mem[:<reliability>]`.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase();
        let (kind, arg) = match normalized.split_once(':') {
            Some((kind, arg)) => (kind, Some(arg.trim())),
            None => (normalized.as_str(), None),
        };
        let unknown = || ParseStrategyError(raw.trim().to_string());
        match (kind, arg) {
            ("approach", Some(name)) => Approach::from_name(name)
                .map(Strategy::Approach)
                .ok_or_else(unknown),
            ("pursue", None) => Ok(Strategy::Pursue(Approach::Cheapest)),
            ("pursue", Some(name)) => Approach::from_name(name)
                .map(Strategy::Pursue)
                .ok_or_else(unknown),
            ("winprob", None) => Ok(Strategy::WinProb),
            ("winprob-mem", None) => Ok(Strategy::WinProbMem {
                reliability: Recall::MAX_RELIABILITY,
            }),
            ("winprob-mem", Some(value)) => value
                .parse::<u8>()
                .ok()
                .filter(|reliability| *reliability <= Recall::MAX_RELIABILITY)
                .map(|reliability| Strategy::WinProbMem { reliability })
                .ok_or_else(unknown),
            _ => Err(unknown()),
        }
    }
}

/// Bot settings read from the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BotConfig {
    pub strategy: Strategy,
    pub avoid_double_blue: bool,
}

impl BotConfig {
    pub fn from_env() -> Self {
        Self::from_reader(|key| std::env::var(key).ok())
    }

    pub fn build(&self, seed: u64) -> Box<dyn DecisionPolicy> {
        self.strategy.build(seed, self.avoid_double_blue)
    }

    fn from_reader<F>(mut read: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        let strategy = read("BLUES_STRATEGY")
            .and_then(|raw| raw.parse::<Strategy>().ok())
            .unwrap_or_default();

        let strategy = match read("BLUES_RELIABILITY")
            .and_then(|raw| raw.trim().parse::<u8>().ok())
            .filter(|value| *value <= Recall::MAX_RELIABILITY)
        {
            Some(reliability) => strategy.with_reliability(reliability),
            None => strategy,
        };

        let avoid_double_blue = read("BLUES_AVOID_DOUBLE_BLUE")
            .map(|raw| matches!(raw.trim(), "1" | "true" | "TRUE" | "on" | "ON"))
            .unwrap_or(false);

        Self {
            strategy,
            avoid_double_blue,
        }
    }
}

/// Seats a decision policy at the table.
pub struct BotPlayer {
    name: String,
    policy: Box<dyn DecisionPolicy>,
}

impl BotPlayer {
    pub fn new(name: impl Into<String>, policy: Box<dyn DecisionPolicy>) -> Self {
        Self {
            name: name.into(),
            policy,
        }
    }

    pub fn from_strategy(
        name: impl Into<String>,
        strategy: Strategy,
        seed: u64,
        avoid_double_blue: bool,
    ) -> Self {
        Self::new(name, strategy.build(seed, avoid_double_blue))
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for BotPlayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotPlayer").field("name", &self.name).finish()
    }
}

impl Player for BotPlayer {
    fn discard(&mut self, view: &DiscardView<'_>) -> Card {
        self.policy.recommend_discard(view.hand, view.well)
    }

    fn choose_card(&mut self, view: &ChooseView<'_>) -> Card {
        self.policy.recommend_choose(view.hand, view.pond, view.well)
    }

    fn call_no_blues(&mut self, view: &CallView<'_>) -> Option<Seat> {
        self.policy
            .recommend_call(view.opponents, view.well)
            .filter(|accused| *accused != view.seat)
    }

    fn reset_for_new_round(&mut self) {
        self.policy.reset_for_new_round();
    }

    fn reset_for_new_game(&mut self) {
        self.policy.reset_for_new_game();
    }

    fn observe(&mut self, seat: Seat, event: &GameEvent) {
        self.policy.observe(seat, event);
    }
}
