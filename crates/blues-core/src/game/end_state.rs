use crate::model::player::Seat;
use core::fmt;
use serde::{Deserialize, Serialize};

/// A "No Blues" accusation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NoBluesCall {
    pub caller: Seat,
    pub accused: Seat,
}

/// How a round finished. Created once per round, never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundEndState {
    Blues { winner: Seat },
    TrueNoBlues { call: NoBluesCall, winner: Seat },
    FalseNoBlues { call: NoBluesCall, winner: Seat },
    DeckEmpty { winner: Seat },
}

/// Variant tag of [`RoundEndState`], used to select the tally rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EndKind {
    Blues,
    TrueNoBlues,
    FalseNoBlues,
    DeckEmpty,
}

impl RoundEndState {
    pub const fn winner(self) -> Seat {
        match self {
            RoundEndState::Blues { winner }
            | RoundEndState::TrueNoBlues { winner, .. }
            | RoundEndState::FalseNoBlues { winner, .. }
            | RoundEndState::DeckEmpty { winner } => winner,
        }
    }

    pub const fn call(self) -> Option<NoBluesCall> {
        match self {
            RoundEndState::TrueNoBlues { call, .. } | RoundEndState::FalseNoBlues { call, .. } => {
                Some(call)
            }
            RoundEndState::Blues { .. } | RoundEndState::DeckEmpty { .. } => None,
        }
    }

    pub const fn kind(self) -> EndKind {
        match self {
            RoundEndState::Blues { .. } => EndKind::Blues,
            RoundEndState::TrueNoBlues { .. } => EndKind::TrueNoBlues,
            RoundEndState::FalseNoBlues { .. } => EndKind::FalseNoBlues,
            RoundEndState::DeckEmpty { .. } => EndKind::DeckEmpty,
        }
    }
}

impl fmt::Display for RoundEndState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundEndState::Blues { winner } => write!(f, "{winner} has Blues"),
            RoundEndState::TrueNoBlues { call, .. } => write!(
                f,
                "{} correctly called No Blues on {}",
                call.caller, call.accused
            ),
            RoundEndState::FalseNoBlues { call, .. } => write!(
                f,
                "{} wrongly called No Blues on {}",
                call.caller, call.accused
            ),
            RoundEndState::DeckEmpty { winner } => {
                write!(f, "deck ran out, {winner} holds the lowest hand")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{EndKind, NoBluesCall, RoundEndState};
    use crate::model::player::Seat;

    #[test]
    fn accessors_follow_variant() {
        let call = NoBluesCall {
            caller: Seat::Two,
            accused: Seat::Three,
        };
        let state = RoundEndState::TrueNoBlues {
            call,
            winner: Seat::Two,
        };
        assert_eq!(state.winner(), Seat::Two);
        assert_eq!(state.call(), Some(call));
        assert_eq!(state.kind(), EndKind::TrueNoBlues);

        let blues = RoundEndState::Blues { winner: Seat::One };
        assert_eq!(blues.call(), None);
        assert_eq!(blues.to_string(), "P1 has Blues");
    }
}
