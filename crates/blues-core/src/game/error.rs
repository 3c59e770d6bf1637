use crate::game::table::Phase;
use crate::model::card::Card;
use crate::model::deck::DeckError;
use crate::model::player::Seat;
use crate::rules::RuleError;
use thiserror::Error;

/// A broken table invariant. These are programming errors: the offending
/// call is rejected and the round should not be continued.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("{operation} is not allowed in phase {actual:?}")]
    Phase {
        operation: &'static str,
        actual: Phase,
    },
    #[error("well must be empty before flipping but holds {0} cards")]
    WellNotEmpty(usize),
    #[error("well must hold 4 cards but holds {0}")]
    WellNotFull(usize),
    #[error("pond must be empty before collecting but holds {0} cards")]
    PondNotEmpty(usize),
    #[error("pond must hold 4 cards but holds {0}")]
    PondNotFull(usize),
    #[error("pond has already been revealed")]
    PondRevealed,
    #[error("pond has not been revealed")]
    PondHidden,
    #[error("deck holds {remaining} cards but {needed} are required")]
    DeckExhausted { needed: usize, remaining: usize },
    #[error("{seat} does not hold {card}")]
    CardNotInHand { seat: Seat, card: Card },
    #[error("{card} is not available to {seat}")]
    CardNotAvailable { seat: Seat, card: Card },
    #[error("{0} cannot call No Blues on itself")]
    SelfAccusation(Seat),
    #[error("the game is already over")]
    GameOver,
    #[error(transparent)]
    Rule(#[from] RuleError),
    #[error(transparent)]
    Deck(#[from] DeckError),
}
