//! Pure rule functions over hands and card sequences.

use crate::model::card::{Card, best_card};
use crate::model::player::Seat;
use crate::model::suit::Color;
use thiserror::Error;

pub const HAND_SIZE: usize = 5;
pub const POND_SIZE: usize = 4;
pub const WELL_SIZE: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("hand must hold {expected} cards but holds {found}")]
    HandSize { expected: &'static str, found: usize },
    #[error("pond must hold {POND_SIZE} cards but holds {0}")]
    PondSize(usize),
    #[error("well must hold 0 or {WELL_SIZE} cards but holds {0}")]
    WellSize(usize),
    #[error("no candidates to compare")]
    NoCandidates,
    #[error("{0} does not hold a winning hand")]
    NotBlues(Seat),
    #[error("round ended on a No Blues call but no call was recorded")]
    MissingCall,
}

/// Sum of the weights of each distinct suit in a 4 or 5 card hand.
pub fn points(hand: &[Card]) -> Result<u32, RuleError> {
    if !(4..=HAND_SIZE).contains(&hand.len()) {
        return Err(RuleError::HandSize {
            expected: "4 or 5",
            found: hand.len(),
        });
    }
    let mut seen = [false; 8];
    let mut total = 0u32;
    for card in hand {
        let index = card.suit.index();
        if !seen[index] {
            seen[index] = true;
            total += u32::from(card.suit.weight());
        }
    }
    Ok(total)
}

/// Ranks sorted ascending form a run of five.
pub fn consecutive(cards: &[Card]) -> bool {
    if cards.len() != HAND_SIZE {
        return false;
    }
    let mut ranks: Vec<u8> = cards.iter().map(|card| card.rank.value()).collect();
    ranks.sort_unstable();
    ranks.windows(2).all(|pair| pair[1] == pair[0] + 1)
}

/// Whether a five card hand is a winning hand.
pub fn is_blues(hand: &[Card]) -> Result<bool, RuleError> {
    if hand.len() != HAND_SIZE {
        return Err(RuleError::HandSize {
            expected: "5",
            found: hand.len(),
        });
    }
    if !consecutive(hand) {
        return Ok(false);
    }

    let mut sorted = hand.to_vec();
    sorted.sort_by_key(|card| card.rank);
    let count = |color: Color| sorted.iter().filter(|card| card.color() == color).count();
    let (blue, black, red) = (count(Color::Blue), count(Color::Black), count(Color::Red));

    let odd_at_end = |odd: Color| {
        sorted[0].color() == odd || sorted[HAND_SIZE - 1].color() == odd
    };

    let winning = match (blue, black, red) {
        (5, 0, 0) => true,
        (1, 4, 0) | (1, 0, 4) => true,
        (4, 1, 0) => odd_at_end(Color::Black),
        (4, 0, 1) => odd_at_end(Color::Red),
        (0, 4, 1) => odd_at_end(Color::Red),
        (0, 1, 4) => odd_at_end(Color::Black),
        _ => false,
    };
    Ok(winning)
}

/// Point value of a winning hand, bracketed by how many blue cards it holds.
pub fn blues_points(hand: &[Card]) -> i32 {
    blue_bracket(hand.iter().filter(|card| card.is_blue()).count())
}

pub const fn blue_bracket(blue_cards: usize) -> i32 {
    match blue_cards {
        0 => 0,
        1..=3 => -5,
        4 => -10,
        _ => -25,
    }
}

/// First pond or well card that turns the four card `hand` into Blues.
pub fn fifth_card(pond: &[Card], well: &[Card], hand: &[Card]) -> Result<Option<Card>, RuleError> {
    if hand.len() != HAND_SIZE - 1 {
        return Err(RuleError::HandSize {
            expected: "4",
            found: hand.len(),
        });
    }
    if pond.len() != POND_SIZE {
        return Err(RuleError::PondSize(pond.len()));
    }
    if !well.is_empty() && well.len() != WELL_SIZE {
        return Err(RuleError::WellSize(well.len()));
    }

    let mut candidate = Vec::with_capacity(HAND_SIZE);
    for card in pond.iter().chain(well.iter()).copied() {
        candidate.clear();
        candidate.extend_from_slice(hand);
        candidate.push(card);
        if is_blues(&candidate)? {
            return Ok(Some(card));
        }
    }
    Ok(None)
}

/// True when the accused hand can complete Blues from the visible cards.
pub fn is_no_blues(pond: &[Card], well: &[Card], hand: &[Card]) -> Result<bool, RuleError> {
    fifth_card(pond, well, hand).map(|card| card.is_some())
}

/// Seats ordered by how many other pond cards their own pond card trumps,
/// most first. The owner of the best discard chooses first.
pub fn player_choice_order(pond: &[(Seat, Card)]) -> Vec<Seat> {
    let mut ranked: Vec<(Seat, usize)> = pond
        .iter()
        .map(|(seat, card)| {
            let beaten = pond.iter().filter(|(_, other)| card.trumps(*other)).count();
            (*seat, beaten)
        })
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.into_iter().map(|(seat, _)| seat).collect()
}

/// Seat whose holdings contain the single card trumping every other holding.
pub fn strongest_holder(holdings: &[(Seat, Vec<Card>)]) -> Option<Seat> {
    holdings
        .iter()
        .filter_map(|(seat, cards)| best_card(cards).map(|card| (*seat, card)))
        .max_by_key(|(_, card)| card.trump_strength())
        .map(|(seat, _)| seat)
}

/// Deck-empty winner: lowest hand points, ties broken by whoever holds the
/// best card among the tied seats' hands and pond cards.
pub fn lowest_hand(candidates: &[(Seat, &[Card], Option<Card>)]) -> Result<Seat, RuleError> {
    let mut scored = Vec::with_capacity(candidates.len());
    for (seat, hand, _) in candidates {
        scored.push((*seat, points(hand)?));
    }
    let lowest = scored
        .iter()
        .map(|(_, points)| *points)
        .min()
        .ok_or(RuleError::NoCandidates)?;
    let tied: Vec<(Seat, Vec<Card>)> = candidates
        .iter()
        .zip(&scored)
        .filter(|(_, (_, points))| *points == lowest)
        .map(|((seat, hand, pond), _)| {
            let mut holdings = hand.to_vec();
            holdings.extend(*pond);
            (*seat, holdings)
        })
        .collect();
    strongest_holder(&tied).ok_or(RuleError::NoCandidates)
}
