//! Round-end scoring, one pure function per [`EndKind`].

use crate::catalog;
use crate::game::config::TableConfig;
use crate::game::end_state::{EndKind, RoundEndState};
use crate::model::hand::Hand;
use crate::model::player::{SEAT_COUNT, Seat};
use crate::rules::{self, RuleError};

/// Everything a tally rule may look at.
#[derive(Debug, Clone, Copy)]
pub struct TallyInput<'a> {
    pub end_state: RoundEndState,
    pub hands: &'a [Hand; SEAT_COUNT],
    pub config: &'a TableConfig,
}

pub type TallyFn = fn(&TallyInput<'_>) -> Result<[i32; SEAT_COUNT], RuleError>;

impl EndKind {
    pub fn tally(self) -> TallyFn {
        match self {
            EndKind::Blues => tally_blues,
            EndKind::TrueNoBlues => tally_true_no_blues,
            EndKind::FalseNoBlues => tally_false_no_blues,
            EndKind::DeckEmpty => tally_deck_empty,
        }
    }
}

/// Per-seat deltas for a finished round.
pub fn tally(input: &TallyInput<'_>) -> Result<[i32; SEAT_COUNT], RuleError> {
    (input.end_state.kind().tally())(input)
}

fn hand_points(input: &TallyInput<'_>, seat: Seat) -> Result<i32, RuleError> {
    let points = rules::points(input.hands[seat.index()].cards())?;
    Ok(points as i32)
}

fn tally_blues(input: &TallyInput<'_>) -> Result<[i32; SEAT_COUNT], RuleError> {
    let winner = input.end_state.winner();
    let mut deltas = [0; SEAT_COUNT];
    for seat in Seat::LOOP {
        deltas[seat.index()] = if seat == winner {
            catalog::classify(input.hands[seat.index()].cards())
                .ok_or(RuleError::NotBlues(winner))?
                .points()
        } else {
            hand_points(input, seat)?
        };
    }
    Ok(deltas)
}

fn tally_true_no_blues(input: &TallyInput<'_>) -> Result<[i32; SEAT_COUNT], RuleError> {
    let call = input.end_state.call().ok_or(RuleError::MissingCall)?;
    let mut deltas = [0; SEAT_COUNT];
    for seat in Seat::LOOP {
        deltas[seat.index()] = if seat == call.caller {
            input.config.no_blues_bonus
        } else if seat == call.accused {
            input.config.no_blues_penalty
        } else {
            hand_points(input, seat)?
        };
    }
    Ok(deltas)
}

fn tally_false_no_blues(input: &TallyInput<'_>) -> Result<[i32; SEAT_COUNT], RuleError> {
    let call = input.end_state.call().ok_or(RuleError::MissingCall)?;
    let mut deltas = [0; SEAT_COUNT];
    deltas[call.caller.index()] = input.config.no_blues_penalty;
    Ok(deltas)
}

fn tally_deck_empty(input: &TallyInput<'_>) -> Result<[i32; SEAT_COUNT], RuleError> {
    let mut deltas = [0; SEAT_COUNT];
    for seat in Seat::LOOP {
        deltas[seat.index()] = hand_points(input, seat)?;
    }
    Ok(deltas)
}
