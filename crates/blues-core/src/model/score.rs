use crate::game::end_state::RoundEndState;
use crate::model::player::{SEAT_COUNT, Seat};
use serde::{Deserialize, Serialize};

/// Points attributed in one round plus the standings after applying them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub deltas: [i32; SEAT_COUNT],
    pub totals: [i32; SEAT_COUNT],
    pub end_state: RoundEndState,
}

impl ScoreRecord {
    pub fn delta(&self, seat: Seat) -> i32 {
        self.deltas[seat.index()]
    }

    pub fn round_delta_sum(&self) -> i32 {
        self.deltas.iter().sum()
    }
}

/// Append-only history of round results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreLedger {
    records: Vec<ScoreRecord>,
}

impl ScoreLedger {
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Records a round; totals are derived from the previous record.
    pub fn append(
        &mut self,
        deltas: [i32; SEAT_COUNT],
        end_state: RoundEndState,
    ) -> &ScoreRecord {
        let mut totals = self.totals();
        for (total, delta) in totals.iter_mut().zip(deltas) {
            *total += delta;
        }
        self.records.push(ScoreRecord {
            deltas,
            totals,
            end_state,
        });
        &self.records[self.records.len() - 1]
    }

    pub fn records(&self) -> &[ScoreRecord] {
        &self.records
    }

    pub fn last(&self) -> Option<&ScoreRecord> {
        self.records.last()
    }

    pub fn rounds_played(&self) -> usize {
        self.records.len()
    }

    pub fn totals(&self) -> [i32; SEAT_COUNT] {
        self.records
            .last()
            .map(|record| record.totals)
            .unwrap_or([0; SEAT_COUNT])
    }

    pub fn total(&self, seat: Seat) -> i32 {
        self.totals()[seat.index()]
    }

    pub fn combined_total(&self) -> i32 {
        self.totals().iter().sum()
    }

    /// True once the seats together have piled up `points_per_player` each.
    pub fn is_game_over(&self, points_per_player: i32) -> bool {
        self.combined_total() >= points_per_player * SEAT_COUNT as i32
    }

    /// Winner of each round, oldest first.
    pub fn round_winners(&self) -> impl DoubleEndedIterator<Item = Seat> + '_ {
        self.records.iter().map(|record| record.end_state.winner())
    }

    /// Lowest cumulative total wins. Ties go to the most recent round winner
    /// among the tied seats, then to whoever scored strictly less than every
    /// other tied seat in the latest round that separates them.
    pub fn game_winner(&self) -> Option<Seat> {
        if self.records.is_empty() {
            return None;
        }
        let totals = self.totals();
        let best = totals.iter().copied().min()?;
        let tied: Vec<Seat> = Seat::LOOP
            .into_iter()
            .filter(|seat| totals[seat.index()] == best)
            .collect();
        if let [only] = tied.as_slice() {
            return Some(*only);
        }

        if let Some(winner) = self.round_winners().rev().find(|winner| tied.contains(winner)) {
            return Some(winner);
        }

        for record in self.records.iter().rev() {
            let lowest = tied.iter().copied().find(|seat| {
                tied.iter()
                    .filter(|other| *other != seat)
                    .all(|other| record.delta(*seat) < record.delta(*other))
            });
            if lowest.is_some() {
                return lowest;
            }
        }

        tied.first().copied()
    }
}
