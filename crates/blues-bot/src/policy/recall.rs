use super::CardMemory;
use blues_core::{Card, Seat, Zone};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

/// Imperfect memory of which cards have left play this round.
///
/// Each notification is applied with probability `reliability / 100`;
/// a reliability of 100 remembers everything, 0 remembers nothing.
#[derive(Debug, Clone)]
pub struct Recall {
    reliability: u8,
    gone: HashSet<Card>,
    rng: StdRng,
}

impl Recall {
    pub const MAX_RELIABILITY: u8 = 100;

    pub fn new(reliability: u8, seed: u64) -> Self {
        Self::with_rng(reliability, StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(reliability: u8, rng: StdRng) -> Self {
        Self {
            reliability: reliability.min(Self::MAX_RELIABILITY),
            gone: HashSet::new(),
            rng,
        }
    }

    pub fn reliability(&self) -> u8 {
        self.reliability
    }

    pub fn gone(&self) -> &HashSet<Card> {
        &self.gone
    }

    pub fn is_gone(&self, card: Card) -> bool {
        self.gone.contains(&card)
    }

    /// Forget everything; a fresh deal puts every card back in play.
    pub fn clear(&mut self) {
        self.gone.clear();
    }

    fn remembers(&mut self) -> bool {
        match self.reliability {
            0 => false,
            Self::MAX_RELIABILITY => true,
            reliability => self.rng.gen_range(0..Self::MAX_RELIABILITY) < reliability,
        }
    }
}

impl CardMemory for Recall {
    fn on_opponent_discard(&mut self, _seat: Seat, card: Card, _well: &[Card]) {
        if self.remembers() {
            self.gone.remove(&card);
        }
    }

    fn on_opponent_choice(
        &mut self,
        _seat: Seat,
        card: Card,
        _zone: Zone,
        _well: &[Card],
        _pond: &[Card],
    ) {
        if self.remembers() {
            self.gone.insert(card);
        }
    }

    fn on_cards_cleared(&mut self, cards: &[Card]) {
        for &card in cards {
            if self.remembers() {
                self.gone.insert(card);
            }
        }
    }
}
