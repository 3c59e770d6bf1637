use crate::model::card::{Card, DECK_SIZE};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Where a card currently sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Location {
    #[default]
    InDeck,
    Hand,
    PondHidden,
    PondRevealed,
    Well,
    Discarded,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeckError {
    #[error("stacked deck must hold {expected} cards but has {found}")]
    WrongSize { expected: usize, found: usize },
    #[error("stacked deck repeats {0}")]
    Duplicate(Card),
}

/// Undealt stack plus the record of cards already handed out.
///
/// The top of the stack is the last element of `undealt`. Locations are
/// tracked here rather than on [`Card`] so card equality stays rank+suit.
#[derive(Debug, Clone)]
pub struct Deck {
    undealt: Vec<Card>,
    dealt: Vec<Card>,
    locations: [Location; DECK_SIZE],
}

impl Deck {
    pub fn standard() -> Self {
        let mut undealt: Vec<Card> = Card::all().collect();
        undealt.reverse();
        Self {
            undealt,
            dealt: Vec::with_capacity(DECK_SIZE),
            locations: [Location::InDeck; DECK_SIZE],
        }
    }

    /// Builds a deck whose draws follow `order` front to back.
    pub fn stacked(order: Vec<Card>) -> Result<Self, DeckError> {
        if order.len() != DECK_SIZE {
            return Err(DeckError::WrongSize {
                expected: DECK_SIZE,
                found: order.len(),
            });
        }
        let mut seen = HashSet::with_capacity(DECK_SIZE);
        for card in &order {
            if !seen.insert(*card) {
                return Err(DeckError::Duplicate(*card));
            }
        }
        let mut undealt = order;
        undealt.reverse();
        Ok(Self {
            undealt,
            dealt: Vec::with_capacity(DECK_SIZE),
            locations: [Location::InDeck; DECK_SIZE],
        })
    }

    pub fn shuffled<R: rand::Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self::standard();
        deck.shuffle(rng);
        deck
    }

    pub fn shuffled_with_seed(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::shuffled(&mut rng)
    }

    /// Shuffles only the undealt part of the stack.
    pub fn shuffle<R: rand::Rng + ?Sized>(&mut self, rng: &mut R) {
        self.undealt.shuffle(rng);
    }

    /// Returns every card to the stack in its original composition.
    pub fn reset(&mut self) {
        *self = Self::standard();
    }

    pub fn draw(&mut self) -> Option<Card> {
        let card = self.undealt.pop()?;
        self.dealt.push(card);
        self.locations[card.index()] = Location::Hand;
        Some(card)
    }

    pub fn remaining(&self) -> usize {
        self.undealt.len()
    }

    pub fn dealt(&self) -> &[Card] {
        &self.dealt
    }

    /// Undealt cards, next draw first.
    pub fn undealt(&self) -> impl Iterator<Item = &Card> {
        self.undealt.iter().rev()
    }

    pub fn location(&self, card: Card) -> Location {
        self.locations[card.index()]
    }

    pub fn set_location(&mut self, card: Card, location: Location) {
        self.locations[card.index()] = location;
    }

    pub fn cards_at(&self, location: Location) -> impl Iterator<Item = Card> + '_ {
        Card::all().filter(move |card| self.location(*card) == location)
    }
}

#[cfg(test)]
mod tests {
    use super::{Deck, DeckError, Location};
    use crate::model::card::{Card, DECK_SIZE};

    #[test]
    fn standard_deck_has_fifty_six_cards_in_deck() {
        let deck = Deck::standard();
        assert_eq!(deck.remaining(), DECK_SIZE);
        assert_eq!(deck.cards_at(Location::InDeck).count(), DECK_SIZE);
    }

    #[test]
    fn shuffle_with_seed_is_deterministic() {
        let deck_a = Deck::shuffled_with_seed(42);
        let deck_b = Deck::shuffled_with_seed(42);
        assert!(deck_a.undealt().eq(deck_b.undealt()));
    }

    #[test]
    fn draw_takes_from_the_top_and_records_it() {
        let order: Vec<Card> = Card::all().collect();
        let mut deck = Deck::stacked(order.clone()).unwrap();
        assert_eq!(deck.draw(), Some(order[0]));
        assert_eq!(deck.draw(), Some(order[1]));
        assert_eq!(deck.dealt(), &order[..2]);
        assert_eq!(deck.location(order[0]), Location::Hand);
        assert_eq!(deck.remaining(), DECK_SIZE - 2);
    }

    #[test]
    fn reset_restores_composition_and_locations() {
        let mut deck = Deck::shuffled_with_seed(7);
        let card = deck.draw().unwrap();
        deck.set_location(card, Location::Discarded);
        deck.reset();
        assert_eq!(deck.remaining(), DECK_SIZE);
        assert!(deck.dealt().is_empty());
        assert_eq!(deck.location(card), Location::InDeck);
    }

    #[test]
    fn stacked_rejects_bad_orders() {
        let mut order: Vec<Card> = Card::all().collect();
        order.pop();
        assert!(matches!(
            Deck::stacked(order.clone()),
            Err(DeckError::WrongSize { found: 55, .. })
        ));
        order.push(order[0]);
        assert!(matches!(Deck::stacked(order), Err(DeckError::Duplicate(_))));
    }
}
