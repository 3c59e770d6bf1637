use crate::model::card::Card;
use crate::model::rank::Rank;
use crate::model::suit::Suit;

fn deal_order(card: &Card) -> (Rank, Suit) {
    (card.rank, card.suit)
}

/// A seat's cards, kept sorted by rank then suit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn with_cards(mut cards: Vec<Card>) -> Self {
        cards.sort_by_key(deal_order);
        Self { cards }
    }

    pub fn add(&mut self, card: Card) {
        let at = self
            .cards
            .partition_point(|held| deal_order(held) < deal_order(&card));
        self.cards.insert(at, card);
    }

    /// Takes `card` out of the hand; false when it was not held.
    pub fn remove(&mut self, card: Card) -> bool {
        match self.cards.binary_search_by_key(&deal_order(&card), deal_order) {
            Ok(at) => {
                self.cards.remove(at);
                true
            }
            Err(_) => false,
        }
    }

    pub fn contains(&self, card: Card) -> bool {
        self.cards
            .binary_search_by_key(&deal_order(&card), deal_order)
            .is_ok()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}
