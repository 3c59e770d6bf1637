use crate::model::rank::Rank;
use crate::model::suit::{Color, Suit};
use core::fmt;
use serde::{Deserialize, Serialize};

pub const DECK_SIZE: usize = 56;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    /// Every concrete card, grouped by suit then ascending rank.
    pub fn all() -> impl Iterator<Item = Card> {
        Suit::ALL
            .into_iter()
            .flat_map(|suit| Rank::ORDERED.into_iter().map(move |rank| Card::new(rank, suit)))
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        let Some(suit) = Suit::from_index(index / 7) else {
            return None;
        };
        match Rank::from_value((index % 7) as u8 + 1) {
            Some(rank) => Some(Card::new(rank, suit)),
            None => None,
        }
    }

    /// Dense index in `0..DECK_SIZE`, matching the order of [`Card::all`].
    pub const fn index(self) -> usize {
        self.suit.index() * 7 + self.rank.index()
    }

    pub const fn color(self) -> Color {
        self.suit.color()
    }

    pub const fn is_blue(self) -> bool {
        self.suit.is_blue()
    }

    /// Whether `self` beats `other` in the trump order.
    ///
    /// Blue beats anything else. Otherwise the lower rank wins, and between
    /// non-blue cards of equal rank the lighter suit wins.
    pub fn trumps(self, other: Card) -> bool {
        if self == other {
            return false;
        }
        match (self.is_blue(), other.is_blue()) {
            (true, false) => true,
            (false, true) => false,
            _ if self.rank != other.rank => self.rank < other.rank,
            _ => self.suit.weight() < other.suit.weight(),
        }
    }

    /// Position in the trump order: 0 for the weakest card, 55 for the strongest.
    pub const fn trump_strength(self) -> u8 {
        let rank_gap = 7 - self.rank.value();
        if self.is_blue() {
            49 + rank_gap
        } else {
            rank_gap * 7 + (7 - self.suit.weight())
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

/// The card that trumps every other card in `cards`.
pub fn best_card<'a>(cards: impl IntoIterator<Item = &'a Card>) -> Option<Card> {
    cards
        .into_iter()
        .copied()
        .max_by_key(|card| card.trump_strength())
}

#[cfg(test)]
mod tests {
    use super::{Card, DECK_SIZE, best_card};
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;
    use std::collections::HashSet;

    #[test]
    fn deck_has_fifty_six_distinct_cards() {
        let cards: HashSet<_> = Card::all().collect();
        assert_eq!(cards.len(), DECK_SIZE);
    }

    #[test]
    fn index_roundtrip() {
        for (i, card) in Card::all().enumerate() {
            assert_eq!(card.index(), i);
            assert_eq!(Card::from_index(i), Some(card));
        }
        assert_eq!(Card::from_index(DECK_SIZE), None);
    }

    #[test]
    fn blue_beats_any_other_colour() {
        let blue_seven = Card::new(Rank::Seven, Suit::Blue);
        let tilde_one = Card::new(Rank::One, Suit::Tilde);
        assert!(blue_seven.trumps(tilde_one));
        assert!(!tilde_one.trumps(blue_seven));
    }

    #[test]
    fn lower_rank_then_lighter_suit_wins() {
        let low = Card::new(Rank::Two, Suit::Wedge);
        let high = Card::new(Rank::Three, Suit::Tilde);
        assert!(low.trumps(high));

        let light = Card::new(Rank::Four, Suit::Oval);
        let heavy = Card::new(Rank::Four, Suit::Heart);
        assert!(light.trumps(heavy));
        assert!(!heavy.trumps(light));
    }

    #[test]
    fn card_never_trumps_itself() {
        for card in Card::all() {
            assert!(!card.trumps(card));
        }
    }

    #[test]
    fn trumps_is_a_strict_total_order() {
        let cards: Vec<_> = Card::all().collect();
        for &a in &cards {
            for &b in &cards {
                if a == b {
                    continue;
                }
                assert!(a.trumps(b) ^ b.trumps(a), "{a} vs {b}");
                assert_eq!(a.trumps(b), a.trump_strength() > b.trump_strength());
            }
        }
        for &a in &cards {
            for &b in &cards {
                if !a.trumps(b) {
                    continue;
                }
                for &c in &cards {
                    if b.trumps(c) {
                        assert!(a.trumps(c), "{a} > {b} > {c}");
                    }
                }
            }
        }
    }

    #[test]
    fn trump_strength_spans_the_deck() {
        let strengths: HashSet<_> = Card::all().map(Card::trump_strength).collect();
        assert_eq!(strengths.len(), DECK_SIZE);
        assert_eq!(Card::new(Rank::One, Suit::Blue).trump_strength(), 55);
        assert_eq!(Card::new(Rank::Seven, Suit::Wedge).trump_strength(), 0);
    }

    #[test]
    fn best_card_picks_the_trumping_card() {
        let cards = [
            Card::new(Rank::Five, Suit::Club),
            Card::new(Rank::Two, Suit::Heart),
            Card::new(Rank::Two, Suit::Spade),
        ];
        assert_eq!(best_card(&cards), Some(Card::new(Rank::Two, Suit::Spade)));
        assert_eq!(best_card(&[]), None);
    }
}
