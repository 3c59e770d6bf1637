use super::{WinningHand, catalog};
use crate::model::card::Card;
use crate::model::rank::Rank;
use crate::model::suit::Color;
use core::fmt;
use serde::{Deserialize, Serialize};

/// An unsuited card: a rank and a colour, standing for every concrete card
/// that matches both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UCard {
    pub rank: Rank,
    pub color: Color,
}

impl UCard {
    pub const fn new(rank: Rank, color: Color) -> Self {
        Self { rank, color }
    }

    pub fn satisfied_by(self, card: Card) -> bool {
        card.rank == self.rank && card.color() == self.color
    }

    /// Concrete cards filling this slot: one if blue, three if red, four if black.
    pub fn cards(self) -> impl Iterator<Item = Card> {
        self.color
            .suits()
            .map(move |suit| Card::new(self.rank, suit))
    }

    pub const fn card_count(self) -> u32 {
        self.color.suit_count() as u32
    }

    /// Classes that have this card as one of their slots.
    pub fn winning_hands(self) -> impl Iterator<Item = &'static WinningHand> {
        catalog().iter().filter(move |target| target.contains(self))
    }
}

impl From<Card> for UCard {
    fn from(card: Card) -> Self {
        Self::new(card.rank, card.color())
    }
}

impl fmt::Display for UCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.color)
    }
}

#[cfg(test)]
mod tests {
    use super::UCard;
    use crate::model::card::Card;
    use crate::model::rank::Rank;
    use crate::model::suit::{Color, Suit};

    #[test]
    fn cards_match_colour_size() {
        assert_eq!(UCard::new(Rank::Three, Color::Blue).cards().count(), 1);
        assert_eq!(UCard::new(Rank::Three, Color::Red).cards().count(), 3);
        assert_eq!(UCard::new(Rank::Three, Color::Black).cards().count(), 4);
        for color in Color::ALL {
            let slot = UCard::new(Rank::Five, color);
            assert!(slot.cards().all(|card| slot.satisfied_by(card)));
            assert_eq!(slot.cards().count() as u32, slot.card_count());
        }
    }

    #[test]
    fn from_card_drops_the_suit() {
        let slot = UCard::from(Card::new(Rank::Four, Suit::Wedge));
        assert_eq!(slot, UCard::new(Rank::Four, Color::Red));
        assert!(slot.satisfied_by(Card::new(Rank::Four, Suit::Heart)));
        assert!(!slot.satisfied_by(Card::new(Rank::Four, Suit::Club)));
        assert_eq!(slot.to_string(), "4R");
    }

    #[test]
    fn edge_ranks_belong_to_fewer_classes() {
        // Rank one only appears in the 1-5 run, rank three in all three.
        let low = UCard::new(Rank::One, Color::Blue).winning_hands().count();
        let mid = UCard::new(Rank::Three, Color::Blue).winning_hands().count();
        assert!(low < mid);
        assert!(
            UCard::new(Rank::Three, Color::Black)
                .winning_hands()
                .all(|target| target.contains(UCard::new(Rank::Three, Color::Black)))
        );
    }
}
