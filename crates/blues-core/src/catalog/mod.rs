//! The 57 winning-hand equivalence classes and the counting built on them.
//!
//! A class fixes the rank and colour of each of its five slots but not the
//! suit, so a single class stands for every concrete hand that fills its
//! slots. The catalog is built once per process.

mod ucard;

pub use ucard::UCard;

use crate::model::card::Card;
use crate::model::rank::Rank;
use crate::model::suit::Color;
use crate::rules::{self, HAND_SIZE};
use std::collections::HashSet;
use std::fmt;
use std::sync::OnceLock;

pub const CLASS_COUNT: usize = 57;

/// One winning-hand class: five unsuited slots in ascending rank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WinningHand {
    id: usize,
    name: String,
    slots: [UCard; HAND_SIZE],
    points: i32,
    permutations: u32,
}

impl WinningHand {
    fn new(id: usize, low: u8, colors: [Color; HAND_SIZE]) -> Self {
        let slots: [UCard; HAND_SIZE] = std::array::from_fn(|i| {
            let rank = Rank::from_value(low + i as u8).expect("runs stay within rank bounds");
            UCard::new(rank, colors[i])
        });
        let pattern: String = colors.iter().map(|color| color.to_string()).collect();
        let blue = colors.iter().filter(|color| **color == Color::Blue).count();
        let permutations = slots.iter().map(|slot| slot.card_count()).product();
        Self {
            id,
            name: format!("{}-{} {}", low, low + 4, pattern),
            slots,
            points: rules::blue_bracket(blue),
            permutations,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn slots(&self) -> &[UCard; HAND_SIZE] {
        &self.slots
    }

    pub fn points(&self) -> i32 {
        self.points
    }

    /// Concrete hands instantiating this class.
    pub fn permutations(&self) -> u32 {
        self.permutations
    }

    pub fn contains(&self, slot: UCard) -> bool {
        self.slots.contains(&slot)
    }

    /// Every concrete five card hand of this class.
    pub fn instances(&self) -> Vec<[Card; HAND_SIZE]> {
        let mut hands: Vec<Vec<Card>> = vec![Vec::with_capacity(HAND_SIZE)];
        for slot in &self.slots {
            hands = hands
                .into_iter()
                .flat_map(|partial| {
                    slot.cards().map(move |card| {
                        let mut next = partial.clone();
                        next.push(card);
                        next
                    })
                })
                .collect();
        }
        hands
            .into_iter()
            .filter_map(|cards| cards.try_into().ok())
            .collect()
    }
}

impl fmt::Display for WinningHand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Colour patterns of a winning run, lowest rank first.
fn patterns() -> Vec<[Color; HAND_SIZE]> {
    use Color::{Black, Blue, Red};

    let mut patterns = vec![[Blue; HAND_SIZE]];
    for position in 0..HAND_SIZE {
        for other in [Black, Red] {
            let mut colors = [other; HAND_SIZE];
            colors[position] = Blue;
            patterns.push(colors);
        }
    }
    for (main, odd) in [(Blue, Black), (Blue, Red), (Black, Red), (Red, Black)] {
        for end in [0, HAND_SIZE - 1] {
            let mut colors = [main; HAND_SIZE];
            colors[end] = odd;
            patterns.push(colors);
        }
    }
    patterns
}

/// All winning-hand classes, in a stable order.
pub fn catalog() -> &'static [WinningHand] {
    static CATALOG: OnceLock<Vec<WinningHand>> = OnceLock::new();
    CATALOG.get_or_init(|| {
        let patterns = patterns();
        let mut classes = Vec::with_capacity(CLASS_COUNT);
        for low in 1..=3u8 {
            for colors in &patterns {
                classes.push(WinningHand::new(classes.len(), low, *colors));
            }
        }
        classes
    })
}

/// The class a winning hand instantiates, if any.
pub fn classify(hand: &[Card]) -> Option<&'static WinningHand> {
    if !matches!(rules::is_blues(hand), Ok(true)) {
        return None;
    }
    catalog()
        .iter()
        .find(|target| cards_needed_for(target, hand).is_empty())
}

/// Slots of `target` that no card of `hand` fills.
pub fn cards_needed_for(target: &WinningHand, hand: &[Card]) -> Vec<UCard> {
    target
        .slots
        .iter()
        .copied()
        .filter(|slot| !hand.iter().any(|card| slot.satisfied_by(*card)))
        .collect()
}

/// Classes with the fewest unfilled slots for `hand`; ties are all kept.
pub fn closest_to(hand: &[Card]) -> Vec<&'static WinningHand> {
    let needed: Vec<(&WinningHand, usize)> = catalog()
        .iter()
        .map(|target| (target, cards_needed_for(target, hand).len()))
        .collect();
    let Some(fewest) = needed.iter().map(|(_, count)| *count).min() else {
        return Vec::new();
    };
    needed
        .into_iter()
        .filter(|(_, count)| *count == fewest)
        .map(|(target, _)| target)
        .collect()
}

/// Ways the unfilled slots can still be filled, ignoring what is known to be gone.
pub fn permutations_remaining(target: &WinningHand, hand: &[Card]) -> u32 {
    cards_needed_for(target, hand)
        .iter()
        .map(|slot| slot.card_count())
        .product()
}

/// Like [`permutations_remaining`], but each slot only counts the concrete
/// cards not in `gone`. Slots fill independently, so the counts multiply.
pub fn permutations_remaining_given_gone(
    target: &WinningHand,
    hand: &[Card],
    gone: &HashSet<Card>,
) -> u32 {
    cards_needed_for(target, hand)
        .iter()
        .map(|slot| slot.cards().filter(|card| !gone.contains(card)).count() as u32)
        .product()
}

/// Cards of `hand` worth keeping for `target`: at most one per slot, the
/// strongest trump when several fit.
pub fn keep_if_desired(target: &WinningHand, hand: &[Card]) -> Vec<Card> {
    let mut keep: Vec<Card> = Vec::with_capacity(HAND_SIZE);
    for slot in &target.slots {
        let pick = hand
            .iter()
            .copied()
            .filter(|card| slot.satisfied_by(*card) && !keep.contains(card))
            .max_by_key(|card| card.trump_strength());
        if let Some(card) = pick {
            keep.push(card);
        }
    }
    keep
}

/// Complement of [`keep_if_desired`], in hand order.
pub fn discard_if_desired(target: &WinningHand, hand: &[Card]) -> Vec<Card> {
    let keep = keep_if_desired(target, hand);
    hand.iter()
        .copied()
        .filter(|card| !keep.contains(card))
        .collect()
}
