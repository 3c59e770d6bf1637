use super::DecisionPolicy;
use blues_core::{Card, Seat};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::cmp::Reverse;
use tracing::{Level, event};

/// Ordering preference a policy falls back on when its plan does not
/// single out a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Approach {
    /// Shed heavy suits first, take light ones.
    Cheapest,
    /// Shed weak trumps first, take strong ones.
    Strongest,
    /// Seeded shuffle.
    Random,
}

type OrderFn = fn(&mut [Card]);

struct Orderings {
    discard: OrderFn,
    choose: OrderFn,
}

static CHEAPEST: Orderings = Orderings {
    discard: heaviest_first,
    choose: lightest_first,
};

static STRONGEST: Orderings = Orderings {
    discard: weakest_first,
    choose: strongest_first,
};

fn heaviest_first(cards: &mut [Card]) {
    cards.sort_by_key(|card| (Reverse(card.suit.weight()), Reverse(card.rank.value())));
}

fn lightest_first(cards: &mut [Card]) {
    cards.sort_by_key(|card| (card.suit.weight(), card.rank.value()));
}

fn weakest_first(cards: &mut [Card]) {
    cards.sort_by_key(|card| card.trump_strength());
}

fn strongest_first(cards: &mut [Card]) {
    cards.sort_by_key(|card| Reverse(card.trump_strength()));
}

impl Approach {
    pub const ALL: [Approach; 3] = [Approach::Cheapest, Approach::Strongest, Approach::Random];

    pub fn name(self) -> &'static str {
        match self {
            Approach::Cheapest => "cheapest",
            Approach::Strongest => "strongest",
            Approach::Random => "random",
        }
    }

    pub fn from_name(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "cheapest" | "cheap" => Some(Approach::Cheapest),
            "strongest" | "strong" => Some(Approach::Strongest),
            "random" => Some(Approach::Random),
            _ => None,
        }
    }

    fn orderings(self) -> Option<&'static Orderings> {
        match self {
            Approach::Cheapest => Some(&CHEAPEST),
            Approach::Strongest => Some(&STRONGEST),
            Approach::Random => None,
        }
    }

    /// Hand cards, most expendable first.
    pub fn discard_order(self, hand: &[Card], rng: &mut StdRng) -> Vec<Card> {
        let mut cards = hand.to_vec();
        match self.orderings() {
            Some(orderings) => (orderings.discard)(&mut cards),
            None => cards.shuffle(rng),
        }
        cards
    }

    /// Offered cards, most wanted first.
    pub fn choose_order(self, offered: &[Card], rng: &mut StdRng) -> Vec<Card> {
        let mut cards = offered.to_vec();
        match self.orderings() {
            Some(orderings) => (orderings.choose)(&mut cards),
            None => cards.shuffle(rng),
        }
        cards
    }
}

/// Plays the approach's top pick every time and never calls.
#[derive(Debug)]
pub struct ApproachPolicy {
    approach: Approach,
    rng: StdRng,
}

impl ApproachPolicy {
    pub fn new(approach: Approach, seed: u64) -> Self {
        Self {
            approach,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn approach(&self) -> Approach {
        self.approach
    }
}

impl DecisionPolicy for ApproachPolicy {
    fn recommend_discard(&mut self, hand: &[Card], _well: &[Card]) -> Card {
        let order = self.approach.discard_order(hand, &mut self.rng);
        let Some(&card) = order.first() else {
            panic!("approach policy asked to discard from an empty hand");
        };
        event!(
            target: "blues_bot::approach",
            Level::TRACE,
            approach = self.approach.name(),
            discard = %card,
        );
        card
    }

    fn recommend_choose(&mut self, _hand: &[Card], pond: &[Card], well: &[Card]) -> Card {
        let offered: Vec<Card> = pond.iter().chain(well.iter()).copied().collect();
        let order = self.approach.choose_order(&offered, &mut self.rng);
        let Some(&card) = order.first() else {
            panic!("approach policy offered nothing to choose");
        };
        event!(
            target: "blues_bot::approach",
            Level::TRACE,
            approach = self.approach.name(),
            choose = %card,
        );
        card
    }

    fn recommend_call(&mut self, _opponents: &[Seat], _well: &[Card]) -> Option<Seat> {
        None
    }

    fn reset_for_new_round(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use blues_core::model::rank::Rank;
    use blues_core::model::suit::Suit;

    fn card(rank: u8, suit: Suit) -> Card {
        Card::new(Rank::from_value(rank).unwrap(), suit)
    }

    fn hand() -> Vec<Card> {
        vec![
            card(1, Suit::Blue),
            card(3, Suit::Wedge),
            card(3, Suit::Tilde),
            card(6, Suit::Heart),
            card(7, Suit::Club),
        ]
    }

    #[test]
    fn cheapest_sheds_heaviest_suit() {
        let mut rng = StdRng::seed_from_u64(1);
        let order = Approach::Cheapest.discard_order(&hand(), &mut rng);
        assert_eq!(order[0], card(3, Suit::Wedge));
        assert_eq!(order[4], card(1, Suit::Blue));
    }

    #[test]
    fn strongest_sheds_weakest_trump() {
        let mut rng = StdRng::seed_from_u64(1);
        let order = Approach::Strongest.discard_order(&hand(), &mut rng);
        assert_eq!(order[0], card(7, Suit::Club));
        assert_eq!(order[4], card(1, Suit::Blue));
        let picks = Approach::Strongest.choose_order(&hand(), &mut rng);
        assert_eq!(picks[0], card(1, Suit::Blue));
    }

    #[test]
    fn random_order_is_seeded() {
        let mut first = StdRng::seed_from_u64(9);
        let mut second = StdRng::seed_from_u64(9);
        assert_eq!(
            Approach::Random.discard_order(&hand(), &mut first),
            Approach::Random.discard_order(&hand(), &mut second)
        );
    }

    #[test]
    fn approach_policy_never_calls() {
        let mut policy = ApproachPolicy::new(Approach::Cheapest, 3);
        assert_eq!(policy.recommend_call(&[Seat::Two, Seat::Three], &[]), None);
        let chosen = policy.recommend_choose(&hand(), &[card(5, Suit::Spade)], &[card(5, Suit::Tilde)]);
        assert_eq!(chosen, card(5, Suit::Tilde));
    }

    #[test]
    fn names_round_trip() {
        for approach in Approach::ALL {
            assert_eq!(Approach::from_name(approach.name()), Some(approach));
        }
        assert_eq!(Approach::from_name("bogus"), None);
    }
}
