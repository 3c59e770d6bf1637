use super::{Approach, CardMemory, DecisionPolicy, Recall};
use blues_core::catalog::{self, WinningHand};
use blues_core::model::suit::Color;
use blues_core::{Card, GameEvent, Seat};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::cmp::Reverse;
use std::collections::HashSet;
use tracing::{Level, event};

/// How pursuable classes are ranked against each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Counting {
    /// Cheapest class first (or shuffled under [`Approach::Random`]).
    Memoryless,
    /// Most remaining arrangements first.
    Raw,
    /// Most remaining arrangements first, not counting remembered gone cards.
    GivenGone,
}

/// Chases the winning-hand classes closest to the current hand.
///
/// The pursuable set is seeded from the catalog on the first decision of a
/// round and only narrows afterwards. Discards come from the leading
/// class's expendable cards; choices take the first offered card that
/// fills one of its open slots. Never calls "No Blues".
#[derive(Debug)]
pub struct PursuitPolicy {
    approach: Approach,
    counting: Counting,
    avoid_double_blue: bool,
    recall: Option<Recall>,
    pursuable: Vec<&'static WinningHand>,
    well: Vec<Card>,
    rng: StdRng,
}

impl PursuitPolicy {
    pub fn new(approach: Approach, counting: Counting, seed: u64) -> Self {
        Self {
            approach,
            counting,
            avoid_double_blue: false,
            recall: None,
            pursuable: Vec::new(),
            well: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn with_recall(mut self, recall: Recall) -> Self {
        self.recall = Some(recall);
        self
    }

    /// Skip classes still missing two or more blue cards when seeding,
    /// unless that would leave nothing to pursue.
    pub fn avoiding_double_blue(mut self, enabled: bool) -> Self {
        self.avoid_double_blue = enabled;
        self
    }

    pub fn approach(&self) -> Approach {
        self.approach
    }

    pub fn counting(&self) -> Counting {
        self.counting
    }

    pub fn recall(&self) -> Option<&Recall> {
        self.recall.as_ref()
    }

    /// Current targets, best first.
    pub fn pursuable(&self) -> &[&'static WinningHand] {
        &self.pursuable
    }

    fn refresh(&mut self, hand: &[Card]) {
        if self.pursuable.is_empty() {
            self.pursuable = self.seed_targets(hand);
        } else {
            let fewest = self
                .pursuable
                .iter()
                .map(|target| catalog::cards_needed_for(target, hand).len())
                .min()
                .unwrap_or(0);
            self.pursuable
                .retain(|target| catalog::cards_needed_for(target, hand).len() == fewest);
        }
        self.rank_targets(hand);
    }

    fn seed_targets(&self, hand: &[Card]) -> Vec<&'static WinningHand> {
        let closest = catalog::closest_to(hand);
        if !self.avoid_double_blue {
            return closest;
        }
        let single_blue: Vec<&'static WinningHand> = closest
            .iter()
            .copied()
            .filter(|target| blue_slots_needed(target, hand) < 2)
            .collect();
        if single_blue.is_empty() {
            closest
        } else {
            single_blue
        }
    }

    fn rank_targets(&mut self, hand: &[Card]) {
        match self.counting {
            Counting::Memoryless => {
                if self.approach == Approach::Random {
                    self.pursuable.shuffle(&mut self.rng);
                } else {
                    self.pursuable.sort_by_key(|target| target.points());
                }
            }
            Counting::Raw | Counting::GivenGone => {
                let empty = HashSet::new();
                let gone = match (self.counting, self.recall.as_ref()) {
                    (Counting::GivenGone, Some(recall)) => recall.gone(),
                    _ => &empty,
                };
                self.pursuable.sort_by_cached_key(|target| {
                    let arrangements = if self.counting == Counting::GivenGone {
                        catalog::permutations_remaining_given_gone(target, hand, gone)
                    } else {
                        catalog::permutations_remaining(target, hand)
                    };
                    (
                        Reverse(arrangements),
                        target.points(),
                        discard_strength(target, hand),
                    )
                });
            }
        }
    }

    fn log_decision(&self, kind: &'static str, hand: &[Card], chosen: Card, planned: bool) {
        if !tracing::enabled!(Level::DEBUG) {
            return;
        }
        let target = self
            .pursuable
            .first()
            .map(|target| target.name().to_string())
            .unwrap_or_default();
        let hand_preview = hand
            .iter()
            .map(|card| card.to_string())
            .collect::<Vec<_>>()
            .join(",");
        event!(
            target: "blues_bot::pursuit",
            Level::DEBUG,
            kind,
            approach = self.approach.name(),
            counting = ?self.counting,
            pursuable = self.pursuable.len(),
            target = %target,
            hand = %hand_preview,
            chosen = %chosen,
            planned,
        );
    }
}

fn blue_slots_needed(target: &WinningHand, hand: &[Card]) -> usize {
    catalog::cards_needed_for(target, hand)
        .iter()
        .filter(|slot| slot.color == Color::Blue)
        .count()
}

fn discard_strength(target: &WinningHand, hand: &[Card]) -> u32 {
    catalog::discard_if_desired(target, hand)
        .iter()
        .map(|card| u32::from(card.trump_strength()))
        .sum()
}

impl DecisionPolicy for PursuitPolicy {
    fn recommend_discard(&mut self, hand: &[Card], well: &[Card]) -> Card {
        self.well = well.to_vec();
        self.refresh(hand);
        let order = self.approach.discard_order(hand, &mut self.rng);
        let planned = self.pursuable.first().and_then(|target| {
            let expendable = catalog::discard_if_desired(target, hand);
            order.iter().copied().find(|card| expendable.contains(card))
        });
        let Some(card) = planned.or_else(|| order.first().copied()) else {
            panic!("pursuit policy asked to discard from an empty hand");
        };
        self.log_decision("discard", hand, card, planned.is_some());
        card
    }

    fn recommend_choose(&mut self, hand: &[Card], pond: &[Card], well: &[Card]) -> Card {
        self.refresh(hand);
        let offered: Vec<Card> = pond.iter().chain(well.iter()).copied().collect();
        let order = self.approach.choose_order(&offered, &mut self.rng);
        let planned = self.pursuable.first().and_then(|target| {
            let open = catalog::cards_needed_for(target, hand).len();
            order.iter().copied().find(|&card| {
                let mut probe = hand.to_vec();
                probe.push(card);
                catalog::cards_needed_for(target, &probe).len() < open
            })
        });
        let Some(card) = planned.or_else(|| order.first().copied()) else {
            panic!("pursuit policy offered nothing to choose");
        };
        self.log_decision("choose", hand, card, planned.is_some());
        card
    }

    fn recommend_call(&mut self, _opponents: &[Seat], _well: &[Card]) -> Option<Seat> {
        None
    }

    fn reset_for_new_round(&mut self) {
        self.pursuable.clear();
        self.well.clear();
        if let Some(recall) = self.recall.as_mut() {
            recall.clear();
        }
    }

    fn observe(&mut self, me: Seat, event: &GameEvent) {
        let Some(recall) = self.recall.as_mut() else {
            return;
        };
        match event {
            GameEvent::PlayerDiscard { seat, card } if *seat != me => {
                recall.on_opponent_discard(*seat, *card, &self.well);
            }
            GameEvent::PlayerChoice {
                seat,
                card,
                zone,
                well,
                pond,
                ..
            } if *seat != me => {
                recall.on_opponent_choice(*seat, *card, *zone, well, pond);
            }
            GameEvent::CardsCleared { cards } => recall.on_cards_cleared(cards),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blues_core::Zone;
    use blues_core::model::rank::Rank;
    use blues_core::model::suit::Suit;

    fn card(rank: u8, suit: Suit) -> Card {
        Card::new(Rank::from_value(rank).unwrap(), suit)
    }

    fn black_run_hand() -> Vec<Card> {
        vec![
            card(1, Suit::Tilde),
            card(2, Suit::Tilde),
            card(3, Suit::Tilde),
            card(4, Suit::Tilde),
            card(7, Suit::Heart),
        ]
    }

    fn names(policy: &PursuitPolicy) -> Vec<&str> {
        policy.pursuable().iter().map(|target| target.name()).collect()
    }

    #[test]
    fn discards_the_card_no_target_needs() {
        let mut policy = PursuitPolicy::new(Approach::Cheapest, Counting::Memoryless, 0);
        let discard = policy.recommend_discard(&black_run_hand(), &[]);
        assert_eq!(discard, card(7, Suit::Heart));
        assert_eq!(names(&policy), vec!["1-5 KKKKB", "1-5 KKKKR"]);
    }

    #[test]
    fn memoryless_chases_the_cheapest_class() {
        let mut policy = PursuitPolicy::new(Approach::Cheapest, Counting::Memoryless, 0);
        let hand = &black_run_hand()[..4];
        let pond = [card(7, Suit::Spade), card(5, Suit::Diamond), card(5, Suit::Blue), card(6, Suit::Club)];
        assert_eq!(policy.recommend_choose(hand, &pond, &[]), card(5, Suit::Blue));
    }

    #[test]
    fn raw_counting_chases_the_most_arrangements() {
        let mut policy = PursuitPolicy::new(Approach::Cheapest, Counting::Raw, 0);
        let hand = &black_run_hand()[..4];
        let pond = [card(7, Suit::Spade), card(5, Suit::Diamond), card(5, Suit::Blue), card(6, Suit::Club)];
        assert_eq!(policy.recommend_choose(hand, &pond, &[]), card(5, Suit::Diamond));
        assert_eq!(names(&policy)[0], "1-5 KKKKR");
    }

    #[test]
    fn unhelpful_offer_falls_back_to_approach() {
        let mut policy = PursuitPolicy::new(Approach::Cheapest, Counting::Raw, 0);
        let hand = &black_run_hand()[..4];
        let pond = [card(7, Suit::Spade), card(6, Suit::Club), card(7, Suit::Wedge), card(2, Suit::Heart)];
        assert_eq!(policy.recommend_choose(hand, &pond, &[]), card(7, Suit::Spade));
    }

    #[test]
    fn remembered_gone_cards_reorder_targets() {
        let recall = Recall::new(100, 0);
        let mut policy =
            PursuitPolicy::new(Approach::Cheapest, Counting::GivenGone, 0).with_recall(recall);
        let cleared = GameEvent::CardsCleared {
            cards: vec![card(5, Suit::Diamond), card(5, Suit::Heart), card(5, Suit::Wedge)],
        };
        policy.observe(Seat::One, &cleared);
        policy.recommend_discard(&black_run_hand(), &[]);
        assert_eq!(names(&policy)[0], "1-5 KKKKB");

        let mut forgetful =
            PursuitPolicy::new(Approach::Cheapest, Counting::GivenGone, 0).with_recall(Recall::new(100, 0));
        forgetful.recommend_discard(&black_run_hand(), &[]);
        assert_eq!(names(&forgetful)[0], "1-5 KKKKR");
    }

    #[test]
    fn own_choices_are_not_remembered() {
        let mut policy =
            PursuitPolicy::new(Approach::Cheapest, Counting::GivenGone, 0).with_recall(Recall::new(100, 0));
        let taken = card(3, Suit::Oval);
        let choice = |seat| GameEvent::PlayerChoice {
            seat,
            card: taken,
            zone: Zone::Pond,
            well: Vec::new(),
            pond: Vec::new(),
            next: None,
        };
        policy.observe(Seat::Two, &choice(Seat::Two));
        assert!(!policy.recall().unwrap().is_gone(taken));
        policy.observe(Seat::Two, &choice(Seat::Four));
        assert!(policy.recall().unwrap().is_gone(taken));
        policy.reset_for_new_round();
        assert!(policy.recall().unwrap().gone().is_empty());
    }

    #[test]
    fn double_blue_filter_keeps_single_blue_ties() {
        let hand = [
            card(1, Suit::Blue),
            card(2, Suit::Blue),
            card(3, Suit::Blue),
            card(6, Suit::Club),
            card(7, Suit::Club),
        ];
        let mut eager = PursuitPolicy::new(Approach::Cheapest, Counting::Memoryless, 0);
        assert_eq!(eager.recommend_discard(&hand, &[]), card(7, Suit::Club));
        assert_eq!(
            names(&eager),
            vec!["1-5 BBBBB", "1-5 BBBBK", "1-5 BBBBR", "2-6 BBBBK", "3-7 BKKKK"]
        );

        let mut wary =
            PursuitPolicy::new(Approach::Cheapest, Counting::Memoryless, 0).avoiding_double_blue(true);
        assert_eq!(wary.recommend_discard(&hand, &[]), card(7, Suit::Club));
        let kept = names(&wary);
        assert!(!kept.contains(&"1-5 BBBBB"));
        assert!(kept.iter().all(|name| names(&eager).contains(name)));
        assert!(
            wary.pursuable()
                .iter()
                .all(|target| blue_slots_needed(target, &hand) < 2)
        );
    }

    #[test]
    fn double_blue_targets_can_be_skipped() {
        let hand = [
            card(1, Suit::Blue),
            card(3, Suit::Blue),
            card(5, Suit::Blue),
            card(6, Suit::Club),
            card(7, Suit::Club),
        ];
        let mut eager = PursuitPolicy::new(Approach::Cheapest, Counting::Memoryless, 0);
        assert_eq!(eager.recommend_discard(&hand, &[]), card(7, Suit::Club));
        assert_eq!(
            names(&eager),
            vec!["1-5 BBBBB", "2-6 BBBBK", "3-7 BBBBK", "3-7 BKKKK", "3-7 KKBKK"]
        );

        let mut wary =
            PursuitPolicy::new(Approach::Cheapest, Counting::Memoryless, 0).avoiding_double_blue(true);
        assert_eq!(wary.recommend_discard(&hand, &[]), card(5, Suit::Blue));
        assert_eq!(names(&wary), vec!["3-7 BKKKK", "3-7 KKBKK"]);
    }

    #[test]
    fn targets_only_narrow_within_a_round() {
        let mut policy = PursuitPolicy::new(Approach::Cheapest, Counting::Memoryless, 0);
        policy.recommend_discard(&black_run_hand(), &[]);
        assert_eq!(policy.pursuable().len(), 2);
        let mut hand = black_run_hand()[..4].to_vec();
        hand.push(card(5, Suit::Blue));
        policy.recommend_discard(&hand, &[]);
        assert_eq!(names(&policy), vec!["1-5 KKKKB"]);
        policy.reset_for_new_round();
        assert!(policy.pursuable().is_empty());
    }

    #[test]
    fn never_calls() {
        let mut policy = PursuitPolicy::new(Approach::Strongest, Counting::Raw, 0);
        assert_eq!(policy.recommend_call(&[Seat::Two, Seat::Three, Seat::Four], &[]), None);
    }
}
