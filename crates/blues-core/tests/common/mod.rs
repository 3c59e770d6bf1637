#![allow(dead_code)]

use blues_core::model::rank::Rank;
use blues_core::model::suit::Suit;
use blues_core::{CallView, Card, ChooseView, DiscardView, EventSink, GameEvent, Player, Seat};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

pub fn card(rank: u8, suit: Suit) -> Card {
    Card::new(Rank::from_value(rank).expect("rank in range"), suit)
}

/// Deal order for the given hands and well, followed by the rest of the deck.
pub fn stacked_order(hands: [[Card; 5]; 4], well: [Card; 4]) -> Vec<Card> {
    let mut order = Vec::with_capacity(56);
    for slot in 0..5 {
        for hand in &hands {
            order.push(hand[slot]);
        }
    }
    order.extend(well);
    for card in Card::all() {
        if !order.contains(&card) {
            order.push(card);
        }
    }
    order
}

/// Plays back fixed decisions, falling back to the first legal option.
#[derive(Debug, Default)]
pub struct ScriptedPlayer {
    pub discards: VecDeque<Card>,
    pub choices: VecDeque<Card>,
    pub accuse: Option<Seat>,
}

impl ScriptedPlayer {
    pub fn new(discards: &[Card], choices: &[Card], accuse: Option<Seat>) -> Self {
        Self {
            discards: discards.iter().copied().collect(),
            choices: choices.iter().copied().collect(),
            accuse,
        }
    }
}

impl Player for ScriptedPlayer {
    fn discard(&mut self, view: &DiscardView<'_>) -> Card {
        self.discards.pop_front().unwrap_or(view.hand[0])
    }

    fn choose_card(&mut self, view: &ChooseView<'_>) -> Card {
        self.choices
            .pop_front()
            .or_else(|| view.pond.first().copied())
            .or_else(|| view.well.first().copied())
            .expect("something to choose")
    }

    fn call_no_blues(&mut self, _view: &CallView<'_>) -> Option<Seat> {
        self.accuse
    }
}

/// Discards its lowest card and takes the same card straight back, so its
/// hand never changes.
#[derive(Debug, Default)]
pub struct Holder {
    last_discard: Option<Card>,
}

impl Player for Holder {
    fn discard(&mut self, view: &DiscardView<'_>) -> Card {
        let card = view.hand[0];
        self.last_discard = Some(card);
        card
    }

    fn choose_card(&mut self, view: &ChooseView<'_>) -> Card {
        self.last_discard
            .filter(|card| view.pond.contains(card))
            .or_else(|| view.pond.first().copied())
            .expect("pond card available")
    }

    fn call_no_blues(&mut self, _view: &CallView<'_>) -> Option<Seat> {
        None
    }
}

pub type EventLog = Rc<RefCell<Vec<GameEvent>>>;

pub fn recorder() -> (EventLog, Box<dyn EventSink>) {
    let log: EventLog = Rc::new(RefCell::new(Vec::new()));
    let sink_log = Rc::clone(&log);
    let sink: Box<dyn EventSink> =
        Box::new(move |event: &GameEvent| sink_log.borrow_mut().push(event.clone()));
    (log, sink)
}
