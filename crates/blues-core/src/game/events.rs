use crate::game::end_state::RoundEndState;
use crate::model::card::Card;
use crate::model::player::{SEAT_COUNT, Seat};
use serde::{Deserialize, Serialize};

/// Shared zone a chosen card came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    Pond,
    Well,
}

/// Something observable happened at the table. Events are delivered in the
/// order they occur, before the table moves on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    PlayerDiscard {
        seat: Seat,
        card: Card,
    },
    PlayerChoice {
        seat: Seat,
        card: Card,
        zone: Zone,
        well: Vec<Card>,
        pond: Vec<Card>,
        next: Option<Seat>,
    },
    CardsCleared {
        cards: Vec<Card>,
    },
    RoundOver {
        end_state: RoundEndState,
    },
    GameOver {
        winner: Seat,
        totals: [i32; SEAT_COUNT],
    },
}

impl GameEvent {
    pub const fn name(&self) -> &'static str {
        match self {
            GameEvent::PlayerDiscard { .. } => "PLAYER_DISCARD",
            GameEvent::PlayerChoice { .. } => "PLAYER_CHOICE",
            GameEvent::CardsCleared { .. } => "CARDS_CLEARED",
            GameEvent::RoundOver { .. } => "ROUND_OVER",
            GameEvent::GameOver { .. } => "GAME_OVER",
        }
    }
}

/// Receiver of table events, such as a display or a logger.
pub trait EventSink {
    fn handle(&mut self, event: &GameEvent);
}

impl<F> EventSink for F
where
    F: FnMut(&GameEvent),
{
    fn handle(&mut self, event: &GameEvent) {
        self(event)
    }
}

/// Synchronous fan-out of table events to subscribed sinks.
#[derive(Default)]
pub struct EventBus {
    sinks: Vec<Box<dyn EventSink>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }

    pub fn publish(&mut self, event: &GameEvent) {
        tracing::trace!(event = event.name(), "publish");
        for sink in &mut self.sinks {
            sink.handle(event);
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("sinks", &self.sinks.len())
            .finish()
    }
}
