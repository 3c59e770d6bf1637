//! Rules, winning-hand catalog and round state machine for the card game Blues.

pub mod catalog;
pub mod game;
pub mod model;
pub mod rules;

pub use game::config::TableConfig;
pub use game::end_state::{EndKind, NoBluesCall, RoundEndState};
pub use game::error::TableError;
pub use game::events::{EventBus, EventSink, GameEvent, Zone};
pub use game::player::{CallView, ChooseView, DiscardView, Player};
pub use game::table::{Phase, Table};
pub use model::card::Card;
pub use model::player::Seat;
