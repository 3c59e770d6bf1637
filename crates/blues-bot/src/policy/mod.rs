mod approach;
mod pursuit;
mod recall;

pub use approach::{Approach, ApproachPolicy};
pub use pursuit::{Counting, PursuitPolicy};
pub use recall::Recall;

use blues_core::{Card, GameEvent, Seat, Zone};

/// Interface every automated decision maker implements.
pub trait DecisionPolicy {
    fn recommend_discard(&mut self, hand: &[Card], well: &[Card]) -> Card;

    fn recommend_choose(&mut self, hand: &[Card], pond: &[Card], well: &[Card]) -> Card;

    fn recommend_call(&mut self, opponents: &[Seat], well: &[Card]) -> Option<Seat>;

    fn reset_for_new_round(&mut self);

    fn reset_for_new_game(&mut self) {
        self.reset_for_new_round();
    }

    /// Table events; `me` is the seat this policy plays for.
    fn observe(&mut self, _me: Seat, _event: &GameEvent) {}
}

/// Notifications consumed by policies that remember which cards left play.
pub trait CardMemory {
    fn on_opponent_discard(&mut self, seat: Seat, card: Card, well: &[Card]);

    fn on_opponent_choice(
        &mut self,
        seat: Seat,
        card: Card,
        zone: Zone,
        well: &[Card],
        pond: &[Card],
    );

    fn on_cards_cleared(&mut self, cards: &[Card]);
}
