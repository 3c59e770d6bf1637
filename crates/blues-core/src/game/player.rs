use crate::game::events::GameEvent;
use crate::model::card::Card;
use crate::model::player::Seat;

/// What a player sees when asked to discard into the pond.
#[derive(Debug, Clone, Copy)]
pub struct DiscardView<'a> {
    pub seat: Seat,
    pub hand: &'a [Card],
    pub well: &'a [Card],
}

/// What a player sees when choosing from the revealed pond and, for the
/// first two choosers, the well.
#[derive(Debug, Clone, Copy)]
pub struct ChooseView<'a> {
    pub seat: Seat,
    pub hand: &'a [Card],
    pub pond: &'a [Card],
    pub well: &'a [Card],
}

/// What a player sees when deciding whether to call "No Blues".
#[derive(Debug, Clone, Copy)]
pub struct CallView<'a> {
    pub seat: Seat,
    pub hand: &'a [Card],
    pub opponents: &'a [Seat],
    pub well: &'a [Card],
}

/// Decision capability of a seated player.
///
/// Calls block the table until they return. Returned cards must come from
/// the hand (discard) or from the offered zones (choose).
pub trait Player {
    fn discard(&mut self, view: &DiscardView<'_>) -> Card;

    fn choose_card(&mut self, view: &ChooseView<'_>) -> Card;

    /// Accuse an opponent of being one card from Blues, or pass.
    fn call_no_blues(&mut self, view: &CallView<'_>) -> Option<Seat>;

    fn reset_for_new_round(&mut self) {}

    fn reset_for_new_game(&mut self) {}

    /// Table events, delivered to every seat; `seat` is the receiver's own seat.
    fn observe(&mut self, _seat: Seat, _event: &GameEvent) {}
}
