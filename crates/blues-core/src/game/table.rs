use crate::game::config::TableConfig;
use crate::game::end_state::{NoBluesCall, RoundEndState};
use crate::game::error::TableError;
use crate::game::events::{EventBus, EventSink, GameEvent, Zone};
use crate::game::player::{CallView, ChooseView, DiscardView, Player};
use crate::game::tally::{self, TallyInput};
use crate::model::card::Card;
use crate::model::deck::{Deck, Location};
use crate::model::hand::Hand;
use crate::model::player::{SEAT_COUNT, Seat};
use crate::model::score::{ScoreLedger, ScoreRecord};
use crate::rules::{self, HAND_SIZE, POND_SIZE, WELL_SIZE};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::array;
use tracing::{debug, info};

/// Choosers allowed to take from the well each turn.
const WELL_CHOOSERS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    NotStarted,
    Dealt,
    WellFlipped,
    PondCollected,
    NbcResolved,
    PondFlipped,
    ChoicesAllowed,
    RoundOver,
}

/// Round state machine. Owns the deck, the shared zones and the seated players.
///
/// A round runs `deal`, then turns of `flip_well`, `collect_pond`,
/// `resolve_no_blues`, `flip_pond` and `allow_choices` until one of them
/// ends the round. Each step checks its phase and zone sizes and refuses to
/// run, without touching state, when they do not hold.
///
/// A [`TableError`] raised while a step is already moving cards leaves the
/// moves made before it in place. In `allow_choices` a rejected chooser
/// leaves earlier choices applied and the well partly taken, so no step can
/// follow. Drop the table after such an error.
pub struct Table {
    players: [Box<dyn Player>; SEAT_COUNT],
    hands: [Hand; SEAT_COUNT],
    pond: Vec<(Seat, Card)>,
    pond_revealed: bool,
    well: Vec<Card>,
    pond_cards: [Option<Card>; SEAT_COUNT],
    deck: Deck,
    phase: Phase,
    end_state: Option<RoundEndState>,
    ledger: ScoreLedger,
    bus: EventBus,
    config: TableConfig,
    rng: StdRng,
    game_winner: Option<Seat>,
    round_number: u32,
    turn_number: u32,
}

impl Table {
    pub fn new(players: [Box<dyn Player>; SEAT_COUNT], config: TableConfig) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        Self {
            players,
            hands: Default::default(),
            pond: Vec::with_capacity(POND_SIZE),
            pond_revealed: false,
            well: Vec::with_capacity(WELL_SIZE),
            pond_cards: [None; SEAT_COUNT],
            deck: Deck::standard(),
            phase: Phase::NotStarted,
            end_state: None,
            ledger: ScoreLedger::new(),
            bus: EventBus::new(),
            config,
            rng: StdRng::seed_from_u64(seed),
            game_winner: None,
            round_number: 0,
            turn_number: 0,
        }
    }

    pub fn subscribe(&mut self, sink: Box<dyn EventSink>) {
        self.bus.subscribe(sink);
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn hand(&self, seat: Seat) -> &Hand {
        &self.hands[seat.index()]
    }

    /// Points the seat's current hand would score.
    pub fn round_points(&self, seat: Seat) -> Result<u32, TableError> {
        Ok(rules::points(self.hands[seat.index()].cards())?)
    }

    /// The card this seat most recently discarded into the pond.
    pub fn pond_card(&self, seat: Seat) -> Option<Card> {
        self.pond_cards[seat.index()]
    }

    /// Cards still in the pond, in seat order of discarding.
    pub fn pond(&self) -> Vec<Card> {
        self.pond.iter().map(|(_, card)| *card).collect()
    }

    pub fn is_pond_revealed(&self) -> bool {
        self.pond_revealed
    }

    pub fn well(&self) -> &[Card] {
        &self.well
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn ledger(&self) -> &ScoreLedger {
        &self.ledger
    }

    pub fn end_state(&self) -> Option<RoundEndState> {
        self.end_state
    }

    pub fn game_winner(&self) -> Option<Seat> {
        self.game_winner
    }

    pub fn is_game_over(&self) -> bool {
        self.game_winner.is_some()
    }

    pub fn round_number(&self) -> u32 {
        self.round_number
    }

    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    /// Clears the ledger and tells every player a new game begins.
    pub fn start_game(&mut self) {
        self.ledger = ScoreLedger::new();
        self.game_winner = None;
        self.round_number = 0;
        self.phase = Phase::NotStarted;
        for player in &mut self.players {
            player.reset_for_new_game();
        }
        info!("new game");
    }

    /// Reshuffles the full deck and deals a new round.
    pub fn deal(&mut self) -> Result<Phase, TableError> {
        self.ensure_can_deal()?;
        let mut deck = Deck::standard();
        deck.shuffle(&mut self.rng);
        self.begin_round(deck)
    }

    /// Deals a new round from a fixed draw order instead of a shuffle.
    pub fn deal_stacked(&mut self, order: Vec<Card>) -> Result<Phase, TableError> {
        self.ensure_can_deal()?;
        let deck = Deck::stacked(order)?;
        self.begin_round(deck)
    }

    fn ensure_can_deal(&self) -> Result<(), TableError> {
        if self.is_game_over() {
            return Err(TableError::GameOver);
        }
        self.expect_phase("deal", &[Phase::NotStarted, Phase::RoundOver])
    }

    fn begin_round(&mut self, deck: Deck) -> Result<Phase, TableError> {
        self.deck = deck;
        self.pond.clear();
        self.pond_revealed = false;
        self.well.clear();
        self.pond_cards = [None; SEAT_COUNT];
        self.end_state = None;
        self.round_number += 1;
        self.turn_number = 0;
        for player in &mut self.players {
            player.reset_for_new_round();
        }

        let mut dealt: [Vec<Card>; SEAT_COUNT] = array::from_fn(|_| Vec::with_capacity(HAND_SIZE));
        for index in 0..HAND_SIZE * SEAT_COUNT {
            dealt[index % SEAT_COUNT].push(self.draw()?);
        }
        self.hands = dealt.map(Hand::with_cards);
        self.phase = Phase::Dealt;
        debug!(round = self.round_number, "dealt");

        for seat in Seat::LOOP {
            if rules::is_blues(self.hands[seat.index()].cards())? {
                self.finish_round(RoundEndState::Blues { winner: seat })?;
                break;
            }
        }
        Ok(self.phase)
    }

    /// Draws four cards into the well.
    pub fn flip_well(&mut self) -> Result<(), TableError> {
        self.expect_phase("flip_well", &[Phase::Dealt, Phase::ChoicesAllowed])?;
        if !self.well.is_empty() {
            return Err(TableError::WellNotEmpty(self.well.len()));
        }
        if self.deck.remaining() < WELL_SIZE {
            return Err(TableError::DeckExhausted {
                needed: WELL_SIZE,
                remaining: self.deck.remaining(),
            });
        }
        for _ in 0..WELL_SIZE {
            let card = self.draw()?;
            self.deck.set_location(card, Location::Well);
            self.well.push(card);
        }
        self.turn_number += 1;
        self.phase = Phase::WellFlipped;
        debug!(turn = self.turn_number, well = ?self.well, "well flipped");
        Ok(())
    }

    /// Asks every seat, in seat order, for a face-down discard.
    pub fn collect_pond(&mut self) -> Result<(), TableError> {
        self.expect_phase("collect_pond", &[Phase::WellFlipped])?;
        if self.well.len() != WELL_SIZE {
            return Err(TableError::WellNotFull(self.well.len()));
        }
        if !self.pond.is_empty() {
            return Err(TableError::PondNotEmpty(self.pond.len()));
        }

        let mut discards = Vec::with_capacity(POND_SIZE);
        for seat in Seat::LOOP {
            let view = DiscardView {
                seat,
                hand: self.hands[seat.index()].cards(),
                well: &self.well,
            };
            let card = self.players[seat.index()].discard(&view);
            if !self.hands[seat.index()].contains(card) {
                return Err(TableError::CardNotInHand { seat, card });
            }
            discards.push((seat, card));
        }

        for (seat, card) in discards {
            self.hands[seat.index()].remove(card);
            self.deck.set_location(card, Location::PondHidden);
            self.pond_cards[seat.index()] = Some(card);
            self.pond.push((seat, card));
        }
        self.pond_revealed = false;
        self.phase = Phase::PondCollected;
        debug!(turn = self.turn_number, "pond collected");
        Ok(())
    }

    /// Gives every seat the chance to call "No Blues" before the pond is
    /// revealed. A call ends the round.
    pub fn resolve_no_blues(&mut self) -> Result<Option<RoundEndState>, TableError> {
        self.expect_phase("resolve_no_blues", &[Phase::PondCollected])?;
        if self.pond.len() != POND_SIZE {
            return Err(TableError::PondNotFull(self.pond.len()));
        }
        if self.pond_revealed {
            return Err(TableError::PondRevealed);
        }

        let mut calls = Vec::new();
        for seat in Seat::LOOP {
            let opponents: Vec<Seat> = seat.others().collect();
            let view = CallView {
                seat,
                hand: self.hands[seat.index()].cards(),
                opponents: &opponents,
                well: &self.well,
            };
            if let Some(accused) = self.players[seat.index()].call_no_blues(&view) {
                if accused == seat {
                    return Err(TableError::SelfAccusation(seat));
                }
                calls.push(NoBluesCall {
                    caller: seat,
                    accused,
                });
            }
        }

        let Some(call) = self.select_call(&calls) else {
            self.phase = Phase::NbcResolved;
            return Ok(None);
        };
        info!(caller = %call.caller, accused = %call.accused, "No Blues called");

        self.reveal_pond();
        let pond = self.pond();
        let accused_hand = self.hands[call.accused.index()].cards();
        let end_state = if rules::is_no_blues(&pond, &self.well, accused_hand)? {
            RoundEndState::TrueNoBlues {
                call,
                winner: call.caller,
            }
        } else {
            RoundEndState::FalseNoBlues {
                call,
                winner: call.accused,
            }
        };
        self.finish_round(end_state)?;
        Ok(Some(end_state))
    }

    /// Among simultaneous callers, the one holding the best card in hand or
    /// pond gets to make the call.
    fn select_call(&self, calls: &[NoBluesCall]) -> Option<NoBluesCall> {
        let holdings: Vec<(Seat, Vec<Card>)> = calls
            .iter()
            .map(|call| {
                let mut cards = self.hands[call.caller.index()].cards().to_vec();
                cards.extend(self.pond_cards[call.caller.index()]);
                (call.caller, cards)
            })
            .collect();
        let caller = rules::strongest_holder(&holdings)?;
        calls.iter().copied().find(|call| call.caller == caller)
    }

    /// Turns the pond face up.
    pub fn flip_pond(&mut self) -> Result<(), TableError> {
        self.expect_phase("flip_pond", &[Phase::NbcResolved])?;
        if self.pond.len() != POND_SIZE {
            return Err(TableError::PondNotFull(self.pond.len()));
        }
        if self.pond_revealed {
            return Err(TableError::PondRevealed);
        }
        self.reveal_pond();
        self.phase = Phase::PondFlipped;
        Ok(())
    }

    fn reveal_pond(&mut self) {
        self.pond_revealed = true;
        let pond = self.pond.clone();
        for (seat, card) in pond {
            self.deck.set_location(card, Location::PondRevealed);
            self.emit(GameEvent::PlayerDiscard { seat, card });
        }
    }

    /// Lets every seat take one card, best discard first. The first two
    /// choosers may also take from the well.
    ///
    /// Returns [`TableError::CardNotAvailable`] when a chooser asks for a card
    /// outside its offer. Choices already made stand, leaving the table
    /// unusable.
    pub fn allow_choices(&mut self) -> Result<Option<RoundEndState>, TableError> {
        self.expect_phase("allow_choices", &[Phase::PondFlipped])?;
        if self.pond.len() != POND_SIZE {
            return Err(TableError::PondNotFull(self.pond.len()));
        }
        if !self.pond_revealed {
            return Err(TableError::PondHidden);
        }

        let order = rules::player_choice_order(&self.pond);
        self.phase = Phase::ChoicesAllowed;

        for (position, seat) in order.iter().copied().enumerate() {
            let well_open = position < WELL_CHOOSERS;
            let pond = self.pond();
            let view = ChooseView {
                seat,
                hand: self.hands[seat.index()].cards(),
                pond: &pond,
                well: if well_open { self.well.as_slice() } else { &[] },
            };
            let card = self.players[seat.index()].choose_card(&view);
            let zone = self.take_from_zone(seat, card, well_open)?;
            self.hands[seat.index()].add(card);
            self.deck.set_location(card, Location::Hand);

            let event = GameEvent::PlayerChoice {
                seat,
                card,
                zone,
                well: if position + 1 < WELL_CHOOSERS {
                    self.well.clone()
                } else {
                    Vec::new()
                },
                pond: self.pond(),
                next: order.get(position + 1).copied(),
            };
            self.emit(event);

            if rules::is_blues(self.hands[seat.index()].cards())? {
                let end_state = RoundEndState::Blues { winner: seat };
                self.finish_round(end_state)?;
                return Ok(Some(end_state));
            }
        }

        self.clear_zones();
        if self.deck.remaining() < WELL_SIZE {
            let winner = self.lowest_hand()?;
            let end_state = RoundEndState::DeckEmpty { winner };
            self.finish_round(end_state)?;
            return Ok(Some(end_state));
        }
        Ok(None)
    }

    fn take_from_zone(&mut self, seat: Seat, card: Card, well_open: bool) -> Result<Zone, TableError> {
        if let Some(index) = self.pond.iter().position(|(_, c)| *c == card) {
            self.pond.remove(index);
            return Ok(Zone::Pond);
        }
        if well_open && let Some(index) = self.well.iter().position(|c| *c == card) {
            self.well.remove(index);
            return Ok(Zone::Well);
        }
        Err(TableError::CardNotAvailable { seat, card })
    }

    fn clear_zones(&mut self) {
        let mut cleared: Vec<Card> = self.pond.drain(..).map(|(_, card)| card).collect();
        cleared.append(&mut self.well);
        self.pond_revealed = false;
        for card in &cleared {
            self.deck.set_location(*card, Location::Discarded);
        }
        debug!(cleared = cleared.len(), remaining = self.deck.remaining(), "zones cleared");
        self.emit(GameEvent::CardsCleared { cards: cleared });
    }

    fn lowest_hand(&self) -> Result<Seat, TableError> {
        let candidates: Vec<(Seat, &[Card], Option<Card>)> = Seat::LOOP
            .into_iter()
            .map(|seat| {
                (
                    seat,
                    self.hands[seat.index()].cards(),
                    self.pond_cards[seat.index()],
                )
            })
            .collect();
        Ok(rules::lowest_hand(&candidates)?)
    }

    /// Plays one turn: well, pond, No Blues, choices.
    pub fn play_turn(&mut self) -> Result<Option<RoundEndState>, TableError> {
        self.flip_well()?;
        self.collect_pond()?;
        if let Some(end_state) = self.resolve_no_blues()? {
            return Ok(Some(end_state));
        }
        self.flip_pond()?;
        self.allow_choices()
    }

    /// Deals and plays turns until the round ends.
    pub fn play_round(&mut self) -> Result<RoundEndState, TableError> {
        self.deal()?;
        self.play_dealt_round()
    }

    /// Plays turns of an already dealt round until it ends.
    pub fn play_dealt_round(&mut self) -> Result<RoundEndState, TableError> {
        loop {
            if let Some(end_state) = self.end_state {
                return Ok(end_state);
            }
            if let Some(end_state) = self.play_turn()? {
                return Ok(end_state);
            }
        }
    }

    /// Plays rounds from a fresh ledger until the game is over.
    pub fn play_game(&mut self) -> Result<Seat, TableError> {
        self.start_game();
        loop {
            self.play_round()?;
            if let Some(winner) = self.game_winner {
                return Ok(winner);
            }
        }
    }

    fn finish_round(&mut self, end_state: RoundEndState) -> Result<ScoreRecord, TableError> {
        let deltas = tally::tally(&TallyInput {
            end_state,
            hands: &self.hands,
            config: &self.config,
        })?;
        let record = self.ledger.append(deltas, end_state).clone();
        self.end_state = Some(end_state);
        self.phase = Phase::RoundOver;
        info!(
            round = self.round_number,
            turns = self.turn_number,
            %end_state,
            ?deltas,
            totals = ?record.totals,
            "round over"
        );
        self.emit(GameEvent::RoundOver { end_state });

        if self
            .ledger
            .is_game_over(self.config.game_over_points_per_player)
            && let Some(winner) = self.ledger.game_winner()
        {
            self.game_winner = Some(winner);
            info!(%winner, totals = ?record.totals, "game over");
            self.emit(GameEvent::GameOver {
                winner,
                totals: record.totals,
            });
        }
        Ok(record)
    }

    fn draw(&mut self) -> Result<Card, TableError> {
        self.deck.draw().ok_or(TableError::DeckExhausted {
            needed: 1,
            remaining: 0,
        })
    }

    fn emit(&mut self, event: GameEvent) {
        self.bus.publish(&event);
        for seat in Seat::LOOP {
            self.players[seat.index()].observe(seat, &event);
        }
    }

    fn expect_phase(&self, operation: &'static str, allowed: &[Phase]) -> Result<(), TableError> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            Err(TableError::Phase {
                operation,
                actual: self.phase,
            })
        }
    }
}

impl std::fmt::Debug for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table")
            .field("phase", &self.phase)
            .field("hands", &self.hands)
            .field("pond", &self.pond)
            .field("well", &self.well)
            .field("end_state", &self.end_state)
            .field("round_number", &self.round_number)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::{Phase, Table};
    use crate::game::config::TableConfig;
    use crate::game::error::TableError;
    use crate::game::player::{CallView, ChooseView, DiscardView, Player};
    use crate::model::card::Card;
    use crate::model::player::Seat;
    use std::array;

    struct Passive;

    impl Player for Passive {
        fn discard(&mut self, view: &DiscardView<'_>) -> Card {
            view.hand[0]
        }

        fn choose_card(&mut self, view: &ChooseView<'_>) -> Card {
            view.pond
                .first()
                .or(view.well.first())
                .copied()
                .expect("offer is never empty")
        }

        fn call_no_blues(&mut self, _view: &CallView<'_>) -> Option<Seat> {
            None
        }
    }

    fn dealt_table() -> Table {
        let players: [Box<dyn Player>; 4] = array::from_fn(|_| Box::new(Passive) as Box<dyn Player>);
        let mut table = Table::new(players, TableConfig::with_seed(3));
        assert_eq!(table.deal_stacked(Card::all().collect()), Ok(Phase::Dealt));
        table
    }

    #[test]
    fn pond_collection_needs_a_full_well_and_an_empty_pond() {
        let mut table = dealt_table();
        table.flip_well().unwrap();

        let top = table.well.pop().unwrap();
        assert_eq!(table.collect_pond(), Err(TableError::WellNotFull(3)));
        table.well.push(top);

        table.pond.push((Seat::Four, top));
        assert_eq!(table.collect_pond(), Err(TableError::PondNotEmpty(1)));
        table.pond.clear();

        table.collect_pond().unwrap();
        assert_eq!(table.phase(), Phase::PondCollected);
    }

    #[test]
    fn no_blues_check_needs_a_full_hidden_pond() {
        let mut table = dealt_table();
        table.flip_well().unwrap();
        table.collect_pond().unwrap();

        let last = table.pond.pop().unwrap();
        assert_eq!(table.resolve_no_blues(), Err(TableError::PondNotFull(3)));
        table.pond.push(last);

        table.pond_revealed = true;
        assert_eq!(table.resolve_no_blues(), Err(TableError::PondRevealed));
        table.pond_revealed = false;

        assert_eq!(table.resolve_no_blues(), Ok(None));
        assert_eq!(table.phase(), Phase::NbcResolved);
    }

    #[test]
    fn choosing_needs_a_full_revealed_pond() {
        let mut table = dealt_table();
        table.flip_well().unwrap();
        table.collect_pond().unwrap();
        table.resolve_no_blues().unwrap();

        let last = table.pond.pop().unwrap();
        assert_eq!(table.flip_pond(), Err(TableError::PondNotFull(3)));
        table.pond.push(last);
        table.flip_pond().unwrap();

        table.pond_revealed = false;
        assert_eq!(table.allow_choices(), Err(TableError::PondHidden));
        table.pond_revealed = true;

        let last = table.pond.pop().unwrap();
        assert_eq!(table.allow_choices(), Err(TableError::PondNotFull(3)));
        table.pond.push(last);

        assert_eq!(table.phase(), Phase::PondFlipped);
        assert!(table.allow_choices().is_ok());
    }
}
