use tracing::{debug, info};

use crate::action::ActionEntry;
use crate::cards::Card;
use crate::deck::Deck;
use crate::errors::GameError;
use crate::positions::next_actor_after;
use crate::round::{is_betting_round_complete, since_street_boundary};
use crate::seat::Chips;
use crate::state::{EngineState, Pot, Street};

/// Result of one street transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressResult {
    pub next_state: EngineState,
    /// Community cards revealed by this transition only.
    pub board_delta: Vec<Card>,
}

/// Cards that have left the deck so far: two hole cards per seat, the board,
/// and one burn before each dealt street.
pub fn cards_dealt(state: &EngineState) -> usize {
    let burns = match state.board.len() {
        0 => 0,
        3 => 1,
        4 => 2,
        _ => 3,
    };
    2 * state.seats.len() + state.board.len() + burns
}

/// Closes the current betting round and moves to the next street.
///
/// Bets are swept into pots, the next street's cards are dealt from the
/// seeded deck at the position implied by what was already dealt, and the
/// round is reset: no bets, `current_bet = 0`, `min_raise = big_blind`, and
/// action starts with the first seat after the dealer that can act.
///
/// # Errors
///
/// - [`GameError::HandComplete`] when the hand is already at showdown
/// - [`GameError::DeckExhausted`] when the burn or the deal runs past the deck
pub fn progress_street(state: &EngineState, deck_seed: u64) -> Result<ProgressResult, GameError> {
    let street = state.street.next().ok_or(GameError::HandComplete)?;
    let mut next = state.clone();
    sweep_bets(&mut next);

    let reveal = street.cards_revealed();
    let board_delta = if reveal > 0 {
        let mut deck = Deck::resume(deck_seed, cards_dealt(state));
        deck.burn_card().ok_or(GameError::DeckExhausted)?;
        let cards = deck.draw_n(reveal);
        if cards.len() != reveal {
            return Err(GameError::DeckExhausted);
        }
        cards
    } else {
        Vec::new()
    };
    next.board.extend_from_slice(&board_delta);
    next.street = street;
    next.current_bet = 0;

    if street != Street::Showdown {
        next.min_raise = next.config.big_blind;
        if let Some(first) = next_actor_after(&next.seats, next.dealer_pos) {
            next.acting_pos = first;
        }
    }

    debug!(
        hand_id = next.hand_id,
        street = ?street,
        board = ?next.board,
        acting_pos = next.acting_pos,
        "street progressed"
    );

    Ok(ProgressResult {
        next_state: next,
        board_delta,
    })
}

/// Moves every outstanding bet into the pots.
///
/// Bets are cut into layers at each all-in seat's bet; a layer is eligible to
/// the in-hand seats that reached it. A layer with the same eligible seats as
/// the last pot is merged into it. Folded seats are first dropped from the
/// eligibility of existing pots.
///
/// A layer only its own bettor put chips into is an uncalled bet and goes
/// back to that seat's stack instead of into a pot. Stacks plus bets plus
/// pots is unchanged.
pub fn sweep_bets(state: &mut EngineState) {
    let seats = &state.seats;
    for pot in state.pots.iter_mut() {
        pot.eligible
            .retain(|&pos| seats.get(pos).is_some_and(|s| s.in_hand));
    }

    let top = state.seats.iter().map(|s| s.bet).max().unwrap_or(0);
    if top == 0 {
        return;
    }
    let mut caps: Vec<Chips> = state
        .seats
        .iter()
        .filter(|s| s.in_hand && s.is_all_in && s.bet > 0)
        .map(|s| s.bet)
        .collect();
    caps.push(top);
    caps.sort_unstable();
    caps.dedup();

    let hand_id = state.hand_id;
    let mut floor = 0;
    for cap in caps {
        let amount: Chips = state
            .seats
            .iter()
            .map(|s| s.bet.min(cap).saturating_sub(floor))
            .sum();
        let mut eligible: Vec<usize> = state
            .seats
            .iter()
            .filter(|s| s.in_hand && s.bet >= cap)
            .map(|s| s.seat_pos)
            .collect();
        if eligible.is_empty() {
            // only folded seats reached this level; it goes to whoever is left
            eligible = state
                .seats
                .iter()
                .filter(|s| s.in_hand)
                .map(|s| s.seat_pos)
                .collect();
        }
        let uncalled = match uncalled_bettor(state, floor, cap) {
            Some(pos) if eligible == [pos] => Some(pos),
            _ => None,
        };
        floor = cap;
        if amount == 0 {
            continue;
        }
        match uncalled.and_then(|pos| state.seats.get_mut(pos)) {
            Some(seat) => {
                seat.stack += amount;
                seat.is_all_in = false;
                debug!(
                    hand_id,
                    seat_pos = seat.seat_pos,
                    amount,
                    "uncalled bet returned"
                );
            }
            None => add_to_pots(&mut state.pots, amount, eligible),
        }
    }

    for seat in &mut state.seats {
        seat.bet = 0;
    }
}

/// The seat that alone put chips into the layer between `floor` and `cap`.
fn uncalled_bettor(state: &EngineState, floor: Chips, cap: Chips) -> Option<usize> {
    let mut reached = state.seats.iter().filter(|s| s.bet.min(cap) > floor);
    match (reached.next(), reached.next()) {
        (Some(seat), None) => Some(seat.seat_pos),
        _ => None,
    }
}

fn add_to_pots(pots: &mut Vec<Pot>, amount: Chips, eligible: Vec<usize>) {
    match pots.last_mut() {
        Some(last) if last.eligible == eligible => last.amount += amount,
        _ => pots.push(Pot { amount, eligible }),
    }
}

/// One street dealt during [`advance`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreetDealt {
    pub street: Street,
    pub board_delta: Vec<Card>,
}

/// State after running every street transition that is due.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advance {
    pub state: EngineState,
    pub dealt: Vec<StreetDealt>,
}

impl Advance {
    /// Boundary markers to append to the action log, one per street dealt.
    pub fn markers(&self) -> Vec<ActionEntry> {
        self.dealt
            .iter()
            .map(|d| ActionEntry::Street { street: d.street })
            .collect()
    }
}

/// Progresses streets for as long as the betting round is complete.
///
/// Stops when somebody has to act, when only one seat is left in the hand,
/// or at showdown. When fewer than two seats can act the remaining board is
/// run out street by street.
pub fn advance(
    state: EngineState,
    log: &[ActionEntry],
    deck_seed: u64,
) -> Result<Advance, GameError> {
    let mut state = state;
    let mut dealt: Vec<StreetDealt> = Vec::new();
    while !state.is_hand_over() {
        // after the first transition the log tail is empty
        let since: &[ActionEntry] = if dealt.is_empty() {
            since_street_boundary(log)
        } else {
            &[]
        };
        if !is_betting_round_complete(&state, since) {
            break;
        }
        let progressed = progress_street(&state, deck_seed)?;
        dealt.push(StreetDealt {
            street: progressed.next_state.street,
            board_delta: progressed.board_delta,
        });
        state = progressed.next_state;
    }
    if state.is_hand_over() {
        info!(
            hand_id = state.hand_id,
            street = ?state.street,
            survivor = ?state.sole_survivor(),
            "hand reached its end"
        );
    }
    Ok(Advance { state, dealt })
}
