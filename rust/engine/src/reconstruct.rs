use crate::config::EngineConfig;
use crate::rows::{HandRow, PotRow, SeatRow};
use crate::seat::Seat;
use crate::state::{EngineState, Pot};

/// Borrowed persisted rows of one hand.
#[derive(Debug, Clone, Copy)]
pub struct ReconstructInput<'a> {
    pub config: &'a EngineConfig,
    pub hand: &'a HandRow,
    pub seats: &'a [SeatRow],
    pub pots: &'a [PotRow],
}

/// Rebuilds the in-memory state from persisted rows.
///
/// Pure and idempotent. Empty pots mean no pots yet, an absent board means an
/// empty board, and hole cards that are missing or not exactly two cards are
/// treated as hidden. Seat and pot rows may arrive in any order.
pub fn reconstruct_state_from_db(input: ReconstructInput<'_>) -> EngineState {
    let mut seat_rows: Vec<&SeatRow> = input.seats.iter().collect();
    seat_rows.sort_by_key(|row| row.seat_pos);
    let seats = seat_rows
        .into_iter()
        .map(|row| Seat {
            seat_pos: row.seat_pos,
            user_ref: row.user_ref.clone(),
            stack: row.stack,
            in_hand: row.in_hand,
            is_all_in: row.is_all_in,
            bet: row.bet,
            hole: match row.hole.as_deref() {
                Some(&[a, b]) => Some([a, b]),
                _ => None,
            },
        })
        .collect();

    let mut pot_rows: Vec<&PotRow> = input.pots.iter().collect();
    pot_rows.sort_by_key(|row| row.pot_index);
    let pots = pot_rows
        .into_iter()
        .map(|row| Pot {
            amount: row.amount,
            eligible: row.eligible.clone(),
        })
        .collect();

    let hand = input.hand;
    EngineState {
        hand_id: hand.hand_id,
        config: input.config.clone(),
        street: hand.street,
        dealer_pos: hand.dealer_pos,
        small_blind_pos: hand.small_blind_pos,
        big_blind_pos: hand.big_blind_pos,
        acting_pos: hand.acting_pos,
        min_raise: hand.min_raise,
        current_bet: hand.current_bet,
        pots,
        board: hand.board.clone().unwrap_or_default(),
        seats,
    }
}
