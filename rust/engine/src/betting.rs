use tracing::debug;

use crate::action::PlayerAction;
use crate::errors::GameError;
use crate::positions::next_actor_after;
use crate::rules::{validate_action, ValidatedAction};
use crate::seat::Chips;
use crate::state::EngineState;

/// What a successful [`apply_action`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedAction {
    pub seat_pos: usize,
    /// The action as applied; short calls and stack-sized raises become `AllIn`.
    pub action: PlayerAction,
    /// Chips moved from the seat's stack into its bet.
    pub chips_moved: Chips,
    pub acting_pos: usize,
}

/// Validates and applies one action for `pos`.
///
/// On error the state is left untouched. On success the seat's chips move
/// from stack to bet, the bet level and minimum raise follow any raise, and
/// `acting_pos` advances to the next seat that can act. When nobody can act
/// any more, `acting_pos` stays on the last seat that could; callers detect the
/// end of the round or hand separately.
pub fn apply_action(
    state: &mut EngineState,
    pos: usize,
    action: PlayerAction,
) -> Result<AppliedAction, GameError> {
    let validated = validate_action(state, pos, action)?;
    let before = state.current_bet;

    let seat = &mut state.seats[pos];
    let chips_moved = match validated {
        ValidatedAction::Check => 0,
        ValidatedAction::Fold => {
            seat.in_hand = false;
            0
        }
        ValidatedAction::Call(c) | ValidatedAction::AllIn(c) => seat.commit(c),
        ValidatedAction::Raise { .. } => seat.commit(validated.chips()),
    };
    let new_bet = seat.bet;

    match validated {
        ValidatedAction::Raise { increment, .. } => {
            state.current_bet = new_bet;
            state.min_raise = state.min_raise.max(increment);
        }
        ValidatedAction::AllIn(_) if new_bet > before => {
            state.current_bet = new_bet;
            state.min_raise = state.min_raise.max(new_bet - before);
        }
        _ => {}
    }

    if let Some(next) = next_actor_after(&state.seats, pos) {
        state.acting_pos = next;
    } else if let Some(last) = state.actors().last() {
        state.acting_pos = last.seat_pos;
    }

    debug!(
        hand_id = state.hand_id,
        seat_pos = pos,
        action = ?validated.as_action(),
        chips_moved,
        current_bet = state.current_bet,
        acting_pos = state.acting_pos,
        "action applied"
    );

    Ok(AppliedAction {
        seat_pos: pos,
        action: validated.as_action(),
        chips_moved,
        acting_pos: state.acting_pos,
    })
}
