use crate::action::{ActionKind, PlayerAction};
use crate::errors::GameError;
use crate::seat::Chips;
use crate::state::EngineState;

/// Chips `pos` must add to match the current bet. Unknown seats owe nothing.
pub fn compute_to_call(state: &EngineState, pos: usize) -> Chips {
    state
        .seat(pos)
        .map_or(0, |seat| state.current_bet.saturating_sub(seat.bet))
}

/// Legal actions for `pos`, in `Check, Call, Fold, Raise, AllIn` order.
///
/// Empty for folded, all-in or unknown seats. `Check` and `Call` are
/// mutually exclusive.
///
/// ```
/// use holdem_engine::action::ActionKind;
/// use holdem_engine::config::EngineConfig;
/// use holdem_engine::rules::compute_allowed_actions;
/// use holdem_engine::setup::{start_hand, HandSetup};
///
/// let start = start_hand(
///     &EngineConfig::new(100, 200, 6),
///     HandSetup::new(1, vec![("a".into(), 10_000), ("b".into(), 10_000)], 7),
/// )
/// .unwrap();
/// let allowed = compute_allowed_actions(&start.state, start.state.acting_pos);
/// assert!(allowed.contains(&ActionKind::Call));
/// assert!(!allowed.contains(&ActionKind::Check));
/// ```
pub fn compute_allowed_actions(state: &EngineState, pos: usize) -> Vec<ActionKind> {
    let Some(seat) = state.seat(pos) else {
        return Vec::new();
    };
    if !seat.can_act() {
        return Vec::new();
    }
    let to_call = compute_to_call(state, pos);
    let mut allowed = Vec::with_capacity(4);
    if to_call == 0 {
        allowed.push(ActionKind::Check);
    } else {
        allowed.push(ActionKind::Call);
    }
    allowed.push(ActionKind::Fold);
    if seat.stack > to_call {
        allowed.push(ActionKind::Raise);
    }
    if seat.stack > 0 {
        allowed.push(ActionKind::AllIn);
    }
    allowed
}

/// Smallest total bet a raise from `pos` can reach, capped by the seat's
/// chips. `None` when the seat cannot raise.
pub fn min_raise_to(state: &EngineState, pos: usize) -> Option<Chips> {
    if !compute_allowed_actions(state, pos).contains(&ActionKind::Raise) {
        return None;
    }
    let seat = state.seat(pos)?;
    let full = state.current_bet + state.min_raise;
    Some(full.min(seat.bet + seat.stack))
}

/// An action after validation, with the chips it will move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidatedAction {
    Check,
    Fold,
    Call(Chips),
    /// Commits `to_call + increment`.
    Raise { to_call: Chips, increment: Chips },
    AllIn(Chips),
}

impl ValidatedAction {
    pub fn chips(&self) -> Chips {
        match *self {
            ValidatedAction::Check | ValidatedAction::Fold => 0,
            ValidatedAction::Call(c) | ValidatedAction::AllIn(c) => c,
            ValidatedAction::Raise { to_call, increment } => to_call + increment,
        }
    }

    pub fn as_action(&self) -> PlayerAction {
        match *self {
            ValidatedAction::Check => PlayerAction::Check,
            ValidatedAction::Fold => PlayerAction::Fold,
            ValidatedAction::Call(_) => PlayerAction::Call,
            ValidatedAction::Raise { increment, .. } => PlayerAction::Raise { amount: increment },
            ValidatedAction::AllIn(_) => PlayerAction::AllIn,
        }
    }
}

/// Checks turn order and legality of `action` for `pos`.
///
/// A call that would take the whole stack, and a raise whose `to_call +
/// amount` reaches the stack, are normalized to [`ValidatedAction::AllIn`];
/// an under-minimum raise that does not is rejected.
///
/// # Errors
///
/// - [`GameError::SeatNotFound`] for a position outside the seat vector
/// - [`GameError::HandComplete`] at showdown or once one seat is left
/// - [`GameError::NotYourTurn`] when `pos` is not the acting seat
/// - [`GameError::ActionNotAllowed`] when the action is not in the legal set
/// - [`GameError::RaiseTooSmall`] when the increment is below `min_raise`
pub fn validate_action(
    state: &EngineState,
    pos: usize,
    action: PlayerAction,
) -> Result<ValidatedAction, GameError> {
    let seat = state.seat(pos).ok_or(GameError::SeatNotFound(pos))?;
    if state.is_hand_over() {
        return Err(GameError::HandComplete);
    }
    if pos != state.acting_pos {
        return Err(GameError::NotYourTurn {
            expected: state.acting_pos,
            actual: pos,
        });
    }
    let allowed = compute_allowed_actions(state, pos);
    if !allowed.contains(&action.kind()) {
        return Err(GameError::ActionNotAllowed {
            action: action.kind(),
            allowed,
        });
    }

    let stack = seat.stack;
    let to_call = compute_to_call(state, pos);
    match action {
        PlayerAction::Check => Ok(ValidatedAction::Check),
        PlayerAction::Fold => Ok(ValidatedAction::Fold),
        PlayerAction::Call => {
            if stack <= to_call {
                Ok(ValidatedAction::AllIn(stack))
            } else {
                Ok(ValidatedAction::Call(to_call))
            }
        }
        PlayerAction::Raise { amount } => {
            if to_call.saturating_add(amount) >= stack {
                Ok(ValidatedAction::AllIn(stack))
            } else if amount < state.min_raise {
                Err(GameError::RaiseTooSmall {
                    amount,
                    minimum: state.min_raise,
                })
            } else {
                Ok(ValidatedAction::Raise {
                    to_call,
                    increment: amount,
                })
            }
        }
        PlayerAction::AllIn => Ok(ValidatedAction::AllIn(stack)),
    }
}
