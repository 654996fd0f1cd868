use thiserror::Error;

use crate::action::ActionKind;
use crate::seat::Chips;

/// Every expected failure the engine and its table layer report.
///
/// None of these are fatal to the host: invalid actions are re-offered to the
/// player, a missing hand means "no active hand", and a conflict means the
/// caller should re-fetch and re-render.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("It's not seat {actual}'s turn (expected seat {expected})")]
    NotYourTurn { expected: usize, actual: usize },
    #[error("Action {action:?} is not allowed (allowed: {allowed:?})")]
    ActionNotAllowed {
        action: ActionKind,
        allowed: Vec<ActionKind>,
    },
    #[error("Raise of {amount} is below the minimum raise of {minimum}")]
    RaiseTooSmall { amount: Chips, minimum: Chips },
    #[error("Seat {0} is not part of this hand")]
    SeatNotFound(usize),
    #[error("No user {0} seated in this hand")]
    UserNotSeated(String),

    #[error("No active hand for room {room_id}")]
    NoActiveHand { room_id: i64 },
    #[error("Hand state changed (expected version {expected}, found {found}), please refresh")]
    ConcurrencyConflict { expected: u64, found: u64 },
    #[error("Room {room_id} already has an active hand")]
    HandInProgress { room_id: i64 },

    #[error("At least two players are required to start a hand, got {0}")]
    NotEnoughPlayers(usize),
    #[error("Table allows at most {max} players, got {actual}")]
    TooManyPlayers { max: usize, actual: usize },
    #[error("Seat {seat_pos} has no chips")]
    EmptyStack { seat_pos: usize },
    #[error("Hand already complete")]
    HandComplete,
    #[error("Hand has not reached showdown")]
    NotAtShowdown,
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Invalid card: {0:?}")]
    InvalidCard(String),
    #[error("Deck exhausted")]
    DeckExhausted,
}

impl GameError {
    /// Wrong turn, illegal action or undersized raise: the acting user gets the
    /// current legal actions offered again.
    pub fn is_invalid_action(&self) -> bool {
        matches!(
            self,
            GameError::NotYourTurn { .. }
                | GameError::ActionNotAllowed { .. }
                | GameError::RaiseTooSmall { .. }
                | GameError::SeatNotFound(_)
                | GameError::UserNotSeated(_)
        )
    }
}
