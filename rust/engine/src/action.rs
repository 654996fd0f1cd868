use serde::{Deserialize, Serialize};

use crate::seat::Chips;
use crate::state::Street;

/// A voluntary action taken by the acting seat.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayerAction {
    Check,
    Call,
    Fold,
    /// Raise by `amount` chips beyond the call amount (an increment, not the
    /// resulting bet level).
    Raise { amount: Chips },
    AllIn,
}

impl PlayerAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            PlayerAction::Check => ActionKind::Check,
            PlayerAction::Call => ActionKind::Call,
            PlayerAction::Fold => ActionKind::Fold,
            PlayerAction::Raise { .. } => ActionKind::Raise,
            PlayerAction::AllIn => ActionKind::AllIn,
        }
    }
}

/// Payload-free tag of [`PlayerAction`], used for the allowed-action set.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionKind {
    Check,
    Call,
    Fold,
    Raise,
    AllIn,
}

/// One entry of a hand's action log.
///
/// Forced bets and street boundaries are logged next to voluntary actions so
/// the round-completion check can tell a posted big blind apart from a big
/// blind that exercised its option.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "entry", rename_all = "snake_case")]
pub enum ActionEntry {
    Blind { seat_pos: usize, amount: Chips },
    Act { seat_pos: usize, action: PlayerAction },
    Street { street: Street },
}

impl ActionEntry {
    /// Seat that took a voluntary action, if this entry is one.
    pub fn actor(&self) -> Option<usize> {
        match self {
            ActionEntry::Act { seat_pos, .. } => Some(*seat_pos),
            _ => None,
        }
    }
}
