//! Persisted mirrors of a hand. These rows are the durable source of truth;
//! [`EngineState`] is rebuilt from them on every request.

use serde::{Deserialize, Serialize};

use crate::action::ActionEntry;
use crate::cards::Card;
use crate::seat::Chips;
use crate::state::{EngineState, Street};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandStatus {
    Active,
    Complete,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandRow {
    pub hand_id: u64,
    pub room_id: i64,
    /// Bumped on every successful write; writes are conditioned on it.
    pub version: u64,
    pub status: HandStatus,
    pub street: Street,
    pub dealer_pos: usize,
    pub small_blind_pos: usize,
    pub big_blind_pos: usize,
    pub acting_pos: usize,
    pub min_raise: Chips,
    pub current_bet: Chips,
    #[serde(default)]
    pub board: Option<Vec<Card>>,
    pub deck_seed: u64,
    /// RFC3339 time of the last write, stamped by the store.
    #[serde(default)]
    pub updated_at: Option<String>,
    /// Caller-owned data (message ids, turn deadlines); opaque to the engine.
    #[serde(default)]
    pub meta: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct SeatRow {
    pub hand_id: u64,
    pub seat_pos: usize,
    pub user_ref: String,
    pub stack: Chips,
    pub in_hand: bool,
    pub is_all_in: bool,
    pub bet: Chips,
    #[serde(default)]
    pub hole: Option<Vec<Card>>,
}

impl SeatRow {
    /// Copy with the hole cards removed, for viewers other than the owner.
    pub fn redacted(&self) -> Self {
        Self {
            hole: None,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct PotRow {
    pub hand_id: u64,
    pub pot_index: usize,
    pub amount: Chips,
    pub eligible: Vec<usize>,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ActionRow {
    pub hand_id: u64,
    pub seq: u64,
    pub entry: ActionEntry,
}

/// Every row of one hand, as loaded from or written to a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandSnapshot {
    pub hand: HandRow,
    pub seats: Vec<SeatRow>,
    #[serde(default)]
    pub pots: Vec<PotRow>,
    #[serde(default)]
    pub actions: Vec<ActionRow>,
}

impl HandSnapshot {
    pub fn entries(&self) -> Vec<ActionEntry> {
        self.actions.iter().map(|row| row.entry).collect()
    }

    /// Appends log entries with consecutive sequence numbers.
    pub fn append(&mut self, entries: impl IntoIterator<Item = ActionEntry>) {
        let mut seq = self.actions.last().map_or(0, |row| row.seq + 1);
        for entry in entries {
            self.actions.push(ActionRow {
                hand_id: self.hand.hand_id,
                seq,
                entry,
            });
            seq += 1;
        }
    }
}

/// Projects a state back onto rows, the inverse of
/// [`crate::reconstruct::reconstruct_state_from_db`].
pub fn project(
    state: &EngineState,
    room_id: i64,
    deck_seed: u64,
    version: u64,
) -> (HandRow, Vec<SeatRow>, Vec<PotRow>) {
    let hand = HandRow {
        hand_id: state.hand_id,
        room_id,
        version,
        status: HandStatus::Active,
        street: state.street,
        dealer_pos: state.dealer_pos,
        small_blind_pos: state.small_blind_pos,
        big_blind_pos: state.big_blind_pos,
        acting_pos: state.acting_pos,
        min_raise: state.min_raise,
        current_bet: state.current_bet,
        board: Some(state.board.clone()),
        deck_seed,
        updated_at: None,
        meta: None,
    };
    let seats = state
        .seats
        .iter()
        .map(|s| SeatRow {
            hand_id: state.hand_id,
            seat_pos: s.seat_pos,
            user_ref: s.user_ref.clone(),
            stack: s.stack,
            in_hand: s.in_hand,
            is_all_in: s.is_all_in,
            bet: s.bet,
            hole: s.hole.map(|h| h.to_vec()),
        })
        .collect();
    let pots = state
        .pots
        .iter()
        .enumerate()
        .map(|(pot_index, p)| PotRow {
            hand_id: state.hand_id,
            pot_index,
            amount: p.amount,
            eligible: p.eligible.clone(),
        })
        .collect();
    (hand, seats, pots)
}
