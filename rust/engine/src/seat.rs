use serde::{Deserialize, Serialize};

use crate::cards::Card;

/// Chip amounts. Stacks, bets and pots all use this unit.
pub type Chips = u64;

/// One table position for the duration of a hand.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Seat {
    /// Dense, table-relative index (0-based).
    pub seat_pos: usize,
    /// Opaque player identity owned by the caller.
    pub user_ref: String,
    /// Chips not yet wagered this hand.
    pub stack: Chips,
    /// Still contesting the pot.
    pub in_hand: bool,
    pub is_all_in: bool,
    /// Chips committed in the current betting round only.
    pub bet: Chips,
    /// Private cards. `None` before dealing or when redacted for a viewer.
    pub hole: Option<[Card; 2]>,
}

impl Seat {
    pub fn new(seat_pos: usize, user_ref: impl Into<String>, stack: Chips) -> Self {
        Self {
            seat_pos,
            user_ref: user_ref.into(),
            stack,
            in_hand: true,
            is_all_in: false,
            bet: 0,
            hole: None,
        }
    }

    /// In the hand and still holding chips to act with.
    pub fn can_act(&self) -> bool {
        self.in_hand && !self.is_all_in
    }

    /// Moves up to `amount` from the stack into the current bet and returns
    /// what was actually moved. Emptying the stack marks the seat all-in.
    pub fn commit(&mut self, amount: Chips) -> Chips {
        let moved = amount.min(self.stack);
        self.stack -= moved;
        self.bet += moved;
        if self.stack == 0 {
            self.is_all_in = true;
        }
        moved
    }
}
