use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::config::EngineConfig;
use crate::seat::{Chips, Seat};

/// Betting phase of a hand, plus the terminal showdown phase.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Street {
    Preflop,
    Flop,
    Turn,
    River,
    Showdown,
}

impl Street {
    pub fn next(self) -> Option<Street> {
        match self {
            Street::Preflop => Some(Street::Flop),
            Street::Flop => Some(Street::Turn),
            Street::Turn => Some(Street::River),
            Street::River => Some(Street::Showdown),
            Street::Showdown => None,
        }
    }

    /// Community cards revealed when entering this street.
    pub fn cards_revealed(self) -> usize {
        match self {
            Street::Flop => 3,
            Street::Turn | Street::River => 1,
            Street::Preflop | Street::Showdown => 0,
        }
    }

    /// Board size once this street has been dealt.
    pub fn board_len(self) -> usize {
        match self {
            Street::Preflop => 0,
            Street::Flop => 3,
            Street::Turn => 4,
            Street::River | Street::Showdown => 5,
        }
    }
}

/// Chips to be awarded at showdown, scoped to the seats that may win them.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Pot {
    pub amount: Chips,
    pub eligible: Vec<usize>,
}

/// In-memory projection of one hand.
///
/// Always derived from persisted rows (see [`crate::reconstruct`]) and thrown
/// away after the request; never held across requests.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct EngineState {
    pub hand_id: u64,
    pub config: EngineConfig,
    pub street: Street,
    pub dealer_pos: usize,
    pub small_blind_pos: usize,
    pub big_blind_pos: usize,
    /// Seat currently privileged to act.
    pub acting_pos: usize,
    /// Smallest legal raise increment.
    pub min_raise: Chips,
    /// Bet level every acting seat must match this round.
    pub current_bet: Chips,
    pub pots: Vec<Pot>,
    pub board: Vec<Card>,
    /// Dense, indexed by `seat_pos`.
    pub seats: Vec<Seat>,
}

impl EngineState {
    pub fn seat(&self, pos: usize) -> Option<&Seat> {
        self.seats.get(pos)
    }

    /// `Σ seat.bet + Σ pot.amount`: every chip wagered this hand.
    pub fn chips_in_play(&self) -> Chips {
        let bets: Chips = self.seats.iter().map(|s| s.bet).sum();
        let pots: Chips = self.pots.iter().map(|p| p.amount).sum();
        bets + pots
    }

    /// Seats that are in the hand and not all-in.
    pub fn actors(&self) -> impl Iterator<Item = &Seat> {
        self.seats.iter().filter(|s| s.can_act())
    }

    pub fn in_hand_count(&self) -> usize {
        self.seats.iter().filter(|s| s.in_hand).count()
    }

    /// The only seat still contesting the pot once everyone else folded.
    pub fn sole_survivor(&self) -> Option<usize> {
        let mut in_hand = self.seats.iter().filter(|s| s.in_hand);
        match (in_hand.next(), in_hand.next()) {
            (Some(seat), None) => Some(seat.seat_pos),
            _ => None,
        }
    }

    pub fn is_showdown(&self) -> bool {
        self.street == Street::Showdown
    }

    /// Hand is over: either showdown was reached or only one seat is left.
    pub fn is_hand_over(&self) -> bool {
        self.is_showdown() || self.sole_survivor().is_some()
    }
}
