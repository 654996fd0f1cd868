//! Showdown: hand ranking behind a narrow capability, and payouts.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::cards::Card;
use crate::errors::GameError;
use crate::hand::{evaluate_hand, HandStrength};
use crate::seat::Chips;
use crate::state::{EngineState, Pot};

/// Hand-ranking capability consumed at showdown.
///
/// The state machine only needs to rank a set of cards and to pick the best
/// ranks, so any evaluator can be plugged in here.
pub trait HandSolver {
    type Rank: Ord + Clone;

    fn solve(&self, cards: &[Card]) -> Self::Rank;

    /// Winning ranks among `ranks`; every rank tied for best by default.
    fn winners(&self, ranks: &[Self::Rank]) -> Vec<Self::Rank> {
        match ranks.iter().max() {
            Some(best) => ranks.iter().filter(|r| *r == best).cloned().collect(),
            None => Vec::new(),
        }
    }
}

/// Built-in solver over hole cards plus board.
#[derive(Debug, Clone, Copy, Default)]
pub struct SevenCardSolver;

impl HandSolver for SevenCardSolver {
    type Rank = HandStrength;

    fn solve(&self, cards: &[Card]) -> HandStrength {
        evaluate_hand(cards)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Award {
    pub seat_pos: usize,
    pub amount: Chips,
}

/// Chips owed to seats at the end of a hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    pub awards: Vec<Award>,
    /// Chips left over by the even split of the main pot.
    pub remainder: Chips,
    /// Side pots that were not distributed.
    pub undistributed: Vec<Pot>,
}

impl Payout {
    pub fn total_awarded(&self) -> Chips {
        self.awards.iter().map(|a| a.amount).sum()
    }

    /// Credits the awards to the seats' stacks. Distributed pots and bets are
    /// cleared; undistributed side pots stay on the state.
    pub fn apply(&self, state: &mut EngineState) {
        for award in &self.awards {
            if let Some(seat) = state.seats.get_mut(award.seat_pos) {
                seat.stack += award.amount;
            }
        }
        for seat in &mut state.seats {
            seat.bet = 0;
        }
        state.pots = self.undistributed.clone();
    }
}

/// Splits the main pot evenly among the best eligible hands.
///
/// Only `pots[0]` is contested. The split uses floor division; what it leaves
/// over is reported in [`Payout::remainder`]. A side pot with a single seat
/// still in the hand among its eligible seats goes to that seat; side pots
/// with two or more contenders are reported in [`Payout::undistributed`].
/// Seats without visible hole cards cannot win the main pot.
///
/// # Errors
///
/// [`GameError::NotAtShowdown`] before the river betting round has closed.
pub fn settle<S: HandSolver>(state: &EngineState, solver: &S) -> Result<Payout, GameError> {
    if !state.is_showdown() {
        return Err(GameError::NotAtShowdown);
    }
    let Some((main, side)) = state.pots.split_first() else {
        return Ok(Payout {
            awards: Vec::new(),
            remainder: 0,
            undistributed: Vec::new(),
        });
    };

    let contenders: Vec<(usize, S::Rank)> = main
        .eligible
        .iter()
        .filter_map(|&pos| {
            let seat = state.seat(pos).filter(|s| s.in_hand)?;
            let hole = seat.hole?;
            let mut cards = state.board.clone();
            cards.extend_from_slice(&hole);
            Some((pos, solver.solve(&cards)))
        })
        .collect();
    let ranks: Vec<S::Rank> = contenders.iter().map(|(_, r)| r.clone()).collect();
    let best = solver.winners(&ranks);
    let winners: Vec<usize> = contenders
        .iter()
        .filter(|(_, r)| best.contains(r))
        .map(|(pos, _)| *pos)
        .collect();

    let (mut awards, remainder) = if winners.is_empty() {
        (Vec::new(), main.amount)
    } else {
        let n = winners.len() as Chips;
        let share = main.amount / n;
        let awards: Vec<Award> = winners
            .iter()
            .map(|&seat_pos| Award {
                seat_pos,
                amount: share,
            })
            .collect();
        (awards, main.amount % n)
    };

    let mut undistributed = Vec::new();
    for pot in side {
        match sole_contender(state, pot) {
            Some(seat_pos) => credit(&mut awards, seat_pos, pot.amount),
            None => undistributed.push(pot.clone()),
        }
    }

    if remainder > 0 || !undistributed.is_empty() {
        warn!(
            hand_id = state.hand_id,
            remainder,
            side_pots = undistributed.len(),
            "main pot paid; remainder and side pots left undistributed"
        );
    }
    info!(hand_id = state.hand_id, winners = ?winners, pot = main.amount, "showdown settled");

    Ok(Payout {
        awards,
        remainder,
        undistributed,
    })
}

fn sole_contender(state: &EngineState, pot: &Pot) -> Option<usize> {
    let mut contenders = pot
        .eligible
        .iter()
        .copied()
        .filter(|&pos| state.seat(pos).is_some_and(|s| s.in_hand));
    match (contenders.next(), contenders.next()) {
        (Some(pos), None) => Some(pos),
        _ => None,
    }
}

fn credit(awards: &mut Vec<Award>, seat_pos: usize, amount: Chips) {
    match awards.iter_mut().find(|a| a.seat_pos == seat_pos) {
        Some(award) => award.amount += amount,
        None => awards.push(Award { seat_pos, amount }),
    }
}

/// Everything on the table goes to the last seat standing, or `None` while
/// two or more seats are still in the hand.
pub fn award_uncontested(state: &EngineState) -> Option<Payout> {
    let seat_pos = state.sole_survivor()?;
    Some(Payout {
        awards: vec![Award {
            seat_pos,
            amount: state.chips_in_play(),
        }],
        remainder: 0,
        undistributed: Vec::new(),
    })
}
