//! Hand-built states for tests that need a precise table situation rather
//! than one produced by `start_hand`.
#![allow(dead_code)]

use holdem_engine::config::EngineConfig;
use holdem_engine::seat::{Chips, Seat};
use holdem_engine::state::{EngineState, Street};

pub fn config() -> EngineConfig {
    EngineConfig::new(100, 200, 9)
}

pub fn seat(pos: usize, stack: Chips, bet: Chips) -> Seat {
    let mut s = Seat::new(pos, format!("user-{pos}"), stack);
    s.bet = bet;
    s
}

pub fn all_in(pos: usize, bet: Chips) -> Seat {
    let mut s = seat(pos, 0, bet);
    s.is_all_in = true;
    s
}

pub fn folded(pos: usize, stack: Chips, bet: Chips) -> Seat {
    let mut s = seat(pos, stack, bet);
    s.in_hand = false;
    s
}

/// Preflop state with dealer at seat 0, blinds at 1 and 2 (or 0 and 1
/// heads-up) and no pots yet.
pub fn state(seats: Vec<Seat>, current_bet: Chips, acting_pos: usize) -> EngineState {
    let heads_up = seats.len() == 2;
    EngineState {
        hand_id: 1,
        config: config(),
        street: Street::Preflop,
        dealer_pos: 0,
        small_blind_pos: if heads_up { 0 } else { 1 },
        big_blind_pos: if heads_up { 1 } else { 2 },
        acting_pos,
        min_raise: 200,
        current_bet,
        pots: Vec::new(),
        board: Vec::new(),
        seats,
    }
}

/// Two seats, SB=100/BB=200: seat0 bet=0 stack=10000, seat1 bet=200
/// stack=10000, seat0 to act.
pub fn heads_up_facing_big_blind() -> EngineState {
    state(vec![seat(0, 10_000, 0), seat(1, 10_000, 200)], 200, 0)
}

pub fn players(stacks: &[Chips]) -> Vec<(String, Chips)> {
    stacks
        .iter()
        .enumerate()
        .map(|(i, &s)| (format!("user-{i}"), s))
        .collect()
}
