//! # holdem-engine: No-Limit Hold'em Hand Engine
//!
//! A deterministic, side-effect-free state machine for one hand of poker,
//! from blinds and hole cards through showdown. The state is a disposable
//! projection of persisted rows: every request rebuilds it, applies one
//! transition, and hands the result back to be written.
//!
//! ## Core Modules
//!
//! - [`state`] - Street, Pot and EngineState
//! - [`reconstruct`] - Rebuilding EngineState from hand/seat/pot rows
//! - [`rules`] - Legal actions and the amount to call
//! - [`betting`] - Applying a validated action
//! - [`round`] - Betting-round completion
//! - [`street`] - Dealing the next street and sweeping bets into pots
//! - [`setup`] - Dealer, blinds and hole cards for a new hand
//! - [`showdown`] - Pluggable hand ranking and payouts
//! - [`store`] - Versioned persistence seam and an in-memory store
//! - [`table`] - Load, apply and save under optimistic concurrency
//! - [`config`] - Stakes and table size, layered from file and env
//!
//! ## Quick Start
//!
//! ```rust
//! use holdem_engine::action::{ActionEntry, PlayerAction};
//! use holdem_engine::betting::apply_action;
//! use holdem_engine::config::EngineConfig;
//! use holdem_engine::round::is_betting_round_complete;
//! use holdem_engine::setup::{start_hand, HandSetup};
//! use holdem_engine::state::Street;
//! use holdem_engine::street::progress_street;
//!
//! let config = EngineConfig::new(100, 200, 6);
//! let players = vec![("alice".to_string(), 10_000), ("bob".to_string(), 10_000)];
//! let start = start_hand(&config, HandSetup::new(1, players, 42)).unwrap();
//! let mut log = start.log();
//! let mut state = start.state;
//!
//! // heads-up: the dealer posts the small blind and acts first
//! let sb = state.acting_pos;
//! apply_action(&mut state, sb, PlayerAction::Call).unwrap();
//! log.push(ActionEntry::Act { seat_pos: sb, action: PlayerAction::Call });
//! assert!(!is_betting_round_complete(&state, &log));
//!
//! let bb = state.acting_pos;
//! apply_action(&mut state, bb, PlayerAction::Check).unwrap();
//! log.push(ActionEntry::Act { seat_pos: bb, action: PlayerAction::Check });
//! assert!(is_betting_round_complete(&state, &log));
//!
//! let flop = progress_street(&state, 42).unwrap();
//! assert_eq!(flop.next_state.street, Street::Flop);
//! assert_eq!(flop.board_delta.len(), 3);
//! ```

pub mod action;
pub mod betting;
pub mod cards;
pub mod config;
pub mod deck;
pub mod errors;
pub mod hand;
pub mod logging;
pub mod positions;
pub mod reconstruct;
pub mod round;
pub mod rows;
pub mod rules;
pub mod seat;
pub mod setup;
pub mod showdown;
pub mod state;
pub mod store;
pub mod street;
pub mod table;
