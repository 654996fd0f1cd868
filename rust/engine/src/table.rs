//! One request against a room's hand: load rows, rebuild the state, apply a
//! transition, write back under the version the caller last saw.

use tracing::{info, warn};

use crate::action::{ActionEntry, ActionKind, PlayerAction};
use crate::betting::{apply_action, AppliedAction};
use crate::config::{fresh_seed, EngineConfig};
use crate::errors::GameError;
use crate::reconstruct::{reconstruct_state_from_db, ReconstructInput};
use crate::rows::{project, HandSnapshot, HandStatus, SeatRow};
use crate::rules::{compute_allowed_actions, compute_to_call};
use crate::seat::Chips;
use crate::setup::{start_hand, HandEvent, HandSetup};
use crate::showdown::{award_uncontested, settle, HandSolver, Payout, SevenCardSolver};
use crate::state::EngineState;
use crate::store::HandStore;
use crate::street::{advance, StreetDealt};

/// How a hand ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandEnd {
    Uncontested(Payout),
    Showdown(Payout),
}

impl HandEnd {
    pub fn payout(&self) -> &Payout {
        match self {
            HandEnd::Uncontested(p) | HandEnd::Showdown(p) => p,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Started {
    pub state: EngineState,
    pub events: Vec<HandEvent>,
    pub version: u64,
}

#[derive(Debug, Clone)]
pub struct ActOutcome {
    pub applied: AppliedAction,
    /// Streets dealt after the action, in order.
    pub dealt: Vec<StreetDealt>,
    pub ending: Option<HandEnd>,
    pub state: EngineState,
    pub version: u64,
}

/// What a viewer may see of the current hand.
#[derive(Debug, Clone)]
pub struct TableView {
    pub state: EngineState,
    pub version: u64,
    pub allowed: Vec<ActionKind>,
    pub to_call: Chips,
}

pub struct Table<S, V = SevenCardSolver> {
    store: S,
    solver: V,
}

impl<S: HandStore> Table<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            solver: SevenCardSolver,
        }
    }
}

impl<S: HandStore, V: HandSolver> Table<S, V> {
    pub fn with_solver(store: S, solver: V) -> Self {
        Self { store, solver }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Starts a hand in `room_id`; the button moves on from the room's
    /// previous hand.
    pub fn start(
        &mut self,
        room_id: i64,
        config: &EngineConfig,
        players: Vec<(String, Chips)>,
    ) -> Result<Started, GameError> {
        if self.store.load_active(room_id)?.is_some() {
            return Err(GameError::HandInProgress { room_id });
        }
        let previous_dealer = self.store.load_latest(room_id)?.map(|s| s.hand.dealer_pos);
        let hand_id = self.store.next_hand_id();
        let deck_seed = config.deck_seed_for(hand_id).unwrap_or_else(fresh_seed);

        let mut setup = HandSetup::new(hand_id, players, deck_seed);
        if let Some(prev) = previous_dealer {
            setup = setup.after_dealer(prev);
        }
        let start = start_hand(config, setup)?;

        let (hand, seats, pots) = project(&start.state, room_id, deck_seed, 0);
        let mut snapshot = HandSnapshot {
            hand,
            seats,
            pots,
            actions: Vec::new(),
        };
        snapshot.append(start.log());
        let version = self.store.insert(snapshot)?;

        Ok(Started {
            state: start.state,
            events: start.events,
            version,
        })
    }

    /// Current hand as `viewer` may see it: other seats' hole cards are
    /// removed before the state is rebuilt. `None` shows nobody's cards.
    pub fn view(
        &self,
        room_id: i64,
        config: &EngineConfig,
        viewer: Option<&str>,
    ) -> Result<TableView, GameError> {
        let snapshot = self.load(room_id)?;
        let seats: Vec<SeatRow> = snapshot
            .seats
            .iter()
            .map(|row| {
                if Some(row.user_ref.as_str()) == viewer {
                    row.clone()
                } else {
                    row.redacted()
                }
            })
            .collect();
        let state = reconstruct_state_from_db(ReconstructInput {
            config,
            hand: &snapshot.hand,
            seats: &seats,
            pots: &snapshot.pots,
        });
        let allowed = compute_allowed_actions(&state, state.acting_pos);
        let to_call = compute_to_call(&state, state.acting_pos);
        Ok(TableView {
            state,
            version: snapshot.hand.version,
            allowed,
            to_call,
        })
    }

    /// Applies `action` for `user_ref`, provided the hand is still at
    /// `seen_version`.
    pub fn act(
        &mut self,
        room_id: i64,
        config: &EngineConfig,
        seen_version: u64,
        user_ref: &str,
        action: PlayerAction,
    ) -> Result<ActOutcome, GameError> {
        let snapshot = self.load_at(room_id, seen_version)?;
        let state = rebuild(config, &snapshot);
        let pos = state
            .seats
            .iter()
            .position(|s| s.user_ref == user_ref)
            .ok_or_else(|| GameError::UserNotSeated(user_ref.to_string()))?;
        self.step(snapshot, state, pos, action)
    }

    /// Acts for the seat whose turn clock ran out: a check when that is free,
    /// a fold otherwise.
    pub fn expire_turn(
        &mut self,
        room_id: i64,
        config: &EngineConfig,
        seen_version: u64,
    ) -> Result<ActOutcome, GameError> {
        let snapshot = self.load_at(room_id, seen_version)?;
        let state = rebuild(config, &snapshot);
        let pos = state.acting_pos;
        let action = if compute_allowed_actions(&state, pos).contains(&ActionKind::Check) {
            PlayerAction::Check
        } else {
            PlayerAction::Fold
        };
        info!(room_id, seat_pos = pos, action = ?action, "turn expired");
        self.step(snapshot, state, pos, action)
    }

    fn load(&self, room_id: i64) -> Result<HandSnapshot, GameError> {
        self.store
            .load_active(room_id)?
            .ok_or(GameError::NoActiveHand { room_id })
    }

    fn load_at(&self, room_id: i64, seen_version: u64) -> Result<HandSnapshot, GameError> {
        let snapshot = self.load(room_id)?;
        if snapshot.hand.version != seen_version {
            warn!(
                room_id,
                seen_version,
                found = snapshot.hand.version,
                "stale action rejected"
            );
            return Err(GameError::ConcurrencyConflict {
                expected: seen_version,
                found: snapshot.hand.version,
            });
        }
        Ok(snapshot)
    }

    fn step(
        &mut self,
        mut snapshot: HandSnapshot,
        mut state: EngineState,
        pos: usize,
        action: PlayerAction,
    ) -> Result<ActOutcome, GameError> {
        let room_id = snapshot.hand.room_id;
        let deck_seed = snapshot.hand.deck_seed;
        let expected = snapshot.hand.version;

        let applied = apply_action(&mut state, pos, action).inspect_err(|e| {
            warn!(room_id, seat_pos = pos, action = ?action, error = %e, "action rejected");
        })?;
        snapshot.append([ActionEntry::Act {
            seat_pos: pos,
            action: applied.action,
        }]);

        let advanced = advance(state, &snapshot.entries(), deck_seed)?;
        snapshot.append(advanced.markers());
        let mut state = advanced.state;

        let ending = if let Some(payout) = award_uncontested(&state) {
            payout.apply(&mut state);
            Some(HandEnd::Uncontested(payout))
        } else if state.is_showdown() {
            let payout = settle(&state, &self.solver)?;
            payout.apply(&mut state);
            Some(HandEnd::Showdown(payout))
        } else {
            None
        };

        let (mut hand, seats, pots) = project(&state, room_id, deck_seed, expected);
        hand.meta = snapshot.hand.meta.take();
        if ending.is_some() {
            hand.status = HandStatus::Complete;
        }
        snapshot.hand = hand;
        snapshot.seats = seats;
        snapshot.pots = pots;
        let version = self.store.save(snapshot, expected)?;

        Ok(ActOutcome {
            applied,
            dealt: advanced.dealt,
            ending,
            state,
            version,
        })
    }
}

fn rebuild(config: &EngineConfig, snapshot: &HandSnapshot) -> EngineState {
    reconstruct_state_from_db(ReconstructInput {
        config,
        hand: &snapshot.hand,
        seats: &snapshot.seats,
        pots: &snapshot.pots,
    })
}
