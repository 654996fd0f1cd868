mod helpers;

use holdem_engine::action::{ActionEntry, PlayerAction};
use holdem_engine::betting::apply_action;
use holdem_engine::reconstruct::{reconstruct_state_from_db, ReconstructInput};
use holdem_engine::rows::{project, HandSnapshot, HandStatus};
use holdem_engine::setup::{start_hand, HandSetup};
use holdem_engine::state::{EngineState, Street};
use holdem_engine::street::{advance, progress_street};

use helpers::{config, players};

fn rebuild(snapshot: &HandSnapshot) -> EngineState {
    reconstruct_state_from_db(ReconstructInput {
        config: &config(),
        hand: &snapshot.hand,
        seats: &snapshot.seats,
        pots: &snapshot.pots,
    })
}

fn snapshot_of(state: &EngineState, deck_seed: u64) -> HandSnapshot {
    let (hand, seats, pots) = project(state, 10, deck_seed, 1);
    HandSnapshot {
        hand,
        seats,
        pots,
        actions: Vec::new(),
    }
}

/// Three-handed hand on the flop with a side pot: seat 1 is all-in short.
fn flop_with_side_pot(seed: u64) -> EngineState {
    let start = start_hand(&config(), HandSetup::new(4, players(&[10_000, 600, 10_000]), seed)).unwrap();
    let mut log = start.log();
    let mut st = start.state;
    let mut act = |st: &mut EngineState, action: PlayerAction| {
        let pos = st.acting_pos;
        apply_action(st, pos, action).unwrap();
        log.push(ActionEntry::Act {
            seat_pos: pos,
            action,
        });
    };
    act(&mut st, PlayerAction::Raise { amount: 800 });
    act(&mut st, PlayerAction::AllIn);
    act(&mut st, PlayerAction::Call);
    let adv = advance(st, &log, seed).unwrap();
    assert_eq!(adv.state.street, Street::Flop);
    adv.state
}

#[test]
fn projected_rows_rebuild_the_same_state() {
    let st = flop_with_side_pot(21);
    assert_eq!(st.pots.len(), 2);
    let snap = snapshot_of(&st, 21);
    assert_eq!(snap.hand.status, HandStatus::Active);
    assert_eq!(rebuild(&snap), st);
}

#[test]
fn reconstruction_is_idempotent() {
    let snap = snapshot_of(&flop_with_side_pot(3), 3);
    assert_eq!(rebuild(&snap), rebuild(&snap));
}

#[test]
fn row_order_does_not_matter() {
    let st = flop_with_side_pot(8);
    let mut snap = snapshot_of(&st, 8);
    snap.seats.reverse();
    snap.pots.reverse();
    assert_eq!(rebuild(&snap), st);
}

#[test]
fn missing_board_and_pots_mean_empty() {
    let start = start_hand(&config(), HandSetup::new(1, players(&[10_000; 2]), 1)).unwrap();
    let mut snap = snapshot_of(&start.state, 1);
    snap.hand.board = None;
    snap.pots.clear();
    let st = rebuild(&snap);
    assert!(st.board.is_empty());
    assert!(st.pots.is_empty());
    assert_eq!(st, start.state);
}

#[test]
fn malformed_hole_cards_are_treated_as_hidden() {
    let start = start_hand(&config(), HandSetup::new(1, players(&[10_000; 3]), 1)).unwrap();
    let mut snap = snapshot_of(&start.state, 1);
    snap.seats[0].hole = None;
    snap.seats[1].hole.as_mut().unwrap().pop();
    let st = rebuild(&snap);
    assert_eq!(st.seats[0].hole, None);
    assert_eq!(st.seats[1].hole, None);
    assert_eq!(st.seats[2].hole, start.state.seats[2].hole);
}

#[test]
fn redacted_rows_hide_only_hole_cards() {
    let start = start_hand(&config(), HandSetup::new(1, players(&[10_000; 2]), 1)).unwrap();
    let snap = snapshot_of(&start.state, 1);
    let row = &snap.seats[1];
    let hidden = row.redacted();
    assert_eq!(hidden.hole, None);
    assert_eq!(hidden.stack, row.stack);
    assert_eq!(hidden.bet, row.bet);
    assert_eq!(hidden.user_ref, row.user_ref);
}

#[test]
fn dealing_after_a_rebuild_matches_dealing_without_one() {
    let seed = 55;
    let st = flop_with_side_pot(seed);
    let rebuilt = rebuild(&snapshot_of(&st, seed));
    let live = progress_street(&st, seed).unwrap();
    let again = progress_street(&rebuilt, seed).unwrap();
    assert_eq!(live.board_delta, again.board_delta);
    assert_eq!(live.next_state, again.next_state);
}

#[test]
fn snapshot_log_gets_consecutive_sequence_numbers() {
    let start = start_hand(&config(), HandSetup::new(9, players(&[10_000; 2]), 1)).unwrap();
    let mut snap = snapshot_of(&start.state, 1);
    snap.append(start.log());
    snap.append([ActionEntry::Act {
        seat_pos: 0,
        action: PlayerAction::Call,
    }]);
    let seqs: Vec<_> = snap.actions.iter().map(|a| a.seq).collect();
    assert_eq!(seqs, vec![0, 1, 2]);
    assert!(snap.actions.iter().all(|a| a.hand_id == 9));
    assert_eq!(snap.entries().len(), 3);
}

#[test]
fn snapshot_survives_json() {
    let st = flop_with_side_pot(13);
    let mut snap = snapshot_of(&st, 13);
    snap.hand.meta = Some(serde_json::json!({ "message_id": 42 }));
    let json = serde_json::to_string(&snap).unwrap();
    let back: HandSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(back, snap);
    assert_eq!(rebuild(&back), st);
}
