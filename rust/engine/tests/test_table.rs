use holdem_engine::action::{ActionEntry, ActionKind, PlayerAction};
use holdem_engine::config::EngineConfig;
use holdem_engine::errors::GameError;
use holdem_engine::rows::HandStatus;
use holdem_engine::setup::HandEvent;
use holdem_engine::state::Street;
use holdem_engine::store::{HandStore, MemoryStore};
use holdem_engine::table::{ActOutcome, HandEnd, Table};

const ROOM: i64 = 1;

fn config() -> EngineConfig {
    EngineConfig::new(100, 200, 9).with_seed(2024)
}

fn heads_up() -> Vec<(String, u64)> {
    vec![("alice".to_string(), 10_000), ("bob".to_string(), 10_000)]
}

fn table() -> Table<MemoryStore> {
    Table::new(MemoryStore::new())
}

/// Plays check/call for whoever is to act until the hand ends.
fn check_down(t: &mut Table<MemoryStore>, cfg: &EngineConfig) -> ActOutcome {
    for _ in 0..20 {
        let view = t.view(ROOM, cfg, None).unwrap();
        let user = view.state.seats[view.state.acting_pos].user_ref.clone();
        let action = if view.allowed.contains(&ActionKind::Check) {
            PlayerAction::Check
        } else {
            PlayerAction::Call
        };
        let out = t.act(ROOM, cfg, view.version, &user, action).unwrap();
        if out.ending.is_some() {
            return out;
        }
    }
    panic!("hand did not finish");
}

#[test]
fn start_stores_the_hand_at_version_one() {
    let cfg = config();
    let mut t = table();
    let started = t.start(ROOM, &cfg, heads_up()).unwrap();
    assert_eq!(started.version, 1);
    assert_eq!(started.state.acting_pos, 0);

    let snap = t.store().load_active(ROOM).unwrap().unwrap();
    assert_eq!(snap.hand.version, 1);
    assert_eq!(snap.hand.status, HandStatus::Active);
    assert_eq!(snap.hand.deck_seed, cfg.deck_seed_for(snap.hand.hand_id).unwrap());
    assert!(snap.hand.updated_at.is_some());
    assert_eq!(snap.entries().len(), 2);

    let private: Vec<_> = started
        .events
        .iter()
        .filter_map(|e| e.recipient())
        .collect();
    assert_eq!(private, vec![1, 0]);
}

#[test]
fn view_hides_other_players_cards() {
    let cfg = config();
    let mut t = table();
    t.start(ROOM, &cfg, heads_up()).unwrap();

    let alice = t.view(ROOM, &cfg, Some("alice")).unwrap();
    assert!(alice.state.seats[0].hole.is_some());
    assert!(alice.state.seats[1].hole.is_none());
    assert_eq!(alice.to_call, 100);
    assert_eq!(
        alice.allowed,
        vec![ActionKind::Call, ActionKind::Fold, ActionKind::Raise, ActionKind::AllIn]
    );

    let spectator = t.view(ROOM, &cfg, None).unwrap();
    assert!(spectator.state.seats.iter().all(|s| s.hole.is_none()));
}

#[test]
fn hand_plays_through_to_showdown() {
    let cfg = config();
    let mut t = table();
    t.start(ROOM, &cfg, heads_up()).unwrap();

    let limp = t.act(ROOM, &cfg, 1, "alice", PlayerAction::Call).unwrap();
    assert_eq!(limp.version, 2);
    assert!(limp.dealt.is_empty());
    assert!(limp.ending.is_none());

    let option = t.act(ROOM, &cfg, 2, "bob", PlayerAction::Check).unwrap();
    assert_eq!(option.version, 3);
    assert_eq!(option.dealt.len(), 1);
    assert_eq!(option.dealt[0].street, Street::Flop);
    assert_eq!(option.state.acting_pos, 1);

    let last = check_down(&mut t, &cfg);
    let Some(HandEnd::Showdown(payout)) = &last.ending else {
        panic!("expected a showdown, got {:?}", last.ending);
    };
    assert_eq!(payout.total_awarded() + payout.remainder, 400);
    assert_eq!(last.state.street, Street::Showdown);
    assert_eq!(last.state.board.len(), 5);

    let stacks: u64 = last.state.seats.iter().map(|s| s.stack).sum();
    assert_eq!(stacks, 20_000);

    let snap = t.store().load_latest(ROOM).unwrap().unwrap();
    assert_eq!(snap.hand.status, HandStatus::Complete);
    assert_eq!(snap.hand.version, last.version);
    assert!(t.store().load_active(ROOM).unwrap().is_none());
    assert_eq!(
        t.view(ROOM, &cfg, None).unwrap_err(),
        GameError::NoActiveHand { room_id: ROOM }
    );
}

#[test]
fn action_log_records_blinds_actions_and_streets_in_order() {
    let cfg = config();
    let mut t = table();
    t.start(ROOM, &cfg, heads_up()).unwrap();
    t.act(ROOM, &cfg, 1, "alice", PlayerAction::Call).unwrap();
    t.act(ROOM, &cfg, 2, "bob", PlayerAction::Check).unwrap();

    let snap = t.store().load_active(ROOM).unwrap().unwrap();
    assert_eq!(
        snap.entries(),
        vec![
            ActionEntry::Blind {
                seat_pos: 0,
                amount: 100
            },
            ActionEntry::Blind {
                seat_pos: 1,
                amount: 200
            },
            ActionEntry::Act {
                seat_pos: 0,
                action: PlayerAction::Call
            },
            ActionEntry::Act {
                seat_pos: 1,
                action: PlayerAction::Check
            },
            ActionEntry::Street {
                street: Street::Flop
            },
        ]
    );
    let seqs: Vec<_> = snap.actions.iter().map(|a| a.seq).collect();
    assert_eq!(seqs, vec![0, 1, 2, 3, 4]);
}

#[test]
fn stale_version_is_a_conflict() {
    let cfg = config();
    let mut t = table();
    t.start(ROOM, &cfg, heads_up()).unwrap();
    t.act(ROOM, &cfg, 1, "alice", PlayerAction::Call).unwrap();

    // bob rendered the table before alice acted
    let err = t
        .act(ROOM, &cfg, 1, "bob", PlayerAction::Check)
        .unwrap_err();
    assert_eq!(
        err,
        GameError::ConcurrencyConflict {
            expected: 1,
            found: 2
        }
    );
    assert_eq!(t.store().load_active(ROOM).unwrap().unwrap().hand.version, 2);
}

#[test]
fn store_rejects_a_write_against_an_old_version() {
    let cfg = config();
    let mut t = table();
    t.start(ROOM, &cfg, heads_up()).unwrap();
    let snap = t.store().load_active(ROOM).unwrap().unwrap();

    assert_eq!(t.store_mut().save(snap.clone(), 1).unwrap(), 2);
    assert_eq!(
        t.store_mut().save(snap, 1).unwrap_err(),
        GameError::ConcurrencyConflict {
            expected: 1,
            found: 2
        }
    );
}

#[test]
fn rejected_actions_leave_the_hand_untouched() {
    let cfg = config();
    let mut t = table();
    t.start(ROOM, &cfg, heads_up()).unwrap();
    let before = t.store().load_active(ROOM).unwrap().unwrap();

    let err = t.act(ROOM, &cfg, 1, "bob", PlayerAction::Check).unwrap_err();
    assert_eq!(
        err,
        GameError::NotYourTurn {
            expected: 0,
            actual: 1
        }
    );
    assert!(err.is_invalid_action());

    let err = t.act(ROOM, &cfg, 1, "alice", PlayerAction::Check).unwrap_err();
    assert!(matches!(err, GameError::ActionNotAllowed { .. }));

    let err = t.act(ROOM, &cfg, 1, "carol", PlayerAction::Call).unwrap_err();
    assert_eq!(err, GameError::UserNotSeated("carol".to_string()));

    assert_eq!(t.store().load_active(ROOM).unwrap().unwrap(), before);
}

#[test]
fn unknown_room_has_no_active_hand() {
    let cfg = config();
    let mut t = table();
    assert_eq!(
        t.act(99, &cfg, 1, "alice", PlayerAction::Call).unwrap_err(),
        GameError::NoActiveHand { room_id: 99 }
    );
    assert_eq!(
        t.expire_turn(99, &cfg, 1).unwrap_err(),
        GameError::NoActiveHand { room_id: 99 }
    );
}

#[test]
fn only_one_active_hand_per_room() {
    let cfg = config();
    let mut t = table();
    t.start(ROOM, &cfg, heads_up()).unwrap();
    assert_eq!(
        t.start(ROOM, &cfg, heads_up()).unwrap_err(),
        GameError::HandInProgress { room_id: ROOM }
    );
    // other rooms are independent
    let other = t.start(2, &cfg, heads_up()).unwrap();
    assert_eq!(other.version, 1);
}

#[test]
fn fold_ends_the_hand_and_the_button_moves() {
    let cfg = config();
    let mut t = table();
    t.start(ROOM, &cfg, heads_up()).unwrap();

    let out = t.act(ROOM, &cfg, 1, "alice", PlayerAction::Fold).unwrap();
    let Some(HandEnd::Uncontested(payout)) = &out.ending else {
        panic!("expected an uncontested end, got {:?}", out.ending);
    };
    assert_eq!(payout.awards[0].seat_pos, 1);
    assert_eq!(payout.awards[0].amount, 300);
    assert_eq!(out.state.seats[0].stack, 9_900);
    assert_eq!(out.state.seats[1].stack, 10_100);
    assert!(out.dealt.is_empty());

    let players = out
        .state
        .seats
        .iter()
        .map(|s| (s.user_ref.clone(), s.stack))
        .collect();
    let next = t.start(ROOM, &cfg, players).unwrap();
    assert_eq!(next.state.hand_id, 2);
    assert!(matches!(
        next.events[0],
        HandEvent::HandStarted {
            dealer_pos: 1,
            small_blind_pos: 1,
            big_blind_pos: 0,
            ..
        }
    ));
    assert_eq!(next.state.acting_pos, 1);
}

#[test]
fn expired_turn_folds_when_facing_a_bet() {
    let cfg = config();
    let mut t = table();
    t.start(ROOM, &cfg, heads_up()).unwrap();

    let out = t.expire_turn(ROOM, &cfg, 1).unwrap();
    assert_eq!(out.applied.action, PlayerAction::Fold);
    assert_eq!(out.applied.seat_pos, 0);
    assert!(matches!(out.ending, Some(HandEnd::Uncontested(_))));
}

#[test]
fn expired_turn_checks_when_free() {
    let cfg = config();
    let mut t = table();
    t.start(ROOM, &cfg, heads_up()).unwrap();
    t.act(ROOM, &cfg, 1, "alice", PlayerAction::Call).unwrap();

    let out = t.expire_turn(ROOM, &cfg, 2).unwrap();
    assert_eq!(out.applied.action, PlayerAction::Check);
    assert_eq!(out.applied.seat_pos, 1);
    assert_eq!(out.state.street, Street::Flop);
    assert!(out.ending.is_none());

    assert_eq!(
        t.expire_turn(ROOM, &cfg, 2).unwrap_err(),
        GameError::ConcurrencyConflict {
            expected: 2,
            found: 3
        }
    );
}

#[test]
fn caller_metadata_survives_engine_writes() {
    let cfg = config();
    let mut t = table();
    t.start(ROOM, &cfg, heads_up()).unwrap();
    let mut snap = t.store().load_active(ROOM).unwrap().unwrap();
    snap.hand.meta = Some(serde_json::json!({ "message_id": 777 }));
    let version = t.store_mut().save(snap, 1).unwrap();

    t.act(ROOM, &cfg, version, "alice", PlayerAction::Call).unwrap();
    let snap = t.store().load_active(ROOM).unwrap().unwrap();
    assert_eq!(snap.hand.meta, Some(serde_json::json!({ "message_id": 777 })));
}

#[test]
fn seeded_tables_deal_the_same_cards() {
    let cfg = config();
    let mut a = table();
    let mut b = table();
    let sa = a.start(ROOM, &cfg, heads_up()).unwrap();
    let sb = b.start(ROOM, &cfg, heads_up()).unwrap();
    assert_eq!(sa.state, sb.state);
    assert_eq!(sa.events, sb.events);
}

#[test]
fn all_in_preflop_runs_the_board_out() {
    let cfg = config();
    let mut t = table();
    t.start(ROOM, &cfg, heads_up()).unwrap();
    t.act(ROOM, &cfg, 1, "alice", PlayerAction::AllIn).unwrap();
    let out = t.act(ROOM, &cfg, 2, "bob", PlayerAction::Call).unwrap();

    let streets: Vec<_> = out.dealt.iter().map(|d| d.street).collect();
    assert_eq!(
        streets,
        vec![Street::Flop, Street::Turn, Street::River, Street::Showdown]
    );
    let ending = out.ending.as_ref().unwrap();
    assert!(matches!(ending, HandEnd::Showdown(_)));
    assert_eq!(ending.payout().total_awarded() + ending.payout().remainder, 20_000);
    let stacks: u64 = out.state.seats.iter().map(|s| s.stack).sum();
    assert_eq!(stacks + ending.payout().remainder, 20_000);
}

#[test]
fn bigger_stack_gets_its_uncalled_chips_back_after_an_all_in() {
    let cfg = config();
    let mut t = table();
    let players = vec![("big".to_string(), 10_000), ("short".to_string(), 2_000)];
    t.start(ROOM, &cfg, players).unwrap();
    t.act(ROOM, &cfg, 1, "big", PlayerAction::AllIn).unwrap();
    let out = t.act(ROOM, &cfg, 2, "short", PlayerAction::Call).unwrap();

    let Some(HandEnd::Showdown(payout)) = &out.ending else {
        panic!("expected a showdown, got {:?}", out.ending);
    };
    assert!(payout.undistributed.is_empty());
    assert_eq!(payout.total_awarded() + payout.remainder, 4_000);
    assert!(out.state.pots.is_empty());

    let stacks: u64 = out.state.seats.iter().map(|s| s.stack).sum();
    assert_eq!(stacks + payout.remainder, 12_000);
    assert!(out.state.seats[0].stack >= 8_000);

    let stored = t.store().load_latest(ROOM).unwrap().unwrap();
    let stored_stacks: u64 = stored.seats.iter().map(|s| s.stack).sum();
    assert_eq!(stored_stacks + payout.remainder, 12_000);
}
