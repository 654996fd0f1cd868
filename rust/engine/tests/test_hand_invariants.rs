//! Plays many complete hands with seeded random decisions and checks the
//! table invariants after every transition.
mod helpers;

use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use holdem_engine::action::{ActionEntry, ActionKind, PlayerAction};
use holdem_engine::betting::apply_action;
use holdem_engine::rules::compute_allowed_actions;
use holdem_engine::seat::Chips;
use holdem_engine::setup::{start_hand, HandSetup};
use holdem_engine::showdown::{award_uncontested, settle, SevenCardSolver};
use holdem_engine::state::EngineState;
use holdem_engine::street::advance;

use helpers::{config, players};

const STACKS: [Chips; 6] = [10_000, 350, 5_000, 1_200, 20_000, 800];

fn table_chips(st: &EngineState) -> Chips {
    st.seats.iter().map(|s| s.stack).sum::<Chips>() + st.chips_in_play()
}

fn assert_table_invariants(st: &EngineState) {
    for seat in &st.seats {
        if seat.stack == 0 && seat.in_hand {
            assert!(seat.is_all_in, "seat {} has no chips but is not all-in", seat.seat_pos);
        }
    }
    if st.actors().next().is_some() && !st.is_hand_over() {
        assert!(
            st.seats[st.acting_pos].can_act(),
            "acting seat {} cannot act",
            st.acting_pos
        );
    }
    assert!(matches!(st.board.len(), 0 | 3 | 4 | 5));
    assert_eq!(st.board.len(), st.street.board_len());
}

fn choose(rng: &mut ChaCha8Rng, st: &EngineState, pos: usize) -> PlayerAction {
    let allowed = compute_allowed_actions(st, pos);
    assert!(
        !(allowed.contains(&ActionKind::Check) && allowed.contains(&ActionKind::Call)),
        "check and call offered together"
    );
    match allowed.choose(rng).copied() {
        Some(ActionKind::Check) => PlayerAction::Check,
        Some(ActionKind::Call) => PlayerAction::Call,
        // keep hands going more often than not
        Some(ActionKind::Fold) if rng.random_bool(0.5) => PlayerAction::Fold,
        Some(ActionKind::Fold) if allowed.contains(&ActionKind::Check) => PlayerAction::Check,
        Some(ActionKind::Fold) => PlayerAction::Call,
        Some(ActionKind::Raise) => PlayerAction::Raise {
            amount: st.min_raise * rng.random_range(1..=3),
        },
        Some(ActionKind::AllIn) => PlayerAction::AllIn,
        None => panic!("acting seat {pos} has no legal actions"),
    }
}

fn play_hand(seed: u64, n: usize) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let stacks = &STACKS[..n];
    let start = start_hand(&config(), HandSetup::new(seed, players(stacks), seed)).unwrap();
    let total: Chips = stacks.iter().sum();
    let mut log = start.log();
    let mut st = start.state;
    assert_eq!(table_chips(&st), total);

    for _ in 0..2_000 {
        let adv = advance(st, &log, seed).unwrap();
        log.extend(adv.markers());
        if !adv.dealt.is_empty() {
            for pot in &adv.state.pots {
                for &pos in &pot.eligible {
                    assert!(adv.state.seats[pos].in_hand, "folded seat {pos} eligible");
                }
            }
        }
        st = adv.state;
        assert_eq!(table_chips(&st), total);
        assert_table_invariants(&st);
        if st.is_hand_over() {
            break;
        }

        let pos = st.acting_pos;
        let action = choose(&mut rng, &st, pos);
        let in_play = st.chips_in_play();
        let board = st.board.len();
        let applied = apply_action(&mut st, pos, action).unwrap();
        assert_eq!(st.chips_in_play(), in_play + applied.chips_moved);
        assert_eq!(st.board.len(), board);
        if applied.action == PlayerAction::Fold {
            assert!(!st.seats[pos].can_act());
        }
        log.push(ActionEntry::Act {
            seat_pos: pos,
            action: applied.action,
        });
        assert_table_invariants(&st);
    }
    assert!(st.is_hand_over(), "hand {seed} did not finish");

    let payout = match award_uncontested(&st) {
        Some(p) => p,
        None => settle(&st, &SevenCardSolver).unwrap(),
    };
    for pot in &payout.undistributed {
        let contenders = pot.eligible.iter().filter(|&&p| st.seats[p].in_hand).count();
        assert!(contenders >= 2, "hand {seed}: pot {pot:?} left with {contenders} contender(s)");
    }
    payout.apply(&mut st);
    let stacks: Chips = st.seats.iter().map(|s| s.stack).sum();
    if n == 2 {
        assert!(payout.undistributed.is_empty(), "hand {seed}: heads-up pots left over");
        assert_eq!(stacks + payout.remainder, total);
    } else {
        // contested side pots are still on the table
        assert_eq!(table_chips(&st) + payout.remainder, total);
    }
}

#[test]
fn random_hands_keep_chips_and_turn_order_consistent() {
    for n in 2..=STACKS.len() {
        for seed in 0..40 {
            play_hand(seed * 7 + n as u64, n);
        }
    }
}
