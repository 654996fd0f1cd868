use crate::action::ActionEntry;
use crate::state::EngineState;

/// Tail of a hand's log after the most recent street boundary marker, or the
/// whole log when no boundary has been recorded yet (preflop).
pub fn since_street_boundary(log: &[ActionEntry]) -> &[ActionEntry] {
    match log
        .iter()
        .rposition(|entry| matches!(entry, ActionEntry::Street { .. }))
    {
        Some(idx) => &log[idx + 1..],
        None => log,
    }
}

/// Whether the current betting round has ended.
///
/// Every seat that can still act must have matched `current_bet` and taken
/// a voluntary action since the street boundary. Posted blinds are not
/// voluntary, so the big blind keeps its option after everyone limps. With at
/// most one seat left able to act, the round is over once that seat owes
/// nothing.
pub fn is_betting_round_complete(
    state: &EngineState,
    actions_since_street_boundary: &[ActionEntry],
) -> bool {
    if state.actors().any(|seat| seat.bet != state.current_bet) {
        return false;
    }
    if state.actors().count() <= 1 {
        return true;
    }
    state.actors().all(|seat| {
        actions_since_street_boundary
            .iter()
            .any(|entry| entry.actor() == Some(seat.seat_pos))
    })
}
