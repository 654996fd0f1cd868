//! Circular scans over the dense, `seat_pos`-ordered seat vector.

use crate::seat::Seat;

/// Next seat after `from` (exclusive, wrapping) that can still act.
///
/// `from` itself is checked last, so a lone actor finds itself.
pub fn next_actor_after(seats: &[Seat], from: usize) -> Option<usize> {
    let n = seats.len();
    if n == 0 {
        return None;
    }
    (1..=n)
        .map(|step| (from + step) % n)
        .find(|&idx| seats[idx].can_act())
}

/// Seat positions starting right after `from` and wrapping back to it.
pub fn clockwise_from(len: usize, from: usize) -> impl Iterator<Item = usize> {
    (1..=len).map(move |step| (from + step) % len)
}
