use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::cards::{full_deck, Card};

/// A seeded deck whose order is a pure function of the seed.
///
/// Nothing about the deck is persisted besides the seed: a hand that is
/// rebuilt after a restart recreates the same order and resumes dealing at
/// the number of cards already consumed.
///
/// ```
/// use holdem_engine::deck::Deck;
///
/// let mut a = Deck::shuffled(42);
/// let mut b = Deck::shuffled(42);
/// b.skip(5);
/// let _ = a.draw_n(5);
/// assert_eq!(a.deal_card(), b.deal_card());
/// ```
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
    position: usize,
}

impl Deck {
    pub fn shuffled(seed: u64) -> Self {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let mut cards = full_deck();
        cards.shuffle(&mut rng);
        Self { cards, position: 0 }
    }

    /// Deck positioned after `dealt` cards have already left it.
    pub fn resume(seed: u64, dealt: usize) -> Self {
        let mut deck = Self::shuffled(seed);
        deck.skip(dealt);
        deck
    }

    pub fn deal_card(&mut self) -> Option<Card> {
        let c = self.cards.get(self.position).copied()?;
        self.position += 1;
        Some(c)
    }

    pub fn draw_n(&mut self, n: usize) -> Vec<Card> {
        (0..n).map_while(|_| self.deal_card()).collect()
    }

    /// Discards the next card; `None` once the deck is used up.
    pub fn burn_card(&mut self) -> Option<Card> {
        self.deal_card()
    }

    pub fn skip(&mut self, n: usize) {
        self.position = (self.position + n).min(self.cards.len());
    }

    pub fn dealt(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.cards.len().saturating_sub(self.position)
    }
}
