use serde::{Deserialize, Serialize};
use tracing::info;

use crate::action::ActionEntry;
use crate::cards::Card;
use crate::config::EngineConfig;
use crate::deck::Deck;
use crate::errors::GameError;
use crate::positions::{clockwise_from, next_actor_after};
use crate::seat::{Chips, Seat};
use crate::state::{EngineState, Street};

/// Who plays the next hand and where the button was last time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandSetup {
    pub hand_id: u64,
    /// Dealer of the previous hand at this table, tracked by the caller.
    pub previous_dealer: Option<usize>,
    /// `(user_ref, stack)` in seat order; the index becomes `seat_pos`.
    pub players: Vec<(String, Chips)>,
    pub deck_seed: u64,
}

impl HandSetup {
    pub fn new(hand_id: u64, players: Vec<(String, Chips)>, deck_seed: u64) -> Self {
        Self {
            hand_id,
            previous_dealer: None,
            players,
            deck_seed,
        }
    }

    pub fn after_dealer(mut self, previous_dealer: usize) -> Self {
        self.previous_dealer = Some(previous_dealer);
        self
    }
}

/// Things that happened while setting up a hand.
///
/// `CardsDealt` is private to one seat: deliver it to the owner only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HandEvent {
    HandStarted {
        hand_id: u64,
        dealer_pos: usize,
        small_blind_pos: usize,
        big_blind_pos: usize,
    },
    BlindPosted {
        seat_pos: usize,
        amount: Chips,
    },
    CardsDealt {
        private_to: usize,
        cards: [Card; 2],
    },
}

impl HandEvent {
    /// Seat that may see this event, or `None` when it is public.
    pub fn recipient(&self) -> Option<usize> {
        match self {
            HandEvent::CardsDealt { private_to, .. } => Some(*private_to),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandStart {
    pub state: EngineState,
    pub events: Vec<HandEvent>,
}

impl HandStart {
    /// Forced bets as action-log entries. They do not count as acting.
    pub fn log(&self) -> Vec<ActionEntry> {
        self.events
            .iter()
            .filter_map(|event| match *event {
                HandEvent::BlindPosted { seat_pos, amount } => {
                    Some(ActionEntry::Blind { seat_pos, amount })
                }
                _ => None,
            })
            .collect()
    }
}

/// Sets up a new hand: button, blinds, hole cards and first actor.
///
/// The button moves one seat on from `previous_dealer` (seat 0 for the first
/// hand). Heads-up the dealer posts the small blind and acts first preflop;
/// otherwise the blinds sit left of the dealer and the seat after the big
/// blind opens. A stack shorter than its blind posts what it has and goes
/// all-in. Hole cards are dealt one at a time in two passes starting left of
/// the dealer, from the deck seeded with `deck_seed`.
///
/// # Errors
///
/// - [`GameError::InvalidConfig`] when `config` fails validation
/// - [`GameError::NotEnoughPlayers`] / [`GameError::TooManyPlayers`]
/// - [`GameError::EmptyStack`] when a player has no chips
pub fn start_hand(config: &EngineConfig, setup: HandSetup) -> Result<HandStart, GameError> {
    config.validate()?;
    let n = setup.players.len();
    if n < 2 {
        return Err(GameError::NotEnoughPlayers(n));
    }
    if n > config.max_players {
        return Err(GameError::TooManyPlayers {
            max: config.max_players,
            actual: n,
        });
    }
    if let Some(seat_pos) = setup.players.iter().position(|(_, stack)| *stack == 0) {
        return Err(GameError::EmptyStack { seat_pos });
    }

    let dealer_pos = setup.previous_dealer.map_or(0, |prev| (prev + 1) % n);
    let (small_blind_pos, big_blind_pos) = if n == 2 {
        (dealer_pos, (dealer_pos + 1) % n)
    } else {
        ((dealer_pos + 1) % n, (dealer_pos + 2) % n)
    };

    let mut seats: Vec<Seat> = setup
        .players
        .into_iter()
        .enumerate()
        .map(|(pos, (user_ref, stack))| Seat::new(pos, user_ref, stack))
        .collect();

    let mut deck = Deck::shuffled(setup.deck_seed);
    let first = deck.draw_n(n);
    let second = deck.draw_n(n);
    if second.len() != n {
        return Err(GameError::DeckExhausted);
    }
    let mut events = vec![HandEvent::HandStarted {
        hand_id: setup.hand_id,
        dealer_pos,
        small_blind_pos,
        big_blind_pos,
    }];

    let sb = seats[small_blind_pos].commit(config.small_blind);
    let bb = seats[big_blind_pos].commit(config.big_blind);
    events.push(HandEvent::BlindPosted {
        seat_pos: small_blind_pos,
        amount: sb,
    });
    events.push(HandEvent::BlindPosted {
        seat_pos: big_blind_pos,
        amount: bb,
    });

    for (i, pos) in clockwise_from(n, dealer_pos).enumerate() {
        let cards = [first[i], second[i]];
        seats[pos].hole = Some(cards);
        events.push(HandEvent::CardsDealt {
            private_to: pos,
            cards,
        });
    }

    let acting_pos = next_actor_after(&seats, big_blind_pos).unwrap_or(big_blind_pos);
    let state = EngineState {
        hand_id: setup.hand_id,
        config: config.clone(),
        street: Street::Preflop,
        dealer_pos,
        small_blind_pos,
        big_blind_pos,
        acting_pos,
        min_raise: config.big_blind,
        current_bet: config.big_blind,
        pots: Vec::new(),
        board: Vec::with_capacity(5),
        seats,
    };

    info!(
        hand_id = state.hand_id,
        players = n,
        dealer_pos,
        small_blind_pos,
        big_blind_pos,
        acting_pos,
        "hand started"
    );

    Ok(HandStart { state, events })
}
