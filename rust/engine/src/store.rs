//! Persistence seam. The engine never touches storage; the table layer talks
//! to a [`HandStore`] and relies on its version check for concurrency.

use std::collections::HashMap;

use chrono::{SecondsFormat, Utc};
use tracing::warn;

use crate::errors::GameError;
use crate::rows::{HandSnapshot, HandStatus};

pub trait HandStore {
    /// Most recent hand of a room, finished or not.
    fn load_latest(&self, room_id: i64) -> Result<Option<HandSnapshot>, GameError>;

    /// Stores a freshly started hand at version 1.
    ///
    /// Fails with [`GameError::HandInProgress`] while the room has an active hand.
    fn insert(&mut self, snapshot: HandSnapshot) -> Result<u64, GameError>;

    /// Replaces the stored hand if its version still equals `expected_version`
    /// and returns the bumped version.
    ///
    /// Fails with [`GameError::ConcurrencyConflict`] otherwise; the write is
    /// never merged.
    fn save(&mut self, snapshot: HandSnapshot, expected_version: u64) -> Result<u64, GameError>;

    fn next_hand_id(&mut self) -> u64;

    fn load_active(&self, room_id: i64) -> Result<Option<HandSnapshot>, GameError> {
        Ok(self
            .load_latest(room_id)?
            .filter(|snap| snap.hand.status == HandStatus::Active))
    }
}

/// In-process store keyed by room, keeping the latest hand of each.
#[derive(Debug, Default)]
pub struct MemoryStore {
    hands: HashMap<i64, HandSnapshot>,
    last_hand_id: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

impl HandStore for MemoryStore {
    fn load_latest(&self, room_id: i64) -> Result<Option<HandSnapshot>, GameError> {
        Ok(self.hands.get(&room_id).cloned())
    }

    fn insert(&mut self, mut snapshot: HandSnapshot) -> Result<u64, GameError> {
        let room_id = snapshot.hand.room_id;
        if self.load_active(room_id)?.is_some() {
            return Err(GameError::HandInProgress { room_id });
        }
        snapshot.hand.version = 1;
        snapshot.hand.updated_at = Some(now());
        self.hands.insert(room_id, snapshot);
        Ok(1)
    }

    fn save(&mut self, mut snapshot: HandSnapshot, expected_version: u64) -> Result<u64, GameError> {
        let room_id = snapshot.hand.room_id;
        let current = self
            .hands
            .get(&room_id)
            .ok_or(GameError::NoActiveHand { room_id })?;
        if current.hand.hand_id != snapshot.hand.hand_id || current.hand.version != expected_version
        {
            warn!(
                room_id,
                hand_id = snapshot.hand.hand_id,
                expected_version,
                found = current.hand.version,
                "stale write rejected"
            );
            return Err(GameError::ConcurrencyConflict {
                expected: expected_version,
                found: current.hand.version,
            });
        }
        let version = expected_version + 1;
        snapshot.hand.version = version;
        snapshot.hand.updated_at = Some(now());
        self.hands.insert(room_id, snapshot);
        Ok(version)
    }

    fn next_hand_id(&mut self) -> u64 {
        self.last_hand_id += 1;
        self.last_hand_id
    }
}
