//! Card id allocation.
//!
//! Ids stay time-derived integers (epoch ms) for compatibility with stored
//! boards, but are bumped past both the last issued id and every id already
//! on the board, so rapid programmatic creation never collides.

use crate::model::project::{CardId, Project};
use crate::model::EpochMs;

/// Id and creation time for one new card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardStamp {
    pub id: CardId,
    pub created_at: EpochMs,
}

/// Monotonic card id source.
#[derive(Debug, Clone, Default)]
pub struct CardIdGenerator {
    last_issued: CardId,
}

impl CardIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a stamp unique within `project` and after every earlier stamp.
    pub fn next_stamp(&mut self, project: &Project, now_ms: EpochMs) -> CardStamp {
        let floor = self
            .last_issued
            .max(project.max_card_id().unwrap_or(CardId::MIN));
        let id = if now_ms > floor {
            now_ms
        } else {
            floor.saturating_add(1)
        };
        self.last_issued = id;
        CardStamp {
            id,
            created_at: now_ms,
        }
    }
}
