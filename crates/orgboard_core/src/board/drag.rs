//! Pick-up/drop gesture resolution.
//!
//! # Responsibility
//! - Carry a self-contained `(card, source column)` payload between pick-up
//!   and drop.
//! - Turn a drop over a column into a `move_card` result.
//!
//! # Invariants
//! - At most one gesture is in flight; a new pick-up replaces the old one.
//! - Drop, cancel and invalid drops all return the resolver to idle.
//! - A drop never produces a value when nothing changed.

use super::move_card;
use crate::model::project::{Card, CardId, ColumnId, Project};
use serde::{Deserialize, Serialize};

/// Payload attached to a drag gesture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragPayload {
    pub card: Card,
    pub source_column_id: ColumnId,
}

impl DragPayload {
    /// Encodes the payload for hosts that ship drag data as text.
    ///
    /// # Errors
    /// - Propagates the `serde_json` failure instead of emitting empty text.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decodes a payload produced by [`DragPayload::encode`].
    pub fn decode(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }
}

/// Gesture state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Carrying(DragPayload),
}

/// Single-gesture drag/drop state machine.
#[derive(Debug, Clone, Default)]
pub struct MoveResolver {
    state: DragState,
}

impl MoveResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_carrying(&self) -> bool {
        matches!(self.state, DragState::Carrying(_))
    }

    /// Picks up `card_id` from `source_column_id`.
    ///
    /// Returns `false` and stays idle when the card is not in that column.
    pub fn pick_up(&mut self, project: &Project, source_column_id: &str, card_id: CardId) -> bool {
        let card = project
            .column(source_column_id)
            .and_then(|column| column.cards.iter().find(|card| card.id == card_id));
        match card {
            Some(card) => {
                self.carry(DragPayload {
                    card: card.clone(),
                    source_column_id: source_column_id.to_string(),
                });
                true
            }
            None => {
                self.state = DragState::Idle;
                false
            }
        }
    }

    /// Starts carrying a payload received from elsewhere (e.g. decoded text).
    pub fn carry(&mut self, payload: DragPayload) {
        self.state = DragState::Carrying(payload);
    }

    /// Ends the gesture without a drop.
    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }

    /// Drops the carried card over `target_column_id` (`None`: not over a column).
    ///
    /// Returns the moved project, or `None` when nothing changes.
    pub fn drop_on(
        &mut self,
        project: &Project,
        target_column_id: Option<&str>,
    ) -> Option<Project> {
        let DragState::Carrying(payload) = std::mem::take(&mut self.state) else {
            return None;
        };
        let target = target_column_id?;
        let next = move_card(project, &payload.source_column_id, target, payload.card.id);
        (next != *project).then_some(next)
    }
}
