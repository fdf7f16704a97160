//! Project aggregate: the board tree of columns and cards.
//!
//! # Responsibility
//! - Define the owned `Project -> Column -> Card` aggregate persisted as one value.
//! - Provide read helpers and whole-aggregate invariant checks.
//!
//! # Invariants
//! - Column ids are slugs, unique within a project, and never change.
//! - Card ids are unique across the whole project.
//! - Every card belongs to exactly one column.

use super::organization::OrganizationId;
use super::{is_blank, EntityKind, EpochMs, ModelValidationError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Stable project identifier.
pub type ProjectId = Uuid;
/// Column slug, e.g. `todo`.
pub type ColumnId = String;
/// Time-derived integer card id.
pub type CardId = i64;

/// Default board layout seeded on project creation.
pub const DEFAULT_COLUMNS: [(&str, &str); 3] =
    [("todo", "To Do"), ("doing", "Doing"), ("done", "Done")];

static COLUMN_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9][a-z0-9_-]*$").expect("valid column id regex"));

/// Returns whether `value` matches the column slug grammar.
pub fn is_valid_column_id(value: &str) -> bool {
    COLUMN_ID_RE.is_match(value)
}

/// One task unit on a board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: CardId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub created_at: EpochMs,
}

/// Named ordered bucket of cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: ColumnId,
    pub title: String,
    #[serde(default)]
    pub cards: Vec<Card>,
}

impl Column {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            cards: Vec::new(),
        }
    }

    pub fn contains(&self, card_id: CardId) -> bool {
        self.cards.iter().any(|card| card.id == card_id)
    }
}

/// Task board belonging to one organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub organization_id: OrganizationId,
    pub owner_id: String,
    pub columns: Vec<Column>,
    pub created_at: EpochMs,
    pub updated_at: EpochMs,
}

impl Project {
    /// Builds the three empty default columns.
    pub fn default_columns() -> Vec<Column> {
        DEFAULT_COLUMNS
            .iter()
            .map(|(id, title)| Column::new(*id, *title))
            .collect()
    }

    pub fn column(&self, column_id: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.id == column_id)
    }

    /// Finds a card anywhere on the board, with its owning column.
    pub fn find_card(&self, card_id: CardId) -> Option<(&Column, &Card)> {
        self.columns.iter().find_map(|column| {
            column
                .cards
                .iter()
                .find(|card| card.id == card_id)
                .map(|card| (column, card))
        })
    }

    pub fn card_count(&self) -> usize {
        self.columns.iter().map(|column| column.cards.len()).sum()
    }

    pub fn max_card_id(&self) -> Option<CardId> {
        self.columns
            .iter()
            .flat_map(|column| column.cards.iter().map(|card| card.id))
            .max()
    }

    /// Checks whole-aggregate invariants.
    ///
    /// # Errors
    /// - Blank name or owner.
    /// - No columns, malformed/duplicate column ids, blank column titles.
    /// - Duplicate card ids across columns, blank card titles.
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        if is_blank(&self.name) {
            return Err(ModelValidationError::BlankName(EntityKind::Project));
        }
        if is_blank(&self.owner_id) {
            return Err(ModelValidationError::BlankOwner(EntityKind::Project));
        }
        if self.columns.is_empty() {
            return Err(ModelValidationError::NoColumns);
        }

        let mut column_ids = HashSet::new();
        let mut card_ids = HashSet::new();
        for column in &self.columns {
            if !is_valid_column_id(&column.id) {
                return Err(ModelValidationError::InvalidColumnId(column.id.clone()));
            }
            if !column_ids.insert(column.id.as_str()) {
                return Err(ModelValidationError::DuplicateColumnId(column.id.clone()));
            }
            if is_blank(&column.title) {
                return Err(ModelValidationError::BlankColumnTitle(column.id.clone()));
            }
            for card in &column.cards {
                if !card_ids.insert(card.id) {
                    return Err(ModelValidationError::DuplicateCardId(card.id));
                }
                if is_blank(&card.title) {
                    return Err(ModelValidationError::BlankCardTitle(card.id));
                }
            }
        }
        Ok(())
    }
}

/// Creation request for a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    pub name: String,
    pub organization_id: OrganizationId,
    pub owner_id: String,
}

impl NewProject {
    pub fn new(
        name: impl Into<String>,
        organization_id: OrganizationId,
        owner_id: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            organization_id,
            owner_id: owner_id.into(),
        }
    }
}
