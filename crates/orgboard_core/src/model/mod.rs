//! Domain model for organizations, projects, boards and teams.
//!
//! # Responsibility
//! - Define the canonical entity shapes shared by store adapter, board
//!   operations and services.
//! - Own entity-level invariant checks (`validate()`).
//!
//! # Invariants
//! - Organization/project/team ids are stable v4 UUIDs.
//! - A project's column/card tree only exists inside its owning project value.
//! - Timestamps are Unix epoch milliseconds.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};

pub mod organization;
pub mod project;
pub mod team;

/// Unix epoch milliseconds.
pub type EpochMs = i64;

/// Entity kinds known to the store adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Organization,
    Project,
    Team,
    TeamMember,
}

impl EntityKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Organization => "organization",
            Self::Project => "project",
            Self::Team => "team",
            Self::TeamMember => "team member",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Invariant violations detected on entity values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelValidationError {
    /// Display name is blank after trim.
    BlankName(EntityKind),
    /// Owner/creator reference is blank.
    BlankOwner(EntityKind),
    /// `is_password_protected` and `password_hash` disagree.
    PasswordFlagMismatch {
        is_password_protected: bool,
        has_hash: bool,
    },
    /// Submitted secret is blank.
    BlankSecret,
    /// Project carries no columns.
    NoColumns,
    /// Column id does not match the slug grammar.
    InvalidColumnId(String),
    /// Two columns share one id.
    DuplicateColumnId(String),
    /// Column title is blank.
    BlankColumnTitle(String),
    /// Two cards in one project share one id.
    DuplicateCardId(i64),
    /// Card title is blank.
    BlankCardTitle(i64),
    /// Team member email is malformed.
    InvalidEmail(String),
}

impl Display for ModelValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName(kind) => write!(f, "{kind} name must not be blank"),
            Self::BlankOwner(kind) => write!(f, "{kind} owner reference must not be blank"),
            Self::PasswordFlagMismatch {
                is_password_protected,
                has_hash,
            } => write!(
                f,
                "password flag mismatch: is_password_protected={is_password_protected} has_hash={has_hash}"
            ),
            Self::BlankSecret => write!(f, "password must not be blank"),
            Self::NoColumns => write!(f, "project must have at least one column"),
            Self::InvalidColumnId(id) => write!(f, "invalid column id `{id}`"),
            Self::DuplicateColumnId(id) => write!(f, "duplicate column id `{id}`"),
            Self::BlankColumnTitle(id) => write!(f, "column `{id}` title must not be blank"),
            Self::DuplicateCardId(id) => write!(f, "duplicate card id {id}"),
            Self::BlankCardTitle(id) => write!(f, "card {id} title must not be blank"),
            Self::InvalidEmail(value) => write!(f, "invalid email `{value}`"),
        }
    }
}

impl Error for ModelValidationError {}

/// Returns the current wall-clock time in epoch milliseconds.
///
/// Clocks before the Unix epoch collapse to `0`.
pub fn now_epoch_ms() -> EpochMs {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Maps blank optional text to `None`, trimming the rest.
pub(crate) fn normalize_optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string)
}
