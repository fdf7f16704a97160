//! Entity store adapter: repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Define per-entity CRUD contracts (`list`, `get`, `create`, `update`,
//!   `delete`) for organizations, projects, teams and team members.
//! - Keep SQL and secret-transform details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths validate entity invariants before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - `list` results are newest-created-first.
//! - Project boards are written as one whole value, never as deltas.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::{EntityKind, ModelValidationError};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod organization_repo;
pub mod project_repo;
pub mod secret;
pub mod team_repo;

pub use organization_repo::OrganizationRepository;
pub use project_repo::ProjectRepository;
pub use team_repo::{TeamMemberRepository, TeamRepository};

pub type RepoResult<T> = Result<T, RepoError>;

/// Store adapter error shared by all entity repositories.
#[derive(Debug)]
pub enum RepoError {
    /// Entity value violates a model invariant.
    Validation(ModelValidationError),
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Target row does not exist.
    NotFound { kind: EntityKind, id: String },
    /// Persisted data cannot be converted to a valid entity.
    InvalidData(String),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
}

impl RepoError {
    pub(crate) fn not_found(kind: EntityKind, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "entity store requires schema version {expected_version}, got {actual_version}"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound { .. } => None,
            Self::InvalidData(_) => None,
            Self::UninitializedConnection { .. } => None,
        }
    }
}

impl From<ModelValidationError> for RepoError {
    fn from(value: ModelValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Full store adapter surface over all four entity kinds.
pub trait EntityStore:
    OrganizationRepository + ProjectRepository + TeamRepository + TeamMemberRepository
{
}

impl<T> EntityStore for T where
    T: OrganizationRepository + ProjectRepository + TeamRepository + TeamMemberRepository
{
}

/// SQLite-backed entity store.
pub struct SqliteStore<'conn> {
    pub(crate) conn: &'conn Connection,
}

impl<'conn> SqliteStore<'conn> {
    /// Creates a store over a connection returned by `open_db*`.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations were not applied.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let actual_version = current_user_version(conn)?;
        let expected_version = latest_version();
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }
        Ok(Self { conn })
    }
}

pub(crate) fn parse_uuid(value: &str, column: &'static str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}

pub(crate) fn parse_flag(value: i64, column: &'static str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid flag value `{other}` in {column}"
        ))),
    }
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
