//! Core domain logic for OrgBoard.
//! This crate is the single source of truth for board invariants.

pub mod board;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod sync;

pub use config::CoreConfig;
pub use db::{open_db, open_db_in_memory, DbError};
pub use logging::{
    default_log_level, init_from_config, init_logging, logging_status, LogLevel, LoggingError,
};
pub use model::organization::{NewOrganization, Organization, OrganizationId};
pub use model::project::{Card, CardId, Column, ColumnId, NewProject, Project, ProjectId};
pub use model::team::{NewTeam, NewTeamMember, Team, TeamId, TeamMember, TeamMemberId};
pub use model::ModelValidationError;
pub use repo::{EntityStore, RepoError, RepoResult, SqliteStore};
pub use service::{AccessGate, BoardSession, Directory, GateOutcome, GateState};
pub use sync::{Notice, PersistenceFailure, SyncError, SyncOutcome};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
