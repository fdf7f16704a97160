//! Synchronization between visible state and the entity store.
//!
//! # Responsibility
//! - Wrap each computed value in an apply/persist/confirm-or-rollback cycle.
//! - Convert store failures into categorized, user-facing notices.
//!
//! # Invariants
//! - Store failures never escape as panics or uncaught errors; the worst case
//!   is a rollback plus a failure notice.

pub mod cycle;
pub mod notice;

pub use cycle::{
    SyncCycle, SyncError, SyncOutcome, WriteDiscipline, WriteRequest, WriteTicket,
};
pub use notice::{Action, Category, Notice, NoticeLevel, PersistenceFailure, Subject};
