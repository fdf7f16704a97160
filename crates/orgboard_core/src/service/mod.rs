//! Core use-case services.
//!
//! # Responsibility
//! - Own the open board, the access gate and the entity directory.
//! - Keep hosts decoupled from storage details and sync bookkeeping.

pub mod access_gate;
pub mod board_session;
pub mod directory;

pub use access_gate::{AccessGate, GateError, GateOutcome, GateState, VerifyRequest};
pub use board_session::BoardSession;
pub use directory::{Directory, DirectoryResult};
