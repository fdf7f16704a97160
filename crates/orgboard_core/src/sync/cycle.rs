//! Local-apply / remote-confirm cycle for one owned value.
//!
//! # Responsibility
//! - Hold the visible value and at most one in-flight write against it.
//! - Apply optimistically or wait for confirmation, per write.
//! - Roll back on failure and turn it into a categorized notice.
//!
//! # Invariants
//! - A second write is rejected while one is pending.
//! - A write that would not change the value is never issued.
//! - Every failed write yields exactly one failure notice.
//! - No automatic retry.

use super::notice::{Category, Notice, PersistenceFailure};
use log::{debug, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// When the visible value changes relative to the store call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteDiscipline {
    /// Show the new value immediately; restore the old one on failure.
    Optimistic,
    /// Keep showing the old value until the store confirms.
    ConfirmFirst,
}

/// Handle correlating a store response with the write that caused it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WriteTicket(u64);

/// A write the caller must hand to the store, then report back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteRequest<T> {
    pub ticket: WriteTicket,
    pub category: Category,
    /// Whole value to persist.
    pub value: T,
}

/// Result of resolving a write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Nothing to persist.
    NoOp,
    /// Store accepted the write; the stored value is now visible.
    Confirmed(Notice),
    /// Store rejected the write; the prior value is visible again.
    RolledBack(PersistenceFailure),
    /// Resolved without applying and without a notice.
    Discarded,
}

impl SyncOutcome {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed(_))
    }

    pub fn notice(&self) -> Option<Notice> {
        match self {
            Self::Confirmed(notice) => Some(notice.clone()),
            Self::RolledBack(failure) => Some(failure.notice()),
            Self::NoOp | Self::Discarded => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// A write is already pending; resolve it first.
    WriteInFlight { pending: Category },
    /// The ticket does not belong to the pending write.
    UnknownTicket(WriteTicket),
}

impl Display for SyncError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WriteInFlight { pending } => {
                write!(f, "cannot start a new write while `{pending}` is pending")
            }
            Self::UnknownTicket(ticket) => write!(f, "unknown write ticket {}", ticket.0),
        }
    }
}

impl Error for SyncError {}

#[derive(Debug, Clone)]
struct PendingWrite<T> {
    ticket: WriteTicket,
    category: Category,
    discipline: WriteDiscipline,
    previous: T,
}

/// Owner of one visible value and its single in-flight write.
#[derive(Debug, Clone)]
pub struct SyncCycle<T> {
    current: T,
    pending: Option<PendingWrite<T>>,
    next_ticket: u64,
}

impl<T: Clone + PartialEq> SyncCycle<T> {
    pub fn new(value: T) -> Self {
        Self {
            current: value,
            pending: None,
            next_ticket: 1,
        }
    }

    /// Value currently shown to the user.
    pub fn current(&self) -> &T {
        &self.current
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_category(&self) -> Option<Category> {
        self.pending.as_ref().map(|pending| pending.category)
    }

    /// Replaces the visible value without a store round-trip.
    ///
    /// # Errors
    /// - `WriteInFlight` while a write is pending.
    pub fn reset(&mut self, value: T) -> Result<(), SyncError> {
        self.ensure_idle()?;
        self.current = value;
        Ok(())
    }

    /// Starts a write of `proposed`.
    ///
    /// Returns `Ok(None)` when `proposed` equals the visible value.
    pub fn begin(
        &mut self,
        proposed: T,
        category: Category,
        discipline: WriteDiscipline,
    ) -> Result<Option<WriteRequest<T>>, SyncError> {
        self.ensure_idle()?;
        if proposed == self.current {
            debug!("event=sync_begin module=sync status=noop category=\"{category}\"");
            return Ok(None);
        }

        let ticket = WriteTicket(self.next_ticket);
        self.next_ticket += 1;

        let previous = match discipline {
            WriteDiscipline::Optimistic => std::mem::replace(&mut self.current, proposed.clone()),
            WriteDiscipline::ConfirmFirst => self.current.clone(),
        };
        self.pending = Some(PendingWrite {
            ticket,
            category,
            discipline,
            previous,
        });
        debug!(
            "event=sync_begin module=sync status=start category=\"{category}\" ticket={}",
            ticket.0
        );

        Ok(Some(WriteRequest {
            ticket,
            category,
            value: proposed,
        }))
    }

    /// Resolves the pending write with the store's answer.
    ///
    /// On success the stored value becomes visible; on failure the prior
    /// value is restored (optimistic) or simply kept (confirm-first).
    pub fn complete<E: Display>(
        &mut self,
        ticket: WriteTicket,
        result: Result<T, E>,
    ) -> Result<SyncOutcome, SyncError> {
        let pending = self.take_pending(ticket)?;
        match result {
            Ok(stored) => {
                self.current = stored;
                debug!(
                    "event=sync_complete module=sync status=ok category=\"{}\" ticket={}",
                    pending.category, ticket.0
                );
                Ok(SyncOutcome::Confirmed(Notice::success(pending.category)))
            }
            Err(err) => {
                if pending.discipline == WriteDiscipline::Optimistic {
                    self.current = pending.previous;
                }
                warn!(
                    "event=sync_complete module=sync status=error category=\"{}\" ticket={} error={}",
                    pending.category, ticket.0, err
                );
                Ok(SyncOutcome::RolledBack(PersistenceFailure {
                    category: pending.category,
                    reason: err.to_string(),
                }))
            }
        }
    }

    /// Resolves the pending write without applying it and without a notice.
    ///
    /// Used when the remote answered but declined for a non-failure reason.
    pub fn discard(&mut self, ticket: WriteTicket) -> Result<SyncOutcome, SyncError> {
        let pending = self.take_pending(ticket)?;
        if pending.discipline == WriteDiscipline::Optimistic {
            self.current = pending.previous;
        }
        debug!(
            "event=sync_complete module=sync status=discarded category=\"{}\" ticket={}",
            pending.category, ticket.0
        );
        Ok(SyncOutcome::Discarded)
    }

    fn ensure_idle(&self) -> Result<(), SyncError> {
        match &self.pending {
            Some(pending) => Err(SyncError::WriteInFlight {
                pending: pending.category,
            }),
            None => Ok(()),
        }
    }

    fn take_pending(&mut self, ticket: WriteTicket) -> Result<PendingWrite<T>, SyncError> {
        match self.pending.take() {
            Some(pending) if pending.ticket == ticket => Ok(pending),
            other => {
                self.pending = other;
                Err(SyncError::UnknownTicket(ticket))
            }
        }
    }
}
