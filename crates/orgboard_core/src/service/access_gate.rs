//! Per-organization lock state machine.
//!
//! # Responsibility
//! - Decide whether an organization's project listing may be shown.
//! - Drive secret verification through the sync cycle (confirm-first: the
//!   active selection changes only after the store says the secret matches).
//!
//! # Invariants
//! - Unprotected organizations never surface a prompt.
//! - A denied attempt reveals nothing beyond "incorrect"; retry is allowed.
//! - Cancel restores the prior selection.
//! - This is an access convenience, not a security boundary.

use crate::model::organization::{Organization, OrganizationId};
use crate::repo::{OrganizationRepository, RepoResult};
use crate::sync::{
    Action, Category, Notice, SyncCycle, SyncError, Subject, WriteDiscipline, WriteTicket,
};
use log::{info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Inline message shown after a mismatched secret.
pub const INCORRECT_SECRET_MESSAGE: &str = "Incorrect password. Please try again.";

const VERIFY_CATEGORY: Category = Category::new(Subject::OrganizationPassword, Action::Verify);

/// Gate state for the organization currently being selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// No prompt; the active selection (if any) may be shown.
    Unlocked,
    /// Prompt shown for a protected candidate.
    Locked { candidate: OrganizationId },
    /// Verification request in flight.
    Verifying {
        candidate: OrganizationId,
        ticket: WriteTicket,
    },
    /// Last attempt mismatched; prompt still shown with an error.
    Denied { candidate: OrganizationId },
}

/// What a verification round ended with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    Unlocked(OrganizationId),
    Denied { message: &'static str },
    /// Store failed; prompt stays open for retry.
    Failed(Notice),
}

/// Secret to hand to the store adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyRequest {
    pub ticket: WriteTicket,
    pub organization_id: OrganizationId,
    pub secret: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateError {
    /// No prompt is open.
    NoPrompt,
    /// A verification request is still in flight.
    VerificationInFlight,
    /// The ticket does not match the in-flight verification.
    UnknownTicket(WriteTicket),
}

impl Display for GateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoPrompt => write!(f, "no password prompt is open"),
            Self::VerificationInFlight => write!(f, "password verification already in flight"),
            Self::UnknownTicket(ticket) => write!(f, "unknown verification ticket {ticket:?}"),
        }
    }
}

impl Error for GateError {}

impl From<SyncError> for GateError {
    fn from(value: SyncError) -> Self {
        match value {
            SyncError::WriteInFlight { .. } => Self::VerificationInFlight,
            SyncError::UnknownTicket(ticket) => Self::UnknownTicket(ticket),
        }
    }
}

/// Access gate over organization selection.
#[derive(Debug, Clone)]
pub struct AccessGate {
    selection: SyncCycle<Option<OrganizationId>>,
    state: GateState,
    verified: HashSet<OrganizationId>,
}

impl Default for AccessGate {
    fn default() -> Self {
        Self::new()
    }
}

impl AccessGate {
    pub fn new() -> Self {
        Self {
            selection: SyncCycle::new(None),
            state: GateState::Unlocked,
            verified: HashSet::new(),
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    /// Organization whose contents are currently visible.
    pub fn active_organization(&self) -> Option<OrganizationId> {
        *self.selection.current()
    }

    pub fn prompt_visible(&self) -> bool {
        !matches!(self.state, GateState::Unlocked)
    }

    /// Whether the project listing of `organization_id` may be shown.
    pub fn can_show_projects(&self, organization_id: OrganizationId) -> bool {
        self.state == GateState::Unlocked && self.active_organization() == Some(organization_id)
    }

    /// Selects an organization; protected ones not yet verified this
    /// session move the gate to `Locked`.
    pub fn select(&mut self, organization: &Organization) -> Result<GateState, GateError> {
        if matches!(self.state, GateState::Verifying { .. }) {
            return Err(GateError::VerificationInFlight);
        }

        if !organization.is_password_protected || self.verified.contains(&organization.id) {
            self.selection.reset(Some(organization.id))?;
            self.state = GateState::Unlocked;
        } else {
            if self.active_organization() == Some(organization.id) {
                // Protection was added after this selection was made.
                self.selection.reset(None)?;
            }
            self.state = GateState::Locked {
                candidate: organization.id,
            };
            info!(
                "event=gate_select module=access_gate status=locked organization_id={}",
                organization.id
            );
        }
        Ok(self.state)
    }

    /// Submits a secret for the locked candidate.
    ///
    /// Returns `Ok(None)` for a blank secret (nothing is sent).
    pub fn submit(&mut self, secret: &str) -> Result<Option<VerifyRequest>, GateError> {
        let candidate = match self.state {
            GateState::Locked { candidate } | GateState::Denied { candidate } => candidate,
            GateState::Verifying { .. } => return Err(GateError::VerificationInFlight),
            GateState::Unlocked => return Err(GateError::NoPrompt),
        };
        if secret.trim().is_empty() {
            return Ok(None);
        }

        let Some(request) =
            self.selection
                .begin(Some(candidate), VERIFY_CATEGORY, WriteDiscipline::ConfirmFirst)?
        else {
            return Ok(None);
        };

        self.state = GateState::Verifying {
            candidate,
            ticket: request.ticket,
        };
        Ok(Some(VerifyRequest {
            ticket: request.ticket,
            organization_id: candidate,
            secret: secret.to_string(),
        }))
    }

    /// Applies the store's verification answer.
    pub fn resolve(
        &mut self,
        ticket: WriteTicket,
        result: RepoResult<bool>,
    ) -> Result<GateOutcome, GateError> {
        let candidate = match self.state {
            GateState::Verifying {
                candidate,
                ticket: pending,
            } if pending == ticket => candidate,
            GateState::Verifying { .. } => return Err(GateError::UnknownTicket(ticket)),
            _ => return Err(GateError::NoPrompt),
        };

        match result {
            Ok(true) => {
                self.selection.complete::<String>(ticket, Ok(Some(candidate)))?;
                self.unlock(candidate);
                Ok(GateOutcome::Unlocked(candidate))
            }
            Ok(false) => {
                self.selection.discard(ticket)?;
                self.state = GateState::Denied { candidate };
                warn!(
                    "event=gate_verify module=access_gate status=denied organization_id={candidate}"
                );
                Ok(GateOutcome::Denied {
                    message: INCORRECT_SECRET_MESSAGE,
                })
            }
            Err(err) => {
                let outcome = self.selection.complete(ticket, Err(err))?;
                self.state = GateState::Locked { candidate };
                let notice = outcome
                    .notice()
                    .unwrap_or_else(|| Notice::failure(VERIFY_CATEGORY));
                Ok(GateOutcome::Failed(notice))
            }
        }
    }

    /// Closes the prompt, keeping the prior selection.
    pub fn cancel(&mut self) -> Result<(), GateError> {
        match self.state {
            GateState::Locked { .. } | GateState::Denied { .. } => {
                self.state = GateState::Unlocked;
                Ok(())
            }
            GateState::Verifying { .. } => Err(GateError::VerificationInFlight),
            GateState::Unlocked => Err(GateError::NoPrompt),
        }
    }

    /// Submits and resolves against a store in one step.
    pub fn verify<R: OrganizationRepository>(
        &mut self,
        repo: &R,
        secret: &str,
    ) -> Result<Option<GateOutcome>, GateError> {
        let Some(request) = self.submit(secret)? else {
            return Ok(None);
        };
        let result = repo.verify_organization_password(request.organization_id, &request.secret);
        self.resolve(request.ticket, result).map(Some)
    }

    /// Drops session verification and selection for a deleted organization.
    pub fn forget(&mut self, organization_id: OrganizationId) -> Result<(), GateError> {
        if matches!(self.state, GateState::Verifying { .. }) {
            return Err(GateError::VerificationInFlight);
        }
        self.verified.remove(&organization_id);
        if self.active_organization() == Some(organization_id) {
            self.selection.reset(None)?;
        }
        match self.state {
            GateState::Locked { candidate } | GateState::Denied { candidate }
                if candidate == organization_id =>
            {
                self.state = GateState::Unlocked;
            }
            _ => {}
        }
        Ok(())
    }

    fn unlock(&mut self, organization_id: OrganizationId) {
        self.verified.insert(organization_id);
        self.state = GateState::Unlocked;
        info!(
            "event=gate_verify module=access_gate status=ok organization_id={organization_id}"
        );
    }
}
