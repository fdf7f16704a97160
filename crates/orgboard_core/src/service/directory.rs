//! Organization, project and team use-case service.
//!
//! # Responsibility
//! - Route entity CRUD through the store adapter.
//! - Convert every store failure into a categorized notice at this boundary.
//! - Keep project listings behind the access gate.
//!
//! # Invariants
//! - Store errors never escape as anything but `PersistenceFailure`.
//! - A gated organization's projects are never fetched.

use crate::model::organization::{NewOrganization, Organization, OrganizationId};
use crate::model::project::{NewProject, Project, ProjectId};
use crate::model::team::{NewTeam, NewTeamMember, Team, TeamId, TeamMember, TeamMemberId};
use crate::repo::{EntityStore, RepoResult};
use crate::service::access_gate::{AccessGate, GateError, GateOutcome};
use crate::service::board_session::BoardSession;
use crate::sync::{Action, Category, Notice, PersistenceFailure, Subject};
use log::{debug, warn};

pub type DirectoryResult<T> = Result<T, PersistenceFailure>;

/// Use-case service over one entity store.
pub struct Directory<S: EntityStore> {
    store: S,
    notices: Vec<Notice>,
}

impl<S: EntityStore> Directory<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            notices: Vec::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Drains accumulated notices, oldest first.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn load_organizations(&mut self, owner_id: &str) -> DirectoryResult<Vec<Organization>> {
        let result = self.store.list_organizations(owner_id);
        self.record(Subject::Organization, Action::Load, result)
    }

    pub fn create_organization(
        &mut self,
        draft: &NewOrganization,
    ) -> DirectoryResult<Organization> {
        let result = self.store.create_organization(draft);
        self.record(Subject::Organization, Action::Create, result)
    }

    pub fn update_organization(
        &mut self,
        organization: &Organization,
    ) -> DirectoryResult<Organization> {
        let result = self.store.update_organization(organization);
        self.record(Subject::Organization, Action::Update, result)
    }

    /// Enables, changes (`Some`) or removes (`None`) password protection.
    pub fn set_organization_password(
        &mut self,
        id: OrganizationId,
        secret: Option<&str>,
    ) -> DirectoryResult<Organization> {
        let result = self.store.set_organization_password(id, secret);
        self.record(Subject::OrganizationPassword, Action::Update, result)
    }

    /// Deletes an organization and drops it from the gate.
    pub fn delete_organization(
        &mut self,
        gate: &mut AccessGate,
        id: OrganizationId,
    ) -> DirectoryResult<()> {
        let result = self.store.delete_organization(id);
        self.record(Subject::Organization, Action::Delete, result)?;
        if let Err(err) = gate.forget(id) {
            warn!(
                "event=org_forget module=directory status=error organization_id={id} error={err}"
            );
        }
        Ok(())
    }

    /// Submits a password for the gate's locked candidate.
    ///
    /// Store failures are recorded as notices like any other call.
    pub fn unlock(
        &mut self,
        gate: &mut AccessGate,
        secret: &str,
    ) -> Result<Option<GateOutcome>, GateError> {
        let outcome = gate.verify(&self.store, secret)?;
        if let Some(GateOutcome::Failed(notice)) = &outcome {
            self.notices.push(notice.clone());
        }
        Ok(outcome)
    }

    /// Lists projects of `organization_id`, or nothing while it is gated.
    pub fn load_projects(
        &mut self,
        gate: &AccessGate,
        organization_id: OrganizationId,
    ) -> DirectoryResult<Vec<Project>> {
        if !gate.can_show_projects(organization_id) {
            debug!(
                "event=project_list module=directory status=gated organization_id={organization_id}"
            );
            return Ok(Vec::new());
        }
        let result = self.store.list_projects(organization_id);
        self.record(Subject::Project, Action::Load, result)
    }

    pub fn create_project(&mut self, draft: &NewProject) -> DirectoryResult<Project> {
        let result = self.store.create_project(draft);
        self.record(Subject::Project, Action::Create, result)
    }

    pub fn delete_project(&mut self, id: ProjectId) -> DirectoryResult<()> {
        let result = self.store.delete_project(id);
        self.record(Subject::Project, Action::Delete, result)
    }

    /// Loads a project into a fresh board session.
    pub fn open_project(&mut self, id: ProjectId) -> DirectoryResult<Option<BoardSession>> {
        let result = self.store.get_project(id);
        let project = self.record(Subject::Project, Action::Load, result)?;
        Ok(project.map(BoardSession::open))
    }

    pub fn load_teams(&mut self, organization_id: OrganizationId) -> DirectoryResult<Vec<Team>> {
        let result = self.store.list_teams(organization_id);
        self.record(Subject::Team, Action::Load, result)
    }

    pub fn create_team(&mut self, draft: &NewTeam) -> DirectoryResult<Team> {
        let result = self.store.create_team(draft);
        self.record(Subject::Team, Action::Create, result)
    }

    pub fn update_team(&mut self, team: &Team) -> DirectoryResult<Team> {
        let result = self.store.update_team(team);
        self.record(Subject::Team, Action::Update, result)
    }

    pub fn delete_team(&mut self, id: TeamId) -> DirectoryResult<()> {
        let result = self.store.delete_team(id);
        self.record(Subject::Team, Action::Delete, result)
    }

    pub fn load_team_members(&mut self, team_id: TeamId) -> DirectoryResult<Vec<TeamMember>> {
        let result = self.store.list_team_members(team_id);
        self.record(Subject::TeamMember, Action::Load, result)
    }

    pub fn create_team_member(&mut self, draft: &NewTeamMember) -> DirectoryResult<TeamMember> {
        let result = self.store.create_team_member(draft);
        self.record(Subject::TeamMember, Action::Create, result)
    }

    pub fn update_team_member(&mut self, member: &TeamMember) -> DirectoryResult<TeamMember> {
        let result = self.store.update_team_member(member);
        self.record(Subject::TeamMember, Action::Update, result)
    }

    pub fn delete_team_member(&mut self, id: TeamMemberId) -> DirectoryResult<()> {
        let result = self.store.delete_team_member(id);
        self.record(Subject::TeamMember, Action::Delete, result)
    }

    // Loads stay quiet on success; everything else gets a success notice.
    fn record<T>(
        &mut self,
        subject: Subject,
        action: Action,
        result: RepoResult<T>,
    ) -> DirectoryResult<T> {
        let category = Category::new(subject, action);
        match result {
            Ok(value) => {
                if action != Action::Load {
                    self.notices.push(Notice::success(category));
                }
                Ok(value)
            }
            Err(err) => {
                warn!(
                    "event=store_call module=directory status=error category=\"{category}\" error={err}"
                );
                let failure = PersistenceFailure {
                    category,
                    reason: err.to_string(),
                };
                self.notices.push(failure.notice());
                Err(failure)
            }
        }
    }
}
