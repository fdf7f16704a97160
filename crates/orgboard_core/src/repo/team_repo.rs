//! Team and team member repositories.
//!
//! Flat CRUD over `teams` (scoped by organization) and `team_members`
//! (scoped by team). No ordering beyond newest-first listing.

use super::{parse_uuid, RepoError, RepoResult, SqliteStore};
use crate::model::organization::OrganizationId;
use crate::model::team::{NewTeam, NewTeamMember, Team, TeamId, TeamMember, TeamMemberId};
use crate::model::{normalize_optional, now_epoch_ms, EntityKind};
use rusqlite::{params, Row};
use uuid::Uuid;

const TEAM_SELECT_SQL: &str = "SELECT
    id,
    organization_id,
    name,
    description,
    created_by,
    created_at,
    updated_at
FROM teams";

const TEAM_MEMBER_SELECT_SQL: &str = "SELECT
    id,
    team_id,
    name,
    email,
    role,
    created_by,
    created_at,
    updated_at
FROM team_members";

pub trait TeamRepository {
    fn list_teams(&self, organization_id: OrganizationId) -> RepoResult<Vec<Team>>;
    fn get_team(&self, id: TeamId) -> RepoResult<Option<Team>>;
    fn create_team(&self, draft: &NewTeam) -> RepoResult<Team>;
    /// Overwrites name and description.
    fn update_team(&self, team: &Team) -> RepoResult<Team>;
    fn delete_team(&self, id: TeamId) -> RepoResult<()>;
}

pub trait TeamMemberRepository {
    fn list_team_members(&self, team_id: TeamId) -> RepoResult<Vec<TeamMember>>;
    fn get_team_member(&self, id: TeamMemberId) -> RepoResult<Option<TeamMember>>;
    fn create_team_member(&self, draft: &NewTeamMember) -> RepoResult<TeamMember>;
    /// Overwrites name, email and role.
    fn update_team_member(&self, member: &TeamMember) -> RepoResult<TeamMember>;
    fn delete_team_member(&self, id: TeamMemberId) -> RepoResult<()>;
}

impl TeamRepository for SqliteStore<'_> {
    fn list_teams(&self, organization_id: OrganizationId) -> RepoResult<Vec<Team>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TEAM_SELECT_SQL}
             WHERE organization_id = ?1
             ORDER BY created_at DESC, rowid DESC;"
        ))?;
        let mut rows = stmt.query([organization_id.to_string()])?;
        let mut teams = Vec::new();
        while let Some(row) = rows.next()? {
            teams.push(parse_team_row(row)?);
        }
        Ok(teams)
    }

    fn get_team(&self, id: TeamId) -> RepoResult<Option<Team>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TEAM_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_team_row(row)?));
        }
        Ok(None)
    }

    fn create_team(&self, draft: &NewTeam) -> RepoResult<Team> {
        let now = now_epoch_ms();
        let team = Team {
            id: Uuid::new_v4(),
            organization_id: draft.organization_id,
            name: draft.name.trim().to_string(),
            description: normalize_optional(draft.description.as_deref()),
            created_by: draft.created_by.trim().to_string(),
            created_at: now,
            updated_at: now,
        };
        team.validate()?;

        self.conn.execute(
            "INSERT INTO teams (
                id,
                organization_id,
                name,
                description,
                created_by,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                team.id.to_string(),
                team.organization_id.to_string(),
                team.name.as_str(),
                team.description.as_deref(),
                team.created_by.as_str(),
                team.created_at,
                team.updated_at,
            ],
        )?;
        Ok(team)
    }

    fn update_team(&self, team: &Team) -> RepoResult<Team> {
        let mut next = team.clone();
        next.name = next.name.trim().to_string();
        next.description = normalize_optional(next.description.as_deref());
        next.validate()?;

        let changed = self.conn.execute(
            "UPDATE teams
             SET
                name = ?1,
                description = ?2,
                updated_at = ?3
             WHERE id = ?4;",
            params![
                next.name.as_str(),
                next.description.as_deref(),
                now_epoch_ms(),
                next.id.to_string(),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::not_found(EntityKind::Team, next.id));
        }

        self.get_team(next.id)?
            .ok_or_else(|| RepoError::not_found(EntityKind::Team, next.id))
    }

    fn delete_team(&self, id: TeamId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM teams WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::not_found(EntityKind::Team, id));
        }
        Ok(())
    }
}

impl TeamMemberRepository for SqliteStore<'_> {
    fn list_team_members(&self, team_id: TeamId) -> RepoResult<Vec<TeamMember>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TEAM_MEMBER_SELECT_SQL}
             WHERE team_id = ?1
             ORDER BY created_at DESC, rowid DESC;"
        ))?;
        let mut rows = stmt.query([team_id.to_string()])?;
        let mut members = Vec::new();
        while let Some(row) = rows.next()? {
            members.push(parse_team_member_row(row)?);
        }
        Ok(members)
    }

    fn get_team_member(&self, id: TeamMemberId) -> RepoResult<Option<TeamMember>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TEAM_MEMBER_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_team_member_row(row)?));
        }
        Ok(None)
    }

    fn create_team_member(&self, draft: &NewTeamMember) -> RepoResult<TeamMember> {
        let now = now_epoch_ms();
        let member = TeamMember {
            id: Uuid::new_v4(),
            team_id: draft.team_id,
            name: draft.name.trim().to_string(),
            email: normalize_optional(draft.email.as_deref()),
            role: normalize_optional(draft.role.as_deref()),
            created_by: draft.created_by.trim().to_string(),
            created_at: now,
            updated_at: now,
        };
        member.validate()?;

        self.conn.execute(
            "INSERT INTO team_members (
                id,
                team_id,
                name,
                email,
                role,
                created_by,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                member.id.to_string(),
                member.team_id.to_string(),
                member.name.as_str(),
                member.email.as_deref(),
                member.role.as_deref(),
                member.created_by.as_str(),
                member.created_at,
                member.updated_at,
            ],
        )?;
        Ok(member)
    }

    fn update_team_member(&self, member: &TeamMember) -> RepoResult<TeamMember> {
        let mut next = member.clone();
        next.name = next.name.trim().to_string();
        next.email = normalize_optional(next.email.as_deref());
        next.role = normalize_optional(next.role.as_deref());
        next.validate()?;

        let changed = self.conn.execute(
            "UPDATE team_members
             SET
                name = ?1,
                email = ?2,
                role = ?3,
                updated_at = ?4
             WHERE id = ?5;",
            params![
                next.name.as_str(),
                next.email.as_deref(),
                next.role.as_deref(),
                now_epoch_ms(),
                next.id.to_string(),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::not_found(EntityKind::TeamMember, next.id));
        }

        self.get_team_member(next.id)?
            .ok_or_else(|| RepoError::not_found(EntityKind::TeamMember, next.id))
    }

    fn delete_team_member(&self, id: TeamMemberId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM team_members WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::not_found(EntityKind::TeamMember, id));
        }
        Ok(())
    }
}

fn parse_team_row(row: &Row<'_>) -> RepoResult<Team> {
    let id_text: String = row.get("id")?;
    let organization_text: String = row.get("organization_id")?;
    let team = Team {
        id: parse_uuid(&id_text, "teams.id")?,
        organization_id: parse_uuid(&organization_text, "teams.organization_id")?,
        name: row.get("name")?,
        description: row.get("description")?,
        created_by: row.get("created_by")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    };
    team.validate()
        .map_err(|err| RepoError::InvalidData(format!("team {id_text}: {err}")))?;
    Ok(team)
}

fn parse_team_member_row(row: &Row<'_>) -> RepoResult<TeamMember> {
    let id_text: String = row.get("id")?;
    let team_text: String = row.get("team_id")?;
    let member = TeamMember {
        id: parse_uuid(&id_text, "team_members.id")?,
        team_id: parse_uuid(&team_text, "team_members.team_id")?,
        name: row.get("name")?,
        email: row.get("email")?,
        role: row.get("role")?,
        created_by: row.get("created_by")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    };
    member
        .validate()
        .map_err(|err| RepoError::InvalidData(format!("team member {id_text}: {err}")))?;
    Ok(member)
}
