//! Project repository contract and SQLite implementation.
//!
//! # Invariants
//! - The column/card tree lives in `projects.columns_json` as one blob; every
//!   board write replaces the whole blob (no field-level merge).
//! - New projects start with the default `todo`/`doing`/`done` columns.
//! - `organization_id` and `owner_id` are fixed at creation.

use super::{parse_uuid, RepoError, RepoResult, SqliteStore};
use crate::model::organization::OrganizationId;
use crate::model::project::{Column, NewProject, Project, ProjectId};
use crate::model::{now_epoch_ms, EntityKind};
use rusqlite::{params, Row};
use uuid::Uuid;

const PROJECT_SELECT_SQL: &str = "SELECT
    id,
    organization_id,
    owner_id,
    name,
    columns_json,
    created_at,
    updated_at
FROM projects";

/// Repository interface for project rows.
pub trait ProjectRepository {
    /// Lists projects of one organization, newest first.
    fn list_projects(&self, organization_id: OrganizationId) -> RepoResult<Vec<Project>>;
    fn get_project(&self, id: ProjectId) -> RepoResult<Option<Project>>;
    fn create_project(&self, draft: &NewProject) -> RepoResult<Project>;
    /// Overwrites name and board with the given whole value.
    fn update_project(&self, project: &Project) -> RepoResult<Project>;
    fn delete_project(&self, id: ProjectId) -> RepoResult<()>;
}

impl ProjectRepository for SqliteStore<'_> {
    fn list_projects(&self, organization_id: OrganizationId) -> RepoResult<Vec<Project>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PROJECT_SELECT_SQL}
             WHERE organization_id = ?1
             ORDER BY created_at DESC, rowid DESC;"
        ))?;
        let mut rows = stmt.query([organization_id.to_string()])?;
        let mut projects = Vec::new();
        while let Some(row) = rows.next()? {
            projects.push(parse_project_row(row)?);
        }
        Ok(projects)
    }

    fn get_project(&self, id: ProjectId) -> RepoResult<Option<Project>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PROJECT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_project_row(row)?));
        }
        Ok(None)
    }

    fn create_project(&self, draft: &NewProject) -> RepoResult<Project> {
        let now = now_epoch_ms();
        let project = Project {
            id: Uuid::new_v4(),
            name: draft.name.trim().to_string(),
            organization_id: draft.organization_id,
            owner_id: draft.owner_id.trim().to_string(),
            columns: Project::default_columns(),
            created_at: now,
            updated_at: now,
        };
        project.validate()?;

        self.conn.execute(
            "INSERT INTO projects (
                id,
                organization_id,
                owner_id,
                name,
                columns_json,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                project.id.to_string(),
                project.organization_id.to_string(),
                project.owner_id.as_str(),
                project.name.as_str(),
                encode_columns(&project.columns)?,
                project.created_at,
                project.updated_at,
            ],
        )?;

        Ok(project)
    }

    fn update_project(&self, project: &Project) -> RepoResult<Project> {
        project.validate()?;

        let changed = self.conn.execute(
            "UPDATE projects
             SET
                name = ?1,
                columns_json = ?2,
                updated_at = ?3
             WHERE id = ?4;",
            params![
                project.name.trim(),
                encode_columns(&project.columns)?,
                now_epoch_ms(),
                project.id.to_string(),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::not_found(EntityKind::Project, project.id));
        }

        self.get_project(project.id)?
            .ok_or_else(|| RepoError::not_found(EntityKind::Project, project.id))
    }

    fn delete_project(&self, id: ProjectId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM projects WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::not_found(EntityKind::Project, id));
        }
        Ok(())
    }
}

fn encode_columns(columns: &[Column]) -> RepoResult<String> {
    serde_json::to_string(columns)
        .map_err(|err| RepoError::InvalidData(format!("cannot encode board: {err}")))
}

fn parse_project_row(row: &Row<'_>) -> RepoResult<Project> {
    let id_text: String = row.get("id")?;
    let organization_text: String = row.get("organization_id")?;
    let columns_json: String = row.get("columns_json")?;
    let columns: Vec<Column> = serde_json::from_str(&columns_json).map_err(|err| {
        RepoError::InvalidData(format!("invalid board in projects.columns_json: {err}"))
    })?;

    let project = Project {
        id: parse_uuid(&id_text, "projects.id")?,
        name: row.get("name")?,
        organization_id: parse_uuid(&organization_text, "projects.organization_id")?,
        owner_id: row.get("owner_id")?,
        columns,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    };
    project
        .validate()
        .map_err(|err| RepoError::InvalidData(format!("project {id_text}: {err}")))?;
    Ok(project)
}
