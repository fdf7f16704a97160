//! Organization repository contract and SQLite implementation.
//!
//! # Invariants
//! - `is_password_protected = 1` iff `password_hash IS NOT NULL` (also
//!   enforced by a table CHECK).
//! - Plain secrets never reach SQL; only their salted transform does.
//! - Verifying against an unknown organization answers `false`.

use super::secret::{hash_secret, verify_secret};
use super::{bool_to_int, parse_flag, parse_uuid, RepoError, RepoResult, SqliteStore};
use crate::model::organization::{NewOrganization, Organization, OrganizationId};
use crate::model::{normalize_optional, now_epoch_ms, EntityKind};
use rusqlite::{params, OptionalExtension, Row};
use uuid::Uuid;

const ORGANIZATION_SELECT_SQL: &str = "SELECT
    id,
    name,
    description,
    owner_id,
    is_password_protected,
    password_hash,
    created_at,
    updated_at
FROM organizations";

/// Repository interface for organization rows.
pub trait OrganizationRepository {
    /// Lists organizations owned by `owner_id`, newest first.
    fn list_organizations(&self, owner_id: &str) -> RepoResult<Vec<Organization>>;
    fn get_organization(&self, id: OrganizationId) -> RepoResult<Option<Organization>>;
    fn create_organization(&self, draft: &NewOrganization) -> RepoResult<Organization>;
    /// Overwrites name and description; protection is changed only through
    /// `set_organization_password`.
    fn update_organization(&self, organization: &Organization) -> RepoResult<Organization>;
    /// Enables, changes (`Some`) or removes (`None`) password protection.
    fn set_organization_password(
        &self,
        id: OrganizationId,
        password: Option<&str>,
    ) -> RepoResult<Organization>;
    /// Compares a submitted secret with the stored transform.
    ///
    /// Unprotected organizations always verify; unknown ids never do.
    fn verify_organization_password(&self, id: OrganizationId, secret: &str) -> RepoResult<bool>;
    fn delete_organization(&self, id: OrganizationId) -> RepoResult<()>;
}

impl OrganizationRepository for SqliteStore<'_> {
    fn list_organizations(&self, owner_id: &str) -> RepoResult<Vec<Organization>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ORGANIZATION_SELECT_SQL}
             WHERE owner_id = ?1
             ORDER BY created_at DESC, rowid DESC;"
        ))?;
        let mut rows = stmt.query([owner_id])?;
        let mut organizations = Vec::new();
        while let Some(row) = rows.next()? {
            organizations.push(parse_organization_row(row)?);
        }
        Ok(organizations)
    }

    fn get_organization(&self, id: OrganizationId) -> RepoResult<Option<Organization>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ORGANIZATION_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_organization_row(row)?));
        }
        Ok(None)
    }

    fn create_organization(&self, draft: &NewOrganization) -> RepoResult<Organization> {
        let password_hash = draft.password.as_deref().map(hash_secret).transpose()?;
        let now = now_epoch_ms();
        let organization = Organization {
            id: Uuid::new_v4(),
            name: draft.name.trim().to_string(),
            description: normalize_optional(draft.description.as_deref()),
            owner_id: draft.owner_id.trim().to_string(),
            is_password_protected: password_hash.is_some(),
            password_hash,
            created_at: now,
            updated_at: now,
        };
        organization.validate()?;

        self.conn.execute(
            "INSERT INTO organizations (
                id,
                name,
                description,
                owner_id,
                is_password_protected,
                password_hash,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                organization.id.to_string(),
                organization.name.as_str(),
                organization.description.as_deref(),
                organization.owner_id.as_str(),
                bool_to_int(organization.is_password_protected),
                organization.password_hash.as_deref(),
                organization.created_at,
                organization.updated_at,
            ],
        )?;

        Ok(organization)
    }

    fn update_organization(&self, organization: &Organization) -> RepoResult<Organization> {
        let mut next = organization.clone();
        next.name = next.name.trim().to_string();
        next.description = normalize_optional(next.description.as_deref());
        next.validate()?;

        let changed = self.conn.execute(
            "UPDATE organizations
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
            return Err(RepoError::not_found(EntityKind::Organization, next.id));
        }

        self.load_required_organization(next.id)
    }

    fn set_organization_password(
        &self,
        id: OrganizationId,
        password: Option<&str>,
    ) -> RepoResult<Organization> {
        let password_hash = password.map(hash_secret).transpose()?;
        let changed = self.conn.execute(
            "UPDATE organizations
             SET
                is_password_protected = ?1,
                password_hash = ?2,
                updated_at = ?3
             WHERE id = ?4;",
            params![
                bool_to_int(password_hash.is_some()),
                password_hash.as_deref(),
                now_epoch_ms(),
                id.to_string(),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::not_found(EntityKind::Organization, id));
        }

        self.load_required_organization(id)
    }

    fn verify_organization_password(&self, id: OrganizationId, secret: &str) -> RepoResult<bool> {
        let stored = self
            .conn
            .query_row(
                "SELECT is_password_protected, password_hash FROM organizations WHERE id = ?1;",
                [id.to_string()],
                |row| Ok((row.get::<_, i64>(0)?, row.get::<_, Option<String>>(1)?)),
            )
            .optional()?;

        let Some((flag, password_hash)) = stored else {
            return Ok(false);
        };
        if !parse_flag(flag, "organizations.is_password_protected")? {
            return Ok(true);
        }
        Ok(password_hash
            .as_deref()
            .is_some_and(|stored| verify_secret(secret, stored)))
    }

    fn delete_organization(&self, id: OrganizationId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM organizations WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::not_found(EntityKind::Organization, id));
        }
        Ok(())
    }
}

impl SqliteStore<'_> {
    fn load_required_organization(&self, id: OrganizationId) -> RepoResult<Organization> {
        self.get_organization(id)?
            .ok_or_else(|| RepoError::not_found(EntityKind::Organization, id))
    }
}

fn parse_organization_row(row: &Row<'_>) -> RepoResult<Organization> {
    let id_text: String = row.get("id")?;
    let organization = Organization {
        id: parse_uuid(&id_text, "organizations.id")?,
        name: row.get("name")?,
        description: row.get("description")?,
        owner_id: row.get("owner_id")?,
        is_password_protected: parse_flag(
            row.get("is_password_protected")?,
            "organizations.is_password_protected",
        )?,
        password_hash: row.get("password_hash")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    };
    organization
        .validate()
        .map_err(|err| RepoError::InvalidData(format!("organization {id_text}: {err}")))?;
    Ok(organization)
}
