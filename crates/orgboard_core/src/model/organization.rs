//! Organization domain model.
//!
//! # Responsibility
//! - Define the top-level ownership/access scope record.
//! - Check the password protection invariant.
//!
//! # Invariants
//! - `password_hash` is present iff `is_password_protected` is true.
//! - `name` and `owner_id` are never blank.

use super::{is_blank, EntityKind, EpochMs, ModelValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable organization identifier.
pub type OrganizationId = Uuid;

/// Canonical organization record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: OrganizationId,
    pub name: String,
    pub description: Option<String>,
    /// Opaque reference to the owning user, issued by the external auth layer.
    pub owner_id: String,
    pub is_password_protected: bool,
    /// Stored secret transform. Never serialized outward.
    #[serde(skip_serializing, default)]
    pub password_hash: Option<String>,
    pub created_at: EpochMs,
    pub updated_at: EpochMs,
}

impl Organization {
    /// Checks name, owner and password invariants.
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        if is_blank(&self.name) {
            return Err(ModelValidationError::BlankName(EntityKind::Organization));
        }
        if is_blank(&self.owner_id) {
            return Err(ModelValidationError::BlankOwner(EntityKind::Organization));
        }
        if self.is_password_protected != self.password_hash.is_some() {
            return Err(ModelValidationError::PasswordFlagMismatch {
                is_password_protected: self.is_password_protected,
                has_hash: self.password_hash.is_some(),
            });
        }
        Ok(())
    }
}

/// Creation request for an organization.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewOrganization {
    pub name: String,
    pub description: Option<String>,
    pub owner_id: String,
    /// Plain secret; `Some` turns protection on. Hashed by the store adapter.
    pub password: Option<String>,
}

impl NewOrganization {
    pub fn new(name: impl Into<String>, owner_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            owner_id: owner_id.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }
}
