//! Team and team member records.
//!
//! Flat CRUD entities scoped to an organization (teams) or a team (members).

use super::organization::OrganizationId;
use super::{is_blank, EntityKind, EpochMs, ModelValidationError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type TeamId = Uuid;
pub type TeamMemberId = Uuid;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: TeamId,
    pub organization_id: OrganizationId,
    pub name: String,
    pub description: Option<String>,
    pub created_by: String,
    pub created_at: EpochMs,
    pub updated_at: EpochMs,
}

impl Team {
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        if is_blank(&self.name) {
            return Err(ModelValidationError::BlankName(EntityKind::Team));
        }
        if is_blank(&self.created_by) {
            return Err(ModelValidationError::BlankOwner(EntityKind::Team));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub id: TeamMemberId,
    pub team_id: TeamId,
    pub name: String,
    pub email: Option<String>,
    pub role: Option<String>,
    pub created_by: String,
    pub created_at: EpochMs,
    pub updated_at: EpochMs,
}

impl TeamMember {
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        if is_blank(&self.name) {
            return Err(ModelValidationError::BlankName(EntityKind::TeamMember));
        }
        if is_blank(&self.created_by) {
            return Err(ModelValidationError::BlankOwner(EntityKind::TeamMember));
        }
        if let Some(email) = self.email.as_deref() {
            if !EMAIL_RE.is_match(email) {
                return Err(ModelValidationError::InvalidEmail(email.to_string()));
            }
        }
        Ok(())
    }
}

/// Creation request for a team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTeam {
    pub organization_id: OrganizationId,
    pub name: String,
    pub description: Option<String>,
    pub created_by: String,
}

/// Creation request for a team member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTeamMember {
    pub team_id: TeamId,
    pub name: String,
    pub email: Option<String>,
    pub role: Option<String>,
    pub created_by: String,
}

#[cfg(test)]
mod tests {
    use super::TeamMember;
    use crate::model::ModelValidationError;
    use uuid::Uuid;

    #[test]
    fn malformed_email_is_rejected() {
        let member = TeamMember {
            id: Uuid::new_v4(),
            team_id: Uuid::new_v4(),
            name: "Ada".to_string(),
            email: Some("ada-at-example".to_string()),
            role: None,
            created_by: "user-1".to_string(),
            created_at: 0,
            updated_at: 0,
        };
        assert!(matches!(
            member.validate(),
            Err(ModelValidationError::InvalidEmail(_))
        ));
    }
}
