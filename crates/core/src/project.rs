//! Project entity, status vocabulary, and membership.

use serde::{Deserialize, Serialize};

use crate::drawing::Drawing;
use crate::error::CoreError;
use crate::types::{EntityId, Timestamp};

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Project lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    Active,
    Completed,
    OnHold,
}

/// All valid project status strings.
pub const VALID_PROJECT_STATUSES: &[&str] = &["active", "completed", "on-hold"];

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::OnHold => "on-hold",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "on-hold" => Ok(Self::OnHold),
            _ => Err(CoreError::Validation(format!(
                "Invalid project status '{s}'. Must be one of: {}",
                VALID_PROJECT_STATUSES.join(", ")
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Membership
// ---------------------------------------------------------------------------

/// Member role. Opaque display-tier gating only; carries no authorization
/// semantics in the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Junior,
    Senior,
}

/// All valid member role strings.
pub const VALID_MEMBER_ROLES: &[&str] = &["junior", "senior"];

impl MemberRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Junior => "junior",
            Self::Senior => "senior",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            "junior" => Ok(Self::Junior),
            "senior" => Ok(Self::Senior),
            _ => Err(CoreError::Validation(format!(
                "Invalid member role '{s}'. Must be one of: {}",
                VALID_MEMBER_ROLES.join(", ")
            ))),
        }
    }
}

/// A person attached to a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMember {
    pub id: EntityId,
    pub project_id: EntityId,
    pub name: String,
    pub email: String,
    pub role: MemberRole,
    pub joined_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A review project with its drawings and cached issue aggregates.
///
/// `issue_count` and `resolved_count` are derived but cached: after every
/// issue mutation settles they must equal the live issue count and the
/// live Resolved count across all of the project's drawings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: EntityId,
    pub name: String,
    pub description: String,
    pub status: ProjectStatus,
    pub drawings: Vec<Drawing>,
    pub issue_count: i64,
    pub resolved_count: i64,
    pub notes: String,
    pub team_members: Vec<ProjectMember>,
    pub created_at: Timestamp,
}

impl Project {
    pub fn drawing(&self, drawing_id: &str) -> Option<&Drawing> {
        self.drawings.iter().find(|d| d.id == drawing_id)
    }

    pub fn drawing_mut(&mut self, drawing_id: &str) -> Option<&mut Drawing> {
        self.drawings.iter_mut().find(|d| d.id == drawing_id)
    }
}

/// Fields a project update may change. Counters are adjusted separately
/// through deltas, never patched directly.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    pub notes: Option<String>,
}

/// Validate a project name: non-blank.
pub fn validate_project_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation(
            "Project name must not be empty".to_string(),
        ));
    }
    Ok(())
}
