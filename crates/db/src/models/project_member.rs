//! Project member row and conversion.

use serde::Serialize;
use sqlx::FromRow;

use planmark_core::error::CoreError;
use planmark_core::project::{MemberRole, ProjectMember};
use planmark_core::types::Timestamp;

/// A membership row from the `project_members` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectMemberRow {
    pub id: String,
    pub project_id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub joined_at: Timestamp,
}

impl ProjectMemberRow {
    pub fn into_member(self) -> Result<ProjectMember, CoreError> {
        Ok(ProjectMember {
            role: MemberRole::from_str(&self.role)?,
            id: self.id,
            project_id: self.project_id,
            name: self.name,
            email: self.email,
            joined_at: self.joined_at,
        })
    }
}
