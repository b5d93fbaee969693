//! Project row and conversion.

use serde::Serialize;
use sqlx::FromRow;

use planmark_core::drawing::Drawing;
use planmark_core::error::CoreError;
use planmark_core::project::{Project, ProjectMember, ProjectStatus};
use planmark_core::types::Timestamp;

/// A project row from the `projects` table. Drawings and members live in
/// their own tables; [`ProjectRow::into_project`] composes the full
/// entity.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectRow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub status: String,
    pub notes: String,
    pub issue_count: i64,
    pub resolved_count: i64,
    pub created_at: Timestamp,
}

impl ProjectRow {
    /// Assemble the domain entity from this row plus its owned rows.
    pub fn into_project(
        self,
        drawings: Vec<Drawing>,
        team_members: Vec<ProjectMember>,
    ) -> Result<Project, CoreError> {
        Ok(Project {
            status: ProjectStatus::from_str(&self.status)?,
            id: self.id,
            name: self.name,
            description: self.description,
            drawings,
            issue_count: self.issue_count,
            resolved_count: self.resolved_count,
            notes: self.notes,
            team_members,
            created_at: self.created_at,
        })
    }
}
