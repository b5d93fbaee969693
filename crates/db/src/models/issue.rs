//! Issue row and conversion.

use serde::Serialize;
use sqlx::FromRow;

use planmark_core::error::CoreError;
use planmark_core::geometry::NormalizedPoint;
use planmark_core::issue::{Issue, IssueStatus, Severity};
use planmark_core::types::Timestamp;

/// An issue row from the `issues` table. Position is stored flattened as
/// `x`/`y` columns; severity and status are TEXT and parsed on the way
/// out.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct IssueRow {
    pub id: String,
    pub drawing_id: String,
    pub page_number: i32,
    pub x: f64,
    pub y: f64,
    pub issue_type: String,
    pub severity: String,
    pub description: String,
    pub status: String,
    pub created_by: String,
    pub ai_generated: bool,
    pub created_at: Timestamp,
}

impl IssueRow {
    pub fn into_issue(self) -> Result<Issue, CoreError> {
        Ok(Issue {
            severity: Severity::from_str(&self.severity)?,
            status: IssueStatus::from_str(&self.status)?,
            id: self.id,
            drawing_id: self.drawing_id,
            page_number: self.page_number,
            position: NormalizedPoint {
                x: self.x,
                y: self.y,
            },
            issue_type: self.issue_type,
            description: self.description,
            created_by: self.created_by,
            ai_generated: self.ai_generated,
            timestamp: self.created_at,
        })
    }
}
