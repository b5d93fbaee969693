//! Repository for the `issues` table.

use sqlx::PgPool;

use planmark_core::issue::{Issue, IssuePatch};

use crate::models::issue::IssueRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, drawing_id, page_number, x, y, issue_type, severity, description, \
                       status, created_by, ai_generated, created_at";

/// Provides CRUD operations for issues.
pub struct IssueRepo;

impl IssueRepo {
    /// Insert a new issue, returning the created row.
    pub async fn create(pool: &PgPool, issue: &Issue) -> Result<IssueRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO issues (id, drawing_id, page_number, x, y, issue_type, severity,
                                 description, status, created_by, ai_generated, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, IssueRow>(&query)
            .bind(&issue.id)
            .bind(&issue.drawing_id)
            .bind(issue.page_number)
            .bind(issue.position.x)
            .bind(issue.position.y)
            .bind(&issue.issue_type)
            .bind(issue.severity.as_str())
            .bind(&issue.description)
            .bind(issue.status.as_str())
            .bind(&issue.created_by)
            .bind(issue.ai_generated)
            .bind(issue.timestamp)
            .fetch_one(pool)
            .await
    }

    /// Find an issue by ID.
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<IssueRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM issues WHERE id = $1");
        sqlx::query_as::<_, IssueRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Load every issue belonging to a project's drawings, in creation
    /// order. Creation order is the canonical numbering base, so the
    /// ordering here must stay ascending.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: &str,
    ) -> Result<Vec<IssueRow>, sqlx::Error> {
        let query = "SELECT i.id, i.drawing_id, i.page_number, i.x, i.y, i.issue_type,
                            i.severity, i.description, i.status, i.created_by, i.ai_generated,
                            i.created_at
                     FROM issues i
                     JOIN drawings d ON d.id = i.drawing_id
                     WHERE d.project_id = $1
                     ORDER BY i.created_at, i.id";
        sqlx::query_as::<_, IssueRow>(query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// List a drawing's issues in creation order.
    pub async fn list_by_drawing(
        pool: &PgPool,
        drawing_id: &str,
    ) -> Result<Vec<IssueRow>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM issues WHERE drawing_id = $1 ORDER BY created_at, id");
        sqlx::query_as::<_, IssueRow>(&query)
            .bind(drawing_id)
            .fetch_all(pool)
            .await
    }

    /// Update an issue. Only non-`None` fields in `patch` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: &str,
        patch: &IssuePatch,
    ) -> Result<Option<IssueRow>, sqlx::Error> {
        let query = format!(
            "UPDATE issues SET
                issue_type = COALESCE($2, issue_type),
                severity = COALESCE($3, severity),
                description = COALESCE($4, description),
                status = COALESCE($5, status)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, IssueRow>(&query)
            .bind(id)
            .bind(&patch.issue_type)
            .bind(patch.severity.map(|s| s.as_str()))
            .bind(&patch.description)
            .bind(patch.status.map(|s| s.as_str()))
            .fetch_optional(pool)
            .await
    }

    /// Delete an issue by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM issues WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
