//! Repository for the `project_members` table.

use sqlx::PgPool;

use planmark_core::project::ProjectMember;

use crate::models::project_member::ProjectMemberRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, name, email, role, joined_at";

/// Provides CRUD operations for project membership.
pub struct ProjectMemberRepo;

impl ProjectMemberRepo {
    /// Insert a new member, returning the created row.
    pub async fn create(
        pool: &PgPool,
        member: &ProjectMember,
    ) -> Result<ProjectMemberRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO project_members (id, project_id, name, email, role, joined_at)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectMemberRow>(&query)
            .bind(&member.id)
            .bind(&member.project_id)
            .bind(&member.name)
            .bind(&member.email)
            .bind(member.role.as_str())
            .bind(member.joined_at)
            .fetch_one(pool)
            .await
    }

    /// List a project's members in join order.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: &str,
    ) -> Result<Vec<ProjectMemberRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_members WHERE project_id = $1 ORDER BY joined_at"
        );
        sqlx::query_as::<_, ProjectMemberRow>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Remove a member by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM project_members WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
