//! Repository for the `projects` table.

use sqlx::PgPool;

use planmark_core::counter::CounterDelta;
use planmark_core::project::{Project, ProjectPatch};

use crate::models::project::ProjectRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, name, description, status, notes, issue_count, resolved_count, created_at";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project row. Drawings and members are stored through
    /// their own repositories.
    pub async fn create(pool: &PgPool, project: &Project) -> Result<ProjectRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (id, name, description, status, notes, issue_count, resolved_count, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectRow>(&query)
            .bind(&project.id)
            .bind(&project.name)
            .bind(&project.description)
            .bind(project.status.as_str())
            .bind(&project.notes)
            .bind(project.issue_count)
            .bind(project.resolved_count)
            .bind(project.created_at)
            .fetch_one(pool)
            .await
    }

    /// Find a project by ID.
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<ProjectRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, ProjectRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all projects, most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<ProjectRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects ORDER BY created_at DESC");
        sqlx::query_as::<_, ProjectRow>(&query)
            .fetch_all(pool)
            .await
    }

    /// Update a project. Only non-`None` fields in `patch` are applied.
    /// Counters are adjusted through [`ProjectRepo::adjust_counters`],
    /// never patched directly.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: &str,
        patch: &ProjectPatch,
    ) -> Result<Option<ProjectRow>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                status = COALESCE($4, status),
                notes = COALESCE($5, notes)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectRow>(&query)
            .bind(id)
            .bind(&patch.name)
            .bind(&patch.description)
            .bind(patch.status.map(|s| s.as_str()))
            .bind(&patch.notes)
            .fetch_optional(pool)
            .await
    }

    /// Apply a counter delta to a project's cached aggregates, clamping
    /// both counters at zero. Returns `true` if a row was adjusted.
    pub async fn adjust_counters(
        pool: &PgPool,
        id: &str,
        delta: CounterDelta,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE projects SET
                issue_count = GREATEST(0, issue_count + $2),
                resolved_count = GREATEST(0, resolved_count + $3)
             WHERE id = $1",
        )
        .bind(id)
        .bind(delta.issue_count)
        .bind(delta.resolved_count)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a project by ID. Drawings, issues, and members cascade.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
