//! Repository for the `drawings` table.

use sqlx::PgPool;

use planmark_core::drawing::Drawing;

use crate::models::drawing::DrawingRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, name, source_ref, page_count, uploaded_at, uploaded_by";

/// Provides CRUD operations for drawings.
pub struct DrawingRepo;

impl DrawingRepo {
    /// Insert a new drawing, returning the created row.
    pub async fn create(pool: &PgPool, drawing: &Drawing) -> Result<DrawingRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO drawings (id, project_id, name, source_ref, page_count, uploaded_at, uploaded_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DrawingRow>(&query)
            .bind(&drawing.id)
            .bind(&drawing.project_id)
            .bind(&drawing.name)
            .bind(&drawing.source_ref)
            .bind(drawing.page_count)
            .bind(drawing.uploaded_at)
            .bind(&drawing.uploaded_by)
            .fetch_one(pool)
            .await
    }

    /// Find a drawing by ID.
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<DrawingRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM drawings WHERE id = $1");
        sqlx::query_as::<_, DrawingRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a project's drawings in upload order.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: &str,
    ) -> Result<Vec<DrawingRow>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM drawings WHERE project_id = $1 ORDER BY uploaded_at");
        sqlx::query_as::<_, DrawingRow>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Correct a drawing's page count once the renderer has reported the
    /// true value. Returns `true` if a row was updated.
    pub async fn update_page_count(
        pool: &PgPool,
        id: &str,
        page_count: i32,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE drawings SET page_count = $2 WHERE id = $1")
            .bind(id)
            .bind(page_count)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a drawing by ID. Its issues cascade. Returns `true` if a
    /// row was removed.
    pub async fn delete(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM drawings WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
