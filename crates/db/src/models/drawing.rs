//! Drawing row and conversion.

use serde::Serialize;
use sqlx::FromRow;

use planmark_core::drawing::Drawing;
use planmark_core::types::Timestamp;

/// A drawing row from the `drawings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DrawingRow {
    pub id: String,
    pub project_id: String,
    pub name: String,
    pub source_ref: String,
    pub page_count: i32,
    pub uploaded_at: Timestamp,
    pub uploaded_by: String,
}

impl From<DrawingRow> for Drawing {
    fn from(row: DrawingRow) -> Self {
        Drawing {
            id: row.id,
            project_id: row.project_id,
            name: row.name,
            source_ref: row.source_ref,
            page_count: row.page_count,
            uploaded_at: row.uploaded_at,
            uploaded_by: row.uploaded_by,
        }
    }
}
