//! Drawing entity and validation.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{EntityId, Timestamp};

/// Page count recorded at upload time, before the renderer has reported
/// the true count.
pub const DEFAULT_PAGE_COUNT: i32 = 1;

/// Maximum length for a drawing name.
pub const MAX_DRAWING_NAME_LENGTH: usize = 255;

/// An uploaded PDF drawing. Owned by exactly one project; deleting a
/// drawing cascades to all issues referencing it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Drawing {
    pub id: EntityId,
    pub project_id: EntityId,
    pub name: String,
    /// Retrievable reference to the uploaded source file.
    pub source_ref: String,
    /// Starts at [`DEFAULT_PAGE_COUNT`] and is corrected once the renderer
    /// reports the true count. A correction, not a recreation.
    pub page_count: i32,
    pub uploaded_at: Timestamp,
    pub uploaded_by: String,
}

/// Validate a drawing name: non-blank and within the length cap.
pub fn validate_drawing_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation(
            "Drawing name must not be empty".to_string(),
        ));
    }
    if name.len() > MAX_DRAWING_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Drawing name exceeds {MAX_DRAWING_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate a corrected page count.
pub fn validate_page_count(page_count: i32) -> Result<(), CoreError> {
    if page_count < 1 {
        return Err(CoreError::Validation(format!(
            "Page count must be >= 1, got {page_count}"
        )));
    }
    Ok(())
}
