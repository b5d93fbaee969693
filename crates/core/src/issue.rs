//! Issue entity, lifecycle vocabularies, and validation.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::geometry::{validate_position, NormalizedPoint};
use crate::types::{EntityId, Timestamp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum length for an issue description.
pub const MAX_DESCRIPTION_LENGTH: usize = 2_000;

/// Author recorded on issues produced by the analysis pass.
pub const AI_AUTHOR: &str = "AI Assistant";

/// All valid issue type values.
pub const VALID_ISSUE_TYPES: &[&str] = &[
    "Specification Inconsistency",
    "Missing Dimension/Callout",
    "Visual Discrepancy",
    "Code Compliance Concern",
    "Grading/Elevation Issue",
    "Other",
];

// ---------------------------------------------------------------------------
// Severity
// ---------------------------------------------------------------------------

/// Issue severity. Serialized as the capitalized display string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// All valid severity strings.
pub const VALID_SEVERITIES: &[&str] = &["Low", "Medium", "High"];

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            "Low" => Ok(Self::Low),
            "Medium" => Ok(Self::Medium),
            "High" => Ok(Self::High),
            _ => Err(CoreError::Validation(format!(
                "Invalid severity '{s}'. Must be one of: {}",
                VALID_SEVERITIES.join(", ")
            ))),
        }
    }

    /// Sort rank for severity ordering: High sorts first.
    pub fn sort_rank(&self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Issue lifecycle status. The wire string for `InReview` is "In Review",
/// matching the stored vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssueStatus {
    Open,
    #[serde(rename = "In Review")]
    InReview,
    Resolved,
}

/// All valid issue status strings.
pub const VALID_ISSUE_STATUSES: &[&str] = &["Open", "In Review", "Resolved"];

impl IssueStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::InReview => "In Review",
            Self::Resolved => "Resolved",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            "Open" => Ok(Self::Open),
            "In Review" => Ok(Self::InReview),
            "Resolved" => Ok(Self::Resolved),
            _ => Err(CoreError::Validation(format!(
                "Invalid issue status '{s}'. Must be one of: {}",
                VALID_ISSUE_STATUSES.join(", ")
            ))),
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved)
    }
}

// ---------------------------------------------------------------------------
// Entity and DTOs
// ---------------------------------------------------------------------------

/// A positioned issue on a drawing page.
///
/// `position` is normalized to the page's rendered size at creation time
/// and stays valid across zoom and viewport changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub id: EntityId,
    pub drawing_id: EntityId,
    /// 1-based page index within the drawing.
    pub page_number: i32,
    pub position: NormalizedPoint,
    pub issue_type: String,
    pub severity: Severity,
    pub description: String,
    pub status: IssueStatus,
    pub created_by: String,
    pub ai_generated: bool,
    pub timestamp: Timestamp,
}

/// User-entered fields for a new issue. Position and page come from the
/// pending pin; author and timestamps are filled in by the session.
#[derive(Debug, Clone, Deserialize)]
pub struct IssueDraft {
    pub issue_type: String,
    pub severity: Severity,
    pub description: String,
}

/// Patch for an existing issue. Only non-`None` fields are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IssuePatch {
    pub issue_type: Option<String>,
    pub severity: Option<Severity>,
    pub description: Option<String>,
    pub status: Option<IssueStatus>,
}

// ---------------------------------------------------------------------------
// Validation functions
// ---------------------------------------------------------------------------

/// Validate that an issue type string is one of the accepted values.
pub fn validate_issue_type(issue_type: &str) -> Result<(), CoreError> {
    if VALID_ISSUE_TYPES.contains(&issue_type) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid issue type '{issue_type}'. Must be one of: {}",
            VALID_ISSUE_TYPES.join(", ")
        )))
    }
}

/// Validate an issue description: non-blank and within the length cap.
pub fn validate_description(description: &str) -> Result<(), CoreError> {
    if description.trim().is_empty() {
        return Err(CoreError::Validation(
            "Issue description must not be empty".to_string(),
        ));
    }
    if description.len() > MAX_DESCRIPTION_LENGTH {
        return Err(CoreError::Validation(format!(
            "Issue description exceeds {MAX_DESCRIPTION_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate a 1-based page number.
pub fn validate_page_number(page_number: i32) -> Result<(), CoreError> {
    if page_number < 1 {
        return Err(CoreError::Validation(format!(
            "Page number must be >= 1, got {page_number}"
        )));
    }
    Ok(())
}

/// Validate the user-entered fields of a draft. Runs before any store
/// mutation: a rejected draft never reaches persistence.
pub fn validate_issue_draft(draft: &IssueDraft) -> Result<(), CoreError> {
    validate_issue_type(&draft.issue_type)?;
    validate_description(&draft.description)?;
    Ok(())
}

/// Validate a fully assembled issue before it enters a store or backend.
pub fn validate_issue(issue: &Issue) -> Result<(), CoreError> {
    validate_issue_type(&issue.issue_type)?;
    validate_description(&issue.description)?;
    validate_page_number(issue.page_number)?;
    validate_position(issue.position)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
