//! In-memory issue store for the active project.
//!
//! The store is the authoritative local collection: keyed by id, with an
//! explicit insertion-order list. Displayed issue numbers derive from the
//! unfiltered per-drawing slice of that list, so the sidebar and the pin
//! overlay always agree regardless of the filter or sort applied for
//! display.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::CoreError;
use crate::issue::{Issue, IssuePatch, IssueStatus, Severity};
use crate::types::EntityId;

// ---------------------------------------------------------------------------
// Filtering and sorting
// ---------------------------------------------------------------------------

/// Issue origin: synthesized by the analysis pass or entered by a person.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueOrigin {
    Ai,
    Manual,
}

/// Combinable display filter. `None` fields match everything.
#[derive(Debug, Clone, Default)]
pub struct IssueFilter {
    pub issue_type: Option<String>,
    pub severity: Option<Severity>,
    pub status: Option<IssueStatus>,
    pub origin: Option<IssueOrigin>,
}

impl IssueFilter {
    pub fn matches(&self, issue: &Issue) -> bool {
        if let Some(t) = &self.issue_type {
            if issue.issue_type != *t {
                return false;
            }
        }
        if let Some(s) = self.severity {
            if issue.severity != s {
                return false;
            }
        }
        if let Some(s) = self.status {
            if issue.status != s {
                return false;
            }
        }
        match self.origin {
            Some(IssueOrigin::Ai) if !issue.ai_generated => return false,
            Some(IssueOrigin::Manual) if issue.ai_generated => return false,
            _ => {}
        }
        true
    }
}

/// Display sort order. Both sorts are stable, so equal keys keep their
/// insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IssueSort {
    /// Newest first.
    #[default]
    TimestampDesc,
    /// High, then Medium, then Low.
    Severity,
}

/// Per-drawing tallies for the sidebar header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DrawingStats {
    pub total: usize,
    pub open: usize,
    pub resolved: usize,
    pub ai_generated: usize,
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Holds the full issue set for the active project, addressable by id.
#[derive(Debug, Default)]
pub struct IssueStore {
    issues: HashMap<EntityId, Issue>,
    /// Canonical insertion order; the numbering base for display.
    order: Vec<EntityId>,
}

impl IssueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an issue. Re-adding an existing id replaces the value
    /// without duplicating its order entry, so a late durable callback
    /// replaying a create is harmless.
    pub fn add(&mut self, issue: Issue) {
        if !self.issues.contains_key(&issue.id) {
            self.order.push(issue.id.clone());
        }
        self.issues.insert(issue.id.clone(), issue);
    }

    /// Replace the store contents with a freshly loaded issue set,
    /// preserving the given order as the canonical insertion order.
    pub fn load(&mut self, issues: Vec<Issue>) {
        self.issues.clear();
        self.order.clear();
        for issue in issues {
            self.add(issue);
        }
    }

    /// Apply a patch to an existing issue, returning the updated copy.
    pub fn update(&mut self, id: &str, patch: &IssuePatch) -> Result<Issue, CoreError> {
        let issue = self.issues.get_mut(id).ok_or_else(|| CoreError::NotFound {
            entity: "issue",
            id: id.to_string(),
        })?;
        if let Some(t) = &patch.issue_type {
            issue.issue_type = t.clone();
        }
        if let Some(s) = patch.severity {
            issue.severity = s;
        }
        if let Some(d) = &patch.description {
            issue.description = d.clone();
        }
        if let Some(s) = patch.status {
            issue.status = s;
        }
        Ok(issue.clone())
    }

    /// Remove an issue, returning it for counter bookkeeping.
    pub fn remove(&mut self, id: &str) -> Result<Issue, CoreError> {
        let issue = self.issues.remove(id).ok_or_else(|| CoreError::NotFound {
            entity: "issue",
            id: id.to_string(),
        })?;
        self.order.retain(|entry| entry != id);
        Ok(issue)
    }

    /// Remove every issue belonging to a drawing, returning the removed
    /// set in insertion order. Used for cascade deletes.
    pub fn remove_drawing(&mut self, drawing_id: &str) -> Vec<Issue> {
        let ids: Vec<EntityId> = self
            .order
            .iter()
            .filter(|id| {
                self.issues
                    .get(*id)
                    .is_some_and(|i| i.drawing_id == drawing_id)
            })
            .cloned()
            .collect();
        self.order.retain(|id| !ids.contains(id));
        ids.iter().filter_map(|id| self.issues.remove(id)).collect()
    }

    pub fn get(&self, id: &str) -> Option<&Issue> {
        self.issues.get(id)
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn clear(&mut self) {
        self.issues.clear();
        self.order.clear();
    }

    /// Count of issues currently in Resolved status.
    pub fn resolved_len(&self) -> usize {
        self.issues
            .values()
            .filter(|i| i.status.is_resolved())
            .count()
    }

    // -----------------------------------------------------------------------
    // Views
    // -----------------------------------------------------------------------

    /// All issues in insertion order.
    pub fn all(&self) -> Vec<&Issue> {
        self.order
            .iter()
            .filter_map(|id| self.issues.get(id))
            .collect()
    }

    /// The unfiltered per-drawing list in insertion order. This is the
    /// canonical list display numbering is computed from.
    pub fn by_drawing(&self, drawing_id: &str) -> Vec<&Issue> {
        self.order
            .iter()
            .filter_map(|id| self.issues.get(id))
            .filter(|i| i.drawing_id == drawing_id)
            .collect()
    }

    /// Issues on one page of a drawing, for the marker overlay.
    pub fn on_page(&self, drawing_id: &str, page_number: i32) -> Vec<&Issue> {
        self.by_drawing(drawing_id)
            .into_iter()
            .filter(|i| i.page_number == page_number)
            .collect()
    }

    /// The 1-based display number of an issue within its drawing's
    /// unfiltered list. Stable under any filter or sort applied for
    /// display.
    pub fn display_number(&self, issue_id: &str) -> Option<usize> {
        let drawing_id = &self.issues.get(issue_id)?.drawing_id;
        self.by_drawing(drawing_id)
            .iter()
            .position(|i| i.id == issue_id)
            .map(|idx| idx + 1)
    }

    /// Filtered and sorted view of a drawing's issues for the sidebar.
    pub fn view(&self, drawing_id: &str, filter: &IssueFilter, sort: IssueSort) -> Vec<&Issue> {
        let mut issues: Vec<&Issue> = self
            .by_drawing(drawing_id)
            .into_iter()
            .filter(|i| filter.matches(i))
            .collect();
        match sort {
            IssueSort::TimestampDesc => {
                issues.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
            }
            IssueSort::Severity => {
                issues.sort_by_key(|i| i.severity.sort_rank());
            }
        }
        issues
    }

    /// Sidebar tallies over a drawing's unfiltered issue set.
    pub fn stats(&self, drawing_id: &str) -> DrawingStats {
        let issues = self.by_drawing(drawing_id);
        DrawingStats {
            total: issues.len(),
            open: issues
                .iter()
                .filter(|i| i.status == IssueStatus::Open)
                .count(),
            resolved: issues.iter().filter(|i| i.status.is_resolved()).count(),
            ai_generated: issues.iter().filter(|i| i.ai_generated).count(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
