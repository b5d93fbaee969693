//! Project aggregate counters.
//!
//! `issue_count` and `resolved_count` are cached on the project row
//! rather than recomputed per read. Every issue-set transition maps to a
//! delta; applying deltas through [`apply_delta`] keeps both counters
//! consistent and clamped.

use crate::issue::IssueStatus;
use crate::project::Project;

/// An issue-set transition affecting a project's counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueTransition {
    Create,
    Delete { was_resolved: bool },
    StatusChange { from: IssueStatus, to: IssueStatus },
}

/// Signed adjustment to a project's cached counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CounterDelta {
    pub issue_count: i64,
    pub resolved_count: i64,
}

impl CounterDelta {
    /// Delta for a single issue transition.
    pub fn for_transition(transition: IssueTransition) -> Self {
        match transition {
            IssueTransition::Create => Self {
                issue_count: 1,
                resolved_count: 0,
            },
            IssueTransition::Delete { was_resolved } => Self {
                issue_count: -1,
                resolved_count: if was_resolved { -1 } else { 0 },
            },
            IssueTransition::StatusChange { from, to } => Self {
                issue_count: 0,
                resolved_count: match (from.is_resolved(), to.is_resolved()) {
                    (false, true) => 1,
                    (true, false) => -1,
                    _ => 0,
                },
            },
        }
    }

    /// Delta for deleting a drawing's whole issue set.
    pub fn for_cascade(total: usize, resolved: usize) -> Self {
        Self {
            issue_count: -(total as i64),
            resolved_count: -(resolved as i64),
        }
    }

    /// Whether applying this delta changes nothing.
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

/// Apply a delta to a counter pair. Neither counter ever goes negative:
/// any delta that would drive one below zero clamps at 0.
pub fn apply_delta(issue_count: i64, resolved_count: i64, delta: CounterDelta) -> (i64, i64) {
    (
        (issue_count + delta.issue_count).max(0),
        (resolved_count + delta.resolved_count).max(0),
    )
}

impl Project {
    /// Apply a counter delta to this project's cached aggregates.
    pub fn apply_counter_delta(&mut self, delta: CounterDelta) {
        let (issues, resolved) = apply_delta(self.issue_count, self.resolved_count, delta);
        self.issue_count = issues;
        self.resolved_count = resolved;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::IssueStatus::{InReview, Open, Resolved};

    fn delta(t: IssueTransition) -> (i64, i64) {
        let d = CounterDelta::for_transition(t);
        (d.issue_count, d.resolved_count)
    }

    // -- transition table ----------------------------------------------------

    #[test]
    fn create_increments_issue_count_only() {
        assert_eq!(delta(IssueTransition::Create), (1, 0));
    }

    #[test]
    fn delete_resolved_decrements_both() {
        assert_eq!(
            delta(IssueTransition::Delete { was_resolved: true }),
            (-1, -1)
        );
    }

    #[test]
    fn delete_unresolved_decrements_issue_count_only() {
        assert_eq!(
            delta(IssueTransition::Delete {
                was_resolved: false
            }),
            (-1, 0)
        );
    }

    #[test]
    fn resolving_increments_resolved_count() {
        assert_eq!(
            delta(IssueTransition::StatusChange {
                from: Open,
                to: Resolved
            }),
            (0, 1)
        );
        assert_eq!(
            delta(IssueTransition::StatusChange {
                from: InReview,
                to: Resolved
            }),
            (0, 1)
        );
    }

    #[test]
    fn unresolving_decrements_resolved_count() {
        assert_eq!(
            delta(IssueTransition::StatusChange {
                from: Resolved,
                to: Open
            }),
            (0, -1)
        );
    }

    #[test]
    fn non_resolved_status_changes_are_neutral() {
        assert_eq!(
            delta(IssueTransition::StatusChange {
                from: Open,
                to: InReview
            }),
            (0, 0)
        );
        assert_eq!(
            delta(IssueTransition::StatusChange {
                from: Resolved,
                to: Resolved
            }),
            (0, 0)
        );
    }

    // -- clamping ------------------------------------------------------------

    #[test]
    fn apply_clamps_at_zero() {
        let d = CounterDelta {
            issue_count: -5,
            resolved_count: -2,
        };
        assert_eq!(apply_delta(3, 1, d), (0, 0));
    }

    #[test]
    fn cascade_delta_matches_issue_set() {
        let d = CounterDelta::for_cascade(4, 1);
        assert_eq!((d.issue_count, d.resolved_count), (-4, -1));
        assert_eq!(apply_delta(5, 2, d), (1, 1));
    }
}
