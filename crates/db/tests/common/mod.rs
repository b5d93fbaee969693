use planmark_core::drawing::Drawing;
use planmark_core::geometry::NormalizedPoint;
use planmark_core::issue::{Issue, IssueStatus, Severity};
use planmark_core::project::{MemberRole, Project, ProjectMember, ProjectStatus};

/// Generate a fresh entity id, the same way interactive sessions do.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Build an active project with zeroed counters and no attached rows.
pub fn new_project(name: &str) -> Project {
    Project {
        id: new_id(),
        name: name.to_string(),
        description: "Multi-modal transportation center".to_string(),
        status: ProjectStatus::Active,
        drawings: Vec::new(),
        issue_count: 0,
        resolved_count: 0,
        notes: String::new(),
        team_members: Vec::new(),
        created_at: chrono::Utc::now(),
    }
}

/// Build a single-page drawing attached to the given project.
pub fn new_drawing(project_id: &str, name: &str) -> Drawing {
    Drawing {
        id: new_id(),
        project_id: project_id.to_string(),
        name: name.to_string(),
        source_ref: format!("drawings/{}.pdf", name),
        page_count: 1,
        uploaded_at: chrono::Utc::now(),
        uploaded_by: "Sarah Chen, PE".to_string(),
    }
}

/// Build an open, manually-authored issue pinned near the lower-left quadrant.
pub fn new_issue(drawing_id: &str, description: &str) -> Issue {
    Issue {
        id: new_id(),
        drawing_id: drawing_id.to_string(),
        page_number: 1,
        position: NormalizedPoint { x: 0.25, y: 0.75 },
        issue_type: "Missing Dimension/Callout".to_string(),
        severity: Severity::Medium,
        description: description.to_string(),
        status: IssueStatus::Open,
        created_by: "Alex Rivera".to_string(),
        ai_generated: false,
        timestamp: chrono::Utc::now(),
    }
}

/// Build a project member with an email derived from the display name.
pub fn new_member(project_id: &str, name: &str, role: MemberRole) -> ProjectMember {
    ProjectMember {
        id: new_id(),
        project_id: project_id.to_string(),
        name: name.to_string(),
        email: format!(
            "{}@example.com",
            name.to_lowercase().replace([' ', ','], ".")
        ),
        role,
        joined_at: chrono::Utc::now(),
    }
}
