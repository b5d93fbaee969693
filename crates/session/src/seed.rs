//! Built-in demo projects.
//!
//! Three civil-engineering review projects, each with one attached
//! drawing and a small team: two active, one completed. The demo binary
//! seeds these through the gateway so the demo identity always lands on
//! a populated dashboard. Counters carry the review history the project
//! notes describe; they are seed state, not derived from seeded issues.

use chrono::{TimeZone, Utc};

use planmark_core::drawing::{Drawing, DEFAULT_PAGE_COUNT};
use planmark_core::project::{MemberRole, Project, ProjectMember, ProjectStatus};
use planmark_core::types::Timestamp;

const TRANSIT_HUB_NOTES: &str = "\
**Project Kickoff - January 15, 2024**

Underground parking will use a post-tensioned concrete system. Platform
integration requires coordination with the transit authority; the
environmental review is complete and awaiting final approval.

**Critical Items - January 25, 2024**

Resolve elevation conflicts between the parking level and the transit
platform. MEP ventilation coordination and fire code review pending.

**Progress Update - February 1, 2024**

8 issues identified, 2 resolved. Focus areas: ADA compliance and
structural coordination. Building permit submittal targeted for end of
month.";

const RIVER_WALK_NOTES: &str = "\
**Project Initiation - February 3, 2024**

1.2 mile riverwalk with boardwalk sections and flood control
improvements, including retention basins. City parks department
coordination required.

**Environmental Considerations - February 5, 2024**

Wetland delineation complete with no impacts to protected areas. The
stormwater management plan is approved by the city.

**Current Status - February 15, 2024**

7 issues identified, 1 resolved. Main focus is FEMA flood elevation
compliance; awaiting final approval from the water resources
department.";

const HIGHLAND_NOTES: &str = "\
**Project Completion Summary - December 2023**

Successfully completed with all 23 issues resolved. Grading and
drainage work finished per specifications, final inspections passed,
and as-built drawings submitted to the city.

**Lessons Learned:**

Early utility coordination proved critical, and assisted review cut
drawing review time by roughly 60%.

**Project Closed - December 22, 2023**";

/// The three projects the demo environment starts with.
pub fn demo_projects() -> Vec<Project> {
    vec![transit_hub(), river_walk(), highland()]
}

fn transit_hub() -> Project {
    Project {
        id: "demo-project-1".to_string(),
        name: "Downtown Transit Hub".to_string(),
        description: "Multi-modal transportation center with underground parking structure"
            .to_string(),
        status: ProjectStatus::Active,
        drawings: vec![Drawing {
            id: "demo-drawing-1".to_string(),
            project_id: "demo-project-1".to_string(),
            name: "Site Plan - Level 1 Parking & Transit Platform".to_string(),
            source_ref: "demo/example_drawing2.pdf".to_string(),
            page_count: DEFAULT_PAGE_COUNT,
            uploaded_at: at(2024, 1, 16, 9, 0),
            uploaded_by: "Sarah Chen, PE".to_string(),
        }],
        issue_count: 8,
        resolved_count: 2,
        notes: TRANSIT_HUB_NOTES.to_string(),
        team_members: vec![
            member(
                "demo-member-1-1",
                "demo-project-1",
                "Sarah Chen, PE",
                "sarah.chen@example.com",
                MemberRole::Senior,
                at(2024, 1, 15, 0, 0),
            ),
            member(
                "demo-member-1-2",
                "demo-project-1",
                "Alex Rivera",
                "alex.rivera@example.com",
                MemberRole::Junior,
                at(2024, 1, 16, 0, 0),
            ),
            member(
                "demo-member-1-3",
                "demo-project-1",
                "Michael Park, PE",
                "michael.park@example.com",
                MemberRole::Senior,
                at(2024, 1, 18, 0, 0),
            ),
            member(
                "demo-member-1-4",
                "demo-project-1",
                "Jessica Martinez",
                "jessica.martinez@example.com",
                MemberRole::Junior,
                at(2024, 1, 20, 0, 0),
            ),
        ],
        created_at: at(2024, 1, 15, 0, 0),
    }
}

fn river_walk() -> Project {
    Project {
        id: "demo-project-2".to_string(),
        name: "River Walk Development".to_string(),
        description: "Mixed-use development with pedestrian riverwalk and flood control improvements"
            .to_string(),
        status: ProjectStatus::Active,
        drawings: vec![Drawing {
            id: "demo-drawing-2".to_string(),
            project_id: "demo-project-2".to_string(),
            name: "Grading & Drainage Plan - Riverwalk Section".to_string(),
            source_ref: "demo/example_drawing3.pdf".to_string(),
            page_count: DEFAULT_PAGE_COUNT,
            uploaded_at: at(2024, 2, 4, 8, 30),
            uploaded_by: "Sarah Chen, PE".to_string(),
        }],
        issue_count: 7,
        resolved_count: 1,
        notes: RIVER_WALK_NOTES.to_string(),
        team_members: vec![
            member(
                "demo-member-2-1",
                "demo-project-2",
                "Sarah Chen, PE",
                "sarah.chen@example.com",
                MemberRole::Senior,
                at(2024, 2, 3, 0, 0),
            ),
            member(
                "demo-member-2-2",
                "demo-project-2",
                "David Kim",
                "david.kim@example.com",
                MemberRole::Junior,
                at(2024, 2, 4, 0, 0),
            ),
            member(
                "demo-member-2-3",
                "demo-project-2",
                "Emily Watson, PE",
                "emily.watson@example.com",
                MemberRole::Senior,
                at(2024, 2, 5, 0, 0),
            ),
        ],
        created_at: at(2024, 2, 3, 0, 0),
    }
}

fn highland() -> Project {
    Project {
        id: "demo-project-3".to_string(),
        name: "Highland Residential Subdivision".to_string(),
        description: "Residential subdivision with storm drainage and grading improvements"
            .to_string(),
        status: ProjectStatus::Completed,
        drawings: vec![Drawing {
            id: "demo-drawing-3".to_string(),
            project_id: "demo-project-3".to_string(),
            name: "Final Site Plan - Phase 1 Subdivision".to_string(),
            source_ref: "demo/example_drawing4.pdf".to_string(),
            page_count: DEFAULT_PAGE_COUNT,
            uploaded_at: at(2023, 12, 11, 9, 0),
            uploaded_by: "Sarah Chen, PE".to_string(),
        }],
        issue_count: 23,
        resolved_count: 23,
        notes: HIGHLAND_NOTES.to_string(),
        team_members: vec![
            member(
                "demo-member-3-1",
                "demo-project-3",
                "Sarah Chen, PE",
                "sarah.chen@example.com",
                MemberRole::Senior,
                at(2023, 12, 10, 0, 0),
            ),
            member(
                "demo-member-3-2",
                "demo-project-3",
                "Alex Rivera",
                "alex.rivera@example.com",
                MemberRole::Junior,
                at(2023, 12, 11, 0, 0),
            ),
            member(
                "demo-member-3-3",
                "demo-project-3",
                "Robert Thompson, PE",
                "robert.thompson@example.com",
                MemberRole::Senior,
                at(2023, 12, 12, 0, 0),
            ),
            member(
                "demo-member-3-4",
                "demo-project-3",
                "Lisa Anderson",
                "lisa.anderson@example.com",
                MemberRole::Junior,
                at(2023, 12, 15, 0, 0),
            ),
            member(
                "demo-member-3-5",
                "demo-project-3",
                "James Wilson",
                "james.wilson@example.com",
                MemberRole::Junior,
                at(2023, 12, 18, 0, 0),
            ),
        ],
        created_at: at(2023, 12, 10, 0, 0),
    }
}

fn member(
    id: &str,
    project_id: &str,
    name: &str,
    email: &str,
    role: MemberRole,
    joined_at: Timestamp,
) -> ProjectMember {
    ProjectMember {
        id: id.to_string(),
        project_id: project_id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        role,
        joined_at,
    }
}

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> Timestamp {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .unwrap_or_default()
}
