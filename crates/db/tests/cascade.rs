//! Integration tests for referential cleanup.
//!
//! Deletes cascade down the hierarchy: removing a drawing removes its
//! issues, and removing a project removes everything underneath it.

mod common;

use sqlx::PgPool;

use planmark_core::project::MemberRole;
use planmark_db::repositories::{DrawingRepo, IssueRepo, ProjectMemberRepo, ProjectRepo};

use common::{new_drawing, new_issue, new_member, new_project};

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleting_a_drawing_removes_its_issues(pool: PgPool) {
    let project = new_project("Cascade");
    ProjectRepo::create(&pool, &project).await.unwrap();
    let keep = new_drawing(&project.id, "Keep");
    let doomed = new_drawing(&project.id, "Doomed");
    DrawingRepo::create(&pool, &keep).await.unwrap();
    DrawingRepo::create(&pool, &doomed).await.unwrap();

    IssueRepo::create(&pool, &new_issue(&keep.id, "stays"))
        .await
        .unwrap();
    IssueRepo::create(&pool, &new_issue(&doomed.id, "goes"))
        .await
        .unwrap();
    IssueRepo::create(&pool, &new_issue(&doomed.id, "also goes"))
        .await
        .unwrap();

    assert!(DrawingRepo::delete(&pool, &doomed.id).await.unwrap());

    let remaining = IssueRepo::list_by_project(&pool, &project.id)
        .await
        .unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].description, "stays");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleting_a_project_removes_the_whole_hierarchy(pool: PgPool) {
    let project = new_project("Doomed");
    ProjectRepo::create(&pool, &project).await.unwrap();
    let drawing = new_drawing(&project.id, "Sheet C-100");
    DrawingRepo::create(&pool, &drawing).await.unwrap();
    IssueRepo::create(&pool, &new_issue(&drawing.id, "orphan candidate"))
        .await
        .unwrap();
    ProjectMemberRepo::create(&pool, &new_member(&project.id, "David Kim", MemberRole::Junior))
        .await
        .unwrap();

    // A second project must be untouched by the delete.
    let survivor = new_project("Survivor");
    ProjectRepo::create(&pool, &survivor).await.unwrap();
    let survivor_drawing = new_drawing(&survivor.id, "Sheet S-1");
    DrawingRepo::create(&pool, &survivor_drawing).await.unwrap();

    assert!(ProjectRepo::delete(&pool, &project.id).await.unwrap());
    assert!(!ProjectRepo::delete(&pool, &project.id).await.unwrap());

    assert!(ProjectRepo::find_by_id(&pool, &project.id)
        .await
        .unwrap()
        .is_none());
    assert!(DrawingRepo::find_by_id(&pool, &drawing.id)
        .await
        .unwrap()
        .is_none());
    assert!(IssueRepo::list_by_drawing(&pool, &drawing.id)
        .await
        .unwrap()
        .is_empty());
    assert!(ProjectMemberRepo::list_by_project(&pool, &project.id)
        .await
        .unwrap()
        .is_empty());

    let drawings = DrawingRepo::list_by_project(&pool, &survivor.id)
        .await
        .unwrap();
    assert_eq!(drawings.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn project_row_composes_into_domain_entity(pool: PgPool) {
    let project = new_project("Composed");
    ProjectRepo::create(&pool, &project).await.unwrap();
    let drawing = new_drawing(&project.id, "Sheet C-200");
    DrawingRepo::create(&pool, &drawing).await.unwrap();
    let member = new_member(&project.id, "Emily Watson", MemberRole::Senior);
    ProjectMemberRepo::create(&pool, &member).await.unwrap();

    let row = ProjectRepo::find_by_id(&pool, &project.id)
        .await
        .unwrap()
        .unwrap();
    let drawings = DrawingRepo::list_by_project(&pool, &project.id)
        .await
        .unwrap();
    let members = ProjectMemberRepo::list_by_project(&pool, &project.id)
        .await
        .unwrap();

    let composed = row
        .into_project(
            drawings.into_iter().map(Into::into).collect(),
            members
                .into_iter()
                .map(|m| m.into_member())
                .collect::<Result<_, _>>()
                .unwrap(),
        )
        .unwrap();
    assert_eq!(composed.drawings.len(), 1);
    assert_eq!(composed.drawings[0].name, "Sheet C-200");
    assert_eq!(composed.team_members.len(), 1);
    assert_eq!(composed.team_members[0].role, MemberRole::Senior);
}
