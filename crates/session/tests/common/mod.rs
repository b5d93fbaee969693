//! Shared fixtures for session integration tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use planmark_core::counter::CounterDelta;
use planmark_core::drawing::Drawing;
use planmark_core::error::CoreError;
use planmark_core::issue::{Issue, IssueDraft, IssuePatch, Severity};
use planmark_core::project::{Project, ProjectMember, ProjectPatch, ProjectStatus};
use planmark_session::controller::SessionController;
use planmark_session::gateway::{
    EphemeralBackend, PersistenceBackend, PersistenceGateway, PersistenceMode,
};
use planmark_session::identity::UserIdentity;

/// Build a project with one drawing, ready to open in a controller.
pub fn project_with_drawing(project_id: &str, drawing_id: &str) -> Project {
    Project {
        id: project_id.to_string(),
        name: "Downtown Transit Hub".to_string(),
        description: "Multi-modal transportation center".to_string(),
        status: ProjectStatus::Active,
        drawings: vec![Drawing {
            id: drawing_id.to_string(),
            project_id: project_id.to_string(),
            name: "Site Plan.pdf".to_string(),
            source_ref: format!("{project_id}/site-plan.pdf"),
            page_count: 3,
            uploaded_at: Utc::now(),
            uploaded_by: "Sarah Chen, PE".to_string(),
        }],
        issue_count: 0,
        resolved_count: 0,
        notes: String::new(),
        team_members: Vec::new(),
        created_at: Utc::now(),
    }
}

/// A draft with valid fields; description varies per call site.
pub fn draft(description: &str) -> IssueDraft {
    IssueDraft {
        issue_type: "Missing Dimension/Callout".to_string(),
        severity: Severity::Medium,
        description: description.to_string(),
    }
}

/// Controller over a plain ephemeral gateway, analysis delay zeroed.
pub fn session() -> SessionController {
    SessionController::new(
        PersistenceGateway::ephemeral(),
        Some(UserIdentity::demo()),
    )
    .with_analysis_delay(Duration::ZERO)
}

/// An ephemeral backend with injectable failures and call counting.
///
/// `fail_writes` makes every mutation return an internal error while
/// reads keep working; `fail_reads` does the reverse. `load_calls`
/// counts `load_issues` invocations for load-once assertions.
#[derive(Default)]
pub struct FlakyBackend {
    inner: EphemeralBackend,
    pub fail_writes: AtomicBool,
    pub fail_reads: AtomicBool,
    pub load_calls: AtomicUsize,
}

impl FlakyBackend {
    pub fn gateway(this: &Arc<Self>) -> PersistenceGateway {
        PersistenceGateway::with_backend(
            PersistenceMode::Ephemeral,
            Arc::clone(this) as Arc<dyn PersistenceBackend>,
        )
    }

    fn write_gate(&self) -> Result<(), CoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CoreError::Internal("injected write failure".to_string()));
        }
        Ok(())
    }

    fn read_gate(&self) -> Result<(), CoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(CoreError::Internal("injected read failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl PersistenceBackend for FlakyBackend {
    async fn list_projects(&self) -> Result<Vec<Project>, CoreError> {
        self.read_gate()?;
        self.inner.list_projects().await
    }

    async fn create_project(&self, project: &Project) -> Result<(), CoreError> {
        self.write_gate()?;
        self.inner.create_project(project).await
    }

    async fn update_project(
        &self,
        project_id: &str,
        patch: &ProjectPatch,
    ) -> Result<(), CoreError> {
        self.write_gate()?;
        self.inner.update_project(project_id, patch).await
    }

    async fn delete_project(&self, project_id: &str) -> Result<(), CoreError> {
        self.write_gate()?;
        self.inner.delete_project(project_id).await
    }

    async fn adjust_counters(
        &self,
        project_id: &str,
        delta: CounterDelta,
    ) -> Result<(), CoreError> {
        self.write_gate()?;
        self.inner.adjust_counters(project_id, delta).await
    }

    async fn add_member(&self, member: &ProjectMember) -> Result<(), CoreError> {
        self.write_gate()?;
        self.inner.add_member(member).await
    }

    async fn remove_member(&self, member_id: &str) -> Result<(), CoreError> {
        self.write_gate()?;
        self.inner.remove_member(member_id).await
    }

    async fn create_drawing(&self, drawing: &Drawing) -> Result<(), CoreError> {
        self.write_gate()?;
        self.inner.create_drawing(drawing).await
    }

    async fn update_page_count(
        &self,
        drawing_id: &str,
        page_count: i32,
    ) -> Result<(), CoreError> {
        self.write_gate()?;
        self.inner.update_page_count(drawing_id, page_count).await
    }

    async fn delete_drawing(&self, drawing_id: &str) -> Result<(), CoreError> {
        self.write_gate()?;
        self.inner.delete_drawing(drawing_id).await
    }

    async fn load_issues(&self, project_id: &str) -> Result<Vec<Issue>, CoreError> {
        self.load_calls.fetch_add(1, Ordering::SeqCst);
        self.read_gate()?;
        self.inner.load_issues(project_id).await
    }

    async fn create_issue(&self, issue: &Issue) -> Result<(), CoreError> {
        self.write_gate()?;
        self.inner.create_issue(issue).await
    }

    async fn update_issue(&self, issue_id: &str, patch: &IssuePatch) -> Result<(), CoreError> {
        self.write_gate()?;
        self.inner.update_issue(issue_id, patch).await
    }

    async fn delete_issue(&self, issue_id: &str) -> Result<(), CoreError> {
        self.write_gate()?;
        self.inner.delete_issue(issue_id).await
    }

    async fn store_drawing_source(
        &self,
        project_id: &str,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<String, CoreError> {
        self.write_gate()?;
        self.inner
            .store_drawing_source(project_id, file_name, bytes)
            .await
    }
}
