//! Project/drawing session controller.
//!
//! One [`SessionController`] per open viewer session. It owns the
//! in-memory issue store and the project's cached counters, and funnels
//! every mutation through the same sequence: validate, apply locally,
//! dispatch the durable write in the background.
//!
//! Phases: `Unloaded -> LoadingIssues -> Ready` on project open, and
//! `Ready -> Uploading -> Analyzing -> Ready` for each drawing upload.
//! Mutations require `Ready`. The controller is `&mut self` for all
//! mutations: one logical writer per session, so a second edit cannot
//! interleave before the first has applied.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;

use planmark_core::analysis::synthesize_findings;
use planmark_core::counter::{CounterDelta, IssueTransition};
use planmark_core::drawing::{validate_drawing_name, validate_page_count, Drawing, DEFAULT_PAGE_COUNT};
use planmark_core::error::CoreError;
use planmark_core::geometry::{to_normalized, to_pixel, PendingPin, SurfaceSize};
use planmark_core::issue::{
    validate_issue_draft, validate_page_number, Issue, IssueDraft, IssuePatch, IssueStatus,
};
use planmark_core::project::{
    validate_project_name, MemberRole, Project, ProjectMember, ProjectPatch,
};
use planmark_core::store::{DrawingStats, IssueFilter, IssueSort, IssueStore};
use planmark_core::types::EntityId;

use crate::gateway::PersistenceGateway;
use crate::identity::UserIdentity;
use crate::renderer::PageRenderer;

/// Default simulated analysis delay.
const DEFAULT_ANALYSIS_DELAY: Duration = Duration::from_millis(1_500);

/// Author recorded when the session has no identity.
const ANONYMOUS_AUTHOR: &str = "Unknown";

// ---------------------------------------------------------------------------
// Phases and markers
// ---------------------------------------------------------------------------

/// Lifecycle phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No project opened yet.
    Unloaded,
    /// Project selected, issue fetch in flight.
    LoadingIssues,
    /// Interactive. Issues may be created, edited, deleted.
    Ready,
    /// Drawing source upload in flight.
    Uploading,
    /// Assisted review pass running for the drawing just attached.
    Analyzing,
}

impl SessionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionPhase::Unloaded => "unloaded",
            SessionPhase::LoadingIssues => "loading-issues",
            SessionPhase::Ready => "ready",
            SessionPhase::Uploading => "uploading",
            SessionPhase::Analyzing => "analyzing",
        }
    }
}

/// A pin projected onto the current rendered surface.
#[derive(Debug, Clone, PartialEq)]
pub struct PinMarker {
    pub issue_id: EntityId,
    pub pixel_x: f64,
    pub pixel_y: f64,
    /// Display number from the unfiltered per-drawing list; matches the
    /// sidebar regardless of active filters.
    pub number: usize,
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Drives one annotation session over a persistence gateway.
pub struct SessionController {
    gateway: PersistenceGateway,
    identity: Option<UserIdentity>,
    renderer: Option<Arc<dyn PageRenderer>>,
    analysis_delay: Duration,
    phase: SessionPhase,
    project: Option<Project>,
    store: IssueStore,
    /// Guard for the load-once policy.
    last_loaded_project: Option<EntityId>,
    selected_drawing: Option<EntityId>,
    pending_pin: Option<PendingPin>,
    /// In-flight durable writes. Never awaited by interactive flows.
    pending_writes: Vec<JoinHandle<()>>,
}

impl SessionController {
    pub fn new(gateway: PersistenceGateway, identity: Option<UserIdentity>) -> Self {
        Self {
            gateway,
            identity,
            renderer: None,
            analysis_delay: DEFAULT_ANALYSIS_DELAY,
            phase: SessionPhase::Unloaded,
            project: None,
            store: IssueStore::new(),
            last_loaded_project: None,
            selected_drawing: None,
            pending_pin: None,
            pending_writes: Vec::new(),
        }
    }

    /// Attach a renderer so page counts can be corrected after upload.
    pub fn with_renderer(mut self, renderer: Arc<dyn PageRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Override the simulated analysis delay (tests use zero).
    pub fn with_analysis_delay(mut self, delay: Duration) -> Self {
        self.analysis_delay = delay;
        self
    }

    // -- project lifecycle ---------------------------------------------------

    /// Open a project, fetching its issues at most once per project
    /// identity. Re-opening the current project keeps the loaded store;
    /// opening a different one discards it and fetches fresh.
    pub async fn open_project(&mut self, project: Project) {
        let project_id = project.id.clone();
        if self.last_loaded_project.as_deref() == Some(project_id.as_str()) {
            tracing::debug!(project_id = %project_id, "Project already loaded, skipping issue fetch");
            self.project = Some(project);
            self.phase = SessionPhase::Ready;
            return;
        }

        self.phase = SessionPhase::LoadingIssues;
        self.store.clear();
        self.selected_drawing = None;
        self.pending_pin = None;

        let issues = self.gateway.load_issues(&project_id).await;
        let count = issues.len();
        self.store.load(issues);
        self.last_loaded_project = Some(project_id.clone());
        self.project = Some(project);
        self.phase = SessionPhase::Ready;
        tracing::info!(project_id = %project_id, count, "Issues loaded");
    }

    /// Edit project metadata. Counters are never patched this way; they
    /// move only through issue transitions.
    pub fn update_project(&mut self, patch: ProjectPatch) -> Result<(), CoreError> {
        self.ensure_ready()?;
        if let Some(name) = &patch.name {
            validate_project_name(name)?;
        }
        let project_id = self.project_id()?;
        if let Some(project) = self.project.as_mut() {
            if let Some(name) = &patch.name {
                project.name = name.clone();
            }
            if let Some(description) = &patch.description {
                project.description = description.clone();
            }
            if let Some(status) = patch.status {
                project.status = status;
            }
            if let Some(notes) = &patch.notes {
                project.notes = notes.clone();
            }
        }

        let gateway = self.gateway.clone();
        self.dispatch_write("project update", async move {
            gateway.update_project(&project_id, &patch).await
        });
        Ok(())
    }

    // -- team members ----------------------------------------------------------

    pub fn add_member(
        &mut self,
        name: &str,
        email: &str,
        role: MemberRole,
    ) -> Result<ProjectMember, CoreError> {
        self.ensure_ready()?;
        let project_id = self.project_id()?;
        let member = ProjectMember {
            id: uuid::Uuid::new_v4().to_string(),
            project_id,
            name: name.to_string(),
            email: email.to_string(),
            role,
            joined_at: Utc::now(),
        };
        if let Some(project) = self.project.as_mut() {
            project.team_members.push(member.clone());
        }

        let gateway = self.gateway.clone();
        let row = member.clone();
        self.dispatch_write("member add", async move { gateway.add_member(&row).await });
        Ok(member)
    }

    pub fn remove_member(&mut self, member_id: &str) -> Result<(), CoreError> {
        self.ensure_ready()?;
        let project = self.project.as_mut().ok_or_else(no_project)?;
        let before = project.team_members.len();
        project.team_members.retain(|m| m.id != member_id);
        if project.team_members.len() == before {
            return Err(CoreError::NotFound {
                entity: "project member",
                id: member_id.to_string(),
            });
        }

        let gateway = self.gateway.clone();
        let id = member_id.to_string();
        self.dispatch_write("member remove", async move { gateway.remove_member(&id).await });
        Ok(())
    }

    // -- drawing selection and pins -------------------------------------------

    pub fn select_drawing(&mut self, drawing_id: &str) -> Result<(), CoreError> {
        self.ensure_ready()?;
        let project = self.project.as_ref().ok_or_else(no_project)?;
        if project.drawing(drawing_id).is_none() {
            return Err(CoreError::NotFound {
                entity: "drawing",
                id: drawing_id.to_string(),
            });
        }
        self.selected_drawing = Some(drawing_id.to_string());
        self.pending_pin = None;
        Ok(())
    }

    pub fn selected_drawing(&self) -> Option<&Drawing> {
        let id = self.selected_drawing.as_deref()?;
        self.project.as_ref()?.drawing(id)
    }

    /// Convert a click on the rendered surface into a pending pin on the
    /// given page. The pin is stored normalized, so it survives zoom
    /// changes until [`Self::submit_issue`] consumes it or
    /// [`Self::cancel_pin`] discards it.
    pub fn place_pin(
        &mut self,
        pixel_x: f64,
        pixel_y: f64,
        surface: SurfaceSize,
        page_number: i32,
    ) -> Result<&PendingPin, CoreError> {
        self.ensure_ready()?;
        if self.selected_drawing().is_none() {
            return Err(CoreError::Validation("No drawing selected".to_string()));
        }
        validate_page_number(page_number)?;
        let position = to_normalized(pixel_x, pixel_y, surface);
        Ok(self.pending_pin.insert(PendingPin {
            position,
            page_number,
        }))
    }

    pub fn cancel_pin(&mut self) {
        self.pending_pin = None;
    }

    pub fn pending_pin(&self) -> Option<&PendingPin> {
        self.pending_pin.as_ref()
    }

    // -- issue mutations --------------------------------------------------------

    /// Create an issue from the pending pin and the user's draft fields.
    ///
    /// Local-first: the store and counters update immediately; the
    /// durable write runs in the background and its failure never
    /// reverts what the user sees.
    pub fn submit_issue(&mut self, draft: IssueDraft) -> Result<Issue, CoreError> {
        self.ensure_ready()?;
        validate_issue_draft(&draft)?;
        let project_id = self.project_id()?;
        let drawing_id = self
            .selected_drawing
            .clone()
            .ok_or_else(|| CoreError::Validation("No drawing selected".to_string()))?;
        let pin = self
            .pending_pin
            .take()
            .ok_or_else(|| CoreError::Validation("No pending pin to submit".to_string()))?;

        let issue = Issue {
            id: uuid::Uuid::new_v4().to_string(),
            drawing_id,
            page_number: pin.page_number,
            position: pin.position,
            issue_type: draft.issue_type,
            severity: draft.severity,
            description: draft.description,
            status: IssueStatus::Open,
            created_by: self.author_name(),
            ai_generated: false,
            timestamp: Utc::now(),
        };

        self.store.add(issue.clone());
        let delta = CounterDelta::for_transition(IssueTransition::Create);
        self.apply_counter_delta(delta);

        let gateway = self.gateway.clone();
        let row = issue.clone();
        self.dispatch_write("issue create", async move {
            gateway.create_issue(&row).await?;
            gateway.adjust_counters(&project_id, delta).await
        });

        tracing::info!(issue_id = %issue.id, drawing_id = %issue.drawing_id, "Issue created");
        Ok(issue)
    }

    /// Move an issue to a new status, adjusting `resolved_count` per the
    /// transition.
    pub fn update_issue_status(
        &mut self,
        issue_id: &str,
        status: IssueStatus,
    ) -> Result<Issue, CoreError> {
        self.ensure_ready()?;
        let project_id = self.project_id()?;
        let current = self.store.get(issue_id).ok_or_else(|| CoreError::NotFound {
            entity: "issue",
            id: issue_id.to_string(),
        })?;
        let delta = CounterDelta::for_transition(IssueTransition::StatusChange {
            from: current.status,
            to: status,
        });

        let patch = IssuePatch {
            status: Some(status),
            ..Default::default()
        };
        let updated = self.store.update(issue_id, &patch)?;
        self.apply_counter_delta(delta);

        let gateway = self.gateway.clone();
        let id = issue_id.to_string();
        self.dispatch_write("issue status update", async move {
            gateway.update_issue(&id, &patch).await?;
            if !delta.is_zero() {
                gateway.adjust_counters(&project_id, delta).await?;
            }
            Ok(())
        });

        tracing::info!(issue_id, status = status.as_str(), "Issue status changed");
        Ok(updated)
    }

    pub fn delete_issue(&mut self, issue_id: &str) -> Result<(), CoreError> {
        self.ensure_ready()?;
        let project_id = self.project_id()?;
        let removed = self.store.remove(issue_id)?;
        let delta = CounterDelta::for_transition(IssueTransition::Delete {
            was_resolved: removed.status.is_resolved(),
        });
        self.apply_counter_delta(delta);

        let gateway = self.gateway.clone();
        let id = issue_id.to_string();
        self.dispatch_write("issue delete", async move {
            gateway.delete_issue(&id).await?;
            gateway.adjust_counters(&project_id, delta).await
        });

        tracing::info!(issue_id, "Issue deleted");
        Ok(())
    }

    // -- drawings -----------------------------------------------------------------

    /// Upload a drawing source and run the assisted review pass over it.
    ///
    /// `Ready -> Uploading -> Analyzing -> Ready`. The source upload is
    /// awaited (a drawing cannot exist without its source); failure
    /// there aborts back to `Ready` with nothing attached. Row writes
    /// ride in the background like every other durable write, and the
    /// synthetic findings land as one batch.
    pub async fn attach_drawing(
        &mut self,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<Drawing, CoreError> {
        self.ensure_ready()?;
        validate_drawing_name(file_name)?;
        let project_id = self.project_id()?;

        self.phase = SessionPhase::Uploading;
        let source_ref = match self
            .gateway
            .store_drawing_source(&project_id, file_name, bytes)
            .await
        {
            Ok(source_ref) => source_ref,
            Err(error) => {
                self.phase = SessionPhase::Ready;
                return Err(error);
            }
        };

        let drawing = Drawing {
            id: uuid::Uuid::new_v4().to_string(),
            project_id: project_id.clone(),
            name: file_name.to_string(),
            source_ref: source_ref.clone(),
            page_count: DEFAULT_PAGE_COUNT,
            uploaded_at: Utc::now(),
            uploaded_by: self.author_name(),
        };
        if let Some(project) = self.project.as_mut() {
            project.drawings.push(drawing.clone());
        }
        self.selected_drawing = Some(drawing.id.clone());
        self.pending_pin = None;

        let gateway = self.gateway.clone();
        let row = drawing.clone();
        self.dispatch_write("drawing create", async move {
            gateway.create_drawing(&row).await
        });
        tracing::info!(drawing_id = %drawing.id, source_ref = %source_ref, "Drawing attached");

        self.phase = SessionPhase::Analyzing;
        tokio::time::sleep(self.analysis_delay).await;
        let findings = synthesize_findings(&mut rand::rng(), &drawing.id, Utc::now());
        let batch_delta = CounterDelta {
            issue_count: findings.len() as i64,
            resolved_count: 0,
        };
        for finding in &findings {
            self.store.add(finding.clone());
        }
        self.apply_counter_delta(batch_delta);

        let gateway = self.gateway.clone();
        let counters_project = project_id.clone();
        let batch = findings.clone();
        self.dispatch_write("analysis batch save", async move {
            for result in
                futures::future::join_all(batch.iter().map(|f| gateway.create_issue(f))).await
            {
                result?;
            }
            gateway.adjust_counters(&counters_project, batch_delta).await
        });
        tracing::info!(drawing_id = %drawing.id, findings = findings.len(), "Analysis complete");

        if let Some(renderer) = self.renderer.clone() {
            match renderer.page_count(&source_ref).await {
                Ok(pages) if pages != drawing.page_count => {
                    if let Err(error) = self.correct_page_count(&drawing.id, pages) {
                        tracing::warn!(drawing_id = %drawing.id, %error, "Page count correction rejected");
                    }
                }
                Ok(_) => {}
                Err(error) => {
                    tracing::warn!(drawing_id = %drawing.id, %error, "Page count probe failed");
                }
            }
        }

        self.phase = SessionPhase::Ready;
        let attached = self
            .project
            .as_ref()
            .and_then(|p| p.drawing(&drawing.id))
            .cloned()
            .unwrap_or(drawing);
        Ok(attached)
    }

    /// Apply the renderer-reported page count to a drawing. Uploads
    /// start with a placeholder count of 1, so this usually arrives once
    /// per drawing, shortly after attach.
    pub fn correct_page_count(
        &mut self,
        drawing_id: &str,
        page_count: i32,
    ) -> Result<(), CoreError> {
        validate_page_count(page_count)?;
        let project = self.project.as_mut().ok_or_else(no_project)?;
        let drawing = project
            .drawing_mut(drawing_id)
            .ok_or_else(|| CoreError::NotFound {
                entity: "drawing",
                id: drawing_id.to_string(),
            })?;
        if drawing.page_count == page_count {
            return Ok(());
        }
        drawing.page_count = page_count;

        let gateway = self.gateway.clone();
        let id = drawing_id.to_string();
        self.dispatch_write("page count update", async move {
            gateway.update_page_count(&id, page_count).await
        });
        Ok(())
    }

    /// Remove a drawing, every issue on it, and their counter
    /// contribution.
    pub fn delete_drawing(&mut self, drawing_id: &str) -> Result<(), CoreError> {
        self.ensure_ready()?;
        let project_id = self.project_id()?;
        let known = self
            .project
            .as_ref()
            .is_some_and(|p| p.drawing(drawing_id).is_some());
        if !known {
            return Err(CoreError::NotFound {
                entity: "drawing",
                id: drawing_id.to_string(),
            });
        }

        let removed = self.store.remove_drawing(drawing_id);
        let resolved = removed.iter().filter(|i| i.status.is_resolved()).count();
        let delta = CounterDelta::for_cascade(removed.len(), resolved);
        self.apply_counter_delta(delta);

        if let Some(project) = self.project.as_mut() {
            project.drawings.retain(|d| d.id != drawing_id);
        }
        if self.selected_drawing.as_deref() == Some(drawing_id) {
            self.selected_drawing = None;
            self.pending_pin = None;
        }

        let gateway = self.gateway.clone();
        let id = drawing_id.to_string();
        self.dispatch_write("drawing delete", async move {
            // The backend cascades issue rows with the drawing.
            gateway.delete_drawing(&id).await?;
            if !delta.is_zero() {
                gateway.adjust_counters(&project_id, delta).await?;
            }
            Ok(())
        });

        tracing::info!(drawing_id, removed = removed.len(), "Drawing deleted");
        Ok(())
    }

    // -- accessors ----------------------------------------------------------------

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn project(&self) -> Option<&Project> {
        self.project.as_ref()
    }

    /// `(issue_count, resolved_count)` of the open project.
    pub fn counters(&self) -> (i64, i64) {
        self.project
            .as_ref()
            .map(|p| (p.issue_count, p.resolved_count))
            .unwrap_or((0, 0))
    }

    /// Filtered, sorted issues of the selected drawing for display.
    pub fn issues(&self, filter: &IssueFilter, sort: IssueSort) -> Vec<&Issue> {
        match self.selected_drawing.as_deref() {
            Some(drawing_id) => self.store.view(drawing_id, filter, sort),
            None => Vec::new(),
        }
    }

    /// Stable display number of an issue, from the unfiltered
    /// per-drawing list in creation order.
    pub fn display_number(&self, issue_id: &str) -> Option<usize> {
        self.store.display_number(issue_id)
    }

    /// Sidebar tallies for the selected drawing.
    pub fn drawing_stats(&self) -> DrawingStats {
        match self.selected_drawing.as_deref() {
            Some(drawing_id) => self.store.stats(drawing_id),
            None => DrawingStats::default(),
        }
    }

    /// Pins for one page of the selected drawing, projected onto the
    /// current surface.
    pub fn markers_on_page(&self, page_number: i32, surface: SurfaceSize) -> Vec<PinMarker> {
        let Some(drawing_id) = self.selected_drawing.as_deref() else {
            return Vec::new();
        };
        self.store
            .on_page(drawing_id, page_number)
            .into_iter()
            .map(|issue| {
                let (pixel_x, pixel_y) = to_pixel(issue.position, surface);
                PinMarker {
                    issue_id: issue.id.clone(),
                    pixel_x,
                    pixel_y,
                    number: self.store.display_number(&issue.id).unwrap_or(0),
                }
            })
            .collect()
    }

    /// Wait for every dispatched durable write to settle. Shutdown and
    /// tests use this; interactive flows never block on it.
    pub async fn flush_writes(&mut self) {
        for handle in self.pending_writes.drain(..) {
            if handle.await.is_err() {
                tracing::warn!("A background write task panicked");
            }
        }
    }

    // -- internals ------------------------------------------------------------------

    fn ensure_ready(&self) -> Result<(), CoreError> {
        if self.phase != SessionPhase::Ready {
            return Err(CoreError::Validation(format!(
                "Session is not ready (phase: {})",
                self.phase.as_str()
            )));
        }
        Ok(())
    }

    fn project_id(&self) -> Result<String, CoreError> {
        self.project
            .as_ref()
            .map(|p| p.id.clone())
            .ok_or_else(no_project)
    }

    fn author_name(&self) -> String {
        self.identity
            .as_ref()
            .map(|user| user.name.clone())
            .unwrap_or_else(|| ANONYMOUS_AUTHOR.to_string())
    }

    fn apply_counter_delta(&mut self, delta: CounterDelta) {
        if let Some(project) = self.project.as_mut() {
            project.apply_counter_delta(delta);
        }
    }

    /// Spawn a durable write. Failures are logged and the optimistic
    /// local state stands; nothing interactive ever waits on these.
    fn dispatch_write<F>(&mut self, op: &'static str, write: F)
    where
        F: Future<Output = Result<(), CoreError>> + Send + 'static,
    {
        self.pending_writes.push(tokio::spawn(async move {
            if let Err(error) = write.await {
                tracing::warn!(op, %error, "Durable write failed, local state retained");
            }
        }));
    }
}

fn no_project() -> CoreError {
    CoreError::Validation("No project is open in this session".to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use planmark_core::project::ProjectStatus;

    fn session() -> SessionController {
        SessionController::new(PersistenceGateway::ephemeral(), Some(UserIdentity::demo()))
    }

    fn sample_project() -> Project {
        let drawing = Drawing {
            id: "d-1".to_string(),
            project_id: "p-1".to_string(),
            name: "Site Plan.pdf".to_string(),
            source_ref: "p-1/site-plan.pdf".to_string(),
            page_count: 3,
            uploaded_at: Utc::now(),
            uploaded_by: "Sarah Chen, PE".to_string(),
        };
        Project {
            id: "p-1".to_string(),
            name: "Downtown Transit Hub".to_string(),
            description: "Multi-modal transportation center".to_string(),
            status: ProjectStatus::Active,
            drawings: vec![drawing],
            issue_count: 0,
            resolved_count: 0,
            notes: String::new(),
            team_members: Vec::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn phase_names_are_stable() {
        assert_eq!(SessionPhase::Unloaded.as_str(), "unloaded");
        assert_eq!(SessionPhase::LoadingIssues.as_str(), "loading-issues");
        assert_eq!(SessionPhase::Ready.as_str(), "ready");
        assert_eq!(SessionPhase::Uploading.as_str(), "uploading");
        assert_eq!(SessionPhase::Analyzing.as_str(), "analyzing");
    }

    #[tokio::test]
    async fn mutations_are_rejected_before_a_project_opens() {
        let mut session = session();
        assert_eq!(session.phase(), SessionPhase::Unloaded);

        let err = session.select_drawing("d-1").unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) => {
            assert!(msg.contains("unloaded"), "unexpected message: {msg}");
        });
        assert_matches!(
            session.delete_issue("i-1"),
            Err(CoreError::Validation(_))
        );
    }

    #[tokio::test]
    async fn placing_a_pin_requires_a_selected_drawing() {
        let mut session = session();
        session.open_project(sample_project()).await;

        let surface = SurfaceSize::new(800.0, 600.0).unwrap();
        assert_matches!(
            session.place_pin(400.0, 300.0, surface, 1),
            Err(CoreError::Validation(_))
        );

        session.select_drawing("d-1").unwrap();
        let pin = session.place_pin(400.0, 300.0, surface, 1).unwrap();
        assert!((pin.position.x - 0.5).abs() < 1e-9);
        assert!((pin.position.y - 0.5).abs() < 1e-9);
        assert_eq!(pin.page_number, 1);
    }

    #[tokio::test]
    async fn a_second_pin_replaces_the_first_and_cancel_discards() {
        let mut session = session();
        session.open_project(sample_project()).await;
        session.select_drawing("d-1").unwrap();

        let surface = SurfaceSize::new(1000.0, 500.0).unwrap();
        session.place_pin(100.0, 100.0, surface, 1).unwrap();
        session.place_pin(900.0, 400.0, surface, 2).unwrap();
        let pin = session.pending_pin().unwrap();
        assert_eq!(pin.page_number, 2);
        assert!((pin.position.x - 0.9).abs() < 1e-9);

        session.cancel_pin();
        assert!(session.pending_pin().is_none());
    }

    #[tokio::test]
    async fn selecting_another_drawing_discards_the_pending_pin() {
        let mut session = session();
        let mut project = sample_project();
        project.drawings.push(Drawing {
            id: "d-2".to_string(),
            project_id: "p-1".to_string(),
            name: "Grading Plan.pdf".to_string(),
            source_ref: "p-1/grading-plan.pdf".to_string(),
            page_count: 1,
            uploaded_at: Utc::now(),
            uploaded_by: "Sarah Chen, PE".to_string(),
        });
        session.open_project(project).await;
        session.select_drawing("d-1").unwrap();

        let surface = SurfaceSize::new(800.0, 600.0).unwrap();
        session.place_pin(10.0, 10.0, surface, 1).unwrap();
        session.select_drawing("d-2").unwrap();
        assert!(session.pending_pin().is_none());
    }

    #[tokio::test]
    async fn submitting_without_a_pin_is_rejected() {
        let mut session = session();
        session.open_project(sample_project()).await;
        session.select_drawing("d-1").unwrap();

        let draft = IssueDraft {
            issue_type: "Missing Dimension/Callout".to_string(),
            severity: planmark_core::issue::Severity::Medium,
            description: "Slab edge dimension missing".to_string(),
        };
        assert_matches!(
            session.submit_issue(draft),
            Err(CoreError::Validation(_))
        );
    }

    #[tokio::test]
    async fn an_invalid_draft_keeps_the_pending_pin() {
        let mut session = session();
        session.open_project(sample_project()).await;
        session.select_drawing("d-1").unwrap();

        let surface = SurfaceSize::new(800.0, 600.0).unwrap();
        session.place_pin(200.0, 150.0, surface, 1).unwrap();

        let draft = IssueDraft {
            issue_type: "Missing Dimension/Callout".to_string(),
            severity: planmark_core::issue::Severity::Low,
            description: "   ".to_string(),
        };
        assert_matches!(session.submit_issue(draft), Err(CoreError::Validation(_)));
        assert!(session.pending_pin().is_some(), "pin must survive a rejected draft");
    }

    #[tokio::test]
    async fn author_falls_back_when_the_session_is_anonymous() {
        let mut session =
            SessionController::new(PersistenceGateway::ephemeral(), None);
        session.open_project(sample_project()).await;
        session.select_drawing("d-1").unwrap();

        let surface = SurfaceSize::new(800.0, 600.0).unwrap();
        session.place_pin(200.0, 150.0, surface, 1).unwrap();
        let issue = session
            .submit_issue(IssueDraft {
                issue_type: "Code Compliance Concern".to_string(),
                severity: planmark_core::issue::Severity::High,
                description: "Guardrail height below code minimum".to_string(),
            })
            .unwrap();
        assert_eq!(issue.created_by, "Unknown");
        session.flush_writes().await;
    }

    #[tokio::test]
    async fn page_count_correction_is_a_noop_when_unchanged() {
        let mut session = session();
        session.open_project(sample_project()).await;

        session.correct_page_count("d-1", 3).unwrap();
        assert!(session.pending_writes.is_empty(), "equal count must not dispatch a write");

        session.correct_page_count("d-1", 5).unwrap();
        assert_eq!(session.project().unwrap().drawing("d-1").unwrap().page_count, 5);
        assert_eq!(session.pending_writes.len(), 1);
        session.flush_writes().await;
    }

    #[tokio::test]
    async fn unknown_drawing_selection_is_not_found() {
        let mut session = session();
        session.open_project(sample_project()).await;
        assert_matches!(
            session.select_drawing("missing"),
            Err(CoreError::NotFound { entity: "drawing", .. })
        );
    }
}
