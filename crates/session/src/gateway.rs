//! Persistence gateway: one logical storage API over two backends.
//!
//! A session talks to a [`PersistenceGateway`], which wraps either the
//! in-memory [`EphemeralBackend`] or the Postgres-backed
//! [`DurableBackend`]. The backend is selected once, at session start:
//! durable requires a configured database *and* a non-demo identity.
//!
//! Failure policy lives in the gateway, not the backends: read failures
//! degrade to empty results with a warning, write failures surface as
//! [`CoreError::TransientWrite`] and the caller keeps its optimistic
//! local state.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use planmark_core::counter::{apply_delta, CounterDelta};
use planmark_core::drawing::Drawing;
use planmark_core::error::CoreError;
use planmark_core::issue::{Issue, IssuePatch};
use planmark_core::project::{Project, ProjectMember, ProjectPatch};
use planmark_db::repositories::{DrawingRepo, IssueRepo, ProjectMemberRepo, ProjectRepo};

use crate::config::SessionConfig;
use crate::identity::UserIdentity;

// ---------------------------------------------------------------------------
// Mode selection
// ---------------------------------------------------------------------------

/// Which backend a session writes through. Chosen once at session start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistenceMode {
    Ephemeral,
    Durable,
}

impl PersistenceMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PersistenceMode::Ephemeral => "ephemeral",
            PersistenceMode::Durable => "durable",
        }
    }
}

/// Decide the persistence mode for a session.
///
/// Durable requires a configured database and a non-demo identity; the
/// shared demo account must never write to real project data.
pub fn choose_mode(config: &SessionConfig, identity: Option<&UserIdentity>) -> PersistenceMode {
    let is_demo = identity.is_some_and(|user| user.is_demo(&config.demo_email));
    if config.database_url.is_some() && !is_demo {
        PersistenceMode::Durable
    } else {
        PersistenceMode::Ephemeral
    }
}

// ---------------------------------------------------------------------------
// Backend trait
// ---------------------------------------------------------------------------

/// Storage operations every backend provides.
///
/// Implementations return plain [`CoreError`]s; the gateway above them
/// owns the degrade/surface policy.
#[async_trait]
pub trait PersistenceBackend: Send + Sync {
    async fn list_projects(&self) -> Result<Vec<Project>, CoreError>;
    /// Insert a project together with any drawings and members it carries.
    async fn create_project(&self, project: &Project) -> Result<(), CoreError>;
    async fn update_project(
        &self,
        project_id: &str,
        patch: &ProjectPatch,
    ) -> Result<(), CoreError>;
    async fn delete_project(&self, project_id: &str) -> Result<(), CoreError>;
    async fn adjust_counters(
        &self,
        project_id: &str,
        delta: CounterDelta,
    ) -> Result<(), CoreError>;

    async fn add_member(&self, member: &ProjectMember) -> Result<(), CoreError>;
    async fn remove_member(&self, member_id: &str) -> Result<(), CoreError>;

    async fn create_drawing(&self, drawing: &Drawing) -> Result<(), CoreError>;
    async fn update_page_count(
        &self,
        drawing_id: &str,
        page_count: i32,
    ) -> Result<(), CoreError>;
    /// Delete a drawing and, by cascade, every issue on it.
    async fn delete_drawing(&self, drawing_id: &str) -> Result<(), CoreError>;

    /// All issues across the project's drawings, in creation order.
    async fn load_issues(&self, project_id: &str) -> Result<Vec<Issue>, CoreError>;
    async fn create_issue(&self, issue: &Issue) -> Result<(), CoreError>;
    async fn update_issue(&self, issue_id: &str, patch: &IssuePatch) -> Result<(), CoreError>;
    async fn delete_issue(&self, issue_id: &str) -> Result<(), CoreError>;

    /// Store the raw bytes of a drawing source, returning the reference
    /// the renderer will later be handed.
    async fn store_drawing_source(
        &self,
        project_id: &str,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<String, CoreError>;
}

/// Normalize a client file name for storage paths: anything outside
/// `[A-Za-z0-9.-]` becomes `_`.
fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Build the storage reference for an uploaded drawing source:
/// `<project_id>/<upload_millis>-<sanitized_name>`.
fn source_ref_for(project_id: &str, file_name: &str) -> String {
    format!(
        "{project_id}/{}-{}",
        chrono::Utc::now().timestamp_millis(),
        sanitize_file_name(file_name)
    )
}

// ---------------------------------------------------------------------------
// Ephemeral backend
// ---------------------------------------------------------------------------

/// In-memory tables keyed by id. Lives for the session, then vanishes.
///
/// Rows are stored flat; `list_projects` composes the nested shape the
/// same way the durable backend composes it from table queries.
#[derive(Default)]
pub struct EphemeralBackend {
    projects: RwLock<HashMap<String, Project>>,
    drawings: RwLock<HashMap<String, Drawing>>,
    issues: RwLock<HashMap<String, Issue>>,
    members: RwLock<HashMap<String, ProjectMember>>,
    blobs: RwLock<HashMap<String, Vec<u8>>>,
}

impl EphemeralBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored bytes for a source ref, if present. Demo/test helper.
    pub async fn blob(&self, source_ref: &str) -> Option<Vec<u8>> {
        self.blobs.read().await.get(source_ref).cloned()
    }

    async fn drawing_ids_for(&self, project_id: &str) -> Vec<String> {
        self.drawings
            .read()
            .await
            .values()
            .filter(|d| d.project_id == project_id)
            .map(|d| d.id.clone())
            .collect()
    }
}

#[async_trait]
impl PersistenceBackend for EphemeralBackend {
    async fn list_projects(&self) -> Result<Vec<Project>, CoreError> {
        let projects = self.projects.read().await;
        let drawings = self.drawings.read().await;
        let members = self.members.read().await;

        let mut composed: Vec<Project> = projects
            .values()
            .map(|row| {
                let mut project = row.clone();
                project.drawings = drawings
                    .values()
                    .filter(|d| d.project_id == project.id)
                    .cloned()
                    .collect();
                project.drawings.sort_by_key(|d| d.uploaded_at);
                project.team_members = members
                    .values()
                    .filter(|m| m.project_id == project.id)
                    .cloned()
                    .collect();
                project.team_members.sort_by_key(|m| m.joined_at);
                project
            })
            .collect();
        composed.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(composed)
    }

    async fn create_project(&self, project: &Project) -> Result<(), CoreError> {
        for drawing in &project.drawings {
            self.drawings
                .write()
                .await
                .insert(drawing.id.clone(), drawing.clone());
        }
        for member in &project.team_members {
            self.members
                .write()
                .await
                .insert(member.id.clone(), member.clone());
        }
        let mut row = project.clone();
        row.drawings = Vec::new();
        row.team_members = Vec::new();
        self.projects.write().await.insert(row.id.clone(), row);
        Ok(())
    }

    async fn update_project(
        &self,
        project_id: &str,
        patch: &ProjectPatch,
    ) -> Result<(), CoreError> {
        let mut projects = self.projects.write().await;
        let project = projects.get_mut(project_id).ok_or(CoreError::NotFound {
            entity: "project",
            id: project_id.to_string(),
        })?;
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
        Ok(())
    }

    async fn delete_project(&self, project_id: &str) -> Result<(), CoreError> {
        if self.projects.write().await.remove(project_id).is_none() {
            return Err(CoreError::NotFound {
                entity: "project",
                id: project_id.to_string(),
            });
        }
        let drawing_ids = self.drawing_ids_for(project_id).await;
        self.drawings
            .write()
            .await
            .retain(|_, d| d.project_id != project_id);
        self.issues
            .write()
            .await
            .retain(|_, i| !drawing_ids.contains(&i.drawing_id));
        self.members
            .write()
            .await
            .retain(|_, m| m.project_id != project_id);
        Ok(())
    }

    async fn adjust_counters(
        &self,
        project_id: &str,
        delta: CounterDelta,
    ) -> Result<(), CoreError> {
        let mut projects = self.projects.write().await;
        let project = projects.get_mut(project_id).ok_or(CoreError::NotFound {
            entity: "project",
            id: project_id.to_string(),
        })?;
        let (issues, resolved) = apply_delta(project.issue_count, project.resolved_count, delta);
        project.issue_count = issues;
        project.resolved_count = resolved;
        Ok(())
    }

    async fn add_member(&self, member: &ProjectMember) -> Result<(), CoreError> {
        self.members
            .write()
            .await
            .insert(member.id.clone(), member.clone());
        Ok(())
    }

    async fn remove_member(&self, member_id: &str) -> Result<(), CoreError> {
        if self.members.write().await.remove(member_id).is_none() {
            return Err(CoreError::NotFound {
                entity: "project member",
                id: member_id.to_string(),
            });
        }
        Ok(())
    }

    async fn create_drawing(&self, drawing: &Drawing) -> Result<(), CoreError> {
        self.drawings
            .write()
            .await
            .insert(drawing.id.clone(), drawing.clone());
        Ok(())
    }

    async fn update_page_count(
        &self,
        drawing_id: &str,
        page_count: i32,
    ) -> Result<(), CoreError> {
        let mut drawings = self.drawings.write().await;
        let drawing = drawings.get_mut(drawing_id).ok_or(CoreError::NotFound {
            entity: "drawing",
            id: drawing_id.to_string(),
        })?;
        drawing.page_count = page_count;
        Ok(())
    }

    async fn delete_drawing(&self, drawing_id: &str) -> Result<(), CoreError> {
        if self.drawings.write().await.remove(drawing_id).is_none() {
            return Err(CoreError::NotFound {
                entity: "drawing",
                id: drawing_id.to_string(),
            });
        }
        self.issues
            .write()
            .await
            .retain(|_, i| i.drawing_id != drawing_id);
        Ok(())
    }

    async fn load_issues(&self, project_id: &str) -> Result<Vec<Issue>, CoreError> {
        let drawing_ids = self.drawing_ids_for(project_id).await;
        let issues = self.issues.read().await;
        let mut loaded: Vec<Issue> = issues
            .values()
            .filter(|i| drawing_ids.contains(&i.drawing_id))
            .cloned()
            .collect();
        // Creation order is the canonical numbering base.
        loaded.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then(a.id.cmp(&b.id)));
        Ok(loaded)
    }

    async fn create_issue(&self, issue: &Issue) -> Result<(), CoreError> {
        self.issues
            .write()
            .await
            .insert(issue.id.clone(), issue.clone());
        Ok(())
    }

    async fn update_issue(&self, issue_id: &str, patch: &IssuePatch) -> Result<(), CoreError> {
        let mut issues = self.issues.write().await;
        let issue = issues.get_mut(issue_id).ok_or(CoreError::NotFound {
            entity: "issue",
            id: issue_id.to_string(),
        })?;
        if let Some(issue_type) = &patch.issue_type {
            issue.issue_type = issue_type.clone();
        }
        if let Some(severity) = patch.severity {
            issue.severity = severity;
        }
        if let Some(description) = &patch.description {
            issue.description = description.clone();
        }
        if let Some(status) = patch.status {
            issue.status = status;
        }
        Ok(())
    }

    async fn delete_issue(&self, issue_id: &str) -> Result<(), CoreError> {
        if self.issues.write().await.remove(issue_id).is_none() {
            return Err(CoreError::NotFound {
                entity: "issue",
                id: issue_id.to_string(),
            });
        }
        Ok(())
    }

    async fn store_drawing_source(
        &self,
        project_id: &str,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<String, CoreError> {
        let source_ref = source_ref_for(project_id, file_name);
        self.blobs
            .write()
            .await
            .insert(source_ref.clone(), bytes.to_vec());
        Ok(source_ref)
    }
}

// ---------------------------------------------------------------------------
// Durable backend
// ---------------------------------------------------------------------------

fn db_error(error: sqlx::Error) -> CoreError {
    CoreError::Internal(error.to_string())
}

/// Postgres-backed storage via the planmark-db repositories. Drawing
/// sources are written as files under `storage_root`.
pub struct DurableBackend {
    pool: sqlx::PgPool,
    storage_root: PathBuf,
}

impl DurableBackend {
    pub fn new(pool: sqlx::PgPool, storage_root: PathBuf) -> Self {
        Self { pool, storage_root }
    }
}

#[async_trait]
impl PersistenceBackend for DurableBackend {
    async fn list_projects(&self) -> Result<Vec<Project>, CoreError> {
        let rows = ProjectRepo::list(&self.pool).await.map_err(db_error)?;
        let mut projects = Vec::with_capacity(rows.len());
        for row in rows {
            let drawings = DrawingRepo::list_by_project(&self.pool, &row.id)
                .await
                .map_err(db_error)?
                .into_iter()
                .map(Into::into)
                .collect();
            let members = ProjectMemberRepo::list_by_project(&self.pool, &row.id)
                .await
                .map_err(db_error)?
                .into_iter()
                .map(|m| m.into_member())
                .collect::<Result<_, _>>()?;
            projects.push(row.into_project(drawings, members)?);
        }
        Ok(projects)
    }

    async fn create_project(&self, project: &Project) -> Result<(), CoreError> {
        ProjectRepo::create(&self.pool, project)
            .await
            .map_err(db_error)?;
        for drawing in &project.drawings {
            DrawingRepo::create(&self.pool, drawing)
                .await
                .map_err(db_error)?;
        }
        for member in &project.team_members {
            ProjectMemberRepo::create(&self.pool, member)
                .await
                .map_err(db_error)?;
        }
        Ok(())
    }

    async fn update_project(
        &self,
        project_id: &str,
        patch: &ProjectPatch,
    ) -> Result<(), CoreError> {
        ProjectRepo::update(&self.pool, project_id, patch)
            .await
            .map_err(db_error)?
            .ok_or(CoreError::NotFound {
                entity: "project",
                id: project_id.to_string(),
            })?;
        Ok(())
    }

    async fn delete_project(&self, project_id: &str) -> Result<(), CoreError> {
        let deleted = ProjectRepo::delete(&self.pool, project_id)
            .await
            .map_err(db_error)?;
        if !deleted {
            return Err(CoreError::NotFound {
                entity: "project",
                id: project_id.to_string(),
            });
        }
        Ok(())
    }

    async fn adjust_counters(
        &self,
        project_id: &str,
        delta: CounterDelta,
    ) -> Result<(), CoreError> {
        let adjusted = ProjectRepo::adjust_counters(&self.pool, project_id, delta)
            .await
            .map_err(db_error)?;
        if !adjusted {
            return Err(CoreError::NotFound {
                entity: "project",
                id: project_id.to_string(),
            });
        }
        Ok(())
    }

    async fn add_member(&self, member: &ProjectMember) -> Result<(), CoreError> {
        ProjectMemberRepo::create(&self.pool, member)
            .await
            .map_err(db_error)?;
        Ok(())
    }

    async fn remove_member(&self, member_id: &str) -> Result<(), CoreError> {
        let deleted = ProjectMemberRepo::delete(&self.pool, member_id)
            .await
            .map_err(db_error)?;
        if !deleted {
            return Err(CoreError::NotFound {
                entity: "project member",
                id: member_id.to_string(),
            });
        }
        Ok(())
    }

    async fn create_drawing(&self, drawing: &Drawing) -> Result<(), CoreError> {
        DrawingRepo::create(&self.pool, drawing)
            .await
            .map_err(db_error)?;
        Ok(())
    }

    async fn update_page_count(
        &self,
        drawing_id: &str,
        page_count: i32,
    ) -> Result<(), CoreError> {
        let updated = DrawingRepo::update_page_count(&self.pool, drawing_id, page_count)
            .await
            .map_err(db_error)?;
        if !updated {
            return Err(CoreError::NotFound {
                entity: "drawing",
                id: drawing_id.to_string(),
            });
        }
        Ok(())
    }

    async fn delete_drawing(&self, drawing_id: &str) -> Result<(), CoreError> {
        // Issues go with it via ON DELETE CASCADE.
        let deleted = DrawingRepo::delete(&self.pool, drawing_id)
            .await
            .map_err(db_error)?;
        if !deleted {
            return Err(CoreError::NotFound {
                entity: "drawing",
                id: drawing_id.to_string(),
            });
        }
        Ok(())
    }

    async fn load_issues(&self, project_id: &str) -> Result<Vec<Issue>, CoreError> {
        IssueRepo::list_by_project(&self.pool, project_id)
            .await
            .map_err(db_error)?
            .into_iter()
            .map(|row| row.into_issue())
            .collect()
    }

    async fn create_issue(&self, issue: &Issue) -> Result<(), CoreError> {
        IssueRepo::create(&self.pool, issue).await.map_err(db_error)?;
        Ok(())
    }

    async fn update_issue(&self, issue_id: &str, patch: &IssuePatch) -> Result<(), CoreError> {
        IssueRepo::update(&self.pool, issue_id, patch)
            .await
            .map_err(db_error)?
            .ok_or(CoreError::NotFound {
                entity: "issue",
                id: issue_id.to_string(),
            })?;
        Ok(())
    }

    async fn delete_issue(&self, issue_id: &str) -> Result<(), CoreError> {
        let deleted = IssueRepo::delete(&self.pool, issue_id)
            .await
            .map_err(db_error)?;
        if !deleted {
            return Err(CoreError::NotFound {
                entity: "issue",
                id: issue_id.to_string(),
            });
        }
        Ok(())
    }

    async fn store_drawing_source(
        &self,
        project_id: &str,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<String, CoreError> {
        let source_ref = source_ref_for(project_id, file_name);
        let path = self.storage_root.join(&source_ref);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| CoreError::Internal(e.to_string()))?;
        }
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| CoreError::Internal(e.to_string()))?;
        Ok(source_ref)
    }
}

// ---------------------------------------------------------------------------
// Gateway
// ---------------------------------------------------------------------------

/// One logical persistence API for a session.
///
/// Cheap to clone; spawned write tasks each hold a clone.
#[derive(Clone)]
pub struct PersistenceGateway {
    mode: PersistenceMode,
    backend: Arc<dyn PersistenceBackend>,
}

impl PersistenceGateway {
    /// Select a backend for this session.
    ///
    /// Falls back to ephemeral, with a warning, when durable mode was
    /// chosen but the database cannot be reached or migrated. Sessions
    /// always start; they never fail on storage configuration.
    pub async fn select(config: &SessionConfig, identity: Option<&UserIdentity>) -> Self {
        match choose_mode(config, identity) {
            PersistenceMode::Ephemeral => {
                tracing::info!(mode = "ephemeral", "Persistence selected");
                Self::ephemeral()
            }
            PersistenceMode::Durable => {
                let url = config.database_url.as_deref().unwrap_or_default();
                let pool = match planmark_db::create_pool(url).await {
                    Ok(pool) => pool,
                    Err(error) => {
                        tracing::warn!(%error, "Database unreachable, falling back to ephemeral storage");
                        return Self::ephemeral();
                    }
                };
                if let Err(error) = planmark_db::run_migrations(&pool).await {
                    tracing::warn!(%error, "Migrations failed, falling back to ephemeral storage");
                    return Self::ephemeral();
                }
                tracing::info!(mode = "durable", "Persistence selected");
                Self {
                    mode: PersistenceMode::Durable,
                    backend: Arc::new(DurableBackend::new(pool, config.storage_root.clone())),
                }
            }
        }
    }

    /// A gateway over a fresh in-memory backend.
    pub fn ephemeral() -> Self {
        Self {
            mode: PersistenceMode::Ephemeral,
            backend: Arc::new(EphemeralBackend::new()),
        }
    }

    /// A gateway over an explicit backend. Used by tests.
    pub fn with_backend(mode: PersistenceMode, backend: Arc<dyn PersistenceBackend>) -> Self {
        Self { mode, backend }
    }

    pub fn mode(&self) -> PersistenceMode {
        self.mode
    }

    /// All projects visible to this session. Backend failures degrade to
    /// an empty list.
    pub async fn list_projects(&self) -> Vec<Project> {
        match self.backend.list_projects().await {
            Ok(projects) => projects,
            Err(error) => {
                tracing::warn!(%error, "Project list unavailable, continuing with none");
                Vec::new()
            }
        }
    }

    /// Issues for a project, in creation order. Backend failures degrade
    /// to an empty set so the session can still annotate; previously
    /// saved issues simply do not appear.
    pub async fn load_issues(&self, project_id: &str) -> Vec<Issue> {
        match self.backend.load_issues(project_id).await {
            Ok(issues) => issues,
            Err(error) => {
                tracing::warn!(project_id, %error, "Issue load failed, starting empty");
                Vec::new()
            }
        }
    }

    pub async fn create_project(&self, project: &Project) -> Result<(), CoreError> {
        self.backend
            .create_project(project)
            .await
            .map_err(|e| write_failure("project create", e))
    }

    pub async fn update_project(
        &self,
        project_id: &str,
        patch: &ProjectPatch,
    ) -> Result<(), CoreError> {
        self.backend
            .update_project(project_id, patch)
            .await
            .map_err(|e| write_failure("project update", e))
    }

    pub async fn delete_project(&self, project_id: &str) -> Result<(), CoreError> {
        self.backend
            .delete_project(project_id)
            .await
            .map_err(|e| write_failure("project delete", e))
    }

    pub async fn adjust_counters(
        &self,
        project_id: &str,
        delta: CounterDelta,
    ) -> Result<(), CoreError> {
        self.backend
            .adjust_counters(project_id, delta)
            .await
            .map_err(|e| write_failure("counter adjust", e))
    }

    pub async fn add_member(&self, member: &ProjectMember) -> Result<(), CoreError> {
        self.backend
            .add_member(member)
            .await
            .map_err(|e| write_failure("member add", e))
    }

    pub async fn remove_member(&self, member_id: &str) -> Result<(), CoreError> {
        self.backend
            .remove_member(member_id)
            .await
            .map_err(|e| write_failure("member remove", e))
    }

    pub async fn create_drawing(&self, drawing: &Drawing) -> Result<(), CoreError> {
        self.backend
            .create_drawing(drawing)
            .await
            .map_err(|e| write_failure("drawing create", e))
    }

    pub async fn update_page_count(
        &self,
        drawing_id: &str,
        page_count: i32,
    ) -> Result<(), CoreError> {
        self.backend
            .update_page_count(drawing_id, page_count)
            .await
            .map_err(|e| write_failure("page count update", e))
    }

    pub async fn delete_drawing(&self, drawing_id: &str) -> Result<(), CoreError> {
        self.backend
            .delete_drawing(drawing_id)
            .await
            .map_err(|e| write_failure("drawing delete", e))
    }

    pub async fn create_issue(&self, issue: &Issue) -> Result<(), CoreError> {
        self.backend
            .create_issue(issue)
            .await
            .map_err(|e| write_failure("issue create", e))
    }

    pub async fn update_issue(
        &self,
        issue_id: &str,
        patch: &IssuePatch,
    ) -> Result<(), CoreError> {
        self.backend
            .update_issue(issue_id, patch)
            .await
            .map_err(|e| write_failure("issue update", e))
    }

    pub async fn delete_issue(&self, issue_id: &str) -> Result<(), CoreError> {
        self.backend
            .delete_issue(issue_id)
            .await
            .map_err(|e| write_failure("issue delete", e))
    }

    pub async fn store_drawing_source(
        &self,
        project_id: &str,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<String, CoreError> {
        self.backend
            .store_drawing_source(project_id, file_name, bytes)
            .await
            .map_err(|e| write_failure("drawing source upload", e))
    }
}

/// Classify a backend write error for the caller. Validation and
/// not-found pass through; anything else becomes a transient write
/// failure the caller may ignore without reverting local state.
fn write_failure(op: &'static str, error: CoreError) -> CoreError {
    match error {
        CoreError::Validation(_) | CoreError::NotFound { .. } => error,
        other => CoreError::TransientWrite(format!("{op}: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use assert_matches::assert_matches;
    use chrono::Utc;
    use planmark_core::issue::{IssueStatus, Severity};
    use planmark_core::project::ProjectStatus;

    fn project(id: &str) -> Project {
        Project {
            id: id.to_string(),
            name: format!("Project {id}"),
            description: String::new(),
            status: ProjectStatus::Active,
            drawings: Vec::new(),
            issue_count: 0,
            resolved_count: 0,
            notes: String::new(),
            team_members: Vec::new(),
            created_at: Utc::now(),
        }
    }

    fn drawing(id: &str, project_id: &str) -> Drawing {
        Drawing {
            id: id.to_string(),
            project_id: project_id.to_string(),
            name: format!("Sheet {id}"),
            source_ref: format!("{project_id}/{id}.pdf"),
            page_count: 1,
            uploaded_at: Utc::now(),
            uploaded_by: "Sarah Chen, PE".to_string(),
        }
    }

    fn issue(id: &str, drawing_id: &str) -> Issue {
        Issue {
            id: id.to_string(),
            drawing_id: drawing_id.to_string(),
            page_number: 1,
            position: planmark_core::geometry::NormalizedPoint { x: 0.5, y: 0.5 },
            issue_type: "Other".to_string(),
            severity: Severity::Low,
            description: "check".to_string(),
            status: IssueStatus::Open,
            created_by: "Alex Rivera".to_string(),
            ai_generated: false,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn durable_mode_needs_database_and_real_user() {
        let mut config = SessionConfig::default();
        let real = UserIdentity {
            id: "u-1".to_string(),
            name: "Sarah Chen, PE".to_string(),
            email: "sarah.chen@example.com".to_string(),
            role: "senior".to_string(),
        };

        // No database configured: always ephemeral.
        assert_eq!(choose_mode(&config, Some(&real)), PersistenceMode::Ephemeral);
        assert_eq!(choose_mode(&config, None), PersistenceMode::Ephemeral);

        config.database_url = Some("postgres://localhost/planmark".to_string());
        assert_eq!(choose_mode(&config, Some(&real)), PersistenceMode::Durable);
        assert_eq!(choose_mode(&config, None), PersistenceMode::Durable);

        // The demo identity stays ephemeral even with a database.
        let demo = UserIdentity::demo();
        assert_eq!(choose_mode(&config, Some(&demo)), PersistenceMode::Ephemeral);
    }

    #[test]
    fn file_names_are_sanitized_for_storage() {
        assert_eq!(
            sanitize_file_name("Site Plan (rev 3).pdf"),
            "Site_Plan__rev_3_.pdf"
        );
        assert_eq!(sanitize_file_name("grading-v1.2.pdf"), "grading-v1.2.pdf");
    }

    #[tokio::test]
    async fn ephemeral_composes_nested_projects() {
        let backend = EphemeralBackend::new();
        let mut p = project("p1");
        p.drawings.push(drawing("d1", "p1"));
        backend.create_project(&p).await.unwrap();
        backend.create_drawing(&drawing("d2", "p1")).await.unwrap();

        let listed = backend.list_projects().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].drawings.len(), 2);
    }

    #[tokio::test]
    async fn ephemeral_loads_issues_in_creation_order() {
        let backend = EphemeralBackend::new();
        backend.create_project(&project("p1")).await.unwrap();
        backend.create_drawing(&drawing("d1", "p1")).await.unwrap();

        let base = Utc::now();
        for (n, id) in ["a", "b", "c"].iter().enumerate() {
            let mut i = issue(id, "d1");
            i.timestamp = base + chrono::Duration::seconds(n as i64);
            backend.create_issue(&i).await.unwrap();
        }

        let loaded = backend.load_issues("p1").await.unwrap();
        let ids: Vec<_> = loaded.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn ephemeral_drawing_delete_cascades_to_issues() {
        let backend = EphemeralBackend::new();
        backend.create_project(&project("p1")).await.unwrap();
        backend.create_drawing(&drawing("d1", "p1")).await.unwrap();
        backend.create_drawing(&drawing("d2", "p1")).await.unwrap();
        backend.create_issue(&issue("a", "d1")).await.unwrap();
        backend.create_issue(&issue("b", "d2")).await.unwrap();

        backend.delete_drawing("d1").await.unwrap();

        let remaining = backend.load_issues("p1").await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, "b");
    }

    #[tokio::test]
    async fn ephemeral_counter_adjust_clamps_at_zero() {
        let backend = EphemeralBackend::new();
        backend.create_project(&project("p1")).await.unwrap();
        backend
            .adjust_counters(
                "p1",
                CounterDelta {
                    issue_count: -3,
                    resolved_count: -1,
                },
            )
            .await
            .unwrap();

        let listed = backend.list_projects().await.unwrap();
        assert_eq!(listed[0].issue_count, 0);
        assert_eq!(listed[0].resolved_count, 0);
    }

    #[tokio::test]
    async fn ephemeral_rejects_unknown_ids() {
        let backend = EphemeralBackend::new();
        assert_matches!(
            backend.delete_issue("missing").await,
            Err(CoreError::NotFound { entity: "issue", .. })
        );
        assert_matches!(
            backend.update_project("missing", &ProjectPatch::default()).await,
            Err(CoreError::NotFound { entity: "project", .. })
        );
    }

    #[tokio::test]
    async fn stored_sources_are_retrievable() {
        let backend = EphemeralBackend::new();
        let source_ref = backend
            .store_drawing_source("p1", "Site Plan.pdf", b"%PDF-1.7")
            .await
            .unwrap();
        assert!(source_ref.starts_with("p1/"));
        assert!(source_ref.ends_with("-Site_Plan.pdf"));
        assert_eq!(backend.blob(&source_ref).await.unwrap(), b"%PDF-1.7");
    }

    #[tokio::test]
    async fn gateway_passes_not_found_through() {
        let gateway = PersistenceGateway::ephemeral();
        assert_matches!(
            gateway.delete_issue("missing").await,
            Err(CoreError::NotFound { .. })
        );
    }

    #[test]
    fn internal_errors_become_transient_writes() {
        let wrapped = write_failure("issue create", CoreError::Internal("boom".to_string()));
        assert_matches!(wrapped, CoreError::TransientWrite(_));
        let passthrough = write_failure(
            "issue create",
            CoreError::Validation("bad".to_string()),
        );
        assert_matches!(passthrough, CoreError::Validation(_));
    }
}
