//! `planmark-demo` -- seeded walkthrough of a review session.
//!
//! Signs in as the demo reviewer, seeds the built-in projects, then runs
//! one end-to-end session: open a project, attach a drawing (which kicks
//! off the assisted review pass), pin and file a manual issue, resolve a
//! finding, and print the resulting counters and sidebar stats. The demo
//! identity always gets the ephemeral backend, so runs leave no durable
//! state behind.
//!
//! # Environment variables
//!
//! | Variable                    | Required | Default     | Description                                |
//! |-----------------------------|----------|-------------|--------------------------------------------|
//! | `DATABASE_URL`              | no       | --          | Postgres DSN; ignored for the demo identity |
//! | `PLANMARK_DEMO_EMAIL`       | no       | `demo@planmark.dev` | Email treated as the demo identity  |
//! | `PLANMARK_ANALYSIS_DELAY_MS`| no       | `1500`      | Simulated analysis duration                 |
//! | `PLANMARK_STORAGE_ROOT`     | no       | `./storage` | Durable-mode drawing source directory       |

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use planmark_core::geometry::SurfaceSize;
use planmark_core::issue::{IssueDraft, IssueStatus, Severity};
use planmark_core::store::{IssueFilter, IssueSort};
use planmark_session::config::SessionConfig;
use planmark_session::controller::SessionController;
use planmark_session::gateway::PersistenceGateway;
use planmark_session::identity::UserIdentity;
use planmark_session::renderer::StaticRenderer;
use planmark_session::seed;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "planmark_session=info,planmark_db=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration and identity ---
    let config = SessionConfig::from_env();
    let identity = UserIdentity::demo();
    tracing::info!(user = %identity.name, email = %identity.email, "Signed in");

    // --- Persistence ---
    let gateway = PersistenceGateway::select(&config, Some(&identity)).await;

    // --- Seed ---
    for project in seed::demo_projects() {
        gateway.create_project(&project).await?;
    }
    let projects = gateway.list_projects().await;
    tracing::info!(count = projects.len(), "Demo projects seeded");
    for project in &projects {
        tracing::info!(
            name = %project.name,
            status = project.status.as_str(),
            issues = project.issue_count,
            resolved = project.resolved_count,
            "Project",
        );
    }

    // --- Session walkthrough ---
    let renderer = Arc::new(StaticRenderer::new(612.0, 792.0, 3));
    let mut session = SessionController::new(gateway, Some(identity))
        .with_renderer(renderer)
        .with_analysis_delay(config.analysis_delay());

    let transit_hub = projects
        .into_iter()
        .find(|p| p.name == "Downtown Transit Hub")
        .ok_or_else(|| anyhow::anyhow!("seed project missing from the dashboard"))?;
    session.open_project(transit_hub).await;

    // Attach a new sheet; the assisted review pass runs on it.
    let drawing = session
        .attach_drawing("Structural Framing Plan.pdf", b"%PDF-1.4 demo")
        .await?;
    tracing::info!(
        name = %drawing.name,
        pages = drawing.page_count,
        source_ref = %drawing.source_ref,
        "Drawing attached and analyzed",
    );

    // File one manual issue from a click at 50% / 25% of the sheet.
    let surface = SurfaceSize::new(1224.0, 1584.0)?;
    session.place_pin(612.0, 396.0, surface, 1)?;
    let manual = session.submit_issue(IssueDraft {
        issue_type: "Missing Dimension/Callout".to_string(),
        severity: Severity::Medium,
        description: "Column grid spacing not dimensioned along line B".to_string(),
    })?;
    tracing::info!(issue_id = %manual.id, "Manual issue filed");

    // Resolve the first finding on the sheet.
    let first_finding = session
        .issues(&IssueFilter::default(), IssueSort::TimestampDesc)
        .iter()
        .rev()
        .find(|i| i.ai_generated)
        .map(|i| i.id.clone());
    if let Some(issue_id) = first_finding {
        session.update_issue_status(&issue_id, IssueStatus::Resolved)?;
        tracing::info!(issue_id = %issue_id, "Finding resolved");
    }

    // --- Results ---
    let stats = session.drawing_stats();
    let (issue_count, resolved_count) = session.counters();
    tracing::info!(
        total = stats.total,
        open = stats.open,
        resolved = stats.resolved,
        ai_generated = stats.ai_generated,
        "Sheet stats",
    );
    tracing::info!(issue_count, resolved_count, "Project counters");

    for marker in session.markers_on_page(1, surface) {
        tracing::info!(
            number = marker.number,
            x = marker.pixel_x,
            y = marker.pixel_y,
            "Pin",
        );
    }

    session.flush_writes().await;
    tracing::info!("Demo session complete");
    Ok(())
}
