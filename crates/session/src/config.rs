//! Session configuration loaded from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use crate::identity::DEMO_USER_EMAIL;

/// Default simulated analysis delay in milliseconds.
const DEFAULT_ANALYSIS_DELAY_MS: u64 = 1_500;

/// Default root directory for stored drawing sources (durable mode).
const DEFAULT_STORAGE_ROOT: &str = "./storage";

/// Session configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development; a missing
/// `DATABASE_URL` selects the ephemeral backend rather than failing.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Postgres connection string. `None` forces ephemeral mode.
    pub database_url: Option<String>,
    /// Email of the demo account that always runs ephemeral.
    pub demo_email: String,
    /// Simulated processing delay for the analysis pass.
    pub analysis_delay_ms: u64,
    /// Root directory for drawing source files written by the durable
    /// backend.
    pub storage_root: PathBuf,
}

impl SessionConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default              |
    /// |-----------------------------|----------------------|
    /// | `DATABASE_URL`              | unset (ephemeral)    |
    /// | `PLANMARK_DEMO_EMAIL`       | `demo@planmark.dev`  |
    /// | `PLANMARK_ANALYSIS_DELAY_MS`| `1500`               |
    /// | `PLANMARK_STORAGE_ROOT`     | `./storage`          |
    pub fn from_env() -> Self {
        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        let demo_email = std::env::var("PLANMARK_DEMO_EMAIL")
            .unwrap_or_else(|_| DEMO_USER_EMAIL.into());

        let analysis_delay_ms: u64 = std::env::var("PLANMARK_ANALYSIS_DELAY_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_ANALYSIS_DELAY_MS);

        let storage_root = PathBuf::from(
            std::env::var("PLANMARK_STORAGE_ROOT")
                .unwrap_or_else(|_| DEFAULT_STORAGE_ROOT.into()),
        );

        Self {
            database_url,
            demo_email,
            analysis_delay_ms,
            storage_root,
        }
    }

    /// The analysis delay as a [`Duration`].
    pub fn analysis_delay(&self) -> Duration {
        Duration::from_millis(self.analysis_delay_ms)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            demo_email: DEMO_USER_EMAIL.to_string(),
            analysis_delay_ms: DEFAULT_ANALYSIS_DELAY_MS,
            storage_root: PathBuf::from(DEFAULT_STORAGE_ROOT),
        }
    }
}
