//! Session user identity.
//!
//! Identities come from an external provider; the session only needs a
//! display name for attribution and enough to recognize the shared demo
//! account, which must never write to the durable store.

use serde::{Deserialize, Serialize};

/// Id of the built-in demo account.
pub const DEMO_USER_ID: &str = "demo-user";

/// Email of the built-in demo account. Overridable via config.
pub const DEMO_USER_EMAIL: &str = "demo@planmark.dev";

/// The active user, as reported by the identity provider.
///
/// `role` is a display tier (`"junior"` / `"senior"`), not an
/// authorization level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
}

impl UserIdentity {
    /// The built-in demo account.
    pub fn demo() -> Self {
        Self {
            id: DEMO_USER_ID.to_string(),
            name: "Alex Rivera".to_string(),
            email: DEMO_USER_EMAIL.to_string(),
            role: "junior".to_string(),
        }
    }

    /// Whether this identity is the demo account for the given demo email.
    ///
    /// Demo sessions always run against the ephemeral backend.
    pub fn is_demo(&self, demo_email: &str) -> bool {
        self.id == DEMO_USER_ID || self.email.eq_ignore_ascii_case(demo_email)
    }
}
