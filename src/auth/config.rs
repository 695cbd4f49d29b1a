use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings for [`MockAuthProvider`](super::MockAuthProvider).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    // Simulated round-trip before a login or signup completes
    pub latency_ms: u64,
    // Appended to the username to synthesize an email on login
    pub email_domain: String,
    pub user_id: String,
}

impl AuthConfig {
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }

    /// No artificial delay.
    pub fn instant() -> Self {
        Self {
            latency_ms: 0,
            ..Self::default()
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            latency_ms: 500,
            email_domain: "example.com".to_string(),
            user_id: "mock-user-id".to_string(),
        }
    }
}
