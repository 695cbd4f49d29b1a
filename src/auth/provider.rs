use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use super::config::AuthConfig;
use super::error::AuthResult;
use super::model::User;
use crate::runtime::{Clock, SystemClock};

/// Something that can authenticate a user.
///
/// [`AuthStore`](super::AuthStore) validates inputs before calling a provider,
/// so implementations receive non-empty arguments.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn login(&self, username: &str, password: &str) -> AuthResult<User>;
    async fn signup(&self, email: &str, password: &str, username: &str) -> AuthResult<User>;
}

#[async_trait]
impl<P: AuthProvider + ?Sized> AuthProvider for Arc<P> {
    async fn login(&self, username: &str, password: &str) -> AuthResult<User> {
        (**self).login(username, password).await
    }

    async fn signup(&self, email: &str, password: &str, username: &str) -> AuthResult<User> {
        (**self).signup(email, password, username).await
    }
}

/// Accepts any credentials after a fixed delay.
///
/// Nothing is stored or verified. Intended for development and tests until a
/// real provider is plugged in.
///
/// A non-zero latency is awaited with `tokio::time::sleep`, so calls must run
/// inside a Tokio runtime with the time driver enabled; other executors
/// panic. [`AuthConfig::instant`] skips the delay and has no such
/// requirement.
pub struct MockAuthProvider {
    config: AuthConfig,
    clock: Arc<dyn Clock>,
}

impl MockAuthProvider {
    pub fn new(config: AuthConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: AuthConfig, clock: Arc<dyn Clock>) -> Self {
        Self { config, clock }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    async fn simulate_latency(&self) {
        let latency = self.config.latency();
        if !latency.is_zero() {
            debug!(latency_ms = self.config.latency_ms, "simulating auth round-trip");
            tokio::time::sleep(latency).await;
        }
    }

    fn user(&self, email: String, username: &str) -> User {
        User {
            id: self.config.user_id.clone(),
            email,
            username: username.to_string(),
            created_at: self.clock.now(),
        }
    }
}

impl Default for MockAuthProvider {
    fn default() -> Self {
        Self::new(AuthConfig::default())
    }
}

#[async_trait]
impl AuthProvider for MockAuthProvider {
    async fn login(&self, username: &str, _password: &str) -> AuthResult<User> {
        self.simulate_latency().await;
        let email = format!("{}@{}", username, self.config.email_domain);
        Ok(self.user(email, username))
    }

    async fn signup(&self, email: &str, _password: &str, username: &str) -> AuthResult<User> {
        self.simulate_latency().await;
        Ok(self.user(email.to_string(), username))
    }
}
