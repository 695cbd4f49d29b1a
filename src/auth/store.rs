use tracing::{debug, info, warn};

use super::config::AuthConfig;
use super::error::AuthError;
use super::model::{AuthOutcome, User};
use super::provider::{AuthProvider, MockAuthProvider};
use crate::store::{Derived, Readable, Store};

/// Holds the signed-in user, if any.
///
/// Login and signup are delegated to an [`AuthProvider`]; the store owns
/// input validation and the observable state.
pub struct AuthStore<P> {
    user: Store<Option<User>>,
    is_authenticated: Derived<bool>,
    provider: P,
}

impl AuthStore<MockAuthProvider> {
    /// A store backed by [`MockAuthProvider`].
    pub fn mock(config: AuthConfig) -> Self {
        Self::new(MockAuthProvider::new(config))
    }
}

impl<P: AuthProvider> AuthStore<P> {
    pub fn new(provider: P) -> Self {
        let user = Store::new(None);
        let is_authenticated = Derived::new(&user, |user: &Option<User>| user.is_some());
        Self {
            user,
            is_authenticated,
            provider,
        }
    }

    /// Log in. Empty credentials fail at once, without calling the provider.
    ///
    /// With [`MockAuthProvider`] and a non-zero latency this must be awaited
    /// inside a Tokio runtime with the time driver enabled.
    pub async fn login(&self, username: &str, password: &str) -> AuthOutcome {
        if username.is_empty() || password.is_empty() {
            debug!("login rejected: missing credentials");
            return AuthOutcome::from(Err::<(), _>(AuthError::CredentialsRequired));
        }

        match self.provider.login(username, password).await {
            Ok(user) => {
                info!(username = %user.username, "user logged in");
                self.user.set(Some(user));
                AuthOutcome::ok()
            }
            Err(err) => {
                warn!(error = %err, username, "login failed");
                AuthOutcome::from(Err::<(), _>(err))
            }
        }
    }

    /// Sign up. Any empty field fails at once, without calling the provider.
    ///
    /// Same runtime requirement as [`AuthStore::login`].
    pub async fn signup(&self, email: &str, password: &str, username: &str) -> AuthOutcome {
        if email.is_empty() || password.is_empty() || username.is_empty() {
            debug!("signup rejected: missing fields");
            return AuthOutcome::from(Err::<(), _>(AuthError::FieldsRequired));
        }

        match self.provider.signup(email, password, username).await {
            Ok(user) => {
                info!(username = %user.username, email = %user.email, "user signed up");
                self.user.set(Some(user));
                AuthOutcome::ok()
            }
            Err(err) => {
                warn!(error = %err, username, "signup failed");
                AuthOutcome::from(Err::<(), _>(err))
            }
        }
    }

    /// Clear the current user. Safe to call when nobody is logged in.
    pub fn logout(&self) {
        info!("user logged out");
        self.user.set(None);
    }

    /// Observable current user.
    pub fn user(&self) -> impl Readable<Option<User>> + Clone + Send + Sync + 'static {
        self.user.clone()
    }

    pub fn current_user(&self) -> Option<User> {
        self.user.get()
    }

    /// True while a user is present.
    pub fn is_authenticated(&self) -> Derived<bool> {
        self.is_authenticated.clone()
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthResult;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tokio::time::Instant;

    struct RejectingProvider {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl AuthProvider for RejectingProvider {
        async fn login(&self, _username: &str, _password: &str) -> AuthResult<User> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(AuthError::Provider("invalid credentials".to_string()))
        }

        async fn signup(&self, _email: &str, _password: &str, _username: &str) -> AuthResult<User> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(AuthError::Provider("email taken".to_string()))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn login_sets_mock_user() {
        let auth = AuthStore::mock(AuthConfig::default());

        let outcome = auth.login("alice", "pw").await;

        assert_eq!(outcome, AuthOutcome::ok());
        let user = auth.current_user().unwrap();
        assert_eq!(user.id, "mock-user-id");
        assert_eq!(user.email, "alice@example.com");
        assert_eq!(user.username, "alice");
        assert!(auth.is_authenticated().get());
    }

    #[tokio::test(start_paused = true)]
    async fn empty_credentials_fail_without_delay() {
        let auth = AuthStore::mock(AuthConfig::default());
        let started = Instant::now();

        let missing_password = auth.login("alice", "").await;
        let missing_username = auth.login("", "pw").await;

        assert_eq!(started.elapsed(), Duration::ZERO);
        for outcome in [missing_password, missing_username] {
            assert!(!outcome.success);
            assert_eq!(outcome.error.as_deref(), Some("Username and password are required"));
        }
        assert!(auth.current_user().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn signup_requires_every_field() {
        let auth = AuthStore::mock(AuthConfig::default());

        for (email, password, username) in [("", "pw", "bob"), ("b@x.io", "", "bob"), ("b@x.io", "pw", "")] {
            let outcome = auth.signup(email, password, username).await;
            assert_eq!(outcome, AuthOutcome::failed("All fields are required"));
        }
        assert!(auth.current_user().is_none());

        let outcome = auth.signup("bob@gym.test", "pw", "bob").await;
        assert!(outcome.success);
        assert_eq!(auth.current_user().unwrap().email, "bob@gym.test");
    }

    #[tokio::test(start_paused = true)]
    async fn failed_signup_keeps_existing_user() {
        let auth = AuthStore::mock(AuthConfig::default());
        assert!(auth.login("alice", "pw").await.success);

        let outcome = auth.signup("", "pw", "mallory").await;

        assert!(!outcome.success);
        assert_eq!(auth.current_user().unwrap().username, "alice");
    }

    #[tokio::test]
    async fn provider_errors_become_failed_outcomes() {
        let provider = RejectingProvider {
            calls: AtomicUsize::new(0),
        };
        let auth = AuthStore::new(provider);

        let outcome = auth.login("alice", "wrong").await;
        assert_eq!(outcome.error.as_deref(), Some("Auth provider error: invalid credentials"));

        let outcome = auth.login("", "").await;
        assert!(!outcome.success);
        assert_eq!(auth.provider().calls.load(Ordering::SeqCst), 1);
        assert!(!auth.is_authenticated().get());
    }

    #[tokio::test(start_paused = true)]
    async fn logout_is_idempotent() {
        let auth = AuthStore::mock(AuthConfig::default());
        auth.logout();
        assert!(auth.current_user().is_none());

        auth.login("alice", "pw").await;
        auth.logout();
        auth.logout();
        assert!(auth.current_user().is_none());
        assert!(!auth.is_authenticated().get());
    }

    #[tokio::test(start_paused = true)]
    async fn is_authenticated_follows_every_transition() {
        let auth = AuthStore::mock(AuthConfig::instant());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        let _sub = auth
            .is_authenticated()
            .subscribe(move |authed| seen_clone.lock().unwrap().push(*authed));

        auth.login("alice", "pw").await;
        auth.logout();
        auth.signup("bob@gym.test", "pw", "bob").await;

        assert_eq!(*seen.lock().unwrap(), vec![false, true, false, true]);
    }

    #[tokio::test]
    async fn user_subscribers_see_login() {
        let auth = AuthStore::mock(AuthConfig::instant());
        let names = Arc::new(Mutex::new(Vec::new()));
        let names_clone = names.clone();
        let _sub = auth.user().subscribe(move |user: &Option<User>| {
            names_clone
                .lock()
                .unwrap()
                .push(user.as_ref().map(|u| u.username.clone()));
        });

        auth.login("dana", "pw").await;

        assert_eq!(*names.lock().unwrap(), vec![None, Some("dana".to_string())]);
    }
}
