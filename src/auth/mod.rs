//! Authentication state.
//!
//! [`AuthStore`] holds the current [`User`] and exposes login, signup and
//! logout. The actual credential check is an [`AuthProvider`]; the bundled
//! [`MockAuthProvider`] accepts anything after a short delay.

mod config;
mod error;
mod model;
mod provider;
mod store;

pub use config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use model::{AuthOutcome, User};
pub use provider::{AuthProvider, MockAuthProvider};
pub use store::AuthStore;
