//! # Ironlog
//!
//! Reactive client-side state for a fitness tracker.
//!
//! ## Stores (primitives)
//!
//! - `Store<T>` - observable single value, notifies subscribers on every write
//! - `Derived<T>` - read-only projection of one or two sources
//! - `Readable<T>` - the subscribe side shared by both
//!
//! ## Application state
//!
//! - `AuthStore` - the signed-in user, backed by a pluggable `AuthProvider`
//! - `WorkoutStore` - the in-progress workout, its exercises and sets, and
//!   the history of finished workouts
//!
//! Nothing here is global. Hosts construct the stores they need and pass
//! them where they are used; clocks and id generators are injected through
//! [`runtime`].

pub mod auth;
pub mod runtime;
pub mod store;
pub mod workout;

// Re-export main types for convenience
pub use auth::{AuthConfig, AuthError, AuthOutcome, AuthProvider, AuthStore, MockAuthProvider, User};
pub use store::{Derived, Readable, Store, Subscription};
pub use workout::{Exercise, SetUpdate, Workout, WorkoutSet, WorkoutStore};
