//! Services injected into the stores.
//!
//! Stores never read the wall clock or mint identifiers on their own; they
//! take a [`Clock`] and an [`IdGenerator`] at construction so hosts and tests
//! control both.

mod clock;
mod ids;

pub use clock::{Clock, ManualClock, SystemClock};
pub use ids::IdGenerator;
