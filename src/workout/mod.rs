//! Workout tracking state.
//!
//! [`WorkoutStore`] keeps the single in-progress [`Workout`] and an
//! append-only history of finished ones, most recent first.

mod model;
mod store;

pub use model::{Exercise, SetUpdate, Workout, WorkoutSet};
pub use store::WorkoutStore;
