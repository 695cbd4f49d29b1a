//! Observable value containers.
//!
//! A [`Store`] holds one value and notifies subscribers synchronously on every
//! write. A [`Derived`] is a read-only projection of one or two sources that
//! recomputes whenever a source notifies.

mod derived;
mod readable;
mod store;

pub use derived::Derived;
pub use readable::Readable;
pub use store::{Store, Subscription};
