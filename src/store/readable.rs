use super::store::Subscription;

/// Read side of an observable value.
///
/// Implemented by [`Store`](super::Store) and [`Derived`](super::Derived) so
/// that consumers and projections can depend on "something observable"
/// without caring whether it is writable.
pub trait Readable<T> {
    /// Snapshot of the current value.
    fn get(&self) -> T;

    /// Register a callback that runs immediately with the current value and
    /// again after every change.
    fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static;

    /// Register a callback for future changes only.
    fn watch<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static;
}
