use std::sync::Arc;

use super::readable::Readable;
use super::store::{Store, Subscription};

/// A read-only value projected from one or two sources.
///
/// The projection re-runs on every source notification, and the derived
/// value then notifies its own subscribers, even when the projected value
/// did not change. Dropping the last handle detaches from the sources.
///
/// # Examples
///
/// ```
/// use ironlog::{Derived, Store};
///
/// let reps = Store::new(5);
/// let doubled = Derived::new(&reps, |n: &i32| n * 2);
/// assert_eq!(doubled.get(), 10);
///
/// reps.set(8);
/// assert_eq!(doubled.get(), 16);
/// ```
pub struct Derived<T> {
    store: Store<T>,
    _sources: Arc<Vec<Subscription>>,
}

impl<T: Clone + Send + Sync + 'static> Derived<T> {
    /// Project a single source.
    pub fn new<S, R, F>(source: &R, f: F) -> Self
    where
        R: Readable<S>,
        F: Fn(&S) -> T + Send + Sync + 'static,
    {
        let store = Store::new(f(&source.get()));
        let target = store.clone();
        let guard = source.watch(move |value| target.set(f(value)));

        Self {
            store,
            _sources: Arc::new(vec![guard]),
        }
    }

    /// Project two sources; a change in either recomputes the value.
    pub fn from2<A, B, RA, RB, F>(a: &RA, b: &RB, f: F) -> Self
    where
        A: 'static,
        B: 'static,
        RA: Readable<A> + Clone + Send + Sync + 'static,
        RB: Readable<B> + Clone + Send + Sync + 'static,
        F: Fn(&A, &B) -> T + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        let store = Store::new(f(&a.get(), &b.get()));

        let target = store.clone();
        let other = b.clone();
        let project = Arc::clone(&f);
        let guard_a = a.watch(move |value| target.set(project(value, &other.get())));

        let target = store.clone();
        let other = a.clone();
        let guard_b = b.watch(move |value| target.set(f(&other.get(), value)));

        Self {
            store,
            _sources: Arc::new(vec![guard_a, guard_b]),
        }
    }

    /// Get the most recently projected value.
    pub fn get(&self) -> T {
        self.store.get()
    }

    /// Read the projected value without cloning it.
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        self.store.read(f)
    }

    /// Subscribe to the projection; the callback runs immediately.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.store.subscribe(callback)
    }

    /// Subscribe to future recomputations only.
    pub fn watch<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.store.watch(callback)
    }
}

impl<T> Clone for Derived<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _sources: Arc::clone(&self._sources),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> Readable<T> for Derived<T> {
    fn get(&self) -> T {
        Derived::get(self)
    }

    fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        Derived::subscribe(self, callback)
    }

    fn watch<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        Derived::watch(self, callback)
    }
}
