use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock, Weak};

use super::readable::Readable;

type Subscriber<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Subscribers<T> {
    next_id: AtomicUsize,
    entries: RwLock<Vec<(usize, Subscriber<T>)>>,
}

impl<T> Subscribers<T> {
    fn new() -> Self {
        Self {
            next_id: AtomicUsize::new(0),
            entries: RwLock::new(Vec::new()),
        }
    }

    fn insert(&self, subscriber: Subscriber<T>) -> usize {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, subscriber));
        id
    }

    fn remove(&self, id: usize) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|(entry_id, _)| *entry_id != id);
    }

    fn snapshot(&self) -> Vec<Subscriber<T>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, subscriber)| Arc::clone(subscriber))
            .collect()
    }

    fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// A thread-safe, observable single-value container.
///
/// Every write replaces the value and synchronously notifies all current
/// subscribers with the new value. Clones are handles onto the same value.
///
/// # Examples
///
/// ```
/// use ironlog::Store;
/// use std::sync::{Arc, Mutex};
///
/// let store = Store::new(1);
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let seen_clone = seen.clone();
///
/// let _sub = store.subscribe(move |value| seen_clone.lock().unwrap().push(*value));
/// store.set(2);
/// store.update(|n| *n += 1);
///
/// assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
/// ```
pub struct Store<T> {
    state: Arc<RwLock<T>>,
    version: Arc<AtomicU64>,
    subscribers: Arc<Subscribers<T>>,
}

impl<T: Clone + Send + Sync + 'static> Store<T> {
    /// Create a new store with the given initial value.
    pub fn new(initial: T) -> Self {
        Self {
            state: Arc::new(RwLock::new(initial)),
            version: Arc::new(AtomicU64::new(0)),
            subscribers: Arc::new(Subscribers::new()),
        }
    }

    /// Get a clone of the current value.
    pub fn get(&self) -> T {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the value and notify subscribers.
    pub fn set(&self, new_value: T) {
        {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            *state = new_value;
            self.version.fetch_add(1, Ordering::SeqCst);
        }
        self.notify();
    }

    /// Mutate the value in place and notify subscribers.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut T),
    {
        {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            f(&mut *state);
            self.version.fetch_add(1, Ordering::SeqCst);
        }
        self.notify();
    }

    /// Compute a replacement from the current value.
    ///
    /// Returning `None` leaves the value untouched and notifies nobody.
    /// Returns whether the value was replaced.
    pub fn modify<F>(&self, f: F) -> bool
    where
        F: FnOnce(&T) -> Option<T>,
    {
        let replaced = {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            match f(&*state) {
                Some(next) => {
                    *state = next;
                    self.version.fetch_add(1, Ordering::SeqCst);
                    true
                }
                None => false,
            }
        };
        if replaced {
            self.notify();
        }
        replaced
    }

    /// Read the value without cloning it.
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&*state)
    }

    /// Subscribe to changes. The callback runs immediately with the current
    /// value and again after every write.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let callback: Subscriber<T> = Arc::new(callback);
        let subscription = self.register(Arc::clone(&callback));
        let value = self.get();
        callback(&value);
        subscription
    }

    /// Subscribe to future changes only.
    pub fn watch<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.register(Arc::new(callback))
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    fn register(&self, callback: Subscriber<T>) -> Subscription {
        let id = self.subscribers.insert(callback);
        let subscribers: Weak<Subscribers<T>> = Arc::downgrade(&self.subscribers);
        Subscription::new(move || {
            if let Some(subscribers) = subscribers.upgrade() {
                subscribers.remove(id);
            }
        })
    }

    /// Deliver the current value to every subscriber.
    ///
    /// A callback may write to this store; the nested write delivers the
    /// newer value to everyone, so the outer round stops early.
    fn notify(&self) {
        let (value, version) = {
            let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
            (state.clone(), self.version.load(Ordering::SeqCst))
        };
        for subscriber in self.subscribers.snapshot() {
            if self.version.load(Ordering::SeqCst) != version {
                break;
            }
            subscriber(&value);
        }
    }
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            version: Arc::clone(&self.version),
            subscribers: Arc::clone(&self.subscribers),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> Readable<T> for Store<T> {
    fn get(&self) -> T {
        Store::get(self)
    }

    fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        Store::subscribe(self, callback)
    }

    fn watch<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        Store::watch(self, callback)
    }
}

/// RAII handle for a store subscriber.
///
/// Dropping the handle or calling [`Subscription::unsubscribe`] removes the
/// callback. Other subscribers are unaffected.
#[must_use = "dropping a Subscription immediately unsubscribes its callback"]
pub struct Subscription {
    remove: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    fn new<F>(remove: F) -> Self
    where
        F: FnOnce() + Send + Sync + 'static,
    {
        Self {
            remove: Some(Box::new(remove)),
        }
    }

    /// Stop receiving notifications.
    pub fn unsubscribe(mut self) {
        if let Some(remove) = self.remove.take() {
            remove();
        }
    }

    /// Keep the callback registered for as long as the store lives.
    pub fn detach(mut self) {
        self.remove = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(remove) = self.remove.take() {
            remove();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.remove.is_some())
            .finish()
    }
}
