use std::sync::atomic::{AtomicU64, Ordering};

/// Mints `"{prefix}-{n}"` identifiers from a monotonic counter.
///
/// Unlike timestamp-derived ids, two ids taken within the same millisecond
/// never collide.
///
/// # Examples
///
/// ```
/// use ironlog::runtime::IdGenerator;
///
/// let ids = IdGenerator::new("exercise");
/// assert_eq!(ids.next_id(), "exercise-1");
/// assert_eq!(ids.next_id(), "exercise-2");
/// ```
#[derive(Debug)]
pub struct IdGenerator {
    prefix: String,
    next: AtomicU64,
}

impl IdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }

    /// Generate the next unique id.
    pub fn next_id(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::SeqCst);
        format!("{}-{}", self.prefix, n)
    }
}
