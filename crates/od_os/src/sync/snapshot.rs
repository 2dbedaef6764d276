use alloc::sync::Arc;
use core::fmt;
use std::sync::{Mutex, PoisonError, RwLock};

// -----------------------------------------------------------------------------
// Snapshot

/// A copy-on-write cell holding an immutable, shared value.
///
/// Readers take a cheap [`Arc`] clone of the current value with [`load`] and
/// keep using it for as long as they like. Writers build a complete new value
/// from the current one and swap it in with [`update`]. A reader therefore
/// sees either the value before an update or the value after it, never a mix.
///
/// Writers are serialized by an internal mutex, so two concurrent updates
/// cannot lose each other's changes.
///
/// # Examples
///
/// ```
/// use od_os::sync::Snapshot;
///
/// let cell = Snapshot::new(vec![1, 2]);
/// let before = cell.load();
///
/// cell.update(|v| {
///     let mut next = v.clone();
///     next.push(3);
///     Some(next)
/// });
///
/// assert_eq!(*before, [1, 2]);
/// assert_eq!(*cell.load(), [1, 2, 3]);
/// ```
///
/// [`load`]: Snapshot::load
/// [`update`]: Snapshot::update
pub struct Snapshot<T> {
    current: RwLock<Arc<T>>,
    writer: Mutex<()>,
}

impl<T> Snapshot<T> {
    /// Creates a cell holding `value`.
    pub fn new(value: T) -> Self {
        Self {
            current: RwLock::new(Arc::new(value)),
            writer: Mutex::new(()),
        }
    }

    /// Returns the current value.
    ///
    /// The read lock is held only while the [`Arc`] is cloned.
    #[inline]
    pub fn load(&self) -> Arc<T> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replaces the value with the one produced by `f`.
    ///
    /// `f` receives the current value and returns `None` to leave it as is.
    /// Returns `true` if the value was replaced.
    pub fn update(&self, f: impl FnOnce(&T) -> Option<T>) -> bool {
        let _writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let current = self.load();
        match f(&current) {
            Some(next) => {
                *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(next);
                true
            }
            None => false,
        }
    }
}

impl<T: Default> Default for Snapshot<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Snapshot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Snapshot").field(&self.load()).finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use super::Snapshot;

    #[test]
    fn update_returning_none_keeps_value() {
        let cell = Snapshot::new(vec![1]);
        assert!(!cell.update(|_| None));
        assert_eq!(*cell.load(), [1]);
    }

    #[test]
    fn concurrent_appends_are_not_lost() {
        let cell = Snapshot::new(Vec::<usize>::new());

        std::thread::scope(|s| {
            for i in 0..8 {
                let cell = &cell;
                s.spawn(move || {
                    cell.update(|v| {
                        let mut next = v.clone();
                        next.push(i);
                        Some(next)
                    });
                });
            }
        });

        let mut result = cell.load().as_ref().clone();
        result.sort_unstable();
        assert_eq!(result, (0..8).collect::<Vec<_>>());
    }
}
