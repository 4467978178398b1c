//! Versioned compute-once cells for process nodes
//!
//! Each memoized value remembers the [`CacheStamp`] it was computed under.
//! A reader presenting a different stamp triggers a recompute, so a stale
//! value can never be served after the tree or the child set changed.
//! The per-cell lock is held while computing: concurrent readers of the
//! same node wait for the first one and then get its value.

use std::cell::RefCell;
use std::sync::{Mutex, PoisonError};

use tracing::{debug, warn};

use crate::utils::error::{ProcessError, ProcessResult};

/// Version a memoized value was computed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStamp {
    /// Revision of the owning tree
    pub revision: u64,
    /// Version of the node's own child set and operator
    pub child_set: u64,
}

struct Stamped<T> {
    stamp: CacheStamp,
    value: T,
}

/// A lazily computed value bound to a [`CacheStamp`]
pub struct Memo<T> {
    slot: Mutex<Option<Stamped<T>>>,
}

impl<T> Default for Memo<T> {
    fn default() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }
}

impl<T> std::fmt::Debug for Memo<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stamp = self
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|s| s.stamp);
        f.debug_struct("Memo").field("stamp", &stamp).finish()
    }
}

impl<T: Clone> Memo<T> {
    /// Cached value for `stamp`, computing it with `init` if needed
    ///
    /// A failed `init` leaves the previous content untouched.
    pub fn get_or_try_init<F>(
        &self,
        stamp: CacheStamp,
        node: &str,
        field: &str,
        init: F,
    ) -> ProcessResult<T>
    where
        F: FnOnce() -> ProcessResult<T>,
    {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(cached) = slot.as_ref() {
            if cached.stamp == stamp {
                debug!("Cache hit: {} of {}", field, node);
                return Ok(cached.value.clone());
            }
        }

        debug!("Cache miss: {} of {}", field, node);
        let value = init()?;
        *slot = Some(Stamped {
            stamp,
            value: value.clone(),
        });
        Ok(value)
    }

    /// Cached value if it was computed under `stamp`
    pub fn peek(&self, stamp: CacheStamp) -> Option<T> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .filter(|cached| cached.stamp == stamp)
            .map(|cached| cached.value.clone())
    }

    pub fn clear(&mut self) {
        *self.slot.get_mut().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

thread_local! {
    // Cells currently being computed on this thread, by address.
    static IN_PROGRESS: RefCell<Vec<usize>> = const { RefCell::new(Vec::new()) };
}

/// Marks a cell as being computed on the current thread
///
/// Entering a cell twice means the definition loops back on itself. Taking
/// the cell lock again would deadlock, so this is reported as a cycle.
pub struct EvaluationGuard {
    key: usize,
}

impl EvaluationGuard {
    pub fn enter<T>(cell: &Memo<T>, node: &str) -> ProcessResult<Self> {
        let key = cell as *const Memo<T> as usize;
        IN_PROGRESS.with(|stack| {
            let mut stack = stack.borrow_mut();
            if stack.contains(&key) {
                warn!("Process '{}' depends on itself", node);
                return Err(ProcessError::DependencyCycle(node.to_string()));
            }
            stack.push(key);
            Ok(EvaluationGuard { key })
        })
    }

    /// Whether some cell is being computed on the current thread
    pub fn is_nested() -> bool {
        IN_PROGRESS.with(|stack| !stack.borrow().is_empty())
    }
}

impl Drop for EvaluationGuard {
    fn drop(&mut self) {
        IN_PROGRESS.with(|stack| {
            let mut stack = stack.borrow_mut();
            if let Some(pos) = stack.iter().rposition(|k| *k == self.key) {
                stack.remove(pos);
            }
        });
    }
}
