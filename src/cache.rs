//! Write-once memoization cell.
//!
//! [`CacheCell`] is double-checked locking over a [`OnceLock`]:
//! - once populated, readers take the unguarded `OnceLock::get` fast path;
//! - before that, callers serialize on a mutex gate, re-check, and exactly one
//!   of them runs the initializer. The others block on the gate and then see
//!   the published value.
//!
//! A failed initializer publishes nothing; the next caller runs it again.
//! A value, once published, is never replaced.

use crate::error::Result;
use std::fmt;
use std::sync::{Mutex, OnceLock, PoisonError};
use tracing::trace;

pub struct CacheCell<V> {
    value: OnceLock<V>,
    gate: Mutex<()>,
}

impl<V> Default for CacheCell<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> CacheCell<V> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            value: OnceLock::new(),
            gate: Mutex::new(()),
        }
    }

    /// A cell that is already populated.
    pub fn ready(value: V) -> Self {
        let cell = Self::new();
        let _ = cell.value.set(value);
        cell
    }

    /// The value if it has been published.
    pub fn get(&self) -> Option<&V> {
        self.value.get()
    }

    pub fn is_ready(&self) -> bool {
        self.value.get().is_some()
    }

    /// Return the cached value, running `init` first if nothing is cached.
    /// At most one `init` runs at a time, and none runs once a value exists.
    ///
    /// # Errors
    /// Whatever `init` returns; nothing is cached in that case.
    pub fn get_or_try_init<F>(&self, init: F) -> Result<&V>
    where
        F: FnOnce() -> Result<V>,
    {
        if let Some(v) = self.value.get() {
            trace!("cache cell hit");
            return Ok(v);
        }
        // A panicking initializer leaves the cell empty; the gate itself holds
        // no data, so poisoning is safe to ignore.
        let _guard = self.gate.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(v) = self.value.get() {
            trace!("cache cell populated while waiting on gate");
            return Ok(v);
        }
        let computed = init()?;
        Ok(self.value.get_or_init(|| computed))
    }
}

impl<V: fmt::Debug> fmt::Debug for CacheCell<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheCell").field("value", &self.value.get()).finish()
    }
}
