//! Pull counters for asserting laziness.

use crate::cursor::{BoxCursor, Cursor};
use crate::error::{Result, SeqError};
use crate::seq::{Seq, SeqBound};
use crate::source::Source;
use std::marker::PhantomData;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counts the elements that pass a point in a chain.
///
/// Clones share the counter, so a probe can be moved into closures and still
/// be read from the test body.
#[derive(Clone, Debug, Default)]
pub struct Probe {
    pulled: Arc<AtomicUsize>,
}

impl Probe {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// `seq` with a counter on every element handed downstream.
    #[must_use]
    pub fn attach<T: SeqBound>(&self, seq: &Seq<T>) -> Seq<T> {
        let pulled = Arc::clone(&self.pulled);
        seq.peek(move |_| {
            pulled.fetch_add(1, Ordering::SeqCst);
        })
    }

    /// Elements pulled through the probe so far.
    pub fn pulled(&self) -> usize {
        self.pulled.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.pulled.store(0, Ordering::SeqCst);
    }
}

/// A source that reports a size but fails as soon as anything is pulled.
///
/// Useful for proving that an operation took the size fast path: any pull
/// surfaces as [`SeqError::InvalidArgument`].
pub struct SizedOnlySource<T> {
    len: usize,
    opened: Arc<AtomicUsize>,
    _t: PhantomData<fn() -> T>,
}

impl<T> SizedOnlySource<T> {
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            len,
            opened: Arc::new(AtomicUsize::new(0)),
            _t: PhantomData,
        }
    }

    /// Shared counter of cursors opened on this source.
    #[must_use]
    pub fn open_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.opened)
    }
}

struct RefusingCursor<T>(PhantomData<fn() -> T>);

impl<T> Cursor for RefusingCursor<T> {
    type Item = T;

    fn has_next(&mut self) -> Result<bool> {
        Err(SeqError::invalid("this source does not support iteration"))
    }

    fn next(&mut self) -> Result<T> {
        Err(SeqError::invalid("this source does not support iteration"))
    }
}

impl<T: 'static> Source<T> for SizedOnlySource<T> {
    fn open(&self) -> BoxCursor<T> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        Box::new(RefusingCursor(PhantomData))
    }

    fn exact_len(&self) -> Option<usize> {
        Some(self.len)
    }
}
