//! The pull protocol every operator speaks.
//!
//! A [`Cursor`] is a single-use handle with two operations:
//! - [`has_next`](Cursor::has_next): idempotent, callable any number of times
//!   (including before the first `next`). Operators that need look-ahead pull
//!   one element here and hold it until `next` hands it out.
//! - [`next`](Cursor::next): yields the next element, or
//!   [`SeqError::ExhaustedSequence`] when `has_next` would return `false`.
//!
//! Both calls are fallible so that deferred failures (an eager operator's
//! collaborator, a numeric sort meeting a string) reach the terminal caller
//! through `?`.
//!
//! Cursors are not shareable across threads while being pulled; build one per
//! consumer with [`Seq::cursor`](crate::Seq::cursor).

use crate::error::{Result, SeqError};

/// Boxed, type-erased cursor. Every operator stage produces one of these.
pub type BoxCursor<T> = Box<dyn Cursor<Item = T>>;

/// Stateful pull handle over a sequence.
pub trait Cursor {
    type Item;

    /// Whether another element is available. Repeated calls without an
    /// intervening `next` return the same answer and pull nothing further.
    fn has_next(&mut self) -> Result<bool>;

    /// Produce the next element.
    ///
    /// # Errors
    /// [`SeqError::ExhaustedSequence`] when no element remains, or any error
    /// raised by an upstream operator.
    fn next(&mut self) -> Result<Self::Item>;

    /// `has_next` + `next` in one call; `Ok(None)` at the end.
    fn pull(&mut self) -> Result<Option<Self::Item>> {
        if self.has_next()? {
            self.next().map(Some)
        } else {
            Ok(None)
        }
    }
}

impl<C: Cursor + ?Sized> Cursor for Box<C> {
    type Item = C::Item;

    #[inline]
    fn has_next(&mut self) -> Result<bool> {
        (**self).has_next()
    }

    #[inline]
    fn next(&mut self) -> Result<Self::Item> {
        (**self).next()
    }
}

/// Cursor over a standard [`Iterator`].
///
/// `has_next` advances the iterator by one and parks the element, so a plain
/// iterator gains the idempotent look-ahead the protocol requires.
pub struct IterCursor<I: Iterator> {
    iter: I,
    peeked: Option<I::Item>,
}

impl<I: Iterator> IterCursor<I> {
    pub fn new(iter: I) -> Self {
        Self { iter, peeked: None }
    }
}

impl<I: Iterator> Cursor for IterCursor<I> {
    type Item = I::Item;

    fn has_next(&mut self) -> Result<bool> {
        if self.peeked.is_none() {
            self.peeked = self.iter.next();
        }
        Ok(self.peeked.is_some())
    }

    fn next(&mut self) -> Result<I::Item> {
        match self.peeked.take() {
            Some(v) => Ok(v),
            None => self.iter.next().ok_or(SeqError::ExhaustedSequence),
        }
    }
}

/// A cursor that never yields.
pub struct EmptyCursor<T>(std::marker::PhantomData<T>);

impl<T> Default for EmptyCursor<T> {
    fn default() -> Self {
        Self(std::marker::PhantomData)
    }
}

impl<T> Cursor for EmptyCursor<T> {
    type Item = T;

    fn has_next(&mut self) -> Result<bool> {
        Ok(false)
    }

    fn next(&mut self) -> Result<T> {
        Err(SeqError::ExhaustedSequence)
    }
}

/// Adapts a cursor to [`Iterator`], yielding `Result<T>` items.
///
/// Iteration stops after the first error.
pub struct CursorIter<T> {
    cursor: BoxCursor<T>,
    failed: bool,
}

impl<T> CursorIter<T> {
    pub(crate) fn new(cursor: BoxCursor<T>) -> Self {
        Self {
            cursor,
            failed: false,
        }
    }
}

impl<T> Iterator for CursorIter<T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.cursor.pull() {
            Ok(Some(v)) => Some(Ok(v)),
            Ok(None) => None,
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

/// Drain a cursor into a `Vec`.
pub(crate) fn drain<T>(cursor: &mut dyn Cursor<Item = T>) -> Result<Vec<T>> {
    let mut out = Vec::new();
    while cursor.has_next()? {
        out.push(cursor.next()?);
    }
    Ok(out)
}
