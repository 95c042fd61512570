//! Intermediate operators, grouped by the kind of state their cursors keep.
//!
//! Every operator returns a new [`Seq`](crate::Seq) whose stage captures the
//! upstream `Seq` and opens the upstream cursor only when its own cursor is
//! opened. Nothing in this module pulls an element at construction time.

pub(crate) mod combine;
pub(crate) mod distinct;
pub(crate) mod eager;
pub(crate) mod slicing;
pub(crate) mod stateless;
pub(crate) mod window;

pub use window::WindowSpec;

use crate::cursor::{BoxCursor, Cursor};
use crate::error::{Result, SeqError};

/// Look-ahead filter shared by `filter`, `distinct`, `intersect`, `minus`, ...
///
/// `pred` is created per cursor, so it may own scratch state (a seen-set, an
/// index counter, a lazily built right-hand set).
pub(crate) struct FilterCursor<T, P> {
    up: BoxCursor<T>,
    pred: P,
    held: Option<T>,
}

impl<T, P> FilterCursor<T, P>
where
    P: FnMut(&T) -> Result<bool>,
{
    pub(crate) fn new(up: BoxCursor<T>, pred: P) -> Self {
        Self {
            up,
            pred,
            held: None,
        }
    }
}

impl<T, P> Cursor for FilterCursor<T, P>
where
    P: FnMut(&T) -> Result<bool>,
{
    type Item = T;

    fn has_next(&mut self) -> Result<bool> {
        while self.held.is_none() {
            if !self.up.has_next()? {
                return Ok(false);
            }
            let v = self.up.next()?;
            if (self.pred)(&v)? {
                self.held = Some(v);
            }
        }
        Ok(true)
    }

    fn next(&mut self) -> Result<T> {
        if !self.has_next()? {
            return Err(SeqError::ExhaustedSequence);
        }
        self.held.take().ok_or(SeqError::ExhaustedSequence)
    }
}
