//! Positional operators: `skip`, `limit`, `take_while`, `drop_while`, `slice`.
//!
//! All of these keep O(1) extra state. `slice(start, end)` is `skip` followed
//! by `limit`; nothing is collected.

use crate::cursor::{BoxCursor, Cursor};
use crate::error::{Result, SeqError};
use crate::seq::{Seq, SeqBound};
use std::collections::HashSet;
use std::sync::Arc;

struct SkipCursor<T> {
    up: BoxCursor<T>,
    pending: usize,
}

impl<T> SkipCursor<T> {
    fn skip_pending(&mut self) -> Result<()> {
        while self.pending > 0 && self.up.has_next()? {
            self.up.next()?;
            self.pending -= 1;
        }
        self.pending = 0;
        Ok(())
    }
}

impl<T> Cursor for SkipCursor<T> {
    type Item = T;

    fn has_next(&mut self) -> Result<bool> {
        self.skip_pending()?;
        self.up.has_next()
    }

    fn next(&mut self) -> Result<T> {
        self.skip_pending()?;
        self.up.next()
    }
}

struct LimitCursor<T> {
    up: BoxCursor<T>,
    remaining: usize,
}

impl<T> Cursor for LimitCursor<T> {
    type Item = T;

    fn has_next(&mut self) -> Result<bool> {
        // Never consult upstream once the budget is spent.
        Ok(self.remaining > 0 && self.up.has_next()?)
    }

    fn next(&mut self) -> Result<T> {
        if self.remaining == 0 {
            return Err(SeqError::ExhaustedSequence);
        }
        let v = self.up.next()?;
        self.remaining -= 1;
        Ok(v)
    }
}

struct TakeWhileCursor<T, P> {
    up: BoxCursor<T>,
    pred: Arc<P>,
    held: Option<T>,
    finished: bool,
}

impl<T, P> Cursor for TakeWhileCursor<T, P>
where
    P: Fn(&T) -> bool,
{
    type Item = T;

    fn has_next(&mut self) -> Result<bool> {
        if self.finished {
            return Ok(false);
        }
        if self.held.is_some() {
            return Ok(true);
        }
        if self.up.has_next()? {
            let v = self.up.next()?;
            if (self.pred)(&v) {
                self.held = Some(v);
                return Ok(true);
            }
        }
        self.finished = true;
        Ok(false)
    }

    fn next(&mut self) -> Result<T> {
        if !self.has_next()? {
            return Err(SeqError::ExhaustedSequence);
        }
        self.held.take().ok_or(SeqError::ExhaustedSequence)
    }
}

struct DropWhileCursor<T, P> {
    up: BoxCursor<T>,
    pred: Arc<P>,
    held: Option<T>,
    dropped: bool,
}

impl<T, P> Cursor for DropWhileCursor<T, P>
where
    P: Fn(&T) -> bool,
{
    type Item = T;

    fn has_next(&mut self) -> Result<bool> {
        if self.held.is_some() {
            return Ok(true);
        }
        if !self.dropped {
            self.dropped = true;
            while self.up.has_next()? {
                let v = self.up.next()?;
                if !(self.pred)(&v) {
                    self.held = Some(v);
                    return Ok(true);
                }
            }
            return Ok(false);
        }
        self.up.has_next()
    }

    fn next(&mut self) -> Result<T> {
        if !self.has_next()? {
            return Err(SeqError::ExhaustedSequence);
        }
        match self.held.take() {
            Some(v) => Ok(v),
            None => self.up.next(),
        }
    }
}

impl<T: SeqBound> Seq<T> {
    /// Skip the first `n` elements. The skipping happens on the first pull.
    #[must_use]
    pub fn skip(&self, n: usize) -> Seq<T> {
        let up = self.clone();
        Seq::lazy(move || {
            Box::new(SkipCursor {
                up: up.cursor(),
                pending: n,
            })
        })
    }

    /// Yield at most `n` elements. Once `n` have been yielded upstream is not
    /// consulted again, which makes this safe on infinite sequences.
    #[must_use]
    pub fn limit(&self, n: usize) -> Seq<T> {
        let up = self.clone();
        Seq::lazy(move || {
            Box::new(LimitCursor {
                up: up.cursor(),
                remaining: n,
            })
        })
    }

    /// Yield elements while `pred` holds. Exactly one failing element is
    /// pulled (and discarded) to detect the end.
    #[must_use]
    pub fn take_while<P>(&self, pred: P) -> Seq<T>
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let up = self.clone();
        let pred = Arc::new(pred);
        Seq::lazy(move || {
            Box::new(TakeWhileCursor {
                up: up.cursor(),
                pred: Arc::clone(&pred),
                held: None,
                finished: false,
            })
        })
    }

    /// Skip elements while `pred` holds, then yield everything after.
    #[must_use]
    pub fn drop_while<P>(&self, pred: P) -> Seq<T>
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let up = self.clone();
        let pred = Arc::new(pred);
        Seq::lazy(move || {
            Box::new(DropWhileCursor {
                up: up.cursor(),
                pred: Arc::clone(&pred),
                held: None,
                dropped: false,
            })
        })
    }

    /// Elements with index in `[start, end)`, implemented as
    /// `skip(start).limit(end - start)`.
    ///
    /// # Errors
    /// [`SeqError::InvalidArgument`] when `start > end`.
    pub fn slice(&self, start: usize, end: usize) -> Result<Seq<T>> {
        if start > end {
            return Err(SeqError::invalid(format!(
                "slice start {start} is greater than end {end}"
            )));
        }
        Ok(self.skip(start).limit(end - start))
    }

    /// Alias of [`slice`](Seq::slice).
    ///
    /// # Errors
    /// [`SeqError::InvalidArgument`] when `start > end`.
    pub fn sub(&self, start: usize, end: usize) -> Result<Seq<T>> {
        self.slice(start, end)
    }

    /// Elements whose index is in `indices`, in upstream order. Pulling stops
    /// after the largest requested index.
    #[must_use]
    pub fn slice_indices<I>(&self, indices: I) -> Seq<T>
    where
        I: IntoIterator<Item = usize>,
    {
        let wanted: HashSet<usize> = indices.into_iter().collect();
        let Some(&max) = wanted.iter().max() else {
            return Seq::empty();
        };
        self.limit(max.saturating_add(1))
            .filter_indexed(move |i, _| wanted.contains(&i))
    }
}
