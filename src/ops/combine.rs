//! Operators over two sequences: concatenation, zipping, and set algebra.
//!
//! Ordering rules:
//! - `concat`: all of left, then all of right.
//! - `zip`: pairs positions until either side runs out; each side is pulled
//!   exactly `min(len(left), len(right))` times.
//! - `union`: `concat` then `distinct` (left order, then unseen right elements).
//! - `intersect` / `minus`: left order, membership tested against a set built
//!   from the right side on the first pull.

use crate::cursor::{BoxCursor, Cursor};
use crate::error::{Result, SeqError};
use crate::ops::FilterCursor;
use crate::seq::{Seq, SeqBound};
use std::collections::HashSet;
use std::hash::Hash;
use std::marker::PhantomData;
use std::sync::Arc;

struct ConcatCursor<T> {
    first: BoxCursor<T>,
    second: BoxCursor<T>,
    on_second: bool,
}

impl<T> Cursor for ConcatCursor<T> {
    type Item = T;

    fn has_next(&mut self) -> Result<bool> {
        if !self.on_second {
            if self.first.has_next()? {
                return Ok(true);
            }
            self.on_second = true;
        }
        self.second.has_next()
    }

    fn next(&mut self) -> Result<T> {
        if !self.has_next()? {
            return Err(SeqError::ExhaustedSequence);
        }
        if self.on_second {
            self.second.next()
        } else {
            self.first.next()
        }
    }
}

struct InsertCursor<T> {
    up: BoxCursor<T>,
    position: usize,
    emitted: usize,
    elem: Option<T>,
}

impl<T> InsertCursor<T> {
    fn insert_due(&mut self) -> Result<bool> {
        Ok(self.elem.is_some() && (self.emitted == self.position || !self.up.has_next()?))
    }
}

impl<T> Cursor for InsertCursor<T> {
    type Item = T;

    fn has_next(&mut self) -> Result<bool> {
        Ok(self.elem.is_some() || self.up.has_next()?)
    }

    fn next(&mut self) -> Result<T> {
        let v = if self.insert_due()? {
            self.elem.take().ok_or(SeqError::ExhaustedSequence)?
        } else {
            self.up.next()?
        };
        self.emitted += 1;
        Ok(v)
    }
}

struct ZipCursor<A, B, O, F> {
    left: BoxCursor<A>,
    right: BoxCursor<B>,
    joiner: Arc<F>,
    _o: PhantomData<fn() -> O>,
}

impl<A, B, O, F> Cursor for ZipCursor<A, B, O, F>
where
    F: Fn(A, B) -> O,
{
    type Item = O;

    fn has_next(&mut self) -> Result<bool> {
        Ok(self.left.has_next()? && self.right.has_next()?)
    }

    fn next(&mut self) -> Result<O> {
        if !self.has_next()? {
            return Err(SeqError::ExhaustedSequence);
        }
        let a = self.left.next()?;
        let b = self.right.next()?;
        Ok((self.joiner)(a, b))
    }
}

impl<T: SeqBound> Seq<T> {
    /// All of `self`, then all of `other`.
    #[must_use]
    pub fn concat(&self, other: &Seq<T>) -> Seq<T> {
        let first = self.clone();
        let second = other.clone();
        Seq::lazy(move || {
            Box::new(ConcatCursor {
                first: first.cursor(),
                second: second.cursor(),
                on_second: false,
            })
        })
    }

    /// Append one element.
    #[must_use]
    pub fn plus(&self, elem: T) -> Seq<T> {
        self.concat(&Seq::from_vec(vec![elem]))
    }

    /// Insert `elem` before the element currently at `index`. When the
    /// upstream is shorter than `index`, `elem` is appended at the end.
    #[must_use]
    pub fn insert_at(&self, index: usize, elem: T) -> Seq<T> {
        let up = self.clone();
        Seq::lazy(move || {
            Box::new(InsertCursor {
                up: up.cursor(),
                position: index,
                emitted: 0,
                elem: Some(elem.clone()),
            })
        })
    }

    /// Pair elements by position.
    #[must_use]
    pub fn zip<U: SeqBound>(&self, other: &Seq<U>) -> Seq<(T, U)> {
        self.zip_with(other, |a, b| (a, b))
    }

    /// Combine elements by position with `joiner`. Stops as soon as either
    /// side is exhausted without pulling ahead on the other.
    #[must_use]
    pub fn zip_with<U, O, F>(&self, other: &Seq<U>, joiner: F) -> Seq<O>
    where
        U: SeqBound,
        O: SeqBound,
        F: Fn(T, U) -> O + Send + Sync + 'static,
    {
        let left = self.clone();
        let right = other.clone();
        let joiner = Arc::new(joiner);
        Seq::lazy(move || {
            Box::new(ZipCursor {
                left: left.cursor(),
                right: right.cursor(),
                joiner: Arc::clone(&joiner),
                _o: PhantomData,
            })
        })
    }
}

impl<T: SeqBound + Eq + Hash> Seq<T> {
    /// Distinct elements of `self` followed by unseen elements of `other`.
    #[must_use]
    pub fn union(&self, other: &Seq<T>) -> Seq<T> {
        self.concat(other).distinct()
    }

    /// Elements of `self` (in order, duplicates kept) that occur in `other`.
    #[must_use]
    pub fn intersect(&self, other: &Seq<T>) -> Seq<T> {
        self.membership(other, true)
    }

    /// Elements of `self` (in order, duplicates kept) that do not occur in
    /// `other`.
    #[must_use]
    pub fn minus(&self, other: &Seq<T>) -> Seq<T> {
        self.membership(other, false)
    }

    fn membership(&self, other: &Seq<T>, keep_members: bool) -> Seq<T> {
        let left = self.clone();
        let right = other.clone();
        Seq::lazy(move || {
            let right = right.clone();
            let mut set: Option<HashSet<T>> = None;
            Box::new(FilterCursor::new(left.cursor(), move |v: &T| {
                if set.is_none() {
                    set = Some(right.to_set()?);
                }
                let member = set.as_ref().is_some_and(|s| s.contains(v));
                Ok(member == keep_members)
            }))
        })
    }
}
