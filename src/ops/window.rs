//! Sliding windows and fixed-size chunks.
//!
//! A window cursor keeps a bounded [`VecDeque`] of at most `size` elements.
//! After yielding a window it evicts `step` elements from the front. A `step`
//! larger than `size` is accepted: the elements between two windows are
//! pulled and discarded.
//!
//! With `partial` set, the elements left over once the upstream runs dry are
//! flushed as one shorter final window instead of dropped (`[1,2,3,4,5]` with
//! size 3, step 1 gives `[1,2,3] [2,3,4] [3,4,5] [4,5]`).

use crate::cursor::{BoxCursor, Cursor};
use crate::error::{Result, SeqError};
use crate::seq::{Seq, SeqBound};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Window configuration.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindowSpec {
    /// Elements per window, must be > 0.
    pub size: usize,
    /// Elements evicted after each window, must be > 0.
    pub step: usize,
    /// Flush one shorter final window.
    #[serde(default)]
    pub partial: bool,
}

impl WindowSpec {
    /// Sliding window, step 1, full windows only.
    #[must_use]
    pub const fn sliding(size: usize) -> Self {
        Self {
            size,
            step: 1,
            partial: false,
        }
    }

    /// Non-overlapping chunks, keeping a short last chunk.
    #[must_use]
    pub const fn chunks(size: usize) -> Self {
        Self {
            size,
            step: size,
            partial: true,
        }
    }

    /// # Errors
    /// [`SeqError::InvalidArgument`] when `size` or `step` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.size == 0 {
            return Err(SeqError::invalid("window size must be greater than zero"));
        }
        if self.step == 0 {
            return Err(SeqError::invalid("window step must be greater than zero"));
        }
        Ok(())
    }
}

struct WindowCursor<T> {
    up: BoxCursor<T>,
    spec: WindowSpec,
    buf: VecDeque<T>,
    skip: usize,
    exhausted: bool,
    ready: Option<Vec<T>>,
}

impl<T: Clone> Cursor for WindowCursor<T> {
    type Item = Vec<T>;

    fn has_next(&mut self) -> Result<bool> {
        if self.ready.is_some() {
            return Ok(true);
        }
        while self.skip > 0 && !self.exhausted {
            if self.up.has_next()? {
                self.up.next()?;
                self.skip -= 1;
            } else {
                self.exhausted = true;
            }
        }
        while self.buf.len() < self.spec.size && !self.exhausted {
            if self.up.has_next()? {
                self.buf.push_back(self.up.next()?);
            } else {
                self.exhausted = true;
            }
        }
        let full = self.buf.len() == self.spec.size;
        let trailing = self.spec.partial && self.exhausted && !self.buf.is_empty();
        if !(full || trailing) {
            return Ok(false);
        }
        if !full {
            self.ready = Some(self.buf.drain(..).collect());
            return Ok(true);
        }
        self.ready = Some(self.buf.iter().cloned().collect());
        let evict = self.spec.step.min(self.buf.len());
        self.buf.drain(..evict);
        self.skip = self.spec.step - evict;
        Ok(true)
    }

    fn next(&mut self) -> Result<Vec<T>> {
        if !self.has_next()? {
            return Err(SeqError::ExhaustedSequence);
        }
        self.ready.take().ok_or(SeqError::ExhaustedSequence)
    }
}

impl<T: SeqBound> Seq<T> {
    /// Windows of `size` elements advancing by `step`.
    ///
    /// # Errors
    /// [`SeqError::InvalidArgument`] when `size` or `step` is zero.
    pub fn windowed(&self, size: usize, step: usize, partial: bool) -> Result<Seq<Vec<T>>> {
        self.windowed_with(WindowSpec {
            size,
            step,
            partial,
        })
    }

    /// Windows described by a [`WindowSpec`].
    ///
    /// # Errors
    /// [`SeqError::InvalidArgument`] when the spec fails validation.
    pub fn windowed_with(&self, spec: WindowSpec) -> Result<Seq<Vec<T>>> {
        spec.validate()?;
        let up = self.clone();
        Ok(Seq::lazy(move || {
            Box::new(WindowCursor {
                up: up.cursor(),
                spec,
                buf: VecDeque::with_capacity(spec.size),
                skip: 0,
                exhausted: false,
                ready: None,
            })
        }))
    }

    /// Consecutive chunks of `size`; the last chunk may be shorter.
    ///
    /// # Errors
    /// [`SeqError::InvalidArgument`] when `size` is zero.
    pub fn chunked(&self, size: usize) -> Result<Seq<Vec<T>>> {
        if size == 0 {
            return Err(SeqError::invalid("chunk size must be greater than zero"));
        }
        self.windowed_with(WindowSpec::chunks(size))
    }
}
