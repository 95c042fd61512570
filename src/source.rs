//! Sequence sources: the head of every chain.
//!
//! A [`Source`] knows how to open a fresh [`Cursor`] and, optionally, how to
//! report its exact size or fetch an element by index without iterating. The
//! terminal operations use those two capabilities as fast paths
//! (`count`, `element_at`, `element_at_from_end`) when a `Seq` is a bare source.
//!
//! Operator stages implement the same trait, so a `Seq` is always "a shared
//! `Source`"; only the built-in sources below report size or indexing.

use crate::cursor::{BoxCursor, Cursor, IterCursor};
use crate::error::{Result, SeqError};
use std::marker::PhantomData;
use std::sync::Arc;

/// Producer of cursors.
///
/// Implementations must be cheap to call repeatedly: every terminal operation
/// opens its own cursor.
pub trait Source<T>: Send + Sync {
    /// Open an independent cursor. Must not touch any element.
    fn open(&self) -> BoxCursor<T>;

    /// Exact number of elements, if known without iterating.
    fn exact_len(&self) -> Option<usize> {
        None
    }

    /// Whether [`get`](Source::get) is supported.
    fn indexed(&self) -> bool {
        false
    }

    /// Element at `index` by direct access; `None` when out of range or
    /// unsupported.
    fn get(&self, _index: usize) -> Option<T> {
        None
    }
}

/* ===================== VecSource ===================== */

/// Shared, immutable vector. Reports size and supports indexing.
pub struct VecSource<T> {
    data: Arc<Vec<T>>,
}

impl<T> VecSource<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            data: Arc::new(data),
        }
    }
}

struct SliceCursor<T> {
    data: Arc<Vec<T>>,
    pos: usize,
}

impl<T: Clone> Cursor for SliceCursor<T> {
    type Item = T;

    fn has_next(&mut self) -> Result<bool> {
        Ok(self.pos < self.data.len())
    }

    fn next(&mut self) -> Result<T> {
        let v = self
            .data
            .get(self.pos)
            .cloned()
            .ok_or(SeqError::ExhaustedSequence)?;
        self.pos += 1;
        Ok(v)
    }
}

impl<T: Clone + Send + Sync + 'static> Source<T> for VecSource<T> {
    fn open(&self) -> BoxCursor<T> {
        Box::new(SliceCursor {
            data: Arc::clone(&self.data),
            pos: 0,
        })
    }

    fn exact_len(&self) -> Option<usize> {
        Some(self.data.len())
    }

    fn indexed(&self) -> bool {
        true
    }

    fn get(&self, index: usize) -> Option<T> {
        self.data.get(index).cloned()
    }
}

/* ===================== RangeSource ===================== */

/// Half-open integer range `[start, end)`.
#[derive(Clone, Copy, Debug)]
pub struct RangeSource {
    start: i64,
    end: i64,
}

impl RangeSource {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }
}

struct RangeCursor {
    current: i64,
    end: i64,
}

impl Cursor for RangeCursor {
    type Item = i64;

    fn has_next(&mut self) -> Result<bool> {
        Ok(self.current < self.end)
    }

    fn next(&mut self) -> Result<i64> {
        if self.current >= self.end {
            return Err(SeqError::ExhaustedSequence);
        }
        let v = self.current;
        self.current += 1;
        Ok(v)
    }
}

impl Source<i64> for RangeSource {
    fn open(&self) -> BoxCursor<i64> {
        Box::new(RangeCursor {
            current: self.start,
            end: self.end,
        })
    }

    fn exact_len(&self) -> Option<usize> {
        usize::try_from(self.end.saturating_sub(self.start)).ok().or(Some(0))
    }

    fn indexed(&self) -> bool {
        true
    }

    fn get(&self, index: usize) -> Option<i64> {
        let offset = i64::try_from(index).ok()?;
        let v = self.start.checked_add(offset)?;
        (v < self.end).then_some(v)
    }
}

/* ===================== RepeatSource ===================== */

/// `count` copies of one element.
pub struct RepeatSource<T> {
    elem: T,
    count: usize,
}

impl<T> RepeatSource<T> {
    pub fn new(elem: T, count: usize) -> Self {
        Self { elem, count }
    }
}

struct RepeatCursor<T> {
    elem: T,
    remaining: usize,
}

impl<T: Clone> Cursor for RepeatCursor<T> {
    type Item = T;

    fn has_next(&mut self) -> Result<bool> {
        Ok(self.remaining > 0)
    }

    fn next(&mut self) -> Result<T> {
        if self.remaining == 0 {
            return Err(SeqError::ExhaustedSequence);
        }
        self.remaining -= 1;
        Ok(self.elem.clone())
    }
}

impl<T: Clone + Send + Sync + 'static> Source<T> for RepeatSource<T> {
    fn open(&self) -> BoxCursor<T> {
        Box::new(RepeatCursor {
            elem: self.elem.clone(),
            remaining: self.count,
        })
    }

    fn exact_len(&self) -> Option<usize> {
        Some(self.count)
    }

    fn indexed(&self) -> bool {
        true
    }

    fn get(&self, index: usize) -> Option<T> {
        (index < self.count).then(|| self.elem.clone())
    }
}

/* ===================== IterateSource ===================== */

/// Infinite `seed, f(seed), f(f(seed)), ...`. Bound it with `limit` or
/// `take_while` before any draining terminal.
pub struct IterateSource<T, F> {
    seed: T,
    f: Arc<F>,
}

impl<T, F> IterateSource<T, F> {
    pub fn new(seed: T, f: F) -> Self {
        Self {
            seed,
            f: Arc::new(f),
        }
    }
}

struct IterateCursor<T, F> {
    next_value: Option<T>,
    last: Option<T>,
    f: Arc<F>,
}

impl<T: Clone, F: Fn(&T) -> T> Cursor for IterateCursor<T, F> {
    type Item = T;

    fn has_next(&mut self) -> Result<bool> {
        Ok(true)
    }

    fn next(&mut self) -> Result<T> {
        // The successor is derived lazily so a bounded consumer never calls
        // `f` past the last element it takes.
        let v = match self.next_value.take() {
            Some(seed) => seed,
            None => match &self.last {
                Some(prev) => (self.f)(prev),
                None => return Err(SeqError::ExhaustedSequence),
            },
        };
        self.last = Some(v.clone());
        Ok(v)
    }
}

impl<T, F> Source<T> for IterateSource<T, F>
where
    T: Clone + Send + Sync + 'static,
    F: Fn(&T) -> T + Send + Sync + 'static,
{
    fn open(&self) -> BoxCursor<T> {
        Box::new(IterateCursor {
            next_value: Some(self.seed.clone()),
            last: None,
            f: Arc::clone(&self.f),
        })
    }
}

/* ===================== FnSource ===================== */

/// Re-invokable iterator factory; the factory runs once per opened cursor and
/// only on the first pull.
pub struct FnSource<T, F> {
    factory: Arc<F>,
    _t: PhantomData<fn() -> T>,
}

impl<T, F> FnSource<T, F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory: Arc::new(factory),
            _t: PhantomData,
        }
    }
}

struct DeferredIter<F, II: IntoIterator> {
    factory: Arc<F>,
    inner: Option<IterCursor<II::IntoIter>>,
}

impl<F, II> DeferredIter<F, II>
where
    F: Fn() -> II,
    II: IntoIterator,
{
    fn inner(&mut self) -> &mut IterCursor<II::IntoIter> {
        let factory = &self.factory;
        self.inner
            .get_or_insert_with(|| IterCursor::new(factory().into_iter()))
    }
}

impl<F, II> Cursor for DeferredIter<F, II>
where
    F: Fn() -> II,
    II: IntoIterator,
{
    type Item = II::Item;

    fn has_next(&mut self) -> Result<bool> {
        self.inner().has_next()
    }

    fn next(&mut self) -> Result<II::Item> {
        self.inner().next()
    }
}

impl<T, F, II> Source<T> for FnSource<T, F>
where
    T: 'static,
    F: Fn() -> II + Send + Sync + 'static,
    II: IntoIterator<Item = T> + 'static,
    II::IntoIter: 'static,
{
    fn open(&self) -> BoxCursor<T> {
        Box::new(DeferredIter::<F, II> {
            factory: Arc::clone(&self.factory),
            inner: None,
        })
    }
}

/* ===================== LazySource ===================== */

/// Stage built from a cursor-making closure. Every operator in this crate is
/// one of these: the closure captures the upstream `Seq` and runs only when a
/// cursor is requested.
pub(crate) struct LazySource<T> {
    make: Box<dyn Fn() -> BoxCursor<T> + Send + Sync>,
}

impl<T> LazySource<T> {
    pub(crate) fn new<F>(make: F) -> Self
    where
        F: Fn() -> BoxCursor<T> + Send + Sync + 'static,
    {
        Self {
            make: Box::new(make),
        }
    }
}

impl<T> Source<T> for LazySource<T> {
    fn open(&self) -> BoxCursor<T> {
        (self.make)()
    }
}
