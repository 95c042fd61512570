use crate::cursor::{BoxCursor, CursorIter, EmptyCursor};
use crate::source::{FnSource, IterateSource, LazySource, RangeSource, RepeatSource, Source, VecSource};
use std::fmt;
use std::sync::Arc;

/// Bound shared by every element type flowing through a [`Seq`].
///
/// Sequences are shareable descriptions (`Send + Sync`) that hand out clones
/// of their elements to each cursor, hence `Clone`.
pub trait SeqBound: 'static + Send + Sync + Clone {}
impl<T> SeqBound for T where T: 'static + Send + Sync + Clone {}

/// A lazy sequence: a recipe for opening cursors.
///
/// Building a `Seq` (from a source or by chaining operators) never touches an
/// element. Each terminal call opens a fresh cursor and drives it; cloning a
/// `Seq` only clones a reference to the shared stage.
pub struct Seq<T> {
    pub(crate) stage: Arc<dyn Source<T>>,
}

impl<T> Clone for Seq<T> {
    fn clone(&self) -> Self {
        Self {
            stage: Arc::clone(&self.stage),
        }
    }
}

impl<T> fmt::Debug for Seq<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Seq")
            .field("exact_len", &self.stage.exact_len())
            .field("indexed", &self.stage.indexed())
            .finish_non_exhaustive()
    }
}

impl<T: SeqBound> Seq<T> {
    /// Wrap any [`Source`].
    pub fn from_source<S>(source: S) -> Self
    where
        S: Source<T> + 'static,
    {
        Self {
            stage: Arc::new(source),
        }
    }

    /// Sequence over an owned vector (exact size, indexed).
    pub fn from_vec(data: Vec<T>) -> Self {
        Self::from_source(VecSource::new(data))
    }

    /// Sequence over any collection. The items are moved into a shared
    /// vector, so the result reports its size and supports indexing.
    ///
    /// `items` is drained **here**, when the sequence is built, not on the
    /// first pull: passing a lazy or infinite iterator consumes it up front
    /// (or never returns). Use [`from_fn`](Seq::from_fn) for input that must
    /// be produced lazily on each pass.
    pub fn of<I>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        Self::from_vec(items.into_iter().collect())
    }

    /// Sequence whose cursors each call `factory` (on first pull) for a fresh
    /// iterator. No size or indexing is reported.
    pub fn from_fn<F, I>(factory: F) -> Self
    where
        F: Fn() -> I + Send + Sync + 'static,
        I: IntoIterator<Item = T> + 'static,
        I::IntoIter: 'static,
    {
        Self::from_source(FnSource::new(factory))
    }

    /// The empty sequence.
    pub fn empty() -> Self {
        Self::lazy(|| Box::new(EmptyCursor::default()))
    }

    /// `count` copies of `elem`.
    pub fn repeat(elem: T, count: usize) -> Self {
        Self::from_source(RepeatSource::new(elem, count))
    }

    /// Infinite sequence `seed, f(seed), f(f(seed)), ...`.
    pub fn iterate<F>(seed: T, f: F) -> Self
    where
        F: Fn(&T) -> T + Send + Sync + 'static,
    {
        Self::from_source(IterateSource::new(seed, f))
    }

    /// Build a stage from a cursor-making closure. The closure runs once per
    /// `cursor()` call and nowhere else.
    pub(crate) fn lazy<F>(make: F) -> Self
    where
        F: Fn() -> BoxCursor<T> + Send + Sync + 'static,
    {
        Self::from_source(LazySource::new(make))
    }

    /// Open a fresh cursor. Opening pulls nothing.
    pub fn cursor(&self) -> BoxCursor<T> {
        self.stage.open()
    }

    /// Iterator view yielding `Result<T>`; stops after the first error.
    pub fn iter(&self) -> CursorIter<T> {
        CursorIter::new(self.cursor())
    }
}

impl Seq<i64> {
    /// Half-open range `[start, end)` (empty when `end <= start`).
    pub fn range(start: i64, end: i64) -> Self {
        Self::from_source(RangeSource::new(start, end))
    }
}

impl<T: SeqBound> IntoIterator for &Seq<T> {
    type Item = crate::Result<T>;
    type IntoIter = CursorIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: SeqBound> IntoIterator for Seq<T> {
    type Item = crate::Result<T>;
    type IntoIter = CursorIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: SeqBound> From<Vec<T>> for Seq<T> {
    fn from(data: Vec<T>) -> Self {
        Self::from_vec(data)
    }
}
