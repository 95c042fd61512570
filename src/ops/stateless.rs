//! Element-wise operators: `map`, `filter`, `flat_map`, `peek` and friends.
//!
//! # Overview
//! - [`Seq::map`] / [`Seq::map_indexed`] - one output per input
//! - [`Seq::filter_map`] - map and drop `None`s
//! - [`Seq::filter`] / [`Seq::filter_not`] / [`Seq::filter_indexed`] - keep by predicate
//! - [`Seq::filter_all`] / [`Seq::filter_any`] - AND / OR over a predicate list
//! - [`Seq::flat_map`] - zero or more outputs per input
//! - [`Seq::peek`] - observe elements as they are pulled

use crate::cursor::{BoxCursor, Cursor, IterCursor};
use crate::error::{Result, SeqError};
use crate::ops::FilterCursor;
use crate::seq::{Seq, SeqBound};
use std::marker::PhantomData;
use std::sync::Arc;

/// Boxed predicate used in AND/OR predicate lists.
pub type Predicate<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

struct MapCursor<I, O, F> {
    up: BoxCursor<I>,
    f: Arc<F>,
    _o: PhantomData<fn() -> O>,
}

impl<I, O, F> Cursor for MapCursor<I, O, F>
where
    F: Fn(I) -> O,
{
    type Item = O;

    fn has_next(&mut self) -> Result<bool> {
        self.up.has_next()
    }

    fn next(&mut self) -> Result<O> {
        self.up.next().map(|v| (self.f)(v))
    }
}

struct MapIndexedCursor<I, O, F> {
    up: BoxCursor<I>,
    f: Arc<F>,
    index: usize,
    _o: PhantomData<fn() -> O>,
}

impl<I, O, F> Cursor for MapIndexedCursor<I, O, F>
where
    F: Fn(usize, I) -> O,
{
    type Item = O;

    fn has_next(&mut self) -> Result<bool> {
        self.up.has_next()
    }

    fn next(&mut self) -> Result<O> {
        let v = self.up.next()?;
        let i = self.index;
        self.index += 1;
        Ok((self.f)(i, v))
    }
}

struct FlatMapCursor<I, II: IntoIterator, F> {
    up: BoxCursor<I>,
    f: Arc<F>,
    current: Option<IterCursor<II::IntoIter>>,
}

impl<I, II, F> Cursor for FlatMapCursor<I, II, F>
where
    II: IntoIterator,
    F: Fn(I) -> II,
{
    type Item = II::Item;

    fn has_next(&mut self) -> Result<bool> {
        loop {
            if let Some(sub) = self.current.as_mut()
                && sub.has_next()?
            {
                return Ok(true);
            }
            if !self.up.has_next()? {
                self.current = None;
                return Ok(false);
            }
            let outer = self.up.next()?;
            self.current = Some(IterCursor::new((self.f)(outer).into_iter()));
        }
    }

    fn next(&mut self) -> Result<II::Item> {
        if !self.has_next()? {
            return Err(SeqError::ExhaustedSequence);
        }
        match self.current.as_mut() {
            Some(sub) => sub.next(),
            None => Err(SeqError::ExhaustedSequence),
        }
    }
}

struct PeekCursor<T, F> {
    up: BoxCursor<T>,
    f: Arc<F>,
}

impl<T, F> Cursor for PeekCursor<T, F>
where
    F: Fn(&T),
{
    type Item = T;

    fn has_next(&mut self) -> Result<bool> {
        self.up.has_next()
    }

    fn next(&mut self) -> Result<T> {
        let v = self.up.next()?;
        (self.f)(&v);
        Ok(v)
    }
}

impl<T: SeqBound> Seq<T> {
    /// Transform each element.
    ///
    /// # Example
    /// ```
    /// use ironseq::Seq;
    /// let v = Seq::from_vec(vec![1, 2, 3]).map(|x| x * 10).to_vec().unwrap();
    /// assert_eq!(v, vec![10, 20, 30]);
    /// ```
    #[must_use]
    pub fn map<O, F>(&self, f: F) -> Seq<O>
    where
        O: SeqBound,
        F: Fn(T) -> O + Send + Sync + 'static,
    {
        let up = self.clone();
        let f = Arc::new(f);
        Seq::lazy(move || {
            Box::new(MapCursor {
                up: up.cursor(),
                f: Arc::clone(&f),
                _o: PhantomData,
            })
        })
    }

    /// Transform each element together with its 0-based position.
    #[must_use]
    pub fn map_indexed<O, F>(&self, f: F) -> Seq<O>
    where
        O: SeqBound,
        F: Fn(usize, T) -> O + Send + Sync + 'static,
    {
        let up = self.clone();
        let f = Arc::new(f);
        Seq::lazy(move || {
            Box::new(MapIndexedCursor {
                up: up.cursor(),
                f: Arc::clone(&f),
                index: 0,
                _o: PhantomData,
            })
        })
    }

    /// Map and keep only the `Some` results.
    #[must_use]
    pub fn filter_map<O, F>(&self, f: F) -> Seq<O>
    where
        O: SeqBound,
        F: Fn(T) -> Option<O> + Send + Sync + 'static,
    {
        self.map(f).flat_map(|o| o)
    }

    /// Keep elements matching `pred`.
    #[must_use]
    pub fn filter<P>(&self, pred: P) -> Seq<T>
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let up = self.clone();
        let pred = Arc::new(pred);
        Seq::lazy(move || {
            let pred = Arc::clone(&pred);
            Box::new(FilterCursor::new(up.cursor(), move |v: &T| Ok(pred(v))))
        })
    }

    /// Drop elements matching `pred`.
    #[must_use]
    pub fn filter_not<P>(&self, pred: P) -> Seq<T>
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.filter(move |v| !pred(v))
    }

    /// Keep elements whose `(index, element)` matches `pred`. The index is the
    /// upstream position, counted before filtering.
    #[must_use]
    pub fn filter_indexed<P>(&self, pred: P) -> Seq<T>
    where
        P: Fn(usize, &T) -> bool + Send + Sync + 'static,
    {
        let up = self.clone();
        let pred = Arc::new(pred);
        Seq::lazy(move || {
            let pred = Arc::clone(&pred);
            let mut index = 0usize;
            Box::new(FilterCursor::new(up.cursor(), move |v: &T| {
                let i = index;
                index += 1;
                Ok(pred(i, v))
            }))
        })
    }

    /// Keep elements matching **every** predicate (stops at the first `false`).
    /// An empty list keeps everything.
    #[must_use]
    pub fn filter_all(&self, preds: Vec<Predicate<T>>) -> Seq<T> {
        self.filter(move |v| preds.iter().all(|p| p(v)))
    }

    /// Keep elements matching **any** predicate (stops at the first `true`).
    /// An empty list keeps nothing.
    #[must_use]
    pub fn filter_any(&self, preds: Vec<Predicate<T>>) -> Seq<T> {
        self.filter(move |v| preds.iter().any(|p| p(v)))
    }

    /// Expand each element into zero or more elements. Empty expansions are
    /// skipped without emitting; the outer cursor advances only once the
    /// current expansion is used up.
    #[must_use]
    pub fn flat_map<O, I, F>(&self, f: F) -> Seq<O>
    where
        O: SeqBound,
        I: IntoIterator<Item = O> + 'static,
        I::IntoIter: 'static,
        F: Fn(T) -> I + Send + Sync + 'static,
    {
        let up = self.clone();
        let f = Arc::new(f);
        Seq::lazy(move || {
            Box::new(FlatMapCursor::<T, I, F> {
                up: up.cursor(),
                f: Arc::clone(&f),
                current: None,
            })
        })
    }

    /// Call `f` on each element as it is pulled through.
    #[must_use]
    pub fn peek<F>(&self, f: F) -> Seq<T>
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let up = self.clone();
        let f = Arc::new(f);
        Seq::lazy(move || {
            Box::new(PeekCursor {
                up: up.cursor(),
                f: Arc::clone(&f),
            })
        })
    }
}
