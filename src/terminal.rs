//! Terminal operations: each one opens a cursor, drives it, and returns a value.
//!
//! Every call makes (at most) one pass over the chain. Two fast paths skip the
//! pass when the head stage allows it:
//! - [`Seq::count`] returns the reported size of a sized source without
//!   pulling anything;
//! - [`Seq::element_at`] / [`Seq::element_at_from_end`] use direct indexed
//!   access when the source supports it.

use crate::cursor::{drain, Cursor};
use crate::error::{Result, SeqError};
use crate::group::GroupTable;
use crate::seq::{Seq, SeqBound};
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt::{Display, Write};
use std::hash::Hash;
use tracing::trace;

impl<T: SeqBound> Seq<T> {
    /* ---------- counting and matching ---------- */

    /// Number of elements. O(1) without pulling when the source reports its
    /// size.
    ///
    /// # Errors
    /// Any upstream error.
    pub fn count(&self) -> Result<usize> {
        if let Some(n) = self.stage.exact_len() {
            trace!(len = n, "count fast path");
            return Ok(n);
        }
        let mut cur = self.cursor();
        let mut n = 0usize;
        while cur.has_next()? {
            cur.next()?;
            n += 1;
        }
        Ok(n)
    }

    /// Number of elements matching `pred`.
    ///
    /// # Errors
    /// Any upstream error.
    pub fn count_where<F>(&self, pred: F) -> Result<usize>
    where
        F: Fn(&T) -> bool,
    {
        let mut cur = self.cursor();
        let mut n = 0usize;
        while let Some(e) = cur.pull()? {
            if pred(&e) {
                n += 1;
            }
        }
        Ok(n)
    }

    /// Whether the sequence has no elements (pulls at most one).
    ///
    /// # Errors
    /// Any upstream error.
    pub fn is_empty(&self) -> Result<bool> {
        if let Some(n) = self.stage.exact_len() {
            return Ok(n == 0);
        }
        Ok(!self.cursor().has_next()?)
    }

    /// Whether any element matches; stops at the first match.
    ///
    /// # Errors
    /// Any upstream error.
    pub fn any<F>(&self, pred: F) -> Result<bool>
    where
        F: Fn(&T) -> bool,
    {
        Ok(self.position(|e| pred(e))?.is_some())
    }

    /// Whether every element matches (true for an empty sequence); stops at
    /// the first mismatch.
    ///
    /// # Errors
    /// Any upstream error.
    pub fn all<F>(&self, pred: F) -> Result<bool>
    where
        F: Fn(&T) -> bool,
    {
        Ok(self.position(|e| !pred(e))?.is_none())
    }

    /// Whether no element matches.
    ///
    /// # Errors
    /// Any upstream error.
    pub fn none<F>(&self, pred: F) -> Result<bool>
    where
        F: Fn(&T) -> bool,
    {
        Ok(!self.any(pred)?)
    }

    /// Index and value of the first element matching `pred`.
    fn position<F>(&self, pred: F) -> Result<Option<(usize, T)>>
    where
        F: Fn(&T) -> bool,
    {
        let mut cur = self.cursor();
        let mut i = 0usize;
        while let Some(e) = cur.pull()? {
            if pred(&e) {
                return Ok(Some((i, e)));
            }
            i += 1;
        }
        Ok(None)
    }

    /* ---------- positional access ---------- */

    /// First element, if any.
    ///
    /// # Errors
    /// Any upstream error.
    pub fn first(&self) -> Result<Option<T>> {
        self.cursor().pull()
    }

    /// First element, or `default` for an empty sequence.
    ///
    /// # Errors
    /// Any upstream error.
    pub fn first_or(&self, default: T) -> Result<T> {
        Ok(self.first()?.unwrap_or(default))
    }

    /// First element matching `pred`.
    ///
    /// # Errors
    /// Any upstream error.
    pub fn first_where<F>(&self, pred: F) -> Result<Option<T>>
    where
        F: Fn(&T) -> bool,
    {
        Ok(self.position(pred)?.map(|(_, e)| e))
    }

    /// Last element, if any.
    ///
    /// # Errors
    /// Any upstream error.
    pub fn last(&self) -> Result<Option<T>> {
        if let (true, Some(n)) = (self.stage.indexed(), self.stage.exact_len()) {
            return Ok(n.checked_sub(1).and_then(|i| self.stage.get(i)));
        }
        self.last_where(|_| true)
    }

    /// Last element, or `default` for an empty sequence.
    ///
    /// # Errors
    /// Any upstream error.
    pub fn last_or(&self, default: T) -> Result<T> {
        Ok(self.last()?.unwrap_or(default))
    }

    /// Last element matching `pred`.
    ///
    /// # Errors
    /// Any upstream error.
    pub fn last_where<F>(&self, pred: F) -> Result<Option<T>>
    where
        F: Fn(&T) -> bool,
    {
        let mut cur = self.cursor();
        let mut last = None;
        while let Some(e) = cur.pull()? {
            if pred(&e) {
                last = Some(e);
            }
        }
        Ok(last)
    }

    /// The only element.
    ///
    /// # Errors
    /// [`SeqError::NotExactlyOne`] when the sequence is empty or has more than
    /// one element (pulls at most two).
    pub fn single(&self) -> Result<T> {
        let mut cur = self.cursor();
        let Some(only) = cur.pull()? else {
            return Err(SeqError::NotExactlyOne { found: "none" });
        };
        if cur.has_next()? {
            return Err(SeqError::NotExactlyOne {
                found: "more than one",
            });
        }
        Ok(only)
    }

    /// The only element, or `None` when there are zero or several.
    ///
    /// # Errors
    /// Any upstream error.
    pub fn single_or_none(&self) -> Result<Option<T>> {
        match self.single() {
            Ok(e) => Ok(Some(e)),
            Err(SeqError::NotExactlyOne { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Element at 0-based `index`. Uses direct access on indexed sources.
    ///
    /// # Errors
    /// Any upstream error.
    pub fn element_at(&self, index: usize) -> Result<Option<T>> {
        if self.stage.indexed() {
            trace!(index, "element_at indexed fast path");
            return Ok(self.stage.get(index));
        }
        let mut cur = self.cursor();
        let mut i = 0usize;
        while let Some(e) = cur.pull()? {
            if i == index {
                return Ok(Some(e));
            }
            i += 1;
        }
        Ok(None)
    }

    /// Element at `index`, or `default` when out of range.
    ///
    /// # Errors
    /// Any upstream error.
    pub fn element_at_or(&self, index: usize, default: T) -> Result<T> {
        Ok(self.element_at(index)?.unwrap_or(default))
    }

    /// Element `index` positions from the end (0 is the last element).
    /// Indexed sources are read directly; otherwise a ring buffer of
    /// `index + 1` elements is kept during one pass.
    ///
    /// # Errors
    /// Any upstream error.
    pub fn element_at_from_end(&self, index: usize) -> Result<Option<T>> {
        if let (true, Some(n)) = (self.stage.indexed(), self.stage.exact_len()) {
            trace!(index, "element_at_from_end indexed fast path");
            return Ok(index
                .checked_add(1)
                .and_then(|k| n.checked_sub(k))
                .and_then(|i| self.stage.get(i)));
        }
        let mut ring = VecDeque::with_capacity(index.saturating_add(1).min(1024));
        let mut cur = self.cursor();
        while let Some(e) = cur.pull()? {
            if ring.len() > index {
                ring.pop_front();
            }
            ring.push_back(e);
        }
        Ok(if ring.len() > index {
            ring.pop_front()
        } else {
            None
        })
    }

    /// Index of the first element equal to `needle`.
    ///
    /// # Errors
    /// Any upstream error.
    pub fn index_of(&self, needle: &T) -> Result<Option<usize>>
    where
        T: PartialEq,
    {
        Ok(self.position(|e| e == needle)?.map(|(i, _)| i))
    }

    /// Whether some element equals `needle`.
    ///
    /// # Errors
    /// Any upstream error.
    pub fn contains(&self, needle: &T) -> Result<bool>
    where
        T: PartialEq,
    {
        Ok(self.index_of(needle)?.is_some())
    }

    /// Whether every one of `needles` occurs in the sequence. One pass that
    /// stops once all have been seen; an empty `needles` pulls nothing.
    ///
    /// # Errors
    /// Any upstream error.
    pub fn contains_all<I>(&self, needles: I) -> Result<bool>
    where
        T: Eq + Hash,
        I: IntoIterator<Item = T>,
    {
        let mut missing: HashSet<T> = needles.into_iter().collect();
        if missing.is_empty() {
            return Ok(true);
        }
        let mut cur = self.cursor();
        while let Some(e) = cur.pull()? {
            missing.remove(&e);
            if missing.is_empty() {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /* ---------- extremes ---------- */

    /// Smallest element by `cmp`; the first wins among equals.
    ///
    /// # Errors
    /// Any upstream error.
    pub fn min_by<F>(&self, cmp: F) -> Result<Option<T>>
    where
        F: Fn(&T, &T) -> Ordering,
    {
        self.reduce(|best, e| if cmp(&e, &best) == Ordering::Less { e } else { best })
    }

    /// Largest element by `cmp`; the first wins among equals.
    ///
    /// # Errors
    /// Any upstream error.
    pub fn max_by<F>(&self, cmp: F) -> Result<Option<T>>
    where
        F: Fn(&T, &T) -> Ordering,
    {
        self.reduce(|best, e| if cmp(&e, &best) == Ordering::Greater { e } else { best })
    }

    /// Element with the smallest `key`.
    ///
    /// # Errors
    /// Any upstream error.
    pub fn min_by_key<K, F>(&self, key: F) -> Result<Option<T>>
    where
        K: Ord,
        F: Fn(&T) -> K,
    {
        self.min_by(|a, b| key(a).cmp(&key(b)))
    }

    /// Element with the largest `key`.
    ///
    /// # Errors
    /// Any upstream error.
    pub fn max_by_key<K, F>(&self, key: F) -> Result<Option<T>>
    where
        K: Ord,
        F: Fn(&T) -> K,
    {
        self.max_by(|a, b| key(a).cmp(&key(b)))
    }

    /// Smallest `selector` value over the sequence.
    ///
    /// # Errors
    /// Any upstream error.
    pub fn min_of<R, F>(&self, selector: F) -> Result<Option<R>>
    where
        R: Ord,
        F: Fn(&T) -> R,
    {
        self.fold(None, |best: Option<R>, e| {
            let r = selector(&e);
            match best {
                Some(b) if b <= r => Some(b),
                _ => Some(r),
            }
        })
    }

    /// Largest `selector` value over the sequence.
    ///
    /// # Errors
    /// Any upstream error.
    pub fn max_of<R, F>(&self, selector: F) -> Result<Option<R>>
    where
        R: Ord,
        F: Fn(&T) -> R,
    {
        self.fold(None, |best: Option<R>, e| {
            let r = selector(&e);
            match best {
                Some(b) if b >= r => Some(b),
                _ => Some(r),
            }
        })
    }

    /* ---------- folds ---------- */

    /// Left fold in encounter order.
    ///
    /// # Errors
    /// Any upstream error.
    pub fn fold<A, F>(&self, init: A, f: F) -> Result<A>
    where
        F: Fn(A, T) -> A,
    {
        let mut cur = self.cursor();
        let mut acc = init;
        while let Some(e) = cur.pull()? {
            acc = f(acc, e);
        }
        Ok(acc)
    }

    /// Left fold that also receives each element's index.
    ///
    /// # Errors
    /// Any upstream error.
    pub fn fold_indexed<A, F>(&self, init: A, f: F) -> Result<A>
    where
        F: Fn(usize, A, T) -> A,
    {
        let mut cur = self.cursor();
        let mut acc = init;
        let mut i = 0usize;
        while let Some(e) = cur.pull()? {
            acc = f(i, acc, e);
            i += 1;
        }
        Ok(acc)
    }

    /// Fold seeded with the first element; `None` for an empty sequence.
    ///
    /// # Errors
    /// Any upstream error.
    pub fn reduce<F>(&self, f: F) -> Result<Option<T>>
    where
        F: Fn(T, T) -> T,
    {
        let mut cur = self.cursor();
        let Some(mut acc) = cur.pull()? else {
            return Ok(None);
        };
        while let Some(e) = cur.pull()? {
            acc = f(acc, e);
        }
        Ok(Some(acc))
    }

    /// Run `f` on every element.
    ///
    /// # Errors
    /// Any upstream error.
    pub fn for_each<F>(&self, mut f: F) -> Result<()>
    where
        F: FnMut(T),
    {
        let mut cur = self.cursor();
        while let Some(e) = cur.pull()? {
            f(e);
        }
        Ok(())
    }

    /// Run `f` on every element with its index.
    ///
    /// # Errors
    /// Any upstream error.
    pub fn for_each_indexed<F>(&self, mut f: F) -> Result<()>
    where
        F: FnMut(usize, T),
    {
        let mut i = 0usize;
        self.for_each(|e| {
            f(i, e);
            i += 1;
        })
    }

    /* ---------- materialization ---------- */

    /// All elements in encounter order.
    ///
    /// # Errors
    /// Any upstream error.
    pub fn to_vec(&self) -> Result<Vec<T>> {
        drain(self.cursor().as_mut())
    }

    /// Distinct elements as a `HashSet`.
    ///
    /// # Errors
    /// Any upstream error.
    pub fn to_set(&self) -> Result<HashSet<T>>
    where
        T: Eq + Hash,
    {
        self.fold(HashSet::new(), |mut s, e| {
            s.insert(e);
            s
        })
    }

    /// Distinct elements in natural order.
    ///
    /// # Errors
    /// Any upstream error.
    pub fn to_btree_set(&self) -> Result<BTreeSet<T>>
    where
        T: Ord,
    {
        self.fold(BTreeSet::new(), |mut s, e| {
            s.insert(e);
            s
        })
    }

    /// `key(e) -> value(e)` map; on duplicate keys the last element wins.
    ///
    /// # Errors
    /// Any upstream error.
    pub fn to_map<K, V, FK, FV>(&self, key: FK, value: FV) -> Result<HashMap<K, V>>
    where
        K: Eq + Hash,
        FK: Fn(&T) -> K,
        FV: Fn(T) -> V,
    {
        self.fold(HashMap::new(), |mut m, e| {
            m.insert(key(&e), value(e));
            m
        })
    }

    /// Like [`to_map`](Seq::to_map), combining duplicates with
    /// `merge(existing, incoming)`.
    ///
    /// # Errors
    /// Any upstream error.
    pub fn to_map_with<K, V, FK, FV, FM>(
        &self,
        key: FK,
        value: FV,
        merge: FM,
    ) -> Result<HashMap<K, V>>
    where
        K: Eq + Hash,
        FK: Fn(&T) -> K,
        FV: Fn(T) -> V,
        FM: Fn(V, V) -> V,
    {
        let mut out: HashMap<K, V> = HashMap::new();
        self.for_each(|e| {
            let k = key(&e);
            let v = value(e);
            let merged = match out.remove(&k) {
                Some(old) => merge(old, v),
                None => v,
            };
            out.insert(k, merged);
        })?;
        Ok(out)
    }

    /// Elements keyed by `key`; last element wins per key.
    ///
    /// # Errors
    /// Any upstream error.
    pub fn associate_by<K, F>(&self, key: F) -> Result<HashMap<K, T>>
    where
        K: Eq + Hash,
        F: Fn(&T) -> K,
    {
        self.to_map(key, |e| e)
    }

    /// Each distinct element mapped to `value(e)`; a repeated element keeps
    /// the value computed for its last occurrence.
    ///
    /// # Errors
    /// Any upstream error.
    pub fn associate_with<V, F>(&self, value: F) -> Result<HashMap<T, V>>
    where
        T: Eq + Hash,
        F: Fn(&T) -> V,
    {
        self.fold(HashMap::new(), |mut m, e| {
            let v = value(&e);
            m.insert(e, v);
            m
        })
    }

    /// Like [`to_map`](Seq::to_map), keeping keys in first-seen order. A
    /// duplicate key takes the later value but keeps its first position.
    ///
    /// # Errors
    /// Any upstream error.
    pub fn to_linked_map<K, V, FK, FV>(&self, key: FK, value: FV) -> Result<GroupTable<K, V>>
    where
        K: Clone + Eq + Hash,
        FK: Fn(&T) -> K,
        FV: Fn(T) -> V,
    {
        self.fold(GroupTable::new(), |mut m, e| {
            m.insert(key(&e), value(e));
            m
        })
    }

    /// Split into `(matching, rest)`, both in encounter order.
    ///
    /// # Errors
    /// Any upstream error.
    pub fn partition_by<F>(&self, pred: F) -> Result<(Vec<T>, Vec<T>)>
    where
        F: Fn(&T) -> bool,
    {
        self.fold((Vec::new(), Vec::new()), |(mut yes, mut no), e| {
            if pred(&e) {
                yes.push(e);
            } else {
                no.push(e);
            }
            (yes, no)
        })
    }

    /// Display form of every element joined by `sep`.
    ///
    /// # Errors
    /// Any upstream error.
    pub fn joining(&self, sep: &str) -> Result<String>
    where
        T: Display,
    {
        let mut out = String::new();
        let mut first = true;
        self.for_each(|e| {
            if !first {
                out.push_str(sep);
            }
            first = false;
            let _ = write!(out, "{e}");
        })?;
        Ok(out)
    }

    /// Occurrence count per distinct element in first-seen order.
    ///
    /// # Errors
    /// Any upstream error.
    pub fn frequency_ordered(&self) -> Result<GroupTable<T, usize>>
    where
        T: Eq + Hash,
    {
        self.fold(GroupTable::new(), |mut m, e| {
            *m.entry_or_insert_with(e, || 0) += 1;
            m
        })
    }

    /// Occurrence count per distinct element, built in one pass.
    ///
    /// # Errors
    /// Any upstream error.
    pub fn frequency(&self) -> Result<HashMap<T, usize>>
    where
        T: Eq + Hash,
    {
        self.fold(HashMap::new(), |mut m, e| {
            *m.entry(e).or_insert(0) += 1;
            m
        })
    }
}

impl<T: SeqBound + Ord> Seq<T> {
    /// Smallest element by natural order.
    ///
    /// # Errors
    /// Any upstream error.
    pub fn min(&self) -> Result<Option<T>> {
        self.min_by(T::cmp)
    }

    /// Largest element by natural order.
    ///
    /// # Errors
    /// Any upstream error.
    pub fn max(&self) -> Result<Option<T>> {
        self.max_by(T::cmp)
    }
}

impl<A: SeqBound, B: SeqBound> Seq<(A, B)> {
    /// Split a sequence of pairs into two vectors.
    ///
    /// # Errors
    /// Any upstream error.
    pub fn unzip(&self) -> Result<(Vec<A>, Vec<B>)> {
        self.fold((Vec::new(), Vec::new()), |(mut l, mut r), (a, b)| {
            l.push(a);
            r.push(b);
            (l, r)
        })
    }
}
