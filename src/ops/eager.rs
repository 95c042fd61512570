//! Eager-boundary operators: `sorted*`, `reversed`, `shuffled*`, `peek_all`,
//! `then_apply`.
//!
//! These must see the whole upstream before producing anything, but the drain
//! happens on the **first pull** of the new sequence's cursor, never when the
//! operator is chained. Chaining N eager operators costs N full passes at
//! terminal time and none at build time.

use crate::cursor::{drain, BoxCursor, Cursor};
use crate::error::{Result, SeqError};
use crate::numeric::Numeric;
use crate::seq::{Seq, SeqBound};
use crate::sort::{compare_all, OrderingRule, SortOrder, SortSpec};
use crate::utils::{random_seed, SplitMix64};
use ordered_float::OrderedFloat;
use std::cmp::Ordering;
use std::sync::Arc;
use std::vec::IntoIter;
use tracing::debug;

type Transform<I, O> = dyn Fn(Vec<I>) -> Result<Vec<O>> + Send + Sync;

struct EagerCursor<I, O> {
    label: &'static str,
    up: BoxCursor<I>,
    transform: Arc<Transform<I, O>>,
    buffered: Option<IntoIter<O>>,
}

impl<I, O> EagerCursor<I, O> {
    fn buffer(&mut self) -> Result<&mut IntoIter<O>> {
        if self.buffered.is_none() {
            let items = drain(self.up.as_mut())?;
            let drained = items.len();
            let out = (self.transform)(items)?;
            debug!(operator = self.label, drained, produced = out.len(), "eager boundary materialized");
            self.buffered = Some(out.into_iter());
        }
        self.buffered.as_mut().ok_or(SeqError::ExhaustedSequence)
    }
}

impl<I, O> Cursor for EagerCursor<I, O> {
    type Item = O;

    fn has_next(&mut self) -> Result<bool> {
        Ok(self.buffer()?.len() > 0)
    }

    fn next(&mut self) -> Result<O> {
        self.buffer()?.next().ok_or(SeqError::ExhaustedSequence)
    }
}

impl<T: SeqBound> Seq<T> {
    /// Wrap `transform` as an eager boundary over `self`.
    fn eager<O, F>(&self, label: &'static str, transform: F) -> Seq<O>
    where
        O: SeqBound,
        F: Fn(Vec<T>) -> Result<Vec<O>> + Send + Sync + 'static,
    {
        let up = self.clone();
        let transform: Arc<Transform<T, O>> = Arc::new(transform);
        Seq::lazy(move || {
            Box::new(EagerCursor {
                label,
                up: up.cursor(),
                transform: Arc::clone(&transform),
                buffered: None,
            })
        })
    }

    /// Stable sort with a comparator.
    #[must_use]
    pub fn sorted_by<F>(&self, cmp: F) -> Seq<T>
    where
        F: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        self.eager("sorted_by", move |mut v| {
            v.sort_by(&cmp);
            Ok(v)
        })
    }

    /// Stable sort on a non-null key.
    #[must_use]
    pub fn sorted_by_key<K, F>(&self, key: F, order: SortOrder) -> Seq<T>
    where
        K: Ord,
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        self.sorted_by_rules(vec![OrderingRule::by_key(key, order)])
    }

    /// Stable sort on a nullable key; `None` keys go where `spec.nulls` says.
    #[must_use]
    pub fn sorted_by_nullable_key<K, F>(&self, key: F, spec: SortSpec) -> Seq<T>
    where
        K: Ord,
        F: Fn(&T) -> Option<K> + Send + Sync + 'static,
    {
        self.sorted_by_rules(vec![OrderingRule::by_nullable(key, spec)])
    }

    /// Stable sort by several rules, applied lexicographically.
    #[must_use]
    pub fn sorted_by_rules(&self, rules: Vec<OrderingRule<T>>) -> Seq<T> {
        self.eager("sorted_by_rules", move |mut v| {
            v.sort_by(|a, b| compare_all(&rules, a, b));
            Ok(v)
        })
    }

    /// Reverse the whole sequence.
    #[must_use]
    pub fn reversed(&self) -> Seq<T> {
        self.eager("reversed", |mut v| {
            v.reverse();
            Ok(v)
        })
    }

    /// Random permutation; every cursor draws a fresh seed.
    #[must_use]
    pub fn shuffled(&self) -> Seq<T> {
        self.eager("shuffled", |mut v| {
            SplitMix64::new(random_seed()).shuffle(&mut v);
            Ok(v)
        })
    }

    /// Deterministic permutation for a given `seed`.
    #[must_use]
    pub fn shuffled_with_seed(&self, seed: u64) -> Seq<T> {
        self.eager("shuffled", move |mut v| {
            SplitMix64::new(seed).shuffle(&mut v);
            Ok(v)
        })
    }

    /// Hand the fully materialized upstream to `consumer` on the first pull,
    /// then continue with the same elements.
    #[must_use]
    pub fn peek_all<F>(&self, consumer: F) -> Seq<T>
    where
        F: Fn(&[T]) + Send + Sync + 'static,
    {
        self.eager("peek_all", move |v| {
            consumer(&v);
            Ok(v)
        })
    }

    /// Batch hand-off to an external collaborator: on the first pull, drain
    /// upstream into a `Vec`, pass it to `f`, and continue with whatever `f`
    /// returns. No retry or batching policy is applied; a failure surfaces as
    /// [`SeqError::Collaborator`].
    ///
    /// # Example
    /// ```
    /// use ironseq::Seq;
    /// let names = Seq::from_vec(vec![2u32, 1])
    ///     .then_apply(|ids| Ok(ids.into_iter().map(|id| format!("user-{id}"))))
    ///     .to_vec()
    ///     .unwrap();
    /// assert_eq!(names, vec!["user-2", "user-1"]);
    /// ```
    #[must_use]
    pub fn then_apply<O, I, F>(&self, f: F) -> Seq<O>
    where
        O: SeqBound,
        I: IntoIterator<Item = O>,
        F: Fn(Vec<T>) -> anyhow::Result<I> + Send + Sync + 'static,
    {
        self.eager("then_apply", move |v| {
            debug!(batch = v.len(), "handing batch to collaborator");
            Ok(f(v)?.into_iter().collect())
        })
    }
}

impl<T: SeqBound + Ord> Seq<T> {
    /// Stable ascending sort by natural order.
    #[must_use]
    pub fn sorted(&self) -> Seq<T> {
        self.eager("sorted", |mut v| {
            v.sort();
            Ok(v)
        })
    }

    /// Stable descending sort by natural order.
    #[must_use]
    pub fn sorted_desc(&self) -> Seq<T> {
        self.eager("sorted_desc", |mut v| {
            v.sort_by(|a, b| b.cmp(a));
            Ok(v)
        })
    }
}

impl<T: SeqBound + Numeric> Seq<T> {
    /// Sort by numeric value, for element types whose numeric capability is
    /// only known at runtime. Null values are placed per `spec.nulls`.
    ///
    /// The error is deferred: chaining succeeds, and the first pull fails with
    /// [`SeqError::TypeMismatch`] if any element is not numeric.
    #[must_use]
    pub fn sorted_numeric(&self, spec: SortSpec) -> Seq<T> {
        self.eager("sorted_numeric", move |v| {
            let mut keyed = v
                .into_iter()
                .map(|e| {
                    let key = e.numeric("sorted_numeric")?.map(|n| OrderedFloat(T::to_f64(n)));
                    Ok((key, e))
                })
                .collect::<Result<Vec<_>>>()?;
            keyed.sort_by(|a, b| spec.compare(a.0.as_ref(), b.0.as_ref()));
            Ok(keyed.into_iter().map(|(_, e)| e).collect())
        })
    }
}
