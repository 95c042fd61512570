//! Exact de-duplication, keeping the first occurrence of each key.
//!
//! - [`Seq::distinct`] - by element equality
//! - [`Seq::distinct_by`] - by a derived key
//!
//! Each cursor owns its own seen-set: O(1) amortized lookups, memory
//! proportional to the number of distinct keys.

use crate::ops::FilterCursor;
use crate::seq::{Seq, SeqBound};
use std::collections::HashSet;
use std::hash::Hash;
use std::sync::Arc;

impl<T: SeqBound + Eq + Hash> Seq<T> {
    /// Remove duplicates, preserving first-seen order.
    ///
    /// # Example
    /// ```
    /// use ironseq::Seq;
    /// let v = Seq::from_vec(vec![3, 1, 3, 2, 1]).distinct().to_vec().unwrap();
    /// assert_eq!(v, vec![3, 1, 2]);
    /// ```
    #[must_use]
    pub fn distinct(&self) -> Seq<T> {
        let up = self.clone();
        Seq::lazy(move || {
            let mut seen: HashSet<T> = HashSet::new();
            Box::new(FilterCursor::new(up.cursor(), move |v: &T| {
                Ok(seen.insert(v.clone()))
            }))
        })
    }
}

impl<T: SeqBound> Seq<T> {
    /// Remove elements whose key was already seen.
    #[must_use]
    pub fn distinct_by<K, F>(&self, key: F) -> Seq<T>
    where
        K: Eq + Hash + 'static,
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        let up = self.clone();
        let key = Arc::new(key);
        Seq::lazy(move || {
            let key = Arc::clone(&key);
            let mut seen: HashSet<K> = HashSet::new();
            Box::new(FilterCursor::new(up.cursor(), move |v: &T| {
                Ok(seen.insert(key(v)))
            }))
        })
    }
}
