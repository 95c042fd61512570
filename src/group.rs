//! Memoized grouping.
//!
//! # Overview
//! - [`Seq::group_by`] / [`Seq::group_by_value`] build a [`GroupMap`] that has
//!   computed nothing yet.
//! - [`GroupMap::to_map`] drains the upstream **once** and caches the table in
//!   a [`CacheCell`]. Repeated or concurrent calls reuse it.
//! - [`GroupMap::value_stream`] layers a per-group transform on top, with its
//!   own cell: a [`MappedGroups`]. Its first `to_map` materializes the
//!   underlying groups (if needed) and then the transform, each exactly once.
//! - [`MappedGroups::map_values`] stacks further transforms, each level with
//!   its own cell.
//! - `peek_map`, `has_key` and `put` queue work against the table for when it
//!   is materialized. Observers share the parent's table; `put` works on a
//!   copy, so the parent never changes once published.
//!
//! Tables keep keys in first-seen order. Any key value is a legal bucket,
//! including `None` for `Option` keys. An empty upstream gives an empty table.
//!
//! # Example
//! ```
//! use ironseq::Seq;
//!
//! let words = Seq::from_vec(vec!["apple", "avocado", "banana", "blueberry", "cherry"]);
//! let by_letter = words.group_by(|w| w.chars().next());
//! let sizes = by_letter.value_stream(|ws| ws.count());
//!
//! let table = sizes.to_map().unwrap();
//! assert_eq!(table.get(&Some('a')), Some(&2));
//! assert_eq!(table.get(&Some('c')), Some(&1));
//! ```

use crate::cache::CacheCell;
use crate::combiners::CombineFn;
use crate::cursor::Cursor;
use crate::error::{Result, SeqError};
use crate::seq::{Seq, SeqBound};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;
use tracing::debug;

/* ===================== GroupTable ===================== */

/// Insertion-ordered key/value table produced by grouping.
#[derive(Clone)]
pub struct GroupTable<K, V> {
    entries: Vec<(K, V)>,
    index: HashMap<K, usize>,
}

impl<K, V> Default for GroupTable<K, V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<K: Clone + Eq + Hash, V> GroupTable<K, V> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Insert or replace; a replaced key keeps its original position.
    pub fn insert(&mut self, key: K, value: V) {
        match self.index.get(&key) {
            Some(&i) => self.entries[i].1 = value,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
            }
        }
    }

    /// Mutable slot for `key`, created with `init` on first sight.
    pub fn entry_or_insert_with(&mut self, key: K, init: impl FnOnce() -> V) -> &mut V {
        let i = match self.index.get(&key) {
            Some(&i) => i,
            None => {
                let i = self.entries.len();
                self.index.insert(key.clone(), i);
                self.entries.push((key, init()));
                i
            }
        };
        &mut self.entries[i].1
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }

    /// Unordered copy as a `HashMap`.
    pub fn to_hash_map(&self) -> HashMap<K, V>
    where
        V: Clone,
    {
        self.entries.iter().cloned().collect()
    }
}

impl<K: Clone + Eq + Hash, V> FromIterator<(K, V)> for GroupTable<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut t = Self::new();
        for (k, v) in iter {
            t.insert(k, v);
        }
        t
    }
}

impl<K, V> IntoIterator for GroupTable<K, V> {
    type Item = (K, V);
    type IntoIter = std::vec::IntoIter<(K, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Equal when the same keys map to equal values in the same order.
impl<K: PartialEq, V: PartialEq> PartialEq for GroupTable<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for GroupTable<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(k, v)| (k, v)))
            .finish()
    }
}

impl<K: Serialize, V: Serialize> Serialize for GroupTable<K, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/* ===================== Memo ===================== */

type Recipe<K, V> = Box<dyn Fn() -> Result<Arc<GroupTable<K, V>>> + Send + Sync>;

/// A table that is either already computed, or a recipe plus the cell its
/// result will land in. Tables are published behind an `Arc` so observers
/// layered on top can hand out the same table instead of a copy.
struct Memo<K, V> {
    cell: CacheCell<Arc<GroupTable<K, V>>>,
    recipe: Option<Recipe<K, V>>,
}

impl<K: Clone + Eq + Hash, V> Memo<K, V> {
    fn pending<F>(recipe: F) -> Self
    where
        F: Fn() -> Result<GroupTable<K, V>> + Send + Sync + 'static,
    {
        Self::shared(move || recipe().map(Arc::new))
    }

    fn shared<F>(recipe: F) -> Self
    where
        F: Fn() -> Result<Arc<GroupTable<K, V>>> + Send + Sync + 'static,
    {
        Self {
            cell: CacheCell::new(),
            recipe: Some(Box::new(recipe)),
        }
    }

    fn ready(table: GroupTable<K, V>) -> Self {
        Self {
            cell: CacheCell::ready(Arc::new(table)),
            recipe: None,
        }
    }

    fn resolve_arc(&self) -> Result<&Arc<GroupTable<K, V>>> {
        self.cell.get_or_try_init(|| match &self.recipe {
            Some(recipe) => recipe(),
            None => Ok(Arc::new(GroupTable::new())),
        })
    }

    fn resolve(&self) -> Result<&GroupTable<K, V>> {
        self.resolve_arc().map(|t| &**t)
    }
}

impl<K, V> Memo<K, V>
where
    K: Clone + Eq + Hash + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    /// Same table as `parent`, with `consumer` run once when it is first
    /// resolved through this memo.
    fn observe<F>(parent: &Arc<Self>, consumer: F) -> Self
    where
        F: Fn(&GroupTable<K, V>) + Send + Sync + 'static,
    {
        let parent = Arc::clone(parent);
        Self::shared(move || {
            let table = Arc::clone(parent.resolve_arc()?);
            consumer(&table);
            Ok(table)
        })
    }

    /// Copy of `parent`'s table with `key` set to `value`.
    fn with_entry(parent: &Arc<Self>, key: K, value: V) -> Self
    where
        V: Clone,
    {
        let parent = Arc::clone(parent);
        Self::pending(move || {
            let mut table = parent.resolve()?.clone();
            table.insert(key.clone(), value.clone());
            Ok(table)
        })
    }
}

/// Cursor over a memoized table's entries. Resolves the table on first pull.
struct EntriesCursor<K, V> {
    memo: Arc<Memo<K, V>>,
    pos: usize,
}

impl<K, V> Cursor for EntriesCursor<K, V>
where
    K: Clone + Eq + Hash,
    V: Clone,
{
    type Item = (K, V);

    fn has_next(&mut self) -> Result<bool> {
        Ok(self.pos < self.memo.resolve()?.len())
    }

    fn next(&mut self) -> Result<(K, V)> {
        let table = self.memo.resolve()?;
        let entry = table
            .entries
            .get(self.pos)
            .cloned()
            .ok_or(SeqError::ExhaustedSequence)?;
        self.pos += 1;
        Ok(entry)
    }
}

fn entries_seq<K: SeqBound + Eq + Hash, V: SeqBound>(memo: &Arc<Memo<K, V>>) -> Seq<(K, V)> {
    let memo = Arc::clone(memo);
    Seq::lazy(move || {
        Box::new(EntriesCursor {
            memo: Arc::clone(&memo),
            pos: 0,
        })
    })
}

/* ===================== GroupMap ===================== */

/// Lazy, memoized `key -> Vec<value>` grouping. Clones share one cache.
pub struct GroupMap<K, V> {
    memo: Arc<Memo<K, Vec<V>>>,
}

impl<K, V> Clone for GroupMap<K, V> {
    fn clone(&self) -> Self {
        Self {
            memo: Arc::clone(&self.memo),
        }
    }
}

impl<K, V> fmt::Debug for GroupMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupMap")
            .field("materialized", &self.memo.cell.is_ready())
            .finish_non_exhaustive()
    }
}

impl<K: SeqBound + Eq + Hash, V: SeqBound> GroupMap<K, V> {
    /// A group map whose table is already computed.
    #[must_use]
    pub fn from_table(table: GroupTable<K, Vec<V>>) -> Self {
        Self {
            memo: Arc::new(Memo::ready(table)),
        }
    }

    /// The grouped table, draining the upstream on the first call only.
    ///
    /// # Errors
    /// Any error raised while draining the upstream. A failed drain is not
    /// cached.
    pub fn to_map(&self) -> Result<&GroupTable<K, Vec<V>>> {
        self.memo.resolve()
    }

    /// Whether the table has been computed.
    pub fn is_materialized(&self) -> bool {
        self.memo.cell.is_ready()
    }

    /// Values grouped under `key` (empty when the key is absent).
    ///
    /// # Errors
    /// As for [`to_map`](GroupMap::to_map).
    pub fn get_values(&self, key: &K) -> Result<Vec<V>> {
        Ok(self.to_map()?.get(key).cloned().unwrap_or_default())
    }

    /// Apply `f` to each group's values (handed over as a `Seq`). Lazy: runs
    /// on the first [`MappedGroups::to_map`], over this map's cached groups.
    ///
    /// `f` receives `Seq<V>` so any operator chain, including a nested
    /// `group_by`, can run per group.
    #[must_use]
    pub fn value_stream<R, F>(&self, f: F) -> MappedGroups<K, R>
    where
        R: Send + Sync + 'static,
        F: Fn(Seq<V>) -> Result<R> + Send + Sync + 'static,
    {
        let memo = Arc::clone(&self.memo);
        MappedGroups::pending(move || {
            let groups = memo.resolve()?;
            let mut out = GroupTable::new();
            for (k, vs) in groups.iter() {
                out.insert(k.clone(), f(Seq::from_vec(vs.clone()))?);
            }
            debug!(groups = out.len(), "value stream materialized");
            Ok(out)
        })
    }

    /// A group map that hands the computed table to `consumer` once, when it
    /// is materialized. The table itself is shared, not copied.
    #[must_use]
    pub fn peek_map<F>(&self, consumer: F) -> GroupMap<K, V>
    where
        F: Fn(&GroupTable<K, Vec<V>>) + Send + Sync + 'static,
    {
        GroupMap {
            memo: Arc::new(Memo::observe(&self.memo, consumer)),
        }
    }

    /// Deferred lookup: when the returned map is materialized, `consumer`
    /// receives the values under `key` if that key is present.
    #[must_use]
    pub fn has_key<F>(&self, key: K, consumer: F) -> GroupMap<K, V>
    where
        F: Fn(&Vec<V>) + Send + Sync + 'static,
    {
        self.peek_map(move |t| {
            if let Some(vs) = t.get(&key) {
                consumer(vs);
            }
        })
    }

    /// Like [`has_key`](GroupMap::has_key), handing `default` to `consumer`
    /// when `key` is absent.
    #[must_use]
    pub fn has_key_or<F>(&self, key: K, default: Vec<V>, consumer: F) -> GroupMap<K, V>
    where
        F: Fn(&Vec<V>) + Send + Sync + 'static,
    {
        self.peek_map(move |t| consumer(t.get(&key).unwrap_or(&default)))
    }

    /// Deferred insert: the returned map holds this map's groups with `key`
    /// set to `values` (replacing an existing group in place). This map's
    /// own table is left untouched.
    #[must_use]
    pub fn put(&self, key: K, values: Vec<V>) -> GroupMap<K, V> {
        GroupMap {
            memo: Arc::new(Memo::with_entry(&self.memo, key, values)),
        }
    }

    /// The groups as a lazy sequence of `(key, values)` in key order.
    #[must_use]
    pub fn entries(&self) -> Seq<(K, Vec<V>)> {
        entries_seq(&self.memo)
    }
}

/* ===================== MappedGroups ===================== */

/// Memoized `key -> R` table layered over a [`GroupMap`] or another
/// `MappedGroups`. Owns its own cache cell.
pub struct MappedGroups<K, R> {
    memo: Arc<Memo<K, R>>,
}

impl<K, R> Clone for MappedGroups<K, R> {
    fn clone(&self) -> Self {
        Self {
            memo: Arc::clone(&self.memo),
        }
    }
}

impl<K, R> fmt::Debug for MappedGroups<K, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MappedGroups")
            .field("materialized", &self.memo.cell.is_ready())
            .finish_non_exhaustive()
    }
}

impl<K: SeqBound + Eq + Hash, R: Send + Sync + 'static> MappedGroups<K, R> {
    fn pending<F>(recipe: F) -> Self
    where
        F: Fn() -> Result<GroupTable<K, R>> + Send + Sync + 'static,
    {
        Self {
            memo: Arc::new(Memo::pending(recipe)),
        }
    }

    /// The transformed table, computed on the first call only.
    ///
    /// # Errors
    /// Any error from the underlying drain or from the transform.
    pub fn to_map(&self) -> Result<&GroupTable<K, R>> {
        self.memo.resolve()
    }

    pub fn is_materialized(&self) -> bool {
        self.memo.cell.is_ready()
    }

    /// Value for `key`, if present.
    ///
    /// # Errors
    /// As for [`to_map`](MappedGroups::to_map).
    pub fn get(&self, key: &K) -> Result<Option<&R>> {
        Ok(self.to_map()?.get(key))
    }

    /// Stack another per-key transform, with its own cache cell.
    #[must_use]
    pub fn map_values<R2, F>(&self, f: F) -> MappedGroups<K, R2>
    where
        R2: Send + Sync + 'static,
        F: Fn(&K, &R) -> Result<R2> + Send + Sync + 'static,
    {
        let memo = Arc::clone(&self.memo);
        MappedGroups::pending(move || {
            let table = memo.resolve()?;
            let mut out = GroupTable::new();
            for (k, r) in table.iter() {
                out.insert(k.clone(), f(k, r)?);
            }
            Ok(out)
        })
    }

    /// Hand the computed table to `consumer` once, when it is materialized.
    #[must_use]
    pub fn peek_map<F>(&self, consumer: F) -> MappedGroups<K, R>
    where
        F: Fn(&GroupTable<K, R>) + Send + Sync + 'static,
    {
        MappedGroups {
            memo: Arc::new(Memo::observe(&self.memo, consumer)),
        }
    }

    /// Deferred lookup: `consumer` receives the value under `key`, if any,
    /// when the returned table is materialized.
    #[must_use]
    pub fn has_key<F>(&self, key: K, consumer: F) -> MappedGroups<K, R>
    where
        F: Fn(&R) + Send + Sync + 'static,
    {
        self.peek_map(move |t| {
            if let Some(r) = t.get(&key) {
                consumer(r);
            }
        })
    }

    /// Like [`has_key`](MappedGroups::has_key), with `default` for a
    /// missing key.
    #[must_use]
    pub fn has_key_or<F>(&self, key: K, default: R, consumer: F) -> MappedGroups<K, R>
    where
        F: Fn(&R) + Send + Sync + 'static,
    {
        self.peek_map(move |t| consumer(t.get(&key).unwrap_or(&default)))
    }

    /// Deferred insert of `key -> value` into a copy of this table.
    #[must_use]
    pub fn put(&self, key: K, value: R) -> MappedGroups<K, R>
    where
        R: Clone,
    {
        MappedGroups {
            memo: Arc::new(Memo::with_entry(&self.memo, key, value)),
        }
    }

    /// The table as a lazy sequence of `(key, value)`.
    #[must_use]
    pub fn entries(&self) -> Seq<(K, R)>
    where
        R: Clone,
    {
        entries_seq(&self.memo)
    }
}

/* ===================== Seq entry points ===================== */

impl<T: SeqBound> Seq<T> {
    /// Group elements by `key`. Nothing is pulled until the map's `to_map`.
    #[must_use]
    pub fn group_by<K, F>(&self, key: F) -> GroupMap<K, T>
    where
        K: SeqBound + Eq + Hash,
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        self.group_by_value(key, |e| e)
    }

    /// Group `value(e)` by `key(e)`.
    #[must_use]
    pub fn group_by_value<K, V, FK, FV>(&self, key: FK, value: FV) -> GroupMap<K, V>
    where
        K: SeqBound + Eq + Hash,
        V: SeqBound,
        FK: Fn(&T) -> K + Send + Sync + 'static,
        FV: Fn(T) -> V + Send + Sync + 'static,
    {
        let up = self.clone();
        GroupMap {
            memo: Arc::new(Memo::pending(move || {
                let mut table: GroupTable<K, Vec<V>> = GroupTable::new();
                let mut cur = up.cursor();
                let mut drained = 0usize;
                while cur.has_next()? {
                    let e = cur.next()?;
                    table.entry_or_insert_with(key(&e), Vec::new).push(value(e));
                    drained += 1;
                }
                debug!(groups = table.len(), drained, "group map materialized");
                Ok(table)
            })),
        }
    }

    /// Group by `key` and fold each group with `combiner` in the same single
    /// pass. Memoized like [`group_by`](Seq::group_by).
    #[must_use]
    pub fn group_by_combine<K, C, A, O, FK>(&self, key: FK, combiner: C) -> MappedGroups<K, O>
    where
        K: SeqBound + Eq + Hash,
        C: CombineFn<T, A, O>,
        A: 'static,
        O: Send + Sync + 'static,
        FK: Fn(&T) -> K + Send + Sync + 'static,
    {
        let up = self.clone();
        MappedGroups::pending(move || {
            let mut accs: GroupTable<K, A> = GroupTable::new();
            let mut cur = up.cursor();
            while cur.has_next()? {
                let e = cur.next()?;
                let acc = accs.entry_or_insert_with(key(&e), || combiner.create());
                combiner.add_input(acc, e);
            }
            debug!(groups = accs.len(), "combined groups materialized");
            Ok(accs
                .into_iter()
                .map(|(k, a)| (k, combiner.finish(a)))
                .collect())
        })
    }
}
