//! Ordering configuration and composable ordering rules.
//!
//! A sort is described either by a plain comparator, by a key extractor with a
//! [`SortSpec`] (direction + null position), or by a list of
//! [`OrderingRule`]s applied lexicographically: the first rule decides, later
//! rules only break ties left by earlier ones.
//!
//! Null keys (`None`) are positioned by [`NullPosition`] and never handed to
//! the key's `Ord` implementation. The null position is independent of the
//! direction: `Desc` + `NullPosition::Last` still puts nulls last.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::Arc;

/// Sort direction.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Where `None` keys go.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NullPosition {
    First,
    #[default]
    Last,
}

/// Direction plus null placement for one sort key.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortSpec {
    #[serde(default)]
    pub order: SortOrder,
    #[serde(default)]
    pub nulls: NullPosition,
}

impl SortSpec {
    #[must_use]
    pub const fn new(order: SortOrder, nulls: NullPosition) -> Self {
        Self { order, nulls }
    }

    #[must_use]
    pub const fn asc() -> Self {
        Self::new(SortOrder::Asc, NullPosition::Last)
    }

    #[must_use]
    pub const fn desc() -> Self {
        Self::new(SortOrder::Desc, NullPosition::Last)
    }

    #[must_use]
    pub const fn nulls_first(self) -> Self {
        Self::new(self.order, NullPosition::First)
    }

    #[must_use]
    pub const fn nulls_last(self) -> Self {
        Self::new(self.order, NullPosition::Last)
    }

    /// Compare two possibly-null keys under this spec.
    pub fn compare<K: Ord>(&self, a: Option<&K>, b: Option<&K>) -> Ordering {
        match (a, b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => match self.nulls {
                NullPosition::First => Ordering::Less,
                NullPosition::Last => Ordering::Greater,
            },
            (Some(_), None) => match self.nulls {
                NullPosition::First => Ordering::Greater,
                NullPosition::Last => Ordering::Less,
            },
            (Some(x), Some(y)) => match self.order {
                SortOrder::Asc => x.cmp(y),
                SortOrder::Desc => y.cmp(x),
            },
        }
    }
}

type Comparator<T> = dyn Fn(&T, &T) -> Ordering + Send + Sync;

/// One ordering rule over `T`. Cheap to clone.
pub struct OrderingRule<T> {
    cmp: Arc<Comparator<T>>,
}

impl<T> Clone for OrderingRule<T> {
    fn clone(&self) -> Self {
        Self {
            cmp: Arc::clone(&self.cmp),
        }
    }
}

impl<T: 'static> OrderingRule<T> {
    /// Rule from a raw comparator.
    pub fn from_fn<F>(cmp: F) -> Self
    where
        F: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        Self { cmp: Arc::new(cmp) }
    }

    /// Rule on a non-null key.
    pub fn by_key<K, F>(key: F, order: SortOrder) -> Self
    where
        K: Ord,
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        let spec = SortSpec::new(order, NullPosition::Last);
        Self::from_fn(move |a, b| spec.compare(Some(&key(a)), Some(&key(b))))
    }

    /// Rule on a nullable key.
    pub fn by_nullable<K, F>(key: F, spec: SortSpec) -> Self
    where
        K: Ord,
        F: Fn(&T) -> Option<K> + Send + Sync + 'static,
    {
        Self::from_fn(move |a, b| spec.compare(key(a).as_ref(), key(b).as_ref()))
    }

    /// Break ties of `self` with `next`.
    #[must_use]
    pub fn then(self, next: OrderingRule<T>) -> Self {
        Self::from_fn(move |a, b| self.compare(a, b).then_with(|| next.compare(a, b)))
    }

    #[must_use]
    pub fn reversed(self) -> Self {
        Self::from_fn(move |a, b| self.compare(b, a))
    }

    pub fn compare(&self, a: &T, b: &T) -> Ordering {
        (self.cmp)(a, b)
    }
}

/// Lexicographic composition of `rules` (empty list: everything equal).
pub(crate) fn compare_all<T>(rules: &[OrderingRule<T>], a: &T, b: &T) -> Ordering {
    rules
        .iter()
        .map(|r| (r.cmp)(a, b))
        .find(|o| o.is_ne())
        .unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nulls_are_placed_regardless_of_direction() {
        let last_desc = SortSpec::desc().nulls_last();
        assert_eq!(last_desc.compare(None, Some(&1)), Ordering::Greater);
        assert_eq!(last_desc.compare(Some(&1), Some(&2)), Ordering::Greater);

        let first_asc = SortSpec::asc().nulls_first();
        assert_eq!(first_asc.compare(None, Some(&1)), Ordering::Less);
        assert_eq!(first_asc.compare::<i32>(None, None), Ordering::Equal);
    }

    #[test]
    fn later_rules_only_break_ties() {
        let rules = vec![
            OrderingRule::by_key(|p: &(u8, u8)| p.0, SortOrder::Asc),
            OrderingRule::by_key(|p: &(u8, u8)| p.1, SortOrder::Desc),
        ];
        assert_eq!(compare_all(&rules, &(1, 0), &(2, 9)), Ordering::Less);
        assert_eq!(compare_all(&rules, &(1, 9), &(1, 0)), Ordering::Less);
        assert_eq!(compare_all::<(u8, u8)>(&[], &(1, 9), &(1, 0)), Ordering::Equal);
    }
}
