//! Per-group aggregation for [`Seq::group_by_combine`](crate::Seq::group_by_combine).
//!
//! A [`CombineFn`] folds the values of one group into an accumulator `A`
//! and finishes it into an output `O`:
//!
//! - [`Count`] -- number of values.
//! - [`Sum<T>`] -- sum of values.
//! - [`Min<T>`] / [`Max<T>`] -- extreme value (`None` for an empty group).
//! - [`AverageF64`] -- average as `f64` (values convertible to `f64`).
//! - [`DistinctCount<T>`] -- count of distinct values.
//! - [`ToVec<T>`] -- the values themselves, in encounter order.
//!
//! # Example
//! ```
//! use ironseq::Seq;
//! use ironseq::combiners::{AverageF64, CombineFn, Count, Sum};
//!
//! let sales = Seq::from_vec(vec![("north", 10u32), ("south", 4), ("north", 6)]);
//! let region = |sale: &(&'static str, u32)| sale.0;
//! let amount = |sale: (&'static str, u32)| sale.1;
//!
//! let orders = sales.group_by_combine(region, Count);
//! assert_eq!(orders.to_map()?.get(&"north"), Some(&2));
//!
//! // `on` comes from the `CombineFn` trait, which must be in scope.
//! let totals = sales.group_by_combine(region, Sum::<u32>::new().on(amount));
//! assert_eq!(totals.to_map()?.get(&"north"), Some(&16));
//!
//! let means = sales.group_by_combine(region, AverageF64.on(amount));
//! assert_eq!(means.to_map()?.get(&"south"), Some(&4.0));
//! # Ok::<(), ironseq::SeqError>(())
//! ```

mod basic;
mod distinct;
mod statistical;

pub use basic::{Count, Max, Min, Sum, ToVec};
pub use distinct::DistinctCount;
pub use statistical::AverageF64;

use std::marker::PhantomData;

/// Fold for one group: `create` a fresh accumulator, `add_input` each value
/// in encounter order, then `finish`.
pub trait CombineFn<V, A, O>: Send + Sync + 'static {
    fn create(&self) -> A;
    fn add_input(&self, acc: &mut A, v: V);
    fn finish(&self, acc: A) -> O;

    /// Adapt this combiner to elements of another type, projecting each one
    /// with `f` before it is added.
    fn on<E, F>(self, f: F) -> Projected<Self, F, V>
    where
        Self: Sized,
        F: Fn(E) -> V + Send + Sync + 'static,
    {
        Projected {
            inner: self,
            project: f,
            _v: PhantomData,
        }
    }
}

/// A combiner whose input is projected first. See [`CombineFn::on`].
pub struct Projected<C, F, V> {
    inner: C,
    project: F,
    _v: PhantomData<fn() -> V>,
}

impl<C, F, E, V, A, O> CombineFn<E, A, O> for Projected<C, F, V>
where
    C: CombineFn<V, A, O>,
    F: Fn(E) -> V + Send + Sync + 'static,
    V: 'static,
{
    fn create(&self) -> A {
        self.inner.create()
    }

    fn add_input(&self, acc: &mut A, v: E) {
        self.inner.add_input(acc, (self.project)(v));
    }

    fn finish(&self, acc: A) -> O {
        self.inner.finish(acc)
    }
}
