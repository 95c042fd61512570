//! Numeric aggregation: `sum`, `average`, `summarize`.
//!
//! The [`Numeric`] capability is a trait bound, so most element types are
//! checked at compile time. Two cases are resolved at runtime instead:
//! - `Option<N>`: `None` is a null and is **skipped** (it does not count
//!   toward an average's denominator).
//! - `serde_json::Value` (feature `json`): numbers contribute, `Null` is
//!   skipped, anything else fails with [`SeqError::TypeMismatch`].

use crate::error::{Result, SeqError};
use crate::seq::{Seq, SeqBound};
use serde::{Deserialize, Serialize};

/// Accumulator for a running sum.
///
/// Integer accumulators report overflow as `None`; `f64` saturates to an
/// infinity the way float arithmetic does.
pub trait Accumulator: Copy + Default + PartialOrd {
    fn checked_sum(self, other: Self) -> Option<Self>;
}

impl Accumulator for i64 {
    #[inline]
    fn checked_sum(self, other: Self) -> Option<Self> {
        self.checked_add(other)
    }
}

impl Accumulator for u64 {
    #[inline]
    fn checked_sum(self, other: Self) -> Option<Self> {
        self.checked_add(other)
    }
}

impl Accumulator for f64 {
    #[inline]
    fn checked_sum(self, other: Self) -> Option<Self> {
        Some(self + other)
    }
}

/// An element that may contribute a number to an aggregation.
pub trait Numeric {
    /// Accumulator type (`i64` for signed integers, `u64` for unsigned,
    /// `f64` for floats).
    type Sum: Accumulator;

    /// The element's numeric value, `Ok(None)` for a null.
    ///
    /// # Errors
    /// [`SeqError::TypeMismatch`] when the element has no numeric value.
    fn numeric(&self, operation: &'static str) -> Result<Option<Self::Sum>>;

    /// Widen an accumulator to `f64` (averages, summaries, numeric sort).
    fn to_f64(value: Self::Sum) -> f64;
}

macro_rules! numeric_lossless {
    ($acc:ty => $($t:ty),*) => {$(
        impl Numeric for $t {
            type Sum = $acc;
            #[inline]
            fn numeric(&self, _operation: &'static str) -> Result<Option<$acc>> {
                Ok(Some(<$acc>::from(*self)))
            }
            #[inline]
            #[allow(clippy::cast_precision_loss)]
            fn to_f64(value: $acc) -> f64 {
                value as f64
            }
        }
    )*};
}

numeric_lossless!(i64 => i8, i16, i32, i64);
numeric_lossless!(u64 => u8, u16, u32, u64);
numeric_lossless!(f64 => f32, f64);

impl Numeric for isize {
    type Sum = i64;
    fn numeric(&self, operation: &'static str) -> Result<Option<i64>> {
        i64::try_from(*self)
            .map(Some)
            .map_err(|_| SeqError::mismatch(operation, format!("{self} does not fit in i64")))
    }
    #[allow(clippy::cast_precision_loss)]
    fn to_f64(value: i64) -> f64 {
        value as f64
    }
}

impl Numeric for usize {
    type Sum = u64;
    fn numeric(&self, operation: &'static str) -> Result<Option<u64>> {
        u64::try_from(*self)
            .map(Some)
            .map_err(|_| SeqError::mismatch(operation, format!("{self} does not fit in u64")))
    }
    #[allow(clippy::cast_precision_loss)]
    fn to_f64(value: u64) -> f64 {
        value as f64
    }
}

impl<N: Numeric> Numeric for Option<N> {
    type Sum = N::Sum;
    fn numeric(&self, operation: &'static str) -> Result<Option<N::Sum>> {
        match self {
            Some(n) => n.numeric(operation),
            None => Ok(None),
        }
    }
    fn to_f64(value: N::Sum) -> f64 {
        N::to_f64(value)
    }
}

#[cfg(feature = "json")]
impl Numeric for serde_json::Value {
    type Sum = f64;
    fn numeric(&self, operation: &'static str) -> Result<Option<f64>> {
        match self {
            Self::Null => Ok(None),
            Self::Number(n) => n
                .as_f64()
                .map(Some)
                .ok_or_else(|| SeqError::mismatch(operation, format!("{n} is not representable as f64"))),
            other => Err(SeqError::mismatch(operation, format!("expected a number, found {other}"))),
        }
    }
    fn to_f64(value: f64) -> f64 {
        value
    }
}

/// One-pass numeric summary of a sequence (nulls skipped).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub count: usize,
    pub sum: f64,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
}

impl Summary {
    fn accept(&mut self, x: f64) {
        self.count += 1;
        self.sum += x;
        self.min = Some(self.min.map_or(x, |m| m.min(x)));
        self.max = Some(self.max.map_or(x, |m| m.max(x)));
    }

    #[allow(clippy::cast_precision_loss)]
    fn finish(mut self) -> Self {
        self.mean = (self.count > 0).then(|| self.sum / self.count as f64);
        self
    }
}

/// Sum and non-null count of the numeric values produced by `value`.
fn accumulate<T, N, F>(seq: &Seq<T>, operation: &'static str, value: F) -> Result<(N::Sum, usize)>
where
    T: SeqBound,
    N: Numeric,
    F: Fn(&T) -> N,
{
    let mut cur = seq.cursor();
    let mut total = N::Sum::default();
    let mut count = 0usize;
    while cur.has_next()? {
        let e = cur.next()?;
        if let Some(x) = value(&e).numeric(operation)? {
            total = total
                .checked_sum(x)
                .ok_or(SeqError::Overflow { operation })?;
            count += 1;
        }
    }
    Ok((total, count))
}

#[allow(clippy::cast_precision_loss)]
fn mean<N: Numeric>(total: N::Sum, count: usize) -> Option<f64> {
    (count > 0).then(|| N::to_f64(total) / count as f64)
}

impl<T: SeqBound + Numeric> Seq<T> {
    /// Sum of all non-null values (zero for an empty sequence).
    ///
    /// # Errors
    /// [`SeqError::TypeMismatch`] for non-numeric runtime values,
    /// [`SeqError::Overflow`] when an integer total leaves the accumulator's
    /// range, or any upstream error.
    pub fn sum(&self) -> Result<T::Sum> {
        accumulate(self, "sum", |e: &T| e.clone()).map(|(s, _)| s)
    }

    /// Mean of the non-null values; `None` when there are none.
    ///
    /// # Errors
    /// As for [`sum`](Seq::sum).
    pub fn average(&self) -> Result<Option<f64>> {
        let (total, count) = accumulate(self, "average", |e: &T| e.clone())?;
        Ok(mean::<T>(total, count))
    }

    /// Count, sum, min, max and mean of the non-null values in one pass.
    ///
    /// # Errors
    /// As for [`sum`](Seq::sum).
    pub fn summarize(&self) -> Result<Summary> {
        let mut cur = self.cursor();
        let mut summary = Summary::default();
        while cur.has_next()? {
            if let Some(x) = cur.next()?.numeric("summarize")? {
                summary.accept(T::to_f64(x));
            }
        }
        Ok(summary.finish())
    }
}

impl<T: SeqBound> Seq<T> {
    /// Sum of `value(e)` over all elements, skipping nulls.
    ///
    /// # Errors
    /// As for [`sum`](Seq::sum).
    pub fn sum_of<N, F>(&self, value: F) -> Result<N::Sum>
    where
        N: Numeric,
        F: Fn(&T) -> N,
    {
        accumulate(self, "sum", value).map(|(s, _)| s)
    }

    /// Mean of `value(e)` over all elements, skipping nulls.
    ///
    /// # Errors
    /// As for [`sum`](Seq::sum).
    pub fn average_of<N, F>(&self, value: F) -> Result<Option<f64>>
    where
        N: Numeric,
        F: Fn(&T) -> N,
    {
        let (total, count) = accumulate(self, "average", value)?;
        Ok(mean::<N>(total, count))
    }
}
