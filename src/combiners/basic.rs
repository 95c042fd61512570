use std::marker::PhantomData;
use std::ops::Add;

use super::CombineFn;

/* ===================== Count ===================== */

#[derive(Clone, Copy, Debug, Default)]
pub struct Count;

impl<V> CombineFn<V, u64, u64> for Count {
    fn create(&self) -> u64 {
        0
    }

    fn add_input(&self, acc: &mut u64, _v: V) {
        *acc += 1;
    }

    fn finish(&self, acc: u64) -> u64 {
        acc
    }
}

/* ===================== Sum<T> ===================== */

#[derive(Clone, Copy, Debug, Default)]
pub struct Sum<T>(pub PhantomData<T>);
impl<T> Sum<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> CombineFn<T, T, T> for Sum<T>
where
    T: Send + Sync + 'static + Add<Output = T> + Default,
{
    fn create(&self) -> T {
        T::default()
    }

    fn add_input(&self, acc: &mut T, v: T) {
        *acc = std::mem::take(acc) + v;
    }

    fn finish(&self, acc: T) -> T {
        acc
    }
}

/* ===================== Min<T> / Max<T> ===================== */

/// Smallest value per group; the first one wins among equals.
#[derive(Clone, Copy, Debug, Default)]
pub struct Min<T>(pub PhantomData<T>);
impl<T> Min<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> CombineFn<T, Option<T>, Option<T>> for Min<T>
where
    T: Send + Sync + 'static + Ord,
{
    fn create(&self) -> Option<T> {
        None
    }

    fn add_input(&self, acc: &mut Option<T>, v: T) {
        match acc {
            Some(cur) if *cur <= v => {}
            _ => *acc = Some(v),
        }
    }

    fn finish(&self, acc: Option<T>) -> Option<T> {
        acc
    }
}

/// Largest value per group; the first one wins among equals.
#[derive(Clone, Copy, Debug, Default)]
pub struct Max<T>(pub PhantomData<T>);
impl<T> Max<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> CombineFn<T, Option<T>, Option<T>> for Max<T>
where
    T: Send + Sync + 'static + Ord,
{
    fn create(&self) -> Option<T> {
        None
    }

    fn add_input(&self, acc: &mut Option<T>, v: T) {
        match acc {
            Some(cur) if *cur >= v => {}
            _ => *acc = Some(v),
        }
    }

    fn finish(&self, acc: Option<T>) -> Option<T> {
        acc
    }
}

/* ===================== ToVec<T> ===================== */

#[derive(Clone, Copy, Debug, Default)]
pub struct ToVec<T>(pub PhantomData<T>);
impl<T> ToVec<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T: Send + Sync + 'static> CombineFn<T, Vec<T>, Vec<T>> for ToVec<T> {
    fn create(&self) -> Vec<T> {
        Vec::new()
    }

    fn add_input(&self, acc: &mut Vec<T>, v: T) {
        acc.push(v);
    }

    fn finish(&self, acc: Vec<T>) -> Vec<T> {
        acc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fold<C: CombineFn<u32, A, O>, A, O>(c: &C, xs: &[u32]) -> O {
        let mut acc = c.create();
        for &x in xs {
            c.add_input(&mut acc, x);
        }
        c.finish(acc)
    }

    #[test]
    fn basic_combiners() {
        let xs = [3, 1, 4, 1, 5];
        assert_eq!(fold(&Count, &xs), 5);
        assert_eq!(fold(&Sum::new(), &xs), 14);
        assert_eq!(fold(&Min::new(), &xs), Some(1));
        assert_eq!(fold(&Max::new(), &xs), Some(5));
        assert_eq!(fold(&Max::new(), &[]), None);
        assert_eq!(fold(&ToVec::new(), &xs), xs.to_vec());
    }
}
