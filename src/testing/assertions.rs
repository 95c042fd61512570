//! Assertion functions for comparing sequence output with expected values.

use crate::error::Result;
use crate::seq::{Seq, SeqBound};
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// Assert that two collections are equal in order and content.
///
/// # Panics
///
/// Panics if the collections differ in length or content.
///
/// # Example
///
/// ```
/// use ironseq::testing::assert_collections_equal;
///
/// assert_collections_equal(&[1, 2, 3], &[1, 2, 3]);
/// ```
pub fn assert_collections_equal<T: Debug + PartialEq>(actual: &[T], expected: &[T]) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "Collection length mismatch:\n  Expected length: {}\n  Actual length: {}\n  Expected: {expected:?}\n  Actual: {actual:?}",
        expected.len(),
        actual.len()
    );

    for (i, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
        assert_eq!(
            a, e,
            "Collection mismatch at index {i}:\n  Expected: {e:?}\n  Actual: {a:?}\n  Full expected: {expected:?}\n  Full actual: {actual:?}"
        );
    }
}

/// Assert that two collections hold the same elements with the same
/// multiplicities, ignoring order.
///
/// # Panics
///
/// Panics if the collections differ in content (ignoring order).
///
/// # Example
///
/// ```
/// use ironseq::testing::assert_collections_unordered_equal;
///
/// assert_collections_unordered_equal(&[3, 1, 1, 2], &[1, 2, 3, 1]);
/// ```
pub fn assert_collections_unordered_equal<T: Debug + Eq + Hash>(actual: &[T], expected: &[T]) {
    fn tally<T: Eq + Hash>(xs: &[T]) -> HashMap<&T, usize> {
        let mut m = HashMap::new();
        for x in xs {
            *m.entry(x).or_insert(0) += 1;
        }
        m
    }

    assert_eq!(
        actual.len(),
        expected.len(),
        "Collection length mismatch:\n  Expected length: {}\n  Actual length: {}\n  Expected: {expected:?}\n  Actual: {actual:?}",
        expected.len(),
        actual.len()
    );

    let got = tally(actual);
    let want = tally(expected);
    if got != want {
        let missing: Vec<_> = want.keys().filter(|k| got.get(*k) != want.get(*k)).collect();
        panic!(
            "Collection content mismatch:\n  Differing elements: {missing:?}\n  Expected: {expected:?}\n  Actual: {actual:?}"
        );
    }
}

/// Drain `seq` and assert it yields exactly `expected`, in order.
///
/// # Errors
/// Any error raised while draining.
///
/// # Panics
///
/// Panics if the output differs.
pub fn assert_seq_yields<T>(seq: &Seq<T>, expected: &[T]) -> Result<()>
where
    T: SeqBound + Debug + PartialEq,
{
    let actual = seq.to_vec()?;
    assert_collections_equal(&actual, expected);
    Ok(())
}
