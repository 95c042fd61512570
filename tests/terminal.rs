use ironseq::testing::{Probe, SizedOnlySource, assert_collections_unordered_equal};
use ironseq::*;
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::Ordering;

#[test]
fn count_uses_reported_size_without_pulling() -> anyhow::Result<()> {
    let source = SizedOnlySource::<u64>::new(1_000_000);
    let opened = source.open_counter();
    let seq = Seq::from_source(source);

    assert_eq!(seq.count()?, 1_000_000);
    assert!(!seq.is_empty()?);
    assert_eq!(opened.load(Ordering::SeqCst), 0);

    assert!(seq.to_vec().is_err(), "the source refuses iteration");
    Ok(())
}

#[test]
fn count_falls_back_to_a_pass() -> anyhow::Result<()> {
    let probe = Probe::new();
    let seq = probe.attach(&Seq::range(0, 25)).filter(|x| x % 5 == 0);
    assert_eq!(seq.count()?, 5);
    assert_eq!(probe.pulled(), 25);
    assert_eq!(Seq::range(0, 25).count_where(|x| x % 5 == 0)?, 5);
    Ok(())
}

#[test]
fn element_at_uses_indexed_access() -> anyhow::Result<()> {
    let huge = Seq::range(0, 4_000_000_000);
    assert_eq!(huge.element_at(3_999_999_999)?, Some(3_999_999_999));
    assert_eq!(huge.element_at_from_end(0)?, Some(3_999_999_999));
    assert_eq!(huge.element_at_from_end(9)?, Some(3_999_999_990));
    assert_eq!(huge.last()?, Some(3_999_999_999));
    assert_eq!(huge.element_at(4_000_000_000)?, None);
    Ok(())
}

#[test]
fn element_at_from_end_with_the_largest_index() -> anyhow::Result<()> {
    assert_eq!(Seq::range(0, 10).element_at_from_end(usize::MAX)?, None);
    assert_eq!(Seq::range(0, 10).element_at_from_end(9)?, Some(0));
    assert_eq!(Seq::range(0, 10).element_at_from_end(10)?, None);
    assert_eq!(Seq::from_fn(|| 0..3).element_at_from_end(usize::MAX)?, None);
    Ok(())
}

#[test]
fn element_at_on_unindexed_sources() -> anyhow::Result<()> {
    let seq = Seq::from_fn(|| 10..20);
    assert_eq!(seq.element_at(3)?, Some(13));
    assert_eq!(seq.element_at(10)?, None);
    assert_eq!(seq.element_at_or(10, -1)?, -1);
    assert_eq!(seq.element_at_from_end(0)?, Some(19));
    assert_eq!(seq.element_at_from_end(2)?, Some(17));
    assert_eq!(seq.element_at_from_end(10)?, None);
    Ok(())
}

#[test]
fn single_element_rules() -> anyhow::Result<()> {
    assert_eq!(Seq::of([5]).single()?, 5);
    assert!(matches!(
        Seq::<i32>::empty().single(),
        Err(SeqError::NotExactlyOne { found: "none" })
    ));
    assert!(matches!(
        Seq::of([1, 2]).single(),
        Err(SeqError::NotExactlyOne { found: "more than one" })
    ));
    assert_eq!(Seq::of([1, 2]).single_or_none()?, None);
    assert_eq!(Seq::of([7]).single_or_none()?, Some(7));

    let probe = Probe::new();
    let _ = probe.attach(&Seq::range(0, 1_000)).single();
    assert_eq!(probe.pulled(), 1);
    Ok(())
}

#[test]
fn extremes_of_empty_sequences_are_none() -> anyhow::Result<()> {
    let none = Seq::<i32>::empty();
    assert_eq!(none.min()?, None);
    assert_eq!(none.max()?, None);
    assert_eq!(none.reduce(|a, b| a + b)?, None);
    assert_eq!(none.first()?, None);
    assert_eq!(none.last()?, None);

    let xs = Seq::of([4, 9, 1, 9, 1]);
    assert_eq!(xs.min()?, Some(1));
    assert_eq!(xs.max()?, Some(9));
    Ok(())
}

#[test]
fn key_extremes_keep_the_first_among_ties() -> anyhow::Result<()> {
    let words = Seq::of(["bb", "a", "cc", "d"]);
    assert_eq!(words.min_by_key(|w| w.len())?, Some("a"));
    assert_eq!(words.max_by_key(|w| w.len())?, Some("bb"));
    assert_eq!(words.max_by(|a, b| a.cmp(b))?, Some("d"));
    Ok(())
}

#[test]
fn fold_is_left_to_right() -> anyhow::Result<()> {
    let xs = Seq::of([1, 2, 3]);
    assert_eq!(xs.fold(String::new(), |acc, x| format!("{acc}{x}"))?, "123");
    assert_eq!(xs.fold(0, |acc, x| acc * 10 + x)?, 123);
    assert_eq!(
        xs.fold_indexed(Vec::new(), |i, mut acc, x| {
            acc.push((i, x));
            acc
        })?,
        vec![(0, 1), (1, 2), (2, 3)]
    );
    assert_eq!(xs.reduce(|a, b| a - b)?, Some(-4));
    Ok(())
}

#[test]
fn searches() -> anyhow::Result<()> {
    let xs = Seq::of([3, 8, 5, 8]);
    assert_eq!(xs.first()?, Some(3));
    assert_eq!(xs.last()?, Some(8));
    assert_eq!(xs.first_where(|x| *x > 4)?, Some(8));
    assert_eq!(xs.last_where(|x| *x < 8)?, Some(5));
    assert_eq!(xs.index_of(&8)?, Some(1));
    assert_eq!(xs.index_of(&9)?, None);
    assert!(xs.contains(&5)?);
    assert!(xs.any(|x| *x == 3)?);
    assert!(xs.all(|x| *x > 2)?);
    assert!(xs.none(|x| *x > 8)?);
    assert!(Seq::<i32>::empty().all(|_| false)?);
    assert!(Seq::<i32>::empty().is_empty()?);
    assert!(!Seq::range(0, 10).filter(|x| *x > 8).is_empty()?);
    Ok(())
}

#[test]
fn any_short_circuits() -> anyhow::Result<()> {
    let probe = Probe::new();
    assert!(probe.attach(&Seq::range(0, 100)).any(|x| *x == 4)?);
    assert_eq!(probe.pulled(), 5);
    Ok(())
}

#[test]
fn collections() -> anyhow::Result<()> {
    let xs = Seq::of([3, 1, 3, 2]);
    assert_eq!(xs.to_vec()?, vec![3, 1, 3, 2]);
    assert_eq!(xs.to_btree_set()?, BTreeSet::from([1, 2, 3]));
    assert_eq!(xs.to_set()?.len(), 3);

    let (small, big) = xs.partition_by(|x| *x < 3)?;
    assert_eq!(small, vec![1, 2]);
    assert_eq!(big, vec![3, 3]);

    assert_eq!(xs.joining(", ")?, "3, 1, 3, 2");
    assert_eq!(Seq::<i32>::empty().joining(", ")?, "");
    Ok(())
}

#[test]
fn maps_and_frequency() -> anyhow::Result<()> {
    let rows = Seq::of([("a", 1), ("b", 2), ("a", 3)]);

    let last_wins = rows.to_map(|r| r.0, |r| r.1)?;
    assert_eq!(last_wins, HashMap::from([("a", 3), ("b", 2)]));

    let summed = rows.to_map_with(|r| r.0, |r| r.1, |x, y| x + y)?;
    assert_eq!(summed, HashMap::from([("a", 4), ("b", 2)]));

    let by_key = rows.associate_by(|r| r.0)?;
    assert_eq!(by_key.get("a"), Some(&("a", 3)));

    let freq = Seq::of(["x", "y", "x", "x"]).frequency()?;
    assert_eq!(freq, HashMap::from([("x", 3), ("y", 1)]));
    Ok(())
}

#[test]
fn linked_maps_keep_first_seen_order() -> anyhow::Result<()> {
    let rows = Seq::of([("b", 1), ("a", 2), ("b", 3), ("c", 4)]);

    let linked = rows.to_linked_map(|r| r.0, |r| r.1)?;
    assert_eq!(linked.keys().copied().collect::<Vec<_>>(), vec!["b", "a", "c"]);
    assert_eq!(linked.get(&"b"), Some(&3));

    let freq = Seq::of(["y", "x", "y", "z", "y"]).frequency_ordered()?;
    assert_eq!(
        freq.iter().map(|(k, n)| (*k, *n)).collect::<Vec<_>>(),
        vec![("y", 3), ("x", 1), ("z", 1)]
    );
    Ok(())
}

#[test]
fn associate_with_keys_by_element() -> anyhow::Result<()> {
    let lens = Seq::of(["kiwi", "fig", "kiwi"]).associate_with(|w| w.len())?;
    assert_eq!(lens, HashMap::from([("kiwi", 4), ("fig", 3)]));
    Ok(())
}

#[test]
fn contains_all_stops_once_everything_is_found() -> anyhow::Result<()> {
    let probe = Probe::new();
    let xs = probe.attach(&Seq::range(0, 100));
    assert!(xs.contains_all([3, 1])?);
    assert_eq!(probe.pulled(), 4);

    probe.reset();
    assert!(xs.contains_all(Vec::new())?);
    assert_eq!(probe.pulled(), 0);

    assert!(!xs.contains_all([5, 500])?);
    Ok(())
}

#[test]
fn selector_extremes_and_defaults() -> anyhow::Result<()> {
    let words = Seq::of(["pear", "fig", "banana"]);
    assert_eq!(words.min_of(|w| w.len())?, Some(3));
    assert_eq!(words.max_of(|w| w.len())?, Some(6));
    assert_eq!(Seq::<&str>::empty().max_of(|w| w.len())?, None);

    assert_eq!(words.first_or("none")?, "pear");
    assert_eq!(words.last_or("none")?, "banana");
    assert_eq!(Seq::<&str>::empty().first_or("none")?, "none");
    assert_eq!(Seq::<&str>::empty().last_or("none")?, "none");
    Ok(())
}

#[test]
fn unzip_and_side_effects() -> anyhow::Result<()> {
    let (names, ids) = Seq::of([("a", 1), ("b", 2)]).unzip()?;
    assert_eq!(names, vec!["a", "b"]);
    assert_eq!(ids, vec![1, 2]);

    let mut seen = Vec::new();
    Seq::of(['p', 'q']).for_each_indexed(|i, c| seen.push(format!("{i}{c}")))?;
    assert_collections_unordered_equal(&seen, &["1q".to_string(), "0p".to_string()]);

    let mut total = 0;
    Seq::range(1, 4).for_each(|x| total += x)?;
    assert_eq!(total, 6);
    Ok(())
}
