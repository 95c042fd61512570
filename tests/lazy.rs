use ironseq::testing::Probe;
use ironseq::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[test]
fn chaining_pulls_nothing() -> anyhow::Result<()> {
    let probe = Probe::new();
    let head = probe.attach(&Seq::range(0, 100));
    let other = Seq::range(50, 150);

    let chain = head
        .map(|x| x + 1)
        .filter(|x| x % 2 == 0)
        .flat_map(|x| vec![x, x])
        .distinct()
        .skip(1)
        .limit(40)
        .take_while(|x| *x < 90)
        .drop_while(|x| *x < 4)
        .peek(|_| {})
        .concat(&other)
        .intersect(&other)
        .union(&other)
        .minus(&Seq::of([60, 61]))
        .slice(0, 30)?
        .slice_indices([0, 2, 4])
        .sorted()
        .reversed()
        .shuffled();
    let windows = chain.windowed(2, 1, true)?.chunked(2)?;
    let groups = chain.group_by(|x| x % 3).value_stream(|s| s.count());

    assert_eq!(probe.pulled(), 0);

    let _cursor = windows.cursor();
    assert_eq!(probe.pulled(), 0, "opening a cursor must not pull");

    assert!(!groups.is_materialized());
    assert_eq!(probe.pulled(), 0);
    Ok(())
}

#[test]
fn take_while_pulls_exactly_one_failing_probe() -> anyhow::Result<()> {
    let probe = Probe::new();
    let n = probe
        .attach(&Seq::range(1, 101))
        .take_while(|x| *x <= 10)
        .count()?;
    assert_eq!(n, 10);
    assert_eq!(probe.pulled(), 11);
    Ok(())
}

#[test]
fn chunked_pulls_one_window_at_a_time() -> anyhow::Result<()> {
    let probe = Probe::new();
    let chunks = probe.attach(&Seq::range(0, 10)).chunked(3)?;

    let mut cur = chunks.cursor();
    assert_eq!(probe.pulled(), 0);

    assert_eq!(cur.next()?, vec![0, 1, 2]);
    assert_eq!(probe.pulled(), 3);

    assert_eq!(cur.next()?, vec![3, 4, 5]);
    assert_eq!(probe.pulled(), 6);
    Ok(())
}

#[test]
fn zip_stops_at_the_shorter_side() -> anyhow::Result<()> {
    let left = Probe::new();
    let right = Probe::new();
    let pairs = left
        .attach(&Seq::range(0, 10))
        .zip(&right.attach(&Seq::range(100, 105)));

    assert_eq!(pairs.count()?, 5);
    assert_eq!(left.pulled(), 5);
    assert_eq!(right.pulled(), 5);
    Ok(())
}

#[test]
fn zip_with_joins_by_position() -> anyhow::Result<()> {
    let names = Seq::of(["a", "b", "c"]);
    let joined = names
        .zip_with(&Seq::range(1, 100), |n, i| format!("{n}{i}"))
        .to_vec()?;
    assert_eq!(joined, vec!["a1", "b2", "c3"]);
    Ok(())
}

#[test]
fn has_next_is_idempotent_and_holds_the_look_ahead() -> anyhow::Result<()> {
    let probe = Probe::new();
    let odds = probe.attach(&Seq::range(0, 10)).filter(|x| x % 2 == 1);

    let mut cur = odds.cursor();
    assert!(cur.has_next()?);
    assert!(cur.has_next()?);
    assert!(cur.has_next()?);
    assert_eq!(probe.pulled(), 2);
    assert_eq!(cur.next()?, 1);
    assert_eq!(probe.pulled(), 2);
    Ok(())
}

#[test]
fn next_past_the_end_is_an_error() {
    let mut cur = Seq::<i32>::empty().cursor();
    assert!(matches!(cur.next(), Err(SeqError::ExhaustedSequence)));

    let mut cur = Seq::of([1]).map(|x| x * 2).cursor();
    assert_eq!(cur.next().ok(), Some(2));
    assert!(!cur.has_next().unwrap_or(true));
    assert!(matches!(cur.next(), Err(SeqError::ExhaustedSequence)));
}

#[test]
fn flat_map_skips_empty_expansions() -> anyhow::Result<()> {
    let nested = Seq::from_vec(vec![vec![], vec![1, 2], vec![], vec![], vec![3]]);
    assert_eq!(nested.flat_map(|v| v).to_vec()?, vec![1, 2, 3]);

    let maybe = Seq::of(["1", "x", "3"]).filter_map(|s| s.parse::<i32>().ok());
    assert_eq!(maybe.to_vec()?, vec![1, 3]);
    Ok(())
}

#[test]
fn of_drains_its_input_while_from_fn_waits() -> anyhow::Result<()> {
    let produced = Arc::new(AtomicUsize::new(0));
    let tally = Arc::clone(&produced);
    let eager = Seq::of((0..4).inspect(move |_| {
        tally.fetch_add(1, Ordering::SeqCst);
    }));
    assert_eq!(produced.load(Ordering::SeqCst), 4);

    produced.store(0, Ordering::SeqCst);
    let tally = Arc::clone(&produced);
    let deferred = Seq::from_fn(move || {
        let tally = Arc::clone(&tally);
        (0..4).inspect(move |_| {
            tally.fetch_add(1, Ordering::SeqCst);
        })
    });
    assert_eq!(produced.load(Ordering::SeqCst), 0);

    assert_eq!(deferred.to_vec()?, eager.to_vec()?);
    assert_eq!(produced.load(Ordering::SeqCst), 4);
    Ok(())
}

#[test]
fn every_terminal_call_is_a_fresh_pass() -> anyhow::Result<()> {
    let opened = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&opened);
    let seq = Seq::from_fn(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        vec![1i64, 2, 3]
    })
    .map(|x| x * 10);

    assert_eq!(opened.load(Ordering::SeqCst), 0);
    assert_eq!(seq.to_vec()?, vec![10, 20, 30]);
    assert_eq!(seq.sum()?, 60i64);
    assert_eq!(opened.load(Ordering::SeqCst), 2);
    Ok(())
}

#[test]
fn infinite_sources_are_fine_when_bounded() -> anyhow::Result<()> {
    let powers = Seq::iterate(1u64, |x| x * 2).limit(5).to_vec()?;
    assert_eq!(powers, vec![1, 2, 4, 8, 16]);

    let first_big = Seq::iterate(1u64, |x| x * 3).first_where(|x| *x > 100)?;
    assert_eq!(first_big, Some(243));
    Ok(())
}

#[test]
fn eager_operators_drain_on_first_pull_only() -> anyhow::Result<()> {
    let drains = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&drains);
    let sorted = Seq::of([3, 1, 2])
        .peek_all(move |all| {
            assert_eq!(all.len(), 3);
            seen.fetch_add(1, Ordering::SeqCst);
        })
        .sorted()
        .reversed();

    assert_eq!(drains.load(Ordering::SeqCst), 0);
    assert_eq!(sorted.to_vec()?, vec![3, 2, 1]);
    assert_eq!(drains.load(Ordering::SeqCst), 1);
    Ok(())
}

#[test]
fn then_apply_hands_one_batch_to_the_collaborator() -> anyhow::Result<()> {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);
    let fetched = Seq::of([1u32, 2, 3])
        .then_apply(move |ids| {
            seen.fetch_add(1, Ordering::SeqCst);
            Ok(ids.into_iter().map(|id| (id, format!("row-{id}"))))
        })
        .map(|(_, row)| row);

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(fetched.to_vec()?, vec!["row-1", "row-2", "row-3"]);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let failing = Seq::of([1u32]).then_apply(|_| -> anyhow::Result<Vec<u32>> {
        anyhow::bail!("backend unavailable")
    });
    assert!(matches!(failing.to_vec(), Err(SeqError::Collaborator(_))));
    Ok(())
}

#[test]
fn iter_view_yields_results() -> anyhow::Result<()> {
    let mut total = 0;
    for x in &Seq::range(1, 5) {
        total += x?;
    }
    assert_eq!(total, 10);

    let collected: Result<Vec<i64>> = Seq::range(0, 3).iter().collect();
    assert_eq!(collected?, vec![0, 1, 2]);
    Ok(())
}
