use ironseq::testing::{Probe, assert_seq_yields};
use ironseq::*;

#[test]
fn skip_and_limit() -> anyhow::Result<()> {
    assert_seq_yields(&Seq::range(0, 10).skip(7), &[7, 8, 9])?;
    assert_seq_yields(&Seq::range(0, 10).limit(3), &[0, 1, 2])?;
    assert_seq_yields(&Seq::range(0, 3).skip(5), &[])?;
    assert_seq_yields(&Seq::range(0, 3).limit(0), &[])?;
    Ok(())
}

#[test]
fn limit_does_not_consult_upstream_after_budget() -> anyhow::Result<()> {
    let probe = Probe::new();
    let firsts = probe.attach(&Seq::range(0, 1_000)).limit(4);
    assert_eq!(firsts.count()?, 4);
    assert_eq!(probe.pulled(), 4);
    Ok(())
}

#[test]
fn slice_is_skip_then_limit() -> anyhow::Result<()> {
    let probe = Probe::new();
    let middle = probe.attach(&Seq::range(0, 100)).slice(2, 5)?;
    assert_eq!(middle.to_vec()?, vec![2, 3, 4]);
    assert_eq!(probe.pulled(), 5);

    assert_seq_yields(&Seq::range(0, 10).sub(8, 20)?, &[8, 9])?;
    assert_seq_yields(&Seq::range(0, 10).slice(4, 4)?, &[])?;
    Ok(())
}

#[test]
fn slice_rejects_reversed_bounds_immediately() {
    let err = Seq::range(0, 10).slice(5, 2).unwrap_err();
    assert!(matches!(err, SeqError::InvalidArgument(_)));
}

#[test]
fn slice_by_index_set_keeps_upstream_order() -> anyhow::Result<()> {
    let probe = Probe::new();
    let picked = probe
        .attach(&Seq::range(0, 1_000))
        .slice_indices([7, 1, 3, 3]);
    assert_eq!(picked.to_vec()?, vec![1, 3, 7]);
    assert_eq!(probe.pulled(), 8);

    assert_seq_yields(&Seq::range(0, 5).slice_indices(Vec::new()), &[])?;
    assert_seq_yields(&Seq::range(0, 5).slice_indices([2, 40]), &[2])?;
    Ok(())
}

#[test]
fn drop_while_then_everything() -> anyhow::Result<()> {
    let rest = Seq::of([1, 2, 5, 1, 7]).drop_while(|x| *x < 3);
    assert_seq_yields(&rest, &[5, 1, 7])?;
    assert_seq_yields(&Seq::of([1, 2]).drop_while(|_| true), &[])?;
    Ok(())
}

#[test]
fn take_while_stops_at_first_failure() -> anyhow::Result<()> {
    let head = Seq::of([1, 2, 5, 1, 7]).take_while(|x| *x < 3);
    assert_seq_yields(&head, &[1, 2])?;
    Ok(())
}

#[test]
fn insert_and_append() -> anyhow::Result<()> {
    let base = Seq::of([1, 2, 3]);
    assert_seq_yields(&base.insert_at(0, 0), &[0, 1, 2, 3])?;
    assert_seq_yields(&base.insert_at(1, 99), &[1, 99, 2, 3])?;
    assert_seq_yields(&base.insert_at(3, 4), &[1, 2, 3, 4])?;
    assert_seq_yields(&base.insert_at(10, 4), &[1, 2, 3, 4])?;
    assert_seq_yields(&base.plus(4).plus(5), &[1, 2, 3, 4, 5])?;
    Ok(())
}

#[test]
fn indexed_map_and_filter() -> anyhow::Result<()> {
    let tagged = Seq::of(["a", "b", "c"]).map_indexed(|i, s| format!("{i}:{s}"));
    assert_eq!(tagged.to_vec()?, vec!["0:a", "1:b", "2:c"]);

    let evens = Seq::of(['x', 'y', 'z', 'w']).filter_indexed(|i, _| i % 2 == 0);
    assert_seq_yields(&evens, &['x', 'z'])?;
    Ok(())
}

#[test]
fn predicate_lists() -> anyhow::Result<()> {
    let preds: Vec<Predicate<i64>> = vec![Box::new(|x: &i64| x % 2 == 0), Box::new(|x: &i64| *x > 4)];
    assert_seq_yields(&Seq::range(0, 10).filter_all(preds), &[6, 8])?;

    let preds: Vec<Predicate<i64>> = vec![Box::new(|x: &i64| *x == 1), Box::new(|x: &i64| *x == 8)];
    assert_seq_yields(&Seq::range(0, 10).filter_any(preds), &[1, 8])?;

    assert_eq!(Seq::range(0, 10).filter_all(Vec::new()).count()?, 10);
    assert_eq!(Seq::range(0, 10).filter_any(Vec::new()).count()?, 0);
    assert_seq_yields(&Seq::range(0, 6).filter_not(|x| x % 3 == 0), &[1, 2, 4, 5])?;
    Ok(())
}

#[test]
fn distinct_keeps_first_occurrence() -> anyhow::Result<()> {
    assert_seq_yields(&Seq::of([3, 1, 3, 2, 1]).distinct(), &[3, 1, 2])?;
    let by_len = Seq::of(["aa", "b", "cc", "d", "eee"]).distinct_by(|s| s.len());
    assert_seq_yields(&by_len, &["aa", "b", "eee"])?;
    Ok(())
}
