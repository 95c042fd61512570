use ironseq::testing::{assert_collections_unordered_equal, assert_seq_yields};
use ironseq::*;
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Clone, Debug, PartialEq)]
struct Person {
    name: &'static str,
    age: Option<u32>,
}

fn people() -> Seq<Person> {
    Seq::of([
        Person { name: "ann", age: Some(20) },
        Person { name: "bob", age: Some(18) },
        Person { name: "cid", age: Some(20) },
        Person { name: "dee", age: None },
    ])
}

fn names(s: &Seq<Person>) -> anyhow::Result<Vec<&'static str>> {
    Ok(s.map(|p| p.name).to_vec()?)
}

#[test]
fn nulls_last_and_nulls_first() -> anyhow::Result<()> {
    let last = people().sorted_by_nullable_key(|p| p.age, SortSpec::asc());
    assert_eq!(names(&last)?, vec!["bob", "ann", "cid", "dee"]);

    let first = people().sorted_by_nullable_key(|p| p.age, SortSpec::asc().nulls_first());
    assert_eq!(names(&first)?, vec!["dee", "bob", "ann", "cid"]);

    let desc = people().sorted_by_nullable_key(|p| p.age, SortSpec::desc());
    assert_eq!(names(&desc)?, vec!["ann", "cid", "bob", "dee"]);
    Ok(())
}

#[test]
fn plain_options_sort_the_same_way() -> anyhow::Result<()> {
    let ages = Seq::of([Some(20), Some(18), Some(20), None]);
    let asc = ages.sorted_by_nullable_key(|a| *a, SortSpec::asc());
    assert_seq_yields(&asc, &[Some(18), Some(20), Some(20), None])?;
    let first = ages.sorted_by_nullable_key(|a| *a, SortSpec::asc().nulls_first());
    assert_seq_yields(&first, &[None, Some(18), Some(20), Some(20)])?;
    Ok(())
}

#[test]
fn rules_apply_in_priority_order() -> anyhow::Result<()> {
    let by_age_desc_then_name_desc = people().sorted_by_rules(vec![
        OrderingRule::by_nullable(|p: &Person| p.age, SortSpec::desc()),
        OrderingRule::by_key(|p: &Person| p.name, SortOrder::Desc),
    ]);
    assert_eq!(names(&by_age_desc_then_name_desc)?, vec!["cid", "ann", "bob", "dee"]);

    let chained = OrderingRule::by_nullable(|p: &Person| p.age, SortSpec::asc())
        .then(OrderingRule::by_key(|p: &Person| p.name, SortOrder::Desc));
    assert_eq!(names(&people().sorted_by_rules(vec![chained]))?, vec!["bob", "cid", "ann", "dee"]);
    Ok(())
}

#[test]
fn key_sorts_are_stable() -> anyhow::Result<()> {
    let pairs = Seq::of([(2, 'a'), (1, 'b'), (2, 'c'), (1, 'd')]);
    let sorted = pairs.sorted_by_key(|p| p.0, SortOrder::Asc);
    assert_seq_yields(&sorted, &[(1, 'b'), (1, 'd'), (2, 'a'), (2, 'c')])?;
    let desc = pairs.sorted_by_key(|p| p.0, SortOrder::Desc);
    assert_seq_yields(&desc, &[(2, 'a'), (2, 'c'), (1, 'b'), (1, 'd')])?;
    Ok(())
}

#[test]
fn natural_orders() -> anyhow::Result<()> {
    let xs = Seq::of([3, 1, 2]);
    assert_seq_yields(&xs.sorted(), &[1, 2, 3])?;
    assert_seq_yields(&xs.sorted_desc(), &[3, 2, 1])?;
    assert_seq_yields(&xs.sorted_by(|a, b| (a % 2).cmp(&(b % 2))), &[2, 3, 1])?;
    assert_seq_yields(&xs.reversed(), &[2, 1, 3])?;
    Ok(())
}

#[test]
fn numeric_sort_over_json_values() -> anyhow::Result<()> {
    let vals = Seq::of([json!(3), json!(null), json!(1.5), json!(2)]);
    let sorted = vals.sorted_numeric(SortSpec::asc()).to_vec()?;
    assert_eq!(sorted, vec![json!(1.5), json!(2), json!(3), json!(null)]);
    Ok(())
}

#[test]
fn numeric_sort_fails_at_first_pull_on_non_numbers() {
    let mixed = Seq::of([json!(1), json!("two")]);
    let sorted = mixed.sorted_numeric(SortSpec::asc());
    match sorted.to_vec() {
        Err(SeqError::TypeMismatch { operation, .. }) => assert_eq!(operation, "sorted_numeric"),
        other => panic!("expected a type mismatch, got {other:?}"),
    }
}

#[test]
fn seeded_shuffle_is_a_repeatable_permutation() -> anyhow::Result<()> {
    let xs = Seq::range(0, 50);
    let a = xs.shuffled_with_seed(42).to_vec()?;
    let b = xs.shuffled_with_seed(42).to_vec()?;
    assert_eq!(a, b);
    assert_collections_unordered_equal(&a, &xs.to_vec()?);

    let random = xs.shuffled().to_vec()?;
    assert_collections_unordered_equal(&random, &xs.to_vec()?);
    Ok(())
}

#[test]
fn chained_eager_operators_cost_one_drain_each() -> anyhow::Result<()> {
    let drains = Arc::new(AtomicUsize::new(0));
    let (d1, d2) = (Arc::clone(&drains), Arc::clone(&drains));
    let chain = Seq::of([2, 3, 1])
        .peek_all(move |_| {
            d1.fetch_add(1, Ordering::SeqCst);
        })
        .sorted()
        .peek_all(move |_| {
            d2.fetch_add(1, Ordering::SeqCst);
        })
        .reversed();

    assert_eq!(drains.load(Ordering::SeqCst), 0);
    assert_eq!(chain.to_vec()?, vec![3, 2, 1]);
    assert_eq!(drains.load(Ordering::SeqCst), 2);
    Ok(())
}
