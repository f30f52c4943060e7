// The universal guarantees of the cell graph: edge symmetry, minimal
// recomputation, batching, untracked isolation, laziness, eagerness,
// identity stability, error propagation, self-reference rejection and
// structural bundle ripple.

mod common;

use common::block_on;
use ripple_cells::{
    batch, bundle, cell, cell_def, cell_with, cloned, untracked, wait, CellError,
    CellOptions, Compare, DefSource, Value,
};
use std::cell::Cell as Counter;
use std::rc::Rc;

fn int(cell: &ripple_cells::Cell) -> i64 {
    cell.rv().unwrap().as_i64().unwrap()
}

#[test]
fn edges_stay_symmetric_outside_evaluation() {
    let a = cell(1);
    let b = cell(2);
    let c = cell_def(cloned!(a, b => move |_| {
        Ok(Value::from(
            a.rv()?.as_i64().unwrap_or(0) + b.rv()?.as_i64().unwrap_or(0),
        ))
    }));

    let _ = c.rv();

    // Every provider of c lists c as a consumer, and vice versa.
    for provider in c.providers() {
        assert!(provider.consumers().iter().any(|x| x.ptr_eq(&c)));
    }
    for source in [&a, &b] {
        for consumer in source.consumers() {
            assert!(consumer.providers().iter().any(|x| x.ptr_eq(source)));
        }
    }

    // Still symmetric after a write forces a re-evaluation.
    a.wv(10);
    let _ = c.rv();
    assert_eq!(c.providers().len(), 2);
    for provider in c.providers() {
        assert!(provider.consumers().iter().any(|x| x.ptr_eq(&c)));
    }
}

#[test]
fn unchanged_intermediate_shields_the_tail() {
    // a -> b -> c where b's predicate treats same-x values as unchanged. A
    // write to a that is x-equivalent must leave c's run count alone.
    let a = cell(Value::map([("x", 1), ("noise", 0)]));
    let b = cell_with(CellOptions {
        def: Some(DefSource::func(cloned!(a => move |_| {
            Ok(Value::map([(
                "x",
                a.rv()?.get("x").cloned().unwrap_or(Value::Null),
            )]))
        }))),
        compare: Some(Compare::by_key("x")),
        ..Default::default()
    });
    let runs_c = Rc::new(Counter::new(0));
    let c = cell_def(cloned!(b, runs_c => move |_| {
        runs_c.set(runs_c.get() + 1);
        Ok(b.rv()?.get("x").cloned().unwrap_or(Value::Null))
    }));

    assert_eq!(int(&c), 1);
    assert_eq!(runs_c.get(), 1);

    // Different value, same x: b recomputes, c must not.
    a.wv(Value::map([("x", 1), ("noise", 99)]));
    assert_eq!(int(&c), 1);
    assert_eq!(runs_c.get(), 1);

    a.wv(Value::map([("x", 2), ("noise", 99)]));
    assert_eq!(int(&c), 2);
    assert_eq!(runs_c.get(), 2);
}

#[test]
fn batch_bounds_recomputation_to_one() {
    let a = cell(1);
    let b = cell(2);
    let runs = Rc::new(Counter::new(0));
    let c = cell_def(cloned!(a, b, runs => move |_| {
        runs.set(runs.get() + 1);
        Ok(Value::from(
            a.rv()?.as_i64().unwrap_or(0) + b.rv()?.as_i64().unwrap_or(0),
        ))
    }));

    let _ = c.rv();
    assert_eq!(runs.get(), 1);

    batch(|| {
        a.wv(5);
        b.wv(6);
        a.wv(7);
    });

    assert_eq!(int(&c), 13);
    assert_eq!(runs.get(), 2);
}

#[test]
fn untracked_reads_leave_no_edge_behind() {
    let tracked = cell(1);
    let peeked = cell(2);
    let reader = cell_def(cloned!(tracked, peeked => move |_| {
        let a = tracked.rv()?.as_i64().unwrap_or(0);
        let b = untracked(|| peeked.rv())?.as_i64().unwrap_or(0);
        Ok(Value::from(a + b))
    }));

    let _ = reader.rv();

    assert_eq!(reader.providers().len(), 1);
    assert!(reader.providers()[0].ptr_eq(&tracked));
    assert!(peeked.consumers().is_empty());
}

#[test]
fn lazy_cells_evaluate_only_on_read() {
    let runs = Rc::new(Counter::new(0));
    let a = cell(1);
    let b = cell_def(cloned!(a, runs => move |_| {
        runs.set(runs.get() + 1);
        a.rv()
    }));

    // Zero evaluations before the first read.
    assert_eq!(runs.get(), 0);

    let _ = b.rv();
    assert_eq!(runs.get(), 1);

    // N writes, zero evaluations until the next read, then exactly one.
    for i in 0..5 {
        a.wv(i);
    }
    assert_eq!(runs.get(), 1);
    let _ = b.rv();
    assert_eq!(runs.get(), 2);
}

#[test]
fn eager_cells_evaluate_after_the_scheduler_settles() {
    let runs = Rc::new(Counter::new(0));
    let a = cell(1);
    let b = cell_with(CellOptions {
        eager: true,
        def: Some(DefSource::func(cloned!(a, runs => move |_| {
            runs.set(runs.get() + 1);
            Ok(Value::from(a.rv()?.as_i64().unwrap_or(0) * 2))
        }))),
        ..Default::default()
    });

    block_on(wait());
    assert_eq!(runs.get(), 1);

    a.wv(21);
    block_on(wait());
    assert_eq!(runs.get(), 2);
    assert_eq!(b.peek(), Value::from(42));
}

#[test]
fn cached_accessors_keep_their_identity() {
    let a = cell(1);

    assert!(Rc::ptr_eq(&a.getter(), &a.getter()));
    assert!(Rc::ptr_eq(&a.setter(), &a.setter()));
    assert!(a.readonly_view().ptr_eq(&a.readonly_view()));

    // The view shares the cell's getter identity too.
    assert!(Rc::ptr_eq(&a.readonly_view().getter().unwrap(), &a.getter()));
}

#[test]
fn one_failure_is_observed_by_the_whole_chain() {
    let a = cell_def(|_| Err(CellError::msg("boom")));
    let b = cell_def(cloned!(a => move |_| {
        Ok(Value::from(a.rv()?.as_i64().unwrap_or(0) + 1))
    }));
    let c = cell_def(cloned!(b => move |_| {
        Ok(Value::from(b.rv()?.as_i64().unwrap_or(0) + 1))
    }));

    assert_eq!(a.rv().unwrap_err().to_string(), "boom");
    assert_eq!(b.rv().unwrap_err().to_string(), "boom");
    assert_eq!(c.rv().unwrap_err().to_string(), "boom");

    a.set_def(|_| Ok(Value::from(42)));
    assert_eq!(int(&a), 42);
    assert_eq!(int(&b), 43);
    assert_eq!(int(&c), 44);
}

#[test]
fn self_reference_fails_without_corrupting_state() {
    let a = cell(7);
    a.set_def(cloned!(a => move |_| {
        Ok(Value::from(a.rv()?.as_i64().unwrap_or(0) + 1))
    }));

    assert!(a.rv().unwrap_err().is_self_reference());
    assert_eq!(a.peek(), Value::from(7));

    // The scheduler keeps going afterwards.
    let b = cell(1);
    b.wv(2);
    assert_eq!(int(&b), 2);
}

#[test]
fn bundle_membership_changes_wake_aggregate_consumers() {
    let p = bundle(Value::map([("x", 1)]));
    let runs = Rc::new(Counter::new(0));
    let watcher = cell_def(cloned!(p, runs => move |_| {
        runs.set(runs.get() + 1);
        p.aggregate().rv()
    }));

    let _ = watcher.rv();
    assert_eq!(runs.get(), 1);

    // Added.
    p.set("y", 2);
    let _ = watcher.rv();
    assert_eq!(runs.get(), 2);

    // Replaced.
    p.set("y", 3);
    let _ = watcher.rv();
    assert_eq!(runs.get(), 3);

    // Removed.
    p.remove("y");
    let _ = watcher.rv();
    assert_eq!(runs.get(), 4);
}
