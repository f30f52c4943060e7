//! ripple-cells benchmark suite
//!
//! Covers the hot paths: cell reads/writes, ripple through chains and
//! diamonds, batching, and bundle operations.
//!
//! ```bash
//! cargo bench                 # everything
//! cargo bench -- "cell/"      # cell primitives only
//! cargo bench -- "ripple/"    # propagation
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ripple_cells::{batch, bundle, cell, cell_def, cloned, Cell, Value};

// =============================================================================
// CELL PRIMITIVES
// =============================================================================

fn cell_operations(c: &mut Criterion) {
    let mut g = c.benchmark_group("cell");

    g.bench_function("create", |b| b.iter(|| black_box(cell(0i64))));

    let read_cell = cell(42i64);
    g.bench_function("rv", |b| b.iter(|| black_box(read_cell.rv())));

    g.bench_function("peek", |b| b.iter(|| black_box(read_cell.peek())));

    let write_cell = cell(0i64);
    let mut i = 0i64;
    g.bench_function("wv", |b| {
        b.iter(|| {
            write_cell.wv(black_box(i));
            i = i.wrapping_add(1);
        })
    });

    // The equality check should make this nearly free.
    let same_cell = cell(42i64);
    g.bench_function("wv_same_value", |b| b.iter(|| same_cell.wv(black_box(42i64))));

    g.finish();
}

// =============================================================================
// DERIVED CHAINS AND DIAMONDS
// =============================================================================

fn chain(depth: usize) -> (Cell, Cell) {
    let head = cell(0i64);
    let mut tail = head.clone();
    for _ in 0..depth {
        tail = cell_def(cloned!(tail => move |_| {
            Ok(Value::from(tail.rv()?.as_i64().unwrap_or(0) + 1))
        }));
    }
    (head, tail)
}

fn ripple_operations(c: &mut Criterion) {
    let mut g = c.benchmark_group("ripple");

    for depth in [10usize, 100] {
        let (head, tail) = chain(depth);
        let _ = tail.rv();
        let mut i = 0i64;
        g.bench_with_input(BenchmarkId::new("chain_write_read", depth), &depth, |b, _| {
            b.iter(|| {
                head.wv(black_box(i));
                i = i.wrapping_add(1);
                black_box(tail.rv())
            })
        });
    }

    // Cached read after the chain settled.
    let (_head, tail) = chain(100);
    let _ = tail.rv();
    g.bench_function("chain_cached_read", |b| b.iter(|| black_box(tail.rv())));

    // Diamond: one write, one joined read.
    let a = cell(1i64);
    let left = cell_def(cloned!(a => move |_| {
        Ok(Value::from(a.rv()?.as_i64().unwrap_or(0) + 10))
    }));
    let right = cell_def(cloned!(a => move |_| {
        Ok(Value::from(a.rv()?.as_i64().unwrap_or(0) * 10))
    }));
    let join = cell_def(cloned!(left, right => move |_| {
        Ok(Value::from(
            left.rv()?.as_i64().unwrap_or(0) + right.rv()?.as_i64().unwrap_or(0),
        ))
    }));
    let _ = join.rv();
    let mut i = 0i64;
    g.bench_function("diamond_write_read", |b| {
        b.iter(|| {
            a.wv(black_box(i));
            i = i.wrapping_add(1);
            black_box(join.rv())
        })
    });

    g.finish();
}

// =============================================================================
// BATCHING
// =============================================================================

fn batch_operations(c: &mut Criterion) {
    let mut g = c.benchmark_group("batch");

    let sources: Vec<Cell> = (0..10).map(|i| cell(i as i64)).collect();
    let total = {
        let sources = sources.clone();
        cell_def(move |_| {
            let mut sum = 0i64;
            for s in &sources {
                sum += s.rv()?.as_i64().unwrap_or(0);
            }
            Ok(Value::from(sum))
        })
    };
    let _ = total.rv();

    let mut i = 0i64;
    g.bench_function("ten_writes_batched", |b| {
        b.iter(|| {
            batch(|| {
                for s in &sources {
                    s.wv(black_box(i));
                    i = i.wrapping_add(1);
                }
            });
            black_box(total.rv())
        })
    });

    let mut j = 0i64;
    g.bench_function("ten_writes_unbatched", |b| {
        b.iter(|| {
            for s in &sources {
                s.wv(black_box(j));
                j = j.wrapping_add(1);
            }
            black_box(total.rv())
        })
    });

    g.finish();
}

// =============================================================================
// BUNDLES
// =============================================================================

fn bundle_operations(c: &mut Criterion) {
    let mut g = c.benchmark_group("bundle");

    g.bench_function("create_10", |b| {
        b.iter(|| black_box(bundle(Value::list(0..10i64))))
    });

    let p = bundle(Value::list([1i64, 2, 3, 4, 5]));
    g.bench_function("member_read", |b| b.iter(|| black_box(p.at(2))));

    g.bench_function("snapshot_5", |b| b.iter(|| black_box(p.snapshot())));

    let q = bundle(Value::list([0i64]));
    g.bench_function("push_pop", |b| {
        b.iter(|| {
            q.push(black_box(1i64));
            black_box(q.pop())
        })
    });

    let o = bundle(Value::map([("x", 1i64)]));
    let mut i = 0i64;
    g.bench_function("object_set", |b| {
        b.iter(|| {
            o.set("x", black_box(i));
            i = i.wrapping_add(1);
        })
    });

    g.finish();
}

criterion_group!(
    benches,
    cell_operations,
    ripple_operations,
    batch_operations,
    bundle_operations
);
criterion_main!(benches);
