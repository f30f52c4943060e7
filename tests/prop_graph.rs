// Model-based randomized testing: a small DAG of cells driven by random
// writes, definition swaps, batches and reads must always agree with a plain
// recursive model, and the provider/consumer relation must stay symmetric
// after every operation.

use proptest::prelude::*;
use ripple_cells::{batch, cell, Cell, Value};

const CELLS: usize = 8;

#[derive(Debug, Clone)]
enum Node {
    Val(i64),
    Sum(usize, usize),
}

#[derive(Debug, Clone)]
enum Op {
    Write { target: usize, value: i64 },
    Define { target: usize, left: usize, right: usize },
    Read { target: usize },
    BatchWrites { writes: Vec<(usize, i64)> },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..CELLS, -1_000i64..1_000).prop_map(|(target, value)| Op::Write { target, value }),
        (1..CELLS)
            .prop_flat_map(|target| (Just(target), 0..target, 0..target))
            .prop_map(|(target, left, right)| Op::Define {
                target,
                left,
                right
            }),
        (0..CELLS).prop_map(|target| Op::Read { target }),
        proptest::collection::vec((0..CELLS, -1_000i64..1_000), 1..4)
            .prop_map(|writes| Op::BatchWrites { writes }),
    ]
}

fn eval(model: &[Node], index: usize) -> i64 {
    match model[index] {
        Node::Val(v) => v,
        // Definitions only reference lower indices, so the model is acyclic.
        Node::Sum(left, right) => eval(model, left) + eval(model, right),
    }
}

fn assert_symmetric(cells: &[Cell]) -> Result<(), TestCaseError> {
    for c in cells {
        for provider in c.providers() {
            prop_assert!(
                provider.consumers().iter().any(|x| x.ptr_eq(c)),
                "provider missing back-edge"
            );
        }
        for consumer in c.consumers() {
            prop_assert!(
                consumer.providers().iter().any(|x| x.ptr_eq(c)),
                "consumer missing forward edge"
            );
        }
    }
    Ok(())
}

proptest! {
    #[test]
    fn random_graphs_agree_with_the_model(
        ops in proptest::collection::vec(op_strategy(), 1..40)
    ) {
        let cells: Vec<Cell> = (0..CELLS).map(|_| cell(0)).collect();
        let mut model: Vec<Node> = (0..CELLS).map(|_| Node::Val(0)).collect();

        for op in ops {
            match op {
                Op::Write { target, value } => {
                    cells[target].wv(value);
                    model[target] = Node::Val(value);
                }
                Op::Define { target, left, right } => {
                    let l = cells[left].clone();
                    let r = cells[right].clone();
                    cells[target].set_def(move |_| {
                        Ok(Value::from(
                            l.rv()?.as_i64().unwrap_or(0) + r.rv()?.as_i64().unwrap_or(0),
                        ))
                    });
                    model[target] = Node::Sum(left, right);
                }
                Op::Read { target } => {
                    let got = cells[target].rv().unwrap().as_i64().unwrap();
                    prop_assert_eq!(got, eval(&model, target));
                }
                Op::BatchWrites { writes } => {
                    batch(|| {
                        for (target, value) in &writes {
                            cells[*target].wv(*value);
                        }
                    });
                    for (target, value) in writes {
                        model[target] = Node::Val(value);
                    }
                }
            }
            assert_symmetric(&cells)?;
        }

        for (index, c) in cells.iter().enumerate() {
            prop_assert_eq!(
                c.rv().unwrap().as_i64().unwrap(),
                eval(&model, index),
                "cell {} diverged from the model",
                index
            );
        }
    }
}
