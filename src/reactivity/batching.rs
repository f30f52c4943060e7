// ============================================================================
// ripple-cells - Batching and Untracked Reads
// Scoped control over when recomputation runs and when reads create edges
// ============================================================================

use crate::core::context::with_runtime;
use crate::core::error::CellError;
use crate::core::value::Value;
use crate::reactivity::scheduling::run;

// =============================================================================
// BATCH
// =============================================================================

/// Run `f` with evaluation deferred.
///
/// Assignments inside the batch ripple staleness immediately, but no stale
/// cell recomputes until the outermost batch exits. Nesting is counted, and
/// the counter survives a panic in `f` (guard pattern), so the runtime never
/// gets stuck in a half-open batch.
///
/// # Example
///
/// ```
/// use ripple_cells::{batch, cell, cell_def, Value};
/// use std::cell::Cell as Counter;
/// use std::rc::Rc;
///
/// let a = cell(1);
/// let b = cell(2);
/// let runs = Rc::new(Counter::new(0));
///
/// let c = cell_def({
///     let (a, b, runs) = (a.clone(), b.clone(), runs.clone());
///     move |_| {
///         runs.set(runs.get() + 1);
///         Ok(Value::from(
///             a.rv()?.as_i64().unwrap_or(0) + b.rv()?.as_i64().unwrap_or(0),
///         ))
///     }
/// });
///
/// assert_eq!(c.rv().unwrap(), Value::from(3));
/// assert_eq!(runs.get(), 1);
///
/// batch(|| {
///     a.wv(10);
///     b.wv(20);
/// });
///
/// // Both inputs changed; the derived cell recomputes once.
/// assert_eq!(c.rv().unwrap(), Value::from(30));
/// assert_eq!(runs.get(), 2);
/// ```
pub fn batch<T>(f: impl FnOnce() -> T) -> T {
    with_runtime(|rt| rt.enter_wait());

    struct BatchGuard;
    impl Drop for BatchGuard {
        fn drop(&mut self) {
            with_runtime(|rt| rt.exit_wait());
            // The decrement is a drain attempt; run() no-ops unless this was
            // the outermost scope.
            run();
        }
    }

    let _guard = BatchGuard;
    f()
}

// =============================================================================
// UNTRACKED
// =============================================================================

/// Run `f` with dependency tracking suspended.
///
/// Reads inside the scope return current values but create no provider
/// edges, even when a definition is evaluating. Nesting is counted and
/// panic-safe.
///
/// # Example
///
/// ```
/// use ripple_cells::{cell, cell_def, untracked, Value};
///
/// let a = cell(1);
/// let b = cell(10);
///
/// let c = cell_def({
///     let (a, b) = (a.clone(), b.clone());
///     move |_| {
///         let tracked = a.rv()?.as_i64().unwrap_or(0);
///         let peeked = untracked(|| b.rv()).unwrap_or(Value::Null);
///         Ok(Value::from(tracked + peeked.as_i64().unwrap_or(0)))
///     }
/// });
///
/// assert_eq!(c.rv().unwrap(), Value::from(11));
///
/// // b is not a provider: changing it leaves c untouched.
/// b.wv(20);
/// assert_eq!(c.rv().unwrap(), Value::from(11));
///
/// // a is a provider: changing it recomputes c with the fresh b.
/// a.wv(2);
/// assert_eq!(c.rv().unwrap(), Value::from(22));
/// ```
pub fn untracked<T>(f: impl FnOnce() -> T) -> T {
    with_runtime(|rt| rt.enter_untracked());

    struct UntrackGuard;
    impl Drop for UntrackGuard {
        fn drop(&mut self) {
            with_runtime(|rt| rt.exit_untracked());
            run();
        }
    }

    let _guard = UntrackGuard;
    f()
}

// =============================================================================
// FV - Final value unwrapping
// =============================================================================

/// Resolve a value to its final form: while the value is a cell reference,
/// read it. With `unwrap_bundle`, a bundle resolves to its deep plain
/// snapshot.
pub fn fv(value: &Value, unwrap_bundle: bool) -> Result<Value, CellError> {
    let mut current = value.clone();
    loop {
        match current {
            Value::Cell(c) => current = c.rv()?,
            Value::Bundle(b) if unwrap_bundle => return Ok(b.snapshot()),
            other => return Ok(other),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
