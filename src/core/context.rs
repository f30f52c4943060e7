// ============================================================================
// ripple-cells - Runtime
// Thread-local state shared by the tracker and the scheduler
// ============================================================================
//
// The library is single-threaded by contract, so the process-wide tracker
// and scheduler state live in one Runtime struct per thread. Everything the
// graph needs between operations is here: the currently evaluating cell, the
// untracked/batch depth counters, the three evaluation queues and the settle
// waiters.
// ============================================================================

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Weak;
use std::task::Waker;
use std::time::Duration;

use crate::core::constants::{DEFAULT_SLICE, TIERS};
use crate::primitives::cell::CellInner;

// =============================================================================
// RUNTIME
// =============================================================================

/// Per-thread reactive runtime.
pub struct Runtime {
    // =========================================================================
    // TRACKER
    // =========================================================================
    /// The cell whose definition is currently being evaluated. Reads made
    /// while this is set create provider/consumer edges.
    pub(crate) current: RefCell<Option<Weak<CellInner>>>,

    /// Reads create no edges while this is above zero.
    pub(crate) untrack_depth: Cell<u32>,

    /// The runner will not drain queues while this is above zero. The runner
    /// itself holds one unit while draining, so a nested batch pushes the
    /// depth past one and aborts it.
    pub(crate) eval_wait_depth: Cell<u32>,

    /// Origin of a self-reference failure currently unwinding. Every
    /// evaluation frame on the propagation path tears down the provider
    /// edges it wired; the marker dies with the origin's own frame.
    pub(crate) cycle_origin: Cell<Option<*const ()>>,

    // =========================================================================
    // SCHEDULER
    // =========================================================================
    /// One FIFO of weak cell references per priority tier. A cell's own
    /// `queued_tier` is the source of truth; entries that no longer match it
    /// are tombstones and get skipped.
    pub(crate) queues: [RefCell<VecDeque<Weak<CellInner>>>; TIERS],

    /// True while the runner is draining (at most one runner at a time).
    pub(crate) running: Cell<bool>,

    /// Wall-clock budget between host yields.
    pub(crate) slice: Cell<Duration>,

    /// Wakers parked on the settle barrier.
    pub(crate) settle_waiters: RefCell<Vec<Waker>>,
}

impl Runtime {
    pub fn new() -> Self {
        Self {
            current: RefCell::new(None),
            untrack_depth: Cell::new(0),
            eval_wait_depth: Cell::new(0),
            cycle_origin: Cell::new(None),
            queues: [
                RefCell::new(VecDeque::new()),
                RefCell::new(VecDeque::new()),
                RefCell::new(VecDeque::new()),
            ],
            running: Cell::new(false),
            slice: Cell::new(DEFAULT_SLICE),
            settle_waiters: RefCell::new(Vec::new()),
        }
    }

    // =========================================================================
    // TRACKER OPERATIONS
    // =========================================================================

    /// Swap in the evaluating cell, returning the previous one.
    pub(crate) fn swap_current(
        &self,
        cell: Option<Weak<CellInner>>,
    ) -> Option<Weak<CellInner>> {
        self.current.replace(cell)
    }

    pub(crate) fn current_cell(&self) -> Option<Weak<CellInner>> {
        self.current.borrow().clone()
    }

    pub fn is_tracking(&self) -> bool {
        self.untrack_depth.get() == 0 && self.current.borrow().is_some()
    }

    pub(crate) fn enter_untracked(&self) -> u32 {
        let depth = self.untrack_depth.get() + 1;
        self.untrack_depth.set(depth);
        depth
    }

    pub(crate) fn exit_untracked(&self) -> u32 {
        let depth = self.untrack_depth.get().saturating_sub(1);
        self.untrack_depth.set(depth);
        depth
    }

    pub fn untrack_depth(&self) -> u32 {
        self.untrack_depth.get()
    }

    // =========================================================================
    // EVALUATION WAIT
    // =========================================================================

    pub(crate) fn enter_wait(&self) -> u32 {
        let depth = self.eval_wait_depth.get() + 1;
        self.eval_wait_depth.set(depth);
        depth
    }

    pub(crate) fn exit_wait(&self) -> u32 {
        let depth = self.eval_wait_depth.get().saturating_sub(1);
        self.eval_wait_depth.set(depth);
        depth
    }

    pub fn wait_depth(&self) -> u32 {
        self.eval_wait_depth.get()
    }

    pub fn is_waiting(&self) -> bool {
        self.eval_wait_depth.get() > 0
    }

    // =========================================================================
    // SCHEDULER STATE
    // =========================================================================

    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    pub fn slice_time(&self) -> Duration {
        self.slice.get()
    }

    pub fn set_slice_time(&self, slice: Duration) {
        self.slice.set(slice);
    }

    pub(crate) fn park_settle_waiter(&self, waker: Waker) {
        self.settle_waiters.borrow_mut().push(waker);
    }

    pub(crate) fn take_settle_waiters(&self) -> Vec<Waker> {
        self.settle_waiters.replace(Vec::new())
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// THREAD-LOCAL ACCESS
// =============================================================================

thread_local! {
    static RUNTIME: Runtime = Runtime::new();
}

/// Access this thread's reactive runtime.
pub fn with_runtime<R>(f: impl FnOnce(&Runtime) -> R) -> R {
    RUNTIME.with(f)
}

// =============================================================================
// CONVENIENCE FUNCTIONS
// =============================================================================

/// True while a definition is being evaluated and tracking is not suspended.
pub fn is_tracking() -> bool {
    with_runtime(|rt| rt.is_tracking())
}

/// True inside an `untracked` scope.
pub fn is_untracked() -> bool {
    with_runtime(|rt| rt.untrack_depth() > 0)
}

/// True inside a `batch` scope (or while the runner holds its guard).
pub fn is_waiting() -> bool {
    with_runtime(|rt| rt.is_waiting())
}

// =============================================================================
// TESTS
// =============================================================================
