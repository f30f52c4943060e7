// ============================================================================
// ripple-cells - Evaluation Scheduler
// Tiered queues, the slice-yielding runner and the settle barrier
// ============================================================================
//
// Three FIFO tiers:
//   0 — cells whose own computation was directly invalidated
//   1 — cells with consumers whose providers changed
//   2 — terminal cells queued only because they are eager
//
// Tier 0 drains completely before tier 1 is touched, and tier 1 before
// tier 2; after each single lower-tier item the runner re-checks tier 0.
//
// Queue entries are weak references and a cell's `queued_tier` field is the
// source of truth. Dequeuing and tier upgrades just rewrite that field; the
// stale queue entry becomes a tombstone the runner skips. This keeps every
// queue operation O(1) and means the scheduler never pins a cell alive.
// ============================================================================

use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

use crate::core::constants::TIERS;
use crate::core::context::{with_runtime, Runtime};
use crate::primitives::cell::{read_value, CellInner};

// =============================================================================
// ENQUEUE
// =============================================================================

/// Queue a cell for evaluation at the given tier (clamped to the last tier).
///
/// A cell already queued at a lower-or-equal tier stays where it is; a cell
/// queued at a higher tier is moved up (the old entry is tombstoned).
pub(crate) fn queue_eval(cell: &Rc<CellInner>, tier: usize) {
    let tier = tier.min(TIERS - 1);

    if let Some(old) = cell.queued_tier() {
        if old as usize <= tier {
            return;
        }
    }

    cell.set_queued_tier(Some(tier as u8));
    with_runtime(|rt| {
        rt.queues[tier].borrow_mut().push_back(Rc::downgrade(cell));
    });
}

/// Pop the next live entry in priority order, or None when all queues are
/// empty. Tombstones and dead cells are discarded along the way.
fn next_scheduled() -> Option<(Rc<CellInner>, usize)> {
    with_runtime(|rt| {
        for tier in 0..TIERS {
            let mut queue = rt.queues[tier].borrow_mut();
            while let Some(weak) = queue.pop_front() {
                if let Some(cell) = weak.upgrade() {
                    if cell.queued_tier() == Some(tier as u8) {
                        cell.set_queued_tier(None);
                        return Some((cell, tier));
                    }
                }
            }
        }
        None
    })
}

// =============================================================================
// RUNNER
// =============================================================================

/// Arm the runner: drain the queues unless a batch is open or a runner is
/// already active. Idempotent; called after every assignment, definition
/// change, schedule and batch/untracked exit.
pub fn run() {
    let armed = with_runtime(|rt| {
        if rt.is_running() || rt.is_waiting() {
            return false;
        }
        rt.running.set(true);
        // The runner's own guard: an effective wait depth of one. A batch
        // opened by a definition raises it further and aborts the drain; the
        // batch's exit re-arms us.
        rt.enter_wait();
        true
    });

    if !armed {
        notify_if_settled();
        return;
    }

    struct RunnerGuard;
    impl Drop for RunnerGuard {
        fn drop(&mut self) {
            with_runtime(|rt| {
                rt.exit_wait();
                rt.running.set(false);
            });
        }
    }
    let guard = RunnerGuard;

    let mut slice_start = Instant::now();
    let mut processed = 0usize;

    loop {
        // A nested batch pushed the depth past the runner's own unit.
        if with_runtime(|rt| rt.wait_depth()) > 1 {
            tracing::trace!("runner aborted by nested batch");
            break;
        }

        let Some((cell, _tier)) = next_scheduled() else {
            break;
        };

        // Reading the cell is the unit of work. A failure is cached on the
        // cell itself; the runner moves on.
        let _ = read_value(&cell);
        processed += 1;

        if slice_start.elapsed() >= slice_time() {
            std::thread::yield_now();
            slice_start = Instant::now();
        }
    }

    drop(guard);

    if processed > 0 {
        tracing::debug!(processed, "runner drained");
    }
    notify_if_settled();
}

// =============================================================================
// SETTLE BARRIER
// =============================================================================

fn queues_idle(rt: &Runtime) -> bool {
    rt.queues.iter().enumerate().all(|(tier, queue)| {
        let mut queue = queue.borrow_mut();
        queue.retain(|weak| {
            weak.upgrade()
                .is_some_and(|cell| cell.queued_tier() == Some(tier as u8))
        });
        queue.is_empty()
    })
}

/// True when no runner is active, no batch is open and no evaluation is
/// queued.
pub fn settled() -> bool {
    with_runtime(|rt| !rt.is_running() && !rt.is_waiting() && queues_idle(rt))
}

/// Wake the settle waiters if everything is idle.
pub(crate) fn notify_if_settled() {
    let waiters = with_runtime(|rt| {
        if rt.is_running() || rt.is_waiting() || !queues_idle(rt) {
            Vec::new()
        } else {
            rt.take_settle_waiters()
        }
    });
    for waker in waiters {
        waker.wake();
    }
}

/// Future resolving once the runtime settles: all queues empty, no batch in
/// progress. Resolves immediately when already idle.
pub fn wait() -> Settle {
    Settle { _private: () }
}

/// The settle barrier returned by [`wait`].
pub struct Settle {
    _private: (),
}

impl Future for Settle {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        // Give the runner a chance to finish the outstanding work first.
        run();

        if settled() {
            Poll::Ready(())
        } else {
            with_runtime(|rt| rt.park_settle_waiter(cx.waker().clone()));
            Poll::Pending
        }
    }
}

// =============================================================================
// SLICE TUNING
// =============================================================================

/// The runner's wall-clock budget between host yields.
pub fn slice_time() -> Duration {
    with_runtime(|rt| rt.slice_time())
}

/// Tune the runner's yield budget.
pub fn set_slice_time(slice: Duration) {
    with_runtime(|rt| rt.set_slice_time(slice));
}

// =============================================================================
// TESTS
// =============================================================================
