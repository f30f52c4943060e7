// ============================================================================
// ripple-cells - Dependency Tracking
// Automatic producer/consumer edge discovery during definition evaluation
// ============================================================================
//
// Edges are never declared by the user: reading a cell while another cell's
// definition is running wires the pair. Providers are held strongly (a
// consumer keeps the cells it computes from alive); consumers are weak
// back-references, so relations alone can never leak a cycle.
//
// Borrow discipline follows the collect-then-mutate pattern: consumer and
// provider lists are snapshotted before any callback or cross-cell mutation
// runs.
// ============================================================================

use std::rc::Rc;

use crate::core::context::with_runtime;
use crate::primitives::cell::CellInner;

// =============================================================================
// TRACK READ
// =============================================================================

/// Record a read of `provider`, wiring an edge to the currently evaluating
/// cell if tracking is active.
///
/// Called by the cell read path before readiness is consulted, so a consumer
/// is registered even when the read goes on to recompute.
pub(crate) fn track_read(provider: &Rc<CellInner>) {
    let current = with_runtime(|rt| {
        if rt.untrack_depth() > 0 {
            None
        } else {
            rt.current_cell()
        }
    });

    let Some(weak) = current else { return };
    let Some(consumer) = weak.upgrade() else { return };

    // A cell reading itself is handled by the evaluation guard, not the edge
    // set.
    if Rc::ptr_eq(provider, &consumer) {
        return;
    }

    add_edge(provider, &consumer);
}

// =============================================================================
// EDGE MAINTENANCE
// =============================================================================

/// Wire `consumer` to `provider` in both directions. Idempotent: an edge
/// already present (by pointer identity) is not duplicated.
pub(crate) fn add_edge(provider: &Rc<CellInner>, consumer: &Rc<CellInner>) {
    if consumer.has_provider(provider) {
        return;
    }
    consumer.push_provider(provider.clone());
    provider.push_consumer(Rc::downgrade(consumer));
}

/// Remove the edge between `provider` and `consumer` from both sides.
pub(crate) fn remove_edge(provider: &Rc<CellInner>, consumer: &Rc<CellInner>) {
    consumer.remove_provider(provider);
    provider.remove_consumer(consumer);
}

/// Drop every provider edge of `consumer`. Called before a recompute (the
/// definition rediscovers its providers) and when a definition or concrete
/// value replaces the old definition.
///
/// Returns the detached providers; a recompute keeps them alive until its
/// evaluation finishes so a definition can still reach a source it was the
/// last holder of.
pub(crate) fn detach_providers(consumer: &Rc<CellInner>) -> Vec<Rc<CellInner>> {
    let providers = consumer.take_providers();
    for provider in &providers {
        provider.remove_consumer(consumer);
    }
    providers
}

// =============================================================================
// TESTS
// =============================================================================
