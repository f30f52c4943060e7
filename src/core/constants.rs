// ============================================================================
// ripple-cells - Constants
// Flag bits for cell state plus the public reactive type tags
// ============================================================================

use std::time::Duration;

// =============================================================================
// CELL STATE FLAGS
// =============================================================================

/// Cell's cached value (or cached error) is current.
pub const READY: u32 = 1 << 0;

/// Cell must recompute before its value can be observed.
pub const STALE: u32 = 1 << 1;

/// A distant producer changed; recompute only if an immediate provider
/// actually produced a different value.
pub const MAYBE_STALE: u32 = 1 << 2;

/// Staleness schedules the cell for background evaluation even when nothing
/// currently consumes it.
pub const EAGER: u32 = 1 << 3;

/// Cell's definition is running right now (self-reference detection).
pub const EVALUATING: u32 = 1 << 4;

// =============================================================================
// STATUS MASK
// =============================================================================

/// Mask clearing the readiness tri-state while preserving the other bits.
pub const STATUS_MASK: u32 = !(READY | STALE | MAYBE_STALE);

// =============================================================================
// REACTIVE TYPE TAGS
// =============================================================================

/// Tag identifying a scalar reactive cell.
pub const CELL_TAG: u8 = 1;

/// Tag identifying a reactive bundle.
pub const BUNDLE_TAG: u8 = 2;

// =============================================================================
// SCHEDULER
// =============================================================================

/// Number of scheduler priority tiers.
pub const TIERS: usize = 3;

/// Default wall-clock budget the runner spends before yielding to the host.
pub const DEFAULT_SLICE: Duration = Duration::from_millis(5);

// =============================================================================
// TESTS
// =============================================================================
