// ============================================================================
// ripple-cells - A Reactive Cell Runtime for Rust
// ============================================================================
//
// A dynamic directed graph of cells, each holding a stored value or a
// definition computed from other cells. Dependencies are discovered by
// reading, staleness ripples through consumers with a tri-state readiness
// model, and a tiered cooperative scheduler recomputes eager cells in the
// background. Bundles wrap nested objects/arrays as cells of cells.
// ============================================================================

pub mod bundle;
pub mod core;
#[macro_use]
mod macros;
pub mod primitives;
pub mod reactivity;

// Re-export the working surface at the crate root.
pub use crate::core::constants;
pub use crate::core::context::{is_tracking, is_untracked, is_waiting, with_runtime, Runtime};
pub use crate::core::error::CellError;
pub use crate::core::value::{type_of, Value};

pub use crate::primitives::cell::{
    cell, cell_def, cell_with, Cell, CellOptions, DefSource, Definition, Getter, Setter,
};
pub use crate::primitives::view::ReadOnly;

pub use crate::reactivity::batching::{batch, fv, untracked};
pub use crate::reactivity::compare::Compare;
pub use crate::reactivity::scheduling::{
    run, set_slice_time, settled, slice_time, wait, Settle,
};

pub use crate::bundle::{bundle, bundle_with, update, Bundle};

// =============================================================================
// TESTS
// =============================================================================
