// ============================================================================
// ripple-cells - Errors
// A cell's failure is cloneable: every consumer observes the same error
// ============================================================================

use std::fmt;
use std::rc::Rc;

use thiserror::Error;

/// Failure produced by a cell operation.
///
/// A definition failure is cached on the cell and returned from every read
/// until the definition or value is reassigned. The payload is reference
/// counted so the consumers of an errored cell all see the same failure.
#[derive(Debug, Clone, Error)]
pub enum CellError {
    /// The cell's definition read the cell itself (directly or through a
    /// chain of providers) while it was being evaluated.
    #[error("cell definition reads its own value during evaluation")]
    SelfReference,

    /// The definition reported a failure.
    #[error("{0}")]
    Failed(Rc<dyn std::error::Error + 'static>),

    /// A getter, view or adopted definition outlived its cell.
    #[error("cell no longer exists")]
    Dropped,
}

impl CellError {
    /// Wrap an arbitrary error as a definition failure.
    pub fn failure(err: impl std::error::Error + 'static) -> Self {
        Self::Failed(Rc::new(err))
    }

    /// A definition failure carrying only a message.
    pub fn msg(text: impl Into<String>) -> Self {
        Self::Failed(Rc::new(Message(text.into())))
    }

    pub fn is_self_reference(&self) -> bool {
        matches!(self, Self::SelfReference)
    }
}

#[derive(Debug)]
struct Message(String);

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for Message {}

// =============================================================================
// TESTS
// =============================================================================
