// ============================================================================
// ripple-cells - Read-only View
// Frozen projection of a cell: value out, nothing in
// ============================================================================
//
// The view is cached on its source cell and shares its lifetime; it keeps a
// weak back-reference so the cache is not a self-cycle. There is no mutator
// on this type at all — writing through a view is a compile-time error.
// ============================================================================

use std::fmt;
use std::rc::{Rc, Weak};

use crate::core::constants::CELL_TAG;
use crate::core::error::CellError;
use crate::core::value::Value;
use crate::primitives::cell::{getter_for, read_value, CellInner, Getter};

// =============================================================================
// READ ONLY
// =============================================================================

/// Read-only projection of a cell.
///
/// Delegates reads to the source; exposes the *same* getter closure as the
/// source so bindings wired through either see one identity.
#[derive(Clone)]
pub struct ReadOnly {
    inner: Rc<ViewInner>,
}

struct ViewInner {
    source: Weak<CellInner>,
}

impl ReadOnly {
    pub(crate) fn new(source: &Rc<CellInner>) -> Self {
        Self {
            inner: Rc::new(ViewInner {
                source: Rc::downgrade(source),
            }),
        }
    }

    fn source(&self) -> Result<Rc<CellInner>, CellError> {
        self.inner.source.upgrade().ok_or(CellError::Dropped)
    }

    /// Read the source cell's value (recomputing if stale).
    pub fn rv(&self) -> Result<Value, CellError> {
        let source = self.source()?;
        read_value(&source)
    }

    /// The source's stable getter closure.
    pub fn getter(&self) -> Result<Getter, CellError> {
        Ok(getter_for(&self.source()?))
    }

    /// The source's cached failure, if any.
    pub fn error(&self) -> Option<CellError> {
        let source = self.inner.source.upgrade()?;
        let err = source.current().err();
        err.filter(|e| !matches!(e, CellError::Dropped))
    }

    pub fn readonly(&self) -> bool {
        true
    }

    pub fn reactive_tag(&self) -> u8 {
        CELL_TAG
    }

    pub fn ptr_eq(&self, other: &ReadOnly) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Display for ReadOnly {
    /// Value coercion, same as the source cell's.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.rv() {
            Ok(value) => write!(f, "{value}"),
            Err(err) => write!(f, "<{err}>"),
        }
    }
}

impl fmt::Debug for ReadOnly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadOnly")
            .field("live", &self.inner.source.strong_count())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::cell::{cell, cell_def};

    #[test]
    fn view_delegates_reads() {
        let a = cell(5);
        let view = a.readonly_view();

        assert_eq!(view.rv().unwrap(), Value::from(5));
        a.wv(6);
        assert_eq!(view.rv().unwrap(), Value::from(6));
    }

    #[test]
    fn view_shares_the_source_getter() {
        let a = cell(1);
        let view = a.readonly_view();
        assert!(Rc::ptr_eq(&view.getter().unwrap(), &a.getter()));
    }

    #[test]
    fn view_identity_is_stable() {
        let a = cell(1);
        assert!(a.readonly_view().ptr_eq(&a.readonly_view()));
    }

    #[test]
    fn view_reports_errors_like_the_source() {
        let a = cell_def(|_| Err(CellError::msg("broken")));
        let view = a.readonly_view();

        assert_eq!(view.rv().unwrap_err().to_string(), "broken");
        assert_eq!(view.error().unwrap().to_string(), "broken");
    }

    #[test]
    fn view_is_marked_readonly() {
        let a = cell(1);
        let view = a.readonly_view();
        assert!(view.readonly());
        assert_eq!(view.reactive_tag(), crate::core::constants::CELL_TAG);
    }

    #[test]
    fn view_tracks_like_a_direct_read() {
        let a = cell(1);
        let view = a.readonly_view();
        let b = cell_def({
            move |_| Ok(Value::from(view.rv()?.as_i64().unwrap_or(0) * 2))
        });

        assert_eq!(b.rv().unwrap(), Value::from(2));
        a.wv(3);
        assert_eq!(b.rv().unwrap(), Value::from(6));
    }

    #[test]
    fn display_renders_the_value() {
        let a = cell("hi");
        assert_eq!(a.readonly_view().to_string(), "hi");
    }
}
