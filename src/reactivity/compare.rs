// ============================================================================
// ripple-cells - Change Predicates
// Deciding whether a candidate assignment is an observable change
// ============================================================================

use std::fmt;
use std::rc::Rc;

use crate::core::value::Value;

// =============================================================================
// COMPARE
// =============================================================================

/// The change predicate attached to a cell.
///
/// Consulted on every candidate assignment with `(old, new)`; consumers are
/// notified only when it reports an observable change. The constant variants
/// preserve the boolean shorthand: `Always` notifies even for identical
/// values, `Never` stores silently.
#[derive(Clone, Default)]
pub enum Compare {
    /// Strict inequality on the value model.
    #[default]
    Default,
    /// Custom predicate returning true when the change is observable.
    Predicate(Rc<dyn Fn(&Value, &Value) -> bool>),
    /// Constant true: every assignment notifies.
    Always,
    /// Constant false: assignments never notify.
    Never,
}

impl Compare {
    /// Wrap a custom predicate.
    pub fn predicate(f: impl Fn(&Value, &Value) -> bool + 'static) -> Self {
        Compare::Predicate(Rc::new(f))
    }

    /// The boolean shorthand: `true` forces notification, `false` forbids it.
    pub fn constant(notify: bool) -> Self {
        if notify {
            Compare::Always
        } else {
            Compare::Never
        }
    }

    /// Change is observable when the given map key differs between old and
    /// new. Missing keys compare as null.
    pub fn by_key(key: impl Into<String>) -> Self {
        let key = key.into();
        Compare::predicate(move |old, new| {
            let a = old.get(&key).cloned().unwrap_or(Value::Null);
            let b = new.get(&key).cloned().unwrap_or(Value::Null);
            a != b
        })
    }

    /// Evaluate the predicate for a candidate assignment.
    pub(crate) fn changed(&self, old: &Value, new: &Value) -> bool {
        match self {
            Compare::Default => old != new,
            Compare::Predicate(f) => f(old, new),
            Compare::Always => true,
            Compare::Never => false,
        }
    }
}

impl fmt::Debug for Compare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Compare::Default => f.write_str("Compare::Default"),
            Compare::Predicate(_) => f.write_str("Compare::Predicate(..)"),
            Compare::Always => f.write_str("Compare::Always"),
            Compare::Never => f.write_str("Compare::Never"),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
