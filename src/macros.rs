// ============================================================================
// ripple-cells - Macros
// ============================================================================

/// Clone handles into a move closure.
///
/// Definitions capture the cells they read; this trims the repeated
/// `let x = x.clone();` lines down to one list.
///
/// # Usage
///
/// ```rust
/// use ripple_cells::{cell, cell_def, cloned, Value};
///
/// let a = cell(1);
/// let b = cell(2);
///
/// let sum = cell_def(cloned!(a, b => move |_| {
///     Ok(Value::from(
///         a.rv()?.as_i64().unwrap_or(0) + b.rv()?.as_i64().unwrap_or(0),
///     ))
/// }));
///
/// assert_eq!(sum.rv().unwrap(), Value::from(3));
/// ```
#[macro_export]
macro_rules! cloned {
    ($($n:ident),+ => $e:expr) => {
        {
            $( let $n = $n.clone(); )+
            $e
        }
    };
}
