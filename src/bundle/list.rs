// ============================================================================
// ripple-cells - Bundle Array Operations
// Mutating and non-mutating array routing for array bundles
// ============================================================================
//
// Mutating operations run inside a batch and update the length cell after
// the mutation; each one ripples the aggregate. Non-mutating operations read
// elements as tracked cell reads and the array-returning ones wrap their
// result in a fresh bundle.
//
// Every operation is a no-op (or empty result) on object bundles.
// ============================================================================

use std::cmp::Ordering;
use std::rc::Rc;

use crate::core::error::CellError;
use crate::core::value::Value;
use crate::primitives::cell::Cell;
use crate::reactivity::batching::{batch, fv, untracked};

use super::{Bundle, Members};

impl Bundle {
    // =========================================================================
    // MUTATING OPERATIONS
    // =========================================================================

    /// Append an element; returns the new length.
    pub fn push(&self, value: impl Into<Value>) -> usize {
        let value = value.into();
        if !self.is_array() {
            return 0;
        }
        batch(|| {
            let member = self.make_member_cell(value);
            let new_len = {
                let mut members = self.inner.members.borrow_mut();
                match &mut *members {
                    Members::Array { items, .. } => {
                        items.push(member);
                        items.len()
                    }
                    Members::Object(_) => 0,
                }
            };
            self.sync_length(new_len);
            self.touch_aggregate();
            new_len
        })
    }

    /// Remove and return the last element's plain value.
    pub fn pop(&self) -> Option<Value> {
        if !self.is_array() {
            return None;
        }
        batch(|| {
            let removed = {
                let mut members = self.inner.members.borrow_mut();
                match &mut *members {
                    Members::Array { items, .. } => items.pop(),
                    Members::Object(_) => None,
                }
            };
            let removed = removed.map(|member| untracked(|| super::plain_member(&member)));
            if removed.is_some() {
                let len = self.raw_len();
                self.sync_length(len);
                self.touch_aggregate();
            }
            removed
        })
    }

    /// Remove and return the first element's plain value.
    pub fn shift(&self) -> Option<Value> {
        if !self.is_array() {
            return None;
        }
        batch(|| {
            let removed = {
                let mut members = self.inner.members.borrow_mut();
                match &mut *members {
                    Members::Array { items, .. } if !items.is_empty() => {
                        Some(items.remove(0))
                    }
                    _ => None,
                }
            };
            let removed = removed.map(|member| untracked(|| super::plain_member(&member)));
            if removed.is_some() {
                let len = self.raw_len();
                self.sync_length(len);
                self.touch_aggregate();
            }
            removed
        })
    }

    /// Prepend an element; returns the new length.
    pub fn unshift(&self, value: impl Into<Value>) -> usize {
        let value = value.into();
        if !self.is_array() {
            return 0;
        }
        batch(|| {
            let member = self.make_member_cell(value);
            let new_len = {
                let mut members = self.inner.members.borrow_mut();
                match &mut *members {
                    Members::Array { items, .. } => {
                        items.insert(0, member);
                        items.len()
                    }
                    Members::Object(_) => 0,
                }
            };
            self.sync_length(new_len);
            self.touch_aggregate();
            new_len
        })
    }

    /// Replace a range with new elements; returns the removed plain values.
    pub fn splice(
        &self,
        start: usize,
        delete_count: usize,
        items: Vec<Value>,
    ) -> Vec<Value> {
        if !self.is_array() {
            return Vec::new();
        }
        batch(|| {
            let new_members: Vec<Cell> = items
                .into_iter()
                .map(|v| self.make_member_cell(v))
                .collect();
            let removed_cells: Vec<Cell> = {
                let mut members = self.inner.members.borrow_mut();
                match &mut *members {
                    Members::Array { items, .. } => {
                        let start = start.min(items.len());
                        let end = (start + delete_count).min(items.len());
                        items.splice(start..end, new_members).collect()
                    }
                    Members::Object(_) => Vec::new(),
                }
            };
            let removed = untracked(|| {
                removed_cells
                    .iter()
                    .map(super::plain_member)
                    .collect::<Vec<_>>()
            });
            let len = self.raw_len();
            self.sync_length(len);
            self.touch_aggregate();
            removed
        })
    }

    /// In-place sort by the string rendering of the plain values.
    pub fn sort(&self) -> &Self {
        self.sort_by(|a, b| a.to_string().cmp(&b.to_string()))
    }

    /// In-place sort with a comparator over plain values. Values move
    /// between indices; per-index member cells keep their identity.
    pub fn sort_by(&self, cmp: impl Fn(&Value, &Value) -> Ordering) -> &Self {
        if !self.is_array() {
            return self;
        }
        batch(|| {
            let cells = self.member_cells_raw();
            let raw: Vec<Value> = untracked(|| {
                cells
                    .iter()
                    .map(|c| c.rv().unwrap_or(Value::Null))
                    .collect()
            });
            let mut keyed: Vec<(Value, Value)> =
                raw.into_iter().map(|v| (plain_of(&v), v)).collect();
            keyed.sort_by(|a, b| cmp(&a.0, &b.0));

            for (index, (_key, value)) in keyed.into_iter().enumerate() {
                if let Some(member) = cells.get(index) {
                    self.assign_member(member, value);
                }
            }
            self.touch_aggregate();
        });
        self
    }

    // =========================================================================
    // NON-MUTATING OPERATIONS
    // =========================================================================

    /// Tracked plain values of all elements.
    pub(crate) fn plain_items(&self) -> Result<Vec<Value>, CellError> {
        let cells = self.member_cells_raw();
        let mut out = Vec::with_capacity(cells.len());
        for member in &cells {
            let value = member.rv()?;
            out.push(match value {
                Value::Bundle(b) => b.snapshot(),
                Value::Cell(c) => fv(&Value::Cell(c), true)?,
                other => other,
            });
        }
        Ok(out)
    }

    /// New bundle from `f` applied to each element.
    pub fn map(
        &self,
        f: impl Fn(&Value, usize) -> Value,
    ) -> Result<Bundle, CellError> {
        let items = self.plain_items()?;
        let mapped: Vec<Value> = items.iter().enumerate().map(|(i, v)| f(v, i)).collect();
        Ok(Bundle::new(Value::List(Rc::new(mapped)), self.shallow()))
    }

    /// New bundle of the elements passing `pred`.
    pub fn filter(
        &self,
        pred: impl Fn(&Value, usize) -> bool,
    ) -> Result<Bundle, CellError> {
        let items = self.plain_items()?;
        let kept: Vec<Value> = items
            .into_iter()
            .enumerate()
            .filter(|(i, v)| pred(v, *i))
            .map(|(_, v)| v)
            .collect();
        Ok(Bundle::new(Value::List(Rc::new(kept)), self.shallow()))
    }

    /// New bundle of this array followed by `other`'s elements.
    pub fn concat(&self, other: &Bundle) -> Result<Bundle, CellError> {
        let mut items = self.plain_items()?;
        items.extend(other.plain_items()?);
        Ok(Bundle::new(Value::List(Rc::new(items)), self.shallow()))
    }

    /// New bundle with nested lists flattened up to `depth`.
    pub fn flat(&self, depth: usize) -> Result<Bundle, CellError> {
        let items = self.plain_items()?;
        Ok(Bundle::new(
            Value::List(Rc::new(flatten(items, depth))),
            self.shallow(),
        ))
    }

    /// Map then flatten one level.
    pub fn flat_map(
        &self,
        f: impl Fn(&Value, usize) -> Value,
    ) -> Result<Bundle, CellError> {
        let items = self.plain_items()?;
        let mapped: Vec<Value> = items.iter().enumerate().map(|(i, v)| f(v, i)).collect();
        Ok(Bundle::new(
            Value::List(Rc::new(flatten(mapped, 1))),
            self.shallow(),
        ))
    }

    /// New bundle over the `start..end` subrange (`end` defaults to the
    /// length).
    pub fn slice(&self, start: usize, end: Option<usize>) -> Result<Bundle, CellError> {
        let items = self.plain_items()?;
        let end = end.unwrap_or(items.len()).min(items.len());
        let start = start.min(end);
        Ok(Bundle::new(
            Value::List(Rc::new(items[start..end].to_vec())),
            self.shallow(),
        ))
    }

    /// Element renderings joined with `sep`.
    pub fn join(&self, sep: &str) -> Result<String, CellError> {
        let items = self.plain_items()?;
        Ok(items
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(sep))
    }

    /// New bundle with the elements reversed.
    pub fn to_reversed(&self) -> Result<Bundle, CellError> {
        let mut items = self.plain_items()?;
        items.reverse();
        Ok(Bundle::new(Value::List(Rc::new(items)), self.shallow()))
    }

    /// New sorted bundle (string-rendering order).
    pub fn to_sorted(&self) -> Result<Bundle, CellError> {
        self.to_sorted_by(|a, b| a.to_string().cmp(&b.to_string()))
    }

    /// New sorted bundle with a comparator.
    pub fn to_sorted_by(
        &self,
        cmp: impl Fn(&Value, &Value) -> Ordering,
    ) -> Result<Bundle, CellError> {
        let mut items = self.plain_items()?;
        items.sort_by(|a, b| cmp(a, b));
        Ok(Bundle::new(Value::List(Rc::new(items)), self.shallow()))
    }

    /// New bundle with a range replaced.
    pub fn to_spliced(
        &self,
        start: usize,
        delete_count: usize,
        replacement: Vec<Value>,
    ) -> Result<Bundle, CellError> {
        let mut items = self.plain_items()?;
        let start = start.min(items.len());
        let end = (start + delete_count).min(items.len());
        items.splice(start..end, replacement);
        Ok(Bundle::new(Value::List(Rc::new(items)), self.shallow()))
    }

    // =========================================================================
    // ARRAY INTROSPECTION
    // =========================================================================

    /// The element cells in order (the `_` surface for arrays).
    pub fn member_cells(&self) -> Vec<Cell> {
        if self.is_array() {
            self.member_cells_raw()
        } else {
            Vec::new()
        }
    }

    /// The array's length cell; None for object bundles.
    pub fn length_cell(&self) -> Option<Cell> {
        match &*self.inner.members.borrow() {
            Members::Array { length, .. } => Some(length.clone()),
            Members::Object(_) => None,
        }
    }
}

fn plain_of(value: &Value) -> Value {
    match value {
        Value::Bundle(b) => b.snapshot(),
        Value::Cell(c) => fv(&Value::Cell(c.clone()), true).unwrap_or(Value::Null),
        other => other.clone(),
    }
}

fn flatten(items: Vec<Value>, depth: usize) -> Vec<Value> {
    if depth == 0 {
        return items;
    }
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::List(nested) => {
                out.extend(flatten(nested.as_ref().clone(), depth - 1))
            }
            other => out.push(other),
        }
    }
    out
}

// =============================================================================
// TESTS
// =============================================================================
