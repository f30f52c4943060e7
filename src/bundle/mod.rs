// ============================================================================
// ripple-cells - Reactive Bundle
// A nested object/array observable as cells of cells
// ============================================================================
//
// Every member is backed by a Cell; reading a member is a tracked cell read,
// assigning routes through the member cell inside a batch. Plain containers
// assigned into a bundle are promoted to nested bundles (unless the bundle
// was created shallow), and assigning a Cell wires it as the member's
// definition so the member tracks it.
//
// The aggregate cell is the bundle's own node: consumers reading it go stale
// on any member addition, removal or replacement, and on length changes.
//
// Array method routing lives in list.rs.
// ============================================================================

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::core::constants::BUNDLE_TAG;
use crate::core::error::CellError;
use crate::core::value::Value;
use crate::primitives::cell::{cell, Cell};
use crate::reactivity::batching::{batch, fv, untracked};

mod list;

// =============================================================================
// BUNDLE
// =============================================================================

/// A reactive wrapper over a nested object or array.
///
/// # Example
///
/// ```
/// use ripple_cells::{bundle, Value};
///
/// let p = bundle(Value::map([("x", 1)]));
/// assert_eq!(p.get("x").unwrap(), Value::from(1));
///
/// p.set("x", 2);
/// assert_eq!(p.get("x").unwrap(), Value::from(2));
///
/// // The member cell itself is reachable for wiring.
/// let member = p.member("x").unwrap();
/// assert_eq!(member.rv().unwrap(), Value::from(2));
/// ```
#[derive(Clone)]
pub struct Bundle {
    inner: Rc<BundleInner>,
}

pub(crate) struct BundleInner {
    members: RefCell<Members>,
    /// The bundle's own cell; notified on structural and member changes.
    aggregate: Cell,
    shallow: bool,
}

pub(crate) enum Members {
    Object(Vec<(String, Cell)>),
    Array { items: Vec<Cell>, length: Cell },
}

/// Wrap a value as a reactive bundle. Lists become array bundles, maps
/// become object bundles, anything else yields an empty object bundle.
pub fn bundle(initial: impl Into<Value>) -> Bundle {
    Bundle::new(initial.into(), false)
}

/// Like [`bundle`], but `shallow` keeps nested containers as plain values
/// instead of promoting them to nested bundles.
pub fn bundle_with(initial: impl Into<Value>, shallow: bool) -> Bundle {
    Bundle::new(initial.into(), shallow)
}

impl Bundle {
    /// The reactive type tag of bundles.
    pub const TYPE: u8 = BUNDLE_TAG;

    pub(crate) fn new(initial: Value, shallow: bool) -> Self {
        let members = match initial {
            Value::List(items) => Members::Array {
                length: cell(items.len()),
                items: items
                    .iter()
                    .map(|v| make_member(v.clone(), shallow))
                    .collect(),
            },
            Value::Map(map) => Members::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), make_member(v.clone(), shallow)))
                    .collect(),
            ),
            // A scalar has no members to wrap.
            _ => Members::Object(Vec::new()),
        };
        Bundle {
            inner: Rc::new(BundleInner {
                members: RefCell::new(members),
                aggregate: cell(0),
                shallow,
            }),
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(&*self.inner.members.borrow(), Members::Array { .. })
    }

    pub fn is_object(&self) -> bool {
        !self.is_array()
    }

    // =========================================================================
    // MEMBER ACCESS
    // =========================================================================

    /// Tracked read of a member. Missing members read as null. On array
    /// bundles a numeric key routes to the index.
    pub fn get(&self, key: &str) -> Result<Value, CellError> {
        if self.is_array() {
            return match key.parse::<usize>() {
                Ok(index) => self.at(index),
                Err(_) => Ok(Value::Null),
            };
        }
        match self.member(key) {
            Some(member) => member.rv(),
            None => Ok(Value::Null),
        }
    }

    /// Tracked read of an array element; out of range reads as null.
    pub fn at(&self, index: usize) -> Result<Value, CellError> {
        match self.member_at(index) {
            Some(member) => member.rv(),
            None => Ok(Value::Null),
        }
    }

    /// Assign a member inside a batch, creating it if absent. Returns false
    /// for the reserved member names (the refused set of the proxy
    /// contract) and for non-numeric keys on array bundles.
    pub fn set(&self, key: &str, value: impl Into<Value>) -> bool {
        if key == "_" || key == "__" {
            return false;
        }
        let value = value.into();
        if self.is_array() {
            return match key.parse::<usize>() {
                Ok(index) => self.set_at(index, value),
                Err(_) => false,
            };
        }
        batch(|| {
            match self.member(key) {
                Some(member) => self.assign_member(&member, value),
                None => {
                    let member = self.make_member_cell(value);
                    if let Members::Object(pairs) = &mut *self.inner.members.borrow_mut() {
                        pairs.push((key.to_string(), member));
                    }
                }
            }
            self.touch_aggregate();
        });
        true
    }

    /// Assign an array element inside a batch, padding with nulls past the
    /// end.
    pub fn set_at(&self, index: usize, value: impl Into<Value>) -> bool {
        if !self.is_array() {
            return false;
        }
        let value = value.into();
        batch(|| {
            match self.member_at(index) {
                Some(member) => self.assign_member(&member, value),
                None => {
                    let pad = {
                        let members = self.inner.members.borrow();
                        match &*members {
                            Members::Array { items, .. } => index.saturating_sub(items.len()),
                            _ => 0,
                        }
                    };
                    let padding: Vec<Cell> = (0..pad).map(|_| cell(Value::Null)).collect();
                    let member = self.make_member_cell(value);
                    if let Members::Array { items, .. } =
                        &mut *self.inner.members.borrow_mut()
                    {
                        items.extend(padding);
                        items.push(member);
                    }
                    let len = self.raw_len();
                    self.sync_length(len);
                }
            }
            self.touch_aggregate();
        });
        true
    }

    /// Delete a member; ripples the aggregate.
    pub fn remove(&self, key: &str) -> bool {
        if self.is_array() {
            return match key.parse::<usize>() {
                Ok(index) => self.remove_at(index),
                Err(_) => false,
            };
        }
        let removed = {
            let mut members = self.inner.members.borrow_mut();
            if let Members::Object(pairs) = &mut *members {
                let before = pairs.len();
                pairs.retain(|(k, _)| k != key);
                before != pairs.len()
            } else {
                false
            }
        };
        if removed {
            batch(|| self.touch_aggregate());
        }
        removed
    }

    /// Delete an array element; shifts the tail and ripples the aggregate.
    pub fn remove_at(&self, index: usize) -> bool {
        if !self.is_array() {
            return false;
        }
        let removed = {
            let mut members = self.inner.members.borrow_mut();
            if let Members::Array { items, .. } = &mut *members {
                if index < items.len() {
                    items.remove(index);
                    true
                } else {
                    false
                }
            } else {
                false
            }
        };
        if removed {
            batch(|| {
                let len = self.raw_len();
                self.sync_length(len);
                self.touch_aggregate();
            });
        }
        removed
    }

    pub fn has(&self, key: &str) -> bool {
        self.member(key).is_some()
    }

    /// Object keys in insertion order (empty for array bundles).
    pub fn keys(&self) -> Vec<String> {
        match &*self.inner.members.borrow() {
            Members::Object(pairs) => pairs.iter().map(|(k, _)| k.clone()).collect(),
            Members::Array { .. } => Vec::new(),
        }
    }

    // =========================================================================
    // THE UNDERLYING CELLS
    // =========================================================================

    /// The member's backing cell (the `_` surface).
    pub fn member(&self, key: &str) -> Option<Cell> {
        match &*self.inner.members.borrow() {
            Members::Object(pairs) => pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, c)| c.clone()),
            Members::Array { items, .. } => {
                key.parse::<usize>().ok().and_then(|i| items.get(i).cloned())
            }
        }
    }

    pub fn member_at(&self, index: usize) -> Option<Cell> {
        match &*self.inner.members.borrow() {
            Members::Array { items, .. } => items.get(index).cloned(),
            Members::Object(_) => None,
        }
    }

    /// All object members with their keys.
    pub fn members(&self) -> Vec<(String, Cell)> {
        match &*self.inner.members.borrow() {
            Members::Object(pairs) => pairs.clone(),
            Members::Array { .. } => Vec::new(),
        }
    }

    /// The bundle's own aggregate cell (the `__` surface): consumers become
    /// stale on structural and member changes.
    pub fn aggregate(&self) -> Cell {
        self.inner.aggregate.clone()
    }

    /// Tracked element/member count: reads the length cell on arrays, the
    /// aggregate on objects.
    pub fn len(&self) -> usize {
        let (length, count) = match &*self.inner.members.borrow() {
            Members::Array { items, length } => (Some(length.clone()), items.len()),
            Members::Object(pairs) => (None, pairs.len()),
        };
        match length {
            Some(length) => length
                .rv()
                .ok()
                .and_then(|v| v.as_i64())
                .map(|v| v as usize)
                .unwrap_or(count),
            None => {
                let _ = self.inner.aggregate.rv();
                count
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // =========================================================================
    // SNAPSHOT
    // =========================================================================

    /// Deep plain-value snapshot (the `_bundle` surface). Non-reactive: the
    /// reads create no edges.
    pub fn snapshot(&self) -> Value {
        untracked(|| self.plain_value())
    }

    fn plain_value(&self) -> Value {
        enum Shape {
            List(Vec<Cell>),
            Map(Vec<(String, Cell)>),
        }
        let shape = match &*self.inner.members.borrow() {
            Members::Array { items, .. } => Shape::List(items.clone()),
            Members::Object(pairs) => Shape::Map(pairs.clone()),
        };
        match shape {
            Shape::List(cells) => {
                Value::List(Rc::new(cells.iter().map(plain_member).collect()))
            }
            Shape::Map(pairs) => Value::Map(Rc::new(
                pairs
                    .iter()
                    .map(|(k, c)| (k.clone(), plain_member(c)))
                    .collect::<BTreeMap<_, _>>(),
            )),
        }
    }

    pub fn reactive_tag(&self) -> u8 {
        Self::TYPE
    }

    pub fn ptr_eq(&self, other: &Bundle) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    // =========================================================================
    // INTERNALS (shared with the array routing in list.rs)
    // =========================================================================

    pub(crate) fn shallow(&self) -> bool {
        self.inner.shallow
    }

    pub(crate) fn make_member_cell(&self, value: Value) -> Cell {
        make_member(value, self.inner.shallow)
    }

    /// Route a value into an existing member cell: cells become the member's
    /// definition, containers promote, plain values assign.
    pub(crate) fn assign_member(&self, member: &Cell, value: Value) {
        match promote(value, self.inner.shallow) {
            Value::Cell(source) => {
                member.set_def_cell(&source);
            }
            plain => member.wv(plain),
        }
    }

    /// Bump the aggregate cell's version, waking its consumers.
    pub(crate) fn touch_aggregate(&self) {
        let aggregate = &self.inner.aggregate;
        let version = aggregate.peek().as_i64().unwrap_or(0) + 1;
        aggregate.wv(version);
    }

    /// Untracked member count.
    pub(crate) fn raw_len(&self) -> usize {
        match &*self.inner.members.borrow() {
            Members::Array { items, .. } => items.len(),
            Members::Object(pairs) => pairs.len(),
        }
    }

    /// Untracked plain value of one array element.
    pub(crate) fn plain_at(&self, index: usize) -> Value {
        match self.member_at(index) {
            Some(member) => untracked(|| plain_member(&member)),
            None => Value::Null,
        }
    }

    pub(crate) fn sync_length(&self, len: usize) {
        let length = match &*self.inner.members.borrow() {
            Members::Array { length, .. } => Some(length.clone()),
            _ => None,
        };
        if let Some(length) = length {
            length.wv(len);
        }
    }

    pub(crate) fn member_cells_raw(&self) -> Vec<Cell> {
        match &*self.inner.members.borrow() {
            Members::Array { items, .. } => items.clone(),
            Members::Object(pairs) => pairs.iter().map(|(_, c)| c.clone()).collect(),
        }
    }
}

impl fmt::Display for Bundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.snapshot())
    }
}

impl fmt::Debug for Bundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bundle")
            .field("kind", &if self.is_array() { "array" } else { "object" })
            .field("members", &self.raw_len())
            .finish()
    }
}

// =============================================================================
// MEMBER CONSTRUCTION
// =============================================================================

fn make_member(value: Value, shallow: bool) -> Cell {
    match promote(value, shallow) {
        Value::Cell(source) => {
            let member = cell(Value::Null);
            member.set_def_cell(&source);
            member
        }
        plain => cell(plain),
    }
}

fn promote(value: Value, shallow: bool) -> Value {
    if shallow {
        return value;
    }
    match value {
        v @ (Value::List(_) | Value::Map(_)) => Value::Bundle(Bundle::new(v, false)),
        other => other,
    }
}

/// Resolve one member cell to its plain value: nested bundles snapshot,
/// referenced cells unwrap, failures read as null.
fn plain_member(member: &Cell) -> Value {
    let value = member.rv().unwrap_or(Value::Null);
    match value {
        Value::Bundle(b) => b.plain_value(),
        Value::Cell(c) => fv(&Value::Cell(c), true).unwrap_or(Value::Null),
        other => other,
    }
}

// =============================================================================
// IN-PLACE MERGE
// =============================================================================

/// Merge `src` into `target` in place, inside one batch.
///
/// Arrays merge with set semantics on snapshot values: elements absent from
/// `src` are spliced out, values absent from the target are pushed. Objects
/// delete keys absent from `src` and assign the present ones.
pub fn update(target: &Bundle, src: &Value) {
    batch(|| {
        if target.is_array() {
            let src_items: Vec<Value> =
                src.as_list().map(|s| s.to_vec()).unwrap_or_default();

            // Splice out values no longer present.
            let mut index = 0;
            while index < target.raw_len() {
                let current = target.plain_at(index);
                if src_items.iter().any(|s| *s == current) {
                    index += 1;
                } else {
                    target.remove_at(index);
                }
            }

            // Push values the target does not hold yet.
            let mut existing: Vec<Value> =
                (0..target.raw_len()).map(|i| target.plain_at(i)).collect();
            for candidate in src_items {
                if !existing.iter().any(|e| *e == candidate) {
                    target.push(candidate.clone());
                    existing.push(candidate);
                }
            }
        } else {
            let src_map = src.as_map().cloned().unwrap_or_default();
            for key in target.keys() {
                if !src_map.contains_key(&key) {
                    target.remove(&key);
                }
            }
            for (key, value) in src_map.iter() {
                target.set(key, value.clone());
            }
        }
    });
}

// =============================================================================
// TESTS
// =============================================================================
