// ============================================================================
// ripple-cells - Cell
// The reactive node: value or definition, readiness, edges, scheduling hook
// ============================================================================
//
// A Cell is a cheap clonable handle over an Rc'd node. Reading resolves the
// tri-state readiness (ready / stale / maybe-stale), evaluating the
// definition when needed while the runtime records which cells it reads.
// Writing ripples staleness through the consumer graph synchronously;
// recomputation itself is deferred to the scheduler.
// ============================================================================

use std::cell::{Cell as StdCell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::core::constants::{
    CELL_TAG, EAGER, EVALUATING, MAYBE_STALE, READY, STALE, STATUS_MASK,
};
use crate::core::context::with_runtime;
use crate::core::error::CellError;
use crate::core::value::Value;
use crate::primitives::view::ReadOnly;
use crate::reactivity::compare::Compare;
use crate::reactivity::scheduling::{queue_eval, run};
use crate::reactivity::tracking::{add_edge, detach_providers, remove_edge, track_read};

// =============================================================================
// TYPES
// =============================================================================

/// A cell definition: previous value in, new value (or a failure) out.
pub type Definition = Rc<dyn Fn(&Value) -> Result<Value, CellError>>;

/// Stable read closure for a cell; identity is preserved across accesses.
pub type Getter = Rc<dyn Fn() -> Result<Value, CellError>>;

/// Stable write closure for a cell.
pub type Setter = Rc<dyn Fn(Value)>;

/// The definition slot of [`CellOptions`]: a function, or another cell whose
/// getter is adopted.
#[derive(Clone)]
pub enum DefSource {
    Func(Definition),
    Cell(Cell),
}

impl DefSource {
    pub fn func(f: impl Fn(&Value) -> Result<Value, CellError> + 'static) -> Self {
        Self::Func(Rc::new(f))
    }

    pub fn cell(source: &Cell) -> Self {
        Self::Cell(source.clone())
    }
}

impl From<Cell> for DefSource {
    fn from(cell: Cell) -> Self {
        Self::Cell(cell)
    }
}

impl From<&Cell> for DefSource {
    fn from(cell: &Cell) -> Self {
        Self::Cell(cell.clone())
    }
}

/// Recognised construction options.
#[derive(Default)]
pub struct CellOptions {
    /// Initial value.
    pub v: Option<Value>,
    /// Initial definition.
    pub def: Option<DefSource>,
    /// Schedule background evaluation on staleness even without consumers.
    pub eager: bool,
    /// Change predicate; strict inequality when absent.
    pub compare: Option<Compare>,
}

// =============================================================================
// CELL INNER
// =============================================================================

/// The node behind a [`Cell`] handle.
pub struct CellInner {
    /// Readiness tri-state plus the eager and evaluating bits.
    flags: StdCell<u32>,

    /// Scheduler tier currently occupied, if any. Queue entries that do not
    /// match this field are tombstones.
    queued: StdCell<Option<u8>>,

    /// Last computed or assigned value.
    value: RefCell<Value>,

    /// Cached failure from the last definition evaluation.
    error: RefCell<Option<CellError>>,

    definition: RefCell<Option<Definition>>,

    compare: RefCell<Compare>,

    /// Cells read during the last evaluation (strong: a consumer keeps its
    /// producers alive).
    providers: RefCell<Vec<Rc<CellInner>>>,

    /// Cells that read this one during theirs (weak back-references).
    consumers: RefCell<Vec<Weak<CellInner>>>,

    cached_getter: RefCell<Option<Getter>>,
    cached_setter: RefCell<Option<Setter>>,
    cached_view: RefCell<Option<ReadOnly>>,
}

impl CellInner {
    fn new(value: Value, compare: Compare, eager: bool) -> Rc<Self> {
        let mut flags = READY;
        if eager {
            flags |= EAGER;
        }
        Rc::new(Self {
            flags: StdCell::new(flags),
            queued: StdCell::new(None),
            value: RefCell::new(value),
            error: RefCell::new(None),
            definition: RefCell::new(None),
            compare: RefCell::new(compare),
            providers: RefCell::new(Vec::new()),
            consumers: RefCell::new(Vec::new()),
            cached_getter: RefCell::new(None),
            cached_setter: RefCell::new(None),
            cached_view: RefCell::new(None),
        })
    }

    // =========================================================================
    // FLAGS
    // =========================================================================

    pub(crate) fn is_ready(&self) -> bool {
        self.flags.get() & READY != 0
    }

    pub(crate) fn is_stale(&self) -> bool {
        self.flags.get() & STALE != 0
    }

    pub(crate) fn is_maybe_stale(&self) -> bool {
        self.flags.get() & MAYBE_STALE != 0
    }

    pub(crate) fn mark_ready(&self) {
        self.flags.set((self.flags.get() & STATUS_MASK) | READY);
    }

    pub(crate) fn mark_stale(&self) {
        self.flags.set((self.flags.get() & STATUS_MASK) | STALE);
    }

    pub(crate) fn mark_maybe_stale(&self) {
        self.flags.set((self.flags.get() & STATUS_MASK) | MAYBE_STALE);
    }

    pub(crate) fn is_eager(&self) -> bool {
        self.flags.get() & EAGER != 0
    }

    fn set_eager_flag(&self, eager: bool) {
        let flags = self.flags.get();
        self.flags.set(if eager { flags | EAGER } else { flags & !EAGER });
    }

    pub(crate) fn is_evaluating(&self) -> bool {
        self.flags.get() & EVALUATING != 0
    }

    fn set_evaluating(&self, on: bool) {
        let flags = self.flags.get();
        self.flags
            .set(if on { flags | EVALUATING } else { flags & !EVALUATING });
    }

    pub(crate) fn queued_tier(&self) -> Option<u8> {
        self.queued.get()
    }

    pub(crate) fn set_queued_tier(&self, tier: Option<u8>) {
        self.queued.set(tier);
    }

    // =========================================================================
    // VALUE / ERROR
    // =========================================================================

    /// Cached error or cloned value, whichever the last evaluation left.
    pub(crate) fn current(&self) -> Result<Value, CellError> {
        if let Some(err) = self.error.borrow().as_ref() {
            return Err(err.clone());
        }
        Ok(self.value.borrow().clone())
    }

    pub(crate) fn stored_value(&self) -> Value {
        self.value.borrow().clone()
    }

    // =========================================================================
    // EDGES
    // =========================================================================

    pub(crate) fn has_provider(&self, provider: &Rc<CellInner>) -> bool {
        self.providers
            .borrow()
            .iter()
            .any(|p| Rc::ptr_eq(p, provider))
    }

    pub(crate) fn push_provider(&self, provider: Rc<CellInner>) {
        self.providers.borrow_mut().push(provider);
    }

    pub(crate) fn remove_provider(&self, provider: &Rc<CellInner>) {
        self.providers
            .borrow_mut()
            .retain(|p| !Rc::ptr_eq(p, provider));
    }

    pub(crate) fn take_providers(&self) -> Vec<Rc<CellInner>> {
        self.providers.replace(Vec::new())
    }

    pub(crate) fn push_consumer(&self, consumer: Weak<CellInner>) {
        self.consumers.borrow_mut().push(consumer);
    }

    pub(crate) fn remove_consumer(&self, consumer: &Rc<CellInner>) {
        self.consumers.borrow_mut().retain(|weak| match weak.upgrade() {
            Some(rc) => !Rc::ptr_eq(&rc, consumer),
            // Drop dead entries while we are here.
            None => false,
        });
    }

    pub(crate) fn prune_consumers(&self) {
        self.consumers
            .borrow_mut()
            .retain(|weak| weak.strong_count() > 0);
    }

    pub(crate) fn has_consumers(&self) -> bool {
        self.consumers
            .borrow()
            .iter()
            .any(|weak| weak.strong_count() > 0)
    }

    /// Snapshot the live consumers (collect-then-mutate discipline).
    pub(crate) fn collect_consumers(&self) -> Vec<Rc<CellInner>> {
        self.consumers
            .borrow()
            .iter()
            .filter_map(Weak::upgrade)
            .collect()
    }
}

impl Drop for CellInner {
    fn drop(&mut self) {
        // Detach outbound registrations: our weak entries in the providers'
        // consumer lists are dead now and can be pruned eagerly.
        for provider in self.providers.get_mut().drain(..) {
            provider.prune_consumers();
        }
    }
}

// =============================================================================
// READ PATH
// =============================================================================

/// Resolve and return the cell's value: the defining operation.
pub(crate) fn read_value(cell: &Rc<CellInner>) -> Result<Value, CellError> {
    // We are about to resolve inline; any queue entry would be redundant
    // work. The entry itself becomes a tombstone.
    cell.set_queued_tier(None);

    track_read(cell);

    if cell.is_maybe_stale() {
        settle_providers(cell);
        if !cell.is_stale() {
            // No provider actually changed; the cached value stands.
            cell.mark_ready();
        }
    }

    if cell.is_ready() {
        return cell.current();
    }

    recompute(cell)
}

/// Force each provider of a maybe-stale cell to resolve. A provider whose
/// value actually changed ripples distance 1 back into `cell`, demoting it to
/// stale; otherwise the pass proves the cached value is still good.
fn settle_providers(cell: &Rc<CellInner>) {
    let providers: Vec<Rc<CellInner>> = cell.providers.borrow().clone();

    // Internal resolution: these reads must not wire the providers to
    // whichever definition happens to be evaluating right now.
    with_runtime(|rt| rt.enter_untracked());
    struct UntrackGuard;
    impl Drop for UntrackGuard {
        fn drop(&mut self) {
            with_runtime(|rt| rt.exit_untracked());
        }
    }
    let _guard = UntrackGuard;

    for provider in providers {
        if cell.is_stale() {
            break;
        }
        // Provider failures ripple like any other change and are met again
        // by the recompute's own read.
        let _ = read_value(&provider);
    }
}

fn recompute(cell: &Rc<CellInner>) -> Result<Value, CellError> {
    if cell.is_evaluating() {
        // Mark the origin of the failing chain so each frame on the way out
        // can tear down the edges it wired.
        with_runtime(|rt| {
            rt.cycle_origin.set(Some(Rc::as_ptr(cell) as *const ()));
        });
        return Err(CellError::SelfReference);
    }

    let Some(def) = cell.definition.borrow().clone() else {
        // No definition: the stored value is authoritative.
        cell.mark_ready();
        return cell.current();
    };

    // The runner must not interleave with an evaluation in progress: hold a
    // wait unit for the whole span, through the store and notify. Work
    // queued by nested ripples drains when this guard exits. Declared first
    // so it drops last.
    with_runtime(|rt| rt.enter_wait());
    struct WaitGuard;
    impl Drop for WaitGuard {
        fn drop(&mut self) {
            with_runtime(|rt| rt.exit_wait());
            run();
        }
    }
    let _wait = WaitGuard;

    // Old edges are rediscovered by the evaluation itself; the detached
    // providers stay alive until the evaluation finishes in case the
    // definition was their last holder. Edges wired by an evaluation that
    // fails on a self-reference are torn down in the error path below.
    let _old_providers = detach_providers(cell);

    let previous = cell.stored_value();

    let result = {
        let prev_current = with_runtime(|rt| rt.swap_current(Some(Rc::downgrade(cell))));
        cell.set_evaluating(true);

        struct EvalGuard<'a> {
            cell: &'a Rc<CellInner>,
            prev: Option<Weak<CellInner>>,
        }
        impl Drop for EvalGuard<'_> {
            fn drop(&mut self) {
                self.cell.set_evaluating(false);
                let prev = self.prev.take();
                with_runtime(|rt| {
                    rt.swap_current(prev);
                });
            }
        }
        let _guard = EvalGuard {
            cell,
            prev: prev_current,
        };

        def(&previous)
    };

    // A self-reference failure unwinds through every evaluation between the
    // re-entered cell and its own outer frame. Those frames are the would-be
    // cycle: each must drop the strong provider edges it just wired, or the
    // chain closes into a reference loop that no drop can collect. The
    // marker is consumed by the origin's frame, success or failure, so a
    // consumer outside the cycle keeps its edges.
    let self_ptr = Rc::as_ptr(cell) as *const ();
    let cycle_member = with_runtime(|rt| {
        let unwinding = rt.cycle_origin.get().is_some();
        if rt.cycle_origin.get() == Some(self_ptr) {
            rt.cycle_origin.set(None);
        }
        unwinding
    });

    match result {
        Ok(value) => {
            set_notify(cell, value);
            cell.current()
        }
        Err(err) => {
            if cycle_member && err.is_self_reference() {
                detach_providers(cell);
            }
            *cell.error.borrow_mut() = Some(err.clone());
            cell.mark_ready();
            ripple_from(cell, 0);
            if cell.is_eager() && !cell.has_consumers() {
                // Nothing reads a terminal eager cell, so surface the
                // failure instead of swallowing it.
                tracing::error!(error = %err, "eager cell evaluation failed");
            }
            Err(err)
        }
    }
}

// =============================================================================
// WRITE PATH
// =============================================================================

/// Assign a concrete value: drops the definition, detaches providers, then
/// stores and notifies.
pub(crate) fn write_value(cell: &Rc<CellInner>, value: Value) {
    cell.definition.borrow_mut().take();
    detach_providers(cell);
    set_notify(cell, value);
    run();
}

/// Store a candidate value, consulting the change predicate for whether
/// consumers hear about it. The value is stored either way.
pub(crate) fn set_notify(cell: &Rc<CellInner>, value: Value) {
    let changed = {
        let old = cell.stored_value();
        let cmp = cell.compare.borrow().clone();
        cmp.changed(&old, &value)
    };

    *cell.value.borrow_mut() = value;
    cell.mark_ready();
    cell.error.borrow_mut().take();

    if changed {
        ripple_from(cell, 0);
    }
}

/// Install, replace or remove the definition.
pub(crate) fn install_def(cell: &Rc<CellInner>, def: Option<Definition>) {
    detach_providers(cell);
    match def {
        None => {
            cell.definition.borrow_mut().take();
            set_notify(cell, Value::Null);
        }
        Some(def) => {
            *cell.definition.borrow_mut() = Some(def);
            cell.error.borrow_mut().take();
            cell.mark_stale();
            schedule(cell, 0);
        }
    }
    run();
}

fn adopted_getter_def(source: &Cell) -> Definition {
    let getter = getter_for(source.inner());
    Rc::new(move |_previous| getter())
}

// =============================================================================
// RIPPLE
// =============================================================================

/// Propagate staleness outward from `cell`.
///
/// Distance 0 is the cell's own change (unconditional propagation), 1 marks
/// stale, 2 and beyond only demote a ready cell to maybe-stale. The walk
/// continues past a cell only for the origin or on a fresh ready->not-ready
/// transition, so diamonds collapse to a single pass. Iterative on an
/// explicit stack; deep chains must not recurse.
pub(crate) fn ripple_from(cell: &Rc<CellInner>, distance: u32) {
    // Hold the runner off until the whole ripple is marked; the guard's exit
    // is the drain attempt.
    with_runtime(|rt| rt.enter_wait());
    struct RippleGuard;
    impl Drop for RippleGuard {
        fn drop(&mut self) {
            with_runtime(|rt| rt.exit_wait());
            run();
        }
    }
    let _guard = RippleGuard;

    let mut stack: Vec<(Rc<CellInner>, u32)> = vec![(cell.clone(), distance)];

    while let Some((node, dist)) = stack.pop() {
        let was_ready = node.is_ready();
        match dist {
            0 => {}
            1 => node.mark_stale(),
            _ => {
                if node.is_ready() {
                    node.mark_maybe_stale();
                }
            }
        }

        if dist == 0 || (was_ready && !node.is_ready()) {
            for consumer in node.collect_consumers() {
                stack.push((consumer, dist.saturating_add(1)));
            }
        }

        schedule(&node, dist);
    }
}

/// Enqueue a non-ready cell that someone will want: eager cells always,
/// others only when consumed. Tier 0 for directly invalidated work, tier 1
/// for intermediate cells, tier 2 for eager terminals.
pub(crate) fn schedule(cell: &Rc<CellInner>, distance: u32) {
    if !cell.is_ready() {
        let has_consumers = cell.has_consumers();
        if cell.is_eager() || has_consumers {
            let tier = if distance == 0 {
                0
            } else if has_consumers {
                1
            } else {
                2
            };
            queue_eval(cell, tier);
        }
    }
    run();
}

// =============================================================================
// CACHED CLOSURES
// =============================================================================

/// The cell's stable getter. Captures a weak reference; a getter that
/// outlives its cell reports `CellError::Dropped`.
pub(crate) fn getter_for(cell: &Rc<CellInner>) -> Getter {
    if let Some(getter) = cell.cached_getter.borrow().as_ref() {
        return getter.clone();
    }
    let weak = Rc::downgrade(cell);
    let getter: Getter = Rc::new(move || match weak.upgrade() {
        Some(inner) => read_value(&inner),
        None => Err(CellError::Dropped),
    });
    *cell.cached_getter.borrow_mut() = Some(getter.clone());
    getter
}

/// The cell's stable setter. Writes to a dropped cell are ignored.
pub(crate) fn setter_for(cell: &Rc<CellInner>) -> Setter {
    if let Some(setter) = cell.cached_setter.borrow().as_ref() {
        return setter.clone();
    }
    let weak = Rc::downgrade(cell);
    let setter: Setter = Rc::new(move |value| {
        if let Some(inner) = weak.upgrade() {
            write_value(&inner, value);
        }
    });
    *cell.cached_setter.borrow_mut() = Some(setter.clone());
    setter
}

// =============================================================================
// CELL - the public handle
// =============================================================================

/// A reactive value node.
///
/// Handles are cheap clones sharing one node. Reading with [`Cell::rv`]
/// inside another cell's definition wires a dependency automatically.
///
/// # Example
///
/// ```
/// use ripple_cells::{cell, cell_def, Value};
///
/// let a = cell(1);
/// let b = cell_def({
///     let a = a.clone();
///     move |_| Ok(Value::from(a.rv()?.as_i64().unwrap_or(0) + 1))
/// });
///
/// assert_eq!(b.rv().unwrap(), Value::from(2));
/// a.wv(3);
/// assert_eq!(b.rv().unwrap(), Value::from(4));
/// ```
#[derive(Clone)]
pub struct Cell {
    inner: Rc<CellInner>,
}

impl Cell {
    /// The reactive type tag of scalar cells.
    pub const TYPE: u8 = CELL_TAG;

    pub fn new(options: CellOptions) -> Self {
        let inner = CellInner::new(
            options.v.unwrap_or_default(),
            options.compare.unwrap_or_default(),
            options.eager,
        );
        let cell = Cell { inner };
        match options.def {
            Some(DefSource::Func(def)) => install_def(cell.inner(), Some(def)),
            Some(DefSource::Cell(source)) => {
                install_def(cell.inner(), Some(adopted_getter_def(&source)))
            }
            None => {}
        }
        cell
    }

    pub(crate) fn from_inner(inner: Rc<CellInner>) -> Self {
        Self { inner }
    }

    pub(crate) fn inner(&self) -> &Rc<CellInner> {
        &self.inner
    }

    // =========================================================================
    // READ / WRITE
    // =========================================================================

    /// Read the value, recomputing if stale. Registers this cell as a
    /// provider of whichever definition is currently evaluating.
    pub fn rv(&self) -> Result<Value, CellError> {
        read_value(&self.inner)
    }

    /// Assign a concrete value, clearing any definition.
    pub fn wv(&self, value: impl Into<Value>) {
        write_value(&self.inner, value.into());
    }

    /// The stored value as-is: no tracking, no evaluation, no error.
    pub fn peek(&self) -> Value {
        self.inner.stored_value()
    }

    // =========================================================================
    // CACHED ACCESSORS
    // =========================================================================

    /// Stable read closure (same object on every call).
    pub fn getter(&self) -> Getter {
        getter_for(&self.inner)
    }

    /// Stable write closure (same object on every call).
    pub fn setter(&self) -> Setter {
        setter_for(&self.inner)
    }

    /// The getter/setter pair.
    pub fn accessors(&self) -> (Getter, Setter) {
        (self.getter(), self.setter())
    }

    /// Frozen read-only projection (same object on every call).
    pub fn readonly_view(&self) -> ReadOnly {
        if let Some(view) = self.inner.cached_view.borrow().as_ref() {
            return view.clone();
        }
        let view = ReadOnly::new(&self.inner);
        *self.inner.cached_view.borrow_mut() = Some(view.clone());
        view
    }

    // =========================================================================
    // DEFINITION
    // =========================================================================

    /// The installed definition, if any.
    pub fn def(&self) -> Option<Definition> {
        self.inner.definition.borrow().clone()
    }

    /// Install a definition; the cell goes stale and is scheduled.
    pub fn set_def(
        &self,
        def: impl Fn(&Value) -> Result<Value, CellError> + 'static,
    ) -> &Self {
        install_def(&self.inner, Some(Rc::new(def)));
        self
    }

    /// Adopt another cell's getter as this cell's definition, so this cell
    /// tracks it.
    pub fn set_def_cell(&self, source: &Cell) -> &Self {
        install_def(&self.inner, Some(adopted_getter_def(source)));
        self
    }

    /// Remove the definition; the cell becomes a plain null value.
    pub fn clear_def(&self) -> &Self {
        install_def(&self.inner, None);
        self
    }

    // =========================================================================
    // CHAINABLES / FLAGS
    // =========================================================================

    /// Chainable assignment.
    pub fn set(&self, value: impl Into<Value>) -> &Self {
        self.wv(value);
        self
    }

    pub fn eager(&self) -> bool {
        self.inner.is_eager()
    }

    /// Toggle eager scheduling; turning it on while stale enqueues the cell.
    pub fn set_eager(&self, eager: bool) -> &Self {
        self.inner.set_eager_flag(eager);
        if eager && !self.inner.is_ready() {
            schedule(&self.inner, 1);
        }
        self
    }

    /// Force a defined cell stale and schedule it.
    pub fn unready(&self) -> &Self {
        if self.inner.definition.borrow().is_some() {
            self.inner.mark_stale();
            schedule(&self.inner, 0);
        }
        self
    }

    pub fn compare(&self) -> Compare {
        self.inner.compare.borrow().clone()
    }

    /// The cached failure from the last evaluation, if any.
    pub fn error(&self) -> Option<CellError> {
        self.inner.error.borrow().clone()
    }

    pub fn readonly(&self) -> bool {
        false
    }

    pub fn reactive_tag(&self) -> u8 {
        Self::TYPE
    }

    // =========================================================================
    // GRAPH SURFACE
    // =========================================================================

    /// Add or remove `other` as a consumer of this cell (kept symmetric).
    pub fn consumer(&self, other: &Cell, add: bool) {
        if self.ptr_eq(other) {
            return;
        }
        if add {
            add_edge(&self.inner, &other.inner);
        } else {
            remove_edge(&self.inner, &other.inner);
        }
    }

    /// Add or remove `other` as a provider of this cell (kept symmetric).
    pub fn provider(&self, other: &Cell, add: bool) {
        if self.ptr_eq(other) {
            return;
        }
        if add {
            add_edge(&other.inner, &self.inner);
        } else {
            remove_edge(&other.inner, &self.inner);
        }
    }

    /// Propagate staleness from this cell at the given distance.
    pub fn ripple(&self, distance: u32) {
        ripple_from(&self.inner, distance);
    }

    /// Snapshot of the current providers.
    pub fn providers(&self) -> Vec<Cell> {
        self.inner
            .providers
            .borrow()
            .iter()
            .cloned()
            .map(Cell::from_inner)
            .collect()
    }

    /// Snapshot of the live consumers.
    pub fn consumers(&self) -> Vec<Cell> {
        self.inner
            .collect_consumers()
            .into_iter()
            .map(Cell::from_inner)
            .collect()
    }

    /// Whether two handles refer to the same node.
    pub fn ptr_eq(&self, other: &Cell) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Display for Cell {
    /// Value coercion: renders the resolved value, evaluating if necessary.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.rv() {
            Ok(value) => write!(f, "{value}"),
            Err(err) => write!(f, "<{err}>"),
        }
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.inner.is_ready() {
            "ready"
        } else if self.inner.is_stale() {
            "stale"
        } else {
            "maybe-stale"
        };
        f.debug_struct("Cell")
            .field("state", &state)
            .field("eager", &self.inner.is_eager())
            .field("queued", &self.inner.queued_tier())
            .finish()
    }
}

// =============================================================================
// FACTORIES
// =============================================================================

/// A cell holding a concrete value.
pub fn cell(value: impl Into<Value>) -> Cell {
    Cell::new(CellOptions {
        v: Some(value.into()),
        ..Default::default()
    })
}

/// A cell computed by a definition.
pub fn cell_def(def: impl Fn(&Value) -> Result<Value, CellError> + 'static) -> Cell {
    Cell::new(CellOptions {
        def: Some(DefSource::func(def)),
        ..Default::default()
    })
}

/// A cell from the full option set.
pub fn cell_with(options: CellOptions) -> Cell {
    Cell::new(options)
}

// =============================================================================
// TESTS
// =============================================================================
