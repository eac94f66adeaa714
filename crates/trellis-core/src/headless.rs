//! In-memory toolkit.
//!
//! [`HeadlessToolkit`] implements [`Toolkit`] without any windowing system.
//! It records every successful call, tracks live objects and their
//! placements, and keeps event bindings so they can be fired later through a
//! [`HeadlessHandle`]. Failures can be injected into the n-th call of an
//! operation, which is how realization error paths are exercised.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use anyhow::{anyhow, bail, Result};

use crate::event::EventId;
use crate::toolkit::{BindHandle, BindMode, BindScope, ObjectId, Toolkit, WidgetClass};
use crate::value::{merge_args, ArgMap, Callback, Value};

// ── Records ───────────────────────────────────────────────────────────────

/// Toolkit operation kinds, used to target injected failures.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Op {
    Construct,
    Configure,
    Position,
    Dispose,
    Bind,
    Unbind,
    ConfigureRow,
    ConfigureColumn,
}

/// One successful toolkit call, in the order it was made.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolkitCall {
    Construct { id: ObjectId, parent: Option<ObjectId>, class: WidgetClass, args: ArgMap },
    Configure { id: ObjectId, args: ArgMap },
    Position { id: ObjectId, row: usize, column: usize, args: ArgMap },
    Dispose { id: ObjectId },
    Bind { target: ObjectId, event: EventId, scope: BindScope, mode: BindMode, handle: BindHandle },
    Unbind { target: ObjectId, event: EventId, handle: Option<BindHandle> },
    ConfigureRow { container: ObjectId, index: usize, args: ArgMap },
    ConfigureColumn { container: ObjectId, index: usize, args: ArgMap },
}

impl ToolkitCall {
    pub fn op(&self) -> Op {
        match self {
            ToolkitCall::Construct { .. } => Op::Construct,
            ToolkitCall::Configure { .. } => Op::Configure,
            ToolkitCall::Position { .. } => Op::Position,
            ToolkitCall::Dispose { .. } => Op::Dispose,
            ToolkitCall::Bind { .. } => Op::Bind,
            ToolkitCall::Unbind { .. } => Op::Unbind,
            ToolkitCall::ConfigureRow { .. } => Op::ConfigureRow,
            ToolkitCall::ConfigureColumn { .. } => Op::ConfigureColumn,
        }
    }
}

/// Where an object was last placed.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub row: usize,
    pub column: usize,
    pub args: ArgMap,
}

/// A live object as the headless toolkit sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessObject {
    pub class: WidgetClass,
    pub parent: Option<ObjectId>,
    pub init_args: ArgMap,
    /// Accumulated `configure` arguments.
    pub config: ArgMap,
    pub placement: Option<Placement>,
}

impl HeadlessObject {
    /// Looks `key` up in configuration first, then in construction args.
    pub fn option(&self, key: &str) -> Option<&Value> {
        self.config.get(key).or_else(|| self.init_args.get(key))
    }
}

struct Binding {
    target: ObjectId,
    event: EventId,
    scope: BindScope,
    handle: BindHandle,
    action: Callback,
}

struct Failure {
    op: Op,
    remaining: usize,
    message: String,
}

#[derive(Default)]
struct HeadlessState {
    next_id: u64,
    next_bind: u64,
    objects: BTreeMap<ObjectId, HeadlessObject>,
    calls: Vec<ToolkitCall>,
    bindings: Vec<Binding>,
    failures: Vec<Failure>,
}

impl HeadlessState {
    fn check_failure(&mut self, op: Op) -> Result<()> {
        let mut hit = None;
        for (i, f) in self.failures.iter_mut().enumerate() {
            if f.op != op {
                continue;
            }
            if f.remaining == 0 {
                hit = Some(i);
                break;
            }
            f.remaining -= 1;
        }
        match hit {
            Some(i) => Err(anyhow!(self.failures.remove(i).message)),
            None => Ok(()),
        }
    }

    fn object_mut(&mut self, id: ObjectId) -> Result<&mut HeadlessObject> {
        self.objects.get_mut(&id).ok_or_else(|| anyhow!("object {id} does not exist"))
    }

    fn descendants(&self, root: ObjectId) -> Vec<ObjectId> {
        let mut out = vec![root];
        let mut i = 0;
        while i < out.len() {
            let parent = out[i];
            out.extend(
                self.objects
                    .iter()
                    .filter(|(_, o)| o.parent == Some(parent))
                    .map(|(id, _)| *id),
            );
            i += 1;
        }
        out
    }
}

// ── HeadlessToolkit ───────────────────────────────────────────────────────

/// Recording [`Toolkit`] with no visual output.
#[derive(Default)]
pub struct HeadlessToolkit {
    state: Rc<RefCell<HeadlessState>>,
}

impl HeadlessToolkit {
    pub fn new() -> Self {
        Self::default()
    }

    /// A handle that stays usable after the toolkit has been moved into an
    /// engine.
    pub fn handle(&self) -> HeadlessHandle {
        HeadlessHandle { state: Rc::clone(&self.state) }
    }
}

impl Toolkit for HeadlessToolkit {
    fn construct(
        &mut self,
        parent: Option<ObjectId>,
        class: &WidgetClass,
        args: &ArgMap,
    ) -> Result<ObjectId> {
        let mut s = self.state.borrow_mut();
        s.check_failure(Op::Construct)?;
        if let Some(p) = parent {
            if !s.objects.contains_key(&p) {
                bail!("parent {p} does not exist");
            }
        }
        s.next_id += 1;
        let id = ObjectId::from_raw(s.next_id);
        s.objects.insert(
            id,
            HeadlessObject {
                class: class.clone(),
                parent,
                init_args: args.clone(),
                config: ArgMap::new(),
                placement: None,
            },
        );
        s.calls.push(ToolkitCall::Construct { id, parent, class: class.clone(), args: args.clone() });
        log::trace!("headless: constructed {class} as {id}");
        Ok(id)
    }

    fn configure(&mut self, object: ObjectId, args: &ArgMap) -> Result<()> {
        let mut s = self.state.borrow_mut();
        s.check_failure(Op::Configure)?;
        let obj = s.object_mut(object)?;
        obj.config = merge_args(&obj.config, args);
        s.calls.push(ToolkitCall::Configure { id: object, args: args.clone() });
        Ok(())
    }

    fn position(&mut self, object: ObjectId, row: usize, column: usize, args: &ArgMap)
        -> Result<()> {
        let mut s = self.state.borrow_mut();
        s.check_failure(Op::Position)?;
        s.object_mut(object)?.placement = Some(Placement { row, column, args: args.clone() });
        s.calls.push(ToolkitCall::Position { id: object, row, column, args: args.clone() });
        Ok(())
    }

    fn dispose(&mut self, object: ObjectId) -> Result<()> {
        let mut s = self.state.borrow_mut();
        s.check_failure(Op::Dispose)?;
        if !s.objects.contains_key(&object) {
            bail!("object {object} does not exist");
        }
        let doomed = s.descendants(object);
        for id in &doomed {
            s.objects.remove(id);
        }
        s.bindings.retain(|b| !doomed.contains(&b.target));
        s.calls.push(ToolkitCall::Dispose { id: object });
        Ok(())
    }

    fn bind(
        &mut self,
        target: ObjectId,
        event: &EventId,
        scope: &BindScope,
        action: Callback,
        mode: BindMode,
    ) -> Result<BindHandle> {
        let mut s = self.state.borrow_mut();
        s.check_failure(Op::Bind)?;
        if !s.objects.contains_key(&target) {
            bail!("bind target {target} does not exist");
        }
        if mode == BindMode::Replace {
            s.bindings.retain(|b| !(b.target == target && &b.event == event && &b.scope == scope));
        }
        s.next_bind += 1;
        let handle = BindHandle::new(format!("bind{}", s.next_bind));
        s.bindings.push(Binding {
            target,
            event: event.clone(),
            scope: scope.clone(),
            handle: handle.clone(),
            action,
        });
        s.calls.push(ToolkitCall::Bind {
            target,
            event: event.clone(),
            scope: scope.clone(),
            mode,
            handle: handle.clone(),
        });
        Ok(handle)
    }

    fn unbind(&mut self, target: ObjectId, event: &EventId, handle: Option<&BindHandle>)
        -> Result<()> {
        let mut s = self.state.borrow_mut();
        s.check_failure(Op::Unbind)?;
        s.bindings.retain(|b| {
            let same_event = b.target == target && &b.event == event;
            !(same_event && handle.is_none_or(|h| &b.handle == h))
        });
        s.calls.push(ToolkitCall::Unbind { target, event: event.clone(), handle: handle.cloned() });
        Ok(())
    }

    fn configure_row(&mut self, container: ObjectId, index: usize, args: &ArgMap) -> Result<()> {
        let mut s = self.state.borrow_mut();
        s.check_failure(Op::ConfigureRow)?;
        s.calls.push(ToolkitCall::ConfigureRow { container, index, args: args.clone() });
        Ok(())
    }

    fn configure_column(&mut self, container: ObjectId, index: usize, args: &ArgMap)
        -> Result<()> {
        let mut s = self.state.borrow_mut();
        s.check_failure(Op::ConfigureColumn)?;
        s.calls.push(ToolkitCall::ConfigureColumn { container, index, args: args.clone() });
        Ok(())
    }
}

// ── HeadlessHandle ────────────────────────────────────────────────────────

/// Inspection and driving handle for a [`HeadlessToolkit`].
///
/// Event callbacks run outside any internal borrow, so they may call back
/// into an engine that owns the toolkit.
#[derive(Clone)]
pub struct HeadlessHandle {
    state: Rc<RefCell<HeadlessState>>,
}

impl HeadlessHandle {
    pub fn calls(&self) -> Vec<ToolkitCall> {
        self.state.borrow().calls.clone()
    }

    /// Returns the recorded calls and starts a fresh log.
    pub fn take_calls(&self) -> Vec<ToolkitCall> {
        std::mem::take(&mut self.state.borrow_mut().calls)
    }

    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    pub fn object(&self, id: ObjectId) -> Option<HeadlessObject> {
        self.state.borrow().objects.get(&id).cloned()
    }

    pub fn is_alive(&self, id: ObjectId) -> bool {
        self.state.borrow().objects.contains_key(&id)
    }

    pub fn live_count(&self) -> usize {
        self.state.borrow().objects.len()
    }

    /// `(row, column)` of the last placement of `id`.
    pub fn placement(&self, id: ObjectId) -> Option<(usize, usize)> {
        self.state
            .borrow()
            .objects
            .get(&id)
            .and_then(|o| o.placement.as_ref())
            .map(|p| (p.row, p.column))
    }

    /// Makes the `n`-th upcoming call of `op` (0-based) fail with `message`.
    pub fn fail_nth(&self, op: Op, n: usize, message: impl Into<String>) {
        self.state.borrow_mut().failures.push(Failure { op, remaining: n, message: message.into() });
    }

    pub fn binding_count(&self, target: ObjectId, event: &EventId) -> usize {
        self.state
            .borrow()
            .bindings
            .iter()
            .filter(|b| b.target == target && &b.event == event)
            .count()
    }

    /// Fires `event` on `target`, running every matching binding in bind
    /// order. Widget, class and application-wide bindings all match.
    pub fn fire(&self, target: ObjectId, event: &EventId, args: &[Value]) -> Vec<Result<Value>> {
        let actions: Vec<Callback> = {
            let s = self.state.borrow();
            let class = s.objects.get(&target).map(|o| o.class.clone());
            s.bindings
                .iter()
                .filter(|b| &b.event == event)
                .filter(|b| match &b.scope {
                    BindScope::Widget => b.target == target,
                    BindScope::All => true,
                    BindScope::Class(name) => class.as_ref().is_some_and(|c| c.name() == name.as_str()),
                })
                .map(|b| b.action.clone())
                .collect()
        };
        actions.iter().map(|a| a.call(args)).collect()
    }

    /// Invokes the callback stored under `key` (e.g. `"command"`) on `target`,
    /// as a button press would.
    pub fn invoke(&self, target: ObjectId, key: &str, args: &[Value]) -> Result<Value> {
        let action = {
            let s = self.state.borrow();
            let obj = s.objects.get(&target).ok_or_else(|| anyhow!("object {target} does not exist"))?;
            obj.option(key)
                .and_then(Value::as_callback)
                .cloned()
                .ok_or_else(|| anyhow!("object {target} has no callback '{key}'"))?
        };
        action.call(args)
    }
}
