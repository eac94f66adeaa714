use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::toolkit::ObjectId;

/// Insertion-ordered keyword arguments handed across the toolkit boundary.
pub type ArgMap = IndexMap<String, Value>;

/// Returns `base` overlaid with `over`; keys in `over` win.
pub fn merge_args(base: &ArgMap, over: &ArgMap) -> ArgMap {
    let mut merged = base.clone();
    for (k, v) in over {
        merged.insert(k.clone(), v.clone());
    }
    merged
}

/// Replaces every [`Value::Lazy`] in `args` with a fresh [`Variable`] owned by
/// `owner`. Other values are copied unchanged.
pub fn resolve_args(args: &ArgMap, owner: ObjectId) -> ArgMap {
    args.iter()
        .map(|(k, v)| (k.clone(), v.resolve_lazy(owner)))
        .collect()
}

// ── Value ─────────────────────────────────────────────────────────────────

/// A single argument value.
///
/// Variables and callbacks compare by identity; everything else by value.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    #[default]
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    /// Reference to another concrete toolkit object.
    Object(ObjectId),
    /// A live state-holder.
    Var(Variable),
    /// A state-holder that does not exist yet; realized per widget.
    Lazy(LazyVar),
    Callback(Callback),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_var(&self) -> Option<&Variable> {
        match self {
            Value::Var(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_callback(&self) -> Option<&Callback> {
        match self {
            Value::Callback(c) => Some(c),
            _ => None,
        }
    }

    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Realizes a lazy state-holder; any other value is returned as is.
    pub fn resolve_lazy(&self, owner: ObjectId) -> Value {
        match self {
            Value::Lazy(lazy) => Value::Var(lazy.realize(owner)),
            other => other.clone(),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Value::Int(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::List(v)
    }
}

impl From<ObjectId> for Value {
    fn from(v: ObjectId) -> Self {
        Value::Object(v)
    }
}

impl From<Variable> for Value {
    fn from(v: Variable) -> Self {
        Value::Var(v)
    }
}

impl From<LazyVar> for Value {
    fn from(v: LazyVar) -> Self {
        Value::Lazy(v)
    }
}

impl From<Callback> for Value {
    fn from(v: Callback) -> Self {
        Value::Callback(v)
    }
}

// ── VarKind / LazyVar ─────────────────────────────────────────────────────

/// The flavour of a state-holder, which fixes its default value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarKind {
    String,
    Int,
    Double,
    Boolean,
    List,
}

impl VarKind {
    pub fn default_value(self) -> Value {
        match self {
            VarKind::String => Value::Str(String::new()),
            VarKind::Int => Value::Int(0),
            VarKind::Double => Value::Float(0.0),
            VarKind::Boolean => Value::Bool(false),
            VarKind::List => Value::List(Vec::new()),
        }
    }
}

/// Template-side placeholder for a state-holder.
///
/// Each realization of the template produces a distinct [`Variable`].
#[derive(Debug, Clone, PartialEq)]
pub struct LazyVar {
    pub kind: VarKind,
    pub initial: Option<Box<Value>>,
}

impl LazyVar {
    pub fn new(kind: VarKind) -> Self {
        Self { kind, initial: None }
    }

    pub fn string() -> Self {
        Self::new(VarKind::String)
    }

    pub fn int() -> Self {
        Self::new(VarKind::Int)
    }

    pub fn double() -> Self {
        Self::new(VarKind::Double)
    }

    pub fn boolean() -> Self {
        Self::new(VarKind::Boolean)
    }

    pub fn list() -> Self {
        Self::new(VarKind::List)
    }

    pub fn with_initial(mut self, v: impl Into<Value>) -> Self {
        self.initial = Some(Box::new(v.into()));
        self
    }

    pub fn realize(&self, owner: ObjectId) -> Variable {
        let initial = match &self.initial {
            Some(v) => Value::clone(v),
            None => self.kind.default_value(),
        };
        Variable::new(self.kind, initial, Some(owner))
    }
}

// ── Variable ──────────────────────────────────────────────────────────────

struct VarInner {
    kind: VarKind,
    owner: Option<ObjectId>,
    value: RefCell<Value>,
}

/// A shared, mutable state-holder bound into widgets (text, selection, ...).
///
/// Clones share the same storage.
#[derive(Clone)]
pub struct Variable(Rc<VarInner>);

impl Variable {
    pub fn new(kind: VarKind, initial: Value, owner: Option<ObjectId>) -> Self {
        Self(Rc::new(VarInner { kind, owner, value: RefCell::new(initial) }))
    }

    #[inline]
    pub fn kind(&self) -> VarKind {
        self.0.kind
    }

    /// The object this state-holder was created for, if any.
    #[inline]
    pub fn owner(&self) -> Option<ObjectId> {
        self.0.owner
    }

    pub fn get(&self) -> Value {
        self.0.value.borrow().clone()
    }

    pub fn set(&self, v: impl Into<Value>) {
        *self.0.value.borrow_mut() = v.into();
    }

    #[inline]
    pub fn ptr_eq(&self, other: &Variable) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Variable {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Variable")
            .field("kind", &self.0.kind)
            .field("owner", &self.0.owner)
            .finish_non_exhaustive()
    }
}

// ── Callback ──────────────────────────────────────────────────────────────

type CallbackFn = dyn Fn(&[Value]) -> anyhow::Result<Value>;

/// A shared action invoked later by the toolkit (commands, event handlers).
#[derive(Clone)]
pub struct Callback(Rc<CallbackFn>);

impl Callback {
    pub fn new(f: impl Fn(&[Value]) -> anyhow::Result<Value> + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Wraps a closure that ignores its arguments and cannot fail.
    pub fn from_fn(f: impl Fn() + 'static) -> Self {
        Self::new(move |_| {
            f();
            Ok(Value::None)
        })
    }

    pub fn call(&self, args: &[Value]) -> anyhow::Result<Value> {
        (self.0)(args)
    }

    #[inline]
    pub fn ptr_eq(&self, other: &Callback) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Callback {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callback({:p})", Rc::as_ptr(&self.0) as *const ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(pairs: &[(&str, Value)]) -> ArgMap {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    // ── merge_args ────────────────────────────────────────────────────────

    #[test]
    fn merge_prefers_overlay() {
        let base = args(&[("padx", 4.into()), ("sticky", "w".into())]);
        let over = args(&[("sticky", "ew".into())]);
        let merged = merge_args(&base, &over);
        assert_eq!(merged.get("padx"), Some(&Value::Int(4)));
        assert_eq!(merged.get("sticky"), Some(&Value::from("ew")));
    }

    #[test]
    fn merge_keeps_base_order() {
        let base = args(&[("a", 1.into()), ("b", 2.into())]);
        let over = args(&[("c", 3.into()), ("a", 9.into())]);
        let keys: Vec<_> = merge_args(&base, &over).keys().cloned().collect();
        assert_eq!(keys, ["a", "b", "c"]);
    }

    // ── lazy variables ────────────────────────────────────────────────────

    #[test]
    fn lazy_resolves_to_fresh_variable_each_time() {
        let owner = ObjectId::from_raw(1);
        let lazy = Value::Lazy(LazyVar::string().with_initial("hi"));
        let a = lazy.resolve_lazy(owner);
        let b = lazy.resolve_lazy(owner);
        let (a, b) = (a.as_var().unwrap(), b.as_var().unwrap());
        assert_ne!(a, b);
        assert_eq!(a.get(), Value::from("hi"));
        assert_eq!(a.owner(), Some(owner));
    }

    #[test]
    fn lazy_without_initial_uses_kind_default() {
        let var = LazyVar::boolean().realize(ObjectId::from_raw(3));
        assert_eq!(var.get(), Value::Bool(false));
        assert_eq!(var.kind(), VarKind::Boolean);
    }

    #[test]
    fn lazy_initial_can_hold_nested_values() {
        let items = vec![Value::from("a"), Value::from(2)];
        let lazy = Value::from(LazyVar::list().with_initial(items.clone()));
        let copy = lazy.clone();
        assert_eq!(lazy, copy);
        let var = copy.resolve_lazy(ObjectId::from_raw(4));
        assert_eq!(var.as_var().unwrap().get(), Value::List(items));
    }

    #[test]
    fn resolve_args_leaves_literals_alone() {
        let owner = ObjectId::from_raw(2);
        let resolved = resolve_args(
            &args(&[("text", "x".into()), ("textvariable", LazyVar::string().into())]),
            owner,
        );
        assert_eq!(resolved.get("text"), Some(&Value::from("x")));
        assert!(resolved.get("textvariable").unwrap().as_var().is_some());
    }

    // ── identity equality ─────────────────────────────────────────────────

    #[test]
    fn variable_clones_share_storage() {
        let var = Variable::new(VarKind::Int, 1.into(), None);
        let other = var.clone();
        other.set(5);
        assert_eq!(var.get(), Value::Int(5));
        assert_eq!(var, other);
    }

    #[test]
    fn callbacks_compare_by_identity() {
        let a = Callback::from_fn(|| {});
        let b = Callback::from_fn(|| {});
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }
}
