use std::cell::RefCell;
use std::rc::{Rc, Weak};

use trellis_core::{Callback, Value};

use crate::error::{Result, SkelError};
use crate::proxy::{CallProxy, CallProxyFactory, ProxyError};
use crate::realized::RealizedWidget;
use crate::skeleton::{SharedSkeleton, Skeleton};

/// Application logic attached to a skeleton.
///
/// Methods are dispatched by name so templates can reference them before a
/// controller exists (see [`CallProxy`]).
///
/// ```rust,ignore
/// struct Form { view: Option<ViewHandle> }
///
/// impl Controller for Form {
///     fn set_view(&mut self, view: ViewHandle) { self.view = Some(view); }
///     fn call(&mut self, method: &str, _args: &[Value]) -> anyhow::Result<Value> {
///         match method {
///             "submit" => { /* ... */ Ok(Value::None) }
///             other => Err(unknown_method(other)),
///         }
///     }
/// }
/// ```
pub trait Controller {
    /// Receives a back-reference to the skeleton this controller now serves.
    fn set_view(&mut self, view: ViewHandle);

    /// Runs the method called `method`.
    fn call(&mut self, method: &str, args: &[Value]) -> anyhow::Result<Value>;
}

pub type SharedController = Rc<RefCell<dyn Controller>>;

/// Error a [`Controller::call`] implementation returns for names it does not know.
pub fn unknown_method(method: &str) -> anyhow::Error {
    anyhow::anyhow!("controller has no method '{method}'")
}

// ── ControllerSlot ────────────────────────────────────────────────────────

/// The single controller reference of a skeleton, shared with its proxies.
#[derive(Clone, Default)]
pub(crate) struct ControllerSlot(Rc<RefCell<Option<SharedController>>>);

impl ControllerSlot {
    pub(crate) fn get(&self) -> Option<SharedController> {
        self.0.borrow().clone()
    }

    pub(crate) fn set(&self, controller: Option<SharedController>) {
        *self.0.borrow_mut() = controller;
    }

    pub(crate) fn ptr_eq(&self, other: &ControllerSlot) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

// ── ControllerRef ─────────────────────────────────────────────────────────

/// What reading a skeleton's controller yields: the attached controller, or
/// a proxy factory that resolves against whatever is attached at call time.
#[derive(Clone)]
pub enum ControllerRef {
    Attached(SharedController),
    Unbound(CallProxyFactory),
}

impl ControllerRef {
    pub fn is_attached(&self) -> bool {
        matches!(self, ControllerRef::Attached(_))
    }

    /// A callback invoking `method`.
    ///
    /// When a controller is attached the callback is bound to it directly;
    /// otherwise it is a [`CallProxy`] that fails until one is attached.
    pub fn method(&self, method: &str) -> Callback {
        match self {
            ControllerRef::Attached(controller) => {
                let controller = Rc::clone(controller);
                let method = method.to_string();
                Callback::new(move |args| {
                    let mut controller = controller
                        .try_borrow_mut()
                        .map_err(|_| ProxyError::Busy { method: method.clone() })?;
                    controller.call(&method, args)
                })
            }
            ControllerRef::Unbound(factory) => factory.method(method).into(),
        }
    }

    /// The proxy factory, if no controller was attached.
    pub fn proxies(&self) -> Option<&CallProxyFactory> {
        match self {
            ControllerRef::Unbound(factory) => Some(factory),
            ControllerRef::Attached(_) => None,
        }
    }

    pub fn proxy(&self, method: &str) -> Option<CallProxy> {
        self.proxies().map(|f| f.method(method))
    }
}

// ── ViewHandle ────────────────────────────────────────────────────────────

/// Weak back-reference from a controller to its skeleton.
#[derive(Clone)]
pub struct ViewHandle(Weak<RefCell<Skeleton>>);

impl ViewHandle {
    pub(crate) fn new(skeleton: &SharedSkeleton) -> Self {
        Self(Rc::downgrade(skeleton))
    }

    pub fn upgrade(&self) -> Option<SharedSkeleton> {
        self.0.upgrade()
    }

    /// Looks up a realized widget of the view by label.
    ///
    /// Fails while the view is mutably borrowed (e.g. from inside a row
    /// mutation) or after it has been dropped.
    pub fn created(&self, label: &str) -> Result<RealizedWidget> {
        let skeleton = self.upgrade().ok_or(SkelError::ViewUnavailable)?;
        let skeleton = skeleton.try_borrow().map_err(|_| SkelError::ViewUnavailable)?;
        skeleton.created(label).cloned()
    }
}
