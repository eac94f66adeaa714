use std::fmt;
use std::rc::Rc;

use thiserror::Error;
use trellis_core::{Callback, Value};

use crate::controller::ControllerSlot;

/// Failure of a deferred controller call.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("Cannot call. Have you assigned a controller yet?")]
    Unbound { method: String },

    /// The controller was already executing a method when `method` was
    /// invoked.
    #[error("controller is busy; '{method}' was invoked re-entrantly")]
    Busy { method: String },

    #[error("controller method '{method}' failed: {source}")]
    Failed {
        method: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Hands out [`CallProxy`] values bound to one skeleton's controller slot.
#[derive(Clone)]
pub struct CallProxyFactory {
    slot: ControllerSlot,
}

impl CallProxyFactory {
    pub(crate) fn new(slot: ControllerSlot) -> Self {
        Self { slot }
    }

    /// A proxy for the controller method called `method`.
    pub fn method(&self, method: impl Into<String>) -> CallProxy {
        CallProxy { slot: self.slot.clone(), method: Rc::from(method.into()) }
    }
}

impl fmt::Debug for CallProxyFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CallProxyFactory")
    }
}

/// A named controller method, looked up when called rather than when created.
///
/// Proxies let a template wire actions before any controller is attached.
/// Calling one while no controller is attached fails with
/// [`ProxyError::Unbound`]; once one is attached, every existing proxy
/// forwards to it.
#[derive(Clone)]
pub struct CallProxy {
    slot: ControllerSlot,
    method: Rc<str>,
}

impl CallProxy {
    pub fn method_name(&self) -> &str {
        &self.method
    }

    pub fn call(&self, args: &[Value]) -> Result<Value, ProxyError> {
        let method = self.method.to_string();
        let Some(controller) = self.slot.get() else {
            log::warn!("proxy call to '{method}' with no controller attached");
            return Err(ProxyError::Unbound { method });
        };
        let mut controller = match controller.try_borrow_mut() {
            Ok(c) => c,
            Err(_) => return Err(ProxyError::Busy { method }),
        };
        log::debug!("proxy: dispatching '{method}'");
        controller
            .call(&self.method, args)
            .map_err(|source| ProxyError::Failed { method, source })
    }
}

impl PartialEq for CallProxy {
    fn eq(&self, other: &Self) -> bool {
        self.slot.ptr_eq(&other.slot) && self.method == other.method
    }
}

impl fmt::Debug for CallProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CallProxy").field(&self.method).finish()
    }
}

impl From<CallProxy> for Callback {
    fn from(proxy: CallProxy) -> Self {
        Callback::new(move |args| proxy.call(args).map_err(anyhow::Error::from))
    }
}

impl From<CallProxy> for Value {
    fn from(proxy: CallProxy) -> Self {
        Value::Callback(proxy.into())
    }
}
