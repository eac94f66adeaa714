//! Toolkit-facing contracts.
//!
//! This module defines the stable interface between the skeleton engine and
//! whatever actually creates, places, and destroys visual objects. The engine
//! never inspects toolkit state; it only issues calls through [`Toolkit`] and
//! keeps its own bookkeeping.

mod contract;
mod handle;

pub use contract::{BindMode, BindScope, Toolkit};
pub use handle::{BindHandle, ObjectId, WidgetClass};
