//! Trellis core crate.
//!
//! This crate owns the contracts shared by every higher layer: the
//! [`toolkit::Toolkit`] boundary that creates and places concrete UI objects,
//! the argument [`value`] model handed across it, event identifiers, and
//! logger initialization.

pub mod event;
pub mod headless;
pub mod logging;
pub mod toolkit;
pub mod value;

pub use event::EventId;
pub use toolkit::{BindHandle, BindMode, BindScope, ObjectId, Toolkit, WidgetClass};
pub use value::{ArgMap, Callback, LazyVar, Value, VarKind, Variable};
