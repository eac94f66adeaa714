//! Trellis UI: declarative grid realization on top of `trellis-core`.
//!
//! A template describes rows of [`WidgetSpec`] cells. A [`Skeleton`] asks its
//! [`Toolkit`](trellis_core::Toolkit) to construct, configure and position
//! each cell inside one container, records every placement in a
//! [`GridCache`], and keeps labeled cells in a registry of
//! [`RealizedWidget`]s. Rows can then be appended, inserted and destroyed
//! without asking the toolkit about the current layout.
//!
//! # Quick start
//!
//! ```rust
//! use trellis_core::headless::HeadlessToolkit;
//! use trellis_core::LazyVar;
//! use trellis_ui::prelude::*;
//!
//! let rows = vec![
//!     vec![
//!         Some(WidgetSpec::new("Label").init("text", "Name")),
//!         Some(WidgetSpec::new("Entry").init("textvariable", LazyVar::string()).set_label("name")),
//!     ],
//! ];
//! let skel = SkeletonBuilder::new()
//!     .toolkit(HeadlessToolkit::new())
//!     .template(rows)
//!     .build()
//!     .unwrap();
//!
//! let row = skel.borrow_mut().append_row(&[None, Some(WidgetSpec::new("Button"))]).unwrap();
//! assert_eq!(row, 1);
//! assert_eq!(skel.borrow().find_row_of("name"), Some(0));
//! ```
//!
//! # Controllers
//!
//! Implement [`Controller`] for application logic. Templates reach it through
//! [`Skeleton::controller`], which hands out [`CallProxy`] stand-ins until a
//! controller is attached:
//!
//! ```rust,ignore
//! fn rows(&self, skel: &Skeleton) -> TemplateRows {
//!     let save = skel.controller().method("save");
//!     vec![vec![Some(WidgetSpec::new("Button").init("command", save))]]
//! }
//! ```

pub mod arrange;
pub mod cache;
pub mod controller;
pub mod error;
pub mod proxy;
pub mod realized;
pub mod rows;
pub mod skeleton;
pub mod template;
pub mod widget_spec;

pub use arrange::{ArrangeArgs, Autogrid};
pub use cache::{CachedWidget, GridCache};
pub use controller::{Controller, ControllerRef, SharedController, ViewHandle, unknown_method};
pub use error::{Phase, SkelError};
pub use proxy::{CallProxy, CallProxyFactory, ProxyError};
pub use realized::RealizedWidget;
pub use skeleton::{AssignedEvent, SharedSkeleton, Skeleton, SkeletonBuilder};
pub use template::{EventDef, GridConfig, Template};
pub use widget_spec::{TemplateRow, TemplateRows, WidgetSpec};

/// Convenience re-exports for application code.
pub mod prelude {
    pub use crate::{
        Autogrid, CachedWidget, Controller, ControllerRef, EventDef, GridConfig, RealizedWidget,
        SharedController, SharedSkeleton, Skeleton, SkeletonBuilder, Template, TemplateRows,
        ViewHandle, WidgetSpec,
    };
    pub use trellis_core::{ArgMap, Callback, EventId, LazyVar, ObjectId, Value};
}
