use anyhow::Result;

use crate::event::EventId;
use crate::value::{ArgMap, Callback};

use super::handle::{BindHandle, ObjectId, WidgetClass};

/// Whether a new binding replaces or joins existing bindings of the same event.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum BindMode {
    #[default]
    Replace,
    Add,
}

/// Where an event binding is attached.
#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub enum BindScope {
    /// Only the target object.
    #[default]
    Widget,
    /// Every object of the application.
    All,
    /// Every object of the named toolkit class.
    Class(String),
}

/// Contract implemented by a concrete UI toolkit adapter.
///
/// Every method may fail; failures are opaque to the engine and are reported
/// back to the caller annotated with where they happened.
///
/// Positioning is by integer row/column; every other positioning key (span,
/// alignment, padding, ...) is passed through in `args` untouched.
pub trait Toolkit {
    /// Creates a new object of `class` inside `parent` (or top-level when `None`).
    fn construct(
        &mut self,
        parent: Option<ObjectId>,
        class: &WidgetClass,
        args: &ArgMap,
    ) -> Result<ObjectId>;

    /// Applies post-construction configuration.
    fn configure(&mut self, object: ObjectId, args: &ArgMap) -> Result<()>;

    /// Places `object` at `(row, column)` of its parent's grid.
    fn position(&mut self, object: ObjectId, row: usize, column: usize, args: &ArgMap)
        -> Result<()>;

    /// Destroys `object` and releases everything the toolkit holds for it.
    fn dispose(&mut self, object: ObjectId) -> Result<()>;

    fn bind(
        &mut self,
        target: ObjectId,
        event: &EventId,
        scope: &BindScope,
        action: Callback,
        mode: BindMode,
    ) -> Result<BindHandle>;

    /// Removes one binding, or every binding of `event` on `target` when
    /// `handle` is `None`.
    fn unbind(&mut self, target: ObjectId, event: &EventId, handle: Option<&BindHandle>)
        -> Result<()>;

    /// Grid sizing for row `index` of `container` (weight, minsize, ...).
    fn configure_row(&mut self, container: ObjectId, index: usize, args: &ArgMap) -> Result<()>;

    /// Grid sizing for column `index` of `container`.
    fn configure_column(&mut self, container: ObjectId, index: usize, args: &ArgMap)
        -> Result<()>;
}
