use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Context;
use indexmap::IndexMap;
use trellis_core::value::{merge_args, resolve_args};
use trellis_core::{ArgMap, BindHandle, EventId, ObjectId, Toolkit, Value, WidgetClass};

use crate::cache::{CachedWidget, GridCache};
use crate::controller::{ControllerRef, ControllerSlot, SharedController, ViewHandle};
use crate::error::{Phase, Result, SkelError};
use crate::proxy::CallProxyFactory;
use crate::realized::RealizedWidget;
use crate::template::{EventDef, GridConfig, Template};
use crate::widget_spec::{TemplateRows, WidgetSpec};

pub type SharedSkeleton = Rc<RefCell<Skeleton>>;

const DEFAULT_CONTAINER: &str = "Frame";

// ── AssignedEvent ─────────────────────────────────────────────────────────

/// A binding kept under an id so it can be removed later.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignedEvent {
    pub target: ObjectId,
    pub event:  EventId,
    pub handle: BindHandle,
}

// ── SkeletonBuilder ───────────────────────────────────────────────────────

/// Configures and realizes a [`Skeleton`].
///
/// A toolkit and a template are required; everything else has a default.
///
/// ```rust,ignore
/// let skel = SkeletonBuilder::new()
///     .toolkit(HeadlessToolkit::new())
///     .template(vec![vec![Some(WidgetSpec::new("Label").init("text", "Name"))]])
///     .global_grid_arg("padx", 4)
///     .controller(controller)
///     .build()?;
/// ```
pub struct SkeletonBuilder {
    toolkit:          Option<Box<dyn Toolkit>>,
    template:         Option<Box<dyn Template>>,
    master:           Option<ObjectId>,
    container_class:  WidgetClass,
    container_args:   ArgMap,
    controller:       Option<SharedController>,
    global_grid_args: ArgMap,
}

impl Default for SkeletonBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SkeletonBuilder {
    pub fn new() -> Self {
        Self {
            toolkit:          None,
            template:         None,
            master:           None,
            container_class:  WidgetClass::new(DEFAULT_CONTAINER),
            container_args:   ArgMap::new(),
            controller:       None,
            global_grid_args: ArgMap::new(),
        }
    }

    pub fn toolkit(mut self, toolkit: impl Toolkit + 'static) -> Self {
        self.toolkit = Some(Box::new(toolkit));
        self
    }

    pub fn boxed_toolkit(mut self, toolkit: Box<dyn Toolkit>) -> Self {
        self.toolkit = Some(toolkit);
        self
    }

    pub fn template(mut self, template: impl Template + 'static) -> Self {
        self.template = Some(Box::new(template));
        self
    }

    /// Parent object of the container; `None` makes it top-level.
    pub fn master(mut self, master: ObjectId) -> Self {
        self.master = Some(master);
        self
    }

    pub fn container_class(mut self, class: impl Into<WidgetClass>) -> Self {
        self.container_class = class.into();
        self
    }

    pub fn container_arg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.container_args.insert(key.into(), value.into());
        self
    }

    pub fn controller(mut self, controller: SharedController) -> Self {
        self.controller = Some(controller);
        self
    }

    /// Positioning option applied to every cell; per-cell options win.
    pub fn global_grid_arg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.global_grid_args.insert(key.into(), value.into());
        self
    }

    /// Constructs the container, realizes the template and binds its events.
    ///
    /// The controller, if any, receives its [`ViewHandle`] last, once the
    /// skeleton is complete.
    pub fn build(self) -> Result<SharedSkeleton> {
        let mut toolkit = self.toolkit.ok_or(SkelError::MissingToolkit)?;
        let mut template = self.template.ok_or(SkelError::MissingTemplate)?;

        let slot = ControllerSlot::default();
        slot.set(self.controller.clone());

        template.before_init();

        log::debug!("skeleton: constructing {} container", self.container_class);
        let container = toolkit
            .construct(self.master, &self.container_class, &self.container_args)
            .with_context(|| format!("constructing {} container", self.container_class))?;

        let mut skeleton = Skeleton {
            toolkit,
            container,
            master: self.master,
            cache: GridCache::new(),
            created: IndexMap::new(),
            assigned_events: IndexMap::new(),
            global_grid_args: self.global_grid_args,
            slot,
            destroyed: false,
        };
        template.after_init(&mut skeleton)?;

        let rows = template.rows(&skeleton);
        skeleton.realize(&rows)?;
        template.after_widgets(&mut skeleton)?;

        skeleton.apply_grid_config(&template.grid_config())?;
        for def in template.events(&skeleton) {
            skeleton.bind_event(def)?;
        }
        log::debug!(
            "skeleton: realized {} cells in {} rows",
            skeleton.cache.len(),
            skeleton.cache.row_count()
        );

        let shared = Rc::new(RefCell::new(skeleton));
        if let Some(controller) = self.controller {
            hand_view(&shared, &controller)?;
        }
        Ok(shared)
    }
}

fn hand_view(skeleton: &SharedSkeleton, controller: &SharedController) -> Result<()> {
    let mut controller = controller.try_borrow_mut().map_err(|_| SkelError::ControllerBusy)?;
    controller.set_view(ViewHandle::new(skeleton));
    Ok(())
}

// ── Skeleton ──────────────────────────────────────────────────────────────

/// A realized grid of toolkit objects inside one container.
///
/// The skeleton owns its toolkit adapter, the [`GridCache`] of everything it
/// placed, and the registry of labeled widgets. Row mutation lives in
/// [`rows`](crate::rows).
pub struct Skeleton {
    pub(crate) toolkit:   Box<dyn Toolkit>,
    container:            ObjectId,
    master:               Option<ObjectId>,
    pub(crate) cache:     GridCache,
    pub(crate) created:   IndexMap<String, RealizedWidget>,
    assigned_events:      IndexMap<String, AssignedEvent>,
    global_grid_args:     ArgMap,
    slot:                 ControllerSlot,
    destroyed:            bool,
}

impl Skeleton {
    pub fn builder() -> SkeletonBuilder {
        SkeletonBuilder::new()
    }

    #[inline]
    pub fn container(&self) -> ObjectId {
        self.container
    }

    #[inline]
    pub fn master(&self) -> Option<ObjectId> {
        self.master
    }

    pub fn widget_cache(&self) -> &GridCache {
        &self.cache
    }

    pub fn global_grid_args(&self) -> &ArgMap {
        &self.global_grid_args
    }

    /// The realized widget registered under `label`.
    pub fn created(&self, label: &str) -> Result<&RealizedWidget> {
        self.created.get(label).ok_or_else(|| SkelError::UnknownLabel(label.to_string()))
    }

    /// Every labeled widget, in registration order.
    pub fn created_map(&self) -> &IndexMap<String, RealizedWidget> {
        &self.created
    }

    pub fn assigned_events(&self) -> &IndexMap<String, AssignedEvent> {
        &self.assigned_events
    }

    /// The attached controller, or a proxy factory resolving against
    /// whichever controller is attached when a proxy is finally called.
    pub fn controller(&self) -> ControllerRef {
        match self.slot.get() {
            Some(controller) => ControllerRef::Attached(controller),
            None => ControllerRef::Unbound(CallProxyFactory::new(self.slot.clone())),
        }
    }

    /// Proxy factory for this skeleton, whether or not a controller is attached.
    pub fn proxies(&self) -> CallProxyFactory {
        CallProxyFactory::new(self.slot.clone())
    }

    /// Attaches `controller` (or detaches with `None`) and hands it a view of
    /// `this`. Proxies created earlier resolve against the new controller.
    pub fn set_controller(this: &SharedSkeleton, controller: Option<SharedController>) -> Result<()> {
        let slot = this.try_borrow().map_err(|_| SkelError::ViewUnavailable)?.slot.clone();
        slot.set(controller.clone());
        match controller {
            Some(controller) => {
                log::debug!("skeleton: controller attached");
                hand_view(this, &controller)
            }
            None => {
                log::debug!("skeleton: controller detached");
                Ok(())
            }
        }
    }

    pub fn toolkit(&self) -> &dyn Toolkit {
        self.toolkit.as_ref()
    }

    pub fn toolkit_mut(&mut self) -> &mut dyn Toolkit {
        self.toolkit.as_mut()
    }

    #[inline]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    // ── events ────────────────────────────────────────────────────────────

    /// Binds `def`, keeping the handle under its id when it has one.
    pub fn bind_event(&mut self, def: EventDef) -> Result<BindHandle> {
        self.ensure_alive()?;
        let target = def.target.unwrap_or(self.container);
        let handle = self
            .toolkit
            .bind(target, &def.event, &def.scope, def.action, def.mode)
            .with_context(|| format!("binding {} on {target}", def.event))?;
        log::trace!("skeleton: bound {} on {target} as {handle}", def.event);
        if let Some(id) = def.id {
            let assigned = AssignedEvent { target, event: def.event, handle: handle.clone() };
            self.assigned_events.insert(id, assigned);
        }
        Ok(handle)
    }

    /// Removes the binding stored under `id`.
    pub fn unbind_event(&mut self, id: &str) -> Result<()> {
        self.ensure_alive()?;
        let assigned = self
            .assigned_events
            .shift_remove(id)
            .ok_or_else(|| SkelError::UnknownEvent(id.to_string()))?;
        self.toolkit
            .unbind(assigned.target, &assigned.event, Some(&assigned.handle))
            .with_context(|| format!("unbinding event '{id}'"))?;
        log::debug!("skeleton: unbound event '{id}'");
        Ok(())
    }

    // ── teardown ──────────────────────────────────────────────────────────

    /// Disposes every placed object and then the container.
    ///
    /// Calling it again is a no-op. Afterwards every mutating operation
    /// fails with [`SkelError::Destroyed`].
    pub fn destroy(&mut self) -> Result<()> {
        if self.destroyed {
            return Ok(());
        }
        for ((row, column), entry) in self.cache.snapshot() {
            if let Some(widget) = entry.widget() {
                self.toolkit
                    .dispose(widget)
                    .map_err(|e| SkelError::cell(row, column, Phase::Destroying, e))?;
            }
            self.cache.remove(row, column);
        }
        self.toolkit
            .dispose(self.container)
            .with_context(|| format!("disposing container {}", self.container))?;
        self.cache.clear();
        self.created.clear();
        self.assigned_events.clear();
        self.destroyed = true;
        log::debug!("skeleton: destroyed");
        Ok(())
    }

    // ── realization ───────────────────────────────────────────────────────

    pub(crate) fn ensure_alive(&self) -> Result<()> {
        if self.destroyed {
            return Err(SkelError::Destroyed);
        }
        Ok(())
    }

    fn realize(&mut self, rows: &TemplateRows) -> Result<()> {
        for (row, cells) in rows.iter().enumerate() {
            for (column, cell) in cells.iter().enumerate() {
                self.realize_cell(row, column, cell.as_ref())?;
            }
        }
        Ok(())
    }

    /// Realizes one cell at `(row, column)` and records it.
    ///
    /// Construction, configuration and positioning failures are reported
    /// with the cell's coordinates. Nothing is recorded for a failed cell.
    pub(crate) fn realize_cell(
        &mut self,
        row: usize,
        column: usize,
        cell: Option<&WidgetSpec>,
    ) -> Result<()> {
        let Some(spec) = cell else {
            log::trace!("skeleton: ({row}, {column}) left empty");
            self.cache.set(row, column, CachedWidget::Empty);
            return Ok(());
        };

        let init_args = resolve_args(spec.init_args(), self.container);
        let config_args = resolve_args(spec.config_args(), self.container);

        let widget = self
            .toolkit
            .construct(Some(self.container), spec.class(), &init_args)
            .map_err(|e| SkelError::cell(row, column, Phase::Initializing, e))?;
        self.toolkit
            .configure(widget, &config_args)
            .map_err(|e| SkelError::cell(row, column, Phase::Configuring, e))?;

        let grid_args = merge_args(&self.global_grid_args, spec.grid_args());
        self.toolkit
            .position(widget, row, column, &grid_args)
            .map_err(|e| SkelError::cell(row, column, Phase::Gridding, e))?;
        log::trace!("skeleton: {} {widget} at ({row}, {column})", spec.class());
        self.cache.set(row, column, CachedWidget::Placed { widget, grid_args });

        if let Some(label) = spec.label() {
            let realized = RealizedWidget::from_args(widget, &merge_args(&init_args, &config_args));
            if self.created.insert(label.to_string(), realized).is_some() {
                log::warn!("skeleton: label '{label}' re-registered at ({row}, {column})");
            }
        }
        Ok(())
    }

    fn apply_grid_config(&mut self, config: &GridConfig) -> Result<()> {
        for (index, args) in config.columns() {
            self.toolkit
                .configure_column(self.container, index, args)
                .with_context(|| format!("configuring grid column {index}"))?;
        }
        for (index, args) in config.rows() {
            self.toolkit
                .configure_row(self.container, index, args)
                .with_context(|| format!("configuring grid row {index}"))?;
        }
        Ok(())
    }
}
