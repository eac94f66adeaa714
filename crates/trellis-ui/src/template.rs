use trellis_core::{ArgMap, BindMode, BindScope, Callback, EventId, ObjectId, Value};

use crate::error::Result;
use crate::skeleton::Skeleton;
use crate::widget_spec::TemplateRows;

/// Declarative description of a skeleton: its rows, grid sizing, event
/// bindings, and optional lifecycle hooks.
///
/// Only [`rows`](Template::rows) is required. Hooks run in this order during
/// [`SkeletonBuilder::build`](crate::SkeletonBuilder::build):
///
/// 1. `before_init`
/// 2. container constructed, then `after_init`
/// 3. `rows` realized
/// 4. `after_widgets`
/// 5. `grid_config` applied
/// 6. `events` bound
pub trait Template {
    /// The rows of cells to realize. Use [`Skeleton::controller`] to wire
    /// actions to controller methods, even before a controller is attached.
    fn rows(&self, skeleton: &Skeleton) -> TemplateRows;

    fn grid_config(&self) -> GridConfig {
        GridConfig::default()
    }

    fn events(&self, _skeleton: &Skeleton) -> Vec<EventDef> {
        Vec::new()
    }

    fn before_init(&mut self) {}

    fn after_init(&mut self, _skeleton: &mut Skeleton) -> Result<()> {
        Ok(())
    }

    fn after_widgets(&mut self, _skeleton: &mut Skeleton) -> Result<()> {
        Ok(())
    }
}

/// Plain rows are a template with no hooks, sizing or events.
impl Template for TemplateRows {
    fn rows(&self, _skeleton: &Skeleton) -> TemplateRows {
        self.clone()
    }
}

// ── GridConfig ────────────────────────────────────────────────────────────

/// Per-index sizing options for the container's grid rows and columns.
///
/// Indices never configured are skipped when applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridConfig {
    rows: Vec<ArgMap>,
    columns: Vec<ArgMap>,
}

impl GridConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` for row `index`.
    pub fn row(mut self, index: usize, key: impl Into<String>, value: impl Into<Value>) -> Self {
        slot(&mut self.rows, index).insert(key.into(), value.into());
        self
    }

    pub fn column(
        mut self,
        index: usize,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        slot(&mut self.columns, index).insert(key.into(), value.into());
        self
    }

    pub fn row_weight(self, index: usize, weight: i64) -> Self {
        self.row(index, "weight", weight)
    }

    pub fn column_weight(self, index: usize, weight: i64) -> Self {
        self.column(index, "weight", weight)
    }

    /// Configured rows as `(index, args)`, skipping unconfigured indices.
    pub fn rows(&self) -> impl Iterator<Item = (usize, &ArgMap)> {
        configured(&self.rows)
    }

    pub fn columns(&self) -> impl Iterator<Item = (usize, &ArgMap)> {
        configured(&self.columns)
    }

    pub fn is_empty(&self) -> bool {
        self.rows().next().is_none() && self.columns().next().is_none()
    }
}

fn slot(maps: &mut Vec<ArgMap>, index: usize) -> &mut ArgMap {
    if maps.len() <= index {
        maps.resize_with(index + 1, ArgMap::new);
    }
    &mut maps[index]
}

fn configured(maps: &[ArgMap]) -> impl Iterator<Item = (usize, &ArgMap)> {
    maps.iter().enumerate().filter(|(_, args)| !args.is_empty())
}

// ── EventDef ──────────────────────────────────────────────────────────────

/// One event binding requested by a template.
///
/// The target defaults to the skeleton's container. Giving the definition an
/// [`id`](EventDef::id) keeps its handle in
/// [`Skeleton::assigned_events`] so it can later be removed with
/// [`Skeleton::unbind_event`].
#[derive(Debug, Clone)]
pub struct EventDef {
    pub(crate) event: EventId,
    pub(crate) action: Callback,
    pub(crate) scope: BindScope,
    pub(crate) target: Option<ObjectId>,
    pub(crate) mode: BindMode,
    pub(crate) id: Option<String>,
}

impl EventDef {
    pub fn new(event: impl Into<EventId>, action: impl Into<Callback>) -> Self {
        Self {
            event: event.into(),
            action: action.into(),
            scope: BindScope::Widget,
            target: None,
            mode: BindMode::Replace,
            id: None,
        }
    }

    pub fn target(mut self, target: ObjectId) -> Self {
        self.target = Some(target);
        self
    }

    pub fn scope(mut self, scope: BindScope) -> Self {
        self.scope = scope;
        self
    }

    /// Keeps existing bindings of the same event instead of replacing them.
    pub fn add(mut self) -> Self {
        self.mode = BindMode::Add;
        self
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn event(&self) -> &EventId {
        &self.event
    }

    pub fn mode(&self) -> BindMode {
        self.mode
    }

    pub fn bind_scope(&self) -> &BindScope {
        &self.scope
    }

    pub fn bind_target(&self) -> Option<ObjectId> {
        self.target
    }

    pub fn bind_id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use trellis_core::event::standard;

    use super::*;

    #[test]
    fn grid_config_skips_unset_indices() {
        let config = GridConfig::new().row_weight(2, 1).column_weight(0, 3);
        let rows: Vec<_> = config.rows().map(|(i, a)| (i, a.get("weight").cloned())).collect();
        assert_eq!(rows, [(2, Some(Value::Int(1)))]);
        assert_eq!(config.columns().count(), 1);
    }

    #[test]
    fn grid_config_merges_keys_per_index() {
        let config = GridConfig::new().row(0, "weight", 1).row(0, "minsize", 20);
        let (_, args) = config.rows().next().unwrap();
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn empty_grid_config() {
        assert!(GridConfig::default().is_empty());
        assert!(!GridConfig::new().column_weight(4, 1).is_empty());
    }

    #[test]
    fn event_def_defaults() {
        let def = EventDef::new(standard::RETURN, Callback::from_fn(|| {}));
        assert_eq!(def.mode(), BindMode::Replace);
        assert_eq!(def.bind_scope(), &BindScope::Widget);
        assert_eq!(def.bind_target(), None);
        assert_eq!(def.bind_id(), None);
    }

    #[test]
    fn event_def_builder() {
        let def = EventDef::new("<Escape>", Callback::from_fn(|| {}))
            .add()
            .scope(BindScope::All)
            .target(ObjectId::from_raw(3))
            .id("quit");
        assert_eq!(def.event().pattern(), "<Escape>");
        assert_eq!(def.mode(), BindMode::Add);
        assert_eq!(def.bind_scope(), &BindScope::All);
        assert_eq!(def.bind_target(), Some(ObjectId::from_raw(3)));
        assert_eq!(def.bind_id(), Some("quit"));
    }
}
