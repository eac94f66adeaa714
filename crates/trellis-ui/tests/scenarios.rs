use std::cell::RefCell;
use std::rc::Rc;

use trellis_core::event::{modifier, standard};
use trellis_core::headless::{HeadlessHandle, HeadlessToolkit, ToolkitCall};
use trellis_core::{ArgMap, LazyVar, ObjectId, Value};
use trellis_ui::prelude::*;
use trellis_ui::{ProxyError, SkelError, unknown_method};

fn cell(label: &str) -> Option<WidgetSpec> {
    Some(WidgetSpec::new("Label").init("text", label).set_label(label))
}

fn widget(skel: &Skeleton, row: usize, column: usize) -> Option<ObjectId> {
    skel.widget_cache().get(row, column).and_then(CachedWidget::widget)
}

fn disposals(calls: &[ToolkitCall]) -> Vec<ObjectId> {
    calls
        .iter()
        .filter_map(|c| match c {
            ToolkitCall::Dispose { id } => Some(*id),
            _ => None,
        })
        .collect()
}

fn build_abc() -> (trellis_ui::SharedSkeleton, HeadlessHandle) {
    let tk = HeadlessToolkit::new();
    let handle = tk.handle();
    let rows = vec![vec![cell("a"), cell("b")], vec![None, cell("c")]];
    let skel = SkeletonBuilder::new().toolkit(tk).template(rows).build().unwrap();
    handle.clear_calls();
    (skel, handle)
}

// ── grid scenarios ────────────────────────────────────────────────────────

#[test]
fn realizes_two_by_two_with_gap() {
    let (skel, handle) = build_abc();
    let skel = skel.borrow();
    let cache = skel.widget_cache();

    let cached: Vec<_> = cache.iter().map(|(k, e)| (k, e.grid_args().cloned())).collect();
    assert_eq!(
        cached,
        [
            ((0, 0), Some(ArgMap::new())),
            ((0, 1), Some(ArgMap::new())),
            ((1, 0), None),
            ((1, 1), Some(ArgMap::new())),
        ]
    );
    for label in ["a", "b", "c"] {
        let id = skel.created(label).unwrap().widget();
        assert_eq!(handle.object(id).unwrap().option("text"), Some(&Value::from(label)));
    }
    assert_eq!(skel.created_map().len(), 3);
}

#[test]
fn insert_then_destroy_round_trip() {
    let (skel, handle) = build_abc();
    let mut skel = skel.borrow_mut();
    let c = skel.created("c").unwrap().widget();

    skel.insert_row_at(1, &[cell("d"), None]).unwrap();
    let d = skel.created("d").unwrap().widget();
    assert_eq!(widget(&skel, 1, 0), Some(d));
    assert_eq!(widget(&skel, 2, 1), Some(c));
    assert!(skel.widget_cache().get(2, 0).unwrap().is_empty());

    skel.destroy_row(1).unwrap();
    assert!(!handle.is_alive(d));
    assert_eq!(widget(&skel, 1, 1), Some(c));
    assert!(skel.widget_cache().get(1, 0).unwrap().is_empty());
    assert_eq!(skel.widget_cache().row_count(), 2);
    assert_eq!(handle.placement(c), Some((1, 1)));
}

#[test]
fn destroy_row_zero_moves_gap_and_c_up() {
    let (skel, handle) = build_abc();
    let mut skel = skel.borrow_mut();
    let a = skel.created("a").unwrap().widget();
    let b = skel.created("b").unwrap().widget();
    let c = skel.created("c").unwrap().widget();

    skel.destroy_row(0).unwrap();

    assert_eq!(disposals(&handle.calls()), [a, b]);
    assert!(skel.widget_cache().get(0, 0).unwrap().is_empty());
    assert_eq!(widget(&skel, 0, 1), Some(c));
    assert_eq!(skel.widget_cache().len(), 2);
    assert!(matches!(skel.created("a"), Err(SkelError::UnknownLabel(_))));
}

#[test]
fn appending_n_rows_yields_increasing_indices() {
    let (skel, _) = build_abc();
    let mut skel = skel.borrow_mut();
    let rows: Vec<_> = (0..4).map(|_| skel.append_row(&[cell("x")]).unwrap()).collect();
    assert_eq!(rows, [2, 3, 4, 5]);
    // the label follows the latest registration
    assert_eq!(skel.find_row_of("x"), Some(5));
}

#[test]
fn insert_at_end_matches_append() {
    let (left, left_calls) = build_abc();
    let (right, right_calls) = build_abc();
    left.borrow_mut().append_row(&[cell("d"), None]).unwrap();
    right.borrow_mut().insert_row_at(2, &[cell("d"), None]).unwrap();

    assert_eq!(left.borrow().widget_cache(), right.borrow().widget_cache());
    assert_eq!(left_calls.calls(), right_calls.calls());
}

// ── controller scenarios ──────────────────────────────────────────────────

#[derive(Default)]
struct RowAdder {
    view: Option<ViewHandle>,
    seen: Vec<Vec<Value>>,
}

impl Controller for RowAdder {
    fn set_view(&mut self, view: ViewHandle) {
        self.view = Some(view);
    }

    fn call(&mut self, method: &str, args: &[Value]) -> anyhow::Result<Value> {
        match method {
            "add_row" => {
                self.seen.push(args.to_vec());
                let skel = self
                    .view
                    .as_ref()
                    .and_then(ViewHandle::upgrade)
                    .ok_or_else(|| anyhow::anyhow!("no view"))?;
                let text = self.view.as_ref().map(|v| v.created("entry")).transpose()?;
                let text = text.map(|e| e.textvariable().map(|v| v.get())).transpose()?;
                let spec = WidgetSpec::new("Label").init("text", text.unwrap_or_default());
                let row = skel.borrow_mut().append_row(&[Some(spec)])?;
                Ok(Value::from(row))
            }
            other => Err(unknown_method(other)),
        }
    }
}

struct Form;

impl Template for Form {
    fn rows(&self, skel: &Skeleton) -> TemplateRows {
        vec![vec![
            Some(
                WidgetSpec::new("Entry")
                    .init("textvariable", LazyVar::string().with_initial("first"))
                    .set_label("entry"),
            ),
            Some(
                WidgetSpec::new("Button")
                    .init("text", "Add")
                    .init("command", skel.controller().method("add_row"))
                    .set_label("add"),
            ),
        ]]
    }

    fn grid_config(&self) -> GridConfig {
        GridConfig::new().column_weight(0, 1)
    }

    fn events(&self, skel: &Skeleton) -> Vec<EventDef> {
        let add = skel.controller().method("add_row");
        vec![EventDef::new(modifier::CONTROL + standard::RETURN, add).id("add")]
    }
}

#[test]
fn command_before_controller_reports_unbound() {
    let tk = HeadlessToolkit::new();
    let handle = tk.handle();
    let skel = SkeletonBuilder::new().toolkit(tk).template(Form).build().unwrap();
    let button = skel.borrow().created("add").unwrap().widget();

    let err = handle.invoke(button, "command", &[]).unwrap_err();
    assert!(matches!(err.downcast_ref::<ProxyError>(), Some(ProxyError::Unbound { .. })));
}

#[test]
fn controller_mutates_view_from_callbacks() {
    let tk = HeadlessToolkit::new();
    let handle = tk.handle();
    let skel = SkeletonBuilder::new().toolkit(tk).template(Form).build().unwrap();
    let controller = Rc::new(RefCell::new(RowAdder::default()));
    Skeleton::set_controller(&skel, Some(controller.clone())).unwrap();

    let button = skel.borrow().created("add").unwrap().widget();
    let row = handle.invoke(button, "command", &[Value::Int(7)]).unwrap();
    assert_eq!(row, Value::Int(1));
    assert_eq!(controller.borrow().seen, [vec![Value::Int(7)]]);

    skel.borrow().created("entry").unwrap().textvariable().unwrap().set("second");
    let container = skel.borrow().container();
    let event = modifier::CONTROL + standard::RETURN;
    let results = handle.fire(container, &event, &[]);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].as_ref().unwrap(), &Value::Int(2));

    let skel = skel.borrow();
    let added = widget(&skel, 2, 0).unwrap();
    assert_eq!(handle.object(added).unwrap().option("text"), Some(&Value::from("second")));
}

#[test]
fn controller_given_to_builder_receives_view() {
    let controller = Rc::new(RefCell::new(RowAdder::default()));
    let skel = SkeletonBuilder::new()
        .toolkit(HeadlessToolkit::new())
        .template(Form)
        .controller(controller.clone())
        .build()
        .unwrap();
    assert!(skel.borrow().controller().is_attached());
    let view = controller.borrow().view.clone().unwrap();
    assert!(Rc::ptr_eq(&view.upgrade().unwrap(), &skel));
}

#[test]
fn destroy_tears_down_everything() {
    let tk = HeadlessToolkit::new();
    let handle = tk.handle();
    let skel = SkeletonBuilder::new().toolkit(tk).template(Form).build().unwrap();
    skel.borrow_mut().destroy().unwrap();
    assert_eq!(handle.live_count(), 0);
    let skel = skel.borrow();
    assert!(skel.is_destroyed());
    assert!(skel.assigned_events().is_empty());
}
