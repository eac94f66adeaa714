use std::cell::Cell;
use std::rc::Rc;

use trellis_core::event::{modifier, standard};
use trellis_core::headless::{HeadlessToolkit, Op, ToolkitCall};
use trellis_core::value::resolve_args;
use trellis_core::{
    ArgMap, BindMode, BindScope, Callback, LazyVar, ObjectId, Toolkit, Value, WidgetClass,
};

fn args(pairs: &[(&str, Value)]) -> ArgMap {
    pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
}

/// Drives the adapter only through the trait object, as an engine would.
fn build_form(tk: &mut dyn Toolkit) -> anyhow::Result<(ObjectId, ObjectId)> {
    let frame = tk.construct(None, &WidgetClass::new("Frame"), &ArgMap::new())?;
    let init = resolve_args(&args(&[("textvariable", LazyVar::string().into())]), frame);
    let entry = tk.construct(Some(frame), &"Entry".into(), &init)?;
    tk.configure(entry, &args(&[("state", "readonly".into())]))?;
    tk.position(entry, 0, 1, &args(&[("sticky", "ew".into())]))?;
    tk.configure_column(frame, 1, &args(&[("weight", 1.into())]))?;
    Ok((frame, entry))
}

#[test]
fn engine_style_session_is_recorded_in_order() {
    let mut tk = HeadlessToolkit::new();
    let handle = tk.handle();
    let (frame, entry) = build_form(&mut tk).unwrap();

    let ops: Vec<Op> = handle.calls().iter().map(ToolkitCall::op).collect();
    assert_eq!(ops, [Op::Construct, Op::Construct, Op::Configure, Op::Position, Op::ConfigureColumn]);

    let obj = handle.object(entry).unwrap();
    assert_eq!(obj.parent, Some(frame));
    assert_eq!(obj.option("state"), Some(&Value::from("readonly")));
    let var = obj.option("textvariable").and_then(Value::as_var).unwrap();
    assert_eq!(var.owner(), Some(frame));
    assert_eq!(handle.placement(entry), Some((0, 1)));
}

#[test]
fn injected_failure_surfaces_through_trait() {
    let mut tk = HeadlessToolkit::new();
    tk.handle().fail_nth(Op::Position, 0, "grid refused");
    let err = build_form(&mut tk).unwrap_err();
    assert_eq!(err.to_string(), "grid refused");
}

#[test]
fn composed_event_fires_replacing_and_added_bindings() {
    let mut tk = HeadlessToolkit::new();
    let handle = tk.handle();
    let frame = tk.construct(None, &WidgetClass::new("Frame"), &ArgMap::new()).unwrap();
    let hits = Rc::new(Cell::new(0));
    let event = modifier::CONTROL + standard::KEYPRESS;
    assert_eq!(event.pattern(), "<Control-KeyPress>");

    for mode in [BindMode::Replace, BindMode::Replace, BindMode::Add] {
        let hits = hits.clone();
        let action = Callback::from_fn(move || hits.set(hits.get() + 1));
        tk.bind(frame, &event, &BindScope::Widget, action, mode).unwrap();
    }
    assert_eq!(handle.binding_count(frame, &event), 2);

    let results = handle.fire(frame, &event, &[]);
    assert_eq!(results.len(), 2);
    assert_eq!(hits.get(), 2);

    tk.dispose(frame).unwrap();
    assert_eq!(handle.binding_count(frame, &event), 0);
}
