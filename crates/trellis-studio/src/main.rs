use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{Context, Result, anyhow};
use trellis_core::event::{modifier, standard};
use trellis_core::headless::{HeadlessHandle, HeadlessToolkit};
use trellis_core::logging::{LoggingConfig, init_logging};
use trellis_ui::prelude::*;
use trellis_ui::unknown_method;

// ── TaskBoard ─────────────────────────────────────────────────────────────

/// Header row with an entry and an "Add" button; tasks are appended below.
struct TaskBoard;

impl Template for TaskBoard {
    fn rows(&self, skel: &Skeleton) -> TemplateRows {
        vec![vec![
            Some(WidgetSpec::new("Label").init("text", "Task")),
            Some(
                WidgetSpec::new("Entry")
                    .init("textvariable", LazyVar::string())
                    .grid("sticky", "ew")
                    .set_label("task"),
            ),
            Some(
                WidgetSpec::new("Button")
                    .init("text", "Add")
                    .init("command", skel.controller().method("add_task"))
                    .set_label("add"),
            ),
        ]]
    }

    fn grid_config(&self) -> GridConfig {
        GridConfig::new().column_weight(1, 1)
    }

    fn events(&self, skel: &Skeleton) -> Vec<EventDef> {
        let add = skel.controller().method("add_task");
        vec![EventDef::new(modifier::CONTROL + standard::RETURN, add).id("quick-add")]
    }
}

// ── TaskController ────────────────────────────────────────────────────────

#[derive(Default)]
struct TaskController {
    view:  Option<ViewHandle>,
    added: usize,
}

impl TaskController {
    fn skeleton(&self) -> Result<SharedSkeleton> {
        self.view
            .as_ref()
            .and_then(ViewHandle::upgrade)
            .ok_or_else(|| anyhow!("task board is gone"))
    }

    fn add_task(&mut self) -> Result<Value> {
        let view = self.view.clone().ok_or_else(|| anyhow!("no view"))?;
        let entry = view.created("task")?;
        let text = entry.textvariable()?.get();
        if text.as_str().is_none_or(str::is_empty) {
            log::warn!("ignoring empty task");
            return Ok(Value::None);
        }
        entry.textvariable()?.set("");

        self.added += 1;
        let label = format!("task-{}", self.added);
        let skel = self.skeleton()?;
        let done = skel.borrow().controller().method("done");
        let target = label.clone();
        let on_done = Callback::new(move |_| done.call(&[Value::from(target.as_str())]));

        let row = skel.borrow_mut().append_row(&[
            None,
            Some(WidgetSpec::new("Label").init("text", text).set_label(label.as_str())),
            Some(
                WidgetSpec::new("Button")
                    .init("text", "Done")
                    .init("command", on_done)
                    .set_label(format!("{label}-done")),
            ),
        ])?;
        log::info!("added {label} at row {row}");
        Ok(Value::from(row))
    }

    fn done(&mut self, args: &[Value]) -> Result<Value> {
        let label = args
            .first()
            .and_then(Value::as_str)
            .ok_or_else(|| anyhow!("done expects a task label"))?;
        let skel = self.skeleton()?;
        let row = skel.borrow().find_row_of(label);
        let row = row.with_context(|| format!("{label} is not on the board"))?;
        skel.borrow_mut().destroy_row(row)?;
        log::info!("completed {label} (row {row})");
        Ok(Value::None)
    }
}

impl Controller for TaskController {
    fn set_view(&mut self, view: ViewHandle) {
        self.view = Some(view);
    }

    fn call(&mut self, method: &str, args: &[Value]) -> Result<Value> {
        match method {
            "add_task" => self.add_task(),
            "done" => self.done(args),
            other => Err(unknown_method(other)),
        }
    }
}

// ── Output ────────────────────────────────────────────────────────────────

fn print_grid(title: &str, skel: &SharedSkeleton, toolkit: &HeadlessHandle) {
    println!();
    println!("  ── {title} ──");
    let skel = skel.borrow();
    let cache = skel.widget_cache();
    for row in 0..cache.row_count() {
        let cells: Vec<String> = cache
            .row(row)
            .map(|(_, entry)| match entry.widget().and_then(|w| toolkit.object(w)) {
                Some(obj) => {
                    let text = obj.option("text").and_then(Value::as_str).unwrap_or("");
                    format!("{}[{text}]", obj.class)
                }
                None => "·".to_string(),
            })
            .collect();
        println!("  {row:>2} │ {}", cells.join("  "));
    }
}

fn set_task(skel: &SharedSkeleton, text: &str) -> Result<()> {
    skel.borrow().created("task")?.textvariable()?.set(text);
    Ok(())
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    println!();
    println!("  ╔════════════════════════════════════════╗");
    println!("  ║         TRELLIS TASK BOARD v0.1        ║");
    println!("  ║   headless toolkit  ·  trellis-ui      ║");
    println!("  ╚════════════════════════════════════════╝");

    let toolkit = HeadlessToolkit::new();
    let handle = toolkit.handle();
    let controller = Rc::new(RefCell::new(TaskController::default()));
    let skel = SkeletonBuilder::new()
        .toolkit(toolkit)
        .template(TaskBoard)
        .global_grid_arg("padx", 4)
        .controller(controller.clone())
        .build()?;
    print_grid("realized", &skel, &handle);

    // Button press.
    set_task(&skel, "sketch the layout")?;
    let add = skel.borrow().created("add")?.widget();
    handle.invoke(add, "command", &[])?;

    // Keyboard shortcut on the container.
    set_task(&skel, "wire the controller")?;
    let container = skel.borrow().container();
    for result in handle.fire(container, &(modifier::CONTROL + standard::RETURN), &[]) {
        result?;
    }
    print_grid("two tasks added", &skel, &handle);

    skel.borrow_mut().insert_row_at(
        1,
        &[Some(WidgetSpec::new("Label").init("text", "urgent")), None, None],
    )?;
    print_grid("row inserted under the header", &skel, &handle);

    let done = skel.borrow().created("task-1-done")?.widget();
    handle.invoke(done, "command", &[])?;
    print_grid("task-1 completed", &skel, &handle);

    skel.borrow_mut().unbind_event("quick-add")?;
    skel.borrow_mut().destroy()?;
    println!();
    println!("  {} objects left after teardown", handle.live_count());
    println!();
    Ok(())
}
