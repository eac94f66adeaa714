use trellis_core::{ArgMap, Value, WidgetClass};

/// One row of a template; `None` is a deliberate empty cell.
pub type TemplateRow = Vec<Option<WidgetSpec>>;

/// Ordered rows of cells describing a whole grid.
pub type TemplateRows = Vec<TemplateRow>;

/// Immutable description of one grid cell.
///
/// Every builder method returns a new spec; the receiver is never modified,
/// so a spec can be shared between templates and realized many times.
///
/// ```rust
/// use trellis_core::LazyVar;
/// use trellis_ui::WidgetSpec;
///
/// let entry = WidgetSpec::new("Entry")
///     .init("textvariable", LazyVar::string())
///     .grid("sticky", "ew")
///     .set_label("name");
/// assert_eq!(entry.label(), Some("name"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetSpec {
    class: WidgetClass,
    init_args: ArgMap,
    grid_args: ArgMap,
    config_args: ArgMap,
    label: Option<String>,
}

impl WidgetSpec {
    pub fn new(class: impl Into<WidgetClass>) -> Self {
        Self {
            class: class.into(),
            init_args: ArgMap::new(),
            grid_args: ArgMap::new(),
            config_args: ArgMap::new(),
            label: None,
        }
    }

    /// Builds a spec from all of its parts at once.
    pub fn from_parts(
        class: impl Into<WidgetClass>,
        init_args: ArgMap,
        grid_args: ArgMap,
        config_args: ArgMap,
        label: Option<String>,
    ) -> Self {
        Self { class: class.into(), init_args, grid_args, config_args, label }
    }

    #[inline]
    pub fn class(&self) -> &WidgetClass {
        &self.class
    }

    /// Arguments consumed when the object is constructed.
    #[inline]
    pub fn init_args(&self) -> &ArgMap {
        &self.init_args
    }

    /// Arguments consumed when the object is placed in the grid.
    #[inline]
    pub fn grid_args(&self) -> &ArgMap {
        &self.grid_args
    }

    /// Arguments applied after construction, before placement.
    #[inline]
    pub fn config_args(&self) -> &ArgMap {
        &self.config_args
    }

    #[inline]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    // ── builders ──────────────────────────────────────────────────────────

    pub fn init(&self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut next = self.clone();
        next.init_args.insert(key.into(), value.into());
        next
    }

    pub fn grid(&self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut next = self.clone();
        next.grid_args.insert(key.into(), value.into());
        next
    }

    pub fn config(&self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut next = self.clone();
        next.config_args.insert(key.into(), value.into());
        next
    }

    /// Merges several construction arguments; later keys win.
    pub fn with_init_args<K, V>(&self, args: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let mut next = self.clone();
        merge_into(&mut next.init_args, args);
        next
    }

    pub fn with_grid_args<K, V>(&self, args: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let mut next = self.clone();
        merge_into(&mut next.grid_args, args);
        next
    }

    pub fn with_config_args<K, V>(&self, args: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let mut next = self.clone();
        merge_into(&mut next.config_args, args);
        next
    }

    pub fn set_label(&self, label: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.label = Some(label.into());
        next
    }

    /// `(class, init_args, grid_args, config_args, label)`.
    pub fn into_parts(self) -> (WidgetClass, ArgMap, ArgMap, ArgMap, Option<String>) {
        (self.class, self.init_args, self.grid_args, self.config_args, self.label)
    }
}

fn merge_into<K, V>(target: &mut ArgMap, args: impl IntoIterator<Item = (K, V)>)
where
    K: Into<String>,
    V: Into<Value>,
{
    for (k, v) in args {
        target.insert(k.into(), v.into());
    }
}
