use indexmap::IndexMap;
use trellis_core::{ArgMap, ObjectId, Value, Variable};

use crate::error::{Result, SkelError};

const CLASS_NAME: &str = "RealizedWidget";

/// Read-only view of a realized object together with the state-holders it
/// was constructed with.
///
/// State-holders are keyed by the argument name they were passed under
/// (`textvariable`, `variable`, `listvariable`, or any custom name).
#[derive(Debug, Clone, PartialEq)]
pub struct RealizedWidget {
    widget: ObjectId,
    vars: IndexMap<String, Variable>,
}

impl RealizedWidget {
    pub fn new(widget: ObjectId) -> Self {
        Self { widget, vars: IndexMap::new() }
    }

    /// Collects every state-holder found in `args`.
    pub(crate) fn from_args(widget: ObjectId, args: &ArgMap) -> Self {
        let vars = args
            .iter()
            .filter_map(|(k, v)| match v {
                Value::Var(var) => Some((k.clone(), var.clone())),
                _ => None,
            })
            .collect();
        Self { widget, vars }
    }

    /// Returns a copy with `var` attached under `name`.
    pub fn with_var(&self, name: impl Into<String>, var: Variable) -> Self {
        let mut next = self.clone();
        next.vars.insert(name.into(), var);
        next
    }

    #[inline]
    pub fn widget(&self) -> ObjectId {
        self.widget
    }

    pub fn get(&self, name: &str) -> Result<&Variable> {
        self.vars.get(name).ok_or_else(|| SkelError::UnknownVariable {
            class: CLASS_NAME,
            name: name.to_string(),
        })
    }

    pub fn textvariable(&self) -> Result<&Variable> {
        self.get("textvariable")
    }

    pub fn variable(&self) -> Result<&Variable> {
        self.get("variable")
    }

    pub fn listvariable(&self) -> Result<&Variable> {
        self.get("listvariable")
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.vars.keys().map(String::as_str)
    }

    /// Every state-holder plus the object itself under `"widget"`.
    pub fn as_map(&self) -> ArgMap {
        let mut map: ArgMap =
            self.vars.iter().map(|(k, v)| (k.clone(), Value::Var(v.clone()))).collect();
        map.insert("widget".to_string(), Value::Object(self.widget));
        map
    }
}

#[cfg(test)]
mod tests {
    use trellis_core::VarKind;

    use super::*;

    fn var(kind: VarKind) -> Variable {
        Variable::new(kind, kind.default_value(), None)
    }

    fn realized() -> (RealizedWidget, [Variable; 4]) {
        let vars = [var(VarKind::String), var(VarKind::Int), var(VarKind::List), var(VarKind::Double)];
        let mut args = ArgMap::new();
        args.insert("textvariable".into(), vars[0].clone().into());
        args.insert("variable".into(), vars[1].clone().into());
        args.insert("listvariable".into(), vars[2].clone().into());
        args.insert("customvariable".into(), vars[3].clone().into());
        args.insert("text".into(), "not a variable".into());
        (RealizedWidget::from_args(ObjectId::from_raw(7), &args), vars)
    }

    #[test]
    fn widget_accessor_returns_object() {
        assert_eq!(realized().0.widget(), ObjectId::from_raw(7));
    }

    #[test]
    fn named_accessors_return_matching_variables() {
        let (w, vars) = realized();
        assert_eq!(w.textvariable().unwrap(), &vars[0]);
        assert_eq!(w.variable().unwrap(), &vars[1]);
        assert_eq!(w.listvariable().unwrap(), &vars[2]);
        assert_eq!(w.get("customvariable").unwrap(), &vars[3]);
    }

    #[test]
    fn literals_are_not_collected() {
        let (w, _) = realized();
        assert_eq!(w.names().count(), 4);
        assert!(w.get("text").is_err());
    }

    #[test]
    fn unknown_name_reports_not_found() {
        let err = RealizedWidget::new(ObjectId::from_raw(1)).textvariable().unwrap_err();
        assert_eq!(err.to_string(), "'textvariable' not found in RealizedWidget");
    }

    #[test]
    fn with_var_leaves_original_untouched() {
        let original = RealizedWidget::new(ObjectId::from_raw(1));
        let next = original.with_var("variable", var(VarKind::Boolean));
        assert!(original.variable().is_err());
        assert!(next.variable().is_ok());
    }

    #[test]
    fn as_map_includes_widget() {
        let (w, _) = realized();
        let map = w.as_map();
        assert_eq!(map.get("widget"), Some(&Value::Object(ObjectId::from_raw(7))));
        assert_eq!(map.len(), 5);
    }
}
