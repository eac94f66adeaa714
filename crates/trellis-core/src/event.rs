//! Toolkit event identifiers.
//!
//! An [`EventId`] is a toolkit event pattern such as `<KeyPress>`. Modifiers
//! and events compose with `+`:
//!
//! ```rust
//! use trellis_core::event::{modifier, standard};
//!
//! let ev = modifier::CONTROL + standard::KEYPRESS;
//! assert_eq!(ev.pattern(), "<Control-KeyPress>");
//! ```

use std::borrow::Cow;
use std::fmt;
use std::ops::Add;

/// A toolkit event pattern, e.g. `<Button>` or `<Control-Return>`.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct EventId(Cow<'static, str>);

impl EventId {
    pub const fn new(pattern: &'static str) -> Self {
        Self(Cow::Borrowed(pattern))
    }

    pub fn pattern(&self) -> &str {
        &self.0
    }

    /// Joins `modifier` in front of `event`: `<Alt>` + `<F4>` → `<Alt-F4>`.
    pub fn compose(modifier: &EventId, event: &EventId) -> EventId {
        let head = modifier.0.strip_suffix('>').unwrap_or(&modifier.0);
        let tail = event.0.strip_prefix('<').unwrap_or(&event.0);
        EventId(Cow::Owned(format!("{head}-{tail}")))
    }
}

impl From<&'static str> for EventId {
    fn from(pattern: &'static str) -> Self {
        Self::new(pattern)
    }
}

impl From<String> for EventId {
    fn from(pattern: String) -> Self {
        Self(Cow::Owned(pattern))
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Add for EventId {
    type Output = EventId;

    fn add(self, rhs: EventId) -> EventId {
        EventId::compose(&self, &rhs)
    }
}

impl Add<&'static str> for EventId {
    type Output = EventId;

    fn add(self, rhs: &'static str) -> EventId {
        EventId::compose(&self, &EventId::new(rhs))
    }
}

/// Standard event modifiers.
pub mod modifier {
    use super::EventId;

    pub const ALT: EventId = EventId::new("<Alt>");
    pub const ANY: EventId = EventId::new("<Any>");
    pub const CONTROL: EventId = EventId::new("<Control>");
    pub const DOUBLE: EventId = EventId::new("<Double>");
    pub const LOCK: EventId = EventId::new("<Lock>");
    pub const SHIFT: EventId = EventId::new("<Shift>");
    pub const TRIPLE: EventId = EventId::new("<Triple>");
}

/// Standard events.
pub mod standard {
    use super::EventId;

    pub const ACTIVATE: EventId = EventId::new("<Activate>");
    pub const BUTTON: EventId = EventId::new("<Button>");
    pub const BUTTON_RELEASE: EventId = EventId::new("<ButtonRelease>");
    pub const CONFIGURE: EventId = EventId::new("<Configure>");
    pub const DEACTIVATE: EventId = EventId::new("<Deactivate>");
    pub const DESTROY: EventId = EventId::new("<Destroy>");
    pub const ENTER: EventId = EventId::new("<Enter>");
    pub const EXPOSE: EventId = EventId::new("<Expose>");
    pub const FOCUS_IN: EventId = EventId::new("<FocusIn>");
    pub const FOCUS_OUT: EventId = EventId::new("<FocusOut>");
    pub const KEYPRESS: EventId = EventId::new("<KeyPress>");
    pub const KEYRELEASE: EventId = EventId::new("<KeyRelease>");
    pub const LEAVE: EventId = EventId::new("<Leave>");
    pub const MAP: EventId = EventId::new("<Map>");
    pub const MOTION: EventId = EventId::new("<Motion>");
    pub const MOUSEWHEEL: EventId = EventId::new("<MouseWheel>");
    pub const UNMAP: EventId = EventId::new("<Unmap>");
    pub const VISIBILITY: EventId = EventId::new("<Visibility>");

    pub const BACKSPACE: EventId = EventId::new("<BackSpace>");
    pub const DELETE: EventId = EventId::new("<Delete>");
    pub const DOWN: EventId = EventId::new("<Down>");
    pub const END: EventId = EventId::new("<End>");
    pub const ESCAPE: EventId = EventId::new("<Escape>");
    pub const HOME: EventId = EventId::new("<Home>");
    pub const INSERT: EventId = EventId::new("<Insert>");
    pub const LEFT: EventId = EventId::new("<Left>");
    pub const NEXT: EventId = EventId::new("<Next>");
    pub const PRIOR: EventId = EventId::new("<Prior>");
    pub const RETURN: EventId = EventId::new("<Return>");
    pub const RIGHT: EventId = EventId::new("<Right>");
    pub const TAB: EventId = EventId::new("<Tab>");
    pub const UP: EventId = EventId::new("<Up>");
    pub const F1: EventId = EventId::new("<F1>");
    pub const F2: EventId = EventId::new("<F2>");
    pub const F12: EventId = EventId::new("<F12>");
    pub const KP_ENTER: EventId = EventId::new("<KP_Enter>");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compose_modifier_and_event() {
        let ev = modifier::CONTROL + standard::RETURN;
        assert_eq!(ev.pattern(), "<Control-Return>");
    }

    #[test]
    fn compose_chains_left_to_right() {
        let ev = modifier::CONTROL + modifier::SHIFT + standard::TAB;
        assert_eq!(ev.pattern(), "<Control-Shift-Tab>");
    }

    #[test]
    fn compose_with_raw_pattern() {
        let ev = modifier::ALT + "<F4>";
        assert_eq!(ev, EventId::from("<Alt-F4>".to_string()));
    }

    #[test]
    fn display_is_pattern() {
        assert_eq!(standard::ESCAPE.to_string(), "<Escape>");
    }
}
