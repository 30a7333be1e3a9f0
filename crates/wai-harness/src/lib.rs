#![forbid(unsafe_code)]

//! Scenario harness for wai widgets.
//!
//! [`Harness`] wraps a [`Program`] with key-addressed helpers (press, click,
//! focus, attribute reads) and records every check as a JSONL line on
//! stderr for CI artifact review.
//!
//! ```
//! use wai_harness::Harness;
//! use wai_runtime::Element;
//!
//! let mut h = Harness::new("doc_example", Element::new("button").key("ok")).unwrap();
//! h.focus("ok");
//! assert!(h.check("focus lands", h.is_focused("ok"), ""));
//! ```

use std::sync::Once;

use serde_json::json;
use tracing_subscriber::prelude::*;
use wai_core::{ContextMissingError, Event, KeyCode, KeyEvent, NodeId};
use wai_runtime::{Element, Program};

static TRACING: Once = Once::new();

/// Install a test-writer tracing subscriber once per process.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer().with_test_writer())
            .try_init();
    });
}

/// Emit a JSONL log entry (for CI artifact review).
pub fn log_jsonl(test: &str, check: &str, passed: bool, notes: &str) {
    let line = json!({
        "test": test,
        "check": check,
        "passed": passed,
        "notes": notes,
    });
    eprintln!("{line}");
}

/// A mounted program driven by element keys.
#[derive(Debug)]
pub struct Harness {
    name: String,
    program: Program,
    checks: usize,
}

impl Harness {
    /// Mount `tree` for the scenario `name`.
    pub fn new(name: &str, tree: Element) -> Result<Self, ContextMissingError> {
        init_tracing();
        let program = Program::new(tree)?;
        tracing::debug!(scenario = name, "harness ready");
        Ok(Self {
            name: name.to_owned(),
            program,
            checks: 0,
        })
    }

    #[must_use]
    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn program_mut(&mut self) -> &mut Program {
        &mut self.program
    }

    /// Element registered under `key`.
    ///
    /// # Panics
    ///
    /// Panics when no element has that key; scenarios name every element
    /// they touch.
    #[must_use]
    pub fn node(&self, key: &str) -> NodeId {
        self.program
            .node(key)
            .unwrap_or_else(|| panic!("scenario `{}` has no element keyed `{key}`", self.name))
    }

    pub fn dispatch(&mut self, event: Event) -> bool {
        self.program.dispatch(event)
    }

    /// Press an unmodified key.
    pub fn press(&mut self, code: KeyCode) -> bool {
        self.dispatch(Event::key(code))
    }

    /// Press a key with Shift held.
    pub fn shift(&mut self, code: KeyCode) -> bool {
        self.dispatch(Event::shift_key(code))
    }

    pub fn key(&mut self, key: KeyEvent) -> bool {
        self.dispatch(Event::Key(key))
    }

    /// Click the element under `key`.
    pub fn click(&mut self, key: &str) -> bool {
        let node = self.node(key);
        self.click_node(node)
    }

    /// Click an element that has no key, such as a generated grid cell.
    pub fn click_node(&mut self, node: NodeId) -> bool {
        self.dispatch(Event::Click(node))
    }

    /// Focus the element under `key`.
    pub fn focus(&mut self, key: &str) -> bool {
        self.program.focus(key)
    }

    #[must_use]
    pub fn focused(&self) -> Option<NodeId> {
        self.program.doc().active_element()
    }

    #[must_use]
    pub fn is_focused(&self, key: &str) -> bool {
        self.program.node(key).is_some() && self.focused() == self.program.node(key)
    }

    /// Text of the element under `key` and its descendants.
    #[must_use]
    pub fn text(&self, key: &str) -> String {
        self.program.doc().text_content(self.node(key))
    }

    #[must_use]
    pub fn attr(&self, key: &str, name: &str) -> Option<String> {
        self.program
            .doc()
            .attr(self.node(key), name)
            .map(str::to_owned)
    }

    /// Log a check and return its outcome.
    pub fn check(&mut self, check: &str, passed: bool, notes: &str) -> bool {
        self.checks += 1;
        tracing::debug!(scenario = %self.name, check, passed, "check");
        log_jsonl(&self.name, check, passed, notes);
        passed
    }

    /// Number of checks logged so far.
    #[must_use]
    pub fn checks(&self) -> usize {
        self.checks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_context_surfaces_from_new() {
        let err = Harness::new("bad", Element::new("div").child(Element::calendar_title()))
            .unwrap_err();
        assert_eq!(err.role, wai_core::Role::CalendarTitle);
    }

    #[test]
    fn checks_are_counted() {
        let mut h = Harness::new("count", Element::new("div")).unwrap();
        assert!(h.check("one", true, ""));
        assert!(!h.check("two", false, "expected failure"));
        assert_eq!(h.checks(), 2);
    }

    #[test]
    #[should_panic(expected = "no element keyed")]
    fn unknown_key_panics() {
        let h = Harness::new("keys", Element::new("div")).unwrap();
        let _ = h.node("nope");
    }
}
