#![forbid(unsafe_code)]

//! Event loop driving mounted widgets.
//!
//! A [`Program`] owns the document, the focus-scope stack, and every widget
//! mounted from one tree. Each call to [`Program::dispatch`] handles exactly
//! one event to completion and re-projects derived attributes before it
//! returns.
//!
//! # Dispatch order
//!
//! | Event | Handling |
//! |-------|----------|
//! | click | focus moves to the nearest focusable ancestor of the target, then accordion headers, calendar buttons, and dialog backdrops are offered the click |
//! | Enter/Space | the focused accordion header or calendar button activates |
//! | other keys | delivered along the focus-scope route, innermost first, until a widget consumes it |

use wai_core::{ContextMissingError, Document, Event, FocusScopes, KeyCode, NodeId, ScopeId};

use crate::element::Element;
use crate::mount::{Mounted, mount};

/// Mounted widget tree plus its focus host.
#[derive(Debug)]
pub struct Program {
    doc: Document,
    scopes: FocusScopes,
    app: Mounted,
    dispatched: u64,
}

impl Program {
    /// Mount `root` into a fresh document.
    pub fn new(root: Element) -> Result<Self, ContextMissingError> {
        let mut doc = Document::new();
        let scopes = FocusScopes::new();
        let body = doc.root();
        let app = mount(&mut doc, &scopes, body, root)?;
        Ok(Self {
            doc,
            scopes,
            app,
            dispatched: 0,
        })
    }

    #[must_use]
    pub fn doc(&self) -> &Document {
        &self.doc
    }

    /// Mutable access for host-side tree edits. Call [`Program::project`]
    /// afterwards if widget-owned elements changed.
    pub fn doc_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    #[must_use]
    pub fn scopes(&self) -> &FocusScopes {
        &self.scopes
    }

    #[must_use]
    pub fn app(&self) -> &Mounted {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut Mounted {
        &mut self.app
    }

    /// Element registered under `key`.
    #[must_use]
    pub fn node(&self, key: &str) -> Option<NodeId> {
        self.app.node(key)
    }

    /// Number of events dispatched so far.
    #[must_use]
    pub fn dispatched(&self) -> u64 {
        self.dispatched
    }

    /// Focus the element under `key`.
    pub fn focus(&mut self, key: &str) -> bool {
        self.node(key).is_some_and(|n| self.doc.focus(n))
    }

    /// Re-project every widget's attributes onto the document.
    pub fn project(&mut self) {
        self.app.project(&mut self.doc);
    }

    /// Open the dialog at `index` (declaration order).
    pub fn open_dialog(&mut self, index: usize) -> bool {
        self.app
            .dialogs
            .get_mut(index)
            .is_some_and(|d| d.open(&mut self.doc, &self.scopes))
    }

    /// Close the dialog at `index`.
    pub fn close_dialog(&mut self, index: usize) -> bool {
        self.app
            .dialogs
            .get_mut(index)
            .is_some_and(|d| d.close(&mut self.doc))
    }

    /// Handle one event. Returns whether a widget consumed it.
    pub fn dispatch(&mut self, event: Event) -> bool {
        self.dispatched += 1;
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("dispatch", seq = self.dispatched, ?event).entered();

        let handled = match event {
            Event::Click(target) => {
                self.focus_for_click(target);
                self.click(target)
            }
            Event::Key(_) => self.activate_focused(&event) || self.route_key(&event),
        };
        if handled {
            self.app.project(&mut self.doc);
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(handled, focused = ?self.doc.active_element(), "event done");
        handled
    }

    fn focus_for_click(&mut self, target: NodeId) {
        let mut cursor = Some(target);
        while let Some(node) = cursor {
            if self.doc.is_focusable(node) {
                self.doc.focus(node);
                return;
            }
            cursor = self.doc.parent(node);
        }
    }

    fn click(&mut self, target: NodeId) -> bool {
        let Self { doc, app, .. } = self;

        for acc in &mut app.accordions {
            let hit = acc
                .headers()
                .iter()
                .find(|(_, header)| doc.contains(*header, target))
                .cloned();
            if let Some((id, header)) = hit {
                return acc
                    .accordion
                    .handle_header_event(&id, header, &Event::Click(header), doc);
            }
        }
        for cal in &mut app.calendars {
            let hit = cal
                .buttons()
                .iter()
                .find(|(_, button)| doc.contains(*button, target))
                .copied();
            if let Some((action, button)) = hit {
                return cal
                    .calendar
                    .handle_button_event(action, button, &Event::Click(button), doc);
            }
        }
        app.dialogs
            .iter_mut()
            .rev()
            .any(|d| d.dialog.handle_event(&Event::Click(target), doc))
    }

    fn activate_focused(&mut self, event: &Event) -> bool {
        let Some(key) = event.as_key() else {
            return false;
        };
        if !matches!(key.code, KeyCode::Enter | KeyCode::Space) {
            return false;
        }
        let Some(active) = self.doc.active_element() else {
            return false;
        };
        let Self { doc, app, .. } = self;

        for acc in &mut app.accordions {
            let hit = acc.headers().iter().find(|(_, h)| *h == active).cloned();
            if let Some((id, header)) = hit {
                return acc.accordion.handle_header_event(&id, header, event, doc);
            }
        }
        for cal in &mut app.calendars {
            let hit = cal.buttons().iter().find(|(_, b)| *b == active).copied();
            if let Some((action, button)) = hit {
                return cal.calendar.handle_button_event(action, button, event, doc);
            }
        }
        false
    }

    fn route_key(&mut self, event: &Event) -> bool {
        let route = self.scopes.route(&self.doc);
        #[cfg(feature = "tracing")]
        tracing::trace!(route = ?route.iter().map(|s| s.id()).collect::<Vec<_>>(), "key route");
        route.into_iter().any(|scope| self.deliver(scope, event))
    }

    fn deliver(&mut self, scope: ScopeId, event: &Event) -> bool {
        let Self { doc, app, .. } = self;
        if let Some(cal) = app
            .calendars
            .iter_mut()
            .find(|c| c.calendar.scope_id() == Some(scope))
        {
            return cal.calendar.handle_event(event).is_some();
        }
        if let Some(d) = app
            .dialogs
            .iter_mut()
            .find(|d| d.dialog.scope_id() == Some(scope))
        {
            return d.dialog.handle_event(event, doc);
        }
        false
    }
}
