#![forbid(unsafe_code)]

//! Modal dialog focus trap.
//!
//! A [`Dialog`] wraps a container element. While active it keeps Tab and
//! Shift+Tab cycling through the container's tabbable descendants, and it
//! dismisses on Escape or a backdrop click.
//!
//! # Invariants
//!
//! - Tab moves to `(i + 1) mod n`, Shift+Tab to `(i + n - 1) mod n`; the
//!   index never goes negative and focus never leaves a non-empty sequence.
//! - Keys are handled only while focus is inside the container.
//! - Activation focuses the initial target (or the first tabbable) only
//!   when focus is not already inside the container.
//! - Escape and backdrop clicks share one dismissal path: the dismissal
//!   callback runs first, then the restore target is focused.
//! - Dismissal never changes [`FocusTrapState`]; the host decides when to
//!   deactivate.
//! - The focus scope is held only while active and released on
//!   deactivation or drop.
//!
//! # Failure Modes
//!
//! | Situation | Behavior |
//! |-----------|----------|
//! | empty tabbable sequence | Tab is consumed, focus stays |
//! | focused node not in sequence | Tab goes to the first, Shift+Tab to the last |
//! | `title()` while inactive | `ContextMissingError` |
//! | initial target not focusable | falls back to the first tabbable |

use core::fmt;

use wai_core::{
    ContextMissingError, Document, Event, FocusScopes, KeyCode, KeyEvent, NodeId, Reach, Role,
    ScopeGuard, ScopeId, require,
};

use crate::{Widget, instance_prefix};

/// Whether the trap is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrapPhase {
    #[default]
    Inactive,
    Active,
}

/// Why a dialog was dismissed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissReason {
    Escape,
    Backdrop,
}

/// Dialog configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogConfig {
    /// Element focused on activation instead of the first tabbable.
    pub initial_focus: Option<NodeId>,
    /// Element focused after dismissal.
    pub restore_focus: Option<NodeId>,
    /// Explicit accessible name; suppresses `aria-labelledby`.
    pub aria_label: Option<String>,
    /// Whether a description is rendered, enabling `aria-describedby`.
    pub described: bool,
    pub close_on_escape: bool,
    pub close_on_backdrop: bool,
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            initial_focus: None,
            restore_focus: None,
            aria_label: None,
            described: false,
            close_on_escape: true,
            close_on_backdrop: true,
        }
    }
}

impl DialogConfig {
    #[must_use]
    pub fn initial_focus(mut self, node: NodeId) -> Self {
        self.initial_focus = Some(node);
        self
    }

    #[must_use]
    pub fn restore_focus(mut self, node: NodeId) -> Self {
        self.restore_focus = Some(node);
        self
    }

    #[must_use]
    pub fn aria_label(mut self, label: impl Into<String>) -> Self {
        self.aria_label = Some(label.into());
        self
    }

    #[must_use]
    pub fn described(mut self, described: bool) -> Self {
        self.described = described;
        self
    }

    #[must_use]
    pub fn close_on_escape(mut self, close: bool) -> Self {
        self.close_on_escape = close;
        self
    }

    #[must_use]
    pub fn close_on_backdrop(mut self, close: bool) -> Self {
        self.close_on_backdrop = close;
        self
    }
}

/// Derived trap state, recomputed on activation and on every Tab.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FocusTrapState {
    pub label_id: String,
    pub described_by_id: Option<String>,
    pub tabbable_sequence: Vec<NodeId>,
    pub initial_focus: Option<NodeId>,
    pub restore_focus: Option<NodeId>,
}

impl FocusTrapState {
    /// Sequence index `steps` away from `current`, wrapping at both ends.
    ///
    /// A `current` outside the sequence counts as sitting just before the
    /// first element (forward) or just after the last (backward).
    #[must_use]
    pub fn cycle(&self, current: Option<NodeId>, backward: bool) -> Option<NodeId> {
        let n = self.tabbable_sequence.len();
        if n == 0 {
            return None;
        }
        let position = current.and_then(|c| self.tabbable_sequence.iter().position(|t| *t == c));
        let next = match (position, backward) {
            (Some(i), false) => (i + 1) % n,
            (Some(i), true) => (i + n - 1) % n,
            (None, false) => 0,
            (None, true) => n - 1,
        };
        self.tabbable_sequence.get(next).copied()
    }
}

type DismissHandler = Box<dyn FnMut(DismissReason)>;
type BackdropHandler = Box<dyn FnMut()>;

/// Modal dialog controller.
pub struct Dialog {
    prefix: String,
    container: NodeId,
    config: DialogConfig,
    backdrop: Option<NodeId>,
    on_backdrop_click: Option<BackdropHandler>,
    on_dismiss: Option<DismissHandler>,
    state: FocusTrapState,
    phase: TrapPhase,
    scope: Option<ScopeGuard>,
}

impl fmt::Debug for Dialog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dialog")
            .field("prefix", &self.prefix)
            .field("container", &self.container)
            .field("config", &self.config)
            .field("backdrop", &self.backdrop)
            .field("state", &self.state)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

impl Dialog {
    /// Create an inactive dialog around `container`.
    #[must_use]
    pub fn new(container: NodeId, config: DialogConfig) -> Self {
        let prefix = instance_prefix("dialog");
        Self {
            prefix,
            container,
            config,
            backdrop: None,
            on_backdrop_click: None,
            on_dismiss: None,
            state: FocusTrapState::default(),
            phase: TrapPhase::Inactive,
            scope: None,
        }
    }

    /// Callback run on every dismissal, before focus is restored.
    #[must_use]
    pub fn on_dismiss(mut self, handler: impl FnMut(DismissReason) + 'static) -> Self {
        self.on_dismiss = Some(Box::new(handler));
        self
    }

    /// Element whose clicks dismiss the dialog. It is never part of the
    /// tabbable sequence.
    #[must_use]
    pub fn backdrop(mut self, node: NodeId) -> Self {
        self.backdrop = Some(node);
        self
    }

    /// Extra callback for backdrop clicks, run before the dismissal path.
    #[must_use]
    pub fn on_backdrop_click(mut self, handler: impl FnMut() + 'static) -> Self {
        self.on_backdrop_click = Some(Box::new(handler));
        self
    }

    #[must_use]
    pub fn container(&self) -> NodeId {
        self.container
    }

    #[must_use]
    pub fn config(&self) -> &DialogConfig {
        &self.config
    }

    #[must_use]
    pub fn backdrop_node(&self) -> Option<NodeId> {
        self.backdrop
    }

    #[must_use]
    pub fn phase(&self) -> TrapPhase {
        self.phase
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.phase == TrapPhase::Active
    }

    #[must_use]
    pub fn state(&self) -> &FocusTrapState {
        &self.state
    }

    #[must_use]
    pub fn scope_id(&self) -> Option<ScopeId> {
        self.scope.as_ref().map(ScopeGuard::id)
    }

    fn label_id(&self) -> String {
        format!("{}-labelledby", self.prefix)
    }

    fn described_by_id(&self) -> String {
        format!("{}-describedby", self.prefix)
    }

    fn compute_state(&self, doc: &Document) -> FocusTrapState {
        let mut sequence = doc.tabbables(self.container);
        if let Some(backdrop) = self.backdrop {
            sequence.retain(|n| !doc.contains(backdrop, *n));
        }
        FocusTrapState {
            label_id: self.label_id(),
            described_by_id: self.config.described.then(|| self.described_by_id()),
            tabbable_sequence: sequence,
            initial_focus: self.config.initial_focus,
            restore_focus: self.config.restore_focus,
        }
    }

    /// Recompute the tabbable sequence from the current tree.
    pub fn refresh(&mut self, doc: &Document) {
        if self.is_active() {
            self.state = self.compute_state(doc);
        }
    }

    /// Start trapping focus. Returns `false` if already active.
    pub fn activate(&mut self, doc: &mut Document, scopes: &FocusScopes) -> bool {
        if self.is_active() {
            return false;
        }
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("dialog.activate", dialog = %self.prefix).entered();

        self.state = self.compute_state(doc);
        self.phase = TrapPhase::Active;
        self.scope = Some(scopes.register(self.container, Reach::Contained));

        if !doc.focus_within(self.container) {
            let focused = self
                .state
                .initial_focus
                .is_some_and(|target| doc.focus(target));
            if !focused && let Some(first) = self.state.tabbable_sequence.first() {
                doc.focus(*first);
            }
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(
            tabbables = self.state.tabbable_sequence.len(),
            focused = ?doc.active_element(),
            "focus trap active"
        );
        true
    }

    /// Stop trapping focus and release the focus scope.
    pub fn deactivate(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        self.phase = TrapPhase::Inactive;
        self.scope = None;
        #[cfg(feature = "tracing")]
        tracing::debug!(dialog = %self.prefix, "focus trap released");
        true
    }

    /// Handle an event. Returns whether it was consumed.
    pub fn handle_event(&mut self, event: &Event, doc: &mut Document) -> bool {
        if !self.is_active() {
            return false;
        }
        match event {
            Event::Key(key) => self.handle_key(key, doc),
            Event::Click(target) => self.handle_click(*target, doc),
        }
    }

    fn handle_key(&mut self, key: &KeyEvent, doc: &mut Document) -> bool {
        if !key.is_press() || !doc.focus_within(self.container) {
            return false;
        }
        match key.code {
            KeyCode::Tab => {
                self.refresh(doc);
                let next = self.state.cycle(doc.active_element(), key.shift());
                if let Some(next) = next {
                    doc.focus(next);
                }
                #[cfg(feature = "tracing")]
                tracing::trace!(backward = key.shift(), ?next, "focus trap cycle");
                true
            }
            KeyCode::Escape if self.config.close_on_escape => {
                self.dismiss(DismissReason::Escape, doc);
                true
            }
            _ => false,
        }
    }

    fn handle_click(&mut self, target: NodeId, doc: &mut Document) -> bool {
        let Some(backdrop) = self.backdrop else {
            return false;
        };
        if !doc.contains(backdrop, target) {
            return false;
        }
        if let Some(handler) = self.on_backdrop_click.as_mut() {
            handler();
        }
        if self.config.close_on_backdrop {
            self.dismiss(DismissReason::Backdrop, doc);
        }
        true
    }

    /// Run the dismissal path: callback, then focus restoration.
    pub fn dismiss(&mut self, reason: DismissReason, doc: &mut Document) {
        #[cfg(feature = "tracing")]
        tracing::debug!(dialog = %self.prefix, ?reason, "dialog dismissed");
        if let Some(handler) = self.on_dismiss.as_mut() {
            handler(reason);
        }
        if let Some(target) = self.state.restore_focus.or(self.config.restore_focus) {
            doc.focus(target);
        }
    }

    /// Title view; only available while the trap is active.
    pub fn title(&self) -> Result<TitleView, ContextMissingError> {
        require(self.is_active().then_some(()), Role::DialogTitle)?;
        Ok(TitleView {
            id: self.state.label_id.clone(),
        })
    }

    /// Description view; only available while the trap is active.
    pub fn description(&self) -> Result<DescriptionView, ContextMissingError> {
        require(self.is_active().then_some(()), Role::DialogDescription)?;
        Ok(DescriptionView {
            id: self.described_by_id(),
        })
    }

    /// Attributes of the dialog container.
    #[must_use]
    pub fn view(&self) -> DialogView {
        DialogView {
            label_id: self.label_id(),
            aria_label: self.config.aria_label.clone(),
            described_by: self.config.described.then(|| self.described_by_id()),
        }
    }
}

/// Container attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogView {
    pub label_id: String,
    pub aria_label: Option<String>,
    pub described_by: Option<String>,
}

impl Widget for DialogView {
    fn render(&self, node: NodeId, doc: &mut Document) {
        doc.set_attr(node, "role", "dialog");
        doc.set_attr(node, "aria-modal", "true");
        match &self.aria_label {
            Some(label) => {
                doc.set_attr(node, "aria-label", label.as_str());
                doc.remove_attr(node, "aria-labelledby");
            }
            None => {
                doc.remove_attr(node, "aria-label");
                doc.set_attr(node, "aria-labelledby", self.label_id.as_str());
            }
        }
        doc.set_attr_opt(node, "aria-describedby", self.described_by.as_deref());
    }
}

/// Dialog title attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleView {
    pub id: String,
}

impl Widget for TitleView {
    fn render(&self, node: NodeId, doc: &mut Document) {
        doc.set_attr(node, "id", self.id.as_str());
    }
}

/// Dialog description attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptionView {
    pub id: String,
}

impl Widget for DescriptionView {
    fn render(&self, node: NodeId, doc: &mut Document) {
        doc.set_attr(node, "id", self.id.as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use wai_core::{Ancestor, KeyEventKind};

    struct Fixture {
        doc: Document,
        scopes: FocusScopes,
        opener: NodeId,
        backdrop: NodeId,
        container: NodeId,
        buttons: Vec<NodeId>,
    }

    fn fixture(n: usize) -> Fixture {
        let mut doc = Document::new();
        let root = doc.root();
        let opener = doc.create_in(root, "button");
        let backdrop = doc.create_in(root, "div");
        let container = doc.create_in(root, "div");
        let buttons = (0..n).map(|_| doc.create_in(container, "button")).collect();
        Fixture {
            doc,
            scopes: FocusScopes::new(),
            opener,
            backdrop,
            container,
            buttons,
        }
    }

    fn log() -> (Rc<RefCell<Vec<String>>>, impl FnMut(DismissReason) + 'static) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&calls);
        (calls, move |reason| sink.borrow_mut().push(format!("{reason:?}")))
    }

    fn tab() -> Event {
        Event::key(KeyCode::Tab)
    }

    fn shift_tab() -> Event {
        Event::shift_key(KeyCode::Tab)
    }

    #[test]
    fn activation_focuses_first_tabbable() {
        let mut f = fixture(3);
        let mut dialog = Dialog::new(f.container, DialogConfig::default());
        assert!(dialog.activate(&mut f.doc, &f.scopes));
        assert_eq!(f.doc.active_element(), Some(f.buttons[0]));
        assert_eq!(dialog.state().tabbable_sequence, f.buttons);
    }

    #[test]
    fn activation_prefers_initial_target() {
        let mut f = fixture(3);
        let config = DialogConfig::default().initial_focus(f.buttons[2]);
        let mut dialog = Dialog::new(f.container, config);
        dialog.activate(&mut f.doc, &f.scopes);
        assert_eq!(f.doc.active_element(), Some(f.buttons[2]));
    }

    #[test]
    fn activation_keeps_focus_already_inside() {
        let mut f = fixture(3);
        f.doc.focus(f.buttons[1]);
        let mut dialog = Dialog::new(f.container, DialogConfig::default());
        dialog.activate(&mut f.doc, &f.scopes);
        assert_eq!(f.doc.active_element(), Some(f.buttons[1]));
    }

    #[test]
    fn empty_sequence_leaves_focus_alone() {
        let mut f = fixture(0);
        f.doc.focus(f.opener);
        let mut dialog = Dialog::new(f.container, DialogConfig::default());
        dialog.activate(&mut f.doc, &f.scopes);
        assert_eq!(f.doc.active_element(), Some(f.opener));
    }

    #[test]
    fn tab_wraps_forward_and_backward() {
        let mut f = fixture(3);
        let (a, c) = (f.buttons[0], f.buttons[2]);
        let mut dialog = Dialog::new(f.container, DialogConfig::default());
        dialog.activate(&mut f.doc, &f.scopes);

        f.doc.focus(c);
        assert!(dialog.handle_event(&tab(), &mut f.doc));
        assert_eq!(f.doc.active_element(), Some(a));

        assert!(dialog.handle_event(&shift_tab(), &mut f.doc));
        assert_eq!(f.doc.active_element(), Some(c));
    }

    #[test]
    fn keys_are_ignored_while_focus_is_outside() {
        let mut f = fixture(3);
        let mut dialog = Dialog::new(f.container, DialogConfig::default());
        dialog.activate(&mut f.doc, &f.scopes);
        f.doc.focus(f.opener);
        assert!(!dialog.handle_event(&tab(), &mut f.doc));
        assert!(!dialog.handle_event(&Event::key(KeyCode::Escape), &mut f.doc));
        assert_eq!(f.doc.active_element(), Some(f.opener));
    }

    #[test]
    fn focus_off_sequence_enters_at_the_ends() {
        let mut f = fixture(3);
        let stray = f.doc.create_in(f.container, "div");
        f.doc.set_tab_index(stray, Some(-1));
        let mut dialog = Dialog::new(f.container, DialogConfig::default());
        dialog.activate(&mut f.doc, &f.scopes);

        f.doc.focus(stray);
        dialog.handle_event(&shift_tab(), &mut f.doc);
        assert_eq!(f.doc.active_element(), Some(f.buttons[2]));

        f.doc.focus(stray);
        dialog.handle_event(&tab(), &mut f.doc);
        assert_eq!(f.doc.active_element(), Some(f.buttons[0]));
    }

    #[test]
    fn tab_sees_elements_added_after_activation() {
        let mut f = fixture(2);
        let mut dialog = Dialog::new(f.container, DialogConfig::default());
        dialog.activate(&mut f.doc, &f.scopes);
        let late = f.doc.create_in(f.container, "button");

        f.doc.focus(f.buttons[1]);
        dialog.handle_event(&tab(), &mut f.doc);
        assert_eq!(f.doc.active_element(), Some(late));
        assert_eq!(dialog.state().tabbable_sequence.len(), 3);
    }

    #[test]
    fn escape_dismisses_once_and_restores_focus() {
        let mut f = fixture(3);
        let (calls, handler) = log();
        let config = DialogConfig::default().restore_focus(f.opener);
        let mut dialog = Dialog::new(f.container, config).on_dismiss(handler);
        dialog.activate(&mut f.doc, &f.scopes);
        assert_eq!(f.doc.active_element(), Some(f.buttons[0]));

        assert!(dialog.handle_event(&Event::key(KeyCode::Escape), &mut f.doc));
        assert_eq!(*calls.borrow(), vec!["Escape".to_owned()]);
        assert_eq!(f.doc.active_element(), Some(f.opener));
        assert!(dialog.is_active());
    }

    #[test]
    fn escape_can_be_disabled() {
        let mut f = fixture(1);
        let (calls, handler) = log();
        let config = DialogConfig::default().close_on_escape(false);
        let mut dialog = Dialog::new(f.container, config).on_dismiss(handler);
        dialog.activate(&mut f.doc, &f.scopes);
        assert!(!dialog.handle_event(&Event::key(KeyCode::Escape), &mut f.doc));
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn key_release_is_ignored() {
        let mut f = fixture(2);
        let mut dialog = Dialog::new(f.container, DialogConfig::default());
        dialog.activate(&mut f.doc, &f.scopes);
        let release = Event::Key(KeyEvent::new(KeyCode::Tab).with_kind(KeyEventKind::Release));
        assert!(!dialog.handle_event(&release, &mut f.doc));
        assert_eq!(f.doc.active_element(), Some(f.buttons[0]));
    }

    #[test]
    fn backdrop_click_runs_custom_handler_then_dismisses() {
        let mut f = fixture(1);
        let order = Rc::new(RefCell::new(Vec::new()));
        let (on_click, on_dismiss) = (Rc::clone(&order), Rc::clone(&order));
        let config = DialogConfig::default().restore_focus(f.opener);
        let mut dialog = Dialog::new(f.container, config)
            .backdrop(f.backdrop)
            .on_backdrop_click(move || on_click.borrow_mut().push("click"))
            .on_dismiss(move |_| on_dismiss.borrow_mut().push("dismiss"));
        dialog.activate(&mut f.doc, &f.scopes);

        assert!(dialog.handle_event(&Event::Click(f.backdrop), &mut f.doc));
        assert_eq!(*order.borrow(), vec!["click", "dismiss"]);
        assert_eq!(f.doc.active_element(), Some(f.opener));
    }

    #[test]
    fn clicks_elsewhere_are_not_consumed() {
        let mut f = fixture(1);
        let (calls, handler) = log();
        let mut dialog = Dialog::new(f.container, DialogConfig::default())
            .backdrop(f.backdrop)
            .on_dismiss(handler);
        dialog.activate(&mut f.doc, &f.scopes);
        assert!(!dialog.handle_event(&Event::Click(f.buttons[0]), &mut f.doc));
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn backdrop_inside_container_is_not_tabbable() {
        let mut f = fixture(1);
        let inner = f.doc.create_in(f.container, "button");
        let mut dialog = Dialog::new(f.container, DialogConfig::default()).backdrop(inner);
        dialog.activate(&mut f.doc, &f.scopes);
        assert_eq!(dialog.state().tabbable_sequence, vec![f.buttons[0]]);
    }

    #[test]
    fn title_requires_active_trap() {
        let mut f = fixture(1);
        let mut dialog = Dialog::new(f.container, DialogConfig::default());
        let err = dialog.title().unwrap_err();
        assert_eq!(err.ancestor, Ancestor::Dialog);
        assert_eq!(dialog.description().unwrap_err().role, Role::DialogDescription);

        dialog.activate(&mut f.doc, &f.scopes);
        assert_eq!(dialog.title().unwrap().id, dialog.view().label_id);
    }

    #[test]
    fn view_labels_with_title_or_explicit_label() {
        let mut doc = Document::new();
        let node = doc.create_in(doc.root(), "div");

        Dialog::new(node, DialogConfig::default())
            .view()
            .render(node, &mut doc);
        assert_eq!(doc.attr(node, "role"), Some("dialog"));
        assert_eq!(doc.attr(node, "aria-modal"), Some("true"));
        assert!(doc.attr(node, "aria-labelledby").is_some());
        assert_eq!(doc.attr(node, "aria-describedby"), None);

        Dialog::new(node, DialogConfig::default().aria_label("Settings").described(true))
            .view()
            .render(node, &mut doc);
        assert_eq!(doc.attr(node, "aria-label"), Some("Settings"));
        assert_eq!(doc.attr(node, "aria-labelledby"), None);
        assert!(doc.attr(node, "aria-describedby").is_some());
    }

    #[test]
    fn description_id_matches_describedby() {
        let mut f = fixture(1);
        let mut dialog = Dialog::new(f.container, DialogConfig::default().described(true));
        dialog.activate(&mut f.doc, &f.scopes);
        assert_eq!(
            Some(dialog.description().unwrap().id),
            dialog.state().described_by_id.clone()
        );
    }

    #[test]
    fn deactivate_releases_scope() {
        let mut f = fixture(1);
        let mut dialog = Dialog::new(f.container, DialogConfig::default());
        dialog.activate(&mut f.doc, &f.scopes);
        assert_eq!(f.scopes.owner(&f.doc), dialog.scope_id());
        assert!(!dialog.activate(&mut f.doc, &f.scopes));
        assert_eq!(f.scopes.depth(), 1);

        assert!(dialog.deactivate());
        assert!(f.scopes.is_empty());
        assert!(!dialog.handle_event(&tab(), &mut f.doc));
    }

    #[test]
    fn dropping_active_dialog_releases_scope() {
        let mut f = fixture(1);
        {
            let mut dialog = Dialog::new(f.container, DialogConfig::default());
            dialog.activate(&mut f.doc, &f.scopes);
        }
        assert!(f.scopes.is_empty());
    }

    proptest! {
        #[test]
        fn cycling_never_leaves_sequence(n in 1usize..8, moves in proptest::collection::vec(any::<bool>(), 1..40)) {
            let mut f = fixture(n);
            let mut dialog = Dialog::new(f.container, DialogConfig::default());
            dialog.activate(&mut f.doc, &f.scopes);
            let mut expected = 0usize;
            for backward in moves {
                let event = if backward { shift_tab() } else { tab() };
                prop_assert!(dialog.handle_event(&event, &mut f.doc));
                expected = if backward { (expected + n - 1) % n } else { (expected + 1) % n };
                prop_assert_eq!(f.doc.active_element(), Some(f.buttons[expected]));
            }
        }
    }
}
