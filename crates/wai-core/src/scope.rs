#![forbid(unsafe_code)]

//! Focus-scope stack deciding which widget hears a keystroke.
//!
//! Widgets that listen to the keyboard (calendars, dialogs) register a scope
//! while they are active. Instead of every widget listening to the whole
//! input surface, key events are routed along a precedence chain computed
//! from the stack and the current focus.
//!
//! # Routing
//!
//! 1. Scopes whose container holds the focused element, innermost container
//!    first. Scopes sharing a container go most recently registered first.
//!    Events bubble along this chain until one widget consumes them.
//! 2. If no scope contains focus, the most recently registered
//!    [`Reach::Ambient`] scope alone receives the event.
//! 3. Otherwise nobody does.
//!
//! Two sibling calendars therefore never react to the same keystroke, and a
//! dialog nested inside another dialog is asked before its ancestor no matter
//! which of the two registered last.
//!
//! # Invariants
//!
//! - A [`ScopeGuard`] removes its entry when dropped, on every exit path.
//! - Registration order is preserved; ids are never reused.
//! - The stack is single-threaded (`Rc<RefCell<..>>`); it is never borrowed
//!   across a widget callback.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::dom::{Document, NodeId};

/// Global counter for unique scope ids.
static SCOPE_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a registered focus scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(u64);

impl ScopeId {
    fn new() -> Self {
        Self(SCOPE_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw id value.
    #[inline]
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

/// How far a scope's keyboard handling reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Reach {
    /// Only while focus is inside the scope's container.
    #[default]
    Contained,
    /// Also while focus is outside every registered scope.
    Ambient,
}

#[derive(Debug, Clone, Copy)]
struct ScopeEntry {
    id: ScopeId,
    container: NodeId,
    reach: Reach,
}

type Stack = RefCell<Vec<ScopeEntry>>;

/// Shared handle to the focus-scope stack.
///
/// Cloning is cheap and yields another handle to the same stack.
#[derive(Debug, Clone, Default)]
pub struct FocusScopes {
    inner: Rc<Stack>,
}

impl FocusScopes {
    /// Create an empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a scope for `container`. The scope lives as long as the guard.
    #[must_use = "dropping the guard immediately releases the scope"]
    pub fn register(&self, container: NodeId, reach: Reach) -> ScopeGuard {
        let id = ScopeId::new();
        self.inner.borrow_mut().push(ScopeEntry {
            id,
            container,
            reach,
        });
        #[cfg(feature = "tracing")]
        tracing::debug!(scope = id.id(), ?reach, "focus scope registered");
        ScopeGuard {
            id,
            stack: Rc::downgrade(&self.inner),
        }
    }

    /// Number of registered scopes.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.inner.borrow().len()
    }

    /// Whether no scope is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }

    /// Whether `id` is still registered.
    #[must_use]
    pub fn contains(&self, id: ScopeId) -> bool {
        self.inner.borrow().iter().any(|e| e.id == id)
    }

    /// Container element of a registered scope.
    #[must_use]
    pub fn container(&self, id: ScopeId) -> Option<NodeId> {
        self.inner
            .borrow()
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.container)
    }

    /// Precedence chain for the next key event, highest priority first.
    #[must_use]
    pub fn route(&self, doc: &Document) -> Vec<ScopeId> {
        route_in(&self.inner.borrow(), doc)
    }

    /// The scope that hears the next key event first.
    #[must_use]
    pub fn owner(&self, doc: &Document) -> Option<ScopeId> {
        self.route(doc).first().copied()
    }
}

fn route_in(entries: &[ScopeEntry], doc: &Document) -> Vec<ScopeId> {
    let mut containing: Vec<(usize, ScopeId)> = match doc.active_element() {
        Some(active) => entries
            .iter()
            .rev()
            .filter(|e| doc.contains(e.container, active))
            .map(|e| (doc.depth(e.container), e.id))
            .collect(),
        None => Vec::new(),
    };
    if !containing.is_empty() {
        // Every container holds focus, so they form one ancestor chain.
        // Stable: equal depth keeps recency order.
        containing.sort_by(|a, b| b.0.cmp(&a.0));
        return containing.into_iter().map(|(_, id)| id).collect();
    }
    entries
        .iter()
        .rev()
        .find(|e| e.reach == Reach::Ambient)
        .map(|e| vec![e.id])
        .unwrap_or_default()
}

/// RAII registration of one focus scope.
///
/// Dropping the guard unregisters the scope, so a widget that unmounts,
/// deactivates, or unwinds never leaves a dangling listener behind.
#[derive(Debug)]
pub struct ScopeGuard {
    id: ScopeId,
    stack: Weak<Stack>,
}

impl ScopeGuard {
    /// Id of the guarded scope.
    #[inline]
    #[must_use]
    pub fn id(&self) -> ScopeId {
        self.id
    }

    /// Whether this scope is first in line for the next key event.
    #[must_use]
    pub fn owns(&self, doc: &Document) -> bool {
        self.stack
            .upgrade()
            .is_some_and(|stack| route_in(&stack.borrow(), doc).first() == Some(&self.id))
    }

    /// Whether this scope is anywhere on the precedence chain.
    #[must_use]
    pub fn in_route(&self, doc: &Document) -> bool {
        self.stack
            .upgrade()
            .is_some_and(|stack| route_in(&stack.borrow(), doc).contains(&self.id))
    }
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        if let Some(stack) = self.stack.upgrade() {
            stack.borrow_mut().retain(|e| e.id != self.id);
            #[cfg(feature = "tracing")]
            tracing::debug!(scope = self.id.id(), "focus scope released");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_regions() -> (Document, NodeId, NodeId, NodeId, NodeId) {
        let mut doc = Document::new();
        let root = doc.root();
        let a = doc.create_in(root, "div");
        let a_btn = doc.create_in(a, "button");
        let b = doc.create_in(root, "div");
        let b_btn = doc.create_in(b, "button");
        (doc, a, a_btn, b, b_btn)
    }

    #[test]
    fn empty_stack_routes_nowhere() {
        let doc = Document::new();
        let scopes = FocusScopes::new();
        assert!(scopes.route(&doc).is_empty());
        assert!(scopes.owner(&doc).is_none());
    }

    #[test]
    fn guard_drop_releases_scope() {
        let (_, a, ..) = two_regions();
        let scopes = FocusScopes::new();
        let guard = scopes.register(a, Reach::Contained);
        let id = guard.id();
        assert!(scopes.contains(id));
        drop(guard);
        assert!(!scopes.contains(id));
        assert!(scopes.is_empty());
    }

    #[test]
    fn contained_scope_needs_focus_inside() {
        let (mut doc, a, a_btn, _, b_btn) = two_regions();
        let scopes = FocusScopes::new();
        let guard = scopes.register(a, Reach::Contained);
        doc.focus(b_btn);
        assert!(!guard.owns(&doc));
        doc.focus(a_btn);
        assert!(guard.owns(&doc));
    }

    #[test]
    fn only_latest_ambient_scope_hears_unfocused_keys() {
        let (doc, a, _, b, _) = two_regions();
        let scopes = FocusScopes::new();
        let first = scopes.register(a, Reach::Ambient);
        let second = scopes.register(b, Reach::Ambient);
        assert!(second.owns(&doc));
        assert!(!first.in_route(&doc));
        drop(second);
        assert!(first.owns(&doc));
    }

    #[test]
    fn focus_beats_recency() {
        let (mut doc, a, a_btn, b, _) = two_regions();
        let scopes = FocusScopes::new();
        let first = scopes.register(a, Reach::Ambient);
        let _second = scopes.register(b, Reach::Ambient);
        doc.focus(a_btn);
        assert!(first.owns(&doc));
    }

    #[test]
    fn nested_scopes_bubble_inner_first() {
        let mut doc = Document::new();
        let outer = doc.create_in(doc.root(), "div");
        let inner = doc.create_in(outer, "div");
        let btn = doc.create_in(inner, "button");
        let scopes = FocusScopes::new();
        let outer_guard = scopes.register(outer, Reach::Contained);
        let inner_guard = scopes.register(inner, Reach::Contained);
        doc.focus(btn);
        assert_eq!(scopes.route(&doc), vec![inner_guard.id(), outer_guard.id()]);
        assert!(inner_guard.owns(&doc));
        assert!(outer_guard.in_route(&doc));
    }

    #[test]
    fn reregistered_outer_scope_stays_behind_inner() {
        let mut doc = Document::new();
        let outer = doc.create_in(doc.root(), "div");
        let inner = doc.create_in(outer, "div");
        let btn = doc.create_in(inner, "button");
        let scopes = FocusScopes::new();
        let outer_guard = scopes.register(outer, Reach::Contained);
        let inner_guard = scopes.register(inner, Reach::Contained);
        drop(outer_guard);
        let outer_guard = scopes.register(outer, Reach::Contained);
        doc.focus(btn);
        assert_eq!(scopes.route(&doc), vec![inner_guard.id(), outer_guard.id()]);
        assert!(inner_guard.owns(&doc));
    }

    #[test]
    fn shared_container_prefers_latest() {
        let (mut doc, a, a_btn, ..) = two_regions();
        let scopes = FocusScopes::new();
        let first = scopes.register(a, Reach::Contained);
        let second = scopes.register(a, Reach::Contained);
        doc.focus(a_btn);
        assert_eq!(scopes.route(&doc), vec![second.id(), first.id()]);
    }

    #[test]
    fn guard_outliving_stack_is_inert() {
        let (doc, a, ..) = two_regions();
        let scopes = FocusScopes::new();
        let guard = scopes.register(a, Reach::Ambient);
        drop(scopes);
        assert!(!guard.owns(&doc));
        drop(guard);
    }
}
