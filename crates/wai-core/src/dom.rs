#![forbid(unsafe_code)]

//! In-memory element tree with focus tracking.
//!
//! `Document` is the reference focus host for wai widgets: it stores a tree
//! of elements (tag, attributes, text, tabindex), tracks the single focused
//! element, and computes tabbable sequences. Host applications that own a
//! real view tree mirror the calls widgets make here.
//!
//! # Invariants
//!
//! 1. Removing a node frees its whole subtree. Freed slots are recycled
//!    under a new generation, so a stale `NodeId` never resolves again.
//! 2. At most one node is focused, and the focused node is always connected,
//!    visible, enabled, and focusable.
//! 3. `tabbables()` returns nodes in tab order: positive tabindex ascending
//!    (ties in document order), then tabindex 0 in document order.
//!
//! # Failure Modes
//!
//! | Call | Bad input | Behavior |
//! |------|-----------|----------|
//! | `focus` | detached/hidden/disabled/unfocusable node | returns `false`, focus unchanged |
//! | `append` | child is an ancestor of parent | returns `false`, tree unchanged |
//! | any accessor | unknown or stale id | `None` / `false` / empty |

use ahash::AHashMap;

/// Handle to an element in a [`Document`].
///
/// Pairs an arena slot with the generation the slot had when the node was
/// created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    slot: u32,
    generation: u32,
}

impl NodeId {
    #[inline]
    const fn new(slot: u32, generation: u32) -> Self {
        Self { slot, generation }
    }

    #[inline]
    fn index(self) -> usize {
        self.slot as usize
    }

    /// Arena slot of this node.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.slot
    }

    /// Generation of the slot when this id was handed out.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

#[derive(Debug, Clone)]
struct Node {
    tag: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    attrs: AHashMap<String, String>,
    text: String,
    tab_index: Option<i32>,
    disabled: bool,
    hidden: bool,
}

impl Node {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            parent: None,
            children: Vec::new(),
            attrs: AHashMap::new(),
            text: String::new(),
            tab_index: None,
            disabled: false,
            hidden: false,
        }
    }

    /// Focusable by sequential navigation without an explicit tabindex.
    fn natively_focusable(&self) -> bool {
        match self.tag.as_str() {
            "button" | "select" | "textarea" => true,
            "input" => self.attrs.get("type").is_none_or(|t| t != "hidden"),
            "a" => self.attrs.contains_key("href"),
            _ => false,
        }
    }

    /// Effective tabindex, `None` when the node is not focusable at all.
    fn effective_tab_index(&self) -> Option<i32> {
        match self.tab_index {
            Some(index) => Some(index),
            None if self.natively_focusable() => Some(0),
            None => None,
        }
    }
}

/// Arena-backed element tree rooted at a `body` element.
#[derive(Debug, Clone)]
pub struct Document {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: NodeId,
    active: Option<NodeId>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document containing only the `body` root.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: vec![Slot {
                generation: 0,
                node: Some(Node::new("body")),
            }],
            free: Vec::new(),
            root: NodeId::new(0, 0),
            active: None,
        }
    }

    /// The root (`body`) element.
    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of live nodes, the root included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Number of arena slots, live or awaiting reuse.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index())
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.node.as_ref())
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index())
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.node.as_mut())
    }

    /// Create a detached element, reusing a freed slot when one is available.
    pub fn create(&mut self, tag: &str) -> NodeId {
        if let Some(slot) = self.free.pop() {
            let entry = &mut self.slots[slot as usize];
            entry.node = Some(Node::new(tag));
            return NodeId::new(slot, entry.generation);
        }
        let slot = u32::try_from(self.slots.len()).unwrap_or(u32::MAX);
        self.slots.push(Slot {
            generation: 0,
            node: Some(Node::new(tag)),
        });
        NodeId::new(slot, 0)
    }

    /// Create an element and append it to `parent` in one step.
    pub fn create_in(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let id = self.create(tag);
        self.append(parent, id);
        id
    }

    /// Append `child` as the last child of `parent`, moving it if attached.
    ///
    /// Returns `false` (and changes nothing) if either id is unknown or the
    /// move would create a cycle.
    pub fn append(&mut self, parent: NodeId, child: NodeId) -> bool {
        if self.node(parent).is_none() || self.node(child).is_none() {
            return false;
        }
        if self.contains(child, parent) {
            return false;
        }
        self.detach(child);
        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.node_mut(parent) {
            node.children.push(child);
        }
        true
    }

    /// Remove `node` and its subtree, freeing their slots.
    ///
    /// Focus held inside the removed subtree is dropped, mirroring how a
    /// browser returns focus to the body when the focused element goes away.
    /// Ids into the subtree go stale: every accessor treats them as unknown.
    pub fn remove(&mut self, node: NodeId) {
        if node == self.root || self.node(node).is_none() {
            return;
        }
        if let Some(active) = self.active
            && self.contains(node, active)
        {
            self.active = None;
        }
        self.detach(node);
        let mut doomed = self.descendants(node);
        doomed.push(node);
        for id in doomed {
            if let Some(slot) = self.slots.get_mut(id.index()) {
                slot.node = None;
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(id.slot);
            }
        }
    }

    /// Remove every child of `node`.
    pub fn clear_children(&mut self, node: NodeId) {
        let children = self.children(node).to_vec();
        for child in children {
            self.remove(child);
        }
    }

    fn detach(&mut self, child: NodeId) {
        let Some(parent) = self.node(child).and_then(|n| n.parent) else {
            return;
        };
        if let Some(node) = self.node_mut(parent) {
            node.children.retain(|c| *c != child);
        }
        if let Some(node) = self.node_mut(child) {
            node.parent = None;
        }
    }

    /// Parent of `node`, if attached.
    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).and_then(|n| n.parent)
    }

    /// Children of `node` in document order.
    #[must_use]
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.node(node).map_or(&[], |n| n.children.as_slice())
    }

    /// Number of ancestors above `node`; the root and detached nodes are 0.
    #[must_use]
    pub fn depth(&self, node: NodeId) -> usize {
        std::iter::successors(self.parent(node), |n| self.parent(*n)).count()
    }

    /// Lower-cased tag name.
    #[must_use]
    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.node(node).map(|n| n.tag.as_str())
    }

    /// Whether `node` is attached to the document root.
    #[must_use]
    pub fn is_connected(&self, node: NodeId) -> bool {
        self.contains(self.root, node)
    }

    /// Inclusive containment: `contains(a, a)` is `true`.
    #[must_use]
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if current == ancestor {
                return self.node(current).is_some();
            }
            cursor = self.parent(current);
        }
        false
    }

    /// Descendants of `node` in document (pre-)order, `node` excluded.
    #[must_use]
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }

    // ── attributes ────────────────────────────────────────────────────

    /// Set an attribute, replacing any previous value.
    pub fn set_attr(&mut self, node: NodeId, name: &str, value: impl Into<String>) {
        if let Some(n) = self.node_mut(node) {
            n.attrs.insert(name.to_owned(), value.into());
        }
    }

    /// Remove an attribute if present.
    pub fn remove_attr(&mut self, node: NodeId, name: &str) {
        if let Some(n) = self.node_mut(node) {
            n.attrs.remove(name);
        }
    }

    /// Set or remove an attribute depending on `value`.
    pub fn set_attr_opt(&mut self, node: NodeId, name: &str, value: Option<impl Into<String>>) {
        match value {
            Some(value) => self.set_attr(node, name, value),
            None => self.remove_attr(node, name),
        }
    }

    /// Read an attribute.
    #[must_use]
    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.node(node)?.attrs.get(name).map(String::as_str)
    }

    /// First connected element whose `id` attribute equals `id`.
    #[must_use]
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        std::iter::once(self.root)
            .chain(self.descendants(self.root))
            .find(|node| self.attr(*node, "id") == Some(id))
    }

    /// Replace the node's own text.
    pub fn set_text(&mut self, node: NodeId, text: impl Into<String>) {
        if let Some(n) = self.node_mut(node) {
            n.text = text.into();
        }
    }

    /// The node's own text (descendants excluded).
    #[must_use]
    pub fn text(&self, node: NodeId) -> &str {
        self.node(node).map_or("", |n| n.text.as_str())
    }

    /// Concatenated text of the node and all of its descendants.
    #[must_use]
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = self.text(node).to_owned();
        for d in self.descendants(node) {
            out.push_str(self.text(d));
        }
        out
    }

    // ── focusability ──────────────────────────────────────────────────

    /// Set or clear the explicit tabindex.
    pub fn set_tab_index(&mut self, node: NodeId, index: Option<i32>) {
        if let Some(n) = self.node_mut(node) {
            n.tab_index = index;
        }
        if index.is_none() && self.active == Some(node) && !self.is_focusable(node) {
            self.active = None;
        }
    }

    /// Explicit tabindex, if one was set.
    #[must_use]
    pub fn tab_index(&self, node: NodeId) -> Option<i32> {
        self.node(node).and_then(|n| n.tab_index)
    }

    /// Mark a node disabled; a disabled focused node loses focus.
    pub fn set_disabled(&mut self, node: NodeId, disabled: bool) {
        if let Some(n) = self.node_mut(node) {
            n.disabled = disabled;
        }
        if disabled && self.active == Some(node) {
            self.active = None;
        }
    }

    /// Hide a subtree; focus inside it is dropped.
    pub fn set_hidden(&mut self, node: NodeId, hidden: bool) {
        if let Some(n) = self.node_mut(node) {
            n.hidden = hidden;
        }
        if hidden
            && let Some(active) = self.active
            && self.contains(node, active)
        {
            self.active = None;
        }
    }

    fn hidden_in_ancestry(&self, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if self.node(current).is_some_and(|n| n.hidden) {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    /// Whether `node` can receive focus (programmatically or by Tab).
    #[must_use]
    pub fn is_focusable(&self, node: NodeId) -> bool {
        let Some(n) = self.node(node) else {
            return false;
        };
        !n.disabled
            && n.effective_tab_index().is_some()
            && self.is_connected(node)
            && !self.hidden_in_ancestry(node)
    }

    /// Whether `node` participates in sequential (Tab) navigation.
    #[must_use]
    pub fn is_tabbable(&self, node: NodeId) -> bool {
        self.is_focusable(node)
            && self
                .node(node)
                .and_then(Node::effective_tab_index)
                .is_some_and(|i| i >= 0)
    }

    /// Tabbable descendants of `container` in tab order.
    ///
    /// The container itself is never part of its own sequence. Hidden
    /// subtrees are skipped wholesale.
    #[must_use]
    pub fn tabbables(&self, container: NodeId) -> Vec<NodeId> {
        if !self.is_connected(container) || self.hidden_in_ancestry(container) {
            return Vec::new();
        }
        let mut positive: Vec<(i32, NodeId)> = Vec::new();
        let mut zero: Vec<NodeId> = Vec::new();
        let mut stack: Vec<NodeId> = self.children(container).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            let Some(n) = self.node(current) else {
                continue;
            };
            if n.hidden {
                continue;
            }
            if !n.disabled {
                match n.effective_tab_index() {
                    Some(i) if i > 0 => positive.push((i, current)),
                    Some(0) => zero.push(current),
                    _ => {}
                }
            }
            stack.extend(n.children.iter().rev().copied());
        }
        // Stable: equal tabindex keeps document order.
        positive.sort_by_key(|(i, _)| *i);
        positive.into_iter().map(|(_, id)| id).chain(zero).collect()
    }

    // ── focus ─────────────────────────────────────────────────────────

    /// Currently focused element.
    #[inline]
    #[must_use]
    pub fn active_element(&self) -> Option<NodeId> {
        self.active
    }

    /// Move focus to `node`. Returns `false` if it cannot take focus.
    pub fn focus(&mut self, node: NodeId) -> bool {
        if !self.is_focusable(node) {
            return false;
        }
        #[cfg(feature = "tracing")]
        tracing::trace!(from = ?self.active, to = ?node, "focus moved");
        self.active = Some(node);
        true
    }

    /// Clear focus.
    pub fn blur(&mut self) -> Option<NodeId> {
        self.active.take()
    }

    /// Whether the focused element lies inside `container` (inclusive).
    #[must_use]
    pub fn focus_within(&self, container: NodeId) -> bool {
        self.active.is_some_and(|a| self.contains(container, a))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with(tags: &[&str]) -> (Document, NodeId, Vec<NodeId>) {
        let mut doc = Document::new();
        let container = doc.create_in(doc.root(), "div");
        let nodes = tags.iter().map(|t| doc.create_in(container, t)).collect();
        (doc, container, nodes)
    }

    #[test]
    fn new_document_has_body_root() {
        let doc = Document::new();
        assert_eq!(doc.tag(doc.root()), Some("body"));
        assert!(doc.active_element().is_none());
    }

    #[test]
    fn contains_is_inclusive() {
        let (doc, container, nodes) = doc_with(&["button"]);
        assert!(doc.contains(container, container));
        assert!(doc.contains(container, nodes[0]));
        assert!(!doc.contains(nodes[0], container));
    }

    #[test]
    fn append_rejects_cycles() {
        let (mut doc, container, nodes) = doc_with(&["div"]);
        assert!(!doc.append(nodes[0], container));
        assert_eq!(doc.parent(nodes[0]), Some(container));
    }

    #[test]
    fn append_moves_attached_node() {
        let (mut doc, container, nodes) = doc_with(&["div", "span"]);
        assert!(doc.append(nodes[0], nodes[1]));
        assert_eq!(doc.children(container), &[nodes[0]]);
        assert_eq!(doc.parent(nodes[1]), Some(nodes[0]));
    }

    #[test]
    fn native_controls_are_tabbable() {
        let (doc, container, nodes) = doc_with(&["button", "input", "div", "select"]);
        assert_eq!(doc.tabbables(container), vec![nodes[0], nodes[1], nodes[3]]);
    }

    #[test]
    fn hidden_input_and_bare_anchor_are_skipped() {
        let (mut doc, container, nodes) = doc_with(&["input", "a", "a"]);
        doc.set_attr(nodes[0], "type", "hidden");
        doc.set_attr(nodes[2], "href", "#top");
        assert_eq!(doc.tabbables(container), vec![nodes[2]]);
    }

    #[test]
    fn negative_tab_index_is_focusable_but_not_tabbable() {
        let (mut doc, container, nodes) = doc_with(&["td"]);
        doc.set_tab_index(nodes[0], Some(-1));
        assert!(doc.is_focusable(nodes[0]));
        assert!(!doc.is_tabbable(nodes[0]));
        assert!(doc.tabbables(container).is_empty());
        assert!(doc.focus(nodes[0]));
    }

    #[test]
    fn positive_tab_index_orders_first() {
        let (mut doc, container, nodes) = doc_with(&["button", "div", "div", "button"]);
        doc.set_tab_index(nodes[1], Some(2));
        doc.set_tab_index(nodes[2], Some(1));
        assert_eq!(
            doc.tabbables(container),
            vec![nodes[2], nodes[1], nodes[0], nodes[3]]
        );
    }

    #[test]
    fn disabled_and_hidden_excluded() {
        let (mut doc, container, nodes) = doc_with(&["button", "div", "button"]);
        doc.set_disabled(nodes[0], true);
        doc.set_hidden(nodes[1], true);
        let inner = doc.create_in(nodes[1], "button");
        assert!(!doc.is_focusable(inner));
        assert_eq!(doc.tabbables(container), vec![nodes[2]]);
    }

    #[test]
    fn focus_rejects_detached_nodes() {
        let mut doc = Document::new();
        let button = doc.create("button");
        assert!(!doc.focus(button));
        doc.append(doc.root(), button);
        assert!(doc.focus(button));
        assert_eq!(doc.active_element(), Some(button));
    }

    #[test]
    fn removing_focused_subtree_drops_focus() {
        let (mut doc, container, nodes) = doc_with(&["button"]);
        assert!(doc.focus(nodes[0]));
        doc.remove(container);
        assert!(doc.active_element().is_none());
        assert!(!doc.is_connected(nodes[0]));
    }

    #[test]
    fn removed_ids_go_stale_and_slots_are_reused() {
        let (mut doc, container, nodes) = doc_with(&["button", "span"]);
        let slots = doc.slot_count();
        doc.set_attr(nodes[0], "id", "old");
        doc.remove(container);
        assert_eq!(doc.node_count(), 1);
        assert_eq!(doc.tag(nodes[0]), None);
        assert_eq!(doc.attr(nodes[0], "id"), None);
        assert!(!doc.focus(nodes[0]));

        let fresh: Vec<NodeId> = (0..3).map(|_| doc.create_in(doc.root(), "div")).collect();
        assert_eq!(doc.slot_count(), slots);
        assert!(fresh.iter().all(|n| !nodes.contains(n) && *n != container));
        assert_eq!(doc.tag(fresh[0]), Some("div"));
        // A stale id sharing a slot with a live node still resolves to nothing.
        assert!(doc.children(container).is_empty());
        assert!(!doc.contains(container, fresh[0]));
        doc.remove(nodes[1]);
        assert_eq!(doc.node_count(), 4);
    }

    #[test]
    fn clearing_children_frees_grandchildren() {
        let (mut doc, container, nodes) = doc_with(&["tr", "tr"]);
        for row in &nodes {
            for _ in 0..7 {
                doc.create_in(*row, "td");
            }
        }
        assert_eq!(doc.node_count(), 18);
        doc.clear_children(container);
        assert_eq!(doc.node_count(), 2);
        assert!(doc.children(container).is_empty());
    }

    #[test]
    fn depth_counts_ancestors() {
        let (doc, container, nodes) = doc_with(&["span"]);
        assert_eq!(doc.depth(doc.root()), 0);
        assert_eq!(doc.depth(container), 1);
        assert_eq!(doc.depth(nodes[0]), 2);
    }

    #[test]
    fn text_content_concatenates_descendants() {
        let (mut doc, container, nodes) = doc_with(&["span", "span"]);
        doc.set_text(nodes[0], "Jan");
        doc.set_text(nodes[1], "uary");
        assert_eq!(doc.text_content(container), "January");
    }

    #[test]
    fn element_by_id_finds_connected_nodes() {
        let (mut doc, _, nodes) = doc_with(&["h2"]);
        doc.set_attr(nodes[0], "id", "title");
        assert_eq!(doc.element_by_id("title"), Some(nodes[0]));
        assert_eq!(doc.element_by_id("missing"), None);
    }

    proptest::proptest! {
        #[test]
        fn tabbables_follow_tab_order(indices in proptest::collection::vec(-2i32..4, 0..24)) {
            let mut doc = Document::new();
            let container = doc.create_in(doc.root(), "div");
            let nodes: Vec<NodeId> = indices
                .iter()
                .map(|i| {
                    let n = doc.create_in(container, "div");
                    doc.set_tab_index(n, Some(*i));
                    n
                })
                .collect();

            let order = doc.tabbables(container);
            let expected_len = indices.iter().filter(|i| **i >= 0).count();
            proptest::prop_assert_eq!(order.len(), expected_len);

            let keys: Vec<(bool, i32)> = order
                .iter()
                .map(|n| {
                    let i = doc.tab_index(*n).unwrap_or(0);
                    (i == 0, i)
                })
                .collect();
            let mut sorted = keys.clone();
            sorted.sort();
            proptest::prop_assert_eq!(keys, sorted);

            let zeros: Vec<NodeId> = nodes
                .iter()
                .zip(&indices)
                .filter(|(_, i)| **i == 0)
                .map(|(n, _)| *n)
                .collect();
            let tail: Vec<NodeId> = order[order.len() - zeros.len()..].to_vec();
            proptest::prop_assert_eq!(tail, zeros);
        }
    }

    #[test]
    fn unknown_ids_degrade_gracefully() {
        let mut doc = Document::new();
        let ghost = NodeId::new(999, 0);
        assert!(!doc.focus(ghost));
        assert!(doc.children(ghost).is_empty());
        assert_eq!(doc.attr(ghost, "id"), None);
        assert!(!doc.append(doc.root(), ghost));
    }
}
