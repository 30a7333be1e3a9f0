#![forbid(unsafe_code)]

//! Single-expand accordion (disclosure group).
//!
//! The accordion root owns an arena of [`Item`] records and one
//! [`ExpansionState`]. Headers and panels never hold state of their own:
//! they are views derived from the root by item id.
//!
//! # Invariants
//!
//! 1. At most one item is expanded.
//! 2. A non-collapsible accordion with at least one item always has an
//!    expanded item; toggling the open item is a no-op.
//! 3. A collapsible accordion closes the open item when it is toggled.
//! 4. ARIA ids (`controls`, `labelledby`) are a pure function of the item id.
//!
//! # Example
//!
//! ```
//! use wai_widgets::accordion::{Accordion, AccordionConfig};
//!
//! let mut acc = Accordion::builder(AccordionConfig::default())
//!     .item("a")
//!     .item("b")
//!     .build();
//! assert!(acc.is_open(&"a".into()));
//! acc.toggle(&"b".into());
//! assert!(acc.is_open(&"b".into()));
//! ```

use core::fmt;

use wai_core::{ContextMissingError, Document, Event, KeyCode, NodeId, Role, require};

use crate::stateful::{StateKey, Stateful};
use crate::{Widget, aria_bool, instance_prefix};

/// Identifier of an item, unique within one accordion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "state-persistence",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct ItemId(String);

impl ItemId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Element ids an item's header and panel use to reference each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AriaIds {
    /// Id of the panel; the header's `aria-controls`.
    pub controls: String,
    /// Id of the header button; the panel's `aria-labelledby`.
    pub labelledby: String,
}

impl AriaIds {
    /// Derive both ids from an item id.
    #[must_use]
    pub fn derive(id: &ItemId) -> Self {
        Self {
            controls: format!("{id}-controls"),
            labelledby: format!("{id}-labelledby"),
        }
    }
}

/// An accordion entry, owned by the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: ItemId,
    /// Position in declaration order.
    pub order: usize,
}

impl Item {
    #[must_use]
    pub fn aria_ids(&self) -> AriaIds {
        AriaIds::derive(&self.id)
    }
}

/// Which item, if any, is expanded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpansionState {
    expanded: Option<ItemId>,
    collapsible: bool,
}

impl ExpansionState {
    /// Initial state: `first` expanded.
    #[must_use]
    pub fn new(first: Option<ItemId>, collapsible: bool) -> Self {
        Self {
            expanded: first,
            collapsible,
        }
    }

    /// Next state after toggling `id`.
    #[must_use]
    pub fn toggled(&self, id: &ItemId) -> Self {
        let already_open = self.expanded.as_ref() == Some(id);
        let expanded = match (already_open, self.collapsible) {
            (true, true) => None,
            (true, false) => self.expanded.clone(),
            (false, _) => Some(id.clone()),
        };
        Self {
            expanded,
            collapsible: self.collapsible,
        }
    }

    /// Toggle in place. Returns whether the expanded item changed.
    pub fn toggle(&mut self, id: &ItemId) -> bool {
        let next = self.toggled(id);
        let changed = next != *self;
        *self = next;
        changed
    }

    #[must_use]
    pub fn is_open(&self, id: &ItemId) -> bool {
        self.expanded.as_ref() == Some(id)
    }

    #[must_use]
    pub fn expanded(&self) -> Option<&ItemId> {
        self.expanded.as_ref()
    }

    #[must_use]
    pub fn collapsible(&self) -> bool {
        self.collapsible
    }
}

/// Accordion configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "state-persistence",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct AccordionConfig {
    /// Whether the open item can be closed, leaving none expanded.
    pub collapsible: bool,
}

impl AccordionConfig {
    #[must_use]
    pub fn collapsible(mut self, collapsible: bool) -> Self {
        self.collapsible = collapsible;
        self
    }
}

/// Builder collecting items in declaration order.
#[derive(Debug, Clone)]
pub struct AccordionBuilder {
    config: AccordionConfig,
    explicit: Vec<Option<String>>,
}

impl AccordionBuilder {
    /// Add an item with an explicit id.
    #[must_use]
    pub fn item(mut self, id: impl Into<String>) -> Self {
        self.explicit.push(Some(id.into()));
        self
    }

    /// Add an item whose id is generated from the accordion and its position.
    #[must_use]
    pub fn anonymous_item(mut self) -> Self {
        self.explicit.push(None);
        self
    }

    /// Add an item with an optional explicit id.
    #[must_use]
    pub fn item_opt(mut self, id: Option<String>) -> Self {
        self.explicit.push(id);
        self
    }

    /// Assign ids and open the first item.
    #[must_use]
    pub fn build(self) -> Accordion {
        let prefix = instance_prefix("accordion");
        let mut items: Vec<Item> = Vec::with_capacity(self.explicit.len());
        for (order, explicit) in self.explicit.into_iter().enumerate() {
            let generated = || ItemId(format!("{prefix}-item-{order}"));
            let id = match explicit {
                Some(id) if !id.is_empty() && !items.iter().any(|i| i.id.0 == id) => ItemId(id),
                _ => generated(),
            };
            items.push(Item { id, order });
        }
        let first = items.first().map(|i| i.id.clone());
        #[cfg(feature = "tracing")]
        tracing::debug!(
            items = items.len(),
            collapsible = self.config.collapsible,
            "accordion built"
        );
        Accordion {
            prefix,
            items,
            state: ExpansionState::new(first, self.config.collapsible),
        }
    }
}

/// Accordion root: item arena plus expansion state.
#[derive(Debug, Clone)]
pub struct Accordion {
    prefix: String,
    items: Vec<Item>,
    state: ExpansionState,
}

impl Accordion {
    /// Start building an accordion.
    #[must_use]
    pub fn builder(config: AccordionConfig) -> AccordionBuilder {
        AccordionBuilder {
            config,
            explicit: Vec::new(),
        }
    }

    /// Generated id prefix of this instance.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    #[must_use]
    pub fn state(&self) -> &ExpansionState {
        &self.state
    }

    #[must_use]
    pub fn expanded(&self) -> Option<&ItemId> {
        self.state.expanded()
    }

    #[must_use]
    pub fn is_open(&self, id: &ItemId) -> bool {
        self.state.is_open(id)
    }

    fn find(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|i| i.id == *id)
    }

    /// Toggle `id`. Unknown ids are ignored. Returns whether state changed.
    pub fn toggle(&mut self, id: &ItemId) -> bool {
        if self.find(id).is_none() {
            return false;
        }
        let changed = self.state.toggle(id);
        #[cfg(feature = "tracing")]
        tracing::debug!(
            item = %id,
            changed,
            expanded = ?self.state.expanded().map(ItemId::as_str),
            "accordion toggle"
        );
        changed
    }

    /// Item-scoped view for `id`.
    pub fn item(&self, id: &ItemId) -> Result<ItemHandle<'_>, ContextMissingError> {
        let item = require(self.find(id), Role::AccordionItem)?;
        Ok(ItemHandle {
            item,
            state: &self.state,
        })
    }

    /// Header view for `id`; fails when `id` is not an item of this root.
    pub fn header(&self, id: &ItemId) -> Result<HeaderView, ContextMissingError> {
        require(self.find(id), Role::AccordionHeader)?;
        self.item(id).map(|h| h.header())
    }

    /// Panel view for `id`; fails when `id` is not an item of this root.
    pub fn panel(&self, id: &ItemId) -> Result<PanelView, ContextMissingError> {
        require(self.find(id), Role::AccordionPanel)?;
        self.item(id).map(|h| h.panel())
    }

    /// Handle input aimed at the header button of `id`.
    ///
    /// A click on `header` toggles. Enter or Space toggles only while
    /// `header` holds focus. Returns whether the event was consumed.
    pub fn handle_header_event(
        &mut self,
        id: &ItemId,
        header: NodeId,
        event: &Event,
        doc: &Document,
    ) -> bool {
        let activates = match event {
            Event::Click(target) => *target == header,
            Event::Key(key) => {
                key.is_press()
                    && matches!(key.code, KeyCode::Enter | KeyCode::Space)
                    && doc.active_element() == Some(header)
            }
        };
        if !activates || self.find(id).is_none() {
            return false;
        }
        self.toggle(id);
        true
    }
}

/// Capability-scoped view of one item.
#[derive(Debug, Clone, Copy)]
pub struct ItemHandle<'a> {
    item: &'a Item,
    state: &'a ExpansionState,
}

impl ItemHandle<'_> {
    #[must_use]
    pub fn id(&self) -> &ItemId {
        &self.item.id
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state.is_open(&self.item.id)
    }

    #[must_use]
    pub fn ids(&self) -> AriaIds {
        self.item.aria_ids()
    }

    #[must_use]
    pub fn header(&self) -> HeaderView {
        let ids = self.ids();
        HeaderView {
            id: ids.labelledby,
            controls: ids.controls,
            expanded: self.is_open(),
        }
    }

    #[must_use]
    pub fn panel(&self) -> PanelView {
        let ids = self.ids();
        PanelView {
            id: ids.controls,
            labelledby: ids.labelledby,
            open: self.is_open(),
        }
    }
}

/// Derived attributes of a header button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderView {
    pub id: String,
    pub controls: String,
    pub expanded: bool,
}

impl Widget for HeaderView {
    fn render(&self, node: NodeId, doc: &mut Document) {
        doc.set_attr(node, "id", self.id.as_str());
        doc.set_attr(node, "aria-expanded", aria_bool(self.expanded));
        doc.set_attr(node, "aria-controls", self.controls.as_str());
    }
}

/// Derived attributes of a panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelView {
    pub id: String,
    pub labelledby: String,
    pub open: bool,
}

impl PanelView {
    /// Landmark role, present only while open.
    #[must_use]
    pub fn role(&self) -> Option<&'static str> {
        self.open.then_some("region")
    }
}

impl Widget for PanelView {
    fn render(&self, node: NodeId, doc: &mut Document) {
        doc.set_attr(node, "id", self.id.as_str());
        doc.set_attr_opt(node, "role", self.role());
        doc.set_attr(node, "aria-labelledby", self.labelledby.as_str());
        doc.set_hidden(node, !self.open);
    }
}

/// Persisted accordion state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "state-persistence",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct AccordionPersist {
    pub expanded: Option<ItemId>,
}

impl Stateful for Accordion {
    type State = AccordionPersist;

    fn state_key(&self) -> StateKey {
        StateKey::new("Accordion", self.prefix.as_str())
    }

    fn save_state(&self) -> AccordionPersist {
        AccordionPersist {
            expanded: self.state.expanded().cloned(),
        }
    }

    /// Unknown ids are dropped, and a non-collapsible accordion never
    /// restores to fully closed.
    fn restore_state(&mut self, state: AccordionPersist) {
        match state.expanded {
            Some(id) if self.find(&id).is_some() => {
                self.state.expanded = Some(id);
            }
            None if self.state.collapsible => {
                self.state.expanded = None;
            }
            _ => {}
        }
    }
}
