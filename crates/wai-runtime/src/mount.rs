#![forbid(unsafe_code)]

//! Mounting declarative trees into a [`Document`].
//!
//! Mounting walks the tree once, passing the enclosing roots down as an
//! explicit context value. Each descendant role checks its ancestor at
//! construction; a missing ancestor aborts the mount with
//! [`ContextMissingError`].
//!
//! # Invariants
//!
//! - Accordion item ids are assigned in declaration order before any
//!   header or panel is projected.
//! - A grid resolves its column-header and cell slots from its direct
//!   children; the first slot of each kind wins.
//! - Dialog backdrops are mounted as the container's preceding sibling,
//!   outside the trap.
//! - Dialog focus targets are resolved by key after the whole tree exists,
//!   then open dialogs are activated in declaration order.

use ahash::AHashMap;
use wai_core::{ContextMissingError, Document, FocusScopes, NodeId, Role, require};
use wai_widgets::calendar::grid::RovingGrid;
use wai_widgets::calendar::today;
use wai_widgets::stateful::Stateful;
use wai_widgets::{
    Accordion, AccordionConfig, Action, Calendar, Dialog, DialogConfig, GridSlots, ItemId, Widget,
};

use crate::element::{CellFn, ClickFn, ColumnHeaderFn, DialogSpec, Element, Kind};

/// An accordion and the elements projecting it.
#[derive(Debug)]
pub struct AccordionMount {
    pub accordion: Accordion,
    pub root: NodeId,
    headers: Vec<(ItemId, NodeId)>,
    panels: Vec<(ItemId, NodeId)>,
}

impl AccordionMount {
    #[must_use]
    pub fn header_node(&self, id: &ItemId) -> Option<NodeId> {
        lookup(&self.headers, id)
    }

    #[must_use]
    pub fn panel_node(&self, id: &ItemId) -> Option<NodeId> {
        lookup(&self.panels, id)
    }

    pub(crate) fn headers(&self) -> &[(ItemId, NodeId)] {
        &self.headers
    }

    fn project(&self, doc: &mut Document) {
        for (id, node) in &self.headers {
            if let Ok(view) = self.accordion.header(id) {
                view.render(*node, doc);
            }
        }
        for (id, node) in &self.panels {
            if let Ok(view) = self.accordion.panel(id) {
                view.render(*node, doc);
            }
        }
    }
}

fn lookup(pairs: &[(ItemId, NodeId)], id: &ItemId) -> Option<NodeId> {
    pairs.iter().find(|(i, _)| i == id).map(|(_, n)| *n)
}

/// A calendar and the elements projecting it.
#[derive(Debug)]
pub struct CalendarMount {
    pub calendar: Calendar,
    pub root: NodeId,
    titles: Vec<(NodeId, Option<String>)>,
    buttons: Vec<(Action, NodeId)>,
    grids: Vec<RovingGrid>,
}

impl CalendarMount {
    #[must_use]
    pub fn button_node(&self, action: Action) -> Option<NodeId> {
        self.buttons
            .iter()
            .find(|(a, _)| *a == action)
            .map(|(_, n)| *n)
    }

    #[must_use]
    pub fn grids(&self) -> &[RovingGrid] {
        &self.grids
    }

    #[must_use]
    pub fn title_nodes(&self) -> Vec<NodeId> {
        self.titles.iter().map(|(n, _)| *n).collect()
    }

    pub(crate) fn buttons(&self) -> &[(Action, NodeId)] {
        &self.buttons
    }

    fn project(&mut self, doc: &mut Document) {
        for (node, custom) in &self.titles {
            let mut view = self.calendar.title();
            if let Some(text) = custom {
                view = view.with_text(text.as_str());
            }
            view.render(*node, doc);
        }
        for (action, node) in &self.buttons {
            self.calendar.button(*action).render(*node, doc);
        }
        let focus = self.calendar.focus_date();
        for grid in &mut self.grids {
            grid.sync(doc, focus);
        }
    }
}

/// A dialog and the elements projecting it.
#[derive(Debug)]
pub struct DialogMount {
    pub dialog: Dialog,
    pub backdrop: NodeId,
    titles: Vec<NodeId>,
    descriptions: Vec<NodeId>,
}

impl DialogMount {
    #[must_use]
    pub fn container(&self) -> NodeId {
        self.dialog.container()
    }

    /// Show and activate the trap.
    pub fn open(&mut self, doc: &mut Document, scopes: &FocusScopes) -> bool {
        doc.set_hidden(self.backdrop, false);
        doc.set_hidden(self.dialog.container(), false);
        let opened = self.dialog.activate(doc, scopes);
        self.project(doc);
        opened
    }

    /// Deactivate the trap and hide the dialog.
    pub fn close(&mut self, doc: &mut Document) -> bool {
        let closed = self.dialog.deactivate();
        doc.set_hidden(self.backdrop, true);
        doc.set_hidden(self.dialog.container(), true);
        closed
    }

    fn project(&self, doc: &mut Document) {
        self.dialog.view().render(self.dialog.container(), doc);
        for node in &self.titles {
            if let Ok(view) = self.dialog.title() {
                view.render(*node, doc);
            }
        }
        for node in &self.descriptions {
            if let Ok(view) = self.dialog.description() {
                view.render(*node, doc);
            }
        }
    }
}

/// Every widget instance created by one mount.
#[derive(Debug, Default)]
pub struct Mounted {
    pub accordions: Vec<AccordionMount>,
    pub calendars: Vec<CalendarMount>,
    /// Grids outside any calendar.
    pub grids: Vec<RovingGrid>,
    pub dialogs: Vec<DialogMount>,
    keys: AHashMap<String, NodeId>,
}

impl Mounted {
    /// Element registered under `key`.
    #[must_use]
    pub fn node(&self, key: &str) -> Option<NodeId> {
        self.keys.get(key).copied()
    }

    /// Re-project every widget's derived attributes.
    pub fn project(&mut self, doc: &mut Document) {
        for acc in &self.accordions {
            acc.project(doc);
        }
        for cal in &mut self.calendars {
            cal.project(doc);
        }
        for dialog in &self.dialogs {
            dialog.project(doc);
        }
    }

    /// Saved state of every accordion and calendar, keyed canonically.
    #[must_use]
    pub fn state_keys(&self) -> Vec<String> {
        let accordions = self.accordions.iter().map(|a| a.accordion.state_key());
        let calendars = self.calendars.iter().map(|c| c.calendar.state_key());
        accordions.chain(calendars).map(|k| k.canonical()).collect()
    }
}

/// Enclosing roots visible to a descendant.
#[derive(Debug, Clone, Copy, Default)]
struct Ctx {
    /// Index into the pending-accordion stack.
    accordion: Option<usize>,
    /// Order of the enclosing item within that accordion.
    item: Option<usize>,
    calendar: Option<usize>,
    grid: bool,
    /// Index into the pending-dialog list.
    dialog: Option<usize>,
}

#[derive(Debug)]
struct PendingAccordion {
    config: AccordionConfig,
    root: NodeId,
    items: Vec<Option<String>>,
    headers: Vec<(usize, NodeId)>,
    panels: Vec<(usize, NodeId)>,
}

struct PendingDialog {
    spec: DialogSpec,
    container: NodeId,
    backdrop: NodeId,
    on_backdrop_click: Option<ClickFn>,
    titles: Vec<NodeId>,
    descriptions: Vec<NodeId>,
}

struct Mounter<'a> {
    doc: &'a mut Document,
    scopes: &'a FocusScopes,
    out: Mounted,
    accordions: Vec<PendingAccordion>,
    dialogs: Vec<PendingDialog>,
}

/// Mount `element` as the last child of `parent`.
pub fn mount(
    doc: &mut Document,
    scopes: &FocusScopes,
    parent: NodeId,
    element: Element,
) -> Result<Mounted, ContextMissingError> {
    #[cfg(feature = "tracing")]
    let _span = tracing::debug_span!("mount").entered();

    let mut mounter = Mounter {
        doc,
        scopes,
        out: Mounted::default(),
        accordions: Vec::new(),
        dialogs: Vec::new(),
    };
    let before = mounter.doc.children(parent).len();
    match mounter.element(parent, element, Ctx::default()) {
        Ok(()) => mounter.finish(),
        Err(err) => {
            mounter.discard(parent, before);
            Err(err)
        }
    }
}

impl Mounter<'_> {
    /// Remove everything appended under `parent` past its first `keep`
    /// children. Scope guards go with `self.out`.
    fn discard(self, parent: NodeId, keep: usize) {
        let added = self
            .doc
            .children(parent)
            .get(keep..)
            .map(<[NodeId]>::to_vec)
            .unwrap_or_default();
        #[cfg(feature = "tracing")]
        tracing::debug!(nodes = added.len(), "partial mount discarded");
        for node in added {
            self.doc.remove(node);
        }
    }

    fn create(&mut self, parent: NodeId, el: &mut Element) -> NodeId {
        let node = self.doc.create_in(parent, &el.tag);
        for (name, value) in el.attrs.drain(..) {
            self.doc.set_attr(node, &name, value);
        }
        if let Some(text) = el.text.take() {
            self.doc.set_text(node, text);
        }
        if el.tab_index.is_some() {
            self.doc.set_tab_index(node, el.tab_index);
        }
        if let Some(key) = el.key.take() {
            self.out.keys.insert(key, node);
        }
        node
    }

    fn children(
        &mut self,
        node: NodeId,
        children: Vec<Element>,
        ctx: Ctx,
    ) -> Result<(), ContextMissingError> {
        for child in children {
            self.element(node, child, ctx)?;
        }
        Ok(())
    }

    fn element(
        &mut self,
        parent: NodeId,
        mut el: Element,
        ctx: Ctx,
    ) -> Result<(), ContextMissingError> {
        if let Some(role) = el.kind.role() {
            check(role, ctx)?;
        }
        let kind = std::mem::replace(&mut el.kind, Kind::Plain);
        let children = std::mem::take(&mut el.children);

        match kind {
            Kind::Plain | Kind::CalendarHeader => {
                let node = self.create(parent, &mut el);
                self.children(node, children, ctx)
            }
            Kind::Accordion(config) => {
                let root = self.create(parent, &mut el);
                self.accordions.push(PendingAccordion {
                    config,
                    root,
                    items: Vec::new(),
                    headers: Vec::new(),
                    panels: Vec::new(),
                });
                let inner = Ctx {
                    accordion: Some(self.accordions.len() - 1),
                    item: None,
                    ..ctx
                };
                self.children(root, children, inner)?;
                self.finish_accordion();
                Ok(())
            }
            Kind::AccordionItem(id) => {
                let node = self.create(parent, &mut el);
                let acc = require(ctx.accordion, Role::AccordionItem)?;
                let pending = &mut self.accordions[acc];
                pending.items.push(id);
                let inner = Ctx {
                    item: Some(pending.items.len() - 1),
                    ..ctx
                };
                self.children(node, children, inner)
            }
            Kind::AccordionHeader(heading) => {
                let acc = require(ctx.accordion, Role::AccordionHeader)?;
                let item = require(ctx.item, Role::AccordionHeader)?;
                let wrapper = self.doc.create_in(parent, &heading);
                let node = self.create(wrapper, &mut el);
                self.doc.set_attr(node, "type", "button");
                self.accordions[acc].headers.push((item, node));
                self.children(node, children, ctx)
            }
            Kind::AccordionPanel => {
                let node = self.create(parent, &mut el);
                let acc = require(ctx.accordion, Role::AccordionPanel)?;
                let item = require(ctx.item, Role::AccordionPanel)?;
                self.accordions[acc].panels.push((item, node));
                self.children(node, children, ctx)
            }
            Kind::Calendar(config) => {
                let root = self.create(parent, &mut el);
                let mut calendar = Calendar::new(config);
                calendar.mount(root, self.scopes);
                self.out.calendars.push(CalendarMount {
                    calendar,
                    root,
                    titles: Vec::new(),
                    buttons: Vec::new(),
                    grids: Vec::new(),
                });
                let inner = Ctx {
                    calendar: Some(self.out.calendars.len() - 1),
                    ..ctx
                };
                self.children(root, children, inner)
            }
            Kind::CalendarButton(action) => {
                let node = self.create(parent, &mut el);
                let cal = require(ctx.calendar, Role::CalendarButton)?;
                self.out.calendars[cal].buttons.push((action, node));
                self.children(node, children, ctx)
            }
            Kind::CalendarTitle(custom) => {
                let node = self.create(parent, &mut el);
                let cal = require(ctx.calendar, Role::CalendarTitle)?;
                self.out.calendars[cal].titles.push((node, custom));
                self.children(node, children, ctx)
            }
            Kind::Grid(focus) => self.grid(parent, el, focus, children, ctx),
            // Slots reached here are not direct children of a grid; the
            // grid already resolved its own.
            Kind::ColumnHeader(_) | Kind::GridCell(_) => Ok(()),
            Kind::Dialog(spec) => self.dialog(parent, el, spec, children, ctx),
            Kind::DialogTitle | Kind::DialogDescription => {
                let is_title = matches!(kind, Kind::DialogTitle);
                let role = if is_title {
                    Role::DialogTitle
                } else {
                    Role::DialogDescription
                };
                let node = self.create(parent, &mut el);
                let index = require(ctx.dialog, role)?;
                let pending = &mut self.dialogs[index];
                if is_title {
                    pending.titles.push(node);
                } else {
                    pending.descriptions.push(node);
                }
                self.children(node, children, ctx)
            }
            // Direct backdrop children are taken by their dialog; any other
            // backdrop cannot reach the dismissal path.
            Kind::DialogBackdrop(_) => Err(ContextMissingError::new(Role::DialogBackdrop)),
        }
    }

    fn grid(
        &mut self,
        parent: NodeId,
        mut el: Element,
        focus: Option<wai_widgets::CalendarDate>,
        children: Vec<Element>,
        ctx: Ctx,
    ) -> Result<(), ContextMissingError> {
        let mut column_header: Option<ColumnHeaderFn> = None;
        let mut cell: Option<CellFn> = None;
        let mut rest = Vec::new();
        for mut child in children {
            if !matches!(child.kind, Kind::ColumnHeader(_) | Kind::GridCell(_)) {
                rest.push(child);
                continue;
            }
            match std::mem::replace(&mut child.kind, Kind::Plain) {
                Kind::ColumnHeader(slot) => {
                    column_header.get_or_insert(slot);
                }
                Kind::GridCell(slot) => {
                    cell.get_or_insert(slot);
                }
                _ => {}
            }
        }
        let mut slots = GridSlots::default();
        if let Some(slot) = column_header {
            slots = slots.column_header(slot);
        }
        if let Some(slot) = cell {
            slots = slots.cell(slot);
        }

        let grid = match ctx.calendar {
            Some(cal) => RovingGrid::for_calendar(
                self.doc,
                parent,
                &self.out.calendars[cal].calendar,
                slots,
            ),
            None => RovingGrid::mount(self.doc, parent, focus.unwrap_or_else(today), slots, None),
        };
        let table = grid.table();
        for (name, value) in el.attrs.drain(..) {
            self.doc.set_attr(table, &name, value);
        }
        if let Some(key) = el.key.take() {
            self.out.keys.insert(key, table);
        }
        match ctx.calendar {
            Some(cal) => self.out.calendars[cal].grids.push(grid),
            None => self.out.grids.push(grid),
        }
        let inner = Ctx { grid: true, ..ctx };
        self.children(table, rest, inner)
    }

    fn dialog(
        &mut self,
        parent: NodeId,
        mut el: Element,
        spec: DialogSpec,
        children: Vec<Element>,
        ctx: Ctx,
    ) -> Result<(), ContextMissingError> {
        let mut backdrop_el: Option<Element> = None;
        let mut rest = Vec::new();
        for child in children {
            if matches!(child.kind, Kind::DialogBackdrop(_)) && backdrop_el.is_none() {
                backdrop_el = Some(child);
            } else {
                rest.push(child);
            }
        }
        let (backdrop, on_backdrop_click) = match backdrop_el {
            Some(mut b) => {
                let click = match std::mem::replace(&mut b.kind, Kind::Plain) {
                    Kind::DialogBackdrop(click) => click,
                    _ => None,
                };
                let grandchildren = std::mem::take(&mut b.children);
                let node = self.create(parent, &mut b);
                self.children(node, grandchildren, ctx)?;
                (node, click)
            }
            None => (self.doc.create_in(parent, "div"), None),
        };
        let container = self.create(parent, &mut el);

        self.dialogs.push(PendingDialog {
            spec,
            container,
            backdrop,
            on_backdrop_click,
            titles: Vec::new(),
            descriptions: Vec::new(),
        });
        let inner = Ctx {
            dialog: Some(self.dialogs.len() - 1),
            ..ctx
        };
        self.children(container, rest, inner)
    }

    fn finish_accordion(&mut self) {
        let Some(pending) = self.accordions.pop() else {
            return;
        };
        let accordion = pending
            .items
            .into_iter()
            .fold(Accordion::builder(pending.config), |b, id| b.item_opt(id))
            .build();
        let id_of = |order: usize| accordion.items().get(order).map(|i| i.id.clone());
        let resolve = |pairs: Vec<(usize, NodeId)>| -> Vec<(ItemId, NodeId)> {
            pairs
                .into_iter()
                .filter_map(|(order, node)| id_of(order).map(|id| (id, node)))
                .collect()
        };
        let headers = resolve(pending.headers);
        let panels = resolve(pending.panels);
        self.out.accordions.push(AccordionMount {
            accordion,
            root: pending.root,
            headers,
            panels,
        });
    }

    fn finish(mut self) -> Result<Mounted, ContextMissingError> {
        for pending in std::mem::take(&mut self.dialogs) {
            let keyed = |key: &Option<String>| key.as_deref().and_then(|k| self.out.node(k));
            let mut config = DialogConfig::default()
                .described(!pending.descriptions.is_empty())
                .close_on_escape(!pending.spec.keep_on_escape)
                .close_on_backdrop(!pending.spec.keep_on_backdrop);
            if let Some(node) = keyed(&pending.spec.initial_focus) {
                config = config.initial_focus(node);
            }
            if let Some(node) = keyed(&pending.spec.restore_focus) {
                config = config.restore_focus(node);
            }
            if let Some(label) = pending.spec.aria_label {
                config = config.aria_label(label);
            }

            let mut dialog = Dialog::new(pending.container, config).backdrop(pending.backdrop);
            if let Some(handler) = pending.spec.on_dismiss {
                dialog = dialog.on_dismiss(handler);
            }
            if let Some(handler) = pending.on_backdrop_click {
                dialog = dialog.on_backdrop_click(handler);
            }
            self.out.dialogs.push(DialogMount {
                dialog,
                backdrop: pending.backdrop,
                titles: pending.titles,
                descriptions: pending.descriptions,
            });
            if let Some(last) = self.out.dialogs.last_mut() {
                if pending.spec.closed {
                    last.close(self.doc);
                } else {
                    last.open(self.doc, self.scopes);
                }
            }
        }
        self.out.project(self.doc);
        #[cfg(feature = "tracing")]
        tracing::debug!(
            accordions = self.out.accordions.len(),
            calendars = self.out.calendars.len(),
            grids = self.out.grids.len(),
            dialogs = self.out.dialogs.len(),
            "tree mounted"
        );
        Ok(self.out)
    }
}

/// Fail unless the ancestor `role` needs is in scope.
fn check(role: Role, ctx: Ctx) -> Result<(), ContextMissingError> {
    let present = match role {
        Role::AccordionItem => ctx.accordion.is_some(),
        Role::AccordionHeader | Role::AccordionPanel => ctx.item.is_some(),
        Role::CalendarHeader | Role::CalendarButton | Role::CalendarTitle => {
            ctx.calendar.is_some()
        }
        Role::ColumnHeader | Role::GridCell => ctx.grid,
        Role::DialogTitle | Role::DialogDescription | Role::DialogBackdrop => {
            ctx.dialog.is_some()
        }
    };
    require(present.then_some(()), role)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use wai_widgets::{AccordionConfig, CalendarConfig};

    fn mount_tree(el: Element) -> Result<(Document, FocusScopes, Mounted), ContextMissingError> {
        let mut doc = Document::new();
        let scopes = FocusScopes::new();
        let root = doc.root();
        let mounted = mount(&mut doc, &scopes, root, el)?;
        Ok((doc, scopes, mounted))
    }

    fn item(id: &str) -> Element {
        Element::accordion_item_id(id)
            .child(Element::accordion_header().key(format!("{id}-header")).text(id))
            .child(Element::accordion_panel().key(format!("{id}-panel")))
    }

    #[test]
    fn header_outside_item_fails() {
        let err = mount_tree(
            Element::accordion(AccordionConfig::default()).child(Element::accordion_header()),
        )
        .unwrap_err();
        assert_eq!(err.role, Role::AccordionHeader);
        assert_eq!(
            err.to_string(),
            "`accordion header` cannot be constructed outside `accordion item`"
        );
    }

    #[test]
    fn roles_outside_their_roots_fail() {
        let cases = [
            (Element::accordion_item(), Role::AccordionItem),
            (Element::calendar_button(Action::NextDay), Role::CalendarButton),
            (Element::calendar_title(), Role::CalendarTitle),
            (Element::calendar_header(), Role::CalendarHeader),
            (Element::grid_cell(|d| d.to_string()), Role::GridCell),
            (Element::dialog_title(), Role::DialogTitle),
            (Element::dialog_backdrop(), Role::DialogBackdrop),
        ];
        for (el, role) in cases {
            let err = mount_tree(Element::new("div").child(el)).unwrap_err();
            assert_eq!(err.role, role);
        }
    }

    #[test]
    fn failed_mount_leaves_document_as_it_was() {
        let config = CalendarConfig::default()
            .initial_focus_date(NaiveDate::from_ymd_opt(1970, 1, 1).unwrap());
        let trees = [
            Element::new("div")
                .child(Element::calendar(config).child(Element::grid()))
                .child(Element::dialog_title()),
            // The backdrop lands beside the container, directly under the parent.
            Element::dialog(DialogSpec::new())
                .child(Element::dialog_backdrop())
                .child(Element::new("button"))
                .child(Element::calendar_title()),
        ];
        for tree in trees {
            let mut doc = Document::new();
            let scopes = FocusScopes::new();
            let root = doc.root();
            let nav = doc.create_in(root, "nav");
            assert!(mount(&mut doc, &scopes, root, tree).is_err());
            assert_eq!(doc.children(root), &[nav]);
            assert_eq!(doc.node_count(), 2);
            assert!(scopes.is_empty());
            assert!(doc.active_element().is_none());
        }
    }

    #[test]
    fn accordion_header_is_wrapped_in_heading() {
        let tree = Element::accordion(AccordionConfig::default())
            .child(item("a"))
            .child(
                Element::accordion_item_id("b")
                    .child(Element::accordion_header_as("H4").key("b-header")),
            );
        let (doc, _, mounted) = mount_tree(tree).unwrap();
        let button = mounted.node("a-header").unwrap();
        let heading = doc.parent(button).unwrap();
        assert_eq!(doc.tag(button), Some("button"));
        assert_eq!(doc.tag(heading), Some("h2"));
        assert_eq!(doc.children(heading), &[button]);
        assert_eq!(doc.attr(heading, "id"), None);
        let b = mounted.node("b-header").unwrap();
        assert_eq!(doc.parent(b).and_then(|h| doc.tag(h)), Some("h4"));
    }

    #[test]
    fn nested_backdrop_fails() {
        let tree = Element::dialog(DialogSpec::new())
            .child(Element::new("div").child(Element::dialog_backdrop()));
        assert_eq!(mount_tree(tree).unwrap_err().role, Role::DialogBackdrop);
    }

    #[test]
    fn accordion_projects_aria() {
        let tree = Element::accordion(AccordionConfig::default())
            .child(item("a"))
            .child(item("b"));
        let (doc, _, mounted) = mount_tree(tree).unwrap();
        let header = mounted.node("a-header").unwrap();
        let panel = mounted.node("a-panel").unwrap();
        assert_eq!(doc.attr(header, "aria-expanded"), Some("true"));
        assert_eq!(doc.attr(header, "aria-controls"), doc.attr(panel, "id"));
        assert_eq!(doc.attr(panel, "role"), Some("region"));
        let b_panel = mounted.node("b-panel").unwrap();
        assert_eq!(doc.attr(b_panel, "role"), None);
        assert_eq!(
            mounted.accordions[0].header_node(&ItemId::from("b")),
            mounted.node("b-header")
        );
    }

    #[test]
    fn generated_item_ids_follow_position() {
        let tree = Element::accordion(AccordionConfig::default())
            .child(Element::accordion_item().child(Element::accordion_header()))
            .child(Element::accordion_item().child(Element::accordion_header()));
        let (_, _, mounted) = mount_tree(tree).unwrap();
        let acc = &mounted.accordions[0].accordion;
        let ids: Vec<_> = acc.items().iter().map(|i| i.id.to_string()).collect();
        assert_eq!(ids[0], format!("{}-item-0", acc.prefix()));
        assert_eq!(ids[1], format!("{}-item-1", acc.prefix()));
    }

    #[test]
    fn calendar_mount_registers_scope_and_projects_title() {
        let config = CalendarConfig::default()
            .initial_focus_date(NaiveDate::from_ymd_opt(1970, 1, 1).unwrap());
        let tree = Element::calendar(config)
            .child(
                Element::calendar_header()
                    .child(Element::calendar_button(Action::PreviousMonth).key("prev"))
                    .child(Element::calendar_title().key("title")),
            )
            .child(Element::grid().key("grid"));
        let (doc, scopes, mounted) = mount_tree(tree).unwrap();
        assert_eq!(scopes.depth(), 1);
        let title = mounted.node("title").unwrap();
        assert_eq!(doc.text(title), "January 1970");
        let grid = mounted.node("grid").unwrap();
        assert_eq!(doc.attr(grid, "aria-labelledby"), doc.attr(title, "id"));
        let prev = mounted.node("prev").unwrap();
        assert_eq!(doc.attr(prev, "aria-label"), Some("previous month"));
    }

    #[test]
    fn grid_slots_come_from_direct_children() {
        let tree = Element::grid_focused(NaiveDate::from_ymd_opt(1970, 1, 1).unwrap())
            .key("grid")
            .child(Element::grid_cell(|d| format!("<{}>", d.format("%e").to_string().trim())));
        let (doc, _, mounted) = mount_tree(tree).unwrap();
        let grid = &mounted.grids[0];
        let cell = grid
            .cell_node(NaiveDate::from_ymd_opt(1970, 1, 9).unwrap())
            .unwrap();
        assert_eq!(doc.text(cell), "<9>");
        assert_eq!(mounted.node("grid"), Some(grid.table()));
    }

    #[test]
    fn dialog_mounts_backdrop_outside_container() {
        let tree = Element::new("main")
            .child(Element::new("button").key("opener"))
            .child(
                Element::dialog(DialogSpec::new().restore_focus("opener"))
                    .key("dialog")
                    .child(Element::dialog_title().key("title"))
                    .child(Element::new("button").key("ok")),
            );
        let (doc, scopes, mounted) = mount_tree(tree).unwrap();
        let dialog = &mounted.dialogs[0];
        let container = mounted.node("dialog").unwrap();
        assert!(!doc.contains(container, dialog.backdrop));
        assert_eq!(doc.active_element(), mounted.node("ok"));
        assert_eq!(scopes.depth(), 1);
        let title = mounted.node("title").unwrap();
        assert_eq!(doc.attr(container, "aria-labelledby"), doc.attr(title, "id"));
        assert_eq!(doc.attr(container, "aria-describedby"), None);
    }

    #[test]
    fn closed_dialog_is_hidden_and_inactive() {
        let tree = Element::dialog(DialogSpec::new().closed())
            .key("dialog")
            .child(Element::dialog_description().key("desc"))
            .child(Element::new("button"));
        let (mut doc, scopes, mut mounted) = mount_tree(tree).unwrap();
        assert!(scopes.is_empty());
        assert!(doc.active_element().is_none());
        assert_eq!(doc.attr(mounted.node("desc").unwrap(), "id"), None);

        assert!(mounted.dialogs[0].open(&mut doc, &scopes));
        let container = mounted.node("dialog").unwrap();
        let desc = mounted.node("desc").unwrap();
        assert_eq!(doc.attr(container, "aria-describedby"), doc.attr(desc, "id"));
        assert!(doc.focus_within(container));
    }

    #[test]
    fn state_keys_are_canonical() {
        let tree = Element::new("div")
            .child(Element::accordion(AccordionConfig::default()).child(item("x")))
            .child(Element::calendar(CalendarConfig::default()));
        let (_, _, mounted) = mount_tree(tree).unwrap();
        let keys = mounted.state_keys();
        assert!(keys[0].starts_with("Accordion::"));
        assert!(keys[1].starts_with("Calendar::"));
    }
}
