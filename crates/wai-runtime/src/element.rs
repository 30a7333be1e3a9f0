#![forbid(unsafe_code)]

//! Declarative widget trees.
//!
//! An [`Element`] describes a host element (tag, attributes, text,
//! children) and, optionally, the widget role it plays. Roles are checked
//! when the tree is mounted: a descendant role that is not nested inside
//! its root fails with [`ContextMissingError`](wai_core::ContextMissingError).
//!
//! ```
//! use wai_runtime::Element;
//! use wai_widgets::AccordionConfig;
//!
//! let tree = Element::accordion(AccordionConfig::default()).child(
//!     Element::accordion_item()
//!         .child(Element::accordion_header().text("Shipping"))
//!         .child(Element::accordion_panel().text("Ships in 3 days")),
//! );
//! assert_eq!(tree.children().len(), 1);
//! ```

use core::fmt;

use chrono::Weekday;
use wai_core::Role;
use wai_widgets::calendar::grid::ColumnHeaderContent;
use wai_widgets::{AccordionConfig, Action, CalendarConfig, CalendarDate, DismissReason};

pub(crate) type ColumnHeaderFn = Box<dyn Fn(Weekday) -> ColumnHeaderContent>;
pub(crate) type CellFn = Box<dyn Fn(CalendarDate) -> String>;
pub(crate) type DismissFn = Box<dyn FnMut(DismissReason)>;
pub(crate) type ClickFn = Box<dyn FnMut()>;

/// Declared dialog behavior. Focus targets are element keys, resolved
/// once the whole tree is mounted.
#[derive(Default)]
pub struct DialogSpec {
    pub(crate) initial_focus: Option<String>,
    pub(crate) restore_focus: Option<String>,
    pub(crate) aria_label: Option<String>,
    pub(crate) closed: bool,
    pub(crate) keep_on_escape: bool,
    pub(crate) keep_on_backdrop: bool,
    pub(crate) on_dismiss: Option<DismissFn>,
}

impl fmt::Debug for DialogSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialogSpec")
            .field("initial_focus", &self.initial_focus)
            .field("restore_focus", &self.restore_focus)
            .field("aria_label", &self.aria_label)
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

impl DialogSpec {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Key of the element focused on activation.
    #[must_use]
    pub fn initial_focus(mut self, key: impl Into<String>) -> Self {
        self.initial_focus = Some(key.into());
        self
    }

    /// Key of the element focused after dismissal.
    #[must_use]
    pub fn restore_focus(mut self, key: impl Into<String>) -> Self {
        self.restore_focus = Some(key.into());
        self
    }

    #[must_use]
    pub fn aria_label(mut self, label: impl Into<String>) -> Self {
        self.aria_label = Some(label.into());
        self
    }

    /// Mount hidden and inactive; open later with `Program::open_dialog`.
    #[must_use]
    pub fn closed(mut self) -> Self {
        self.closed = true;
        self
    }

    #[must_use]
    pub fn close_on_escape(mut self, close: bool) -> Self {
        self.keep_on_escape = !close;
        self
    }

    #[must_use]
    pub fn close_on_backdrop(mut self, close: bool) -> Self {
        self.keep_on_backdrop = !close;
        self
    }

    #[must_use]
    pub fn on_dismiss(mut self, handler: impl FnMut(DismissReason) + 'static) -> Self {
        self.on_dismiss = Some(Box::new(handler));
        self
    }
}

/// Widget role of an element.
pub enum Kind {
    Plain,
    Accordion(AccordionConfig),
    AccordionItem(Option<String>),
    /// Header trigger; the tag of the heading wrapped around it.
    AccordionHeader(String),
    AccordionPanel,
    Calendar(CalendarConfig),
    CalendarHeader,
    CalendarButton(Action),
    CalendarTitle(Option<String>),
    /// A month grid; a standalone grid may carry its own focus date.
    Grid(Option<CalendarDate>),
    ColumnHeader(ColumnHeaderFn),
    GridCell(CellFn),
    Dialog(DialogSpec),
    DialogTitle,
    DialogDescription,
    DialogBackdrop(Option<ClickFn>),
}

impl Kind {
    /// Short name for diagnostics.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Accordion(_) => "accordion",
            Self::AccordionItem(_) => "accordion item",
            Self::AccordionHeader(_) => "accordion header",
            Self::AccordionPanel => "accordion panel",
            Self::Calendar(_) => "calendar",
            Self::CalendarHeader => "calendar header",
            Self::CalendarButton(_) => "calendar button",
            Self::CalendarTitle(_) => "calendar title",
            Self::Grid(_) => "month grid",
            Self::ColumnHeader(_) => "column header",
            Self::GridCell(_) => "grid cell",
            Self::Dialog(_) => "dialog",
            Self::DialogTitle => "dialog title",
            Self::DialogDescription => "dialog description",
            Self::DialogBackdrop(_) => "dialog backdrop",
        }
    }

    /// The descendant role this kind plays, if it needs an ancestor.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        let role = match self {
            Self::AccordionItem(_) => Role::AccordionItem,
            Self::AccordionHeader(_) => Role::AccordionHeader,
            Self::AccordionPanel => Role::AccordionPanel,
            Self::CalendarHeader => Role::CalendarHeader,
            Self::CalendarButton(_) => Role::CalendarButton,
            Self::CalendarTitle(_) => Role::CalendarTitle,
            Self::ColumnHeader(_) => Role::ColumnHeader,
            Self::GridCell(_) => Role::GridCell,
            Self::DialogTitle => Role::DialogTitle,
            Self::DialogDescription => Role::DialogDescription,
            Self::DialogBackdrop(_) => Role::DialogBackdrop,
            Self::Plain
            | Self::Accordion(_)
            | Self::Calendar(_)
            | Self::Grid(_)
            | Self::Dialog(_) => return None,
        };
        Some(role)
    }
}

impl fmt::Debug for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A node of a declarative widget tree.
#[derive(Debug)]
pub struct Element {
    pub(crate) kind: Kind,
    pub(crate) tag: String,
    pub(crate) key: Option<String>,
    pub(crate) attrs: Vec<(String, String)>,
    pub(crate) text: Option<String>,
    pub(crate) tab_index: Option<i32>,
    pub(crate) children: Vec<Element>,
}

impl Element {
    fn with_kind(tag: &str, kind: Kind) -> Self {
        Self {
            kind,
            tag: tag.to_owned(),
            key: None,
            attrs: Vec::new(),
            text: None,
            tab_index: None,
            children: Vec::new(),
        }
    }

    /// A plain host element.
    #[must_use]
    pub fn new(tag: &str) -> Self {
        Self::with_kind(tag, Kind::Plain)
    }

    #[must_use]
    pub fn accordion(config: AccordionConfig) -> Self {
        Self::with_kind("div", Kind::Accordion(config))
    }

    /// An item whose id is generated from its position.
    #[must_use]
    pub fn accordion_item() -> Self {
        Self::with_kind("div", Kind::AccordionItem(None))
    }

    #[must_use]
    pub fn accordion_item_id(id: impl Into<String>) -> Self {
        Self::with_kind("div", Kind::AccordionItem(Some(id.into())))
    }

    /// A header trigger button wrapped in an `h2` heading.
    ///
    /// Key, attributes and text apply to the button.
    #[must_use]
    pub fn accordion_header() -> Self {
        Self::accordion_header_as("h2")
    }

    /// A header trigger wrapped in the heading element `heading`.
    #[must_use]
    pub fn accordion_header_as(heading: &str) -> Self {
        Self::with_kind(
            "button",
            Kind::AccordionHeader(heading.to_ascii_lowercase()),
        )
    }

    #[must_use]
    pub fn accordion_panel() -> Self {
        Self::with_kind("div", Kind::AccordionPanel)
    }

    #[must_use]
    pub fn calendar(config: CalendarConfig) -> Self {
        Self::with_kind("div", Kind::Calendar(config))
    }

    #[must_use]
    pub fn calendar_header() -> Self {
        Self::with_kind("header", Kind::CalendarHeader)
    }

    #[must_use]
    pub fn calendar_button(action: Action) -> Self {
        Self::with_kind("button", Kind::CalendarButton(action))
    }

    /// Title showing the focused month and year.
    #[must_use]
    pub fn calendar_title() -> Self {
        Self::with_kind("h2", Kind::CalendarTitle(None))
    }

    /// Title with fixed text instead of the month and year.
    #[must_use]
    pub fn calendar_title_text(text: impl Into<String>) -> Self {
        Self::with_kind("h2", Kind::CalendarTitle(Some(text.into())))
    }

    /// Month grid following the enclosing calendar, or today when standalone.
    #[must_use]
    pub fn grid() -> Self {
        Self::with_kind("table", Kind::Grid(None))
    }

    /// Month grid focused on `date` when standalone.
    #[must_use]
    pub fn grid_focused(date: CalendarDate) -> Self {
        Self::with_kind("table", Kind::Grid(Some(date)))
    }

    /// Column header slot of a grid.
    #[must_use]
    pub fn column_header(slot: impl Fn(Weekday) -> ColumnHeaderContent + 'static) -> Self {
        Self::with_kind("th", Kind::ColumnHeader(Box::new(slot)))
    }

    /// Cell content slot of a grid.
    #[must_use]
    pub fn grid_cell(slot: impl Fn(CalendarDate) -> String + 'static) -> Self {
        Self::with_kind("td", Kind::GridCell(Box::new(slot)))
    }

    #[must_use]
    pub fn dialog(spec: DialogSpec) -> Self {
        Self::with_kind("div", Kind::Dialog(spec))
    }

    #[must_use]
    pub fn dialog_title() -> Self {
        Self::with_kind("h2", Kind::DialogTitle)
    }

    #[must_use]
    pub fn dialog_description() -> Self {
        Self::with_kind("p", Kind::DialogDescription)
    }

    #[must_use]
    pub fn dialog_backdrop() -> Self {
        Self::with_kind("div", Kind::DialogBackdrop(None))
    }

    /// Backdrop with a click handler run before dismissal.
    #[must_use]
    pub fn dialog_backdrop_with(on_click: impl FnMut() + 'static) -> Self {
        Self::with_kind("div", Kind::DialogBackdrop(Some(Box::new(on_click))))
    }

    /// Name this element so it can be looked up after mounting.
    #[must_use]
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Replace the host tag.
    #[must_use]
    pub fn tag(mut self, tag: &str) -> Self {
        self.tag = tag.to_owned();
        self
    }

    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn tab_index(mut self, index: i32) -> Self {
        self.tab_index = Some(index);
        self
    }

    #[must_use]
    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    #[must_use]
    pub fn children_from(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children.extend(children);
        self
    }

    #[must_use]
    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    #[must_use]
    pub fn children(&self) -> &[Element] {
        &self.children
    }
}
