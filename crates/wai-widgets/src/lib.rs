#![forbid(unsafe_code)]

//! Headless widget behaviors for wai.
//!
//! Each widget owns its interaction state and exposes pure transition
//! functions plus small view values that project ARIA attributes and
//! tabindex onto elements of a [`Document`]:
//!
//! - [`accordion`]: single-expand disclosure group.
//! - [`calendar`]: date-focus reducer, keymap, title and action buttons,
//!   and the roving-tabindex month grid.
//! - [`dialog`]: modal focus trap with escape/backdrop dismissal.
//! - [`stateful`]: opt-in persistence of user-facing widget state.

pub mod accordion;
pub mod calendar;
pub mod dialog;
pub mod stateful;

pub use accordion::{Accordion, AccordionBuilder, AccordionConfig, ExpansionState, Item, ItemId};
pub use calendar::grid::{GridSlots, MonthGrid, RovingGrid};
pub use calendar::{Action, Calendar, CalendarConfig, CalendarDate};
pub use dialog::{Dialog, DialogConfig, DismissReason, FocusTrapState, TrapPhase};

use std::sync::atomic::{AtomicU64, Ordering};

use wai_core::{Document, NodeId};

/// A `Widget` projects derived view state onto an element.
///
/// Projection is idempotent: rendering the same view twice leaves the
/// element unchanged, and it never moves focus.
pub trait Widget {
    /// Write this view's attributes onto `node`.
    fn render(&self, node: NodeId, doc: &mut Document);
}

/// Global counter for generated instance prefixes.
static INSTANCE_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Stable, process-unique prefix for generated element ids.
pub(crate) fn instance_prefix(kind: &str) -> String {
    let n = INSTANCE_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("wai-{kind}-{n}")
}

/// ARIA boolean attribute value.
pub(crate) fn aria_bool(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}
