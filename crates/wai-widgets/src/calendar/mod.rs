#![forbid(unsafe_code)]

//! Date-picker calendar: focus-date state, navigation, and labelling.
//!
//! A [`Calendar`] owns one focus date and changes it only through
//! [`reduce`]. Key events are translated by [`action_for_key`]; action
//! buttons dispatch their bound [`Action`] on click or Space/Enter.
//! The month grid in [`grid`] derives its cells and roving tabindex from
//! the focus date.
//!
//! The keymap is live while the calendar is mounted: [`Calendar::mount`]
//! registers an ambient focus scope, and the scope is released on
//! [`Calendar::unmount`] or drop.

mod action;
pub mod grid;
mod keymap;

pub use action::{
    Action, WEEK_START, days_from_week_start, end_of_week, reduce, reduce_opt, start_of_week,
};
pub use keymap::action_for_key;

use chrono::NaiveDate;
use wai_core::{Document, Event, FocusScopes, KeyCode, KeyEvent, NodeId, Reach, ScopeGuard, ScopeId};

use crate::stateful::{StateKey, Stateful};
use crate::{Widget, instance_prefix};

/// A Gregorian calendar date.
pub type CalendarDate = NaiveDate;

/// Today in the local time zone.
#[must_use]
pub fn today() -> CalendarDate {
    chrono::Local::now().date_naive()
}

/// Calendar configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "state-persistence",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct CalendarConfig {
    /// Seed for the focus date; defaults to today.
    pub initial_focus_date: Option<CalendarDate>,
}

impl CalendarConfig {
    #[must_use]
    pub fn initial_focus_date(mut self, date: CalendarDate) -> Self {
        self.initial_focus_date = Some(date);
        self
    }
}

/// The calendar's only mutable state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarFocusState {
    pub focus_date: CalendarDate,
}

/// Calendar root widget.
#[derive(Debug)]
pub struct Calendar {
    prefix: String,
    state: CalendarFocusState,
    grid_label_id: String,
    scope: Option<ScopeGuard>,
}

impl Calendar {
    #[must_use]
    pub fn new(config: CalendarConfig) -> Self {
        let prefix = instance_prefix("calendar");
        let grid_label_id = format!("{prefix}-grid-label");
        Self {
            prefix,
            state: CalendarFocusState {
                focus_date: config.initial_focus_date.unwrap_or_else(today),
            },
            grid_label_id,
            scope: None,
        }
    }

    #[must_use]
    pub fn focus_date(&self) -> CalendarDate {
        self.state.focus_date
    }

    #[must_use]
    pub fn state(&self) -> CalendarFocusState {
        self.state
    }

    /// Id shared by the title and the grid's `aria-labelledby`.
    #[must_use]
    pub fn grid_label_id(&self) -> &str {
        &self.grid_label_id
    }

    /// Apply an action (or nothing). Returns whether the focus date changed.
    pub fn dispatch(&mut self, action: impl Into<Option<Action>>) -> bool {
        let action = action.into();
        let before = self.state.focus_date;
        self.state.focus_date = reduce_opt(before, action);
        #[cfg(feature = "tracing")]
        tracing::debug!(
            action = action.map(Action::label),
            from = %before,
            to = %self.state.focus_date,
            "calendar dispatch"
        );
        self.state.focus_date != before
    }

    /// Translate and dispatch a key. Returns the action it mapped to.
    pub fn handle_key(&mut self, key: &KeyEvent) -> Option<Action> {
        let action = action_for_key(key)?;
        self.dispatch(action);
        Some(action)
    }

    /// Handle a routed event. Clicks are ignored here; see
    /// [`Calendar::handle_button_event`].
    pub fn handle_event(&mut self, event: &Event) -> Option<Action> {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Click(_) => None,
        }
    }

    /// Handle input aimed at an action button.
    ///
    /// A click on `button` dispatches `action`; so do Space and Enter while
    /// `button` holds focus.
    pub fn handle_button_event(
        &mut self,
        action: Action,
        button: NodeId,
        event: &Event,
        doc: &Document,
    ) -> bool {
        let activates = match event {
            Event::Click(target) => *target == button,
            Event::Key(key) => {
                key.is_press()
                    && matches!(key.code, KeyCode::Space | KeyCode::Enter)
                    && doc.active_element() == Some(button)
            }
        };
        if activates {
            self.dispatch(action);
        }
        activates
    }

    /// Start listening to the keyboard for the lifetime of the mount.
    pub fn mount(&mut self, container: NodeId, scopes: &FocusScopes) -> ScopeId {
        let guard = scopes.register(container, Reach::Ambient);
        let id = guard.id();
        self.scope = Some(guard);
        id
    }

    /// Stop listening to the keyboard.
    pub fn unmount(&mut self) {
        self.scope = None;
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.scope.is_some()
    }

    #[must_use]
    pub fn scope_id(&self) -> Option<ScopeId> {
        self.scope.as_ref().map(ScopeGuard::id)
    }

    /// Live-region title labelling the grid.
    #[must_use]
    pub fn title(&self) -> TitleView {
        TitleView {
            id: self.grid_label_id.clone(),
            text: month_year_label(self.state.focus_date),
        }
    }

    /// View for a button bound to `action`.
    #[must_use]
    pub fn button(&self, action: Action) -> ButtonView {
        ButtonView { action }
    }
}

/// Default title text, e.g. `January 1970`.
#[must_use]
pub fn month_year_label(date: CalendarDate) -> String {
    date.format("%B %Y").to_string()
}

/// Calendar title attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleView {
    pub id: String,
    pub text: String,
}

impl TitleView {
    /// Replace the default month/year text.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }
}

impl Widget for TitleView {
    fn render(&self, node: NodeId, doc: &mut Document) {
        doc.set_attr(node, "id", self.id.as_str());
        doc.set_attr(node, "aria-live", "polite");
        doc.set_text(node, self.text.as_str());
    }
}

/// Action button attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonView {
    pub action: Action,
}

impl Widget for ButtonView {
    fn render(&self, node: NodeId, doc: &mut Document) {
        doc.set_attr(node, "type", "button");
        doc.set_attr(node, "aria-label", self.action.label());
    }
}

/// Persisted calendar state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "state-persistence",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct CalendarPersist {
    pub focus_date: Option<CalendarDate>,
}

impl Stateful for Calendar {
    type State = CalendarPersist;

    fn state_key(&self) -> StateKey {
        StateKey::new("Calendar", self.prefix.as_str())
    }

    fn save_state(&self) -> CalendarPersist {
        CalendarPersist {
            focus_date: Some(self.state.focus_date),
        }
    }

    fn restore_state(&mut self, state: CalendarPersist) {
        if let Some(date) = state.focus_date {
            self.state.focus_date = date;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wai_core::Modifiers;

    fn d(y: i32, m: u32, day: u32) -> CalendarDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn epoch() -> Calendar {
        Calendar::new(CalendarConfig::default().initial_focus_date(d(1970, 1, 1)))
    }

    #[test]
    fn seeds_from_config() {
        assert_eq!(epoch().focus_date(), d(1970, 1, 1));
    }

    #[test]
    fn seeds_from_today_without_config() {
        let before = today();
        let cal = Calendar::new(CalendarConfig::default());
        let after = today();
        assert!(cal.focus_date() == before || cal.focus_date() == after);
    }

    #[test]
    fn dispatch_reports_change() {
        let mut cal = epoch();
        assert!(cal.dispatch(Action::NextMonth));
        assert_eq!(cal.focus_date(), d(1970, 2, 1));
        assert!(!cal.dispatch(None));
        assert_eq!(cal.focus_date(), d(1970, 2, 1));
    }

    #[test]
    fn keys_drive_the_reducer() {
        let mut cal = epoch();
        let shift_down = KeyEvent::new(KeyCode::PageDown).with_modifiers(Modifiers::SHIFT);
        assert_eq!(cal.handle_key(&shift_down), Some(Action::NextYear));
        assert_eq!(cal.focus_date(), d(1971, 1, 1));
        assert_eq!(cal.handle_event(&Event::key(KeyCode::Tab)), None);
        assert_eq!(cal.focus_date(), d(1971, 1, 1));
    }

    #[test]
    fn title_defaults_to_month_and_year() {
        let mut cal = epoch();
        let title = cal.title();
        assert_eq!(title.text, "January 1970");
        assert_eq!(title.id, cal.grid_label_id());
        cal.dispatch(Action::NextMonth);
        assert_eq!(cal.title().text, "February 1970");
        assert_eq!(cal.title().with_text("custom").text, "custom");
    }

    #[test]
    fn title_renders_live_region() {
        let cal = epoch();
        let mut doc = Document::new();
        let h2 = doc.create_in(doc.root(), "h2");
        cal.title().render(h2, &mut doc);
        assert_eq!(doc.attr(h2, "aria-live"), Some("polite"));
        assert_eq!(doc.text(h2), "January 1970");
        assert_eq!(doc.attr(h2, "id"), Some(cal.grid_label_id()));
    }

    #[test]
    fn buttons_are_labelled_by_action() {
        let cal = epoch();
        let mut doc = Document::new();
        let btn = doc.create_in(doc.root(), "button");
        cal.button(Action::PreviousYear).render(btn, &mut doc);
        assert_eq!(doc.attr(btn, "aria-label"), Some("previous year"));
    }

    #[test]
    fn button_click_and_space_dispatch() {
        let mut cal = epoch();
        let mut doc = Document::new();
        let btn = doc.create_in(doc.root(), "button");

        assert!(cal.handle_button_event(Action::NextMonth, btn, &Event::Click(btn), &doc));
        assert_eq!(cal.focus_date(), d(1970, 2, 1));

        let space = Event::key(KeyCode::Space);
        assert!(!cal.handle_button_event(Action::NextMonth, btn, &space, &doc));
        doc.focus(btn);
        assert!(cal.handle_button_event(Action::NextMonth, btn, &space, &doc));
        assert_eq!(cal.focus_date(), d(1970, 3, 1));
    }

    #[test]
    fn mount_registers_ambient_scope_until_unmount() {
        let mut cal = epoch();
        let mut doc = Document::new();
        let container = doc.create_in(doc.root(), "div");
        let scopes = FocusScopes::new();

        let id = cal.mount(container, &scopes);
        assert!(cal.is_mounted());
        assert_eq!(scopes.owner(&doc), Some(id));

        cal.unmount();
        assert!(!cal.is_mounted());
        assert!(scopes.is_empty());
    }

    #[test]
    fn dropping_a_mounted_calendar_releases_its_scope() {
        let mut doc = Document::new();
        let container = doc.create_in(doc.root(), "div");
        let scopes = FocusScopes::new();
        {
            let mut cal = epoch();
            cal.mount(container, &scopes);
            assert_eq!(scopes.depth(), 1);
        }
        assert!(scopes.is_empty());
    }
}
