//! Keyboard-to-action translation for calendar navigation.
//!
//! | Key | Action |
//! |-----|--------|
//! | PageUp / PageDown | previous / next month |
//! | Shift+PageUp / Shift+PageDown | previous / next year |
//! | ArrowUp / ArrowDown | previous / next week |
//! | ArrowLeft / ArrowRight | previous / next day |
//! | Home / End | start / end of week |
//!
//! Shift only changes the meaning of PageUp/PageDown; other bindings ignore
//! modifiers. Releases never map to an action.

use wai_core::{KeyCode, KeyEvent};

use super::Action;

/// Action bound to `key`, if any.
#[must_use]
pub fn action_for_key(key: &KeyEvent) -> Option<Action> {
    if !key.is_press() {
        return None;
    }
    let action = match (key.code, key.shift()) {
        (KeyCode::PageUp, true) => Action::PreviousYear,
        (KeyCode::PageDown, true) => Action::NextYear,
        (KeyCode::PageUp, false) => Action::PreviousMonth,
        (KeyCode::PageDown, false) => Action::NextMonth,
        (KeyCode::Up, _) => Action::PreviousWeek,
        (KeyCode::Down, _) => Action::NextWeek,
        (KeyCode::Left, _) => Action::PreviousDay,
        (KeyCode::Right, _) => Action::NextDay,
        (KeyCode::Home, _) => Action::StartOfWeek,
        (KeyCode::End, _) => Action::EndOfWeek,
        _ => return None,
    };
    Some(action)
}
