//! Navigation actions and the date-focus reducer.
//!
//! The reducer is pure and total: every `(date, action)` pair maps to a
//! date. Arithmetic that would leave the representable calendar range
//! returns the input unchanged.

use core::fmt;

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};

use super::CalendarDate;

/// First day of the week. Only the Sunday-first convention is supported.
pub const WEEK_START: Weekday = Weekday::Sun;

/// Closed set of calendar navigation actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    PreviousMonth,
    NextMonth,
    PreviousYear,
    NextYear,
    PreviousWeek,
    NextWeek,
    PreviousDay,
    NextDay,
    StartOfWeek,
    EndOfWeek,
}

impl Action {
    /// Every action, in a stable order.
    pub const ALL: [Self; 10] = [
        Self::PreviousMonth,
        Self::NextMonth,
        Self::PreviousYear,
        Self::NextYear,
        Self::PreviousWeek,
        Self::NextWeek,
        Self::PreviousDay,
        Self::NextDay,
        Self::StartOfWeek,
        Self::EndOfWeek,
    ];

    /// Human-readable label, also used as the `aria-label` of action buttons.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::PreviousMonth => "previous month",
            Self::NextMonth => "next month",
            Self::PreviousYear => "previous year",
            Self::NextYear => "next year",
            Self::PreviousWeek => "previous week",
            Self::NextWeek => "next week",
            Self::PreviousDay => "previous day",
            Self::NextDay => "next day",
            Self::StartOfWeek => "start of week",
            Self::EndOfWeek => "end of week",
        }
    }

    /// Parse a label; unknown labels yield `None`.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.label() == label)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// First day of the week containing `date`.
#[must_use]
pub fn start_of_week(date: CalendarDate) -> CalendarDate {
    let offset = days_from_week_start(date.weekday());
    date.checked_sub_days(Days::new(u64::from(offset)))
        .unwrap_or(date)
}

/// Last day of the week containing `date`.
#[must_use]
pub fn end_of_week(date: CalendarDate) -> CalendarDate {
    let offset = 6 - days_from_week_start(date.weekday());
    date.checked_add_days(Days::new(u64::from(offset)))
        .unwrap_or(date)
}

/// Column of `weekday` in a week starting at [`WEEK_START`].
#[must_use]
pub fn days_from_week_start(weekday: Weekday) -> u32 {
    (weekday.num_days_from_sunday() + 7 - WEEK_START.num_days_from_sunday()) % 7
}

/// Apply `action` to `date`.
#[must_use]
pub fn reduce(date: CalendarDate, action: Action) -> CalendarDate {
    let next: Option<NaiveDate> = match action {
        Action::PreviousMonth => date.checked_sub_months(Months::new(1)),
        Action::NextMonth => date.checked_add_months(Months::new(1)),
        Action::PreviousYear => date.checked_sub_months(Months::new(12)),
        Action::NextYear => date.checked_add_months(Months::new(12)),
        Action::PreviousWeek => date.checked_sub_days(Days::new(7)),
        Action::NextWeek => date.checked_add_days(Days::new(7)),
        Action::PreviousDay => date.pred_opt(),
        Action::NextDay => date.succ_opt(),
        Action::StartOfWeek => Some(start_of_week(date)),
        Action::EndOfWeek => Some(end_of_week(date)),
    };
    next.unwrap_or(date)
}

/// Apply an optional action; absence is the identity.
#[must_use]
pub fn reduce_opt(date: CalendarDate, action: Option<Action>) -> CalendarDate {
    action.map_or(date, |a| reduce(date, a))
}
