#![forbid(unsafe_code)]

//! Month grid with a roving tabindex.
//!
//! [`MonthGrid`] is the pure, week-major layout of one month: leading
//! blanks up to the weekday of the 1st, one cell per day, the last row
//! padded with blanks to seven columns. [`RovingGrid`] projects that
//! layout onto a `table` in a [`Document`] and keeps exactly one cell
//! reachable by Tab.
//!
//! # Invariants
//!
//! 1. Every row has exactly 7 cells.
//! 2. Exactly one real cell has `tabindex=0`, and its date is the focus
//!    date. Other real cells have `tabindex=-1`; blanks carry no tabindex.
//! 3. When the focus date changes while focus is inside the grid, focus
//!    follows to the new reachable cell. Otherwise focus never moves.
//! 4. The body is rebuilt only when the displayed month changes.
//!
//! # Failure Modes
//!
//! | Call | Bad input | Behavior |
//! |------|-----------|----------|
//! | `MonthGrid::cell` | date outside the displayed month | `ContextMissingError` |
//! | `MonthGrid::column_weekday` | column ≥ 7 | `ContextMissingError` |
//! | `RovingGrid::sync` | detached table | attributes updated, focus untouched |

use core::fmt;

use ahash::AHashMap;
use chrono::{Datelike, Weekday};
use wai_core::{ContextMissingError, Document, NodeId, Role, require};

use super::{Calendar, CalendarDate, WEEK_START, days_from_week_start};

/// Columns per row.
pub const WEEK_LEN: usize = 7;

/// One row of the grid; `None` marks a blank outside the month.
pub type Week = [Option<CalendarDate>; WEEK_LEN];

/// Week-major layout of the month containing a focus date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    focus: CalendarDate,
    rows: Vec<Week>,
}

impl MonthGrid {
    /// Lay out the month containing `focus`.
    #[must_use]
    pub fn build(focus: CalendarDate) -> Self {
        let first = first_of_month(focus);
        let lead = days_from_week_start(first.weekday()) as usize;
        let days = first
            .iter_days()
            .take_while(|d| d.month() == first.month() && d.year() == first.year());

        let mut rows: Vec<Week> = Vec::with_capacity(6);
        let mut week: Week = [None; WEEK_LEN];
        let mut column = lead;
        for day in days {
            week[column] = Some(day);
            column += 1;
            if column == WEEK_LEN {
                rows.push(week);
                week = [None; WEEK_LEN];
                column = 0;
            }
        }
        if column != 0 {
            rows.push(week);
        }
        Self { focus, rows }
    }

    #[must_use]
    pub fn focus(&self) -> CalendarDate {
        self.focus
    }

    #[must_use]
    pub fn rows(&self) -> &[Week] {
        &self.rows
    }

    /// First real day of the displayed month.
    #[must_use]
    pub fn first_day(&self) -> CalendarDate {
        first_of_month(self.focus)
    }

    /// Last real day of the displayed month.
    #[must_use]
    pub fn last_day(&self) -> CalendarDate {
        self.rows
            .iter()
            .flatten()
            .rev()
            .find_map(|d| *d)
            .unwrap_or(self.focus)
    }

    /// Whether `date` lies in the displayed month.
    #[must_use]
    pub fn same_month(&self, date: CalendarDate) -> bool {
        date.year() == self.focus.year() && date.month() == self.focus.month()
    }

    /// `(row, column)` of `date`, if displayed.
    #[must_use]
    pub fn position_of(&self, date: CalendarDate) -> Option<(usize, usize)> {
        if !self.same_month(date) {
            return None;
        }
        let offset = days_from_week_start(self.first_day().weekday()) as usize;
        let index = offset + date.day0() as usize;
        Some((index / WEEK_LEN, index % WEEK_LEN))
    }

    /// Tabindex of the cell for `date`: `0` for the focus date, `-1` for
    /// other displayed days, `None` for dates not in the grid.
    #[must_use]
    pub fn tab_index(&self, date: CalendarDate) -> Option<i32> {
        if !self.same_month(date) {
            return None;
        }
        Some(if date == self.focus { 0 } else { -1 })
    }

    /// All cells in row-major order, blanks included.
    pub fn cells(&self) -> impl Iterator<Item = GridCell> + '_ {
        self.rows.iter().enumerate().flat_map(move |(row, week)| {
            week.iter().enumerate().map(move |(column, date)| GridCell {
                date: *date,
                row,
                column,
                tab_index: (*date).and_then(|d| self.tab_index(d)),
            })
        })
    }

    /// The cell for `date`; fails when `date` is not part of this grid.
    pub fn cell(&self, date: CalendarDate) -> Result<GridCell, ContextMissingError> {
        let (row, column) = require(self.position_of(date), Role::GridCell)?;
        Ok(GridCell {
            date: Some(date),
            row,
            column,
            tab_index: self.tab_index(date),
        })
    }

    /// Weekday shown in `column`.
    pub fn column_weekday(&self, column: usize) -> Result<Weekday, ContextMissingError> {
        require(
            (column < WEEK_LEN).then(|| column_weekday(column)),
            Role::ColumnHeader,
        )
    }

    /// The same layout moved to `focus`; rows are reused within a month.
    #[must_use]
    pub fn with_focus(&self, focus: CalendarDate) -> Self {
        if self.same_month(focus) {
            Self {
                focus,
                rows: self.rows.clone(),
            }
        } else {
            Self::build(focus)
        }
    }
}

fn first_of_month(date: CalendarDate) -> CalendarDate {
    date.with_day(1).unwrap_or(date)
}

fn column_weekday(column: usize) -> Weekday {
    (0..column).fold(WEEK_START, |wd, _| wd.succ())
}

/// One grid position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCell {
    /// `None` for a blank.
    pub date: Option<CalendarDate>,
    pub row: usize,
    pub column: usize,
    /// `None` means not focusable at all.
    pub tab_index: Option<i32>,
}

impl GridCell {
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.date.is_none()
    }
}

const WEEKDAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Full English weekday name.
#[must_use]
pub fn weekday_name(weekday: Weekday) -> &'static str {
    WEEKDAY_NAMES[weekday.num_days_from_sunday() as usize]
}

/// Two-letter abbreviation, e.g. `Su`.
#[must_use]
pub fn weekday_short(weekday: Weekday) -> &'static str {
    &weekday_name(weekday)[..2]
}

/// Content of one column header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnHeaderContent {
    /// `abbr` attribute.
    pub abbr: String,
    /// Visible text.
    pub text: String,
}

type ColumnHeaderSlot = Box<dyn Fn(Weekday) -> ColumnHeaderContent>;
type CellSlot = Box<dyn Fn(CalendarDate) -> String>;

/// Named content slots of a month grid, resolved when the grid is built.
pub struct GridSlots {
    column_header: ColumnHeaderSlot,
    cell: CellSlot,
}

impl Default for GridSlots {
    fn default() -> Self {
        Self {
            column_header: Box::new(|wd| ColumnHeaderContent {
                abbr: weekday_name(wd).to_owned(),
                text: weekday_short(wd).to_owned(),
            }),
            cell: Box::new(|date| date.format("%d").to_string()),
        }
    }
}

impl fmt::Debug for GridSlots {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridSlots").finish_non_exhaustive()
    }
}

impl GridSlots {
    /// Override column header content.
    #[must_use]
    pub fn column_header(
        mut self,
        slot: impl Fn(Weekday) -> ColumnHeaderContent + 'static,
    ) -> Self {
        self.column_header = Box::new(slot);
        self
    }

    /// Override cell text.
    #[must_use]
    pub fn cell(mut self, slot: impl Fn(CalendarDate) -> String + 'static) -> Self {
        self.cell = Box::new(slot);
        self
    }

    #[must_use]
    pub fn column_header_content(&self, weekday: Weekday) -> ColumnHeaderContent {
        (self.column_header)(weekday)
    }

    #[must_use]
    pub fn cell_text(&self, date: CalendarDate) -> String {
        (self.cell)(date)
    }
}

/// A [`MonthGrid`] projected onto a `table` element.
#[derive(Debug)]
pub struct RovingGrid {
    grid: MonthGrid,
    slots: GridSlots,
    table: NodeId,
    body: NodeId,
    cells: AHashMap<CalendarDate, NodeId>,
    rebuilds: usize,
}

impl RovingGrid {
    /// Build the table under `parent`.
    ///
    /// `labelledby` is the id of the element naming the grid, normally the
    /// calendar title.
    pub fn mount(
        doc: &mut Document,
        parent: NodeId,
        focus: CalendarDate,
        slots: GridSlots,
        labelledby: Option<&str>,
    ) -> Self {
        let grid = MonthGrid::build(focus);
        let table = doc.create_in(parent, "table");
        doc.set_attr(table, "role", "grid");
        doc.set_attr_opt(table, "aria-labelledby", labelledby);

        let head = doc.create_in(table, "thead");
        doc.set_attr(head, "role", "rowgroup");
        let head_row = doc.create_in(head, "tr");
        doc.set_attr(head_row, "role", "row");
        for column in 0..WEEK_LEN {
            let content = slots.column_header_content(column_weekday(column));
            let th = doc.create_in(head_row, "th");
            doc.set_attr(th, "role", "columnheader");
            doc.set_attr(th, "abbr", content.abbr);
            doc.set_text(th, content.text);
        }
        let body = doc.create_in(table, "tbody");

        let mut this = Self {
            grid,
            slots,
            table,
            body,
            cells: AHashMap::new(),
            rebuilds: 0,
        };
        this.build_body(doc);
        this
    }

    /// Mount a grid labelled by, and focused on, `calendar`.
    pub fn for_calendar(
        doc: &mut Document,
        parent: NodeId,
        calendar: &Calendar,
        slots: GridSlots,
    ) -> Self {
        Self::mount(
            doc,
            parent,
            calendar.focus_date(),
            slots,
            Some(calendar.grid_label_id()),
        )
    }

    fn build_body(&mut self, doc: &mut Document) {
        doc.clear_children(self.body);
        self.cells.clear();
        for week in self.grid.rows() {
            let tr = doc.create_in(self.body, "tr");
            doc.set_attr(tr, "role", "row");
            for date in week {
                let td = doc.create_in(tr, "td");
                doc.set_attr(td, "role", "gridcell");
                if let Some(date) = date {
                    doc.set_attr(td, "data-date", date.to_string());
                    doc.set_text(td, self.slots.cell_text(*date));
                    doc.set_tab_index(td, self.grid.tab_index(*date));
                    self.cells.insert(*date, td);
                }
            }
        }
        self.rebuilds += 1;
        #[cfg(feature = "tracing")]
        tracing::debug!(
            month = %self.grid.first_day().format("%Y-%m"),
            rows = self.grid.rows().len(),
            "month grid rebuilt"
        );
    }

    /// Move the roving tabindex to `focus`.
    ///
    /// Returns whether document focus moved to the new cell.
    pub fn sync(&mut self, doc: &mut Document, focus: CalendarDate) -> bool {
        let previous = self.grid.focus();
        if focus == previous {
            return false;
        }
        // Read before the body is torn down, which would drop focus.
        let had_focus = doc.focus_within(self.table);

        let rebuild = !self.grid.same_month(focus);
        self.grid = self.grid.with_focus(focus);
        if rebuild {
            self.build_body(doc);
        } else {
            if let Some(old) = self.cells.get(&previous) {
                doc.set_tab_index(*old, Some(-1));
            }
            if let Some(new) = self.cells.get(&focus) {
                doc.set_tab_index(*new, Some(0));
            }
        }

        let moved = had_focus && self.cell_node(focus).is_some_and(|cell| doc.focus(cell));
        #[cfg(feature = "tracing")]
        tracing::trace!(%previous, %focus, rebuild, moved, "roving tabindex synced");
        moved
    }

    /// Element of the cell showing `date`.
    #[must_use]
    pub fn cell_node(&self, date: CalendarDate) -> Option<NodeId> {
        self.cells.get(&date).copied()
    }

    /// Date shown by a cell element.
    #[must_use]
    pub fn date_at(&self, node: NodeId) -> Option<CalendarDate> {
        self.cells
            .iter()
            .find_map(|(date, cell)| (*cell == node).then_some(*date))
    }

    /// The currently reachable cell.
    #[must_use]
    pub fn active_cell(&self) -> Option<NodeId> {
        self.cell_node(self.grid.focus())
    }

    #[must_use]
    pub fn grid(&self) -> &MonthGrid {
        &self.grid
    }

    #[must_use]
    pub fn table(&self) -> NodeId {
        self.table
    }

    #[must_use]
    pub fn body(&self) -> NodeId {
        self.body
    }

    /// How many times the body has been built.
    #[must_use]
    pub fn rebuild_count(&self) -> usize {
        self.rebuilds
    }
}
