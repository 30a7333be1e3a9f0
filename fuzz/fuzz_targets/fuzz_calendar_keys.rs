#![no_main]

use arbitrary::Arbitrary;
use chrono::{Days, NaiveDate};
use libfuzzer_sys::fuzz_target;
use wai_core::{Event, KeyCode};
use wai_runtime::{Element, Program};
use wai_widgets::CalendarConfig;

#[derive(Debug, Arbitrary)]
enum Key {
    PageUp,
    PageDown,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    ShiftPageUp,
    ShiftPageDown,
    FocusGrid,
}

#[derive(Debug, Arbitrary)]
struct Input {
    seed_days: u16,
    keys: Vec<Key>,
}

fuzz_target!(|input: Input| {
    let Some(epoch) = NaiveDate::from_ymd_opt(1900, 1, 1) else {
        return;
    };
    let Some(seed) = epoch.checked_add_days(Days::new(u64::from(input.seed_days))) else {
        return;
    };
    let tree = Element::calendar(CalendarConfig::default().initial_focus_date(seed))
        .child(Element::grid().key("grid"));
    let Ok(mut program) = Program::new(tree) else {
        return;
    };

    for key in input.keys.iter().take(64) {
        let event = match key {
            Key::PageUp => Event::key(KeyCode::PageUp),
            Key::PageDown => Event::key(KeyCode::PageDown),
            Key::Up => Event::key(KeyCode::Up),
            Key::Down => Event::key(KeyCode::Down),
            Key::Left => Event::key(KeyCode::Left),
            Key::Right => Event::key(KeyCode::Right),
            Key::Home => Event::key(KeyCode::Home),
            Key::End => Event::key(KeyCode::End),
            Key::ShiftPageUp => Event::shift_key(KeyCode::PageUp),
            Key::ShiftPageDown => Event::shift_key(KeyCode::PageDown),
            Key::FocusGrid => {
                let cal = &program.app().calendars[0];
                if let Some(cell) = cal.grids()[0].cell_node(cal.calendar.focus_date()) {
                    program.doc_mut().focus(cell);
                }
                continue;
            }
        };
        program.dispatch(event);

        let cal = &program.app().calendars[0];
        let focus = cal.calendar.focus_date();
        let grid = &cal.grids()[0];
        let doc = program.doc();
        let reachable: Vec<_> = doc
            .descendants(grid.body())
            .into_iter()
            .filter(|n| doc.tab_index(*n) == Some(0))
            .collect();
        assert_eq!(reachable.len(), 1, "exactly one reachable cell");
        assert_eq!(grid.date_at(reachable[0]), Some(focus));
    }
});
