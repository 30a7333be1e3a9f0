#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use wai_core::{Event, KeyCode};
use wai_runtime::{DialogSpec, Element, Program};

#[derive(Debug, Arbitrary)]
enum Op {
    Tab,
    ShiftTab,
    Escape,
    FocusInside(u8),
    AddButton,
    RemoveLast,
    DisableFirst,
}

fuzz_target!(|ops: Vec<Op>| {
    let tree = Element::new("main")
        .child(Element::new("button").key("opener"))
        .child(
            Element::dialog(DialogSpec::new().aria_label("fuzz").restore_focus("opener"))
                .key("dialog")
                .child(Element::new("button"))
                .child(Element::new("button")),
        );
    let Ok(mut program) = Program::new(tree) else {
        return;
    };
    let (Some(container), Some(opener)) = (program.node("dialog"), program.node("opener")) else {
        return;
    };

    for op in ops.iter().take(128) {
        let started_inside = program.doc().focus_within(container);
        match op {
            Op::Tab | Op::ShiftTab => {
                let event = match op {
                    Op::Tab => Event::key(KeyCode::Tab),
                    _ => Event::shift_key(KeyCode::Tab),
                };
                let handled = program.dispatch(event);
                let doc = program.doc();
                let sequence = doc.tabbables(container);
                if started_inside && !sequence.is_empty() {
                    let active = doc.active_element();
                    assert!(handled);
                    assert!(
                        active.is_some_and(|a| sequence.contains(&a)),
                        "focus {active:?} left the trap {sequence:?}"
                    );
                }
                if !started_inside {
                    assert!(!handled, "trap consumed tab with focus outside");
                }
            }
            Op::Escape => {
                let handled = program.dispatch(Event::key(KeyCode::Escape));
                assert_eq!(handled, started_inside);
                if started_inside {
                    assert_eq!(program.doc().active_element(), Some(opener));
                }
            }
            Op::FocusInside(pick) => {
                let sequence = program.doc().tabbables(container);
                if !sequence.is_empty() {
                    let target = sequence[usize::from(*pick) % sequence.len()];
                    assert!(program.doc_mut().focus(target));
                }
            }
            Op::AddButton => {
                program.doc_mut().create_in(container, "button");
            }
            Op::RemoveLast => {
                // Keep one child so the trap always has somewhere to land.
                let children = program.doc().children(container).to_vec();
                if children.len() > 1
                    && let Some(last) = children.last()
                {
                    program.doc_mut().remove(*last);
                }
            }
            Op::DisableFirst => {
                if let Some(first) = program.doc().children(container).first().copied() {
                    program.doc_mut().set_disabled(first, true);
                }
            }
        }
    }
});
