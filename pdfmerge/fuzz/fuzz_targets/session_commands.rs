#![no_main]

use libfuzzer_sys::fuzz_target;
use pdfmerge::plan::MergePlan;
use pdfmerge::session::Command;

fuzz_target!(|data: &[u8]| {
    let Ok(script) = std::str::from_utf8(data) else {
        return;
    };

    let mut plan = MergePlan::new();
    plan.replace(["a.pdf", "b.pdf", "c.pdf", "d.pdf"]);

    for line in script.lines() {
        let Ok(Some(command)) = Command::parse(line) else {
            continue;
        };

        // Plan edits must never panic, whatever the entry number or bounds.
        let _ = match command {
            Command::Select(index) => plan.select(index),
            Command::Range { index, from, to } => plan.set_page_range(index, &from, &to),
            Command::ClearRange(index) => plan.clear_page_range(index),
            Command::Up => {
                plan.move_up();
                Ok(())
            }
            Command::Down => {
                plan.move_down();
                Ok(())
            }
            _ => Ok(()),
        };

        assert_eq!(plan.len(), 4);
        assert!(plan.cursor().is_some_and(|cursor| cursor < plan.len()));
        for span in plan.entries().iter().filter_map(|entry| entry.page_range) {
            assert!(span.start >= 1 && span.end >= 1);
        }
    }
});
