//! Fuzzing harness for the level-file parser and value mappers
//!
//! Arbitrary input must never panic.
//! Run with: cargo fuzz run level_file_parser

#![no_main]
use libfuzzer_sys::fuzz_target;
use marquee_config::format::{line_name, split_line};
use marquee_config::{LevelFile, ParamKind};
use marquee_core::{label_cleanup, KeyCode, Rgba, RunChain};

const KINDS: [ParamKind; 15] = [
    ParamKind::Bool,
    ParamKind::Int,
    ParamKind::Float,
    ParamKind::Text,
    ParamKind::Color,
    ParamKind::Key,
    ParamKind::FontStyle,
    ParamKind::TextAlign,
    ParamKind::UseMouse,
    ParamKind::ScreenSaver,
    ParamKind::SmartasdMode,
    ParamKind::FnetSort,
    ParamKind::AutostartMode,
    ParamKind::ListType,
    ParamKind::SortType,
];

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let file = LevelFile::parse(s, |name| name.len() % 3 == 0);
        for line in file.lines() {
            let _ = line_name(line);
            let _ = split_line(line);
        }
        let _ = file.render();

        for kind in KINDS {
            let _ = kind.map(s, "0").to_ini();
            let _ = kind.check(s);
        }
        let _ = Rgba::from_ini(s);
        let _ = KeyCode::from_ini(s);
        let _ = RunChain::parse(s);
        let _ = label_cleanup(s);
    }
});
