// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Fuzz target for pytest report parsing
//!
//! This fuzzes `pytest::parse`, covering both the sectioned report layout
//! and the bare traceback chain printed when a session cannot start.

#![no_main]

use libfuzzer_sys::fuzz_target;

use testmark_runners::lines::to_lines;
use testmark_runners::pytest;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let lines = to_lines(input);
        let output = pytest::parse(&lines);

        if lines.is_empty() {
            assert!(output.is_empty());
        }
    }
});
