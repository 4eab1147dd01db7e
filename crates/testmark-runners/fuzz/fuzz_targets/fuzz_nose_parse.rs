// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Fuzz target for nose report parsing
//!
//! nose output is never trimmed, so every input line must survive, in order.

#![no_main]

use libfuzzer_sys::fuzz_target;

use testmark_runners::lines::to_lines;
use testmark_runners::nose;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let lines = to_lines(input);
        let output = nose::parse_augmented(&lines);
        assert!(output.len() >= lines.len());
        assert!(output.markers() >= output.len() - lines.len());

        let output = output.into_lines();
        let mut rest = output.iter();
        assert!(lines.iter().all(|line| rest.any(|candidate| candidate == line)));
    }
});
