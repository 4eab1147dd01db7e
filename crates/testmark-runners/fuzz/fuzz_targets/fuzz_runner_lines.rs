// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Fuzz target for runner dispatch
//!
//! Builds structured input (runner name plus individual lines) so the fuzzer
//! can reach runner lookup and parsing without first having to find newlines.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use testmark_runners::RunnerKind;

#[derive(Debug, Arbitrary)]
struct RunnerInput {
    runner: String,
    lines: Vec<String>,
}

fuzz_target!(|input: RunnerInput| {
    // Unknown names are an error, never a panic
    let Ok(kind) = input.runner.parse::<RunnerKind>() else {
        return;
    };
    let _ = kind.parse(&input.lines);
});
