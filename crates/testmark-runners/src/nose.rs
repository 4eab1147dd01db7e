// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! nose report parsing
//!
//! nose prints a line of progress characters (`.`, `E`, `F`) and then one
//! block per error or failure, each opened by a row of `=` and holding a
//! standard Python traceback:
//!
//! ```text
//! FF...E..F.........
//! ======================================================================
//! FAIL: test_false (okbudget.tests.test_authentication.TestAuthentication)
//! ----------------------------------------------------------------------
//! Traceback (most recent call last):
//!   File "/okbudget/tests/test_authentication.py", line 276, in test_false
//!     assert False
//! AssertionError
//! ```
//!
//! The same single pass also understands the older pytest layout, where
//! blocks open with an underscore banner and report `path:line:` locations
//! followed by `E   <message>` lines.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, trace};

use crate::lines::Cursor;
use crate::marker::{Augmented, Location};
use crate::pattern::{capture, is_match, match_pattern};
use crate::runner::Runner;
use crate::traceback::{is_terminal, match_frame, parse_traceback};

/// Command line used to launch nose
pub const COMMAND: &str = "nosetests";

static BLOCK_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(={2,}|_{2,} .* _{2,})").expect("Invalid block header regex")
});

static CAPTURED_STDERR_CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-{2,} Captured stderr call -{2,}").expect("Invalid stderr call regex")
});

static FILE_LOCATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<file_path>\S+):(?P<line_no>\d+):").expect("Invalid file location regex")
});

static ERROR_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^E\s+(?P<error>.*)$").expect("Invalid error line regex"));

/// Parse a nose report and insert markers for every error and failure
#[must_use]
pub fn parse(lines: &[String]) -> Vec<String> {
    parse_augmented(lines).into_lines()
}

/// Same as [`parse`], keeping the marker count
#[must_use]
pub fn parse_augmented(lines: &[String]) -> Augmented {
    let mut cursor = Cursor::new(lines);
    let mut out = Augmented::with_capacity(lines.len() + 8);

    while let Some(line) = cursor.advance() {
        out.push(line);
        if is_match(&BLOCK_HEADER, line) {
            parse_block(&mut cursor, &mut out);
        } else if is_match(&CAPTURED_STDERR_CALL, line) {
            trace!("captured stderr");
            parse_traceback(&mut cursor, &mut out);
        }
    }

    debug!(markers = out.markers(), "nose report parsed");
    out
}

/// Scan one block for its first error
///
/// Stops after the first marker, or in front of the next block header or
/// captured stderr banner, so the outer loop sees those lines itself.
fn parse_block(cursor: &mut Cursor<'_>, out: &mut Augmented) -> bool {
    let mut location: Option<Location> = None;
    let mut frame: Option<Location> = None;

    while let Some(line) = cursor.peek() {
        if is_match(&BLOCK_HEADER, line) || is_match(&CAPTURED_STDERR_CALL, line) {
            break;
        }
        cursor.advance();
        out.push(line);

        if let (Some(error), Some(found)) = (capture(&ERROR_LINE, line, "error"), &location) {
            out.mark(found.marker(&error), cursor.peek());
            return true;
        }
        if let Some(found) = Location::from_captures(match_pattern(&FILE_LOCATION, line)) {
            location = Some(found);
            continue;
        }
        if let Some(found) = match_frame(line) {
            frame = Some(found);
            continue;
        }
        match &frame {
            Some(found) if is_terminal(line) => {
                out.mark(found.marker(line), cursor.peek());
                return true;
            }
            _ => {}
        }
    }

    false
}

/// The nose runner
#[derive(Debug, Clone, Copy, Default)]
pub struct Nose;

impl Runner for Nose {
    fn name(&self) -> &'static str {
        "nose"
    }

    fn command(&self) -> &'static str {
        COMMAND
    }

    fn parse(&self, lines: &[String]) -> Vec<String> {
        parse(lines)
    }
}
