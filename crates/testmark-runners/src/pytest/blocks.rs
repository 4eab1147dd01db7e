// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Error and failure blocks of a pytest report
//!
//! The ERRORS and FAILURES sections are made of blocks opened by a wide
//! underscore banner (`____ test_name ____`). Each block kind has its own
//! report shape, and so its own recognizer.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, trace};

use crate::lines::{Cursor, group_lines};
use crate::marker::{Augmented, Location, fallback_marker, make_marker};
use crate::pattern::{capture, is_match, match_pattern};
use crate::traceback::parse_traceback;

static BLOCK_BANNER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^_{2,} .* _{2,}").expect("Invalid block banner regex"));

static FIXTURE_ERROR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^_+ ERROR at setup of .+ _+").expect("Invalid fixture error banner regex")
});

static CONFTEST_ERROR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^_+ ERROR collecting\s+_+").expect("Invalid collecting error banner regex")
});

static FILE_LOCATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<file_path>\S+):(?P<line_no>\d+)(:| in)\s.*$")
        .expect("Invalid file location regex")
});

static ERROR_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^E\s+(?P<error>.*)$").expect("Invalid error line regex"));

static CONFTEST_IMPORT_FAILURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^E\s+.*ConftestImportFailure: \(local\('(?P<file_path>.*)'\), \((?P<error>.*)\)\)$",
    )
    .expect("Invalid conftest import failure regex")
});

static FIXTURE_NOT_FOUND_LOCATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^file (?P<file_path>.*), line (?P<line_no>.*)$")
        .expect("Invalid fixture location regex")
});

static FIXTURE_NOT_FOUND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s+(?P<error>fixture '.*' not found)$").expect("Invalid fixture error regex")
});

static SCOPE_MISMATCH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^ScopeMismatch: (?P<error>.*)$").expect("Invalid scope mismatch regex")
});

static CAPTURED_STDERR_SETUP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-{2,} Captured stderr setup -{2,}").expect("Invalid stderr setup regex")
});

static CAPTURED_STDERR_CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-{2,} Captured stderr call -{2,}").expect("Invalid stderr call regex")
});

/// Match a `path:line: in func` (or `path:line in func`) location line
#[must_use]
pub fn match_file_location(line: &str) -> Option<Location> {
    Location::from_captures(match_pattern(&FILE_LOCATION, line))
}

/// Extract the message of an `E   <message>` line
#[must_use]
pub fn match_error(line: &str) -> Option<String> {
    capture(&ERROR_LINE, line, "error")
}

/// Extract path and message of a `ConftestImportFailure` line
#[must_use]
pub fn match_conftest_error(line: &str) -> Option<(String, String)> {
    let mut caps = match_pattern(&CONFTEST_IMPORT_FAILURE, line);
    Some((caps.remove("file_path")?, caps.remove("error")?))
}

/// Match the `file <path>, line <n>` line of a "fixture not found" report
#[must_use]
pub fn match_fixture_not_found_location(line: &str) -> Option<Location> {
    Location::from_captures(match_pattern(&FIXTURE_NOT_FOUND_LOCATION, line))
}

/// Extract `fixture '<name>' not found`
#[must_use]
pub fn match_fixture_not_found(line: &str) -> Option<String> {
    capture(&FIXTURE_NOT_FOUND, line, "error")
}

/// Extract the message of a `ScopeMismatch: <message>` line
#[must_use]
pub fn match_scope_mismatch(line: &str) -> Option<String> {
    capture(&SCOPE_MISMATCH, line, "error")
}

/// Join a relative path onto the session root directory
fn resolve_path(root_dir: Option<&str>, file_path: &str) -> String {
    match root_dir {
        Some(root) if !root.is_empty() && !Path::new(file_path).is_absolute() => {
            Path::new(root).join(file_path).to_string_lossy().into_owned()
        }
        _ => file_path.to_string(),
    }
}

/// Parse an `ERROR at setup of <test>` block
///
/// Handles "fixture not found" reports, where the location precedes the
/// message, and `ScopeMismatch` reports, where the location line comes right
/// after the message. Setup-time stderr is handed to the traceback parser.
#[must_use]
pub fn parse_fixture_error(root_dir: Option<&str>, block: &[String]) -> Augmented {
    let mut cursor = Cursor::new(block);
    let mut out = Augmented::with_capacity(block.len() + 1);
    let mut location: Option<Location> = None;

    while let Some(line) = cursor.advance() {
        out.push(line);

        if let Some(found) =
            match_fixture_not_found_location(line).or_else(|| match_file_location(line))
        {
            location = Some(found);
            continue;
        }

        if let Some(error) = match_fixture_not_found(line) {
            let location = location.take().unwrap_or_else(Location::unknown);
            out.mark(location.marker(&error), cursor.peek());
            break;
        }

        if let Some(error) = match_scope_mismatch(line) {
            if let Some(next) = cursor.advance() {
                out.push(next);
                if let Some(found) = match_file_location(next) {
                    let file_path = resolve_path(root_dir, &found.file_path);
                    out.mark(make_marker(&file_path, &found.line_no, &error), cursor.peek());
                }
            }
            break;
        }

        if is_match(&CAPTURED_STDERR_SETUP, line) {
            parse_traceback(&mut cursor, &mut out);
            break;
        }
    }

    out.extend(cursor.finish());
    out
}

/// Parse an `ERROR collecting` block caused by a broken `conftest.py`
///
/// The failure happens at import time, so the marker always points at
/// line 1 of the conftest module.
#[must_use]
pub fn parse_conftest_error(block: &[String]) -> Augmented {
    let mut cursor = Cursor::new(block);
    let mut out = Augmented::with_capacity(block.len() + 1);

    while let Some(line) = cursor.advance() {
        out.push(line);
        if let Some((file_path, error)) = match_conftest_error(line) {
            out.mark(make_marker(&file_path, 1, &error), cursor.peek());
            break;
        }
    }

    out.extend(cursor.finish());
    out
}

/// Parse a generic error block, typically a module failing to collect
///
/// The last location line seen before the first `E` line wins.
#[must_use]
pub fn parse_test_error(block: &[String]) -> Augmented {
    let mut cursor = Cursor::new(block);
    let mut out = Augmented::with_capacity(block.len() + 1);
    let mut location: Option<Location> = None;

    while let Some(line) = cursor.advance() {
        out.push(line);
        if let (Some(error), Some(found)) = (match_error(line), &location) {
            out.mark(found.marker(&error), cursor.peek());
            break;
        }
        if let Some(found) = match_file_location(line) {
            location = Some(found);
        }
    }

    out.extend(cursor.finish());
    out
}

/// Parse a block of the FAILURES section
///
/// The header passes through untouched. After the `E` line is marked, the
/// rest of the block is searched for captured stderr, whose traceback gets a
/// marker of its own.
#[must_use]
pub fn parse_failure(block: &[String]) -> Augmented {
    let mut cursor = Cursor::new(block);
    let mut out = Augmented::with_capacity(block.len() + 2);
    let mut location: Option<Location> = None;

    if let Some(header) = cursor.advance() {
        out.push(header);
    }

    while let Some(line) = cursor.advance() {
        out.push(line);
        if let (Some(error), Some(found)) = (match_error(line), &location) {
            out.mark(found.marker(&error), cursor.peek());
            break;
        }
        if let Some(found) = match_file_location(line) {
            location = Some(found);
        }
    }

    while let Some(line) = cursor.advance() {
        out.push(line);
        if is_match(&CAPTURED_STDERR_CALL, line) {
            parse_traceback(&mut cursor, &mut out);
            break;
        }
    }

    out.extend(cursor.finish());
    out
}

/// Parse one block of the ERRORS section, dispatching on its banner
#[must_use]
pub fn parse_error(root_dir: Option<&str>, block: &[String]) -> Augmented {
    let header = block.first().map_or("", String::as_str);
    let out = if is_match(&FIXTURE_ERROR, header) {
        trace!(%header, "fixture error block");
        parse_fixture_error(root_dir, block)
    } else if is_match(&CONFTEST_ERROR, header) {
        trace!(%header, "conftest error block");
        parse_conftest_error(block)
    } else {
        trace!(%header, "test error block");
        parse_test_error(block)
    };
    with_fallback(block, out)
}

/// Every error block yields a marker: append the fallback when none was found
fn with_fallback(block: &[String], mut out: Augmented) -> Augmented {
    if out.markers() > 0 {
        return out;
    }
    let fallback = fallback_marker();
    debug!(
        header = block.first().map_or("", String::as_str),
        "block not recognised, adding fallback marker"
    );
    out.mark(fallback, block.last().map(String::as_str));
    out
}

/// Parse the ERRORS section: its banner followed by error blocks
#[must_use]
pub fn parse_errors(root_dir: Option<&str>, section: &[String]) -> Augmented {
    parse_section(section, |block| parse_error(root_dir, block))
}

/// Parse the FAILURES section: its banner followed by failure blocks
#[must_use]
pub fn parse_failures(section: &[String]) -> Augmented {
    parse_section(section, |block| with_fallback(block, parse_failure(block)))
}

fn parse_section(section: &[String], parse_block: impl Fn(&[String]) -> Augmented) -> Augmented {
    let mut out = Augmented::with_capacity(section.len() + 4);
    let Some((banner, rest)) = section.split_first() else {
        return out;
    };
    out.push(banner);

    for block in group_lines(rest, &BLOCK_BANNER) {
        out.append(parse_block(block.as_slice()));
    }
    out
}
