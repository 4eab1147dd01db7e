// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Marker lines understood by the editor's error list
//!
//! A marker has the shape `path:line <error>`. The shape is a compatibility
//! contract with the editor side and must not change, including the literal
//! angle brackets and the single space before `<`.

use std::fmt;

use crate::pattern::Captures;

/// Sentinel used for both halves of an unknown location
pub const UNKNOWN: &str = "Unknown";

/// Error text of the marker emitted for blocks no pattern recognised
pub const UNPARSED_ERROR: &str = "An error was found but could not be parsed. \
     This is probably a missing error pattern. Please post an issue on GitHub.";

/// Build a marker line
///
/// Nothing is validated or escaped: empty strings, `Unknown` and angle
/// brackets inside `error` are all written verbatim.
#[must_use]
pub fn make_marker(file_path: &str, line_no: impl fmt::Display, error: &str) -> String {
    format!("{file_path}:{line_no} <{error}>")
}

/// The marker appended to blocks that could not be parsed
#[must_use]
pub fn fallback_marker() -> String {
    Location::unknown().marker(UNPARSED_ERROR)
}

/// Whether a line is the fallback marker
#[must_use]
pub fn is_fallback_marker(line: &str) -> bool {
    line.strip_prefix(UNKNOWN)
        .and_then(|rest| rest.strip_prefix(':'))
        .and_then(|rest| rest.strip_prefix(UNKNOWN))
        .and_then(|rest| rest.strip_prefix(" <"))
        .and_then(|rest| rest.strip_suffix('>'))
        == Some(UNPARSED_ERROR)
}

/// A source location extracted from runner output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// Path as printed by the runner
    pub file_path: String,
    /// Line number as printed by the runner
    pub line_no: String,
}

impl Location {
    /// Create a location
    #[must_use]
    pub fn new(file_path: impl Into<String>, line_no: impl fmt::Display) -> Self {
        Self {
            file_path: file_path.into(),
            line_no: line_no.to_string(),
        }
    }

    /// The `Unknown:Unknown` location
    #[must_use]
    pub fn unknown() -> Self {
        Self::new(UNKNOWN, UNKNOWN)
    }

    /// Whether this is the `Unknown:Unknown` sentinel
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.file_path == UNKNOWN && self.line_no == UNKNOWN
    }

    /// Build a location from `file_path` and `line_no` capture groups
    #[must_use]
    pub fn from_captures(mut caps: Captures) -> Option<Self> {
        let file_path = caps.remove("file_path")?;
        let line_no = caps.remove("line_no")?;
        Some(Self { file_path, line_no })
    }

    /// Marker line pointing at this location
    #[must_use]
    pub fn marker(&self, error: &str) -> String {
        make_marker(&self.file_path, &self.line_no, error)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file_path, self.line_no)
    }
}

/// Output of a parse: the original lines plus inserted markers
///
/// Lines are only ever appended, so original order is kept. The buffer
/// counts every marker a parser decided on, including markers that were
/// already present in the input (see [`Augmented::mark`]).
#[derive(Debug, Default)]
pub struct Augmented {
    lines: Vec<String>,
    markers: usize,
}

impl Augmented {
    /// Create a buffer sized for `capacity` lines
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            lines: Vec::with_capacity(capacity),
            markers: 0,
        }
    }

    /// Pass an original line through
    pub fn push(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }

    /// Pass a run of original lines through
    pub fn extend(&mut self, lines: &[String]) {
        self.lines.extend_from_slice(lines);
    }

    /// Insert a marker unless the input already carries it
    ///
    /// `next` is the input line that follows the insertion point. When it is
    /// the very same marker (output being parsed a second time) nothing is
    /// inserted, the existing line passes through on its own.
    pub fn mark(&mut self, marker: String, next: Option<&str>) {
        self.markers += 1;
        if next == Some(marker.as_str()) {
            tracing::trace!(%marker, "marker already present");
            return;
        }
        tracing::trace!(%marker, "marker inserted");
        self.lines.push(marker);
    }

    /// Number of markers decided on so far
    #[must_use]
    pub fn markers(&self) -> usize {
        self.markers
    }

    /// Number of lines in the buffer
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the buffer holds no lines
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Append another buffer, keeping its marker count
    pub fn append(&mut self, other: Augmented) {
        self.markers += other.markers;
        self.lines.extend(other.lines);
    }

    /// Finish and return the lines
    #[must_use]
    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}
