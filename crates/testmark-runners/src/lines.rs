// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Line sequences: splitting, grouping and cursor-based consumption

use std::path::Path;

use regex::Regex;

use crate::error::RunnersError;
use crate::pattern::is_match;

/// Split captured output into lines
///
/// Accepts both `\n` and `\r\n` endings; a trailing newline does not yield an
/// extra empty line.
#[must_use]
pub fn to_lines(text: &str) -> Vec<String> {
    text.lines().map(str::to_string).collect()
}

/// Read captured runner output from a file
///
/// # Errors
///
/// Returns `RunnersError::Io` if the file cannot be read or is not UTF-8.
pub fn read_lines(path: &Path) -> Result<Vec<String>, RunnersError> {
    let text = std::fs::read_to_string(path)?;
    Ok(to_lines(&text))
}

/// Whether a line is empty or whitespace only
#[must_use]
pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Group lines into runs that each start at a delimiter line
///
/// The first group always starts with the first line, whether or not it
/// matches. Empty input gives no groups at all.
#[must_use]
pub fn group_lines(lines: &[String], delimiter: &Regex) -> Vec<Vec<String>> {
    let mut groups: Vec<Vec<String>> = Vec::new();
    for line in lines {
        if groups.is_empty() || is_match(delimiter, line) {
            groups.push(Vec::new());
        }
        if let Some(group) = groups.last_mut() {
            group.push(line.clone());
        }
    }
    groups
}

/// Read position over a line sequence
///
/// Sub-parsers take the cursor by `&mut`, consume as many lines as they need
/// (possibly more than one at a time) and leave the rest for the caller.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    lines: &'a [String],
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Start at the first line
    #[must_use]
    pub fn new(lines: &'a [String]) -> Self {
        Self { lines, pos: 0 }
    }

    /// The next line, without consuming it
    #[must_use]
    pub fn peek(&self) -> Option<&'a str> {
        self.lines.get(self.pos).map(String::as_str)
    }

    /// Consume and return the next line
    pub fn advance(&mut self) -> Option<&'a str> {
        let line = self.peek()?;
        self.pos += 1;
        Some(line)
    }

    /// Lines not consumed yet
    #[must_use]
    pub fn remainder(&self) -> &'a [String] {
        &self.lines[self.pos..]
    }

    /// Consume every remaining line and return them
    pub fn finish(&mut self) -> &'a [String] {
        let rest = self.remainder();
        self.pos = self.lines.len();
        rest
    }
}
