// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Line-shape pattern matching
//!
//! Every recognizer in this crate is a [`Regex`] compiled once into a
//! `LazyLock` static. Matching is anchored at the start of the line but not
//! at its end, so a pattern only has to describe the prefix it cares about.

use std::collections::HashMap;

use regex::Regex;

/// Named groups captured from a line, keyed by group name
pub type Captures = HashMap<String, String>;

/// Match `line` against `pattern` and collect its named groups
///
/// Returns an empty map when the pattern does not match at the start of the
/// line. Groups that did not take part in the match are left out.
#[must_use]
pub fn match_pattern(pattern: &Regex, line: &str) -> Captures {
    let Some(caps) = pattern.captures(line) else {
        return Captures::new();
    };
    if caps.get(0).is_none_or(|m| m.start() != 0) {
        return Captures::new();
    }

    pattern
        .capture_names()
        .flatten()
        .filter_map(|name| {
            caps.name(name)
                .map(|m| (name.to_string(), m.as_str().to_string()))
        })
        .collect()
}

/// Extract a single named group, or `None` when the line does not match
#[must_use]
pub fn capture(pattern: &Regex, line: &str, group: &str) -> Option<String> {
    match_pattern(pattern, line).remove(group)
}

/// Check whether `pattern` matches at the start of `line`
#[must_use]
pub fn is_match(pattern: &Regex, line: &str) -> bool {
    pattern.find(line).is_some_and(|m| m.start() == 0)
}
