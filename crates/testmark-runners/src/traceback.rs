// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Python traceback parsing
//!
//! Both runners fall back on standard Python tracebacks when their own
//! report shapes do not apply:
//!
//! ```text
//! Traceback (most recent call last):
//!   File "/app/dal.py", line 257, in create_user
//!     return self._convert_to_user(user)
//!   File "/app/dal.py", line 236, in _convert_to_user
//!     an_error
//! NameError: name 'an_error' is not defined
//! ```
//!
//! Frames are printed outermost first, so the last frame before the
//! exception line is where the error was raised.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, trace};

use crate::lines::{Cursor, is_blank};
use crate::marker::{Augmented, Location, is_fallback_marker};
use crate::pattern::match_pattern;

static FRAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s+File "(?P<file_path>.+?)", line (?P<line_no>\d+)"#)
        .expect("Invalid traceback frame regex")
});

/// Extract the location from a `File "<path>", line <n>, in <func>` frame
#[must_use]
pub fn match_frame(line: &str) -> Option<Location> {
    Location::from_captures(match_pattern(&FRAME, line))
}

/// Whether a line can end a traceback
///
/// Blank and indented lines never do, and neither does a fallback marker
/// left by an earlier pass.
#[must_use]
pub fn is_terminal(line: &str) -> bool {
    !is_blank(line) && !line.starts_with(char::is_whitespace) && !is_fallback_marker(line)
}

/// Parse a traceback embedded in a larger block
///
/// Consumes lines up to and including the exception line and inserts a
/// marker for the innermost frame right after it. Lines before the first
/// frame pass through. Returns whether a marker was produced; the caller is
/// responsible for the lines left in the cursor.
pub fn parse_traceback(cursor: &mut Cursor<'_>, out: &mut Augmented) -> bool {
    let mut frame: Option<Location> = None;

    while let Some(line) = cursor.advance() {
        out.push(line);
        if let Some(found) = match_frame(line) {
            trace!(location = %found, "traceback frame");
            frame = Some(found);
            continue;
        }
        if !is_terminal(line) {
            continue;
        }
        if let Some(location) = &frame {
            out.mark(location.marker(line), cursor.peek());
            return true;
        }
    }

    false
}

/// Parse lines holding a single embedded traceback
#[must_use]
pub fn parse_traceback_lines(lines: &[String]) -> Vec<String> {
    let mut cursor = Cursor::new(lines);
    let mut out = Augmented::with_capacity(lines.len() + 1);
    parse_traceback(&mut cursor, &mut out);
    out.extend(cursor.finish());
    out.into_lines()
}

/// Parse a chain of blank-line separated tracebacks
///
/// Python prints "During handling of the above exception, another exception
/// occurred" chains oldest first. Only the last traceback is parsed; the
/// earlier ones pass through untouched.
pub fn parse_traceback_chain_into(lines: &[String], out: &mut Augmented) -> bool {
    let start = last_block_start(lines);
    debug!(
        lines = lines.len(),
        skipped = start,
        "parsing last traceback of chain"
    );
    out.extend(&lines[..start]);

    let mut cursor = Cursor::new(&lines[start..]);
    let found = parse_traceback(&mut cursor, out);
    out.extend(cursor.finish());
    found
}

/// Parse a chain of blank-line separated tracebacks into new lines
#[must_use]
pub fn parse_traceback_chain(lines: &[String]) -> Vec<String> {
    let mut out = Augmented::with_capacity(lines.len() + 1);
    parse_traceback_chain_into(lines, &mut out);
    out.into_lines()
}

// Blank lines close the traceback they follow; trailing blank lines stay with
// the last traceback.
fn last_block_start(lines: &[String]) -> usize {
    let Some(last_text) = lines.iter().rposition(|l| !is_blank(l)) else {
        return 0;
    };
    lines[..last_text]
        .iter()
        .rposition(|l| is_blank(l))
        .map_or(0, |blank| blank + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    fn owned(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|l| (*l).to_string()).collect()
    }

    #[test]
    fn test_match_frame() {
        assert_eq!(
            match_frame(r#"  File "/application/dal.py", line 236, in _convert_to_user"#),
            Some(Location::new("/application/dal.py", 236))
        );
        assert_eq!(
            match_frame(r#"  File "/tests/test_something.py", line 2"#),
            Some(Location::new("/tests/test_something.py", 2))
        );
        assert_eq!(match_frame("    an_error"), None);
        assert_eq!(match_frame(r#"File "/no/indent.py", line 1, in f"#), None);
    }

    #[test]
    fn test_parse_traceback_innermost_frame_wins() {
        let input = owned(&[
            "ERROR:tornado.application:Uncaught exception POST /api/signup (127.0.0.1)",
            "Traceback (most recent call last):",
            r#"  File "/venv/lib/python3.4/site-packages/tornado/web.py", line 1332, in _execute"#,
            "    result = method(*self.path_args, **self.path_kwargs)",
            r#"  File "/application/dal.py", line 236, in _convert_to_user"#,
            "    an_error",
            "NameError: name 'an_error' is not defined",
            "ERROR:tornado.access:500 POST /api/signup (127.0.0.1) 4.70ms",
        ]);
        let mut expected = input.clone();
        expected.insert(
            7,
            "/application/dal.py:236 <NameError: name 'an_error' is not defined>".to_string(),
        );
        assert_eq!(parse_traceback_lines(&input), expected);
    }

    #[test]
    fn test_parse_traceback_leaves_remainder_in_cursor() {
        let input = owned(&[
            r#"  File "/a.py", line 3, in f"#,
            "    boom()",
            "RuntimeError: boom",
            "trailing line",
        ]);
        let mut cursor = Cursor::new(&input);
        let mut out = Augmented::default();
        assert!(parse_traceback(&mut cursor, &mut out));
        assert_eq!(cursor.remainder(), &input[3..]);
        assert_eq!(out.markers(), 1);
        assert_eq!(out.into_lines().last().map(String::as_str), Some("/a.py:3 <RuntimeError: boom>"));
    }

    #[test]
    fn test_parse_traceback_without_frames_adds_nothing() {
        let input = owned(&["ERROR: something went wrong", "", "another line"]);
        assert_eq!(parse_traceback_lines(&input), input);
    }

    #[test]
    fn test_parse_traceback_without_terminal_line_adds_nothing() {
        let input = owned(&[r#"  File "/a.py", line 3, in f"#, "    boom()", ""]);
        assert_eq!(parse_traceback_lines(&input), input);
    }

    #[test]
    fn test_parse_traceback_ignores_fallback_marker() {
        let input = owned(&[
            r#"  File "/a.py", line 3, in f"#,
            "    boom()",
            &crate::marker::fallback_marker(),
        ]);
        assert!(!is_terminal(&input[2]));
        assert_eq!(parse_traceback_lines(&input), input);
    }

    #[test]
    fn test_parse_traceback_chain_only_marks_last() {
        let input = owned(&[
            "Traceback (most recent call last):",
            r#"  File "/venv/lib/python3.4/site-packages/_pytest/config.py", line 513, in getconftestmodules"#,
            "    return self._path2confmods[path]",
            "KeyError: local('/tests')",
            "",
            "During handling of the above exception, another exception occurred:",
            "Traceback (most recent call last):",
            r#"  File "/venv/lib/python3.4/site-packages/_pytest/config.py", line 537, in importconftest"#,
            "    return self._conftestpath2mod[conftestpath]",
            "KeyError: local('/tests/conftest.py')",
            "",
            "During handling of the above exception, another exception occurred:",
            "Traceback (most recent call last):",
            r#"  File "/venv/lib/python3.4/site-packages/_pytest/config.py", line 543, in importconftest"#,
            "    mod = conftestpath.pyimport()",
            r#"  File "/venv/lib/python3.4/site-packages/py/_path/local.py", line 650, in pyimport"#,
            "    __import__(modname)",
            r#"  File "/tests/conftest.py", line 1, in <module>"#,
            "    adfasfdasdfasd",
            "NameError: name 'adfasfdasdfasd' is not defined",
            "ERROR: could not load /tests/conftest.py",
        ]);
        let mut expected = input.clone();
        expected.insert(
            20,
            "/tests/conftest.py:1 <NameError: name 'adfasfdasdfasd' is not defined>".to_string(),
        );
        assert_eq!(parse_traceback_chain(&input), expected);
    }

    #[test]
    fn test_parse_traceback_chain_trailing_blank_lines_stay_with_last_block() {
        let input = owned(&[r#"  File "/a.py", line 9, in f"#, "ValueError: bad", "", ""]);
        let mut expected = input.clone();
        expected.insert(2, "/a.py:9 <ValueError: bad>".to_string());
        assert_eq!(parse_traceback_chain(&input), expected);
    }

    #[test]
    fn test_parse_traceback_chain_empty() {
        assert!(parse_traceback_chain(&[]).is_empty());
    }

    #[test]
    fn test_parse_traceback_does_not_duplicate_existing_marker() {
        let input = owned(&[
            r#"  File "/a.py", line 3, in f"#,
            "RuntimeError: boom",
            "/a.py:3 <RuntimeError: boom>",
        ]);
        assert_eq!(parse_traceback_lines(&input), input);
    }
}
