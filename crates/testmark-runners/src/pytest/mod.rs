// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! pytest report parsing
//!
//! pytest prints a session banner, then optional ERRORS and FAILURES
//! sections and a closing summary banner:
//!
//! ```text
//! ============================= test session starts ==============================
//! rootdir: /project, inifile: setup.cfg
//! ==================================== ERRORS ====================================
//! _________________ ERROR collecting tests/test_something.py _____________________
//! tests/test_something.py:19: in <module>
//!     asdfasdf
//! E   NameError: name 'asdfasdf' is not defined
//! =========================== 1 error in 0.21 seconds ============================
//! ```
//!
//! When pytest cannot even start a session (a broken `conftest.py`, say) it
//! prints bare Python tracebacks instead, which are handled by
//! [`crate::traceback`].

pub mod blocks;
pub mod sections;

use tracing::debug;

use crate::marker::Augmented;
use crate::runner::Runner;
use crate::traceback::parse_traceback_chain_into;

pub use sections::{SectionKind, Sections, parse_root_dir, parse_sections};

/// Command line used to launch pytest with short tracebacks
#[cfg(not(windows))]
pub const COMMAND: &str = "py.test --tb=short";

/// Command line used to launch pytest with short tracebacks
#[cfg(windows)]
pub const COMMAND: &str = "py.test.exe --tb=short";

/// Parse a pytest report and insert markers for every error and failure
#[must_use]
pub fn parse(lines: &[String]) -> Vec<String> {
    parse_augmented(lines).into_lines()
}

/// Same as [`parse`], keeping the marker count
#[must_use]
pub fn parse_augmented(lines: &[String]) -> Augmented {
    let mut out = Augmented::with_capacity(lines.len() + 8);
    let Some(first) = lines.first() else {
        return out;
    };

    if !sections::is_session_start(first) {
        debug!("no session banner, parsing output as a session failure");
        parse_traceback_chain_into(lines, &mut out);
        return out;
    }

    let mut sections = parse_sections(lines);
    let root_dir = sections
        .get(&SectionKind::Session)
        .and_then(|session| parse_root_dir(session));
    debug!(
        sections = ?sections.keys().collect::<Vec<_>>(),
        root_dir = root_dir.as_deref().unwrap_or("<none>"),
        "pytest report classified"
    );

    if let Some(session) = sections.remove(&SectionKind::Session) {
        out.extend(&session);
    }
    if let Some(errors) = sections.remove(&SectionKind::Errors) {
        out.append(blocks::parse_errors(root_dir.as_deref(), &errors));
    }
    if let Some(failures) = sections.remove(&SectionKind::Failures) {
        out.append(blocks::parse_failures(&failures));
    }
    if let Some(summary) = sections.remove(&SectionKind::Summary) {
        out.extend(&summary);
    }

    debug!(markers = out.markers(), "pytest report parsed");
    out
}

/// The pytest runner
#[derive(Debug, Clone, Copy, Default)]
pub struct Pytest;

impl Runner for Pytest {
    fn name(&self) -> &'static str {
        "pytest"
    }

    fn command(&self) -> &'static str {
        COMMAND
    }

    fn parse(&self, lines: &[String]) -> Vec<String> {
        parse(lines)
    }
}
