// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Section classification for pytest reports
//!
//! A pytest report is a series of `==== <label> ====` banners, each opening a
//! section. Only four sections matter here; anything else (warnings summary,
//! short test summary info, ...) is dropped.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, trace};

use crate::lines::group_lines;
use crate::pattern::{capture, is_match};

static BANNER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^={2,} .* ={2,}").expect("Invalid section banner regex"));

static SESSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^={2,} test session starts ={2,}").expect("Invalid session banner regex")
});

static ERRORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^={2,} ERRORS ={2,}").expect("Invalid errors banner regex"));

static FAILURES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^={2,} FAILURES ={2,}").expect("Invalid failures banner regex"));

// "1 failed in 0.21 seconds" (older pytest) or "1 failed, 2 passed in 0.12s".
static SUMMARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^={2,} .* in [0-9]+(\.[0-9]+)?( seconds|s)\b.*={2,}")
        .expect("Invalid summary banner regex")
});

static ROOTDIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^rootdir: (?P<root>.*?)(, (inifile|configfile): (?P<ini>.*))?$")
        .expect("Invalid rootdir regex")
});

/// The sections of a pytest report this crate understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SectionKind {
    /// `==== test session starts ====` and the collection lines below it
    Session,
    /// `==== ERRORS ====`
    Errors,
    /// `==== FAILURES ====`
    Failures,
    /// The closing `==== 1 failed in 0.21 seconds ====` banner
    Summary,
}

impl SectionKind {
    /// Every kind, in the order headings are tried
    pub const ALL: [Self; 4] = [Self::Session, Self::Errors, Self::Failures, Self::Summary];

    /// Lowercase name of the section
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Session => "session",
            Self::Errors => "errors",
            Self::Failures => "failures",
            Self::Summary => "summary",
        }
    }

    fn heading(self) -> &'static Regex {
        match self {
            Self::Session => &SESSION,
            Self::Errors => &ERRORS,
            Self::Failures => &FAILURES,
            Self::Summary => &SUMMARY,
        }
    }

    /// Classify a banner line; the first kind in [`SectionKind::ALL`] wins
    #[must_use]
    pub fn classify(line: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| is_match(kind.heading(), line))
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Report lines grouped per recognised section
pub type Sections = BTreeMap<SectionKind, Vec<String>>;

/// Whether a line is the `test session starts` banner
#[must_use]
pub fn is_session_start(line: &str) -> bool {
    is_match(&SESSION, line)
}

/// Group a report into its recognised sections
///
/// Lines are split at every `==== ... ====` banner and each group is keyed by
/// the kind of its first line. Groups whose first line is not a recognised
/// heading are dropped.
#[must_use]
pub fn parse_sections(lines: &[String]) -> Sections {
    let mut sections = Sections::new();
    for group in group_lines(lines, &BANNER) {
        let Some(first) = group.first() else {
            continue;
        };
        match SectionKind::classify(first) {
            Some(kind) => {
                trace!(section = %kind, lines = group.len(), "section found");
                sections.insert(kind, group);
            }
            None => debug!(banner = %first, lines = group.len(), "dropping unrecognised section"),
        }
    }
    sections
}

/// Extract the session root directory from the session section
///
/// pytest prints `rootdir: <path>, inifile: <name>` under the session banner
/// (newer versions print `configfile:` or the bare `rootdir: <path>`). An
/// empty root counts as no root.
#[must_use]
pub fn parse_root_dir(session: &[String]) -> Option<String> {
    session
        .iter()
        .find_map(|line| capture(&ROOTDIR, line, "root"))
        .filter(|root| !root.is_empty())
}
