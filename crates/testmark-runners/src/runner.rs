// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Runner selection
//!
//! Each supported test runner exposes the command that launches it and the
//! parser for its output. [`RunnerKind`] selects one by name.

use std::fmt;
use std::str::FromStr;

use crate::error::RunnersError;
use crate::nose::Nose;
use crate::pytest::Pytest;

/// What every supported test runner provides
pub trait Runner: Send + Sync {
    /// Short name of the runner
    fn name(&self) -> &'static str;

    /// Command line that launches the runner
    fn command(&self) -> &'static str;

    /// Insert marker lines into the runner's captured output
    fn parse(&self, lines: &[String]) -> Vec<String>;
}

/// The supported test runners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RunnerKind {
    /// pytest, the session/sections report layout
    #[default]
    Pytest,
    /// nose, the progress-line report layout
    Nose,
}

impl RunnerKind {
    /// Every supported runner
    #[must_use]
    pub const fn all() -> [Self; 2] {
        [Self::Pytest, Self::Nose]
    }

    /// The runner implementation for this kind
    #[must_use]
    pub fn runner(self) -> &'static dyn Runner {
        match self {
            Self::Pytest => &Pytest,
            Self::Nose => &Nose,
        }
    }

    /// Short name of the runner
    #[must_use]
    pub fn name(self) -> &'static str {
        self.runner().name()
    }

    /// Command line that launches the runner
    #[must_use]
    pub fn command(self) -> &'static str {
        self.runner().command()
    }

    /// Insert marker lines into the runner's captured output
    #[must_use]
    pub fn parse(self, lines: &[String]) -> Vec<String> {
        self.runner().parse(lines)
    }
}

impl fmt::Display for RunnerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RunnerKind {
    type Err = RunnersError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pytest" | "py.test" => Ok(Self::Pytest),
            "nose" | "nosetests" => Ok(Self::Nose),
            _ => Err(RunnersError::UnknownRunner {
                name: s.to_string(),
                expected: Self::all()
                    .iter()
                    .map(|kind| kind.name())
                    .collect::<Vec<_>>()
                    .join(", "),
            }),
        }
    }
}
