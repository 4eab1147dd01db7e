// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! testmark-runners: Test runner output parsing for testmark
//!
//! This library crate scans the captured output of a Python test runner and
//! inserts a `path:line <error>` marker line after every error or failure it
//! recognises, so an editor's error list can jump straight to the source.
//! Every original line is kept, in order.
//!
//! # Example
//!
//! ```
//! use testmark_runners::{RunnerKind, lines::to_lines};
//!
//! let output = "\
//! ============================= test session starts ==============================
//! =================================== FAILURES ===================================
//! _________________________________ test_myfunc __________________________________
//! tests/test_assertion.py:283: in test_assert_false
//! E   assert False";
//!
//! let augmented = RunnerKind::Pytest.parse(&to_lines(output));
//! assert_eq!(augmented.last().unwrap(), "tests/test_assertion.py:283 <assert False>");
//! ```

pub mod error;
pub mod lines;
pub mod marker;
pub mod nose;
pub mod pattern;
pub mod pytest;
pub mod runner;
pub mod traceback;

pub use error::RunnersError;
pub use lines::{Cursor, group_lines};
pub use marker::{Location, fallback_marker, make_marker};
pub use pattern::match_pattern;
pub use runner::{Runner, RunnerKind};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::RunnersError;
    pub use crate::lines::to_lines;
    pub use crate::marker::{Location, make_marker};
    pub use crate::runner::{Runner, RunnerKind};
}
