// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Error types for testmark-runners

use thiserror::Error;

/// Errors that can occur around runner output parsing
///
/// Parsing itself never fails; these cover runner selection and reading
/// captured output.
#[derive(Debug, Error)]
pub enum RunnersError {
    /// Error reading captured runner output
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// No runner is registered under this name
    #[error("Unknown runner: {name} (expected one of: {expected})")]
    UnknownRunner {
        /// The name that was requested
        name: String,
        /// Comma separated list of supported runner names
        expected: String,
    },
}
