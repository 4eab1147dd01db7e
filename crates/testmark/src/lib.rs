// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! testmark library
//!
//! This module exports the command line configuration and the input/output
//! plumbing of the `testmark` binary for use in integration tests.

pub mod augment;
pub mod config;

pub use augment::{CliError, RunOutcome, augment_text, run};
pub use config::{Command, Config, ConfigError};
