// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Configuration for the testmark command line
//!
//! This module provides the command line and environment configuration:
//! which test runner's output to parse, where to read and write it, and
//! logging options.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use testmark_runners::RunnerKind;

/// testmark - mark Python test runner output with editor-friendly error lines
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "testmark")]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Subcommand to run (defaults to parsing stdin)
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Test runner whose output is parsed
    ///
    /// One of pytest (or py.test) and nose (or nosetests).
    #[arg(short, long, env = "TESTMARK_RUNNER", default_value = "pytest")]
    pub runner: RunnerKind,

    /// Enable verbose logging (debug level)
    ///
    /// Logs are written to stderr so they never mix with the marked output.
    #[arg(short, long, default_value = "false")]
    pub verbose: bool,

    /// Quiet mode - suppress info-level logs
    ///
    /// Only errors and warnings will be logged.
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Mark captured runner output
    ///
    /// Example:
    ///   py.test --tb=short 2>&1 | testmark parse
    Parse {
        /// File holding the captured output (defaults to stdin)
        #[arg(short, long, env = "TESTMARK_INPUT")]
        input: Option<PathBuf>,

        /// File to write the marked output to (defaults to stdout)
        #[arg(short, long, env = "TESTMARK_OUTPUT")]
        output: Option<PathBuf>,
    },

    /// Print the command line that launches the selected runner
    #[command(name = "command")]
    ShowCommand,

    /// Launch the selected runner and mark its output
    ///
    /// Arguments after the subcommand are passed to the runner unchanged.
    ///
    /// Example:
    ///   testmark --runner nose run -- tests/test_api.py
    Run {
        /// Extra arguments for the runner
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

impl Config {
    /// Input file of the parse step, `None` for stdin
    #[must_use]
    pub fn input_path(&self) -> Option<&Path> {
        match &self.command {
            Some(Command::Parse { input, .. }) => input.as_deref(),
            _ => None,
        }
    }

    /// Output file of the parse step, `None` for stdout
    #[must_use]
    pub fn output_path(&self) -> Option<&Path> {
        match &self.command {
            Some(Command::Parse { output, .. }) => output.as_deref(),
            _ => None,
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The input path is specified but doesn't exist
    /// - The input path is a directory
    /// - The output path is an existing directory
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(input) = self.input_path() {
            if !input.exists() {
                return Err(ConfigError::InputNotFound(input.to_path_buf()));
            }
            if input.is_dir() {
                return Err(ConfigError::InputIsDirectory(input.to_path_buf()));
            }
        }

        if let Some(output) = self.output_path()
            && output.is_dir()
        {
            return Err(ConfigError::OutputIsDirectory(output.to_path_buf()));
        }

        Ok(())
    }

    /// Get the log level based on verbose/quiet flags
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else if self.quiet {
            tracing::Level::WARN
        } else {
            tracing::Level::INFO
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Input file not found
    #[error("Input file not found: {0}")]
    InputNotFound(PathBuf),

    /// Input path is a directory
    #[error("Input path is a directory: {0}")]
    InputIsDirectory(PathBuf),

    /// Output path is a directory
    #[error("Output path is a directory: {0}")]
    OutputIsDirectory(PathBuf),
}
