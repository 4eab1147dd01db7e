// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Reading, marking and writing runner output
//!
//! This module drives the runner parsers from the command line: it reads
//! captured output from a file or stdin, or launches the runner itself, and
//! writes the marked lines to a file or stdout.
//!
//! # Example
//!
//! ```
//! use testmark::augment::augment_text;
//! use testmark_runners::RunnerKind;
//!
//! let marked = augment_text(RunnerKind::Nose, "....\nOK\n");
//! assert_eq!(marked, "....\nOK\n");
//! ```

use std::io::{self, Read, Write};
use std::path::Path;
use std::process::Command as Process;

use thiserror::Error;
use tracing::{debug, info, warn};

use testmark_runners::lines::{read_lines, to_lines};
use testmark_runners::{RunnerKind, RunnersError};

use crate::config::{Command, Config, ConfigError};

// ============================================================================
// Error Types
// ============================================================================

/// Command line errors
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Runner error
    #[error("Runner error: {0}")]
    Runners(#[from] RunnersError),

    /// I/O error while reading or writing output
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The runner process could not be started
    #[error("Failed to launch `{program}`: {source}")]
    Spawn {
        /// Program that was launched
        program: String,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// The runner command line split into nothing
    #[error("Runner command is empty or has unbalanced quotes: {0:?}")]
    EmptyCommand(String),
}

// ============================================================================
// Marking
// ============================================================================

/// Join lines back into text, one `\n` after each line
#[must_use]
pub fn render(lines: &[String]) -> String {
    let mut text = String::with_capacity(lines.iter().map(|l| l.len() + 1).sum());
    for line in lines {
        text.push_str(line);
        text.push('\n');
    }
    text
}

/// Mark runner output held in a string
#[must_use]
pub fn augment_text(kind: RunnerKind, text: &str) -> String {
    render(&augment_lines(kind, &to_lines(text)))
}

/// Mark runner output already split into lines
#[must_use]
pub fn augment_lines(kind: RunnerKind, lines: &[String]) -> Vec<String> {
    let marked = kind.parse(lines);
    debug!(
        runner = %kind,
        lines = lines.len(),
        inserted = marked.len().saturating_sub(lines.len()),
        "output marked"
    );
    marked
}

/// Read captured output from a file, or stdin when `input` is `None`
///
/// # Errors
///
/// Returns an error if the input cannot be read or is not UTF-8.
pub fn read_input(input: Option<&Path>) -> Result<Vec<String>, CliError> {
    match input {
        Some(path) => {
            debug!(path = %path.display(), "reading captured output");
            Ok(read_lines(path)?)
        }
        None => {
            debug!("reading captured output from stdin");
            let mut text = String::new();
            io::stdin().lock().read_to_string(&mut text)?;
            Ok(to_lines(&text))
        }
    }
}

/// Write marked lines to a file, or stdout when `output` is `None`
///
/// # Errors
///
/// Returns an error if the output cannot be written.
pub fn write_output(output: Option<&Path>, lines: &[String]) -> Result<(), CliError> {
    let text = render(lines);
    match output {
        Some(path) => {
            debug!(path = %path.display(), "writing marked output");
            std::fs::write(path, text)?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

// ============================================================================
// Launching the runner
// ============================================================================

/// Output and exit status of a finished runner process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    /// Marked stdout lines followed by marked stderr lines
    pub lines: Vec<String>,
    /// Exit code, `None` when the process was killed by a signal
    pub status: Option<i32>,
}

impl RunOutcome {
    /// Exit code to report for this run
    ///
    /// A runner killed by a signal is reported as a plain failure.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        self.status.unwrap_or(1)
    }
}

/// The runner's command line with `args` appended
///
/// # Errors
///
/// Returns [`CliError::EmptyCommand`] if the runner command cannot be split
/// into at least a program name.
pub fn command_line(kind: RunnerKind, args: &[String]) -> Result<Vec<String>, CliError> {
    let command = kind.command();
    let mut argv = shlex::split(command)
        .filter(|words| !words.is_empty())
        .ok_or_else(|| CliError::EmptyCommand(command.to_string()))?;
    argv.extend_from_slice(args);
    Ok(argv)
}

/// Launch `argv` and mark what it prints
///
/// stdout and stderr are captured separately and marked as one report,
/// stdout first.
///
/// # Errors
///
/// Returns an error if `argv` is empty or the process cannot be started.
pub fn run_command(kind: RunnerKind, argv: &[String]) -> Result<RunOutcome, CliError> {
    let Some((program, args)) = argv.split_first() else {
        return Err(CliError::EmptyCommand(String::new()));
    };

    info!(%program, args = ?args, "launching test runner");
    let output = Process::new(program)
        .args(args)
        .output()
        .map_err(|source| CliError::Spawn {
            program: program.clone(),
            source,
        })?;

    let mut lines = to_lines(&String::from_utf8_lossy(&output.stdout));
    lines.extend(to_lines(&String::from_utf8_lossy(&output.stderr)));

    let status = output.status.code();
    if status.is_none() {
        warn!(%program, "test runner terminated by a signal");
    }
    debug!(%program, ?status, "test runner finished");

    Ok(RunOutcome {
        lines: augment_lines(kind, &lines),
        status,
    })
}

/// Launch the selected runner with extra arguments and mark its output
///
/// # Errors
///
/// Returns an error if the runner cannot be launched.
pub fn run_runner(kind: RunnerKind, args: &[String]) -> Result<RunOutcome, CliError> {
    let argv = command_line(kind, args)?;
    run_command(kind, &argv)
}

// ============================================================================
// Entry point
// ============================================================================

/// Execute the configured command and return the process exit code
///
/// # Errors
///
/// Returns an error if the configuration is invalid, input or output fails,
/// or the runner cannot be launched.
pub fn run(config: &Config) -> Result<i32, CliError> {
    config.validate()?;
    let kind = config.runner;

    match &config.command {
        None | Some(Command::Parse { .. }) => {
            info!(runner = %kind, "marking captured output");
            let lines = read_input(config.input_path())?;
            write_output(config.output_path(), &augment_lines(kind, &lines))?;
            Ok(0)
        }
        Some(Command::ShowCommand) => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", kind.command())?;
            Ok(0)
        }
        Some(Command::Run { args }) => {
            let outcome = run_runner(kind, args)?;
            write_output(None, &outcome.lines)?;
            Ok(outcome.exit_code())
        }
    }
}
