// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! testmark: mark Python test runner output for editors
//!
//! This binary reads pytest or nose output (or launches the runner itself)
//! and inserts a `path:line <error>` line after every error it recognises.

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use testmark::{Config, run};

fn main() -> anyhow::Result<ExitCode> {
    let config = Config::parse();

    // Logs go to stderr, stdout carries the marked output
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(config.log_level().into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    debug!(?config, "starting testmark");

    let code = run(&config).with_context(|| format!("testmark ({}) failed", config.runner))?;
    Ok(ExitCode::from(u8::try_from(code).unwrap_or(1)))
}
