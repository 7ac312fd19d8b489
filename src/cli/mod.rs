//! cli
//!
//! Command-line interface layer for Stackwatch.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Install logging
//! - Delegate to command handlers
//! - Does NOT touch files directly
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap, folds config and
//! flags into engine targets, and dispatches to [`crate::engine`].

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use std::process::ExitCode;

use crate::engine;
use crate::logging;
use anyhow::Result;

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`. The returned exit
/// code covers success; errors are reported by the caller.
pub fn run() -> Result<ExitCode> {
    let cli = Cli::parse_args();

    logging::setup_logging(cli.debug, cli.quiet);

    let ctx = engine::Context {
        cwd: cli.cwd.clone(),
        debug: cli.debug,
        quiet: cli.quiet,
    };

    commands::dispatch(cli.command, &ctx, cli.config.as_deref())
}
