//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Loads the tool config and applies flag overrides
//! 2. Calls the engine to run the pipeline
//! 3. Formats and displays the outcome
//!
//! # Async Commands
//!
//! `stack` talks to the network, so its handler builds a tokio runtime and
//! blocks on the async pipeline.

mod completion;
mod list_locales;
mod locales;
mod stack;

pub use completion::completion;
pub use list_locales::list_locales;
pub use locales::{locales, LocalesArgs};
pub use stack::{stack, StackArgs};

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::cli::args::Command;
use crate::core::config::{self, Config};
use crate::engine::{Context, Outcome};
use crate::ui::output::{self, Verbosity};
use anyhow::{Context as _, Result};

/// Exit status for a successful run that made a change, with `--detailed-exitcode`.
pub const EXIT_UPDATED: u8 = 2;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context, config: Option<&Path>) -> Result<ExitCode> {
    match command {
        Command::Stack {
            endpoint,
            prefix,
            manifest,
            artifact,
            dry_run,
            detailed_exitcode,
        } => {
            let args = StackArgs {
                endpoint,
                prefix,
                manifest,
                artifact,
                dry_run,
            };
            let outcome = stack::stack(ctx, config, args)?;
            Ok(ExitCode::from(exit_status(outcome, detailed_exitcode)))
        }
        Command::Locales {
            root,
            suffix,
            file,
            key,
            match_mode,
            dry_run,
            detailed_exitcode,
        } => {
            let args = LocalesArgs {
                root,
                suffix,
                file,
                key,
                match_mode,
                dry_run,
            };
            let outcome = locales::locales(ctx, config, args)?;
            Ok(ExitCode::from(exit_status(outcome, detailed_exitcode)))
        }
        Command::ListLocales { root, suffix, json } => {
            list_locales::list_locales(ctx, config, root, suffix, json)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Completion { shell } => {
            completion::completion(shell)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Map a run outcome to the process exit status.
pub fn exit_status(outcome: Outcome, detailed: bool) -> u8 {
    match outcome {
        Outcome::Updated if detailed => EXIT_UPDATED,
        _ => 0,
    }
}

/// Working directory for this invocation.
fn work_dir(ctx: &Context) -> Result<PathBuf> {
    ctx.work_dir().context("Failed to determine working directory")
}

/// Load the tool config, printing any warnings.
fn load_config(ctx: &Context, explicit: Option<&Path>, cwd: &Path) -> Result<Config> {
    let result = Config::load(explicit, cwd)?;
    let verbosity = Verbosity::from_flags(ctx.quiet, ctx.debug);
    for warning in &result.warnings {
        output::warn(
            format!("{} ({})", warning.message, warning.path.display()),
            verbosity,
        );
    }
    if let Some(path) = result.config.loaded_from() {
        tracing::debug!(path = %path.display(), "loaded tool config");
    }
    Ok(result.config)
}

/// Flag value if given, else the config value, resolved against `cwd`.
fn resolve_path(cwd: &Path, flag: Option<PathBuf>, configured: &Path) -> PathBuf {
    let path = flag.unwrap_or_else(|| configured.to_path_buf());
    config::resolve(cwd, &path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_exit_status_is_zero_for_both_outcomes() {
        assert_eq!(exit_status(Outcome::Unchanged, false), 0);
        assert_eq!(exit_status(Outcome::Updated, false), 0);
    }

    #[test]
    fn detailed_exit_status_flags_updates() {
        assert_eq!(exit_status(Outcome::Unchanged, true), 0);
        assert_eq!(exit_status(Outcome::Updated, true), EXIT_UPDATED);
    }

    #[test]
    fn flag_path_overrides_config_path() {
        let cwd = Path::new("/repo");
        assert_eq!(
            resolve_path(cwd, Some(PathBuf::from("other.yml")), Path::new("bitrise.yml")),
            PathBuf::from("/repo/other.yml")
        );
        assert_eq!(
            resolve_path(cwd, None, Path::new("/abs/bitrise.yml")),
            PathBuf::from("/abs/bitrise.yml")
        );
    }
}
