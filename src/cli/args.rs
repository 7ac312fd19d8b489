//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--cwd <path>`: Run as if in that directory
//! - `--config <path>`: Use this tool config file
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Stackwatch - keep CI manifests in line with the build farm and the project
#[derive(Parser, Debug)]
#[command(name = "stackwatch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run as if stackwatch was started in this directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    /// Tool config file (default: $STACKWATCH_CONFIG, then ./.stackwatch.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Move the build manifest to the newest floating Xcode stack
    #[command(
        name = "stack",
        long_about = "Move the build manifest to the newest floating Xcode stack.\n\n\
            Queries the stack-info API, picks the largest '<prefix><major>.<minor>.x' \
            stack, and compares it with the stack stored in the manifest. When they \
            differ, only that value is rewritten (comments, quoting and key order are \
            kept) and the new tag is written to the artifact file for the pull-request \
            job.",
        after_help = "\
EXAMPLES:
    # Bump bitrise.yml if a newer Xcode stack exists
    stackwatch stack

    # See what would change without writing anything
    stackwatch stack --dry-run

    # Exit 2 when the manifest was updated (0 = unchanged, 1 = error)
    stackwatch stack --detailed-exitcode"
    )]
    Stack {
        /// Stack-info endpoint URL
        #[arg(long, value_name = "URL")]
        endpoint: Option<String>,

        /// Stack tag prefix
        #[arg(long)]
        prefix: Option<String>,

        /// Build manifest to update
        #[arg(long, value_name = "FILE")]
        manifest: Option<PathBuf>,

        /// File receiving the new tag after an update
        #[arg(long, value_name = "FILE")]
        artifact: Option<PathBuf>,

        /// Report the decision without writing
        #[arg(long)]
        dry_run: bool,

        /// Exit 2 when an update was made
        #[arg(long)]
        detailed_exitcode: bool,
    },

    /// Reconcile the declared locale list with the project's locale bundles
    #[command(
        name = "locales",
        long_about = "Reconcile the declared locale list with the project's locale bundles.\n\n\
            Scans the project directory for '<locale><suffix>' entries, adds locales \
            missing from the config list, removes locales the project no longer ships, \
            and writes the list back sorted. Everything outside the list is left as is.",
        after_help = "\
EXAMPLES:
    # Sync l10n-screenshots-config.yml with Blockzilla/*.lproj
    stackwatch locales

    # Use another project directory and config file
    stackwatch locales --root Sources/Resources --file screenshots.yml

    # Remove 'en-GB' too when 'en' disappears (legacy behavior)
    stackwatch locales --match substring"
    )]
    Locales {
        /// Directory holding one bundle per locale
        #[arg(long, value_name = "DIR")]
        root: Option<PathBuf>,

        /// Locale bundle suffix
        #[arg(long)]
        suffix: Option<String>,

        /// YAML file declaring the locale list
        #[arg(long, value_name = "FILE")]
        file: Option<PathBuf>,

        /// Top-level key of the locale list
        #[arg(long)]
        key: Option<String>,

        /// How removals match declared entries
        #[arg(long = "match", value_enum, value_name = "MODE")]
        match_mode: Option<MatchArg>,

        /// Report the delta without writing
        #[arg(long)]
        dry_run: bool,

        /// Exit 2 when an update was made
        #[arg(long)]
        detailed_exitcode: bool,
    },

    /// Print the locales the project ships
    #[command(name = "list-locales")]
    ListLocales {
        /// Directory holding one bundle per locale
        #[arg(long, value_name = "DIR")]
        root: Option<PathBuf>,

        /// Locale bundle suffix
        #[arg(long)]
        suffix: Option<String>,

        /// Print a JSON array instead of one locale per line
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Removal matching mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MatchArg {
    Exact,
    Substring,
}

/// Supported shells for completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    #[value(name = "powershell")]
    PowerShell,
}
