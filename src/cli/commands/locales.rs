//! cli::commands::locales
//!
//! Reconcile the declared locale list with the project's locale bundles.

use std::path::{Path, PathBuf};

use crate::cli::args::MatchArg;
use crate::engine::locales::{self as pipeline, LocaleTarget, MatchMode};
use crate::engine::{Context, Outcome};
use crate::source::{CachedLocaleSource, DirLocaleSource};
use crate::ui::output::{self, Verbosity};
use anyhow::{bail, Result};

use super::{load_config, resolve_path, work_dir};

/// Flag overrides for the locales command.
#[derive(Debug, Clone, Default)]
pub struct LocalesArgs {
    pub root: Option<PathBuf>,
    pub suffix: Option<String>,
    pub file: Option<PathBuf>,
    pub key: Option<String>,
    pub match_mode: Option<MatchArg>,
    pub dry_run: bool,
}

impl From<MatchArg> for MatchMode {
    fn from(arg: MatchArg) -> Self {
        match arg {
            MatchArg::Exact => MatchMode::Exact,
            MatchArg::Substring => MatchMode::Substring,
        }
    }
}

/// Run the locales command.
pub fn locales(ctx: &Context, config: Option<&Path>, args: LocalesArgs) -> Result<Outcome> {
    let cwd = work_dir(ctx)?;
    let config = load_config(ctx, config, &cwd)?;

    let suffix = args
        .suffix
        .unwrap_or_else(|| config.locale_suffix().to_string());
    if suffix.is_empty() {
        bail!("locale suffix cannot be empty");
    }
    let key = args.key.unwrap_or_else(|| config.locales_key().to_string());
    if key.is_empty() {
        bail!("locale key cannot be empty");
    }

    let root = resolve_path(&cwd, args.root, config.locale_root());
    let target = LocaleTarget {
        file: resolve_path(&cwd, args.file, config.locales_file()),
        key,
        mode: args
            .match_mode
            .map(MatchMode::from)
            .unwrap_or_else(|| config.match_mode()),
        layout: config.list_layout(),
    };

    let source = CachedLocaleSource::new(DirLocaleSource::new(root, suffix));
    let report = pipeline::run(&source, &target, args.dry_run)?;

    output::print(
        output::format_locales(&report, args.dry_run),
        Verbosity::from_flags(ctx.quiet, ctx.debug),
    );
    Ok(report.outcome)
}
