//! cli::commands::stack
//!
//! Move the build manifest to the newest floating Xcode stack.
//!
//! # Example
//!
//! ```bash
//! # Bump bitrise.yml if a newer stack exists
//! stackwatch stack
//!
//! # Preview against a different endpoint
//! stackwatch stack --endpoint http://localhost:8080/stacks --dry-run
//! ```

use std::path::{Path, PathBuf};

use crate::core::config::validate_endpoint;
use crate::core::types::StackPrefix;
use crate::engine::stack::{self as pipeline, StackTarget};
use crate::engine::{Context, Outcome};
use crate::source::BitriseStackSource;
use crate::ui::output::{self, Verbosity};
use anyhow::Result;

use super::{load_config, resolve_path, work_dir};

/// Flag overrides for the stack command.
#[derive(Debug, Clone, Default)]
pub struct StackArgs {
    pub endpoint: Option<String>,
    pub prefix: Option<String>,
    pub manifest: Option<PathBuf>,
    pub artifact: Option<PathBuf>,
    pub dry_run: bool,
}

/// Run the stack command.
///
/// This is a synchronous wrapper that uses tokio to run the async pipeline.
pub fn stack(ctx: &Context, config: Option<&Path>, args: StackArgs) -> Result<Outcome> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(stack_async(ctx, config, args))
}

async fn stack_async(ctx: &Context, config: Option<&Path>, args: StackArgs) -> Result<Outcome> {
    let cwd = work_dir(ctx)?;
    let config = load_config(ctx, config, &cwd)?;

    let endpoint = args
        .endpoint
        .unwrap_or_else(|| config.endpoint().to_string());
    validate_endpoint(&endpoint)?;

    let prefix = StackPrefix::new(args.prefix.as_deref().unwrap_or(config.prefix()))?;
    let target = StackTarget {
        prefix,
        manifest: resolve_path(&cwd, args.manifest, config.manifest()),
        key_path: config.key_path(),
        artifact: resolve_path(&cwd, args.artifact, config.artifact()),
    };

    let source = BitriseStackSource::new(endpoint, config.timeout())?;
    let report = pipeline::run(&source, &target, args.dry_run).await?;

    output::print(
        output::format_stack(&report, args.dry_run),
        Verbosity::from_flags(ctx.quiet, ctx.debug),
    );
    Ok(report.outcome)
}
