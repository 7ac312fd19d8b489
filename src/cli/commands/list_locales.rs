//! cli::commands::list_locales
//!
//! Print the locales the project ships, one per line or as a JSON array.
//! Screenshot jobs consume the JSON form directly.

use std::path::{Path, PathBuf};

use crate::engine::locales::scan_project_locales;
use crate::engine::Context;
use anyhow::{bail, Result};

use super::{load_config, resolve_path, work_dir};

/// Run the list-locales command.
pub fn list_locales(
    ctx: &Context,
    config: Option<&Path>,
    root: Option<PathBuf>,
    suffix: Option<String>,
    json: bool,
) -> Result<()> {
    let cwd = work_dir(ctx)?;
    let config = load_config(ctx, config, &cwd)?;

    let suffix = suffix.unwrap_or_else(|| config.locale_suffix().to_string());
    if suffix.is_empty() {
        bail!("locale suffix cannot be empty");
    }
    let root = resolve_path(&cwd, root, config.locale_root());

    let locales = scan_project_locales(&root, &suffix)?;

    // Output is data, not status, so quiet mode does not suppress it.
    if json {
        println!("{}", serde_json::to_string(&locales)?);
    } else {
        for locale in &locales {
            println!("{}", locale);
        }
    }
    Ok(())
}
