//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! Every setting has a built-in default matching the Focus for iOS
//! repository layout, so the tool runs with no config file at all. A TOML
//! file can override any of them, and CLI flags override the file.
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Config file
//! 3. CLI flags (not handled here)
//!
//! # Config Locations
//!
//! Searched in order:
//! 1. `--config <path>` (must exist)
//! 2. `$STACKWATCH_CONFIG` if set and the file exists (warns otherwise)
//! 3. `<cwd>/.stackwatch.toml`
//!
//! # Example
//!
//! ```no_run
//! use stackwatch::core::config::Config;
//! use std::path::Path;
//!
//! let result = Config::load(None, Path::new("/path/to/repo")).unwrap();
//! let config = result.config;
//!
//! println!("Endpoint: {}", config.endpoint());
//! println!("Manifest: {}", config.manifest().display());
//! ```

pub mod schema;

pub use schema::{validate_endpoint, IndentConfig, LocalesConfig, StackConfig, ToolConfig};

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use crate::core::document::ListLayout;
use crate::engine::locales::MatchMode;
use crate::source::bitrise::DEFAULT_ENDPOINT;
use crate::source::locales::DEFAULT_SUFFIX;

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "STACKWATCH_CONFIG";

/// Config file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".stackwatch.toml";

pub const DEFAULT_PREFIX: &str = "osx-xcode-";
pub const DEFAULT_MANIFEST: &str = "bitrise.yml";
pub const DEFAULT_KEY_PATH: &[&str] = &["meta", "bitrise.io", "stack"];
pub const DEFAULT_ARTIFACT: &str = "github-actions-scripts/newest_xcode.txt";
pub const DEFAULT_LOCALE_ROOT: &str = "Blockzilla";
pub const DEFAULT_LOCALES_FILE: &str = "l10n-screenshots-config.yml";
pub const DEFAULT_LOCALES_KEY: &str = "locales";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{}': {source}", .path.display())]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{}': {message}", .path.display())]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Warnings generated during config loading.
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    /// The warning message.
    pub message: String,
    /// The path that triggered the warning.
    pub path: PathBuf,
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The loaded configuration.
    pub config: Config,
    /// Any warnings generated during loading.
    pub warnings: Vec<ConfigWarning>,
}

/// Loaded configuration with defaults applied by accessors.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Parsed file contents (all `None` when no file was found)
    pub file: ToolConfig,
    /// Path the file was loaded from
    path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit config path cannot be read, or if a
    /// found config file cannot be parsed or fails validation. A missing
    /// config file is not an error (defaults are used).
    pub fn load(explicit: Option<&Path>, cwd: &Path) -> Result<ConfigLoadResult, ConfigError> {
        let from_env = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        Self::load_from(explicit, from_env.as_deref(), cwd)
    }

    /// Load configuration with the environment lookup already resolved.
    pub fn load_from(
        explicit: Option<&Path>,
        from_env: Option<&Path>,
        cwd: &Path,
    ) -> Result<ConfigLoadResult, ConfigError> {
        let mut warnings = Vec::new();

        let path = if let Some(path) = explicit {
            Some(resolve(cwd, path))
        } else if let Some(path) = from_env.map(|p| resolve(cwd, p)) {
            if path.exists() {
                Some(path)
            } else {
                warnings.push(ConfigWarning {
                    message: format!("{} points to a missing file, ignoring it", CONFIG_ENV),
                    path,
                });
                None
            }
        } else {
            Some(cwd.join(CONFIG_FILE_NAME)).filter(|p| p.exists())
        };

        let file = match &path {
            Some(path) => Self::read_config(path)?,
            None => ToolConfig::default(),
        };
        file.validate()?;

        Ok(ConfigLoadResult {
            config: Config { file, path },
            warnings,
        })
    }

    /// Read and parse a config file.
    fn read_config(path: &Path) -> Result<ToolConfig, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Get the path the config was loaded from.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    // =========================================================================
    // Accessor methods with defaults
    // =========================================================================

    fn stack(&self) -> Option<&StackConfig> {
        self.file.stack.as_ref()
    }

    fn locales(&self) -> Option<&LocalesConfig> {
        self.file.locales.as_ref()
    }

    /// Stack-info endpoint URL.
    pub fn endpoint(&self) -> &str {
        self.stack()
            .and_then(|s| s.endpoint.as_deref())
            .unwrap_or(DEFAULT_ENDPOINT)
    }

    /// Stack tag prefix.
    pub fn prefix(&self) -> &str {
        self.stack()
            .and_then(|s| s.prefix.as_deref())
            .unwrap_or(DEFAULT_PREFIX)
    }

    /// Build manifest path.
    pub fn manifest(&self) -> &Path {
        self.stack()
            .and_then(|s| s.manifest.as_deref())
            .unwrap_or(Path::new(DEFAULT_MANIFEST))
    }

    /// Mapping path to the stack value.
    pub fn key_path(&self) -> Vec<String> {
        match self.stack().and_then(|s| s.key_path.as_ref()) {
            Some(path) => path.clone(),
            None => DEFAULT_KEY_PATH.iter().map(|k| k.to_string()).collect(),
        }
    }

    /// Artifact path receiving the new tag.
    pub fn artifact(&self) -> &Path {
        self.stack()
            .and_then(|s| s.artifact.as_deref())
            .unwrap_or(Path::new(DEFAULT_ARTIFACT))
    }

    /// Request timeout, if configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.stack()
            .and_then(|s| s.timeout_secs)
            .map(Duration::from_secs)
    }

    /// Directory scanned for locale bundles.
    pub fn locale_root(&self) -> &Path {
        self.locales()
            .and_then(|l| l.root.as_deref())
            .unwrap_or(Path::new(DEFAULT_LOCALE_ROOT))
    }

    /// Locale bundle suffix.
    pub fn locale_suffix(&self) -> &str {
        self.locales()
            .and_then(|l| l.suffix.as_deref())
            .unwrap_or(DEFAULT_SUFFIX)
    }

    /// YAML file declaring the locale list.
    pub fn locales_file(&self) -> &Path {
        self.locales()
            .and_then(|l| l.file.as_deref())
            .unwrap_or(Path::new(DEFAULT_LOCALES_FILE))
    }

    /// Top-level key of the locale list.
    pub fn locales_key(&self) -> &str {
        self.locales()
            .and_then(|l| l.key.as_deref())
            .unwrap_or(DEFAULT_LOCALES_KEY)
    }

    /// Removal matching mode. Defaults to exact.
    pub fn match_mode(&self) -> MatchMode {
        self.locales()
            .and_then(|l| l.match_mode)
            .unwrap_or_default()
    }

    /// Layout of the rewritten locale list.
    pub fn list_layout(&self) -> ListLayout {
        let defaults = ListLayout::default();
        let indent = self.locales().and_then(|l| l.indent).unwrap_or_default();
        ListLayout {
            sequence: indent.sequence.unwrap_or(defaults.sequence),
            offset: indent.offset.unwrap_or(defaults.offset),
        }
    }
}

/// Resolve `path` against `base` unless it is already absolute.
pub fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
