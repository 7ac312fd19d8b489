//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Example
//!
//! ```toml
//! [stack]
//! endpoint = "https://app.bitrise.io/app/6c06d3a40422d10f/all_stack_info"
//! prefix = "osx-xcode-"
//! manifest = "bitrise.yml"
//! key_path = ["meta", "bitrise.io", "stack"]
//! artifact = "github-actions-scripts/newest_xcode.txt"
//! timeout_secs = 30
//!
//! [locales]
//! root = "Blockzilla"
//! suffix = ".lproj"
//! file = "l10n-screenshots-config.yml"
//! key = "locales"
//! match = "exact"
//!
//! [locales.indent]
//! sequence = 4
//! offset = 6
//! ```
//!
//! # Validation
//!
//! Values are validated after parsing; unknown fields are rejected.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::core::types::StackPrefix;
use crate::engine::locales::MatchMode;

/// Root of the tool configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ToolConfig {
    /// Stack bump settings
    pub stack: Option<StackConfig>,

    /// Locale reconciliation settings
    pub locales: Option<LocalesConfig>,
}

impl ToolConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(stack) = &self.stack {
            stack.validate()?;
        }
        if let Some(locales) = &self.locales {
            locales.validate()?;
        }
        Ok(())
    }
}

/// `[stack]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct StackConfig {
    /// Stack-info endpoint URL
    pub endpoint: Option<String>,

    /// Stack tag prefix
    pub prefix: Option<String>,

    /// Build manifest path
    pub manifest: Option<PathBuf>,

    /// Mapping path to the stack value inside the manifest
    pub key_path: Option<Vec<String>>,

    /// File receiving the new tag after an update
    pub artifact: Option<PathBuf>,

    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,
}

impl StackConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(endpoint) = &self.endpoint {
            validate_endpoint(endpoint)?;
        }

        if let Some(prefix) = &self.prefix {
            StackPrefix::new(prefix.as_str())
                .map_err(|e| ConfigError::InvalidValue(format!("stack.prefix: {}", e)))?;
        }

        if let Some(path) = &self.key_path {
            if path.is_empty() || path.iter().any(|key| key.is_empty()) {
                return Err(ConfigError::InvalidValue(
                    "stack.key_path must be a non-empty list of non-empty keys".to_string(),
                ));
            }
        }

        if self.timeout_secs == Some(0) {
            return Err(ConfigError::InvalidValue(
                "stack.timeout_secs must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

/// `[locales]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LocalesConfig {
    /// Directory holding one resource bundle per locale
    pub root: Option<PathBuf>,

    /// Resource bundle suffix
    pub suffix: Option<String>,

    /// YAML file declaring the locale list
    pub file: Option<PathBuf>,

    /// Top-level key of the locale list
    pub key: Option<String>,

    /// How removals match declared entries
    #[serde(rename = "match")]
    pub match_mode: Option<MatchMode>,

    /// Layout of the rewritten list
    pub indent: Option<IndentConfig>,
}

impl LocalesConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.suffix.as_deref() == Some("") {
            return Err(ConfigError::InvalidValue(
                "locales.suffix cannot be empty".to_string(),
            ));
        }
        if self.key.as_deref() == Some("") {
            return Err(ConfigError::InvalidValue(
                "locales.key cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// `[locales.indent]` section.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct IndentConfig {
    /// Column of the item text, relative to the key
    pub sequence: Option<usize>,

    /// Column of the dash, relative to the key
    pub offset: Option<usize>,
}

/// Check that `endpoint` is an http(s) URL.
pub fn validate_endpoint(endpoint: &str) -> Result<(), ConfigError> {
    if endpoint.starts_with("https://") || endpoint.starts_with("http://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue(format!(
            "endpoint '{}' must be an http(s) URL",
            endpoint
        )))
    }
}
