//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`StackPrefix`] - Validated stack name prefix (e.g. `osx-xcode-`)
//! - [`StackVersion`] - Normalized `major.minor.patch` triple with total ordering
//! - [`LocaleId`] - Opaque locale identifier (e.g. `en-GB`)
//!
//! # Stack Tags
//!
//! A stack tag is `<prefix><major>.<minor>.x` (floating) or
//! `<prefix><major>.<minor>.<patch>` (pinned). Only floating tags are
//! candidates when looking for the newest stack; [`parse_tag`] normalizes
//! them to `major.minor.0`.
//!
//! # Examples
//!
//! ```
//! use stackwatch::core::types::{parse_tag, StackPrefix, StackVersion};
//!
//! let prefix = StackPrefix::new("osx-xcode-").unwrap();
//!
//! let floating = parse_tag("osx-xcode-14.1.x", &prefix).unwrap();
//! assert_eq!(floating, Some(StackVersion::new(14, 1, 0)));
//!
//! // Pinned tags are not candidates
//! assert_eq!(parse_tag("osx-xcode-14.0.1", &prefix).unwrap(), None);
//!
//! // Tags without the prefix are malformed
//! assert!(parse_tag("linux-docker-android", &prefix).is_err());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Marker that terminates a floating stack tag.
pub const WILDCARD: char = 'x';

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("malformed stack tag '{tag}': expected prefix '{prefix}'")]
    MalformedTag { tag: String, prefix: String },

    #[error("invalid stack prefix: {0}")]
    InvalidPrefix(String),
}

/// A validated stack prefix.
///
/// The prefix is matched literally at the start of a stack tag. It cannot
/// be empty or contain whitespace.
///
/// # Example
///
/// ```
/// use stackwatch::core::types::StackPrefix;
///
/// let prefix = StackPrefix::new("osx-xcode-").unwrap();
/// assert_eq!(prefix.tag("14.1.x"), "osx-xcode-14.1.x");
/// assert_eq!(prefix.strip("osx-xcode-14.1.x").unwrap(), "14.1.x");
///
/// assert!(StackPrefix::new("").is_err());
/// assert!(StackPrefix::new("osx xcode").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StackPrefix(String);

impl StackPrefix {
    /// Create a new validated prefix.
    pub fn new(prefix: impl Into<String>) -> Result<Self, TypeError> {
        let prefix = prefix.into();
        if prefix.is_empty() {
            return Err(TypeError::InvalidPrefix("prefix cannot be empty".into()));
        }
        if prefix.chars().any(char::is_whitespace) {
            return Err(TypeError::InvalidPrefix(format!(
                "'{}' contains whitespace",
                prefix
            )));
        }
        Ok(Self(prefix))
    }

    /// Get the prefix as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Strip the prefix from a full tag.
    ///
    /// # Errors
    ///
    /// Returns [`TypeError::MalformedTag`] if the tag does not start with
    /// the prefix.
    pub fn strip<'a>(&self, tag: &'a str) -> Result<&'a str, TypeError> {
        tag.strip_prefix(self.0.as_str())
            .ok_or_else(|| TypeError::MalformedTag {
                tag: tag.to_string(),
                prefix: self.0.clone(),
            })
    }

    /// Build a full tag from a version suffix.
    pub fn tag(&self, version: &str) -> String {
        format!("{}{}", self.0, version)
    }
}

impl TryFrom<String> for StackPrefix {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StackPrefix> for String {
    fn from(prefix: StackPrefix) -> Self {
        prefix.0
    }
}

impl fmt::Display for StackPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A normalized stack version.
///
/// Ordering compares major, then minor, then patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StackVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl StackVersion {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Format as a floating tag suffix, `major.minor.x`.
    pub fn wildcard(&self) -> String {
        format!("{}.{}.{}", self.major, self.minor, WILDCARD)
    }
}

impl fmt::Display for StackVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Parse a stack tag into a comparable version.
///
/// Returns `Ok(None)` when the tag is not a floating tag (pinned patch
/// versions, or a wildcard tag whose `major.minor` is not numeric).
///
/// # Errors
///
/// Returns [`TypeError::MalformedTag`] if the tag does not carry the prefix.
pub fn parse_tag(tag: &str, prefix: &StackPrefix) -> Result<Option<StackVersion>, TypeError> {
    let rest = prefix.strip(tag)?;

    if !rest.ends_with(WILDCARD) {
        return Ok(None);
    }

    let Some(major_minor) = rest.strip_suffix(".x") else {
        return Ok(None);
    };

    let mut parts = major_minor.split('.');
    let (Some(major), Some(minor), None) = (parts.next(), parts.next(), parts.next()) else {
        return Ok(None);
    };

    match (major.parse::<u64>(), minor.parse::<u64>()) {
        (Ok(major), Ok(minor)) => Ok(Some(StackVersion::new(major, minor, 0))),
        _ => Ok(None),
    }
}

/// A locale identifier, such as `en`, `pt-BR` or `zh-Hans`.
///
/// Identifiers are opaque and compared case-sensitively. Ordering is
/// plain lexicographic string ordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocaleId(String);

impl LocaleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if `other` occurs anywhere in this identifier.
    pub fn contains(&self, other: &LocaleId) -> bool {
        self.0.contains(other.as_str())
    }
}

impl From<&str> for LocaleId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for LocaleId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for LocaleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
