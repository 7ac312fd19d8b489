//! source::traits
//!
//! Source trait definitions for reading authoritative state.
//!
//! # Design
//!
//! [`StackSource`] is async because it performs network I/O. [`LocaleSource`]
//! is synchronous; it only lists a local directory.
//!
//! Both return `Result` so a failed read is a value the caller must handle.
//! There is no "empty on failure" path: reconciling against a source that
//! could not be read would compute a bogus delta.

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::core::types::LocaleId;

/// Errors from source operations.
#[derive(Debug, Clone, Error)]
pub enum SourceError {
    /// Network or connection error.
    #[error("network error: {0}")]
    Network(String),

    /// The API answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body or reason phrase
        message: String,
    },

    /// The response body was not the expected JSON shape.
    #[error("invalid response: {0}")]
    Decode(String),

    /// A local directory could not be listed.
    #[error("cannot read '{}': {message}", .path.display())]
    Unreadable { path: PathBuf, message: String },
}

/// Source of available build-farm stacks.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so they can be driven from a tokio
/// runtime.
#[async_trait]
pub trait StackSource: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Fetch every stack tag the build farm currently offers.
    async fn available_stacks(&self) -> Result<Vec<String>, SourceError>;
}

/// Source of the locales present in a project.
pub trait LocaleSource {
    /// List project locales, sorted ascending.
    fn project_locales(&self) -> Result<Vec<LocaleId>, SourceError>;
}
