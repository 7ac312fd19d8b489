//! engine
//!
//! Reconciliation pipelines: Read -> Reconcile -> Write -> Verify.
//!
//! # Architecture
//!
//! Each pipeline compares an authoritative source against a persisted YAML
//! file and applies the smallest correction:
//!
//! 1. **Read**: fetch authoritative state from a [`crate::source`]
//! 2. **Reconcile**: compute the delta against the persisted document
//! 3. **Write**: apply the delta in place and replace the file atomically
//! 4. **Verify**: re-read the file and confirm it now matches
//!
//! - [`stack`] - keep the build manifest on the newest floating Xcode stack
//! - [`locales`] - keep the declared locale list in line with the project
//!
//! # Invariants
//!
//! - A failed read aborts the run before anything is written
//! - "Unchanged" performs no write at all
//! - Files are either fully replaced or left untouched
//! - Verification failure after a write indicates a bug

pub mod locales;
pub mod stack;

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::document::DocumentError;
use crate::core::types::TypeError;
use crate::source::SourceError;

/// Execution context passed from the CLI.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Working directory override.
    pub cwd: Option<PathBuf>,
    /// Debug logging enabled.
    pub debug: bool,
    /// Quiet mode (minimal output).
    pub quiet: bool,
}

impl Context {
    /// The directory relative paths are resolved against.
    pub fn work_dir(&self) -> std::io::Result<PathBuf> {
        match &self.cwd {
            Some(cwd) => Ok(cwd.clone()),
            None => std::env::current_dir(),
        }
    }
}

/// Result of a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The persisted file already matched the source.
    Unchanged,
    /// The persisted file was (or, in a dry run, would be) corrected.
    Updated,
}

/// Errors that abort a reconciliation run.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("source unavailable: {0}")]
    SourceUnavailable(#[from] SourceError),

    #[error("malformed stack tag '{tag}': expected prefix '{prefix}'")]
    MalformedTag { tag: String, prefix: String },

    #[error("invalid stack prefix: {0}")]
    InvalidPrefix(String),

    #[error("no stack matching '{prefix}<major>.<minor>.x' is available")]
    NoCandidates { prefix: String },

    #[error("config file not found: {}", .0.display())]
    ConfigMissing(PathBuf),

    #[error("key '{key}' not found in {}", .path.display())]
    KeyMissing { key: String, path: PathBuf },

    #[error("invalid document {}: {message}", .path.display())]
    InvalidDocument { path: PathBuf, message: String },

    #[error("failed to write {}: {message}", .path.display())]
    WriteFailure { path: PathBuf, message: String },

    #[error("verification failed for {}: {message}", .path.display())]
    VerifyFailed { path: PathBuf, message: String },
}

impl ReconcileError {
    /// Attach the document path to a document error.
    pub fn document(path: &Path, err: DocumentError) -> Self {
        let path = path.to_path_buf();
        match err {
            DocumentError::NotFound(path) => ReconcileError::ConfigMissing(path),
            DocumentError::KeyMissing(key) => ReconcileError::KeyMissing { key, path },
            DocumentError::Write { path, source } => ReconcileError::WriteFailure {
                path,
                message: source.to_string(),
            },
            err @ (DocumentError::Read { .. }
            | DocumentError::Parse(_)
            | DocumentError::WrongType { .. }
            | DocumentError::NotEditable(_)) => ReconcileError::InvalidDocument {
                path,
                message: err.to_string(),
            },
        }
    }
}

impl From<TypeError> for ReconcileError {
    fn from(err: TypeError) -> Self {
        match err {
            TypeError::MalformedTag { tag, prefix } => ReconcileError::MalformedTag { tag, prefix },
            TypeError::InvalidPrefix(message) => ReconcileError::InvalidPrefix(message),
        }
    }
}
