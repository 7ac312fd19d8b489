//! engine::stack
//!
//! Keep a build manifest on the newest floating Xcode stack.
//!
//! # Pipeline
//!
//! 1. Fetch every stack tag the build farm offers
//! 2. Pick the largest floating tag (`<prefix><major>.<minor>.x`)
//! 3. Compare it with the tag stored in the manifest
//! 4. If they differ, rewrite that one value and record the new tag in the
//!    artifact file consumed by the pull-request job
//!
//! Pinned tags (`<prefix>14.0.1`) are never selected. Any difference counts
//! as an update, so a manifest pointing at a stack the farm dropped is moved
//! to the newest one that remains.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::{Outcome, ReconcileError};
use crate::core::document::{ConfigDocument, DocumentError, YamlDocument};
use crate::core::persist;
use crate::core::types::{parse_tag, StackPrefix, StackVersion};
use crate::source::StackSource;

/// Where the stack lives and what to write on update.
#[derive(Debug, Clone)]
pub struct StackTarget {
    pub prefix: StackPrefix,
    pub manifest: PathBuf,
    pub key_path: Vec<String>,
    pub artifact: PathBuf,
}

impl StackTarget {
    fn key_path(&self) -> Vec<&str> {
        self.key_path.iter().map(String::as_str).collect()
    }
}

/// Decision for one manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciliation {
    Unchanged,
    /// New version suffix, without the prefix.
    Update(String),
}

/// What a run found and did.
#[derive(Debug, Clone)]
pub struct StackReport {
    /// Full tag stored in the manifest before the run.
    pub current: String,
    /// Full tag of the newest floating stack.
    pub latest: String,
    pub outcome: Outcome,
    /// False for unchanged runs and dry runs.
    pub written: bool,
}

/// Fetch candidate tags from the source.
pub async fn fetch_candidates(source: &dyn StackSource) -> Result<Vec<String>, ReconcileError> {
    let stacks = source.available_stacks().await?;
    debug!(source = source.name(), count = stacks.len(), "fetched candidates");
    Ok(stacks)
}

/// Parse one tag. `Ok(None)` means the tag is not a floating stack.
pub fn parse(tag: &str, prefix: &StackPrefix) -> Result<Option<StackVersion>, ReconcileError> {
    Ok(parse_tag(tag, prefix)?)
}

/// Select the largest floating version among `candidates`, as `major.minor.x`.
///
/// The first candidate that parses seeds the maximum, whatever its position
/// in the list.
///
/// # Errors
///
/// Returns [`ReconcileError::NoCandidates`] if no candidate parses.
pub fn select_largest(
    candidates: &[String],
    prefix: &StackPrefix,
) -> Result<String, ReconcileError> {
    let mut largest: Option<StackVersion> = None;

    for tag in candidates.iter().filter(|t| t.contains(prefix.as_str())) {
        if !tag.starts_with(prefix.as_str()) {
            debug!(tag = %tag, "prefix not at start of tag, skipping");
            continue;
        }
        match parse(tag, prefix)? {
            Some(version) if largest.map_or(true, |max| version > max) => {
                largest = Some(version);
            }
            Some(_) => {}
            None => debug!(tag = %tag, "not a floating stack, skipping"),
        }
    }

    largest
        .map(|version| version.wildcard())
        .ok_or_else(|| ReconcileError::NoCandidates {
            prefix: prefix.to_string(),
        })
}

/// Compare the manifest's full tag with the selected version suffix.
pub fn reconcile(
    current_tag: &str,
    largest: &str,
    prefix: &StackPrefix,
) -> Result<Reconciliation, ReconcileError> {
    let current = prefix.strip(current_tag)?;
    if current == largest {
        Ok(Reconciliation::Unchanged)
    } else {
        Ok(Reconciliation::Update(largest.to_string()))
    }
}

/// Set the stack value in the document.
pub fn apply(
    document: &mut impl ConfigDocument,
    key_path: &[&str],
    new_tag: &str,
) -> Result<(), DocumentError> {
    document.set_str(key_path, new_tag)
}

/// Overwrite the artifact with `<tag>\n`.
pub fn write_artifact(path: &Path, tag: &str) -> Result<(), ReconcileError> {
    persist::write_atomic(path, &format!("{}\n", tag)).map_err(|e| ReconcileError::WriteFailure {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Run the full pipeline against `target`.
///
/// With `dry_run`, the decision is reported but nothing is written.
pub async fn run(
    source: &dyn StackSource,
    target: &StackTarget,
    dry_run: bool,
) -> Result<StackReport, ReconcileError> {
    let candidates = fetch_candidates(source).await?;
    let largest = select_largest(&candidates, &target.prefix)?;
    let latest = target.prefix.tag(&largest);

    let manifest = &target.manifest;
    let key_path = target.key_path();
    let mut document =
        YamlDocument::load(manifest).map_err(|e| ReconcileError::document(manifest, e))?;
    let current = document
        .get_str(&key_path)
        .map_err(|e| ReconcileError::document(manifest, e))?;

    let version = match reconcile(&current, &largest, &target.prefix)? {
        Reconciliation::Unchanged => {
            info!(stack = %current, "stack is current");
            return Ok(StackReport {
                current,
                latest,
                outcome: Outcome::Unchanged,
                written: false,
            });
        }
        Reconciliation::Update(version) => version,
    };

    let report = StackReport {
        current,
        latest: target.prefix.tag(&version),
        outcome: Outcome::Updated,
        written: !dry_run,
    };
    if dry_run {
        info!(from = %report.current, to = %report.latest, "dry run, manifest not written");
        return Ok(report);
    }

    let original = document.render();
    apply(&mut document, &key_path, &report.latest)
        .map_err(|e| ReconcileError::document(manifest, e))?;
    document
        .save(manifest)
        .map_err(|e| ReconcileError::document(manifest, e))?;

    // Roll the manifest back so the next run retries the artifact.
    let finished = verify(manifest, &key_path, &report.latest)
        .and_then(|()| write_artifact(&target.artifact, &report.latest));
    if let Err(err) = finished {
        restore(manifest, &original);
        return Err(err);
    }

    info!(from = %report.current, to = %report.latest, "manifest updated");
    Ok(report)
}

fn restore(manifest: &Path, original: &str) {
    match persist::write_atomic(manifest, original) {
        Ok(()) => debug!(path = %manifest.display(), "manifest restored"),
        Err(e) => warn!(path = %manifest.display(), error = %e, "failed to restore manifest"),
    }
}

fn verify(manifest: &Path, key_path: &[&str], expected: &str) -> Result<(), ReconcileError> {
    let stored = YamlDocument::load(manifest)
        .and_then(|doc| doc.get_str(key_path))
        .map_err(|e| ReconcileError::document(manifest, e))?;

    if stored != expected {
        return Err(ReconcileError::VerifyFailed {
            path: manifest.to_path_buf(),
            message: format!("expected '{}', found '{}'", expected, stored),
        });
    }
    Ok(())
}
