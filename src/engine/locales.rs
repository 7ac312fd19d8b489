//! engine::locales
//!
//! Keep a declared locale list in line with the locales a project ships.
//!
//! # Pipeline
//!
//! 1. Scan the project for locale bundles (sorted)
//! 2. Read the declared list from the YAML config (stored order)
//! 3. Additions: in the project, not declared. Removals: declared, not in
//!    the project
//! 4. Drop removals, append additions, sort, write the list back
//!
//! An empty project directory is not an error: every declared locale is
//! removed. Point the scan at the right directory.
//!
//! # Matching
//!
//! Removals match declared entries exactly by default. [`MatchMode::Substring`]
//! keeps the legacy behavior where a removal also drops every entry that
//! contains it (`en` removes `en-GB`).

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{Outcome, ReconcileError};
use crate::core::document::{ConfigDocument, DocumentError, ListLayout, YamlDocument};
use crate::core::types::LocaleId;
use crate::source::{DirLocaleSource, LocaleSource};

/// How a removal matches declared entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Remove entries equal to a removal.
    #[default]
    Exact,
    /// Remove entries containing a removal.
    Substring,
}

impl MatchMode {
    pub fn matches(self, entry: &LocaleId, removal: &LocaleId) -> bool {
        match self {
            MatchMode::Exact => entry == removal,
            MatchMode::Substring => entry.contains(removal),
        }
    }
}

/// The declared list to reconcile.
#[derive(Debug, Clone)]
pub struct LocaleTarget {
    pub file: PathBuf,
    pub key: String,
    pub mode: MatchMode,
    pub layout: ListLayout,
}

/// What a run found and did.
#[derive(Debug, Clone)]
pub struct LocaleReport {
    pub additions: Vec<LocaleId>,
    pub removals: Vec<LocaleId>,
    /// The list as it is (or, in a dry run, would be) after the run.
    pub locales: Vec<LocaleId>,
    pub outcome: Outcome,
    /// False for unchanged runs and dry runs.
    pub written: bool,
}

/// Scan `root` for `<id><suffix>` entries, sorted.
pub fn scan_project_locales(root: &Path, suffix: &str) -> Result<Vec<LocaleId>, ReconcileError> {
    Ok(DirLocaleSource::new(root, suffix).project_locales()?)
}

/// Read the declared list in stored order.
pub fn read_config_locales(path: &Path, key: &str) -> Result<Vec<LocaleId>, ReconcileError> {
    let document = YamlDocument::load(path).map_err(|e| ReconcileError::document(path, e))?;
    declared(&document, key).map_err(|e| ReconcileError::document(path, e))
}

/// Locales in the project but not declared, in project order.
pub fn compute_additions(project: &[LocaleId], config: &[LocaleId]) -> Vec<LocaleId> {
    difference(project, config)
}

/// Locales declared but not in the project, in declared order.
pub fn compute_removals(config: &[LocaleId], project: &[LocaleId]) -> Vec<LocaleId> {
    difference(config, project)
}

fn difference(from: &[LocaleId], other: &[LocaleId]) -> Vec<LocaleId> {
    let other: HashSet<&LocaleId> = other.iter().collect();
    from.iter()
        .filter(|id| !other.contains(id))
        .cloned()
        .collect()
}

/// The list after dropping removals, appending additions and sorting.
pub fn merge(
    current: &[LocaleId],
    additions: &[LocaleId],
    removals: &[LocaleId],
    mode: MatchMode,
) -> Vec<LocaleId> {
    let mut next: Vec<LocaleId> = current
        .iter()
        .filter(|entry| !removals.iter().any(|removal| mode.matches(entry, removal)))
        .cloned()
        .collect();
    next.extend(additions.iter().cloned());
    next.sort();
    next
}

/// Apply the delta to the list under `key` and return the new list.
pub fn apply(
    document: &mut impl ConfigDocument,
    additions: &[LocaleId],
    removals: &[LocaleId],
    key: &str,
    mode: MatchMode,
    layout: ListLayout,
) -> Result<Vec<LocaleId>, DocumentError> {
    let current = declared(&*document, key)?;
    let next = merge(&current, additions, removals, mode);
    let items: Vec<String> = next.iter().map(|id| id.as_str().to_string()).collect();
    document.set_list(key, &items, layout)?;
    Ok(next)
}

fn declared(document: &impl ConfigDocument, key: &str) -> Result<Vec<LocaleId>, DocumentError> {
    Ok(document
        .get_list(key)?
        .into_iter()
        .map(LocaleId::from)
        .collect())
}

/// Run the full pipeline against `target`.
///
/// The source is consulted again during verification; wrap it in a
/// [`crate::source::CachedLocaleSource`] to scan only once.
pub fn run(
    source: &dyn LocaleSource,
    target: &LocaleTarget,
    dry_run: bool,
) -> Result<LocaleReport, ReconcileError> {
    let project = source.project_locales()?;

    let file = &target.file;
    let mut document = YamlDocument::load(file).map_err(|e| ReconcileError::document(file, e))?;
    let current = declared(&document, &target.key).map_err(|e| ReconcileError::document(file, e))?;

    let additions = compute_additions(&project, &current);
    let removals = compute_removals(&current, &project);
    debug!(?additions, ?removals, "computed locale delta");

    let next = merge(&current, &additions, &removals, target.mode);
    if next == current {
        info!(count = current.len(), "locale list is current");
        return Ok(LocaleReport {
            additions,
            removals,
            locales: current,
            outcome: Outcome::Unchanged,
            written: false,
        });
    }

    if dry_run {
        info!("dry run, locale list not written");
        return Ok(LocaleReport {
            additions,
            removals,
            locales: next,
            outcome: Outcome::Updated,
            written: false,
        });
    }

    let locales = apply(
        &mut document,
        &additions,
        &removals,
        &target.key,
        target.mode,
        target.layout,
    )
    .map_err(|e| ReconcileError::document(file, e))?;
    document
        .save(file)
        .map_err(|e| ReconcileError::document(file, e))?;
    verify(source, target)?;

    info!(
        added = additions.len(),
        removed = removals.len(),
        "locale list updated"
    );
    Ok(LocaleReport {
        additions,
        removals,
        locales,
        outcome: Outcome::Updated,
        written: true,
    })
}

fn verify(source: &dyn LocaleSource, target: &LocaleTarget) -> Result<(), ReconcileError> {
    let stored = read_config_locales(&target.file, &target.key)?;
    let project = source.project_locales()?;
    let failed = |message: String| ReconcileError::VerifyFailed {
        path: target.file.clone(),
        message,
    };

    let extra = compute_removals(&stored, &project);
    if !extra.is_empty() {
        return Err(failed(format!("still declares {}", join(&extra))));
    }
    // Substring removals may also drop locales the project still ships.
    if target.mode == MatchMode::Exact {
        let missing = compute_additions(&project, &stored);
        if !missing.is_empty() {
            return Err(failed(format!("still missing {}", join(&missing))));
        }
    }
    if !stored.windows(2).all(|pair| pair[0] <= pair[1]) {
        return Err(failed("list is not sorted".to_string()));
    }
    Ok(())
}

/// Comma-separated identifiers for messages.
pub fn join(ids: &[LocaleId]) -> String {
    ids.iter()
        .map(LocaleId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
