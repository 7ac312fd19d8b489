//! Stackwatch - keep CI manifests in line with their authoritative sources
//!
//! Stackwatch is a single-binary tool with two reconcilers that run from
//! scheduled CI jobs:
//!
//! - the Xcode stack in `bitrise.yml` follows the newest floating stack
//!   published by the Bitrise stack-info API
//! - the locale list in the screenshot config follows the `*.lproj`
//!   bundles the project ships
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to engine)
//! - [`engine`] - Read → Reconcile → Write → Verify pipelines
//! - [`source`] - Authoritative sources: stack-info API, locale directory scan
//! - [`core`] - Domain types, YAML documents, configuration
//! - [`ui`] - User-facing output
//! - [`logging`] - Diagnostic logging setup
//!
//! # Correctness Invariants
//!
//! 1. A source failure aborts the run before anything is written
//! 2. Only the reconciled value or list changes; the rest of the file is kept
//! 3. Files are replaced atomically or not at all
//! 4. A second run after a successful update reports "unchanged"

pub mod cli;
pub mod core;
pub mod engine;
pub mod logging;
pub mod source;
pub mod ui;
