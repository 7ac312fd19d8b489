//! source
//!
//! Readers for authoritative state.
//!
//! # Architecture
//!
//! Reconcilers never talk to the network or the filesystem listing directly;
//! they receive a source. Commands construct the production sources, tests
//! pass mocks.
//!
//! # Modules
//!
//! - `traits`: [`StackSource`], [`LocaleSource`] and [`SourceError`]
//! - [`bitrise`]: stack-info API client over reqwest
//! - [`mock`]: in-memory stack source for deterministic testing
//! - [`locales`]: directory-backed locale source and its per-run cache

pub mod bitrise;
pub mod locales;
pub mod mock;
mod traits;

pub use bitrise::BitriseStackSource;
pub use locales::{CachedLocaleSource, DirLocaleSource};
pub use traits::*;
