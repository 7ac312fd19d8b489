//! ui
//!
//! User-facing output.
//!
//! # Modules
//!
//! - [`output`] - Outcome lines, warnings and errors
//!
//! # Design
//!
//! All user-facing text goes through this module so the quiet flag and the
//! stdout/stderr split are handled in one place.

pub mod output;
