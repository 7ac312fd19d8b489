//! core
//!
//! Core domain types, persisted documents, and configuration for Stackwatch.
//!
//! # Modules
//!
//! - [`types`] - Strong types: StackPrefix, StackVersion, LocaleId
//! - [`document`] - Format-preserving YAML documents
//! - [`persist`] - Atomic file replacement
//! - [`config`] - Tool configuration schema and loading
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at compile time
//! - Schemas are strict and self-describing
//! - Files are either fully replaced or left untouched

pub mod config;
pub mod document;
pub mod persist;
pub mod types;
