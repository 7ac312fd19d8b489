//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! Outcome lines go to stdout and respect the quiet flag. Errors and
//! warnings go to stderr. Diagnostic detail belongs in `tracing` events,
//! not here.

use std::fmt::Display;

use crate::engine::locales::{join, LocaleReport};
use crate::engine::stack::StackReport;
use crate::engine::Outcome;

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Quiet mode - minimal output
    Quiet,
    /// Normal mode - standard output
    Normal,
    /// Debug mode - verbose output
    Debug,
}

impl Verbosity {
    /// Create verbosity from flags.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }
}

/// Print a message (respects quiet mode).
pub fn print(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        println!("{}", message);
    }
}

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// Print a warning message (respects quiet mode).
pub fn warn(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        eprintln!("warning: {}", message);
    }
}

/// One-line summary of a stack run.
pub fn format_stack(report: &StackReport, dry_run: bool) -> String {
    match report.outcome {
        Outcome::Unchanged => format!("no change needed ({})", report.current),
        Outcome::Updated if dry_run => {
            format!("would update {} → {}", report.current, report.latest)
        }
        Outcome::Updated => format!("updated {} → {}", report.current, report.latest),
    }
}

/// One-line summary of a locale run.
pub fn format_locales(report: &LocaleReport, dry_run: bool) -> String {
    if report.outcome == Outcome::Unchanged {
        return format!("no change needed ({} locales)", report.locales.len());
    }

    let mut parts = Vec::new();
    if !report.additions.is_empty() {
        parts.push(format!("added {}", join(&report.additions)));
    }
    if !report.removals.is_empty() {
        parts.push(format!("removed {}", join(&report.removals)));
    }
    if parts.is_empty() {
        parts.push("sorted".to_string());
    }

    let verb = if dry_run { "would update" } else { "updated" };
    format!("{} locales: {}", verb, parts.join("; "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::LocaleId;

    fn ids(list: &[&str]) -> Vec<LocaleId> {
        list.iter().map(|s| LocaleId::from(*s)).collect()
    }

    #[test]
    fn verbosity_from_flags() {
        assert_eq!(Verbosity::from_flags(true, true), Verbosity::Quiet);
        assert_eq!(Verbosity::from_flags(false, true), Verbosity::Debug);
        assert_eq!(Verbosity::from_flags(false, false), Verbosity::Normal);
    }

    #[test]
    fn stack_lines() {
        let mut report = StackReport {
            current: "osx-xcode-14.0.x".into(),
            latest: "osx-xcode-14.1.x".into(),
            outcome: Outcome::Updated,
            written: true,
        };
        assert_eq!(
            format_stack(&report, false),
            "updated osx-xcode-14.0.x → osx-xcode-14.1.x"
        );
        assert_eq!(
            format_stack(&report, true),
            "would update osx-xcode-14.0.x → osx-xcode-14.1.x"
        );

        report.outcome = Outcome::Unchanged;
        assert_eq!(format_stack(&report, false), "no change needed (osx-xcode-14.0.x)");
    }

    #[test]
    fn locale_lines() {
        let report = LocaleReport {
            additions: ids(&["es"]),
            removals: ids(&["pt"]),
            locales: ids(&["en", "es", "fr"]),
            outcome: Outcome::Updated,
            written: true,
        };
        assert_eq!(
            format_locales(&report, false),
            "updated locales: added es; removed pt"
        );

        let sorted_only = LocaleReport {
            additions: vec![],
            removals: vec![],
            locales: ids(&["en", "fr"]),
            outcome: Outcome::Updated,
            written: false,
        };
        assert_eq!(format_locales(&sorted_only, true), "would update locales: sorted");
    }
}
