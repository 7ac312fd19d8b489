//! source::locales
//!
//! Locale discovery from a project directory.
//!
//! Each locale ships as one resource bundle named `<identifier><suffix>`
//! (for iOS, `en.lproj`, `pt-BR.lproj`, ...). [`DirLocaleSource`] lists the
//! directory, keeps entries with the suffix and strips it. The result is
//! sorted so diffs and rewritten configs are reproducible.
//!
//! [`CachedLocaleSource`] memoizes a successful scan for as long as the
//! wrapper lives. Construct one per run; nothing is cached process-wide.

use std::cell::OnceCell;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::traits::{LocaleSource, SourceError};
use crate::core::types::LocaleId;

/// Default resource bundle suffix.
pub const DEFAULT_SUFFIX: &str = ".lproj";

/// Locale source that lists a directory.
#[derive(Debug, Clone)]
pub struct DirLocaleSource {
    root: PathBuf,
    suffix: String,
}

impl DirLocaleSource {
    pub fn new(root: impl Into<PathBuf>, suffix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            suffix: suffix.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl LocaleSource for DirLocaleSource {
    fn project_locales(&self) -> Result<Vec<LocaleId>, SourceError> {
        let unreadable = |e: std::io::Error| SourceError::Unreadable {
            path: self.root.clone(),
            message: e.to_string(),
        };

        let mut locales = Vec::new();
        for entry in fs::read_dir(&self.root).map_err(unreadable)? {
            let entry = entry.map_err(unreadable)?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                debug!(name = ?entry.file_name(), "skipping non UTF-8 entry");
                continue;
            };
            match name.strip_suffix(self.suffix.as_str()) {
                Some("") | None => {}
                Some(id) => locales.push(LocaleId::new(id)),
            }
        }

        locales.sort();
        debug!(root = %self.root.display(), count = locales.len(), "scanned project locales");
        Ok(locales)
    }
}

/// Memoizing wrapper around another locale source.
///
/// Failed scans are not cached.
#[derive(Debug)]
pub struct CachedLocaleSource<S> {
    inner: S,
    cache: OnceCell<Vec<LocaleId>>,
}

impl<S: LocaleSource> CachedLocaleSource<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            cache: OnceCell::new(),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: LocaleSource> LocaleSource for CachedLocaleSource<S> {
    fn project_locales(&self) -> Result<Vec<LocaleId>, SourceError> {
        if let Some(cached) = self.cache.get() {
            return Ok(cached.clone());
        }
        let locales = self.inner.project_locales()?;
        Ok(self.cache.get_or_init(|| locales).clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use tempfile::TempDir;

    fn ids(values: &[&str]) -> Vec<LocaleId> {
        values.iter().map(|v| LocaleId::from(*v)).collect()
    }

    fn project(entries: &[&str]) -> TempDir {
        let temp = TempDir::new().unwrap();
        for entry in entries {
            fs::create_dir(temp.path().join(entry)).unwrap();
        }
        temp
    }

    #[test]
    fn scan_filters_strips_and_sorts() {
        let temp = project(&["fr.lproj", "en.lproj", "Base.lproj", "Assets.xcassets", "es.lproj"]);
        fs::write(temp.path().join("Info.plist"), "").unwrap();

        let source = DirLocaleSource::new(temp.path(), DEFAULT_SUFFIX);
        assert_eq!(
            source.project_locales().unwrap(),
            ids(&["Base", "en", "es", "fr"])
        );
    }

    #[test]
    fn scan_strips_only_the_trailing_suffix() {
        let temp = project(&["a.lproj.lproj"]);
        let source = DirLocaleSource::new(temp.path(), DEFAULT_SUFFIX);
        assert_eq!(source.project_locales().unwrap(), ids(&["a.lproj"]));
    }

    #[test]
    fn scan_skips_bare_suffix() {
        let temp = project(&[".lproj", "en.lproj"]);
        let source = DirLocaleSource::new(temp.path(), DEFAULT_SUFFIX);
        assert_eq!(source.project_locales().unwrap(), ids(&["en"]));
    }

    #[test]
    fn empty_directory_is_not_an_error() {
        let temp = TempDir::new().unwrap();
        let source = DirLocaleSource::new(temp.path(), DEFAULT_SUFFIX);
        assert!(source.project_locales().unwrap().is_empty());
    }

    #[test]
    fn missing_directory_is_unreadable() {
        let temp = TempDir::new().unwrap();
        let source = DirLocaleSource::new(temp.path().join("missing"), DEFAULT_SUFFIX);
        assert!(matches!(
            source.project_locales(),
            Err(SourceError::Unreadable { .. })
        ));
    }

    struct CountingSource {
        calls: Cell<usize>,
        fail_first: bool,
    }

    impl LocaleSource for CountingSource {
        fn project_locales(&self) -> Result<Vec<LocaleId>, SourceError> {
            self.calls.set(self.calls.get() + 1);
            if self.fail_first && self.calls.get() == 1 {
                return Err(SourceError::Unreadable {
                    path: PathBuf::from("x"),
                    message: "flaky".into(),
                });
            }
            Ok(ids(&["en"]))
        }
    }

    #[test]
    fn cache_scans_once() {
        let cached = CachedLocaleSource::new(CountingSource {
            calls: Cell::new(0),
            fail_first: false,
        });

        assert_eq!(cached.project_locales().unwrap(), ids(&["en"]));
        assert_eq!(cached.project_locales().unwrap(), ids(&["en"]));
        assert_eq!(cached.inner().calls.get(), 1);
    }

    #[test]
    fn cache_does_not_keep_failures() {
        let cached = CachedLocaleSource::new(CountingSource {
            calls: Cell::new(0),
            fail_first: true,
        });

        assert!(cached.project_locales().is_err());
        assert_eq!(cached.project_locales().unwrap(), ids(&["en"]));
        assert_eq!(cached.inner().calls.get(), 2);
    }
}
