//! core::persist
//!
//! Atomic file replacement.
//!
//! Every file this tool rewrites goes through [`write_atomic`]: contents are
//! written to a sibling temp file, synced, then renamed over the target. A
//! failure at any step leaves the original file untouched.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Path of the temp file used while replacing `path`.
///
/// Lives in the same directory so the final rename stays on one filesystem.
pub fn temp_path(path: &Path) -> PathBuf {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => path.with_extension(format!("{}.tmp", ext)),
        None => path.with_extension("tmp"),
    }
}

/// Replace `path` with `contents` atomically.
///
/// Creates parent directories if needed.
pub fn write_atomic(path: &Path, contents: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let temp = temp_path(path);
    let result = write_and_rename(&temp, path, contents);
    if result.is_err() {
        let _ = fs::remove_file(&temp);
    }
    result
}

fn write_and_rename(temp: &Path, path: &Path, contents: &str) -> io::Result<()> {
    let mut file = fs::File::create(temp)?;
    file.write_all(contents.as_bytes())?;
    file.sync_all()?;
    drop(file);
    fs::rename(temp, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn temp_path_keeps_extension() {
        assert_eq!(
            temp_path(Path::new("dir/bitrise.yml")),
            PathBuf::from("dir/bitrise.yml.tmp")
        );
        assert_eq!(
            temp_path(Path::new("dir/VERSION")),
            PathBuf::from("dir/VERSION.tmp")
        );
    }

    #[test]
    fn replaces_existing_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yml");
        fs::write(&path, "old\n").unwrap();

        write_atomic(&path, "new\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new\n");
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn creates_parent_directories() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/dir/out.txt");

        write_atomic(&path, "content\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "content\n");
    }

    #[test]
    fn failed_rename_leaves_target_untouched() {
        let temp = TempDir::new().unwrap();
        // A directory at the target path makes the rename fail.
        let path = temp.path().join("target.yml");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), "x").unwrap();

        assert!(write_atomic(&path, "new\n").is_err());
        assert!(path.join("keep").exists());
        assert!(!temp_path(&path).exists());
    }
}
