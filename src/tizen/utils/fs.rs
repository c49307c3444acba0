//! File system utilities for building the Tizen tree.
//!
//! Provides overwrite copies with automatic directory creation,
//! symlink preservation, and per-entry failure collection.

use crate::bail;
use crate::error::CopyFailure;
use crate::tizen::error::{Error, ErrorExt, Result};
use std::{
    collections::HashSet,
    ffi::OsStr,
    io,
    path::{Path, PathBuf},
};
use tokio::fs;

/// Entries handled by one copy step.
#[derive(Debug, Default)]
pub struct CopyOutcome {
    /// Files, directories and links written to the destination
    pub copied: usize,
    /// Entries left alone because the destination path is protected
    pub skipped: usize,
    /// Entries that could not be copied
    pub failures: Vec<CopyFailure>,
}

impl CopyOutcome {
    fn failed(path: PathBuf, error: Error) -> Self {
        Self {
            failures: vec![CopyFailure { path, error }],
            ..Self::default()
        }
    }
}

/// Creates every missing directory from the filesystem root down to `path`.
pub async fn ensure_dir_chain(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .await
        .fs_context("creating directory", path)
}

/// Copies a regular file from one path to another, creating any parent
/// directories of the destination path as necessary.
///
/// An existing destination file is overwritten.
/// Fails if the source path is a directory or doesn't exist.
pub async fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if !from.exists() {
        bail!("{:?} does not exist", from);
    }
    if !from.is_file() {
        bail!("{:?} is not a file", from);
    }
    if let Some(dest_dir) = to.parent() {
        fs::create_dir_all(dest_dir)
            .await
            .fs_context("creating directory", dest_dir)?;
    }
    fs::copy(from, to).await.fs_context("copying file", from)?;
    Ok(())
}

/// Recursively copies the contents of `from` into `to`, overwriting existing files.
///
/// Top-level entries whose name starts with `.` are not copied, matching a
/// shell `from/*` expansion. Paths relative to `to` listed in `protected` are
/// never written. Every entry is attempted; failures are collected in the
/// returned [`CopyOutcome`].
pub async fn copy_dir_contents(
    from: &Path,
    to: &Path,
    protected: &HashSet<PathBuf>,
) -> CopyOutcome {
    let source = from.to_path_buf();
    let from = from.to_path_buf();
    let to = to.to_path_buf();
    let protected = protected.clone();

    // Offload blocking work to dedicated thread pool
    tokio::task::spawn_blocking(move || copy_dir_contents_blocking(&from, &to, &protected))
        .await
        .unwrap_or_else(|e| {
            CopyOutcome::failed(
                source,
                Error::GenericError(format!("Directory copy task panicked: {}", e)),
            )
        })
}

fn copy_dir_contents_blocking(
    from: &Path,
    to: &Path,
    protected: &HashSet<PathBuf>,
) -> CopyOutcome {
    if !from.is_dir() {
        return CopyOutcome::failed(
            from.to_path_buf(),
            Error::GenericError(format!("{from:?} is not a directory")),
        );
    }

    let entries = match std::fs::read_dir(from).fs_context("reading directory", from) {
        Ok(entries) => entries,
        Err(error) => return CopyOutcome::failed(from.to_path_buf(), error),
    };

    let mut outcome = CopyOutcome::default();
    let mut roots = Vec::new();
    for entry in entries {
        match entry {
            Ok(entry) if is_hidden(&entry.file_name()) => {
                log::debug!("Skipping hidden entry {}", entry.path().display());
            }
            Ok(entry) => roots.push(entry.path()),
            Err(e) => outcome.failures.push(CopyFailure {
                path: from.to_path_buf(),
                error: Error::Fs {
                    context: "reading directory",
                    path: from.to_path_buf(),
                    error: e,
                },
            }),
        }
    }
    roots.sort();

    for root in roots {
        for entry in walkdir::WalkDir::new(&root) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| root.clone());
                    outcome.failures.push(CopyFailure {
                        path,
                        error: e.into(),
                    });
                    continue;
                }
            };

            match copy_entry(from, to, &entry, protected) {
                Ok(true) => outcome.copied += 1,
                Ok(false) => outcome.skipped += 1,
                Err(error) => outcome.failures.push(CopyFailure {
                    path: entry.path().to_path_buf(),
                    error,
                }),
            }
        }
    }

    outcome
}

/// Copies one walked entry. Returns `false` when the destination is protected.
fn copy_entry(
    from: &Path,
    to: &Path,
    entry: &walkdir::DirEntry,
    protected: &HashSet<PathBuf>,
) -> Result<bool> {
    debug_assert!(entry.path().starts_with(from));
    let rel_path = entry.path().strip_prefix(from)?;
    if protected.contains(rel_path) {
        log::debug!("Keeping script file {}", rel_path.display());
        return Ok(false);
    }
    let dest_path = to.join(rel_path);

    if entry.file_type().is_symlink() {
        let target = std::fs::read_link(entry.path()).fs_context("reading symlink", entry.path())?;
        remove_existing_file(&dest_path)?;
        if entry.path().is_dir() {
            symlink_dir(&target, &dest_path)
        } else {
            symlink_file(&target, &dest_path)
        }
        .fs_context("creating symlink", &dest_path)?;
    } else if entry.file_type().is_dir() {
        std::fs::create_dir_all(&dest_path).fs_context("creating directory", &dest_path)?;
    } else {
        std::fs::copy(entry.path(), &dest_path).fs_context("copying file", entry.path())?;
    }

    Ok(true)
}

/// Removes a file or link at `path` so a new link can take its place.
fn remove_existing_file(path: &Path) -> Result<()> {
    match std::fs::symlink_metadata(path) {
        Ok(meta) if !meta.is_dir() => std::fs::remove_file(path).fs_context("removing file", path),
        Ok(_) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::Fs {
            context: "inspecting file",
            path: path.to_path_buf(),
            error: e,
        }),
    }
}

fn is_hidden(name: &OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

/// Makes a symbolic link to a directory.
#[cfg(unix)]
fn symlink_dir(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(src, dst)
}

/// Makes a symbolic link to a directory.
#[cfg(windows)]
fn symlink_dir(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_dir(src, dst)
}

/// Makes a symbolic link to a file.
#[cfg(unix)]
fn symlink_file(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(src, dst)
}

/// Makes a symbolic link to a file.
#[cfg(windows)]
fn symlink_file(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(src, dst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(path: &Path, contents: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }

    #[tokio::test]
    async fn test_copy_dir_contents_skips_hidden_top_level() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        write(&src.path().join("index.html"), "<html/>");
        write(&src.path().join("js/app.js"), "app");
        write(&src.path().join("js/.keep"), "");
        write(&src.path().join(".git/HEAD"), "ref");

        let outcome = copy_dir_contents(src.path(), dst.path(), &HashSet::new()).await;

        assert!(outcome.failures.is_empty(), "{:?}", outcome.failures);
        assert!(dst.path().join("index.html").exists());
        assert!(dst.path().join("js/app.js").exists());
        // Only the top level is filtered.
        assert!(dst.path().join("js/.keep").exists());
        assert!(!dst.path().join(".git").exists());
    }

    #[tokio::test]
    async fn test_copy_dir_contents_respects_protected_paths() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        write(&src.path().join("foo.js"), "from www");
        write(&dst.path().join("foo.js"), "from scripts");

        let protected: HashSet<PathBuf> = [PathBuf::from("foo.js")].into_iter().collect();
        let outcome = copy_dir_contents(src.path(), dst.path(), &protected).await;

        assert_eq!(outcome.skipped, 1);
        assert_eq!(
            std::fs::read_to_string(dst.path().join("foo.js")).unwrap(),
            "from scripts"
        );
    }

    #[tokio::test]
    async fn test_copy_dir_contents_missing_source() {
        let dst = TempDir::new().unwrap();
        let missing = dst.path().join("nope");

        let outcome = copy_dir_contents(&missing, dst.path(), &HashSet::new()).await;

        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].path, missing);
    }

    #[tokio::test]
    async fn test_copy_file_creates_parents_and_overwrites() {
        let dir = TempDir::new().unwrap();
        let from = dir.path().join("src.js");
        let to = dir.path().join("out/nested/dst.js");
        write(&from, "new");
        write(&to, "old");

        copy_file(&from, &to).await.unwrap();

        assert_eq!(std::fs::read_to_string(&to).unwrap(), "new");
    }

    #[tokio::test]
    async fn test_copy_file_rejects_directory() {
        let dir = TempDir::new().unwrap();
        let err = copy_file(dir.path(), &dir.path().join("x")).await.unwrap_err();
        assert!(err.to_string().contains("is not a file"));
    }
}
