//! `.wgt` archive creation.
//!
//! A `.wgt` is a plain zip of the built tree. Entry names are relative to the
//! build root and always use `/` separators.

use crate::cli::OutputManager;
use crate::error::PackagerError;
use crate::tizen::absolute;
use crate::tizen::error::{Error, ErrorExt, Result};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;

/// File name of the archive inside the package destination
pub const PACKAGE_FILE_NAME: &str = "package.wgt";

/// A created `.wgt` archive.
#[derive(Debug, Clone)]
pub struct PackagedArtifact {
    /// Path of the archive
    pub path: PathBuf,
    /// Size of the archive in bytes
    pub size: u64,
    /// Number of file and directory entries in the archive
    pub entries: usize,
    /// SHA-256 checksum of the archive, lowercase hex
    pub checksum: String,
}

/// Zip a built tree into `dest/package.wgt`.
///
/// `dest` is created when missing; a creation failure is only logged and
/// surfaces as [`PackagerError::ArchiveFailed`] if the archive cannot be written.
pub async fn package(
    build: &Path,
    dest: &Path,
    output: &OutputManager,
) -> crate::Result<PackagedArtifact> {
    output.section("Start packaging Samsung Tizen TV Platform");

    let build = absolute(build)?;
    let dest = absolute(dest)?;

    if let Err(e) = tokio::fs::create_dir_all(&dest).await {
        log::warn!("Could not create {}: {}", dest.display(), e);
    }

    let archive = dest.join(PACKAGE_FILE_NAME);
    let artifact = archive_dir(&build, &archive)
        .await
        .map_err(|source| PackagerError::ArchiveFailed {
            archive: archive.clone(),
            source,
        })?;

    log::info!(
        "Archived {} entries from {} ({} bytes)",
        artifact.entries,
        build.display(),
        artifact.size
    );
    output.success(&format!("Packaged at {}", dest.display()));
    Ok(artifact)
}

/// Zip the contents of `build` into `archive`.
///
/// Runs on the blocking pool. Symlinks are followed; a link cycle is an
/// error. The archive is written next to `archive` as `<name>.tmp` and
/// renamed once complete, so a failure leaves no partial archive behind.
/// `archive` itself is never added, even when it lies inside `build`.
pub async fn archive_dir(build: &Path, archive: &Path) -> Result<PackagedArtifact> {
    let build = build.to_path_buf();
    let archive = archive.to_path_buf();

    tokio::task::spawn_blocking(move || archive_dir_blocking(&build, &archive))
        .await
        .map_err(|e| Error::GenericError(format!("Archive task panicked: {}", e)))?
}

fn archive_dir_blocking(build: &Path, archive: &Path) -> Result<PackagedArtifact> {
    if !build.is_dir() {
        crate::bail!("{:?} is not a directory", build);
    }

    let staging = staging_path(archive);
    let entries = match write_archive(build, &staging, archive) {
        Ok(entries) => entries,
        Err(e) => {
            if let Err(remove_err) = std::fs::remove_file(&staging)
                && remove_err.kind() != io::ErrorKind::NotFound
            {
                log::warn!("Could not remove {}: {}", staging.display(), remove_err);
            }
            return Err(e);
        }
    };
    std::fs::rename(&staging, archive).fs_context("installing archive", archive)?;

    let (size, checksum) = checksum_file(archive)?;
    Ok(PackagedArtifact {
        path: archive.to_path_buf(),
        size,
        entries,
        checksum,
    })
}

/// Writes the zip to `staging` and returns the number of entries.
fn write_archive(build: &Path, staging: &Path, archive: &Path) -> Result<usize> {
    let file = File::create(staging).fs_context("creating archive", staging)?;
    let mut zip = zip::ZipWriter::new(BufWriter::new(file));
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let mut entries = 0;
    for entry in walkdir::WalkDir::new(build)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry?;
        if entry.path() == archive || entry.path() == staging {
            continue;
        }
        let rel_path = entry.path().strip_prefix(build)?;
        if rel_path.as_os_str().is_empty() {
            continue;
        }
        let name = zip_entry_name(rel_path);

        if entry.file_type().is_dir() {
            zip.add_directory(name.as_str(), options)?;
        } else {
            zip.start_file(name.as_str(), options)?;
            let mut reader = BufReader::new(
                File::open(entry.path()).fs_context("opening file", entry.path())?,
            );
            io::copy(&mut reader, &mut zip).fs_context("compressing file", entry.path())?;
        }
        log::debug!("Archived {}", name);
        entries += 1;
    }

    let mut writer = zip.finish()?;
    io::Write::flush(&mut writer).fs_context("flushing archive", staging)?;
    Ok(entries)
}

fn staging_path(archive: &Path) -> PathBuf {
    let mut name = archive
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    archive.with_file_name(name)
}

fn zip_entry_name(rel_path: &Path) -> String {
    rel_path
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Size and SHA-256 of a file
fn checksum_file(path: &Path) -> Result<(u64, String)> {
    let mut reader = BufReader::new(File::open(path).fs_context("opening archive", path)?);
    let mut hasher = Sha256::new();
    let size = io::copy(&mut reader, &mut hasher).fs_context("hashing archive", path)?;
    Ok((size, hex::encode(hasher.finalize())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zip_entry_name_uses_forward_slashes() {
        let rel = Path::new("js").join("lib").join("app.js");
        assert_eq!(zip_entry_name(&rel), "js/lib/app.js");
    }

    #[test]
    fn test_staging_path_sits_next_to_archive() {
        let staging = staging_path(Path::new("/out/package.wgt"));
        assert_eq!(staging, PathBuf::from("/out/package.wgt.tmp"));
    }
}
