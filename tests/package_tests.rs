//! Integration tests for .wgt packaging

use sectv_tizen_packager::cli::OutputManager;
use sectv_tizen_packager::error::PackagerError;
use sectv_tizen_packager::tizen::{PACKAGE_FILE_NAME, archive_dir, package};
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;
use tempfile::TempDir;

fn write(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn build_tree(root: &Path) {
    write(&root.join("config.xml"), "<widget/>");
    write(&root.join(".project"), "<projectDescription/>");
    write(&root.join("index.html"), "<html></html>");
    write(&root.join("js/lib/app.js"), "console.log('tizen');");
}

fn entry_names(archive: &Path) -> BTreeSet<String> {
    let mut zip = zip::ZipArchive::new(File::open(archive).unwrap()).unwrap();
    (0..zip.len())
        .map(|i| zip.by_index(i).unwrap().name().to_string())
        .collect()
}

#[tokio::test]
async fn test_package_archives_whole_tree() {
    let dir = TempDir::new().unwrap();
    let build = dir.path().join("build");
    let dest = dir.path().join("out/nested");
    build_tree(&build);

    let artifact = package(&build, &dest, &OutputManager::new(true))
        .await
        .unwrap();

    assert_eq!(artifact.path, dest.join(PACKAGE_FILE_NAME));
    assert_eq!(fs::read_dir(&dest).unwrap().count(), 1);

    let names = entry_names(&artifact.path);
    let expected: BTreeSet<String> = [
        ".project",
        "config.xml",
        "index.html",
        "js/",
        "js/lib/",
        "js/lib/app.js",
    ]
    .into_iter()
    .map(String::from)
    .collect();
    assert_eq!(names, expected);
    assert_eq!(artifact.entries, expected.len());

    let mut zip = zip::ZipArchive::new(File::open(&artifact.path).unwrap()).unwrap();
    let mut contents = String::new();
    zip.by_name("js/lib/app.js")
        .unwrap()
        .read_to_string(&mut contents)
        .unwrap();
    assert_eq!(contents, "console.log('tizen');");
}

#[tokio::test]
async fn test_package_reports_size_and_checksum() {
    let dir = TempDir::new().unwrap();
    let build = dir.path().join("build");
    build_tree(&build);

    let artifact = package(&build, dir.path(), &OutputManager::new(true))
        .await
        .unwrap();

    let bytes = fs::read(&artifact.path).unwrap();
    assert_eq!(artifact.size, bytes.len() as u64);
    assert_eq!(artifact.checksum, hex::encode(Sha256::digest(&bytes)));
    assert_eq!(artifact.checksum.len(), 64);
}

#[tokio::test]
async fn test_archive_inside_build_is_not_self_included() {
    let dir = TempDir::new().unwrap();
    let build = dir.path().join("build");
    build_tree(&build);

    let artifact = package(&build, &build, &OutputManager::new(true))
        .await
        .unwrap();

    let names = entry_names(&artifact.path);
    assert!(!names.contains(PACKAGE_FILE_NAME));
    assert!(names.contains("config.xml"));
}

#[tokio::test]
async fn test_package_missing_build_is_archive_failure() {
    let dir = TempDir::new().unwrap();
    let result = package(
        &dir.path().join("missing"),
        &dir.path().join("out"),
        &OutputManager::new(true),
    )
    .await;

    match result {
        Err(PackagerError::ArchiveFailed { archive, .. }) => {
            assert!(archive.ends_with(PACKAGE_FILE_NAME));
        }
        other => panic!("expected ArchiveFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_archive_dir_empty_tree() {
    let dir = TempDir::new().unwrap();
    let build = dir.path().join("empty");
    fs::create_dir(&build).unwrap();

    let artifact = archive_dir(&build, &dir.path().join("empty.wgt"))
        .await
        .unwrap();

    assert_eq!(artifact.entries, 0);
    assert!(entry_names(&artifact.path).is_empty());
}

#[cfg(unix)]
#[tokio::test]
async fn test_package_follows_directory_symlinks() {
    let dir = TempDir::new().unwrap();
    let build = dir.path().join("build");
    write(&build.join("index.html"), "<html></html>");
    write(&dir.path().join("shared/util.js"), "util");
    std::os::unix::fs::symlink("../shared", build.join("lib")).unwrap();

    let artifact = package(&build, &dir.path().join("out"), &OutputManager::new(true))
        .await
        .unwrap();

    let names = entry_names(&artifact.path);
    assert!(names.contains("lib/"));
    assert!(names.contains("lib/util.js"));

    let mut zip = zip::ZipArchive::new(File::open(&artifact.path).unwrap()).unwrap();
    let mut contents = String::new();
    zip.by_name("lib/util.js")
        .unwrap()
        .read_to_string(&mut contents)
        .unwrap();
    assert_eq!(contents, "util");
}

#[cfg(unix)]
#[tokio::test]
async fn test_symlink_cycle_fails_without_leaving_archive() {
    let dir = TempDir::new().unwrap();
    let build = dir.path().join("build");
    let dest = dir.path().join("out");
    write(&build.join("index.html"), "<html></html>");
    // nested/loop points back at the build root
    fs::create_dir_all(build.join("nested")).unwrap();
    std::os::unix::fs::symlink("..", build.join("nested/loop")).unwrap();

    let result = package(&build, &dest, &OutputManager::new(true)).await;

    assert!(matches!(result, Err(PackagerError::ArchiveFailed { .. })));
    assert!(!dest.join(PACKAGE_FILE_NAME).exists());
    assert!(!dest.join(format!("{}.tmp", PACKAGE_FILE_NAME)).exists());
}
