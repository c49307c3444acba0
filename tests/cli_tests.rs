//! End-to-end tests for the sectv_tizen binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn cordova_project(root: &Path) {
    write(
        &root.join("config.xml"),
        r#"<?xml version="1.0"?>
<widget id="com.example.hello" version="2.1.0" xmlns="http://www.w3.org/ns/widgets">
    <name>Hello TV</name>
    <description>Says hello &amp; waves</description>
</widget>"#,
    );
    write(&root.join("www/index.html"), "<html></html>");
    write(
        &root.join("platforms/tizen/www/config.xml.tmpl"),
        r#"<widget id="{{id}}" version="{{version}}"><name>{{name}}</name></widget>"#,
    );
    write(
        &root.join("platforms/tizen/www/project.tmpl"),
        "<projectDescription><name>{{name}}</name></projectDescription>",
    );
    write(&root.join("platforms/tizen/cordova.js"), "// cordova");
}

fn sectv_tizen() -> Command {
    Command::cargo_bin("sectv_tizen").unwrap()
}

#[test]
fn test_build_then_package() {
    let dir = TempDir::new().unwrap();
    cordova_project(dir.path());

    // Accept the host name and generated id, keep the host version, accept description.
    sectv_tizen()
        .current_dir(dir.path())
        .args([
            "build",
            "--www",
            "www",
            "--dest",
            "build/tizen",
            "--platform-repos",
            "platforms/tizen",
            "--script",
            "js/cordova.js=platforms/tizen/cordova.js",
        ])
        .write_stdin("\n\n\n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Start building Samsung Tizen Platform"))
        .stdout(predicate::str::contains("(Hello TV)"))
        .stdout(predicate::str::contains("Built at"));

    let manifest = fs::read_to_string(dir.path().join("build/tizen/config.xml")).unwrap();
    assert!(manifest.contains(r#"version="2.1.0""#));
    assert!(manifest.contains("<name>Hello TV</name>"));
    assert!(dir.path().join("build/tizen/js/cordova.js").exists());

    let userconf = fs::read_to_string(dir.path().join("platforms/userconf.json")).unwrap();
    assert!(userconf.contains("Says hello & waves"));

    sectv_tizen()
        .current_dir(dir.path())
        .args(["package", "--build", "build/tizen", "--dest", "out"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Packaged at"))
        .stdout(predicate::str::contains("sha256:"));

    assert!(dir.path().join("out/package.wgt").is_file());
}

#[test]
fn test_second_build_reuses_cached_metadata() {
    let dir = TempDir::new().unwrap();
    cordova_project(dir.path());
    write(
        &dir.path().join("platforms/userconf.json"),
        r#"{"tizen": {"name": "Cached", "id": "abcde12345", "version": "1.4.2", "description": "old"}}"#,
    );

    sectv_tizen()
        .current_dir(dir.path())
        .args([
            "build",
            "--www",
            "www",
            "--dest",
            "build/tizen",
            "--platform-repos",
            "platforms/tizen",
        ])
        .write_stdin("y\n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("[ Current Information ]"))
        .stdout(predicate::str::contains("(current version is 1.4.2)"));

    let manifest = fs::read_to_string(dir.path().join("build/tizen/config.xml")).unwrap();
    assert!(manifest.contains(r#"version="1.4.3""#));
    assert!(manifest.contains(r#"id="abcde12345""#));
}

#[test]
fn test_build_fails_when_stdin_closes() {
    let dir = TempDir::new().unwrap();
    cordova_project(dir.path());

    sectv_tizen()
        .current_dir(dir.path())
        .args([
            "build",
            "--www",
            "www",
            "--dest",
            "build/tizen",
            "--platform-repos",
            "platforms/tizen",
        ])
        .write_stdin("")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Command 'build' failed"));
}

#[test]
fn test_package_missing_build_dir_fails() {
    let dir = TempDir::new().unwrap();

    sectv_tizen()
        .current_dir(dir.path())
        .args(["package", "--build", "nope", "--dest", "out"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to create archive"));
}

#[test]
fn test_escaping_script_destination_is_rejected() {
    let dir = TempDir::new().unwrap();

    sectv_tizen()
        .current_dir(dir.path())
        .args([
            "build",
            "--www",
            "www",
            "--dest",
            "build",
            "--platform-repos",
            "repo",
            "--script",
            "../evil.js=evil.js",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid arguments"));
}

#[test]
fn test_malformed_script_mapping_is_usage_error() {
    sectv_tizen()
        .args([
            "build",
            "--www",
            "www",
            "--dest",
            "build",
            "--platform-repos",
            "repo",
            "--script",
            "no-equals-sign",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("DEST=SRC"));
}
