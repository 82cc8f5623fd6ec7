//! Integration tests for the command line
//!
//! These run the compiled `crawlkit` binary in temporary working directories.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn crawlkit(cwd: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("crawlkit").unwrap();
    cmd.current_dir(cwd.path());
    cmd
}

#[test]
fn test_unknown_crawler_exits_non_zero() {
    let workspace = TempDir::new().unwrap();
    fs::create_dir(workspace.path().join("crawlers")).unwrap();
    fs::write(workspace.path().join("crawlers/mod.toml"), "").unwrap();
    fs::write(
        workspace.path().join("crawlers/helpers.toml"),
        "[module]\nexports = [\"Crawler\"]\n",
    )
    .unwrap();

    crawlkit(&workspace)
        .args(["crawl", "Nonexistent"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Could not load Nonexistent crawler"));
}

#[test]
fn test_unknown_crawler_without_plugins() {
    let workspace = TempDir::new().unwrap();

    crawlkit(&workspace)
        .args(["crawl", "Nonexistent", "--control-logs"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Nonexistent"));
}

#[test]
fn test_crawl_requires_identifier() {
    let workspace = TempDir::new().unwrap();
    crawlkit(&workspace).arg("crawl").assert().failure();
}

#[test]
fn test_invalid_config_is_reported() {
    let workspace = TempDir::new().unwrap();
    fs::write(workspace.path().join("crawlkit.toml"), "[discovery]\nnamespace = \"../up\"\n").unwrap();

    crawlkit(&workspace)
        .args(["crawl", "FooCrawler"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to load configuration"));
}

#[test]
fn test_explicit_config_must_exist() {
    let workspace = TempDir::new().unwrap();

    crawlkit(&workspace)
        .args(["crawl", "FooCrawler", "--config", "missing.toml"])
        .assert()
        .failure();
}

#[test]
fn test_start_project() {
    let workspace = TempDir::new().unwrap();

    crawlkit(&workspace)
        .args(["start-project", "spiders"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created project"));

    let project = workspace.path().join("spiders");
    let manifest = fs::read_to_string(project.join("Cargo.toml")).unwrap();
    assert!(manifest.contains("name = \"spiders\""));
    assert!(project.join("crawlers/mod.toml").is_file());
    assert!(project.join("crawlkit.toml").is_file());
}

#[test]
fn test_start_project_refuses_existing_destination() {
    let workspace = TempDir::new().unwrap();
    fs::create_dir(workspace.path().join("spiders")).unwrap();

    crawlkit(&workspace)
        .args(["start-project", "spiders"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("already exists"));

    assert!(fs::read_dir(workspace.path().join("spiders")).unwrap().next().is_none());
}
