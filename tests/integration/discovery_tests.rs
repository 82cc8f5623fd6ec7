//! Integration tests for discovery and the driver
//!
//! Plugin roots are laid out in temporary directories and resolved against
//! catalogs of test crawlers.

use async_trait::async_trait;
use crawlkit::config::DiscoveryConfig;
use crawlkit::{collect_crawlers, run_crawler, Crawler, DriverError, ImportFailureReason, SymbolCatalog};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

static FOO_RUNS: AtomicUsize = AtomicUsize::new(0);
static LOCAL_RUNS: AtomicUsize = AtomicUsize::new(0);
static INSTALLED_RUNS: AtomicUsize = AtomicUsize::new(0);

#[derive(Default)]
struct FooCrawler;

#[async_trait]
impl Crawler for FooCrawler {
    async fn run(&mut self) -> anyhow::Result<()> {
        FOO_RUNS.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Default)]
struct LocalShared;

#[async_trait]
impl Crawler for LocalShared {
    async fn run(&mut self) -> anyhow::Result<()> {
        LOCAL_RUNS.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Default)]
struct InstalledShared;

#[async_trait]
impl Crawler for InstalledShared {
    async fn run(&mut self) -> anyhow::Result<()> {
        INSTALLED_RUNS.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Default)]
struct BarCrawler;

#[async_trait]
impl Crawler for BarCrawler {
    async fn run(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}

fn catalog() -> SymbolCatalog {
    SymbolCatalog::new()
        .link::<FooCrawler>("foo::FooCrawler")
        .link::<BarCrawler>("bar::BarCrawler")
        .link::<LocalShared>("local::SharedCrawler")
        .link::<InstalledShared>("installed::SharedCrawler")
        .link_other("foo::parse_listing")
}

/// Creates `<root>/crawlers/` with an initializer and the given modules
fn write_package(root: &Path, modules: &[(&str, &str)]) -> PathBuf {
    let dir = root.join("crawlers");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("mod.toml"), "[package]\ndescription = \"test crawlers\"\n").unwrap();
    for (file, content) in modules {
        fs::write(dir.join(file), content).unwrap();
    }
    dir
}

fn config_for(roots: &[&Path]) -> DiscoveryConfig {
    DiscoveryConfig {
        roots: roots.iter().map(|p| p.to_path_buf()).collect(),
        ..DiscoveryConfig::default()
    }
}

#[tokio::test]
async fn test_foo_crawler_end_to_end() {
    let workspace = TempDir::new().unwrap();
    write_package(
        workspace.path(),
        &[(
            "foo.toml",
            "[module]\nexports = [\"Crawler\", \"foo::FooCrawler\", \"foo::parse_listing\"]\n",
        )],
    );

    let discovery = collect_crawlers(&config_for(&[workspace.path()]), &catalog());
    assert!(discovery.is_clean(), "failures: {:?}", discovery.failures);
    assert_eq!(discovery.registry.names().collect::<Vec<_>>(), vec!["FooCrawler"]);

    let before = FOO_RUNS.load(Ordering::SeqCst);
    run_crawler("FooCrawler", &discovery.registry).await.expect("crawler failed");
    assert_eq!(FOO_RUNS.load(Ordering::SeqCst), before + 1);
}

#[tokio::test]
async fn test_unknown_crawler_is_not_found() {
    let workspace = TempDir::new().unwrap();
    write_package(
        workspace.path(),
        &[("foo.toml", "[module]\nexports = [\"foo::FooCrawler\"]\n")],
    );

    let discovery = collect_crawlers(&config_for(&[workspace.path()]), &catalog());
    let before = FOO_RUNS.load(Ordering::SeqCst);

    let err = run_crawler("Nonexistent", &discovery.registry).await.unwrap_err();

    assert!(matches!(err, DriverError::PluginNotFound(ref name) if name == "Nonexistent"));
    assert!(err.to_string().contains("Nonexistent"));
    assert_eq!(FOO_RUNS.load(Ordering::SeqCst), before);
}

#[test]
fn test_broken_module_does_not_block_others() {
    let workspace = TempDir::new().unwrap();
    let dir = write_package(
        workspace.path(),
        &[
            ("a_broken.toml", "[module\nexports = "),
            ("b_unlinked.toml", "[module]\nexports = [\"ghost::GhostCrawler\"]\n"),
            ("c_foo.toml", "[module]\nexports = [\"foo::FooCrawler\"]\n"),
            ("d_bar.toml", "[module]\nexports = [\"bar::BarCrawler\"]\n"),
        ],
    );

    let discovery = collect_crawlers(&config_for(&[workspace.path()]), &catalog());

    assert_eq!(
        discovery.registry.names().collect::<Vec<_>>(),
        vec!["BarCrawler", "FooCrawler"]
    );
    assert_eq!(discovery.failures.len(), 2);
    assert_eq!(discovery.failures[0].location, dir.join("a_broken.toml"));
    assert!(matches!(discovery.failures[0].reason, ImportFailureReason::Manifest(_)));
    assert_eq!(discovery.failures[1].location, dir.join("b_unlinked.toml"));
    assert!(matches!(
        discovery.failures[1].reason,
        ImportFailureReason::UnresolvedSymbol(ref s) if s == "ghost::GhostCrawler"
    ));
}

#[test]
fn test_missing_source_does_not_block_others() {
    let workspace = TempDir::new().unwrap();
    let empty = TempDir::new().unwrap();
    write_package(
        workspace.path(),
        &[("foo.toml", "[module]\nexports = [\"foo::FooCrawler\"]\n")],
    );

    let discovery = collect_crawlers(&config_for(&[workspace.path(), empty.path()]), &catalog());

    assert!(discovery.registry.contains("FooCrawler"));
    assert_eq!(discovery.failures.len(), 1);
    assert!(matches!(
        discovery.failures[0].reason,
        ImportFailureReason::NamespaceMissing(_)
    ));
}

#[test]
fn test_empty_plugin_location_gives_empty_registry() {
    let workspace = TempDir::new().unwrap();
    write_package(workspace.path(), &[]);

    let discovery = collect_crawlers(&config_for(&[workspace.path()]), &catalog());

    assert!(discovery.registry.is_empty());
    assert!(discovery.is_clean());
}

#[test]
fn test_discovery_is_idempotent() {
    let workspace = TempDir::new().unwrap();
    write_package(
        workspace.path(),
        &[
            ("foo.toml", "[module]\nexports = [\"foo::FooCrawler\"]\n"),
            ("bar.toml", "[module]\nexports = [\"bar::BarCrawler\", \"local::SharedCrawler\"]\n"),
        ],
    );
    let config = config_for(&[workspace.path()]);

    let first = collect_crawlers(&config, &catalog());
    let second = collect_crawlers(&config, &catalog());

    let first_entries: Vec<_> = first.registry.iter().map(|(n, f)| (n.to_string(), f.type_id())).collect();
    let second_entries: Vec<_> = second.registry.iter().map(|(n, f)| (n.to_string(), f.type_id())).collect();
    assert_eq!(first_entries.len(), 3);
    assert_eq!(first_entries, second_entries);
}

#[tokio::test]
async fn test_workspace_root_shadows_installed_root() {
    let workspace = TempDir::new().unwrap();
    let installed = TempDir::new().unwrap();
    write_package(
        workspace.path(),
        &[("shared.toml", "[module]\nexports = [\"local::SharedCrawler\"]\n")],
    );
    write_package(
        installed.path(),
        &[(
            "shared.toml",
            "[module]\nexports = [\"installed::SharedCrawler\", \"bar::BarCrawler\"]\n",
        )],
    );

    let config = DiscoveryConfig {
        roots: vec![workspace.path().to_path_buf()],
        installed_root: Some(installed.path().to_path_buf()),
        ..DiscoveryConfig::default()
    };
    let discovery = collect_crawlers(&config, &catalog());

    // Installed-only crawlers stay visible
    assert!(discovery.registry.contains("BarCrawler"));
    assert_eq!(discovery.registry.len(), 2);

    let local_before = LOCAL_RUNS.load(Ordering::SeqCst);
    let installed_before = INSTALLED_RUNS.load(Ordering::SeqCst);
    run_crawler("SharedCrawler", &discovery.registry).await.unwrap();
    assert_eq!(LOCAL_RUNS.load(Ordering::SeqCst), local_before + 1);
    assert_eq!(INSTALLED_RUNS.load(Ordering::SeqCst), installed_before);
}

#[test]
fn test_later_module_wins_within_package() {
    let workspace = TempDir::new().unwrap();
    write_package(
        workspace.path(),
        &[
            ("a.toml", "[module]\nexports = [\"installed::SharedCrawler\"]\n"),
            ("b.toml", "[module]\nexports = [\"local::SharedCrawler\"]\n"),
        ],
    );

    let discovery = collect_crawlers(&config_for(&[workspace.path()]), &catalog());
    let winner = discovery.registry.get("SharedCrawler").unwrap();
    assert!(winner.type_name().ends_with("LocalShared"));
}

#[test]
fn test_single_module_namespace() {
    let workspace = TempDir::new().unwrap();
    fs::write(
        workspace.path().join("crawlers.toml"),
        "[module]\nexports = [\"foo::FooCrawler\"]\n",
    )
    .unwrap();

    let discovery = collect_crawlers(&config_for(&[workspace.path()]), &catalog());
    assert!(discovery.registry.contains("FooCrawler"));
}

#[test]
fn test_custom_namespace() {
    let workspace = TempDir::new().unwrap();
    fs::create_dir(workspace.path().join("spiders")).unwrap();
    fs::write(workspace.path().join("spiders/mod.toml"), "").unwrap();
    fs::write(
        workspace.path().join("spiders/bar.toml"),
        "[module]\nexports = [\"bar::BarCrawler\"]\n",
    )
    .unwrap();

    let config = DiscoveryConfig {
        namespace: "spiders".to_string(),
        roots: vec![workspace.path().to_path_buf()],
        installed_root: None,
    };
    let discovery = collect_crawlers(&config, &catalog());
    assert!(discovery.registry.contains("BarCrawler"));
}
