//! Crawler discovery
//!
//! Discovery builds the [`CrawlerRegistry`] for one invocation:
//! - Plugin roots are scanned for the plugin namespace (e.g. `crawlers`)
//! - A namespace is either a package directory or a single module manifest
//! - Each module's exported symbols are resolved against the [`SymbolCatalog`]
//! - Crawler symbols are registered by name, later sources overriding earlier ones
//!
//! Failures are contained: a missing namespace or a broken module is recorded
//! in [`Discovery::failures`] and the scan moves on.

mod catalog;
mod manifest;
mod registry;
mod source;

pub use catalog::{crawler_name, Symbol, SymbolCatalog, CAPABILITY_SYMBOL};
pub use manifest::{load_module, LoadedModule, ModuleManifest, INITIALIZER};
pub use registry::CrawlerRegistry;
pub use source::{locate_namespace, package_modules, NamespaceLayout};

use crate::config::DiscoveryConfig;
use crate::crawler::CrawlerFactory;
use crate::{ImportFailure, ImportFailureReason, CONTROL_LOG_TARGET};
use std::path::Path;

/// Outcome of one discovery run
#[derive(Debug, Default)]
pub struct Discovery {
    /// Crawlers found, by name
    pub registry: CrawlerRegistry,

    /// Every namespace or module that could not be loaded
    pub failures: Vec<ImportFailure>,
}

impl Discovery {
    /// Returns true if every source and module loaded
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn record(&mut self, failure: ImportFailure) {
        tracing::warn!("{}", failure);
        self.failures.push(failure);
    }
}

/// Collects every crawler exported under the configured plugin roots
///
/// Roots are given highest priority first. They are scanned in reverse so
/// that a crawler defined in a higher-priority root (the workspace) replaces
/// one with the same name from a lower-priority root (the installed plugins).
///
/// # Arguments
///
/// * `config` - Plugin roots and namespace
/// * `catalog` - Symbols linked into this binary
///
/// # Returns
///
/// The registry together with the list of import failures. An empty registry
/// is not an error here; an unknown crawler name is reported by the driver.
pub fn collect_crawlers(config: &DiscoveryConfig, catalog: &SymbolCatalog) -> Discovery {
    let mut discovery = Discovery::default();
    let roots = config.plugin_roots();

    for root in roots.iter().rev() {
        scan_root(root, &config.namespace, catalog, &mut discovery);
    }

    tracing::info!(
        target: CONTROL_LOG_TARGET,
        "Discovered {} crawler(s) in {} root(s), {} import failure(s)",
        discovery.registry.len(),
        roots.len(),
        discovery.failures.len()
    );

    discovery
}

fn scan_root(root: &Path, namespace: &str, catalog: &SymbolCatalog, discovery: &mut Discovery) {
    tracing::debug!(
        target: CONTROL_LOG_TARGET,
        "Scanning {} for namespace '{}'",
        root.display(),
        namespace
    );

    let layout = match locate_namespace(root, namespace) {
        Ok(layout) => layout,
        Err(failure) => {
            discovery.record(failure);
            return;
        }
    };

    match layout {
        NamespaceLayout::Package { dir, initializer } => {
            // A broken initializer takes the whole package down, like any failed import
            match manifest::load_package(&initializer) {
                Ok(package) => tracing::debug!(
                    target: CONTROL_LOG_TARGET,
                    "Loading package {}{}",
                    dir.display(),
                    package
                        .package
                        .description
                        .map(|d| format!(" ({})", d))
                        .unwrap_or_default()
                ),
                Err(reason) => {
                    discovery.record(ImportFailure::new(initializer, reason));
                    return;
                }
            }

            let modules = match package_modules(&dir) {
                Ok(modules) => modules,
                Err(failure) => {
                    discovery.record(failure);
                    return;
                }
            };

            for path in modules {
                import_module(&path, catalog, discovery);
            }
        }
        NamespaceLayout::Module(path) => import_module(&path, catalog, discovery),
    }
}

fn import_module(path: &Path, catalog: &SymbolCatalog, discovery: &mut Discovery) {
    let loaded = load_module(path)
        .and_then(|module| resolve_exports(&module, catalog).map(|found| (module, found)));

    match loaded {
        Ok((module, found)) => {
            for factory in found {
                tracing::debug!(
                    target: CONTROL_LOG_TARGET,
                    "Found crawler {} in module {} ({})",
                    factory.name(),
                    module.name,
                    path.display()
                );
                discovery.registry.insert(factory);
            }
        }
        Err(reason) => discovery.record(ImportFailure::new(path, reason)),
    }
}

/// Resolves a module's exports, keeping only crawler implementations
///
/// An export that is not linked into the binary fails the whole module.
fn resolve_exports(
    module: &LoadedModule,
    catalog: &SymbolCatalog,
) -> Result<Vec<CrawlerFactory>, ImportFailureReason> {
    let mut found = Vec::new();
    for export in &module.exports {
        let symbol = catalog
            .resolve(export)
            .ok_or_else(|| ImportFailureReason::UnresolvedSymbol(export.clone()))?;

        match symbol.as_crawler() {
            Some(factory) => found.push(factory.clone()),
            None => tracing::trace!(
                target: CONTROL_LOG_TARGET,
                "Skipping non-crawler symbol {} in module {}",
                export,
                module.name
            ),
        }
    }
    Ok(found)
}
