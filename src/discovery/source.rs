use crate::discovery::manifest::{INITIALIZER, MANIFEST_EXTENSION};
use crate::{ImportFailure, ImportFailureReason};
use std::path::{Path, PathBuf};

/// How a plugin namespace is laid out under one root
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamespaceLayout {
    /// `<root>/<namespace>/` with a `mod.toml` initializer
    Package { dir: PathBuf, initializer: PathBuf },
    /// `<root>/<namespace>.toml`
    Module(PathBuf),
}

/// Finds the plugin namespace under a root
///
/// A package directory takes precedence over a single module file of the same
/// name.
///
/// # Arguments
///
/// * `root` - The plugin root to look in
/// * `namespace` - The namespace name (e.g. `crawlers`)
///
/// # Returns
///
/// * `Ok(NamespaceLayout)` - Where the namespace lives
/// * `Err(ImportFailure)` - Neither a package nor a module exists, or a
///   directory is present without an initializer
pub fn locate_namespace(root: &Path, namespace: &str) -> Result<NamespaceLayout, ImportFailure> {
    let dir = root.join(namespace);
    let initializer = dir.join(INITIALIZER);
    if initializer.is_file() {
        return Ok(NamespaceLayout::Package { dir, initializer });
    }

    let module = root.join(format!("{}.{}", namespace, MANIFEST_EXTENSION));
    if module.is_file() {
        return Ok(NamespaceLayout::Module(module));
    }

    if dir.is_dir() {
        Err(ImportFailure::new(dir, ImportFailureReason::NotAPackage))
    } else {
        Err(ImportFailure::new(
            root,
            ImportFailureReason::NamespaceMissing(namespace.to_string()),
        ))
    }
}

/// Lists the module manifests of a package, initializer excluded
///
/// Modules are returned in file name order so repeated scans of the same
/// directory register crawlers in the same order.
pub fn package_modules(dir: &Path) -> Result<Vec<PathBuf>, ImportFailure> {
    let entries = std::fs::read_dir(dir).map_err(|e| ImportFailure::new(dir, e))?;

    let mut modules = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| ImportFailure::new(dir, e))?.path();
        let is_manifest = path.extension().is_some_and(|ext| ext == MANIFEST_EXTENSION);
        let is_initializer = path.file_name().is_some_and(|name| name == INITIALIZER);
        if path.is_file() && is_manifest && !is_initializer {
            modules.push(path);
        }
    }

    modules.sort();
    Ok(modules)
}
