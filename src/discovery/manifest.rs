use crate::ImportFailureReason;
use serde::Deserialize;
use std::path::Path;

/// File name of a package initializer
pub const INITIALIZER: &str = "mod.toml";

/// Extension of plugin manifest files
pub const MANIFEST_EXTENSION: &str = "toml";

/// A plugin module manifest
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModuleManifest {
    #[serde(default)]
    pub module: ModuleSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModuleSection {
    /// Module name; defaults to the file stem
    pub name: Option<String>,

    /// Symbols the module exports, in declaration order
    #[serde(default)]
    pub exports: Vec<String>,
}

/// A package initializer (`mod.toml`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageManifest {
    #[serde(default)]
    pub package: PackageSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageSection {
    pub description: Option<String>,
}

/// A parsed module and where it came from
#[derive(Debug, Clone)]
pub struct LoadedModule {
    pub name: String,
    pub exports: Vec<String>,
}

/// Reads and parses a module manifest
pub fn load_module(path: &Path) -> Result<LoadedModule, ImportFailureReason> {
    let content = std::fs::read_to_string(path)?;
    let manifest: ModuleManifest = toml::from_str(&content)?;

    let name = manifest.module.name.unwrap_or_else(|| {
        path.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    });

    Ok(LoadedModule {
        name,
        exports: manifest.module.exports,
    })
}

/// Reads and parses a package initializer
pub fn load_package(path: &Path) -> Result<PackageManifest, ImportFailureReason> {
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}
