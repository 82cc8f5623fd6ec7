use serde::Deserialize;
use std::path::PathBuf;

/// File looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "crawlkit.toml";

/// Plugin namespace scanned when none is configured
pub const DEFAULT_NAMESPACE: &str = "crawlers";

/// Main configuration structure for crawlkit
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub discovery: DiscoveryConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where crawler plugins are looked up
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiscoveryConfig {
    /// Name of the plugin namespace (package directory or module manifest)
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Plugin roots, highest priority first
    #[serde(default = "default_roots")]
    pub roots: Vec<PathBuf>,

    /// Location of installed plugins; always scanned with the lowest priority
    #[serde(rename = "installed-root", default)]
    pub installed_root: Option<PathBuf>,
}

impl DiscoveryConfig {
    /// All plugin roots in priority order, installed root last
    pub fn plugin_roots(&self) -> Vec<PathBuf> {
        self.roots
            .iter()
            .cloned()
            .chain(self.installed_root.iter().cloned())
            .collect()
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            roots: default_roots(),
            installed_root: None,
        }
    }
}

/// Log channel switches
///
/// Both channels are off by default; the command line can turn them on.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Transport activity (`crawlkit::network`)
    #[serde(default)]
    pub network: bool,

    /// Discovery and driver activity (`crawlkit::control`)
    #[serde(default)]
    pub control: bool,
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

// The working directory is the workspace root
fn default_roots() -> Vec<PathBuf> {
    vec![PathBuf::from(".")]
}
