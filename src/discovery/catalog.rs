//! Symbols linked into the running binary
//!
//! Rust cannot import code by name at run time, so plugin crates register
//! their types here when the binary is assembled. Plugin manifests then refer
//! to these symbols by path; only symbols that are crawler types end up in the
//! registry, keyed by the last segment of their path. Two plugins can therefore
//! ship different `FooCrawler` types (`local::FooCrawler`,
//! `vendor::FooCrawler`) and the manifests decide which one a run gets.

use crate::crawler::{Crawler, CrawlerFactory};
use std::collections::HashMap;

/// Name under which the capability itself is always present in a catalog
pub const CAPABILITY_SYMBOL: &str = "Crawler";

const CAPABILITY_PATH: &str = "crawlkit::Crawler";

/// Registry name of a symbol path: its last `::` segment
pub fn crawler_name(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path)
}

/// What a linked symbol is
#[derive(Debug, Clone)]
pub enum Symbol {
    /// A concrete crawler implementation
    Crawler(CrawlerFactory),
    /// The `Crawler` capability itself; never registered
    Capability,
    /// Anything else a plugin exports (helpers, constants, shared types)
    Other,
}

impl Symbol {
    /// Returns the factory if this symbol qualifies as a crawler implementation
    pub fn as_crawler(&self) -> Option<&CrawlerFactory> {
        match self {
            Self::Crawler(factory) => Some(factory),
            Self::Capability | Self::Other => None,
        }
    }
}

/// Table of every symbol a plugin manifest may export
#[derive(Debug, Clone)]
pub struct SymbolCatalog {
    symbols: HashMap<String, Symbol>,
}

impl Default for SymbolCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolCatalog {
    /// Creates a catalog holding only the capability symbol
    pub fn new() -> Self {
        let mut symbols = HashMap::new();
        symbols.insert(CAPABILITY_SYMBOL.to_string(), Symbol::Capability);
        symbols.insert(CAPABILITY_PATH.to_string(), Symbol::Capability);
        Self { symbols }
    }

    /// Links crawler type `C` under a symbol path such as `local::FooCrawler`
    ///
    /// The crawler is registered as the last path segment (`FooCrawler`).
    /// Linking the same path twice keeps the last type.
    pub fn link<C: Crawler + Default + 'static>(mut self, path: &str) -> Self {
        let factory = CrawlerFactory::of::<C>(crawler_name(path));
        self.symbols.insert(path.to_string(), Symbol::Crawler(factory));
        self
    }

    /// Links a non-crawler symbol; manifests may export it, discovery skips it
    pub fn link_other(mut self, path: &str) -> Self {
        self.symbols.insert(path.to_string(), Symbol::Other);
        self
    }

    pub fn resolve(&self, path: &str) -> Option<&Symbol> {
        self.symbols.get(path)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
