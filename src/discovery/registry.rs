use crate::crawler::CrawlerFactory;
use crate::CONTROL_LOG_TARGET;
use std::collections::BTreeMap;

/// Mapping from crawler name to implementation
///
/// Built fresh by every discovery run and read-only afterwards. Inserting a
/// name that is already present replaces the earlier entry.
#[derive(Debug, Clone, Default)]
pub struct CrawlerRegistry {
    crawlers: BTreeMap<String, CrawlerFactory>,
}

impl CrawlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a crawler, replacing any earlier entry with the same name
    ///
    /// # Returns
    ///
    /// The replaced factory, if there was one
    pub fn insert(&mut self, factory: CrawlerFactory) -> Option<CrawlerFactory> {
        let replaced = self.crawlers.insert(factory.name().to_string(), factory);
        if let Some(old) = &replaced {
            tracing::debug!(
                target: CONTROL_LOG_TARGET,
                "Crawler {} ({}) overridden by a later source",
                old.name(),
                old.type_name()
            );
        }
        replaced
    }

    pub fn get(&self, name: &str) -> Option<&CrawlerFactory> {
        self.crawlers.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.crawlers.contains_key(name)
    }

    /// Crawler names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.crawlers.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CrawlerFactory)> {
        self.crawlers.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.crawlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.crawlers.is_empty()
    }
}
