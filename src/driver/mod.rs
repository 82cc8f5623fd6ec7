//! Execution driver
//!
//! The driver resolves one crawler name against the registry, builds the
//! crawler and runs it. Its life cycle per invocation:
//!
//! ```text
//! Idle -> Discovering -> Resolved | NotFound
//! Resolved -> Instantiated -> Running -> Completed | CrawlerRaised
//! ```
//!
//! `NotFound`, `Completed` and `CrawlerRaised` are terminal; a driver never
//! retries or restarts a crawler.

use crate::config::DiscoveryConfig;
use crate::discovery::{collect_crawlers, CrawlerRegistry, SymbolCatalog};
use crate::{ImportFailure, CONTROL_LOG_TARGET};
use std::fmt;
use thiserror::Error;

/// Errors reported by the driver
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("Could not load {0} crawler")]
    PluginNotFound(String),

    /// Error returned by the crawler's `run`, passed through untouched
    #[error(transparent)]
    Crawler(anyhow::Error),

    #[error("Invalid driver transition: {from} -> {to}")]
    InvalidTransition { from: DriverState, to: DriverState },
}

/// Where a driver is in its life cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DriverState {
    // ===== Active States =====
    /// Nothing has happened yet
    Idle,

    /// Plugin roots are being scanned
    Discovering,

    /// The requested name was found in the registry
    Resolved,

    /// The crawler instance has been built
    Instantiated,

    /// The crawler's `run` is executing
    Running,

    // ===== Terminal States =====
    /// The requested name is not in the registry
    NotFound,

    /// `run` returned successfully
    Completed,

    /// `run` returned an error
    CrawlerRaised,
}

impl DriverState {
    /// Returns true if no further transition is possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::NotFound | Self::Completed | Self::CrawlerRaised)
    }

    /// Checks whether moving to `next` is allowed
    pub fn can_transition_to(&self, next: DriverState) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Discovering)
                | (Self::Discovering, Self::Resolved)
                | (Self::Discovering, Self::NotFound)
                | (Self::Resolved, Self::Instantiated)
                | (Self::Instantiated, Self::Running)
                | (Self::Running, Self::Completed)
                | (Self::Running, Self::CrawlerRaised)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Discovering => "discovering",
            Self::Resolved => "resolved",
            Self::Instantiated => "instantiated",
            Self::Running => "running",
            Self::NotFound => "not_found",
            Self::Completed => "completed",
            Self::CrawlerRaised => "crawler_raised",
        }
    }
}

impl fmt::Display for DriverState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Runs exactly one crawler per invocation
#[derive(Debug)]
pub struct Driver {
    state: DriverState,
    registry: CrawlerRegistry,
}

impl Default for Driver {
    fn default() -> Self {
        Self::new()
    }
}

impl Driver {
    /// Creates an idle driver with an empty registry
    pub fn new() -> Self {
        Self {
            state: DriverState::Idle,
            registry: CrawlerRegistry::new(),
        }
    }

    /// Creates a driver over a registry that was built elsewhere
    pub fn with_registry(registry: CrawlerRegistry) -> Self {
        Self {
            state: DriverState::Discovering,
            registry,
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn registry(&self) -> &CrawlerRegistry {
        &self.registry
    }

    fn transition(&mut self, next: DriverState) -> Result<(), DriverError> {
        if !self.state.can_transition_to(next) {
            return Err(DriverError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        tracing::trace!(target: CONTROL_LOG_TARGET, "Driver {} -> {}", self.state, next);
        self.state = next;
        Ok(())
    }

    /// Builds the registry by scanning the plugin roots
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<ImportFailure>)` - The sources and modules that failed to load
    /// * `Err(DriverError)` - Discovery already ran on this driver
    pub fn discover(
        &mut self,
        config: &DiscoveryConfig,
        catalog: &SymbolCatalog,
    ) -> Result<Vec<ImportFailure>, DriverError> {
        self.transition(DriverState::Discovering)?;
        let discovery = collect_crawlers(config, catalog);
        self.registry = discovery.registry;
        Ok(discovery.failures)
    }

    /// Resolves `name`, builds the crawler and runs it
    ///
    /// # Arguments
    ///
    /// * `name` - Registry name of the crawler
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The crawler completed
    /// * `Err(DriverError::PluginNotFound)` - Nothing registered under `name`; nothing was built
    /// * `Err(DriverError::Crawler)` - The crawler's own error, unchanged
    pub async fn run(&mut self, name: &str) -> Result<(), DriverError> {
        let factory = match self.registry.get(name) {
            Some(factory) => factory.clone(),
            None => {
                self.transition(DriverState::NotFound)?;
                tracing::debug!(
                    target: CONTROL_LOG_TARGET,
                    "Crawler {} not found among {} registered",
                    name,
                    self.registry.len()
                );
                return Err(DriverError::PluginNotFound(name.to_string()));
            }
        };
        self.transition(DriverState::Resolved)?;

        let mut crawler = factory.instantiate();
        self.transition(DriverState::Instantiated)?;

        tracing::info!(
            target: CONTROL_LOG_TARGET,
            "Running crawler {} ({})",
            factory.name(),
            factory.type_name()
        );
        self.transition(DriverState::Running)?;

        match crawler.run().await {
            Ok(()) => {
                self.transition(DriverState::Completed)?;
                tracing::info!(target: CONTROL_LOG_TARGET, "Crawler {} completed", name);
                Ok(())
            }
            Err(e) => {
                self.transition(DriverState::CrawlerRaised)?;
                Err(DriverError::Crawler(e))
            }
        }
    }
}

/// Runs the crawler registered under `name`
///
/// Shorthand for a [`Driver`] over an already built registry.
pub async fn run_crawler(name: &str, registry: &CrawlerRegistry) -> Result<(), DriverError> {
    Driver::with_registry(registry.clone()).run(name).await
}
