//! The crawler capability
//!
//! A crawler is a self-contained fetch-and-process job. The framework only
//! requires two things of it: it can be built without arguments ([`Default`])
//! and it has an async [`Crawler::run`] entry point. Everything a crawler does
//! inside `run` (URL selection, parsing, storage, retries) is up to its author.
//!
//! # Example
//!
//! ```no_run
//! use async_trait::async_trait;
//! use crawlkit::{Crawler, Request, Transport};
//!
//! #[derive(Default)]
//! struct FooCrawler;
//!
//! #[async_trait]
//! impl Crawler for FooCrawler {
//!     async fn run(&mut self) -> anyhow::Result<()> {
//!         let resp = Transport::new()
//!             .process_request(&Request::new("https://example.com/"))
//!             .await?;
//!         println!("{} in {:.3}s", resp.code(), resp.times().total_secs());
//!         Ok(())
//!     }
//! }
//! ```

use async_trait::async_trait;
use std::any::TypeId;
use std::fmt;

/// Contract every crawler plugin satisfies
#[async_trait]
pub trait Crawler: Send {
    /// Runs the crawler to completion
    ///
    /// Errors are returned to the process boundary unchanged; the framework
    /// never retries or restarts a crawler.
    async fn run(&mut self) -> anyhow::Result<()>;
}

fn construct<C: Crawler + Default + 'static>() -> Box<dyn Crawler> {
    Box::new(C::default())
}

/// A constructible crawler implementation, as stored in the registry
#[derive(Clone)]
pub struct CrawlerFactory {
    name: String,
    type_id: TypeId,
    type_name: &'static str,
    construct: fn() -> Box<dyn Crawler>,
}

impl CrawlerFactory {
    /// Creates the factory for crawler type `C` under `name`
    pub fn of<C: Crawler + Default + 'static>(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_id: TypeId::of::<C>(),
            type_name: std::any::type_name::<C>(),
            construct: construct::<C>,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rust type name of the implementation, for diagnostics
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Identity of the implementation type
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Builds a fresh crawler instance with no arguments
    pub fn instantiate(&self) -> Box<dyn Crawler> {
        (self.construct)()
    }

    /// Returns true if both factories build the same implementation type
    pub fn same_implementation(&self, other: &CrawlerFactory) -> bool {
        self.type_id == other.type_id
    }
}

impl fmt::Debug for CrawlerFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrawlerFactory")
            .field("name", &self.name)
            .field("type_name", &self.type_name)
            .finish()
    }
}
