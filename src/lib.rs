//! crawlkit: a small framework for pluggable crawlers
//!
//! Crawlers are independently authored fetch-and-process jobs. They are linked
//! into a [`SymbolCatalog`], exported at run time by plugin manifests found under
//! an ordered list of plugin roots, resolved by name and run one per invocation.
//! Network access goes through [`Transport`], which performs exactly one fetch
//! per call with enforced timeouts and reports timing telemetry.

pub mod cli;
pub mod config;
pub mod crawler;
pub mod discovery;
pub mod driver;
pub mod scaffold;
pub mod transport;

use std::path::PathBuf;
use thiserror::Error;

/// Tracing target of the network log channel (transport activity)
pub const NETWORK_LOG_TARGET: &str = "crawlkit::network";

/// Tracing target of the control log channel (discovery and driver activity)
pub const CONTROL_LOG_TARGET: &str = "crawlkit::control";

/// Main error type for crawlkit operations
#[derive(Debug, Error)]
pub enum CrawlkitError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Driver(#[from] driver::DriverError),

    #[error("Scaffold error: {0}")]
    Scaffold(#[from] scaffold::ScaffoldError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Classification of a transport-level failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkErrorKind {
    /// Connect or total timeout expired
    Timeout,
    /// Name resolution, connection refused, TLS handshake failure
    Connect,
    /// Redirect limit exceeded or redirect loop
    Redirect,
    /// The response body could not be read to completion
    Body,
    /// Any other failure while sending the request
    Request,
    /// The request was rejected before anything was sent
    InvalidRequest,
}

impl std::fmt::Display for NetworkErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Timeout => "timeout",
            Self::Connect => "connect",
            Self::Redirect => "redirect",
            Self::Body => "body",
            Self::Request => "request",
            Self::InvalidRequest => "invalid request",
        };
        f.write_str(s)
    }
}

/// A fetch that could not be completed
///
/// The message always contains the text of the underlying HTTP client error so
/// the failure stays diagnosable after translation. No partial response is
/// ever attached.
#[derive(Debug, Error)]
#[error("Network error ({kind}) for {url}: {message}")]
pub struct NetworkError {
    pub kind: NetworkErrorKind,
    pub url: String,
    pub message: String,
    #[source]
    pub source: Option<reqwest::Error>,
}

impl NetworkError {
    /// Wraps a low-level client error, classifying it by what failed
    pub fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            NetworkErrorKind::Timeout
        } else if err.is_connect() {
            NetworkErrorKind::Connect
        } else if err.is_redirect() {
            NetworkErrorKind::Redirect
        } else if err.is_body() || err.is_decode() {
            NetworkErrorKind::Body
        } else if err.is_builder() {
            NetworkErrorKind::InvalidRequest
        } else {
            NetworkErrorKind::Request
        };

        // reqwest's Display stops at the outermost layer; keep the whole chain
        let mut message = err.to_string();
        let mut cause = std::error::Error::source(&err);
        while let Some(inner) = cause {
            message.push_str(": ");
            message.push_str(&inner.to_string());
            cause = inner.source();
        }

        Self {
            kind,
            url: url.to_string(),
            message,
            source: Some(err),
        }
    }

    /// Builds an error for a request rejected before any I/O happened
    pub fn invalid_request(url: &str, message: impl Into<String>) -> Self {
        Self {
            kind: NetworkErrorKind::InvalidRequest,
            url: url.to_string(),
            message: message.into(),
            source: None,
        }
    }

    /// Returns true if the failure was a timeout expiry
    pub fn is_timeout(&self) -> bool {
        self.kind == NetworkErrorKind::Timeout
    }
}

/// Why a plugin namespace or module could not be loaded
#[derive(Debug, Error)]
pub enum ImportFailureReason {
    #[error("namespace '{0}' not found")]
    NamespaceMissing(String),

    #[error("directory has no mod.toml initializer")]
    NotAPackage,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid manifest: {0}")]
    Manifest(#[from] toml::de::Error),

    #[error("exported symbol '{0}' is not linked into this binary")]
    UnresolvedSymbol(String),
}

/// A single plugin source or module that failed to load
///
/// Import failures are isolated: one broken module never prevents the
/// others from being discovered.
#[derive(Debug, Error)]
#[error("Failed to import {}: {reason}", .location.display())]
pub struct ImportFailure {
    pub location: PathBuf,
    #[source]
    pub reason: ImportFailureReason,
}

impl ImportFailure {
    pub fn new(location: impl Into<PathBuf>, reason: impl Into<ImportFailureReason>) -> Self {
        Self {
            location: location.into(),
            reason: reason.into(),
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for crawlkit operations
pub type Result<T> = std::result::Result<T, CrawlkitError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for transport operations
pub type NetworkResult<T> = std::result::Result<T, NetworkError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Crawler, CrawlerFactory};
pub use discovery::{collect_crawlers, CrawlerRegistry, Discovery, SymbolCatalog};
pub use driver::{run_crawler, Driver, DriverError, DriverState};
pub use transport::{Request, Response, Timings, Transport};
