//! Configuration module for crawlkit
//!
//! This module handles loading, parsing, and validating the optional
//! `crawlkit.toml` file. Every section has defaults, so a missing file means
//! "scan `./crawlers`, keep the network and control log channels quiet".
//!
//! # Example
//!
//! ```no_run
//! use crawlkit::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawlkit.toml")).unwrap();
//! println!("Plugin namespace: {}", config.discovery.namespace);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, DiscoveryConfig, LoggingConfig, DEFAULT_CONFIG_FILE, DEFAULT_NAMESPACE};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_or_default, parse_config};
