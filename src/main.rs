//! crawlkit main entry point
//!
//! The stock binary links no crawlers of its own: `crawl` only finds what
//! plugin manifests export from this catalog, so it is mostly useful for
//! `start-project`. Generated projects call [`crawlkit::cli::main_with`] with
//! their own catalog.

use crawlkit::SymbolCatalog;
use std::process::ExitCode;

fn main() -> ExitCode {
    crawlkit::cli::main_with(SymbolCatalog::new())
}
