//! {{ project_name }} crawlers

mod example;

use crawlkit::SymbolCatalog;
use std::process::ExitCode;

fn main() -> ExitCode {
    let catalog = SymbolCatalog::new().link::<example::ExampleCrawler>("example::ExampleCrawler");
    crawlkit::cli::main_with(catalog)
}
