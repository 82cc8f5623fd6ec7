//! Command-line surface
//!
//! Two commands:
//! - `crawl <CRAWLER_ID>` discovers crawlers and runs the requested one
//! - `start-project <PROJECT_NAME>` creates a crawler project from the builtin template
//!
//! Crawler projects reuse the same surface by calling [`main_with`] with their
//! own [`SymbolCatalog`].

use crate::config::{compute_config_hash, load_config, load_config_or_default, Config, DEFAULT_CONFIG_FILE};
use crate::discovery::SymbolCatalog;
use crate::driver::{Driver, DriverError};
use crate::scaffold::{start_project, Template};
use crate::{ConfigResult, CrawlkitError, Result, CONTROL_LOG_TARGET, NETWORK_LOG_TARGET};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// crawlkit: run pluggable crawlers
#[derive(Parser, Debug)]
#[command(name = "crawlkit")]
#[command(version)]
#[command(about = "Run pluggable crawlers", long_about = None)]
pub struct Cli {
    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a crawler by name
    Crawl(CrawlArgs),

    /// Create a new crawler project in the current directory
    StartProject(StartProjectArgs),
}

#[derive(Args, Debug)]
pub struct CrawlArgs {
    /// Name of the crawler to run
    #[arg(value_name = "CRAWLER_ID")]
    pub crawler_id: String,

    /// Show transport (network) logs
    #[arg(short = 'n', long)]
    pub network_logs: bool,

    /// Show discovery and driver (control) logs
    #[arg(long)]
    pub control_logs: bool,

    /// Path to the configuration file [default: ./crawlkit.toml if present]
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct StartProjectArgs {
    /// Name of the project directory to create
    #[arg(value_name = "PROJECT_NAME")]
    pub project_name: String,
}

/// Parses the process arguments and runs the selected command
pub fn main_with(catalog: SymbolCatalog) -> ExitCode {
    run(Cli::parse(), catalog)
}

/// Runs an already parsed command line
pub fn run(cli: Cli, catalog: SymbolCatalog) -> ExitCode {
    match cli.command {
        Command::Crawl(args) => run_command_crawl(args, cli.verbose, &catalog),
        Command::StartProject(args) => run_command_start_project(args, cli.verbose),
    }
}

/// Builds the log filter
///
/// Verbosity sets the base level. The network and control channels are
/// switched off unless enabled, regardless of verbosity.
pub fn log_filter(verbose: u8, network: bool, control: bool) -> EnvFilter {
    let base = match verbose {
        0 => "crawlkit=info,warn",
        1 => "crawlkit=debug,info",
        2 => "crawlkit=trace,debug",
        _ => "trace",
    };
    let channel = |enabled: bool| if enabled { "debug" } else { "off" };

    EnvFilter::new(format!(
        "{},{}={},{}={}",
        base,
        NETWORK_LOG_TARGET,
        channel(network),
        CONTROL_LOG_TARGET,
        channel(control)
    ))
}

/// Sets up the logging/tracing subscriber
pub fn setup_logging(verbose: u8, network: bool, control: bool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbose, network, control))
        .with_writer(std::io::stderr)
        .with_thread_ids(false)
        .with_file(false)
        .try_init();
}

fn load_crawl_config(path: Option<&Path>) -> ConfigResult<(Config, Option<PathBuf>)> {
    match path {
        Some(path) => Ok((load_config(path)?, Some(path.to_path_buf()))),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            let found = default.exists().then(|| default.clone());
            Ok((load_config_or_default(&default)?, found))
        }
    }
}

/// Loads configuration, discovers crawlers and runs the requested one
fn crawl(args: &CrawlArgs, verbose: u8, catalog: &SymbolCatalog) -> Result<()> {
    let (config, config_path) = load_crawl_config(args.config.as_deref())?;

    setup_logging(
        verbose,
        args.network_logs || config.logging.network,
        args.control_logs || config.logging.control,
    );

    if let Some(path) = &config_path {
        match compute_config_hash(path) {
            Ok(hash) => tracing::debug!("Configuration {} (hash: {})", path.display(), hash),
            Err(e) => tracing::warn!("Could not hash configuration {}: {}", path.display(), e),
        }
    }

    let runtime = tokio::runtime::Runtime::new()?;

    let mut driver = Driver::new();
    let failures = driver.discover(&config.discovery, catalog)?;
    if !failures.is_empty() {
        tracing::debug!("{} plugin source(s) failed to import", failures.len());
    }

    runtime.block_on(driver.run(&args.crawler_id))?;
    Ok(())
}

/// Handles `crawl`: maps the outcome to the process exit status
fn run_command_crawl(args: CrawlArgs, verbose: u8, catalog: &SymbolCatalog) -> ExitCode {
    match crawl(&args, verbose, catalog) {
        Ok(()) => ExitCode::SUCCESS,
        Err(CrawlkitError::Config(e)) => {
            eprintln!("Failed to load configuration: {}", e);
            ExitCode::FAILURE
        }
        Err(CrawlkitError::Driver(DriverError::PluginNotFound(name))) => {
            eprintln!("Could not load {} crawler", name);
            ExitCode::FAILURE
        }
        Err(CrawlkitError::Driver(DriverError::Crawler(e))) => {
            tracing::error!("Crawler {} failed: {:#}", args.crawler_id, e);
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn create_project(args: &StartProjectArgs) -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    Ok(start_project(&Template::builtin(), &cwd, &args.project_name)?)
}

/// Handles `start-project`: copies the builtin template into `./<PROJECT_NAME>`
fn run_command_start_project(args: StartProjectArgs, verbose: u8) -> ExitCode {
    setup_logging(verbose.max(1), false, false);

    match create_project(&args) {
        Ok(dest) => {
            println!("Created project {}", dest.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
