// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! Pokedex CLI - search and browse the Pokémon catalog from the command line.
//!
//! # Examples
//!
//! ```bash
//! # First page of the whole catalog
//! pokedex
//!
//! # Fire types whose name contains "char"
//! pokedex page --search char --type fire
//!
//! # Keep loading pages until the filter is exhausted
//! pokedex browse --type electric --all
//!
//! # Type terms line by line; each settled term is searched
//! pokedex search --type fire
//!
//! # Detail view
//! pokedex show pikachu
//!
//! # JSON output
//! pokedex --format json --pretty types
//! ```

mod commands;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use pokedex_store::LogLevel;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commands::{browse, config, page, search, show, types};

// ============================================================================
// CLI Definition
// ============================================================================

/// Pokedex CLI - search and browse the Pokémon catalog.
#[derive(Parser)]
#[command(name = "pokedex")]
#[command(about = "Search and browse the Pokémon catalog")]
#[command(long_about = r"
Pokedex looks up entries in the public Pokémon catalog service.

Searches match names by case-insensitive substring and can be combined
with a type filter. Results are paginated; `browse` keeps loading pages
the way an infinite-scrolling list would.

Examples:
  pokedex                               # First page, no filters
  pokedex page --search char --type fire
  pokedex browse --search saur --all
  pokedex show 25
  pokedex types
")]
#[command(version)]
#[command(author = "Pokedex Contributors")]
pub struct Cli {
    /// Subcommand to run. If none, runs 'page' by default.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Settings file to use instead of the default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (no logging).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Fetch a single page (default if no command specified).
    #[command(visible_alias = "p")]
    Page(page::PageArgs),

    /// Load pages incrementally and show everything accumulated.
    #[command(visible_alias = "b")]
    Browse(browse::BrowseArgs),

    /// Read search terms from stdin and show results as typing settles.
    Search(search::SearchArgs),

    /// Show one entry in detail.
    #[command(visible_alias = "s")]
    Show(show::ShowArgs),

    /// List type names.
    #[command(visible_alias = "t")]
    Types,

    /// Manage configuration.
    Config(config::ConfigArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[repr(i32)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// Any failure.
    Error = 1,
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool, level: LogLevel) {
    if quiet {
        return;
    }

    let filter = if verbose {
        EnvFilter::new("pokedex=debug,info")
    } else {
        EnvFilter::new(format!("pokedex={level}"))
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let settings = match commands::load_settings(&cli).await {
        Ok(settings) => settings,
        Err(e) => exit_with(&e),
    };
    setup_logging(cli.verbose, cli.quiet, settings.log_level);

    let result = match &cli.command {
        Some(Commands::Page(args)) => page::run(args, &settings, &cli).await,
        Some(Commands::Browse(args)) => browse::run(args, &settings, &cli).await,
        Some(Commands::Search(args)) => search::run(args, &settings, &cli).await,
        Some(Commands::Show(args)) => show::run(args, &settings, &cli).await,
        Some(Commands::Types) => types::run(&settings, &cli).await,
        Some(Commands::Config(args)) => config::run(args, &settings, &cli).await,
        None => page::run(&page::PageArgs::default(), &settings, &cli).await,
    };

    if let Err(e) = result {
        exit_with(&e);
    }

    std::process::exit(ExitCode::Success as i32);
}

fn exit_with(error: &anyhow::Error) -> ! {
    eprintln!("Error: {error:#}");
    std::process::exit(ExitCode::Error as i32);
}
