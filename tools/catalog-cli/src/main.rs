//! Catalog CLI - Browse, search and lay out a product catalog.
//!
//! Commands:
//! - `catalog browse` - Filter and page through the catalog
//! - `catalog facets` - List facet values with counts
//! - `catalog search` - Debounced live search
//! - `catalog like` - Toggle a liked product
//! - `catalog layout` - Show or edit a product's card layout
//! - `catalog config` - Manage configuration

mod backend;
mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BrowseArgs, ConfigArgs, FacetsArgs, LayoutArgs, LikeArgs, SearchArgs};

/// Catalog CLI - Browse and manage a product catalog
#[derive(Parser)]
#[command(name = "catalog")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Serve the catalog from a JSON fixture instead of the backend
    #[arg(long, global = true)]
    fixture: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter and page through the catalog
    Browse(BrowseArgs),

    /// List facet values with product counts
    Facets(FacetsArgs),

    /// Search products by name
    Search(SearchArgs),

    /// Toggle a liked product
    Like(LikeArgs),

    /// Show or edit a product's card layout
    Layout(LayoutArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "catalog=debug,catalog_engine=debug,catalog_data=debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let ctx = context::Context::load(cli.config.as_deref(), cli.fixture.as_deref(), output)?;

    // Execute command
    let result = match cli.command {
        Commands::Browse(args) => commands::browse::run(args, &ctx).await,
        Commands::Facets(args) => commands::facets::run(args, &ctx).await,
        Commands::Search(args) => commands::search::run(args, &ctx).await,
        Commands::Like(args) => commands::like::run(args, &ctx).await,
        Commands::Layout(args) => commands::layout::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&e);
        std::process::exit(1);
    }

    Ok(())
}
