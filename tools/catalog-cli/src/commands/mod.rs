//! CLI command implementations.

pub mod browse;
pub mod config;
pub mod facets;
pub mod layout;
pub mod like;
pub mod search;

use anyhow::Result;
use catalog_engine::prelude::{BorderStyle, CatalogView, ImageSize, TextAlignment};
use clap::{Args, Subcommand};

use crate::backend::Backend;
use crate::context::Context;

/// Arguments for the browse command.
#[derive(Args)]
pub struct BrowseArgs {
    /// Only products in this category (repeatable).
    #[arg(long = "category")]
    pub categories: Vec<String>,

    /// Only products of this brand (repeatable).
    #[arg(long = "brand")]
    pub brands: Vec<String>,

    /// Only products in this color (repeatable).
    #[arg(long = "color")]
    pub colors: Vec<String>,

    /// Only products in this size (repeatable).
    #[arg(long = "size")]
    pub sizes: Vec<String>,

    /// Lowest price.
    #[arg(long)]
    pub min_price: Option<f64>,

    /// Highest price.
    #[arg(long)]
    pub max_price: Option<f64>,

    /// Only liked products.
    #[arg(long)]
    pub liked: bool,

    /// Page to show (1-indexed).
    #[arg(short, long, default_value = "1")]
    pub page: usize,

    /// Products per page (default from config).
    #[arg(long)]
    pub page_size: Option<usize>,
}

/// Arguments for the facets command.
#[derive(Args)]
pub struct FacetsArgs {
    /// Hide values no product carries.
    #[arg(long)]
    pub used_only: bool,
}

/// Arguments for the search command.
#[derive(Args)]
pub struct SearchArgs {
    /// Successive states of the search box; the last one is searched.
    #[arg(required = true)]
    pub text: Vec<String>,
}

/// Arguments for the like command.
#[derive(Args)]
pub struct LikeArgs {
    /// Product ID.
    pub id: String,
}

/// Arguments for the layout command.
#[derive(Args)]
pub struct LayoutArgs {
    #[command(subcommand)]
    pub command: LayoutCommand,
}

#[derive(Subcommand)]
pub enum LayoutCommand {
    /// Show the stored layout of a product.
    Show {
        /// Product ID or slug.
        id: String,
    },
    /// Edit and save the layout of a product.
    Set {
        /// Product ID.
        id: String,

        /// Image size (small, medium, large).
        #[arg(long, value_parser = parse_image_size)]
        image_size: Option<ImageSize>,

        /// Text alignment (left, center, right).
        #[arg(long, value_parser = parse_alignment)]
        align: Option<TextAlignment>,

        /// Show the description.
        #[arg(long)]
        show_description: Option<bool>,

        /// Show the price.
        #[arg(long)]
        show_price: Option<bool>,

        /// Border style (none, rounded, shadowed, outlined).
        #[arg(long, value_parser = parse_border)]
        border: Option<BorderStyle>,
    },
}

fn parse_image_size(s: &str) -> Result<ImageSize, String> {
    ImageSize::from_str(s).ok_or_else(|| format!("unknown image size '{}'", s))
}

fn parse_alignment(s: &str) -> Result<TextAlignment, String> {
    TextAlignment::from_str(s).ok_or_else(|| format!("unknown alignment '{}'", s))
}

fn parse_border(s: &str) -> Result<BorderStyle, String> {
    BorderStyle::from_str(s).ok_or_else(|| format!("unknown border style '{}'", s))
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
}

/// Connect and load a catalog view, with a spinner.
pub async fn load_view(ctx: &Context) -> Result<(Backend, CatalogView)> {
    let backend = ctx.backend()?;
    let mut view = ctx.view();

    let spinner = ctx
        .output
        .spinner(&format!("Loading catalog from {}", backend.describe()));
    let loaded = view.load(backend.reader()).await;
    spinner.finish_and_clear();

    let count = loaded?;
    ctx.output.debug(&format!("Loaded {} products", count));
    Ok((backend, view))
}
