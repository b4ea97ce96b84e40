//! Browse the filtered, paginated catalog.

use anyhow::Result;
use catalog_engine::prelude::{Price, Scope};
use serde::Serialize;

use super::{load_view, BrowseArgs};
use crate::context::Context;
use crate::output::{liked_marker, page_window, price_label};

#[derive(Serialize)]
struct BrowseItem<'a> {
    id: &'a str,
    name: &'a str,
    price: Price,
    #[serde(skip_serializing_if = "Option::is_none")]
    discount_price: Option<Price>,
    liked: bool,
}

#[derive(Serialize)]
struct BrowseReport<'a> {
    items: Vec<BrowseItem<'a>>,
    page: usize,
    total_pages: usize,
    page_numbers: Vec<usize>,
    total: usize,
    filtered: usize,
    liked: usize,
}

/// Run the browse command.
pub async fn run(args: BrowseArgs, ctx: &Context) -> Result<()> {
    let (_backend, mut view) = load_view(ctx).await?;

    for category in &args.categories {
        view.toggle_category(category);
    }
    for brand in &args.brands {
        view.toggle_brand(brand);
    }
    for color in &args.colors {
        view.toggle_color(color);
    }
    for size in &args.sizes {
        view.toggle_size(size);
    }
    if let Some(min) = args.min_price {
        view.set_min_price(Price::from_decimal(min));
    }
    if let Some(max) = args.max_price {
        view.set_max_price(Price::from_decimal(max));
    }
    if args.liked {
        view.set_scope(Scope::Liked);
    }
    if let Some(page_size) = args.page_size {
        view.set_page_size(page_size);
    }
    view.set_page(args.page);

    let page = view.visible_page();
    let report = BrowseReport {
        items: page
            .items
            .iter()
            .map(|p| BrowseItem {
                id: p.id.as_str(),
                name: &p.name,
                price: p.price,
                discount_price: p.discount_price,
                liked: view.liked().contains(&p.id),
            })
            .collect(),
        page: page.pagination.page,
        total_pages: page.pagination.total_pages,
        page_numbers: page.page_numbers.clone(),
        total: view.total_count(),
        filtered: page.pagination.total,
        liked: view.liked_count(),
    };

    if ctx.output.is_json() {
        ctx.output.emit(&report)?;
        return Ok(());
    }

    ctx.output.header("Catalog");
    if report.items.is_empty() {
        ctx.output.info("No products match the current filters.");
    } else {
        ctx.output.product_header();
        for item in &report.items {
            ctx.output.product_row(
                &liked_marker(item.liked),
                item.id,
                item.name,
                &price_label(item.price, item.discount_price),
            );
        }
    }

    ctx.output.info("");
    ctx.output.info(&format!(
        "Showing {}-{} of {} ({} in catalog, {} liked)",
        page.pagination.start_item(),
        page.pagination.end_item(),
        report.filtered,
        report.total,
        report.liked
    ));
    ctx.output.info(&format!(
        "Page {} of {}: {}",
        report.page,
        report.total_pages,
        page_window(&report.page_numbers, report.page)
    ));
    if view.selection().has_active_filters() {
        ctx.output.info("Filters active. Drop the flags to see everything.");
    }

    Ok(())
}
