//! Debounced live search.

use anyhow::{bail, Result};
use catalog_engine::prelude::{SearchController, SearchStatus};

use super::SearchArgs;
use crate::context::Context;
use crate::output::price_label;

/// Run the search command.
///
/// Each argument is fed as the next state of the search box, as if typed.
pub async fn run(args: SearchArgs, ctx: &Context) -> Result<()> {
    let backend = ctx.backend()?;
    let handle = SearchController::new(backend.query(), ctx.config.engine.debounce()).spawn();

    for text in &args.text {
        ctx.output.debug(&format!("input: {:?}", text));
        handle.input(text.as_str());
    }

    let last = args.text.last().map(String::as_str).unwrap_or_default();
    let spinner = ctx.output.spinner(&format!("Searching for \"{}\"", last.trim()));
    let snapshot = handle.wait_settled(last).await;
    spinner.finish_and_clear();
    handle.shutdown().await;

    let Some(snapshot) = snapshot else {
        bail!("Search stopped before settling");
    };

    if ctx.output.is_json() {
        ctx.output.emit(&snapshot)?;
        return Ok(());
    }

    ctx.output.debug(&format!(
        "generation {} ({})",
        snapshot.generation,
        snapshot.status.as_str()
    ));

    if snapshot.status == SearchStatus::Idle && !last.trim().is_empty() {
        ctx.output.warn("Search failed; showing no results.");
        return Ok(());
    }
    if snapshot.results.is_empty() {
        ctx.output.info("No results.");
        return Ok(());
    }

    ctx.output.header(&format!("Results for \"{}\"", last.trim()));
    ctx.output.product_header();
    for product in &snapshot.results {
        ctx.output.product_row(
            "",
            product.id.as_str(),
            &product.name,
            &price_label(product.price, product.discount_price),
        );
    }
    ctx.output.info("");
    ctx.output.info(&format!("{} result(s)", snapshot.results.len()));

    Ok(())
}
