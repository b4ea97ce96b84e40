//! List facet values with product counts.

use anyhow::Result;

use super::{load_view, FacetsArgs};
use crate::context::Context;

/// Run the facets command.
pub async fn run(args: FacetsArgs, ctx: &Context) -> Result<()> {
    let (_backend, view) = load_view(ctx).await?;
    let mut options = view.facets();

    if args.used_only {
        for facet in [
            &mut options.categories,
            &mut options.brands,
            &mut options.colors,
            &mut options.sizes,
        ] {
            facet.values.retain(|v| v.count > 0);
        }
    }

    if ctx.output.is_json() {
        ctx.output.emit(&options)?;
        return Ok(());
    }

    for facet in options.facets() {
        ctx.output.header(&facet.name);
        if facet.values.is_empty() {
            ctx.output.info("(none)");
            continue;
        }
        for value in &facet.values {
            ctx.output.facet_value(value);
        }
    }

    ctx.output.header("Price");
    match options.price_bounds {
        Some((low, high)) => ctx.output.kv("range", &format!("{} - {}", low, high)),
        None => ctx.output.info("(empty catalog)"),
    }

    Ok(())
}
