//! Show or edit a product's card layout.

use anyhow::{bail, Result};
use catalog_engine::prelude::{LayoutPatch, PresentationOverride, ProductId, SaveOutcome};

use super::{load_view, LayoutArgs, LayoutCommand};
use crate::context::Context;

/// Run the layout command.
pub async fn run(args: LayoutArgs, ctx: &Context) -> Result<()> {
    match args.command {
        LayoutCommand::Show { id } => show_layout(&ProductId::new(id), ctx).await,
        LayoutCommand::Set {
            id,
            image_size,
            align,
            show_description,
            show_price,
            border,
        } => {
            let patch = LayoutPatch {
                image_size,
                text_alignment: align,
                show_description,
                show_price,
                border_style: border,
            };
            set_layout(&ProductId::new(id), patch, ctx).await
        }
    }
}

async fn show_layout(id: &ProductId, ctx: &Context) -> Result<()> {
    let backend = ctx.backend()?;
    let layout = backend.layouts().fetch_layout(id).await?;

    if ctx.output.is_json() {
        ctx.output.emit(&layout)?;
        return Ok(());
    }

    ctx.output.header(&format!("Layout for {}", id));
    print_layout(&layout, ctx);
    Ok(())
}

async fn set_layout(id: &ProductId, patch: LayoutPatch, ctx: &Context) -> Result<()> {
    if patch.is_empty() {
        bail!("Nothing to change. Pass at least one layout option.");
    }

    let (backend, mut view) = load_view(ctx).await?;

    let before = view.open_editor(id)?;
    let dirty = view.update_layout(id, &patch)?;
    ctx.output.debug(&format!("draft dirty: {}", dirty));

    let spinner = ctx.output.spinner("Saving layout");
    let outcome = view.save_layout(id, backend.layouts()).await;
    spinner.finish_and_clear();

    let outcome = outcome?;
    backend.persist().await?;

    let layout = view.effective_layout(id).unwrap_or(before);
    if ctx.output.is_json() {
        ctx.output.emit(&serde_json::json!({
            "id": id,
            "outcome": outcome_label(&outcome),
            "layout": layout,
        }))?;
        return Ok(());
    }

    match outcome {
        SaveOutcome::Skipped => ctx.output.info("Layout unchanged; nothing saved."),
        SaveOutcome::Saved(_) => ctx.output.success(&format!("Saved layout for {}", id)),
        SaveOutcome::NotModified(_) => {
            ctx.output.info(&format!("Layout for {} was already stored", id))
        }
    }
    print_layout(&layout, ctx);

    Ok(())
}

fn outcome_label(outcome: &SaveOutcome) -> &'static str {
    match outcome {
        SaveOutcome::Skipped => "skipped",
        SaveOutcome::Saved(_) => "saved",
        SaveOutcome::NotModified(_) => "not-modified",
    }
}

fn print_layout(layout: &PresentationOverride, ctx: &Context) {
    ctx.output.kv("image size", layout.image_size.as_str());
    ctx.output.kv("text alignment", layout.text_alignment.as_str());
    ctx.output
        .kv("show description", &layout.show_description.to_string());
    ctx.output.kv("show price", &layout.show_price.to_string());
    ctx.output.kv("border style", layout.border_style.as_str());
}
