//! Toggle a liked product.

use anyhow::{bail, Result};
use catalog_engine::ProductId;

use super::{load_view, LikeArgs};
use crate::context::Context;

/// Run the like command.
pub async fn run(args: LikeArgs, ctx: &Context) -> Result<()> {
    let (_backend, mut view) = load_view(ctx).await?;
    let id = ProductId::new(args.id);

    let Some(name) = view.store().get(&id).map(|p| p.name.clone()) else {
        bail!("Product not found: {}", id);
    };

    let liked = view.toggle_like(&id);

    if ctx.output.is_json() {
        ctx.output.emit(&serde_json::json!({
            "id": id,
            "liked": liked,
            "liked_count": view.liked_count(),
        }))?;
        return Ok(());
    }

    if liked {
        ctx.output.success(&format!("Liked {}", name));
    } else {
        ctx.output.success(&format!("Unliked {}", name));
    }
    ctx.output.kv("liked products", &view.liked_count().to_string());

    Ok(())
}
