//! Configuration management commands.

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::generate_default_config;
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx).await,
        ConfigCommand::Init { force } => init_config(force, ctx).await,
    }
}

async fn show_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Current Configuration");

    if ctx.output.is_json() {
        ctx.output.emit(&ctx.config)?;
        return Ok(());
    }

    let service = &ctx.config.service;
    ctx.output.info("");
    ctx.output.info("[service]");
    ctx.output
        .kv("base_url", service.base_url.as_deref().unwrap_or("-"));
    let fixture = ctx.fixture.as_deref().or(service.fixture.as_deref());
    ctx.output.kv("fixture", fixture.unwrap_or("-"));
    ctx.output
        .kv("connect_timeout_ms", &service.connect_timeout_ms.to_string());
    ctx.output.kv("timeout_ms", &service.timeout_ms.to_string());

    let engine = &ctx.config.engine;
    ctx.output.info("");
    ctx.output.info("[engine]");
    ctx.output.kv("page_size", &engine.page_size.to_string());
    ctx.output.kv("debounce_ms", &engine.debounce_ms.to_string());
    ctx.output.kv(
        "price_range",
        &format!("{} - {}", engine.price_floor, engine.price_ceiling),
    );
    ctx.output
        .kv("max_visible_pages", &engine.max_visible_pages.to_string());
    ctx.output
        .kv("search_result_limit", &engine.search_result_limit.to_string());

    ctx.output.info("");
    ctx.output.info("[liked]");
    ctx.output.kv("path", &ctx.config.liked.path);

    Ok(())
}

async fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join("catalog.toml");

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(&config_path, generate_default_config())?;

    ctx.output.success(&format!("Created: {}", config_path.display()));

    Ok(())
}
