//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _, Result};
use catalog_data::{HttpCatalogClient, InMemoryCatalog, TimeoutConfig};
use catalog_engine::prelude::{CatalogView, JsonFileLikedStore};

use crate::backend::Backend;
use crate::config::{CliConfig, CONFIG_FILE_NAMES};
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
    /// Fixture given on the command line, overriding the config.
    pub fixture: Option<String>,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, fixture: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let config = if let Some(path) = config_path {
            CliConfig::load(path)?
        } else {
            // Try to find config in current directory or parent directories
            find_config_file(&cwd)
                .and_then(|path| CliConfig::load(path.to_str()?).ok())
                .unwrap_or_default()
        };

        Ok(Self {
            config,
            output,
            cwd,
            fixture: fixture.map(str::to_string),
        })
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        if PathBuf::from(path).is_absolute() {
            PathBuf::from(path)
        } else {
            self.cwd.join(path)
        }
    }

    /// Connect to the configured backend.
    ///
    /// A fixture (flag first, then config) wins over `service.base_url`.
    pub fn backend(&self) -> Result<Backend> {
        let fixture = self.fixture.as_ref().or(self.config.service.fixture.as_ref());

        if let Some(fixture) = fixture {
            let path = self.resolve_path(fixture);
            let catalog = InMemoryCatalog::from_fixture(&path)?
                .with_search_limit(self.config.engine.search_result_limit);
            self.output.debug(&format!("Using fixture {}", path.display()));
            return Ok(Backend::fixture(catalog, path));
        }

        if let Some(base_url) = &self.config.service.base_url {
            let timeouts = TimeoutConfig::from_millis(
                self.config.service.connect_timeout_ms,
                self.config.service.timeout_ms,
            );
            let client = HttpCatalogClient::new(base_url, timeouts)
                .with_context(|| format!("Failed to create client for {}", base_url))?;
            self.output.debug(&format!("Using backend {}", base_url));
            return Ok(Backend::http(client));
        }

        bail!("No backend configured. Set service.base_url in catalog.toml or pass --fixture.")
    }

    /// A fresh catalog view with the persisted liked set.
    pub fn view(&self) -> CatalogView {
        let liked = JsonFileLikedStore::new(self.resolve_path(&self.config.liked.path));
        CatalogView::new(self.config.engine.clone(), Box::new(liked))
    }
}

/// Find a config file in the directory tree.
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        for name in &CONFIG_FILE_NAMES {
            let config_path = current.join(name);
            if config_path.exists() {
                return Some(config_path);
            }
        }

        if !current.pop() {
            break;
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_config_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(".catalog.toml"), "").unwrap();

        let found = find_config_file(&nested).unwrap();
        assert_eq!(found, dir.path().join(".catalog.toml"));
    }

    #[test]
    fn test_backend_requires_configuration() {
        let ctx = Context {
            config: CliConfig::default(),
            output: Output::new(false, true),
            cwd: PathBuf::from("/"),
            fixture: None,
        };
        assert!(ctx.backend().is_err());
    }
}
