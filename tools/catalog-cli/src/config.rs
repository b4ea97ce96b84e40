//! CLI configuration.

use anyhow::{Context, Result};
use catalog_engine::EngineConfig;
use serde::{Deserialize, Serialize};

/// Config file names searched from the working directory upwards.
pub const CONFIG_FILE_NAMES: [&str; 3] = ["catalog.toml", ".catalog.toml", "catalog.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Engine tunables.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Backend configuration.
    #[serde(default)]
    pub service: ServiceConfig,

    /// Liked-products storage.
    #[serde(default)]
    pub liked: LikedConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }
}

/// Backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Catalog backend URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// JSON fixture served locally instead of the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixture: Option<String>,

    /// Connection timeout in milliseconds.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    /// Total request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_connect_timeout_ms() -> u64 {
    2_000
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            fixture: None,
            connect_timeout_ms: default_connect_timeout_ms(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

/// Liked-products storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikedConfig {
    /// JSON file holding the liked product ids.
    #[serde(default = "default_liked_path")]
    pub path: String,
}

fn default_liked_path() -> String {
    ".catalog/liked.json".to_string()
}

impl Default for LikedConfig {
    fn default() -> Self {
        Self {
            path: default_liked_path(),
        }
    }
}

/// Generate a default catalog.toml config file.
pub fn generate_default_config() -> String {
    r#"# Catalog CLI configuration

[service]
# base_url = "http://localhost:3000"
# fixture = "products.json"
connect_timeout_ms = 2000
timeout_ms = 10000

[engine]
page_size = 6
debounce_ms = 300
price_floor = 0
price_ceiling = 1000
max_visible_pages = 5
search_result_limit = 10

[liked]
path = ".catalog/liked.json"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_config_parses() {
        let config: CliConfig = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.engine.page_size, 6);
        assert_eq!(config.engine.debounce_ms, 300);
        assert_eq!(config.service.timeout_ms, 10_000);
        assert!(config.service.base_url.is_none());
        assert_eq!(config.liked.path, ".catalog/liked.json");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: CliConfig = toml::from_str(
            r#"
            [engine]
            page_size = 12

            [service]
            base_url = "http://shop.local"
            "#,
        )
        .unwrap();
        assert_eq!(config.engine.page_size, 12);
        assert_eq!(config.engine.debounce_ms, 300);
        assert_eq!(config.service.connect_timeout_ms, 2_000);
        assert_eq!(config.service.base_url.as_deref(), Some("http://shop.local"));
    }

    #[test]
    fn test_load_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(
            &path,
            r#"{"service": {"fixture": "products.json"}, "engine": {"debounce_ms": 150}}"#,
        )
        .unwrap();

        let loaded = CliConfig::load(path.to_str().unwrap()).unwrap();
        assert_eq!(loaded.service.fixture.as_deref(), Some("products.json"));
        assert_eq!(loaded.engine.debounce_ms, 150);
        assert_eq!(loaded.engine.page_size, EngineConfig::default().page_size);
    }
}
