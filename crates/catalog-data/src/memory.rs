//! In-memory catalog backend.

use std::path::Path;

use async_trait::async_trait;
use catalog_engine::prelude::{
    CatalogQueryService, CatalogReadService, LayoutPersistenceService, PresentationOverride,
    Product, ProductId, ServiceError,
};
use chrono::Utc;
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::DataError;
use crate::wire::ProductsEnvelope;

/// Default cap on search results.
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

/// Fixture files hold either a bare product array or a products envelope.
#[derive(Deserialize)]
#[serde(untagged)]
enum Fixture {
    Products(Vec<Product>),
    Envelope(ProductsEnvelope),
}

/// Catalog backend held in memory.
///
/// Products are addressed by id or slug. Search matches names
/// case-insensitively and returns at most `search_limit` records.
#[derive(Debug)]
pub struct InMemoryCatalog {
    products: RwLock<Vec<Product>>,
    search_limit: usize,
}

impl Default for InMemoryCatalog {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl InMemoryCatalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products: RwLock::new(products),
            search_limit: DEFAULT_SEARCH_LIMIT,
        }
    }

    /// Set the search result cap (at least 1).
    pub fn with_search_limit(mut self, limit: usize) -> Self {
        self.search_limit = limit.max(1);
        self
    }

    /// Load products from a JSON fixture file.
    pub fn from_fixture(path: &Path) -> Result<Self, DataError> {
        let bytes = std::fs::read(path).map_err(|source| DataError::FixtureRead {
            path: path.to_path_buf(),
            source,
        })?;
        let fixture: Fixture =
            serde_json::from_slice(&bytes).map_err(|source| DataError::FixtureParse {
                path: path.to_path_buf(),
                source,
            })?;

        let products = match fixture {
            Fixture::Products(products) => products,
            Fixture::Envelope(envelope) => envelope.data,
        };
        info!(path = %path.display(), count = products.len(), "Fixture loaded");
        Ok(Self::new(products))
    }

    /// Write the current products back as a JSON array.
    pub async fn write_fixture(&self, path: &Path) -> Result<(), DataError> {
        let products = self.products.read().await;
        let json = serde_json::to_vec_pretty(&*products).map_err(|source| {
            DataError::FixtureParse {
                path: path.to_path_buf(),
                source,
            }
        })?;
        std::fs::write(path, json).map_err(|source| DataError::FixtureWrite {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Snapshot of every product.
    pub async fn products(&self) -> Vec<Product> {
        self.products.read().await.clone()
    }

    pub fn search_limit(&self) -> usize {
        self.search_limit
    }
}

fn find_index(products: &[Product], key: &ProductId) -> Option<usize> {
    products
        .iter()
        .position(|p| &p.id == key)
        .or_else(|| {
            products
                .iter()
                .position(|p| p.slug.as_deref() == Some(key.as_str()))
        })
}

#[async_trait]
impl CatalogReadService for InMemoryCatalog {
    async fn load_catalog(&self) -> Result<Vec<Product>, ServiceError> {
        Ok(self.products().await)
    }
}

#[async_trait]
impl CatalogQueryService for InMemoryCatalog {
    async fn search(&self, query: &str) -> Result<Vec<Product>, ServiceError> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        let products = self.products.read().await;
        let results: Vec<Product> = products
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .take(self.search_limit)
            .cloned()
            .collect();
        debug!(query = %needle, count = results.len(), "Local search");
        Ok(results)
    }
}

#[async_trait]
impl LayoutPersistenceService for InMemoryCatalog {
    async fn save_layout(
        &self,
        id: &ProductId,
        layout: &PresentationOverride,
    ) -> Result<PresentationOverride, ServiceError> {
        let mut products = self.products.write().await;
        let index =
            find_index(&products, id).ok_or_else(|| ServiceError::NotFound(id.to_string()))?;

        let product = &mut products[index];
        if product.layout == Some(*layout) {
            return Err(ServiceError::NotModified);
        }
        product.layout = Some(*layout);
        product.updated_at = Some(Utc::now());
        Ok(*layout)
    }

    async fn fetch_layout(&self, id: &ProductId) -> Result<PresentationOverride, ServiceError> {
        let products = self.products.read().await;
        find_index(&products, id)
            .map(|index| products[index].effective_layout())
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))
    }
}
