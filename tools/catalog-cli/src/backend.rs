//! The backend a command talks to.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use catalog_data::{HttpCatalogClient, InMemoryCatalog};
use catalog_engine::prelude::{CatalogQueryService, CatalogReadService, LayoutPersistenceService};

/// Either the HTTP backend or a local fixture.
pub enum Backend {
    Http(Arc<HttpCatalogClient>),
    Fixture {
        catalog: Arc<InMemoryCatalog>,
        path: PathBuf,
    },
}

impl Backend {
    pub fn http(client: HttpCatalogClient) -> Self {
        Backend::Http(Arc::new(client))
    }

    pub fn fixture(catalog: InMemoryCatalog, path: PathBuf) -> Self {
        Backend::Fixture {
            catalog: Arc::new(catalog),
            path,
        }
    }

    pub fn reader(&self) -> &dyn CatalogReadService {
        match self {
            Backend::Http(client) => &**client,
            Backend::Fixture { catalog, .. } => &**catalog,
        }
    }

    pub fn layouts(&self) -> &dyn LayoutPersistenceService {
        match self {
            Backend::Http(client) => &**client,
            Backend::Fixture { catalog, .. } => &**catalog,
        }
    }

    /// Shared handle for a search controller task.
    pub fn query(&self) -> Arc<dyn CatalogQueryService> {
        match self {
            Backend::Http(client) => client.clone(),
            Backend::Fixture { catalog, .. } => catalog.clone(),
        }
    }

    /// Describe where data comes from.
    pub fn describe(&self) -> String {
        match self {
            Backend::Http(client) => client.base_url().to_string(),
            Backend::Fixture { path, .. } => format!("fixture {}", path.display()),
        }
    }

    /// Write fixture changes back to disk. The HTTP backend is already durable.
    pub async fn persist(&self) -> Result<()> {
        if let Backend::Fixture { catalog, path } = self {
            catalog.write_fixture(path).await?;
        }
        Ok(())
    }
}
