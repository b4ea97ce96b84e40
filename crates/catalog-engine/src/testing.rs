//! Scripted service doubles shared by unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::catalog::{PresentationOverride, Product};
use crate::ids::ProductId;
use crate::price::Price;
use crate::service::{
    CatalogQueryService, CatalogReadService, LayoutPersistenceService, ServiceError,
};

pub fn product(id: &str, price: f64) -> Product {
    Product::new(id, format!("Product {}", id), Price::from_decimal(price))
}

/// Canned search answer for one query.
#[derive(Clone)]
pub struct SearchScript {
    pub delay: Duration,
    pub result: Result<Vec<Product>, ServiceError>,
}

/// Backend double with per-call scripting and call recording.
#[derive(Default)]
pub struct ScriptedCatalog {
    products: Mutex<Vec<Product>>,
    load_failure: Mutex<Option<ServiceError>>,
    searches: Mutex<HashMap<String, SearchScript>>,
    search_calls: Mutex<Vec<String>>,
    save_results: Mutex<VecDeque<Result<(), ServiceError>>>,
    save_calls: Mutex<Vec<(ProductId, PresentationOverride)>>,
}

impl ScriptedCatalog {
    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            products: Mutex::new(products),
            ..Self::default()
        }
    }

    pub fn fail_load(&self, error: ServiceError) {
        *self.load_failure.lock().unwrap() = Some(error);
    }

    pub fn script_search(&self, query: &str, delay: Duration, result: Result<Vec<Product>, ServiceError>) {
        self.searches
            .lock()
            .unwrap()
            .insert(query.to_string(), SearchScript { delay, result });
    }

    pub fn search_calls(&self) -> Vec<String> {
        self.search_calls.lock().unwrap().clone()
    }

    /// Queue the outcome of the next save. Unscripted saves succeed.
    pub fn push_save_result(&self, result: Result<(), ServiceError>) {
        self.save_results.lock().unwrap().push_back(result);
    }

    pub fn save_calls(&self) -> Vec<(ProductId, PresentationOverride)> {
        self.save_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CatalogReadService for ScriptedCatalog {
    async fn load_catalog(&self) -> Result<Vec<Product>, ServiceError> {
        if let Some(error) = self.load_failure.lock().unwrap().clone() {
            return Err(error);
        }
        Ok(self.products.lock().unwrap().clone())
    }
}

#[async_trait]
impl CatalogQueryService for ScriptedCatalog {
    async fn search(&self, query: &str) -> Result<Vec<Product>, ServiceError> {
        self.search_calls.lock().unwrap().push(query.to_string());
        let script = self.searches.lock().unwrap().get(query).cloned();
        match script {
            Some(script) => {
                tokio::time::sleep(script.delay).await;
                script.result
            }
            None => Ok(Vec::new()),
        }
    }
}

#[async_trait]
impl LayoutPersistenceService for ScriptedCatalog {
    async fn save_layout(
        &self,
        id: &ProductId,
        layout: &PresentationOverride,
    ) -> Result<PresentationOverride, ServiceError> {
        self.save_calls.lock().unwrap().push((id.clone(), *layout));
        let next = self.save_results.lock().unwrap().pop_front();
        match next {
            Some(Err(error)) => Err(error),
            _ => Ok(*layout),
        }
    }

    async fn fetch_layout(&self, id: &ProductId) -> Result<PresentationOverride, ServiceError> {
        self.products
            .lock()
            .unwrap()
            .iter()
            .find(|p| &p.id == id)
            .map(|p| p.effective_layout())
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))
    }
}
