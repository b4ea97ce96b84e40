//! In-memory product store.

use tracing::info;

use crate::catalog::{PresentationOverride, Product};
use crate::error::CatalogError;
use crate::ids::ProductId;
use crate::service::CatalogReadService;

/// Authoritative in-memory product set for one browsing session.
///
/// Written only by the load path, by the external CRUD confirmation path
/// (`upsert`/`remove`), and by a confirmed layout save.
#[derive(Debug, Clone, Default)]
pub struct ProductStore {
    products: Vec<Product>,
}

impl ProductStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store from already-fetched products.
    pub fn from_products(products: Vec<Product>) -> Self {
        let mut store = Self::new();
        store.replace_all(products);
        store
    }

    /// Fetch the full catalog and replace the current contents.
    ///
    /// On failure the current contents are left untouched.
    pub async fn load(&mut self, reader: &dyn CatalogReadService) -> Result<usize, CatalogError> {
        let products = reader
            .load_catalog()
            .await
            .map_err(|e| CatalogError::LoadFailed(e.to_string()))?;
        self.replace_all(products);
        info!(count = self.products.len(), "Catalog loaded");
        Ok(self.products.len())
    }

    /// Replace every product, sanitizing and de-duplicating by id.
    pub fn replace_all(&mut self, products: Vec<Product>) {
        self.products.clear();
        for product in products {
            self.upsert(product);
        }
    }

    /// All products in catalog order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product.
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// Check if a product exists.
    pub fn contains(&self, id: &ProductId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Insert or replace a product confirmed by the CRUD backend.
    ///
    /// Replacement keeps the product's position in catalog order.
    pub fn upsert(&mut self, product: Product) {
        let product = product.sanitize();
        match self.products.iter_mut().find(|p| p.id == product.id) {
            Some(existing) => *existing = product,
            None => self.products.push(product),
        }
    }

    /// Remove a product whose deletion the CRUD backend confirmed.
    pub fn remove(&mut self, id: &ProductId) -> Option<Product> {
        let index = self.products.iter().position(|p| &p.id == id)?;
        Some(self.products.remove(index))
    }

    /// Record a server-confirmed layout. Only layout sessions call this.
    pub(crate) fn apply_confirmed_layout(
        &mut self,
        id: &ProductId,
        layout: PresentationOverride,
    ) -> bool {
        match self.products.iter_mut().find(|p| &p.id == id) {
            Some(product) => {
                product.layout = Some(layout);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ImageSize;
    use crate::price::Price;
    use crate::service::ServiceError;
    use crate::testing::{product, ScriptedCatalog};

    #[test]
    fn test_upsert_keeps_order_and_replaces() {
        let mut store = ProductStore::from_products(vec![
            product("a", 10.0),
            product("b", 20.0),
            product("c", 30.0),
        ]);

        store.upsert(product("b", 25.0));
        store.upsert(product("d", 40.0));

        let ids: Vec<&str> = store.products().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c", "d"]);
        assert_eq!(
            store.get(&"b".into()).unwrap().price,
            Price::from_decimal(25.0)
        );
    }

    #[test]
    fn test_replace_all_deduplicates() {
        let store = ProductStore::from_products(vec![product("a", 10.0), product("a", 11.0)]);
        assert_eq!(store.len(), 1);
        assert_eq!(store.products()[0].price, Price::from_decimal(11.0));
    }

    #[test]
    fn test_remove() {
        let mut store = ProductStore::from_products(vec![product("a", 10.0), product("b", 20.0)]);
        assert!(store.remove(&"a".into()).is_some());
        assert!(store.remove(&"a".into()).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_apply_confirmed_layout() {
        let mut store = ProductStore::from_products(vec![product("a", 10.0)]);
        let layout = PresentationOverride {
            image_size: ImageSize::Small,
            ..PresentationOverride::default()
        };

        assert!(store.apply_confirmed_layout(&"a".into(), layout));
        assert!(!store.apply_confirmed_layout(&"zzz".into(), layout));
        assert_eq!(
            store.get(&"a".into()).unwrap().effective_layout().image_size,
            ImageSize::Small
        );
    }

    #[tokio::test]
    async fn test_load_success_and_empty_catalog() {
        let mut store = ProductStore::new();
        let reader = ScriptedCatalog::with_products(vec![]);
        assert_eq!(store.load(&reader).await.unwrap(), 0);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_load_failure_keeps_contents() {
        let mut store = ProductStore::from_products(vec![product("a", 10.0)]);
        let reader = ScriptedCatalog::with_products(vec![]);
        reader.fail_load(ServiceError::Connection("refused".into()));

        let err = store.load(&reader).await.unwrap_err();
        assert!(matches!(err, CatalogError::LoadFailed(_)));
        assert_eq!(store.len(), 1);
    }
}
