//! Catalog view state.
//!
//! [`CatalogView`] is what a browsing page holds: the product store, the
//! facet selection, the liked set, the active page and any open layout
//! editors. Every filter input change resets the active page to 1.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, warn};

use crate::catalog::{
    LayoutPatch, LikedSet, LikedStore, PresentationOverride, Product, ProductStore,
};
use crate::config::EngineConfig;
use crate::error::CatalogError;
use crate::ids::ProductId;
use crate::price::Price;
use crate::search::{
    filter_products, paginate, FacetOptions, FacetSelection, Pagination, PriceWindow, Scope,
};
use crate::service::{CatalogReadService, LayoutPersistenceService, ServiceError};
use crate::session::{EditPhase, LayoutEditSession, SaveOutcome, SaveStep};

/// Initial-load status of the view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum LoadState {
    /// Nothing fetched yet.
    Pending,
    /// The catalog is loaded (possibly empty).
    Ready,
    /// The load failed. The view should block with a retry action.
    Failed { message: String },
}

/// The page of filtered products to render.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogPage<'a> {
    pub items: Vec<&'a Product>,
    pub pagination: Pagination,
    /// Page-number window around the current page.
    pub page_numbers: Vec<usize>,
}

/// Browsing state for one catalog view.
pub struct CatalogView {
    config: EngineConfig,
    store: ProductStore,
    selection: FacetSelection,
    liked: LikedSet,
    liked_store: Box<dyn LikedStore>,
    page: usize,
    page_size: usize,
    load_state: LoadState,
    editors: HashMap<ProductId, LayoutEditSession>,
}

impl CatalogView {
    /// Create an empty view. The liked set is read from `liked_store`.
    pub fn new(config: EngineConfig, liked_store: Box<dyn LikedStore>) -> Self {
        let liked = liked_store.load().unwrap_or_else(|e| {
            warn!(error = %e, "Could not read liked products, starting empty");
            LikedSet::new()
        });

        Self {
            selection: FacetSelection::new(config.price_floor, config.price_ceiling),
            page_size: config.effective_page_size(),
            config,
            store: ProductStore::new(),
            liked,
            liked_store,
            page: 1,
            load_state: LoadState::Pending,
            editors: HashMap::new(),
        }
    }

    /// Fetch the catalog. On failure the view enters [`LoadState::Failed`].
    pub async fn load(&mut self, reader: &dyn CatalogReadService) -> Result<usize, CatalogError> {
        match self.store.load(reader).await {
            Ok(count) => {
                self.load_state = LoadState::Ready;
                self.page = 1;
                self.fit_price_window();
                Ok(count)
            }
            Err(e) => {
                warn!(error = %e, "Catalog load failed");
                self.load_state = LoadState::Failed {
                    message: e.to_string(),
                };
                Err(e)
            }
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn store(&self) -> &ProductStore {
        &self.store
    }

    pub fn selection(&self) -> &FacetSelection {
        &self.selection
    }

    pub fn liked(&self) -> &LikedSet {
        &self.liked
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    // Filter inputs

    pub fn toggle_category(&mut self, category: &str) -> bool {
        self.page = 1;
        self.selection.toggle_category(category)
    }

    pub fn toggle_brand(&mut self, brand: &str) -> bool {
        self.page = 1;
        self.selection.toggle_brand(brand)
    }

    pub fn toggle_color(&mut self, color: &str) -> bool {
        self.page = 1;
        self.selection.toggle_color(color)
    }

    pub fn toggle_size(&mut self, size: &str) -> bool {
        self.page = 1;
        self.selection.toggle_size(size)
    }

    pub fn set_price_range(&mut self, min: Price, max: Price) {
        self.page = 1;
        self.selection.price.set(min, max);
    }

    pub fn set_min_price(&mut self, min: Price) {
        self.page = 1;
        self.selection.price.set_min(min);
    }

    pub fn set_max_price(&mut self, max: Price) {
        self.page = 1;
        self.selection.price.set_max(max);
    }

    pub fn set_scope(&mut self, scope: Scope) {
        self.page = 1;
        self.selection.scope = scope;
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page = 1;
        self.page_size = page_size.max(1);
    }

    /// Clear every facet and widen the price window.
    pub fn clear_filters(&mut self) {
        self.page = 1;
        self.selection.clear();
    }

    /// Flip the like state of a product and persist the liked set.
    ///
    /// A failed write is logged; the in-memory toggle stands.
    pub fn toggle_like(&mut self, id: &ProductId) -> bool {
        self.page = 1;
        let liked = self.liked.toggle(id);
        self.persist_liked();
        liked
    }

    /// Select a page. Values past the end are clamped when rendering.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    // Derived output

    /// Products passing the current selection, in catalog order.
    pub fn filtered(&self) -> Vec<&Product> {
        filter_products(self.store.products(), &self.selection, &self.liked)
    }

    /// The current page of filtered products.
    pub fn visible_page(&self) -> CatalogPage<'_> {
        let filtered = self.filtered();
        let page = paginate(&filtered, self.page_size, self.page);

        CatalogPage {
            items: page.items.to_vec(),
            page_numbers: page.pagination.page_numbers(self.config.max_visible_pages),
            pagination: page.pagination,
        }
    }

    /// Facet values with counts over the whole catalog.
    pub fn facets(&self) -> FacetOptions {
        FacetOptions::from_products(
            self.store.products(),
            &self.config.vocabulary,
            &self.selection,
        )
    }

    pub fn total_count(&self) -> usize {
        self.store.len()
    }

    /// Liked products still in the catalog.
    pub fn liked_count(&self) -> usize {
        self.store
            .products()
            .iter()
            .filter(|p| self.liked.contains(&p.id))
            .count()
    }

    pub fn filtered_count(&self) -> usize {
        self.filtered().len()
    }

    // CRUD confirmations

    /// Record a product created or updated by the CRUD backend.
    pub fn upsert_product(&mut self, product: Product) {
        let price = product.price;
        self.store.upsert(product);
        self.selection.price.extend_to(price);
    }

    /// Drop a product whose deletion was confirmed, with its like and editor.
    pub fn remove_product(&mut self, id: &ProductId) -> Option<Product> {
        let removed = self.store.remove(id)?;
        self.editors.remove(id);
        if self.liked.remove(id) {
            self.persist_liked();
        }
        Some(removed)
    }

    // Layout editing

    /// Layout to render for a product: the draft while an editor is open,
    /// the stored layout otherwise.
    pub fn effective_layout(&self, id: &ProductId) -> Option<PresentationOverride> {
        let product = self.store.get(id)?;
        let draft = self.editors.get(id).and_then(|s| s.draft());
        Some(draft.unwrap_or_else(|| product.effective_layout()))
    }

    pub fn editor(&self, id: &ProductId) -> Option<&LayoutEditSession> {
        self.editors.get(id)
    }

    /// Open the layout editor for a product.
    pub fn open_editor(&mut self, id: &ProductId) -> Result<PresentationOverride, CatalogError> {
        let current = self
            .store
            .get(id)
            .ok_or_else(|| CatalogError::ProductNotFound(id.to_string()))?
            .layout;

        let session = self
            .editors
            .entry(id.clone())
            .or_insert_with(|| LayoutEditSession::new(id.clone()));
        session.open(current)?;
        Ok(current.unwrap_or_default())
    }

    /// Merge a patch into the open draft. Returns whether it is dirty.
    pub fn update_layout(&mut self, id: &ProductId, patch: &LayoutPatch) -> Result<bool, CatalogError> {
        self.session_mut(id)?.update(patch)
    }

    /// Close the editor without saving.
    pub fn cancel_editor(&mut self, id: &ProductId) -> Result<(), CatalogError> {
        self.session_mut(id)?.cancel()?;
        self.editors.remove(id);
        Ok(())
    }

    /// Start a save without awaiting it.
    ///
    /// Lets saves for several products be in flight at once. Report each
    /// result through [`CatalogView::complete_layout_save`].
    pub fn begin_layout_save(&mut self, id: &ProductId) -> Result<SaveStep, CatalogError> {
        let step = self.session_mut(id)?.begin_save()?;
        if step == SaveStep::Close {
            self.editors.remove(id);
        }
        Ok(step)
    }

    /// Finish a save started with [`CatalogView::begin_layout_save`].
    pub fn complete_layout_save(
        &mut self,
        id: &ProductId,
        result: Result<PresentationOverride, ServiceError>,
    ) -> Result<SaveOutcome, CatalogError> {
        let session = self
            .editors
            .get_mut(id)
            .ok_or_else(|| no_editor(id))?;
        let outcome = session.complete_save(result, &mut self.store);
        if session.phase() == EditPhase::Closed {
            self.editors.remove(id);
        }
        outcome
    }

    /// Save the open draft through `service`.
    pub async fn save_layout(
        &mut self,
        id: &ProductId,
        service: &dyn LayoutPersistenceService,
    ) -> Result<SaveOutcome, CatalogError> {
        match self.begin_layout_save(id)? {
            SaveStep::Close => Ok(SaveOutcome::Skipped),
            SaveStep::Persist(request) => {
                let result = service
                    .save_layout(&request.product_id, &request.layout)
                    .await;
                self.complete_layout_save(id, result)
            }
        }
    }

    /// Navigation away: drop every editor that is not mid-save.
    ///
    /// Saving sessions stay until their result is reported.
    pub fn discard_editors(&mut self) {
        let before = self.editors.len();
        self.editors
            .retain(|_, session| session.phase() == EditPhase::Saving);
        debug!(discarded = before - self.editors.len(), "Layout editors discarded");
    }

    fn session_mut(&mut self, id: &ProductId) -> Result<&mut LayoutEditSession, CatalogError> {
        self.editors.get_mut(id).ok_or_else(|| no_editor(id))
    }

    /// Reset the price window to the configured range widened to every
    /// loaded price.
    fn fit_price_window(&mut self) {
        let mut window = PriceWindow::new(self.config.price_floor, self.config.price_ceiling);
        for product in self.store.products() {
            window.extend_to(product.price);
        }
        debug!(floor = %window.floor(), ceiling = %window.ceiling(), "Price window fitted");
        self.selection.price = window;
    }

    fn persist_liked(&self) {
        if let Err(e) = self.liked_store.save(&self.liked) {
            warn!(error = %e, "Could not persist liked products");
        }
    }
}

fn no_editor(id: &ProductId) -> CatalogError {
    CatalogError::InvalidTransition {
        from: EditPhase::Closed.as_str().to_string(),
        to: format!("{} ({})", EditPhase::Editing.as_str(), id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ImageSize, MemoryLikedStore};
    use crate::testing::{product, ScriptedCatalog};

    fn catalog() -> Vec<Product> {
        (1..=14)
            .map(|i| {
                let mut p = product(&format!("p{:02}", i), i as f64 * 10.0);
                p.categories = vec![if i % 2 == 0 { "Shoes" } else { "Shirt" }.to_string()];
                p
            })
            .collect()
    }

    async fn loaded_view() -> CatalogView {
        let mut view = CatalogView::new(
            EngineConfig::default(),
            Box::new(MemoryLikedStore::default()),
        );
        let reader = ScriptedCatalog::with_products(catalog());
        view.load(&reader).await.unwrap();
        view
    }

    #[tokio::test]
    async fn test_load_states() {
        let view = loaded_view().await;
        assert_eq!(view.load_state(), &LoadState::Ready);
        assert_eq!(view.total_count(), 14);

        let mut view = CatalogView::new(
            EngineConfig::default(),
            Box::new(MemoryLikedStore::default()),
        );
        let reader = ScriptedCatalog::default();
        reader.fail_load(ServiceError::Timeout("products".into()));
        assert!(view.load(&reader).await.is_err());
        assert!(matches!(view.load_state(), LoadState::Failed { .. }));
    }

    #[tokio::test]
    async fn test_price_window_covers_loaded_prices() {
        let mut view = CatalogView::new(
            EngineConfig::default(),
            Box::new(MemoryLikedStore::default()),
        );
        let reader =
            ScriptedCatalog::with_products(vec![product("cheap", 10.0), product("lux", 1500.0)]);
        view.load(&reader).await.unwrap();

        assert!(!view.selection().has_active_filters());
        assert_eq!(view.filtered_count(), 2);
        assert_eq!(view.selection().price.ceiling(), Price::from_decimal(1500.0));

        view.set_max_price(Price::from_decimal(5000.0));
        assert_eq!(view.selection().price.max(), Price::from_decimal(1500.0));
        assert_eq!(view.filtered_count(), 2);

        view.upsert_product(product("jet", 2500.0));
        assert_eq!(view.filtered_count(), 3);

        view.set_max_price(Price::from_decimal(100.0));
        assert_eq!(view.filtered_count(), 1);
        view.clear_filters();
        assert_eq!(view.filtered_count(), 3);
    }

    #[tokio::test]
    async fn test_visible_page_and_window() {
        let mut view = loaded_view().await;
        view.set_page(3);

        let page = view.visible_page();
        assert_eq!(page.pagination.total_pages, 3);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].id.as_str(), "p13");
        assert_eq!(page.page_numbers, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_filter_change_resets_page() {
        let mut view = loaded_view().await;
        view.set_page(2);
        view.toggle_category("Shoes");
        assert_eq!(view.page(), 1);
        assert_eq!(view.filtered_count(), 7);

        view.set_page(2);
        view.set_price_range(Price::ZERO, Price::from_decimal(60.0));
        assert_eq!(view.page(), 1);
        assert_eq!(view.filtered_count(), 3);

        view.set_page(2);
        view.clear_filters();
        assert_eq!(view.page(), 1);
        assert_eq!(view.filtered_count(), 14);
    }

    #[tokio::test]
    async fn test_liked_scope_and_persistence() {
        let mut view = loaded_view().await;
        let id = ProductId::new("p03");

        assert!(view.toggle_like(&id));
        view.set_scope(Scope::Liked);
        assert_eq!(view.filtered_count(), 1);
        assert_eq!(view.liked_count(), 1);

        view.remove_product(&id);
        assert_eq!(view.liked_count(), 0);
        assert!(view.liked().is_empty());
    }

    #[tokio::test]
    async fn test_effective_layout_follows_draft_until_cancel() {
        let mut view = loaded_view().await;
        let id = ProductId::new("p01");

        view.open_editor(&id).unwrap();
        view.update_layout(&id, &LayoutPatch::default().image_size(ImageSize::Large))
            .unwrap();
        assert_eq!(
            view.effective_layout(&id).unwrap().image_size,
            ImageSize::Large
        );

        view.cancel_editor(&id).unwrap();
        assert_eq!(
            view.effective_layout(&id).unwrap().image_size,
            ImageSize::Medium
        );
        assert!(view.editor(&id).is_none());
    }

    #[tokio::test]
    async fn test_save_layout_through_view() {
        let mut view = loaded_view().await;
        let service = ScriptedCatalog::default();
        let id = ProductId::new("p02");

        view.open_editor(&id).unwrap();
        view.update_layout(&id, &LayoutPatch::default().show_price(false))
            .unwrap();
        let outcome = view.save_layout(&id, &service).await.unwrap();

        assert!(matches!(outcome, SaveOutcome::Saved(_)));
        assert!(view.editor(&id).is_none());
        assert!(!view.effective_layout(&id).unwrap().show_price);
    }

    #[tokio::test]
    async fn test_independent_saves_across_products() {
        let mut view = loaded_view().await;
        let a = ProductId::new("p01");
        let b = ProductId::new("p02");
        let large = LayoutPatch::default().image_size(ImageSize::Large);

        for id in [&a, &b] {
            view.open_editor(id).unwrap();
            view.update_layout(id, &large).unwrap();
        }
        let step_a = view.begin_layout_save(&a).unwrap();
        let step_b = view.begin_layout_save(&b).unwrap();
        assert!(matches!(step_a, SaveStep::Persist(_)));
        assert!(matches!(step_b, SaveStep::Persist(_)));
        assert!(matches!(
            view.begin_layout_save(&a),
            Err(CatalogError::SaveInFlight(_))
        ));

        let layout = PresentationOverride::default().merged(&large);
        view.complete_layout_save(&b, Ok(layout)).unwrap();
        assert!(view
            .complete_layout_save(&a, Err(ServiceError::Connection("reset".into())))
            .is_err());

        assert_eq!(view.editor(&a).unwrap().phase(), EditPhase::Editing);
        assert!(view.editor(&b).is_none());
        assert_eq!(view.store().get(&b).unwrap().layout, Some(layout));
        assert_eq!(view.store().get(&a).unwrap().layout, None);
    }

    #[tokio::test]
    async fn test_discard_editors_keeps_saving_sessions() {
        let mut view = loaded_view().await;
        let a = ProductId::new("p01");
        let b = ProductId::new("p02");
        let large = LayoutPatch::default().image_size(ImageSize::Large);

        for id in [&a, &b] {
            view.open_editor(id).unwrap();
            view.update_layout(id, &large).unwrap();
        }
        view.begin_layout_save(&b).unwrap();
        view.discard_editors();

        assert!(view.editor(&a).is_none());
        assert_eq!(view.editor(&b).unwrap().phase(), EditPhase::Saving);
    }

    #[tokio::test]
    async fn test_open_editor_unknown_product() {
        let mut view = loaded_view().await;
        assert!(matches!(
            view.open_editor(&"missing".into()),
            Err(CatalogError::ProductNotFound(_))
        ));
    }
}
