//! Client-side catalog interaction engine.
//!
//! This crate holds everything a catalog browsing surface needs between the
//! backend and the renderer:
//!
//! - **Catalog**: Products, presentation overrides, the in-memory product store, liked set
//! - **Search**: Faceted filtering, facet options, pagination
//! - **Session**: Debounced live search and per-product layout edit sessions
//! - **View**: [`CatalogView`], the glue that ties them together
//!
//! The backend is only reachable through the traits in [`service`].
//!
//! # Example
//!
//! ```rust,ignore
//! use catalog_engine::prelude::*;
//!
//! let mut view = CatalogView::new(EngineConfig::default(), Box::new(MemoryLikedStore::default()));
//! view.load(&client).await?;
//!
//! view.toggle_category("Shoes");
//! view.set_price_range(Price::from_decimal(0.0), Price::from_decimal(60.0));
//!
//! let page = view.visible_page();
//! for product in page.items {
//!     println!("{} {}", product.name, product.price);
//! }
//! ```

pub mod config;
pub mod error;
pub mod ids;
pub mod price;
pub mod service;

pub mod catalog;
pub mod search;
pub mod session;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

pub use config::EngineConfig;
pub use error::CatalogError;
pub use ids::ProductId;
pub use price::Price;
pub use view::{CatalogPage, CatalogView, LoadState};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::EngineConfig;
    pub use crate::error::CatalogError;
    pub use crate::ids::ProductId;
    pub use crate::price::Price;

    // Catalog
    pub use crate::catalog::{
        BorderStyle, ImageSize, JsonFileLikedStore, LayoutPatch, LikedSet, LikedStore,
        MemoryLikedStore, PresentationOverride, Product, ProductStore, TextAlignment,
    };

    // Search
    pub use crate::search::{
        filter_products, paginate, Facet, FacetOptions, FacetSelection, FacetValue, Page,
        Pagination, PriceWindow, Scope,
    };

    // Sessions
    pub use crate::session::{
        EditPhase, LayoutEditSession, LayoutSaveRequest, SaveOutcome, SaveStep, SearchController,
        SearchHandle, SearchSnapshot, SearchStatus,
    };

    // Services
    pub use crate::service::{
        CatalogQueryService, CatalogReadService, LayoutPersistenceService, ServiceError,
    };

    // View
    pub use crate::view::{CatalogPage, CatalogView, LoadState};
}
