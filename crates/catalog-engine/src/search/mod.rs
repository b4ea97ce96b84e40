//! Search module.
//!
//! Contains the facet selection and filter, facet option derivation, and
//! pagination.

mod facets;
mod filter;
mod page;

pub use facets::{Facet, FacetOptions, FacetType, FacetValue};
pub use filter::{filter_products, FacetSelection, PriceWindow, Scope};
pub use page::{paginate, Page, Pagination};
