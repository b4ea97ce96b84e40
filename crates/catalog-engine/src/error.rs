//! Catalog error types.

use thiserror::Error;

use crate::service::ServiceError;

/// Errors that can occur in catalog interactions.
///
/// Search failures never show up here: the search controller degrades them
/// to an empty result set. Facet and pagination code is infallible.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The initial catalog load failed. Distinct from an empty catalog.
    #[error("Catalog load failed: {0}")]
    LoadFailed(String),

    /// Product not found, locally or on the server.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Invalid layout edit session transition.
    #[error("Invalid layout session transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    /// A layout save for this product is already in flight.
    #[error("Layout save already in flight for {0}")]
    SaveInFlight(String),

    /// A layout save failed; the draft is kept and the save can be retried.
    #[error("Layout save failed for {product_id}: {reason}")]
    LayoutSaveFailed { product_id: String, reason: String },

    /// The liked-set store could not be read or written.
    #[error("Liked store error: {0}")]
    LikedStore(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Service error outside the cases above.
    #[error("Service error: {0}")]
    Service(#[from] ServiceError),
}

impl CatalogError {
    /// Whether the user can recover by retrying the same action.
    ///
    /// Not-found is terminal for the session that hit it.
    pub fn is_recoverable(&self) -> bool {
        match self {
            CatalogError::LoadFailed(_)
            | CatalogError::LayoutSaveFailed { .. }
            | CatalogError::SaveInFlight(_)
            | CatalogError::LikedStore(_) => true,
            CatalogError::Service(e) => e.is_transient(),
            CatalogError::ProductNotFound(_)
            | CatalogError::InvalidTransition { .. }
            | CatalogError::SerializationError(_) => false,
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(e: serde_json::Error) -> Self {
        CatalogError::SerializationError(e.to_string())
    }
}
