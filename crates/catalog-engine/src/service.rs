//! Ports to the external catalog backend.
//!
//! The engine never talks HTTP itself. It consumes these traits; the
//! `catalog-data` crate provides the HTTP and in-memory implementations.

use async_trait::async_trait;

use crate::catalog::{PresentationOverride, Product};
use crate::ids::ProductId;

/// Error type for backend service calls.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ServiceError {
    #[error("HTTP error: {status} for {url}")]
    Http { status: u16, url: String },

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Request error: {0}")]
    Request(String),

    /// The referenced product does not exist server-side.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The submitted value is identical to the stored one.
    #[error("Not modified")]
    NotModified,

    /// The backend answered but reported `success: false`.
    #[error("Rejected: {0}")]
    Rejected(String),
}

impl ServiceError {
    /// Whether retrying the same call later could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http { status, .. } => *status >= 500 || *status == 408 || *status == 429,
            Self::Timeout(_) | Self::Connection(_) | Self::Request(_) => true,
            Self::Deserialization(_) | Self::NotFound(_) | Self::NotModified | Self::Rejected(_) => {
                false
            }
        }
    }
}

/// One-shot read of the full product set.
#[async_trait]
pub trait CatalogReadService: Send + Sync {
    /// Fetch every product in the catalog.
    async fn load_catalog(&self) -> Result<Vec<Product>, ServiceError>;
}

/// Free-text product search.
#[async_trait]
pub trait CatalogQueryService: Send + Sync {
    /// Search products by text. `query` is never empty.
    ///
    /// Records may be abbreviated (at minimum id, name and image).
    async fn search(&self, query: &str) -> Result<Vec<Product>, ServiceError>;
}

/// Reads and writes of per-product presentation overrides.
#[async_trait]
pub trait LayoutPersistenceService: Send + Sync {
    /// Persist the full override for a product, returning the stored value.
    ///
    /// Fails with [`ServiceError::NotFound`] for an unknown product and
    /// [`ServiceError::NotModified`] when the stored value already matches.
    async fn save_layout(
        &self,
        id: &ProductId,
        layout: &PresentationOverride,
    ) -> Result<PresentationOverride, ServiceError>;

    /// Read the stored override, or the default when none is stored.
    async fn fetch_layout(&self, id: &ProductId) -> Result<PresentationOverride, ServiceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        let server = ServiceError::Http {
            status: 503,
            url: "http://localhost/api/search".into(),
        };
        assert!(server.is_transient());

        let client = ServiceError::Http {
            status: 400,
            url: "http://localhost/api/search".into(),
        };
        assert!(!client.is_transient());

        assert!(ServiceError::Connection("refused".into()).is_transient());
        assert!(!ServiceError::NotFound("p1".into()).is_transient());
        assert!(!ServiceError::NotModified.is_transient());
    }
}
