//! JSON envelopes exchanged with the catalog backend.

use catalog_engine::prelude::{PresentationOverride, Product};
use serde::{Deserialize, Serialize};

/// Response of `GET /api/products`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductsEnvelope {
    pub success: bool,
    #[serde(default)]
    pub data: Vec<Product>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Response of the layout routes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutEnvelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<PresentationOverride>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LayoutEnvelope {
    /// Backend explanation for a failure, if any.
    pub fn reason(&self) -> Option<&str> {
        self.error.as_deref().or(self.message.as_deref())
    }
}

/// Body of `PATCH /api/products/layout/{id}`.
///
/// Always carries a full override.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct LayoutUpdate<'a> {
    pub layout: &'a PresentationOverride,
}

/// Check if a backend error message reports an unchanged value.
pub fn is_not_modified_message(message: &str) -> bool {
    message.to_lowercase().contains("not modified")
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_engine::prelude::ImageSize;

    #[test]
    fn test_products_envelope() {
        let json = r#"{
            "success": true,
            "data": [
                {"_id": "65f0", "name": "Runner", "price": 49.99, "discountPrice": 0, "categories": ["Shoes"]}
            ]
        }"#;
        let envelope: ProductsEnvelope = serde_json::from_str(json).unwrap();
        assert!(envelope.success);
        assert_eq!(envelope.data.len(), 1);
        assert_eq!(envelope.data[0].id.as_str(), "65f0");
    }

    #[test]
    fn test_failed_products_envelope() {
        let json = r#"{"success": false, "error": "Failed to fetch products"}"#;
        let envelope: ProductsEnvelope = serde_json::from_str(json).unwrap();
        assert!(!envelope.success);
        assert!(envelope.data.is_empty());
    }

    #[test]
    fn test_layout_update_body() {
        let layout = PresentationOverride {
            image_size: ImageSize::Large,
            ..PresentationOverride::default()
        };
        let body = serde_json::to_value(LayoutUpdate { layout: &layout }).unwrap();
        assert_eq!(body["layout"]["imageSize"], "large");
        assert_eq!(body["layout"]["borderStyle"], "outlined");
    }

    #[test]
    fn test_not_modified_detection() {
        let json = r#"{"success": false, "error": "Layout was not modified"}"#;
        let envelope: LayoutEnvelope = serde_json::from_str(json).unwrap();
        assert!(is_not_modified_message(envelope.reason().unwrap()));
        assert!(!is_not_modified_message("Layout data is required"));
    }
}
