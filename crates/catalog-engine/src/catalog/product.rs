//! Product records as served by the catalog backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::catalog::PresentationOverride;
use crate::ids::ProductId;
use crate::price::Price;

/// A product in the catalog.
///
/// Search responses may carry abbreviated records, so everything except the
/// id and name falls back to an empty value when absent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product identifier.
    #[serde(rename = "_id", alias = "id")]
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// URL-friendly slug.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// Full description.
    #[serde(default)]
    pub description: String,
    /// List price. Missing or unreadable amounts read as zero.
    #[serde(default, deserialize_with = "lenient_price")]
    pub price: Price,
    /// Discounted price, never above `price` once sanitized.
    #[serde(
        default,
        deserialize_with = "lenient_discount",
        skip_serializing_if = "Option::is_none"
    )]
    pub discount_price: Option<Price>,
    /// Image URI. Renderers fall back to a placeholder when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Categories this product belongs to.
    #[serde(default)]
    pub categories: Vec<String>,
    /// Brand name.
    #[serde(default)]
    pub brand: String,
    /// Available colors.
    #[serde(default)]
    pub colors: Vec<String>,
    /// Available sizes.
    #[serde(default)]
    pub sizes: Vec<String>,
    /// Creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Stored presentation override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<PresentationOverride>,
}

/// Read a loose amount: a number or a numeric string, finite and not negative.
fn loose_amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    let amount = match &value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(amount.filter(|a| a.is_finite() && *a >= 0.0))
}

fn lenient_price<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Price, D::Error> {
    Ok(loose_amount(deserializer)?
        .map(Price::from_decimal)
        .unwrap_or_default())
}

fn lenient_discount<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Price>, D::Error> {
    Ok(loose_amount(deserializer)?.map(Price::from_decimal))
}

impl Product {
    /// Create a bare product with the given id, name and price.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: Price) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            slug: None,
            description: String::new(),
            price,
            discount_price: None,
            image: None,
            categories: Vec::new(),
            brand: String::new(),
            colors: Vec::new(),
            sizes: Vec::new(),
            created_at: None,
            updated_at: None,
            layout: None,
        }
    }

    /// Repair values the backend is known to emit loosely.
    ///
    /// A zero discount is the backend's "no discount" marker. A discount
    /// above the list price breaks the pricing invariant and is dropped.
    pub fn sanitize(mut self) -> Self {
        if let Some(discount) = self.discount_price {
            if discount.is_zero() || discount > self.price {
                self.discount_price = None;
            }
        }
        if self.image.as_deref().is_some_and(|uri| uri.trim().is_empty()) {
            self.image = None;
        }
        self
    }

    /// The layout to render, falling back to the default override.
    pub fn effective_layout(&self) -> PresentationOverride {
        self.layout.unwrap_or_default()
    }

    /// Price the customer pays.
    pub fn selling_price(&self) -> Price {
        self.discount_price.unwrap_or(self.price)
    }

    /// Check if a discount applies.
    pub fn has_discount(&self) -> bool {
        self.discount_price.is_some_and(|d| d < self.price)
    }

    /// Discount as a whole percentage of the list price.
    pub fn discount_percentage(&self) -> Option<u8> {
        let discount = self.discount_price?;
        if self.price.is_zero() || discount >= self.price {
            return None;
        }
        let saved = (self.price.cents() - discount.cents()) as f64;
        Some((saved / self.price.cents() as f64 * 100.0).round() as u8)
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }

    pub fn has_color(&self, color: &str) -> bool {
        self.colors.iter().any(|c| c == color)
    }

    pub fn has_size(&self, size: &str) -> bool {
        self.sizes.iter().any(|s| s == size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ImageSize;

    #[test]
    fn test_product_from_backend_json() {
        let json = r#"{
            "_id": "65f1a2b3c4d5e6f708192a3b",
            "name": "Trail Boot",
            "slug": "trail-boot",
            "description": "Waterproof",
            "price": 89.99,
            "discountPrice": 0,
            "image": "/uploads/boot.png",
            "categories": ["Shoes"],
            "brand": "Nike",
            "colors": ["Black"],
            "sizes": ["L", "XL"],
            "createdAt": "2025-03-01T10:00:00.000Z",
            "updatedAt": "2025-03-02T10:00:00.000Z",
            "layout": {
                "imageSize": "large",
                "textAlignment": "left",
                "showDescription": true,
                "showPrice": true,
                "borderStyle": "outlined"
            }
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        let product = product.sanitize();

        assert_eq!(product.id.as_str(), "65f1a2b3c4d5e6f708192a3b");
        assert_eq!(product.price.cents(), 8999);
        assert_eq!(product.discount_price, None);
        assert_eq!(product.effective_layout().image_size, ImageSize::Large);
        assert!(product.created_at.is_some());
        assert!(product.has_size("XL"));
    }

    #[test]
    fn test_abbreviated_search_record() {
        let json = r#"{"_id": "p1", "name": "Boot", "image": "/boot.png"}"#;
        let product: Product = serde_json::from_str(json).unwrap();

        assert!(product.categories.is_empty());
        assert!(product.brand.is_empty());
        assert_eq!(product.price, Price::ZERO);
        assert_eq!(product.effective_layout(), PresentationOverride::default());
    }

    #[test]
    fn test_loose_prices_do_not_reject_the_catalog() {
        let json = r#"[
            {"_id": "a", "name": "No Price", "price": null},
            {"_id": "b", "name": "Bad Discount", "price": 30, "discountPrice": -1},
            {"_id": "c", "name": "Text Price", "price": "12.50", "discountPrice": "oops"},
            {"_id": "d", "name": "Valid", "price": 40, "discountPrice": 35}
        ]"#;

        let products: Vec<Product> = serde_json::from_str(json).unwrap();
        let products: Vec<Product> = products.into_iter().map(Product::sanitize).collect();

        assert_eq!(products.len(), 4);
        assert_eq!(products[0].price, Price::ZERO);
        assert_eq!(products[1].price, Price::from_decimal(30.0));
        assert_eq!(products[1].discount_price, None);
        assert_eq!(products[2].price.cents(), 1250);
        assert_eq!(products[2].discount_price, None);
        assert_eq!(products[3].discount_price, Some(Price::from_decimal(35.0)));
    }

    #[test]
    fn test_sanitize_drops_discount_above_price() {
        let mut product = Product::new("p1", "Tee", Price::from_decimal(20.0));
        product.discount_price = Some(Price::from_decimal(25.0));
        product.image = Some("  ".to_string());

        let product = product.sanitize();
        assert_eq!(product.discount_price, None);
        assert_eq!(product.image, None);
    }

    #[test]
    fn test_discount_percentage() {
        let mut product = Product::new("p1", "Tee", Price::from_decimal(20.0));
        product.discount_price = Some(Price::from_decimal(15.0));

        assert!(product.has_discount());
        assert_eq!(product.selling_price(), Price::from_decimal(15.0));
        assert_eq!(product.discount_percentage(), Some(25));
    }
}
