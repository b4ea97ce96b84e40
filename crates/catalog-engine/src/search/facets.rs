//! Facet options derived from the catalog.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::config::FacetVocabulary;
use crate::price::Price;
use crate::search::FacetSelection;

/// Type of facet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FacetType {
    /// Discrete values (e.g., categories, colors).
    Terms,
    /// Numeric range (e.g., price).
    Range,
}

/// A facet for filtering.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Facet {
    /// Facet name (e.g., "Category").
    pub name: String,
    /// Product field this facet filters on.
    pub field: String,
    /// Type of facet.
    pub facet_type: FacetType,
    /// Facet values, sorted by value.
    pub values: Vec<FacetValue>,
}

/// A single facet value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FacetValue {
    /// The value.
    pub value: String,
    /// Number of catalog products carrying this value.
    pub count: usize,
    /// Whether currently selected.
    pub selected: bool,
}

impl Facet {
    fn terms<'a>(
        name: &str,
        field: &str,
        vocabulary: &[String],
        per_product: impl Iterator<Item = &'a [String]>,
        selected: &BTreeSet<String>,
    ) -> Self {
        let mut counts: BTreeMap<&str, usize> =
            vocabulary.iter().map(|v| (v.as_str(), 0)).collect();

        for values in per_product {
            let mut seen: Vec<&str> = Vec::with_capacity(values.len());
            for value in values {
                // Duplicate values on one product count once.
                if value.is_empty() || seen.contains(&value.as_str()) {
                    continue;
                }
                seen.push(value.as_str());
                *counts.entry(value.as_str()).or_insert(0) += 1;
            }
        }
        for value in selected {
            counts.entry(value.as_str()).or_insert(0);
        }

        Self {
            name: name.to_string(),
            field: field.to_string(),
            facet_type: FacetType::Terms,
            values: counts
                .into_iter()
                .map(|(value, count)| FacetValue {
                    value: value.to_string(),
                    count,
                    selected: selected.contains(value),
                })
                .collect(),
        }
    }

    /// Look up a value.
    pub fn value(&self, value: &str) -> Option<&FacetValue> {
        self.values.iter().find(|v| v.value == value)
    }
}

/// Every facet offered to the user, plus the observed price bounds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FacetOptions {
    pub categories: Facet,
    pub brands: Facet,
    pub colors: Facet,
    pub sizes: Facet,
    /// Lowest and highest list price in the catalog, if any products exist.
    pub price_bounds: Option<(Price, Price)>,
}

impl FacetOptions {
    /// Derive options from the whole catalog (not the filtered subset).
    pub fn from_products(
        products: &[Product],
        vocabulary: &FacetVocabulary,
        selection: &FacetSelection,
    ) -> Self {
        let brands: Vec<[String; 1]> = products.iter().map(|p| [p.brand.clone()]).collect();

        let price_bounds = products.iter().map(|p| p.price).fold(None, |acc, price| {
            Some(match acc {
                None => (price, price),
                Some((lo, hi)) => (std::cmp::min(lo, price), std::cmp::max(hi, price)),
            })
        });

        Self {
            categories: Facet::terms(
                "Category",
                "categories",
                &vocabulary.categories,
                products.iter().map(|p| p.categories.as_slice()),
                &selection.categories,
            ),
            brands: Facet::terms(
                "Brand",
                "brand",
                &vocabulary.brands,
                brands.iter().map(|b| b.as_slice()),
                &selection.brands,
            ),
            colors: Facet::terms(
                "Color",
                "colors",
                &vocabulary.colors,
                products.iter().map(|p| p.colors.as_slice()),
                &selection.colors,
            ),
            sizes: Facet::terms(
                "Size",
                "sizes",
                &vocabulary.sizes,
                products.iter().map(|p| p.sizes.as_slice()),
                &selection.sizes,
            ),
            price_bounds,
        }
    }

    /// All term facets in display order.
    pub fn facets(&self) -> [&Facet; 4] {
        [&self.categories, &self.brands, &self.colors, &self.sizes]
    }
}
