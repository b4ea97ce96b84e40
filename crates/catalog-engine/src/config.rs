//! Engine configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::price::Price;

/// Tunables for the catalog view and its sessions.
///
/// Every field has a default so a partial `[engine]` table is enough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Products per page.
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Trailing debounce applied to search input, in milliseconds.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Lowest value the price slider can take.
    #[serde(default)]
    pub price_floor: Price,

    /// Highest value the price slider can take.
    #[serde(default = "default_price_ceiling")]
    pub price_ceiling: Price,

    /// Width of the page-number window.
    #[serde(default = "default_max_visible_pages")]
    pub max_visible_pages: usize,

    /// Maximum records returned by a local search.
    #[serde(default = "default_search_result_limit")]
    pub search_result_limit: usize,

    /// Facet vocabularies offered even when no product uses them yet.
    #[serde(default)]
    pub vocabulary: FacetVocabulary,
}

fn default_page_size() -> usize {
    6
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_price_ceiling() -> Price {
    Price::from_decimal(1000.0)
}

fn default_max_visible_pages() -> usize {
    5
}

fn default_search_result_limit() -> usize {
    10
}

impl EngineConfig {
    /// Debounce delay as a duration.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Page size, never zero.
    pub fn effective_page_size(&self) -> usize {
        self.page_size.max(1)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            debounce_ms: default_debounce_ms(),
            price_floor: Price::ZERO,
            price_ceiling: default_price_ceiling(),
            max_visible_pages: default_max_visible_pages(),
            search_result_limit: default_search_result_limit(),
            vocabulary: FacetVocabulary::default(),
        }
    }
}

/// Default facet values merged into the derived facet options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetVocabulary {
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub brands: Vec<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub sizes: Vec<String>,
}

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

impl Default for FacetVocabulary {
    fn default() -> Self {
        Self {
            categories: owned(&["T-Shirt", "Shirt", "Trousers", "Shoes"]),
            brands: owned(&["Nike", "Adidas", "Other"]),
            colors: owned(&["Red", "Blue", "Green", "Black", "White"]),
            sizes: owned(&["S", "M", "L", "XL", "XXL"]),
        }
    }
}
