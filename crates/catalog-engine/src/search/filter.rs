//! Facet selection and the facet filter.
//!
//! Groups combine conjunctively, values within a group disjunctively. An
//! empty group does not constrain anything.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::catalog::{LikedSet, Product};
use crate::price::Price;

/// Which part of the catalog is browsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    #[default]
    All,
    Liked,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::All => "all",
            Scope::Liked => "liked",
        }
    }
}

/// Inclusive price window, always inside its slider bounds with `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceWindow {
    min: Price,
    max: Price,
    floor: Price,
    ceiling: Price,
}

impl PriceWindow {
    /// Full-width window over `[floor, ceiling]`.
    pub fn new(floor: Price, ceiling: Price) -> Self {
        let (floor, ceiling) = if floor <= ceiling {
            (floor, ceiling)
        } else {
            (ceiling, floor)
        };
        Self {
            min: floor,
            max: ceiling,
            floor,
            ceiling,
        }
    }

    pub fn min(&self) -> Price {
        self.min
    }

    pub fn max(&self) -> Price {
        self.max
    }

    pub fn floor(&self) -> Price {
        self.floor
    }

    pub fn ceiling(&self) -> Price {
        self.ceiling
    }

    /// Set both ends. Out-of-range values are clamped and reversed ends swapped.
    pub fn set(&mut self, min: Price, max: Price) {
        let a = min.clamp_to(self.floor, self.ceiling);
        let b = max.clamp_to(self.floor, self.ceiling);
        if a <= b {
            self.min = a;
            self.max = b;
        } else {
            self.min = b;
            self.max = a;
        }
    }

    /// Move the lower end; it cannot pass the upper end.
    pub fn set_min(&mut self, min: Price) {
        self.min = min.clamp_to(self.floor, self.max);
    }

    /// Move the upper end; it cannot pass the lower end.
    pub fn set_max(&mut self, max: Price) {
        self.max = max.clamp_to(self.min, self.ceiling);
    }

    /// Reset to the full slider range.
    pub fn reset(&mut self) {
        self.min = self.floor;
        self.max = self.ceiling;
    }

    /// Stretch the slider range to include `price`.
    ///
    /// A full-width window stays full-width; a narrowed one keeps its ends.
    pub fn extend_to(&mut self, price: Price) {
        let full = !self.is_narrowed();
        self.floor = self.floor.min(price);
        self.ceiling = self.ceiling.max(price);
        if full {
            self.reset();
        }
    }

    /// Check if the window is narrower than the slider range.
    pub fn is_narrowed(&self) -> bool {
        self.min > self.floor || self.max < self.ceiling
    }

    pub fn contains(&self, price: Price) -> bool {
        self.min <= price && price <= self.max
    }
}

/// Active facet selections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetSelection {
    pub categories: BTreeSet<String>,
    pub brands: BTreeSet<String>,
    pub colors: BTreeSet<String>,
    pub sizes: BTreeSet<String>,
    pub price: PriceWindow,
    pub scope: Scope,
}

fn toggle(set: &mut BTreeSet<String>, value: &str) -> bool {
    if set.remove(value) {
        false
    } else {
        set.insert(value.to_string());
        true
    }
}

fn any_selected(selected: &BTreeSet<String>, values: &[String]) -> bool {
    selected.is_empty() || values.iter().any(|v| selected.contains(v))
}

impl FacetSelection {
    /// Empty selection with a full-width price window.
    pub fn new(price_floor: Price, price_ceiling: Price) -> Self {
        Self {
            categories: BTreeSet::new(),
            brands: BTreeSet::new(),
            colors: BTreeSet::new(),
            sizes: BTreeSet::new(),
            price: PriceWindow::new(price_floor, price_ceiling),
            scope: Scope::All,
        }
    }

    /// Toggle a category. Returns `true` if it is now selected.
    pub fn toggle_category(&mut self, category: &str) -> bool {
        toggle(&mut self.categories, category)
    }

    /// Toggle a brand. Returns `true` if it is now selected.
    pub fn toggle_brand(&mut self, brand: &str) -> bool {
        toggle(&mut self.brands, brand)
    }

    /// Toggle a color. Returns `true` if it is now selected.
    pub fn toggle_color(&mut self, color: &str) -> bool {
        toggle(&mut self.colors, color)
    }

    /// Toggle a size. Returns `true` if it is now selected.
    pub fn toggle_size(&mut self, size: &str) -> bool {
        toggle(&mut self.sizes, size)
    }

    /// Check if any facet narrows the catalog. Scope is not a filter here.
    pub fn has_active_filters(&self) -> bool {
        !self.categories.is_empty()
            || !self.brands.is_empty()
            || !self.colors.is_empty()
            || !self.sizes.is_empty()
            || self.price.is_narrowed()
    }

    /// Clear every facet group and widen the price window. Keeps the scope.
    pub fn clear(&mut self) {
        self.categories.clear();
        self.brands.clear();
        self.colors.clear();
        self.sizes.clear();
        self.price.reset();
    }

    /// Check a single product against every active facet.
    pub fn matches(&self, product: &Product, liked: &LikedSet) -> bool {
        any_selected(&self.categories, &product.categories)
            && (self.brands.is_empty() || self.brands.contains(&product.brand))
            && any_selected(&self.colors, &product.colors)
            && any_selected(&self.sizes, &product.sizes)
            && self.price.contains(product.price)
            && (self.scope == Scope::All || liked.contains(&product.id))
    }
}

/// Products passing `selection`, in their original order.
pub fn filter_products<'a>(
    products: &'a [Product],
    selection: &FacetSelection,
    liked: &LikedSet,
) -> Vec<&'a Product> {
    products
        .iter()
        .filter(|p| selection.matches(p, liked))
        .collect()
}
