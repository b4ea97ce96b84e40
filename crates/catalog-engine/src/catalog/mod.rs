//! Product catalog module.
//!
//! Contains product records, presentation overrides, the in-memory product
//! store and the liked set.

mod layout;
mod liked;
mod product;
mod store;

pub use layout::{BorderStyle, ImageSize, LayoutPatch, PresentationOverride, TextAlignment};
pub use liked::{JsonFileLikedStore, LikedSet, LikedStore, MemoryLikedStore};
pub use product::Product;
pub use store::ProductStore;
