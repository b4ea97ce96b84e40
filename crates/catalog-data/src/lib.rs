//! Catalog backend adapters.
//!
//! This crate provides:
//! - `HttpCatalogClient` - The catalog backend over HTTP, with timeouts
//! - `InMemoryCatalog` - A local catalog, optionally loaded from a fixture file
//! - `TimeoutConfig` - Per-client timeouts
//!
//! Both adapters implement every service trait of `catalog-engine`.

mod client;
mod error;
mod memory;
mod timeout;
mod wire;

pub use client::*;
pub use error::*;
pub use memory::*;
pub use timeout::*;
pub use wire::*;
