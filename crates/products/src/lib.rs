//! `stockbook-products` — product master data.
//!
//! Products carry costing *inputs* (standard cost, reorder point) but never a
//! derived cost: average unit cost is always recomputed from the movement
//! ledger, so there is nothing here for it to go stale on.

pub mod catalog;
pub mod product;

pub use catalog::{CatalogError, InMemoryProductCatalog, ProductCatalog};
pub use product::{Product, ProductStatus, UnitOfMeasure};
