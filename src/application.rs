//! Application layer
//!
//! Query builders and the service that runs them against the catalog.

pub mod catalog_service;
pub mod search;

pub use catalog_service::CatalogService;
pub use search::{CategorySearch, CategorySearchBuilder, Search, SearchBuilder};
