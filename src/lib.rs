//! Qidian Catalog - bibliographic extraction for the Qidian literature catalog
//!
//! Builds canonical search URLs over the catalog's filter dimensions, fetches
//! book info pages and tabular listings, and extracts typed [`Book`] records
//! from them.

// Module declarations
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use application::{CatalogService, CategorySearch, Search};
pub use domain::{Author, Book, Category, Sign, Site, Size, Sort, State, SubCategory, Update, Vip};
pub use error::{CatalogError, CatalogResult};
