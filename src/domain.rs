//! Domain module - catalog records and classification
//!
//! Books, authors, the category registry and the search filter dimensions.
//! Nothing here performs I/O.

pub mod book;
pub mod category;
pub mod constants;
pub mod filters;

pub use book::{Author, Book, Site};
pub use category::{Category, SubCategory};
pub use filters::{Sign, Size, Sort, State, Update, Vip};
