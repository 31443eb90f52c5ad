//! Parsing context for HTML extraction
//!
//! Identifies what is being parsed so that results and errors can be tied back
//! to the request that produced the page.

use crate::domain::Site;
use crate::domain::book::detail_url;

/// Context for a book info page
#[derive(Debug, Clone)]
pub struct DetailParseContext {
    pub book_id: String,

    /// Info page URL the document was fetched from
    pub url: String,
}

impl DetailParseContext {
    pub fn new(book_id: impl Into<String>) -> Self {
        let book_id = book_id.into();
        let url = detail_url(&book_id);
        Self { book_id, url }
    }
}

/// Context for a search listing page
#[derive(Debug, Clone)]
pub struct ListParseContext {
    /// Search URL the listing was fetched from
    pub url: String,

    /// Catalog the search ran against; stamped on every parsed book
    pub site: Site,
}

impl ListParseContext {
    pub fn new(url: impl Into<String>, site: Site) -> Self {
        Self {
            url: url.into(),
            site,
        }
    }
}
