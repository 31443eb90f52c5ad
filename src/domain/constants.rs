//! Site characteristics of the Qidian catalog

/// Qidian site constants
pub mod site {
    /// Book info pages
    pub const BOOK_BASE_URL: &str = "https://book.qidian.com";

    /// Catalog and search pages
    pub const CATALOG_BASE_URL: &str = "https://www.qidian.com/";

    /// Path segment of the broad catalog search
    pub const ALL_PATH: &str = "all";

    /// Cookie selecting the tabular listing layout
    pub const LIST_STYLE_COOKIE: (&str, &str) = ("listStyle", "2");

    /// Query parameter selecting the tabular listing layout
    pub const LIST_STYLE_PARAM: (&str, &str) = ("style", "2");

    /// Site timezone offset (China Standard Time, UTC+8)
    pub const UTC_OFFSET_SECONDS: i32 = 8 * 3600;
}
