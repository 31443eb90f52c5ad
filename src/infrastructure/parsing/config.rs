//! Parsing configuration for HTML extraction
//!
//! Centralized CSS selectors for book detail pages and search listings. All of
//! them can be overridden from the `[parsing]` section of the config file when
//! the site markup drifts.

use serde::{Deserialize, Serialize};

/// Main parsing configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsingConfig {
    pub book_detail: BookDetailSelectors,
    pub search_table: SearchTableSelectors,
}

/// CSS selectors for book info pages
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BookDetailSelectors {
    /// Metadata tags
    pub title_meta: String,
    pub update_time_meta: String,
    pub description_meta: String,
    pub cover_meta: String,

    /// Info block holding author, category links, tags, summary and counters
    pub info_block: String,
    /// Author link, relative to the info block; its parent is dropped after reading
    pub writer_link: String,
    /// Category links, relative to the info block
    pub links: String,
    pub info_tags: String,
    pub summary: String,
    /// Counter values; each is read together with its preceding sibling
    pub counters: String,

    /// Status block holding the second tag list
    pub state_block: String,
    pub state_tags: String,

    /// Monthly ticket count, searched in the whole document
    pub month_ticket: String,
}

impl Default for BookDetailSelectors {
    fn default() -> Self {
        Self {
            title_meta: r#"meta[property="og:novel:book_name"]"#.to_string(),
            update_time_meta: r#"meta[property="og:novel:update_time"]"#.to_string(),
            description_meta: r#"meta[property="og:description"]"#.to_string(),
            cover_meta: r#"meta[property="og:image"]"#.to_string(),
            info_block: ".book-info".to_string(),
            writer_link: "a.writer".to_string(),
            links: "a".to_string(),
            info_tags: ".tag > span".to_string(),
            summary: ".intro".to_string(),
            counters: ".intro + p > cite".to_string(),
            state_block: ".book-state".to_string(),
            state_tags: ".tags".to_string(),
            month_ticket: "#monthCount".to_string(),
        }
    }
}

/// CSS selectors for tabular search listings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchTableSelectors {
    pub table: String,
    pub header_cells: String,
    pub rows: String,
    /// Anchor inside the title cell carrying the book id
    pub title_link: String,
    /// Attribute on [`Self::title_link`] holding the book id
    pub book_id_attr: String,
    pub author_link: String,
}

impl Default for SearchTableSelectors {
    fn default() -> Self {
        Self {
            table: "table.rank-table-list".to_string(),
            header_cells: "thead > tr > th".to_string(),
            rows: "tbody > tr".to_string(),
            title_link: "a".to_string(),
            book_id_attr: "data-bid".to_string(),
            author_link: "a".to_string(),
        }
    }
}
