use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::category::{Category, SubCategory};
use super::constants::site;

/// Catalog variant a book is listed on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Site {
    /// Main catalog (www.qidian.com/all)
    #[default]
    Main,
    /// Female-audience catalog (www.qidian.com/mm/all)
    Female,
}

impl Site {
    /// Leading URL path segment; empty for the main catalog
    pub const fn code(self) -> &'static str {
        match self {
            Self::Main => "",
            Self::Female => "mm",
        }
    }
}

/// Book author as shown on detail and listing pages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Numeric author id; only present when the page links to the author profile
    pub id: Option<String>,
    pub name: String,
}

/// Bibliographic record extracted from a detail page or a listing row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: String,
    pub site: Site,
    pub title: String,
    pub author: Author,
    /// Absolute cover image URL
    pub cover_url: String,
    /// Short description
    pub summary: String,
    /// Long description, whitespace-trimmed
    pub introduction: String,
    pub category: Category,
    pub sub_category: SubCategory,
    pub tags: Vec<String>,
    pub last_updated: Option<DateTime<Utc>>,
    /// `None` while the book is ongoing or the page does not say
    pub finished: Option<DateTime<Utc>>,
    pub word_count: u64,

    // Counters are `None` when the page does not report them.
    /// Only reported by listings sorted or filtered by bookmarks
    pub bookmark_count: Option<u64>,
    pub month_ticket_count: Option<u64>,
    pub week_recommend_count: Option<u64>,
    pub month_recommend_count: Option<u64>,
    pub total_recommend_count: Option<u64>,
}

impl Book {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// URL of the book's info page
    pub fn url(&self) -> String {
        detail_url(&self.id)
    }

    pub fn is_finished(&self) -> bool {
        self.finished.is_some()
    }
}

/// Info page URL for a book id
pub fn detail_url(id: &str) -> String {
    format!("{}/info/{}/", site::BOOK_BASE_URL, id)
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) by {}", self.title, self.id, self.author.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_url() {
        let book = Book::new("1004608738");
        assert_eq!(book.url(), "https://book.qidian.com/info/1004608738/");
    }

    #[test]
    fn test_default_book_is_unfinished_and_uncounted() {
        let book = Book::default();
        assert!(!book.is_finished());
        assert_eq!(book.site, Site::Main);
        assert_eq!(book.month_ticket_count, None);
        assert_eq!(book.word_count, 0);
    }

    #[test]
    fn test_site_codes() {
        assert_eq!(Site::Main.code(), "");
        assert_eq!(Site::Female.code(), "mm");
    }
}
