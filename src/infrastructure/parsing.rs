//! HTML parsing infrastructure for Qidian catalog pages
//!
//! Trait-based parsers over `scraper` documents: one for book info pages, one
//! for tabular search listings. Parsers are immutable once built and can be
//! shared freely between concurrent calls.

pub mod book_detail_parser;
pub mod config;
pub mod context;
pub mod error;
pub mod normalize;
pub mod search_result_parser;

// Re-export public types
pub use book_detail_parser::BookDetailParser;
pub use config::{BookDetailSelectors, ParsingConfig, SearchTableSelectors};
pub use context::{DetailParseContext, ListParseContext};
pub use error::{ParsingError, ParsingResult};
pub use normalize::{absolute_url, parse_count, parse_time, parse_time_at};
pub use search_result_parser::SearchResultParser;

use anyhow::Result;
use scraper::{ElementRef, Selector};

/// Parser over an already-parsed document with request context
pub trait ContextualParser {
    type Output;
    type Context;

    /// Parse HTML with contextual information
    fn parse_with_context(
        &self,
        html: &scraper::Html,
        context: &Self::Context,
    ) -> ParsingResult<Self::Output>;
}

/// Compile a configured selector, naming it in the error
pub(crate) fn compile_selector(name: &str, selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| {
        tracing::warn!("Failed to compile selector {} '{}': {}", name, selector, e);
        ParsingError::InvalidSelector {
            selector: format!("{name}: {selector}"),
            reason: e.to_string(),
        }
        .into()
    })
}

/// Concatenated text content of an element
pub(crate) fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect()
}
