//! Catalog service: one fetch, then in-memory extraction
//!
//! Coordinates a [`Fetcher`] with the detail and listing parsers, and turns
//! parser failures into [`CatalogError`]s carrying the book id or query URL.

use anyhow::{Context, Result};
use scraper::Html;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::application::search::{CategorySearch, Search};
use crate::domain::{Book, Site};
use crate::error::{CatalogError, CatalogResult};
use crate::infrastructure::config::qidian;
use crate::infrastructure::http_client::{FetchRequest, Fetcher};
use crate::infrastructure::parsing::{
    BookDetailParser, ContextualParser, DetailParseContext, ListParseContext, ParsingConfig,
    ParsingError, SearchResultParser,
};

/// Fetches and extracts books from the catalog
pub struct CatalogService<F: Fetcher> {
    fetcher: F,
    detail_parser: BookDetailParser,
    listing_parser: SearchResultParser,
}

impl<F: Fetcher> CatalogService<F> {
    /// Create a service with the default selectors
    pub fn new(fetcher: F) -> Result<Self> {
        Self::with_config(fetcher, &ParsingConfig::default())
    }

    /// Create a service with configured selectors
    pub fn with_config(fetcher: F, config: &ParsingConfig) -> Result<Self> {
        let detail_parser = BookDetailParser::with_config(&config.book_detail)
            .context("Failed to create book detail parser")?;
        let listing_parser = SearchResultParser::with_config(&config.search_table)
            .context("Failed to create search result parser")?;

        Ok(Self {
            fetcher,
            detail_parser,
            listing_parser,
        })
    }

    pub const fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Fetch a book's info page and extract it
    pub async fn fetch_book(&self, id: &str, cancel: &CancellationToken) -> CatalogResult<Book> {
        let id = id.trim();
        if id.is_empty() {
            return Err(CatalogError::validation("book id must not be empty"));
        }

        let context = DetailParseContext::new(id);
        info!("Fetching book {} from {}", id, context.url);

        let body = self
            .fetcher
            .get(&FetchRequest::new(context.url.as_str()), cancel)
            .await?;
        self.extract_book(&context, &body)
    }

    /// Run a broad catalog search and extract the listing
    pub async fn execute_category_search(
        &self,
        search: &CategorySearch,
        cancel: &CancellationToken,
    ) -> CatalogResult<Vec<Book>> {
        self.fetch_listing(search.url(), search.site(), cancel).await
    }

    /// Run a narrow search and extract the listing
    pub async fn execute_search(
        &self,
        search: &Search,
        cancel: &CancellationToken,
    ) -> CatalogResult<Vec<Book>> {
        self.fetch_listing(search.url(), search.site(), cancel).await
    }

    async fn fetch_listing(
        &self,
        url: String,
        site: Site,
        cancel: &CancellationToken,
    ) -> CatalogResult<Vec<Book>> {
        let (cookie, value) = qidian::LIST_STYLE_COOKIE;
        let request = FetchRequest::new(url.as_str()).with_cookie(cookie, value);
        info!("Fetching search listing from {}", url);

        let body = self.fetcher.get(&request, cancel).await?;
        self.extract_listing(&ListParseContext::new(url, site), &body)
    }

    fn extract_book(&self, context: &DetailParseContext, body: &[u8]) -> CatalogResult<Book> {
        let document = String::from_utf8_lossy(body).into_owned();
        let html = Html::parse_document(&document);

        match self.detail_parser.parse_with_context(&html, context) {
            Ok(book) => {
                info!("Extracted book: {}", book);
                Ok(book)
            }
            Err(source) => Err(CatalogError::Extraction {
                book_id: context.book_id.clone(),
                source,
                document,
            }),
        }
    }

    fn extract_listing(&self, context: &ListParseContext, body: &[u8]) -> CatalogResult<Vec<Book>> {
        let html = Html::parse_document(&String::from_utf8_lossy(body));

        let books = self
            .listing_parser
            .parse_with_context(&html, context)
            .map_err(|source| match source {
                ParsingError::TableNotFound { url } => CatalogError::NotFound { url },
                source => CatalogError::Listing {
                    url: context.url.clone(),
                    source,
                },
            })?;

        debug!("Listing {} returned {} books", context.url, books.len());
        Ok(books)
    }
}
