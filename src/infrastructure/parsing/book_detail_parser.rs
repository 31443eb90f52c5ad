//! Book info page parser
//!
//! Required fields come from `og:` metadata tags and abort the parse when
//! missing. Everything else is read from the info block, the status block and
//! the monthly ticket widget, falling back to empty values when absent.

use anyhow::{Context, Result};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use super::config::BookDetailSelectors;
use super::context::DetailParseContext;
use super::normalize::{absolute_url, parse_count, parse_time};
use super::{ContextualParser, ParsingError, ParsingResult, compile_selector, element_text};
use crate::domain::{Author, Book, Category, SubCategory};

/// Author profile link; group 1 is the author id
pub(crate) const AUTHOR_URL_PATTERN: &str = r"//my\.qidian\.com/author/(\d+)/";

/// Catalog link; groups are the category and sub-category codes
const CATEGORY_URL_PATTERN: &str = r"//www\.qidian\.com/all/chanId(\d+)-subCateId(\d+)/";

const WORD_COUNT_SUFFIX: &str = "字";
const TOTAL_RECOMMEND_SUFFIX: &str = "总推荐";
const WEEK_RECOMMEND_SUFFIX: &str = "周推荐";

/// Parser for book info pages
pub struct BookDetailParser {
    title_meta: Selector,
    update_time_meta: Selector,
    description_meta: Selector,
    cover_meta: Selector,
    info_block: Selector,
    writer_link: Selector,
    links: Selector,
    info_tags: Selector,
    summary: Selector,
    counters: Selector,
    state_block: Selector,
    state_tags: Selector,
    month_ticket: Selector,
    author_url_pattern: Regex,
    category_url_pattern: Regex,
}

/// The info block with the author's container pruned away.
///
/// Produced by [`BookDetailParser::extract_author`]. Later extraction steps
/// query the info block only through this view, so the author line never
/// leaks into tags, summary or counters. The parsed document itself is left
/// untouched.
struct InfoBlock<'a> {
    root: Option<ElementRef<'a>>,
    removed: Option<ElementRef<'a>>,
}

impl<'a> InfoBlock<'a> {
    fn is_removed(&self, element: &ElementRef<'a>) -> bool {
        self.removed.is_some_and(|removed| {
            element.id() == removed.id() || element.ancestors().any(|a| a.id() == removed.id())
        })
    }

    /// Elements under the block matching `selector`, minus the pruned subtree
    fn select<'s>(&'s self, selector: &'s Selector) -> impl Iterator<Item = ElementRef<'a>> + 's {
        self.root
            .into_iter()
            .flat_map(move |root| root.select(selector))
            .filter(move |element| !self.is_removed(element))
    }

    /// Text content of `element`, skipping anything inside the pruned subtree
    fn text_of(&self, element: ElementRef<'a>) -> String {
        let removed_id = self.removed.map(|removed| removed.id());
        element
            .descendants()
            .filter(|node| {
                removed_id.is_none_or(|id| {
                    node.id() != id && node.ancestors().all(|a| a.id() != id)
                })
            })
            .filter_map(|node| node.value().as_text().map(|text| &**text))
            .collect()
    }
}

impl BookDetailParser {
    /// Create a new parser with default selectors
    pub fn new() -> Result<Self> {
        Self::with_config(&BookDetailSelectors::default())
    }

    /// Create parser with custom selector configuration
    pub fn with_config(selectors: &BookDetailSelectors) -> Result<Self> {
        Ok(Self {
            title_meta: compile_selector("title_meta", &selectors.title_meta)?,
            update_time_meta: compile_selector("update_time_meta", &selectors.update_time_meta)?,
            description_meta: compile_selector("description_meta", &selectors.description_meta)?,
            cover_meta: compile_selector("cover_meta", &selectors.cover_meta)?,
            info_block: compile_selector("info_block", &selectors.info_block)?,
            writer_link: compile_selector("writer_link", &selectors.writer_link)?,
            links: compile_selector("links", &selectors.links)?,
            info_tags: compile_selector("info_tags", &selectors.info_tags)?,
            summary: compile_selector("summary", &selectors.summary)?,
            counters: compile_selector("counters", &selectors.counters)?,
            state_block: compile_selector("state_block", &selectors.state_block)?,
            state_tags: compile_selector("state_tags", &selectors.state_tags)?,
            month_ticket: compile_selector("month_ticket", &selectors.month_ticket)?,
            author_url_pattern: Regex::new(AUTHOR_URL_PATTERN)
                .context("Failed to compile author URL pattern")?,
            category_url_pattern: Regex::new(CATEGORY_URL_PATTERN)
                .context("Failed to compile category URL pattern")?,
        })
    }

    /// Parse a raw page body for the given book id
    pub fn parse(&self, book_id: &str, body: &str) -> ParsingResult<Book> {
        let html = Html::parse_document(body);
        self.parse_with_context(&html, &DetailParseContext::new(book_id))
    }

    fn required_meta(&self, html: &Html, selector: &Selector, field: &str) -> ParsingResult<String> {
        html.select(selector)
            .next()
            .and_then(|meta| meta.value().attr("content"))
            .map(ToString::to_string)
            .ok_or_else(|| ParsingError::required_field_missing(field, Some("book info page")))
    }

    /// Read the author, then prune the author's container from the info block
    fn extract_author<'a>(&self, html: &'a Html) -> (Author, InfoBlock<'a>) {
        let root = html.select(&self.info_block).next();
        let Some(writer) = root.and_then(|root| root.select(&self.writer_link).next()) else {
            debug!("No author link in info block");
            return (Author::default(), InfoBlock { root, removed: None });
        };

        let author = Author {
            id: writer
                .value()
                .attr("href")
                .and_then(|href| self.author_url_pattern.captures(href))
                .map(|captures| captures[1].to_string()),
            name: element_text(&writer).trim().to_string(),
        };
        // A writer sitting directly in the block takes only itself out
        let removed = match writer.parent().and_then(ElementRef::wrap) {
            Some(parent) if root.is_none_or(|root| root.id() != parent.id()) => parent,
            _ => writer,
        };

        (author, InfoBlock { root, removed: Some(removed) })
    }

    /// Scan info block links for catalog URLs; the last match wins
    fn extract_category(&self, info: &InfoBlock<'_>) -> Option<(Category, SubCategory)> {
        let (count, last) = info
            .select(&self.links)
            .filter_map(|link| link.value().attr("href"))
            .flat_map(|href| self.category_url_pattern.captures_iter(href))
            .fold((0usize, None), |(count, _), captures| {
                (
                    count + 1,
                    Some((Category::new(&captures[1]), SubCategory::new(&captures[2]))),
                )
            });

        match count {
            0 => debug!("No category link found in info block"),
            1 => {}
            n => debug!("Found {} category links, using the last one", n),
        }
        last
    }

    /// Info block tags followed by status block tags, in document order
    fn extract_tags(&self, html: &Html, info: &InfoBlock<'_>) -> Vec<String> {
        let state_tags = html
            .select(&self.state_block)
            .flat_map(|block| block.select(&self.state_tags))
            .map(|tag| element_text(&tag));

        info.select(&self.info_tags)
            .map(|tag| info.text_of(tag))
            .chain(state_tags)
            .map(|tag| tag.trim().to_string())
            .filter(|tag| !tag.is_empty())
            .collect()
    }

    /// Classify each counter by its trailing keyword; stops at the first bad number
    fn extract_counters(&self, info: &InfoBlock<'_>, book: &mut Book) -> ParsingResult<()> {
        for cite in info.select(&self.counters) {
            let mut text = cite
                .prev_siblings()
                .find_map(ElementRef::wrap)
                .map(|value| info.text_of(value))
                .unwrap_or_default();
            text.push_str(&info.text_of(cite));
            let text = text.trim();

            if let Some(number) = text.strip_suffix(WORD_COUNT_SUFFIX) {
                book.word_count = parse_count(number)?;
            } else if let Some(number) = text.strip_suffix(TOTAL_RECOMMEND_SUFFIX) {
                book.total_recommend_count = Some(parse_count(number)?);
            } else if let Some(number) = text.strip_suffix(WEEK_RECOMMEND_SUFFIX) {
                book.week_recommend_count = Some(parse_count(number)?);
            } else {
                debug!("Ignoring unrecognized counter '{}'", text);
            }
        }
        Ok(())
    }
}

impl ContextualParser for BookDetailParser {
    type Output = Book;
    type Context = DetailParseContext;

    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> ParsingResult<Book> {
        debug!("Parsing book detail from: {}", context.url);

        let mut book = Book::new(context.book_id.as_str());

        book.title = self
            .required_meta(html, &self.title_meta, "og:novel:book_name")?
            .trim()
            .to_string();
        let last_updated = self.required_meta(html, &self.update_time_meta, "og:novel:update_time")?;
        book.last_updated = Some(parse_time(&last_updated)?);

        let (author, info) = self.extract_author(html);
        book.author = author;

        if let Some((category, sub_category)) = self.extract_category(&info) {
            if category.name().is_none() {
                warn!("Book {} has unregistered category code {}", book.id, category);
            }
            book.category = category;
            book.sub_category = sub_category;
        }
        book.site = book.category.site();

        book.cover_url = html
            .select(&self.cover_meta)
            .next()
            .and_then(|meta| meta.value().attr("content"))
            .map(absolute_url)
            .unwrap_or_default();

        book.tags = self.extract_tags(html, &info);
        book.summary = info
            .select(&self.summary)
            .map(|summary| info.text_of(summary))
            .collect::<String>()
            .trim()
            .to_string();
        book.introduction = self
            .required_meta(html, &self.description_meta, "og:description")?
            .trim()
            .to_string();

        self.extract_counters(&info, &mut book)?;

        book.month_ticket_count = html
            .select(&self.month_ticket)
            .next()
            .map(|ticket| parse_count(&element_text(&ticket)))
            .transpose()?;

        debug!("Extracted book: {}", book);
        Ok(book)
    }
}
