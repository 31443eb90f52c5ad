//! Search listing parser
//!
//! Listings are rendered as a table whose header row names the columns. Cells
//! are dispatched by the header label at the same position, so the parser
//! follows whatever column set the site chose for the current sort order.

use anyhow::{Context, Result};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use super::book_detail_parser::AUTHOR_URL_PATTERN;
use super::config::SearchTableSelectors;
use super::context::ListParseContext;
use super::normalize::{parse_count, parse_time};
use super::{ContextualParser, ParsingError, ParsingResult, compile_selector, element_text};
use crate::domain::{Book, Category, SubCategory};

/// Known column labels
mod column {
    pub const CATEGORY: &str = "类别";
    pub const TITLE: &str = "小说书名";
    pub const AUTHOR: &str = "小说作者";
    pub const WORD_COUNT: &str = "字数";
    pub const BOOKMARK: &str = "总收藏";
    pub const WEEK_RECOMMEND: &str = "周推荐";
    pub const MONTH_RECOMMEND: &str = "月推荐";
    pub const TOTAL_RECOMMEND: &str = "总推荐";
    pub const LAST_UPDATED: &str = "更新时间";
    pub const FINISHED: &str = "完本时间";
}

const CATEGORY_BRACKETS: &[char] = &['「', '」'];
const CATEGORY_SEPARATOR: char = '·';

/// Parser for tabular search listings
pub struct SearchResultParser {
    table: Selector,
    header_cells: Selector,
    rows: Selector,
    title_link: Selector,
    author_link: Selector,
    book_id_attr: String,
    author_url_pattern: Regex,
}

impl SearchResultParser {
    /// Create a new parser with default selectors
    pub fn new() -> Result<Self> {
        Self::with_config(&SearchTableSelectors::default())
    }

    /// Create parser with custom selector configuration
    pub fn with_config(selectors: &SearchTableSelectors) -> Result<Self> {
        Ok(Self {
            table: compile_selector("table", &selectors.table)?,
            header_cells: compile_selector("header_cells", &selectors.header_cells)?,
            rows: compile_selector("rows", &selectors.rows)?,
            title_link: compile_selector("title_link", &selectors.title_link)?,
            author_link: compile_selector("author_link", &selectors.author_link)?,
            book_id_attr: selectors.book_id_attr.clone(),
            author_url_pattern: Regex::new(AUTHOR_URL_PATTERN)
                .context("Failed to compile author URL pattern")?,
        })
    }

    /// Parse a raw listing body
    pub fn parse(&self, body: &str, context: &ListParseContext) -> ParsingResult<Vec<Book>> {
        let html = Html::parse_document(body);
        self.parse_with_context(&html, context)
    }

    fn parse_row(
        &self,
        index: usize,
        row: ElementRef<'_>,
        columns: &[String],
        context: &ListParseContext,
    ) -> ParsingResult<Book> {
        let cells: Vec<ElementRef<'_>> = row
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|cell| cell.value().name() == "td")
            .collect();

        let mut book = Book {
            site: context.site,
            ..Book::default()
        };

        for (position, label) in columns.iter().enumerate() {
            let cell = cells
                .get(position)
                .ok_or_else(|| ParsingError::missing_cell(index, label))?;
            self.apply_cell(&mut book, label, *cell)?;
        }

        Ok(book)
    }

    fn apply_cell(&self, book: &mut Book, label: &str, cell: ElementRef<'_>) -> ParsingResult<()> {
        let text = element_text(&cell);
        let text = text.trim();

        match label {
            column::CATEGORY => {
                let (category, sub_category) = parse_category_cell(text)?;
                book.category = category;
                book.sub_category = sub_category;
            }
            column::TITLE => {
                book.title = text.to_string();
                book.id = cell
                    .select(&self.title_link)
                    .next()
                    .and_then(|link| link.value().attr(&self.book_id_attr))
                    .unwrap_or_default()
                    .to_string();
            }
            column::AUTHOR => {
                book.author.name = text.to_string();
                book.author.id = cell
                    .select(&self.author_link)
                    .next()
                    .and_then(|link| link.value().attr("href"))
                    .and_then(|href| self.author_url_pattern.captures(href))
                    .map(|captures| captures[1].to_string());
            }
            column::WORD_COUNT => book.word_count = parse_count(text)?,
            column::BOOKMARK => book.bookmark_count = Some(parse_count(text)?),
            column::WEEK_RECOMMEND => book.week_recommend_count = Some(parse_count(text)?),
            column::MONTH_RECOMMEND => book.month_recommend_count = Some(parse_count(text)?),
            column::TOTAL_RECOMMEND => book.total_recommend_count = Some(parse_count(text)?),
            column::LAST_UPDATED => book.last_updated = Some(parse_time(text)?),
            column::FINISHED => book.finished = Some(parse_time(text)?),
            _ => {}
        }
        Ok(())
    }
}

/// Split `「category·sub-category」` into registry codes.
///
/// Names missing from the registry resolve to empty codes. The sub-category is
/// only looked up under the resolved category, so an unknown category also
/// leaves the sub-category empty.
fn parse_category_cell(text: &str) -> ParsingResult<(Category, SubCategory)> {
    let inner = text.trim().trim_matches(CATEGORY_BRACKETS);
    let (category_name, sub_name) = inner
        .split_once(CATEGORY_SEPARATOR)
        .ok_or_else(|| ParsingError::InvalidCategory {
            text: text.to_string(),
        })?;

    let category = Category::from_name(category_name);
    if category.is_empty() {
        warn!("Unknown category name '{}'", category_name.trim());
    }
    let sub_category = SubCategory::from_name_in(&category, sub_name);
    if sub_category.is_empty() {
        warn!("Unknown sub-category name '{}'", sub_name.trim());
    }

    Ok((category, sub_category))
}

impl ContextualParser for SearchResultParser {
    type Output = Vec<Book>;
    type Context = ListParseContext;

    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> ParsingResult<Vec<Book>> {
        debug!("Parsing search listing from: {}", context.url);

        let table = html
            .select(&self.table)
            .next()
            .ok_or_else(|| ParsingError::TableNotFound {
                url: context.url.clone(),
            })?;

        let columns: Vec<String> = table
            .select(&self.header_cells)
            .map(|th| element_text(&th).trim().to_string())
            .collect();
        debug!("Listing columns: {:?}", columns);

        let books = table
            .select(&self.rows)
            .enumerate()
            .map(|(index, row)| self.parse_row(index, row, &columns, context))
            .collect::<ParsingResult<Vec<_>>>()?;

        debug!("Parsed {} books from listing", books.len());
        Ok(books)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Site;
    use rstest::rstest;

    const URL: &str = "https://www.qidian.com/all?style=2";

    fn listing(headers: &[&str], rows: &[&[&str]]) -> String {
        let head: String = headers.iter().map(|h| format!("<th>{h}</th>")).collect();
        let body: String = rows
            .iter()
            .map(|cells| {
                let tds: String = cells.iter().map(|c| format!("<td>{c}</td>")).collect();
                format!("<tr>{tds}</tr>")
            })
            .collect();
        format!(
            r#"<html><body><table class="rank-table-list">
<thead><tr>{head}</tr></thead><tbody>{body}</tbody></table></body></html>"#
        )
    }

    fn parse(body: &str) -> ParsingResult<Vec<Book>> {
        SearchResultParser::new()
            .unwrap()
            .parse(body, &ListParseContext::new(URL, Site::Main))
    }

    #[test]
    fn test_parser_creation() {
        assert!(SearchResultParser::new().is_ok());
    }

    #[test]
    fn test_title_and_word_count() {
        let body = listing(&["小说书名", "字数"], &[&["Example Title", "3000"]]);
        let books = parse(&body).unwrap();

        assert_eq!(books.len(), 1);
        assert_eq!(books[0].title, "Example Title");
        assert_eq!(books[0].word_count, 3000);
        assert_eq!(books[0].site, Site::Main);
    }

    #[test]
    fn test_short_row_fails() {
        let body = listing(&["小说书名", "字数"], &[&["Example Title"]]);
        assert_eq!(
            parse(&body).unwrap_err(),
            ParsingError::missing_cell(0, "字数")
        );
    }

    #[test]
    fn test_missing_table() {
        let err = parse("<html><body><p>nothing here</p></body></html>").unwrap_err();
        assert_eq!(err, ParsingError::TableNotFound { url: URL.to_string() });
    }

    #[test]
    fn test_full_row() {
        let body = listing(
            &["类别", "小说书名", "小说作者", "总收藏", "月推荐", "更新时间", "完本时间", "操作"],
            &[&[
                "「玄幻·东方玄幻」",
                r#"<a href="//book.qidian.com/info/1004608738/" data-bid="1004608738">圣墟</a>"#,
                r#"<a href="//my.qidian.com/author/4362245/">辰东</a>"#,
                "1.5万",
                "300",
                "2020-09-08 21:18",
                "2020-10-01 12:00",
                "加入书架",
            ]],
        );
        let book = parse(&body).unwrap().remove(0);

        assert_eq!(book.id, "1004608738");
        assert_eq!(book.title, "圣墟");
        assert_eq!(book.author.name, "辰东");
        assert_eq!(book.author.id.as_deref(), Some("4362245"));
        assert_eq!(book.category.code(), "21");
        assert_eq!(book.sub_category.code(), "8");
        assert_eq!(book.bookmark_count, Some(15_000));
        assert_eq!(book.month_recommend_count, Some(300));
        assert!(book.last_updated.is_some());
        assert!(book.is_finished());
        assert_eq!(book.total_recommend_count, None);
    }

    #[test]
    fn test_bad_cell_aborts_whole_listing() {
        let body = listing(&["小说书名", "字数"], &[&["Good", "3000"], &["Bad", "lots"]]);
        assert_eq!(parse(&body).unwrap_err(), ParsingError::invalid_count("lots"));
    }

    #[test]
    fn test_listing_site_stamped_on_books() {
        let body = listing(&["小说书名"], &[&["A"], &["B"]]);
        let books = SearchResultParser::new()
            .unwrap()
            .parse(&body, &ListParseContext::new(URL, Site::Female))
            .unwrap();
        assert!(books.iter().all(|b| b.site == Site::Female));
    }

    #[rstest]
    #[case("「玄幻·东方玄幻」", "21", "8")]
    #[case("玄幻·东方玄幻", "21", "8")]
    #[case("「玄幻言情·东方玄幻」", "84", "30061")]
    #[case("「未知·未知」", "", "")]
    #[case("「新分类·东方玄幻」", "", "")]
    #[case("「都市·东方玄幻」", "4", "")]
    fn test_category_cell(#[case] text: &str, #[case] category: &str, #[case] sub: &str) {
        let (c, s) = parse_category_cell(text).unwrap();
        assert_eq!(c.code(), category);
        assert_eq!(s.code(), sub);
    }

    #[test]
    fn test_category_cell_without_separator() {
        assert!(matches!(
            parse_category_cell("「玄幻」"),
            Err(ParsingError::InvalidCategory { .. })
        ));
    }
}
