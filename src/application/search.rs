//! Search query builders
//!
//! [`CategorySearch`] covers the full filter set of the catalog browser and
//! renders as a path of `-`-joined segments. [`Search`] is the narrow query
//! behind the tabular listing and renders as query parameters. Both are
//! immutable once built; the builders keep the sub-category and its parent
//! category consistent.

use serde::Serialize;
use url::form_urlencoded;

use crate::domain::{Category, Sign, Site, Size, Sort, State, SubCategory, Update, Vip};
use crate::error::{CatalogError, CatalogResult};
use crate::infrastructure::config::qidian;

/// Characters that would break the segment grammar of a broad search URL
const RESERVED_TAG_CHARS: &[char] = &['-', '/', '\\', '%', '?', '#'];

/// Percent-encode a tag so it stays inside a single path segment
fn encode_tag(tag: &str) -> String {
    // Form encoding leaves only `*-._` and alphanumerics bare and writes spaces as `+`
    form_urlencoded::byte_serialize(tag.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Broad catalog search over every filter dimension
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategorySearch {
    site: Site,
    sort: Sort,
    page: u32,
    category: Category,
    sub_category: SubCategory,
    state: State,
    tag: String,
    sign: Sign,
    update: Update,
    vip: Vip,
    size: Size,
}

/// Builder for [`CategorySearch`]
#[derive(Debug, Clone, Default)]
pub struct CategorySearchBuilder {
    search: CategorySearch,
}

impl CategorySearch {
    pub fn builder() -> CategorySearchBuilder {
        CategorySearchBuilder::default()
    }

    pub const fn site(&self) -> Site {
        self.site
    }

    pub const fn sort(&self) -> Sort {
        self.sort
    }

    pub const fn page(&self) -> u32 {
        self.page
    }

    pub const fn category(&self) -> &Category {
        &self.category
    }

    pub const fn sub_category(&self) -> &SubCategory {
        &self.sub_category
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Non-empty path segments in canonical order
    fn segments(&self) -> Vec<String> {
        let page = if self.page > 1 {
            self.page.to_string()
        } else {
            String::new()
        };
        let tag = encode_tag(&self.tag);

        [
            ("chanId", self.category.code()),
            ("subCateId", self.sub_category.code()),
            ("action", self.state.code()),
            ("vip", self.vip.code()),
            ("size", self.size.code()),
            ("sign", self.sign.code()),
            ("update", self.update.code()),
            ("orderId", self.sort.code()),
            ("tag", tag.as_str()),
            ("page", page.as_str()),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| format!("{key}{value}"))
        .collect()
    }

    /// Canonical catalog URL.
    ///
    /// An unfiltered first page is just the catalog root.
    pub fn url(&self) -> String {
        let mut raw = String::from(qidian::CATALOG_BASE_URL);
        if !self.site.code().is_empty() {
            raw.push_str(self.site.code());
            raw.push('/');
        }
        raw.push_str(qidian::ALL_PATH);
        raw.push('/');

        let segments = self.segments();
        if !segments.is_empty() {
            raw.push_str(&segments.join("-"));
            raw.push('/');
        }
        raw
    }
}

impl CategorySearchBuilder {
    /// Catalog to search; ignored once a category is set
    pub const fn site(mut self, site: Site) -> Self {
        self.search.site = site;
        self
    }

    pub const fn sort(mut self, sort: Sort) -> Self {
        self.search.sort = sort;
        self
    }

    pub const fn page(mut self, page: u32) -> Self {
        self.search.page = page;
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.search.category = category;
        self
    }

    /// Also sets the category to the sub-category's parent
    pub fn sub_category(mut self, sub_category: SubCategory) -> Self {
        self.search.category = sub_category.parent();
        self.search.sub_category = sub_category;
        self
    }

    pub const fn state(mut self, state: State) -> Self {
        self.search.state = state;
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.search.tag = tag.into();
        self
    }

    pub const fn sign(mut self, sign: Sign) -> Self {
        self.search.sign = sign;
        self
    }

    pub const fn update(mut self, update: Update) -> Self {
        self.search.update = update;
        self
    }

    pub const fn vip(mut self, vip: Vip) -> Self {
        self.search.vip = vip;
        self
    }

    pub const fn size(mut self, size: Size) -> Self {
        self.search.size = size;
        self
    }

    pub fn build(self) -> CatalogResult<CategorySearch> {
        let mut search = self.search;

        search.tag = search.tag.trim().to_string();
        if search.tag.contains(RESERVED_TAG_CHARS) {
            return Err(CatalogError::validation(format!(
                "tag '{}' must not contain any of {:?}",
                search.tag, RESERVED_TAG_CHARS
            )));
        }

        if !search.sub_category.is_empty() {
            search.category = search.sub_category.parent();
        }
        if !search.category.is_empty() {
            search.site = search.category.site();
        }

        Ok(search)
    }
}

/// Narrow search rendered as the tabular listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Search {
    sort: Sort,
    page: u32,
    category: Category,
    sub_category: SubCategory,
}

/// Builder for [`Search`]
#[derive(Debug, Clone, Default)]
pub struct SearchBuilder {
    search: Search,
}

impl Search {
    pub fn builder() -> SearchBuilder {
        SearchBuilder::default()
    }

    pub const fn sort(&self) -> Sort {
        self.sort
    }

    pub const fn page(&self) -> u32 {
        self.page
    }

    pub const fn category(&self) -> &Category {
        &self.category
    }

    pub const fn sub_category(&self) -> &SubCategory {
        &self.sub_category
    }

    /// Catalog the listing belongs to
    pub fn site(&self) -> Site {
        self.category.site()
    }

    /// Canonical listing URL; always requests the tabular layout
    pub fn url(&self) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        let page = self.page.to_string();

        for (key, value) in [
            ("chanId", self.category.code()),
            ("subCateId", self.sub_category.code()),
            ("orderId", self.sort.code()),
        ] {
            if !value.is_empty() {
                query.append_pair(key, value);
            }
        }
        if self.page > 1 {
            query.append_pair("page", &page);
        }
        let (style_key, style_value) = qidian::LIST_STYLE_PARAM;
        query.append_pair(style_key, style_value);

        format!(
            "{}{}?{}",
            qidian::CATALOG_BASE_URL,
            qidian::ALL_PATH,
            query.finish()
        )
    }
}

impl SearchBuilder {
    pub const fn sort(mut self, sort: Sort) -> Self {
        self.search.sort = sort;
        self
    }

    pub const fn page(mut self, page: u32) -> Self {
        self.search.page = page;
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.search.category = category;
        self
    }

    /// Also sets the category to the sub-category's parent
    pub fn sub_category(mut self, sub_category: SubCategory) -> Self {
        self.search.category = sub_category.parent();
        self.search.sub_category = sub_category;
        self
    }

    pub fn build(self) -> Search {
        let mut search = self.search;
        if !search.sub_category.is_empty() {
            search.category = search.sub_category.parent();
        }
        search
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    type Setter = fn(CategorySearchBuilder) -> CategorySearchBuilder;

    const SETTERS: &[Setter] = &[
        |b| b.sort(Sort::WeekRecommend),
        |b| b.page(3),
        |b| b.sub_category(SubCategory::from_name("东方玄幻")),
        |b| b.state(State::Finished),
        |b| b.tag("系统"),
        |b| b.sign(Sign::Signed),
        |b| b.update(Update::InMonth),
        |b| b.vip(Vip::Free),
        |b| b.size(Size::Gt2m),
    ];

    fn build_in_order(order: &[usize]) -> String {
        order
            .iter()
            .fold(CategorySearch::builder(), |b, &i| SETTERS[i](b))
            .build()
            .unwrap()
            .url()
    }

    #[test]
    fn test_unfiltered_search() {
        let search = CategorySearch::builder().build().unwrap();
        assert_eq!(search.url(), "https://www.qidian.com/all/");
    }

    #[test]
    fn test_full_segment_order() {
        let url = build_in_order(&(0..SETTERS.len()).collect::<Vec<_>>());
        assert_eq!(
            url,
            "https://www.qidian.com/all/chanId21-subCateId8-action2-vip1-size5-sign1-update4-orderId9-tag%E7%B3%BB%E7%BB%9F-page3/"
        );
    }

    proptest! {
        #[test]
        fn prop_url_ignores_setter_order(
            order in Just((0..SETTERS.len()).collect::<Vec<_>>()).prop_shuffle()
        ) {
            let canonical = build_in_order(&(0..SETTERS.len()).collect::<Vec<_>>());
            prop_assert_eq!(build_in_order(&order), canonical);
        }
    }

    #[rstest]
    #[case(0, "https://www.qidian.com/all/orderId2/")]
    #[case(1, "https://www.qidian.com/all/orderId2/")]
    #[case(2, "https://www.qidian.com/all/orderId2-page2/")]
    fn test_first_page_has_no_segment(#[case] page: u32, #[case] expected: &str) {
        let search = CategorySearch::builder()
            .sort(Sort::TotalRecommend)
            .page(page)
            .build()
            .unwrap();
        assert_eq!(search.url(), expected);
    }

    #[test]
    fn test_sub_category_overrides_category() {
        let search = CategorySearch::builder()
            .sub_category(SubCategory::from_name("篮球运动"))
            .category(Category::from_name("玄幻"))
            .build()
            .unwrap();
        assert_eq!(search.category(), &Category::from_name("体育"));
        assert_eq!(search.category(), &search.sub_category().parent());
    }

    #[test]
    fn test_site_follows_category() {
        let search = CategorySearch::builder()
            .category(Category::from_name("古代言情"))
            .build()
            .unwrap();
        assert_eq!(search.site(), Site::Female);
        assert_eq!(search.url(), "https://www.qidian.com/mm/all/chanId80/");

        let explicit = CategorySearch::builder()
            .site(Site::Female)
            .sort(Sort::LastUpdated)
            .build()
            .unwrap();
        assert_eq!(explicit.url(), "https://www.qidian.com/mm/all/orderId5/");

        let overridden = CategorySearch::builder()
            .site(Site::Female)
            .category(Category::from_name("都市"))
            .build()
            .unwrap();
        assert_eq!(overridden.site(), Site::Main);
    }

    #[rstest]
    #[case("a-b")]
    #[case("a/b")]
    #[case("what?")]
    #[case("a\\b")]
    #[case("100%")]
    fn test_reserved_tag_rejected(#[case] tag: &str) {
        let err = CategorySearch::builder().tag(tag).build().unwrap_err();
        assert!(matches!(err, CatalogError::Validation { .. }));
    }

    #[rstest]
    #[case("系统", "tag%E7%B3%BB%E7%BB%9F")]
    #[case("A B", "tagA%20B")]
    #[case("C++", "tagC%2B%2B")]
    #[case("x&y", "tagx%26y")]
    fn test_tag_is_encoded_into_one_segment(#[case] tag: &str, #[case] segment: &str) {
        let search = CategorySearch::builder().tag(tag).build().unwrap();
        assert_eq!(search.url(), format!("https://www.qidian.com/all/{segment}/"));
    }

    #[test]
    fn test_narrow_search_url() {
        assert_eq!(
            Search::builder().build().url(),
            "https://www.qidian.com/all?style=2"
        );

        let search = Search::builder()
            .page(2)
            .sort(Sort::TotalBookmark)
            .sub_category(SubCategory::from_name("东方玄幻"))
            .build();
        assert_eq!(
            search.url(),
            "https://www.qidian.com/all?chanId=21&subCateId=8&orderId=11&page=2&style=2"
        );
        assert_eq!(search.site(), Site::Main);
    }

    #[test]
    fn test_narrow_search_keeps_category_consistent() {
        let search = Search::builder()
            .sub_category(SubCategory::from_name_in(&Category::from_name("现代言情"), "都市生活"))
            .category(Category::from_name("都市"))
            .build();
        assert_eq!(search.category().code(), "82");
        assert_eq!(search.site(), Site::Female);
    }
}
