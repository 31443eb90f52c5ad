//! Category registry for the Qidian catalog
//!
//! Categories and sub-categories are opaque site codes. The registry below is a
//! closed, process-lifetime table mapping codes to display names, and every
//! sub-category to exactly one parent category.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use super::book::Site;

/// Top-level catalog category (`chanId` on the site)
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(String);

/// Sub-category (`subCateId` on the site); always belongs to one [`Category`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubCategory(String);

struct CategoryEntry {
    code: &'static str,
    name: &'static str,
    site: Site,
}

struct SubCategoryEntry {
    code: &'static str,
    name: &'static str,
    parent: &'static str,
}

const fn main_site(code: &'static str, name: &'static str) -> CategoryEntry {
    CategoryEntry { code, name, site: Site::Main }
}

const fn female_site(code: &'static str, name: &'static str) -> CategoryEntry {
    CategoryEntry { code, name, site: Site::Female }
}

const fn sub(code: &'static str, name: &'static str, parent: &'static str) -> SubCategoryEntry {
    SubCategoryEntry { code, name, parent }
}

const CATEGORIES: &[CategoryEntry] = &[
    main_site("21", "玄幻"),
    main_site("1", "奇幻"),
    main_site("2", "武侠"),
    main_site("22", "仙侠"),
    main_site("4", "都市"),
    main_site("15", "现实"),
    main_site("6", "军事"),
    main_site("5", "历史"),
    main_site("7", "游戏"),
    main_site("8", "体育"),
    main_site("9", "科幻"),
    main_site("20109", "诸天无限"),
    main_site("10", "悬疑"),
    main_site("12", "轻小说"),
    main_site("20076", "短篇"),
    female_site("80", "古代言情"),
    female_site("81", "仙侠奇缘"),
    female_site("82", "现代言情"),
    female_site("83", "浪漫青春"),
    female_site("84", "玄幻言情"),
    female_site("85", "悬疑推理"),
    female_site("86", "科幻空间"),
    female_site("88", "游戏竞技"),
];

const SUB_CATEGORIES: &[SubCategoryEntry] = &[
    // 玄幻
    sub("8", "东方玄幻", "21"),
    sub("78", "异世大陆", "21"),
    sub("58", "王朝争霸", "21"),
    sub("73", "高武世界", "21"),
    // 奇幻
    sub("38", "现代魔法", "1"),
    sub("62", "剑与魔法", "1"),
    sub("201", "史诗奇幻", "1"),
    sub("202", "黑暗幻想", "1"),
    sub("20092", "历史神话", "1"),
    sub("20093", "另类幻想", "1"),
    // 武侠
    sub("5", "传统武侠", "2"),
    sub("30", "武侠幻想", "2"),
    sub("206", "国术无双", "2"),
    sub("20099", "古武未来", "2"),
    sub("20100", "武侠同人", "2"),
    // 仙侠
    sub("18", "修真文明", "22"),
    sub("44", "幻想修仙", "22"),
    sub("64", "现代修真", "22"),
    sub("207", "神话修真", "22"),
    sub("20101", "古典仙侠", "22"),
    // 都市
    sub("12", "都市生活", "4"),
    sub("16", "异术超能", "4"),
    sub("74", "青春校园", "4"),
    sub("130", "娱乐明星", "4"),
    sub("151", "商战职场", "4"),
    sub("20113", "都市异能", "4"),
    // 现实
    sub("20104", "时代叙事", "15"),
    sub("20105", "家庭伦理", "15"),
    sub("20106", "女性题材", "15"),
    sub("20107", "青年故事", "15"),
    sub("20108", "社会悬疑", "15"),
    // 军事
    sub("54", "军旅生涯", "6"),
    sub("65", "军事战争", "6"),
    sub("80", "战争幻想", "6"),
    sub("230", "抗战烽火", "6"),
    sub("231", "谍战特工", "6"),
    // 历史
    sub("22", "架空历史", "5"),
    sub("48", "秦汉三国", "5"),
    sub("220", "上古先秦", "5"),
    sub("32", "历史传记", "5"),
    sub("222", "两晋隋唐", "5"),
    sub("223", "五代十国", "5"),
    sub("224", "两宋元明", "5"),
    sub("225", "清史民国", "5"),
    sub("226", "外国历史", "5"),
    sub("20094", "民间传说", "5"),
    // 游戏
    sub("7", "电子竞技", "7"),
    sub("70", "虚拟网游", "7"),
    sub("240", "游戏异界", "7"),
    sub("20102", "游戏系统", "7"),
    sub("20103", "游戏主播", "7"),
    // 体育
    sub("28", "篮球运动", "8"),
    sub("55", "体育赛事", "8"),
    sub("82", "足球运动", "8"),
    // 科幻
    sub("21", "古武机甲", "9"),
    sub("25", "未来世界", "9"),
    sub("68", "星际文明", "9"),
    sub("250", "超级科技", "9"),
    sub("251", "时空穿梭", "9"),
    sub("252", "进化变异", "9"),
    sub("253", "末世危机", "9"),
    // 诸天无限
    sub("20110", "无限", "20109"),
    sub("20111", "诸天", "20109"),
    sub("20112", "综漫", "20109"),
    // 悬疑
    sub("26", "诡秘悬疑", "10"),
    sub("35", "奇妙世界", "10"),
    sub("57", "侦探推理", "10"),
    sub("260", "探险生存", "10"),
    sub("20095", "古今传奇", "10"),
    // 轻小说
    sub("60", "原生幻想", "12"),
    sub("66", "青春日常", "12"),
    sub("281", "衍生同人", "12"),
    sub("282", "搞笑吐槽", "12"),
    // 短篇
    sub("20097", "诗歌散文", "20076"),
    sub("20098", "人物传记", "20076"),
    sub("20075", "影视剧本", "20076"),
    sub("20077", "评论文集", "20076"),
    sub("20078", "生活随笔", "20076"),
    sub("20079", "美文游记", "20076"),
    sub("20096", "短篇小说", "20076"),
    // 女生网
    sub("30020", "古典架空", "80"),
    sub("30013", "宫闱宅斗", "80"),
    sub("30021", "经商种田", "80"),
    sub("30031", "古典仙侠", "81"),
    sub("30032", "远古神话", "81"),
    sub("30041", "豪门世家", "82"),
    sub("30042", "都市生活", "82"),
    sub("30043", "婚恋情缘", "82"),
    sub("30051", "青春校园", "83"),
    sub("30052", "娱乐明星", "83"),
    sub("30061", "东方玄幻", "84"),
    sub("30062", "异世大陆", "84"),
    sub("30071", "推理侦探", "85"),
    sub("30072", "灵异奇谈", "85"),
    sub("30081", "未来世界", "86"),
    sub("30082", "星际恋歌", "86"),
    sub("30091", "电子竞技", "88"),
    sub("30092", "虚拟网游", "88"),
];

static CATEGORY_BY_CODE: Lazy<HashMap<&'static str, &'static CategoryEntry>> =
    Lazy::new(|| CATEGORIES.iter().map(|e| (e.code, e)).collect());

static CATEGORY_BY_NAME: Lazy<HashMap<&'static str, &'static CategoryEntry>> =
    Lazy::new(|| CATEGORIES.iter().map(|e| (e.name, e)).collect());

static SUB_CATEGORY_BY_CODE: Lazy<HashMap<&'static str, &'static SubCategoryEntry>> =
    Lazy::new(|| SUB_CATEGORIES.iter().map(|e| (e.code, e)).collect());

/// Sub-category names repeat across the two sites, so the name index keeps the
/// first (main site) entry unless the lookup is scoped to a parent.
static SUB_CATEGORY_BY_NAME: Lazy<HashMap<&'static str, &'static SubCategoryEntry>> =
    Lazy::new(|| {
        let mut index = HashMap::new();
        for entry in SUB_CATEGORIES {
            index.entry(entry.name).or_insert(entry);
        }
        index
    });

impl Category {
    /// Wrap a raw site code
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Look up a category by display name.
    ///
    /// Unknown names yield the empty category rather than an error.
    pub fn from_name(name: &str) -> Self {
        CATEGORY_BY_NAME
            .get(name.trim())
            .map(|e| Self::new(e.code))
            .unwrap_or_default()
    }

    pub fn code(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Display name, if the code is registered
    pub fn name(&self) -> Option<&'static str> {
        CATEGORY_BY_CODE.get(self.0.as_str()).map(|e| e.name)
    }

    /// Catalog variant hosting this category; unregistered codes belong to the main site
    pub fn site(&self) -> Site {
        CATEGORY_BY_CODE
            .get(self.0.as_str())
            .map_or(Site::Main, |e| e.site)
    }

    /// All registered sub-categories of this category, in registry order
    pub fn sub_categories(&self) -> Vec<SubCategory> {
        SUB_CATEGORIES
            .iter()
            .filter(|e| e.parent == self.0)
            .map(|e| SubCategory::new(e.code))
            .collect()
    }
}

impl SubCategory {
    /// Wrap a raw site code
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Look up a sub-category by display name.
    ///
    /// Unknown names yield the empty sub-category rather than an error.
    pub fn from_name(name: &str) -> Self {
        SUB_CATEGORY_BY_NAME
            .get(name.trim())
            .map(|e| Self::new(e.code))
            .unwrap_or_default()
    }

    /// Look up a sub-category by display name within one parent category.
    ///
    /// Listing pages print both names, so this resolves names shared between
    /// sites. A name not registered under `parent`, or an empty parent, yields
    /// the empty sub-category so the pair never disagrees with the registry.
    pub fn from_name_in(parent: &Category, name: &str) -> Self {
        let name = name.trim();
        SUB_CATEGORIES
            .iter()
            .find(|e| !parent.is_empty() && e.parent == parent.code() && e.name == name)
            .map(|e| Self::new(e.code))
            .unwrap_or_default()
    }

    pub fn code(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn name(&self) -> Option<&'static str> {
        SUB_CATEGORY_BY_CODE.get(self.0.as_str()).map(|e| e.name)
    }

    /// Registered parent category; empty when the code is unknown
    pub fn parent(&self) -> Category {
        SUB_CATEGORY_BY_CODE
            .get(self.0.as_str())
            .map(|e| Category::new(e.parent))
            .unwrap_or_default()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for SubCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_sub_category_has_registered_parent() {
        for entry in SUB_CATEGORIES {
            assert!(
                CATEGORY_BY_CODE.contains_key(entry.parent),
                "sub-category {} has unknown parent {}",
                entry.code,
                entry.parent
            );
        }
    }

    #[test]
    fn test_codes_are_unique() {
        let categories: HashSet<_> = CATEGORIES.iter().map(|e| e.code).collect();
        assert_eq!(categories.len(), CATEGORIES.len());

        let subs: HashSet<_> = SUB_CATEGORIES.iter().map(|e| e.code).collect();
        assert_eq!(subs.len(), SUB_CATEGORIES.len());
    }

    #[test]
    fn test_name_lookup_round_trip() {
        let category = Category::from_name("玄幻");
        assert_eq!(category.code(), "21");
        assert_eq!(category.name(), Some("玄幻"));

        let sub = SubCategory::from_name("东方玄幻");
        assert_eq!(sub.code(), "8");
        assert_eq!(sub.name(), Some("东方玄幻"));
        assert_eq!(sub.parent(), category);
    }

    #[test]
    fn test_unknown_name_yields_empty_code() {
        assert!(Category::from_name("不存在").is_empty());
        assert!(SubCategory::from_name("不存在").is_empty());
        assert!(SubCategory::new("999999").parent().is_empty());
        assert_eq!(Category::new("999999").name(), None);
    }

    #[test]
    fn test_scoped_lookup_resolves_shared_names() {
        let female = Category::from_name("玄幻言情");
        let sub = SubCategory::from_name_in(&female, "东方玄幻");
        assert_eq!(sub.parent(), female);
        assert_eq!(SubCategory::from_name("东方玄幻").code(), "8");
    }

    #[test]
    fn test_scoped_lookup_never_crosses_parents() {
        assert!(SubCategory::from_name_in(&Category::default(), "东方玄幻").is_empty());
        assert!(SubCategory::from_name_in(&Category::from_name("都市"), "东方玄幻").is_empty());
        assert!(SubCategory::from_name_in(&Category::new("999999"), "东方玄幻").is_empty());
    }

    #[test]
    fn test_site_follows_category() {
        assert_eq!(Category::from_name("都市").site(), Site::Main);
        assert_eq!(Category::from_name("古代言情").site(), Site::Female);
        assert_eq!(Category::default().site(), Site::Main);
    }

    #[test]
    fn test_sub_categories_of_parent() {
        let subs = Category::from_name("体育").sub_categories();
        let names: Vec<_> = subs.iter().filter_map(SubCategory::name).collect();
        assert_eq!(names, vec!["篮球运动", "体育赛事", "足球运动"]);
    }
}
