//! Text normalizers for localized catalog values
//!
//! Counts are printed either as plain digits or with a magnitude suffix
//! (`万` = 10⁴, `亿` = 10⁸), and dates either in full or as month-day with the
//! current year implied. All times are China Standard Time on the site.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDateTime, TimeZone, Utc};
use url::Url;

use super::{ParsingError, ParsingResult};
use crate::infrastructure::config::qidian;

const MAGNITUDES: &[(&str, u64)] = &[("万", 10_000), ("亿", 100_000_000)];

const FULL_LAYOUTS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];

/// Month-day layout, parsed after the current year has been prepended
const SHORT_LAYOUT: &str = "%Y-%m-%d %H:%M";

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Parse a count such as `3000`, `1.5万` or `2亿`.
///
/// Fractional digits beyond the magnitude's precision are truncated.
pub fn parse_count(text: &str) -> ParsingResult<u64> {
    let invalid = || ParsingError::invalid_count(text);
    let trimmed = text.trim();

    let (number, multiplier) = MAGNITUDES
        .iter()
        .find_map(|&(suffix, m)| trimmed.strip_suffix(suffix).map(|n| (n.trim_end(), m)))
        .unwrap_or((trimmed, 1));

    let (whole, fraction) = match number.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (number, None),
    };
    if !is_digits(whole) {
        return Err(invalid());
    }

    let mut value = whole
        .parse::<u64>()
        .ok()
        .and_then(|w| w.checked_mul(multiplier))
        .ok_or_else(invalid)?;

    if let Some(fraction) = fraction {
        if multiplier == 1 || !is_digits(fraction) {
            return Err(invalid());
        }
        let scale = multiplier.ilog10() as usize;
        let digits = &fraction[..fraction.len().min(scale)];
        let padding = u32::try_from(scale - digits.len()).map_err(|_| invalid())?;
        let part = digits.parse::<u64>().map_err(|_| invalid())? * 10u64.pow(padding);
        value = value.checked_add(part).ok_or_else(invalid)?;
    }

    Ok(value)
}

/// Site timezone
pub fn site_offset() -> Option<FixedOffset> {
    FixedOffset::east_opt(qidian::UTC_OFFSET_SECONDS)
}

/// Parse a site timestamp relative to the current time
pub fn parse_time(text: &str) -> ParsingResult<DateTime<Utc>> {
    parse_time_at(text, Utc::now())
}

/// Parse `YYYY-MM-DD HH:MM[:SS]` or `MM-DD HH:MM`.
///
/// The short layout takes its year from `now` as seen in the site timezone.
pub fn parse_time_at(text: &str, now: DateTime<Utc>) -> ParsingResult<DateTime<Utc>> {
    let invalid = || ParsingError::invalid_time(text);
    let offset = site_offset().ok_or_else(invalid)?;
    let trimmed = text.trim();

    let naive = FULL_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(trimmed, layout).ok())
        .or_else(|| {
            let year = now.with_timezone(&offset).year();
            NaiveDateTime::parse_from_str(&format!("{year}-{trimmed}"), SHORT_LAYOUT).ok()
        })
        .ok_or_else(invalid)?;

    offset
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(invalid)
}

/// Resolve a possibly relative or protocol-relative URL against the catalog.
///
/// Empty input stays empty; unresolvable input is returned unchanged.
pub fn absolute_url(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return String::new();
    }
    Url::parse(qidian::CATALOG_BASE_URL)
        .and_then(|base| base.join(raw))
        .map_or_else(|_| raw.to_string(), |url| url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case("3000", 3000)]
    #[case("0", 0)]
    #[case(" 42 ", 42)]
    #[case("1.5万", 15_000)]
    #[case("12万", 120_000)]
    #[case("1.23456万", 12_345)]
    #[case("3.2亿", 320_000_000)]
    #[case("1 万", 10_000)]
    fn test_parse_count(#[case] input: &str, #[case] expected: u64) {
        assert_eq!(parse_count(input).unwrap(), expected);
    }

    #[rstest]
    #[case("abc")]
    #[case("")]
    #[case("1.5")]
    #[case("1.5千")]
    #[case("万")]
    #[case(".5万")]
    #[case("1.万")]
    #[case("-3")]
    #[case("99999999999999999999")]
    fn test_parse_count_rejects(#[case] input: &str) {
        let err = parse_count(input).unwrap_err();
        assert!(err.is_format_error());
        assert_eq!(err, ParsingError::invalid_count(input));
    }

    proptest! {
        #[test]
        fn prop_plain_digits_parse_to_themselves(n in any::<u64>()) {
            prop_assert_eq!(parse_count(&n.to_string()).unwrap(), n);
        }

        #[test]
        fn prop_ten_thousands_scale(n in 0u64..1_000_000) {
            prop_assert_eq!(parse_count(&format!("{n}万")).unwrap(), n * 10_000);
        }
    }

    fn cst(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        site_offset()
            .unwrap()
            .with_ymd_and_hms(y, mo, d, h, mi, s)
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_parse_full_time() {
        assert_eq!(
            parse_time("2020-09-08 21:18:36").unwrap(),
            cst(2020, 9, 8, 21, 18, 36)
        );
        assert_eq!(
            parse_time("2020-09-08 21:18").unwrap(),
            cst(2020, 9, 8, 21, 18, 0)
        );
    }

    #[test]
    fn test_parse_short_time_uses_current_year() {
        let now = cst(2024, 3, 1, 12, 0, 0);
        assert_eq!(
            parse_time_at("09-08 21:18", now).unwrap(),
            cst(2024, 9, 8, 21, 18, 0)
        );
    }

    #[test]
    fn test_short_time_year_follows_site_timezone() {
        // 2023-12-31 20:00 UTC is already 2024 in China
        let now = Utc.with_ymd_and_hms(2023, 12, 31, 20, 0, 0).unwrap();
        assert_eq!(
            parse_time_at("01-01 09:00", now).unwrap(),
            cst(2024, 1, 1, 9, 0, 0)
        );
    }

    #[rstest]
    #[case("yesterday")]
    #[case("")]
    #[case("2020/09/08 21:18")]
    #[case("13-40 10:00")]
    fn test_parse_time_rejects(#[case] input: &str) {
        assert_eq!(parse_time(input).unwrap_err(), ParsingError::invalid_time(input));
    }

    #[test]
    fn test_absolute_url() {
        assert_eq!(
            absolute_url("//bookcover.yuewen.com/qdbimg/349573/1004608738/180"),
            "https://bookcover.yuewen.com/qdbimg/349573/1004608738/180"
        );
        assert_eq!(
            absolute_url("/info/1004608738/"),
            "https://www.qidian.com/info/1004608738/"
        );
        assert_eq!(
            absolute_url("https://example.com/a.jpg"),
            "https://example.com/a.jpg"
        );
        assert_eq!(absolute_url(""), "");
    }
}
