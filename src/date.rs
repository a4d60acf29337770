use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%B %d, %Y",
    "%B %d %Y",
    "%b %d, %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%m/%d/%Y",
];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Canonicalise a certificate date to `YYYY-MM`.
///
/// Absent or empty input yields an empty string. Input that cannot be understood, including
/// whitespace-only input, is returned unchanged rather than dropped.
pub fn format_date(raw: Option<&str>) -> String {
    let Some(raw) = raw.filter(|r| !r.is_empty()) else {
        return String::new();
    };
    let t = raw.trim();

    if let Some(date) = parse_standard(t) {
        return format!("{:04}-{:02}", date.year(), date.month());
    }
    if let Some(ym) = month_name_and_year(raw) {
        return ym;
    }
    raw.to_string()
}

fn parse_standard(t: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(t) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(t) {
        return Some(dt.date_naive());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(t, fmt) {
            return Some(dt.date());
        }
    }
    // Partial dates start on the 1st; chrono needs a day to build a date. They are matched
    // by shape first, since "%B %d %Y" would otherwise read "March 2024" as March 20, 0024.
    static YEAR_MONTH: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^(\d{4})(?:-(\d{2}))?$").unwrap());
    static MONTH_YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z]+\s+\d{4}$").unwrap());
    if let Some(c) = YEAR_MONTH.captures(t) {
        let year = c[1].parse().ok()?;
        let month = c.get(2).map_or(Ok(1), |m| m.as_str().parse()).ok()?;
        return NaiveDate::from_ymd_opt(year, month, 1);
    }
    if MONTH_YEAR.is_match(t) {
        // %B accepts both "March" and "Mar".
        return NaiveDate::parse_from_str(&format!("1 {t}"), "%d %B %Y").ok();
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(t, fmt) {
            return Some(d);
        }
    }
    None
}

// Loose fallback for prose like "Completed in March of 2024".
fn month_name_and_year(raw: &str) -> Option<String> {
    static YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{4}").unwrap());
    let month = MONTHS.iter().position(|m| raw.contains(m))?;
    let year = YEAR.find(raw)?.as_str();
    Some(format!("{}-{:02}", year, month + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_absent() {
        assert_eq!(format_date(None), "");
        assert_eq!(format_date(Some("")), "");
    }

    #[test]
    fn whitespace_only_is_returned_unchanged() {
        assert_eq!(format_date(Some("   ")), "   ");
        assert_eq!(format_date(Some("\t")), "\t");
    }

    #[test]
    fn standard_formats() {
        assert_eq!(format_date(Some("March 15, 2024")), "2024-03");
        assert_eq!(format_date(Some("Mar 5, 2024")), "2024-03");
        assert_eq!(format_date(Some("15 March 2024")), "2024-03");
        assert_eq!(format_date(Some("2023-11-02")), "2023-11");
        assert_eq!(format_date(Some("2023/11/02")), "2023-11");
        assert_eq!(format_date(Some("2023-05-10T00:00:00.000Z")), "2023-05");
        assert_eq!(format_date(Some("2023-05-10T12:30:00-07:00")), "2023-05");
        assert_eq!(format_date(Some("2023-05-10T12:30:00")), "2023-05");
        assert_eq!(format_date(Some("07/04/2022")), "2022-07");
        assert_eq!(format_date(Some("Tue, 1 Jul 2003 10:52:37 +0200")), "2003-07");
    }

    #[test]
    fn already_canonical_is_stable() {
        assert_eq!(format_date(Some("2024-03")), "2024-03");
        assert_eq!(format_date(Some("2024-12")), "2024-12");
    }

    #[test]
    fn partial_dates() {
        assert_eq!(format_date(Some("2024")), "2024-01");
        assert_eq!(format_date(Some(" 1999 ")), "1999-01");
        assert_eq!(format_date(Some("Mar 2024")), "2024-03");
        assert_eq!(format_date(Some("September 2021")), "2021-09");
        assert_eq!(format_date(Some("march 2024")), "2024-03");
    }

    #[test]
    fn month_name_fallback() {
        assert_eq!(format_date(Some("Completed in March of 2024")), "2024-03");
        assert_eq!(format_date(Some("Issued: December 2021")), "2021-12");
    }

    #[test]
    fn passthrough() {
        assert_eq!(format_date(Some("garbage")), "garbage");
        assert_eq!(format_date(Some("2024-13")), "2024-13");
        assert_eq!(format_date(Some("20245")), "20245");
        assert_eq!(format_date(Some("in march of 2024")), "in march of 2024");
    }

    #[test]
    fn idempotent() {
        proptest::proptest!(|(y in 1900i32..2100, m in 1u32..=12, d in 1u32..=28)| {
            let once = format_date(Some(&format!("{y:04}-{m:02}-{d:02}")));
            proptest::prop_assert_eq!(&once, &format!("{y:04}-{m:02}"));
            proptest::prop_assert_eq!(format_date(Some(&once)), once);
        })
    }

    #[test]
    fn never_panics() {
        proptest::proptest!(|(s in "\\PC{0,40}")| {
            let _ = format_date(Some(&s));
        })
    }
}
