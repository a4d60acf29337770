use once_cell::sync::Lazy;
use regex::Regex;

use super::{Page, Pass, capture, og_title_image};
use crate::metadata::CertificateMetadata;

pub(super) const PASSES: &[Pass] = &[og_title_image, issuer, completion_date];

// Udemy pages never name another issuer.
fn issuer(_: &Page<'_>, meta: &mut CertificateMetadata) {
    meta.issuer = Some("Udemy".to_string());
}

fn completion_date(page: &Page<'_>, meta: &mut CertificateMetadata) {
    static LABELED_RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"(?i)Date\s*:?\s*([A-Za-z]+\s+\d{1,2},?\s+\d{4})").unwrap()
    });
    static NUMERIC_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(\d{1,2}/\d{1,2}/\d{4})").unwrap());

    if let Some(date) =
        capture(&LABELED_RE, page.html).or_else(|| capture(&NUMERIC_RE, page.html))
    {
        meta.completion_date = Some(date);
    }
}

#[cfg(test)]
mod tests {
    use crate::{extract::extract, provider::Provider};

    #[test]
    fn issuer_is_always_udemy() {
        let html = r#"<meta property="og:title" content="Rust Masterclass"/>
            <meta property="og:site_name" content="Someone Else"/>"#;
        let meta = extract(Some(Provider::Udemy), html);
        assert_eq!(meta.name.as_deref(), Some("Rust Masterclass"));
        assert_eq!(meta.issuer.as_deref(), Some("Udemy"));
        assert_eq!(meta.completion_date, None);
    }

    #[test]
    fn labeled_date_wins_over_numeric() {
        let html = "<p>Printed 01/02/2020</p><p>Date: Jan 15, 2024</p>";
        let meta = extract(Some(Provider::Udemy), html);
        assert_eq!(meta.completion_date.as_deref(), Some("Jan 15, 2024"));
    }

    #[test]
    fn numeric_date_fallback() {
        let html = "<div>Completed on 3/7/2023</div>";
        let meta = extract(Some(Provider::Udemy), html);
        assert_eq!(meta.completion_date.as_deref(), Some("3/7/2023"));
    }
}
