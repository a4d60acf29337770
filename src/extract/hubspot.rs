use once_cell::sync::Lazy;
use regex::Regex;

use super::{Page, Pass, capture, og_title_image, set};
use crate::metadata::CertificateMetadata;

pub(super) const PASSES: &[Pass] = &[og_title_image, issuer, dates];

fn issuer(_: &Page<'_>, meta: &mut CertificateMetadata) {
    meta.issuer = Some("HubSpot Academy".to_string());
}

fn dates(page: &Page<'_>, meta: &mut CertificateMetadata) {
    static ISSUED_RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"(?i)(?:Issued|Earned|Completed)[:\s]+([A-Za-z]+\s+\d{1,2},?\s+\d{4})").unwrap()
    });
    static EXPIRES_RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"(?i)(?:Expires|Valid until)[:\s]+([A-Za-z]+\s+\d{1,2},?\s+\d{4})").unwrap()
    });

    set(&mut meta.completion_date, capture(&ISSUED_RE, page.html));
    set(&mut meta.expiration_date, capture(&EXPIRES_RE, page.html));
}

#[cfg(test)]
mod tests {
    use crate::{extract::extract, provider::Provider};

    #[test]
    fn issued_and_expiry() {
        let html = r#"
            <meta property="og:title" content="Inbound Marketing"/>
            <div>Issued: March 3, 2024</div>
            <div>Valid until: March 3, 2026</div>
        "#;
        let meta = extract(Some(Provider::HubSpotAcademy), html);
        assert_eq!(meta.name.as_deref(), Some("Inbound Marketing"));
        assert_eq!(meta.issuer.as_deref(), Some("HubSpot Academy"));
        assert_eq!(meta.completion_date.as_deref(), Some("March 3, 2024"));
        assert_eq!(meta.expiration_date.as_deref(), Some("March 3, 2026"));
    }

    #[test]
    fn no_dates_found() {
        let meta = extract(Some(Provider::HubSpotAcademy), "<p>Congratulations</p>");
        assert_eq!(meta.issuer.as_deref(), Some("HubSpot Academy"));
        assert_eq!(meta.completion_date, None);
        assert_eq!(meta.expiration_date, None);
    }
}
