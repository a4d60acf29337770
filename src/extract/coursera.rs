use once_cell::sync::Lazy;
use regex::Regex;

use super::{Page, Pass, capture, set, str_at};
use crate::metadata::CertificateMetadata;

pub(super) const PASSES: &[Pass] = &[open_graph, json_ld, first_heading, default_issuer];

fn open_graph(page: &Page<'_>, meta: &mut CertificateMetadata) {
    static COMPLETION_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?i)^Completion Certificate for\s*").unwrap());
    static CERTIFICATE_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?i)^Certificate for\s*").unwrap());

    // "Completion Certificate for Machine Learning" -> "Machine Learning"
    if let Some(title) = page.og("title") {
        let title = COMPLETION_RE.replace(&title, "");
        let title = CERTIFICATE_RE.replace(&title, "");
        set(&mut meta.name, Some(title.trim().to_string()).filter(|t| !t.is_empty()));
    }
    set(&mut meta.thumbnail_url, page.og("image"));
    set(&mut meta.description, page.og("description"));
}

fn json_ld(page: &Page<'_>, meta: &mut CertificateMetadata) {
    for block in page.json_ld_of_type("EducationalOccupationalCredential") {
        set(&mut meta.name, str_at(block, "/name"));
        set(&mut meta.description, str_at(block, "/educationalLevel"));
        set(
            &mut meta.issuer,
            str_at(block, "/recognizedBy/name").or_else(|| str_at(block, "/issuedBy/name")),
        );
        set(&mut meta.completion_date, str_at(block, "/dateCreated"));
    }
}

fn first_heading(page: &Page<'_>, meta: &mut CertificateMetadata) {
    static H1_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<h1[^>]*>(.*?)</h1>").unwrap());
    static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());

    if meta.name.as_deref().is_some_and(|n| !n.is_empty()) {
        return;
    }
    meta.name = capture(&H1_RE, page.html)
        .map(|h| TAG_RE.replace_all(&h, "").trim().to_string())
        .filter(|h| !h.is_empty());
}

fn default_issuer(_: &Page<'_>, meta: &mut CertificateMetadata) {
    meta.issuer.get_or_insert_with(|| "Coursera".to_string());
}
