//! Heuristic metadata extraction from certificate pages.
//!
//! Every provider is described by an ordered list of enrichment passes. Each pass reads one
//! kind of signal from the [`Page`] (OpenGraph tags, JSON-LD blocks, inline scripts, or plain
//! regexes over the markup) and writes what it finds into the record. Later passes overwrite
//! earlier ones, so the order of a provider's list is its precedence.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

use crate::{metadata::CertificateMetadata, provider::Provider};

mod coursera;
mod credly;
mod edx;
mod hubspot;
mod udemy;

pub use credly::extract_json as extract_credly_json;

/// One enrichment step over a page.
pub(crate) type Pass = fn(&Page<'_>, &mut CertificateMetadata);

/// Passes used when the provider has no dedicated extractor.
const GENERIC: &[Pass] = &[og_title_image_description];

/// Extract whatever metadata `html` yields for `provider`. Never fails; an unusable page gives
/// an empty record.
pub fn extract(provider: Option<Provider>, html: &str) -> CertificateMetadata {
    let passes = provider.map_or(GENERIC, passes_for);
    debug!(
        provider = provider.map_or("generic", Provider::name),
        passes = passes.len(),
        "extracting metadata"
    );
    let page = Page::parse(html);
    let mut meta = CertificateMetadata::default();
    for pass in passes {
        pass(&page, &mut meta);
    }
    meta
}

fn passes_for(provider: Provider) -> &'static [Pass] {
    match provider {
        Provider::Credly => credly::PASSES,
        Provider::Coursera => coursera::PASSES,
        Provider::Udemy => udemy::PASSES,
        Provider::Edx => edx::PASSES,
        Provider::HubSpotAcademy => hubspot::PASSES,
        Provider::LinkedInLearning
        | Provider::Udacity
        | Provider::GoogleCloudSkillsBoost
        | Provider::MicrosoftLearn
        | Provider::AwsCertification => GENERIC,
    }
}

/// Raw markup plus the structured signals scanned out of it.
pub(crate) struct Page<'a> {
    pub html: &'a str,
    pub og: HashMap<String, String>,
    pub json_ld: Vec<Value>,
}

impl<'a> Page<'a> {
    pub fn parse(html: &'a str) -> Self {
        Page {
            html,
            og: collect_open_graph(html),
            json_ld: collect_json_ld(html),
        }
    }

    pub fn og(&self, key: &str) -> Option<String> {
        self.og.get(key).cloned()
    }

    /// JSON-LD objects whose `@type` is (or includes) `ty`.
    pub fn json_ld_of_type<'p>(&'p self, ty: &'p str) -> impl Iterator<Item = &'p Value> + 'p {
        self.json_ld.iter().filter(move |v| has_type(v, ty))
    }
}

// Quoted attribute values may contain a raw `>`.
static META_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?is)<meta\b(?:[^>"']|"[^"]*"|'[^']*')*>"#).unwrap());
static ATTR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)([a-zA-Z_:\-]+)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap()
});
static SCRIPT_LD_JSON_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<script\b[^>]*type\s*=\s*["']application/ld\+json["'][^>]*>(.*?)</script>"#)
        .unwrap()
});

/// Map of `og:` keys (without the prefix) to their content. Attribute order inside a tag does
/// not matter; a later tag for the same key replaces an earlier one.
pub(crate) fn collect_open_graph(html: &str) -> HashMap<String, String> {
    let mut out = HashMap::new();
    for tag in META_TAG_RE.find_iter(html) {
        let mut property = None;
        let mut content = None;
        for cap in ATTR_RE.captures_iter(tag.as_str()) {
            let Some(val) = cap.get(2).or_else(|| cap.get(3)) else {
                continue;
            };
            match cap[1].to_ascii_lowercase().as_str() {
                "property" => property = Some(val.as_str()),
                "content" => content = Some(val.as_str()),
                _ => {}
            }
        }
        if let (Some(property), Some(content)) = (property, content)
            && let Some(key) = property.strip_prefix("og:")
            && !key.is_empty()
            && !content.is_empty()
        {
            out.insert(key.to_string(), content.to_string());
        }
    }
    out
}

/// Every JSON-LD block that parses. Top-level arrays are flattened; broken blocks are skipped.
pub(crate) fn collect_json_ld(html: &str) -> Vec<Value> {
    let mut out = Vec::new();
    for c in SCRIPT_LD_JSON_RE.captures_iter(html) {
        let raw = c[1].trim();
        let cleaned = raw.replace("<!--", "").replace("-->", "");
        match serde_json::from_str::<Value>(&cleaned) {
            Ok(Value::Array(a)) => out.extend(a),
            Ok(v) => out.push(v),
            Err(e) => warn!(error = %e, "skipping malformed JSON-LD block"),
        }
    }
    out
}

fn has_type(v: &Value, ty: &str) -> bool {
    match v.get("@type") {
        Some(Value::String(s)) => s == ty,
        Some(Value::Array(a)) => a.iter().any(|t| t.as_str() == Some(ty)),
        _ => false,
    }
}

/// Non-empty string at a JSON pointer such as `/badge/issuer/name`.
pub(crate) fn str_at(v: &Value, pointer: &str) -> Option<String> {
    v.pointer(pointer)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Skills given either as plain strings or as objects carrying a `name`.
pub(crate) fn skills_at(v: &Value, pointer: &str) -> Option<Vec<String>> {
    let skills: Vec<String> = v
        .pointer(pointer)?
        .as_array()?
        .iter()
        .filter_map(|s| match s {
            Value::String(s) => Some(s.trim().to_string()),
            Value::Object(_) => str_at(s, "/name"),
            _ => None,
        })
        .filter(|s| !s.is_empty())
        .collect();
    (!skills.is_empty()).then_some(skills)
}

/// Set `slot` only when `value` is present.
pub(crate) fn set(slot: &mut Option<String>, value: Option<String>) {
    if value.is_some() {
        *slot = value;
    }
}

/// First capture group of `re` in `html`.
pub(crate) fn capture(re: &Regex, html: &str) -> Option<String> {
    re.captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
}

pub(crate) fn og_title_image(page: &Page<'_>, meta: &mut CertificateMetadata) {
    set(&mut meta.name, page.og("title"));
    set(&mut meta.thumbnail_url, page.og("image"));
}

fn og_title_image_description(page: &Page<'_>, meta: &mut CertificateMetadata) {
    og_title_image(page, meta);
    set(&mut meta.description, page.og("description"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_graph_either_attribute_order() {
        let html = r#"
            <meta property="og:title" content="First"/>
            <meta data-react-helmet="true" content="https://img/x.png" name="x" property="og:image">
            <meta content='Desc' property='og:description' />
        "#;
        let og = collect_open_graph(html);
        assert_eq!(og.get("title").map(String::as_str), Some("First"));
        assert_eq!(og.get("image").map(String::as_str), Some("https://img/x.png"));
        assert_eq!(og.get("description").map(String::as_str), Some("Desc"));
    }

    #[test]
    fn open_graph_content_may_contain_angle_bracket() {
        let html = r#"
            <meta property="og:title" content="C++ -> Rust Migration"/>
            <meta content='a > b' property='og:description'>
            <meta property="og:image" content="https://img/y.png">
        "#;
        let og = collect_open_graph(html);
        assert_eq!(og.get("title").map(String::as_str), Some("C++ -> Rust Migration"));
        assert_eq!(og.get("description").map(String::as_str), Some("a > b"));
        assert_eq!(og.get("image").map(String::as_str), Some("https://img/y.png"));

        let meta = extract(Some(Provider::Udemy), html);
        assert_eq!(meta.name.as_deref(), Some("C++ -> Rust Migration"));
    }

    #[test]
    fn open_graph_later_tag_wins_and_empty_ignored() {
        let html = r#"
            <meta property="og:title" content="Old">
            <meta content="New" property="og:title">
            <meta property="og:title" content="">
            <meta name="description" content="not og">
        "#;
        let og = collect_open_graph(html);
        assert_eq!(og.get("title").map(String::as_str), Some("New"));
        assert_eq!(og.len(), 1);
    }

    #[test]
    fn json_ld_skips_broken_blocks() {
        let html = r#"
            <script type="application/ld+json">{ not json </script>
            <script type="application/ld+json">{"@type": "Thing", "name": "ok"}</script>
            <script type='application/ld+json'>[{"a": 1}, {"b": 2}]</script>
        "#;
        let blocks = collect_json_ld(html);
        assert_eq!(blocks.len(), 3);
        assert_eq!(str_at(&blocks[0], "/name").as_deref(), Some("ok"));
    }

    #[test]
    fn type_matching_accepts_arrays() {
        let v = serde_json::json!({"@type": ["Thing", "EducationalOccupationalCredential"]});
        assert!(has_type(&v, "EducationalOccupationalCredential"));
        assert!(!has_type(&v, "Person"));
    }

    #[test]
    fn skills_accept_strings_and_objects() {
        let v = serde_json::json!({"skills": ["Rust", {"name": "AWS"}, 3, ""]});
        assert_eq!(skills_at(&v, "/skills"), Some(vec!["Rust".into(), "AWS".into()]));
        assert_eq!(skills_at(&v, "/missing"), None);
    }

    #[test]
    fn generic_extraction_reads_open_graph_only() {
        let html = r#"
            <meta property="og:title" content="Some Badge">
            <meta property="og:image" content="https://img">
            <meta property="og:description" content="About it">
            <script type="application/ld+json">{"@type": "EducationalOccupationalCredential", "name": "Ignored"}</script>
        "#;
        let meta = extract(None, html);
        assert_eq!(meta.name.as_deref(), Some("Some Badge"));
        assert_eq!(meta.thumbnail_url.as_deref(), Some("https://img"));
        assert_eq!(meta.description.as_deref(), Some("About it"));
        assert_eq!(meta.issuer, None);

        let same = extract(Some(Provider::Udacity), html);
        assert_eq!(same, meta);
    }

    #[test]
    fn garbage_yields_empty_record() {
        assert!(extract(Some(Provider::Credly), "").is_empty());
        assert!(extract(None, "<<<>>> not html at all").is_empty());
    }
}
