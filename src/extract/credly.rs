use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::warn;

use super::{Page, Pass, og_title_image, set, skills_at, str_at};
use crate::metadata::CertificateMetadata;

pub(super) const PASSES: &[Pass] = &[og_title_image, json_ld, inline_badge_data];

const CREDENTIAL_TYPE: &str = "EducationalOccupationalCredential";

// Credly follows the OpenBadges layout: the badge class sits under `badge`, the assertion
// fields (`issued_at`, `expires_at`) at the top level.
fn json_ld(page: &Page<'_>, meta: &mut CertificateMetadata) {
    let blocks = page
        .json_ld
        .iter()
        .filter(|b| super::has_type(b, CREDENTIAL_TYPE) || is_truthy(b.get("badge")));
    for block in blocks {
        set(&mut meta.name, str_at(block, "/name"));
        set(&mut meta.name, str_at(block, "/badge/name"));
        set(&mut meta.issuer, str_at(block, "/issuer/name"));
        set(&mut meta.issuer, str_at(block, "/badge/issuer/name"));
        set(&mut meta.completion_date, str_at(block, "/dateCreated"));
        set(&mut meta.completion_date, str_at(block, "/issued_at"));
        set(&mut meta.expiration_date, str_at(block, "/expires_at"));
        set(&mut meta.description, str_at(block, "/description"));
        if let Some(skills) = skills_at(block, "/skills") {
            meta.skills = Some(skills);
        }
    }
}

fn inline_badge_data(page: &Page<'_>, meta: &mut CertificateMetadata) {
    static BADGE_DATA_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?is)window\.badgeData\s*=\s*(\{.*?\});").unwrap());

    let Some(raw) = BADGE_DATA_RE.captures(page.html).and_then(|c| c.get(1)) else {
        return;
    };
    match serde_json::from_str::<Value>(raw.as_str()) {
        Ok(data) => {
            set(&mut meta.name, str_at(&data, "/badge/name"));
            set(&mut meta.issuer, str_at(&data, "/badge/issuer/name"));
            set(&mut meta.completion_date, str_at(&data, "/issued_at"));
        }
        Err(e) => warn!(error = %e, "ignoring unparseable window.badgeData"),
    }
}

fn is_truthy(v: Option<&Value>) -> bool {
    match v {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

/// Read the document served at `https://www.credly.com/badges/{id}.json`.
///
/// Returns `None` when the body is not a JSON object, so the caller can fall back to scraping
/// the HTML page.
pub fn extract_json(body: &str) -> Option<CertificateMetadata> {
    let data = match serde_json::from_str::<Value>(body) {
        Ok(v @ Value::Object(_)) => v,
        Ok(_) => {
            warn!("Credly badge document is not a JSON object");
            return None;
        }
        Err(e) => {
            warn!(error = %e, "Credly badge document is not valid JSON");
            return None;
        }
    };
    let either = |nested: &str, top: &str| str_at(&data, nested).or_else(|| str_at(&data, top));
    Some(CertificateMetadata {
        name: either("/badge/name", "/name"),
        issuer: either("/badge/issuer/name", "/issuer/name"),
        completion_date: str_at(&data, "/issued_at"),
        expiration_date: str_at(&data, "/expires_at"),
        description: either("/badge/description", "/description"),
        skills: skills_at(&data, "/badge/skills").or_else(|| skills_at(&data, "/skills")),
        thumbnail_url: either("/badge/image_url", "/image_url"),
    })
}
