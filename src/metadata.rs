use serde::Serialize;

use crate::date::format_date;

/// Best-effort metadata scraped for one certificate. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

impl CertificateMetadata {
    /// True when nothing at all was extracted.
    pub fn is_empty(&self) -> bool {
        *self == CertificateMetadata::default()
    }

    /// Dates formatted as `YYYY-MM`; the completion date is always present (possibly empty).
    pub fn normalized(mut self) -> Self {
        self.completion_date = Some(format_date(self.completion_date.as_deref()));
        self.expiration_date = self.expiration_date.map(|d| format_date(Some(&d)));
        self
    }
}
