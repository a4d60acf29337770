use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::provider::Provider;

/// Name reported for valid URLs that match no provider.
pub const UNKNOWN_PLATFORM: &str = "Unknown";

/// Result of classifying a certificate URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedUrl {
    /// Whether the input parsed as a URL at all.
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<PlatformMatch>,
    pub original_url: String,
    /// The URL with its query string and one trailing slash removed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normalized_url: Option<String>,
}

impl ParsedUrl {
    /// The detected provider, if any.
    pub fn provider(&self) -> Option<Provider> {
        self.platform.as_ref().and_then(|p| p.provider)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformMatch {
    pub name: String,
    pub detected: bool,
    #[serde(skip)]
    pub provider: Option<Provider>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_type: Option<CertificateType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
}

impl PlatformMatch {
    fn found(
        provider: Provider,
        credential_id: Option<String>,
        kind: Option<CertificateType>,
    ) -> Self {
        PlatformMatch {
            name: provider.name().to_string(),
            detected: true,
            provider: Some(provider),
            credential_id,
            certificate_type: kind,
            issuer: Some(provider.issuer().to_string()),
        }
    }

    fn unknown() -> Self {
        PlatformMatch {
            name: UNKNOWN_PLATFORM.to_string(),
            detected: false,
            provider: None,
            credential_id: None,
            certificate_type: None,
            issuer: None,
        }
    }
}

/// Coursera's accomplishment sub-types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CertificateType {
    Certificate,
    Specialization,
    ProfessionalCert,
}

impl CertificateType {
    /// Parse the URL path segment, ignoring case.
    pub fn from_segment(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "certificate" => Some(CertificateType::Certificate),
            "specialization" => Some(CertificateType::Specialization),
            "professional-cert" | "professional-certificate" => {
                Some(CertificateType::ProfessionalCert)
            }
            _ => None,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            CertificateType::Certificate => "Certificate",
            CertificateType::Specialization => "Specialization",
            CertificateType::ProfessionalCert => "Professional Certificate",
        }
    }
}

/// Classify `url` against the known providers. Pure; never fails.
pub fn classify(url: &str) -> ParsedUrl {
    let trimmed = url.trim();

    if Url::parse(trimmed).is_err() {
        debug!(url, "not a valid URL");
        return ParsedUrl {
            is_valid: false,
            platform: None,
            original_url: url.to_string(),
            normalized_url: None,
        };
    }

    let platform = detect(trimmed).unwrap_or_else(PlatformMatch::unknown);
    debug!(url, platform = %platform.name, detected = platform.detected, "classified URL");

    ParsedUrl {
        is_valid: true,
        platform: Some(platform),
        original_url: url.to_string(),
        normalized_url: Some(normalize_url(trimmed)),
    }
}

fn detect(url: &str) -> Option<PlatformMatch> {
    Provider::ALL.into_iter().find_map(|provider| {
        provider.patterns().iter().find_map(|re| {
            let caps = re.captures(url)?;
            let id = caps.name("id").map(|m| m.as_str().to_string());
            // Only Coursera's typed pattern has a `kind` group; the id-only forms leave it unset.
            let kind = caps
                .name("kind")
                .and_then(|m| CertificateType::from_segment(m.as_str()));
            Some(PlatformMatch::found(provider, id, kind))
        })
    })
}

/// Strip everything from the first `?` and then a single trailing slash.
pub fn normalize_url(url: &str) -> String {
    let base = url.split('?').next().unwrap_or(url);
    base.strip_suffix('/').unwrap_or(base).to_string()
}
