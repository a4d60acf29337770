//! Outbound fetching: decide which document to request for a certificate URL, request it, and
//! hand the body to the matching extractor.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    classifier::{ParsedUrl, classify},
    config::{ACCEPT_LANGUAGE, FetchConfig, HTML_ACCEPT},
    extract::{extract, extract_credly_json},
    metadata::CertificateMetadata,
    provider::Provider,
};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Not a valid URL: {0}")]
    InvalidUrl(String),
    #[error("Unable to detect certificate platform from URL.")]
    NotDetected,
    #[error("{provider} certificates have limited metadata support")]
    Unsupported { provider: Provider },
    #[error("Failed to fetch certificate page. Status: {0}")]
    Status(u16),
    #[error(
        "Failed to fetch certificate page. The website may be blocking requests or is unreachable."
    )]
    Unreachable { detail: String },
}

/// A single GET request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
}

/// Something that can perform a GET and return the body of a 2xx response.
pub trait Transport {
    fn get(&self, request: &Request) -> Result<String, FetchError>;
}

/// [`Transport`] backed by a `ureq` agent with a global per-request timeout.
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: std::time::Duration) -> Self {
        let cfg = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();
        UreqTransport {
            agent: ureq::Agent::new_with_config(cfg),
        }
    }
}

impl Transport for UreqTransport {
    fn get(&self, request: &Request) -> Result<String, FetchError> {
        let mut req = self.agent.get(request.url.as_str());
        for (name, value) in &request.headers {
            req = req.header(*name, value.as_str());
        }
        req.call()
            .map_err(transport_error)?
            .into_body()
            .read_to_string()
            .map_err(transport_error)
    }
}

fn transport_error(e: ureq::Error) -> FetchError {
    match e {
        ureq::Error::StatusCode(code) => FetchError::Status(code),
        other => FetchError::Unreachable {
            detail: other.to_string(),
        },
    }
}

/// Fetches and extracts certificate metadata. Holds no mutable state, so one instance can serve
/// concurrent callers.
pub struct Fetcher<T = UreqTransport> {
    config: FetchConfig,
    transport: T,
}

impl Fetcher<UreqTransport> {
    pub fn new(config: FetchConfig) -> Self {
        let transport = UreqTransport::new(config.timeout);
        Fetcher { config, transport }
    }
}

impl<T: Transport> Fetcher<T> {
    pub fn with_transport(config: FetchConfig, transport: T) -> Self {
        Fetcher { config, transport }
    }

    /// Classify `url` and fetch its metadata.
    pub fn fetch_metadata(&self, url: &str) -> Result<CertificateMetadata, FetchError> {
        self.fetch_parsed(&classify(url))
    }

    /// Fetch metadata for an already classified URL. Dates in the result are normalised.
    pub fn fetch_parsed(&self, parsed: &ParsedUrl) -> Result<CertificateMetadata, FetchError> {
        if !parsed.is_valid {
            return Err(FetchError::InvalidUrl(parsed.original_url.clone()));
        }
        let provider = parsed.provider().ok_or(FetchError::NotDetected)?;
        if !provider.supports_metadata() {
            return Err(FetchError::Unsupported { provider });
        }

        if provider == Provider::Credly
            && let Some(id) = parsed.platform.as_ref().and_then(|p| p.credential_id.as_deref())
            && let Some(meta) = self.credly_badge_document(id)
        {
            return Ok(meta.normalized());
        }

        let url = parsed
            .normalized_url
            .as_deref()
            .unwrap_or(parsed.original_url.trim());
        let html = self.transport.get(&self.html_request(url)).inspect_err(|e| {
            if let FetchError::Unreachable { detail } = e {
                warn!(url, detail = %detail, "certificate page unreachable");
            }
        })?;
        info!(url, %provider, bytes = html.len(), "fetched certificate page");
        Ok(extract(Some(provider), &html).normalized())
    }

    // Any failure here is recoverable: the caller falls back to the HTML page.
    fn credly_badge_document(&self, id: &str) -> Option<CertificateMetadata> {
        let request = Request {
            url: self.config.credly_badge_url(id),
            headers: vec![
                ("User-Agent", self.config.json_user_agent.clone()),
                ("Accept", "application/json".to_string()),
            ],
        };
        match self.transport.get(&request) {
            Ok(body) => {
                let meta = extract_credly_json(&body);
                if meta.is_none() {
                    warn!(url = %request.url, "falling back to badge page");
                }
                meta
            }
            Err(e) => {
                warn!(url = %request.url, error = %e, "Credly JSON unavailable, falling back to badge page");
                None
            }
        }
    }

    fn html_request(&self, url: &str) -> Request {
        debug!(url, "requesting certificate page");
        Request {
            url: url.to_string(),
            headers: vec![
                ("User-Agent", self.config.browser_user_agent.clone()),
                ("Accept", HTML_ACCEPT.to_string()),
                ("Accept-Language", ACCEPT_LANGUAGE.to_string()),
                ("Cache-Control", "no-cache".to_string()),
            ],
        }
    }
}
