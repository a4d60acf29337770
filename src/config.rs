use std::time::Duration;

/// Desktop browser identity used for certificate pages; many providers refuse other clients.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Identifying user agent for the Credly badge JSON endpoint.
pub const JSON_USER_AGENT: &str = "Mozilla/5.0 (compatible; ResumeBuilder/1.0)";

pub const HTML_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";
pub const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const CREDLY_BADGE_BASE: &str = "https://www.credly.com/badges";

/// Settings for outbound metadata requests.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Hard wall-clock limit per request; the request is abandoned after this.
    pub timeout: Duration,
    pub browser_user_agent: String,
    pub json_user_agent: String,
    /// Base for `{base}/{id}.json` Credly badge documents.
    pub credly_badge_base: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        FetchConfig {
            timeout: DEFAULT_TIMEOUT,
            browser_user_agent: BROWSER_USER_AGENT.to_string(),
            json_user_agent: JSON_USER_AGENT.to_string(),
            credly_badge_base: CREDLY_BADGE_BASE.to_string(),
        }
    }
}

impl FetchConfig {
    pub fn credly_badge_url(&self, id: &str) -> String {
        format!("{}/{}.json", self.credly_badge_base.trim_end_matches('/'), id)
    }
}
