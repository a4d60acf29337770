//! Certificate URL classification and best-effort metadata scraping.
//!
//! [`classify`] recognises the issuing platform of a certificate or badge URL without touching
//! the network. [`Fetcher`] requests the certificate page (or, for Credly, the badge JSON
//! document) and runs the platform's extractor over it.

pub mod classifier;
pub mod config;
pub mod date;
pub mod extract;
pub mod fetch;
pub mod metadata;
pub mod provider;

pub use classifier::{CertificateType, ParsedUrl, PlatformMatch, classify};
pub use config::FetchConfig;
pub use date::format_date;
pub use fetch::{FetchError, Fetcher, Transport, UreqTransport};
pub use metadata::CertificateMetadata;
pub use provider::{Provider, supports_metadata_fetching};
