use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

/// A certificate-issuing platform recognised by the shape of its URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    Coursera,
    Udemy,
    Credly,
    Edx,
    LinkedInLearning,
    Udacity,
    GoogleCloudSkillsBoost,
    HubSpotAcademy,
    MicrosoftLearn,
    AwsCertification,
}

impl Provider {
    /// Every provider, in matching priority.
    ///
    /// NOTE: Ordering is important here. If two providers match the same URL, the first one in
    /// this list wins; there is no ranking by specificity.
    pub const ALL: [Provider; 10] = [
        Provider::Coursera,
        Provider::Udemy,
        Provider::Credly,
        Provider::Edx,
        Provider::LinkedInLearning,
        Provider::Udacity,
        Provider::GoogleCloudSkillsBoost,
        Provider::HubSpotAcademy,
        Provider::MicrosoftLearn,
        Provider::AwsCertification,
    ];

    /// Display name of the platform.
    pub fn name(self) -> &'static str {
        match self {
            Provider::Coursera => "Coursera",
            Provider::Udemy => "Udemy",
            Provider::Credly => "Credly",
            Provider::Edx => "edX",
            Provider::LinkedInLearning => "LinkedIn Learning",
            Provider::Udacity => "Udacity",
            Provider::GoogleCloudSkillsBoost => "Google Cloud Skills Boost",
            Provider::HubSpotAcademy => "HubSpot Academy",
            Provider::MicrosoftLearn => "Microsoft Learn",
            Provider::AwsCertification => "AWS Certification",
        }
    }

    /// Canonical name of the organisation behind the platform.
    pub fn issuer(self) -> &'static str {
        match self {
            Provider::Coursera => "Coursera",
            Provider::Udemy => "Udemy",
            Provider::Credly => "Credly",
            Provider::Edx => "edX",
            Provider::LinkedInLearning => "LinkedIn Learning",
            Provider::Udacity => "Udacity",
            Provider::GoogleCloudSkillsBoost => "Google Cloud",
            Provider::HubSpotAcademy => "HubSpot Academy",
            Provider::MicrosoftLearn => "Microsoft",
            Provider::AwsCertification => "Amazon Web Services",
        }
    }

    /// Look a provider up by its display name.
    pub fn from_name(name: &str) -> Option<Provider> {
        Provider::ALL.into_iter().find(|p| p.name() == name)
    }

    /// Whether we know how to scrape metadata for this provider.
    pub fn supports_metadata(self) -> bool {
        matches!(
            self,
            Provider::Coursera
                | Provider::Udemy
                | Provider::Credly
                | Provider::Edx
                | Provider::HubSpotAcademy
        )
    }

    /// A hint to show next to certificates from this provider, if there is anything worth saying.
    pub fn help_message(self) -> Option<&'static str> {
        match self {
            Provider::LinkedInLearning => Some(
                "Note: LinkedIn Learning certificates may require authentication to fetch details.",
            ),
            Provider::Udacity => Some("Udacity certificates have limited metadata available."),
            Provider::GoogleCloudSkillsBoost => {
                Some("Google Cloud badges may have limited metadata.")
            }
            _ => None,
        }
    }

    /// URL patterns for this provider, in the order they are tried.
    pub(crate) fn patterns(self) -> &'static [Regex] {
        &SIGNATURES[self as usize]
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Hint for URLs that matched no provider.
pub fn unknown_platform_help() -> &'static str {
    "Platform not recognized. You can still enter details manually."
}

/// Static allow-list lookup by provider display name.
pub fn supports_metadata_fetching(provider_name: &str) -> bool {
    Provider::from_name(provider_name).is_some_and(Provider::supports_metadata)
}

// Patterns capture the credential as `id`; Coursera's first pattern also captures `kind`.
// Indexed by `Provider as usize`, so the rows must follow the enum declaration order.
static SIGNATURES: Lazy<Vec<Vec<Regex>>> = Lazy::new(|| {
    let table: [&[&str]; 10] = [
        // Coursera
        &[
            r"coursera\.org/account/accomplishments/(?P<kind>certificate|specialization|professional-cert)/(?P<id>[A-Z0-9]+)",
            r"coursera\.org/account/accomplishments/verify/(?P<id>[A-Z0-9]+)",
            r"coursera\.org/verify/(?P<id>[A-Z0-9]+)",
        ],
        // Udemy
        &[
            r"udemy\.com/certificate/(?P<id>UC-[A-Z0-9-]+)",
            r"ude\.my/(?P<id>UC-[A-Z0-9-]+)",
        ],
        // Credly
        &[r"credly\.com/badges/(?P<id>[a-z0-9-]+)"],
        // edX
        &[
            r"courses\.edx\.org/certificates/(?P<id>[a-z0-9]+)",
            r"credentials\.edx\.org/credentials/(?P<id>[a-z0-9-]+)",
        ],
        // LinkedIn Learning
        &[r"linkedin\.com/learning/certificates/(?P<id>[a-z0-9]+)"],
        // Udacity
        &[
            r"confirm\.udacity\.com/(?P<id>[A-Z0-9]+)",
            r"graduation\.udacity\.com/confirm/(?P<id>[A-Z0-9]+)",
        ],
        // Google Cloud Skills Boost
        &[r"cloudskillsboost\.google/public_profiles/[^/]+/badges/(?P<id>[0-9]+)"],
        // HubSpot Academy
        &[r"academy\.hubspot\.com/certificates/(?P<id>[a-z0-9]+)"],
        // Microsoft Learn
        &[r"learn\.microsoft\.com/.*/credentials/(?P<id>[a-z0-9-]+)"],
        // AWS Certification. The Credly form is shadowed by Credly itself.
        &[
            r"certmetrics\.com/amazon/public/badge\.aspx.*ci=(?P<id>[A-Z0-9]+)",
            r"credly\.com/badges/.*aws",
        ],
    ];
    table
        .iter()
        .map(|row| {
            row.iter()
                .map(|p| Regex::new(&format!("(?i){p}")).unwrap())
                .collect()
        })
        .collect()
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_provider_has_patterns() {
        for p in Provider::ALL {
            assert!(!p.patterns().is_empty(), "{p} has no patterns");
        }
    }

    #[test]
    fn from_name_roundtrips_display_names() {
        for p in Provider::ALL {
            assert_eq!(Provider::from_name(p.name()), Some(p));
        }
        assert_eq!(Provider::from_name("Unknown"), None);
        assert_eq!(Provider::from_name("coursera"), None);
    }

    #[test]
    fn metadata_allow_list() {
        assert!(supports_metadata_fetching("Credly"));
        assert!(supports_metadata_fetching("Coursera"));
        assert!(supports_metadata_fetching("Udemy"));
        assert!(supports_metadata_fetching("edX"));
        assert!(supports_metadata_fetching("HubSpot Academy"));
        assert!(!supports_metadata_fetching("Udacity"));
        assert!(!supports_metadata_fetching("LinkedIn Learning"));
        assert!(!supports_metadata_fetching("AWS Certification"));
        assert!(!supports_metadata_fetching("Unknown"));
    }

    #[test]
    fn issuer_differs_from_name_where_expected() {
        assert_eq!(Provider::GoogleCloudSkillsBoost.issuer(), "Google Cloud");
        assert_eq!(Provider::MicrosoftLearn.issuer(), "Microsoft");
        assert_eq!(Provider::AwsCertification.issuer(), "Amazon Web Services");
    }

    #[test]
    fn help_messages() {
        assert!(Provider::Udacity.help_message().is_some());
        assert!(Provider::Credly.help_message().is_none());
        assert!(unknown_platform_help().contains("manually"));
    }
}
