//! Domain classifier for incoming queries.
//!
//! Decides whether a free-text query is in scope for the supported CDP
//! platforms. A pure predicate over fixed keyword tables plus one compiled
//! pattern; no side effects, deterministic, case-insensitive substring
//! matching throughout.
//!
//! Matching is substring-based, so false positives are expected and
//! accepted (a query containing "segment" as a plain English word counts as
//! in-domain).

use crate::types::Platform;
use cdp_core::{AppError, AppResult};
use regex::Regex;

/// Keywords and phrases related to Customer Data Platforms.
const CDP_KEYWORDS: &[&str] = &[
    "customer data platform",
    "cdp",
    "segment",
    "mparticle",
    "lytics",
    "zeotap",
    "data source",
    "integration",
    "audience",
    "user profile",
    "event tracking",
    "identity resolution",
    "data collection",
    "analytics",
    "attribution",
    "marketing",
    "personalization",
    "campaign",
    "customer journey",
    "data sync",
    "webhook",
    "api",
    "sdk",
    "tracking",
    "user data",
    "segmentation",
];

/// Data-related terms that qualify a how-to question as in-domain.
const DATA_TERMS: &[&str] = &[
    "data",
    "user",
    "customer",
    "profile",
    "segment",
    "audience",
    "track",
    "integration",
];

/// "How do/can/to/would/should I/we/you ..." question pattern.
const HOW_TO_PATTERN: &str = r"how (do|can|to|would|should) (i|we|you)";

/// Classifier gating queries before retrieval.
///
/// Constructed once at startup; stateless afterwards.
#[derive(Debug)]
pub struct DomainClassifier {
    how_to: Regex,
}

impl DomainClassifier {
    /// Create a classifier with the fixed keyword tables.
    pub fn new() -> AppResult<Self> {
        let how_to = Regex::new(HOW_TO_PATTERN)
            .map_err(|e| AppError::Other(format!("Invalid how-to pattern: {}", e)))?;

        Ok(Self { how_to })
    }

    /// Whether a query is in scope for the supported platforms.
    ///
    /// In order: platform names, CDP keywords, then how-to questions that
    /// mention a data-related term. All matching is case-insensitive and
    /// substring-based.
    pub fn is_in_domain(&self, query: &str) -> bool {
        let query_lower = query.to_lowercase();

        for platform in Platform::ALL {
            if query_lower.contains(&platform.as_str().to_lowercase()) {
                return true;
            }
        }

        for keyword in CDP_KEYWORDS {
            if query_lower.contains(keyword) {
                return true;
            }
        }

        if self.how_to.is_match(&query_lower) {
            for term in DATA_TERMS {
                if query_lower.contains(term) {
                    return true;
                }
            }
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> DomainClassifier {
        DomainClassifier::new().unwrap()
    }

    #[test]
    fn test_platform_names_are_in_domain() {
        let classifier = classifier();
        for platform in Platform::ALL {
            let query = format!("tell me about {}", platform.as_str());
            assert!(classifier.is_in_domain(&query), "{}", query);
        }
    }

    #[test]
    fn test_platform_names_case_insensitive() {
        let classifier = classifier();
        assert!(classifier.is_in_domain("TELL ME ABOUT MPARTICLE"));
        assert!(classifier.is_in_domain("What can ZEOTAP do?"));
    }

    #[test]
    fn test_keywords_are_in_domain() {
        let classifier = classifier();
        assert!(classifier.is_in_domain("what is a customer data platform?"));
        assert!(classifier.is_in_domain("explain identity resolution"));
        assert!(classifier.is_in_domain("which sdk should my app use?"));
    }

    #[test]
    fn test_how_to_with_data_term_is_in_domain() {
        let classifier = classifier();
        // No platform name, no keyword beyond the data-term table
        assert!(classifier.is_in_domain("how do I track user data"));
        assert!(classifier.is_in_domain("How can we build a customer profile?"));
    }

    #[test]
    fn test_how_to_without_data_term_is_out_of_domain() {
        let classifier = classifier();
        assert!(!classifier.is_in_domain("how do I bake sourdough bread"));
    }

    #[test]
    fn test_neutral_queries_are_out_of_domain() {
        let classifier = classifier();
        assert!(!classifier.is_in_domain("what's the weather"));
        assert!(!classifier.is_in_domain("what's your favorite color?"));
    }

    #[test]
    fn test_substring_false_positives_are_accepted() {
        let classifier = classifier();
        // "segment" as a plain English word still classifies as in-domain
        assert!(classifier.is_in_domain("a segment of the population"));
    }
}
