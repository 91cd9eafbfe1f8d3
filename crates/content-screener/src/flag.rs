//! The flag record handed to the moderation queue.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which screening stage produced a flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagSource {
    /// Pre-flight hostname denylist check, before any fetch.
    UrlScreening,
    /// Co-occurrence keyword screening of scraped text.
    KeywordScreening,
    /// The model's own refusal, detected in its response.
    AiRefusal,
}

impl FlagSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UrlScreening => "url_screening",
            Self::KeywordScreening => "keyword_screening",
            Self::AiRefusal => "ai_refusal",
        }
    }
}

impl fmt::Display for FlagSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flag severity, ordered from least to most severe.
///
/// Severity is monotonic with category risk: a direct content match on the
/// highest-risk categories is `Critical`, while a refusal -- the model's own
/// judgment rather than a direct match -- is one level below at `High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The closed set of severe-harm categories the screener recognises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HarmCategory {
    Csam,
    Terrorism,
    Weapons,
    Trafficking,
}

impl HarmCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Csam => "csam",
            Self::Terrorism => "terrorism",
            Self::Weapons => "weapons",
            Self::Trafficking => "trafficking",
        }
    }
}

impl fmt::Display for HarmCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A screening outcome routed to human review.
///
/// `categories` is never empty: a flag without a category is meaningless to
/// the review queue, so every construction path supplies at least one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentFlag {
    pub source: FlagSource,
    pub severity: Severity,
    pub categories: Vec<HarmCategory>,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_is_ordered() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
        assert!(Severity::High < Severity::Critical);
    }

    #[test]
    fn wire_labels() {
        assert_eq!(FlagSource::UrlScreening.to_string(), "url_screening");
        assert_eq!(FlagSource::AiRefusal.to_string(), "ai_refusal");
        assert_eq!(Severity::Critical.to_string(), "critical");
        assert_eq!(HarmCategory::Csam.to_string(), "csam");
    }

    #[test]
    fn flag_serializes_with_wire_labels() {
        let flag = ContentFlag {
            source: FlagSource::KeywordScreening,
            severity: Severity::Critical,
            categories: vec![HarmCategory::Csam],
            reason: "co-occurring indicators".to_string(),
        };
        let json = serde_json::to_value(&flag).unwrap();
        assert_eq!(json["source"], "keyword_screening");
        assert_eq!(json["severity"], "critical");
        assert_eq!(json["categories"][0], "csam");

        let back: ContentFlag = serde_json::from_value(json).unwrap();
        assert_eq!(back.categories, vec![HarmCategory::Csam]);
    }
}
