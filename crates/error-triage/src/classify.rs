//! Ordered, first-match-wins error classification.
//!
//! The rules are a literal ordered list, not a map: several categories share
//! keywords ("rate limit" errors often also mention the failing stage, for
//! example), so evaluation order is part of the contract.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// The closed set of safe error categories surfaced by the pipeline.
///
/// A category never carries the original error text, so it is always safe to
/// log, persist, and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCategory {
    RateLimited,
    Timeout,
    ContentUnavailable,
    ScrapeFailed,
    TranscriptFailed,
    TranscriptionFailed,
    AiAnalysisFailed,
    OcrFailed,
    Unknown,
}

impl ErrorCategory {
    /// The stable wire token for this category.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RateLimited => "RATE_LIMITED",
            Self::Timeout => "TIMEOUT",
            Self::ContentUnavailable => "CONTENT_UNAVAILABLE",
            Self::ScrapeFailed => "SCRAPE_FAILED",
            Self::TranscriptFailed => "TRANSCRIPT_FAILED",
            Self::TranscriptionFailed => "TRANSCRIPTION_FAILED",
            Self::AiAnalysisFailed => "AI_ANALYSIS_FAILED",
            Self::OcrFailed => "OCR_FAILED",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Rule table
// ---------------------------------------------------------------------------

/// Classification rules, evaluated top-to-bottom against the lowercased
/// message; the first rule with any matching keyword wins.
///
/// Note the `TranscriptFailed` / `TranscriptionFailed` pair: "transcript" is
/// a prefix of "transcription", so any message the second rule could match is
/// already claimed by the first. The second rule is therefore dead in
/// practice. Downstream consumers assert this precedence, so it must stay as
/// written; see DESIGN.md before reordering.
const RULES: &[(ErrorCategory, &[&str])] = &[
    (
        ErrorCategory::RateLimited,
        &["429", "rate limit", "too many", "limit-exceeded"],
    ),
    (
        ErrorCategory::Timeout,
        &["timeout", "timed out", "aborterror", "aborted"],
    ),
    (
        ErrorCategory::ContentUnavailable,
        &["unavailable", "not found", "private", "restricted"],
    ),
    (
        ErrorCategory::ScrapeFailed,
        &["firecrawl", "scrape", "article content"],
    ),
    (ErrorCategory::TranscriptFailed, &["transcript"]),
    (ErrorCategory::TranscriptionFailed, &["transcription"]),
    (
        ErrorCategory::AiAnalysisFailed,
        &["openrouter", "ai analysis"],
    ),
    (ErrorCategory::OcrFailed, &["ocr"]),
];

/// Classify a raw error message into an [`ErrorCategory`].
///
/// Matching is case-insensitive substring containment. An empty message, or
/// one matching no rule, classifies as [`ErrorCategory::Unknown`]. Never
/// panics.
pub fn classify_error(message: &str) -> ErrorCategory {
    if message.is_empty() {
        return ErrorCategory::Unknown;
    }

    let lowered = message.to_lowercase();
    for (category, keywords) in RULES {
        if keywords.iter().any(|kw| lowered.contains(kw)) {
            return *category;
        }
    }

    ErrorCategory::Unknown
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- per-rule matching ------------------------------------------------

    #[test]
    fn rate_limit_keywords() {
        for msg in [
            "upstream returned 429",
            "Rate Limit exceeded on key",
            "too many requests",
            "quota limit-exceeded for project",
        ] {
            assert_eq!(classify_error(msg), ErrorCategory::RateLimited, "{msg}");
        }
    }

    #[test]
    fn timeout_keywords() {
        for msg in [
            "request timeout after 30s",
            "the operation timed out",
            "AbortError: signal aborted",
            "fetch aborted by caller",
        ] {
            assert_eq!(classify_error(msg), ErrorCategory::Timeout, "{msg}");
        }
    }

    #[test]
    fn content_unavailable_keywords() {
        for msg in [
            "video unavailable in your region",
            "resource not found",
            "this channel is private",
            "content restricted by uploader",
        ] {
            assert_eq!(
                classify_error(msg),
                ErrorCategory::ContentUnavailable,
                "{msg}"
            );
        }
    }

    #[test]
    fn scrape_keywords() {
        for msg in [
            "Firecrawl job failed",
            "could not scrape page",
            "no article content extracted",
        ] {
            assert_eq!(classify_error(msg), ErrorCategory::ScrapeFailed, "{msg}");
        }
    }

    #[test]
    fn ai_analysis_keywords() {
        assert_eq!(
            classify_error("OpenRouter responded with an empty body"),
            ErrorCategory::AiAnalysisFailed
        );
        assert_eq!(
            classify_error("ai analysis produced invalid JSON"),
            ErrorCategory::AiAnalysisFailed
        );
    }

    #[test]
    fn ocr_keywords() {
        assert_eq!(
            classify_error("OCR engine crashed on page 3"),
            ErrorCategory::OcrFailed
        );
    }

    // -- ordering ---------------------------------------------------------

    #[test]
    fn earlier_rule_wins_on_overlap() {
        // Contains both "rate limit" (rule 1) and "ocr" (rule 8).
        assert_eq!(
            classify_error("ocr service hit a rate limit"),
            ErrorCategory::RateLimited
        );
        // Contains both "timed out" (rule 2) and "scrape" (rule 4).
        assert_eq!(
            classify_error("scrape worker timed out"),
            ErrorCategory::Timeout
        );
    }

    #[test]
    fn transcript_shadows_transcription() {
        // "transcription" contains "transcript", so the earlier rule claims
        // every such message.
        assert_eq!(
            classify_error("transcription service returned nothing"),
            ErrorCategory::TranscriptFailed
        );
        assert_eq!(
            classify_error("no transcript available for this video id"),
            // "unavailable" is NOT in this message; "available" alone does
            // not match rule 3.
            ErrorCategory::TranscriptFailed
        );
    }

    // -- totality / defaults ----------------------------------------------

    #[test]
    fn empty_message_is_unknown() {
        assert_eq!(classify_error(""), ErrorCategory::Unknown);
    }

    #[test]
    fn unmatched_message_is_unknown() {
        assert_eq!(
            classify_error("some entirely novel failure mode"),
            ErrorCategory::Unknown
        );
    }

    #[test]
    fn classification_is_case_insensitive() {
        assert_eq!(
            classify_error("RATE LIMIT REACHED"),
            ErrorCategory::RateLimited
        );
        assert_eq!(classify_error("TiMeD oUt"), ErrorCategory::Timeout);
        assert_eq!(classify_error("FIRECRAWL down"), ErrorCategory::ScrapeFailed);
    }

    // -- serialization ----------------------------------------------------

    #[test]
    fn serializes_as_wire_tokens() {
        let json = serde_json::to_string(&ErrorCategory::RateLimited).unwrap();
        assert_eq!(json, "\"RATE_LIMITED\"");
        let back: ErrorCategory = serde_json::from_str("\"AI_ANALYSIS_FAILED\"").unwrap();
        assert_eq!(back, ErrorCategory::AiAnalysisFailed);
    }

    #[test]
    fn display_matches_as_str() {
        assert_eq!(
            ErrorCategory::ContentUnavailable.to_string(),
            "CONTENT_UNAVAILABLE"
        );
    }
}
