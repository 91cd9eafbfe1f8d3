//! The user-facing message table.
//!
//! Every string here is fixed and reviewed. Raw error text, vendor names,
//! and stack fragments must never be interpolated into the output; the only
//! variable part is a generic content-type noun chosen from a closed list.

use crate::classify::ErrorCategory;

/// Normalise a free-form content type into one of the nouns the message
/// table is written against. Unrecognised types collapse to "content".
fn content_noun(content_type: &str) -> &'static str {
    match content_type.to_lowercase().as_str() {
        "article" | "blog" | "news" => "article",
        "video" | "youtube" => "video",
        "podcast" | "audio" | "episode" => "podcast",
        "document" | "pdf" | "paper" => "document",
        _ => "content",
    }
}

fn is_video(content_type: &str) -> bool {
    content_noun(content_type) == "video"
}

fn is_audio_like(content_type: &str) -> bool {
    matches!(content_noun(content_type), "podcast" | "video")
}

/// Map a `(content type, category)` pair to a user-facing message.
///
/// The output is always drawn from the fixed table below and never contains
/// raw error detail. Unrecognised content types fall back to generic
/// phrasing; [`ErrorCategory::Unknown`] falls back to a generic
/// "Something went wrong" message.
pub fn user_facing_message(content_type: &str, category: ErrorCategory) -> String {
    let noun = content_noun(content_type);

    match category {
        ErrorCategory::RateLimited => {
            "The service is busy right now. Please try again in a few minutes.".to_string()
        }
        ErrorCategory::Timeout => {
            format!("This {noun} took too long to process. Please try again.")
        }
        ErrorCategory::ContentUnavailable => {
            if is_video(content_type) {
                "This video is unavailable. It may be private or region-locked.".to_string()
            } else {
                format!("This {noun} is unavailable. It may have been removed or made private.")
            }
        }
        ErrorCategory::ScrapeFailed => {
            if noun == "article" {
                "We couldn't read this article. It may be behind a paywall.".to_string()
            } else {
                format!("We couldn't read this {noun}. The page may be blocking automated access or behind a paywall.")
            }
        }
        ErrorCategory::TranscriptFailed | ErrorCategory::TranscriptionFailed => {
            if is_audio_like(content_type) {
                format!("We couldn't transcribe the audio for this {noun}. Please try again later.")
            } else {
                format!("We couldn't produce a transcript for this {noun}. Please try again later.")
            }
        }
        ErrorCategory::AiAnalysisFailed => {
            format!("The analysis service had trouble with this {noun}. Please try again.")
        }
        ErrorCategory::OcrFailed => {
            if noun == "document" {
                "We couldn't read the text in this document. The file may be a low-quality scan."
                    .to_string()
            } else {
                format!("We couldn't read the text in this {noun}. Please try again.")
            }
        }
        ErrorCategory::Unknown => {
            format!("Something went wrong while processing this {noun}. Please try again.")
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_CATEGORIES: &[ErrorCategory] = &[
        ErrorCategory::RateLimited,
        ErrorCategory::Timeout,
        ErrorCategory::ContentUnavailable,
        ErrorCategory::ScrapeFailed,
        ErrorCategory::TranscriptFailed,
        ErrorCategory::TranscriptionFailed,
        ErrorCategory::AiAnalysisFailed,
        ErrorCategory::OcrFailed,
        ErrorCategory::Unknown,
    ];

    const CONTENT_TYPES: &[&str] = &[
        "article", "video", "podcast", "document", "blog", "pdf", "widget", "",
    ];

    // -- the leak-prevention invariant ------------------------------------

    #[test]
    fn messages_never_leak_exception_shape() {
        for category in ALL_CATEGORIES {
            for content_type in CONTENT_TYPES {
                let msg = user_facing_message(content_type, *category);
                assert!(!msg.contains("stack"), "{msg}");
                assert!(!msg.contains("Error:"), "{msg}");
                assert!(!msg.contains("at "), "{msg}");
            }
        }
    }

    // -- content-type phrasing --------------------------------------------

    #[test]
    fn scrape_failure_mentions_article_and_paywall() {
        let msg = user_facing_message("article", ErrorCategory::ScrapeFailed);
        assert!(msg.contains("article"));
        assert!(msg.contains("paywall"));
    }

    #[test]
    fn unavailable_video_mentions_video() {
        let msg = user_facing_message("video", ErrorCategory::ContentUnavailable);
        assert!(msg.contains("video"));
        assert!(msg.contains("unavailable"));
    }

    #[test]
    fn transcription_failure_mentions_audio_for_podcasts() {
        for category in [
            ErrorCategory::TranscriptFailed,
            ErrorCategory::TranscriptionFailed,
        ] {
            let msg = user_facing_message("podcast", category);
            assert!(msg.contains("audio"), "{msg}");
            assert!(msg.contains("podcast"), "{msg}");
        }
    }

    #[test]
    fn ocr_failure_mentions_document() {
        let msg = user_facing_message("document", ErrorCategory::OcrFailed);
        assert!(msg.contains("document"));
    }

    #[test]
    fn rate_limited_says_busy_and_try_again() {
        let msg = user_facing_message("article", ErrorCategory::RateLimited);
        assert!(msg.contains("busy"));
        assert!(msg.contains("try again"));
    }

    #[test]
    fn timeout_says_too_long() {
        let msg = user_facing_message("video", ErrorCategory::Timeout);
        assert!(msg.contains("too long"));
    }

    // -- fallbacks ---------------------------------------------------------

    #[test]
    fn unknown_category_falls_back_generically() {
        let msg = user_facing_message("article", ErrorCategory::Unknown);
        assert!(msg.contains("Something went wrong"));
    }

    #[test]
    fn unrecognised_content_type_uses_generic_noun() {
        let msg = user_facing_message("widget", ErrorCategory::Unknown);
        assert!(msg.contains("Something went wrong"));
        assert!(msg.contains("content"));
        assert!(!msg.contains("widget"));
    }

    #[test]
    fn noun_normalisation() {
        assert_eq!(content_noun("Article"), "article");
        assert_eq!(content_noun("YOUTUBE"), "video");
        assert_eq!(content_noun("episode"), "podcast");
        assert_eq!(content_noun("paper"), "document");
        assert_eq!(content_noun("mystery"), "content");
        assert_eq!(content_noun(""), "content");
    }
}
