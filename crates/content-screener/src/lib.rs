//! # content-screener
//!
//! Screens outbound URLs and inbound scraped text for severe-harm
//! indicators before anything is sent to the LLM, and inspects the LLM's
//! structured refusal responses so flagged items route to human review
//! instead of failing silently.
//!
//! The crate is organised around four pieces:
//!
//! 1. **[`flag`]** -- the [`ContentFlag`](flag::ContentFlag) record consumed
//!    by the moderation queue.
//! 2. **[`rules`]** -- the read-only rule set (URL denylist, co-occurrence
//!    rules, refusal keyword map) with built-in defaults and a validated
//!    YAML loader.
//! 3. **[`screener`]** -- the compiled [`ContentScreener`](screener::ContentScreener)
//!    with `screen_url`, `screen_text`, and `detect_ai_refusal`.
//! 4. **[`fingerprint`]** -- the SHA-256 content hash used to reference
//!    flagged content without storing its raw text.
//!
//! Screening fails open on malformed input (an unparseable URL yields no
//! flag) and fails closed on ambiguous refusals (an unspecific refusal is
//! still binned into a review category).
//!
//! ## Quick start
//!
//! ```rust
//! use content_screener::{ContentScreener, Severity};
//!
//! let screener = ContentScreener::default();
//! assert!(screener.screen_url("https://example.com/article").is_none());
//!
//! let flag = screener.screen_url("https://x.onion.ws/page").unwrap();
//! assert_eq!(flag.severity, Severity::Critical);
//! ```

pub mod fingerprint;
pub mod flag;
pub mod rules;
pub mod screener;

// Re-export the primary public API at the crate root.
pub use fingerprint::hash_content;
pub use flag::{ContentFlag, FlagSource, HarmCategory, Severity};
pub use rules::{CooccurrenceRule, DenyEntry, RefusalKeyword, ScreenerRules};
pub use screener::{ContentScreener, REFUSAL_PREFIX};
