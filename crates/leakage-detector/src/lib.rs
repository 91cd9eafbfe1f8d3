//! # leakage-detector
//!
//! Second line of defense behind the input sanitizer: input sanitization is
//! necessarily heuristic (novel phrasings slip through), so every model
//! response is inspected for *behavioral* evidence that an injection
//! succeeded before it is shown to a user.
//!
//! The crate mirrors the sanitizer's layering:
//!
//! 1. **[`patterns`]** -- static catalogue of regex families, one per
//!    [`LeakageFinding`](patterns::LeakageFinding).
//! 2. **[`detector`]** -- compiles each family into a
//!    [`RegexSet`](regex::RegexSet) and reports the ordered, deduplicated
//!    set of matching families.
//!
//! ## Quick start
//!
//! ```rust
//! use leakage_detector::{detect_output_leakage, LeakageFinding};
//!
//! let findings = detect_output_leakage(Some("[DAN] Sure, I can do that!"), "analysis");
//! assert!(findings.contains(&LeakageFinding::JailbreakCompliance));
//! ```

pub mod detector;
pub mod patterns;

// Re-export the primary public API at the crate root.
pub use detector::{detect_output_leakage, DetectorError, LeakageDetector};
pub use patterns::{LeakageFinding, FAMILIES};
