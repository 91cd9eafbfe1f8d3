//! # error-triage
//!
//! Maps raw pipeline errors -- which frequently embed vendor internals,
//! request ids, and stack fragments -- into a closed set of safe category
//! codes, and maps those codes into user-facing messages drawn from a fixed,
//! reviewed string table.
//!
//! The crate is organised around three pieces:
//!
//! 1. **[`classify`]** -- an ordered, first-match-wins substring classifier
//!    producing an [`ErrorCategory`].
//! 2. **[`messages`]** -- the `(category, content type)` -> message table.
//!    No raw error text ever flows into its output.
//! 3. **[`NonRetryableError`]** -- a typed error signalling permanent
//!    failure, so retry middleware can skip retrying by type check alone.
//!
//! ## Quick start
//!
//! ```rust
//! use error_triage::{classify_error, user_facing_message, ErrorCategory};
//!
//! let category = classify_error("Firecrawl returned 429: rate limit exceeded");
//! assert_eq!(category, ErrorCategory::RateLimited);
//!
//! let message = user_facing_message("article", category);
//! assert!(!message.contains("429"));
//! ```

pub mod classify;
pub mod messages;
mod non_retryable;

// Re-export the primary public API at the crate root for ergonomic imports.
pub use classify::{classify_error, ErrorCategory};
pub use messages::user_facing_message;
pub use non_retryable::{is_non_retryable, NonRetryableError};
