//! Permanent-failure signalling for retry middleware.

use thiserror::Error;

/// An error whose cause is permanent -- retrying cannot succeed.
///
/// Identity is established by type, not by message content: retry middleware
/// checks for this type (directly or via [`is_non_retryable`]) and gives up
/// immediately, while transient failures keep their normal error types and
/// stay retryable. The message is the only payload.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct NonRetryableError {
    message: String,
}

impl NonRetryableError {
    /// Construct from a message describing the permanent failure.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The message supplied at construction.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Returns `true` when `err` is, or wraps, a [`NonRetryableError`] anywhere
/// in its chain.
pub fn is_non_retryable(err: &anyhow::Error) -> bool {
    err.chain()
        .any(|cause| cause.downcast_ref::<NonRetryableError>().is_some())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
