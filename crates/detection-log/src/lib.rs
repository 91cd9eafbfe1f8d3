//! Append-only structured JSON-lines logging for safety-pipeline detections.
//!
//! The sanitizer and screener components classify text synchronously; this
//! crate is the collaborator they report into. Each detection is serialised
//! as a single newline-terminated JSON object and appended to a log file,
//! producing a [JSON Lines](https://jsonlines.org/) stream that is easy to
//! ship, parse, and replay.
//!
//! Emission is strictly fire-and-forget: [`DetectionSink::record`] is
//! synchronous, never blocks, and never propagates failure back into the
//! sanitization call that produced the detection. A full or closed channel
//! drops the record with a warning.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use detection_log::{DetectionRecord, DetectionSink, JsonlSink};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let (sink, _handle) = JsonlSink::start("/var/log/prompt-gate/detections.jsonl").await?;
//!
//! sink.record(DetectionRecord::new(
//!     "ignore_previous",
//!     "instruction-override",
//!     "input-sanitizer",
//! ));
//! # Ok(())
//! # }
//! ```

pub mod record;
pub mod sink;
pub mod writer;

// Re-export primary public types at the crate root for convenience.
pub use record::DetectionRecord;
pub use sink::{DetectionSink, JsonlSink, TracingSink};
pub use writer::{DetectionWriteError, DetectionWriter};
