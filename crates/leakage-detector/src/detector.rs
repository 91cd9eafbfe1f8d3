//! Compiled detector over the leakage pattern families.

use std::sync::OnceLock;

use regex::RegexSet;
use tracing::warn;

use crate::patterns::{LeakageFinding, FAMILIES};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur while constructing a [`LeakageDetector`].
#[derive(Debug, thiserror::Error)]
pub enum DetectorError {
    #[error("failed to compile leakage pattern family: {0}")]
    RegexCompile(#[from] regex::Error),
}

// ---------------------------------------------------------------------------
// Detector
// ---------------------------------------------------------------------------

/// One compiled [`RegexSet`] per pattern family, checked in catalogue order.
pub struct LeakageDetector {
    families: Vec<(LeakageFinding, RegexSet)>,
}

impl LeakageDetector {
    /// Compile the built-in family catalogue.
    pub fn new() -> Result<Self, DetectorError> {
        Self::with_families(FAMILIES)
    }

    /// Compile a caller-supplied catalogue.  Check order follows slice
    /// order; tests use this to substitute alternate rule sets.
    pub fn with_families(
        families: &[(LeakageFinding, &[&str])],
    ) -> Result<Self, DetectorError> {
        let compiled = families
            .iter()
            .map(|(finding, patterns)| Ok((*finding, RegexSet::new(*patterns)?)))
            .collect::<Result<Vec<_>, DetectorError>>()?;
        Ok(Self { families: compiled })
    }

    /// Scan model output for leakage signatures.
    ///
    /// Returns the distinct matching families in fixed check order -- an
    /// ordered set.  `None` or empty output yields an empty vec; the
    /// function never panics.  `context` identifies the calling pipeline
    /// stage in the log, nothing more.
    pub fn detect(&self, output: Option<&str>, context: &str) -> Vec<LeakageFinding> {
        let text = match output {
            Some(t) if !t.is_empty() => t,
            _ => return Vec::new(),
        };

        let mut findings = Vec::new();
        for (finding, set) in &self.families {
            if set.is_match(text) {
                warn!(
                    finding = %finding,
                    context,
                    "model output carries an injection-success indicator"
                );
                findings.push(*finding);
            }
        }
        findings
    }

    /// Number of compiled families.
    pub fn family_count(&self) -> usize {
        self.families.len()
    }
}

impl Default for LeakageDetector {
    /// Constructs a detector over the built-in catalogue.
    ///
    /// # Panics
    ///
    /// Panics if the built-in families fail to compile (should never happen
    /// with the static patterns).
    fn default() -> Self {
        Self::new().expect("built-in leakage families must compile")
    }
}

/// Scan model output using the shared default detector.
///
/// The detector is compiled once on first use and reused; it holds no
/// mutable state, so sharing it across threads needs no coordination.
pub fn detect_output_leakage(output: Option<&str>, context: &str) -> Vec<LeakageFinding> {
    static DEFAULT: OnceLock<LeakageDetector> = OnceLock::new();
    DEFAULT.get_or_init(LeakageDetector::default).detect(output, context)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
