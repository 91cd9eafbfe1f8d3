//! The compiled screener.

use anyhow::{Context, Result};
use globset::{Glob, GlobMatcher};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::flag::{ContentFlag, FlagSource, HarmCategory, Severity};
use crate::rules::{CooccurrenceRule, ScreenerRules};

/// Fixed prefix by which the model signals refusal in plain-text mode.
pub const REFUSAL_PREFIX: &str = "CONTENT_REFUSED:";

/// Text shorter than this is never screened: too short to carry a reliable
/// co-occurrence signal, and skipping it avoids false positives on trivial
/// content.
const MIN_TEXT_LEN: usize = 50;

// ---------------------------------------------------------------------------
// Compiled denylist
// ---------------------------------------------------------------------------

struct CompiledDeny {
    label: String,
    pattern: String,
    matcher: GlobMatcher,
    categories: Vec<HarmCategory>,
}

// ---------------------------------------------------------------------------
// ContentScreener
// ---------------------------------------------------------------------------

/// Screens URLs, scraped text, and model responses against an immutable
/// rule set.
///
/// Construct via [`ContentScreener::new`], which pre-compiles the hostname
/// globs.  The screener holds no mutable state; share it across threads via
/// `Arc` without coordination.
pub struct ContentScreener {
    rules: ScreenerRules,
    denylist: Vec<CompiledDeny>,
}

impl std::fmt::Debug for ContentScreener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentScreener")
            .field("denylist_entries", &self.denylist.len())
            .field("cooccurrence_rules", &self.rules.cooccurrence.len())
            .finish()
    }
}

impl ContentScreener {
    /// Compile a screener from a validated rule set.
    ///
    /// Returns an error if any denylist glob is invalid.
    pub fn new(rules: ScreenerRules) -> Result<Self> {
        let denylist = rules
            .url_denylist
            .iter()
            .map(|entry| {
                let matcher = Glob::new(&entry.pattern)
                    .with_context(|| {
                        format!(
                            "invalid hostname glob '{}' (denylist entry '{}')",
                            entry.pattern, entry.label
                        )
                    })?
                    .compile_matcher();
                Ok(CompiledDeny {
                    label: entry.label.clone(),
                    pattern: entry.pattern.clone(),
                    matcher,
                    categories: entry.categories.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { rules, denylist })
    }

    /// Return a reference to the underlying rule set.
    pub fn rules(&self) -> &ScreenerRules {
        &self.rules
    }

    // -- URL screening ------------------------------------------------------

    /// Pre-flight check run before a URL is ever fetched.
    ///
    /// The hostname is checked against the denylist of known illegal-content
    /// proxy and hosting patterns.  Unparseable or hostless URLs yield
    /// `None`: screening fails open on malformed input (a screener that
    /// crashes on bad input is worse than one reporting "no flag"), while
    /// genuine URLs are always checked.  Never panics.
    pub fn screen_url(&self, url: &str) -> Option<ContentFlag> {
        let parsed = match Url::parse(url) {
            Ok(parsed) => parsed,
            Err(err) => {
                debug!(%err, "unparseable URL; skipping screening");
                return None;
            }
        };
        let host = parsed.host_str()?.to_ascii_lowercase();

        for entry in &self.denylist {
            if entry.matcher.is_match(&host) {
                warn!(
                    label = %entry.label,
                    pattern = %entry.pattern,
                    "URL host matched the content denylist"
                );
                return Some(ContentFlag {
                    source: FlagSource::UrlScreening,
                    severity: Severity::Critical,
                    categories: entry.categories.clone(),
                    reason: format!("hostname matched denylist entry '{}'", entry.label),
                });
            }
        }

        None
    }

    // -- Text screening -----------------------------------------------------

    /// Screen scraped text for severe-harm indicators.
    ///
    /// A category flags only when a primary and a secondary indicator occur
    /// within the rule's window of each other; at most one flag is produced
    /// per category per call.  Input shorter than 50 characters yields `[]`
    /// regardless of content.
    pub fn screen_text(&self, text: &str) -> Vec<ContentFlag> {
        if text.chars().count() < MIN_TEXT_LEN {
            return Vec::new();
        }

        let lowered = text.to_lowercase();
        let mut flags: Vec<ContentFlag> = Vec::new();

        for rule in &self.rules.cooccurrence {
            // One flag per category, even when several rules or several
            // indicator pairs hit the same category.
            if flags
                .iter()
                .any(|flag| flag.categories.contains(&rule.category))
            {
                continue;
            }

            if cooccurs(&lowered, rule) {
                warn!(
                    rule = %rule.name,
                    category = %rule.category,
                    "keyword screening flagged scraped text"
                );
                flags.push(ContentFlag {
                    source: FlagSource::KeywordScreening,
                    severity: rule.severity,
                    categories: vec![rule.category],
                    reason: format!("co-occurring indicators matched rule '{}'", rule.name),
                });
            }
        }

        flags
    }

    // -- AI refusal detection -------------------------------------------------

    /// Inspect a model response for a refusal.
    ///
    /// Accepts either form the model may answer in: a structured object with
    /// an explicit `refused` marker field, or a plain string carrying the
    /// [`REFUSAL_PREFIX`].  Anything else -- normal analysis JSON, a plain
    /// non-refusal string, `null` -- yields `None`.
    pub fn detect_ai_refusal(&self, output: &Value) -> Option<ContentFlag> {
        match output {
            Value::Null => None,
            Value::Object(fields) => {
                let refused = fields.get("refused").map(is_truthy).unwrap_or(false);
                if !refused {
                    return None;
                }
                let reason = fields
                    .get("reason")
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                Some(self.refusal_flag(reason))
            }
            Value::String(text) => text
                .strip_prefix(REFUSAL_PREFIX)
                .map(|rest| self.refusal_flag(rest.trim())),
            _ => None,
        }
    }

    /// Build the flag for a detected refusal, categorising the reason text.
    fn refusal_flag(&self, reason: &str) -> ContentFlag {
        let lowered = reason.to_lowercase();
        let mut categories: Vec<HarmCategory> = Vec::new();

        for kw in &self.rules.refusal_keywords {
            if lowered.contains(&kw.keyword.to_lowercase()) && !categories.contains(&kw.category) {
                categories.push(kw.category);
            }
        }

        // An unspecific refusal still needs a review bucket; terrorism is
        // the catch-all used for ambiguous severe-harm refusals.  Fail
        // closed here, not open -- see DESIGN.md.
        if categories.is_empty() {
            categories.push(HarmCategory::Terrorism);
        }

        warn!(
            categories = ?categories,
            "model refused analysis; routing to review"
        );

        ContentFlag {
            source: FlagSource::AiRefusal,
            severity: Severity::High,
            categories,
            reason: if reason.is_empty() {
                "model refused without a stated reason".to_string()
            } else {
                reason.to_string()
            },
        }
    }
}

impl Default for ContentScreener {
    /// Constructs a screener over the built-in rule set.
    ///
    /// # Panics
    ///
    /// Panics if the built-in denylist globs fail to compile (should never
    /// happen with the static rules).
    fn default() -> Self {
        Self::new(ScreenerRules::default()).expect("built-in screener rules must compile")
    }
}

// ---------------------------------------------------------------------------
// Co-occurrence matching
// ---------------------------------------------------------------------------

/// True when any primary and any secondary indicator sit within the rule's
/// window of each other.  Offsets are byte positions in the lowercased text;
/// the indicator sets are ASCII, so byte distance tracks the character
/// window closely enough.
fn cooccurs(lowered: &str, rule: &CooccurrenceRule) -> bool {
    let primary = offsets_of_any(lowered, &rule.primary);
    if primary.is_empty() {
        return false;
    }
    let secondary = offsets_of_any(lowered, &rule.secondary);
    if secondary.is_empty() {
        return false;
    }

    primary
        .iter()
        .any(|&p| secondary.iter().any(|&s| p.abs_diff(s) <= rule.window))
}

/// Byte offsets of every occurrence of every needle.
fn offsets_of_any(haystack: &str, needles: &[String]) -> Vec<usize> {
    let mut offsets = Vec::new();
    for needle in needles {
        let needle = needle.to_lowercase();
        if needle.is_empty() {
            continue;
        }
        let mut from = 0;
        while let Some(pos) = haystack[from..].find(&needle) {
            offsets.push(from + pos);
            from += pos + needle.len();
        }
    }
    offsets
}

/// JavaScript-style truthiness for the refusal marker field, since the model
/// is not guaranteed to emit a clean boolean.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
