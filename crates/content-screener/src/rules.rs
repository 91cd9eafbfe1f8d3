//! The screener's read-only rule set.
//!
//! Rules are plain data: a hostname denylist, co-occurrence rules for text
//! screening, and the keyword map used to categorise refusal reasons.  The
//! built-in default covers the known severe-harm surface; deployments can
//! load an alternate set from YAML, and tests construct their own without
//! touching any shared state.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::flag::{HarmCategory, Severity};

/// Default co-occurrence window, in bytes of the lowercased text.
const DEFAULT_WINDOW: usize = 200;

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// Top-level rule set, loadable from a YAML document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenerRules {
    /// Schema version; currently must be "1.0".
    pub version: String,
    /// Hostname denylist checked by `screen_url`.
    #[serde(default)]
    pub url_denylist: Vec<DenyEntry>,
    /// Co-occurrence rules checked by `screen_text`.
    #[serde(default)]
    pub cooccurrence: Vec<CooccurrenceRule>,
    /// Keyword map used to categorise AI-refusal reasons.
    #[serde(default)]
    pub refusal_keywords: Vec<RefusalKeyword>,
}

/// One denylist entry: a hostname glob and the categories a match implies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenyEntry {
    /// Unique, snake_case identifier used in logs and flag reasons.
    pub label: String,
    /// Hostname glob, e.g. `"*.onion.*"`.
    pub pattern: String,
    /// Categories attached to the produced flag; must be non-empty.
    pub categories: Vec<HarmCategory>,
}

/// A co-occurrence rule: the category flags only when a primary and a
/// secondary indicator occur within `window` bytes of each other.  Isolated
/// single keywords never flag; dictionary words alone produce unacceptable
/// false-positive rates on legitimate journalism and education content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CooccurrenceRule {
    /// Unique, snake_case rule name.
    pub name: String,
    pub category: HarmCategory,
    pub severity: Severity,
    /// First indicator set (e.g. age indicators).
    pub primary: Vec<String>,
    /// Second indicator set (e.g. exploitation indicators).
    pub secondary: Vec<String>,
    /// Maximum distance between a primary and a secondary hit.
    #[serde(default = "default_window")]
    pub window: usize,
}

/// Maps a substring of a refusal reason to a harm category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefusalKeyword {
    pub keyword: String,
    pub category: HarmCategory,
}

fn default_window() -> usize {
    DEFAULT_WINDOW
}

// ---------------------------------------------------------------------------
// Built-in default
// ---------------------------------------------------------------------------

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

impl Default for ScreenerRules {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            url_denylist: vec![
                DenyEntry {
                    label: "onion_hidden_service".to_string(),
                    pattern: "*.onion".to_string(),
                    categories: vec![HarmCategory::Csam, HarmCategory::Trafficking],
                },
                DenyEntry {
                    label: "onion_gateway".to_string(),
                    pattern: "*.onion.*".to_string(),
                    categories: vec![HarmCategory::Csam, HarmCategory::Trafficking],
                },
                DenyEntry {
                    label: "tor2web_gateway".to_string(),
                    pattern: "*tor2web*".to_string(),
                    categories: vec![HarmCategory::Csam, HarmCategory::Trafficking],
                },
                DenyEntry {
                    label: "hidden_wiki_mirror".to_string(),
                    pattern: "*hiddenwiki*".to_string(),
                    categories: vec![HarmCategory::Csam],
                },
                DenyEntry {
                    label: "darknet_market_mirror".to_string(),
                    pattern: "*darknetmarket*".to_string(),
                    categories: vec![HarmCategory::Trafficking, HarmCategory::Weapons],
                },
                DenyEntry {
                    label: "dark_market_mirror".to_string(),
                    pattern: "*darkmarket*".to_string(),
                    categories: vec![HarmCategory::Trafficking, HarmCategory::Weapons],
                },
            ],
            cooccurrence: vec![
                CooccurrenceRule {
                    name: "minor_exploitation".to_string(),
                    category: HarmCategory::Csam,
                    severity: Severity::Critical,
                    primary: strings(&["child", "minor", "underage", "preteen", "juvenile"]),
                    secondary: strings(&[
                        "exploitation",
                        "explicit material",
                        "abuse material",
                        "abuse imagery",
                        "molest",
                    ]),
                    window: DEFAULT_WINDOW,
                },
                CooccurrenceRule {
                    name: "attack_planning".to_string(),
                    category: HarmCategory::Terrorism,
                    severity: Severity::Critical,
                    primary: strings(&["bomb", "detonate", "attack plan", "mass casualty"]),
                    secondary: strings(&[
                        "martyrdom",
                        "extremist",
                        "terror cell",
                        "radicalize",
                        "infidel",
                    ]),
                    window: DEFAULT_WINDOW,
                },
                CooccurrenceRule {
                    name: "weapons_acquisition".to_string(),
                    category: HarmCategory::Weapons,
                    severity: Severity::High,
                    primary: strings(&["buy", "sell", "purchase", "acquire", "untraceable"]),
                    secondary: strings(&[
                        "ghost gun",
                        "unregistered firearm",
                        "grenade",
                        "silencer",
                        "full-auto conversion",
                    ]),
                    window: DEFAULT_WINDOW,
                },
                CooccurrenceRule {
                    name: "human_trafficking".to_string(),
                    category: HarmCategory::Trafficking,
                    severity: Severity::High,
                    primary: strings(&["traffick", "smuggle", "smuggling"]),
                    secondary: strings(&["women", "girls", "migrants", "persons", "laborers"]),
                    window: DEFAULT_WINDOW,
                },
            ],
            refusal_keywords: vec![
                RefusalKeyword {
                    keyword: "csam".to_string(),
                    category: HarmCategory::Csam,
                },
                RefusalKeyword {
                    keyword: "child".to_string(),
                    category: HarmCategory::Csam,
                },
                RefusalKeyword {
                    keyword: "minor".to_string(),
                    category: HarmCategory::Csam,
                },
                RefusalKeyword {
                    keyword: "terror".to_string(),
                    category: HarmCategory::Terrorism,
                },
                RefusalKeyword {
                    keyword: "extremis".to_string(),
                    category: HarmCategory::Terrorism,
                },
                RefusalKeyword {
                    keyword: "weapon".to_string(),
                    category: HarmCategory::Weapons,
                },
                RefusalKeyword {
                    keyword: "firearm".to_string(),
                    category: HarmCategory::Weapons,
                },
                RefusalKeyword {
                    keyword: "explosive".to_string(),
                    category: HarmCategory::Weapons,
                },
                RefusalKeyword {
                    keyword: "traffick".to_string(),
                    category: HarmCategory::Trafficking,
                },
            ],
        }
    }
}

// ---------------------------------------------------------------------------
// Loader
// ---------------------------------------------------------------------------

/// Load a [`ScreenerRules`] from a YAML file on disk.
///
/// Validates the rule set after deserialization (version check, unique
/// names, non-empty indicator lists).
pub fn load_rules(path: impl AsRef<Path>) -> Result<ScreenerRules> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read rules file: {}", path.display()))?;
    load_rules_from_str(&contents)
        .with_context(|| format!("failed to parse rules file: {}", path.display()))
}

/// Parse and validate a [`ScreenerRules`] from a YAML string.
pub fn load_rules_from_str(yaml: &str) -> Result<ScreenerRules> {
    let rules: ScreenerRules = serde_yml::from_str(yaml).context("YAML deserialization failed")?;
    validate(&rules)?;
    Ok(rules)
}

/// Run post-deserialization validation checks.
fn validate(rules: &ScreenerRules) -> Result<()> {
    // Version gate
    if rules.version != "1.0" {
        bail!(
            "unsupported rules version '{}'; only '1.0' is supported",
            rules.version
        );
    }

    // Denylist entries
    let mut labels = HashSet::new();
    for entry in &rules.url_denylist {
        if entry.label.is_empty() {
            bail!("denylist label must not be empty");
        }
        if !labels.insert(&entry.label) {
            bail!("duplicate denylist label: '{}'", entry.label);
        }
        if entry.pattern.is_empty() {
            bail!("denylist pattern must not be empty (label '{}')", entry.label);
        }
        if entry.categories.is_empty() {
            bail!("denylist entry '{}' has no categories", entry.label);
        }
    }

    // Co-occurrence rules
    let mut names = HashSet::new();
    for rule in &rules.cooccurrence {
        if rule.name.is_empty() {
            bail!("co-occurrence rule name must not be empty");
        }
        if !names.insert(&rule.name) {
            bail!("duplicate co-occurrence rule name: '{}'", rule.name);
        }
        if rule.primary.is_empty() || rule.secondary.is_empty() {
            bail!("co-occurrence rule '{}' has an empty indicator set", rule.name);
        }
        if rule.window == 0 {
            bail!("co-occurrence rule '{}' has a zero window", rule.name);
        }
    }

    // Refusal keywords
    for kw in &rules.refusal_keywords {
        if kw.keyword.is_empty() {
            bail!("refusal keyword must not be empty");
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_rules_validate() {
        validate(&ScreenerRules::default()).unwrap();
    }

    #[test]
    fn load_minimal_rules() {
        let yaml = r#"
version: "1.0"
"#;
        let rules = load_rules_from_str(yaml).unwrap();
        assert_eq!(rules.version, "1.0");
        assert!(rules.url_denylist.is_empty());
        assert!(rules.cooccurrence.is_empty());
    }

    #[test]
    fn load_full_rules() {
        let yaml = r#"
version: "1.0"
url_denylist:
  - label: "test_mirror"
    pattern: "*.bad.example"
    categories:
      - csam
cooccurrence:
  - name: "test_rule"
    category: weapons
    severity: high
    primary:
      - "buy"
    secondary:
      - "grenade"
    window: 120
refusal_keywords:
  - keyword: "terror"
    category: terrorism
"#;
        let rules = load_rules_from_str(yaml).unwrap();
        assert_eq!(rules.url_denylist.len(), 1);
        assert_eq!(rules.url_denylist[0].categories, vec![HarmCategory::Csam]);
        assert_eq!(rules.cooccurrence[0].window, 120);
        assert_eq!(rules.cooccurrence[0].severity, Severity::High);
        assert_eq!(
            rules.refusal_keywords[0].category,
            HarmCategory::Terrorism
        );
    }

    #[test]
    fn window_defaults_to_200() {
        let yaml = r#"
version: "1.0"
cooccurrence:
  - name: "no_window"
    category: csam
    severity: critical
    primary: ["a"]
    secondary: ["b"]
"#;
        let rules = load_rules_from_str(yaml).unwrap();
        assert_eq!(rules.cooccurrence[0].window, 200);
    }

    #[test]
    fn reject_wrong_version() {
        let err = load_rules_from_str("version: \"2.0\"\n").unwrap_err();
        assert!(
            err.to_string().contains("unsupported rules version"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn reject_empty_indicator_set() {
        let yaml = r#"
version: "1.0"
cooccurrence:
  - name: "broken"
    category: csam
    severity: critical
    primary: []
    secondary: ["b"]
"#;
        let err = load_rules_from_str(yaml).unwrap_err();
        assert!(
            err.to_string().contains("empty indicator set"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn reject_duplicate_rule_names() {
        let yaml = r#"
version: "1.0"
cooccurrence:
  - name: "dup"
    category: csam
    severity: critical
    primary: ["a"]
    secondary: ["b"]
  - name: "dup"
    category: weapons
    severity: high
    primary: ["c"]
    secondary: ["d"]
"#;
        let err = load_rules_from_str(yaml).unwrap_err();
        assert!(
            err.to_string().contains("duplicate co-occurrence rule name"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn reject_entry_without_categories() {
        let yaml = r#"
version: "1.0"
url_denylist:
  - label: "no_cats"
    pattern: "*.x"
    categories: []
"#;
        let err = load_rules_from_str(yaml).unwrap_err();
        assert!(
            err.to_string().contains("has no categories"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn load_from_nonexistent_file() {
        let err = load_rules("/does/not/exist.yaml").unwrap_err();
        assert!(
            err.to_string().contains("failed to read rules file"),
            "unexpected error: {err}"
        );
    }
}
