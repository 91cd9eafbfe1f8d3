//! Injection pattern library.
//!
//! Contains the static catalogue of regex patterns used to detect prompt
//! injection in untrusted content.  Each entry carries a snake_case name, a
//! [`PatternCategory`] that selects how the sanitizer neutralizes the match,
//! and a regex string compiled at scanner-construction time.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// Broad classification of the injection technique a pattern targets.
///
/// The category doubles as the neutralization strategy selector: matches in
/// the first three categories are replaced with a `[BLOCKED: ...]` marker,
/// while [`DelimiterEscape`](Self::DelimiterEscape) matches are
/// entity-escaped so they can no longer terminate the prompt wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PatternCategory {
    /// Attempts to override or cancel the original system instructions.
    InstructionOverride,
    /// Attempts to redefine the model's persona or role.
    RoleHijack,
    /// Attempts to exfiltrate the system prompt or other hidden context.
    PromptLeak,
    /// Literal wrapper delimiters that could prematurely close the
    /// `<user_content>` envelope.
    DelimiterEscape,
}

impl PatternCategory {
    /// The kebab-case label used in markers, logs, and serialized findings.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InstructionOverride => "instruction-override",
            Self::RoleHijack => "role-hijack",
            Self::PromptLeak => "prompt-leak",
            Self::DelimiterEscape => "delimiter-escape",
        }
    }
}

impl fmt::Display for PatternCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Pattern definition
// ---------------------------------------------------------------------------

/// A single detection pattern.
pub struct InjectionPattern {
    /// Short, snake_case identifier used in logs and detections.
    pub name: &'static str,
    /// The family of injection technique this pattern belongs to.
    pub category: PatternCategory,
    /// A regex string (compiled lazily by [`crate::scanner::Scanner`]).
    pub pattern: &'static str,
}

// ---------------------------------------------------------------------------
// Pattern catalogue
// ---------------------------------------------------------------------------

/// The built-in pattern library.
///
/// Patterns are intentionally kept as a static slice so that they are
/// available at zero runtime cost until the scanner compiles them.  Tests
/// that need alternate rule sets construct the scanner from their own slice
/// instead of mutating this one.
pub static PATTERNS: &[InjectionPattern] = &[
    // ---- Instruction override ------------------------------------------
    InjectionPattern {
        name: "ignore_previous",
        category: PatternCategory::InstructionOverride,
        pattern: r"(?i)\b(?:ignore|disregard|forget)\s+(?:all\s+|any\s+)?(?:prior|previous|earlier|above)\s+(?:instructions?|context|prompts?|rules?)",
    },
    InjectionPattern {
        name: "override_system",
        category: PatternCategory::InstructionOverride,
        pattern: r"(?i)\boverride\s+(?:the\s+)?(?:system\s+)?instructions?",
    },
    InjectionPattern {
        name: "new_instructions",
        category: PatternCategory::InstructionOverride,
        pattern: r"(?i)\bnew\s+instructions?\s*:",
    },
    // ---- Role hijacking ------------------------------------------------
    InjectionPattern {
        name: "system_role_prefix",
        category: PatternCategory::RoleHijack,
        pattern: r"(?im)^\s*system\s*:",
    },
    InjectionPattern {
        name: "you_are_now_ai",
        category: PatternCategory::RoleHijack,
        pattern: r"(?i)\byou\s+are\s+now\s+(?:a|an)\s+(?:\w+\s+){0,3}?(?:ai|assistant|model)\b",
    },
    InjectionPattern {
        name: "jailbroken",
        category: PatternCategory::RoleHijack,
        pattern: r"(?i)\bjailbroken\b",
    },
    InjectionPattern {
        name: "developer_mode",
        category: PatternCategory::RoleHijack,
        pattern: r"(?i)\b(?:enter|enable|activate)\s+developer\s+mode\b",
    },
    // ---- Prompt-leak solicitation ---------------------------------------
    InjectionPattern {
        name: "repeat_system_prompt",
        category: PatternCategory::PromptLeak,
        pattern: r"(?i)\b(?:repeat|reveal|show|print|output)\s+(?:me\s+)?(?:your|the)\s+system\s+prompt",
    },
    InjectionPattern {
        name: "what_instructions",
        category: PatternCategory::PromptLeak,
        pattern: r"(?i)\bwhat\s+(?:are|were)\s+your\s+(?:initial\s+|original\s+)?instructions",
    },
    // ---- Wrapper delimiter escape ---------------------------------------
    InjectionPattern {
        name: "user_content_tag",
        category: PatternCategory::DelimiterEscape,
        pattern: r"(?i)</?\s*user_content\s*>",
    },
    InjectionPattern {
        name: "system_tag",
        category: PatternCategory::DelimiterEscape,
        pattern: r"(?i)</?\s*system\s*>",
    },
];
