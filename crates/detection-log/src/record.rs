use serde::{Deserialize, Serialize};

/// A single detection reported by a safety component.
///
/// The `pattern` and `category` fields are the rule name and category label
/// of the detection -- closed-set identifiers, never the matched input text.
/// Flagged content itself stays out of the log by design; the moderation
/// queue references it by content hash instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionRecord {
    pub id: uuid::Uuid,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub pattern: String,
    pub category: String,
    pub component: String,
}

impl DetectionRecord {
    /// Create a record with an auto-generated UUID v4 and the current UTC
    /// timestamp. `component` names the emitting component, e.g.
    /// `"input-sanitizer"`.
    pub fn new(
        pattern: impl Into<String>,
        category: impl Into<String>,
        component: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            timestamp: chrono::Utc::now(),
            pattern: pattern.into(),
            category: category.into(),
            component: component.into(),
        }
    }
}
