//! Issue and suggestion vocabulary
//!
//! Responsibilities:
//! - Define the shared defect taxonomy every detector reports into
//! - Define actionable remediation suggestions tied to detected issues
//!
//! Issues are created by detectors at analysis time and never mutated
//! afterwards; results own them as plain lists.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// Impact level of a detected issue, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

/// One detected defect.
///
/// `metric_value` and `threshold_value` are always both present so a
/// consumer can recompute the verdict from the record alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityIssue {
    /// Machine-readable tag, e.g. `low_sharpness` or `metallic_voice`.
    pub issue_type: String,
    pub severity: Severity,
    /// Human-readable explanation.
    pub description: String,
    /// Seconds from sequence start; 0 when the issue is not time-localized.
    pub timestamp: f64,
    /// Frame the issue was localized to; `None` for audio-only or
    /// whole-sequence issues.
    pub frame_number: Option<u32>,
    /// The measured value that triggered the issue.
    pub metric_value: f64,
    /// The bound the measured value violated.
    pub threshold_value: f64,
}

impl QualityIssue {
    /// Create a whole-sequence issue (timestamp 0, no frame number).
    pub fn new(
        issue_type: impl Into<String>,
        severity: Severity,
        description: impl Into<String>,
        metric_value: f64,
        threshold_value: f64,
    ) -> Self {
        Self {
            issue_type: issue_type.into(),
            severity,
            description: description.into(),
            timestamp: 0.0,
            frame_number: None,
            metric_value,
            threshold_value,
        }
    }

    /// Localize the issue to a frame and its timestamp.
    pub fn at_frame(mut self, frame_number: u32, timestamp: f64) -> Self {
        self.frame_number = Some(frame_number);
        self.timestamp = timestamp;
        self
    }

    /// Localize the issue to a point in time without a frame number.
    pub fn at_time(mut self, timestamp: f64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Stable identifier suggestions use to reference this issue.
    pub fn key(&self) -> String {
        format!("{}@{:.3}", self.issue_type, self.timestamp)
    }

    /// Pure key/value serialization of the issue.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl Display for QualityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {} (measured {:.3}, threshold {:.3})",
            self.severity, self.issue_type, self.description, self.metric_value, self.threshold_value
        )
    }
}

/// One actionable remediation for one or more detected issues.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImprovementSuggestion {
    pub suggestion_id: String,
    /// 1 is highest priority, 5 lowest.
    pub priority: u8,
    /// Free-text description of the corrective action.
    pub action: String,
    /// Concrete knob -> value settings to try.
    pub parameters: BTreeMap<String, serde_json::Value>,
    /// Estimated score delta if the action is applied.
    pub expected_improvement: f64,
    /// Keys of the issues this suggestion addresses (best effort).
    pub related_issue_ids: Vec<String>,
}

impl ImprovementSuggestion {
    pub fn new(
        suggestion_id: impl Into<String>,
        priority: u8,
        action: impl Into<String>,
        expected_improvement: f64,
    ) -> Self {
        Self {
            suggestion_id: suggestion_id.into(),
            priority: priority.clamp(1, 5),
            action: action.into(),
            parameters: BTreeMap::new(),
            expected_improvement,
            related_issue_ids: Vec::new(),
        }
    }

    /// Attach a concrete parameter to try.
    pub fn with_parameter(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.parameters.insert(key.into(), value);
        self
    }

    /// Record the issues this suggestion addresses.
    pub fn for_issues(mut self, issues: &[&QualityIssue]) -> Self {
        self.related_issue_ids = issues.iter().map(|i| i.key()).collect();
        self
    }

    /// Pure key/value serialization of the suggestion.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_orders_by_impact() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
        assert!(Severity::High < Severity::Critical);
    }

    #[test]
    fn issue_key_is_stable() {
        let issue = QualityIssue::new("low_sharpness", Severity::Medium, "soft frame", 12.0, 50.0)
            .at_frame(4, 4.0 / 30.0);
        assert_eq!(issue.key(), "low_sharpness@0.133");
        assert_eq!(issue.frame_number, Some(4));
    }

    #[test]
    fn suggestion_clamps_priority() {
        let suggestion = ImprovementSuggestion::new("rerender-shot", 9, "Re-render", 10.0);
        assert_eq!(suggestion.priority, 5);
    }

    #[test]
    fn issue_serializes_to_snake_case_severity() {
        let issue = QualityIssue::new("sudden_change", Severity::High, "pop", 60.0, 50.0);
        let value = issue.to_json();
        assert_eq!(value["severity"], "high");
        assert_eq!(value["frame_number"], serde_json::Value::Null);
    }
}
