//! Shared Types
//!
//! Stage reports, the degraded-result fallback, the accumulated
//! analysis, and the severity band table used by both renderers.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ─── Stages ──────────────────────────────────────────────────────

/// The four analysis stages, in pipeline order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Intent,
    Emotion,
    Risk,
    Rewrite,
}

impl Stage {
    /// Stage name as it appears as a result key.
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Intent => "intent",
            Stage::Emotion => "emotion",
            Stage::Risk => "risk",
            Stage::Rewrite => "rewrite",
        }
    }

    /// Template file name under the prompts directory.
    pub fn template_file(&self) -> &'static str {
        match self {
            Stage::Intent => "intent.txt",
            Stage::Emotion => "emotion.txt",
            Stage::Risk => "risk.txt",
            Stage::Rewrite => "rewrite.txt",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ─── Stage results ───────────────────────────────────────────────

/// Outcome of one stage: a parsed report, or the raw response text
/// when the model's output could not be read as structured data.
///
/// Serializes untagged so a degraded stage appears as
/// `{"error": ..., "raw": ...}`. `Degraded` must stay the first
/// variant: every report type accepts an empty object, so the
/// error shape has to be tried first on deserialization.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StageResult<R> {
    Degraded { error: String, raw: String },
    Report(R),
}

impl<R> StageResult<R> {
    /// The parsed report, if this stage was not degraded.
    pub fn report(&self) -> Option<&R> {
        match self {
            StageResult::Report(r) => Some(r),
            StageResult::Degraded { .. } => None,
        }
    }

    /// The parse-failure description, if this stage was degraded.
    pub fn error(&self) -> Option<&str> {
        match self {
            StageResult::Degraded { error, .. } => Some(error),
            StageResult::Report(_) => None,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, StageResult::Degraded { .. })
    }
}

// ─── Per-stage reports ───────────────────────────────────────────

/// What the sender is trying to achieve.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IntentReport {
    pub primary_intent: Option<String>,
    pub secondary_intents: Vec<String>,
    pub confidence: Option<String>,
    pub explanation: Option<String>,
    pub hidden_agenda: Option<String>,
}

/// Emotional tone of the message, including emotion the sender is
/// leaking without meaning to.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EmotionReport {
    pub primary_emotion: Option<String>,
    pub intensity: Option<String>,
    pub secondary_emotions: Vec<String>,
    pub emotional_leakage: Option<EmotionalLeakage>,
    pub tone_descriptors: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EmotionalLeakage {
    pub detected: bool,
    pub leaked_emotions: Vec<String>,
    pub indicators: Vec<String>,
    pub explanation: Option<String>,
}

/// Misinterpretation risks and red flags, scored 1-10 overall.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskReport {
    /// Lenient: accepts a JSON number or a numeric string. Anything
    /// else deserializes as absent rather than failing the report.
    #[serde(deserialize_with = "de_score")]
    pub overall_risk_score: Option<f64>,
    pub risk_level: Option<String>,
    pub misinterpretation_risks: Vec<MisinterpretationRisk>,
    pub red_flags: Vec<RedFlag>,
    pub missing_context: Vec<String>,
    pub ambiguities: Vec<String>,
}

impl RiskReport {
    pub fn score(&self) -> Option<f64> {
        self.overall_risk_score
    }

    pub fn severity(&self) -> Option<Severity> {
        self.score().map(Severity::from_score)
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MisinterpretationRisk {
    pub risk: Option<String>,
    pub probability: Option<String>,
    pub impact: Option<String>,
    pub problematic_phrase: Option<String>,
    pub explanation: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RedFlag {
    pub phrase: Option<String>,
    pub category: Option<String>,
    pub severity: Option<String>,
    pub why_problematic: Option<String>,
}

/// Suggested replacements for a risky message.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RewriteReport {
    pub needs_rewrite: bool,
    pub rewrites: Vec<RewriteVersion>,
    pub specific_fixes: Vec<SpecificFix>,
    pub general_advice: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RewriteVersion {
    pub version: Option<String>,
    pub rewritten_message: Option<String>,
    pub changes_made: Vec<String>,
    pub tone_shift: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecificFix {
    pub original_phrase: Option<String>,
    pub suggested_phrase: Option<String>,
    pub reason: Option<String>,
}

// ─── Accumulated analysis ────────────────────────────────────────

/// Full result of one pipeline run over one message. `rewrite` is
/// absent when the gate did not open.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Analysis {
    pub message: String,
    pub intent: StageResult<IntentReport>,
    pub emotion: StageResult<EmotionReport>,
    pub risk: StageResult<RiskReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rewrite: Option<StageResult<RewriteReport>>,
}

impl Analysis {
    /// The overall risk score, when the risk stage parsed and carried
    /// a numeric score.
    pub fn risk_score(&self) -> Option<f64> {
        self.risk.report().and_then(RiskReport::score)
    }

    pub fn risk_severity(&self) -> Option<Severity> {
        self.risk_score().map(Severity::from_score)
    }
}

// ─── Severity bands ──────────────────────────────────────────────

/// Severity band shared by the terminal renderer and the dashboard.
/// Scores 1-3 are low, 4-6 medium, 7-10 high.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn from_score(score: f64) -> Self {
        if score <= 3.0 {
            Severity::Low
        } else if score <= 6.0 {
            Severity::Medium
        } else {
            Severity::High
        }
    }

    /// Band for a textual severity label (`low`/`medium`/`high`).
    /// Unrecognized labels get no band and render unstyled.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "low" => Some(Severity::Low),
            "medium" => Some(Severity::Medium),
            "high" => Some(Severity::High),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

// ─── Helpers ─────────────────────────────────────────────────────

/// Coerce a JSON value to a risk score. Numbers pass through,
/// numeric strings parse, everything else is absent.
pub fn coerce_score(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn de_score<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(coerce_score))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_severity_bands() {
        assert_eq!(Severity::from_score(1.0), Severity::Low);
        assert_eq!(Severity::from_score(3.0), Severity::Low);
        assert_eq!(Severity::from_score(4.0), Severity::Medium);
        assert_eq!(Severity::from_score(6.0), Severity::Medium);
        assert_eq!(Severity::from_score(7.0), Severity::High);
        assert_eq!(Severity::from_score(10.0), Severity::High);
    }

    #[test]
    fn test_severity_from_label() {
        assert_eq!(Severity::from_label("HIGH"), Some(Severity::High));
        assert_eq!(Severity::from_label(" medium "), Some(Severity::Medium));
        assert_eq!(Severity::from_label("critical"), None);
        assert_eq!(Severity::from_label(""), None);
    }

    #[test]
    fn test_coerce_score() {
        assert_eq!(coerce_score(&json!(8)), Some(8.0));
        assert_eq!(coerce_score(&json!(4.5)), Some(4.5));
        assert_eq!(coerce_score(&json!("7")), Some(7.0));
        assert_eq!(coerce_score(&json!("high")), None);
        assert_eq!(coerce_score(&json!(null)), None);
        assert_eq!(coerce_score(&json!([3])), None);
    }

    #[test]
    fn test_risk_report_lenient_score() {
        let report: RiskReport =
            serde_json::from_value(json!({ "overall_risk_score": "8", "risk_level": "high" }))
                .unwrap();
        assert_eq!(report.score(), Some(8.0));

        let report: RiskReport =
            serde_json::from_value(json!({ "overall_risk_score": "severe" })).unwrap();
        assert_eq!(report.score(), None);

        let report: RiskReport = serde_json::from_value(json!({})).unwrap();
        assert_eq!(report.score(), None);
    }

    #[test]
    fn test_degraded_serializes_as_error_dict() {
        let result: StageResult<IntentReport> = StageResult::Degraded {
            error: "Failed to parse response".to_string(),
            raw: "not json".to_string(),
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(
            value,
            json!({ "error": "Failed to parse response", "raw": "not json" })
        );
    }

    #[test]
    fn test_rewrite_key_absent_when_gated() {
        let analysis = Analysis {
            message: "hello".to_string(),
            intent: StageResult::Report(IntentReport::default()),
            emotion: StageResult::Report(EmotionReport::default()),
            risk: StageResult::Report(RiskReport::default()),
            rewrite: None,
        };
        let value = serde_json::to_value(&analysis).unwrap();
        assert!(value.get("rewrite").is_none());
        assert!(value.get("risk").is_some());
    }
}
