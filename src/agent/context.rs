//! Stage Context
//!
//! Builds the textual context summaries threaded into downstream
//! prompts. Each summary is derived fresh from earlier stage results
//! and never persisted.

use crate::types::{EmotionReport, IntentReport, RiskReport, StageResult};

/// Context for the risk stage: the intent and emotion results
/// embedded verbatim as JSON. A degraded upstream stage is embedded
/// as its error form rather than dropped.
pub fn risk_context(
    intent: &StageResult<IntentReport>,
    emotion: &StageResult<EmotionReport>,
) -> String {
    let mut summary = String::new();

    if let Ok(json) = serde_json::to_string(intent) {
        summary.push_str(&format!("\nIntent Analysis: {json}"));
    }
    if let Ok(json) = serde_json::to_string(emotion) {
        summary.push_str(&format!("\nEmotion Analysis: {json}"));
    }

    summary
}

/// Context for the rewrite stage: a human-readable digest of all
/// three prior stages. Missing fields fall back to placeholders so
/// the summary always has the same shape.
pub fn rewrite_context(
    intent: &StageResult<IntentReport>,
    emotion: &StageResult<EmotionReport>,
    risk: &StageResult<RiskReport>,
) -> String {
    let mut summary = String::new();

    let primary_intent = intent
        .report()
        .and_then(|r| r.primary_intent.as_deref())
        .unwrap_or("unknown");
    summary.push_str(&format!("\nDetected Intent: {primary_intent}"));

    let primary_emotion = emotion
        .report()
        .and_then(|r| r.primary_emotion.as_deref())
        .unwrap_or("unknown");
    let intensity = emotion
        .report()
        .and_then(|r| r.intensity.as_deref())
        .unwrap_or("unknown");
    summary.push_str(&format!(
        "\nEmotional Tone: {primary_emotion} (intensity: {intensity})"
    ));

    if let Some(leakage) = emotion
        .report()
        .and_then(|r| r.emotional_leakage.as_ref())
        .filter(|l| l.detected)
    {
        summary.push_str(&format!(
            "\nEmotional Leakage: {}",
            leakage.explanation.as_deref().unwrap_or("")
        ));
    }

    let score = risk
        .report()
        .and_then(RiskReport::score)
        .map(|s| s.to_string())
        .unwrap_or_else(|| "?".to_string());
    summary.push_str(&format!("\nRisk Score: {score}/10"));

    if let Some(report) = risk.report() {
        if !report.red_flags.is_empty() {
            let phrases: Vec<&str> = report
                .red_flags
                .iter()
                .filter_map(|f| f.phrase.as_deref())
                .collect();
            summary.push_str(&format!("\nRed Flags: {}", phrases.join(", ")));
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RedFlag, StageResult};

    fn intent_result(primary: &str) -> StageResult<IntentReport> {
        StageResult::Report(IntentReport {
            primary_intent: Some(primary.to_string()),
            ..Default::default()
        })
    }

    fn emotion_result(primary: &str, intensity: &str) -> StageResult<EmotionReport> {
        StageResult::Report(EmotionReport {
            primary_emotion: Some(primary.to_string()),
            intensity: Some(intensity.to_string()),
            ..Default::default()
        })
    }

    #[test]
    fn test_risk_context_embeds_both_reports() {
        let context = risk_context(&intent_result("request"), &emotion_result("calm", "low"));
        assert!(context.contains("Intent Analysis:"));
        assert!(context.contains("\"primary_intent\":\"request\""));
        assert!(context.contains("Emotion Analysis:"));
        assert!(context.contains("\"primary_emotion\":\"calm\""));
    }

    #[test]
    fn test_risk_context_keeps_degraded_upstream() {
        let degraded: StageResult<IntentReport> = StageResult::Degraded {
            error: "Failed to parse response".to_string(),
            raw: "nope".to_string(),
        };
        let context = risk_context(&degraded, &emotion_result("calm", "low"));
        assert!(context.contains("\"error\":\"Failed to parse response\""));
    }

    #[test]
    fn test_rewrite_context_digest() {
        let risk = StageResult::Report(RiskReport {
            overall_risk_score: Some(8.0),
            red_flags: vec![RedFlag {
                phrase: Some("do it myself".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        });
        let context = rewrite_context(
            &intent_result("vent frustration"),
            &emotion_result("frustration", "high"),
            &risk,
        );
        assert!(context.contains("Detected Intent: vent frustration"));
        assert!(context.contains("Emotional Tone: frustration (intensity: high)"));
        assert!(context.contains("Risk Score: 8/10"));
        assert!(context.contains("Red Flags: do it myself"));
    }

    #[test]
    fn test_rewrite_context_placeholders_when_degraded() {
        let degraded_intent: StageResult<IntentReport> = StageResult::Degraded {
            error: "e".to_string(),
            raw: "r".to_string(),
        };
        let degraded_risk: StageResult<RiskReport> = StageResult::Degraded {
            error: "e".to_string(),
            raw: "r".to_string(),
        };
        let context = rewrite_context(
            &degraded_intent,
            &emotion_result("calm", "low"),
            &degraded_risk,
        );
        assert!(context.contains("Detected Intent: unknown"));
        assert!(context.contains("Risk Score: ?/10"));
    }
}
