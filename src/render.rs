//! Terminal Renderer
//!
//! Formats an analysis into colored sections. Pure presentation:
//! reads the result, maps scores and labels through the shared
//! severity table, makes no decisions of its own.

use colored::{Color, ColoredString, Colorize};

use crate::types::{
    Analysis, EmotionReport, IntentReport, RewriteReport, RiskReport, Severity, StageResult,
};

/// Message preview length in the header, in characters.
const PREVIEW_CHARS: usize = 100;

const MAX_RISKS: usize = 5;
const MAX_FLAGS: usize = 5;
const MAX_INDICATORS: usize = 3;
const MAX_AMBIGUITIES: usize = 3;
const MAX_FIXES: usize = 3;
const MAX_REWRITES: usize = 2;

fn severity_color(severity: Option<Severity>) -> Color {
    match severity {
        Some(Severity::Low) => Color::Green,
        Some(Severity::Medium) => Color::Yellow,
        Some(Severity::High) => Color::Red,
        None => Color::White,
    }
}

fn label_colored(label: Option<&str>) -> ColoredString {
    let text = label.unwrap_or("?").to_uppercase();
    let band = label.and_then(Severity::from_label);
    text.color(severity_color(band))
}

fn stage_error(error: &str) {
    println!("  {} {}", "error:".red().bold(), error);
}

/// Render a full analysis to the terminal.
pub fn display_results(analysis: &Analysis) {
    display_header(analysis);
    render_intent(&analysis.intent);
    render_emotion(&analysis.emotion);
    render_risk(&analysis.risk);
    if let Some(ref rewrite) = analysis.rewrite {
        render_rewrite(rewrite);
    }
}

fn display_header(analysis: &Analysis) {
    let preview: String = analysis.message.chars().take(PREVIEW_CHARS).collect();
    let ellipsis = if analysis.message.chars().count() > PREVIEW_CHARS {
        "..."
    } else {
        ""
    };

    println!();
    println!("{}", "Message Analyzed".bold());
    println!("  {}{}", preview.dimmed(), ellipsis.dimmed());
    println!();

    let score_text = match analysis.risk_score() {
        Some(score) => format!("{score}/10"),
        None => "?/10".to_string(),
    };
    let level = analysis
        .risk
        .report()
        .and_then(|r| r.risk_level.as_deref())
        .unwrap_or("unknown")
        .to_uppercase();
    let color = severity_color(analysis.risk_severity());

    println!(
        "{} {} ({})",
        "Risk Score:".bold().blue(),
        score_text.color(color).bold(),
        level
    );
}

fn render_intent(result: &StageResult<IntentReport>) {
    println!();
    println!("{}", "Intent Detection".bold().cyan());

    if let Some(error) = result.error() {
        stage_error(error);
        return;
    }
    let Some(intent) = result.report() else { return };

    println!(
        "  Primary: {}",
        intent.primary_intent.as_deref().unwrap_or("Unknown").bold()
    );
    if !intent.secondary_intents.is_empty() {
        println!("  Secondary: {}", intent.secondary_intents.join(", "));
    }
    println!(
        "  Confidence: {}",
        intent.confidence.as_deref().unwrap_or("Unknown")
    );
    if let Some(ref explanation) = intent.explanation {
        println!("  {}", explanation.dimmed());
    }
    if let Some(ref agenda) = intent.hidden_agenda {
        println!("  {} {}", "Hidden agenda:".yellow(), agenda);
    }
}

fn render_emotion(result: &StageResult<EmotionReport>) {
    println!();
    println!("{}", "Emotional Analysis".bold().cyan());

    if let Some(error) = result.error() {
        stage_error(error);
        return;
    }
    let Some(emotion) = result.report() else { return };

    println!(
        "  Primary: {} (intensity: {})",
        emotion
            .primary_emotion
            .as_deref()
            .unwrap_or("Unknown")
            .bold(),
        emotion.intensity.as_deref().unwrap_or("Unknown")
    );
    if !emotion.secondary_emotions.is_empty() {
        println!("  Secondary: {}", emotion.secondary_emotions.join(", "));
    }
    if !emotion.tone_descriptors.is_empty() {
        println!("  Tone: {}", emotion.tone_descriptors.join(", "));
    }

    if let Some(leakage) = emotion.emotional_leakage.as_ref().filter(|l| l.detected) {
        println!();
        println!("  {}", "Emotional Leakage Detected".yellow());
        if !leakage.leaked_emotions.is_empty() {
            println!("    Leaked emotions: {}", leakage.leaked_emotions.join(", "));
        }
        for indicator in leakage.indicators.iter().take(MAX_INDICATORS) {
            println!("    {}", format!("- \"{indicator}\"").dimmed());
        }
        if let Some(ref explanation) = leakage.explanation {
            println!("    {explanation}");
        }
    }
}

fn render_risk(result: &StageResult<RiskReport>) {
    if let Some(error) = result.error() {
        println!();
        println!("{}", "Risk Assessment".bold().cyan());
        stage_error(error);
        return;
    }
    let Some(risk) = result.report() else { return };

    if !risk.misinterpretation_risks.is_empty() {
        println!();
        println!("{}", "Misinterpretation Risks".bold().cyan());
        for r in risk.misinterpretation_risks.iter().take(MAX_RISKS) {
            println!("  - {}", r.risk.as_deref().unwrap_or("Unnamed risk"));
            if let Some(ref phrase) = r.problematic_phrase {
                println!("    Phrase: {}", format!("\"{phrase}\"").italic());
            }
            println!(
                "    Probability: {}  Impact: {}",
                label_colored(r.probability.as_deref()),
                label_colored(r.impact.as_deref())
            );
            if let Some(ref explanation) = r.explanation {
                println!("    {}", explanation.dimmed());
            }
        }
    }

    if !risk.red_flags.is_empty() {
        println!();
        println!("{}", "Red Flags".bold().red());
        for flag in risk.red_flags.iter().take(MAX_FLAGS) {
            let band = flag.severity.as_deref().and_then(Severity::from_label);
            println!(
                "  {} {}",
                "\u{25cf}".color(severity_color(band)),
                format!("\"{}\"", flag.phrase.as_deref().unwrap_or("")).italic()
            );
            if let Some(ref why) = flag.why_problematic {
                println!("    {why}");
            }
            if let Some(ref category) = flag.category {
                println!("    {}", format!("Category: {category}").dimmed());
            }
        }
    }

    if !risk.ambiguities.is_empty() {
        println!();
        println!("{}", "Ambiguities".bold().yellow());
        for ambiguity in risk.ambiguities.iter().take(MAX_AMBIGUITIES) {
            println!("  - {ambiguity}");
        }
    }
}

fn render_rewrite(result: &StageResult<RewriteReport>) {
    println!();
    if let Some(error) = result.error() {
        println!("{}", "Suggested Rewrites".bold().green());
        stage_error(error);
        return;
    }
    let Some(rewrite) = result.report() else { return };

    if !rewrite.needs_rewrite {
        println!(
            "{}",
            "This message looks good. No major rewrites needed.".green()
        );
        return;
    }

    println!("{}", "Suggested Rewrites".bold().green());
    for rw in rewrite.rewrites.iter().take(MAX_REWRITES) {
        println!();
        println!(
            "  {}",
            format!("{} Version", title_case(rw.version.as_deref().unwrap_or("Alternative"))).bold()
        );
        if let Some(ref message) = rw.rewritten_message {
            println!("  {}", message.green());
        }
        if let Some(ref tone) = rw.tone_shift {
            println!("  {}", format!("Tone: {tone}").dimmed());
        }
    }

    if !rewrite.specific_fixes.is_empty() {
        println!();
        println!("{}", "Quick Fixes".bold());
        for fix in rewrite.specific_fixes.iter().take(MAX_FIXES) {
            println!(
                "  {}",
                format!("- \"{}\"", fix.original_phrase.as_deref().unwrap_or("")).red()
            );
            println!(
                "  {}",
                format!("+ \"{}\"", fix.suggested_phrase.as_deref().unwrap_or("")).green()
            );
            if let Some(ref reason) = fix.reason {
                println!("    {}", reason.dimmed());
            }
            println!();
        }
    }

    if let Some(ref advice) = rewrite.general_advice {
        println!("{}", format!("Advice: {advice}").dimmed());
    }
}

fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_colors_match_band_table() {
        assert_eq!(severity_color(Some(Severity::Low)), Color::Green);
        assert_eq!(severity_color(Some(Severity::Medium)), Color::Yellow);
        assert_eq!(severity_color(Some(Severity::High)), Color::Red);
        assert_eq!(severity_color(None), Color::White);
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("professional"), "Professional");
        assert_eq!(title_case(""), "");
    }
}
