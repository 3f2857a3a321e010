//! Prompt Templates
//!
//! Loads per-stage prompt templates from disk and renders them with
//! the message text and an optional context summary. Templates are
//! plain text with `{message}` and `{context}` placeholders.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::types::Stage;

/// A prompt template, loaded once at agent construction and
/// immutable afterwards.
#[derive(Clone, Debug)]
pub struct PromptTemplate {
    stage: Stage,
    template: String,
}

impl PromptTemplate {
    /// Load the template for `stage` from `prompts_dir`.
    ///
    /// A missing or unreadable file is a fatal construction error.
    pub fn load(prompts_dir: &Path, stage: Stage) -> Result<Self> {
        let path = prompts_dir.join(stage.template_file());
        let template = fs::read_to_string(&path)
            .with_context(|| format!("Prompt file not found: {}", path.display()))?;
        Ok(Self { stage, template })
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Render the template. `{message}` is always substituted;
    /// `{context}` becomes the supplied summary, or an empty string
    /// when no context was given.
    pub fn render(&self, message: &str, context: Option<&str>) -> String {
        self.template
            .replace("{message}", message)
            .replace("{context}", context.unwrap_or(""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn repo_prompts_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("prompts")
    }

    #[test]
    fn test_render_substitutes_message() {
        let template = PromptTemplate {
            stage: Stage::Intent,
            template: "Analyze this: {message}".to_string(),
        };
        assert_eq!(
            template.render("hello there", None),
            "Analyze this: hello there"
        );
    }

    #[test]
    fn test_render_substitutes_context() {
        let template = PromptTemplate {
            stage: Stage::Risk,
            template: "Message: {message}\nContext:{context}".to_string(),
        };
        let rendered = template.render("hi", Some("\nIntent Analysis: ..."));
        assert_eq!(rendered, "Message: hi\nContext:\nIntent Analysis: ...");

        let rendered = template.render("hi", None);
        assert_eq!(rendered, "Message: hi\nContext:");
    }

    #[test]
    fn test_load_missing_file_is_fatal() {
        let err = PromptTemplate::load(Path::new("/nonexistent"), Stage::Intent)
            .expect_err("missing prompt file must error");
        assert!(err.to_string().contains("Prompt file not found"));
    }

    #[test]
    fn test_load_shipped_templates() {
        for stage in [Stage::Intent, Stage::Emotion, Stage::Risk, Stage::Rewrite] {
            let template = PromptTemplate::load(&repo_prompts_dir(), stage)
                .expect("shipped template must load");
            assert!(template.template.contains("{message}"));
            assert_eq!(template.stage(), stage);
        }
        // Downstream stages carry the context placeholder.
        for stage in [Stage::Risk, Stage::Rewrite] {
            let template = PromptTemplate::load(&repo_prompts_dir(), stage).unwrap();
            assert!(template.template.contains("{context}"));
        }
    }
}
