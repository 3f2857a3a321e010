//! Analysis Agents
//!
//! One single-purpose agent per stage. An agent renders its prompt
//! template with the message (and optional context summary), issues
//! exactly one completion request, and parses the response into that
//! stage's report.

pub mod context;
pub mod extract;

use std::marker::PhantomData;
use std::path::Path;

use anyhow::Result;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::inference::CompletionClient;
use crate::prompt::PromptTemplate;
use crate::types::{EmotionReport, IntentReport, RewriteReport, RiskReport, Stage, StageResult};

/// Max output tokens for the short stages (intent, emotion).
const DEFAULT_MAX_TOKENS: u32 = 1000;
/// Max output tokens for the context-carrying stages (risk, rewrite).
const EXTENDED_MAX_TOKENS: u32 = 1500;

/// A prompt-template-plus-completion-call unit producing one stage's
/// report. Immutable after construction.
pub struct Agent<R> {
    template: PromptTemplate,
    max_tokens: u32,
    _report: PhantomData<R>,
}

impl Agent<IntentReport> {
    pub fn intent(prompts_dir: &Path) -> Result<Self> {
        Ok(Self {
            template: PromptTemplate::load(prompts_dir, Stage::Intent)?,
            max_tokens: DEFAULT_MAX_TOKENS,
            _report: PhantomData,
        })
    }
}

impl Agent<EmotionReport> {
    pub fn emotion(prompts_dir: &Path) -> Result<Self> {
        Ok(Self {
            template: PromptTemplate::load(prompts_dir, Stage::Emotion)?,
            max_tokens: DEFAULT_MAX_TOKENS,
            _report: PhantomData,
        })
    }
}

impl Agent<RiskReport> {
    pub fn risk(prompts_dir: &Path) -> Result<Self> {
        Ok(Self {
            template: PromptTemplate::load(prompts_dir, Stage::Risk)?,
            max_tokens: EXTENDED_MAX_TOKENS,
            _report: PhantomData,
        })
    }
}

impl Agent<RewriteReport> {
    pub fn rewrite(prompts_dir: &Path) -> Result<Self> {
        Ok(Self {
            template: PromptTemplate::load(prompts_dir, Stage::Rewrite)?,
            max_tokens: EXTENDED_MAX_TOKENS,
            _report: PhantomData,
        })
    }
}

impl<R: DeserializeOwned> Agent<R> {
    pub fn stage(&self) -> Stage {
        self.template.stage()
    }

    /// Run this stage once over `message`.
    ///
    /// Transport and API faults propagate; an unparseable response
    /// comes back as `Degraded` data instead.
    pub async fn analyze(
        &self,
        client: &dyn CompletionClient,
        message: &str,
        context: Option<&str>,
    ) -> Result<StageResult<R>> {
        let prompt = self.template.render(message, context);
        debug!(stage = %self.stage(), "sending completion request");
        let response = client.complete(&prompt, self.max_tokens).await?;
        Ok(extract::parse_stage(&response))
    }
}
