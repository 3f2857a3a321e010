//! Analysis Pipeline
//!
//! Sequences the four agents over one message and accumulates the
//! result. Stage order is fixed: intent, emotion, risk, then the
//! gated rewrite. Calls run strictly one after another; risk sees
//! the intent and emotion results, rewrite sees everything.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tracing::warn;

use crate::agent::context::{rewrite_context, risk_context};
use crate::agent::Agent;
use crate::inference::CompletionClient;
use crate::types::{
    Analysis, EmotionReport, IntentReport, RewriteReport, RiskReport, Stage, StageResult,
};

/// Minimum risk score (1-10 scale) at which the rewrite stage runs.
pub const REWRITE_SCORE_THRESHOLD: f64 = 4.0;

/// Callback invoked as each stage starts.
pub type StageCallback = Box<dyn Fn(Stage) + Send + Sync>;

/// Options for one pipeline run.
pub struct RunOptions {
    pub include_rewrite: bool,
    pub on_stage: Option<StageCallback>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            include_rewrite: true,
            on_stage: None,
        }
    }
}

/// Orchestrates the four analysis agents.
///
/// Constructed once, holding one agent per stage and the shared
/// completion client; read-only afterwards, so front ends can share
/// it behind an `Arc` without locking.
pub struct Guard {
    client: Arc<dyn CompletionClient>,
    intent: Agent<IntentReport>,
    emotion: Agent<EmotionReport>,
    risk: Agent<RiskReport>,
    rewrite: Agent<RewriteReport>,
}

impl Guard {
    /// Build the guard, loading all four prompt templates from
    /// `prompts_dir`. A missing template file is fatal here.
    pub fn new(prompts_dir: &Path, client: Arc<dyn CompletionClient>) -> Result<Self> {
        Ok(Self {
            client,
            intent: Agent::intent(prompts_dir)?,
            emotion: Agent::emotion(prompts_dir)?,
            risk: Agent::risk(prompts_dir)?,
            rewrite: Agent::rewrite(prompts_dir)?,
        })
    }

    /// Run the full pipeline on one message.
    pub async fn run(&self, message: &str, options: &RunOptions) -> Result<Analysis> {
        let notify = |stage: Stage| {
            if let Some(ref cb) = options.on_stage {
                cb(stage);
            }
        };

        notify(Stage::Intent);
        let intent = self
            .intent
            .analyze(self.client.as_ref(), message, None)
            .await?;

        notify(Stage::Emotion);
        let emotion = self
            .emotion
            .analyze(self.client.as_ref(), message, None)
            .await?;

        notify(Stage::Risk);
        let context = risk_context(&intent, &emotion);
        let risk = self
            .risk
            .analyze(self.client.as_ref(), message, Some(&context))
            .await?;

        let rewrite = if options.include_rewrite && rewrite_gate(&risk) {
            notify(Stage::Rewrite);
            let context = rewrite_context(&intent, &emotion, &risk);
            Some(
                self.rewrite
                    .analyze(self.client.as_ref(), message, Some(&context))
                    .await?,
            )
        } else {
            None
        };

        Ok(Analysis {
            message: message.to_string(),
            intent,
            emotion,
            risk,
            rewrite,
        })
    }
}

/// Decide whether the rewrite stage should run.
///
/// The gate opens only for a parsed risk report whose score reaches
/// the threshold. A degraded risk stage or a missing or non-numeric
/// score keeps it closed, with a warning so the skip is observable.
pub fn rewrite_gate(risk: &StageResult<RiskReport>) -> bool {
    match risk.report().and_then(RiskReport::score) {
        Some(score) => score >= REWRITE_SCORE_THRESHOLD,
        None => {
            warn!("rewrite gate closed: risk score missing or non-numeric");
            false
        }
    }
}
