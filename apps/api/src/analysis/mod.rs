//! CV analysis: turns raw CV text into a `SkillAnalysis`.
//!
//! `AppState` holds an `Arc<dyn SkillExtractor>`. Production uses
//! `LlmSkillExtractor`; tests swap in a fixed extractor.

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use crate::errors::AppError;
use crate::llm_client::{LlmClient, LlmError};
use crate::models::profile::SkillAnalysis;

pub mod handlers;
pub mod pdf;
pub mod pii;
pub mod prompts;

const REQUIRED_FIELDS: [&str; 4] = ["skills", "creativityScore", "rpgClass", "metaSkills"];

#[async_trait]
pub trait SkillExtractor: Send + Sync {
    async fn extract(&self, cv_text: &str) -> Result<SkillAnalysis, AppError>;
}

/// Extracts skills by asking the LLM for a structured profile.
pub struct LlmSkillExtractor(pub LlmClient);

#[async_trait]
impl SkillExtractor for LlmSkillExtractor {
    async fn extract(&self, cv_text: &str) -> Result<SkillAnalysis, AppError> {
        let scrubbed = pii::scrub_pii(cv_text);
        info!("Sending scrubbed CV text to the LLM ({} chars)", scrubbed.len());

        let raw: Value = self
            .0
            .call_json(
                &prompts::cv_analysis_prompt(&scrubbed),
                &prompts::cv_analysis_system(),
            )
            .await?;

        let analysis = parse_analysis(raw)?;
        info!(
            "LLM extracted {} skills, class '{}'",
            analysis.skills.len(),
            analysis.rpg_class
        );
        Ok(analysis)
    }
}

/// Checks the top-level contract before deserializing, so a missing field is
/// reported by name rather than as a serde error.
fn parse_analysis(raw: Value) -> Result<SkillAnalysis, LlmError> {
    let missing: Vec<&str> = REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|field| raw.get(field).is_none())
        .collect();
    if !missing.is_empty() {
        return Err(LlmError::MissingFields(missing.join(", ")));
    }
    Ok(serde_json::from_value(raw)?)
}
