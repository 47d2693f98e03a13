//! The two text-assist variants: LLM-backed and deterministic fallback.

use std::sync::Arc;

use async_trait::async_trait;
use curalink_common::RecordKind;
use tracing::{debug, instrument, warn};

use crate::backend::{LlmBackend, LlmRequest, Message};

const EXTRACT_PROMPT: &str =
    "You are a clinical language assistant. Identify every medical condition, disease \
     and symptom mentioned in the user's text. Respond with a JSON array of strings and nothing else.";
const TRIAL_SUMMARY_PROMPT: &str =
    "You are a medical expert. Summarize this clinical trial for patients in plain, \
     patient-friendly language, in 2-3 sentences.";
const PUBLICATION_SUMMARY_PROMPT: &str =
    "You are a medical expert. Summarize this research publication in simple language, \
     in 2-3 sentences.";

const EXTRACT_TEMPERATURE: f32 = 0.3;
const SUMMARY_TEMPERATURE: f32 = 0.5;

/// Optional enrichment features. Implementations never fail; they fall back instead.
#[async_trait]
pub trait TextAssist: Send + Sync {
    /// Whether results come from a live model.
    fn is_available(&self) -> bool;

    /// Medical conditions mentioned in `text`. Falls back to `[text]`.
    async fn extract_conditions(&self, text: &str) -> Vec<String>;

    /// A 2–3 sentence summary of a trial or publication body, or `None`.
    async fn generate_summary(&self, content: &str, kind: RecordKind) -> Option<String>;
}

// ── Fallback ──────────────────────────────────────────────────────────────────

/// Used when no credential is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackTextAssist;

#[async_trait]
impl TextAssist for FallbackTextAssist {
    fn is_available(&self) -> bool { false }

    async fn extract_conditions(&self, text: &str) -> Vec<String> {
        vec![text.to_string()]
    }

    async fn generate_summary(&self, _content: &str, _kind: RecordKind) -> Option<String> {
        None
    }
}

// ── LLM-backed ────────────────────────────────────────────────────────────────

pub struct LlmTextAssist {
    backend: Arc<dyn LlmBackend>,
    summary_max_tokens: u32,
}

impl LlmTextAssist {
    pub fn new(backend: Arc<dyn LlmBackend>, summary_max_tokens: u32) -> Self {
        Self { backend, summary_max_tokens }
    }
}

#[async_trait]
impl TextAssist for LlmTextAssist {
    fn is_available(&self) -> bool { true }

    #[instrument(skip_all)]
    async fn extract_conditions(&self, text: &str) -> Vec<String> {
        let req = LlmRequest {
            messages: vec![Message::system(EXTRACT_PROMPT), Message::user(text)],
            temperature: Some(EXTRACT_TEMPERATURE),
            ..Default::default()
        };

        match self.backend.complete(req).await {
            Ok(resp) => {
                let conditions = parse_condition_list(&resp.content);
                debug!(model = self.backend.model_id(), n = conditions.len(), "Conditions extracted");
                conditions
            }
            Err(e) => {
                warn!(error = %e, "Condition extraction failed, using input text");
                vec![text.to_string()]
            }
        }
    }

    #[instrument(skip_all, fields(kind = kind.as_str()))]
    async fn generate_summary(&self, content: &str, kind: RecordKind) -> Option<String> {
        let prompt = match kind {
            RecordKind::Trial       => TRIAL_SUMMARY_PROMPT,
            RecordKind::Publication => PUBLICATION_SUMMARY_PROMPT,
        };
        let req = LlmRequest {
            messages: vec![Message::system(prompt), Message::user(content)],
            temperature: Some(SUMMARY_TEMPERATURE),
            max_tokens: Some(self.summary_max_tokens),
            ..Default::default()
        };

        match self.backend.complete(req).await {
            Ok(resp) => {
                let summary = resp.content.trim();
                (!summary.is_empty()).then(|| summary.to_string())
            }
            Err(e) => {
                warn!(error = %e, "Summary generation failed");
                None
            }
        }
    }
}

/// Parse a model reply as a JSON string array; otherwise split it on `,` / `;`.
pub fn parse_condition_list(content: &str) -> Vec<String> {
    let body = strip_code_fence(content.trim());

    let items: Vec<String> = match serde_json::from_str::<Vec<String>>(body) {
        Ok(list) => list,
        Err(_) => body
            .split(|c: char| c == ',' || c == ';')
            .map(String::from)
            .collect(),
    };

    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Models often wrap JSON in a Markdown fence (```json ... ```).
fn strip_code_fence(content: &str) -> &str {
    let Some(rest) = content.strip_prefix("```") else {
        return content;
    };
    let rest = rest.split_once('\n').map(|(_, body)| body).unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
