//! Process-wide text-assist entry point.

use std::sync::Arc;

use curalink_common::{CanonicalPublication, CanonicalTrial, RecordKind, SandboxClient, UserProfile};
use curalink_config::LlmConfig;
use curalink_ranker::{Searchable, Scored};
use secrecy::SecretString;
use tracing::{info, warn};

use crate::assist::{FallbackTextAssist, LlmTextAssist, TextAssist};
use crate::backend::OpenAiBackend;

/// Cheap to clone; the variant is chosen once at construction.
#[derive(Clone)]
pub struct TextAssistClient {
    inner: Arc<dyn TextAssist>,
}

impl TextAssistClient {
    pub fn new(inner: Arc<dyn TextAssist>) -> Self {
        Self { inner }
    }

    /// Always uses the deterministic fallbacks.
    pub fn disabled() -> Self {
        Self::new(Arc::new(FallbackTextAssist))
    }

    /// Build from configuration, reading `OPENAI_API_KEY` when the config has no key.
    pub fn from_config(config: &LlmConfig, http: SandboxClient) -> Self {
        Self::from_parts(config.resolve_api_key(), config, http)
    }

    pub fn from_parts(api_key: Option<String>, config: &LlmConfig, mut http: SandboxClient) -> Self {
        let Some(api_key) = api_key else {
            warn!("LLM API key not configured, text-assist features disabled");
            return Self::disabled();
        };

        if let Err(e) = http.allow_base_url(&config.base_url) {
            warn!(error = %e, "Invalid LLM base URL, text-assist features disabled");
            return Self::disabled();
        }

        let backend = OpenAiBackend::new(
            http,
            config.base_url.clone(),
            SecretString::from(api_key),
            config.model.clone(),
        );
        info!(model = %config.model, "Text-assist enabled");
        Self::new(Arc::new(LlmTextAssist::new(Arc::new(backend), config.summary_max_tokens)))
    }

    pub fn is_available(&self) -> bool {
        self.inner.is_available()
    }

    pub async fn extract_conditions(&self, text: &str) -> Vec<String> {
        self.inner.extract_conditions(text).await
    }

    pub async fn generate_summary(&self, content: &str, kind: RecordKind) -> Option<String> {
        self.inner.generate_summary(content, kind).await
    }

    /// Keyword-ranked recommendations. Purely local; works in either mode.
    pub fn get_recommendations<T: Searchable>(
        &self,
        profile: &UserProfile,
        items: Vec<T>,
        kind: RecordKind,
    ) -> Vec<Scored<T>> {
        curalink_ranker::rank(profile, items, kind)
    }

    /// Fill `ai_summary` from the trial description. Leaves the trial untouched
    /// when there is no description or no summary comes back.
    pub async fn enrich_trial(&self, trial: &mut CanonicalTrial) {
        let Some(description) = trial.description.as_deref().filter(|d| !d.trim().is_empty()) else {
            return;
        };
        let summary = self.generate_summary(description, RecordKind::Trial).await;
        if summary.is_some() {
            trial.ai_summary = summary;
        }
    }

    /// Fill `ai_summary` from the publication abstract.
    pub async fn enrich_publication(&self, publication: &mut CanonicalPublication) {
        let Some(abstract_text) = publication.abstract_text.as_deref().filter(|a| !a.trim().is_empty()) else {
            return;
        };
        let summary = self.generate_summary(abstract_text, RecordKind::Publication).await;
        if summary.is_some() {
            publication.ai_summary = summary;
        }
    }
}

impl std::fmt::Debug for TextAssistClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextAssistClient")
            .field("available", &self.is_available())
            .finish()
    }
}
