//! Wires configuration into the adapters and the text-assist client.

use std::time::Duration;

use curalink_common::SandboxClient;
use curalink_config::Config;
use curalink_ingestion::{ClinicalTrialsClient, PubMedClient};
use curalink_llm::TextAssistClient;
use tracing::info;

pub struct App {
    pub pubmed: PubMedClient,
    pub trials: ClinicalTrialsClient,
    pub assist: TextAssistClient,
    pub max_publications: usize,
}

impl App {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let http = build_http_client(config)?;

        let pubmed = PubMedClient::new(
            http.clone(),
            config.pubmed.base_url.clone(),
            config.pubmed.api_key.clone(),
        );
        let trials = ClinicalTrialsClient::new(http.clone(), config.clinical_trials.base_url.clone())
            .with_default_page_size(config.clinical_trials.page_size);
        let assist = TextAssistClient::from_config(&config.llm, http);

        info!(text_assist = assist.is_available(), "Components ready");
        Ok(Self { pubmed, trials, assist, max_publications: config.pubmed.max_results })
    }
}

/// One shared client, allowed to reach the configured source hosts.
fn build_http_client(config: &Config) -> anyhow::Result<SandboxClient> {
    let mut http = SandboxClient::with_user_agent(
        Duration::from_secs(config.http.timeout_secs),
        &config.http.user_agent,
    )?;
    http.allow_base_url(&config.pubmed.base_url)?;
    http.allow_base_url(&config.clinical_trials.base_url)?;
    Ok(http)
}
