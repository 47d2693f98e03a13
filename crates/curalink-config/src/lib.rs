//! Configuration loading for CuraLink.
//! Reads curalink.toml from the current directory or the path in the CURALINK_CONFIG env var.
//! Every section is optional; a missing file yields the defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

pub const CONFIG_ENV: &str = "CURALINK_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "curalink.toml";
/// Consulted when `[llm].api_key` is empty.
pub const OPENAI_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io { path: String, source: std::io::Error },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub pubmed: PubMedConfig,
    #[serde(default)]
    pub clinical_trials: ClinicalTrialsConfig,
    #[serde(default)]
    pub llm: LlmConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_timeout_secs() -> u64 { 30 }
fn default_user_agent()   -> String { format!("curalink/{}", env!("CARGO_PKG_VERSION")) }

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: default_timeout_secs(), user_agent: default_user_agent() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PubMedConfig {
    #[serde(default = "default_eutils_url")]
    pub base_url: String,
    pub api_key: Option<String>,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

fn default_eutils_url()  -> String { "https://eutils.ncbi.nlm.nih.gov/entrez/eutils".to_string() }
fn default_max_results() -> usize  { 20 }

impl Default for PubMedConfig {
    fn default() -> Self {
        Self { base_url: default_eutils_url(), api_key: None, max_results: default_max_results() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClinicalTrialsConfig {
    #[serde(default = "default_ct_url")]
    pub base_url: String,
    #[serde(default = "default_max_results")]
    pub page_size: usize,
}

fn default_ct_url() -> String { "https://clinicaltrials.gov/api/v2/studies".to_string() }

impl Default for ClinicalTrialsConfig {
    fn default() -> Self {
        Self { base_url: default_ct_url(), page_size: default_max_results() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Empty or absent disables text-assist features.
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_llm_url")]
    pub base_url: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default = "default_summary_tokens")]
    pub summary_max_tokens: u32,
}

fn default_llm_url()        -> String { "https://api.openai.com/v1".to_string() }
fn default_llm_model()      -> String { "gpt-3.5-turbo".to_string() }
fn default_summary_tokens() -> u32    { 150 }

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_llm_url(),
            model: default_llm_model(),
            summary_max_tokens: default_summary_tokens(),
        }
    }
}

impl LlmConfig {
    /// The configured credential, falling back to `OPENAI_API_KEY`.
    /// `None` means text-assist runs in degraded mode.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.resolve_api_key_with(|name| std::env::var(name).ok())
    }

    fn resolve_api_key_with(&self, env: impl Fn(&str) -> Option<String>) -> Option<String> {
        let key = if self.api_key.trim().is_empty() {
            env(OPENAI_KEY_ENV).unwrap_or_default()
        } else {
            self.api_key.clone()
        };
        let key = key.trim().to_string();
        (!key.is_empty()).then_some(key)
    }
}

mod tests;

impl Config {
    /// Load configuration.
    /// Checks CURALINK_CONFIG env var first, then curalink.toml in the current directory.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_ENV)
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(&path)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}
